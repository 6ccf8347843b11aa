//! Line-exact comparison of a generated output file against a gold file.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::HarnessError;

/// Result of comparing two files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Identical,
    /// The first differing line, 1-based. Contents have line terminators
    /// stripped; a file that ended early shows as an empty line.
    Differs {
        line: usize,
        generated: String,
        gold: String,
    },
    /// One of the files could not be opened.
    Missing { path: PathBuf },
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Identical)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Identical => write!(f, "files are identical"),
            Verdict::Differs {
                line,
                generated,
                gold,
            } => {
                writeln!(f, "Difference at line {line}:")?;
                writeln!(f, "  Generated: {generated}")?;
                write!(f, "  Gold     : {gold}")
            }
            Verdict::Missing { path } => {
                write!(f, "Error: shape file not found: {}", path.display())
            }
        }
    }
}

/// Compares `generated` against `gold` line by line, stopping at the first
/// difference.
///
/// Lines are compared as raw bytes including their terminators, so `a\n`
/// and `a\r\n` differ, as does a missing final newline. Neither file has to
/// be valid UTF-8. A read failure after opening names the file that failed.
pub fn compare(generated: &Path, gold: &Path) -> Result<Verdict, HarnessError> {
    let mut generated_reader = match open(generated) {
        Ok(reader) => reader,
        Err(verdict) => return Ok(verdict),
    };
    let mut gold_reader = match open(gold) {
        Ok(reader) => reader,
        Err(verdict) => return Ok(verdict),
    };

    let mut generated_line = Vec::new();
    let mut gold_line = Vec::new();
    let mut line = 1;
    loop {
        generated_line.clear();
        gold_line.clear();
        let generated_read = generated_reader
            .read_until(b'\n', &mut generated_line)
            .map_err(|e| HarnessError::io(generated, e))?;
        let gold_read = gold_reader
            .read_until(b'\n', &mut gold_line)
            .map_err(|e| HarnessError::io(gold, e))?;

        if generated_read == 0 && gold_read == 0 {
            return Ok(Verdict::Identical);
        }
        if generated_line != gold_line {
            return Ok(Verdict::Differs {
                line,
                generated: display_line(&generated_line),
                gold: display_line(&gold_line),
            });
        }
        line += 1;
    }
}

fn open(path: &Path) -> Result<BufReader<File>, Verdict> {
    File::open(path).map(BufReader::new).map_err(|_| Verdict::Missing {
        path: path.to_path_buf(),
    })
}

/// Strips trailing line terminators and decodes lossily for display.
fn display_line(line: &[u8]) -> String {
    let end = line
        .iter()
        .rposition(|&b| b != b'\n' && b != b'\r')
        .map_or(0, |last| last + 1);
    String::from_utf8_lossy(&line[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write_pair(generated: &str, gold: &str) -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let generated_path = dir.path().join("generated.txt");
        let gold_path = dir.path().join("gold.txt");
        fs::write(&generated_path, generated).unwrap();
        fs::write(&gold_path, gold).unwrap();
        (dir, generated_path, gold_path)
    }

    #[test]
    fn test_file_matches_itself() {
        let (_dir, path, _) = write_pair("AC\nACC-\nA-CC\n", "");
        assert_eq!(compare(&path, &path).unwrap(), Verdict::Identical);

        let (_dir, empty, _) = write_pair("", "");
        assert!(compare(&empty, &empty).unwrap().passed());
    }

    #[test]
    fn test_reports_first_difference_only() {
        let (_dir, generated, gold) =
            write_pair("one\ntwo\nthree\nfour\nfive\n", "one\ntwo\nTHREE\nfour\nFIVE\n");
        assert_eq!(
            compare(&generated, &gold).unwrap(),
            Verdict::Differs {
                line: 3,
                generated: "three".to_string(),
                gold: "THREE".to_string()
            }
        );
    }

    #[test]
    fn test_shorter_file_differs() {
        let (_dir, generated, gold) = write_pair("one\n", "one\ntwo\n");
        assert_eq!(
            compare(&generated, &gold).unwrap(),
            Verdict::Differs {
                line: 2,
                generated: String::new(),
                gold: "two".to_string()
            }
        );
    }

    #[test]
    fn test_trailing_content_matters() {
        let (_dir, generated, gold) = write_pair("one\ntwo", "one\ntwo\n");
        let verdict = compare(&generated, &gold).unwrap();
        assert!(!verdict.passed());
        insta::assert_snapshot!(verdict.to_string(), @r"
        Difference at line 2:
          Generated: two
          Gold     : two
        ");
    }

    #[test]
    fn test_missing_file() {
        let (dir, generated, _) = write_pair("x\n", "x\n");
        let absent = dir.path().join("absent.txt");
        assert_eq!(
            compare(&generated, &absent).unwrap(),
            Verdict::Missing { path: absent.clone() }
        );
        assert_eq!(
            compare(&absent, &generated).unwrap(),
            Verdict::Missing { path: absent }
        );
    }

    #[test]
    fn test_non_utf8_file_matches_itself() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        fs::write(&path, [0x41, 0xff, 0xfe, b'\n', 0x80, b'\n']).unwrap();
        assert_eq!(compare(&path, &path).unwrap(), Verdict::Identical);
    }

    #[test]
    fn test_non_utf8_files_report_lossy_difference() {
        let dir = tempfile::tempdir().unwrap();
        let generated = dir.path().join("generated.txt");
        let gold = dir.path().join("gold.txt");
        fs::write(&generated, [b'o', b'k', b'\n', 0x41, 0xff, b'\r', b'\n']).unwrap();
        fs::write(&gold, [b'o', b'k', b'\n', 0x41, 0xfe, b'\n']).unwrap();

        assert_eq!(
            compare(&generated, &gold).unwrap(),
            Verdict::Differs {
                line: 2,
                generated: "A\u{FFFD}".to_string(),
                gold: "A\u{FFFD}".to_string()
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_read_error_names_the_failing_file() {
        // a directory opens on unix but cannot be read
        let (dir, generated, _) = write_pair("x\n", "x\n");
        let err = compare(&generated, dir.path()).unwrap_err();
        match err {
            HarnessError::Io { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
