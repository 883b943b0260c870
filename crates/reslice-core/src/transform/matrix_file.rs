//! ASCII matrix file reader.
//!
//! Transform files are plain text: one matrix row per line, values separated
//! by whitespace. Blank lines are ignored. Anything that is not exactly four
//! rows of four finite real numbers is rejected.

use std::path::Path;

use super::affine::AffineTransform;
use crate::error::{ResliceError, Result};

/// Parse a 4x4 transform from text.
///
/// `source_name` only labels error messages.
pub fn parse_matrix(text: &str, source_name: &str) -> Result<AffineTransform> {
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(4);

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let row = line
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| {
                        ResliceError::malformed(
                            source_name,
                            format!("invalid number \"{}\" on line {}", token, line_no + 1),
                        )
                    })
            })
            .collect::<Result<Vec<f64>>>()?;

        rows.push(row);
    }

    if rows.len() != 4 {
        return Err(ResliceError::malformed(
            source_name,
            format!("expected 4 rows, got {}", rows.len()),
        ));
    }

    let mut values = [[0.0; 4]; 4];
    for (r, row) in rows.iter().enumerate() {
        if row.len() != 4 {
            return Err(ResliceError::malformed(
                source_name,
                format!("expected 4 columns in row {}, got {}", r + 1, row.len()),
            ));
        }
        values[r].copy_from_slice(row);
    }

    Ok(AffineTransform::from_rows(values))
}

/// Read and parse a 4x4 transform file.
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<AffineTransform> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ResliceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_matrix(&text, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identity() {
        let t = parse_matrix("1 0 0 0\n0 1 0 0\n0 0 1 0\n0 0 0 1", "inline").unwrap();
        assert!(t.is_identity());
    }

    #[test]
    fn test_parse_tolerates_blank_lines_and_tabs() {
        let text = "\n 1\t0 0 5\n0 1 0 -2.5\n\n0 0 1 1e1\n0 0 0 1\n\n";
        let t = parse_matrix(text, "inline").unwrap();
        assert_eq!(t.get(0, 3), 5.0);
        assert_eq!(t.get(1, 3), -2.5);
        assert_eq!(t.get(2, 3), 10.0);
    }

    #[test]
    fn test_three_rows_is_malformed() {
        let err = parse_matrix("1 0 0 0\n0 1 0 0\n0 0 1 0", "xfm.txt").unwrap_err();
        match err {
            ResliceError::MalformedTransform { source_name, reason } => {
                assert_eq!(source_name, "xfm.txt");
                assert!(reason.contains("got 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let err = parse_matrix("1 0 0 0\n0 1 0\n0 0 1 0\n0 0 0 1", "xfm.txt").unwrap_err();
        assert!(matches!(err, ResliceError::MalformedTransform { .. }));
    }

    #[test]
    fn test_non_numeric_is_malformed() {
        let err = parse_matrix("1 0 0 0\n0 one 0 0\n0 0 1 0\n0 0 0 1", "xfm.txt").unwrap_err();
        assert!(matches!(err, ResliceError::MalformedTransform { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_non_finite_is_malformed() {
        for token in ["nan", "inf", "-inf", "NaN", "infinity"] {
            let text = format!("1 0 0 0\n0 1 0 0\n0 0 1 {}\n0 0 0 1\n", token);
            let err = parse_matrix(&text, "xfm.txt").unwrap_err();
            assert!(
                matches!(err, ResliceError::MalformedTransform { .. }),
                "{} accepted",
                token
            );
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_matrix("/nonexistent/path/xfm.txt").unwrap_err();
        assert!(matches!(err, ResliceError::Io { .. }));
    }
}
