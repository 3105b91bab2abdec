//! Line-range slicing over raw source text.
//!
//! Used to cut a construct's recorded span back out of the original file.
//! Pure over its inputs; line numbers are 1-based and inclusive on both ends.

use crate::errors::{Error, Result};

/// Extract the lines in the inclusive range `[start_line, end_line]`,
/// without line terminators.
///
/// # Errors
/// [`Error::InvalidRange`] when `start_line < 1` or `end_line < start_line`.
pub fn extract_lines(source: &str, start_line: usize, end_line: usize) -> Result<Vec<String>> {
    if start_line < 1 || end_line < start_line {
        return Err(Error::InvalidRange { start: start_line, end: end_line });
    }
    Ok(source
        .lines()
        .skip(start_line - 1)
        .take(end_line - start_line + 1)
        .map(str::to_owned)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN_LINES: &str = "l1\nl2\nl3\nl4\nl5\nl6\nl7\nl8\nl9\nl10\n";

    #[test]
    fn middle_window() {
        let lines = extract_lines(TEN_LINES, 3, 5).expect("valid range");
        assert_eq!(lines, ["l3", "l4", "l5"]);
    }

    #[test]
    fn single_line_and_full_file() {
        assert_eq!(extract_lines(TEN_LINES, 7, 7).unwrap(), ["l7"]);
        assert_eq!(extract_lines(TEN_LINES, 1, 10).unwrap().len(), 10);
    }

    #[test]
    fn range_past_end_is_clamped_by_iteration() {
        let lines = extract_lines(TEN_LINES, 9, 40).expect("valid range");
        assert_eq!(lines, ["l9", "l10"]);
    }

    #[test]
    fn zero_start_is_rejected() {
        let err = extract_lines(TEN_LINES, 0, 5).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { start: 0, end: 5 }));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = extract_lines(TEN_LINES, 6, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { start: 6, end: 2 }));
    }
}
