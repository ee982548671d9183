//! Delimiter detection for plain-text tables

use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::constants::data::{DELIMITER_CANDIDATES, SNIFF_LINES};

use super::DataError;

/// Sniff the delimiter of the text file at `path` from its first lines
pub fn sniff_file(path: &Path) -> Result<u8, DataError> {
    let reader = BufReader::new(std::fs::File::open(path)?);
    let mut lines = Vec::with_capacity(SNIFF_LINES);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        lines.push(line);
        if lines.len() == SNIFF_LINES {
            break;
        }
    }

    if lines.is_empty() {
        return Err(DataError::EmptyFile);
    }
    Ok(sniff_delimiter(&lines))
}

/// Pick the first candidate that occurs the same, non-zero number of times
/// on every sampled line. Falls back to the candidate with most occurrences
/// on the header line, and to a comma for single-column files.
pub fn sniff_delimiter<S: AsRef<str>>(lines: &[S]) -> u8 {
    let consistent = DELIMITER_CANDIDATES.iter().copied().find(|&delimiter| {
        let mut counts = lines.iter().map(|line| count_unquoted(line.as_ref(), delimiter));
        match counts.next() {
            Some(first) if first > 0 => counts.all(|n| n == first),
            _ => false,
        }
    });

    consistent.unwrap_or_else(|| {
        let header = lines.first().map(|l| l.as_ref()).unwrap_or("");
        // Reversed so that ties go to the earlier candidate
        DELIMITER_CANDIDATES
            .iter()
            .rev()
            .copied()
            .map(|d| (d, count_unquoted(header, d)))
            .filter(|&(_, n)| n > 0)
            .max_by_key(|&(_, n)| n)
            .map(|(d, _)| d)
            .unwrap_or(b',')
    })
}

/// Count occurrences of `delimiter` outside double-quoted fields
fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_delimiters() {
        assert_eq!(sniff_delimiter(&["a,b,c", "1,2,3"]), b',');
        assert_eq!(sniff_delimiter(&["a\tb", "1\t2", "3\t4"]), b'\t');
        assert_eq!(sniff_delimiter(&["a;b", "1,5;2,5"]), b';');
        assert_eq!(sniff_delimiter(&["a|b|c", "x|y|z"]), b'|');
        assert_eq!(sniff_delimiter(&["a b", "1 2"]), b' ');
    }

    #[test]
    fn test_quoted_delimiters_are_ignored() {
        let lines = ["name;note", "\"Smith; John\";ok", "Doe;\"a;b\""];
        assert_eq!(sniff_delimiter(&lines), b';');
    }

    #[test]
    fn test_inconsistent_lines_fall_back_to_header() {
        // The free text column breaks the space count, the tab count is steady
        let lines = ["id\tcomment", "1\thello world", "2\tfine"];
        assert_eq!(sniff_delimiter(&lines), b'\t');

        let ragged = ["a;b;c", "1;2", "3"];
        assert_eq!(sniff_delimiter(&ragged), b';');
    }

    #[test]
    fn test_single_column_defaults_to_comma() {
        assert_eq!(sniff_delimiter(&["value", "1", "2"]), b',');
    }

    #[test]
    fn test_empty_file() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(sniff_file(file.path()), Err(DataError::EmptyFile)));
    }
}
