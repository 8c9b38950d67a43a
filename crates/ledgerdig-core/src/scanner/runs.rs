//! Printable-run extraction and small text predicates shared by the scanners.
//!
//! A printable run is a maximal stretch of bytes in `0x20..=0x7E`. Anything
//! outside that range separates runs. Runs borrow from the scanned buffer,
//! so extraction allocates nothing.

/// A candidate string found in a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Byte offset of the first byte of the run (or of the length prefix)
    pub offset: usize,
    /// Whitespace-trimmed text
    pub text: &'a str,
    /// Length declared by a prefix byte, for length-prefixed tokens
    pub declared_length: Option<usize>,
}

/// Returns true for bytes in the printable ASCII range
#[inline]
pub fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

/// Decodes a slice that must be printable ASCII in its entirety
#[inline]
pub fn decode_printable(bytes: &[u8]) -> Option<&str> {
    if !bytes.iter().all(|&b| is_printable(b)) {
        return None;
    }
    std::str::from_utf8(bytes).ok()
}

/// Counts ASCII letters
#[inline]
pub fn alpha_count(text: &str) -> usize {
    text.bytes().filter(u8::is_ascii_alphabetic).count()
}

/// Matches an account number: 4-6 digits, optionally followed by `.digits`
pub fn is_account_number(text: &str) -> bool {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text, None),
    };

    let whole_ok = (4..=6).contains(&whole.len()) && whole.bytes().all(|b| b.is_ascii_digit());
    let fraction_ok = match fraction {
        Some(f) => !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()),
        None => true,
    };

    whole_ok && fraction_ok
}

/// Returns true if the slice is non-empty and all ASCII digits
#[inline]
pub fn is_digits(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit)
}

/// Iterator over the printable runs of a buffer.
///
/// A run is reported when its raw length is at least `min_len`. With a
/// `max_len`, the trimmed text must additionally fall in `min_len..=max_len`,
/// except that a run ending the buffer is never capped.
#[derive(Debug, Clone)]
pub struct PrintableRuns<'a> {
    data: &'a [u8],
    position: usize,
    min_len: usize,
    max_len: Option<usize>,
}

impl<'a> PrintableRuns<'a> {
    /// Creates an unbounded run iterator
    pub fn new(data: &'a [u8], min_len: usize) -> Self {
        Self {
            data,
            position: 0,
            min_len,
            max_len: None,
        }
    }

    /// Restricts reported runs to a trimmed length of at most `max_len`
    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    fn accepts(&self, text: &str, at_end: bool) -> bool {
        match self.max_len {
            Some(_) if at_end => text.len() >= self.min_len,
            Some(max) => (self.min_len..=max).contains(&text.len()),
            None => true,
        }
    }
}

impl<'a> Iterator for PrintableRuns<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.data;

        while self.position < data.len() {
            if !is_printable(data[self.position]) {
                self.position += 1;
                continue;
            }

            let start = self.position;
            while self.position < data.len() && is_printable(data[self.position]) {
                self.position += 1;
            }

            if self.position - start < self.min_len {
                continue;
            }

            let Ok(raw) = std::str::from_utf8(&data[start..self.position]) else {
                continue;
            };
            let text = raw.trim();
            if self.accepts(text, self.position == data.len()) {
                return Some(Token {
                    offset: start,
                    text,
                    declared_length: None,
                });
            }
        }

        None
    }
}

/// Extracts trimmed printable strings within a length window
pub fn extract_strings(data: &[u8], min_len: usize, max_len: usize) -> PrintableRuns<'_> {
    PrintableRuns::new(data, min_len).max_len(max_len)
}

/// Reads a length-prefixed printable token whose length byte sits at `offset`.
///
/// Returns `None` when the declared length is outside `lengths`, the body
/// runs past `limit`, or the body is not printable.
pub fn length_prefixed(
    data: &[u8],
    offset: usize,
    lengths: std::ops::RangeInclusive<usize>,
    limit: usize,
) -> Option<Token<'_>> {
    let declared = *data.get(offset)? as usize;
    if !lengths.contains(&declared) {
        return None;
    }

    let start = offset + 1;
    let end = start + declared;
    if end > limit.min(data.len()) {
        return None;
    }

    let text = decode_printable(&data[start..end])?;
    Some(Token {
        offset,
        text: text.trim(),
        declared_length: Some(declared),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts<'a>(runs: impl Iterator<Item = Token<'a>>) -> Vec<&'a str> {
        runs.map(|t| t.text).collect()
    }

    #[test]
    fn test_runs_split_on_non_printable() {
        let data = b"\x00\x01Cash on hand\x00\xffab\x1fSales Tax\x7fEND!";
        let runs: Vec<_> = PrintableRuns::new(data, 4).collect();

        assert_eq!(texts(runs.iter().copied()), vec!["Cash on hand", "Sales Tax", "END!"]);
        assert_eq!(runs[0].offset, 2);
        assert_eq!(runs[1].offset, 19);
        assert_eq!(runs[2].offset, 29);
    }

    #[test]
    fn test_runs_are_trimmed() {
        let data = b"\x00   Padded Name   \x00";
        assert_eq!(texts(PrintableRuns::new(data, 4)), vec!["Padded Name"]);
    }

    #[test]
    fn test_window_filters_trimmed_length() {
        let long = [b'A'; 70];
        let mut data = b"\x00Ok\x00Good Name\x00    ab    \x00".to_vec();
        data.extend_from_slice(&long);
        data.push(0);

        assert_eq!(texts(extract_strings(&data, 4, 50)), vec!["Good Name"]);
        assert_eq!(PrintableRuns::new(&data, 4).count(), 3);
    }

    #[test]
    fn test_trailing_run_is_not_capped() {
        let long = "Z".repeat(70);
        let mut data = b"\x00Good Name\x00".to_vec();
        data.extend_from_slice(long.as_bytes());

        assert_eq!(
            texts(extract_strings(&data, 4, 50)),
            vec!["Good Name", long.as_str()]
        );

        // Still subject to the minimum after trimming
        assert_eq!(
            texts(extract_strings(b"\x00Good Name\x00ab    ", 4, 50)),
            vec!["Good Name"]
        );
    }

    #[test]
    fn test_runs_restartable() {
        let data = b"\x00Alpha Beta\x00Gamma Delta\x00";
        let first: Vec<_> = PrintableRuns::new(data, 4).collect();
        let second: Vec<_> = PrintableRuns::new(data, 4).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_buffer() {
        assert_eq!(PrintableRuns::new(&[], 1).count(), 0);
    }

    #[test]
    fn test_account_number_pattern() {
        assert!(is_account_number("1200"));
        assert!(is_account_number("120000"));
        assert!(is_account_number("1200.01"));
        assert!(!is_account_number("120"));
        assert!(!is_account_number("1200000"));
        assert!(!is_account_number("1200."));
        assert!(!is_account_number("12a0"));
        assert!(!is_account_number("1200.0.1"));
        assert!(!is_account_number(""));
    }

    #[test]
    fn test_length_prefixed() {
        let data = b"\x09Petty Cas\x00";
        let token = length_prefixed(data, 0, 5..=45, data.len()).unwrap();
        assert_eq!(token.text, "Petty Cas");
        assert_eq!(token.declared_length, Some(9));

        // Out of declared range
        assert!(length_prefixed(data, 0, 10..=45, data.len()).is_none());
        // Body runs past the limit
        assert!(length_prefixed(data, 0, 5..=45, 6).is_none());
        // Length byte points past the buffer
        assert!(length_prefixed(b"\x20abc", 0, 5..=45, 100).is_none());
        // Non-printable body
        assert!(length_prefixed(b"\x05ab\x00de", 0, 5..=45, 100).is_none());
    }

    #[test]
    fn test_alpha_count() {
        assert_eq!(alpha_count("A1 b2 c3"), 3);
        assert_eq!(alpha_count("1234"), 0);
    }
}
