#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line {
    pub(crate) text: String,
    pub(crate) tokens: Vec<String>,
}

impl Line {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            tokens: tokenize_line(text).map(str::to_string).collect(),
        }
    }
}

pub fn tokenize_line(line: &str) -> impl Iterator<Item = &str> {
    line.split_whitespace()
}

/// Lines shorter than two characters, or made only of whitespace, never
/// reach the tracker.
pub(crate) fn is_noise(line: &str) -> bool {
    let mut chars = line.chars();
    if chars.next().is_none() || chars.next().is_none() {
        return true;
    }
    line.trim().is_empty()
}

/// Strips the line terminator left by `read_until(b'\n')`, including the
/// `\r` of CRLF input, and decodes lossily.
pub(crate) fn decode_line(raw: &[u8]) -> String {
    let mut end = raw.len();
    if end > 0 && raw[end - 1] == b'\n' {
        end -= 1;
        if end > 0 && raw[end - 1] == b'\r' {
            end -= 1;
        }
    }
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
