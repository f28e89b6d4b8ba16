use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("no line containing `{0}` in command output")]
    NoMatchingLine(String),
    #[error("nothing follows `{0}` in command output")]
    MissingToken(String),
}

/// First line containing `needle`.
pub(crate) fn first_line_with<'a>(output: &'a str, needle: &str) -> Result<&'a str, ParseError> {
    output
        .lines()
        .find(|line| line.contains(needle))
        .ok_or_else(|| ParseError::NoMatchingLine(needle.to_string()))
}

/// Last line containing `needle`.
pub(crate) fn last_line_with<'a>(output: &'a str, needle: &str) -> Result<&'a str, ParseError> {
    output
        .lines()
        .filter(|line| line.contains(needle))
        .last()
        .ok_or_else(|| ParseError::NoMatchingLine(needle.to_string()))
}

/// Last whitespace separated token of `line`, unless that token is `needle` itself.
pub(crate) fn last_token<'a>(line: &'a str, needle: &str) -> Result<&'a str, ParseError> {
    let needle_end: &str = needle.split_whitespace().last().unwrap_or(needle);
    match line.split_whitespace().last() {
        Some(token) if token != needle_end => Ok(token),
        _ => Err(ParseError::MissingToken(needle.to_string())),
    }
}
