//! Splitting the text before the cursor into the fragment being completed and
//! whatever precedes it.
//!
//! This is deliberately not a shell parser: there is no quoting, escaping or
//! operator handling. Fields are separated by whitespace and nothing else.

/// How a token should be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Contains a `/`, or starts with `~` or `.`; completed from the filesystem.
    PathLike,
    /// Anything else; completed from history.
    Plain,
}

pub fn classify(token: &str) -> TokenKind {
    if token.contains(std::path::MAIN_SEPARATOR) || token.starts_with(['~', '.']) {
        TokenKind::PathLike
    } else {
        TokenKind::Plain
    }
}

/// Split `line` into `(prefix, token)`.
///
/// The token is everything after the last whitespace character (or the whole line).
/// For a plain token the prefix is everything up to and including that whitespace.
///
/// For a path-like token the prefix is narrowed to the start of the argument being
/// completed: when the field right before the token is itself path-like, the prefix
/// is that field plus the whitespace after it, so `cat ~/My Documents/fi` keeps
/// `~/My ` attached to `Documents/fi`. Otherwise, or when that field begins the line,
/// the prefix is empty.
///
/// Whitespace-only input yields two empty strings.
pub fn split(line: &str) -> (&str, &str) {
    if line.trim().is_empty() {
        return ("", "");
    }
    let (prefix, token) = match last_whitespace_end(line) {
        Some(end) => line.split_at(end),
        None => ("", line),
    };
    match classify(token) {
        TokenKind::Plain => (prefix, token),
        TokenKind::PathLike => (argument_prefix(prefix), token),
    }
}

fn argument_prefix(prefix: &str) -> &str {
    let head = prefix.trim_end();
    let start = last_whitespace_end(head);
    let field = &head[start.unwrap_or(0)..];
    if field.is_empty() || classify(field) == TokenKind::Plain {
        return "";
    }
    match start {
        Some(start) => &prefix[start..],
        None => "",
    }
}

/// Byte offset just past the last whitespace character of `s`.
fn last_whitespace_end(s: &str) -> Option<usize> {
    s.char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
}
