//! Text normalization for titles, paths and icon labels.

use crate::errors::WinResult;

/// Strip the trailing NUL padding fixed-size platform buffers leave behind.
#[must_use]
pub fn trim_padding(text: &str) -> &str {
    text.trim_end_matches('\0')
}

/// Compare two pieces of text, ignoring trailing NUL padding. Empty text never
/// matches anything.
#[must_use]
pub fn same_text(a: &str, b: &str) -> bool {
    let a = trim_padding(a);
    !a.is_empty() && a == trim_padding(b)
}

/// How the window system encoded a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Declared UTF-8. Invalid sequences are an error.
    Utf8,
    /// ISO-8859-1, where every byte is a character.
    Latin1,
}

/// Decode text handed over by the window system.
pub fn decode(bytes: Vec<u8>, encoding: TextEncoding) -> WinResult<String> {
    let text = match encoding {
        TextEncoding::Utf8 => String::from_utf8(bytes)?,
        TextEncoding::Latin1 => bytes.into_iter().map(char::from).collect(),
    };
    Ok(trim_padding(&text).to_owned())
}
