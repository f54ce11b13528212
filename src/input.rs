//! Answers typed by the user.

use std::io::BufRead;

use crate::prelude::*;
use crate::store::dirs::DEFAULT_LAYOUT_NAME;

/// Result of asking the user for a line of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInput {
    /// Whether the user answered, rather than closing the input.
    pub accepted: bool,
    pub text: String,
}

impl UserInput {
    /// Read one line, without its line ending.
    pub fn read_line(reader: &mut impl BufRead) -> WinResult<Self> {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(Self::default());
        }

        Ok(Self {
            accepted: true,
            text: line.trim_end_matches(['\r', '\n']).to_owned(),
        })
    }

    /// The answer as a layout name, or the default name if there was none.
    pub fn layout_name(&self) -> &str {
        let text = self.text.trim();
        if self.accepted && !text.is_empty() {
            text
        } else {
            DEFAULT_LAYOUT_NAME
        }
    }
}
