use alloc::string::String;
use core::fmt;

use thiserror::Error;

/// Why a scan session ended with an [`Err`](crate::TokenKind::Err) token.
///
/// Every variant is terminal for the session. The message rendered by
/// `Display` is the payload carried by the ERR token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// An illegal byte, an invalid number tail or prefix, or a misspelled
    /// literal.
    ///
    /// The reported byte always comes from the bad token, never from the
    /// delimiter that ended it: the byte that cannot start a token, the last
    /// byte of a number (or its `e`/`E` after a `-.` prefix), or the first
    /// byte where a literal departs from `null`, `true` or `false` (the last
    /// byte when it is cut short).
    #[error("unexpected {} (0x{byte:X})", quoted(.byte))]
    MalformedInput {
        /// The byte that could not be classified or closed the bad token.
        byte: u8,
    },
    /// The source reported a failure other than end of stream.
    #[error("{0}")]
    SourceFailure(String),
    /// A byte replayed after pushback differs from the byte pushed back.
    #[error("pushback mismatch: expected {}, found {}", quoted(.expected), found_or_end(.found))]
    PushbackInconsistency {
        /// The byte handed back to the source.
        expected: u8,
        /// What the source produced instead, `None` for end of stream.
        found: Option<u8>,
    },
}

/// Failure of [`ByteSource::unread_byte`](crate::ByteSource::unread_byte).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushbackError {
    /// No byte is available to push back: nothing was read yet, or the last
    /// byte was already pushed back.
    #[error("pushback buffer exhausted")]
    BufferExhausted,
    /// The source has no pushback capability at all.
    #[error("source does not support pushback")]
    Unsupported,
}

/// Renders a byte as a single-quoted, escaped ASCII literal: `'a'`, `'\x05'`.
struct Quoted(u8);

impl fmt::Display for Quoted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("'")?;
        for c in core::ascii::escape_default(self.0) {
            fmt::Write::write_char(f, char::from(c))?;
        }
        f.write_str("'")
    }
}

struct Found(Option<u8>);

#[allow(clippy::trivially_copy_pass_by_ref)]
fn quoted(byte: &u8) -> Quoted {
    Quoted(*byte)
}

#[allow(clippy::ref_option)]
fn found_or_end(byte: &Option<u8>) -> Found {
    Found(*byte)
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(b) => Quoted(b).fmt(f),
            None => f.write_str("end of stream"),
        }
    }
}
