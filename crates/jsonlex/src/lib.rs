//! Streaming JSON tokenizer over pull-based byte sources.
//!
//! The [`Lexer`] reads one byte at a time from a [`ByteSource`] and emits one
//! token per call, without building a parse tree. It keeps no source of its
//! own, so scanning can stop after any token and resume later on the same
//! stream. With [`LexerOptions::pushback`] the byte that ended a number or
//! literal is given back to the source, leaving it exactly at the end of the
//! emitted token for other consumers.
//!
//! [`Cursor`] builds a lookahead window of owned tokens on top, optionally
//! dropping tokens through a filter.
//!
//! ```rust
//! use jsonlex::{Cursor, SliceSource, TokenKind};
//!
//! let mut cursor = Cursor::new(SliceSource::new(br#"[true, -1.5]"#));
//! let mut payloads = Vec::new();
//! while !cursor.current().is_terminal() {
//!     payloads.push(cursor.current().to_string());
//!     cursor.advance();
//! }
//! assert_eq!(payloads, ["", "true", "", "-1.5", ""]);
//! assert!(cursor.current().is(TokenKind::Eof));
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod cursor;
mod error;
mod lexer;
mod options;
mod pushback;
mod source;
mod token;

#[cfg(test)]
mod tests;

pub use cursor::{Cursor, TokenFilter};
pub use error::{LexError, PushbackError};
pub use lexer::{Lexer, ScanOutcome};
pub use options::LexerOptions;
pub use pushback::{PushbackReader, WithPushback};
#[cfg(feature = "std")]
pub use source::IoSource;
pub use source::{ByteSource, SliceSource};
pub use token::{Token, TokenKind, TokenView};
