use alloc::borrow::ToOwned;
use core::fmt;

use bstr::{BStr, BString, ByteSlice};

/// The kind of a token emitted by the [`Lexer`](crate::Lexer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// End of stream. Terminal.
    #[default]
    Eof,
    /// Malformed input or a failing source. Terminal; the payload carries the
    /// message.
    Err,
    /// `true`, `false` or `null`.
    Literal,
    /// A number, kept as its source text.
    Number,
    /// A string, without quotes and with escapes left undecoded.
    String,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
}

impl TokenKind {
    /// Returns `true` for [`Eof`](Self::Eof) and [`Err`](Self::Err), the
    /// kinds that end a scan session.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Eof | Self::Err)
    }

    /// Returns `true` for the single-byte punctuation kinds.
    #[must_use]
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Self::Colon
                | Self::Comma
                | Self::LBracket
                | Self::RBracket
                | Self::LBrace
                | Self::RBrace
        )
    }
}

/// Starting class of a token, keyed by its first significant byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Start {
    Invalid,
    String,
    Number,
    Literal,
    Structural(TokenKind),
}

/// Classification of the first significant byte of a token. Everything not
/// listed, including all of `0x00..0x20` and `0x7F`, is [`Start::Invalid`].
pub(crate) static START: [Start; 0x80] = {
    let mut table = [Start::Invalid; 0x80];
    table[b'"' as usize] = Start::String;
    table[b'-' as usize] = Start::Number;
    let mut digit = b'0';
    while digit <= b'9' {
        table[digit as usize] = Start::Number;
        digit += 1;
    }
    table[b'f' as usize] = Start::Literal;
    table[b'n' as usize] = Start::Literal;
    table[b't' as usize] = Start::Literal;
    table[b':' as usize] = Start::Structural(TokenKind::Colon);
    table[b',' as usize] = Start::Structural(TokenKind::Comma);
    table[b'[' as usize] = Start::Structural(TokenKind::LBracket);
    table[b']' as usize] = Start::Structural(TokenKind::RBracket);
    table[b'{' as usize] = Start::Structural(TokenKind::LBrace);
    table[b'}' as usize] = Start::Structural(TokenKind::RBrace);
    table
};

/// A token borrowed from the lexer's scratch buffer.
///
/// The payload is only valid until the lexer is driven again, which the
/// borrow of the [`Lexer`](crate::Lexer) enforces. Anything that must outlive
/// that call has to be copied out with [`TokenView::to_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenView<'a> {
    /// What was recognized.
    pub kind: TokenKind,
    /// Raw matched bytes, see [`Token::payload`].
    pub payload: &'a BStr,
    /// Zero-based byte offset of the token's first byte.
    pub pos: usize,
}

impl TokenView<'_> {
    /// Returns `true` if this token ends the scan session.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    /// Copies the payload into owned storage.
    #[must_use]
    pub fn to_token(&self) -> Token {
        Token {
            kind: self.kind,
            payload: self.payload.to_owned(),
            pos: self.pos,
        }
    }
}

/// A token with its own copy of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// What was recognized.
    pub kind: TokenKind,
    /// Raw matched bytes: string content without quotes (escapes undecoded),
    /// number or literal text, or the error message for
    /// [`TokenKind::Err`]. Empty for structural tokens and EOF.
    pub payload: BString,
    /// Zero-based byte offset of the token's first byte. For EOF, the offset
    /// one past the last consumed byte.
    pub pos: usize,
}

impl Token {
    /// Convenience kind check.
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Returns `true` if this token ends the scan session.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    /// The payload as a [`BStr`].
    #[must_use]
    pub fn payload(&self) -> &BStr {
        self.payload.as_bstr()
    }
}

/// Prints the payload, lossily decoded as UTF-8.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.payload.as_bstr(), f)
    }
}
