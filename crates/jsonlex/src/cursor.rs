//! Three-slot lookahead over a [`Lexer`].
//!
//! The cursor owns its source for its whole lifetime and keeps owned copies of
//! the previous, current and next accepted tokens. Payloads are copied out of
//! the lexer when a token enters the window, so every slot stays valid no
//! matter how far the lexer has moved on.

use core::{fmt, mem, ops::ControlFlow};

use bstr::BStr;

use crate::{
    lexer::Lexer,
    source::ByteSource,
    token::{Token, TokenKind},
};

/// The filter type of an unfiltered [`Cursor`].
pub type TokenFilter = fn(TokenKind, &BStr) -> bool;

/// A lookahead window of owned tokens over one byte source.
///
/// Right after construction [`current`](Self::current) holds the first
/// accepted token and [`peek_next`](Self::peek_next) the second. Once a
/// terminal token reaches `current`, the window freezes: [`advance`] keeps
/// returning it without reading from the source.
///
/// Using the source through another cursor or lexer while this one is alive
/// is a caller error; the borrow of `S` only rules it out when `S` is owned.
///
/// ```
/// use jsonlex::{Cursor, SliceSource, TokenKind};
///
/// let mut cursor = Cursor::with_filter(SliceSource::new(br#"{"a": 1}"#), |kind, _| {
///     !kind.is_structural()
/// });
/// assert_eq!(cursor.current().payload, "a");
/// assert_eq!(cursor.peek_next().payload, "1");
/// assert_eq!(cursor.advance().kind, TokenKind::Number);
/// assert_eq!(cursor.advance().kind, TokenKind::Eof);
/// ```
///
/// [`advance`]: Self::advance
pub struct Cursor<S, F = TokenFilter> {
    source: S,
    lexer: Lexer,
    filter: Option<F>,
    previous: Option<Token>,
    current: Token,
    next: Token,
}

impl<S: ByteSource> Cursor<S> {
    /// Creates a cursor that accepts every token.
    pub fn new(source: S) -> Self {
        Self::with_lexer(source, Lexer::default(), None)
    }
}

impl<S, F> Cursor<S, F>
where
    S: ByteSource,
    F: FnMut(TokenKind, &BStr) -> bool,
{
    /// Creates a cursor that only lets in tokens `filter` accepts.
    ///
    /// Rejected tokens never occupy a slot. Terminal tokens bypass the filter.
    pub fn with_filter(source: S, filter: F) -> Self {
        Self::with_lexer(source, Lexer::default(), Some(filter))
    }

    /// Creates a cursor driving `lexer`, which should be fresh or
    /// [reset](Lexer::reset).
    ///
    /// Reads from `source` until the first two slots are filled.
    pub fn with_lexer(source: S, lexer: Lexer, filter: Option<F>) -> Self {
        let mut cursor = Self {
            source,
            lexer,
            filter,
            previous: None,
            current: Token::default(),
            next: Token::default(),
        };
        cursor.current = cursor.pull();
        cursor.next = if cursor.current.is_terminal() {
            cursor.current.clone()
        } else {
            cursor.pull()
        };
        cursor
    }

    /// Moves the window forward by one accepted token and returns the new
    /// current token.
    pub fn advance(&mut self) -> &Token {
        if self.current.is_terminal() {
            return &self.current;
        }
        let next = if self.next.is_terminal() {
            self.next.clone()
        } else {
            self.pull()
        };
        let current = mem::replace(&mut self.next, next);
        self.previous = Some(mem::replace(&mut self.current, current));
        &self.current
    }

    /// Scans until the filter accepts a token or the session ends.
    fn pull(&mut self) -> Token {
        let filter = &mut self.filter;
        let mut accepted = Token::default();
        self.lexer.scan(&mut self.source, |token| {
            let keep = token.is_terminal()
                || filter
                    .as_mut()
                    .is_none_or(|accept| accept(token.kind, token.payload));
            if !keep {
                log::trace!("filtered {:?} at {}", token.kind, token.pos);
                return ControlFlow::Continue(());
            }
            accepted = token.to_token();
            ControlFlow::Break(())
        });
        accepted
    }
}

impl<S, F> Cursor<S, F> {
    /// The token after [`current`](Self::current).
    #[must_use]
    pub fn peek_next(&self) -> &Token {
        &self.next
    }

    /// The token the cursor is on.
    #[must_use]
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// The token before [`current`](Self::current), if the cursor has
    /// advanced at least once.
    #[must_use]
    pub fn previous(&self) -> Option<&Token> {
        self.previous.as_ref()
    }

    /// The lexer behind this cursor.
    #[must_use]
    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    /// Gives the source back. The lexer has already consumed the tokens in the
    /// window, and without pushback one byte past them.
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: fmt::Debug, F> fmt::Debug for Cursor<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("source", &self.source)
            .field("lexer", &self.lexer)
            .field("filtered", &self.filter.is_some())
            .field("previous", &self.previous)
            .field("current", &self.current)
            .field("next", &self.next)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::{options::LexerOptions, source::SliceSource};

    #[derive(Debug, thiserror::Error)]
    #[error("unexpected EOF")]
    struct Broken;

    /// Fails every read and counts the attempts.
    #[derive(Debug, Default)]
    struct FaultySource {
        reads: usize,
    }

    impl ByteSource for FaultySource {
        type Error = Broken;

        fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
            self.reads += 1;
            Err(Broken)
        }
    }

    fn drain<S, F>(cursor: &mut Cursor<S, F>) -> Vec<(TokenKind, Vec<u8>)>
    where
        S: ByteSource,
        F: FnMut(TokenKind, &BStr) -> bool,
    {
        let mut seen = Vec::new();
        loop {
            let token = cursor.current();
            seen.push((token.kind, token.payload.to_vec()));
            if token.is_terminal() {
                return seen;
            }
            cursor.advance();
        }
    }

    #[test]
    fn unfiltered_walks_every_token() {
        let mut cursor = Cursor::new(SliceSource::new(br#"{ "foo": -1 }"#));
        assert!(cursor.previous().is_none());
        assert!(cursor.current().is(TokenKind::LBrace));
        assert_eq!(cursor.peek_next().payload, "foo");

        let kinds: Vec<_> = drain(&mut cursor).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            [
                TokenKind::LBrace,
                TokenKind::String,
                TokenKind::Colon,
                TokenKind::Number,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn previous_is_the_token_just_consumed() {
        let mut cursor = Cursor::new(SliceSource::new(br#"{ "foo": -1 }"#));
        while !cursor.current().is(TokenKind::Number) {
            cursor.advance();
        }
        let number = cursor.current().clone();
        assert!(cursor.advance().is(TokenKind::RBrace));
        assert_eq!(cursor.previous(), Some(&number));
        assert_eq!(number.payload, "-1");
        assert_eq!(number.pos, 9);
    }

    #[test]
    fn filter_hides_rejected_tokens() {
        let mut cursor = Cursor::with_filter(SliceSource::new(br#"{ "foo": -1 }"#), |kind, _| {
            !matches!(
                kind,
                TokenKind::LBrace | TokenKind::RBrace | TokenKind::Colon
            )
        });
        assert_eq!(
            drain(&mut cursor),
            [
                (TokenKind::String, b"foo".to_vec()),
                (TokenKind::Number, b"-1".to_vec()),
                (TokenKind::Eof, Vec::new()),
            ]
        );
    }

    #[test]
    fn filter_sees_payloads() {
        let mut cursor = Cursor::with_filter(
            SliceSource::new(br#"["keep", "skip", "keep"]"#),
            |kind, payload| kind == TokenKind::String && payload != "skip",
        );
        assert_eq!(cursor.current().pos, 1);
        assert_eq!(cursor.peek_next().pos, 17);
        assert!(cursor.advance().is(TokenKind::String));
        assert!(cursor.advance().is(TokenKind::Eof));
    }

    #[test]
    fn source_error_freezes_the_window() {
        let mut cursor = Cursor::new(FaultySource::default());
        assert!(cursor.current().is(TokenKind::Err));
        assert_eq!(cursor.current().payload, "unexpected EOF");
        assert_eq!(cursor.peek_next(), cursor.current());
        for _ in 0..3 {
            let token = cursor.advance();
            assert!(token.is(TokenKind::Err));
            assert_eq!(token.payload, "unexpected EOF");
        }
        assert!(cursor.previous().is_none());
        assert_eq!(cursor.into_source().reads, 1);
    }

    #[test]
    fn error_in_lookahead_stops_the_lexer() {
        let mut cursor = Cursor::new(SliceSource::new(b"[1 ? 2]"));
        assert!(cursor.peek_next().is(TokenKind::Number));
        assert!(cursor.advance().is(TokenKind::Number));
        assert!(cursor.peek_next().is(TokenKind::Err));
        let position = cursor.lexer().position();

        assert!(cursor.advance().is(TokenKind::Err));
        assert!(cursor.advance().is(TokenKind::Err));
        assert_eq!(cursor.previous().map(|t| t.kind), Some(TokenKind::Number));
        assert_eq!(cursor.lexer().position(), position);
        assert_eq!(cursor.into_source().remaining(), b" 2]");
    }

    #[test]
    fn advance_past_eof_is_idempotent() {
        let mut cursor = Cursor::new(SliceSource::new(b"true"));
        assert!(cursor.advance().is(TokenKind::Eof));
        let previous = cursor.previous().cloned();
        for _ in 0..3 {
            let token = cursor.advance();
            assert!(token.is(TokenKind::Eof));
            assert_eq!(token.pos, 4);
        }
        assert_eq!(cursor.previous().cloned(), previous);
        assert_eq!(cursor.peek_next().kind, TokenKind::Eof);
    }

    #[test]
    fn slots_own_their_payloads() {
        let mut cursor = Cursor::new(SliceSource::new(br#""a" "b" "c""#));
        cursor.advance();
        assert_eq!(cursor.previous().map(Token::payload), Some("a".into()));
        assert_eq!(cursor.current().payload, "b");
        assert_eq!(cursor.peek_next().payload, "c");
    }

    #[test]
    fn pushback_lexer_leaves_source_after_lookahead() {
        let cursor = Cursor::<_, TokenFilter>::with_lexer(
            SliceSource::new(b"[1] tail"),
            Lexer::new(LexerOptions { pushback: true }),
            None,
        );
        assert_eq!(cursor.peek_next().payload, "1");
        assert_eq!(cursor.into_source().remaining(), b"] tail");
    }
}
