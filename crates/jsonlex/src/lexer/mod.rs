//! Lexer: resumable byte-level state machine.
//!
//! Overview
//! - Each call reads bytes from a [`ByteSource`] one at a time until exactly
//!   one token is complete, then returns it as a [`TokenView`] borrowing the
//!   lexer's scratch buffer. The scratch is cleared when the next token
//!   begins, so payloads that must outlive the call are copied out.
//! - States per token: `Sniffing -> {String, Number, Literal, structural}`.
//!   Whitespace is skipped while sniffing; the first significant byte is
//!   classified through the [`START`] table.
//! - Structural tokens and strings are self-delimiting. Numbers and literals
//!   end only when a byte arrives that cannot extend them; that byte belongs
//!   to the next token and is either kept in the hold register or pushed back
//!   into the source (see [`LexerOptions::pushback`]).
//!
//! End of stream
//! - A pending number or literal is closed and validated as if the stream end
//!   were a delimiter.
//! - A pending string is emitted with the content read so far. This is not
//!   reported as an error.
//! - Otherwise an EOF token is emitted at the offset one past the last byte.
//!
//! Errors
//! - Malformed input, source failures and pushback mismatches all yield a
//!   single ERR token whose payload is the error message. The typed error is
//!   available through [`Lexer::last_error`].

mod literal;
mod number;

use alloc::{string::ToString, vec::Vec};
use core::ops::ControlFlow;

use bstr::ByteSlice;
use number::NumberMode;

use crate::{
    error::LexError,
    options::LexerOptions,
    source::ByteSource,
    token::{START, Start, TokenKind, TokenView},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Sniffing,
    String { escaped: bool },
    Number(NumberMode),
    Literal,
}

/// Outcome of feeding one byte to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Keep reading.
    Next,
    /// The token is complete, including this byte.
    Emit(TokenKind),
    /// The token ended before this byte, which starts the next token.
    Delimited(TokenKind),
    /// The byte cannot start a token.
    Invalid(u8),
}

/// How a [`Lexer::scan`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The callback broke out after an ordinary token; call again to resume.
    Suspended,
    /// The stream is exhausted.
    Eof,
    /// An ERR token ended the session.
    Error,
}

/// Streaming JSON tokenizer.
///
/// A lexer carries the state of one scan session across calls. It is not
/// tied to a source: every call takes the source to read from, and the
/// caller must keep passing the same one until a terminal token is emitted.
/// After a terminal token the lexer can be reused for a new stream.
///
/// ```
/// use jsonlex::{Lexer, SliceSource, TokenKind};
///
/// let mut lexer = Lexer::default();
/// let mut src = SliceSource::new(br#"{"a": [1, true]}"#);
/// let mut kinds = Vec::new();
/// loop {
///     let token = lexer.next_token(&mut src);
///     kinds.push(token.kind);
///     if token.is_terminal() {
///         break;
///     }
/// }
/// assert_eq!(kinds.len(), 10);
/// assert_eq!(kinds.last(), Some(&TokenKind::Eof));
/// ```
#[derive(Debug, Clone)]
pub struct Lexer {
    options: LexerOptions,
    scratch: Vec<u8>,
    state: State,
    /// Bytes consumed from the logical stream, net of pushback.
    offset: usize,
    token_pos: usize,
    /// Byte read past the previous token, not yet classified.
    held: Option<u8>,
    /// Byte pushed back into the source, expected on the next read.
    replay: Option<u8>,
    error: Option<LexError>,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new(LexerOptions::default())
    }
}

impl Lexer {
    /// Creates a lexer at stream offset zero.
    #[must_use]
    pub fn new(options: LexerOptions) -> Self {
        Self {
            options,
            scratch: Vec::new(),
            state: State::Sniffing,
            offset: 0,
            token_pos: 0,
            held: None,
            replay: None,
            error: None,
        }
    }

    /// The options this lexer was created with.
    #[must_use]
    pub fn options(&self) -> LexerOptions {
        self.options
    }

    /// Number of bytes consumed from the stream so far.
    ///
    /// Without pushback this may include one byte past the last emitted
    /// token.
    #[must_use]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// The error behind the most recent token, if it was ERR.
    #[must_use]
    pub fn last_error(&self) -> Option<&LexError> {
        self.error.as_ref()
    }

    /// Forgets the current stream, including any held or pushed-back byte,
    /// and starts over at offset zero.
    pub fn reset(&mut self) {
        self.scratch.clear();
        self.state = State::Sniffing;
        self.offset = 0;
        self.token_pos = 0;
        self.held = None;
        self.replay = None;
        self.error = None;
    }

    /// Reads from `source` until exactly one token is complete.
    ///
    /// The returned view borrows the lexer; copy the payload with
    /// [`TokenView::to_token`] to keep it past the next call.
    pub fn next_token<S>(&mut self, source: &mut S) -> TokenView<'_>
    where
        S: ByteSource + ?Sized,
    {
        let kind = self.lex(source);
        TokenView {
            kind,
            payload: self.scratch.as_bstr(),
            pos: self.token_pos,
        }
    }

    /// Scans tokens from `source`, handing each to `on_token`.
    ///
    /// After an ordinary token, `ControlFlow::Break` suspends the scan and
    /// `ControlFlow::Continue` scans on. A terminal token always ends the
    /// call, whatever the callback returns.
    ///
    /// ```
    /// use core::ops::ControlFlow;
    /// use jsonlex::{Lexer, ScanOutcome, SliceSource};
    ///
    /// let mut lexer = Lexer::default();
    /// let mut src = SliceSource::new(b" { } ");
    /// let mut seen = 0;
    /// let outcome = lexer.scan(&mut src, |_| {
    ///     seen += 1;
    ///     ControlFlow::Break(())
    /// });
    /// assert_eq!(outcome, ScanOutcome::Suspended);
    /// assert_eq!(seen, 1);
    /// ```
    pub fn scan<S, F>(&mut self, source: &mut S, mut on_token: F) -> ScanOutcome
    where
        S: ByteSource + ?Sized,
        F: FnMut(TokenView<'_>) -> ControlFlow<()>,
    {
        loop {
            let token = self.next_token(source);
            let kind = token.kind;
            let flow = on_token(token);
            match kind {
                TokenKind::Eof => return ScanOutcome::Eof,
                TokenKind::Err => return ScanOutcome::Error,
                _ if flow.is_break() => return ScanOutcome::Suspended,
                _ => {}
            }
        }
    }

    fn lex<S>(&mut self, source: &mut S) -> TokenKind
    where
        S: ByteSource + ?Sized,
    {
        self.scratch.clear();
        self.state = State::Sniffing;
        self.error = None;

        loop {
            let byte = match self.next_byte(source) {
                Ok(Some(byte)) => byte,
                Ok(None) => return self.end_of_stream(),
                Err(err) => return self.fail(err),
            };
            match self.step(byte) {
                Step::Next => {}
                Step::Emit(kind) => return self.emit(kind),
                Step::Delimited(kind) => {
                    if let Err(err) = self.validate(kind) {
                        return self.fail(err);
                    }
                    self.release(byte, source);
                    return self.emit(kind);
                }
                Step::Invalid(byte) => return self.fail(LexError::MalformedInput { byte }),
            }
        }
    }

    /// Returns the held byte, or reads a fresh one. `Ok(None)` is end of
    /// stream.
    fn next_byte<S>(&mut self, source: &mut S) -> Result<Option<u8>, LexError>
    where
        S: ByteSource + ?Sized,
    {
        if let Some(byte) = self.held.take() {
            return Ok(Some(byte));
        }

        let mut buf = [0u8; 1];
        let n = source
            .read(&mut buf)
            .map_err(|err| LexError::SourceFailure(err.to_string()))?;
        let found = (n > 0).then_some(buf[0]);
        if let Some(expected) = self.replay.take() {
            if found != Some(expected) {
                return Err(LexError::PushbackInconsistency { expected, found });
            }
        }
        if found.is_some() {
            self.offset += 1;
        }
        Ok(found)
    }

    fn step(&mut self, byte: u8) -> Step {
        match self.state {
            State::Sniffing => self.sniff(byte),
            State::String { escaped } => self.string(byte, escaped),
            State::Number(mode) => match mode.accept(byte) {
                Some(mode) => {
                    self.state = State::Number(mode);
                    self.scratch.push(byte);
                    Step::Next
                }
                None => Step::Delimited(TokenKind::Number),
            },
            State::Literal => {
                if byte.is_ascii_lowercase() {
                    self.scratch.push(byte);
                    Step::Next
                } else {
                    Step::Delimited(TokenKind::Literal)
                }
            }
        }
    }

    fn sniff(&mut self, byte: u8) -> Step {
        if matches!(byte, b' ' | b'\t' | b'\n' | b'\r') {
            return Step::Next;
        }
        self.token_pos = self.offset.saturating_sub(1);
        let start = START
            .get(usize::from(byte))
            .copied()
            .unwrap_or(Start::Invalid);
        match start {
            Start::Invalid => Step::Invalid(byte),
            Start::Structural(kind) => Step::Emit(kind),
            Start::String => {
                self.state = State::String { escaped: false };
                Step::Next
            }
            Start::Number => {
                self.state = State::Number(NumberMode::default());
                self.scratch.push(byte);
                Step::Next
            }
            Start::Literal => {
                self.state = State::Literal;
                self.scratch.push(byte);
                Step::Next
            }
        }
    }

    fn string(&mut self, byte: u8, escaped: bool) -> Step {
        if !escaped && byte == b'"' {
            return Step::Emit(TokenKind::String);
        }
        self.state = State::String {
            escaped: !escaped && byte == b'\\',
        };
        self.scratch.push(byte);
        Step::Next
    }

    fn validate(&self, kind: TokenKind) -> Result<(), LexError> {
        let checked = match kind {
            TokenKind::Number => number::validate(&self.scratch),
            TokenKind::Literal => literal::check(&self.scratch),
            _ => Ok(()),
        };
        checked.map_err(|byte| LexError::MalformedInput { byte })
    }

    /// Hands the byte that ended a number or literal to the next token.
    fn release<S>(&mut self, byte: u8, source: &mut S)
    where
        S: ByteSource + ?Sized,
    {
        if self.options.pushback {
            match source.unread_byte() {
                Ok(()) => {
                    self.offset -= 1;
                    self.replay = Some(byte);
                    return;
                }
                Err(err) => log::debug!("pushback failed ({err}), holding byte {byte:#04x}"),
            }
        }
        self.held = Some(byte);
    }

    fn end_of_stream(&mut self) -> TokenKind {
        let kind = match self.state {
            _ if self.scratch.is_empty() => {
                self.token_pos = self.offset;
                TokenKind::Eof
            }
            State::Number(_) => TokenKind::Number,
            State::Literal => TokenKind::Literal,
            State::String { .. } => {
                log::debug!("stream ended inside a string at {}", self.token_pos);
                TokenKind::String
            }
            State::Sniffing => TokenKind::Eof,
        };
        if let Err(err) = self.validate(kind) {
            return self.fail(err);
        }
        self.emit(kind)
    }

    fn emit(&mut self, kind: TokenKind) -> TokenKind {
        log::trace!(
            "{kind:?} at {}: {:?}",
            self.token_pos,
            self.scratch.as_bstr()
        );
        self.state = State::Sniffing;
        kind
    }

    fn fail(&mut self, err: LexError) -> TokenKind {
        if self.state == State::Sniffing && !matches!(err, LexError::MalformedInput { .. }) {
            self.token_pos = self.offset;
        }
        log::debug!("error at {}: {err}", self.token_pos);
        self.scratch.clear();
        self.scratch.extend_from_slice(err.to_string().as_bytes());
        self.error = Some(err);
        self.state = State::Sniffing;
        self.held = None;
        self.replay = None;
        TokenKind::Err
    }
}
