/// Configuration options for the [`Lexer`](crate::Lexer).
///
/// # Examples
///
/// ```rust
/// use jsonlex::{Lexer, LexerOptions};
///
/// let lexer = Lexer::new(LexerOptions {
///     pushback: true,
///     ..Default::default()
/// });
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexerOptions {
    /// Whether to give back the byte that ended a number or literal.
    ///
    /// A number or literal is only known to be complete once the byte after
    /// it has been read. By default the lexer keeps that byte in a hold
    /// register for the next token, so the source is one byte ahead of the
    /// emitted token. With pushback, the lexer calls
    /// [`ByteSource::unread_byte`](crate::ByteSource::unread_byte) so the
    /// source stops exactly at the end of the token, and verifies the byte
    /// when it is read again. Other consumers can then read the same source
    /// between two lexer calls.
    ///
    /// Sources without pushback support fall back to the hold register; lift
    /// them with [`PushbackReader::ensure`](crate::PushbackReader::ensure) to
    /// avoid that.
    ///
    /// # Default
    ///
    /// `false`
    pub pushback: bool,
}
