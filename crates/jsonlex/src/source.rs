//! Byte sources consumed by the lexer.
//!
//! The lexer only needs to read one byte at a time and tell end of stream
//! apart from failure. Pushback is an optional capability: sources that cannot
//! rewind keep the default [`ByteSource::unread_byte`], and can be lifted with
//! [`PushbackReader`](crate::PushbackReader).

use core::{convert::Infallible, error::Error};

use crate::error::PushbackError;

/// A forward-only stream of bytes.
pub trait ByteSource {
    /// Hard failure of the underlying stream. End of stream is not an error.
    type Error: Error;

    /// Reads up to `buf.len()` bytes into `buf`.
    ///
    /// Returns `Ok(0)` at end of stream when `buf` is non-empty.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying stream other than end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Pushes the most recently read byte back so the next `read` returns it
    /// again.
    ///
    /// # Errors
    ///
    /// [`PushbackError::Unsupported`] unless the source overrides this, and
    /// [`PushbackError::BufferExhausted`] when there is no byte to give back.
    fn unread_byte(&mut self) -> Result<(), PushbackError> {
        Err(PushbackError::Unsupported)
    }

    /// Whether [`unread_byte`](Self::unread_byte) is implemented at all.
    ///
    /// A `true` answer does not promise that every call succeeds, only that
    /// the most recently read byte can be given back.
    fn supports_pushback(&self) -> bool {
        false
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    type Error = S::Error;

    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }

    #[inline]
    fn unread_byte(&mut self) -> Result<(), PushbackError> {
        (**self).unread_byte()
    }

    #[inline]
    fn supports_pushback(&self) -> bool {
        (**self).supports_pushback()
    }
}

/// An in-memory source with native pushback.
///
/// Any number of bytes can be pushed back, up to the start of the slice.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Creates a source over `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not read yet.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Number of bytes read so far, net of pushback.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl ByteSource for SliceSource<'_> {
    type Error = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let rest = self.remaining();
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }

    fn unread_byte(&mut self) -> Result<(), PushbackError> {
        if self.pos == 0 {
            return Err(PushbackError::BufferExhausted);
        }
        self.pos -= 1;
        Ok(())
    }

    fn supports_pushback(&self) -> bool {
        true
    }
}

/// Adapts any [`std::io::Read`] into a [`ByteSource`].
///
/// Reads are issued one byte at a time, so wrap files and sockets in a
/// [`std::io::BufReader`] first. Interrupted reads are retried.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> IoSource<R> {
    /// Wraps `inner`.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for IoSource<R> {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.inner.read(buf) {
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                result => return result,
            }
        }
    }
}
