use crate::{error::PushbackError, source::ByteSource};

/// What the adapter remembers about the last byte it handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Replay {
    /// Nothing to give back.
    Empty,
    /// The last byte read; may be pushed back once.
    Buffered(u8),
    /// Pushed back; the next read returns it first.
    Rewound(u8),
}

/// Grants single-byte pushback to a source that lacks it.
///
/// Only one byte of pushback is ever available: a second `unread_byte`
/// without an intervening read fails with
/// [`PushbackError::BufferExhausted`].
///
/// ```
/// use jsonlex::{ByteSource, PushbackReader, SliceSource};
///
/// let mut src = PushbackReader::new(SliceSource::new(b"ab"));
/// let mut buf = [0u8; 1];
/// src.read(&mut buf).unwrap();
/// src.unread_byte().unwrap();
/// src.read(&mut buf).unwrap();
/// assert_eq!(&buf, b"a");
/// ```
#[derive(Debug)]
pub struct PushbackReader<S: ByteSource> {
    inner: S,
    replay: Replay,
    /// Failure of a delegate read that followed a replayed byte.
    pending: Option<S::Error>,
}

impl<S: ByteSource> PushbackReader<S> {
    /// Wraps `inner`. Its own pushback capability, if any, is not used.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            replay: Replay::Empty,
            pending: None,
        }
    }

    /// Lifts `source` to one that can push back at least one byte.
    ///
    /// Sources whose [`ByteSource::supports_pushback`] is `true` are passed
    /// through untouched; all others are wrapped.
    ///
    /// ```
    /// use jsonlex::{ByteSource, PushbackReader, SliceSource, WithPushback};
    ///
    /// let src = PushbackReader::ensure(SliceSource::new(b"[1]"));
    /// assert!(matches!(src, WithPushback::Native(_)));
    /// assert!(src.supports_pushback());
    /// ```
    pub fn ensure(source: S) -> WithPushback<S> {
        if source.supports_pushback() {
            WithPushback::Native(source)
        } else {
            WithPushback::Adapted(Self::new(source))
        }
    }

    /// Returns the wrapped source. A pushed-back byte and a pending delegate
    /// failure are lost.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ByteSource> ByteSource for PushbackReader<S> {
    type Error = S::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if let Some(err) = self.pending.take() {
            return Err(err);
        }
        if buf.is_empty() {
            return Ok(0);
        }
        let Replay::Rewound(byte) = self.replay else {
            let n = self.inner.read(buf)?;
            if n > 0 {
                self.replay = Replay::Buffered(buf[n - 1]);
            }
            return Ok(n);
        };

        buf[0] = byte;
        self.replay = Replay::Empty;
        if buf.len() == 1 {
            return Ok(1);
        }
        // The replayed byte is already delivered, so a failure of the
        // follow-up read is reported by the next call.
        match self.inner.read(&mut buf[1..]) {
            Ok(0) => Ok(1),
            Ok(n) => {
                self.replay = Replay::Buffered(buf[n]);
                Ok(n + 1)
            }
            Err(err) => {
                self.pending = Some(err);
                Ok(1)
            }
        }
    }

    fn unread_byte(&mut self) -> Result<(), PushbackError> {
        match self.replay {
            Replay::Buffered(byte) => {
                self.replay = Replay::Rewound(byte);
                Ok(())
            }
            Replay::Empty | Replay::Rewound(_) => Err(PushbackError::BufferExhausted),
        }
    }

    fn supports_pushback(&self) -> bool {
        true
    }
}

/// A source with at least single-byte pushback, as built by
/// [`PushbackReader::ensure`].
#[derive(Debug)]
pub enum WithPushback<S: ByteSource> {
    /// The source pushes back on its own.
    Native(S),
    /// The source is wrapped in a [`PushbackReader`].
    Adapted(PushbackReader<S>),
}

impl<S: ByteSource> WithPushback<S> {
    /// Returns the original source, dropping the adapter if there is one.
    pub fn into_inner(self) -> S {
        match self {
            Self::Native(source) => source,
            Self::Adapted(reader) => reader.into_inner(),
        }
    }
}

impl<S: ByteSource> ByteSource for WithPushback<S> {
    type Error = S::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self {
            Self::Native(source) => source.read(buf),
            Self::Adapted(reader) => reader.read(buf),
        }
    }

    fn unread_byte(&mut self) -> Result<(), PushbackError> {
        match self {
            Self::Native(source) => source.unread_byte(),
            Self::Adapted(reader) => reader.unread_byte(),
        }
    }

    fn supports_pushback(&self) -> bool {
        true
    }
}
