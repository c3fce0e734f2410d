/// The literal a token must spell out, chosen by its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ExpectedLiteral {
    Null,
    True,
    False,
}

impl ExpectedLiteral {
    /// Picks the literal for `n`, `t` or `f`.
    pub(super) fn from_first(byte: u8) -> Option<Self> {
        match byte {
            b'n' => Some(Self::Null),
            b't' => Some(Self::True),
            b'f' => Some(Self::False),
            _ => None,
        }
    }

    fn spelling(self) -> &'static [u8] {
        match self {
            Self::Null => b"null",
            Self::True => b"true",
            Self::False => b"false",
        }
    }
}

/// Checks an accumulated run of lowercase letters against `null`, `true` and
/// `false`.
///
/// On mismatch, returns the first byte that cannot belong to the literal, or
/// the last byte of a truncated one.
pub(super) fn check(payload: &[u8]) -> Result<(), u8> {
    let Some((&first, _)) = payload.split_first() else {
        return Ok(());
    };
    let Some(expected) = ExpectedLiteral::from_first(first) else {
        return Err(first);
    };
    let spelling = expected.spelling();
    if let Some(i) = payload
        .iter()
        .zip(spelling)
        .position(|(got, want)| got != want)
    {
        return Err(payload[i]);
    }
    match payload.get(spelling.len()) {
        Some(&extra) => Err(extra),
        None if payload.len() < spelling.len() => Err(payload[payload.len() - 1]),
        None => Ok(()),
    }
}
