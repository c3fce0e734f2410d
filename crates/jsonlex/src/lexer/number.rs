/// Flags tracking how far a number has progressed.
///
/// A digit is not required after `.` or the exponent marker while
/// accumulating; [`validate`] catches the bad shapes at emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) struct NumberMode {
    fraction: bool,
    exponent: bool,
    sign_pending: bool,
}

impl NumberMode {
    /// Returns the mode after appending `byte`, or `None` if `byte` cannot
    /// extend the number.
    pub(super) fn accept(self, byte: u8) -> Option<Self> {
        match byte {
            b'0'..=b'9' => Some(Self {
                sign_pending: false,
                ..self
            }),
            b'.' if !self.fraction => Some(Self {
                fraction: true,
                ..self
            }),
            // No fraction may follow the exponent.
            b'e' | b'E' if !self.exponent => Some(Self {
                fraction: true,
                exponent: true,
                sign_pending: true,
            }),
            b'+' | b'-' if self.sign_pending => Some(Self {
                sign_pending: false,
                ..self
            }),
            _ => None,
        }
    }
}

/// Checks a complete number payload.
///
/// The last byte must not be `.`, `-`, `e` or `E`, and the payload must not
/// start with `-.e` or `-.E`. On failure returns the offending byte.
pub(super) fn validate(payload: &[u8]) -> Result<(), u8> {
    if let Some(&last @ (b'.' | b'-' | b'e' | b'E')) = payload.last() {
        return Err(last);
    }
    if let [b'-', b'.', marker @ (b'e' | b'E'), ..] = payload {
        return Err(*marker);
    }
    Ok(())
}
