//! Error types.

use core::fmt::{self, Display};

/// Errors raised while processing untrusted input.
///
/// Violated preconditions on trusted input (a scalar not below the group
/// order, a bit index past 255) are programming errors and panic instead.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Signature component `r` or `s` is zero or not below the group order.
    SignatureOutOfRange,

    /// Recovery id is not in `0..=3`.
    InvalidRecoveryId,

    /// `r + n` is not a valid field element.
    RecoveredXOutOfRange,

    /// Point does not satisfy the curve equation.
    PointNotOnCurve,

    /// Point is the identity.
    PointAtInfinity,

    /// DER-encoded signature could not be parsed.
    MalformedDer,

    /// Encoded point does not use the SEC1 uncompressed form.
    MalformedPoint,

    /// Output buffer is too small.
    BufferTooSmall,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::SignatureOutOfRange => "signature scalar out of range",
            Error::InvalidRecoveryId => "invalid recovery id",
            Error::RecoveredXOutOfRange => "recovered x-coordinate out of range",
            Error::PointNotOnCurve => "point not on curve",
            Error::PointAtInfinity => "point at infinity",
            Error::MalformedDer => "malformed DER signature",
            Error::MalformedPoint => "malformed SEC1 point encoding",
            Error::BufferTooSmall => "output buffer too small",
        })
    }
}

impl core::error::Error for Error {}

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;
