//! Decimal rendering of amounts into caller-provided buffers.

use super::Bignum256;
use crate::{Error, Result};

/// How [`Bignum256::format`] renders a value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FormatOptions<'a> {
    /// Written before the number.
    pub prefix: &'a str,

    /// Written after the number.
    pub suffix: &'a str,

    /// Number of implied decimal places: the last `decimals` digits of the
    /// (exponent-adjusted) value form the fractional part.
    pub decimals: u32,

    /// Power-of-ten adjustment applied before placing the decimal point.
    /// Positive values append zeros, negative values drop low digits.
    pub exponent: i32,

    /// Drop zeros at the end of the fractional part, and the decimal point
    /// itself if nothing remains after it.
    pub trim_trailing_zeros: bool,
}

/// Writes digits right to left into `out[start..]`.
struct DigitWriter<'a> {
    out: &'a mut [u8],
    start: usize,
    pos: usize,
}

impl DigitWriter<'_> {
    fn push(&mut self, c: u8) -> Result<()> {
        if self.pos == self.start {
            return Err(Error::BufferTooSmall);
        }
        self.pos -= 1;
        self.out[self.pos] = c;
        Ok(())
    }
}

/// Places digits, least significant first, around the decimal point.
struct Placer<'o, 'a> {
    writer: DigitWriter<'o>,
    options: &'a FormatOptions<'a>,
    /// Digits still to be dropped because of a negative exponent.
    skip: u32,
    /// Index of the next digit, counted from the least significant kept one.
    place: u32,
    /// Whether a fractional digit has been written.
    fraction_written: bool,
}

impl Placer<'_, '_> {
    fn emit(&mut self, digit: u32) -> Result<()> {
        if self.skip > 0 {
            self.skip -= 1;
            return Ok(());
        }

        let decimals = self.options.decimals;
        if self.place < decimals {
            if digit != 0 || !self.options.trim_trailing_zeros || self.fraction_written {
                self.writer.push(b'0' + digit as u8)?;
                self.fraction_written = true;
            }
        } else {
            if self.place == decimals && self.fraction_written {
                self.writer.push(b'.')?;
            }
            self.writer.push(b'0' + digit as u8)?;
        }

        self.place += 1;
        Ok(())
    }
}

impl Bignum256 {
    /// Render this value in decimal into `out`, returning the number of bytes
    /// written.
    ///
    /// The value is normalized first and must be below `2^256`. Bytes of
    /// `out` past the returned length are zeroed. Nothing is allocated;
    /// [`Error::BufferTooSmall`] is returned if `out` cannot hold the prefix,
    /// the number and the suffix.
    ///
    /// ```
    /// use wallet_ecc::{Bignum256, FormatOptions};
    ///
    /// let opts = FormatOptions { decimals: 2, suffix: " BTC", ..Default::default() };
    /// let mut buf = [0u8; 32];
    /// let len = Bignum256::from_u64(123_456_789).format(&opts, &mut buf).unwrap();
    /// assert_eq!(&buf[..len], b"1234567.89 BTC");
    /// ```
    pub fn format(&self, options: &FormatOptions<'_>, out: &mut [u8]) -> Result<usize> {
        let prefix = options.prefix.as_bytes();
        let suffix = options.suffix.as_bytes();

        if prefix.len() + suffix.len() > out.len() {
            return Err(Error::BufferTooSmall);
        }

        let start = prefix.len();
        let end = out.len() - suffix.len();
        let mut val = self.normalize();
        let is_zero = bool::from(val.is_zero());

        let mut placer = Placer {
            writer: DigitWriter {
                out: &mut *out,
                start,
                pos: end,
            },
            options,
            skip: if is_zero { 0 } else { options.exponent.min(0).unsigned_abs() },
            place: 0,
            fraction_written: false,
        };

        if !is_zero {
            for _ in 0..options.exponent.max(0) {
                placer.emit(0)?;
            }
        }

        let mut remaining = val.digit_count();
        while remaining > 0 {
            let mut group = val.div_rem_1000();
            for _ in 0..remaining.min(3) {
                placer.emit(group % 10)?;
                group /= 10;
            }
            remaining = remaining.saturating_sub(3);
        }

        // a negative exponent may have dropped every digit
        placer.skip = 0;

        // pad the fraction, then make sure there is an integer digit
        while placer.place < options.decimals {
            placer.emit(0)?;
        }
        if placer.place == options.decimals {
            placer.emit(0)?;
        }

        let pos = placer.writer.pos;
        let len = end - pos;

        out[..start].copy_from_slice(prefix);
        out.copy_within(pos..end, start);
        out[start + len..start + len + suffix.len()].copy_from_slice(suffix);
        out[start + len + suffix.len()..].fill(0);

        Ok(start + len + suffix.len())
    }

    /// Render a machine-word amount; shorthand for
    /// `Bignum256::from_u64(amount).format(options, out)`.
    pub fn format_u64(amount: u64, options: &FormatOptions<'_>, out: &mut [u8]) -> Result<usize> {
        Self::from_u64(amount).format(options, out)
    }
}
