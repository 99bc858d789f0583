//! Precomputed multiples of a curve's generator.

use super::{AffinePoint, CurveParams};
use cfg_if::cfg_if;
use core::{fmt, ops::Deref};

#[cfg(not(any(feature = "critical-section", feature = "std")))]
compile_error!("`precomputed-tables` feature requires either `critical-section` or `std`");

cfg_if! {
    if #[cfg(feature = "critical-section")] {
        use once_cell::sync::Lazy as LazyLock;
    } else {
        use std::sync::LazyLock;
    }
}

/// Number of radix-16 windows of a 256-bit scalar.
pub(crate) const WINDOWS: usize = 64;

/// Number of odd multiples stored per window.
pub(crate) const ODD_MULTIPLES: usize = 8;

/// Table contents: entry `[i][j]` is `(2j + 1) · 16^i · G`.
pub(crate) type Table = [[AffinePoint; ODD_MULTIPLES]; WINDOWS];

/// Precomputed table of odd multiples of the powers of 16 of a base point,
/// lazily initialized on first use so that it can be bound to a `static`.
pub struct BasepointTable {
    table: LazyLock<Table>,
}

impl BasepointTable {
    /// Create a table that runs `init` on first access.
    ///
    /// `init` is expected to call [`BasepointTable::generate`] on the curve
    /// the table is attached to.
    pub const fn new(init: fn() -> Table) -> Self {
        Self {
            table: LazyLock::new(init),
        }
    }

    /// Compute the table for `curve.g` with affine additions.
    pub fn generate(curve: &CurveParams) -> Table {
        let mut table = [[AffinePoint::INFINITY; ODD_MULTIPLES]; WINDOWS];
        let mut base = curve.g;

        for row in table.iter_mut() {
            let double = curve.point_double(&base);
            row[0] = base;
            for j in 1..ODD_MULTIPLES {
                row[j] = curve.point_add(&row[j - 1], &double);
            }

            // 15 · base + base = 16 · base
            base = curve.point_add(&row[ODD_MULTIPLES - 1], &base);
        }

        table
    }
}

impl Deref for BasepointTable {
    type Target = Table;

    #[inline]
    fn deref(&self) -> &Table {
        &self.table
    }
}

impl fmt::Debug for BasepointTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasepointTable").finish_non_exhaustive()
    }
}
