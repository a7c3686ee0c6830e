//! The primitive operation contract.
//!
//! Each method maps to one instruction or a short fixed sequence on a SIMD
//! backend. Fixed-point arithmetic and the transcendental kernels in
//! [`compounds`](crate::compounds) are written only in terms of this trait,
//! so a new backend gets all of them by implementing it.
//!
//! # Rounding
//!
//! Every rounding operation rounds to nearest with ties toward positive
//! infinity. This is what `vrhadd`, `vqrdmulh` and `vrshr` do on NEON, and
//! the scalar reference backend is written to the same rule.

use super::{Element, RawTraits};
use core::ops::{Add, BitAnd, BitOr, BitXor, Neg, Not, Sub};

/// Operations every raw value type provides.
///
/// Arithmetic through `Add`, `Sub` and `Neg` is plain two's-complement
/// wraparound. Saturation is only ever provided by the dedicated methods.
///
/// A *mask* is a raw value whose lanes are each all-1 (true) or all-0
/// (false). Only the `mask_*` methods produce masks.
pub trait Primitives:
    RawTraits
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
{
    // =========================================================================
    // Broadcast / Lanes
    // =========================================================================

    /// Broadcasts a scalar to every lane.
    /// ARM: `vdupq_n_s32`, x86: `_mm_set1_epi32`
    fn dup(x: Self::Scalar) -> Self;

    /// Loads `LANES` scalars from the front of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` is shorter than `LANES`.
    fn load(slice: &[Self::Scalar]) -> Self;

    /// Stores all lanes to the front of `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than `LANES`.
    fn store(self, out: &mut [Self::Scalar]);

    /// Reads a single lane.
    ///
    /// # Panics
    ///
    /// Panics if `index >= LANES`.
    fn lane(self, index: usize) -> Self::Scalar;

    /// All lanes zero.
    #[inline(always)]
    fn zero() -> Self {
        Self::dup(<Self::Scalar as Element>::ZERO)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Per lane: `then_val` where `mask` is all-1, `else_val` where it is all-0.
    #[inline(always)]
    fn select(mask: Self, then_val: Self, else_val: Self) -> Self {
        (mask & then_val) | (!mask & else_val)
    }

    // =========================================================================
    // Comparisons (signed, return masks)
    // =========================================================================

    /// `self == rhs`.
    fn mask_eq(self, rhs: Self) -> Self;

    /// `self != rhs`.
    #[inline(always)]
    fn mask_ne(self, rhs: Self) -> Self {
        !self.mask_eq(rhs)
    }

    /// `self > rhs`.
    fn mask_gt(self, rhs: Self) -> Self;

    /// `self >= rhs`.
    fn mask_ge(self, rhs: Self) -> Self;

    /// `self < rhs`.
    fn mask_lt(self, rhs: Self) -> Self;

    /// `self <= rhs`.
    fn mask_le(self, rhs: Self) -> Self;

    /// `self == 0`.
    #[inline(always)]
    fn mask_zero(self) -> Self {
        self.mask_eq(Self::zero())
    }

    /// `self != 0`.
    #[inline(always)]
    fn mask_non_zero(self) -> Self {
        !self.mask_zero()
    }

    // =========================================================================
    // Reductions
    // =========================================================================

    /// Every lane is non-zero.
    fn all(self) -> bool;

    /// At least one lane is non-zero.
    fn any(self) -> bool;

    // =========================================================================
    // Fixed-point arithmetic
    // =========================================================================

    /// `(self + rhs) / 2`, rounded, computed without intermediate overflow.
    /// ARM: `vrhaddq_s32`
    fn rounding_half_sum(self, rhs: Self) -> Self;

    /// The rounded high half of `2 * self * rhs`.
    ///
    /// `MIN * MIN` is the only product that does not fit; it saturates to
    /// `MAX`.
    /// ARM: `vqrdmulhq_s32`
    fn saturating_rounding_doubling_high_mul(self, rhs: Self) -> Self;

    /// `self * 2^shift`, clamped to `[MIN, MAX]`.
    ///
    /// `shift` must lie in `1..BITS`.
    /// ARM: `vqshlq_s32`
    fn saturating_shift_left(self, shift: u32) -> Self;

    /// `self / 2^shift`, rounded to nearest.
    ///
    /// `shift` must lie in `1..BITS`.
    /// ARM: `vrshlq_s32` with a negated count
    fn rounding_shift_right(self, shift: u32) -> Self;

    /// `self * 2^EXPONENT`: a saturating left shift for positive exponents and
    /// a rounding right shift for negative ones.
    ///
    /// `EXPONENT == 0` and `|EXPONENT| >= BITS` fail to build.
    #[inline(always)]
    fn saturating_rounding_mul_by_pot<const EXPONENT: i32>(self) -> Self {
        const {
            assert!(EXPONENT != 0, "multiply-by-POT needs a non-zero exponent");
            assert!(
                EXPONENT.unsigned_abs() < <Self::Scalar as Element>::BITS,
                "multiply-by-POT exponent exceeds the lane width"
            );
        }
        if EXPONENT > 0 {
            self.saturating_shift_left(EXPONENT as u32)
        } else {
            self.rounding_shift_right(EXPONENT.unsigned_abs())
        }
    }

    /// `self / 2^exponent`, rounded to nearest, for an exponent known only at
    /// run time. An exponent of 0 returns `self`.
    ///
    /// For `exponent >= BITS` the quotient lies in `[-1/2, 1/2)` and rounds to
    /// 0 on every backend.
    #[inline(always)]
    fn rounding_divide_by_pot(self, exponent: u32) -> Self {
        if exponent == 0 {
            self
        } else if exponent >= <Self::Scalar as Element>::BITS {
            Self::zero()
        } else {
            self.rounding_shift_right(exponent)
        }
    }
}

/// `x * 2^exponent` for an exponent derived from const generics, where zero is
/// a legitimate value (e.g. rescaling between equal formats).
#[inline(always)]
pub(crate) fn mul_by_pot_or_identity<R: Primitives>(x: R, exponent: i32) -> R {
    if exponent > 0 {
        x.saturating_shift_left(exponent as u32)
    } else if exponent < 0 {
        x.rounding_shift_right(exponent.unsigned_abs())
    } else {
        x
    }
}
