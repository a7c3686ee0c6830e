//! Signed fixed-point values over any raw backend type.
//!
//! A [`FixedPoint<R, I>`] holds a raw value `R` and interprets each lane as
//! `raw / 2^(BITS - 1 - I)`: `I` integer bits, one sign bit, and the rest
//! fractional. All arithmetic goes through [`Primitives`], so the same code
//! runs on one lane or on a full SIMD register.

use crate::backend::primitives::mul_by_pot_or_identity;
use crate::backend::{Element, Primitives};
use crate::error::FixedPointError;
use core::ops::{Add, BitAnd, BitOr, BitXor, Mul, Neg, Not, Sub};

/// A fixed-point number (or one per lane) with `INTEGER_BITS` integer bits.
#[derive(Copy, Clone, Debug, Default)]
#[repr(transparent)]
pub struct FixedPoint<R, const INTEGER_BITS: u32> {
    raw: R,
}

impl<R: Primitives, const I: u32> FixedPoint<R, I> {
    /// Integer bits, excluding the sign bit.
    pub const INTEGER_BITS: u32 = I;

    /// Width of a lane.
    pub const TOTAL_BITS: u32 = <R::Scalar as Element>::BITS;

    /// Bits to the right of the binary point.
    pub const FRACTIONAL_BITS: u32 = Self::TOTAL_BITS - 1 - I;

    // =========================================================================
    // Construction
    // =========================================================================

    /// Wraps a raw value.
    #[inline(always)]
    pub fn from_raw(raw: R) -> Self {
        const {
            assert!(
                I < <R::Scalar as Element>::BITS,
                "integer bits must leave room for the sign bit"
            );
        }
        Self { raw }
    }

    /// Broadcasts a raw scalar to every lane.
    #[inline(always)]
    pub fn from_scalar_raw(x: R::Scalar) -> Self {
        Self::from_raw(R::dup(x))
    }

    /// The underlying raw value.
    #[inline(always)]
    pub fn raw(self) -> R {
        self.raw
    }

    /// 0.
    #[inline(always)]
    pub fn zero() -> Self {
        Self::from_raw(R::zero())
    }

    /// 1, or the largest representable value when there are no integer bits.
    #[inline(always)]
    pub fn one() -> Self {
        if I == 0 {
            Self::from_scalar_raw(<R::Scalar as Element>::MAX)
        } else {
            Self::from_scalar_raw(<R::Scalar as Element>::saturating_from_i64(
                1i64 << Self::FRACTIONAL_BITS,
            ))
        }
    }

    /// `2^EXPONENT`, which must be exactly representable in this format.
    #[inline(always)]
    pub fn constant_pot<const EXPONENT: i32>() -> Self {
        const {
            let offset = Self::FRACTIONAL_BITS as i32 + EXPONENT;
            assert!(
                offset >= 0 && offset < Self::TOTAL_BITS as i32 - 1,
                "constant is not exactly representable in this fixed-point format"
            );
        }
        let offset = (Self::FRACTIONAL_BITS as i32 + EXPONENT) as u32;
        Self::from_scalar_raw(<R::Scalar as Element>::saturating_from_i64(1i64 << offset))
    }

    #[inline(always)]
    fn scale() -> f64 {
        (1u64 << Self::FRACTIONAL_BITS) as f64
    }

    /// Converts a real number, rounding to nearest.
    ///
    /// # Errors
    ///
    /// [`FixedPointError::NotFinite`] for NaN and infinities,
    /// [`FixedPointError::OutOfRange`] when the rounded value does not fit.
    pub fn try_from_f64(value: f64) -> Result<Self, FixedPointError> {
        if !value.is_finite() {
            return Err(FixedPointError::NotFinite(value));
        }
        let scaled = libm::round(value * Self::scale());
        let min = <R::Scalar as Element>::MIN.to_i64() as f64;
        let max = <R::Scalar as Element>::MAX.to_i64() as f64;
        if scaled < min || scaled > max {
            return Err(FixedPointError::OutOfRange {
                value,
                min: min / Self::scale(),
                max: max / Self::scale(),
            });
        }
        Ok(Self::from_scalar_raw(
            <R::Scalar as Element>::saturating_from_i64(scaled as i64),
        ))
    }

    /// Converts a real number, rounding to nearest and saturating at the ends
    /// of the range. NaN converts to 0.
    pub fn from_f64(value: f64) -> Self {
        match Self::try_from_f64(value) {
            Ok(x) => x,
            Err(err @ FixedPointError::NotFinite(_)) => {
                log::trace!("{}; converting to a saturated value", err);
                Self::saturated(value)
            }
            Err(err) => {
                log::warn!(
                    "saturating conversion to Q{}.{}: {}",
                    I,
                    Self::FRACTIONAL_BITS,
                    err
                );
                Self::saturated(value)
            }
        }
    }

    fn saturated(value: f64) -> Self {
        let raw = if value.is_nan() {
            <R::Scalar as Element>::ZERO
        } else if value > 0.0 {
            <R::Scalar as Element>::MAX
        } else {
            <R::Scalar as Element>::MIN
        };
        Self::from_scalar_raw(raw)
    }

    /// Builds a constant from its raw encoding, checking it against the real
    /// value it is meant to represent.
    ///
    /// # Errors
    ///
    /// [`FixedPointError::ConstantMismatch`] when `raw` is not the nearest
    /// encoding of `expected`, or any error of [`try_from_f64`](Self::try_from_f64).
    pub fn checked_constant(raw: R::Scalar, expected: f64) -> Result<Self, FixedPointError> {
        let nearest = Self::try_from_f64(expected)?.raw.lane(0);
        if nearest != raw {
            return Err(FixedPointError::ConstantMismatch {
                raw: raw.to_i64(),
                expected,
                nearest: nearest.to_i64(),
            });
        }
        Ok(Self::from_scalar_raw(raw))
    }

    /// The real value held in one lane.
    pub fn to_f64_lane(self, index: usize) -> f64 {
        self.raw.lane(index).to_i64() as f64 / Self::scale()
    }

    // =========================================================================
    // Format changes
    // =========================================================================

    /// Same value in a format with `DST` integer bits, rounding when bits are
    /// dropped on the right and saturating when they are dropped on the left.
    #[inline(always)]
    pub fn rescale<const DST: u32>(self) -> FixedPoint<R, DST> {
        FixedPoint::from_raw(mul_by_pot_or_identity(self.raw, I as i32 - DST as i32))
    }

    /// Reinterprets the raw value with `DST` integer bits, multiplying the
    /// represented value by `2^(DST - I)` exactly.
    #[inline(always)]
    pub fn exact_mul_by_pot<const DST: u32>(self) -> FixedPoint<R, DST> {
        FixedPoint::from_raw(self.raw)
    }

    // =========================================================================
    // Arithmetic
    // =========================================================================

    /// Product of two formats. The result has `I + J` integer bits, which the
    /// caller names as `K`.
    #[inline(always)]
    pub fn fixed_mul<const J: u32, const K: u32>(self, rhs: FixedPoint<R, J>) -> FixedPoint<R, K> {
        const {
            assert!(K == I + J, "product must have the sum of the operand integer bits");
        }
        FixedPoint::from_raw(self.raw.saturating_rounding_doubling_high_mul(rhs.raw))
    }

    /// `self * 2^EXPONENT` in the same format, saturating or rounding.
    #[inline(always)]
    pub fn saturating_rounding_mul_by_pot<const EXPONENT: i32>(self) -> Self {
        Self::from_raw(self.raw.saturating_rounding_mul_by_pot::<EXPONENT>())
    }

    /// `self / 2^exponent`, rounded, for a run-time exponent.
    #[inline(always)]
    pub fn rounding_divide_by_pot(self, exponent: u32) -> Self {
        Self::from_raw(self.raw.rounding_divide_by_pot(exponent))
    }

    /// [`rounding_divide_by_pot`](Self::rounding_divide_by_pot) with the
    /// exponent validated first.
    ///
    /// # Errors
    ///
    /// [`FixedPointError::ExponentOutOfRange`] unless `0 <= exponent < BITS`.
    pub fn try_rounding_divide_by_pot(self, exponent: i32) -> Result<Self, FixedPointError> {
        if exponent < 0 || exponent as u32 >= Self::TOTAL_BITS {
            return Err(FixedPointError::ExponentOutOfRange {
                exponent,
                bits: Self::TOTAL_BITS,
            });
        }
        Ok(self.rounding_divide_by_pot(exponent as u32))
    }

    /// `(self + rhs) / 2`, rounded, without overflow.
    #[inline(always)]
    pub fn rounding_half_sum(self, rhs: Self) -> Self {
        Self::from_raw(self.raw.rounding_half_sum(rhs.raw))
    }

    // =========================================================================
    // Comparisons and selection
    // =========================================================================

    /// Per-lane `self == rhs` mask.
    #[inline(always)]
    pub fn mask_eq(self, rhs: Self) -> R {
        self.raw.mask_eq(rhs.raw)
    }

    /// Per-lane `self != rhs` mask.
    #[inline(always)]
    pub fn mask_ne(self, rhs: Self) -> R {
        self.raw.mask_ne(rhs.raw)
    }

    /// Per-lane `self > rhs` mask.
    #[inline(always)]
    pub fn mask_gt(self, rhs: Self) -> R {
        self.raw.mask_gt(rhs.raw)
    }

    /// Per-lane `self >= rhs` mask.
    #[inline(always)]
    pub fn mask_ge(self, rhs: Self) -> R {
        self.raw.mask_ge(rhs.raw)
    }

    /// Per-lane `self < rhs` mask.
    #[inline(always)]
    pub fn mask_lt(self, rhs: Self) -> R {
        self.raw.mask_lt(rhs.raw)
    }

    /// Per-lane `self <= rhs` mask.
    #[inline(always)]
    pub fn mask_le(self, rhs: Self) -> R {
        self.raw.mask_le(rhs.raw)
    }

    /// Per-lane `self == 0` mask.
    #[inline(always)]
    pub fn mask_zero(self) -> R {
        self.raw.mask_zero()
    }

    /// Per-lane `self != 0` mask.
    #[inline(always)]
    pub fn mask_non_zero(self) -> R {
        self.raw.mask_non_zero()
    }

    /// Per lane: `then_val` where `mask` is set, `else_val` elsewhere.
    #[inline(always)]
    pub fn select(mask: R, then_val: Self, else_val: Self) -> Self {
        Self::from_raw(R::select(mask, then_val.raw, else_val.raw))
    }
}

// ============================================================================
// Operator Implementations
// ============================================================================

// +, - and unary - wrap, exactly like the raw operations they forward to
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident) => {
        impl<R: Primitives, const I: u32> $trait for FixedPoint<R, I> {
            type Output = Self;
            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                Self::from_raw(self.raw.$method(rhs.raw))
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(BitAnd, bitand);
impl_binary_op!(BitOr, bitor);
impl_binary_op!(BitXor, bitxor);

impl<R: Primitives, const I: u32> Neg for FixedPoint<R, I> {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self::from_raw(-self.raw)
    }
}

impl<R: Primitives, const I: u32> Not for FixedPoint<R, I> {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        Self::from_raw(!self.raw)
    }
}

/// Multiplying by a value with no integer bits keeps the left operand's format.
/// Other combinations go through [`FixedPoint::fixed_mul`].
impl<R: Primitives, const I: u32> Mul<FixedPoint<R, 0>> for FixedPoint<R, I> {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: FixedPoint<R, 0>) -> Self {
        self.fixed_mul::<0, I>(rhs)
    }
}

// The sum of two const generics cannot be named in a type, so the formats
// with a 2-integer-bit right operand that the rational kernels use are listed.
macro_rules! impl_mul_two_integer_bits {
    ($(($lhs:literal, $out:literal)),* $(,)?) => {
        $(
            impl<R: Primitives> Mul<FixedPoint<R, 2>> for FixedPoint<R, $lhs> {
                type Output = FixedPoint<R, $out>;
                #[inline(always)]
                fn mul(self, rhs: FixedPoint<R, 2>) -> FixedPoint<R, $out> {
                    self.fixed_mul::<2, $out>(rhs)
                }
            }
        )*
    };
}

impl_mul_two_integer_bits!((0, 2), (1, 3), (2, 4), (3, 5), (4, 6));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ScalarLane;

    type F0 = FixedPoint<ScalarLane<i32>, 0>;
    type F2 = FixedPoint<ScalarLane<i32>, 2>;
    type F4 = FixedPoint<ScalarLane<i32>, 4>;

    #[test]
    fn formats() {
        assert_eq!(F0::FRACTIONAL_BITS, 31);
        assert_eq!(F2::FRACTIONAL_BITS, 29);
        assert_eq!(F2::TOTAL_BITS, 32);
        assert_eq!(FixedPoint::<ScalarLane<i16>, 3>::FRACTIONAL_BITS, 12);
    }

    #[test]
    fn one_and_constants() {
        assert_eq!(F0::one().raw(), ScalarLane(i32::MAX));
        assert_eq!(F2::one().raw(), ScalarLane(1 << 29));
        assert_eq!(F0::constant_pot::<-3>().raw(), ScalarLane(1 << 28));
        assert_eq!(F2::constant_pot::<1>().to_f64_lane(0), 2.0);
    }

    #[test]
    fn real_conversion_rounds_and_saturates() {
        assert_eq!(F2::from_f64(1.5).raw(), ScalarLane(3 << 28));
        assert_eq!(F0::from_f64(0.5).raw(), ScalarLane(1 << 30));
        assert_eq!(F0::from_f64(1.0).raw(), ScalarLane(i32::MAX));
        assert_eq!(F0::from_f64(-1.0).raw(), ScalarLane(i32::MIN));
        assert_eq!(F0::from_f64(f64::NAN).raw(), ScalarLane(0));
        assert!(matches!(
            F2::try_from_f64(4.0),
            Err(FixedPointError::OutOfRange { .. })
        ));
        assert!(F2::try_from_f64(-4.0).is_ok());
        assert_eq!(
            F0::try_from_f64(f64::INFINITY).unwrap_err(),
            FixedPointError::NotFinite(f64::INFINITY)
        );
    }

    #[test]
    fn checked_constant_requires_nearest_encoding() {
        assert!(F0::checked_constant(715827883, 1.0 / 3.0).is_ok());
        assert!(matches!(
            F0::checked_constant(715827882, 1.0 / 3.0),
            Err(FixedPointError::ConstantMismatch { nearest: 715827883, .. })
        ));
    }

    #[test]
    fn products_add_integer_bits() {
        let a = F2::from_f64(1.5);
        let b = F2::from_f64(-2.25);
        let p: F4 = a.fixed_mul(b);
        assert_eq!(p.to_f64_lane(0), -3.375);

        let half = F0::from_f64(0.5);
        assert_eq!((a * half).to_f64_lane(0), 0.75);
    }

    #[test]
    fn operator_with_two_integer_bits_matches_fixed_mul() {
        let a = F2::from_f64(1.5);
        let b = F2::from_f64(-2.25);
        let p: F4 = a * b;
        assert_eq!(p.raw(), a.fixed_mul::<2, 4>(b).raw());
        assert_eq!(p.to_f64_lane(0), -3.375);

        let half = F0::from_f64(0.5);
        let q: F2 = half * b;
        assert_eq!(q.to_f64_lane(0), -1.125);
        assert_eq!(q.raw(), half.fixed_mul::<2, 2>(b).raw());

        let c = FixedPoint::<ScalarLane<i32>, 3>::from_f64(-4.0);
        let r: FixedPoint<ScalarLane<i32>, 5> = c * a;
        assert_eq!(r.to_f64_lane(0), -6.0);
    }

    #[test]
    fn rescale_rounds_and_saturates() {
        let x = F4::from_f64(3.0);
        assert_eq!(x.rescale::<2>().to_f64_lane(0), 3.0);
        assert_eq!(x.rescale::<1>().raw(), ScalarLane(i32::MAX));
        assert_eq!(x.rescale::<4>().raw(), x.raw());

        let tiny = F0::from_raw(ScalarLane(3));
        assert_eq!(tiny.rescale::<2>().raw(), ScalarLane(1));
        assert_eq!(tiny.exact_mul_by_pot::<1>().to_f64_lane(0), 3.0 / (1u64 << 30) as f64);
    }

    #[test]
    fn divide_by_pot_validates_exponent() {
        let x = F0::from_f64(0.5);
        assert_eq!(x.try_rounding_divide_by_pot(2).unwrap().to_f64_lane(0), 0.125);
        assert_eq!(x.try_rounding_divide_by_pot(0).unwrap().raw(), x.raw());
        assert_eq!(
            x.try_rounding_divide_by_pot(32).unwrap_err(),
            FixedPointError::ExponentOutOfRange { exponent: 32, bits: 32 }
        );
        assert!(x.try_rounding_divide_by_pot(-1).is_err());
    }

    #[test]
    fn divide_by_pot_past_lane_width_rounds_to_zero() {
        for raw in [i32::MIN, -(1 << 30) - 1, -1, 1, i32::MAX] {
            let x = F0::from_raw(ScalarLane(raw));
            for exponent in [32, 33, 40, u32::MAX] {
                assert_eq!(x.rounding_divide_by_pot(exponent).raw(), ScalarLane(0));
            }
        }
        let min = F0::from_raw(ScalarLane(i32::MIN));
        assert_eq!(min.rounding_divide_by_pot(31).raw(), ScalarLane(-1));
    }

    #[test]
    fn select_by_comparison() {
        let a = F2::from_f64(1.0);
        let b = F2::from_f64(-1.0);
        assert_eq!(F2::select(a.mask_gt(b), a, b).raw(), a.raw());
        assert_eq!(F2::select(a.mask_lt(b), a, b).raw(), b.raw());
        assert_eq!(F2::zero().mask_zero(), ScalarLane(-1));
    }
}
