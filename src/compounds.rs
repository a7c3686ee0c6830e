//! Transcendental functions built from fixed-point operations.
//!
//! Every kernel here is a fixed sequence of [`FixedPoint`] operations: no
//! branches on values, range reduction through masks and `select`. They
//! therefore produce identical results on every backend, lane for lane.
//!
//! The kernels are written for 32-bit lanes; their constants are raw Q0.31
//! and Q2.29 encodings.

use crate::backend::primitives::mul_by_pot_or_identity;
use crate::backend::Primitives;
use crate::fixed::FixedPoint;

type F0<R> = FixedPoint<R, 0>;
type F2<R> = FixedPoint<R, 2>;

/// exp(-1/8) in Q0.31.
const EXP_MINUS_ONE_EIGHTH: i32 = 1895147668;
/// 1/3 in Q0.31.
const ONE_THIRD: i32 = 715827883;
/// 48/17 in Q2.29.
const FORTY_EIGHT_OVER_SEVENTEEN: i32 = 1515870810;
/// -32/17 in Q2.29.
const NEG_THIRTY_TWO_OVER_SEVENTEEN: i32 = -1010580540;

/// `(k, exp(-2^k))` in Q0.31, applied once per set bit of the reduced input.
const EXP_BARREL_SHIFTER: [(i32, i32); 7] = [
    (-2, 1672461947),
    (-1, 1302514674),
    (0, 790015084),
    (1, 290630308),
    (2, 39332535),
    (3, 720401),
    (4, 242),
];

// ============================================================================
// Exponential
// ============================================================================

/// `exp(a)` for `a` in `[-1/4, 0)`.
///
/// Fourth order Taylor expansion around -1/8.
#[inline(always)]
pub fn exp_on_interval_between_negative_one_quarter_and_0_excl<R>(a: F0<R>) -> F0<R>
where
    R: Primitives<Scalar = i32>,
{
    let constant_term = F0::<R>::from_scalar_raw(EXP_MINUS_ONE_EIGHTH);
    let constant_1_over_3 = F0::<R>::from_scalar_raw(ONE_THIRD);

    let x = a + F0::<R>::constant_pot::<-3>();
    let x2 = x * x;
    let x3 = x2 * x;
    let x4 = x2 * x2;
    let x4_over_4 = x4.saturating_rounding_mul_by_pot::<-2>();
    let x4_over_24_plus_x3_over_6_plus_x2_over_2 =
        (((x4_over_4 + x3) * constant_1_over_3) + x2).saturating_rounding_mul_by_pot::<-1>();
    constant_term + constant_term * (x + x4_over_24_plus_x3_over_6_plus_x2_over_2)
}

/// `exp(a)` for `a <= 0`.
///
/// The input is split into a remainder in `[-1/4, 0)`, handled by
/// [`exp_on_interval_between_negative_one_quarter_and_0_excl`], and a
/// multiple of 1/4 whose bits select factors of `exp(-2^k)`. Results below
/// `exp(-32)` are 0 and `exp(0)` is exactly [`FixedPoint::one`].
#[inline(always)]
pub fn exp_on_negative_values<R, const I: u32>(a: FixedPoint<R, I>) -> F0<R>
where
    R: Primitives<Scalar = i32>,
{
    const {
        assert!(I <= 29, "exp needs two fractional bits for the quarter reduction");
    }
    exp_on_negative_raw(a.raw(), I)
}

// Shared by tanh, which feeds in a doubled value one integer bit wider than
// anything it can name as a type.
#[inline(always)]
fn exp_on_negative_raw<R>(a: R, integer_bits: u32) -> F0<R>
where
    R: Primitives<Scalar = i32>,
{
    debug_assert!(integer_bits <= 29);
    let fractional_bits = 31 - integer_bits;

    let one_quarter = R::dup(1 << (fractional_bits - 2));
    let mask = one_quarter - R::dup(1);
    let a_mod_quarter_minus_one_quarter = (a & mask) - one_quarter;
    let reduced = mul_by_pot_or_identity(a_mod_quarter_minus_one_quarter, integer_bits as i32);
    let mut result =
        exp_on_interval_between_negative_one_quarter_and_0_excl(F0::<R>::from_raw(reduced));
    let remainder = a_mod_quarter_minus_one_quarter - a;

    for &(exponent, multiplier) in EXP_BARREL_SHIFTER.iter() {
        if integer_bits as i32 > exponent {
            let bit = R::dup(1 << (fractional_bits as i32 + exponent));
            result = F0::<R>::select(
                (remainder & bit).mask_non_zero(),
                result * F0::<R>::from_scalar_raw(multiplier),
                result,
            );
        }
    }

    if integer_bits > 5 {
        // -32 in the input format
        let clamp = R::dup(-(1 << (36 - integer_bits)));
        result = F0::<R>::select(a.mask_lt(clamp), F0::<R>::zero(), result);
    }

    F0::<R>::select(a.mask_zero(), F0::<R>::one(), result)
}

// ============================================================================
// Rational functions on (0, 1)
// ============================================================================

/// `2 / (1 + a)` by Newton-Raphson division.
#[inline(always)]
fn reciprocal_of_half_denominator<R>(a: F0<R>) -> F2<R>
where
    R: Primitives<Scalar = i32>,
{
    let half_denominator = a.rounding_half_sum(F0::<R>::one());
    let constant_48_over_17 = F2::<R>::from_scalar_raw(FORTY_EIGHT_OVER_SEVENTEEN);
    let constant_neg_32_over_17 = F2::<R>::from_scalar_raw(NEG_THIRTY_TWO_OVER_SEVENTEEN);

    let mut x = constant_48_over_17 + half_denominator * constant_neg_32_over_17;
    for _ in 0..3 {
        let half_denominator_times_x = half_denominator * x;
        let one_minus_half_denominator_times_x = F2::<R>::one() - half_denominator_times_x;
        x = x + (x * one_minus_half_denominator_times_x).rescale::<2>();
    }
    x
}

/// `(1 - a) / (1 + a)` for `a` in `[0, 1)`.
#[inline(always)]
pub fn one_minus_x_over_one_plus_x_for_x_in_0_1<R>(a: F0<R>) -> F0<R>
where
    R: Primitives<Scalar = i32>,
{
    (reciprocal_of_half_denominator(a) - F2::<R>::one()).rescale::<0>()
}

/// `1 / (1 + a)` for `a` in `[0, 1)`.
#[inline(always)]
pub fn one_over_one_plus_x_for_x_in_0_1<R>(a: F0<R>) -> F0<R>
where
    R: Primitives<Scalar = i32>,
{
    reciprocal_of_half_denominator(a).exact_mul_by_pot::<1>().rescale::<0>()
}

// ============================================================================
// Activations
// ============================================================================

/// Hyperbolic tangent, as `(1 - exp(-2|a|)) / (1 + exp(-2|a|))` with the sign
/// of `a` restored. `tanh(0)` is exactly 0.
#[inline(always)]
pub fn tanh<R, const I: u32>(a: FixedPoint<R, I>) -> F0<R>
where
    R: Primitives<Scalar = i32>,
{
    const {
        assert!(I <= 28, "tanh doubles its input and needs one spare integer bit");
    }
    let mask_if_negative = a.mask_lt(FixedPoint::zero());
    let mask_if_zero = a.mask_zero();
    let n = FixedPoint::select(mask_if_negative, a, -a);
    // n * 2 read with one more integer bit
    let t = one_minus_x_over_one_plus_x_for_x_in_0_1(exp_on_negative_raw(n.raw(), I + 1));
    F0::<R>::select(mask_if_zero, F0::<R>::zero(), F0::<R>::select(mask_if_negative, -t, t))
}

/// Logistic function `1 / (1 + exp(-a))`. `logistic(0)` is exactly 1/2.
#[inline(always)]
pub fn logistic<R, const I: u32>(a: FixedPoint<R, I>) -> F0<R>
where
    R: Primitives<Scalar = i32>,
{
    let mask_if_positive = a.mask_gt(FixedPoint::zero());
    let mask_if_zero = a.mask_zero();
    let abs_input = FixedPoint::select(mask_if_positive, a, -a);
    let result_if_positive = one_over_one_plus_x_for_x_in_0_1(exp_on_negative_values(-abs_input));
    let result_if_negative = F0::<R>::one() - result_if_positive;
    F0::<R>::select(
        mask_if_zero,
        F0::<R>::constant_pot::<-1>(),
        F0::<R>::select(mask_if_positive, result_if_positive, result_if_negative),
    )
}

// ============================================================================
// Method syntax
// ============================================================================

/// The activation kernels as methods on [`FixedPoint`].
///
/// Blanket-implemented for every 32-bit-lane fixed-point format.
pub trait FixedPointCompounds<R: Primitives<Scalar = i32>>: Sized {
    /// See [`exp_on_negative_values`].
    fn exp_on_negative_values(self) -> F0<R>;
    /// See [`tanh`].
    fn tanh(self) -> F0<R>;
    /// See [`logistic`].
    fn logistic(self) -> F0<R>;
}

impl<R, const I: u32> FixedPointCompounds<R> for FixedPoint<R, I>
where
    R: Primitives<Scalar = i32>,
{
    #[inline(always)]
    fn exp_on_negative_values(self) -> F0<R> {
        exp_on_negative_values(self)
    }

    #[inline(always)]
    fn tanh(self) -> F0<R> {
        tanh(self)
    }

    #[inline(always)]
    fn logistic(self) -> F0<R> {
        logistic(self)
    }
}
