//! Lane-for-lane equivalence between the vector backend and the scalar
//! reference, plus the contract properties every backend must satisfy.
//!
//! Strategy:
//! 1. Generate random lane arrays with proptest
//! 2. Run the operation on `I32x4` and on four `ScalarLane<i32>` values
//! 3. Compare lane by lane, and against an `i128` model where one exists

use lowp_fixedpoint::{I32x4, Primitives, RawTraits, ScalarLane};
use proptest::prelude::*;

type L = ScalarLane<i32>;

fn lanes() -> impl Strategy<Value = [i32; 4]> {
    // Bias towards the edges where saturation and rounding bugs live
    let edge = prop_oneof![
        Just(i32::MIN),
        Just(i32::MIN + 1),
        Just(-1),
        Just(0),
        Just(1),
        Just(i32::MAX - 1),
        Just(i32::MAX),
        Just(1 << 30),
        Just(-(1 << 30)),
    ];
    let lane = prop_oneof![3 => any::<i32>(), 1 => edge];
    [lane.clone(), lane.clone(), lane.clone(), lane]
}

fn per_lane(a: [i32; 4], f: impl Fn(L) -> L) -> [i32; 4] {
    a.map(|x| f(ScalarLane(x)).0)
}

fn per_lane2(a: [i32; 4], b: [i32; 4], f: impl Fn(L, L) -> L) -> [i32; 4] {
    core::array::from_fn(|i| f(ScalarLane(a[i]), ScalarLane(b[i])).0)
}

fn v(a: [i32; 4]) -> I32x4 {
    I32x4::from_array(a)
}

/// floor((2ab + 2^31) / 2^32), saturated.
fn model_doubling_high_mul(a: i32, b: i32) -> i32 {
    let r = (2 * a as i128 * b as i128 + (1i128 << 31)) >> 32;
    r.clamp(i32::MIN as i128, i32::MAX as i128) as i32
}

fn model_half_sum(a: i32, b: i32) -> i32 {
    ((a as i128 + b as i128 + 1) >> 1) as i32
}

/// Rounded quotient `x / 2^exponent` with ties toward +inf.
fn model_divide_by_pot(x: i32, exponent: u32) -> i32 {
    if exponent == 0 {
        return x;
    }
    ((x as i128 + (1i128 << (exponent - 1))) >> exponent) as i32
}

type H = ScalarLane<i16>;

fn i16_lane() -> impl Strategy<Value = i16> {
    let edge = prop_oneof![
        Just(i16::MIN),
        Just(i16::MIN + 1),
        Just(-1i16),
        Just(0i16),
        Just(1i16),
        Just(i16::MAX),
        Just(1i16 << 14),
        Just(-(1i16 << 14)),
    ];
    prop_oneof![3 => any::<i16>(), 1 => edge]
}

fn model_mask(condition: bool) -> i16 {
    if condition {
        -1
    } else {
        0
    }
}

fn saturate_i16(x: i64) -> i16 {
    x.clamp(i16::MIN as i64, i16::MAX as i64) as i16
}

proptest! {
    #[test]
    fn wrapping_ops_match_scalar(a in lanes(), b in lanes()) {
        prop_assert_eq!((v(a) + v(b)).to_array(), per_lane2(a, b, |x, y| x + y));
        prop_assert_eq!((v(a) - v(b)).to_array(), per_lane2(a, b, |x, y| x - y));
        prop_assert_eq!((-v(a)).to_array(), per_lane(a, |x| -x));
        prop_assert_eq!((v(a) & v(b)).to_array(), per_lane2(a, b, |x, y| x & y));
        prop_assert_eq!((v(a) | v(b)).to_array(), per_lane2(a, b, |x, y| x | y));
        prop_assert_eq!((v(a) ^ v(b)).to_array(), per_lane2(a, b, |x, y| x ^ y));
        prop_assert_eq!((!v(a)).to_array(), per_lane(a, |x| !x));
    }

    #[test]
    fn masks_match_scalar_and_are_well_formed(a in lanes(), b in lanes()) {
        let cases: [(I32x4, [i32; 4]); 8] = [
            (v(a).mask_eq(v(b)), per_lane2(a, b, L::mask_eq)),
            (v(a).mask_ne(v(b)), per_lane2(a, b, L::mask_ne)),
            (v(a).mask_gt(v(b)), per_lane2(a, b, L::mask_gt)),
            (v(a).mask_ge(v(b)), per_lane2(a, b, L::mask_ge)),
            (v(a).mask_lt(v(b)), per_lane2(a, b, L::mask_lt)),
            (v(a).mask_le(v(b)), per_lane2(a, b, L::mask_le)),
            (v(a).mask_zero(), per_lane(a, L::mask_zero)),
            (v(a).mask_non_zero(), per_lane(a, L::mask_non_zero)),
        ];
        for (vector, scalar) in cases {
            prop_assert_eq!(vector.to_array(), scalar);
            for lane in vector.to_array() {
                prop_assert!(lane == 0 || lane == -1, "partial mask lane {:#x}", lane);
            }
        }
    }

    #[test]
    fn select_takes_then_where_mask_is_set(a in lanes(), b in lanes(), t in lanes(), e in lanes()) {
        let mask = v(a).mask_lt(v(b));
        let got = I32x4::select(mask, v(t), v(e)).to_array();
        for i in 0..4 {
            prop_assert_eq!(got[i], if a[i] < b[i] { t[i] } else { e[i] });
        }
    }

    #[test]
    fn rounding_half_sum_matches_model(a in lanes(), b in lanes()) {
        let got = v(a).rounding_half_sum(v(b)).to_array();
        prop_assert_eq!(got, per_lane2(a, b, L::rounding_half_sum));
        for i in 0..4 {
            prop_assert_eq!(got[i], model_half_sum(a[i], b[i]));
            prop_assert!(got[i] >= a[i].min(b[i]) && got[i] <= a[i].max(b[i]));
        }
    }

    #[test]
    fn doubling_high_mul_matches_model(a in lanes(), b in lanes()) {
        let got = v(a).saturating_rounding_doubling_high_mul(v(b)).to_array();
        prop_assert_eq!(got, per_lane2(a, b, L::saturating_rounding_doubling_high_mul));
        for i in 0..4 {
            prop_assert_eq!(got[i], model_doubling_high_mul(a[i], b[i]));
        }
    }

    #[test]
    fn shifts_match_scalar(a in lanes(), shift in 1u32..32) {
        prop_assert_eq!(
            v(a).saturating_shift_left(shift).to_array(),
            per_lane(a, |x| x.saturating_shift_left(shift))
        );
        prop_assert_eq!(
            v(a).rounding_shift_right(shift).to_array(),
            per_lane(a, |x| x.rounding_shift_right(shift))
        );
        prop_assert_eq!(
            v(a).rounding_divide_by_pot(shift).to_array(),
            per_lane(a, |x| x.rounding_divide_by_pot(shift))
        );
    }

    #[test]
    fn shift_left_saturates_like_wide_arithmetic(a in lanes(), shift in 1u32..32) {
        let got = v(a).saturating_shift_left(shift).to_array();
        for i in 0..4 {
            let wide = (a[i] as i128) << shift;
            prop_assert_eq!(got[i] as i128, wide.clamp(i32::MIN as i128, i32::MAX as i128));
        }
    }

    #[test]
    fn divide_by_pot_matches_model_past_lane_width(a in lanes(), exponent in 0u32..64) {
        let got = v(a).rounding_divide_by_pot(exponent).to_array();
        prop_assert_eq!(got, per_lane(a, |x| x.rounding_divide_by_pot(exponent)));
        for i in 0..4 {
            prop_assert_eq!(got[i], model_divide_by_pot(a[i], exponent));
        }
    }

    #[test]
    fn i16_lane_matches_wide_model(a in i16_lane(), b in i16_lane(), shift in 1u32..16) {
        let (x, y) = (ScalarLane(a), ScalarLane(b));
        let (wa, wb) = (a as i64, b as i64);

        prop_assert_eq!((x + y).0, a.wrapping_add(b));
        prop_assert_eq!((x - y).0, a.wrapping_sub(b));
        prop_assert_eq!((-x).0, a.wrapping_neg());
        prop_assert_eq!((x & y).0, a & b);
        prop_assert_eq!((!x).0, !a);

        prop_assert_eq!(x.mask_eq(y).0, model_mask(a == b));
        prop_assert_eq!(x.mask_ne(y).0, model_mask(a != b));
        prop_assert_eq!(x.mask_gt(y).0, model_mask(a > b));
        prop_assert_eq!(x.mask_ge(y).0, model_mask(a >= b));
        prop_assert_eq!(x.mask_lt(y).0, model_mask(a < b));
        prop_assert_eq!(x.mask_le(y).0, model_mask(a <= b));
        prop_assert_eq!(x.mask_zero().0, model_mask(a == 0));
        prop_assert_eq!(x.mask_non_zero().0, model_mask(a != 0));
        prop_assert_eq!(x.all(), a != 0);
        prop_assert_eq!(x.any(), a != 0);
        prop_assert_eq!(H::select(x.mask_lt(y), y, x).0, a.max(b));

        // Odd sums are the ties; they round up
        prop_assert_eq!(x.rounding_half_sum(y).0, ((wa + wb + 1) >> 1) as i16);
        prop_assert_eq!(
            x.saturating_rounding_doubling_high_mul(y).0,
            saturate_i16((2 * wa * wb + (1 << 15)) >> 16)
        );
        prop_assert_eq!(x.saturating_shift_left(shift).0, saturate_i16(wa << shift));
        prop_assert_eq!(
            x.rounding_shift_right(shift).0,
            ((wa + (1i64 << (shift - 1))) >> shift) as i16
        );
        prop_assert_eq!(x.rounding_divide_by_pot(shift + 15).0, 0);
    }

    #[test]
    fn pot_round_trip(a in lanes(), shift in 1u32..31) {
        let up = v(a).saturating_shift_left(shift).rounding_shift_right(shift).to_array();
        let down = v(a).rounding_shift_right(shift).saturating_shift_left(shift).to_array();
        for i in 0..4 {
            if a[i] >= i32::MIN >> shift && a[i] <= i32::MAX >> shift {
                prop_assert_eq!(up[i], a[i]);
            }
            let unsaturated = down[i] != i32::MIN && down[i] != i32::MAX;
            if unsaturated {
                prop_assert!((down[i] as i64 - a[i] as i64).abs() <= 1i64 << (shift - 1));
            }
        }
    }

    #[test]
    fn all_and_any_reduce_masks(flags in proptest::array::uniform4(any::<bool>())) {
        let mask = I32x4::from_array(flags.map(|f| if f { -1 } else { 0 }));
        prop_assert_eq!(mask.all(), flags.iter().all(|&f| f));
        prop_assert_eq!(mask.any(), flags.iter().any(|&f| f));
    }

    #[test]
    fn load_store_lane_agree(a in lanes()) {
        let x = I32x4::load(&a);
        let mut out = [0i32; 4];
        x.store(&mut out);
        prop_assert_eq!(out, a);
        for (i, &lane) in a.iter().enumerate() {
            prop_assert_eq!(x.lane(i), lane);
        }
    }
}

#[test]
fn descriptors() {
    assert_eq!(<I32x4 as RawTraits>::LANES, 4);
    assert_eq!(<L as RawTraits>::LANES, 1);
    assert_eq!(<H as RawTraits>::LANES, 1);
}

#[test]
fn zero_mask_reduces_to_false() {
    assert!(!I32x4::zero().all());
    assert!(!I32x4::zero().any());
    assert!(!ScalarLane::<i32>(0).all());
    assert!(!ScalarLane::<i32>(0).any());
    assert!(ScalarLane::<i32>(-1).all());
}

#[test]
fn i16_shift_left_below_saturation_is_exact() {
    for shift in 1..15 {
        let limit = i16::MAX >> shift;
        for a in [-limit - 1, -limit, -1, 0, 1, limit] {
            let got = ScalarLane::<i16>(a).saturating_shift_left(shift).0;
            assert_eq!(got as i64, (a as i64) << shift, "{a} << {shift}");
        }
    }
}

#[test]
fn i16_rounding_ties_go_up() {
    assert_eq!(ScalarLane::<i16>(-3).rounding_half_sum(ScalarLane(0)).0, -1);
    assert_eq!(ScalarLane::<i16>(3).rounding_half_sum(ScalarLane(0)).0, 2);
    assert_eq!(ScalarLane::<i16>(-6).rounding_shift_right(2).0, -1);
    assert_eq!(ScalarLane::<i16>(6).rounding_shift_right(2).0, 2);
    let min = ScalarLane::<i16>(i16::MIN);
    assert_eq!(min.saturating_rounding_doubling_high_mul(min).0, i16::MAX);
}

#[test]
fn divide_by_pot_agrees_across_backends_for_any_exponent() {
    let a = [i32::MIN, -(1 << 30) - 1, i32::MAX, -1];
    for exponent in [31, 32, 33, 40, u32::MAX] {
        let got = v(a).rounding_divide_by_pot(exponent).to_array();
        assert_eq!(got, per_lane(a, |x| x.rounding_divide_by_pot(exponent)), "exponent {exponent}");
    }
    assert_eq!(v(a).rounding_divide_by_pot(40).to_array(), [0; 4]);
    assert_eq!(v(a).rounding_divide_by_pot(31).to_array(), [-1, -1, 1, 0]);
}

#[test]
fn doubling_high_mul_boundaries() {
    let min = I32x4::dup(i32::MIN);
    assert_eq!(min.saturating_rounding_doubling_high_mul(min).to_array(), [i32::MAX; 4]);
    let max = I32x4::dup(i32::MAX);
    assert_eq!(
        min.saturating_rounding_doubling_high_mul(max).to_array(),
        [-i32::MAX; 4]
    );
    let one = I32x4::dup(1);
    assert_eq!(one.saturating_rounding_doubling_high_mul(one).to_array(), [0; 4]);
}

#[test]
fn dup_compare_select_end_to_end() {
    let five = I32x4::dup(5);
    let mask = five.mask_eq(I32x4::from_array([5, 3, 5, 9]));
    assert_eq!(mask.to_array(), [-1, 0, -1, 0]);
    let picked = I32x4::select(mask, I32x4::dup(1), I32x4::dup(0));
    assert_eq!(picked.to_array(), [1, 0, 1, 0]);
}
