//! Portable `I32x4` (plain array, 4 lanes).
//!
//! Used on targets without a SIMD lowering and when the `force-portable`
//! feature is enabled. Every operation applies the scalar reference backend to
//! each lane, which the compiler is free to auto-vectorize.

use super::{Primitives, RawTraits, ScalarLane};
use core::ops::*;

/// 4-lane i32 vector stored as an array.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct I32x4([i32; 4]);

type Lane = ScalarLane<i32>;

impl I32x4 {
    /// Packs four lanes, lane 0 first.
    #[inline(always)]
    pub fn from_array(lanes: [i32; 4]) -> Self {
        Self(lanes)
    }

    /// Unpacks the four lanes, lane 0 first.
    #[inline(always)]
    pub fn to_array(self) -> [i32; 4] {
        self.0
    }

    #[inline(always)]
    fn map(self, f: impl Fn(Lane) -> Lane) -> Self {
        Self(core::array::from_fn(|i| f(ScalarLane(self.0[i])).0))
    }

    #[inline(always)]
    fn zip(self, rhs: Self, f: impl Fn(Lane, Lane) -> Lane) -> Self {
        Self(core::array::from_fn(|i| f(ScalarLane(self.0[i]), ScalarLane(rhs.0[i])).0))
    }
}

impl RawTraits for I32x4 {
    type Scalar = i32;
    const LANES: usize = 4;
}

impl Primitives for I32x4 {
    #[inline(always)]
    fn dup(x: i32) -> Self {
        Self([x; 4])
    }

    #[inline(always)]
    fn load(slice: &[i32]) -> Self {
        assert!(slice.len() >= Self::LANES);
        Self(core::array::from_fn(|i| slice[i]))
    }

    #[inline(always)]
    fn store(self, out: &mut [i32]) {
        out[..Self::LANES].copy_from_slice(&self.0);
    }

    #[inline(always)]
    fn lane(self, index: usize) -> i32 {
        self.0[index]
    }

    #[inline(always)]
    fn mask_eq(self, rhs: Self) -> Self {
        self.zip(rhs, Lane::mask_eq)
    }

    #[inline(always)]
    fn mask_gt(self, rhs: Self) -> Self {
        self.zip(rhs, Lane::mask_gt)
    }

    #[inline(always)]
    fn mask_ge(self, rhs: Self) -> Self {
        self.zip(rhs, Lane::mask_ge)
    }

    #[inline(always)]
    fn mask_lt(self, rhs: Self) -> Self {
        self.zip(rhs, Lane::mask_lt)
    }

    #[inline(always)]
    fn mask_le(self, rhs: Self) -> Self {
        self.zip(rhs, Lane::mask_le)
    }

    #[inline(always)]
    fn all(self) -> bool {
        self.0.iter().all(|&x| x != 0)
    }

    #[inline(always)]
    fn any(self) -> bool {
        self.0.iter().any(|&x| x != 0)
    }

    #[inline(always)]
    fn rounding_half_sum(self, rhs: Self) -> Self {
        self.zip(rhs, Lane::rounding_half_sum)
    }

    #[inline(always)]
    fn saturating_rounding_doubling_high_mul(self, rhs: Self) -> Self {
        self.zip(rhs, Lane::saturating_rounding_doubling_high_mul)
    }

    #[inline(always)]
    fn saturating_shift_left(self, shift: u32) -> Self {
        self.map(|x| x.saturating_shift_left(shift))
    }

    #[inline(always)]
    fn rounding_shift_right(self, shift: u32) -> Self {
        self.map(|x| x.rounding_shift_right(shift))
    }
}

macro_rules! impl_lanewise_op {
    ($trait:ident, $method:ident) => {
        impl $trait for I32x4 {
            type Output = Self;
            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                self.zip(rhs, Lane::$method)
            }
        }
    };
}

impl_lanewise_op!(Add, add);
impl_lanewise_op!(Sub, sub);
impl_lanewise_op!(BitAnd, bitand);
impl_lanewise_op!(BitOr, bitor);
impl_lanewise_op!(BitXor, bitxor);

impl Neg for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        self.map(Lane::neg)
    }
}

impl Not for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        self.map(Lane::not)
    }
}
