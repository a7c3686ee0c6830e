//! Scalar reference backend (LANES=1).
//!
//! This is the semantics every other backend reproduces. Rounding and
//! saturation are computed in the next wider integer type, where nothing can
//! overflow.

use super::{Primitives, RawTraits};
use core::ops::*;

/// A single signed integer lane.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct ScalarLane<T>(pub T);

// Integer arithmetic wraps to match SIMD semantics
macro_rules! impl_scalar_lane {
    ($t:ty, $wide:ty) => {
        impl RawTraits for ScalarLane<$t> {
            type Scalar = $t;
            const LANES: usize = 1;
        }

        impl Add for ScalarLane<$t> {
            type Output = Self;
            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                ScalarLane(self.0.wrapping_add(rhs.0))
            }
        }
        impl Sub for ScalarLane<$t> {
            type Output = Self;
            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                ScalarLane(self.0.wrapping_sub(rhs.0))
            }
        }
        impl Neg for ScalarLane<$t> {
            type Output = Self;
            #[inline(always)]
            fn neg(self) -> Self {
                ScalarLane(self.0.wrapping_neg())
            }
        }
        impl BitAnd for ScalarLane<$t> {
            type Output = Self;
            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                ScalarLane(self.0 & rhs.0)
            }
        }
        impl BitOr for ScalarLane<$t> {
            type Output = Self;
            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                ScalarLane(self.0 | rhs.0)
            }
        }
        impl BitXor for ScalarLane<$t> {
            type Output = Self;
            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                ScalarLane(self.0 ^ rhs.0)
            }
        }
        impl Not for ScalarLane<$t> {
            type Output = Self;
            #[inline(always)]
            fn not(self) -> Self {
                ScalarLane(!self.0)
            }
        }

        impl Primitives for ScalarLane<$t> {
            #[inline(always)]
            fn dup(x: $t) -> Self {
                ScalarLane(x)
            }

            #[inline(always)]
            fn load(slice: &[$t]) -> Self {
                ScalarLane(slice[0])
            }

            #[inline(always)]
            fn store(self, out: &mut [$t]) {
                out[0] = self.0;
            }

            #[inline(always)]
            fn lane(self, index: usize) -> $t {
                assert_eq!(index, 0, "ScalarLane has a single lane");
                self.0
            }

            #[inline(always)]
            fn mask_eq(self, rhs: Self) -> Self {
                ScalarLane(if self.0 == rhs.0 { !0 } else { 0 })
            }
            #[inline(always)]
            fn mask_gt(self, rhs: Self) -> Self {
                ScalarLane(if self.0 > rhs.0 { !0 } else { 0 })
            }
            #[inline(always)]
            fn mask_ge(self, rhs: Self) -> Self {
                ScalarLane(if self.0 >= rhs.0 { !0 } else { 0 })
            }
            #[inline(always)]
            fn mask_lt(self, rhs: Self) -> Self {
                ScalarLane(if self.0 < rhs.0 { !0 } else { 0 })
            }
            #[inline(always)]
            fn mask_le(self, rhs: Self) -> Self {
                ScalarLane(if self.0 <= rhs.0 { !0 } else { 0 })
            }

            #[inline(always)]
            fn all(self) -> bool {
                self.0 != 0
            }

            #[inline(always)]
            fn any(self) -> bool {
                self.0 != 0
            }

            #[inline(always)]
            fn rounding_half_sum(self, rhs: Self) -> Self {
                let sum = self.0 as $wide + rhs.0 as $wide;
                ScalarLane(((sum + 1) >> 1) as $t)
            }

            #[inline(always)]
            fn saturating_rounding_doubling_high_mul(self, rhs: Self) -> Self {
                if self.0 == <$t>::MIN && rhs.0 == <$t>::MIN {
                    return ScalarLane(<$t>::MAX);
                }
                // (2ab + 2^(BITS-1)) >> BITS, halved to stay clear of the sign bit
                let ab = self.0 as $wide * rhs.0 as $wide;
                let nudge: $wide = 1 << (<$t>::BITS - 2);
                ScalarLane(((ab + nudge) >> (<$t>::BITS - 1)) as $t)
            }

            #[inline(always)]
            fn saturating_shift_left(self, shift: u32) -> Self {
                debug_assert!(shift > 0 && shift < <$t>::BITS);
                let wide = (self.0 as $wide) << shift;
                ScalarLane(wide.clamp(<$t>::MIN as $wide, <$t>::MAX as $wide) as $t)
            }

            #[inline(always)]
            fn rounding_shift_right(self, shift: u32) -> Self {
                debug_assert!(shift > 0 && shift < <$t>::BITS);
                let wide = self.0 as $wide;
                let nudge: $wide = 1 << (shift - 1);
                ScalarLane(((wide + nudge) >> shift) as $t)
            }
        }
    };
}

impl_scalar_lane!(i16, i32);
impl_scalar_lane!(i32, i64);
