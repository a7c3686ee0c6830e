//! ARM NEON backend (4 lanes of i32).
//!
//! NEON has a native instruction for nearly every primitive: `vrhadd` for the
//! rounding half sum, `vqrdmulh` for the doubling high multiply, and the
//! register-count forms of `vqshl`/`vrshl` for the power-of-two shifts.

use super::{Primitives, RawTraits};
use core::arch::aarch64::*;
use core::fmt::{Debug, Formatter};
use core::ops::*;

/// 4-lane i32 SIMD vector for ARM NEON.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct I32x4(int32x4_t);

impl Default for I32x4 {
    fn default() -> Self {
        unsafe { Self(vdupq_n_s32(0)) }
    }
}

impl Debug for I32x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "I32x4({:?})", self.to_array())
    }
}

impl I32x4 {
    /// Packs four lanes, lane 0 first.
    #[inline(always)]
    pub fn from_array(lanes: [i32; 4]) -> Self {
        unsafe { Self(vld1q_s32(lanes.as_ptr())) }
    }

    /// Unpacks the four lanes, lane 0 first.
    #[inline(always)]
    pub fn to_array(self) -> [i32; 4] {
        let mut arr = [0i32; 4];
        unsafe { vst1q_s32(arr.as_mut_ptr(), self.0) };
        arr
    }

    #[inline(always)]
    fn from_mask(mask: uint32x4_t) -> Self {
        unsafe { Self(vreinterpretq_s32_u32(mask)) }
    }

    /// All-1 in every non-zero lane.
    #[inline(always)]
    fn non_zero_lanes(self) -> uint32x4_t {
        unsafe { vtstq_s32(self.0, self.0) }
    }
}

impl RawTraits for I32x4 {
    type Scalar = i32;
    const LANES: usize = 4;
}

// ============================================================================
// Primitives Implementation
// ============================================================================

impl Primitives for I32x4 {
    #[inline(always)]
    fn dup(x: i32) -> Self {
        unsafe { Self(vdupq_n_s32(x)) }
    }

    #[inline(always)]
    fn load(slice: &[i32]) -> Self {
        assert!(slice.len() >= Self::LANES);
        unsafe { Self(vld1q_s32(slice.as_ptr())) }
    }

    #[inline(always)]
    fn store(self, out: &mut [i32]) {
        assert!(out.len() >= Self::LANES);
        unsafe { vst1q_s32(out.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn lane(self, index: usize) -> i32 {
        self.to_array()[index]
    }

    #[inline(always)]
    fn select(mask: Self, then_val: Self, else_val: Self) -> Self {
        unsafe { Self(vbslq_s32(vreinterpretq_u32_s32(mask.0), then_val.0, else_val.0)) }
    }

    #[inline(always)]
    fn mask_eq(self, rhs: Self) -> Self {
        unsafe { Self::from_mask(vceqq_s32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_ne(self, rhs: Self) -> Self {
        unsafe { Self::from_mask(vmvnq_u32(vceqq_s32(self.0, rhs.0))) }
    }

    #[inline(always)]
    fn mask_gt(self, rhs: Self) -> Self {
        unsafe { Self::from_mask(vcgtq_s32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_ge(self, rhs: Self) -> Self {
        unsafe { Self::from_mask(vcgeq_s32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_lt(self, rhs: Self) -> Self {
        unsafe { Self::from_mask(vcltq_s32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_le(self, rhs: Self) -> Self {
        unsafe { Self::from_mask(vcleq_s32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_non_zero(self) -> Self {
        Self::from_mask(self.non_zero_lanes())
    }

    #[inline(always)]
    fn all(self) -> bool {
        unsafe { vminvq_u32(self.non_zero_lanes()) != 0 }
    }

    #[inline(always)]
    fn any(self) -> bool {
        unsafe { vmaxvq_u32(self.non_zero_lanes()) != 0 }
    }

    #[inline(always)]
    fn rounding_half_sum(self, rhs: Self) -> Self {
        unsafe { Self(vrhaddq_s32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn saturating_rounding_doubling_high_mul(self, rhs: Self) -> Self {
        unsafe { Self(vqrdmulhq_s32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn saturating_shift_left(self, shift: u32) -> Self {
        debug_assert!(shift > 0 && shift < 32);
        unsafe { Self(vqshlq_s32(self.0, vdupq_n_s32(shift as i32))) }
    }

    #[inline(always)]
    fn rounding_shift_right(self, shift: u32) -> Self {
        debug_assert!(shift > 0 && shift < 32);
        // Negative count: rounding shift right
        unsafe { Self(vrshlq_s32(self.0, vdupq_n_s32(-(shift as i32)))) }
    }
}

// ============================================================================
// Operator Implementations
// ============================================================================

impl Add for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(vaddq_s32(self.0, rhs.0)) }
    }
}

impl Sub for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(vsubq_s32(self.0, rhs.0)) }
    }
}

impl Neg for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        unsafe { Self(vnegq_s32(self.0)) }
    }
}

impl BitAnd for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        unsafe { Self(vandq_s32(self.0, rhs.0)) }
    }
}

impl BitOr for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        unsafe { Self(vorrq_s32(self.0, rhs.0)) }
    }
}

impl BitXor for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        unsafe { Self(veorq_s32(self.0, rhs.0)) }
    }
}

impl Not for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        unsafe { Self(vmvnq_s32(self.0)) }
    }
}
