//! x86_64 backend (SSE2, 4 lanes of i32).
//!
//! SSE2 is part of the x86_64 baseline, so nothing here needs runtime
//! feature detection. SSE2 has no signed 32x32->64 multiply, no saturating
//! shift and no rounding shift; those are built from the unsigned multiply,
//! compares and blends below.

use super::{Primitives, RawTraits};
use core::arch::x86_64::*;
use core::fmt::{Debug, Formatter};
use core::ops::*;

/// 4-lane i32 SIMD vector for SSE2.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct I32x4(__m128i);

impl Default for I32x4 {
    fn default() -> Self {
        unsafe { Self(_mm_setzero_si128()) }
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
        unsafe { Self(_mm_loadu_si128(lanes.as_ptr() as *const __m128i)) }
    }

    /// Unpacks the four lanes, lane 0 first.
    #[inline(always)]
    pub fn to_array(self) -> [i32; 4] {
        let mut arr = [0i32; 4];
        unsafe { _mm_storeu_si128(arr.as_mut_ptr() as *mut __m128i, self.0) };
        arr
    }

    #[inline(always)]
    fn all_ones() -> __m128i {
        unsafe { _mm_set1_epi32(-1) }
    }

    #[inline(always)]
    fn blend(mask: __m128i, then_val: __m128i, else_val: __m128i) -> __m128i {
        // _mm_andnot_si128(a, b) computes (!a) & b
        unsafe { _mm_or_si128(_mm_and_si128(mask, then_val), _mm_andnot_si128(mask, else_val)) }
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
        unsafe { Self(_mm_set1_epi32(x)) }
    }

    #[inline(always)]
    fn load(slice: &[i32]) -> Self {
        assert!(slice.len() >= Self::LANES);
        unsafe { Self(_mm_loadu_si128(slice.as_ptr() as *const __m128i)) }
    }

    #[inline(always)]
    fn store(self, out: &mut [i32]) {
        assert!(out.len() >= Self::LANES);
        unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, self.0) }
    }

    #[inline(always)]
    fn lane(self, index: usize) -> i32 {
        self.to_array()[index]
    }

    #[inline(always)]
    fn select(mask: Self, then_val: Self, else_val: Self) -> Self {
        Self(Self::blend(mask.0, then_val.0, else_val.0))
    }

    #[inline(always)]
    fn mask_eq(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmpeq_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_gt(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmpgt_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_ge(self, rhs: Self) -> Self {
        unsafe { Self(_mm_xor_si128(_mm_cmplt_epi32(self.0, rhs.0), Self::all_ones())) }
    }

    #[inline(always)]
    fn mask_lt(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmplt_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_le(self, rhs: Self) -> Self {
        unsafe { Self(_mm_xor_si128(_mm_cmpgt_epi32(self.0, rhs.0), Self::all_ones())) }
    }

    #[inline(always)]
    fn all(self) -> bool {
        // movemask of (lane == 0) is empty only when no lane is zero
        unsafe { _mm_movemask_epi8(_mm_cmpeq_epi32(self.0, _mm_setzero_si128())) == 0 }
    }

    #[inline(always)]
    fn any(self) -> bool {
        unsafe { _mm_movemask_epi8(_mm_cmpeq_epi32(self.0, _mm_setzero_si128())) != 0xFFFF }
    }

    #[inline(always)]
    fn rounding_half_sum(self, rhs: Self) -> Self {
        // ceil((a + b) / 2) == (a | b) - ((a ^ b) >> 1), no overflow possible
        unsafe {
            let or = _mm_or_si128(self.0, rhs.0);
            let xor = _mm_xor_si128(self.0, rhs.0);
            Self(_mm_sub_epi32(or, _mm_srai_epi32(xor, 1)))
        }
    }

    #[inline(always)]
    fn saturating_rounding_doubling_high_mul(self, rhs: Self) -> Self {
        unsafe {
            let a = self.0;
            let b = rhs.0;

            // Signed 64-bit products from the unsigned multiply:
            // hi(a*b) = hi_unsigned(a*b) - (a < 0 ? b : 0) - (b < 0 ? a : 0)
            let sign_a = _mm_srai_epi32(a, 31);
            let sign_b = _mm_srai_epi32(b, 31);
            let correction = _mm_add_epi32(_mm_and_si128(sign_a, b), _mm_and_si128(sign_b, a));

            // Lanes 0 and 2
            let prod_even = _mm_mul_epu32(a, b);
            let prod_even = _mm_sub_epi64(prod_even, _mm_slli_epi64(correction, 32));

            // Lanes 1 and 3, whose corrections already sit in the high dwords
            let high_dwords = _mm_set_epi32(-1, 0, -1, 0);
            let prod_odd = _mm_mul_epu32(_mm_srli_epi64(a, 32), _mm_srli_epi64(b, 32));
            let prod_odd = _mm_sub_epi64(prod_odd, _mm_and_si128(correction, high_dwords));

            // (2p + 2^31) >> 32 == (p + 2^30) >> 31; only the low 32 bits survive,
            // so a logical 64-bit shift gives the same dword as an arithmetic one
            let nudge = _mm_set1_epi64x(1 << 30);
            let res_even = _mm_srli_epi64(_mm_add_epi64(prod_even, nudge), 31);
            let res_odd = _mm_srli_epi64(_mm_add_epi64(prod_odd, nudge), 31);

            let low_dwords = _mm_set_epi32(0, -1, 0, -1);
            let result = _mm_or_si128(
                _mm_and_si128(res_even, low_dwords),
                _mm_slli_epi64(res_odd, 32),
            );

            let min = _mm_set1_epi32(i32::MIN);
            let overflow = _mm_and_si128(_mm_cmpeq_epi32(a, min), _mm_cmpeq_epi32(b, min));
            Self(Self::blend(overflow, _mm_set1_epi32(i32::MAX), result))
        }
    }

    #[inline(always)]
    fn saturating_shift_left(self, shift: u32) -> Self {
        debug_assert!(shift > 0 && shift < 32);
        unsafe {
            let count = _mm_cvtsi32_si128(shift as i32);
            let shifted = _mm_sll_epi32(self.0, count);

            let upper = _mm_set1_epi32(i32::MAX >> shift);
            let lower = _mm_set1_epi32(i32::MIN >> shift);
            let too_big = _mm_cmpgt_epi32(self.0, upper);
            let too_small = _mm_cmplt_epi32(self.0, lower);

            let result = Self::blend(too_small, _mm_set1_epi32(i32::MIN), shifted);
            Self(Self::blend(too_big, _mm_set1_epi32(i32::MAX), result))
        }
    }

    #[inline(always)]
    fn rounding_shift_right(self, shift: u32) -> Self {
        debug_assert!(shift > 0 && shift < 32);
        // floor(x / 2^n) plus the highest discarded bit
        unsafe {
            let count = _mm_cvtsi32_si128(shift as i32);
            let round_count = _mm_cvtsi32_si128(shift as i32 - 1);
            let floor = _mm_sra_epi32(self.0, count);
            let round_bit = _mm_and_si128(_mm_srl_epi32(self.0, round_count), _mm_set1_epi32(1));
            Self(_mm_add_epi32(floor, round_bit))
        }
    }
}

// ============================================================================
// Operator Implementations
// ============================================================================

impl Add for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm_add_epi32(self.0, rhs.0)) }
    }
}

impl Sub for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm_sub_epi32(self.0, rhs.0)) }
    }
}

impl Neg for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        unsafe { Self(_mm_sub_epi32(_mm_setzero_si128(), self.0)) }
    }
}

impl BitAnd for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        unsafe { Self(_mm_and_si128(self.0, rhs.0)) }
    }
}

impl BitOr for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        unsafe { Self(_mm_or_si128(self.0, rhs.0)) }
    }
}

impl BitXor for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        unsafe { Self(_mm_xor_si128(self.0, rhs.0)) }
    }
}

impl Not for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        unsafe { Self(_mm_xor_si128(self.0, Self::all_ones())) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sse2_lanes_round_trip() {
        let v = I32x4::from_array([1, -2, i32::MAX, i32::MIN]);
        assert_eq!(v.to_array(), [1, -2, i32::MAX, i32::MIN]);
        assert_eq!(v.lane(2), i32::MAX);

        let mut out = [0i32; 4];
        I32x4::dup(9).store(&mut out);
        assert_eq!(out, [9; 4]);
    }

    #[test]
    fn test_sse2_doubling_high_mul_odd_and_even_lanes() {
        let a = I32x4::from_array([i32::MIN, -3, 1 << 30, i32::MAX]);
        let b = I32x4::from_array([i32::MIN, 1 << 30, -(1 << 30), i32::MAX]);
        let r = a.saturating_rounding_doubling_high_mul(b).to_array();
        // -3 * 2^30 * 2 / 2^32 = -1.5, ties go up
        assert_eq!(r, [i32::MAX, -1, -(1 << 29), i32::MAX - 1]);
    }

    #[test]
    fn test_sse2_shift_saturation() {
        let v = I32x4::from_array([1 << 29, -(1 << 29), (1 << 29) + 1, -(1 << 29) - 1]);
        let r = v.saturating_shift_left(2).to_array();
        assert_eq!(r, [i32::MAX, i32::MIN, i32::MAX, i32::MIN]);
    }

    #[test]
    fn test_sse2_all_any() {
        assert!(I32x4::dup(-1).all());
        assert!(!I32x4::from_array([-1, -1, 0, -1]).all());
        assert!(I32x4::from_array([0, 0, 0, -1]).any());
        assert!(!I32x4::zero().any());
    }
}
