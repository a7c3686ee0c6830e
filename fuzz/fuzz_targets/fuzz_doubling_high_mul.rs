#![no_main]

use libfuzzer_sys::fuzz_target;
use lowp_fixedpoint::{I32x4, Primitives, ScalarLane};

fuzz_target!(|data: &[u8]| {
    if data.len() < 33 {
        return;
    }

    let lane = |i: usize| i32::from_le_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
    let a: [i32; 4] = core::array::from_fn(|i| lane(4 * i));
    let b: [i32; 4] = core::array::from_fn(|i| lane(16 + 4 * i));
    let shift = 1 + (data[32] as u32 % 31);

    let va = I32x4::from_array(a);
    let vb = I32x4::from_array(b);

    let mul = va.saturating_rounding_doubling_high_mul(vb).to_array();
    let half = va.rounding_half_sum(vb).to_array();
    let shl = va.saturating_shift_left(shift).to_array();
    let shr = va.rounding_shift_right(shift).to_array();

    for i in 0..4 {
        let (x, y) = (ScalarLane(a[i]), ScalarLane(b[i]));

        // floor((2ab + 2^31) / 2^32), with MIN * MIN saturating
        let wide = (2 * a[i] as i128 * b[i] as i128 + (1i128 << 31)) >> 32;
        let expected = wide.clamp(i32::MIN as i128, i32::MAX as i128) as i32;
        assert_eq!(mul[i], expected, "doubling_high_mul({}, {})", a[i], b[i]);
        assert_eq!(mul[i], x.saturating_rounding_doubling_high_mul(y).0);

        assert_eq!(half[i], x.rounding_half_sum(y).0, "rounding_half_sum({}, {})", a[i], b[i]);
        assert_eq!(shl[i], x.saturating_shift_left(shift).0, "{} << {}", a[i], shift);
        assert_eq!(shr[i], x.rounding_shift_right(shift).0, "{} >> {}", a[i], shift);
    }
});
