#![no_main]

use libfuzzer_sys::fuzz_target;
use lowp_fixedpoint::{logistic, tanh, FixedPoint, I32x4, ScalarLane};

fuzz_target!(|data: &[u8]| {
    if data.len() < 16 {
        return;
    }

    let raw: [i32; 4] = core::array::from_fn(|i| {
        i32::from_le_bytes([data[4 * i], data[4 * i + 1], data[4 * i + 2], data[4 * i + 3]])
    });
    let v = FixedPoint::<I32x4, 3>::from_raw(I32x4::from_array(raw));
    let t = tanh(v).raw().to_array();
    let l = logistic(v).raw().to_array();

    for i in 0..4 {
        let s = FixedPoint::<ScalarLane<i32>, 3>::from_scalar_raw(raw[i]);
        assert_eq!(t[i], tanh(s).raw().0, "tanh lane {} of {:?}", i, raw);
        assert_eq!(l[i], logistic(s).raw().0, "logistic lane {} of {:?}", i, raw);
        // logistic stays in [0, 1]
        assert!(l[i] >= 0, "logistic({}) = {}", raw[i], l[i]);
    }
});
