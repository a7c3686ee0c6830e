use thiserror::Error;

/// Failures of the conversions between real numbers and fixed-point values.
///
/// Fixed-point arithmetic itself never fails; it saturates.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FixedPointError {
    #[error("{0} is not a finite number")]
    NotFinite(f64),
    #[error("{value} is outside the representable range [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
    #[error("raw constant {raw} does not encode {expected} (nearest raw is {nearest})")]
    ConstantMismatch { raw: i64, expected: f64, nearest: i64 },
    #[error("power-of-two exponent {exponent} is out of range for {bits}-bit lanes")]
    ExponentOutOfRange { exponent: i32, bits: u32 },
}
