//! # lowp-fixedpoint
//!
//! Saturating, rounding fixed-point arithmetic for quantized integer
//! pipelines, written once and compiled for scalar and SIMD lanes.
//!
//! - **Backend**: [`Primitives`] is the operation contract. [`ScalarLane`] is
//!   the one-lane reference; [`I32x4`] packs four `i32` lanes (SSE2, NEON, or
//!   a portable array).
//! - **Fixed point**: [`FixedPoint<R, I>`] gives a raw value a format with `I`
//!   integer bits and builds multiplication, rescaling and conversions on top
//!   of the primitives.
//! - **Compounds**: [`tanh`], [`logistic`] and [`exp_on_negative_values`]
//!   (plus their building blocks), available on every 32-bit backend.
//!
//! ```
//! use lowp_fixedpoint::{FixedPoint, FixedPointCompounds, I32x4, Primitives};
//!
//! let x = FixedPoint::<I32x4, 3>::from_raw(I32x4::from_array([
//!     0,
//!     1 << 28,
//!     -(1 << 28),
//!     i32::MIN,
//! ]));
//! let y = x.tanh();
//! assert_eq!(y.raw().lane(0), 0);
//! assert!((y.to_f64_lane(1) - 1.0f64.tanh()).abs() < 1e-5);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod backend;
pub mod compounds;
pub mod error;
pub mod fixed;

pub use backend::{Element, I32x4, Native, Primitives, RawTraits, ScalarLane};
pub use compounds::{
    exp_on_interval_between_negative_one_quarter_and_0_excl, exp_on_negative_values, logistic,
    one_minus_x_over_one_plus_x_for_x_in_0_1, one_over_one_plus_x_for_x_in_0_1, tanh,
    FixedPointCompounds,
};
pub use error::FixedPointError;
pub use fixed::FixedPoint;
