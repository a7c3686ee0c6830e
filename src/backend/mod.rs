//! Raw value types and the operations every backend provides.
//!
//! # Architecture
//!
//! - **Descriptor** ([`RawTraits`]): lane count and scalar element type of a
//!   raw value. Pure type-level metadata.
//!
//! - **Primitives** ([`Primitives`]): the operation contract. Bitwise logic,
//!   wrapping add/sub/neg, masks, selection, and the rounding/saturating
//!   multiply and shift operations that fixed-point arithmetic is built on.
//!
//! Backends:
//!
//! - [`ScalarLane<T>`](scalar::ScalarLane): one lane, the reference semantics.
//! - [`I32x4`]: four `i32` lanes. SSE2 on x86_64, NEON on aarch64, and a
//!   plain array everywhere else (or with the `force-portable` feature).
//!
//! Every `I32x4` operation is, lane for lane, exactly the `ScalarLane<i32>`
//! operation. Generic code never names a backend; it is written against
//! [`Primitives`] and monomorphized per raw type.

use core::fmt::Debug;

pub mod primitives;
pub mod scalar;

pub use primitives::Primitives;
pub use scalar::ScalarLane;

#[cfg(all(target_arch = "x86_64", not(feature = "force-portable")))]
pub mod x86;
#[cfg(all(target_arch = "x86_64", not(feature = "force-portable")))]
pub use x86::I32x4;

#[cfg(all(target_arch = "aarch64", not(feature = "force-portable")))]
pub mod arm;
#[cfg(all(target_arch = "aarch64", not(feature = "force-portable")))]
pub use arm::I32x4;

#[cfg(any(
    feature = "force-portable",
    not(any(target_arch = "x86_64", target_arch = "aarch64"))
))]
pub mod portable;
#[cfg(any(
    feature = "force-portable",
    not(any(target_arch = "x86_64", target_arch = "aarch64"))
))]
pub use portable::I32x4;

/// The widest integer vector compiled for this target.
pub type Native = I32x4;

/// Signed integer type stored in a single lane.
pub trait Element: Copy + Debug + Default + PartialEq + PartialOrd + Send + Sync + 'static {
    /// Width of the integer in bits.
    const BITS: u32;
    /// Most negative representable value.
    const MIN: Self;
    /// Most positive representable value.
    const MAX: Self;
    /// Zero.
    const ZERO: Self;

    /// Widens to `i64` without loss.
    fn to_i64(self) -> i64;

    /// Narrows from `i64`, clamping to `[MIN, MAX]`.
    fn saturating_from_i64(value: i64) -> Self;
}

macro_rules! impl_element {
    ($t:ty) => {
        impl Element for $t {
            const BITS: u32 = <$t>::BITS;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
            const ZERO: Self = 0;

            #[inline(always)]
            fn to_i64(self) -> i64 {
                self as i64
            }

            #[inline(always)]
            fn saturating_from_i64(value: i64) -> Self {
                value.clamp(<$t>::MIN as i64, <$t>::MAX as i64) as $t
            }
        }
    };
}

impl_element!(i16);
impl_element!(i32);

/// Compile-time description of a raw value type.
///
/// Lets generic code reason about lanes (iterate them, size buffers, reduce a
/// mask to a `bool`) without knowing which backend it is running on.
pub trait RawTraits: Copy + Clone + Debug + Default + Send + Sync + 'static {
    /// Type of a single lane.
    type Scalar: Element;

    /// Number of lanes packed in one raw value.
    const LANES: usize;
}
