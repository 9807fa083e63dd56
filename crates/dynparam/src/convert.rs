//! Conversion between Rust scalar field types and tagged values.
//!
//! Each supported scalar type maps onto one scalar kind and its optional
//! counterpart. Integer types narrower than `i64` are widened losslessly on
//! the way out; on the way back in, a value that does not fit the field's
//! width is rejected instead of truncated.
//!
//! # Example
//!
//! ```ignore
//! use dynparam::{Scalar, ValueType};
//!
//! let value = <u16 as Scalar>::wrap(7, 7);
//! assert_eq!(value, ValueType::Int { current: 7, default: 7 });
//! assert_eq!(<u16 as Scalar>::extract(&value), Ok(7));
//! ```

use crate::error::ApplyIssue;
use crate::value::{Kind, ValueType};

/// A Rust type that maps onto one of the five scalar kinds.
///
/// Implemented for `i8`, `i16`, `i32`, `i64`, `isize`, `u8`, `u16`, `u32`
/// (integer), `f32` (float), `f64` (double), `String` and `bool`.
pub trait Scalar: Clone {
    /// Kind produced for a plain field
    const KIND: Kind;

    /// Kind produced for an `Option` field
    const OPTIONAL_KIND: Kind;

    /// Build the scalar case from a current and default value
    fn wrap(current: Self, default: Self) -> ValueType;

    /// Build the optional case from a current and default value
    fn wrap_optional(current: Option<Self>, default: Option<Self>) -> ValueType;

    /// Extract the current value, failing if the case doesn't match
    fn extract(value: &ValueType) -> Result<Self, ApplyIssue>;

    /// Extract the current value of the optional case
    fn extract_optional(value: &ValueType) -> Result<Option<Self>, ApplyIssue>;
}

fn mismatch(expected: Kind, value: &ValueType) -> ApplyIssue {
    ApplyIssue::KindMismatch {
        expected,
        found: value.kind(),
    }
}

macro_rules! native_scalar {
    ($ty:ty, $kind:ident, $optional:ident) => {
        impl Scalar for $ty {
            const KIND: Kind = Kind::$kind;
            const OPTIONAL_KIND: Kind = Kind::$optional;

            fn wrap(current: Self, default: Self) -> ValueType {
                ValueType::$kind { current, default }
            }

            fn wrap_optional(current: Option<Self>, default: Option<Self>) -> ValueType {
                ValueType::$optional { current, default }
            }

            fn extract(value: &ValueType) -> Result<Self, ApplyIssue> {
                match value {
                    ValueType::$kind { current, .. } => Ok(current.clone()),
                    other => Err(mismatch(Kind::$kind, other)),
                }
            }

            fn extract_optional(value: &ValueType) -> Result<Option<Self>, ApplyIssue> {
                match value {
                    ValueType::$optional { current, .. } => Ok(current.clone()),
                    other => Err(mismatch(Kind::$optional, other)),
                }
            }
        }
    };
}

native_scalar!(i64, Int, OptionalInt);
native_scalar!(f32, Float, OptionalFloat);
native_scalar!(f64, Double, OptionalDouble);
native_scalar!(String, String, OptionalString);
native_scalar!(bool, Bool, OptionalBool);

fn narrow<T: TryFrom<i64>>(value: i64) -> Result<T, ApplyIssue> {
    T::try_from(value).map_err(|_| ApplyIssue::OutOfRange {
        value,
        target: std::any::type_name::<T>(),
    })
}

// Integers that fit in i64 without loss; stored widened, narrowed on extract.
macro_rules! narrow_int_scalar {
    ($($ty:ty),*) => {
        $(
            impl Scalar for $ty {
                const KIND: Kind = Kind::Int;
                const OPTIONAL_KIND: Kind = Kind::OptionalInt;

                fn wrap(current: Self, default: Self) -> ValueType {
                    ValueType::Int {
                        current: current as i64,
                        default: default as i64,
                    }
                }

                fn wrap_optional(current: Option<Self>, default: Option<Self>) -> ValueType {
                    ValueType::OptionalInt {
                        current: current.map(|v| v as i64),
                        default: default.map(|v| v as i64),
                    }
                }

                fn extract(value: &ValueType) -> Result<Self, ApplyIssue> {
                    match value {
                        ValueType::Int { current, .. } => narrow::<Self>(*current),
                        other => Err(mismatch(Kind::Int, other)),
                    }
                }

                fn extract_optional(value: &ValueType) -> Result<Option<Self>, ApplyIssue> {
                    match value {
                        ValueType::OptionalInt { current, .. } => {
                            (*current).map(narrow::<Self>).transpose()
                        }
                        other => Err(mismatch(Kind::OptionalInt, other)),
                    }
                }
            }
        )*
    };
}

narrow_int_scalar!(i8, i16, i32, isize, u8, u16, u32);
