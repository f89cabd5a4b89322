//! Element type descriptors for typed views.
//!
//! [`ElementType`] is the closed set of numeric element types a view can
//! carry. [`Element`] binds each supported Rust scalar to its tag so that
//! typed slice access can be checked against the configured element type.

use std::fmt;

/// Numeric element type of a view.
///
/// The set is closed and exhaustively matched — there is no open-ended
/// type registry. Every variant has a fixed byte width of 1, 2, 4, or 8,
/// and its alignment requirement equals that width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 8-bit signed integer.
    Int8,
    /// 8-bit unsigned integer.
    UInt8,
    /// 16-bit signed integer.
    Int16,
    /// 16-bit unsigned integer.
    UInt16,
    /// 32-bit signed integer.
    Int32,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit unsigned integer.
    UInt64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
}

impl ElementType {
    /// All supported element types, in width order.
    pub const ALL: [ElementType; 10] = [
        ElementType::Int8,
        ElementType::UInt8,
        ElementType::Int16,
        ElementType::UInt16,
        ElementType::Int32,
        ElementType::UInt32,
        ElementType::Float32,
        ElementType::Int64,
        ElementType::UInt64,
        ElementType::Float64,
    ];

    /// Size of one element in bytes.
    pub fn byte_size(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// Alignment requirement in bytes.
    ///
    /// Equal to [`ElementType::byte_size`], and always a power of two,
    /// which is what permits the mask-based rounding in the layout walk.
    pub fn alignment(&self) -> usize {
        self.byte_size()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int8 => "i8",
            Self::UInt8 => "u8",
            Self::Int16 => "i16",
            Self::UInt16 => "u16",
            Self::Int32 => "i32",
            Self::UInt32 => "u32",
            Self::Int64 => "i64",
            Self::UInt64 => "u64",
            Self::Float32 => "f32",
            Self::Float64 => "f64",
        };
        f.write_str(name)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A Rust scalar that can back a typed view.
///
/// Sealed: implemented exactly for the ten scalars named by
/// [`ElementType`]. The `bytemuck::Pod` bound is what makes the
/// byte-slice casts in [`crate::partition::View`] safe.
pub trait Element: bytemuck::Pod + sealed::Sealed {
    /// The tag this scalar corresponds to.
    const ELEMENT_TYPE: ElementType;
}

macro_rules! impl_element {
    ($($scalar:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $scalar {}
            impl Element for $scalar {
                const ELEMENT_TYPE: ElementType = ElementType::$variant;
            }
        )*
    };
}

impl_element! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}
