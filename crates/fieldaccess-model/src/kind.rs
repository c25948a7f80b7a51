//! Declared kinds of instance fields

use std::fmt;

use crate::value::Value;

/// The kind a field was declared with
///
/// Discriminants are stable: the first nine kinds (the primitives followed by
/// `String`) are the kinds that have a specialized accessor routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredKind {
    /// `boolean`
    Boolean = 0,
    /// `byte` (signed 8-bit)
    Byte = 1,
    /// `short` (signed 16-bit)
    Short = 2,
    /// `int` (signed 32-bit)
    Int = 3,
    /// `long` (signed 64-bit)
    Long = 4,
    /// `float` (32-bit IEEE 754)
    Float = 5,
    /// `double` (64-bit IEEE 754)
    Double = 6,
    /// `char` (Unicode scalar value)
    Char = 7,
    /// Immutable string reference
    String = 8,
    /// Any other object or array reference
    Reference = 9,
}

impl DeclaredKind {
    /// All primitive kinds, in discriminant order
    pub const PRIMITIVES: [DeclaredKind; 8] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Char,
    ];

    /// Kinds with a specialized accessor routine, indexed by `ordinal()`
    pub const TYPED: [DeclaredKind; 9] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Char,
        Self::String,
    ];

    /// Position of this kind in `TYPED` (or 9 for `Reference`)
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Whether values of this kind are stored unboxed
    pub const fn is_primitive(self) -> bool {
        !matches!(self, Self::String | Self::Reference)
    }

    /// Source-level name, as used in error messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
            Self::String => "String",
            Self::Reference => "Object",
        }
    }
}

impl fmt::Display for DeclaredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Rust types that map one-to-one onto a primitive declared kind
pub trait Primitive: Copy + sealed::Sealed {
    /// The declared kind this type represents
    const KIND: DeclaredKind;

    /// Unbox, if the value holds exactly this kind
    fn from_value(value: &Value) -> Option<Self>;

    /// Box into the generic representation
    fn into_value(self) -> Value;
}

macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident, $variant:ident;)*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Primitive for $ty {
                const KIND: DeclaredKind = DeclaredKind::$kind;

                #[inline]
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(*v),
                        _ => None,
                    }
                }

                #[inline]
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Boolean, Bool;
    i8 => Byte, Byte;
    i16 => Short, Short;
    i32 => Int, Int;
    i64 => Long, Long;
    f32 => Float, Float;
    f64 => Double, Double;
    char => Char, Char;
}
