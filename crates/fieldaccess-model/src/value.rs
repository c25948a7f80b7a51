//! Generic value representation
//!
//! `Value` is the boxed form a field takes when it passes through the untyped
//! accessor routines. Primitives are carried inline, strings as shared
//! immutable text, objects and arrays as shared references.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::instance::Instance;
use crate::kind::DeclaredKind;

/// Shared reference to a heap object
pub type ObjectRef = Arc<RwLock<Instance>>;

/// Shared reference to a heap array
pub type ArrayRef = Arc<RwLock<Vec<Value>>>;

/// A boxed field value
#[derive(Clone, Default)]
pub enum Value {
    /// Null reference
    #[default]
    Null,
    /// `boolean`
    Bool(bool),
    /// `byte`
    Byte(i8),
    /// `short`
    Short(i16),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `char`
    Char(char),
    /// String reference
    Str(Arc<str>),
    /// Object reference
    Object(ObjectRef),
    /// Array reference
    Array(ArrayRef),
}

impl Value {
    /// The value a freshly allocated field of `kind` holds
    pub fn zero(kind: DeclaredKind) -> Self {
        match kind {
            DeclaredKind::Boolean => Value::Bool(false),
            DeclaredKind::Byte => Value::Byte(0),
            DeclaredKind::Short => Value::Short(0),
            DeclaredKind::Int => Value::Int(0),
            DeclaredKind::Long => Value::Long(0),
            DeclaredKind::Float => Value::Float(0.0),
            DeclaredKind::Double => Value::Double(0.0),
            DeclaredKind::Char => Value::Char('\0'),
            DeclaredKind::String | DeclaredKind::Reference => Value::Null,
        }
    }

    /// Create a string value
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Move an instance to the heap and reference it
    pub fn object(instance: Instance) -> Self {
        Value::Object(Arc::new(RwLock::new(instance)))
    }

    /// Create an array value
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Arc::new(RwLock::new(elements)))
    }

    /// Whether this is the null reference
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text of a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(&**s),
            _ => None,
        }
    }

    /// Runtime type name, as used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Char(_) => "char",
            Value::Str(_) => "String",
            Value::Object(_) => "Object",
            Value::Array(_) => "array",
        }
    }

    /// Whether this value may be stored into a field declared as `kind`
    ///
    /// Primitives require the exact variant, with no widening and no null.
    /// String fields take strings or null; reference fields take any
    /// reference or null.
    pub fn conforms_to(&self, kind: DeclaredKind) -> bool {
        match (kind, self) {
            (DeclaredKind::Boolean, Value::Bool(_))
            | (DeclaredKind::Byte, Value::Byte(_))
            | (DeclaredKind::Short, Value::Short(_))
            | (DeclaredKind::Int, Value::Int(_))
            | (DeclaredKind::Long, Value::Long(_))
            | (DeclaredKind::Float, Value::Float(_))
            | (DeclaredKind::Double, Value::Double(_))
            | (DeclaredKind::Char, Value::Char(_)) => true,
            (DeclaredKind::String, Value::Null | Value::Str(_)) => true,
            (
                DeclaredKind::Reference,
                Value::Null | Value::Str(_) | Value::Object(_) | Value::Array(_),
            ) => true,
            _ => false,
        }
    }
}

// Floats compare by bit pattern and references by identity, the same way
// boxed values compare.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(v) => write!(f, "Bool({v})"),
            Value::Byte(v) => write!(f, "Byte({v})"),
            Value::Short(v) => write!(f, "Short({v})"),
            Value::Int(v) => write!(f, "Int({v})"),
            Value::Long(v) => write!(f, "Long({v})"),
            Value::Float(v) => write!(f, "Float({v})"),
            Value::Double(v) => write!(f, "Double({v})"),
            Value::Char(v) => write!(f, "Char({v:?})"),
            Value::Str(v) => write!(f, "Str({v:?})"),
            // Objects may be cyclic, print identity only
            Value::Object(v) => write!(f, "Object({:p})", Arc::as_ptr(v)),
            Value::Array(v) => write!(f, "Array({:p})", Arc::as_ptr(v)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Value::Str(s)
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
}
