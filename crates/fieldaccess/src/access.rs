//! Accessor Contract
//!
//! [`AttributeAccess`] is the contract every accessor fulfils: an untyped
//! get/set pair, a get/set pair per primitive kind, a string getter, and
//! name-based variants resolved through [`AttributeAccess::index_of`].
//!
//! Indices are `i32`. Every non-negative index is exactly one of handled,
//! wrong kind, or not found for a given routine; negative indices are always
//! not found. A failed call leaves the instance unchanged.

use std::sync::Arc;

use fieldaccess_model::{Class, DeclaredKind, Instance, Primitive, Value};

use crate::enumerate::AttributeDescriptor;
use crate::error::{AccessError, AccessResult};
use crate::generated::FieldAccessImpl;
use crate::synth::Synthesizer;

/// Indexed and named access to the eligible fields of one class
pub trait AttributeAccess {
    /// Names of the eligible fields, by index
    fn attribute_names(&self) -> &[Arc<str>];

    /// Index of the first field named `name`
    ///
    /// When a subclass shadows an ancestor field, this finds the subclass
    /// field; the ancestor field stays reachable by its own index.
    fn index_of(&self, name: &str) -> AccessResult<i32> {
        self.attribute_names()
            .iter()
            .position(|n| &**n == name)
            .and_then(|i| i32::try_from(i).ok())
            .ok_or_else(|| AccessError::NamedFieldNotFound(name.to_string()))
    }

    /// Read any field, boxed
    fn get(&self, instance: &Instance, index: i32) -> AccessResult<Value>;

    /// Write any field from a boxed value
    fn set(&self, instance: &mut Instance, index: i32, value: Value) -> AccessResult<()>;

    /// Read a `boolean` field
    fn get_boolean(&self, instance: &Instance, index: i32) -> AccessResult<bool>;
    /// Read a `byte` field
    fn get_byte(&self, instance: &Instance, index: i32) -> AccessResult<i8>;
    /// Read a `short` field
    fn get_short(&self, instance: &Instance, index: i32) -> AccessResult<i16>;
    /// Read an `int` field
    fn get_int(&self, instance: &Instance, index: i32) -> AccessResult<i32>;
    /// Read a `long` field
    fn get_long(&self, instance: &Instance, index: i32) -> AccessResult<i64>;
    /// Read a `float` field
    fn get_float(&self, instance: &Instance, index: i32) -> AccessResult<f32>;
    /// Read a `double` field
    fn get_double(&self, instance: &Instance, index: i32) -> AccessResult<f64>;
    /// Read a `char` field
    fn get_char(&self, instance: &Instance, index: i32) -> AccessResult<char>;

    /// Write a `boolean` field
    fn set_boolean(&self, instance: &mut Instance, index: i32, value: bool) -> AccessResult<()>;
    /// Write a `byte` field
    fn set_byte(&self, instance: &mut Instance, index: i32, value: i8) -> AccessResult<()>;
    /// Write a `short` field
    fn set_short(&self, instance: &mut Instance, index: i32, value: i16) -> AccessResult<()>;
    /// Write an `int` field
    fn set_int(&self, instance: &mut Instance, index: i32, value: i32) -> AccessResult<()>;
    /// Write a `long` field
    fn set_long(&self, instance: &mut Instance, index: i32, value: i64) -> AccessResult<()>;
    /// Write a `float` field
    fn set_float(&self, instance: &mut Instance, index: i32, value: f32) -> AccessResult<()>;
    /// Write a `double` field
    fn set_double(&self, instance: &mut Instance, index: i32, value: f64) -> AccessResult<()>;
    /// Write a `char` field
    fn set_char(&self, instance: &mut Instance, index: i32, value: char) -> AccessResult<()>;

    /// Read a `String` field; null reads as `None`
    fn get_string<'a>(
        &self,
        instance: &'a Instance,
        index: i32,
    ) -> AccessResult<Option<&'a str>>;

    /// Read any field by name
    fn get_named(&self, instance: &Instance, name: &str) -> AccessResult<Value> {
        let index = self.index_of(name)?;
        self.get(instance, index)
    }

    /// Write any field by name
    fn set_named(&self, instance: &mut Instance, name: &str, value: Value) -> AccessResult<()> {
        let index = self.index_of(name)?;
        self.set(instance, index, value)
    }
}

/// Accessor for one class
///
/// Cheap to clone. Accessors built for the same class share one
/// implementation.
#[derive(Debug, Clone)]
pub struct FieldAccess {
    implementation: Arc<FieldAccessImpl>,
    field_names: Arc<[Arc<str>]>,
}

impl FieldAccess {
    /// Build (or reuse) the accessor for `class` with the process-wide
    /// synthesizer
    pub fn for_class(class: &Arc<Class>) -> AccessResult<Self> {
        Synthesizer::global().accessor_for(class)
    }

    pub(crate) fn new(
        implementation: Arc<FieldAccessImpl>,
        attributes: &[AttributeDescriptor],
    ) -> Self {
        Self {
            implementation,
            field_names: attributes.iter().map(|a| Arc::clone(&a.name)).collect(),
        }
    }

    /// Shared implementation behind this accessor
    pub fn implementation(&self) -> &Arc<FieldAccessImpl> {
        &self.implementation
    }

    /// Derived implementation name
    pub fn implementation_name(&self) -> &str {
        self.implementation.name()
    }

    /// Class this accessor was built for
    pub fn target(&self) -> &Arc<Class> {
        self.implementation.target()
    }

    /// Number of eligible fields
    pub fn attribute_count(&self) -> usize {
        self.field_names.len()
    }

    /// Declared kind per index
    pub fn attribute_kinds(&self) -> Vec<DeclaredKind> {
        self.implementation.kinds().collect()
    }

    /// Read a primitive field of type `T`
    pub fn get_primitive<T: Primitive>(&self, instance: &Instance, index: i32) -> AccessResult<T> {
        self.implementation.get_primitive(instance, index)
    }

    /// Write a primitive field of type `T`
    pub fn set_primitive<T: Primitive>(
        &self,
        instance: &mut Instance,
        index: i32,
        value: T,
    ) -> AccessResult<()> {
        self.implementation.set_primitive(instance, index, value)
    }
}

macro_rules! primitive_accessors {
    ($($get:ident, $set:ident => $ty:ty;)*) => {
        $(
            #[inline]
            fn $get(&self, instance: &Instance, index: i32) -> AccessResult<$ty> {
                self.implementation.get_primitive::<$ty>(instance, index)
            }

            #[inline]
            fn $set(&self, instance: &mut Instance, index: i32, value: $ty) -> AccessResult<()> {
                self.implementation.set_primitive::<$ty>(instance, index, value)
            }
        )*
    };
}

impl AttributeAccess for FieldAccess {
    fn attribute_names(&self) -> &[Arc<str>] {
        &self.field_names
    }

    #[inline]
    fn get(&self, instance: &Instance, index: i32) -> AccessResult<Value> {
        self.implementation.get(instance, index)
    }

    #[inline]
    fn set(&self, instance: &mut Instance, index: i32, value: Value) -> AccessResult<()> {
        self.implementation.set(instance, index, value)
    }

    primitive_accessors! {
        get_boolean, set_boolean => bool;
        get_byte, set_byte => i8;
        get_short, set_short => i16;
        get_int, set_int => i32;
        get_long, set_long => i64;
        get_float, set_float => f32;
        get_double, set_double => f64;
        get_char, set_char => char;
    }

    #[inline]
    fn get_string<'a>(
        &self,
        instance: &'a Instance,
        index: i32,
    ) -> AccessResult<Option<&'a str>> {
        self.implementation.get_string(instance, index)
    }
}
