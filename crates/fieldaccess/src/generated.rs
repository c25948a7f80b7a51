//! Generated implementations
//!
//! A [`FieldAccessImpl`] is a loaded dispatch unit under its derived name.
//! Every routine first casts the instance to the target class, then runs its
//! switch, then touches exactly one slot.

use std::sync::Arc;

use fieldaccess_model::{Class, DeclaredKind, Instance, Primitive, Value};

use crate::emit::DispatchUnit;
use crate::error::{AccessError, AccessResult};

/// One implementation of the accessor routines for one class
#[derive(Debug)]
pub struct FieldAccessImpl {
    name: String,
    unit: DispatchUnit,
}

impl FieldAccessImpl {
    pub(crate) fn new(name: String, unit: DispatchUnit) -> Self {
        Self { name, unit }
    }

    /// Derived implementation name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class the implementation was generated for
    pub fn target(&self) -> &Arc<Class> {
        self.unit.target()
    }

    /// Number of field indices handled
    pub fn attribute_count(&self) -> usize {
        self.unit.len()
    }

    /// Declared kind per field index
    pub fn kinds(&self) -> impl Iterator<Item = DeclaredKind> + '_ {
        self.unit.kinds()
    }

    #[inline]
    fn cast(&self, instance: &Instance) -> AccessResult<()> {
        let target = self.unit.target();
        if instance.is_instance_of(target) {
            Ok(())
        } else {
            Err(AccessError::InstanceMismatch {
                expected: target.name().to_string(),
                found: instance.class().name().to_string(),
            })
        }
    }

    /// Read any field, boxed
    pub fn get(&self, instance: &Instance, index: i32) -> AccessResult<Value> {
        self.cast(instance)?;
        let slot = self.unit.untyped(index)?;
        instance
            .slot(slot.slot)
            .cloned()
            .ok_or(AccessError::FieldNotFound(index))
    }

    /// Unbox `value` into any field
    pub fn set(&self, instance: &mut Instance, index: i32, value: Value) -> AccessResult<()> {
        self.cast(instance)?;
        let slot = self.unit.untyped(index)?;
        if !value.conforms_to(slot.kind) {
            return Err(AccessError::ValueMismatch {
                index,
                expected: slot.kind,
                found: value.type_name(),
            });
        }
        instance
            .store(slot.slot, value)
            .map_err(|_| AccessError::FieldNotFound(index))
    }

    /// Read a field declared as `T`
    #[inline]
    pub fn get_primitive<T: Primitive>(&self, instance: &Instance, index: i32) -> AccessResult<T> {
        self.cast(instance)?;
        let slot = self.unit.typed(T::KIND, index)?;
        let value = instance
            .slot(slot)
            .ok_or(AccessError::FieldNotFound(index))?;
        T::from_value(value).ok_or(AccessError::WrongKind {
            expected: T::KIND,
            index,
        })
    }

    /// Write a field declared as `T`
    #[inline]
    pub fn set_primitive<T: Primitive>(
        &self,
        instance: &mut Instance,
        index: i32,
        value: T,
    ) -> AccessResult<()> {
        self.cast(instance)?;
        let slot = self.unit.typed(T::KIND, index)?;
        instance
            .store(slot, value.into_value())
            .map_err(|_| AccessError::FieldNotFound(index))
    }

    /// Read a field declared as a string; null reads as `None`
    pub fn get_string<'a>(
        &self,
        instance: &'a Instance,
        index: i32,
    ) -> AccessResult<Option<&'a str>> {
        self.cast(instance)?;
        let slot = self.unit.typed(DeclaredKind::String, index)?;
        match instance.slot(slot) {
            Some(Value::Str(s)) => Ok(Some(&**s)),
            Some(Value::Null) => Ok(None),
            Some(_) => Err(AccessError::WrongKind {
                expected: DeclaredKind::String,
                index,
            }),
            None => Err(AccessError::FieldNotFound(index)),
        }
    }
}
