//! Object instances

use std::sync::Arc;

use parking_lot::RwLock;

use crate::class::{Class, FieldDecl};
use crate::value::{ObjectRef, Value};
use crate::{ModelError, ModelResult};

/// Object instance
///
/// Holds one slot per instance field of its class and every ancestor,
/// private fields included. `slot`/`store` are the raw field read and write
/// primitives; they check bounds but not kinds.
#[derive(Debug, Clone)]
pub struct Instance {
    class: Arc<Class>,
    slots: Box<[Value]>,
}

impl Instance {
    /// Allocate an instance with every field at its zero value
    pub fn new(class: &Arc<Class>) -> Self {
        let mut slots = vec![Value::Null; class.instance_slot_count()];
        for level in class.ancestors() {
            for field in level.declared_fields() {
                if let Some(slot) = field.slot() {
                    slots[slot] = Value::zero(field.kind());
                }
            }
        }

        Self {
            class: Arc::clone(class),
            slots: slots.into_boxed_slice(),
        }
    }

    /// Class of this instance
    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    /// Whether this instance's class is `class` or extends it
    #[inline]
    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.class.id() == class.id() || self.class.is_subclass_of(class)
    }

    /// Number of slots
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Read a slot
    #[inline]
    pub fn slot(&self, slot: usize) -> Option<&Value> {
        self.slots.get(slot)
    }

    /// Overwrite a slot
    #[inline]
    pub fn store(&mut self, slot: usize, value: Value) -> ModelResult<()> {
        let count = self.slots.len();
        match self.slots.get_mut(slot) {
            Some(target) => {
                *target = value;
                Ok(())
            }
            None => Err(ModelError::SlotOutOfBounds { index: slot, count }),
        }
    }

    /// Read a field by name, ignoring visibility
    ///
    /// The leaf-most declaration wins when a subclass shadows a field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.class
            .ancestors()
            .find_map(|level| level.declared_field(name).and_then(FieldDecl::slot))
            .and_then(|slot| self.slots.get(slot))
    }

    /// Move this instance to the heap
    pub fn into_ref(self) -> ObjectRef {
        Arc::new(RwLock::new(self))
    }
}
