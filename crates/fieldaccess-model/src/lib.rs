//! Fieldaccess Object Model
//!
//! This crate provides the runtime object model the accessor engine works on:
//! - Declared kinds and the generic `Value` representation
//! - Classes with single inheritance, declared per level
//! - Instances with one storage slot per instance field
//! - Defining contexts that group classes
//!
//! It doubles as the type introspection boundary: a class reports the fields
//! declared at its own level and its parent, nothing more.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod class;
pub mod context;
pub mod instance;
pub mod kind;
pub mod value;

pub use class::{Class, ClassBuilder, ClassId, FieldDecl, Visibility};
pub use context::ContextId;
pub use instance::Instance;
pub use kind::{DeclaredKind, Primitive};
pub use value::{ArrayRef, ObjectRef, Value};

/// Namespace owned by the runtime itself.
///
/// Accessor scopes refuse to install implementation names under this prefix.
pub const RESERVED_NAMESPACE: &str = "std.";

/// Object model errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Two fields with the same name declared at one class level
    #[error("Duplicate field '{field}' in class {class}")]
    DuplicateField {
        /// Qualified class name
        class: String,
        /// Field name
        field: String,
    },

    /// Slot index outside the object layout
    #[error("Slot index {index} out of bounds (object has {count} slots)")]
    SlotOutOfBounds {
        /// Requested slot
        index: usize,
        /// Number of slots in the object
        count: usize,
    },
}

/// Object model result
pub type ModelResult<T> = Result<T, ModelError>;
