//! Error types

use std::path::PathBuf;

use fieldaccess_model::{ContextId, DeclaredKind};

/// Failures while assembling a dispatch unit or loading it into a scope
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// Name already taken in the scope
    #[error("Implementation {0} is already defined in this scope")]
    DuplicateName(String),

    /// Name lies in the runtime's own namespace
    #[error("Prohibited name {0}: reserved namespace")]
    ReservedName(String),

    /// Target class cannot be resolved from the scope
    #[error("Class {class} is not visible from {scope}")]
    Unresolvable {
        /// Qualified class name
        class: String,
        /// Context of the scope
        scope: ContextId,
    },

    /// Installed implementation targets another definition of the class
    #[error("Implementation {name} was generated for a different definition of {class}")]
    Redefined {
        /// Implementation name
        name: String,
        /// Qualified class name
        class: String,
    },

    /// A case refers to a slot outside the target's layout
    #[error("Slot {slot} is outside the layout of {class} ({slots} slots)")]
    SlotOutOfRange {
        /// Qualified class name
        class: String,
        /// Offending slot
        slot: usize,
        /// Slots in the layout
        slots: usize,
    },

    /// A routine is missing, duplicated, or inconsistent with the others
    #[error("Malformed routine: {0}")]
    MalformedRoutine(String),
}

/// Field access errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// No eligible field at this index
    #[error("Field not found: {0}")]
    FieldNotFound(i32),

    /// No eligible field with this name
    #[error("Unable to find public field: {0}")]
    NamedFieldNotFound(String),

    /// Field exists but is declared with another kind than the routine's
    #[error("The field is not declared as {expected}: {index}")]
    WrongKind {
        /// Kind of the specialized routine that was invoked
        expected: DeclaredKind,
        /// Requested index
        index: i32,
    },

    /// Instance is not of the accessor's class or a subclass
    #[error("{found} cannot be cast to {expected}")]
    InstanceMismatch {
        /// Accessor's class
        expected: String,
        /// Instance's class
        found: String,
    },

    /// Untyped store of a value that does not conform to the field's kind
    #[error("Cannot store {found} into field {index} declared as {expected}")]
    ValueMismatch {
        /// Requested index
        index: i32,
        /// Declared kind of the field
        expected: DeclaredKind,
        /// Runtime type of the offered value
        found: &'static str,
    },

    /// The implementation could not be assembled or loaded
    #[error("Error constructing field access class: {name}")]
    Construction {
        /// Derived implementation name
        name: String,
        /// Underlying failure
        #[source]
        source: LinkError,
    },
}

impl AccessError {
    /// Whether this is a not-found failure, by index or by name
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AccessError::FieldNotFound(_) | AccessError::NamedFieldNotFound(_)
        )
    }
}

/// Field access result
pub type AccessResult<T> = Result<T, AccessError>;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The TOML was invalid or did not match the schema
    #[error("Invalid accessor configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
