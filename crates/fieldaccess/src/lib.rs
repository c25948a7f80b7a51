//! Fieldaccess
//!
//! Fast indexed and named access to the instance fields of a class, without
//! going through generic reflection on every call.
//!
//! ## Pipeline
//!
//! 1. [`enumerate`] walks the class and its ancestors (leaf first) and lists
//!    the eligible fields: instance-level and not private. A field's index is
//!    its position in that list.
//! 2. [`ScopeRegistry`] maps the class's defining context to an
//!    [`AccessScope`], created on first use and kept for the process lifetime.
//! 3. [`Synthesizer`] derives the implementation name (`<qualified
//!    name>FieldAccess`), reuses the implementation already installed under
//!    that name in the scope, or describes and assembles a new
//!    [`DispatchUnit`] and installs it.
//! 4. A fresh [`FieldAccess`] wraps the shared implementation together with
//!    the ordered field names.
//!
//! ## Usage
//!
//! ```ignore
//! let point = Class::builder("geo.Point")
//!     .field("x", DeclaredKind::Int)
//!     .field("y", DeclaredKind::Int)
//!     .build()?;
//!
//! let access = FieldAccess::for_class(&point)?;
//! let mut p = Instance::new(&point);
//! access.set_int(&mut p, 0, 5)?;
//! assert_eq!(access.get(&p, 0)?, Value::Int(5));
//! assert_eq!(access.index_of("y")?, 1);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod access;
pub mod config;
pub mod emit;
pub mod enumerate;
pub mod error;
pub mod generated;
pub mod scope;
pub mod synth;

pub use access::{AttributeAccess, FieldAccess};
pub use config::AccessorConfig;
pub use emit::{assemble, Case, DispatchUnit, Family, RoutineSpec, SlotRef, UnitSpec};
pub use enumerate::{enumerate, AttributeDescriptor};
pub use error::{AccessError, AccessResult, ConfigError, LinkError};
pub use generated::FieldAccessImpl;
pub use scope::{AccessScope, ScopeRegistry};
pub use synth::{describe, Synthesizer};

pub use fieldaccess_model::{
    Class, ClassBuilder, ClassId, ContextId, DeclaredKind, FieldDecl, Instance, Primitive, Value,
    Visibility,
};

/// Build (or reuse) the accessor for `class` with the process-wide synthesizer
pub fn accessor_for(class: &std::sync::Arc<Class>) -> AccessResult<FieldAccess> {
    Synthesizer::global().accessor_for(class)
}
