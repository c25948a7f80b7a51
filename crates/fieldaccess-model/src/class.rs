//! Class definitions and per-level field introspection
//!
//! A class declares its own fields and names at most one parent. Instance
//! fields are laid out parent-first, so a slot assigned to an inherited field
//! is the same in every subclass.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::context::ContextId;
use crate::kind::DeclaredKind;
use crate::{ModelError, ModelResult};

/// Unique class identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(u64);

impl ClassId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        ClassId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Field visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Visible everywhere
    #[default]
    Public,
    /// Visible to subclasses
    Protected,
    /// Visible within the defining namespace
    Package,
    /// Visible to the declaring class only
    Private,
}

/// A field as declared at one class level
#[derive(Debug, Clone)]
pub struct FieldDecl {
    name: Arc<str>,
    kind: DeclaredKind,
    visibility: Visibility,
    is_static: bool,
    slot: Option<usize>,
}

impl FieldDecl {
    /// Field name
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// Declared kind
    pub fn kind(&self) -> DeclaredKind {
        self.kind
    }

    /// Declared visibility
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether the field is class-level rather than per instance
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Whether the field is private to its declaring class
    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }

    /// Instance slot holding the field; static fields have none
    pub fn slot(&self) -> Option<usize> {
        self.slot
    }
}

/// Class definition metadata
#[derive(Debug)]
pub struct Class {
    id: ClassId,
    name: String,
    context: ContextId,
    parent: Option<Arc<Class>>,
    fields: Vec<FieldDecl>,
    instance_slots: usize,
}

impl Class {
    /// Start defining a class with a qualified name such as `geo.Point`
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    /// Class ID (unique per definition)
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Qualified class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Context the class was defined in
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Direct parent class (None when the class extends the root)
    pub fn parent(&self) -> Option<&Arc<Class>> {
        self.parent.as_ref()
    }

    /// Fields declared at this level only, in declaration order
    pub fn declared_fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// Look up a field declared at this level
    pub fn declared_field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    /// Number of instance slots, inherited ones included
    pub fn instance_slot_count(&self) -> usize {
        self.instance_slots
    }

    /// This class followed by its ancestors, leaf first
    pub fn ancestors(&self) -> impl Iterator<Item = &Class> {
        std::iter::successors(Some(self), |class| class.parent().map(|p| p.as_ref()))
    }

    /// Whether `self` is `other` or extends it
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.ancestors().any(|class| class.id == other.id)
    }
}

/// Builder for class definitions
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    name: String,
    context: ContextId,
    parent: Option<Arc<Class>>,
    fields: Vec<(String, DeclaredKind, Visibility, bool)>,
}

impl ClassBuilder {
    /// Create a builder for a class in the system context with no parent
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: ContextId::SYSTEM,
            parent: None,
            fields: Vec::new(),
        }
    }

    /// Define the class in `context`
    pub fn context(mut self, context: ContextId) -> Self {
        self.context = context;
        self
    }

    /// Extend `parent`
    pub fn extends(mut self, parent: &Arc<Class>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Declare a public instance field
    pub fn field(self, name: &str, kind: DeclaredKind) -> Self {
        self.declare(name, kind, Visibility::Public, false)
    }

    /// Declare a protected instance field
    pub fn protected_field(self, name: &str, kind: DeclaredKind) -> Self {
        self.declare(name, kind, Visibility::Protected, false)
    }

    /// Declare a package-visible instance field
    pub fn package_field(self, name: &str, kind: DeclaredKind) -> Self {
        self.declare(name, kind, Visibility::Package, false)
    }

    /// Declare a private instance field
    pub fn private_field(self, name: &str, kind: DeclaredKind) -> Self {
        self.declare(name, kind, Visibility::Private, false)
    }

    /// Declare a public static field
    pub fn static_field(self, name: &str, kind: DeclaredKind) -> Self {
        self.declare(name, kind, Visibility::Public, true)
    }

    /// Declare a field with explicit visibility and storage
    pub fn declare(
        mut self,
        name: &str,
        kind: DeclaredKind,
        visibility: Visibility,
        is_static: bool,
    ) -> Self {
        self.fields.push((name.to_string(), kind, visibility, is_static));
        self
    }

    /// Lay out the fields and finish the class
    pub fn build(self) -> ModelResult<Arc<Class>> {
        let mut next_slot = self.parent.as_ref().map_or(0, |p| p.instance_slots);
        let mut fields: Vec<FieldDecl> = Vec::with_capacity(self.fields.len());

        for (name, kind, visibility, is_static) in self.fields {
            if fields.iter().any(|f| *f.name == *name) {
                return Err(ModelError::DuplicateField {
                    class: self.name,
                    field: name,
                });
            }

            let slot = (!is_static).then(|| {
                next_slot += 1;
                next_slot - 1
            });

            fields.push(FieldDecl {
                name: Arc::from(name),
                kind,
                visibility,
                is_static,
                slot,
            });
        }

        Ok(Arc::new(Class {
            id: ClassId::next(),
            name: self.name,
            context: self.context,
            parent: self.parent,
            fields,
            instance_slots: next_slot,
        }))
    }
}
