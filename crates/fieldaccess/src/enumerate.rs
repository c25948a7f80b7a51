//! Attribute enumeration

use std::sync::Arc;

use fieldaccess_model::{Class, ClassId, DeclaredKind, FieldDecl};

/// An eligible field, positioned by its accessor index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDescriptor {
    /// Field name
    pub name: Arc<str>,
    /// Declared kind
    pub kind: DeclaredKind,
    /// Instance slot holding the field
    pub slot: usize,
    /// Class level that declared the field
    pub declared_by: ClassId,
}

impl AttributeDescriptor {
    fn new(level: &Class, field: &FieldDecl) -> Option<Self> {
        Some(Self {
            name: Arc::clone(field.name()),
            kind: field.kind(),
            slot: field.slot()?,
            declared_by: level.id(),
        })
    }
}

/// List the accessible fields of `class`, leaf level first
///
/// A field is eligible when it is an instance field and not private at its
/// level. Within a level, declaration order is kept. A subclass field that
/// shadows an ancestor field does not hide it: both are listed, and name
/// lookup finds the leaf-most one.
pub fn enumerate(class: &Class) -> Vec<AttributeDescriptor> {
    class
        .ancestors()
        .flat_map(|level| {
            level
                .declared_fields()
                .iter()
                .filter(|field| is_eligible(field))
                .filter_map(move |field| AttributeDescriptor::new(level, field))
        })
        .collect()
}

fn is_eligible(field: &FieldDecl) -> bool {
    !field.is_static() && !field.is_private()
}
