//! Dispatch Unit Assembly
//!
//! Turns a structured description of the accessor routines into a loadable
//! [`DispatchUnit`]. A routine is an indexed switch: one [`Case`] per field
//! index, with every index past the last case falling through to "not
//! found". Assembly flattens each routine into a dense table, so a call costs
//! one bounds check and one load before the slot access itself.
//!
//! | Family            | Cases                                              |
//! |-------------------|----------------------------------------------------|
//! | `Untyped`         | `Access` for every index                           |
//! | `Typed(kind)`     | `Access` where the kind matches, else `WrongKind`  |
//!
//! One `Untyped` routine and one `Typed` routine per entry of
//! [`DeclaredKind::TYPED`] make up a complete unit.

use std::sync::Arc;

use fieldaccess_model::{Class, DeclaredKind};

use crate::error::{AccessError, AccessResult, LinkError};

/// One arm of an indexed switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// Read or write `slot`, holding a field of `kind`
    Access {
        /// Instance slot
        slot: usize,
        /// Declared kind of the field
        kind: DeclaredKind,
    },
    /// The field exists but the routine does not handle its kind
    WrongKind,
}

/// Operation family a routine implements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Boxed get/set over every field
    Untyped,
    /// Specialized get/set for one kind
    Typed(DeclaredKind),
}

/// Description of one routine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineSpec {
    /// Family implemented
    pub family: Family,
    /// Case per field index
    pub cases: Vec<Case>,
}

/// Description of a complete unit
#[derive(Debug, Clone)]
pub struct UnitSpec {
    /// Class the routines cast instances to
    pub target: Arc<Class>,
    /// Routines, in any order
    pub routines: Vec<RoutineSpec>,
}

/// Slot and kind resolved by the untyped routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef {
    /// Instance slot
    pub slot: usize,
    /// Declared kind of the field
    pub kind: DeclaredKind,
}

const TYPED_FAMILIES: usize = DeclaredKind::TYPED.len();

/// Assembled routines for one target class
#[derive(Debug)]
pub struct DispatchUnit {
    target: Arc<Class>,
    untyped: Box<[SlotRef]>,
    // `None` marks a wrong-kind index
    typed: [Box<[Option<usize>]>; TYPED_FAMILIES],
}

impl DispatchUnit {
    /// Class the routines were assembled for
    pub fn target(&self) -> &Arc<Class> {
        &self.target
    }

    /// Number of field indices handled
    pub fn len(&self) -> usize {
        self.untyped.len()
    }

    /// Whether the unit handles no index at all
    pub fn is_empty(&self) -> bool {
        self.untyped.is_empty()
    }

    /// Declared kind per field index
    pub fn kinds(&self) -> impl Iterator<Item = DeclaredKind> + '_ {
        self.untyped.iter().map(|s| s.kind)
    }

    /// Run the untyped switch
    #[inline]
    pub fn untyped(&self, index: i32) -> AccessResult<SlotRef> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.untyped.get(i))
            .copied()
            .ok_or(AccessError::FieldNotFound(index))
    }

    /// Run the switch specialized for `kind`
    #[inline]
    pub fn typed(&self, kind: DeclaredKind, index: i32) -> AccessResult<usize> {
        let case = usize::try_from(index)
            .ok()
            .and_then(|i| self.untyped.get(i).map(|_| i))
            .map(|i| self.typed.get(kind.ordinal()).and_then(|table| table[i]));

        match case {
            Some(Some(slot)) => Ok(slot),
            Some(None) => Err(AccessError::WrongKind {
                expected: kind,
                index,
            }),
            None => Err(AccessError::FieldNotFound(index)),
        }
    }
}

/// Assemble a unit from its description
///
/// Fails if a routine is missing or duplicated, if routines disagree on the
/// number of indices, if a case contradicts its family, or if a case
/// addresses a slot outside the target layout.
pub fn assemble(spec: UnitSpec) -> Result<DispatchUnit, LinkError> {
    let UnitSpec { target, routines } = spec;
    let slots = target.instance_slot_count();

    let mut untyped: Option<Box<[SlotRef]>> = None;
    let mut typed: [Option<Box<[Option<usize>]>>; TYPED_FAMILIES] = Default::default();

    for routine in routines {
        for case in &routine.cases {
            if let Case::Access { slot, .. } = *case {
                if slot >= slots {
                    return Err(LinkError::SlotOutOfRange {
                        class: target.name().to_string(),
                        slot,
                        slots,
                    });
                }
            }
        }

        match routine.family {
            Family::Untyped => {
                let table = routine
                    .cases
                    .iter()
                    .map(|case| match *case {
                        Case::Access { slot, kind } => Ok(SlotRef { slot, kind }),
                        Case::WrongKind => Err(LinkError::MalformedRoutine(
                            "untyped routine has a wrong-kind case".to_string(),
                        )),
                    })
                    .collect::<Result<Box<[_]>, _>>()?;
                if untyped.replace(table).is_some() {
                    return Err(LinkError::MalformedRoutine(
                        "duplicate untyped routine".to_string(),
                    ));
                }
            }
            Family::Typed(kind) => {
                let entry = typed.get_mut(kind.ordinal()).ok_or_else(|| {
                    LinkError::MalformedRoutine(format!("no specialized routine for {kind}"))
                })?;
                let table = routine
                    .cases
                    .iter()
                    .map(|case| match *case {
                        Case::Access { slot, kind: k } if k == kind => Ok(Some(slot)),
                        Case::Access { kind: k, .. } => Err(LinkError::MalformedRoutine(
                            format!("{kind} routine accesses a {k} field"),
                        )),
                        Case::WrongKind => Ok(None),
                    })
                    .collect::<Result<Box<[_]>, _>>()?;
                if entry.replace(table).is_some() {
                    return Err(LinkError::MalformedRoutine(format!(
                        "duplicate {kind} routine"
                    )));
                }
            }
        }
    }

    let untyped = untyped
        .ok_or_else(|| LinkError::MalformedRoutine("missing untyped routine".to_string()))?;

    let mut tables: [Box<[Option<usize>]>; TYPED_FAMILIES] = Default::default();
    for (i, (table, kind)) in typed.into_iter().zip(DeclaredKind::TYPED).enumerate() {
        let table =
            table.ok_or_else(|| LinkError::MalformedRoutine(format!("missing {kind} routine")))?;
        if table.len() != untyped.len() {
            return Err(LinkError::MalformedRoutine(format!(
                "{kind} routine has {} cases, untyped has {}",
                table.len(),
                untyped.len()
            )));
        }
        tables[i] = table;
    }

    Ok(DispatchUnit {
        target,
        untyped,
        typed: tables,
    })
}
