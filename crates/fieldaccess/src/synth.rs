//! Accessor Synthesis
//!
//! The synthesizer ties the pipeline together: enumerate the fields, resolve
//! the scope, derive the implementation name, and reuse or emit the
//! implementation.
//!
//! ## Routine shapes
//!
//! For a class with fields `[b: String, a: int]` the described unit is:
//!
//! | Routine      | index 0             | index 1          | otherwise |
//! |--------------|---------------------|------------------|-----------|
//! | untyped      | slot of `b`, String | slot of `a`, int | not found |
//! | `int`        | wrong kind          | slot of `a`      | not found |
//! | `String`     | slot of `b`         | wrong kind       | not found |
//! | other kinds  | wrong kind          | wrong kind       | not found |

use std::sync::Arc;

use fieldaccess_model::{Class, DeclaredKind};
use once_cell::sync::Lazy;

use crate::access::FieldAccess;
use crate::config::AccessorConfig;
use crate::emit::{assemble, Case, Family, RoutineSpec, UnitSpec};
use crate::enumerate::{enumerate, AttributeDescriptor};
use crate::error::{AccessError, AccessResult, LinkError};
use crate::generated::FieldAccessImpl;
use crate::scope::{AccessScope, ScopeRegistry};

static GLOBAL: Lazy<Synthesizer> = Lazy::new(Synthesizer::default);

/// Builds and caches accessor implementations
#[derive(Debug, Clone)]
pub struct Synthesizer {
    config: AccessorConfig,
    scopes: Arc<ScopeRegistry>,
}

impl Synthesizer {
    /// Synthesizer over the process-wide scope registry
    pub fn new(config: AccessorConfig) -> Self {
        Self::with_registry(config, ScopeRegistry::global())
    }

    /// Synthesizer over a dedicated scope registry
    pub fn with_registry(config: AccessorConfig, scopes: Arc<ScopeRegistry>) -> Self {
        Self { config, scopes }
    }

    /// The process-wide synthesizer, with the default configuration
    pub fn global() -> &'static Synthesizer {
        &GLOBAL
    }

    /// Naming configuration
    pub fn config(&self) -> &AccessorConfig {
        &self.config
    }

    /// Scope registry implementations are loaded into
    pub fn scopes(&self) -> &Arc<ScopeRegistry> {
        &self.scopes
    }

    /// Derived implementation name for `class`
    pub fn implementation_name(&self, class: &Class) -> String {
        self.config.implementation_name(class.name())
    }

    /// Build an accessor for `class`, reusing its implementation if one is
    /// already installed
    #[tracing::instrument(level = "debug", skip_all, fields(class = %class.name()))]
    pub fn accessor_for(&self, class: &Arc<Class>) -> AccessResult<FieldAccess> {
        let attributes = enumerate(class);
        let scope = self.scopes.resolve(class);
        let implementation = self.synthesize(class, &attributes, &scope)?;
        Ok(FieldAccess::new(implementation, &attributes))
    }

    /// Return the implementation for `class` from `scope`, emitting and
    /// installing it on first request
    pub fn synthesize(
        &self,
        class: &Arc<Class>,
        attributes: &[AttributeDescriptor],
        scope: &AccessScope,
    ) -> AccessResult<Arc<FieldAccessImpl>> {
        let name = self.implementation_name(class);

        let result = scope
            .get_or_load(&name, || assemble(describe(class, attributes)))
            .and_then(|implementation| {
                // Same name, different definition: never hand out a unit laid
                // out for another class.
                if implementation.target().id() == class.id() {
                    Ok(implementation)
                } else {
                    Err(LinkError::Redefined {
                        name: name.clone(),
                        class: class.name().to_string(),
                    })
                }
            });

        result.map_err(|source| {
            tracing::warn!(name = %name, error = %source, "failed to construct field access");
            AccessError::Construction { name, source }
        })
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(AccessorConfig::default())
    }
}

/// Describe the accessor routines for `class`
///
/// `attributes` must come from [`enumerate`] on the same class.
pub fn describe(class: &Arc<Class>, attributes: &[AttributeDescriptor]) -> UnitSpec {
    let mut routines = Vec::with_capacity(1 + DeclaredKind::TYPED.len());
    routines.push(untyped_routine(attributes));
    routines.extend(
        DeclaredKind::TYPED
            .into_iter()
            .map(|kind| typed_routine(kind, attributes)),
    );

    UnitSpec {
        target: Arc::clone(class),
        routines,
    }
}

fn untyped_routine(attributes: &[AttributeDescriptor]) -> RoutineSpec {
    RoutineSpec {
        family: Family::Untyped,
        cases: attributes
            .iter()
            .map(|a| Case::Access {
                slot: a.slot,
                kind: a.kind,
            })
            .collect(),
    }
}

fn typed_routine(kind: DeclaredKind, attributes: &[AttributeDescriptor]) -> RoutineSpec {
    RoutineSpec {
        family: Family::Typed(kind),
        cases: attributes
            .iter()
            .map(|a| {
                if a.kind == kind {
                    Case::Access {
                        slot: a.slot,
                        kind,
                    }
                } else {
                    Case::WrongKind
                }
            })
            .collect(),
    }
}
