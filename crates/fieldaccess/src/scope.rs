//! Isolation Scopes
//!
//! Generated implementations are loaded into the scope of their target's
//! defining context, so implementations for same-named classes from unrelated
//! contexts never collide. Scopes are created on first use and kept for the
//! lifetime of the process; so is everything loaded into them.
//!
//! Both tables are `DashMap`s. Looking up an installed implementation takes a
//! shard read lock; installing one takes the write lock of a single shard of
//! that scope's own table, so unrelated classes never wait on each other.

use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use fieldaccess_model::{Class, ContextId, RESERVED_NAMESPACE};
use once_cell::sync::Lazy;
use rustc_hash::FxHasher;

use crate::emit::DispatchUnit;
use crate::error::LinkError;
use crate::generated::FieldAccessImpl;

/// Code-loading scope of one defining context
#[derive(Debug)]
pub struct AccessScope {
    context: ContextId,
    implementations: DashMap<String, Arc<FieldAccessImpl>>,
    emitted: AtomicUsize,
}

impl AccessScope {
    fn new(context: ContextId) -> Self {
        Self {
            context,
            implementations: DashMap::new(),
            emitted: AtomicUsize::new(0),
        }
    }

    /// Context this scope belongs to
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Whether code in this scope can refer to `class`
    ///
    /// Classes of the scope's own context and of the system context resolve.
    pub fn can_resolve(&self, class: &Class) -> bool {
        class.context() == self.context || class.context().is_system()
    }

    /// Find an installed implementation by name
    pub fn lookup(&self, name: &str) -> Option<Arc<FieldAccessImpl>> {
        self.implementations
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Install `unit` under `name`; the name must be free
    pub fn load(&self, name: &str, unit: DispatchUnit) -> Result<Arc<FieldAccessImpl>, LinkError> {
        self.check_definable(name, unit.target())?;
        match self.implementations.entry(name.to_string()) {
            Entry::Occupied(_) => Err(LinkError::DuplicateName(name.to_string())),
            Entry::Vacant(vacant) => Ok(self.install(vacant, name, unit)),
        }
    }

    /// Return the implementation installed under `name`, or emit and install
    /// one
    ///
    /// `emit` runs at most once per name for the lifetime of the scope, even
    /// when several threads race on the same name.
    pub fn get_or_load<F>(&self, name: &str, emit: F) -> Result<Arc<FieldAccessImpl>, LinkError>
    where
        F: FnOnce() -> Result<DispatchUnit, LinkError>,
    {
        if let Some(existing) = self.lookup(name) {
            tracing::trace!(name, "reusing installed implementation");
            return Ok(existing);
        }

        match self.implementations.entry(name.to_string()) {
            Entry::Occupied(occupied) => Ok(Arc::clone(occupied.get())),
            Entry::Vacant(vacant) => {
                let unit = emit()?;
                self.check_definable(name, unit.target())?;
                Ok(self.install(vacant, name, unit))
            }
        }
    }

    fn check_definable(&self, name: &str, target: &Class) -> Result<(), LinkError> {
        if name.starts_with(RESERVED_NAMESPACE) {
            return Err(LinkError::ReservedName(name.to_string()));
        }
        if !self.can_resolve(target) {
            return Err(LinkError::Unresolvable {
                class: target.name().to_string(),
                scope: self.context,
            });
        }
        Ok(())
    }

    fn install(
        &self,
        vacant: dashmap::mapref::entry::VacantEntry<'_, String, Arc<FieldAccessImpl>>,
        name: &str,
        unit: DispatchUnit,
    ) -> Arc<FieldAccessImpl> {
        let attributes = unit.len();
        let implementation = Arc::new(FieldAccessImpl::new(name.to_string(), unit));
        vacant.insert(Arc::clone(&implementation));
        self.emitted.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(name, attributes, context = %self.context, "installed implementation");
        implementation
    }

    /// Number of installed implementations
    pub fn len(&self) -> usize {
        self.implementations.len()
    }

    /// Whether nothing has been installed yet
    pub fn is_empty(&self) -> bool {
        self.implementations.is_empty()
    }

    /// Number of units ever installed (never exceeds `len`)
    pub fn emitted_count(&self) -> usize {
        self.emitted.load(Ordering::Relaxed)
    }

    /// Names of installed implementations, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .implementations
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }
}

static GLOBAL: Lazy<Arc<ScopeRegistry>> = Lazy::new(|| Arc::new(ScopeRegistry::new()));

/// Table of scopes keyed by defining context
#[derive(Debug)]
pub struct ScopeRegistry {
    scopes: DashMap<ContextId, Arc<AccessScope>, BuildHasherDefault<FxHasher>>,
}

impl ScopeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            scopes: DashMap::with_hasher(BuildHasherDefault::default()),
        }
    }

    /// The process-wide registry
    pub fn global() -> Arc<ScopeRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Scope for the defining context of `class`
    pub fn resolve(&self, class: &Class) -> Arc<AccessScope> {
        self.scope_for(class.context())
    }

    /// Scope for `context`, created on first use
    pub fn scope_for(&self, context: ContextId) -> Arc<AccessScope> {
        if let Some(scope) = self.scopes.get(&context) {
            return Arc::clone(scope.value());
        }

        let scope = self.scopes.entry(context).or_insert_with(|| {
            tracing::debug!(%context, "created access scope");
            Arc::new(AccessScope::new(context))
        });
        Arc::clone(scope.value())
    }

    /// Scope for `context`, if one was created
    pub fn get(&self, context: ContextId) -> Option<Arc<AccessScope>> {
        self.scopes.get(&context).map(|scope| Arc::clone(scope.value()))
    }

    /// Number of scopes
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether no scope was created yet
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl Default for ScopeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
