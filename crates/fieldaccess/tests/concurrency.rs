//! Concurrent Synthesis Tests
//!
//! Many threads asking for accessors at once must observe exactly one
//! installed implementation per class and scope, and never a half-built one.
//!
//! # Running Tests
//! ```bash
//! cargo test --test concurrency
//! ```

use fieldaccess::{
    AccessorConfig, AttributeAccess, Class, ContextId, DeclaredKind, FieldAccess, Instance,
    ScopeRegistry, Synthesizer,
};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 16;

fn isolated() -> Arc<Synthesizer> {
    Arc::new(Synthesizer::with_registry(
        AccessorConfig::default(),
        Arc::new(ScopeRegistry::new()),
    ))
}

#[test]
fn test_racing_requests_share_one_implementation() {
    let synth = isolated();
    let class = Class::builder("race.Counter")
        .context(ContextId::new())
        .field("hits", DeclaredKind::Long)
        .field("label", DeclaredKind::String)
        .build()
        .unwrap();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let synth = Arc::clone(&synth);
            let class = Arc::clone(&class);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                synth.accessor_for(&class).unwrap()
            })
        })
        .collect();

    let accessors: Vec<FieldAccess> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let first = accessors[0].implementation();
    assert!(accessors
        .iter()
        .all(|a| Arc::ptr_eq(a.implementation(), first)));

    let scope = synth.scopes().resolve(&class);
    assert_eq!(scope.len(), 1);
    assert_eq!(scope.emitted_count(), 1);
}

#[test]
fn test_unrelated_classes_in_parallel() {
    let synth = isolated();
    let ctx = ContextId::new();
    let classes: Vec<Arc<Class>> = (0..THREADS)
        .map(|i| {
            Class::builder(format!("race.Type{i}"))
                .context(ctx)
                .field("n", DeclaredKind::Int)
                .build()
                .unwrap()
        })
        .collect();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = classes
        .iter()
        .enumerate()
        .map(|(i, class)| {
            let synth = Arc::clone(&synth);
            let class = Arc::clone(class);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let access = synth.accessor_for(&class).unwrap();
                let mut obj = Instance::new(&class);
                let n = i32::try_from(i).unwrap();
                access.set_int(&mut obj, 0, n).unwrap();
                assert_eq!(access.get_int(&obj, 0), Ok(n));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let scope = synth.scopes().scope_for(ctx);
    assert_eq!(scope.len(), THREADS);
    assert_eq!(scope.emitted_count(), THREADS);
}

#[test]
fn test_contexts_do_not_share_implementations() {
    let synth = isolated();
    let barrier = Arc::new(Barrier::new(THREADS));

    // Same qualified name in every context
    let classes: Vec<Arc<Class>> = (0..THREADS)
        .map(|_| {
            Class::builder("race.Plugin")
                .context(ContextId::new())
                .field("state", DeclaredKind::Int)
                .build()
                .unwrap()
        })
        .collect();

    let handles: Vec<_> = classes
        .iter()
        .map(|class| {
            let synth = Arc::clone(&synth);
            let class = Arc::clone(class);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                synth.accessor_for(&class).unwrap()
            })
        })
        .collect();

    let accessors: Vec<FieldAccess> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for (access, class) in accessors.iter().zip(&classes) {
        assert!(Arc::ptr_eq(access.target(), class));
    }
    assert_eq!(synth.scopes().len(), THREADS);
}
