//! Property-based tests for accessor dispatch.
//!
//! Random field layouts check that every index has exactly one outcome per
//! routine: handled when the kind matches, wrong kind when it does not, and
//! not found outside the field list. Random values check that writes through
//! the typed and the untyped routines read back unchanged.

use fieldaccess::{
    AccessError, AccessorConfig, AttributeAccess, Class, ContextId, DeclaredKind, FieldAccess,
    Instance, ScopeRegistry, Synthesizer, Value,
};
use once_cell::sync::Lazy;
use proptest::prelude::*;
use std::sync::Arc;

const ALL_KINDS: [DeclaredKind; 10] = [
    DeclaredKind::Boolean,
    DeclaredKind::Byte,
    DeclaredKind::Short,
    DeclaredKind::Int,
    DeclaredKind::Long,
    DeclaredKind::Float,
    DeclaredKind::Double,
    DeclaredKind::Char,
    DeclaredKind::String,
    DeclaredKind::Reference,
];

/// One field of every kind, in `ALL_KINDS` order
static FIXTURE: Lazy<(Arc<Class>, FieldAccess)> = Lazy::new(|| {
    let mut builder = Class::builder("prop.Fixture").context(ContextId::new());
    for (i, kind) in ALL_KINDS.into_iter().enumerate() {
        builder = builder.field(&format!("f{i}"), kind);
    }
    let class = builder.build().unwrap();
    let access = FieldAccess::for_class(&class).unwrap();
    (class, access)
});

fn accessor_over(kinds: &[DeclaredKind]) -> (Arc<Class>, FieldAccess) {
    let mut builder = Class::builder("prop.Layout").context(ContextId::new());
    for (i, kind) in kinds.iter().enumerate() {
        builder = builder.field(&format!("f{i}"), *kind);
    }
    let class = builder.build().unwrap();
    let synth =
        Synthesizer::with_registry(AccessorConfig::default(), Arc::new(ScopeRegistry::new()));
    let access = synth.accessor_for(&class).unwrap();
    (class, access)
}

/// Run the specialized read routine for `kind`, discarding the value
fn read_as(
    access: &FieldAccess,
    obj: &Instance,
    kind: DeclaredKind,
    index: i32,
) -> Result<(), AccessError> {
    match kind {
        DeclaredKind::Boolean => access.get_boolean(obj, index).map(drop),
        DeclaredKind::Byte => access.get_byte(obj, index).map(drop),
        DeclaredKind::Short => access.get_short(obj, index).map(drop),
        DeclaredKind::Int => access.get_int(obj, index).map(drop),
        DeclaredKind::Long => access.get_long(obj, index).map(drop),
        DeclaredKind::Float => access.get_float(obj, index).map(drop),
        DeclaredKind::Double => access.get_double(obj, index).map(drop),
        DeclaredKind::Char => access.get_char(obj, index).map(drop),
        DeclaredKind::String => access.get_string(obj, index).map(drop),
        DeclaredKind::Reference => access.get(obj, index).map(drop),
    }
}

fn kind_strategy() -> impl Strategy<Value = DeclaredKind> {
    prop::sample::select(ALL_KINDS.to_vec())
}

/// Floats with the bit patterns that value-equality would get wrong
fn float_strategy() -> impl Strategy<Value = f32> {
    prop_oneof![Just(f32::NAN), Just(-0.0f32), Just(f32::INFINITY), any::<f32>()]
}

fn double_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(f64::NAN), Just(-0.0f64), Just(f64::NEG_INFINITY), any::<f64>()]
}

fn string_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![Just(Value::Null), ".{0,24}".prop_map(Value::from)]
}

fn reference_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(Value::from("text")),
        prop::collection::vec(any::<i32>().prop_map(Value::Int), 0..4).prop_map(Value::array),
    ]
}

fn index_of_kind(kind: DeclaredKind) -> i32 {
    i32::try_from(kind.ordinal()).unwrap()
}

proptest! {
    #[test]
    fn every_index_has_one_outcome(
        kinds in prop::collection::vec(kind_strategy(), 0..12),
        extra in 0i32..4,
    ) {
        let (class, access) = accessor_over(&kinds);
        let obj = Instance::new(&class);
        let len = i32::try_from(kinds.len()).unwrap();

        prop_assert_eq!(access.attribute_kinds(), kinds.clone());

        for (i, declared) in kinds.iter().enumerate() {
            let index = i32::try_from(i).unwrap();
            prop_assert!(access.get(&obj, index).is_ok());
            for routine in DeclaredKind::TYPED {
                let outcome = read_as(&access, &obj, routine, index);
                if routine == *declared {
                    prop_assert!(outcome.is_ok());
                } else {
                    prop_assert_eq!(
                        outcome,
                        Err(AccessError::WrongKind { expected: routine, index })
                    );
                }
            }
        }

        let past = len + extra;
        for routine in ALL_KINDS {
            prop_assert_eq!(
                read_as(&access, &obj, routine, past),
                Err(AccessError::FieldNotFound(past))
            );
        }
    }

    #[test]
    fn field_names_are_stable_across_builds(
        kinds in prop::collection::vec(kind_strategy(), 0..12),
    ) {
        let (class, first) = accessor_over(&kinds);
        let second = FieldAccess::for_class(&class).unwrap();
        let (_, rebuilt) = accessor_over(&kinds);

        prop_assert_eq!(first.attribute_names(), second.attribute_names());
        prop_assert_eq!(first.attribute_names(), rebuilt.attribute_names());
    }

    #[test]
    fn negative_indices_are_not_found(index in i32::MIN..0) {
        let (class, access) = &*FIXTURE;
        let mut obj = Instance::new(class);
        let not_found = AccessError::FieldNotFound(index);

        prop_assert_eq!(access.get(&obj, index), Err(not_found.clone()));
        prop_assert_eq!(access.get_int(&obj, index), Err(not_found.clone()));
        prop_assert_eq!(access.set_long(&mut obj, index, 1), Err(not_found.clone()));
        prop_assert_eq!(access.get_string(&obj, index), Err(not_found));
    }

    #[test]
    fn typed_writes_read_back(
        z in any::<bool>(),
        b in any::<i8>(),
        s in any::<i16>(),
        i in any::<i32>(),
        j in any::<i64>(),
        f in float_strategy(),
        d in double_strategy(),
        c in any::<char>(),
        t in ".{0,24}",
    ) {
        let (class, access) = &*FIXTURE;
        let mut obj = Instance::new(class);
        let at = index_of_kind;

        access.set_boolean(&mut obj, at(DeclaredKind::Boolean), z).unwrap();
        access.set_byte(&mut obj, at(DeclaredKind::Byte), b).unwrap();
        access.set_short(&mut obj, at(DeclaredKind::Short), s).unwrap();
        access.set_int(&mut obj, at(DeclaredKind::Int), i).unwrap();
        access.set_long(&mut obj, at(DeclaredKind::Long), j).unwrap();
        access.set_float(&mut obj, at(DeclaredKind::Float), f).unwrap();
        access.set_double(&mut obj, at(DeclaredKind::Double), d).unwrap();
        access.set_char(&mut obj, at(DeclaredKind::Char), c).unwrap();
        access.set(&mut obj, at(DeclaredKind::String), Value::from(t.as_str())).unwrap();

        prop_assert_eq!(access.get_boolean(&obj, at(DeclaredKind::Boolean)), Ok(z));
        prop_assert_eq!(access.get_byte(&obj, at(DeclaredKind::Byte)), Ok(b));
        prop_assert_eq!(access.get_short(&obj, at(DeclaredKind::Short)), Ok(s));
        prop_assert_eq!(access.get_int(&obj, at(DeclaredKind::Int)), Ok(i));
        prop_assert_eq!(access.get_long(&obj, at(DeclaredKind::Long)), Ok(j));
        prop_assert_eq!(
            access.get_float(&obj, at(DeclaredKind::Float)).map(f32::to_bits),
            Ok(f.to_bits())
        );
        prop_assert_eq!(
            access.get_double(&obj, at(DeclaredKind::Double)).map(f64::to_bits),
            Ok(d.to_bits())
        );
        prop_assert_eq!(access.get_char(&obj, at(DeclaredKind::Char)), Ok(c));
        prop_assert_eq!(
            access.get_string(&obj, at(DeclaredKind::String)),
            Ok(Some(t.as_str()))
        );

        // The untyped routine sees the same slots
        prop_assert_eq!(access.get(&obj, at(DeclaredKind::Int)), Ok(Value::Int(i)));
        prop_assert_eq!(access.get(&obj, at(DeclaredKind::Float)), Ok(Value::Float(f)));
    }

    #[test]
    fn untyped_writes_read_back(
        z in any::<bool>(),
        b in any::<i8>(),
        s in any::<i16>(),
        i in any::<i32>(),
        j in any::<i64>(),
        f in float_strategy(),
        d in double_strategy(),
        c in any::<char>(),
        t in string_strategy(),
        r in reference_strategy(),
    ) {
        let (class, access) = &*FIXTURE;
        let mut obj = Instance::new(class);

        // `ALL_KINDS` order, matching the fixture's field indices
        let values = [
            Value::Bool(z),
            Value::Byte(b),
            Value::Short(s),
            Value::Int(i),
            Value::Long(j),
            Value::Float(f),
            Value::Double(d),
            Value::Char(c),
            t,
            r,
        ];

        for (index, value) in (0..).zip(&values) {
            access.set(&mut obj, index, value.clone()).unwrap();
        }
        for (index, value) in (0..).zip(values) {
            prop_assert_eq!(access.get(&obj, index), Ok(value));
        }

        // Typed reads agree bit for bit with what the untyped write stored
        prop_assert_eq!(
            access.get_float(&obj, index_of_kind(DeclaredKind::Float)).map(f32::to_bits),
            Ok(f.to_bits())
        );
        prop_assert_eq!(
            access.get_double(&obj, index_of_kind(DeclaredKind::Double)).map(f64::to_bits),
            Ok(d.to_bits())
        );
    }
}
