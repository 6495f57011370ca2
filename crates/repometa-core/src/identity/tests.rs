use super::*;
use crate::{
    error::ConfigurationError,
    obs::{MetricsEvent, MetricsSink, with_metrics_sink},
    model::{EntityFieldModel, EntityModel},
    traits::{EntityKey, Path},
};
use repometa_primitives::Primitive;
use std::{
    cell::Cell,
    convert::Infallible,
    rc::Rc,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};

///
/// Reflection-backed fixtures
///

const ACCOUNT_ID: EntityFieldModel =
    EntityFieldModel::new("id", TypeToken::primitive(Primitive::Int64));

static ACCOUNT_FIELDS: [EntityFieldModel; 2] = [
    ACCOUNT_ID,
    EntityFieldModel::new("owner", TypeToken::named("alloc::string::String")),
];

static ACCOUNT_MODEL: EntityModel = EntityModel {
    path: "bank::Account",
    entity_name: "Account",
    primary_key: Some(&ACCOUNT_FIELDS[0]),
    fields: &ACCOUNT_FIELDS,
};

struct Account {
    id: Option<i64>,
}

impl Path for Account {
    const PATH: &'static str = "bank::Account";
}

impl EntityKey for Account {
    type Key = i64;

    const MODEL: &'static EntityModel = &ACCOUNT_MODEL;

    fn key(&self) -> Option<i64> {
        self.id
    }
}

static NOTE_MODEL: EntityModel = EntityModel {
    path: "bank::Note",
    entity_name: "Note",
    primary_key: None,
    fields: &[],
};

struct Note;

impl Path for Note {
    const PATH: &'static str = "bank::Note";
}

impl EntityKey for Note {
    type Key = String;

    const MODEL: &'static EntityModel = &NOTE_MODEL;

    fn key(&self) -> Option<String> {
        None
    }
}

///
/// Metadata-backed fixtures
///

struct Row {
    id: Option<i64>,
}

// Counts primitiveness probes through `id_type`.
struct CountingMetadata {
    id_type: TypeToken,
    probes: AtomicUsize,
}

impl CountingMetadata {
    fn new(id_type: TypeToken) -> Self {
        Self {
            id_type,
            probes: AtomicUsize::new(0),
        }
    }
}

impl PersistentEntity<Row> for CountingMetadata {
    type Id = i64;
    type Error = Infallible;

    fn entity_type(&self) -> TypeToken {
        TypeToken::named("app::Row")
    }

    fn id_type(&self) -> Option<TypeToken> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        Some(self.id_type)
    }

    fn get_identifier(&self, row: &Row) -> Result<Option<i64>, Infallible> {
        Ok(row.id)
    }
}

fn boxed_long() -> TypeToken {
    TypeToken::named("core::option::Option<i64>")
}

#[test]
fn absent_id_is_new() {
    let identity = ReflectionEntityIdentity::<Account>::new();

    assert!(identity.is_new(&Account { id: None }).unwrap());
}

#[test]
fn primitive_numeric_ids_below_one_are_new() {
    let identity = ReflectionEntityIdentity::<Account>::new();

    assert!(identity.is_new(&Account { id: Some(0) }).unwrap());
    assert!(!identity.is_new(&Account { id: Some(1) }).unwrap());
    assert!(identity.is_new(&Account { id: Some(-5) }).unwrap());
}

#[test]
fn non_primitive_id_type_only_checks_presence() {
    let identity = MetadataEntityIdentity::new(CountingMetadata::new(boxed_long()));

    assert!(!identity.is_new(&Row { id: Some(0) }).unwrap());
    assert!(!identity.is_new(&Row { id: Some(-5) }).unwrap());
    assert!(identity.is_new(&Row { id: None }).unwrap());
}

#[test]
fn primitive_flag_is_computed_once() {
    let identity = MetadataEntityIdentity::new(CountingMetadata::new(TypeToken::primitive(
        Primitive::Int64,
    )));

    for id in [Some(0), Some(7), Some(-1), Some(3)] {
        identity.is_new(&Row { id }).unwrap();
    }

    assert_eq!(identity.metadata().probes.load(Ordering::SeqCst), 1);
}

#[test]
fn primitive_flag_is_not_computed_for_absent_ids() {
    let identity = MetadataEntityIdentity::new(CountingMetadata::new(TypeToken::primitive(
        Primitive::Int64,
    )));

    assert!(identity.is_new(&Row { id: None }).unwrap());
    assert_eq!(identity.metadata().probes.load(Ordering::SeqCst), 0);
}

#[test]
fn concurrent_first_use_agrees() {
    let identity = MetadataEntityIdentity::new(CountingMetadata::new(TypeToken::primitive(
        Primitive::Nat32,
    )));

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                assert!(identity.is_new(&Row { id: Some(0) }).unwrap());
                assert!(!identity.is_new(&Row { id: Some(9) }).unwrap());
            });
        }
    });

    // redundant computation is allowed, but each run stores the same value
    let probes = identity.metadata().probes.load(Ordering::SeqCst);
    assert!((1..=8).contains(&probes));
    assert!(identity.id_type_is_primitive());
}

#[test]
fn reflection_identity_reads_static_model() {
    let identity = ReflectionEntityIdentity::<Account>::default();

    assert_eq!(identity.domain_type(), TypeToken::of::<Account>());
    assert_eq!(
        identity.id_type(),
        Some(TypeToken::primitive(Primitive::Int64))
    );
    assert_eq!(identity.id_field().map(|f| f.name), Some("id"));
    assert_eq!(identity.id(&Account { id: Some(42) }).unwrap(), Some(42));
}

#[test]
fn missing_id_type_skips_numeric_check() {
    let identity = ReflectionEntityIdentity::<Note>::new();

    assert_eq!(identity.id_type(), None);
    assert!(!identity.id_type_is_primitive());
    assert!(identity.is_new(&Note).unwrap());
}

#[test]
fn declared_bool_and_char_id_types_skip_numeric_check() {
    assert!(!is_numeric_primitive(Some(TypeToken::primitive(Primitive::Bool))));
    assert!(!is_numeric_primitive(Some(TypeToken::primitive(Primitive::Char))));
    assert!(is_numeric_primitive(Some(TypeToken::primitive(Primitive::Float32))));
    assert!(!is_numeric_primitive(None));

    // the declared type decides, not the runtime value
    let identity = MetadataEntityIdentity::new(CountingMetadata::new(TypeToken::primitive(
        Primitive::Bool,
    )));
    assert!(!identity.id_type_is_primitive());
    assert!(!identity.is_new(&Row { id: Some(0) }).unwrap());
    assert!(identity.is_new(&Row { id: None }).unwrap());
}

#[test]
fn is_new_records_no_metrics_events() {
    #[derive(Default)]
    struct CountingSink(Cell<usize>);

    impl MetricsSink for CountingSink {
        fn record(&self, _: MetricsEvent) {
            self.0.set(self.0.get() + 1);
        }
    }

    let sink = Rc::new(CountingSink::default());
    let identity = ReflectionEntityIdentity::<Account>::new();

    with_metrics_sink(sink.clone(), || {
        assert!(!identity.is_new(&Account { id: Some(3) }).unwrap());
        assert!(identity.is_new(&Account { id: Some(0) }).unwrap());
    });

    assert_eq!(sink.0.get(), 0);
}

#[test]
fn non_numeric_primitive_ids_only_check_presence() {
    assert!(!is_new_id(Some(&false), || true));
    assert!(!is_new_id(Some(&'\0'), || true));
    assert!(is_new_id(None::<&bool>, || true));
}

#[test]
fn is_new_id_handles_floats_and_wide_ints() {
    assert!(is_new_id(Some(&0.5_f64), || true));
    assert!(!is_new_id(Some(&1.0_f32), || true));
    assert!(!is_new_id(Some(&u128::MAX), || true));
    assert!(is_new_id(Some(&i128::MIN), || true));
    assert!(!is_new_id(Some("0"), || true));
}

#[test]
fn primitive_id_flag_clone_keeps_cached_value() {
    let flag = PrimitiveIdFlag::new();
    assert_eq!(flag.get(), None);
    assert!(flag.get_or_init(|| true));

    let copy = flag.clone();
    assert_eq!(copy.get(), Some(true));
    assert!(copy.get_or_init(|| unreachable!("cached flag must not re-probe")));
}

///
/// Delegation
///

#[derive(Debug, Eq, PartialEq)]
struct LookupFailed(&'static str);

// Records every call and answers from fixed values.
#[derive(Debug)]
struct StubIdentity {
    calls: Cell<u32>,
    id: Result<Option<u64>, &'static str>,
}

impl StubIdentity {
    fn new(id: Result<Option<u64>, &'static str>) -> Self {
        Self {
            calls: Cell::new(0),
            id,
        }
    }

    fn hit(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl EntityIdentity<Row> for StubIdentity {
    type Id = u64;
    type Error = LookupFailed;

    fn domain_type(&self) -> TypeToken {
        self.hit();
        TypeToken::named("stub::Entity")
    }

    fn id_type(&self) -> Option<TypeToken> {
        self.hit();
        Some(TypeToken::named("stub::Key"))
    }

    fn id(&self, _: &Row) -> Result<Option<u64>, LookupFailed> {
        self.hit();
        self.id.map_err(LookupFailed)
    }

    fn is_new(&self, _: &Row) -> Result<bool, LookupFailed> {
        self.hit();
        // deliberately not the default heuristic
        self.id.map(|id| id == Some(99)).map_err(LookupFailed)
    }
}

#[test]
fn delegating_identity_forwards_every_operation() {
    let identity = DelegatingIdentity::new(StubIdentity::new(Ok(Some(99))));
    let row = Row { id: None };

    assert_eq!(identity.domain_type(), TypeToken::named("stub::Entity"));
    assert_eq!(identity.id_type(), Some(TypeToken::named("stub::Key")));
    assert_eq!(identity.id(&row), Ok(Some(99)));
    assert_eq!(identity.is_new(&row), Ok(true));
    assert_eq!(identity.delegate().calls.get(), 4);
}

#[test]
fn delegating_identity_propagates_failures_unchanged() {
    let identity = DelegatingIdentity::new(StubIdentity::new(Err("store offline")));
    let row = Row { id: Some(1) };

    assert_eq!(identity.id(&row), Err(LookupFailed("store offline")));
    assert_eq!(identity.is_new(&row), Err(LookupFailed("store offline")));
}

#[test]
fn delegating_identity_requires_a_delegate() {
    let err = DelegatingIdentity::<StubIdentity>::try_new(None).unwrap_err();
    assert!(matches!(err, ConfigurationError::MissingDelegate));

    let identity = DelegatingIdentity::try_new(Some(StubIdentity::new(Ok(None)))).unwrap();
    assert_eq!(identity.into_inner().calls.get(), 0);
}

#[test]
fn shared_identities_forward_through_references() {
    let identity = std::sync::Arc::new(ReflectionEntityIdentity::<Account>::new());
    let by_ref = &identity;

    assert!(by_ref.is_new(&Account { id: Some(0) }).unwrap());
    assert_eq!(
        DelegatingIdentity::new(identity.clone()).domain_type(),
        TypeToken::named("bank::Account")
    );
}
