//! End-to-end fills over static and dynamic objects.

use chrono::{DateTime, TimeZone, Utc};
use kvmap_engine::{
    accessor, reflect_struct, DateFormat, DynamicObject, DynamicSchema, FieldAccess, Mapper,
    MapperConfig, MapperError, Reflect, SkipReason, TypeRegistry, TypeTag, Value, ValueMapping,
};
use serde_json::json;
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("kvmap_engine=debug"))
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default)]
struct Entity {
    id: i64,
    created: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Article {
    base: Entity,
    title: String,
    rating: f64,
    published: bool,
}

reflect_struct!(Entity { id, created });
reflect_struct!(Article extends base: Entity { title, rating, published });

fn mapper() -> Mapper {
    Mapper::with_registry(Arc::new(TypeRegistry::new()))
}

#[test]
fn fills_own_and_inherited_fields_from_json() {
    init_tracing();
    let mut article = Article::default();
    let report = mapper()
        .fill_json(
            &mut article,
            &json!({
                "id": 42,
                "created": "2024-01-15T09:30:00Z",
                "title": "Reflections",
                "rating": 4.5,
                "published": true,
                "tags": ["rust"],
            }),
        )
        .unwrap();

    assert_eq!(article.base.id, 42);
    assert_eq!(
        article.base.created,
        Some(Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap())
    );
    assert_eq!(article.title, "Reflections");
    assert_eq!(article.rating, 4.5);
    assert!(article.published);
    assert_eq!(
        report.skipped,
        vec![SkipReason::UnknownField {
            field: "tags".into()
        }]
    );
}

#[test]
fn bad_values_never_abort_the_fill() {
    init_tracing();
    let mut article = Article {
        title: "kept".into(),
        ..Article::default()
    };
    let report = mapper()
        .fill_json(
            &mut article,
            &json!({
                "title": 7,
                "created": "yesterday",
                "rating": 3.0,
            }),
        )
        .unwrap();

    assert_eq!(article.title, "kept");
    assert_eq!(article.base.created, None);
    assert_eq!(article.rating, 3.0);
    assert_eq!(report.applied, vec!["rating"]);
    assert_eq!(report.skipped.len(), 2);
}

#[test]
fn config_drives_the_date_format() {
    let config = MapperConfig::from_json_str(r#"{"date_format": "alt_rss"}"#).unwrap();
    let mapper = Mapper::from_config(&config);
    assert_eq!(mapper.date_format(), &DateFormat::AltRss);

    let mut entity = Entity::default();
    let report = mapper
        .fill_json(&mut entity, &json!({"created": "15 Jan 2024 09:30:00 +0100"}))
        .unwrap();
    assert!(report.is_complete());
    assert_eq!(
        entity.created,
        Some(Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap())
    );
}

#[test]
fn snapshot_then_fill_copies_between_instances() {
    let registry = Arc::new(TypeRegistry::new());
    let source = Article {
        base: Entity {
            id: 1,
            created: Some(Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap()),
        },
        title: "copy me".into(),
        rating: 2.0,
        published: true,
    };
    let snapshot = accessor::snapshot(&registry, &source).unwrap();

    let mut copy = Article::default();
    let report = Mapper::with_registry(registry)
        .fill(&mut copy, &snapshot)
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(copy.base.id, 1);
    assert_eq!(copy.base.created, source.base.created);
    assert_eq!(copy.title, "copy me");
}

fn contact_schema() -> Arc<DynamicSchema> {
    Arc::new(
        DynamicSchema::new("Contact")
            .field("email", TypeTag::String)
            .field("birthday", TypeTag::Date)
            .field_with_access("uid", TypeTag::Integer, FieldAccess::ReadOnly)
            .field("extra", TypeTag::Unknown),
    )
}

#[test]
fn fills_dynamic_objects() {
    init_tracing();
    let mut contact = DynamicObject::new(contact_schema());
    contact.seed("uid", 7);

    let report = mapper()
        .fill_json(
            &mut contact,
            &json!({
                "email": "a@example.com",
                "birthday": "1990-04-01",
                "uid": 8,
                "extra": {"k": "v"},
            }),
        )
        .unwrap();

    assert_eq!(contact.value("email"), Some(&Value::from("a@example.com")));
    assert_eq!(
        contact.value("birthday"),
        Some(&Value::Date(Utc.with_ymd_and_hms(1990, 4, 1, 0, 0, 0).unwrap()))
    );
    assert_eq!(contact.value("uid"), Some(&Value::Integer(7)));
    assert_eq!(contact.value("extra"), None);
    assert_eq!(report.applied, vec!["email", "birthday"]);
    assert!(matches!(
        report.skip_for("uid"),
        Some(SkipReason::AccessorRejection { .. })
    ));
    assert!(matches!(
        report.skip_for("extra"),
        Some(SkipReason::TypeMismatch { .. })
    ));
}

#[test]
fn per_request_schemas_do_not_accumulate_in_the_global_registry() {
    let mapper = Mapper::new();
    let mut keys = Vec::new();
    for n in 0..1000 {
        let schema = Arc::new(DynamicSchema::new("Row").field("n", TypeTag::Integer));
        keys.push(schema.key());
        let mut row = DynamicObject::new(schema);
        let report = mapper.fill_json(&mut row, &json!({"n": n})).unwrap();
        assert!(report.is_complete());
        assert_eq!(row.value("n"), Some(&Value::Integer(n)));
    }

    let global = TypeRegistry::global();
    assert!(keys.iter().all(|key| !global.is_cached(key)));
}

#[test]
fn from_mapping_builds_a_value() {
    let mut mapping = ValueMapping::new();
    mapping.insert("title", "fresh");
    mapping.insert("published", true);

    let article: Article = mapper().from_mapping(&mapping).unwrap();
    assert_eq!(article.title, "fresh");
    assert!(article.published);
    assert_eq!(article.base.id, 0);
}

struct Socket;

impl Reflect for Socket {
    fn type_schema(&self) -> Option<kvmap_engine::TypeSchema> {
        None
    }

    fn get(&self, _name: &str) -> Option<Value> {
        None
    }

    fn set(&mut self, name: &str, _value: Value) -> Result<(), kvmap_engine::AccessError> {
        Err(kvmap_engine::AccessError::UnknownField {
            field: name.to_string(),
        })
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[test]
fn opaque_targets_are_reported() {
    let err = mapper()
        .fill_json(&mut Socket, &json!({"fd": 3}))
        .unwrap_err();
    assert!(matches!(err, MapperError::UnmappableType { .. }));
}
