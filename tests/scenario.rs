use chipmunk::error::{ModelError, ValidationError};
use chipmunk::query::{
    ChangeOption, Comparison, Composer, EmptyFilterPolicy, FilterOption, Request,
    build_create_request, build_insert_request, build_query_request, build_update_request,
};
use chipmunk::schema::{Field, FieldType, Table, Value};

fn users() -> Table {
    Table::new(
        "users",
        vec![
            Field::new("id", FieldType::U64).unwrap().indexed().primary_key(),
            Field::new("age", FieldType::I32).unwrap(),
        ],
    )
    .unwrap()
}

fn age() -> Field {
    users().field("age").cloned().unwrap()
}

#[test]
fn test_query_users_by_age() {
    let filter = FilterOption::new(age(), "30").unwrap();
    let request = build_query_request(users(), vec![filter]).unwrap();

    assert_eq!(request.table().name(), "users");
    assert_eq!(request.filters().len(), 1);
    assert_eq!(request.filters()[0].comparison(), Comparison::Equal);
    assert_eq!(request.filters()[0].value(), &Value::I32(30));
    assert!(!request.matches_all());
}

#[test]
fn test_create_request_carries_keys() {
    let request = build_create_request(users()).unwrap();
    assert_eq!(request.primary_key(), Some(0));
    assert_eq!(request.indexes(), &[0]);
}

#[test]
fn test_coercion_rules() {
    assert_eq!(Value::coerce("42", FieldType::I32).unwrap(), Value::I32(42));
    assert_eq!(Value::coerce("true", FieldType::Bool).unwrap(), Value::Bool(true));
    assert_eq!(Value::coerce("false", FieldType::Bool).unwrap(), Value::Bool(false));
    assert!(Value::coerce("abc", FieldType::I32).unwrap_err().is_coercion());
    for ty in FieldType::ALL {
        assert_eq!(
            Value::coerce("", ty),
            Err(ModelError::Validation(ValidationError::EmptyValue))
        );
    }
}

#[test]
fn test_empty_filters_follow_policy() {
    let request = build_query_request(users(), vec![]).unwrap();
    assert!(request.matches_all());

    let strict = Composer::new(EmptyFilterPolicy::Reject);
    assert_eq!(
        strict.query(users(), vec![]),
        Err(ModelError::Validation(ValidationError::NoFilters))
    );
}

#[test]
fn test_update_rules() {
    assert_eq!(
        build_update_request(users(), vec![], vec![]),
        Err(ModelError::Validation(ValidationError::NoChanges))
    );

    let changes = vec![
        ChangeOption::new(age(), "40").unwrap(),
        ChangeOption::new(age(), "41").unwrap(),
    ];
    assert_eq!(
        build_update_request(users(), vec![], changes),
        Err(ModelError::Validation(ValidationError::DuplicateChange(
            "age".into()
        )))
    );
}

#[test]
fn test_insert_checks_arity_and_types() {
    let request = build_insert_request(users(), &["7", "30"]).unwrap();
    assert_eq!(request.record(), &[Value::U64(7), Value::I32(30)]);

    let err = build_insert_request(users(), &["7"]).unwrap_err();
    assert!(err.is_validation());
    let err = build_insert_request(users(), &["-7", "30"]).unwrap_err();
    assert!(err.is_coercion());
}

#[test]
fn test_requests_serialize_with_their_kind() {
    let filter = FilterOption::new(age(), "30").unwrap();
    let request = Request::Select(build_query_request(users(), vec![filter]).unwrap());
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["request"], "select");
    assert_eq!(json["table"]["name"], "users");
    assert_eq!(request.kind(), "select records");
}
