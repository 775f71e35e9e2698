use super::{ChangeOption, CreateRequest, FilterOption, InsertRequest, QueryRequest, UpdateRequest};
use crate::error::{Result, ValidationError};
use crate::schema::{Table, Value};
use std::collections::HashSet;
use tracing::debug;

/// What an empty filter set means for select, delete and update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EmptyFilterPolicy {
    /// No filters matches every record.
    #[default]
    MatchAll,
    /// At least one filter is required.
    Reject,
}

/// Turns validated schema and options into requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Composer {
    policy: EmptyFilterPolicy,
}

impl Composer {
    pub fn new(policy: EmptyFilterPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> EmptyFilterPolicy {
        self.policy
    }

    pub fn create(&self, table: Table) -> Result<CreateRequest> {
        let mut primary_keys = table.fields().iter().filter(|field| field.is_primary_key());
        if primary_keys.nth(1).is_some() {
            return Err(ValidationError::MultiplePrimaryKeys(table.name().to_owned()).into());
        }
        let request = CreateRequest {
            primary_key: table.primary_key(),
            indexes: table.indexes(),
            table,
        };
        debug!(table = request.table.name(), "built create request");
        Ok(request)
    }

    pub fn query(&self, table: Table, filters: Vec<FilterOption>) -> Result<QueryRequest> {
        self.check_filters(&table, &filters)?;
        debug!(
            table = table.name(),
            filters = filters.len(),
            "built query request"
        );
        Ok(QueryRequest { table, filters })
    }

    pub fn update(
        &self,
        table: Table,
        filters: Vec<FilterOption>,
        changes: Vec<ChangeOption>,
    ) -> Result<UpdateRequest> {
        if changes.is_empty() {
            return Err(ValidationError::NoChanges.into());
        }
        self.check_filters(&table, &filters)?;
        let mut targets = HashSet::with_capacity(changes.len());
        for change in &changes {
            table.ensure_contains(change.field())?;
            if !targets.insert(change.field().name()) {
                return Err(ValidationError::DuplicateChange(change.field().name().to_owned()).into());
            }
        }
        debug!(
            table = table.name(),
            filters = filters.len(),
            changes = changes.len(),
            "built update request"
        );
        Ok(UpdateRequest {
            table,
            filters,
            changes,
        })
    }

    /// One text value per field, in field order.
    pub fn insert<S: AsRef<str>>(&self, table: Table, values: &[S]) -> Result<InsertRequest> {
        if values.len() != table.fields().len() {
            return Err(ValidationError::RecordArity {
                expected: table.fields().len(),
                found: values.len(),
            }
            .into());
        }
        let record = table
            .fields()
            .iter()
            .zip(values)
            .map(|(field, text)| Value::coerce(text.as_ref(), field.field_type()))
            .collect::<Result<Vec<_>>>()?;
        debug!(table = table.name(), "built insert request");
        Ok(InsertRequest { table, record })
    }

    fn check_filters(&self, table: &Table, filters: &[FilterOption]) -> Result<()> {
        if filters.is_empty() && self.policy == EmptyFilterPolicy::Reject {
            return Err(ValidationError::NoFilters.into());
        }
        for filter in filters {
            table.ensure_contains(filter.field())?;
        }
        Ok(())
    }
}

pub fn build_create_request(table: Table) -> Result<CreateRequest> {
    Composer::default().create(table)
}

pub fn build_query_request(table: Table, filters: Vec<FilterOption>) -> Result<QueryRequest> {
    Composer::default().query(table, filters)
}

pub fn build_update_request(
    table: Table,
    filters: Vec<FilterOption>,
    changes: Vec<ChangeOption>,
) -> Result<UpdateRequest> {
    Composer::default().update(table, filters, changes)
}

pub fn build_insert_request<S: AsRef<str>>(table: Table, values: &[S]) -> Result<InsertRequest> {
    Composer::default().insert(table, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::schema::{Field, FieldType};

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

    fn field(table: &Table, name: &str) -> Field {
        table.field(name).unwrap().clone()
    }

    #[test]
    fn test_create_exposes_keys() {
        let request = build_create_request(users()).unwrap();
        assert_eq!(request.primary_key(), Some(0));
        assert_eq!(request.indexes(), &[0]);
    }

    #[test]
    fn test_create_rejects_second_primary_key() {
        let table = Table::new(
            "pairs",
            vec![
                Field::new("a", FieldType::U8).unwrap().primary_key(),
                Field::new("b", FieldType::U8).unwrap().primary_key(),
            ],
        )
        .unwrap();
        assert_eq!(
            build_create_request(table),
            Err(ModelError::Validation(ValidationError::MultiplePrimaryKeys(
                "pairs".into()
            )))
        );
    }

    #[test]
    fn test_empty_filters_match_all() {
        let request = build_query_request(users(), vec![]).unwrap();
        assert!(request.matches_all());
    }

    #[test]
    fn test_reject_policy() {
        let composer = Composer::new(EmptyFilterPolicy::Reject);
        assert_eq!(
            composer.query(users(), vec![]),
            Err(ModelError::Validation(ValidationError::NoFilters))
        );
        let table = users();
        let change = ChangeOption::new(field(&table, "age"), "1").unwrap();
        assert!(composer.update(table, vec![], vec![change]).is_err());
    }

    #[test]
    fn test_query_coerces_filter() {
        let table = users();
        let filter = FilterOption::new(field(&table, "age"), "30").unwrap();
        let request = build_query_request(table, vec![filter]).unwrap();
        assert!(!request.matches_all());
        assert_eq!(request.filters()[0].value(), &Value::I32(30));
    }

    #[test]
    fn test_foreign_field_is_rejected() {
        let stranger = Field::new("age", FieldType::U8).unwrap();
        let filter = FilterOption::new(stranger, "3").unwrap();
        assert_eq!(
            build_query_request(users(), vec![filter]),
            Err(ModelError::Validation(ValidationError::ForeignField {
                field: "age".into(),
                table: "users".into(),
            }))
        );
    }

    #[test]
    fn test_update_rejects_foreign_fields() {
        let table = users();
        let height = Field::new("height", FieldType::I32).unwrap();
        let foreign = ValidationError::ForeignField {
            field: "height".into(),
            table: "users".into(),
        };

        let change = ChangeOption::new(height.clone(), "180").unwrap();
        assert_eq!(
            build_update_request(table.clone(), vec![], vec![change]),
            Err(ModelError::Validation(foreign.clone()))
        );

        let filter = FilterOption::new(height, "180").unwrap();
        let change = ChangeOption::new(field(&table, "age"), "40").unwrap();
        assert_eq!(
            build_update_request(table, vec![filter], vec![change]),
            Err(ModelError::Validation(foreign))
        );
    }

    #[test]
    fn test_update_requires_changes() {
        assert_eq!(
            build_update_request(users(), vec![], vec![]),
            Err(ModelError::Validation(ValidationError::NoChanges))
        );
    }

    #[test]
    fn test_update_rejects_duplicate_targets() {
        let table = users();
        let changes = vec![
            ChangeOption::new(field(&table, "age"), "1").unwrap(),
            ChangeOption::new(field(&table, "age"), "2").unwrap(),
        ];
        assert_eq!(
            build_update_request(table, vec![], changes),
            Err(ModelError::Validation(ValidationError::DuplicateChange(
                "age".into()
            )))
        );
    }

    #[test]
    fn test_update_with_everything() {
        let table = users();
        let filters = vec![FilterOption::new(field(&table, "id"), "7").unwrap()];
        let changes = vec![ChangeOption::new(field(&table, "age"), "40").unwrap()];
        let request = build_update_request(table, filters, changes).unwrap();
        assert!(!request.matches_all());
        assert_eq!(request.changes()[0].value(), &Value::I32(40));
    }

    #[test]
    fn test_insert_coerces_each_value() {
        let request = build_insert_request(users(), &["1", "30"]).unwrap();
        assert_eq!(request.record(), &[Value::U64(1), Value::I32(30)]);

        assert_eq!(
            build_insert_request(users(), &["1"]),
            Err(ModelError::Validation(ValidationError::RecordArity {
                expected: 2,
                found: 1,
            }))
        );
        assert!(build_insert_request(users(), &["1", "old"]).unwrap_err().is_coercion());
    }
}
