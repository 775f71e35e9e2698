use crate::query::Comparison;
use crate::schema::FieldType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

/// Input the user has to correct before anything can be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name `{0}` is longer than 255 bytes")]
    NameTooLong(String),
    #[error("table should consist of at least one field")]
    NoFields,
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),
    #[error("table `{0}` already exists")]
    DuplicateTable(String),
    #[error("table `{0}` declares more than one primary key")]
    MultiplePrimaryKeys(String),
    #[error("please select a field")]
    NoFieldSelected,
    #[error("please select a field type")]
    NoTypeSelected,
    #[error("please add a value")]
    EmptyValue,
    #[error("field `{field}` does not belong to table `{table}`")]
    ForeignField { field: String, table: String },
    #[error("at least one change is required")]
    NoChanges,
    #[error("field `{0}` is changed more than once")]
    DuplicateChange(String),
    #[error("at least one filter is required")]
    NoFilters,
    #[error("unknown comparison `{0}`")]
    UnknownComparison(String),
    #[error("`{comparison}` cannot be applied to {field_type} fields")]
    UnsupportedComparison {
        comparison: Comparison,
        field_type: FieldType,
    },
    #[error("record needs {expected} values, got {found}")]
    RecordArity { expected: usize, found: usize },
    #[error("dialog is already closed")]
    DialogClosed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{text}` is not a valid {expected} value")]
pub struct CoercionError {
    pub text: String,
    pub expected: FieldType,
}

impl ModelError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ModelError::Validation(_))
    }

    pub fn is_coercion(&self) -> bool {
        matches!(self, ModelError::Coercion(_))
    }
}
