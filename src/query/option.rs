use crate::error::{Result, ValidationError};
use crate::schema::{Field, FieldType, Value};
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

/// How a filter matches a record's field against its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Comparison {
    #[default]
    Equal,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Contains,
    StartsWith,
    EndsWith,
}

impl Comparison {
    pub const ALL: [Comparison; 8] = [
        Comparison::Equal,
        Comparison::Less,
        Comparison::Greater,
        Comparison::LessEq,
        Comparison::GreaterEq,
        Comparison::Contains,
        Comparison::StartsWith,
        Comparison::EndsWith,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Comparison::Equal => "=",
            Comparison::Less => "<",
            Comparison::Greater => ">",
            Comparison::LessEq => "<=",
            Comparison::GreaterEq => ">=",
            Comparison::Contains => "contains",
            Comparison::StartsWith => "starts_with",
            Comparison::EndsWith => "ends_with",
        }
    }

    pub fn supports(self, field_type: FieldType) -> bool {
        match self {
            Comparison::Equal => true,
            Comparison::Less | Comparison::Greater | Comparison::LessEq | Comparison::GreaterEq => {
                field_type != FieldType::Bool
            }
            Comparison::Contains | Comparison::StartsWith | Comparison::EndsWith => {
                field_type == FieldType::String
            }
        }
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparison {
    type Err = ValidationError;

    /// Blank input means [`Comparison::Equal`].
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "==" {
            return Ok(Comparison::Equal);
        }
        Self::ALL
            .into_iter()
            .find(|cmp| cmp.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownComparison(s.to_owned()))
    }
}

/// `field <comparison> value`, with the value already coerced to the field's type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOption {
    field: Field,
    comparison: Comparison,
    value: Value,
}

impl FilterOption {
    pub fn new(field: Field, value: &str) -> Result<Self> {
        Self::with_comparison(field, Comparison::Equal, value)
    }

    pub fn with_comparison(field: Field, comparison: Comparison, value: &str) -> Result<Self> {
        if !comparison.supports(field.field_type()) {
            return Err(ValidationError::UnsupportedComparison {
                comparison,
                field_type: field.field_type(),
            }
            .into());
        }
        let value = Value::coerce(value, field.field_type())?;
        Ok(Self {
            field,
            comparison,
            value,
        })
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Display for FilterOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.field.name(),
            self.comparison,
            self.value
        )
    }
}

/// `set field = value`, with the value already coerced to the field's type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeOption {
    field: Field,
    value: Value,
}

impl ChangeOption {
    pub fn new(field: Field, value: &str) -> Result<Self> {
        let value = Value::coerce(value, field.field_type())?;
        Ok(Self { field, value })
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Display for ChangeOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} := {}", self.field.name(), self.value)
    }
}
