use super::FieldType;
use crate::error::ValidationError;
use crate::name::Name;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Display;

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Field {
    name: Name,
    #[serde(rename = "type")]
    field_type: FieldType,
    is_indexed: bool,
    is_primary_key: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Result<Self, ValidationError> {
        Ok(Self {
            name: Name::new(name)?,
            field_type,
            is_indexed: false,
            is_primary_key: false,
        })
    }

    pub fn indexed(mut self) -> Self {
        self.is_indexed = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn with_flags(mut self, is_indexed: bool, is_primary_key: bool) -> Self {
        self.is_indexed = is_indexed;
        self.is_primary_key = is_primary_key;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_indexed(&self) -> bool {
        self.is_indexed
    }

    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.field_type)?;
        if self.is_primary_key {
            f.write_str(" (PK)")?;
        }
        Ok(())
    }
}

/// A named, ordered list of fields. Order is the storage order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    name: Name,
    fields: Vec<Field>,
}

impl Table {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Result<Self, ValidationError> {
        let name = Name::new(name)?;
        if fields.is_empty() {
            return Err(ValidationError::NoFields);
        }
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(ValidationError::DuplicateField(field.name().to_owned()));
            }
        }
        Ok(Self { name, fields })
    }

    /// The table the front-ends show before anything has been created.
    pub fn sample() -> Result<Self, ValidationError> {
        Self::new(
            "Some table",
            vec![
                Field::new("id", FieldType::U64)?.indexed().primary_key(),
                Field::new("value_a", FieldType::U32)?.indexed(),
                Field::new("value_b", FieldType::Bool)?.indexed(),
                Field::new("value_c", FieldType::I32)?.indexed(),
            ],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }

    pub fn position(&self, field: &Field) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    pub fn contains(&self, field: &Field) -> bool {
        self.position(field).is_some()
    }

    /// Position of the first primary key field.
    pub fn primary_key(&self) -> Option<usize> {
        self.fields.iter().position(Field::is_primary_key)
    }

    pub fn indexes(&self) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.is_indexed())
            .map(|(position, _)| position)
            .collect()
    }

    pub(crate) fn ensure_contains(&self, field: &Field) -> Result<(), ValidationError> {
        if self.contains(field) {
            Ok(())
        } else {
            Err(ValidationError::ForeignField {
                field: field.name().to_owned(),
                table: self.name().to_owned(),
            })
        }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
