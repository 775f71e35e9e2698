use super::FieldType;
use crate::error::{CoercionError, Result, ValidationError};
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

/// A native value tagged with the field type it was coerced to.
#[derive(PartialEq, Clone, Debug, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    String(String),
    I32(i32),
    U64(u64),
    Bool(bool),
    F32(f32),
    F64(f64),
    I8(i8),
    I16(i16),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
}

impl Value {
    /// Converts text typed by the user into the native value of `field_type`.
    ///
    /// Empty text is a validation error for every type. Strings are taken
    /// verbatim; everything else is trimmed before parsing.
    pub fn coerce(text: &str, field_type: FieldType) -> Result<Self> {
        let trimmed = text.trim();
        if text.is_empty() || (field_type != FieldType::String && trimmed.is_empty()) {
            return Err(ValidationError::EmptyValue.into());
        }
        let value = match field_type {
            FieldType::String => Some(Value::String(text.to_owned())),
            FieldType::Bool => parse_bool(trimmed).map(Value::Bool),
            FieldType::I8 => parse(trimmed).map(Value::I8),
            FieldType::I16 => parse(trimmed).map(Value::I16),
            FieldType::I32 => parse(trimmed).map(Value::I32),
            FieldType::I64 => parse(trimmed).map(Value::I64),
            FieldType::U8 => parse(trimmed).map(Value::U8),
            FieldType::U16 => parse(trimmed).map(Value::U16),
            FieldType::U32 => parse(trimmed).map(Value::U32),
            FieldType::U64 => parse(trimmed).map(Value::U64),
            FieldType::F32 => parse(trimmed).filter(|v: &f32| v.is_finite()).map(Value::F32),
            FieldType::F64 => parse(trimmed).filter(|v: &f64| v.is_finite()).map(Value::F64),
        };
        value.ok_or_else(|| {
            CoercionError {
                text: text.to_owned(),
                expected: field_type,
            }
            .into()
        })
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Value::String(_) => FieldType::String,
            Value::I32(_) => FieldType::I32,
            Value::U64(_) => FieldType::U64,
            Value::Bool(_) => FieldType::Bool,
            Value::F32(_) => FieldType::F32,
            Value::F64(_) => FieldType::F64,
            Value::I8(_) => FieldType::I8,
            Value::I16(_) => FieldType::I16,
            Value::I64(_) => FieldType::I64,
            Value::U8(_) => FieldType::U8,
            Value::U16(_) => FieldType::U16,
            Value::U32(_) => FieldType::U32,
        }
    }

    pub fn verify(&self, field_type: FieldType) -> bool {
        self.field_type() == field_type
    }
}

fn parse<T: FromStr>(text: &str) -> Option<T> {
    text.parse().ok()
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(v) => f.write_str(v),
            Value::I32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    #[test]
    fn test_integer_coercion() {
        assert_eq!(Value::coerce("42", FieldType::I32), Ok(Value::I32(42)));
        assert_eq!(Value::coerce(" -7 ", FieldType::I8), Ok(Value::I8(-7)));
        assert_eq!(
            Value::coerce("18446744073709551615", FieldType::U64),
            Ok(Value::U64(u64::MAX))
        );
    }

    #[test]
    fn test_integer_coercion_failures() {
        let err = Value::coerce("abc", FieldType::I32).unwrap_err();
        assert_eq!(
            err,
            ModelError::Coercion(CoercionError {
                text: "abc".into(),
                expected: FieldType::I32,
            })
        );
        assert!(Value::coerce("256", FieldType::U8).unwrap_err().is_coercion());
        assert!(Value::coerce("-1", FieldType::U16).unwrap_err().is_coercion());
        assert!(Value::coerce("1.5", FieldType::I64).unwrap_err().is_coercion());
    }

    #[test]
    fn test_bool_coercion() {
        assert_eq!(Value::coerce("true", FieldType::Bool), Ok(Value::Bool(true)));
        assert_eq!(Value::coerce("false", FieldType::Bool), Ok(Value::Bool(false)));
        assert_eq!(Value::coerce("TRUE", FieldType::Bool), Ok(Value::Bool(true)));
        assert!(Value::coerce("yes", FieldType::Bool).unwrap_err().is_coercion());
    }

    #[test]
    fn test_float_coercion() {
        assert_eq!(Value::coerce("2.5", FieldType::F32), Ok(Value::F32(2.5)));
        assert_eq!(Value::coerce("-0.125", FieldType::F64), Ok(Value::F64(-0.125)));
        assert!(Value::coerce("NaN", FieldType::F64).unwrap_err().is_coercion());
        assert!(Value::coerce("inf", FieldType::F32).unwrap_err().is_coercion());
    }

    #[test]
    fn test_string_is_verbatim() {
        assert_eq!(
            Value::coerce(" padded ", FieldType::String),
            Ok(Value::String(" padded ".into()))
        );
    }

    #[test]
    fn test_empty_text_is_a_validation_error() {
        for field_type in FieldType::ALL {
            let err = Value::coerce("", field_type).unwrap_err();
            assert_eq!(err, ModelError::Validation(ValidationError::EmptyValue));
        }
        assert!(Value::coerce("  ", FieldType::I32).unwrap_err().is_validation());
    }

    #[test]
    fn test_value_knows_its_type() {
        for field_type in FieldType::ALL {
            let sample = match field_type {
                FieldType::Bool => "true",
                FieldType::String => "text",
                _ => "1",
            };
            let value = Value::coerce(sample, field_type).unwrap();
            assert!(value.verify(field_type));
        }
    }
}
