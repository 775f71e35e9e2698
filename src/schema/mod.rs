pub mod table;
pub mod value;

pub use table::{Field, Table};
pub use value::Value;

use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

/// Column types a table may declare. The discriminants are the wire tags.
#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Debug, Copy, Serialize)]
pub enum FieldType {
    String = 0,
    I32 = 1,
    U64 = 2,
    Bool = 3,
    F32 = 4,
    F64 = 5,
    I8 = 6,
    I16 = 7,
    I64 = 8,
    U8 = 9,
    U16 = 10,
    U32 = 11,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field type `{0}`")]
pub struct UnknownFieldType(pub String);

impl FieldType {
    /// Every type, in tag order.
    pub const ALL: [FieldType; 12] = [
        FieldType::String,
        FieldType::I32,
        FieldType::U64,
        FieldType::Bool,
        FieldType::F32,
        FieldType::F64,
        FieldType::I8,
        FieldType::I16,
        FieldType::I64,
        FieldType::U8,
        FieldType::U16,
        FieldType::U32,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::I32 => "I32",
            FieldType::U64 => "U64",
            FieldType::Bool => "Bool",
            FieldType::F32 => "F32",
            FieldType::F64 => "F64",
            FieldType::I8 => "I8",
            FieldType::I16 => "I16",
            FieldType::I64 => "I64",
            FieldType::U8 => "U8",
            FieldType::U16 => "U16",
            FieldType::U32 => "U32",
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, FieldType::String | FieldType::Bool)
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for FieldType {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::ALL.get(tag as usize).copied().ok_or(tag)
    }
}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownFieldType(s.to_owned()))
    }
}
