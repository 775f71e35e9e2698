use super::{ChangeOption, FilterOption};
use crate::schema::{Table, Value};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRequest {
    pub(crate) table: Table,
    pub(crate) primary_key: Option<usize>,
    pub(crate) indexes: Vec<usize>,
}

impl CreateRequest {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn primary_key(&self) -> Option<usize> {
        self.primary_key
    }

    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }
}

/// Records of `table` matching every filter. No filters matches every record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    pub(crate) table: Table,
    pub(crate) filters: Vec<FilterOption>,
}

impl QueryRequest {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn filters(&self) -> &[FilterOption] {
        &self.filters
    }

    pub fn matches_all(&self) -> bool {
        self.filters.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateRequest {
    pub(crate) table: Table,
    pub(crate) filters: Vec<FilterOption>,
    pub(crate) changes: Vec<ChangeOption>,
}

impl UpdateRequest {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn filters(&self) -> &[FilterOption] {
        &self.filters
    }

    pub fn changes(&self) -> &[ChangeOption] {
        &self.changes
    }

    pub fn matches_all(&self) -> bool {
        self.filters.is_empty()
    }
}

/// One record, values in field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertRequest {
    pub(crate) table: Table,
    pub(crate) record: Vec<Value>,
}

impl InsertRequest {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn record(&self) -> &[Value] {
        &self.record
    }
}

/// Everything the front-ends can ask of a backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum Request {
    ListTables,
    Create(CreateRequest),
    Insert(InsertRequest),
    Select(QueryRequest),
    Delete(QueryRequest),
    Update(UpdateRequest),
    Clear { table: String },
    Drop { table: String },
    Backup { table: String },
    Export { table: String },
}

impl Request {
    pub fn clear(table: &Table) -> Self {
        Request::Clear {
            table: table.name().to_owned(),
        }
    }

    pub fn drop_table(table: &Table) -> Self {
        Request::Drop {
            table: table.name().to_owned(),
        }
    }

    pub fn backup(table: &Table) -> Self {
        Request::Backup {
            table: table.name().to_owned(),
        }
    }

    pub fn export(table: &Table) -> Self {
        Request::Export {
            table: table.name().to_owned(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Request::ListTables => "list tables",
            Request::Create(_) => "create table",
            Request::Insert(_) => "insert record",
            Request::Select(_) => "select records",
            Request::Delete(_) => "delete records",
            Request::Update(_) => "change records",
            Request::Clear { .. } => "clear table",
            Request::Drop { .. } => "delete table",
            Request::Backup { .. } => "backup table",
            Request::Export { .. } => "export table",
        }
    }

    pub fn table_name(&self) -> Option<&str> {
        match self {
            Request::ListTables => None,
            Request::Create(request) => Some(request.table.name()),
            Request::Insert(request) => Some(request.table.name()),
            Request::Select(request) | Request::Delete(request) => Some(request.table.name()),
            Request::Update(request) => Some(request.table.name()),
            Request::Clear { table }
            | Request::Drop { table }
            | Request::Backup { table }
            | Request::Export { table } => Some(table.as_str()),
        }
    }
}

impl From<CreateRequest> for Request {
    fn from(request: CreateRequest) -> Self {
        Request::Create(request)
    }
}

impl From<InsertRequest> for Request {
    fn from(request: InsertRequest) -> Self {
        Request::Insert(request)
    }
}

impl From<UpdateRequest> for Request {
    fn from(request: UpdateRequest) -> Self {
        Request::Update(request)
    }
}
