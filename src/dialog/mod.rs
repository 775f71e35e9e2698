//! Modal flows of the front-ends as plain state machines.
//!
//! Every dialog starts out [`DialogState::Editing`]. A successful submit
//! moves it to [`DialogState::Submitted`] and yields the collected value; a
//! failed submit leaves it editable so the user can fix the input. Once
//! closed, a dialog refuses further edits.

pub mod flow;
pub mod presenter;

pub use presenter::{FormPresenter, Prompt};

use crate::error::{Result, ValidationError};
use crate::name::Name;
use crate::query::{
    ChangeOption, Comparison, Composer, CreateRequest, FilterOption, InsertRequest, Request,
    UpdateRequest,
};
use crate::schema::{Field, FieldType, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Editing,
    Submitted,
    Cancelled,
}

impl DialogState {
    pub fn is_open(self) -> bool {
        self == DialogState::Editing
    }

    fn ensure_open(self) -> std::result::Result<(), ValidationError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ValidationError::DialogClosed)
        }
    }
}

/// "Add field": name, type and the two flags.
#[derive(Debug, Clone, Default)]
pub struct FieldDialog {
    pub name: String,
    pub field_type: Option<FieldType>,
    pub is_indexed: bool,
    pub is_primary_key: bool,
    state: DialogState,
}

impl FieldDialog {
    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn submit(&mut self) -> Result<Field> {
        self.state.ensure_open()?;
        let field_type = self.field_type.ok_or(ValidationError::NoTypeSelected)?;
        let field = Field::new(self.name.clone(), field_type)?
            .with_flags(self.is_indexed, self.is_primary_key);
        self.state = DialogState::Submitted;
        Ok(field)
    }

    pub fn cancel(&mut self) {
        self.state = DialogState::Cancelled;
    }
}

/// "Add filter" / "Add change": one field of the table plus a value.
#[derive(Debug, Clone)]
pub struct OptionDialog {
    fields: Vec<Field>,
    pub selected: Option<usize>,
    pub comparison: Comparison,
    pub value: String,
    state: DialogState,
}

impl OptionDialog {
    /// Starts with the first field selected.
    pub fn new(table: &Table) -> Self {
        Self {
            fields: table.fields().to_vec(),
            selected: Some(0),
            comparison: Comparison::default(),
            value: String::new(),
            state: DialogState::Editing,
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn selected_field(&self) -> Option<&Field> {
        self.selected.and_then(|index| self.fields.get(index))
    }

    pub fn select_named(&mut self, name: &str) -> std::result::Result<(), ValidationError> {
        match self.fields.iter().position(|field| field.name() == name.trim()) {
            Some(index) => {
                self.selected = Some(index);
                Ok(())
            }
            None => {
                self.selected = None;
                Err(ValidationError::NoFieldSelected)
            }
        }
    }

    pub fn submit_filter(&mut self) -> Result<FilterOption> {
        self.state.ensure_open()?;
        let field = self.require_field()?;
        let filter = FilterOption::with_comparison(field, self.comparison, &self.value)?;
        self.state = DialogState::Submitted;
        Ok(filter)
    }

    pub fn submit_change(&mut self) -> Result<ChangeOption> {
        self.state.ensure_open()?;
        let field = self.require_field()?;
        let change = ChangeOption::new(field, &self.value)?;
        self.state = DialogState::Submitted;
        Ok(change)
    }

    pub fn cancel(&mut self) {
        self.state = DialogState::Cancelled;
    }

    fn require_field(&self) -> std::result::Result<Field, ValidationError> {
        self.selected_field()
            .cloned()
            .ok_or(ValidationError::NoFieldSelected)
    }
}

/// "Create table": a name and the fields added so far.
#[derive(Debug, Clone, Default)]
pub struct CreateTableDialog {
    pub name: String,
    fields: Vec<Field>,
    state: DialogState,
}

impl CreateTableDialog {
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn add_field(&mut self, field: Field) -> Result<()> {
        self.state.ensure_open()?;
        if self.fields.iter().any(|f| f.name() == field.name()) {
            return Err(ValidationError::DuplicateField(field.name().to_owned()).into());
        }
        self.fields.push(field);
        Ok(())
    }

    pub fn remove_field(&mut self, index: usize) -> Option<Field> {
        if !self.state.is_open() || index >= self.fields.len() {
            return None;
        }
        Some(self.fields.remove(index))
    }

    pub fn submit(&mut self) -> Result<Table> {
        self.state.ensure_open()?;
        let table = Table::new(self.name.clone(), self.fields.clone())?;
        self.state = DialogState::Submitted;
        Ok(table)
    }

    /// Submits and builds the create request in one step, so a table the
    /// backend would refuse keeps the dialog open.
    pub fn submit_request(&mut self, composer: &Composer) -> Result<CreateRequest> {
        self.state.ensure_open()?;
        let table = Table::new(self.name.clone(), self.fields.clone())?;
        let request = composer.create(table)?;
        self.state = DialogState::Submitted;
        Ok(request)
    }

    pub fn cancel(&mut self) {
        self.state = DialogState::Cancelled;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPurpose {
    Select,
    Delete,
}

/// "Filter settings": used to pick records to show or to delete.
#[derive(Debug, Clone)]
pub struct FilterDialog {
    table: Table,
    purpose: FilterPurpose,
    filters: Vec<FilterOption>,
    state: DialogState,
}

impl FilterDialog {
    pub fn new(table: Table, purpose: FilterPurpose) -> Self {
        Self {
            table,
            purpose,
            filters: Vec::new(),
            state: DialogState::Editing,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn purpose(&self) -> FilterPurpose {
        self.purpose
    }

    pub fn filters(&self) -> &[FilterOption] {
        &self.filters
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn add_filter(&mut self, filter: FilterOption) -> Result<()> {
        self.state.ensure_open()?;
        self.table.ensure_contains(filter.field())?;
        self.filters.push(filter);
        Ok(())
    }

    pub fn remove_filter(&mut self, index: usize) -> Option<FilterOption> {
        if !self.state.is_open() || index >= self.filters.len() {
            return None;
        }
        Some(self.filters.remove(index))
    }

    pub fn submit(&mut self, composer: &Composer) -> Result<Request> {
        self.state.ensure_open()?;
        let query = composer.query(self.table.clone(), self.filters.clone())?;
        self.state = DialogState::Submitted;
        Ok(match self.purpose {
            FilterPurpose::Select => Request::Select(query),
            FilterPurpose::Delete => Request::Delete(query),
        })
    }

    pub fn cancel(&mut self) {
        self.state = DialogState::Cancelled;
    }
}

/// "Change records": filters picking the records plus the changes to apply.
#[derive(Debug, Clone)]
pub struct ChangeDialog {
    table: Table,
    filters: Vec<FilterOption>,
    changes: Vec<ChangeOption>,
    state: DialogState,
}

impl ChangeDialog {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            filters: Vec::new(),
            changes: Vec::new(),
            state: DialogState::Editing,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn filters(&self) -> &[FilterOption] {
        &self.filters
    }

    pub fn changes(&self) -> &[ChangeOption] {
        &self.changes
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn add_filter(&mut self, filter: FilterOption) -> Result<()> {
        self.state.ensure_open()?;
        self.table.ensure_contains(filter.field())?;
        self.filters.push(filter);
        Ok(())
    }

    pub fn add_change(&mut self, change: ChangeOption) -> Result<()> {
        self.state.ensure_open()?;
        self.table.ensure_contains(change.field())?;
        self.changes.push(change);
        Ok(())
    }

    pub fn remove_filter(&mut self, index: usize) -> Option<FilterOption> {
        if !self.state.is_open() || index >= self.filters.len() {
            return None;
        }
        Some(self.filters.remove(index))
    }

    pub fn remove_change(&mut self, index: usize) -> Option<ChangeOption> {
        if !self.state.is_open() || index >= self.changes.len() {
            return None;
        }
        Some(self.changes.remove(index))
    }

    pub fn submit(&mut self, composer: &Composer) -> Result<UpdateRequest> {
        self.state.ensure_open()?;
        let request = composer.update(
            self.table.clone(),
            self.filters.clone(),
            self.changes.clone(),
        )?;
        self.state = DialogState::Submitted;
        Ok(request)
    }

    pub fn cancel(&mut self) {
        self.state = DialogState::Cancelled;
    }
}

/// "Add record": one text box per field.
#[derive(Debug, Clone)]
pub struct RecordDialog {
    table: Table,
    pub values: Vec<String>,
    state: DialogState,
}

impl RecordDialog {
    pub fn new(table: Table) -> Self {
        let values = vec![String::new(); table.fields().len()];
        Self {
            table,
            values,
            state: DialogState::Editing,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn submit(&mut self, composer: &Composer) -> Result<InsertRequest> {
        self.state.ensure_open()?;
        let request = composer.insert(self.table.clone(), self.values.as_slice())?;
        self.state = DialogState::Submitted;
        Ok(request)
    }

    pub fn cancel(&mut self) {
        self.state = DialogState::Cancelled;
    }
}

/// Checks a new table name against the tables already known.
pub fn check_new_table(
    existing: &[Table],
    name: &str,
) -> std::result::Result<(), ValidationError> {
    let name = Name::new(name)?;
    if existing.iter().any(|table| table.name() == name.as_str()) {
        return Err(ValidationError::DuplicateTable(name.to_string()));
    }
    Ok(())
}
