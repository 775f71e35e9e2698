//! Dialog flows driven through a [`FormPresenter`].
//!
//! Sub-item forms ("Add field", "Add filter", "Add change") repeat until the
//! user leaves the first answer blank, which submits the outer dialog.
//! Cancelling any form cancels the whole flow. Rejected input is reported
//! and the same form is presented again.

use super::{
    ChangeDialog, CreateTableDialog, FieldDialog, FilterDialog, FilterPurpose, FormPresenter,
    OptionDialog, Prompt, RecordDialog, check_new_table,
};
use crate::error::{ModelError, Result, ValidationError};
use crate::query::{
    ChangeOption, Comparison, Composer, CreateRequest, FilterOption, InsertRequest, Request,
    UpdateRequest,
};
use crate::schema::{FieldType, Table};
use tracing::debug;

/// Asks for a table name not yet in `existing`, then for its fields.
pub fn create_table<P: FormPresenter + ?Sized>(
    presenter: &mut P,
    existing: &[Table],
    composer: &Composer,
) -> Option<CreateRequest> {
    let mut dialog = CreateTableDialog::default();
    loop {
        let answers = presenter.present_form("Create table", &[Prompt::new("Table name")])?;
        dialog.name = answer(&answers, 0).to_owned();
        match check_new_table(existing, &dialog.name) {
            Ok(()) => break,
            Err(err) => presenter.report(&err.to_string()),
        }
    }

    let prompts = field_prompts();
    loop {
        let answers = presenter.present_form("Add field", &prompts)?;
        if is_blank(&answers) {
            match dialog.submit_request(composer) {
                Ok(request) => return Some(request),
                Err(err) => presenter.report(&err.to_string()),
            }
            continue;
        }
        let mut field_dialog = FieldDialog {
            name: answer(&answers, 0).to_owned(),
            field_type: answer(&answers, 1).parse::<FieldType>().ok(),
            is_indexed: is_yes(answer(&answers, 2)),
            is_primary_key: is_yes(answer(&answers, 3)),
            ..Default::default()
        };
        let added = field_dialog
            .submit()
            .and_then(|field| dialog.add_field(field));
        if let Err(err) = added {
            presenter.report(&err.to_string());
        }
    }
}

pub fn add_record<P: FormPresenter + ?Sized>(
    presenter: &mut P,
    table: &Table,
    composer: &Composer,
) -> Option<InsertRequest> {
    let mut dialog = RecordDialog::new(table.clone());
    let prompts: Vec<Prompt> = table.fields().iter().map(Prompt::for_field).collect();
    let title = format!("Add record to {table}");
    loop {
        dialog.values = presenter.present_form(&title, &prompts)?;
        match dialog.submit(composer) {
            Ok(request) => return Some(request),
            Err(err) => presenter.report(&err.to_string()),
        }
    }
}

/// Collects filters for a select or delete.
pub fn filter_records<P: FormPresenter + ?Sized>(
    presenter: &mut P,
    table: &Table,
    purpose: FilterPurpose,
    composer: &Composer,
) -> Option<Request> {
    let mut dialog = FilterDialog::new(table.clone(), purpose);
    let prompts = filter_prompts(table);
    loop {
        let answers = presenter.present_form("Add filter", &prompts)?;
        if is_blank(&answers) {
            match dialog.submit(composer) {
                Ok(request) => return Some(request),
                Err(err) => presenter.report(&err.to_string()),
            }
            continue;
        }
        let added = read_filter(table, &answers).and_then(|filter| dialog.add_filter(filter));
        if let Err(err) = added {
            presenter.report(&err.to_string());
        }
    }
}

/// Collects filters first, then changes.
pub fn change_records<P: FormPresenter + ?Sized>(
    presenter: &mut P,
    table: &Table,
    composer: &Composer,
) -> Option<UpdateRequest> {
    let mut dialog = ChangeDialog::new(table.clone());
    let filter_prompts = filter_prompts(table);
    let change_prompts = change_prompts(table);
    let mut collecting_filters = true;
    loop {
        if collecting_filters {
            let answers = presenter.present_form("Add filter", &filter_prompts)?;
            if is_blank(&answers) {
                debug!(filters = dialog.filters().len(), "filters collected");
                collecting_filters = false;
                continue;
            }
            let added = read_filter(table, &answers).and_then(|filter| dialog.add_filter(filter));
            if let Err(err) = added {
                presenter.report(&err.to_string());
            }
        } else {
            let answers = presenter.present_form("Add change", &change_prompts)?;
            if is_blank(&answers) {
                match dialog.submit(composer) {
                    Ok(request) => return Some(request),
                    Err(err) => {
                        presenter.report(&err.to_string());
                        collecting_filters = matches!(
                            err,
                            ModelError::Validation(ValidationError::NoFilters)
                        );
                    }
                }
                continue;
            }
            let added = read_change(table, &answers).and_then(|change| dialog.add_change(change));
            if let Err(err) = added {
                presenter.report(&err.to_string());
            }
        }
    }
}

fn read_filter(table: &Table, answers: &[String]) -> Result<FilterOption> {
    let mut option = OptionDialog::new(table);
    option.select_named(answer(answers, 0))?;
    option.comparison = answer(answers, 1).parse::<Comparison>()?;
    option.value = answer(answers, 2).to_owned();
    option.submit_filter()
}

fn read_change(table: &Table, answers: &[String]) -> Result<ChangeOption> {
    let mut option = OptionDialog::new(table);
    option.select_named(answer(answers, 0))?;
    option.value = answer(answers, 1).to_owned();
    option.submit_change()
}

fn field_prompts() -> Vec<Prompt> {
    let types: Vec<&str> = FieldType::ALL.iter().map(|ty| ty.as_str()).collect();
    vec![
        Prompt::new("Name").with_hint("blank to finish"),
        Prompt::new("Type").with_hint(types.join(", ")),
        Prompt::new("Indexed").with_hint("y/n"),
        Prompt::new("Primary key").with_hint("y/n"),
    ]
}

fn field_hint(table: &Table) -> String {
    let names: Vec<&str> = table.fields().iter().map(|field| field.name()).collect();
    format!("{}; blank to finish", names.join(", "))
}

fn filter_prompts(table: &Table) -> Vec<Prompt> {
    let comparisons: Vec<&str> = Comparison::ALL.iter().map(|cmp| cmp.as_str()).collect();
    vec![
        Prompt::new("Field").with_hint(field_hint(table)),
        Prompt::new("Comparison").with_hint(comparisons.join(" ")),
        Prompt::new("Value"),
    ]
}

fn change_prompts(table: &Table) -> Vec<Prompt> {
    vec![
        Prompt::new("Field").with_hint(field_hint(table)),
        Prompt::new("New value"),
    ]
}

fn answer(answers: &[String], index: usize) -> &str {
    answers.get(index).map(String::as_str).unwrap_or_default()
}

fn is_blank(answers: &[String]) -> bool {
    answer(answers, 0).trim().is_empty()
}

fn is_yes(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "true" | "1"
    )
}
