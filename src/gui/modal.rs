//! Modal windows over the dialog state machines.

use crate::dialog::{
    ChangeDialog, CreateTableDialog, FieldDialog, FilterDialog, FilterPurpose, OptionDialog,
    RecordDialog, check_new_table,
};
use crate::query::{Comparison, Composer, CreateRequest, Request};
use crate::schema::{FieldType, Table};
use eframe::egui;

pub(super) enum Outcome {
    Open,
    Closed,
    Failed(String),
    Created(CreateRequest),
    Submitted(Request),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Filter,
    Change,
}

pub(super) enum Modal {
    CreateTable {
        dialog: CreateTableDialog,
        field: Option<FieldDialog>,
    },
    Filter {
        dialog: FilterDialog,
        option: Option<OptionDialog>,
    },
    Change {
        dialog: ChangeDialog,
        option: Option<(OptionDialog, Target)>,
    },
    Record(RecordDialog),
}

impl Modal {
    pub(super) fn create_table() -> Self {
        Modal::CreateTable {
            dialog: CreateTableDialog::default(),
            field: None,
        }
    }

    pub(super) fn select(table: &Table) -> Self {
        Self::filter(table, FilterPurpose::Select)
    }

    pub(super) fn delete(table: &Table) -> Self {
        Self::filter(table, FilterPurpose::Delete)
    }

    fn filter(table: &Table, purpose: FilterPurpose) -> Self {
        Modal::Filter {
            dialog: FilterDialog::new(table.clone(), purpose),
            option: None,
        }
    }

    pub(super) fn change(table: &Table) -> Self {
        Modal::Change {
            dialog: ChangeDialog::new(table.clone()),
            option: None,
        }
    }

    pub(super) fn record(table: &Table) -> Self {
        Modal::Record(RecordDialog::new(table.clone()))
    }

    fn title(&self) -> String {
        match self {
            Modal::CreateTable { .. } => "Create table".to_owned(),
            Modal::Filter { dialog, .. } => match dialog.purpose() {
                FilterPurpose::Select => format!("Show records of {}", dialog.table()),
                FilterPurpose::Delete => format!("Delete records of {}", dialog.table()),
            },
            Modal::Change { dialog, .. } => format!("Change records of {}", dialog.table()),
            Modal::Record(dialog) => format!("Add record to {}", dialog.table()),
        }
    }

    /// `existing` holds the tables a new table must not collide with.
    pub(super) fn show(
        &mut self,
        ctx: &egui::Context,
        composer: &Composer,
        existing: &[Table],
    ) -> Outcome {
        let mut outcome = Outcome::Open;
        egui::Window::new(self.title())
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                outcome = match self {
                    Modal::CreateTable { dialog, field } => {
                        create_table(ui, dialog, field, composer, existing)
                    }
                    Modal::Filter { dialog, option } => filter(ui, dialog, option, composer),
                    Modal::Change { dialog, option } => change(ui, dialog, option, composer),
                    Modal::Record(dialog) => record(ui, dialog, composer),
                };
            });
        outcome
    }
}

fn create_table(
    ui: &mut egui::Ui,
    dialog: &mut CreateTableDialog,
    field: &mut Option<FieldDialog>,
    composer: &Composer,
    existing: &[Table],
) -> Outcome {
    ui.horizontal(|ui| {
        ui.label("Name");
        ui.text_edit_singleline(&mut dialog.name);
    });

    let mut removed = None;
    for (index, f) in dialog.fields().iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(f.to_string());
            if f.is_indexed() {
                ui.weak("indexed");
            }
            if ui.small_button("Remove").clicked() {
                removed = Some(index);
            }
        });
    }
    if let Some(index) = removed {
        dialog.remove_field(index);
    }

    let mut outcome = Outcome::Open;
    if let Some(sub) = field.as_mut() {
        let mut done = false;
        ui.group(|ui| {
            ui.label("Add field");
            ui.horizontal(|ui| {
                ui.label("Name");
                ui.text_edit_singleline(&mut sub.name);
            });
            let selected = sub.field_type.map(FieldType::as_str).unwrap_or("(none)");
            egui::ComboBox::from_id_salt("field type")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for ty in FieldType::ALL {
                        ui.selectable_value(&mut sub.field_type, Some(ty), ty.as_str());
                    }
                });
            ui.checkbox(&mut sub.is_indexed, "Indexed");
            ui.checkbox(&mut sub.is_primary_key, "Primary key");
            ui.horizontal(|ui| {
                if ui.button("Add").clicked() {
                    let added = sub.submit().map(|f| {
                        done = true;
                        dialog.add_field(f)
                    });
                    if let Err(err) = added.and_then(|added| added) {
                        outcome = Outcome::Failed(err.to_string());
                    }
                } else if ui.button("Cancel").clicked() {
                    sub.cancel();
                    done = true;
                }
            });
        });
        if done {
            *field = None;
        }
        return outcome;
    }

    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Add field").clicked() {
            *field = Some(FieldDialog::default());
        }
        if ui.button("Create").clicked() {
            outcome = match check_new_table(existing, &dialog.name) {
                Ok(()) => match dialog.submit_request(composer) {
                    Ok(request) => Outcome::Created(request),
                    Err(err) => Outcome::Failed(err.to_string()),
                },
                Err(err) => Outcome::Failed(err.to_string()),
            };
        }
        if ui.button("Cancel").clicked() {
            dialog.cancel();
            outcome = Outcome::Closed;
        }
    });
    outcome
}

fn filter(
    ui: &mut egui::Ui,
    dialog: &mut FilterDialog,
    option: &mut Option<OptionDialog>,
    composer: &Composer,
) -> Outcome {
    let mut removed = None;
    for (index, f) in dialog.filters().iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(f.to_string());
            if ui.small_button("Remove").clicked() {
                removed = Some(index);
            }
        });
    }
    if let Some(index) = removed {
        dialog.remove_filter(index);
    }

    if let Some(sub) = option.as_mut() {
        let mut outcome = Outcome::Open;
        let mut done = false;
        ui.group(|ui| {
            ui.label("Add filter");
            option_editor(ui, sub, true);
            ui.horizontal(|ui| {
                if ui.button("Add").clicked() {
                    let added = sub.submit_filter().map(|f| {
                        done = true;
                        dialog.add_filter(f)
                    });
                    if let Err(err) = added.and_then(|added| added) {
                        outcome = Outcome::Failed(err.to_string());
                    }
                } else if ui.button("Cancel").clicked() {
                    sub.cancel();
                    done = true;
                }
            });
        });
        if done {
            *option = None;
        }
        return outcome;
    }

    ui.separator();
    let mut outcome = Outcome::Open;
    ui.horizontal(|ui| {
        if ui.button("Add filter").clicked() {
            *option = Some(OptionDialog::new(dialog.table()));
        }
        if ui.button("Apply").clicked() {
            outcome = match dialog.submit(composer) {
                Ok(request) => Outcome::Submitted(request),
                Err(err) => Outcome::Failed(err.to_string()),
            };
        }
        if ui.button("Cancel").clicked() {
            dialog.cancel();
            outcome = Outcome::Closed;
        }
    });
    outcome
}

fn change(
    ui: &mut egui::Ui,
    dialog: &mut ChangeDialog,
    option: &mut Option<(OptionDialog, Target)>,
    composer: &Composer,
) -> Outcome {
    let mut removed_filter = None;
    let mut removed_change = None;
    ui.label("Filters");
    for (index, f) in dialog.filters().iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(f.to_string());
            if ui.small_button("Remove").clicked() {
                removed_filter = Some(index);
            }
        });
    }
    ui.label("Changes");
    for (index, c) in dialog.changes().iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(c.to_string());
            if ui.small_button("Remove").clicked() {
                removed_change = Some(index);
            }
        });
    }
    if let Some(index) = removed_filter {
        dialog.remove_filter(index);
    }
    if let Some(index) = removed_change {
        dialog.remove_change(index);
    }

    if let Some((sub, target)) = option.as_mut() {
        let target = *target;
        let mut outcome = Outcome::Open;
        let mut done = false;
        ui.group(|ui| {
            ui.label(match target {
                Target::Filter => "Add filter",
                Target::Change => "Add change",
            });
            option_editor(ui, sub, target == Target::Filter);
            ui.horizontal(|ui| {
                if ui.button("Add").clicked() {
                    let added = match target {
                        Target::Filter => sub.submit_filter().map(|f| {
                            done = true;
                            dialog.add_filter(f)
                        }),
                        Target::Change => sub.submit_change().map(|c| {
                            done = true;
                            dialog.add_change(c)
                        }),
                    };
                    if let Err(err) = added.and_then(|added| added) {
                        outcome = Outcome::Failed(err.to_string());
                    }
                } else if ui.button("Cancel").clicked() {
                    sub.cancel();
                    done = true;
                }
            });
        });
        if done {
            *option = None;
        }
        return outcome;
    }

    ui.separator();
    let mut outcome = Outcome::Open;
    ui.horizontal(|ui| {
        if ui.button("Add filter").clicked() {
            *option = Some((OptionDialog::new(dialog.table()), Target::Filter));
        }
        if ui.button("Add change").clicked() {
            *option = Some((OptionDialog::new(dialog.table()), Target::Change));
        }
        if ui.button("Apply").clicked() {
            outcome = match dialog.submit(composer) {
                Ok(request) => Outcome::Submitted(Request::Update(request)),
                Err(err) => Outcome::Failed(err.to_string()),
            };
        }
        if ui.button("Cancel").clicked() {
            dialog.cancel();
            outcome = Outcome::Closed;
        }
    });
    outcome
}

fn record(ui: &mut egui::Ui, dialog: &mut RecordDialog, composer: &Composer) -> Outcome {
    let fields = dialog.table().fields().to_vec();
    egui::Grid::new("record").num_columns(2).show(ui, |ui| {
        for (field, value) in fields.iter().zip(dialog.values.iter_mut()) {
            ui.label(format!("{} ({})", field.name(), field.field_type()));
            ui.text_edit_singleline(value);
            ui.end_row();
        }
    });

    ui.separator();
    let mut outcome = Outcome::Open;
    ui.horizontal(|ui| {
        if ui.button("Add").clicked() {
            outcome = match dialog.submit(composer) {
                Ok(request) => Outcome::Submitted(Request::Insert(request)),
                Err(err) => Outcome::Failed(err.to_string()),
            };
        }
        if ui.button("Cancel").clicked() {
            dialog.cancel();
            outcome = Outcome::Closed;
        }
    });
    outcome
}

/// Field picker and value box. Filters also pick a comparison.
fn option_editor(ui: &mut egui::Ui, option: &mut OptionDialog, with_comparison: bool) {
    let names: Vec<String> = option.fields().iter().map(|f| f.name().to_owned()).collect();
    let selected = option
        .selected_field()
        .map(|f| f.name().to_owned())
        .unwrap_or_else(|| "(none)".to_owned());
    egui::ComboBox::from_id_salt("option field")
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for (index, name) in names.iter().enumerate() {
                ui.selectable_value(&mut option.selected, Some(index), name.as_str());
            }
        });
    if with_comparison {
        egui::ComboBox::from_id_salt("option comparison")
            .selected_text(option.comparison.as_str())
            .show_ui(ui, |ui| {
                for cmp in Comparison::ALL {
                    ui.selectable_value(&mut option.comparison, cmp, cmp.as_str());
                }
            });
    }
    ui.horizontal(|ui| {
        ui.label("Value");
        ui.text_edit_singleline(&mut option.value);
    });
}
