mod modal;

use crate::config::Config;
use crate::dialog::check_new_table;
use crate::executor::{Courier, Delivery, Detached, Dispatcher, Reply, Ticket};
use crate::query::{Composer, CreateRequest, Request};
use crate::schema::{Table, Value};
use eframe::{App, egui};
use egui::Color32;
use egui_extras::{Column, TableBuilder};
use modal::{Modal, Outcome};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
enum Page {
    Tables,
    Records { table: usize, rows: Vec<Vec<Value>> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Status {
    ok: bool,
    text: String,
}

enum Action {
    Send(Request),
    Open(usize),
    Drop(usize),
    Back,
    Show(Modal),
}

pub struct Application<D = Detached> {
    courier: Courier<D>,
    composer: Composer,
    tables: Vec<Table>,
    page: Page,
    modal: Option<Modal>,
    status: Option<Status>,
    /// The select whose rows the open records page is waiting for.
    awaiting_rows: Option<Ticket>,
}

impl<D: Dispatcher> App for Application<D> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Some(delivery) = self.courier.poll() {
            self.receive(delivery);
        }

        let mut actions = Vec::new();
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.draw_status(ui));
        egui::CentralPanel::default().show(ctx, |ui| match &self.page {
            Page::Tables => self.draw_tables(ui, &mut actions),
            Page::Records { table: index, rows } => {
                if let Some(table) = self.tables.get(*index) {
                    draw_records(ui, *index, table, rows, &mut actions);
                }
            }
        });

        if let Some(mut modal) = self.modal.take() {
            match modal.show(ctx, &self.composer, &self.tables) {
                Outcome::Open => self.modal = Some(modal),
                Outcome::Failed(message) => {
                    self.fail(message);
                    self.modal = Some(modal);
                }
                Outcome::Closed => {}
                Outcome::Created(request) => self.create(request),
                Outcome::Submitted(request) => actions.push(Action::Send(request)),
            }
        }

        for action in actions {
            self.handle(action);
        }
        if self.courier.in_flight() > 0 {
            ctx.request_repaint();
        }
    }
}

impl<D: Dispatcher> Application<D> {
    pub fn new(courier: Courier<D>, config: &Config) -> Self {
        let mut tables = Vec::new();
        if config.sample_table {
            match Table::sample() {
                Ok(table) => tables.push(table),
                Err(err) => warn!(%err, "sample table rejected"),
            }
        }
        Self {
            courier,
            composer: config.composer(),
            tables,
            page: Page::Tables,
            modal: None,
            status: None,
            awaiting_rows: None,
        }
    }

    pub fn launch(self) -> eframe::Result {
        let options = eframe::NativeOptions::default();
        eframe::run_native(
            "Chipmunk",
            options,
            Box::new(|_cc| Ok(Box::new(self))),
        )
    }

    fn handle(&mut self, action: Action) {
        match action {
            Action::Send(request) => {
                let select = matches!(request, Request::Select(_));
                let ticket = self.courier.send(request);
                debug!(ticket = ticket.0, "request queued");
                if select {
                    self.awaiting_rows = Some(ticket);
                }
            }
            Action::Open(index) => {
                self.awaiting_rows = None;
                self.page = Page::Records {
                    table: index,
                    rows: Vec::new(),
                };
            }
            Action::Drop(index) => {
                if index < self.tables.len() {
                    self.awaiting_rows = None;
                    let table = self.tables.remove(index);
                    self.courier.send(Request::drop_table(&table));
                    self.page = Page::Tables;
                }
            }
            Action::Back => {
                self.awaiting_rows = None;
                self.page = Page::Tables;
            }
            Action::Show(modal) => self.modal = Some(modal),
        }
    }

    /// Adds a created table locally and sends the request, unless the name
    /// is already taken.
    fn create(&mut self, request: CreateRequest) {
        if let Err(err) = check_new_table(&self.tables, request.table().name()) {
            self.fail(err.to_string());
            return;
        }
        self.tables.push(request.table().clone());
        self.handle(Action::Send(Request::Create(request)));
    }

    fn receive(&mut self, delivery: Delivery) {
        let Delivery {
            ticket,
            kind,
            result,
        } = delivery;
        match result {
            Ok(Reply::Success) => self.succeed(format!("{kind}: success")),
            Ok(Reply::Tables(names)) => self.succeed(format!("tables: {}", names.join(", "))),
            Ok(Reply::Rows(found)) => {
                let count = found.len();
                match &mut self.page {
                    Page::Records { rows, .. } if self.awaiting_rows == Some(ticket) => {
                        *rows = found;
                        self.awaiting_rows = None;
                    }
                    _ => {
                        debug!(ticket = ticket.0, "dropping rows for a page no longer shown");
                        return;
                    }
                }
                self.succeed(format!("{kind}: {count} record(s)"));
            }
            Err(err) => self.fail(format!("{kind}: {err}")),
        }
    }

    fn succeed(&mut self, text: String) {
        self.status = Some(Status { ok: true, text });
    }

    fn fail(&mut self, text: String) {
        self.status = Some(Status { ok: false, text });
    }

    fn draw_status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.courier.in_flight() > 0 {
                ui.spinner();
            }
            match &self.status {
                Some(Status { ok: true, text }) => {
                    ui.colored_label(Color32::GREEN, text);
                }
                Some(Status { ok: false, text }) => {
                    ui.colored_label(Color32::RED, format!("Error: {text}"));
                }
                None => {
                    ui.label("Ready.");
                }
            }
        });
    }

    fn draw_tables(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            ui.heading("Tables");
            if ui.button("Create table").clicked() {
                actions.push(Action::Show(Modal::create_table()));
            }
            if ui.button("Refresh").clicked() {
                actions.push(Action::Send(Request::ListTables));
            }
        });
        ui.separator();
        if self.tables.is_empty() {
            ui.label("No tables yet.");
            return;
        }
        egui::Grid::new("tables").striped(true).show(ui, |ui| {
            for (index, table) in self.tables.iter().enumerate() {
                ui.strong(table.name());
                let fields: Vec<String> = table.fields().iter().map(ToString::to_string).collect();
                ui.label(fields.join(", "));
                if ui.button("Open").clicked() {
                    actions.push(Action::Open(index));
                }
                if ui.button("Backup").clicked() {
                    actions.push(Action::Send(Request::backup(table)));
                }
                if ui.button("Export").clicked() {
                    actions.push(Action::Send(Request::export(table)));
                }
                if ui.button("Delete").clicked() {
                    actions.push(Action::Drop(index));
                }
                ui.end_row();
            }
        });
    }
}

fn draw_records(
    ui: &mut egui::Ui,
    index: usize,
    table: &Table,
    rows: &[Vec<Value>],
    actions: &mut Vec<Action>,
) {
    ui.horizontal(|ui| {
        if ui.button("Back").clicked() {
            actions.push(Action::Back);
        }
        ui.heading(table.name());
        if ui.button("Show records").clicked() {
            actions.push(Action::Show(Modal::select(table)));
        }
        if ui.button("Add record").clicked() {
            actions.push(Action::Show(Modal::record(table)));
        }
        if ui.button("Delete records").clicked() {
            actions.push(Action::Show(Modal::delete(table)));
        }
        if ui.button("Change records").clicked() {
            actions.push(Action::Show(Modal::change(table)));
        }
        if ui.button("Clear").clicked() {
            actions.push(Action::Send(Request::clear(table)));
        }
        if ui.button("Delete table").clicked() {
            actions.push(Action::Drop(index));
        }
    });
    ui.separator();

    let columns = table.fields().len();
    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().at_least(60.0).resizable(true), columns)
        .header(20.0, |mut header| {
            for field in table.fields() {
                header.col(|ui| {
                    ui.strong(format!("{} ({})", field.name(), field.field_type()));
                });
            }
        })
        .body(|mut body| {
            for row in rows {
                body.row(18.0, |mut cells| {
                    for value in row.iter().take(columns) {
                        cells.col(|ui| {
                            ui.label(value.to_string());
                        });
                    }
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::DispatchError;
    use crate::query::{Composer, build_query_request};
    use crate::schema::{Field, FieldType};

    struct Quiet;

    impl Dispatcher for Quiet {
        async fn dispatch(&self, _request: Request) -> Result<Reply, DispatchError> {
            Ok(Reply::Success)
        }
    }

    fn app() -> Application<Quiet> {
        Application::new(Courier::new(Quiet).unwrap(), &Config::default())
    }

    fn delivery(
        ticket: Ticket,
        kind: &'static str,
        result: Result<Reply, DispatchError>,
    ) -> Delivery {
        Delivery {
            ticket,
            kind,
            result,
        }
    }

    fn select(app: &mut Application<Quiet>) -> Ticket {
        let query = build_query_request(app.tables[0].clone(), vec![]).unwrap();
        app.handle(Action::Send(Request::Select(query)));
        app.awaiting_rows.unwrap()
    }

    #[test]
    fn test_starts_with_sample_table() {
        let app = app();
        assert_eq!(app.tables.len(), 1);
        assert_eq!(app.page, Page::Tables);

        let config = Config {
            sample_table: false,
            ..Config::default()
        };
        let empty = Application::new(Courier::new(Quiet).unwrap(), &config);
        assert!(empty.tables.is_empty());
    }

    #[test]
    fn test_rows_fill_the_open_page() {
        let mut app = app();
        app.handle(Action::Open(0));
        let ticket = select(&mut app);
        app.receive(delivery(
            ticket,
            "select records",
            Ok(Reply::Rows(vec![vec![Value::U64(1)]])),
        ));
        assert_eq!(
            app.page,
            Page::Records {
                table: 0,
                rows: vec![vec![Value::U64(1)]]
            }
        );
        assert_eq!(
            app.status,
            Some(Status {
                ok: true,
                text: "select records: 1 record(s)".into()
            })
        );
    }

    #[test]
    fn test_errors_reach_the_status_line() {
        let mut app = app();
        app.receive(delivery(
            Ticket(0),
            "backup table",
            Err(DispatchError::new("disk full")),
        ));
        assert_eq!(
            app.status,
            Some(Status {
                ok: false,
                text: "backup table: disk full".into()
            })
        );
    }

    #[test]
    fn test_drop_removes_table_and_goes_back() {
        let mut app = app();
        app.handle(Action::Open(0));
        app.handle(Action::Drop(0));
        assert!(app.tables.is_empty());
        assert_eq!(app.page, Page::Tables);
        assert_eq!(app.courier.in_flight(), 1);
    }

    #[test]
    fn test_rows_for_a_left_page_are_dropped() {
        let mut app = app();
        app.handle(Action::Open(0));
        let ticket = select(&mut app);
        app.handle(Action::Back);
        app.handle(Action::Open(0));
        app.receive(delivery(
            ticket,
            "select records",
            Ok(Reply::Rows(vec![vec![Value::U64(1)]])),
        ));
        assert_eq!(
            app.page,
            Page::Records {
                table: 0,
                rows: Vec::new()
            }
        );
        assert!(app.status.is_none());
    }

    #[test]
    fn test_create_refuses_taken_name() {
        let mut app = app();
        let table = Table::new("Some table", vec![Field::new("id", FieldType::U64).unwrap()]).unwrap();
        app.create(Composer::default().create(table).unwrap());
        assert_eq!(app.tables.len(), 1);
        assert_eq!(app.courier.in_flight(), 0);
        assert_eq!(
            app.status,
            Some(Status {
                ok: false,
                text: "table `Some table` already exists".into()
            })
        );

        let table = Table::new("users", vec![Field::new("id", FieldType::U64).unwrap()]).unwrap();
        app.create(Composer::default().create(table).unwrap());
        assert_eq!(app.tables.len(), 2);
        assert_eq!(app.courier.in_flight(), 1);
    }
}
