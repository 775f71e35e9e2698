pub mod presenter;

pub use presenter::ConsolePresenter;

use crate::config::Config;
use crate::dialog::{FilterPurpose, flow};
use crate::executor::{Courier, DispatchError, Dispatcher, Reply};
use crate::query::{Composer, Request};
use crate::schema::{Table, Value};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use tracing::{info, warn};

const HELP: &str = "\
tables          list known tables
create          create a table
open <table>    work with a table
insert          add a record to the open table
select          show records of the open table
delete          delete records of the open table
update          change records of the open table
clear           remove every record of the open table
drop            delete the open table
backup          back up the open table
export          export the open table
.exit / .quit   leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Tables,
    Create,
    Open(String),
    Insert,
    Select,
    Delete,
    Update,
    Clear,
    Drop,
    Backup,
    Export,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let command = match word.to_ascii_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "tables" => Command::Tables,
            "create" => Command::Create,
            "open" if !rest.is_empty() => return Ok(Command::Open(rest.to_owned())),
            "open" => return Err("usage: open <table>".to_owned()),
            "insert" => Command::Insert,
            "select" => Command::Select,
            "delete" => Command::Delete,
            "update" => Command::Update,
            "clear" => Command::Clear,
            "drop" => Command::Drop,
            "backup" => Command::Backup,
            "export" => Command::Export,
            _ => return Err(format!("unknown command `{word}`, try `help`")),
        };
        if rest.is_empty() {
            Ok(command)
        } else {
            Err(format!("`{word}` takes no arguments"))
        }
    }
}

/// Line-oriented front-end: a prompt loop over [`ConsolePresenter`].
pub struct Session<R, W, D> {
    presenter: ConsolePresenter<R, W>,
    courier: Courier<D>,
    composer: Composer,
    tables: Vec<Table>,
    current: Option<usize>,
}

impl<R: BufRead, W: Write, D: Dispatcher> Session<R, W, D> {
    pub fn new(input: R, output: W, courier: Courier<D>, config: &Config) -> Self {
        let mut tables = Vec::new();
        if config.sample_table {
            match Table::sample() {
                Ok(table) => tables.push(table),
                Err(err) => warn!(%err, "sample table rejected"),
            }
        }
        Self {
            presenter: ConsolePresenter::new(input, output),
            courier,
            composer: config.composer(),
            tables,
            current: None,
        }
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(
            self.presenter.output,
            "chipmunk console (type '.exit' or '.quit' to stop, 'help' for commands)"
        )?;
        loop {
            let prompt = match self.current_table() {
                Some(table) => format!("chipmunk [{table}]> "),
                None => "chipmunk> ".to_owned(),
            };
            write!(self.presenter.output, "{prompt}")?;
            self.presenter.output.flush()?;

            let Some(line) = self.presenter.read_line()? else {
                break;
            };
            let line = line.trim();
            if line == ".exit" || line == ".quit" {
                break;
            }
            if line.is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => self.execute(command)?,
                Err(message) => writeln!(self.presenter.output, "{message}")?,
            }
        }
        info!("console session finished");
        Ok(())
    }

    pub fn execute(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Help => writeln!(self.presenter.output, "{HELP}"),
            Command::Tables => self.list_tables(),
            Command::Create => {
                let created = flow::create_table(&mut self.presenter, &self.tables, &self.composer);
                if let Some(request) = created {
                    let table = request.table().clone();
                    self.dispatch(Request::Create(request))?;
                    self.tables.push(table);
                    self.current = Some(self.tables.len() - 1);
                }
                Ok(())
            }
            Command::Open(name) => match self.tables.iter().position(|t| t.name() == name) {
                Some(index) => {
                    self.current = Some(index);
                    Ok(())
                }
                None => writeln!(self.presenter.output, "no table named `{name}`"),
            },
            other => {
                let Some(table) = self.current_table().cloned() else {
                    return writeln!(self.presenter.output, "open a table first");
                };
                self.execute_on(other, &table)
            }
        }
    }

    fn execute_on(&mut self, command: Command, table: &Table) -> io::Result<()> {
        let request = match command {
            Command::Insert => {
                flow::add_record(&mut self.presenter, table, &self.composer).map(Request::from)
            }
            Command::Select => flow::filter_records(
                &mut self.presenter,
                table,
                FilterPurpose::Select,
                &self.composer,
            ),
            Command::Delete => flow::filter_records(
                &mut self.presenter,
                table,
                FilterPurpose::Delete,
                &self.composer,
            ),
            Command::Update => {
                flow::change_records(&mut self.presenter, table, &self.composer).map(Request::from)
            }
            Command::Clear => Some(Request::clear(table)),
            Command::Backup => Some(Request::backup(table)),
            Command::Export => Some(Request::export(table)),
            Command::Drop => {
                self.dispatch(Request::drop_table(table))?;
                self.tables.retain(|t| t.name() != table.name());
                self.current = None;
                return Ok(());
            }
            Command::Help | Command::Tables | Command::Create | Command::Open(_) => None,
        };
        match request {
            Some(request) => self.dispatch(request),
            None => writeln!(self.presenter.output, "cancelled"),
        }
    }

    fn list_tables(&mut self) -> io::Result<()> {
        if self.tables.is_empty() {
            return writeln!(self.presenter.output, "no tables");
        }
        for (index, table) in self.tables.iter().enumerate() {
            let marker = if Some(index) == self.current { '*' } else { ' ' };
            let fields: Vec<String> = table.fields().iter().map(ToString::to_string).collect();
            writeln!(
                self.presenter.output,
                "{marker} {table} ({})",
                fields.join(", ")
            )?;
        }
        Ok(())
    }

    fn dispatch(&mut self, request: Request) -> io::Result<()> {
        let table = self.current_table().cloned();
        let result = self.courier.dispatch_blocking(request);
        self.show(result, table.as_ref())
    }

    fn show(&mut self, result: Result<Reply, DispatchError>, table: Option<&Table>) -> io::Result<()> {
        let out = &mut self.presenter.output;
        match result {
            Ok(Reply::Success) => writeln!(out, "SUCCESS"),
            Ok(Reply::Tables(names)) => writeln!(out, "{}", names.join("\n")),
            Ok(Reply::Rows(rows)) => write!(out, "{}", render_rows(table, &rows)),
            Err(err) => writeln!(out, "ERROR: {err}"),
        }
    }

    fn current_table(&self) -> Option<&Table> {
        self.current.and_then(|index| self.tables.get(index))
    }
}

/// Markdown-style grid, one header cell per field.
pub fn render_rows(table: Option<&Table>, rows: &[Vec<Value>]) -> String {
    let mut out = String::new();
    if let Some(table) = table {
        let header: Vec<String> = table
            .fields()
            .iter()
            .map(|field| format!("{} ({})", field.name(), field.field_type()))
            .collect();
        out.push_str(&format!("| {} |\n", header.join(" | ")));
        out.push_str(&format!("|{}\n", " --- |".repeat(header.len())));
    }
    for row in rows {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}
