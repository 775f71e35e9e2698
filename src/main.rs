use chipmunk::config::{self, Args, Config};
use chipmunk::console::Session;
use chipmunk::executor::{Courier, Detached};
use chipmunk::gui::Application;
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let config = Config::from(Args::parse());
    config::init_logging(&config);

    let courier = match Courier::new(Detached) {
        Ok(courier) => courier,
        Err(err) => {
            error!(%err, "failed to start the request runtime");
            return ExitCode::FAILURE;
        }
    };

    if config.console {
        info!("starting console");
        let stdin = io::stdin().lock();
        let stdout = io::stdout().lock();
        if let Err(err) = Session::new(stdin, stdout, courier, &config).run() {
            error!(%err, "console failed");
            return ExitCode::FAILURE;
        }
    } else {
        info!("starting window");
        if let Err(err) = Application::new(courier, &config).launch() {
            error!(%err, "window failed");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
