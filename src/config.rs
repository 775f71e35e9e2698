use crate::query::{Composer, EmptyFilterPolicy};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Build table queries from a desktop window or a console prompt.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Run the line-oriented console instead of the window.
    #[arg(long)]
    pub console: bool,

    /// What a select, delete or update without filters means.
    #[arg(long, value_enum, default_value_t = EmptyFilterPolicy::MatchAll)]
    pub empty_filters: EmptyFilterPolicy,

    /// Start without the sample table.
    #[arg(long)]
    pub no_sample: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub console: bool,
    pub empty_filters: EmptyFilterPolicy,
    pub sample_table: bool,
    pub log: String,
}

impl Config {
    pub fn composer(&self) -> Composer {
        Composer::new(self.empty_filters)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            console: false,
            empty_filters: EmptyFilterPolicy::default(),
            sample_table: true,
            log: "info".to_owned(),
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            console: args.console,
            empty_filters: args.empty_filters,
            sample_table: !args.no_sample,
            log: args.log,
        }
    }
}

/// `RUST_LOG` wins over the configured filter.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
