pub mod config;
pub mod console;
pub mod dialog;
pub mod error;
pub mod executor;
pub mod gui;
pub mod name;
pub mod query;
pub mod schema;
