mod app;
mod cli;
mod commands;
mod config;
mod effects;
mod form;
mod logging;
mod ui;

pub use app::run_app;
