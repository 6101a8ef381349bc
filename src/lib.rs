pub mod api;
pub mod args;
pub mod commands;
pub mod config;
pub mod error;
pub mod help;
pub mod output;
pub mod poller;
