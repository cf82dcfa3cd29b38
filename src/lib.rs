pub mod analytics;
pub mod chat;
pub mod commands;
pub mod config;
pub mod errors;
pub mod listing;
pub mod logging;
pub mod models;
pub mod responder;
pub mod storage;
pub mod tui;
