// Crate root library declaration and module exports.
rust_i18n::i18n!("locales", fallback = "en");

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;
