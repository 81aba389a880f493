pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod view;

pub use app::{Application, SearchOutcome};
pub use config::Config;
pub use error::{FinderError, Result};
