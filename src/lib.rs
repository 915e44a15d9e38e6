pub mod browser;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod logging;
pub mod navigation;
pub mod resolve;
pub mod routes;
pub mod scope;
pub mod seed;
pub mod selection;
pub mod state;
pub mod views;

pub use browser::Browser;
pub use error::{BrowseError, Result};
