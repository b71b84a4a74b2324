//! YAML configuration and template catalog for collage grids.

mod catalog;
mod config;
mod error;

pub use catalog::TemplateCatalog;
pub use config::{CollageConfig, GridConfig, HistoryConfig};
pub use error::ParseError;
