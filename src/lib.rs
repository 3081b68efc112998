// Folio library.
// GitHub fetch cache proxy and the emulated editor window behind the portfolio site.

pub mod cache;
pub mod config;
pub mod desk;
pub mod error;
pub mod github;
pub mod handlers;
pub mod logging;
pub mod proxy;
pub mod window;

pub use config::Config;
pub use error::{FolioError, Result};
