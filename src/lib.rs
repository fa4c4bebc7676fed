//! drama_browser - browse a drama-streaming catalog
//!
//! This library wraps the upstream DramaBox catalog API: an HTTP client with
//! timeout and retry, typed endpoint access, normalization of the upstream
//! records, and a fail-soft [`Library`] that page renderers can rely on.
//! Pages are served as JSON by [`server`] and browsed in the terminal by the
//! bundled binary.

pub mod config;
pub mod http_client;
pub mod library;
pub mod mapper;
pub mod model;
pub mod pages;
pub mod pagination;
pub mod request_state;
pub mod server;
pub mod upstream;

// Re-export the commonly used types
pub use config::{ApiConfig, Endpoint};
pub use http_client::{ApiClient, ApiError};
pub use library::Library;
pub use model::{Drama, DramaDetail, Episode, SearchParams, VideoUrl};
pub use pages::Category;
pub use pagination::{HttpPageSource, LoadMore, PageSource};
pub use request_state::RequestState;
pub use upstream::{Catalog, DramaBoxService};

use std::io;
use thiserror::Error;

/// Top-level error type for drama_browser operations
#[derive(Debug, Error)]
pub enum DramaBrowserError {
    /// Error while setting up or talking to the upstream API
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Unknown category slug
    #[error(transparent)]
    Category(#[from] pages::UnknownCategory),

    /// Interactive prompt failed
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Opens a [`Library`] over the DramaBox API described by `config`.
///
/// # Examples
///
/// ```no_run
/// use drama_browser::{ApiConfig, open_library};
///
/// # async fn run() -> Result<(), drama_browser::DramaBrowserError> {
/// let library = open_library(ApiConfig::from_env())?;
/// for drama in library.trending().await {
///     println!("{} ({})", drama.title, drama.id);
/// }
/// # Ok(())
/// # }
/// ```
pub fn open_library(config: ApiConfig) -> Result<Library<DramaBoxService>, DramaBrowserError> {
    Ok(Library::new(DramaBoxService::new(config)?))
}
