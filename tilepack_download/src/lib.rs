//! Downloads raster tiles from a WMTS/XYZ service into a `z/x/y.ext` directory tree.
//!
//! ```no_run
//! use tilepack_download::{DownloadConfig, DownloadOrchestrator};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = DownloadConfig::default();
//! let orchestrator = DownloadOrchestrator::new(&config)?;
//! let report = orchestrator.run(&config.bbox, config.min_zoom, config.max_zoom).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::*;

mod fetcher;
pub use fetcher::*;

mod http;
pub use http::*;

#[cfg(any(test, feature = "test"))]
pub mod mock;
#[cfg(any(test, feature = "test"))]
pub use mock::{MockFetcher, MockResponse};

mod orchestrator;
pub use orchestrator::*;

mod stats;
pub use stats::*;

mod store;
pub use store::*;

mod url_template;
pub use url_template::*;
