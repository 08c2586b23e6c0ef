//! # Sitemap Generation Library
//!
//! Generates sitemaps.org XML sitemaps from a declarative description of a website's pages.
//!
//! Each page declares a path template plus path and query parameters with enumerable values.
//! Every combination of those values becomes one URL. URLs are written to a single `sitemap.xml`,
//! or, past the per-file limit, to numbered chunk files plus a `sitemap.xml` index.
//!
//! ## Examples
//!
//! ```no_run
//! use core_smap::{Page, Param, SaveOptions, Site, SitemapGenerator};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let site = Site::new(
//!         "https://example.com",
//!         vec![
//!             Page::new("/blog")
//!                 .with_query_param(Param::new("page", ["1", "2", "3"]))
//!                 .with_query_param(Param::new("sort", ["asc", "desc"])),
//!             Page::new("/blog/{id}")
//!                 .with_path_param(Param::new("id", ["1", "2", "3"]))
//!                 .with_priority_fn(|_, path_params, _| {
//!                     (path_params.get("id") == Some("1")).then(|| "1.0".to_string())
//!                 }),
//!         ],
//!     );
//!
//!     let generator = SitemapGenerator::new(site);
//!     for url in generator.iter_urls() {
//!         println!("{}", url?.loc);
//!     }
//!
//!     let options = SaveOptions::builder().chunk_size(1000).build();
//!     generator.save("public", &options)?;
//!     Ok(())
//! }
//! ```

pub mod common;
mod config;
mod errors;
pub mod expand;
mod generator;
mod site_file;
pub mod writer;

// Public API re-exports
pub use config::{DEFAULT_CHUNK_PREFIX, DEFAULT_INDEX_FILENAME, SaveOptions, SaveOptionsBuilder};
pub use errors::{Result, SitemapError};
pub use generator::SitemapGenerator;
pub use site_file::{load_site, parse_site};
pub use writer::SaveReport;

pub use common::logging::setup_logging;

pub use data_model_smap::{
    ChangeFreq, InvalidPriority, MetaField, Page, Param, ParamAssignment, Priority, Site, SiteMapUrl,
};
