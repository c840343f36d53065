//! # scholarstats
//!
//! Google Scholar profile metrics, citation ranking and undercitation report.
//!
//! ## Modules
//!
//! - [`fetch`] - HTTP page fetching behind the [`fetch::PageFetcher`] trait
//! - [`profile`] - Citation metrics (citations, h-index, i10-index) from a profile page
//! - [`publications`] - Paginated publication list scraping
//! - [`analysis`] - Ranking, undercitation and summary views
//! - [`report`] - Text, JSON and CSV rendering
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scholarstats::analysis::rank_by_citations;
//! use scholarstats::fetch::{FetchOptions, HttpFetcher};
//! use scholarstats::publications::{fetch_all_publications, PaginationOptions, ProfileRef};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetcher = HttpFetcher::new(&FetchOptions::default())?;
//!     let profile = ProfileRef::from_url("https://scholar.google.com/citations?user=6ImtercAAAAJ&hl=en")?;
//!     let publications = fetch_all_publications(&fetcher, &profile, &PaginationOptions::default()).await?;
//!     for publication in rank_by_citations(&publications).iter().take(5) {
//!         println!("{} ({} citations)", publication.title, publication.citations);
//!     }
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod error;
pub mod fetch;
pub mod profile;
pub mod publications;
pub mod report;

pub use error::{Result, ScholarError};
