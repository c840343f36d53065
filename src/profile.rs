//! Citation metrics from a Google Scholar profile page.
//!
//! The statistics table exposes its values as an unlabeled run of cells, so
//! they are read by position: citations, h-index and i10-index, each as an
//! (all, recent) pair.

use crate::error::{OptionExt, ScholarError, Result};
use crate::fetch::PageFetcher;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

/// Number of value cells in the statistics table
pub const METRIC_CELLS: usize = 6;

/// Aggregate citation metrics for one researcher.
///
/// Values are kept as page text since the table may show placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProfileMetrics {
    /// Researcher display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Header of the recent-window column (e.g. "Since 2020")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_window: Option<String>,
    pub citations_all: String,
    pub citations_recent: String,
    pub h_index_all: String,
    pub h_index_recent: String,
    pub i10_index_all: String,
    pub i10_index_recent: String,
}

impl ProfileMetrics {
    /// Label for the recent-window column, e.g. "Since 2020".
    pub fn recent_label(&self) -> &str {
        self.recent_window.as_deref().unwrap_or("Recent")
    }
}

/// Fetch a profile page and extract its metrics.
pub async fn fetch_metrics<F: PageFetcher + ?Sized>(fetcher: &F, profile_url: &Url) -> Result<ProfileMetrics> {
    info!(url = %profile_url, "Fetching profile metrics");
    let html = fetcher.fetch(profile_url).await?;
    parse_metrics(&html)
}

/// Parse the statistics table and name of a profile page.
///
/// # Errors
///
/// `ScholarError::Parse` if the table is missing or holds fewer than six
/// value cells.
pub fn parse_metrics(html: &str) -> Result<ProfileMetrics> {
    let document = Html::parse_document(html);

    let table_selector = selector("table#gsc_rsb_st")?;
    let value_selector = selector("td.gsc_rsb_std")?;
    let header_selector = selector("th.gsc_rsb_sth")?;
    let name_selector = selector("#gsc_prf_in")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_parse("metrics table not found")?;

    let values: Vec<String> = table.select(&value_selector).map(element_text).collect();

    // Header row is ["", "All", "Since 2020"]
    let recent_window = table
        .select(&header_selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .nth(1);

    let name = document
        .select(&name_selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty());

    // First six cells, in table order; extra cells are ignored
    let found = values.len();
    let [citations_all, citations_recent, h_index_all, h_index_recent, i10_index_all, i10_index_recent]: [String; METRIC_CELLS] =
        values
            .into_iter()
            .take(METRIC_CELLS)
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| {
                ScholarError::Parse(format!("expected {} metric values, found {}", METRIC_CELLS, found))
            })?;

    Ok(ProfileMetrics {
        name,
        recent_window,
        citations_all,
        citations_recent,
        h_index_all,
        h_index_recent,
        i10_index_all,
        i10_index_recent,
    })
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScholarError::Parse(e.to_string()))
}

/// Element text with inline markup flattened and whitespace collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
