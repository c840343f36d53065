//! Publication list scraping with pagination.
//!
//! The profile's publication table is served in pages of `pagesize` rows
//! starting at `cstart`. Pages are fetched one after another until a short
//! page comes back.

use crate::error::{OptionExt, ScholarError, Result};
use crate::fetch::PageFetcher;
use crate::profile::{element_text, selector};
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

/// Default Google Scholar URL
pub const DEFAULT_SCHOLAR_URL: &str = "https://scholar.google.com";

/// Rows requested per listing page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default cap on listing pages fetched per profile
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Locale used when the profile URL has no `hl` parameter
pub const DEFAULT_LOCALE: &str = "en";

/// Placeholder for missing text fields
pub const NOT_AVAILABLE: &str = "N/A";

/// One row of a profile's publication table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    pub authors: String,
    pub venue: String,
    /// Year as shown on the page, or "N/A"
    pub year: String,
    pub citations: u64,
}

impl Default for Publication {
    fn default() -> Self {
        Self {
            title: NOT_AVAILABLE.to_string(),
            authors: NOT_AVAILABLE.to_string(),
            venue: NOT_AVAILABLE.to_string(),
            year: NOT_AVAILABLE.to_string(),
            citations: 0,
        }
    }
}

impl Publication {
    /// Publication year, if the year field is all digits.
    pub fn numeric_year(&self) -> Option<i32> {
        if self.year.is_empty() || !self.year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.year.parse().ok()
    }
}

/// Identifies whose publications to list and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRef {
    /// Scheme and host serving the listing pages
    pub base_url: Url,
    /// Scholar user identifier (`user=` parameter)
    pub user_id: String,
    /// Interface locale (`hl=` parameter)
    pub locale: String,
}

impl ProfileRef {
    /// Profile on the default host with the default locale.
    pub fn new(user_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: default_base_url()?,
            user_id: user_id.into(),
            locale: DEFAULT_LOCALE.to_string(),
        })
    }

    /// Derive identifier, locale and host from a profile URL.
    ///
    /// # Errors
    ///
    /// `ScholarError::Parse("could not extract identifier")` when the URL has
    /// no `user` parameter.
    pub fn from_url(profile_url: &str) -> Result<Self> {
        ProfileQuery::from_url(profile_url).resolve()
    }

    /// Replace the listing host.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ScholarError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        self.base_url = origin_of(&url)?;
        Ok(self)
    }

    /// URL of the profile page itself.
    pub fn profile_url(&self) -> Result<Url> {
        let mut url = self.citations_url()?;
        url.query_pairs_mut()
            .append_pair("user", &self.user_id)
            .append_pair("hl", &self.locale);
        Ok(url)
    }

    /// URL of the listing page starting at row `start`.
    pub fn listing_url(&self, start: usize, page_size: usize) -> Result<Url> {
        let mut url = self.profile_url()?;
        url.query_pairs_mut()
            .append_pair("cstart", &start.to_string())
            .append_pair("pagesize", &page_size.to_string());
        Ok(url)
    }

    fn citations_url(&self) -> Result<Url> {
        self.base_url
            .join("/citations")
            .map_err(|e| ScholarError::Config(format!("Invalid base URL: {}", e)))
    }
}

fn default_base_url() -> Result<Url> {
    Url::parse(DEFAULT_SCHOLAR_URL).map_err(|e| ScholarError::Config(format!("Invalid base URL: {}", e)))
}

fn origin_of(url: &Url) -> Result<Url> {
    let mut origin = url.clone();
    origin.set_query(None);
    origin.set_fragment(None);
    origin.set_path("/");
    if origin.cannot_be_a_base() {
        return Err(ScholarError::Config(format!("Invalid base URL: {}", url)));
    }
    Ok(origin)
}

/// Decoded value of a non-empty query parameter.
fn query_param(url: &str, name: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or_default();
    let query = without_fragment
        .split_once('?')
        .map_or(without_fragment, |(_, query)| query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key == name && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// A profile as given on the command line: an optional URL plus overrides.
///
/// Each part of the resulting [`ProfileRef`] is taken from its override when
/// set, else from the URL, else from the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileQuery {
    /// Profile URL, absolute or just `citations?user=...`
    pub url: Option<String>,
    /// Overrides the URL's `user` parameter
    pub user: Option<String>,
    /// Overrides the URL's `hl` parameter
    pub locale: Option<String>,
    /// Overrides the URL's scheme and host
    pub base_url: Option<String>,
}

impl ProfileQuery {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    fn overridden(&self) -> bool {
        self.user.is_some() || self.locale.is_some() || self.base_url.is_some()
    }

    /// Identifier, locale and host to list publications for.
    ///
    /// # Errors
    ///
    /// `ScholarError::Parse("could not extract identifier")` when neither the
    /// override nor the URL names a user; `ScholarError::Config` for a bad
    /// base URL.
    pub fn resolve(&self) -> Result<ProfileRef> {
        let url = self.url.as_deref();

        let user_id = self
            .user
            .clone()
            .or_else(|| url.and_then(|u| query_param(u, "user")))
            .ok_or_parse("could not extract identifier")?;
        let locale = self
            .locale
            .clone()
            .or_else(|| url.and_then(|u| query_param(u, "hl")))
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        let base_url = match url.map(Url::parse) {
            Some(Ok(parsed)) if parsed.has_host() => origin_of(&parsed)?,
            _ => default_base_url()?,
        };

        let profile = ProfileRef {
            base_url,
            user_id,
            locale,
        };
        match &self.base_url {
            Some(base_url) => profile.with_base_url(base_url),
            None => Ok(profile),
        }
    }

    /// Page to read metrics from: the URL exactly as given when it is
    /// absolute and nothing overrides it, else the resolved profile page.
    pub fn metrics_url(&self) -> Result<Url> {
        if let (Some(url), false) = (self.url.as_deref(), self.overridden()) {
            if let Ok(parsed) = Url::parse(url) {
                if parsed.has_host() {
                    return Ok(parsed);
                }
            }
        }
        self.resolve()?.profile_url()
    }
}

/// Pagination settings
#[derive(Debug, Clone)]
pub struct PaginationOptions {
    /// Rows requested per page
    pub page_size: usize,
    /// Stop after this many pages; `None` runs until a short page
    pub max_pages: Option<usize>,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: Some(DEFAULT_MAX_PAGES),
        }
    }
}

/// Fetch every page of a profile's publication table.
///
/// Rows are returned in page order, then row order. Stops on an empty page, a
/// page shorter than `page_size`, or when `max_pages` pages have been read.
///
/// # Errors
///
/// The first fetch or parse failure aborts the whole listing.
pub async fn fetch_all_publications<F: PageFetcher + ?Sized>(
    fetcher: &F,
    profile: &ProfileRef,
    options: &PaginationOptions,
) -> Result<Vec<Publication>> {
    let page_size = options.page_size.max(1);
    info!(
        user = %profile.user_id,
        locale = %profile.locale,
        page_size,
        "Fetching publications"
    );

    let mut publications = Vec::new();
    let mut start = 0;
    let mut pages = 0;

    loop {
        if let Some(max_pages) = options.max_pages {
            if pages >= max_pages {
                warn!(
                    pages,
                    rows = publications.len(),
                    "Page limit reached, publication list may be incomplete"
                );
                break;
            }
        }

        let url = profile.listing_url(start, page_size)?;
        let html = fetcher.fetch(&url).await?;
        let rows = parse_publication_rows(&html)?;
        pages += 1;

        let count = rows.len();
        debug!(start, rows = count, "Parsed publication page");
        publications.extend(rows);

        if count < page_size {
            break;
        }
        start += page_size;
    }

    info!(total = publications.len(), pages, "Publications fetched");
    Ok(publications)
}

/// Parse the publication rows of one listing page.
///
/// Each field falls back to its default on its own; a row is never dropped.
pub fn parse_publication_rows(html: &str) -> Result<Vec<Publication>> {
    let document = Html::parse_document(html);

    let row_selector = selector("tr.gsc_a_tr")?;
    let title_selector = selector("a.gsc_a_at")?;
    let gray_selector = selector("div.gs_gray")?;
    let year_selector = selector("span.gsc_a_h")?;
    let cite_selector = selector("a.gsc_a_ac")?;

    let text_or_na = |text: Option<String>| {
        text.filter(|t| !t.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    let publications = document
        .select(&row_selector)
        .map(|row| {
            let mut gray = row.select(&gray_selector).map(element_text);
            let authors = gray.next();
            let venue = gray.next();

            let citations = row
                .select(&cite_selector)
                .next()
                .map(element_text)
                .and_then(|text| text.parse::<u64>().ok())
                .unwrap_or(0);

            Publication {
                title: text_or_na(row.select(&title_selector).next().map(element_text)),
                authors: text_or_na(authors),
                venue: text_or_na(venue),
                year: text_or_na(row.select(&year_selector).next().map(element_text)),
                citations,
            }
        })
        .collect();

    Ok(publications)
}
