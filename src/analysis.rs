//! Derived views over a fetched publication list.
//!
//! All functions take the list by reference and return new values; the
//! caller's list keeps its page-arrival order.

use crate::publications::Publication;
use serde::{Deserialize, Serialize};

/// A publication cited fewer times than its age in years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndercitedPublication {
    #[serde(flatten)]
    pub publication: Publication,
    /// Years since publication
    pub age: i64,
    /// `age - citations`
    pub deficit: i64,
}

/// Aggregate statistics over the full publication list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_publications: usize,
    pub total_citations: u64,
    pub average_citations: f64,
    /// Highest citation count, `None` for an empty list
    pub most_cited: Option<u64>,
    pub undercited_publications: usize,
}

/// Publications sorted by citation count, highest first.
///
/// The sort is stable, so equal counts keep their original order.
pub fn rank_by_citations(publications: &[Publication]) -> Vec<Publication> {
    let mut ranked = publications.to_vec();
    ranked.sort_by(|a, b| b.citations.cmp(&a.citations));
    ranked
}

/// Publications with a numeric year, positive age and fewer citations than
/// their age, largest deficit first.
pub fn find_undercited(publications: &[Publication], current_year: i32) -> Vec<UndercitedPublication> {
    let mut undercited: Vec<UndercitedPublication> = publications
        .iter()
        .filter_map(|publication| {
            let year = publication.numeric_year()?;
            let age = i64::from(current_year) - i64::from(year);
            let citations = i64::try_from(publication.citations).unwrap_or(i64::MAX);
            (age > 0 && citations < age).then(|| UndercitedPublication {
                publication: publication.clone(),
                age,
                deficit: age - citations,
            })
        })
        .collect();

    undercited.sort_by(|a, b| b.deficit.cmp(&a.deficit));
    undercited
}

/// Totals over the full list; the average is 0 for an empty list.
pub fn summarize(publications: &[Publication], current_year: i32) -> Summary {
    let total_publications = publications.len();
    let total_citations: u64 = publications.iter().map(|p| p.citations).sum();
    let average_citations = if total_publications == 0 {
        0.0
    } else {
        total_citations as f64 / total_publications as f64
    };

    Summary {
        total_publications,
        total_citations,
        average_citations,
        most_cited: publications.iter().map(|p| p.citations).max(),
        undercited_publications: find_undercited(publications, current_year).len(),
    }
}
