//! Console rendering of metrics and publication views.
//!
//! Each section takes the `Result` of the step that produced its data and
//! prints a one-line diagnostic instead of the section when that step failed.

use crate::analysis::{find_undercited, rank_by_citations, summarize, Summary, UndercitedPublication};
use crate::error::{Result, ScholarError};
use crate::profile::ProfileMetrics;
use crate::publications::Publication;
use serde::Serialize;
use std::io::Write;

const WIDE_RULE: usize = 100;
const NARROW_RULE: usize = 50;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Report section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Metrics,
    Ranked,
    Undercited,
    Summary,
}

/// Everything fetched in one run, plus which sections to show.
#[derive(Debug)]
pub struct Report {
    pub metrics: Option<Result<ProfileMetrics>>,
    pub publications: Option<Result<Vec<Publication>>>,
    pub current_year: i32,
    pub sections: Vec<Section>,
}

impl Report {
    fn has(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }
}

/// Write `report` to `out` in the requested format.
pub fn write_report<W: Write>(out: &mut W, report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(out, report),
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Csv => write_csv(out, report),
    }
}

/// Banner-style plain text report.
pub fn write_text<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    let no_publications = || -> Result<Vec<Publication>> {
        Err(ScholarError::Parse("publications not fetched".to_string()))
    };

    for section in &report.sections {
        match section {
            Section::Metrics => match &report.metrics {
                Some(metrics) => write_metrics(out, metrics)?,
                None => writeln!(out, "Error getting metrics: metrics not fetched")?,
            },
            Section::Ranked => match &report.publications {
                Some(pubs) => write_ranked(out, pubs)?,
                None => write_ranked(out, &no_publications())?,
            },
            Section::Undercited => match &report.publications {
                Some(pubs) => write_undercited(out, pubs, report.current_year)?,
                None => write_undercited(out, &no_publications(), report.current_year)?,
            },
            Section::Summary => match &report.publications {
                Some(pubs) => write_summary(out, pubs, report.current_year)?,
                None => write_summary(out, &no_publications(), report.current_year)?,
            },
        }
    }
    Ok(())
}

fn banner<W: Write>(out: &mut W, width: usize, title: &str) -> Result<()> {
    let rule = "=".repeat(width);
    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", rule)?;
    Ok(())
}

/// Citation metrics block.
pub fn write_metrics<W: Write>(out: &mut W, metrics: &Result<ProfileMetrics>) -> Result<()> {
    let metrics = match metrics {
        Ok(metrics) => metrics,
        Err(e) => {
            writeln!(out, "Error getting metrics: {}", e)?;
            return Ok(());
        }
    };

    let recent = metrics.recent_label();
    banner(out, NARROW_RULE, "CITATION METRICS")?;
    if let Some(name) = &metrics.name {
        writeln!(out, "Researcher: {}", name)?;
    }
    writeln!(out)?;
    writeln!(out, "Citations (All): {}", metrics.citations_all)?;
    writeln!(out, "Citations ({}): {}", recent, metrics.citations_recent)?;
    writeln!(out)?;
    writeln!(out, "h-index (All): {}", metrics.h_index_all)?;
    writeln!(out, "h-index ({}): {}", recent, metrics.h_index_recent)?;
    writeln!(out)?;
    writeln!(out, "i10-index (All): {}", metrics.i10_index_all)?;
    writeln!(out, "i10-index ({}): {}", recent, metrics.i10_index_recent)?;
    Ok(())
}

/// Publications by citation count, highest first.
pub fn write_ranked<W: Write>(out: &mut W, publications: &Result<Vec<Publication>>) -> Result<()> {
    let publications = match publications {
        Ok(pubs) => pubs,
        Err(e) => {
            writeln!(out, "Error: {}", e)?;
            return Ok(());
        }
    };

    let ranked = rank_by_citations(publications);
    writeln!(out)?;
    banner(out, WIDE_RULE, &format!("PUBLICATIONS SORTED BY CITATIONS (Total: {})", ranked.len()))?;
    writeln!(out)?;

    for (i, publication) in ranked.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, publication.title)?;
        writeln!(out, "   Authors: {}", publication.authors)?;
        writeln!(out, "   Venue: {}", publication.venue)?;
        writeln!(out, "   Year: {}", publication.year)?;
        writeln!(out, "   Citations: {}", publication.citations)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Publications cited fewer times than their age, largest deficit first.
pub fn write_undercited<W: Write>(
    out: &mut W,
    publications: &Result<Vec<Publication>>,
    current_year: i32,
) -> Result<()> {
    let publications = match publications {
        Ok(pubs) => pubs,
        Err(e) => {
            writeln!(out, "Error: {}", e)?;
            return Ok(());
        }
    };

    let undercited = find_undercited(publications, current_year);
    writeln!(out)?;

    if undercited.is_empty() {
        banner(out, WIDE_RULE, "UNDERCITED PUBLICATIONS (Citations < Age in Years)")?;
        writeln!(out)?;
        writeln!(out, "No undercited publications found.")?;
        return Ok(());
    }

    banner(
        out,
        WIDE_RULE,
        &format!(
            "UNDERCITED PUBLICATIONS (Citations < Age in Years) - Total: {}",
            undercited.len()
        ),
    )?;
    writeln!(out)?;

    for (i, entry) in undercited.iter().enumerate() {
        let publication = &entry.publication;
        writeln!(out, "{}. {}", i + 1, publication.title)?;
        writeln!(out, "   Authors: {}", publication.authors)?;
        writeln!(out, "   Venue: {}", publication.venue)?;
        writeln!(out, "   Year: {} (Age: {} years)", publication.year, entry.age)?;
        writeln!(
            out,
            "   Citations: {} (Deficit: {} citations)",
            publication.citations, entry.deficit
        )?;
        writeln!(out)?;
    }
    Ok(())
}

/// Totals over the whole publication list.
pub fn write_summary<W: Write>(
    out: &mut W,
    publications: &Result<Vec<Publication>>,
    current_year: i32,
) -> Result<()> {
    let publications = match publications {
        Ok(pubs) => pubs,
        Err(e) => {
            writeln!(out, "Error: {}", e)?;
            return Ok(());
        }
    };

    let summary = summarize(publications, current_year);
    writeln!(out)?;
    banner(out, WIDE_RULE, "SUMMARY STATISTICS")?;
    writeln!(out, "Total Publications: {}", summary.total_publications)?;
    writeln!(out, "Total Citations: {}", summary.total_citations)?;
    writeln!(
        out,
        "Average Citations per Publication: {:.2}",
        summary.average_citations
    )?;
    match summary.most_cited {
        Some(citations) => writeln!(out, "Most Cited Publication: {} citations", citations)?,
        None => writeln!(out, "Most Cited Publication: N/A")?,
    }
    writeln!(out, "Undercited Publications: {}", summary.undercited_publications)?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<&'a ProfileMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publications: Option<Vec<Publication>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    undercited: Option<Vec<UndercitedPublication>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// Pretty-printed JSON document; failed steps are listed under `errors`.
pub fn write_json<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    let mut doc = JsonReport {
        metrics: None,
        publications: None,
        undercited: None,
        summary: None,
        errors: Vec::new(),
    };

    if report.has(Section::Metrics) {
        match &report.metrics {
            Some(Ok(metrics)) => doc.metrics = Some(metrics),
            Some(Err(e)) => doc.errors.push(format!("metrics: {}", e)),
            None => {}
        }
    }

    match &report.publications {
        Some(Ok(pubs)) => {
            if report.has(Section::Ranked) {
                doc.publications = Some(rank_by_citations(pubs));
            }
            if report.has(Section::Undercited) {
                doc.undercited = Some(find_undercited(pubs, report.current_year));
            }
            if report.has(Section::Summary) {
                doc.summary = Some(summarize(pubs, report.current_year));
            }
        }
        Some(Err(e)) => doc.errors.push(format!("publications: {}", e)),
        None => {}
    }

    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)?;
    Ok(())
}

#[derive(Serialize)]
struct UndercitedRow<'a> {
    title: &'a str,
    authors: &'a str,
    venue: &'a str,
    year: &'a str,
    citations: u64,
    age: i64,
    deficit: i64,
}

#[derive(Serialize)]
struct MetricsRow<'a> {
    name: &'a str,
    recent_window: &'a str,
    citations_all: &'a str,
    citations_recent: &'a str,
    h_index_all: &'a str,
    h_index_recent: &'a str,
    i10_index_all: &'a str,
    i10_index_recent: &'a str,
}

impl<'a> From<&'a ProfileMetrics> for MetricsRow<'a> {
    fn from(m: &'a ProfileMetrics) -> Self {
        MetricsRow {
            name: m.name.as_deref().unwrap_or_default(),
            recent_window: m.recent_window.as_deref().unwrap_or_default(),
            citations_all: &m.citations_all,
            citations_recent: &m.citations_recent,
            h_index_all: &m.h_index_all,
            h_index_recent: &m.h_index_recent,
            i10_index_all: &m.i10_index_all,
            i10_index_recent: &m.i10_index_recent,
        }
    }
}

/// CSV of a single view: the first requested of ranked, undercited, summary
/// and metrics. A failed step is written as one `Error:` line.
pub fn write_csv<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    let section = [Section::Ranked, Section::Undercited, Section::Summary, Section::Metrics]
        .into_iter()
        .find(|s| report.has(*s));

    let section = match section {
        Some(section) => section,
        None => return Ok(()),
    };

    if section == Section::Metrics {
        let metrics = match &report.metrics {
            Some(Ok(metrics)) => metrics,
            Some(Err(e)) => {
                writeln!(out, "Error: {}", e)?;
                return Ok(());
            }
            None => {
                writeln!(out, "Error: metrics not fetched")?;
                return Ok(());
            }
        };
        let mut wtr = csv::Writer::from_writer(&mut *out);
        wtr.serialize(MetricsRow::from(metrics))?;
        wtr.flush()?;
        return Ok(());
    }

    let publications = match &report.publications {
        Some(Ok(pubs)) => pubs,
        Some(Err(e)) => {
            writeln!(out, "Error: {}", e)?;
            return Ok(());
        }
        None => {
            writeln!(out, "Error: publications not fetched")?;
            return Ok(());
        }
    };

    let mut wtr = csv::Writer::from_writer(&mut *out);

    match section {
        Section::Undercited => {
            for entry in find_undercited(publications, report.current_year) {
                let p = &entry.publication;
                wtr.serialize(UndercitedRow {
                    title: &p.title,
                    authors: &p.authors,
                    venue: &p.venue,
                    year: &p.year,
                    citations: p.citations,
                    age: entry.age,
                    deficit: entry.deficit,
                })?;
            }
        }
        Section::Summary => wtr.serialize(summarize(publications, report.current_year))?,
        _ => {
            for publication in rank_by_citations(publications) {
                wtr.serialize(&publication)?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publication(title: &str, year: &str, citations: u64) -> Publication {
        Publication {
            title: title.to_string(),
            authors: "A. Author".to_string(),
            venue: "Venue".to_string(),
            year: year.to_string(),
            citations,
        }
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    fn report(sections: Vec<Section>, publications: Result<Vec<Publication>>) -> Report {
        Report {
            metrics: None,
            publications: Some(publications),
            current_year: 2025,
            sections,
        }
    }

    #[test]
    fn test_ranked_error_is_one_line() {
        let failed: Result<Vec<Publication>> = Err(ScholarError::Parse("could not extract identifier".to_string()));
        let text = render(|out| write_ranked(out, &failed));
        assert_eq!(text, "Error: Parse error: could not extract identifier\n");
    }

    #[test]
    fn test_ranked_numbering() {
        let pubs = Ok(vec![publication("low", "2020", 1), publication("high", "2019", 7)]);
        let text = render(|out| write_ranked(out, &pubs));
        assert!(text.contains("PUBLICATIONS SORTED BY CITATIONS (Total: 2)"));
        assert!(text.contains(&"=".repeat(100)));
        let high = text.find("1. high").expect("first entry");
        let low = text.find("2. low").expect("second entry");
        assert!(high < low);
        assert!(text.contains("   Citations: 7"));
    }

    #[test]
    fn test_undercited_none_found() {
        let pubs = Ok(vec![publication("cited", "2024", 10)]);
        let text = render(|out| write_undercited(out, &pubs, 2025));
        assert!(text.contains("No undercited publications found."));
    }

    #[test]
    fn test_undercited_entries() {
        let pubs = Ok(vec![publication("old", "2015", 2)]);
        let text = render(|out| write_undercited(out, &pubs, 2025));
        assert!(text.contains("- Total: 1"));
        assert!(text.contains("   Year: 2015 (Age: 10 years)"));
        assert!(text.contains("   Citations: 2 (Deficit: 8 citations)"));
    }

    #[test]
    fn test_summary_empty_list() {
        let pubs = Ok(Vec::new());
        let text = render(|out| write_summary(out, &pubs, 2025));
        assert!(text.contains("Total Publications: 0"));
        assert!(text.contains("Average Citations per Publication: 0.00"));
        assert!(text.contains("Most Cited Publication: N/A"));
    }

    #[test]
    fn test_metrics_block() {
        let metrics = Ok(ProfileMetrics {
            name: Some("Ada Lovelace".to_string()),
            recent_window: Some("Since 2020".to_string()),
            citations_all: "100".to_string(),
            citations_recent: "50".to_string(),
            h_index_all: "5".to_string(),
            h_index_recent: "4".to_string(),
            i10_index_all: "3".to_string(),
            i10_index_recent: "2".to_string(),
        });
        let text = render(|out| write_metrics(out, &metrics));
        assert!(text.starts_with(&"=".repeat(50)));
        assert!(text.contains("Researcher: Ada Lovelace"));
        assert!(text.contains("Citations (Since 2020): 50"));
        assert!(text.contains("i10-index (All): 3"));
    }

    #[test]
    fn test_metrics_error() {
        let metrics: Result<ProfileMetrics> = Err(ScholarError::Parse("metrics table not found".to_string()));
        let text = render(|out| write_metrics(out, &metrics));
        assert_eq!(text, "Error getting metrics: Parse error: metrics table not found\n");
    }

    #[test]
    fn test_json_report() {
        let report = Report {
            metrics: Some(Err(ScholarError::Parse("metrics table not found".to_string()))),
            publications: Some(Ok(vec![publication("a", "2020", 1), publication("b", "2020", 3)])),
            current_year: 2025,
            sections: vec![Section::Metrics, Section::Ranked, Section::Undercited, Section::Summary],
        };
        let text = render(|out| write_json(out, &report));
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");

        assert_eq!(value["publications"][0]["title"], "b");
        assert_eq!(value["undercited"][0]["title"], "a");
        assert_eq!(value["undercited"][0]["deficit"], 4);
        assert_eq!(value["summary"]["most_cited"], 3);
        assert_eq!(value["errors"][0], "metrics: Parse error: metrics table not found");
        assert!(value.get("metrics").is_none());
    }

    #[test]
    fn test_csv_ranked() {
        let report = report(
            vec![Section::Ranked],
            Ok(vec![publication("a", "2020", 1), publication("b", "2021", 3)]),
        );
        let text = render(|out| write_csv(out, &report));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "title,authors,venue,year,citations");
        assert_eq!(lines[1], "b,A. Author,Venue,2021,3");
        assert_eq!(lines[2], "a,A. Author,Venue,2020,1");
    }

    #[test]
    fn test_csv_undercited() {
        let report = report(vec![Section::Undercited], Ok(vec![publication("a", "2020", 1)]));
        let text = render(|out| write_csv(out, &report));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "title,authors,venue,year,citations,age,deficit");
        assert_eq!(lines[1], "a,A. Author,Venue,2020,1,5,4");
    }

    #[test]
    fn test_csv_summary_only() {
        let report = report(vec![Section::Summary], Ok(vec![publication("a", "2020", 3)]));
        let text = render(|out| write_csv(out, &report));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "total_publications,total_citations,average_citations,most_cited,undercited_publications"
        );
        assert!(lines[1].starts_with("1,3,"));
        assert!(lines[1].ends_with(",3,1"));
    }

    #[test]
    fn test_csv_summary_of_empty_list() {
        let report = report(vec![Section::Summary], Ok(Vec::new()));
        let text = render(|out| write_csv(out, &report));
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].starts_with("0,0,"));
        assert!(lines[1].ends_with(",,0"));
    }

    #[test]
    fn test_csv_metrics_only() {
        let report = Report {
            metrics: Some(Ok(ProfileMetrics {
                name: Some("Ada Lovelace".to_string()),
                recent_window: None,
                citations_all: "100".to_string(),
                citations_recent: "50".to_string(),
                h_index_all: "5".to_string(),
                h_index_recent: "4".to_string(),
                i10_index_all: "3".to_string(),
                i10_index_recent: "2".to_string(),
            })),
            publications: None,
            current_year: 2025,
            sections: vec![Section::Metrics],
        };
        let text = render(|out| write_csv(out, &report));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "name,recent_window,citations_all,citations_recent,h_index_all,h_index_recent,i10_index_all,i10_index_recent"
        );
        assert_eq!(lines[1], "Ada Lovelace,,100,50,5,4,3,2");
    }

    #[test]
    fn test_csv_metrics_error() {
        let report = Report {
            metrics: Some(Err(ScholarError::Parse("metrics table not found".to_string()))),
            publications: None,
            current_year: 2025,
            sections: vec![Section::Metrics],
        };
        let text = render(|out| write_csv(out, &report));
        assert_eq!(text, "Error: Parse error: metrics table not found\n");
    }

    #[test]
    fn test_csv_publications_error() {
        let failed = Err(ScholarError::HttpStatus {
            code: 429,
            message: "Too Many Requests".to_string(),
        });
        let report = report(vec![Section::Summary], failed);
        let text = render(|out| write_csv(out, &report));
        assert!(text.starts_with("Error: "));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_text_report_sections_in_order() {
        let report = report(
            vec![Section::Ranked, Section::Summary],
            Ok(vec![publication("a", "2020", 1)]),
        );
        let text = render(|out| write_text(out, &report));
        let ranked = text.find("PUBLICATIONS SORTED BY CITATIONS").expect("ranked");
        let summary = text.find("SUMMARY STATISTICS").expect("summary");
        assert!(ranked < summary);
        assert!(!text.contains("UNDERCITED"));
    }
}
