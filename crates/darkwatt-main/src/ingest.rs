// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of DarkWatt.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Status page fetch and parse adapters
//!
//! Everything in here is a replaceable I/O edge: the tracking core only
//! ever sees the parsed `UnitStatus` list.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use darkwatt_core::UnitStatus;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

const USER_AGENT: &str = "darkwatt/0.1";

/// Row labels that are table furniture rather than unit names.
const HEADER_PREFIXES: [&str; 4] = ["region", "unit power", "plant", "unit"];

/// Blocking HTTP client for the daily reactor status page.
#[derive(Debug)]
pub struct StatusPageClient {
    client: reqwest::blocking::Client,
    url: String,
}

impl StatusPageClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Download the status page body.
    pub fn fetch(&self) -> Result<String> {
        info!("Downloading reactor status page from: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .context("Failed to request reactor status page")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Status page fetch failed: HTTP {}",
                response.status()
            );
        }

        response.text().context("Failed to read status page body")
    }
}

/// Extract `(unit, power_pct)` rows from the status page HTML.
///
/// The page is a set of plain tables, one row per unit, with the power
/// percentage in the last cell. Rows are kept only when that cell is a
/// bare 0-100 integer (a `%` suffix is tolerated) and the label is not a
/// header or region separator. Repeated rows collapse to one.
///
/// Zero parsed rows is a hard error: an empty day is indistinguishable
/// from a page-layout change and must never be recorded as "no data".
pub fn parse_unit_rows(html: &str) -> Result<Vec<UnitStatus>> {
    let table_selector = Selector::parse("table").expect("static selector");
    let row_selector = Selector::parse("tr").expect("static selector");
    let cell_selector = Selector::parse("td, th").expect("static selector");

    let document = Html::parse_document(html);

    let mut units = Vec::new();
    let mut seen: HashSet<(String, u8)> = HashSet::new();

    for table in document.select(&table_selector) {
        for row in table.select(&row_selector) {
            let cells: Vec<String> = row.select(&cell_selector).map(cell_text).collect();
            if cells.len() < 2 {
                continue;
            }

            let power_raw = cells[cells.len() - 1].replace('%', "");
            let power_raw = power_raw.trim();
            if power_raw.is_empty() || !power_raw.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let Ok(power_pct) = power_raw.parse::<u8>() else {
                continue;
            };
            if power_pct > 100 {
                continue;
            }

            let unit = cells[..cells.len() - 1].join(" ").trim().to_owned();
            let unit_lower = unit.to_lowercase();
            if HEADER_PREFIXES
                .iter()
                .any(|prefix| unit_lower.starts_with(prefix))
            {
                continue;
            }

            if seen.insert((unit.clone(), power_pct)) {
                units.push(UnitStatus { unit, power_pct });
            }
        }
    }

    if units.is_empty() {
        anyhow::bail!("Parsed zero unit rows from the status page; page layout may have changed");
    }

    debug!("Parsed {} unit rows from status page", units.len());
    Ok(units)
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_PAGE: &str = r#"
        <html><body>
        <h1>Power Reactor Status Report</h1>
        <table>
          <tr><th>Unit</th><th>Power</th></tr>
          <tr><td>Region 1</td><td></td></tr>
          <tr><td>Browns Ferry Unit 3</td><td>0</td></tr>
          <tr><td>Diablo Canyon 2</td><td>100%</td></tr>
          <tr><td>Diablo Canyon 2</td><td>100%</td></tr>
        </table>
        <table>
          <tr><td>Palo Verde</td><td>87</td></tr>
          <tr><td>Broken Meter</td><td>150</td></tr>
          <tr><td>Footnote</td><td>n/a</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_parses_unit_rows_across_tables() {
        let units = parse_unit_rows(STATUS_PAGE).unwrap();

        assert_eq!(
            units,
            vec![
                UnitStatus {
                    unit: "Browns Ferry Unit 3".to_owned(),
                    power_pct: 0,
                },
                UnitStatus {
                    unit: "Diablo Canyon 2".to_owned(),
                    power_pct: 100,
                },
                UnitStatus {
                    unit: "Palo Verde".to_owned(),
                    power_pct: 87,
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_rows_collapse() {
        let units = parse_unit_rows(STATUS_PAGE).unwrap();
        let canyon_rows = units.iter().filter(|u| u.unit == "Diablo Canyon 2").count();
        assert_eq!(canyon_rows, 1);
    }

    #[test]
    fn test_header_and_region_rows_are_skipped() {
        let html = r#"
            <table>
              <tr><td>Unit Power Report</td><td>1</td></tr>
              <tr><td>Plant status key</td><td>2</td></tr>
              <tr><td>Region 4</td><td>3</td></tr>
              <tr><td>Wolf Creek</td><td>100</td></tr>
            </table>
        "#;
        let units = parse_unit_rows(html).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].unit, "Wolf Creek");
    }

    #[test]
    fn test_out_of_range_and_non_numeric_cells_are_skipped() {
        let html = r#"
            <table>
              <tr><td>Alpha</td><td>101</td></tr>
              <tr><td>Beta</td><td>-5</td></tr>
              <tr><td>Gamma</td><td>ninety</td></tr>
              <tr><td>Delta</td><td>42</td></tr>
            </table>
        "#;
        let units = parse_unit_rows(html).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].unit, "Delta");
        assert_eq!(units[0].power_pct, 42);
    }

    #[test]
    fn test_multi_cell_rows_join_name_columns() {
        let html = r#"
            <table>
              <tr><td>Peach Bottom</td><td>2</td><td>95</td></tr>
            </table>
        "#;
        let units = parse_unit_rows(html).unwrap();
        assert_eq!(units[0].unit, "Peach Bottom 2");
        assert_eq!(units[0].power_pct, 95);
    }

    #[test]
    fn test_page_with_no_unit_rows_is_an_error() {
        let html = "<html><body><p>Maintenance in progress</p></body></html>";
        let result = parse_unit_rows(html);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("zero unit rows"));
    }

    #[test]
    fn test_fetch_returns_page_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/ps.html")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(STATUS_PAGE)
            .create();

        let client = StatusPageClient::new(
            format!("{}/ps.html", server.url()),
            Duration::from_secs(5),
        )
        .unwrap();
        let body = client.fetch().unwrap();

        assert!(body.contains("Browns Ferry Unit 3"));
        mock.assert();
    }

    #[test]
    fn test_fetch_propagates_http_failure() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/ps.html")
            .with_status(503)
            .create();

        let client = StatusPageClient::new(
            format!("{}/ps.html", server.url()),
            Duration::from_secs(5),
        )
        .unwrap();
        let result = client.fetch();

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("503"));
        mock.assert();
    }
}
