use chrono::{Datelike, Duration, NaiveDate};
use reqwest::Url;
use std::io;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("invalid report address: {0}")]
    Url(String),
    #[error("could not open browser: {0}")]
    Open(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// A session ends on this day, so the cell links to its report.
    pub net: bool,
}

/// One month laid out in Sunday-first weeks. `None` entries pad the first
/// and last week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub first: NaiveDate,
    pub cells: Vec<Option<CalendarCell>>,
}

impl MonthGrid {
    pub fn new(anchor: NaiveDate, session_dates: &[NaiveDate]) -> Self {
        let first = anchor.with_day(1).unwrap_or(anchor);
        let lead = first.weekday().num_days_from_sunday() as usize;
        let mut cells: Vec<Option<CalendarCell>> = vec![None; lead];
        let mut date = first;
        while date.month() == first.month() {
            cells.push(Some(CalendarCell {
                date,
                net: session_dates.contains(&date),
            }));
            date += Duration::days(1);
        }
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        Self { first, cells }
    }

    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[Option<CalendarCell>]> {
        self.cells.chunks(7)
    }

    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.cells
            .iter()
            .position(|cell| cell.is_some_and(|c| c.date == date))
    }

    pub fn cell(&self, index: usize) -> Option<CalendarCell> {
        self.cells.get(index).copied().flatten()
    }
}

/// Report link for a net cell; other cells are inert.
pub fn report_url(base_url: &str, cell: &CalendarCell) -> Result<Option<String>, CalendarError> {
    if !cell.net {
        return Ok(None);
    }
    let date = cell.date.format("%Y-%m-%d").to_string();
    let url = Url::parse_with_params(&format!("{base_url}/report"), [("date", date.as_str())])
        .map_err(|e| CalendarError::Url(e.to_string()))?;
    Ok(Some(url.to_string()))
}

/// Follows a cell click: opens the session report in the browser. Returns
/// the URL that was opened, if any.
pub fn open_cell(base_url: &str, cell: &CalendarCell) -> Result<Option<String>, CalendarError> {
    let Some(url) = report_url(base_url, cell)? else {
        return Ok(None);
    };
    open::that(&url)?;
    info!(url = %url, "opened session report");
    Ok(Some(url))
}
