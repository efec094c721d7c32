//! Class schedule table rendering

use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::helpers::html_escape;

lazy_static! {
    // A lone time like "6:00 pm" or "9:30 am*" (the star marks by-invitation)
    static ref RE_TIME: Regex = Regex::new(r"(?i)^\s*\d{1,2}:\d{2}\s*(?:am|pm)\*?\s*$").unwrap();
}

/// One schedule row: a class group plus per-day time cells
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleRow {
    pub group: String,
    pub mon: String,
    pub tue: String,
    pub wed: String,
    pub thu: String,
    pub fri: String,
    pub sat: String,
}

impl ScheduleRow {
    fn cells(&self) -> [&str; 6] {
        [
            &self.mon, &self.tue, &self.wed, &self.thu, &self.fri, &self.sat,
        ]
    }
}

/// The schedule data file: kids and adults tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    pub kids: Vec<ScheduleRow>,
    pub adults: Vec<ScheduleRow>,
}

impl Schedule {
    /// Load schedule data from a YAML file; a missing file is an empty schedule
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// Render table rows for one schedule section.
///
/// Time-shaped cells become pills; cells holding several times split on `/`
/// or `,` into a stacked pill group; anything else passes through escaped.
pub fn render_rows(rows: &[ScheduleRow]) -> String {
    rows.iter()
        .map(|row| {
            let cells = row
                .cells()
                .iter()
                .map(|cell| format!("<td>{}</td>", cell_html(cell)))
                .collect::<String>();
            format!("<tr><td>{}</td>{}</tr>", html_escape(&row.group), cells)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn cell_html(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    if raw.contains('/') || raw.contains(',') {
        let pills = raw
            .split(['/', ','])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| format!(r#"<span class="time">{}</span>"#, html_escape(part)))
            .collect::<String>();
        return format!(r#"<div class="tstack">{}</div>"#, pills);
    }

    if RE_TIME.is_match(raw) {
        format!(r#"<span class="time">{}</span>"#, html_escape(raw))
    } else {
        html_escape(raw)
    }
}
