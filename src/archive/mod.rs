//! Newsletter archive picker - the year/month cascade over newsletter records

use indexmap::IndexMap;

use crate::content::Newsletter;
use crate::helpers::{html_escape, month_name};

/// Year/month cascading selector over a flat newsletter list.
///
/// Years are offered newest first; each year offers only the months it has
/// records for, in calendar order. A (year, month) pair that matches no
/// record disables the download control.
pub struct Archive {
    /// Months present per year; years descending, months ascending
    by_year: IndexMap<i32, Vec<u32>>,
    entries: Vec<Newsletter>,
}

impl Archive {
    pub fn new(entries: Vec<Newsletter>) -> Self {
        let mut years: Vec<i32> = entries.iter().map(|n| n.year).collect();
        years.sort_unstable();
        years.dedup();
        years.reverse();

        let mut by_year = IndexMap::new();
        for year in years {
            let mut months: Vec<u32> = entries
                .iter()
                .filter(|n| n.year == year)
                .map(|n| n.month)
                .collect();
            months.sort_unstable();
            months.dedup();
            by_year.insert(year, months);
        }

        Self { by_year, entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct years, newest first
    pub fn years(&self) -> Vec<i32> {
        self.by_year.keys().copied().collect()
    }

    /// Months available for a year, in calendar order
    pub fn months_for(&self, year: i32) -> &[u32] {
        self.by_year.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve the record for an exact (year, month) pair
    pub fn resolve(&self, year: i32, month: u32) -> Option<&Newsletter> {
        self.entries
            .iter()
            .find(|n| n.year == year && n.month == month)
    }

    /// Default selection: the newest year and its first listed month
    pub fn initial_selection(&self) -> Option<(i32, u32)> {
        let (&year, months) = self.by_year.first()?;
        Some((year, *months.first()?))
    }

    /// `<option>` markup for the year selector; empty when there is no data
    pub fn year_options(&self, selected: Option<i32>) -> String {
        self.years()
            .iter()
            .map(|&year| {
                let sel = if selected == Some(year) { " selected" } else { "" };
                format!(r#"<option value="{}"{}>{}</option>"#, year, sel, year)
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// `<option>` markup for the month selector of one year
    pub fn month_options(&self, year: i32, selected: Option<u32>) -> String {
        self.months_for(year)
            .iter()
            .map(|&month| {
                let name = month_name(month)
                    .map(str::to_string)
                    .unwrap_or_else(|| month.to_string());
                let sel = if selected == Some(month) { " selected" } else { "" };
                format!(r#"<option value="{}"{}>{}</option>"#, month, sel, name)
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Download control markup: an enabled link when the pair resolves, a
    /// disabled control plus the "not available" indicator otherwise
    pub fn download_control(&self, year: i32, month: u32) -> String {
        match self.resolve(year, month) {
            Some(record) => format!(
                concat!(
                    r#"<a id="dlBtn" class="btn" href="{}" download>Download</a>"#,
                    r#"<p id="noFile" hidden>Not available for that month.</p>"#
                ),
                html_escape(&record.file)
            ),
            None => concat!(
                r##"<a id="dlBtn" class="btn" href="#" aria-disabled="true" disabled>Download</a>"##,
                r#"<p id="noFile">Not available for that month.</p>"#
            )
            .to_string(),
        }
    }
}
