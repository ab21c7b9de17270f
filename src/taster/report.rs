//! # Tabular report of a tasting session
//!
//! [`TasterReport`] borrows the probe results and tally of a
//! [`Taster`](crate::taster::Taster) and renders them with Rust formatting
//! (`{}`): a markdown heading naming the repository, then a two-column
//! `Metric | Value` table built with [`comfy-table`].
//!
//! Dataset presence rows come first, in probe order, followed by the tally rows
//! in insertion order.
//!
//! [`comfy-table`]: https://crates.io/crates/comfy-table
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::taster::{ProbeResult, TallyTable};

/// Display adaptor over the state of a tasting session. Never queries anything.
pub struct TasterReport<'a> {
    repository_name: &'a str,
    exists: &'a ProbeResult,
    tally: &'a TallyTable,
}

impl<'a> TasterReport<'a> {
    pub fn new(repository_name: &'a str, exists: &'a ProbeResult, tally: &'a TallyTable) -> Self {
        TasterReport {
            repository_name,
            exists,
            tally,
        }
    }

    /// Label/value rows in display order.
    pub fn rows(&self) -> Vec<(String, String)> {
        let presence = self.exists.iter().map(|(category, present)| {
            let value = if present { "present" } else { "absent" };
            (format!("{category} dataset"), value.to_string())
        });
        let tally = self
            .tally
            .iter()
            .map(|(label, value)| (label.to_string(), value.to_string()));
        presence.chain(tally).collect()
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![Cell::new("Metric"), Cell::new("Value")]);

        for (label, value) in self.rows() {
            table.add_row(Row::from(vec![
                Cell::new(label),
                Cell::new(value).set_alignment(CellAlignment::Right),
            ]));
        }
        table
    }
}

impl fmt::Display for TasterReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Repository: {}", self.repository_name)?;
        writeln!(f)?;
        write!(f, "{}", self.table())
    }
}

#[cfg(test)]
mod report_test {
    use super::*;
    use crate::taster::TallyValue;

    #[test]
    fn test_rows_order() {
        let mut exists = ProbeResult::default();
        exists.insert("raw", true);
        exists.insert("src", false);
        let mut tally = TallyTable::default();
        tally.insert("Number of visits", TallyValue::Count(3));
        tally.insert("Sky area (sq. deg.)", TallyValue::Area(2.5));

        let report = TasterReport::new("dc2", &exists, &tally);
        assert_eq!(
            report.rows(),
            vec![
                ("raw dataset".to_string(), "present".to_string()),
                ("src dataset".to_string(), "absent".to_string()),
                ("Number of visits".to_string(), "3".to_string()),
                ("Sky area (sq. deg.)".to_string(), "2.50".to_string()),
            ]
        );

        let text = report.to_string();
        assert!(text.starts_with("## Repository: dc2\n\n"));
        assert!(text.contains("Metric"));
        assert!(text.contains("Number of visits"));
        assert!(text.contains("2.50"));
    }
}
