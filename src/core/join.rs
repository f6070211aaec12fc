use crate::domain::model::{CpiAggregate, EnrolledAggregate, MergedRow};
use std::collections::HashMap;

/// Inner join on year, in CPI row order.
///
/// Duplicate years on either side yield every matching pair. Rows whose
/// year is null never match.
pub fn join_on_year(cpi: &[CpiAggregate], enrolled: &[EnrolledAggregate]) -> Vec<MergedRow> {
    let mut by_year: HashMap<i32, Vec<&EnrolledAggregate>> = HashMap::new();
    for row in enrolled {
        by_year.entry(row.year).or_default().push(row);
    }

    let mut merged = Vec::new();
    let mut unmatched = 0usize;
    for c in cpi {
        let Some(matches) = c.year.and_then(|year| by_year.get(&year)) else {
            unmatched += 1;
            continue;
        };
        for e in matches {
            merged.push(MergedRow {
                year: e.year,
                cpi: c.cpi,
                cpi_factor: c.cpi_factor,
                total_german: e.total_german,
                total_foreign: e.total_foreign,
                total_enrolled: e.total_enrolled,
            });
        }
    }

    if unmatched > 0 {
        tracing::debug!("{} CPI row(s) had no matching enrolment year", unmatched);
    }
    merged
}
