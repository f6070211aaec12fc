use crate::core::normalize::{parse_number, parse_year};
use crate::domain::columns::CpiColumns;
use crate::domain::model::{CpiAggregate, RawTable};
use crate::utils::error::Result;

pub const TABLE_NAME: &str = "consumer price index";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpiOptions {
    /// 計算變化率前先依年份穩定排序（空年份排最後）
    pub sort_by_year: bool,
}

impl Default for CpiOptions {
    fn default() -> Self {
        Self { sort_by_year: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CpiTransform {
    columns: CpiColumns,
    options: CpiOptions,
}

impl CpiTransform {
    pub fn new(columns: CpiColumns, options: CpiOptions) -> Self {
        Self { columns, options }
    }

    /// Selects the consumer price index series and derives the fractional
    /// change of each row against the row before it.
    pub fn transform(&self, raw: &RawTable) -> Result<Vec<CpiAggregate>> {
        raw.require_columns(TABLE_NAME, &self.columns.required())?;

        let c = &self.columns;
        let mut rows: Vec<CpiAggregate> = raw
            .rows
            .iter()
            .filter(|row| {
                row.cell(&c.series_label).flatten() == Some(c.series_sentinel.as_str())
            })
            .map(|row| CpiAggregate {
                year: parse_year(row.cell(&c.year).flatten()),
                cpi: parse_number(row.cell(&c.value).flatten()),
                cpi_factor: None,
            })
            .collect();

        tracing::debug!(
            "CPI: kept {} of {} rows for series '{}'",
            rows.len(),
            raw.len(),
            c.series_sentinel
        );

        if self.options.sort_by_year {
            rows.sort_by_key(|r| (r.year.is_none(), r.year));
        } else if !is_chronological(&rows) {
            tracing::warn!("⚠️ CPI rows are not in year order; change ratios follow source order");
        }

        let factors: Vec<Option<f64>> = std::iter::once(None)
            .chain(rows.windows(2).map(|w| pct_change(w[0].cpi, w[1].cpi)))
            .collect();
        for (row, factor) in rows.iter_mut().zip(factors) {
            row.cpi_factor = factor;
        }

        Ok(rows)
    }
}

fn pct_change(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    let previous = previous.filter(|p| *p != 0.0)?;
    Some((current? - previous) / previous)
}

fn is_chronological(rows: &[CpiAggregate]) -> bool {
    rows.windows(2).all(|w| match (w[0].year, w[1].year) {
        (Some(a), Some(b)) => a <= b,
        _ => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: [&str; 3] = ["time", "value", "value_variable_label"];
    const LABEL: &str = "Consumer price index";

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a value");
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn test_two_year_scenario() {
        let raw = RawTable::from_rows(
            &COLUMNS,
            &[&["2018", "100", LABEL], &["2019", "110", LABEL]],
        );
        let result = CpiTransform::default().transform(&raw).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].year, Some(2018));
        assert_eq!(result[0].cpi, Some(100.0));
        assert_eq!(result[0].cpi_factor, None);
        assert_eq!(result[1].year, Some(2019));
        assert_close(result[1].cpi_factor, 0.10);
    }

    #[test]
    fn test_other_series_never_contribute() {
        let raw = RawTable::from_rows(
            &COLUMNS,
            &[
                &["2018", "100", LABEL],
                &["2018", "3.1", "Change on previous year"],
                &["2019", "110", LABEL],
                &["2019", "10.0", "Change on previous year"],
            ],
        );
        let result = CpiTransform::default().transform(&raw).unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.cpi == Some(100.0) || r.cpi == Some(110.0)));
    }

    #[test]
    fn test_null_or_zero_previous_gives_null_factor() {
        let raw = RawTable::from_rows(
            &COLUMNS,
            &[
                &["2017", "0", LABEL],
                &["2018", "-", LABEL],
                &["2019", "110", LABEL],
                &["2020", "121", LABEL],
            ],
        );
        let result = CpiTransform::default().transform(&raw).unwrap();

        assert_eq!(result[1].cpi, None);
        assert_eq!(result[1].cpi_factor, None);
        assert_eq!(result[2].cpi_factor, None);
        assert_close(result[3].cpi_factor, 0.10);
    }

    #[test]
    fn test_sorts_by_year_before_ratio() {
        let raw = RawTable::from_rows(
            &COLUMNS,
            &[&["2019", "110", LABEL], &["2018", "100", LABEL]],
        );
        let result = CpiTransform::default().transform(&raw).unwrap();

        assert_eq!(result[0].year, Some(2018));
        assert_close(result[1].cpi_factor, 0.10);
    }

    #[test]
    fn test_preserve_source_order() {
        let raw = RawTable::from_rows(
            &COLUMNS,
            &[&["2019", "110", LABEL], &["2018", "100", LABEL]],
        );
        let transform = CpiTransform::new(
            CpiColumns::default(),
            CpiOptions {
                sort_by_year: false,
            },
        );
        let result = transform.transform(&raw).unwrap();

        assert_eq!(result[0].year, Some(2019));
        assert_close(result[1].cpi_factor, (100.0 - 110.0) / 110.0);
    }

    #[test]
    fn test_unparsable_year_is_kept_as_null() {
        let raw = RawTable::from_rows(
            &COLUMNS,
            &[&["n/a", "99", LABEL], &["2018", "100", LABEL]],
        );
        let result = CpiTransform::default().transform(&raw).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[1].year, None);
        assert_eq!(result[1].cpi, Some(99.0));
    }

    #[test]
    fn test_missing_label_column_is_schema_error() {
        let raw = RawTable::from_rows(&["time", "value"], &[&["2019", "1"]]);
        assert!(CpiTransform::default().transform(&raw).is_err());
    }
}
