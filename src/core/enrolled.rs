use crate::core::normalize::{parse_number, parse_year};
use crate::domain::columns::EnrolledColumns;
use crate::domain::model::{EnrolledAggregate, RawTable};
use crate::utils::error::Result;
use std::collections::BTreeMap;

pub const TABLE_NAME: &str = "enrolled students";

/// 經過篩選與正規化的一列
#[derive(Debug, Clone, PartialEq)]
struct EnrolledRow {
    year: Option<i32>,
    value: Option<f64>,
    nationality_code: String,
}

#[derive(Debug, Clone, Default)]
pub struct EnrolledStudentsTransform {
    columns: EnrolledColumns,
}

impl EnrolledStudentsTransform {
    pub fn new(columns: EnrolledColumns) -> Self {
        Self { columns }
    }

    /// Aggregates enrolled students per year, split into domestic and
    /// foreign students and recombined into a total.
    ///
    /// Years present for only one nationality category are dropped.
    pub fn transform(&self, raw: &RawTable) -> Result<Vec<EnrolledAggregate>> {
        raw.require_columns(TABLE_NAME, &self.columns.required())?;

        let rows = self.project(raw);
        tracing::debug!(
            "Enrolled students: {} of {} rows carry the '{}' breakdown",
            rows.len(),
            raw.len(),
            self.columns.total_sentinel
        );

        let domestic = sum_by_year(&rows, &self.columns.domestic_code);
        let foreign = sum_by_year(&rows, &self.columns.foreign_code);

        let aggregates: Vec<EnrolledAggregate> = domestic
            .iter()
            .filter_map(|(&year, &total_german)| {
                let total_foreign = *foreign.get(&year)?;
                Some(EnrolledAggregate {
                    year,
                    total_german,
                    total_foreign,
                    total_enrolled: total_german + total_foreign,
                })
            })
            .collect();

        let dropped = domestic.len() + foreign.len() - 2 * aggregates.len();
        if dropped > 0 {
            tracing::warn!(
                "⚠️ Dropped {} year(s) present in only one nationality category",
                dropped
            );
        }

        Ok(aggregates)
    }

    fn project(&self, raw: &RawTable) -> Vec<EnrolledRow> {
        let c = &self.columns;
        raw.rows
            .iter()
            .filter_map(|row| {
                // 缺欄位的列視為格式錯誤，直接略過
                let year = row.cell(&c.year)?;
                let value = row.cell(&c.value)?;
                let code = row.cell(&c.nationality_code)?;
                let label = row.cell(&c.total_label)?;

                if label != Some(c.total_sentinel.as_str()) {
                    return None;
                }

                Some(EnrolledRow {
                    year: parse_year(year),
                    value: parse_number(value),
                    nationality_code: code?.to_string(),
                })
            })
            .collect()
    }
}

/// 依年份加總；空值以 0 計，但年份至少要有一列才會出現
fn sum_by_year(rows: &[EnrolledRow], code: &str) -> BTreeMap<i32, f64> {
    let mut sums = BTreeMap::new();
    for row in rows.iter().filter(|r| r.nationality_code == code) {
        if let Some(year) = row.year {
            *sums.entry(year).or_insert(0.0) += row.value.unwrap_or(0.0);
        }
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;

    const COLUMNS: [&str; 4] = [
        "time",
        "value",
        "2_variable_attribute_code",
        "3_variable_attribute_label",
    ];

    fn transform(rows: &[&[&str]]) -> Vec<EnrolledAggregate> {
        let raw = RawTable::from_rows(&COLUMNS, rows);
        EnrolledStudentsTransform::default().transform(&raw).unwrap()
    }

    #[test]
    fn test_single_year_scenario() {
        let result = transform(&[
            &["2019-01", "100", "NATD", "Total"],
            &["2019-01", "50", "NATA", "Total"],
        ]);

        assert_eq!(
            result,
            vec![EnrolledAggregate {
                year: 2019,
                total_german: 100.0,
                total_foreign: 50.0,
                total_enrolled: 150.0,
            }]
        );
    }

    #[test]
    fn test_sums_rows_within_year_and_ignores_sub_breakdowns() {
        let result = transform(&[
            &["2019-01", "100", "NATD", "Total"],
            &["2019-07", "20", "NATD", "Total"],
            &["2019-01", "999", "NATD", "Male"],
            &["2019-01", "50", "NATA", "Total"],
            &["2019-01", "7", "NATX", "Total"],
        ]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].total_german, 120.0);
        assert_eq!(result[0].total_foreign, 50.0);
        assert_eq!(result[0].total_enrolled, 170.0);
    }

    #[test]
    fn test_year_in_one_category_is_dropped() {
        let result = transform(&[
            &["2019", "100", "NATD", "Total"],
            &["2019", "50", "NATA", "Total"],
            &["2020", "110", "NATD", "Total"],
        ]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].year, 2019);
    }

    #[test]
    fn test_hyphen_value_counts_as_zero_but_keeps_year() {
        let result = transform(&[
            &["2019", "-", "NATD", "Total"],
            &["2019", "50", "NATA", "Total"],
        ]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].total_german, 0.0);
        assert_eq!(result[0].total_enrolled, 50.0);
    }

    #[test]
    fn test_unparsable_year_is_dropped() {
        let result = transform(&[
            &["unknown", "100", "NATD", "Total"],
            &["unknown", "50", "NATA", "Total"],
        ]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_short_row_is_excluded() {
        let mut raw = RawTable::from_rows(
            &COLUMNS,
            &[
                &["2019", "100", "NATD", "Total"],
                &["2019", "50", "NATA", "Total"],
            ],
        );
        raw.rows[0].cells.remove("3_variable_attribute_label");

        let result = EnrolledStudentsTransform::default().transform(&raw).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let raw = RawTable::from_rows(&["time", "value"], &[&["2019", "1"]]);
        let err = EnrolledStudentsTransform::default()
            .transform(&raw)
            .unwrap_err();
        match err {
            EtlError::SchemaError { column, .. } => {
                assert_eq!(column, "2_variable_attribute_code")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_transform_is_idempotent() {
        let raw = RawTable::from_rows(
            &COLUMNS,
            &[
                &["2018", "90", "NATD", "Total"],
                &["2018", "40", "NATA", "Total"],
                &["2019", "100", "NATD", "Total"],
                &["2019", "50", "NATA", "Total"],
            ],
        );
        let transform = EnrolledStudentsTransform::default();
        assert_eq!(
            transform.transform(&raw).unwrap(),
            transform.transform(&raw).unwrap()
        );
    }
}
