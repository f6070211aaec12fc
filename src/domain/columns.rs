//! Column layout of the two Destatis flat-file exports.
//!
//! Defaults match the English flat exports of tables 21311-0002 (students)
//! and 61111-0001 (consumer prices). Each field can be overridden from the
//! `[columns.*]` sections of the TOML configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrolledColumns {
    pub year: String,
    pub value: String,
    pub nationality_code: String,
    pub total_label: String,
    /// 只保留此標籤的列（人口總計）
    pub total_sentinel: String,
    pub domestic_code: String,
    pub foreign_code: String,
}

impl Default for EnrolledColumns {
    fn default() -> Self {
        Self {
            year: "time".to_string(),
            value: "value".to_string(),
            nationality_code: "2_variable_attribute_code".to_string(),
            total_label: "3_variable_attribute_label".to_string(),
            total_sentinel: "Total".to_string(),
            domestic_code: "NATD".to_string(),
            foreign_code: "NATA".to_string(),
        }
    }
}

impl EnrolledColumns {
    pub fn required(&self) -> [&str; 4] {
        [
            self.year.as_str(),
            self.value.as_str(),
            self.nationality_code.as_str(),
            self.total_label.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpiColumns {
    pub year: String,
    pub value: String,
    pub series_label: String,
    pub series_sentinel: String,
}

impl Default for CpiColumns {
    fn default() -> Self {
        Self {
            year: "time".to_string(),
            value: "value".to_string(),
            series_label: "value_variable_label".to_string(),
            series_sentinel: "Consumer price index".to_string(),
        }
    }
}

impl CpiColumns {
    pub fn required(&self) -> [&str; 3] {
        [
            self.year.as_str(),
            self.value.as_str(),
            self.series_label.as_str(),
        ]
    }
}
