use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 一列原始資料：欄位名稱對應字串值，`None` 代表空值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub cells: HashMap<String, Option<String>>,
}

impl RawRow {
    /// 欄位不存在回傳 `None`；欄位存在但為空值回傳 `Some(None)`
    pub fn cell(&self, column: &str) -> Option<Option<&str>> {
        self.cells.get(column).map(|v| v.as_deref())
    }
}

/// 原始表格，保留表頭以便在處理列之前檢查欄位
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { columns, rows }
    }

    /// Builds a table from string rows laid out in header order.
    pub fn from_rows(columns: &[&str], rows: &[&[&str]]) -> Self {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .iter()
            .map(|values| {
                let cells = columns
                    .iter()
                    .zip(values.iter())
                    .map(|(column, value)| {
                        let cell = (!value.is_empty()).then(|| value.to_string());
                        (column.clone(), cell)
                    })
                    .collect();
                RawRow { cells }
            })
            .collect();
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn require_columns(&self, table: &str, required: &[&str]) -> Result<()> {
        for column in required {
            if !self.has_column(column) {
                return Err(EtlError::SchemaError {
                    table: table.to_string(),
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrolledAggregate {
    pub year: i32,
    pub total_german: f64,
    pub total_foreign: f64,
    pub total_enrolled: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpiAggregate {
    pub year: Option<i32>,
    pub cpi: Option<f64>,
    pub cpi_factor: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    pub year: i32,
    pub cpi: Option<f64>,
    pub cpi_factor: Option<f64>,
    pub total_german: f64,
    pub total_foreign: f64,
    pub total_enrolled: f64,
}

/// 兩個來源的原始表格
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub enrolled: RawTable,
    pub cpi: RawTable,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub merged: Vec<MergedRow>,
    pub enrolled: Vec<EnrolledAggregate>,
    pub cpi: Vec<CpiAggregate>,
}
