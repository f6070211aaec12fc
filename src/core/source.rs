use crate::domain::model::{RawRow, RawTable};
use crate::domain::ports::TabularSource;
use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;

/// Destatis flat exports use semicolons.
pub const DEFAULT_DELIMITER: char = ';';

/// 將帶表頭的分隔檔解析成原始表格
pub fn parse_table<R: Read>(reader: R, delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        // 短列只保留實際存在的欄位
        let cells = columns
            .iter()
            .zip(record.iter())
            .map(|(column, value)| {
                let cell = (!value.is_empty()).then(|| value.to_string());
                (column.clone(), cell)
            })
            .collect();
        rows.push(RawRow { cells });
    }

    tracing::debug!("Parsed {} rows with {} columns", rows.len(), columns.len());
    Ok(RawTable::new(columns, rows))
}

#[derive(Debug, Clone)]
pub struct CsvFileSource {
    base_dir: PathBuf,
    delimiter: u8,
}

impl CsvFileSource {
    pub fn new(base_dir: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self {
            base_dir: base_dir.into(),
            delimiter,
        }
    }
}

impl TabularSource for CsvFileSource {
    fn load(&self, source_id: &str) -> Result<RawTable> {
        let path = self.base_dir.join(source_id);
        tracing::debug!("Reading table from {}", path.display());
        let file = std::fs::File::open(&path)?;
        parse_table(file, self.delimiter)
    }
}

/// 記憶體中的來源，供已擷取的表格與測試使用
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<String, RawTable>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, source_id: &str, table: RawTable) -> Self {
        self.tables.insert(source_id.to_string(), table);
        self
    }
}

impl TabularSource for MemorySource {
    fn load(&self, source_id: &str) -> Result<RawTable> {
        self.tables
            .get(source_id)
            .cloned()
            .ok_or_else(|| EtlError::SourceNotFound {
                source_id: source_id.to_string(),
            })
    }
}
