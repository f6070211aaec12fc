use crate::domain::columns::{CpiColumns, EnrolledColumns};
use crate::domain::model::{RawTable, SourceTables, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 提供原始表格的來源，識別字由呼叫端決定（通常是檔名）
pub trait TabularSource {
    fn load(&self, source_id: &str) -> Result<RawTable>;
}

pub trait ConfigProvider: Send + Sync {
    fn input_dir(&self) -> &str;
    fn enrolled_source(&self) -> &str;
    fn cpi_source(&self) -> &str;
    fn output_path(&self) -> &str;
    fn delimiter(&self) -> char;
    fn output_formats(&self) -> &[String];
    fn sort_cpi_by_year(&self) -> bool;
    fn compress_output(&self) -> bool;
    fn include_intermediate(&self) -> bool;
    fn output_filename(&self) -> &str;
    fn enrolled_columns(&self) -> EnrolledColumns;
    fn cpi_columns(&self) -> CpiColumns;
}

#[async_trait]
pub trait EtlPipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceTables>;
    async fn transform(&self, tables: SourceTables) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
