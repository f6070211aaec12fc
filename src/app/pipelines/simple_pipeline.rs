use crate::core::cpi::{CpiOptions, CpiTransform};
use crate::core::enrolled::EnrolledStudentsTransform;
use crate::core::pipeline::Pipeline;
use crate::core::report::to_delimited;
use crate::core::source::{parse_table, MemorySource};
use crate::core::{ConfigProvider, EtlPipeline, SourceTables, Storage, TransformResult};
use crate::utils::error::Result;
use crate::utils::validation::validate_delimiter;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

/// 讀取兩份 Destatis 表格，依年份合併後輸出
pub struct SimplePipeline<S: Storage, C: ConfigProvider> {
    pub(crate) input: S,
    pub(crate) output: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> SimplePipeline<S, C> {
    pub fn new(input: S, output: S, config: C) -> Self {
        Self {
            input,
            output,
            config,
        }
    }

    fn output_basename(&self) -> String {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        self.config
            .output_filename()
            .replace("{timestamp}", &timestamp)
    }

    fn render(&self, result: &TransformResult, basename: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files = Vec::new();

        for format in self.config.output_formats() {
            let content = match format.as_str() {
                "csv" => to_delimited(&result.merged, b',')?,
                "tsv" => to_delimited(&result.merged, b'\t')?,
                "json" => serde_json::to_string_pretty(&result.merged)?,
                other => {
                    tracing::warn!("Skipping unsupported output format: {}", other);
                    continue;
                }
            };
            files.push((format!("{}.{}", basename, format), content.into_bytes()));
        }

        // 中繼結果：兩個來源各自的年度彙總
        if self.config.include_intermediate() {
            let intermediate = serde_json::json!({
                "enrolled_students": result.enrolled,
                "consumer_price_index": result.cpi,
            });
            files.push((
                "intermediate.json".to_string(),
                serde_json::to_string_pretty(&intermediate)?.into_bytes(),
            ));
        }

        Ok(files)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> EtlPipeline for SimplePipeline<S, C> {
    async fn extract(&self) -> Result<SourceTables> {
        let delimiter = validate_delimiter("delimiter", self.config.delimiter())?;

        tracing::debug!("Reading enrolled students from {}", self.config.enrolled_source());
        let enrolled_bytes = self.input.read_file(self.config.enrolled_source()).await?;
        let enrolled = parse_table(enrolled_bytes.as_slice(), delimiter)?;

        tracing::debug!("Reading CPI from {}", self.config.cpi_source());
        let cpi_bytes = self.input.read_file(self.config.cpi_source()).await?;
        let cpi = parse_table(cpi_bytes.as_slice(), delimiter)?;

        Ok(SourceTables { enrolled, cpi })
    }

    async fn transform(&self, tables: SourceTables) -> Result<TransformResult> {
        let enrolled_id = self.config.enrolled_source();
        let cpi_id = self.config.cpi_source();
        let source = MemorySource::new()
            .with_table(enrolled_id, tables.enrolled)
            .with_table(cpi_id, tables.cpi);

        let mut pipeline = Pipeline::new(source, enrolled_id, cpi_id).with_transforms(
            EnrolledStudentsTransform::new(self.config.enrolled_columns()),
            CpiTransform::new(
                self.config.cpi_columns(),
                CpiOptions {
                    sort_by_year: self.config.sort_cpi_by_year(),
                },
            ),
        );

        pipeline.load_enrolled()?;
        pipeline.load_cpi()?;
        pipeline.merge()?;
        pipeline.into_transform_result()
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let basename = self.output_basename();
        let files = self.render(&result, &basename)?;
        tracing::debug!("Rendered {} output files", files.len());

        if !self.config.compress_output() {
            for (name, data) in &files {
                self.output.write_file(name, data).await?;
            }
            let names: Vec<&str> = files.iter().map(|(name, _)| name.as_str()).collect();
            tracing::info!("💾 Wrote {}", names.join(", "));
            return Ok(format!("{}/{}", self.config.output_path(), names.join(",")));
        }

        let zip_name = format!("{}.zip", basename);
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, data) in &files {
                zip.start_file(name.as_str(), SimpleFileOptions::default())?;
                zip.write_all(data)?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.output.write_file(&zip_name, &zip_data).await?;

        Ok(format!("{}/{}", self.config.output_path(), zip_name))
    }
}
