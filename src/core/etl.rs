use crate::core::{EtlPipeline, MergedRow};
use crate::utils::error::Result;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: String,
    pub merged: Vec<MergedRow>,
}

pub struct EtlEngine<P: EtlPipeline> {
    pipeline: P,
}

impl<P: EtlPipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started = Instant::now();
        tracing::info!("🚀 Starting ETL process");

        // Extract
        let tables = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} enrolled students rows and {} CPI rows",
            tables.enrolled.len(),
            tables.cpi.len()
        );

        // Transform
        let result = self.pipeline.transform(tables).await?;
        tracing::info!("Transformed into {} merged years", result.merged.len());
        let merged = result.merged.clone();

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {} ({:?})", output_path, started.elapsed());

        Ok(RunReport {
            output_path,
            merged,
        })
    }
}
