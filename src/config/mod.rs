pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::columns::{CpiColumns, EnrolledColumns};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const OUTPUT_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "destatis-etl")]
#[command(about = "Merge Destatis enrolled students and consumer price index tables by year")]
pub struct CliConfig {
    /// Path to a TOML configuration file; overrides the other source/output flags
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, default_value = ".")]
    pub input_dir: String,

    #[arg(long, default_value = "21311-0002_en_flat.csv")]
    pub enrolled_file: String,

    #[arg(long, default_value = "61111-0001_en_flat.csv")]
    pub cpi_file: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "destatis_merged")]
    pub output_filename: String,

    #[arg(long, default_value_t = ';')]
    pub delimiter: char,

    #[arg(long, value_delimiter = ',', default_values = ["csv", "tsv", "json"])]
    pub formats: Vec<String>,

    #[arg(long, help = "Compute CPI change ratios in source row order instead of year order")]
    pub preserve_cpi_order: bool,

    #[arg(long, help = "Write plain files instead of a ZIP archive")]
    pub no_compress: bool,

    #[arg(long, help = "Also write the per-source aggregates")]
    pub include_intermediate: bool,

    #[arg(long, help = "Print the merged table to stdout")]
    pub print: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_dir(&self) -> &str {
        &self.input_dir
    }

    fn enrolled_source(&self) -> &str {
        &self.enrolled_file
    }

    fn cpi_source(&self) -> &str {
        &self.cpi_file
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn delimiter(&self) -> char {
        self.delimiter
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn sort_cpi_by_year(&self) -> bool {
        !self.preserve_cpi_order
    }

    fn compress_output(&self) -> bool {
        !self.no_compress
    }

    fn include_intermediate(&self) -> bool {
        self.include_intermediate
    }

    fn output_filename(&self) -> &str {
        &self.output_filename
    }

    fn enrolled_columns(&self) -> EnrolledColumns {
        EnrolledColumns::default()
    }

    fn cpi_columns(&self) -> CpiColumns {
        CpiColumns::default()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validation::validate_path("input_dir", &self.input_dir)?;
        validation::validate_path("enrolled_file", &self.enrolled_file)?;
        validation::validate_path("cpi_file", &self.cpi_file)?;
        validation::validate_distinct_sources(&self.enrolled_file, &self.cpi_file)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("output_filename", &self.output_filename)?;
        validation::validate_delimiter("delimiter", self.delimiter)?;
        validation::validate_output_formats("formats", &self.formats, &OUTPUT_FORMATS)?;
        Ok(())
    }
}
