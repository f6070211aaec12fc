use crate::config::OUTPUT_FORMATS;
use crate::core::source::DEFAULT_DELIMITER;
use crate::core::ConfigProvider;
use crate::domain::columns::{CpiColumns, EnrolledColumns};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub sources: SourcesConfig,
    #[serde(default)]
    pub columns: ColumnsConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub input_dir: Option<String>,
    pub enrolled_students: Option<String>,
    pub cpi: Option<String>,
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default)]
    pub enrolled: EnrolledColumns,
    #[serde(default)]
    pub cpi: CpiColumns,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformConfig {
    /// 預設為 true；false 時依來源順序計算 CPI 變化率
    pub sort_cpi_by_year: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    /// 輸出檔名（不含副檔名），支援 `{timestamp}`
    pub filename: Option<String>,
    pub include_intermediate: Option<bool>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DESTATIS_DATA_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;

        let enrolled =
            validation::validate_required_field("sources.enrolled_students", &self.sources.enrolled_students)?;
        let cpi = validation::validate_required_field("sources.cpi", &self.sources.cpi)?;
        validation::validate_path("sources.enrolled_students", enrolled)?;
        validation::validate_path("sources.cpi", cpi)?;
        validation::validate_distinct_sources(enrolled, cpi)?;
        validation::validate_path("sources.input_dir", self.input_dir())?;
        validation::validate_delimiter("sources.delimiter", self.delimiter())?;

        for column in self.columns.enrolled.required() {
            validation::validate_non_empty_string("columns.enrolled", column)?;
        }
        for column in self.columns.cpi.required() {
            validation::validate_non_empty_string("columns.cpi", column)?;
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_non_empty_string("load.filename", self.output_filename())?;
        validation::validate_output_formats(
            "load.output_formats",
            &self.load.output_formats,
            &OUTPUT_FORMATS,
        )?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_dir(&self) -> &str {
        self.sources.input_dir.as_deref().unwrap_or(".")
    }

    fn enrolled_source(&self) -> &str {
        self.sources.enrolled_students.as_deref().unwrap_or_default()
    }

    fn cpi_source(&self) -> &str {
        self.sources.cpi.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn delimiter(&self) -> char {
        self.sources.delimiter.unwrap_or(DEFAULT_DELIMITER)
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn sort_cpi_by_year(&self) -> bool {
        self.transform.sort_cpi_by_year.unwrap_or(true)
    }

    fn compress_output(&self) -> bool {
        self.load
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(true)
    }

    fn include_intermediate(&self) -> bool {
        self.load.include_intermediate.unwrap_or(false)
    }

    fn output_filename(&self) -> &str {
        self.load.filename.as_deref().unwrap_or("destatis_merged")
    }

    fn enrolled_columns(&self) -> EnrolledColumns {
        self.columns.enrolled.clone()
    }

    fn cpi_columns(&self) -> CpiColumns {
        self.columns.cpi.clone()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
