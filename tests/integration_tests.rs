use anyhow::Result;
use destatis_etl::core::source::CsvFileSource;
use destatis_etl::core::ConfigProvider;
use destatis_etl::{EtlEngine, EtlError, LocalStorage, Pipeline, SimplePipeline, TomlConfig};
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

const STUDENTS: &str = "\
statistics_code;time;value;2_variable_attribute_code;2_variable_attribute_label;3_variable_attribute_code;3_variable_attribute_label
21311;2017-10;1900000;NATD;Germans;GESM;Total
21311;2017-10;350000;NATA;Foreigners;GESM;Total
21311;2017-10;990000;NATD;Germans;GESW;Female
21311;2018-10;1920000;NATD;Germans;GESM;Total
21311;2018-10;370000;NATA;Foreigners;GESM;Total
21311;2019-10;1930000;NATD;Germans;GESM;Total
21311;2019-10;-;NATA;Foreigners;GESM;Total
21311;2020-10;1950000;NATD;Germans;GESM;Total
";

const CPI: &str = "\
statistics_code;time;value_variable_code;value_variable_label;value
61111;2016;PRE001;Consumer price index;100.0
61111;2017;PRE001;Consumer price index;101.5
61111;2017;PRE002;Change on previous year;1.5
61111;2018;PRE001;Consumer price index;103.3
61111;2019;PRE001;Consumer price index;104.8
";

fn write_sources(dir: &Path) -> Result<()> {
    std::fs::write(dir.join("students.csv"), STUDENTS)?;
    std::fs::write(dir.join("cpi.csv"), CPI)?;
    Ok(())
}

fn toml_config(input_dir: &str, output_dir: &str, compress: bool) -> Result<TomlConfig> {
    let content = format!(
        r#"
[pipeline]
name = "integration"

[sources]
input_dir = "{}"
enrolled_students = "students.csv"
cpi = "cpi.csv"

[load]
output_path = "{}"
output_formats = ["csv", "tsv", "json"]
include_intermediate = true

[load.compression]
enabled = {}
"#,
        input_dir.replace('\\', "/"),
        output_dir.replace('\\', "/"),
        compress
    );
    Ok(TomlConfig::from_toml_str(&content)?)
}

#[tokio::test]
async fn test_end_to_end_zip_output() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    write_sources(input_dir.path())?;

    let config = toml_config(
        input_dir.path().to_str().unwrap(),
        output_dir.path().to_str().unwrap(),
        true,
    )?;
    let input = LocalStorage::new(config.input_dir().to_string());
    let output = LocalStorage::new(config.output_path().to_string());
    let engine = EtlEngine::new(SimplePipeline::new(input, output, config));

    let report = engine.run().await?;
    assert!(report.output_path.ends_with("destatis_merged.zip"));

    // 2017 到 2019 兩邊都有；2016 只在 CPI，2020 只有德國學生
    let years: Vec<i32> = report.merged.iter().map(|r| r.year).collect();
    assert_eq!(years, vec![2017, 2018, 2019]);

    let y2017 = &report.merged[0];
    assert_eq!(y2017.total_german, 1_900_000.0);
    assert_eq!(y2017.total_foreign, 350_000.0);
    assert_eq!(y2017.total_enrolled, 2_250_000.0);
    assert!((y2017.cpi_factor.unwrap() - 0.015).abs() < 1e-9);

    // "-" 視為空值，加總時以 0 計
    let y2019 = &report.merged[2];
    assert_eq!(y2019.total_foreign, 0.0);
    assert_eq!(y2019.total_enrolled, 1_930_000.0);

    let zip_data = std::fs::read(output_dir.path().join("destatis_merged.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    for expected in [
        "destatis_merged.csv",
        "destatis_merged.tsv",
        "destatis_merged.json",
        "intermediate.json",
    ] {
        assert!(names.contains(&expected.to_string()), "missing {expected}");
    }

    let mut json = String::new();
    archive
        .by_name("destatis_merged.json")?
        .read_to_string(&mut json)?;
    let rows: Vec<serde_json::Value> = serde_json::from_str(&json)?;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["year"], 2017);

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_plain_files() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    write_sources(input_dir.path())?;

    let config = toml_config(
        input_dir.path().to_str().unwrap(),
        output_dir.path().to_str().unwrap(),
        false,
    )?;
    let input = LocalStorage::new(config.input_dir().to_string());
    let output = LocalStorage::new(config.output_path().to_string());
    EtlEngine::new(SimplePipeline::new(input, output, config))
        .run()
        .await?;

    let csv = std::fs::read_to_string(output_dir.path().join("destatis_merged.csv"))?;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("year,cpi,cpi_factor,total_german,total_foreign,total_enrolled")
    );
    assert_eq!(lines.count(), 3);

    let tsv = std::fs::read_to_string(output_dir.path().join("destatis_merged.tsv"))?;
    assert!(tsv.starts_with("year\tcpi\t"));
    assert!(!output_dir.path().join("destatis_merged.zip").exists());

    Ok(())
}

#[tokio::test]
async fn test_missing_source_column_is_schema_error() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    std::fs::write(input_dir.path().join("students.csv"), "time;value\n2019;1\n")?;
    std::fs::write(input_dir.path().join("cpi.csv"), CPI)?;

    let config = toml_config(
        input_dir.path().to_str().unwrap(),
        output_dir.path().to_str().unwrap(),
        true,
    )?;
    let input = LocalStorage::new(config.input_dir().to_string());
    let output = LocalStorage::new(config.output_path().to_string());
    let result = EtlEngine::new(SimplePipeline::new(input, output, config))
        .run()
        .await;

    match result {
        Err(EtlError::SchemaError { column, .. }) => {
            assert_eq!(column, "2_variable_attribute_code")
        }
        other => panic!("expected schema error, got {:?}", other.map(|r| r.output_path)),
    }
    Ok(())
}

#[test]
fn test_pipeline_over_csv_files() -> Result<()> {
    let dir = TempDir::new()?;
    write_sources(dir.path())?;

    let mut pipeline = Pipeline::new(CsvFileSource::new(dir.path(), b';'), "students.csv", "cpi.csv");
    assert!(pipeline.result().is_err());

    pipeline.load_cpi()?;
    assert!(matches!(
        pipeline.merge(),
        Err(EtlError::PreconditionError { .. })
    ));

    pipeline.load_enrolled()?;
    pipeline.merge()?;

    let merged = pipeline.result()?;
    for row in merged {
        assert_eq!(row.total_enrolled, row.total_german + row.total_foreign);
    }
    assert!(merged.iter().all(|r| r.year != 2020 && r.year != 2016));
    Ok(())
}
