use clap::Parser;
use destatis_etl::core::report::format_table;
use destatis_etl::core::ConfigProvider;
use destatis_etl::utils::error::{EtlError, ErrorSeverity};
use destatis_etl::utils::{logger, validation::Validate};
use destatis_etl::{CliConfig, EtlEngine, LocalStorage, SimplePipeline, TomlConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting destatis-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let outcome = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(config) => run(config, cli.print).await,
                Err(e) => Err(e),
            }
        }
        None => {
            let print = cli.print;
            run(cli, print).await
        }
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run<C>(config: C, print: bool) -> Result<(), EtlError>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;

    let input = LocalStorage::new(config.input_dir().to_string());
    let output = LocalStorage::new(config.output_path().to_string());
    let engine = EtlEngine::new(SimplePipeline::new(input, output, config));

    let report = engine.run().await?;
    tracing::info!("✅ ETL process completed successfully!");
    println!("✅ Merged {} years", report.merged.len());
    println!("📁 Output saved to: {}", report.output_path);

    if print {
        println!("{}", format_table(&report.merged));
    }
    Ok(())
}
