use clap::Parser;
use codefix::utils::{logger, validation::Validate};
use codefix::{CliConfig, Engine, FileOutcome, LocalStorage, NodeFixPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting NodeDefinition migration");
    tracing::debug!("CLI config: {:?}", cli);

    // 載入並驗證配置
    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.severity().exit_code());
        }
    };

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - files will not be written");
    }

    let storage = LocalStorage::default();
    let pipeline = match NodeFixPipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.severity().exit_code());
        }
    };

    let engine = Engine::new_with_monitoring(pipeline, cli.monitor);
    if engine.is_monitoring() {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 單一檔案的錯誤已在管道內處理，這裡只會遇到目錄層級的問題
    match engine.run().await {
        Ok(summary) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            println!("Found {} file(s)", summary.scanned);
            for outcome in &summary.outcomes {
                if let FileOutcome::Failed { path, reason } = outcome {
                    println!("❌ Error fixing {}: {}", path, reason);
                }
            }
            if summary.dry_run {
                println!("Would fix {} file(s) in total", summary.fixed);
            } else {
                println!("Fixed {} file(s) in total", summary.fixed);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Migration failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            println!("Fixed 0 file(s) in total");
        }
    }

    Ok(())
}
