use clap::Parser;
use topic_bingo::core::ConfigProvider;
use topic_bingo::server;
use topic_bingo::utils::{logger, validation::Validate};
use topic_bingo::{BingoError, CliConfig, TomlConfig};

fn init_logging(verbose: bool, json: bool) {
    if json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
}

async fn run_with<C: ConfigProvider + Validate>(config: &C) -> Result<(), BingoError> {
    config.validate()?;
    let engine = server::build_engine(config)?;
    server::serve(config.bind_address(), engine).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let result = match &cli.config {
        Some(path) => {
            let toml_config = match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load {}: {}", path, e);
                    std::process::exit(1);
                }
            };
            // 命令列的 --verbose / --json-logs 可以覆寫設定檔
            init_logging(
                cli.verbose || toml_config.logging.verbose,
                cli.json_logs || toml_config.logging.json,
            );
            tracing::info!("Starting topic-bingo with config file {}", path);
            run_with(&toml_config).await
        }
        None => {
            init_logging(cli.verbose, cli.json_logs);
            tracing::info!("Starting topic-bingo");
            tracing::debug!(
                "CLI config: bind={}, catalog={}, upstream={}",
                cli.bind,
                cli.catalog,
                cli.upstream_endpoint
            );
            run_with(&cli).await
        }
    };

    if let Err(e) = result {
        tracing::error!("❌ Service stopped: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    Ok(())
}
