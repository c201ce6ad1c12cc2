use brevet_relay::utils::error::{ErrorSeverity, RelayError};
use brevet_relay::utils::{logger, validation::Validate};
use brevet_relay::{CliConfig, TomlConfig};
use clap::Parser;

fn exit_code(e: &RelayError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: RelayError) -> ! {
    tracing::error!(
        "❌ brevet-relay stopped: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e));
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    match cli.config.clone() {
        Some(path) => {
            let mut config = match TomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };

            // Flags that can only switch something on still apply on top of the file
            if cli.enforce_limit_range {
                config.relay.enforce_limit_range = true;
            }
            let log_format = cli.log_format.or(config.logging.format).unwrap_or_default();
            logger::init_logger(log_format, cli.verbose);
            tracing::info!("📁 Loaded configuration from: {}", path);

            run(&config).await
        }
        None => {
            logger::init_logger(cli.log_format.unwrap_or_default(), cli.verbose);
            if cli.verbose {
                tracing::debug!("CLI config: {:?}", cli);
            }

            run(&cli).await
        }
    }
}

async fn run<C>(config: &C)
where
    C: brevet_relay::core::ConfigProvider + Validate,
{
    tracing::info!("Starting brevet-relay v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(e);
    }

    if let Err(e) = brevet_relay::serve(config).await {
        fail(e);
    }
}
