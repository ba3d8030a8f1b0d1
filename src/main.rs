use clap::Parser;
use std::process::ExitCode;

use geolius::cli::{Cli, Commands};
use geolius::config::init_config;
use geolius::runtime::modes;
use geolius::system::init_logging;

#[actix_web::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = init_config(cli.config.as_deref());

    match cli.command {
        None | Some(Commands::Serve) => {
            let _guard = match init_logging(&config.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("Failed to initialize logging: {:#}", e);
                    return ExitCode::FAILURE;
                }
            };

            if let Err(e) = modes::run_server(config).await {
                tracing::error!("Server exited with error: {:#}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Some(cmd) => {
            // CLI 模式只输出 warn 以上日志，避免干扰查询结果
            let mut logging = config.logging.clone();
            if std::env::var_os("RUST_LOG").is_none() {
                logging.level = "warn".to_string();
            }
            let _guard = init_logging(&logging).ok();

            match modes::run_cli(cmd, config).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{}", e.format_colored());
                    ExitCode::FAILURE
                }
            }
        }
    }
}
