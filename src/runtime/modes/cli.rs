//! CLI mode
//!
//! `lookup` resolves addresses offline against the configured databases,
//! `config generate` writes a sample configuration file.

use colored::Colorize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::api::types::BatchIpResponse;
use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::services::GeolocationService;
use crate::services::geoip::{BatchResult, GeolocationResponse};

/// 默认示例配置输出路径
const DEFAULT_SAMPLE_PATH: &str = "config.example.toml";

#[derive(Debug)]
pub enum CliError {
    LookupFailed(String),
    CommandError(String),
}

impl CliError {
    pub fn format_simple(&self) -> String {
        match self {
            CliError::LookupFailed(msg) => format!("Lookup failed: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    pub fn format_colored(&self) -> String {
        match self {
            CliError::LookupFailed(msg) => {
                format!("{} {}", "Lookup failed:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

/// Run a CLI command from clap-parsed input
///
/// `Serve` is handled by the caller.
pub async fn run_cli(cmd: Commands, config: Arc<StaticConfig>) -> Result<(), CliError> {
    match cmd {
        Commands::Lookup { addresses, json } => lookup(&config, &addresses, json).await,
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => generate_config(output_path, force),
        Commands::Serve => Err(CliError::CommandError(
            "serve is not a CLI command".to_string(),
        )),
    }
}

async fn lookup(config: &StaticConfig, addresses: &[String], json: bool) -> Result<(), CliError> {
    let service = GeolocationService::from_config(&config.geoip);
    let result = service.resolve_batch(addresses).await;
    service.close();

    let total = result.len();
    let failed = result.failures.len();

    if json {
        let body = serde_json::to_string_pretty(&BatchIpResponse::from(result))
            .map_err(|e| CliError::CommandError(format!("Failed to encode JSON: {}", e)))?;
        println!("{}", body);
    } else {
        print_result(&result);
    }

    if failed > 0 {
        return Err(CliError::LookupFailed(format!(
            "{} of {} address(es) could not be resolved",
            failed, total
        )));
    }
    Ok(())
}

fn print_result(result: &BatchResult) {
    for response in &result.successes {
        print_response(response);
    }

    for failure in &result.failures {
        println!(
            "{} {} {}",
            "✗".bold().red(),
            failure.address.cyan(),
            failure.kind.label().red()
        );
        println!("    {}", failure.detail.dimmed());
    }
}

fn print_response(response: &GeolocationResponse) {
    let place = [
        response.city.as_deref(),
        response.region.as_deref(),
        Some(response.country.as_str()),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ");

    println!("{} {} {}", "✓".bold().green(), response.ip.to_string().cyan(), place.bold());

    if !response.country_code.is_empty() {
        println!("    {:<10} {}", "country".dimmed(), response.country_code);
    }
    if let Some(postal) = &response.postal_code {
        println!("    {:<10} {}", "postal".dimmed(), postal);
    }
    if let (Some(lat), Some(lon)) = (response.latitude, response.longitude) {
        println!("    {:<10} {}, {}", "location".dimmed(), lat, lon);
    }
    if let Some(timezone) = &response.timezone {
        println!("    {:<10} {}", "timezone".dimmed(), timezone);
    }
    if let Some(asn) = &response.asn {
        let org = response.org.as_deref().unwrap_or("");
        println!("    {:<10} {} {}", "asn".dimmed(), asn.yellow(), org);
    }
    if let Some(isp) = &response.isp {
        println!("    {:<10} {}", "isp".dimmed(), isp);
    }
}

/// Generate example configuration file
fn generate_config(output_path: Option<String>, force: bool) -> Result<(), CliError> {
    let path = output_path.unwrap_or_else(|| DEFAULT_SAMPLE_PATH.to_string());

    if Path::new(&path).exists() && !force {
        return Err(CliError::CommandError(format!(
            "{} already exists, use --force to overwrite",
            path
        )));
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    StaticConfig::default().save_to_file(&path).map_err(|e| {
        CliError::CommandError(format!("Unable to write configuration file: {}", e))
    })?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    Ok(())
}
