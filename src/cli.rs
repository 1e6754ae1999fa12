use crate::docs::ApiDocs;
use crate::scanner::ScannerConfig;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use crate::tables::DescriptionTables;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// API documentation scanner - index file-based route handlers into browsable API docs
#[derive(Parser, Debug)]
#[command(name = "api-doc-scanner")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the route handler root (e.g. app/api)
    #[arg(value_name = "ROUTES_ROOT")]
    pub root: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// URL prefix the routes are served under
    #[arg(short = 'p', long = "prefix", default_value = "/api")]
    pub api_prefix: String,

    /// YAML or JSON file with extra description table entries
    #[arg(short = 't', long = "tables", value_name = "FILE")]
    pub tables_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.root.exists() {
        anyhow::bail!("Routes root does not exist: {}", args.root.display());
    }

    if !args.root.is_dir() {
        anyhow::bail!("Routes root is not a directory: {}", args.root.display());
    }

    if !args.api_prefix.starts_with('/') {
        anyhow::bail!("API prefix must start with '/': {}", args.api_prefix);
    }

    info!("Routes root: {}", args.root.display());
    info!("API prefix: {}", args.api_prefix);
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Builds the scanner configuration described by the arguments
pub fn build_config(args: &CliArgs) -> Result<ScannerConfig> {
    let mut config = ScannerConfig::new(args.root.clone());
    config.api_prefix = args.api_prefix.clone();

    if let Some(ref tables_path) = args.tables_path {
        info!("Loading description tables from {}", tables_path.display());
        config.tables = DescriptionTables::load_overrides(tables_path)
            .with_context(|| format!("Failed to load tables: {}", tables_path.display()))?;
    }

    Ok(config)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    let config = build_config(&args)?;
    let docs = ApiDocs::new(config);

    info!("Scanning routes...");
    let result = docs
        .scan(true)
        .with_context(|| format!("Failed to scan {}", args.root.display()))?;

    if result.groups.is_empty() {
        log::warn!("No endpoints found under {}", args.root.display());
    }

    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&result)?,
        OutputFormat::Json => serialize_json(&result)?,
    };

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    info!("Summary:");
    info!("  - Groups: {}", result.stats.total_groups);
    info!("  - Endpoints: {}", result.stats.total_endpoints);
    for group in &result.groups {
        info!("  - {} ({}): {} endpoints", group.name, group.description, group.endpoints.len());
    }

    Ok(())
}
