use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::info;

use oav_core::config::{self, CONFIG_FILE_NAME, OavConfig};
use oav_core::parse::{self, ApiDocument};
use oav_core::operation_views;

#[derive(Parser)]
#[command(name = "oav", about = "Inspect normalized OpenAPI operation views", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the normalized view of every operation
    Inspect {
        /// Path to the OpenAPI spec file (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// URL the document is served from, used to resolve relative server URLs
        #[arg(long)]
        spec_url: Option<String>,

        /// Only show the operation with this id
        #[arg(long)]
        id: Option<String>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Check that a spec loads and every operation view can be built
    Validate {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new oav configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect {
            input,
            spec_url,
            id,
            format,
        } => cmd_inspect(input, spec_url, id, format),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oav", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OavConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn load_document(path: &Path, spec_url: Option<&str>) -> Result<ApiDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let document = match ext {
        "json" => parse::document_from_json(&content)?,
        _ => parse::document_from_yaml(&content)?,
    };

    match spec_url {
        Some(url) => Ok(document.with_spec_url(url)?),
        None => Ok(document),
    }
}

fn cmd_inspect(
    input: Option<PathBuf>,
    spec_url: Option<String>,
    id: Option<String>,
    format: InspectFormat,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let spec_url = spec_url.or(cfg.spec_url);
    let document = load_document(&input, spec_url.as_deref())?;

    let views = operation_views(&document, None, &cfg.options)?;
    let selected: Vec<_> = views
        .iter()
        .filter(|v| id.as_deref().is_none_or(|id| v.id() == id))
        .collect();
    if let Some(id) = id.as_deref() {
        if selected.is_empty() {
            anyhow::bail!("no operation with id {id}");
        }
    }
    info!("inspecting {} of {} operations", selected.len(), views.len());

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&selected)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&selected)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let document = load_document(&input, None)?;
    let spec = document.spec();

    eprintln!("Valid OpenAPI {} spec: {}", spec.openapi, spec.info.title);
    eprintln!("  Version: {}", spec.info.version);
    eprintln!("  Paths: {}", spec.paths.len());

    let options = config::ViewOptions::default();
    let views = operation_views(&document, None, &options)?;
    let parameters: usize = views.iter().map(|v| v.parameters().len()).sum();
    let responses: usize = views.iter().map(|v| v.responses().len()).sum();
    eprintln!("  Operations: {}", views.len());
    eprintln!("  Parameters: {}", parameters);
    eprintln!("  Responses: {}", responses);

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    write_config(&config_path, force)?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists. Use --force to overwrite.", path.display());
    }
    fs::write(path, config::default_config_content())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
