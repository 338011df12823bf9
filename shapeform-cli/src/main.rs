//! # shapeform
//!
//! CLI for checking data against schema descriptors.
//!
//! ## Usage
//!
//! ```bash
//! # Validate a data file, printing the normalized value
//! shapeform check --schema user.schema.json --data user.json
//!
//! # Coerce stringly-typed top-level fields and write the result
//! shapeform check -s user.schema.json -d form.json --coerce --output normalized.json
//!
//! # Show merged field metadata for a partial record
//! shapeform meta --schema user.schema.json --data draft.json
//!
//! # Show a layout with resolved titles
//! shapeform layout --schema user.schema.json list
//!
//! # Initialize configuration
//! shapeform init
//! ```
//!
//! Exit status is 0 on success, 2 when data fails validation and 1 otherwise.
//! Log verbosity follows `SHAPEFORM_LOG` (default `warn`).

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::json;
use shapeform::{Issue, PathStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shapeform_cli::{
    commands,
    config::{CliArgs, ConfigManager},
    error::CliError,
    writer::{FileWriter, WriteResult},
    Config, OutputFormat,
};

#[derive(Parser)]
#[command(name = "shapeform")]
#[command(author, version, about = "Check data against shapeform schema descriptors", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (overrides configuration)
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum PathStyleArg {
    Bracketed,
    Dotted,
}

impl From<PathStyleArg> for PathStyle {
    fn from(arg: PathStyleArg) -> Self {
        match arg {
            PathStyleArg::Bracketed => PathStyle::Bracketed,
            PathStyleArg::Dotted => PathStyle::Dotted,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON data file against a schema descriptor
    Check {
        /// Schema descriptor (JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Data file (JSON)
        #[arg(short, long)]
        data: PathBuf,

        /// Coerce string input for top-level number and boolean fields
        #[arg(long)]
        coerce: bool,

        /// How issue paths are rendered
        #[arg(long, value_enum)]
        path_style: Option<PathStyleArg>,

        /// Report every invalid array element instead of the first
        #[arg(long)]
        collect_all: bool,

        /// Write the normalized data to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preview the output file without writing it
        #[arg(long, requires = "output")]
        dry_run: bool,
    },

    /// Print merged field metadata
    Meta {
        /// Schema descriptor (JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Partial data snapshot (JSON)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Print a named layout, or list layout names
    Layout {
        /// Schema descriptor (JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Layout name; omit to list every layout
        name: Option<String>,
    },

    /// Initialize a new shapeform configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "shapeform.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Invalid { .. } => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("SHAPEFORM_LOG").unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let base = ConfigManager::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            schema,
            data,
            coerce,
            path_style,
            collect_all,
            output,
            dry_run,
        } => {
            let config = ConfigManager::merge_cli_args(
                base,
                &CliArgs {
                    coerce,
                    path_style: path_style.map(PathStyle::from),
                    collect_all,
                    format: cli.format,
                },
            );
            cmd_check(schema, data, output, dry_run, &config)
        }

        Commands::Meta { schema, data } => {
            let config = with_format(base, cli.format);
            cmd_meta(schema, data, &config)
        }

        Commands::Layout { schema, name } => {
            let config = with_format(base, cli.format);
            cmd_layout(schema, name, &config)
        }

        Commands::Init { output, force } => cmd_init(output, force),
    }
}

fn with_format(config: Config, format: Option<OutputFormat>) -> Config {
    ConfigManager::merge_cli_args(
        config,
        &CliArgs {
            format,
            ..Default::default()
        },
    )
}

/// Check command implementation.
fn cmd_check(
    schema_path: PathBuf,
    data_path: PathBuf,
    output: Option<PathBuf>,
    dry_run: bool,
    config: &Config,
) -> Result<(), CliError> {
    let schema = commands::load_schema(&schema_path)?;
    let data = commands::load_json(&data_path)?;

    let normalized = match commands::check(&schema, &data, config) {
        Ok(normalized) => normalized,
        Err(CliError::Invalid { issues }) => {
            match config.output.format {
                OutputFormat::Json => print_json(&json!({"success": false, "issues": issues})),
                OutputFormat::Pretty => {
                    println!("{} {}", "✗".red(), data_path.display());
                    print_issues(&issues);
                }
            }
            return Err(CliError::Invalid { issues });
        }
        Err(e) => return Err(e),
    };

    match config.output.format {
        OutputFormat::Json => print_json(&json!({"success": true, "data": normalized})),
        OutputFormat::Pretty => {
            println!("{} {} matches the schema", "✓".green(), data_path.display())
        }
    }

    if let Some(path) = output {
        match FileWriter::new(dry_run).write_json(&path, &normalized)? {
            WriteResult::Written { path, bytes } => {
                eprintln!("{} Written {} bytes to {}", "✓".green(), bytes, path.display());
            }
            WriteResult::DryRun { path, content } => {
                eprintln!("{} Would write to {}:", "[dry-run]".yellow(), path.display());
                eprintln!("{}", "─".repeat(60).dimmed());
                eprintln!("{}", content);
                eprintln!("{}", "─".repeat(60).dimmed());
            }
        }
    } else if config.output.format == OutputFormat::Pretty {
        print_json(&normalized);
    }

    Ok(())
}

/// Meta command implementation.
fn cmd_meta(schema_path: PathBuf, data: Option<PathBuf>, config: &Config) -> Result<(), CliError> {
    let schema = commands::load_schema(&schema_path)?;
    let partial = data.as_deref().map(commands::load_json).transpose()?;
    let meta = commands::meta(&schema, partial.as_ref())?;

    match config.output.format {
        OutputFormat::Json => {
            print_json(&meta);
        }
        OutputFormat::Pretty => {
            for (field, meta) in &meta {
                let label = meta.label.as_deref().unwrap_or("-");
                println!("{} {}", field.bold(), label.cyan());
                if let Some(description) = &meta.description {
                    println!("    {}", description.dimmed());
                }
                if let Some(default) = &meta.default_value {
                    println!("    default: {}", default);
                }
            }
        }
    }
    Ok(())
}

/// Layout command implementation.
fn cmd_layout(schema_path: PathBuf, name: Option<String>, config: &Config) -> Result<(), CliError> {
    let schema = commands::load_schema(&schema_path)?;

    let Some(name) = name else {
        let names = commands::layout_names(&schema)?;
        match config.output.format {
            OutputFormat::Json => print_json(&names),
            OutputFormat::Pretty if names.is_empty() => {
                println!("{}", "No layouts registered.".yellow())
            }
            OutputFormat::Pretty => names.iter().for_each(|n| println!("{}", n)),
        }
        return Ok(());
    };

    let columns = commands::layout(&schema, &name)?;
    match config.output.format {
        OutputFormat::Json => {
            print_json(&columns);
        }
        OutputFormat::Pretty => {
            let mut current_group: Option<&str> = None;
            for column in &columns {
                if column.group.as_deref() != current_group {
                    current_group = column.group.as_deref();
                    if let Some(title) = current_group {
                        println!("{}", title.bold());
                    }
                }
                let hint = match (column.width, column.hidden) {
                    (_, true) => " (hidden)".dimmed().to_string(),
                    (Some(width), false) => format!(" [{}]", width).dimmed().to_string(),
                    (None, false) => String::new(),
                };
                println!("  {} {}{}", column.title, column.field.dimmed(), hint);
            }
        }
    }
    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!("  Use --force to overwrite");
        return Err(CliError::usage(format!(
            "Configuration file already exists: {}",
            output.display()
        )));
    }

    let result = FileWriter::new(false).write(&output, ConfigManager::default_config_content())?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        result.path().display()
    );

    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
    }
}

fn print_issues(issues: &[Issue]) {
    for issue in issues {
        println!("  {} {}", issue.path.yellow(), issue.message);
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
