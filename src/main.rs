//! structblock - render struct block definitions from the command line
//!
//! Loads a JSON block definition, renders it with optional state and
//! validation errors, and prints the resulting markup or value.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use structblock::config::RenderConfig;
use structblock::state::{BlockSchema, ValidationError};
use structblock::ui::blocks::{render_block_value, BlockDefRef, BlockDefinition, Widget};
use structblock::ui::dom::{render_fragment, Document};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "structblock", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a live block and print the document markup
    Render {
        /// Block definition JSON file
        definition: PathBuf,
        /// Initial state JSON file
        #[arg(long)]
        state: Option<PathBuf>,
        /// Validation errors JSON file, a list of errors
        #[arg(long)]
        errors: Option<PathBuf>,
        /// Form field name prefix
        #[arg(long)]
        prefix: Option<String>,
        /// Print the block's clean value instead of markup
        #[arg(long)]
        value: bool,
    },
    /// Print the read-only summary of a state
    Preview {
        /// Block definition JSON file
        definition: PathBuf,
        /// State JSON file
        #[arg(long)]
        state: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "structblock=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = RenderConfig::load()?;

    match cli.command {
        Command::Render {
            definition,
            state,
            errors,
            prefix,
            value,
        } => {
            let def = load_definition(&definition, &config)?;
            let state: Option<Value> = state.as_deref().map(read_json).transpose()?;
            let errors: Option<Vec<ValidationError>> =
                errors.as_deref().map(read_json).transpose()?;
            let prefix = prefix.as_deref().unwrap_or(config.prefix());

            let mut doc = Document::new();
            let root = doc.root();
            let placeholder = doc.mount_point(root);
            let widget = def.render(
                &mut doc,
                placeholder,
                prefix,
                state.as_ref(),
                errors.as_deref(),
            )?;
            tracing::info!("rendered block `{}` with prefix `{prefix}`", def.name());

            if value {
                println!("{}", serde_json::to_string_pretty(&widget.get_value())?);
            } else {
                println!("{}", doc.inner_html(root));
            }
        }
        Command::Preview { definition, state } => {
            let def = load_definition(&definition, &config)?;
            let state: Value = read_json(&state)?;
            let summary = render_block_value(def.as_ref(), &state)?;
            println!("{}", render_fragment(&summary));
        }
    }

    Ok(())
}

fn load_definition(path: &Path, config: &RenderConfig) -> Result<BlockDefRef> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read definition {}", path.display()))?;
    let mut schema = BlockSchema::from_json(&content)
        .with_context(|| format!("failed to parse definition {}", path.display()))?;
    schema.apply_defaults(config);
    Ok(schema.into_definition()?)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}
