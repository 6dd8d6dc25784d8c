//! omc-reply - inspect compiler replies and build call expressions
//!
//! `decode` classifies a raw reply and prints the result as JSON; `encode`
//! renders a call from value literals.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use omc_codec::codec::Literal;
use omc_codec::protocol::{Outcome, classify_components, classify_value, outcome_of};
use omc_codec::{Call, CallError, CallStyle, CodecConfig};
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "omc-reply")]
#[command(about = "Decode OpenModelica compiler replies and encode calls", long_about = None)]
struct Cli {
    /// Codec configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a raw reply and print it as JSON
    Decode {
        /// Parse the reply as an array of component records
        #[arg(long)]
        components: bool,

        /// Reply file (default: stdin)
        file: Option<PathBuf>,
    },

    /// Render a call expression
    Encode {
        /// Operation name
        name: String,

        /// Positional argument literals
        args: Vec<String>,

        /// Keyword argument as KEY=LITERAL
        #[arg(long = "kw", value_name = "KEY=LITERAL")]
        keywords: Vec<String>,

        /// Override the configured call style
        #[arg(long, value_enum)]
        style: Option<StyleArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Parenthesized,
    Command,
}

impl From<StyleArg> for CallStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Parenthesized => CallStyle::Parenthesized,
            StyleArg::Command => CallStyle::Command,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CodecConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => CodecConfig::default(),
    };

    match cli.command {
        Commands::Decode { components, file } => {
            let reply = read_reply(file)?;
            let output = if components {
                render(classify_components(&reply))?
            } else {
                render(classify_value(&reply))?
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Encode {
            name,
            args,
            keywords,
            style,
        } => {
            let mut call = Call::new(name);
            for arg in &args {
                call = call.raw_arg(canonical_literal(arg)?);
            }
            for keyword in &keywords {
                let Some((key, literal)) = keyword.split_once('=') else {
                    bail!("keyword argument {keyword:?} is not KEY=LITERAL");
                };
                call = call.raw_kwarg(key.trim(), canonical_literal(literal)?);
            }
            let style = style.map(CallStyle::from).unwrap_or(config.call_style);
            println!("{}", call.encode(style));
        }
    }

    Ok(())
}

fn read_reply(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn render<T: serde::Serialize>(
    result: omc_codec::protocol::CallResult<Option<T>>,
) -> anyhow::Result<serde_json::Value> {
    let outcome = outcome_of(&result).map(|o| o.as_str());
    match result {
        Ok(Some(value)) => Ok(json!({ "outcome": outcome, "value": value })),
        Ok(None) => Ok(json!({ "outcome": outcome })),
        Err(CallError::Compiler(message)) => Ok(json!({
            "outcome": Outcome::ReportedError.as_str(),
            "message": message,
        })),
        Err(err) => Err(err.into()),
    }
}

fn canonical_literal(text: &str) -> anyhow::Result<String> {
    match classify_value(text).with_context(|| format!("Invalid literal {text:?}"))? {
        Some(value) => Ok(value.to_literal()),
        None => bail!("empty literal"),
    }
}
