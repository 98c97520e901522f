//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use vkbindgen::SpecFormat;

/// vkbindgen - Vulkan registry to Python ctypes binding generator
#[derive(Parser)]
#[command(name = "vkbindgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the binding module from a spec document
    Generate(GenerateArgs),

    /// Parse a spec document and report what it contains
    Inspect(InspectArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Spec document: a path to vk.xml / vulkan.h, or an http(s) URL
    #[arg(short, long)]
    pub input: Option<String>,

    /// Spec format (defaults to a guess from the input name)
    #[arg(short, long)]
    pub format: Option<SpecFormat>,

    /// Output path for the generated module
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail on unresolved type references instead of warning
    #[arg(long)]
    pub strict: bool,

    /// Read options from a TOML config file (CLI flags take precedence)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Spec document: a path to vk.xml / vulkan.h, or an http(s) URL
    #[arg(short, long)]
    pub input: String,

    /// Spec format (defaults to a guess from the input name)
    #[arg(short, long)]
    pub format: Option<SpecFormat>,

    /// Dump the full extracted registry as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
