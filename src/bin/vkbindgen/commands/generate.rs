//! `vkbindgen generate` command

use std::fs;

use anyhow::{bail, Context, Result};

use crate::cli::GenerateArgs;
use vkbindgen::ops::generate;
use vkbindgen::sources::SpecSource;
use vkbindgen::util::GenerateConfig;

pub fn execute(args: GenerateArgs) -> Result<()> {
    let config = build_config(args)?;

    let outcome = generate(&config)?;

    fs::write(&config.output, &outcome.module_text).with_context(|| {
        format!(
            "failed to write generated module to {}",
            config.output.display()
        )
    })?;

    println!("Generated {}", config.output.display());
    println!("  Handles:           {}", outcome.registry.handles.len());
    println!("  Base types:        {}", outcome.registry.basetypes.len());
    println!("  Flags:             {}", outcome.registry.flags.len());
    println!("  Enums:             {}", outcome.registry.enums.len());
    println!("  Function pointers: {}", outcome.registry.funcpointers.len());
    println!("  Records:           {}", outcome.registry.records.len());
    println!("  Commands:          {}", outcome.registry.commands.len());
    for group in &outcome.groups {
        println!(
            "  {:18}{} commands",
            format!("{} group:", group.scope),
            group.commands.len()
        );
    }
    if outcome.unresolved > 0 {
        println!(
            "  {} unresolved type references passed through (see warnings above)",
            outcome.unresolved
        );
    }

    Ok(())
}

/// Assemble the run configuration: config file first, CLI flags on top.
fn build_config(args: GenerateArgs) -> Result<GenerateConfig> {
    let mut config = match &args.config {
        Some(path) => GenerateConfig::from_toml_file(path)?,
        None => {
            let Some(input) = &args.input else {
                bail!("either --input or --config is required");
            };
            GenerateConfig::new(SpecSource::parse(input)?)
        }
    };

    if args.config.is_some() {
        if let Some(input) = &args.input {
            config.source = SpecSource::parse(input)?;
        }
    }
    if let Some(format) = args.format {
        config.format = Some(format);
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if args.strict {
        config.strict = true;
    }

    Ok(config)
}
