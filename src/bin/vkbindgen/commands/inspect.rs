//! `vkbindgen inspect` command
//!
//! Parses a spec document and reports what the generator would see,
//! without emitting anything.

use anyhow::Result;

use crate::cli::InspectArgs;
use vkbindgen::dispatch;
use vkbindgen::ops::load_registry;
use vkbindgen::sources::SpecSource;
use vkbindgen::util::GenerateConfig;

pub fn execute(args: InspectArgs) -> Result<()> {
    let mut config = GenerateConfig::new(SpecSource::parse(&args.input)?);
    config.format = args.format;

    let registry = load_registry(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&registry)?);
        return Ok(());
    }

    println!("Spec: {}", config.source);
    println!("  Handles:           {}", registry.handles.len());
    println!("  Base types:        {}", registry.basetypes.len());
    println!("  Flags:             {}", registry.flags.len());
    println!("  Enums:             {}", registry.enums.len());
    println!("  Function pointers: {}", registry.funcpointers.len());
    println!("  Records:           {}", registry.records.len());
    println!("  Commands:          {}", registry.commands.len());

    let groups = dispatch::group_commands(&registry.commands, &registry.handles);
    println!();
    for group in &groups {
        println!("{} ({} commands)", group.scope.table_name(), group.commands.len());
        for command in &group.commands {
            println!("  {}", command.name);
        }
    }

    Ok(())
}
