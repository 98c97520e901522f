//! Module assembly.
//!
//! The section order is the one structural constraint of the whole pipeline:
//! flags, enums, and handles precede the records that reference them,
//! function-pointer types precede records and callables, and the dispatch
//! tables precede the loader bootstrap that names them. The order is fixed
//! here rather than recomputed, so the constraint lives in one place.

pub mod glue;
pub mod python;

use crate::dispatch::{DispatchGroup, DispatchScope};
use crate::registry::types::ApiRegistry;

/// Render the complete binding module.
///
/// Deterministic: the same registry and grouping always produce the same
/// text, byte for byte.
pub fn render_module(registry: &ApiRegistry, groups: &[DispatchGroup]) -> String {
    let mut out = String::new();
    out.push_str(glue::IMPORTS);

    section(&mut out, "MACROS");
    out.push_str(glue::RUNTIME_GLUE);

    section(&mut out, "HANDLES");
    for handle in &registry.handles {
        out.push_str(&python::render_handle(handle));
    }

    section(&mut out, "BASETYPES");
    for basetype in &registry.basetypes {
        out.push_str(&python::render_basetype(basetype));
    }

    section(&mut out, "FLAGS");
    for flag in &registry.flags {
        out.push_str(&python::render_flag(flag));
    }

    section(&mut out, "ENUMS");
    for (i, entity) in registry.enums.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&python::render_enum(entity));
    }

    section(&mut out, "FUNC POINTERS");
    for funcpointer in &registry.funcpointers {
        out.push_str(&python::render_funcpointer(funcpointer));
    }

    section(&mut out, "STRUCTURES");
    for (i, record) in registry.records.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&python::render_record(record));
    }

    section(&mut out, "COMMANDS");
    for command in &registry.commands {
        out.push_str(&python::render_command_prototype(command));
    }

    section(&mut out, "FUNCTION TABLES");
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&python::render_dispatch_group(group));
    }
    // The loader bootstrap names all three tables; scopes with no commands
    // still get an empty one.
    for scope in DispatchScope::all() {
        if !groups.iter().any(|group| group.scope == scope) {
            out.push_str(&format!("{} = ()\n", scope.table_name()));
        }
    }

    section(&mut out, "LOADER");
    out.push_str(glue::LOADER_GLUE);

    out
}

fn section(out: &mut String, title: &str) {
    out.push_str(&format!("\n# {}\n\n", title));
}
