//! Emission-time reference validation.
//!
//! Translation treats every unknown base name as a forward reference; this
//! pass is where those optimistic references are finally checked against the
//! names the module will actually define. Nothing is repaired here: the
//! caller decides whether the findings warn or abort.

use std::collections::HashSet;

use crate::registry::types::{ApiRegistry, EnumKind};
use crate::translate::names;
use crate::translate::{ArrayLen, ForeignType};

/// A type or constant reference that no extracted entity defines.
#[derive(Debug, Clone)]
pub struct UnresolvedReference {
    /// The referenced name.
    pub name: String,

    /// The entity that referenced it.
    pub referrer: String,
}

/// Findings from one validation pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// References to names the module never defines.
    pub unresolved: Vec<UnresolvedReference>,

    /// Names emitted more than once; the first occurrence wins.
    pub duplicates: Vec<String>,
}

/// Check every cross-entity reference in the registry.
pub fn check(registry: &ApiRegistry) -> ValidationReport {
    let mut defined: HashSet<&str> = HashSet::new();
    for handle in &registry.handles {
        defined.insert(&handle.name);
    }
    for basetype in &registry.basetypes {
        defined.insert(&basetype.name);
    }
    for flag in &registry.flags {
        defined.insert(&flag.name);
    }
    for entity in &registry.enums {
        if entity.kind != EnumKind::Constants {
            defined.insert(&entity.name);
        }
    }
    for funcpointer in &registry.funcpointers {
        defined.insert(&funcpointer.name);
    }
    for record in &registry.records {
        defined.insert(&record.name);
    }

    // Symbolic array bounds resolve against emitted constants, which include
    // every enum member.
    let mut constants: HashSet<&str> = HashSet::new();
    for entity in &registry.enums {
        for member in &entity.members {
            constants.insert(&member.name);
        }
    }

    let mut report = ValidationReport::default();

    for basetype in &registry.basetypes {
        walk(
            &basetype.ty,
            &format!("base type `{}`", basetype.name),
            &defined,
            &constants,
            &mut report.unresolved,
        );
    }
    for record in &registry.records {
        for field in &record.fields {
            walk(
                &field.ty,
                &format!("record `{}` field `{}`", record.name, field.name),
                &defined,
                &constants,
                &mut report.unresolved,
            );
        }
    }
    for funcpointer in &registry.funcpointers {
        let referrer = format!("function pointer `{}`", funcpointer.name);
        walk(
            &funcpointer.return_type,
            &referrer,
            &defined,
            &constants,
            &mut report.unresolved,
        );
        for param in &funcpointer.params {
            walk(param, &referrer, &defined, &constants, &mut report.unresolved);
        }
    }
    for command in &registry.commands {
        let referrer = format!("command `{}`", command.name);
        walk(
            &command.return_type,
            &referrer,
            &defined,
            &constants,
            &mut report.unresolved,
        );
        for param in &command.params {
            walk(param, &referrer, &defined, &constants, &mut report.unresolved);
        }
    }

    report.duplicates = find_duplicates(registry);
    report
}

fn walk(
    ty: &ForeignType,
    referrer: &str,
    defined: &HashSet<&str>,
    constants: &HashSet<&str>,
    out: &mut Vec<UnresolvedReference>,
) {
    match ty {
        ForeignType::Named(name) => {
            if !defined.contains(name.as_str()) {
                out.push(UnresolvedReference {
                    name: name.clone(),
                    referrer: referrer.to_string(),
                });
            }
        }
        ForeignType::Pointer(inner) => walk(inner, referrer, defined, constants, out),
        ForeignType::Array(inner, len) => {
            walk(inner, referrer, defined, constants, out);
            if let ArrayLen::Symbol(symbol) = len {
                if !constants.contains(symbol.as_str()) {
                    out.push(UnresolvedReference {
                        name: symbol.clone(),
                        referrer: referrer.to_string(),
                    });
                }
            }
        }
        ForeignType::Void | ForeignType::Scalar(_) => {}
    }
}

/// Collect emission names in output order and report repeats, in order of
/// their second appearance.
fn find_duplicates(registry: &ApiRegistry) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicates = Vec::new();

    let mut record = |name: &str, duplicates: &mut Vec<String>| {
        if !seen.insert(name.to_string()) {
            duplicates.push(name.to_string());
        }
    };

    for handle in &registry.handles {
        record(&handle.name, &mut duplicates);
    }
    for basetype in &registry.basetypes {
        record(&basetype.name, &mut duplicates);
    }
    for flag in &registry.flags {
        record(&flag.name, &mut duplicates);
    }
    for entity in &registry.enums {
        if entity.kind != EnumKind::Constants {
            record(&entity.name, &mut duplicates);
        }
        for member in &entity.members {
            record(&member.name, &mut duplicates);
        }
    }
    for funcpointer in &registry.funcpointers {
        record(&funcpointer.name, &mut duplicates);
    }
    for r in &registry.records {
        record(&r.name, &mut duplicates);
    }
    for command in &registry.commands {
        record(names::strip_api_prefix(&command.name), &mut duplicates);
    }

    duplicates
}
