//! User-facing diagnostics.
//!
//! Most failures flow through `anyhow` with context; the errors here carry
//! enough structure to explain themselves and suggest a way out.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

/// Strict-mode failure: the spec references types or constants it never
/// defines.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("unresolved type references: {}", .references.join(", "))]
#[diagnostic(
    code(vkbindgen::validate::unresolved_reference),
    help("every type a field, parameter, or array bound names must be defined in the spec; drop --strict to emit the module with the references passed through")
)]
pub struct UnresolvedTypeError {
    /// One `name (referenced by ...)` entry per finding.
    pub references: Vec<String>,
}

/// The front end matched nothing at all in the fetched document.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("no entities extracted from `{spec_source}`")]
#[diagnostic(
    code(vkbindgen::parse::empty_spec),
    help("check that the input is a Vulkan registry XML or a vulkan.h-style header and that --format matches the document")
)]
pub struct EmptySpecError {
    /// The spec source that produced nothing.
    pub spec_source: String,
}
