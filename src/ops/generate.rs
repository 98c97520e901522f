//! The generation pipeline: fetch, parse, validate, group, emit.
//!
//! One synchronous, single-threaded pass. The same spec always yields the
//! same output text; nothing persists between runs.

use anyhow::Result;

use crate::dispatch::{self, DispatchGroup};
use crate::emit;
use crate::registry::types::ApiRegistry;
use crate::registry::{validate, xml, HeaderParser};
use crate::util::config::{GenerateConfig, SpecFormat};
use crate::util::diagnostic::{EmptySpecError, UnresolvedTypeError};

/// Result of a generation run.
#[derive(Debug)]
pub struct GenerateOutcome {
    /// The rendered binding module.
    pub module_text: String,

    /// The extracted registry, for reporting.
    pub registry: ApiRegistry,

    /// The dispatch grouping, for reporting.
    pub groups: Vec<DispatchGroup>,

    /// How many unresolved references were passed through.
    pub unresolved: usize,
}

/// Fetch and parse the spec into a registry.
pub fn load_registry(config: &GenerateConfig) -> Result<ApiRegistry> {
    let text = config.source.fetch()?;

    let format = config.resolved_format();
    tracing::debug!("parsing spec `{}` as {}", config.source, format);
    let registry = match format {
        SpecFormat::Xml => xml::parse(&text)?,
        SpecFormat::Header => HeaderParser::new().parse(&text)?,
    };

    if registry.is_empty() {
        return Err(EmptySpecError {
            spec_source: config.source.display_name(),
        }
        .into());
    }

    Ok(registry)
}

/// Run the full pipeline and return the rendered module.
pub fn generate(config: &GenerateConfig) -> Result<GenerateOutcome> {
    let registry = load_registry(config)?;

    let report = validate::check(&registry);
    for name in &report.duplicates {
        tracing::warn!("duplicate name `{}` in output; first occurrence wins", name);
    }
    if !report.unresolved.is_empty() {
        if config.strict {
            return Err(UnresolvedTypeError {
                references: report
                    .unresolved
                    .iter()
                    .map(|r| format!("`{}` (referenced by {})", r.name, r.referrer))
                    .collect(),
            }
            .into());
        }
        for reference in &report.unresolved {
            tracing::warn!(
                "unresolved type reference `{}` in {}; passing it through",
                reference.name,
                reference.referrer
            );
        }
    }

    let groups = dispatch::group_commands(&registry.commands, &registry.handles);
    let module_text = emit::render_module(&registry, &groups);

    Ok(GenerateOutcome {
        module_text,
        unresolved: report.unresolved.len(),
        registry,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SpecSource;
    use std::io::Write;

    const SPEC: &str = r#"
<registry>
    <types>
        <type category="handle"><type>VK_DEFINE_HANDLE</type>(<name>VkInstance</name>)</type>
        <type category="handle"><type>VK_DEFINE_HANDLE</type>(<name>VkDevice</name>)</type>
        <type category="struct" name="VkApplicationInfo">
            <member>const <type>char</type>* <name>pApplicationName</name></member>
        </type>
    </types>
    <enums name="VkResult" type="enum">
        <enum value="0" name="VK_SUCCESS"/>
        <enum value="1" name="VK_NOT_READY"/>
    </enums>
    <commands>
        <command>
            <proto><type>VkResult</type> <name>vkCreateInstance</name></proto>
            <param><type>VkInstance</type>* <name>pInstance</name></param>
        </command>
        <command>
            <proto><type>void</type> <name>vkDestroyDevice</name></proto>
            <param><type>VkDevice</type> <name>device</name></param>
        </command>
    </commands>
</registry>
"#;

    fn config_for(spec: &str) -> (tempfile::NamedTempFile, GenerateConfig) {
        let mut file = tempfile::Builder::new()
            .suffix(".xml")
            .tempfile()
            .unwrap();
        file.write_all(spec.as_bytes()).unwrap();
        let config = GenerateConfig::new(
            SpecSource::parse(&file.path().to_string_lossy()).unwrap(),
        );
        (file, config)
    }

    #[test]
    fn test_generate_is_idempotent() {
        let (_file, config) = config_for(SPEC);

        let first = generate(&config).unwrap();
        let second = generate(&config).unwrap();
        assert_eq!(first.module_text, second.module_text);
    }

    #[test]
    fn test_generate_renders_all_sections() {
        let (_file, config) = config_for(SPEC);
        let outcome = generate(&config).unwrap();

        assert!(outcome.module_text.contains("Instance = c_void_p"));
        assert!(outcome.module_text.contains("Result = c_int32"));
        assert!(outcome
            .module_text
            .contains("('application_name', c_char_p)"));
        assert!(outcome
            .module_text
            .contains("(b'vkDestroyDevice', DestroyDevice)"));
    }

    #[test]
    fn test_strict_mode_rejects_unresolved_references() {
        let spec = r#"
<registry>
    <types>
        <type category="struct" name="VkThing">
            <member><type>VkMissing</type> <name>missing</name></member>
        </type>
    </types>
</registry>
"#;
        let (_file, config) = config_for(spec);

        // Permissive by default: the reference passes through.
        let outcome = generate(&config).unwrap();
        assert_eq!(outcome.unresolved, 1);
        assert!(outcome.module_text.contains("('missing', Missing)"));

        // Strict mode turns it into a failure naming the offender.
        let strict = config.clone().with_strict(true);
        let err = generate(&strict).unwrap_err();
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn test_empty_spec_is_an_error() {
        let (_file, config) = config_for("<registry></registry>");
        assert!(generate(&config).is_err());
    }
}
