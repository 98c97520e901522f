//! Generation configuration.
//!
//! A [`GenerateConfig`] is built once per run — from CLI flags or a TOML
//! file — and passed explicitly into the pipeline. There is no process-wide
//! settings state.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::sources::SpecSource;

/// Which front end reads the spec document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecFormat {
    /// The structured registry XML (preferred).
    Xml,

    /// A vulkan.h-style C header.
    Header,
}

impl fmt::Display for SpecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecFormat::Xml => write!(f, "xml"),
            SpecFormat::Header => write!(f, "header"),
        }
    }
}

impl FromStr for SpecFormat {
    type Err = SpecFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xml" => Ok(SpecFormat::Xml),
            "header" | "h" => Ok(SpecFormat::Header),
            _ => Err(SpecFormatParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid spec format string.
#[derive(Debug, Clone)]
pub struct SpecFormatParseError(pub String);

impl fmt::Display for SpecFormatParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid spec format '{}', valid values: xml, header", self.0)
    }
}

impl std::error::Error for SpecFormatParseError {}

/// Configuration for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Where the spec document comes from.
    pub source: SpecSource,

    /// Front-end override; `None` auto-detects from the source name.
    pub format: Option<SpecFormat>,

    /// Output path for the generated module.
    pub output: PathBuf,

    /// Fail the run on unresolved type references instead of warning.
    pub strict: bool,
}

impl GenerateConfig {
    /// Create a configuration with the default output path.
    pub fn new(source: SpecSource) -> Self {
        GenerateConfig {
            source,
            format: None,
            output: PathBuf::from("vk.py"),
            strict: false,
        }
    }

    /// Set the spec format explicitly.
    pub fn with_format(mut self, format: SpecFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Set strict validation.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The format to parse with: the explicit choice, or a guess from the
    /// source name (`.h`/`.hpp` means header, anything else means XML).
    pub fn resolved_format(&self) -> SpecFormat {
        if let Some(format) = self.format {
            return format;
        }
        let name = self.source.display_name();
        if name.ends_with(".h") || name.ends_with(".hpp") {
            SpecFormat::Header
        } else {
            SpecFormat::Xml
        }
    }

    /// Load a configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<GenerateConfig> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&text)
            .with_context(|| format!("invalid config file: {}", path.display()))?;

        let source = SpecSource::parse(&file.input)?;
        let mut config = GenerateConfig::new(source);
        config.format = file.format;
        if let Some(output) = file.output {
            config.output = output;
        }
        if let Some(strict) = file.strict {
            config.strict = strict;
        }
        Ok(config)
    }
}

/// On-disk configuration schema.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    /// Spec path or URL.
    input: String,

    /// Optional front-end override.
    format: Option<SpecFormat>,

    /// Optional output path.
    output: Option<PathBuf>,

    /// Optional strict validation.
    strict: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("xml".parse::<SpecFormat>().unwrap(), SpecFormat::Xml);
        assert_eq!("header".parse::<SpecFormat>().unwrap(), SpecFormat::Header);
        assert!("yaml".parse::<SpecFormat>().is_err());
    }

    #[test]
    fn test_resolved_format_auto_detects() {
        let config = GenerateConfig::new(SpecSource::parse("vk.xml").unwrap());
        assert_eq!(config.resolved_format(), SpecFormat::Xml);

        let config = GenerateConfig::new(SpecSource::parse("vulkan.h").unwrap());
        assert_eq!(config.resolved_format(), SpecFormat::Header);

        let config = GenerateConfig::new(SpecSource::parse("vulkan.h").unwrap())
            .with_format(SpecFormat::Xml);
        assert_eq!(config.resolved_format(), SpecFormat::Xml);
    }

    #[test]
    fn test_config_builder() {
        let config = GenerateConfig::new(SpecSource::parse("vk.xml").unwrap())
            .with_output("bindings.py")
            .with_strict(true);

        assert_eq!(config.output, PathBuf::from("bindings.py"));
        assert!(config.strict);
    }

    #[test]
    fn test_config_file_parsing() {
        let parsed: ConfigFile = toml::from_str(
            r#"
            input = "vk.xml"
            format = "xml"
            output = "out/vk.py"
            strict = true
            "#,
        )
        .unwrap();

        assert_eq!(parsed.input, "vk.xml");
        assert_eq!(parsed.format, Some(SpecFormat::Xml));
        assert!(parsed.strict.unwrap());
    }

    #[test]
    fn test_config_file_rejects_unknown_fields() {
        let result: Result<ConfigFile, _> = toml::from_str(
            r#"
            input = "vk.xml"
            unknown_option = true
            "#,
        );
        assert!(result.is_err());
    }
}
