//! Spec document retrieval.
//!
//! The one blocking operation of a run. The document is fetched eagerly, in
//! full, before any parsing starts; the underlying handle is scoped to the
//! fetch and released whether the run succeeds or fails.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use url::Url;

/// Where the spec document comes from.
#[derive(Debug, Clone)]
pub enum SpecSource {
    /// A local file.
    File(PathBuf),

    /// An HTTP(S) URL.
    Web(Url),
}

impl SpecSource {
    /// Classify an input string as a file path or a URL.
    pub fn parse(input: &str) -> Result<SpecSource> {
        if input.starts_with("http://") || input.starts_with("https://") {
            let url = Url::parse(input).with_context(|| format!("invalid spec URL: {}", input))?;
            Ok(SpecSource::Web(url))
        } else {
            Ok(SpecSource::File(PathBuf::from(input)))
        }
    }

    /// The source name, used for display and format auto-detection.
    pub fn display_name(&self) -> String {
        match self {
            SpecSource::File(path) => path.to_string_lossy().into_owned(),
            SpecSource::Web(url) => url.as_str().to_string(),
        }
    }

    /// Fetch the full spec text.
    pub fn fetch(&self) -> Result<String> {
        match self {
            SpecSource::File(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read spec file: {}", path.display())),
            SpecSource::Web(url) => {
                tracing::info!("fetching spec from {}", url);
                let response = reqwest::blocking::get(url.clone())
                    .with_context(|| format!("failed to fetch spec from {}", url))?
                    .error_for_status()
                    .with_context(|| format!("spec request to {} was rejected", url))?;
                response
                    .text()
                    .with_context(|| format!("failed to read spec body from {}", url))
            }
        }
    }
}

impl std::fmt::Display for SpecSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
