use crate::domain::error::ProxyError;
use crate::domain::synthesizer::SynthesisConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TRANSFORMER_PACKAGE: &str = "github.com/CannibalVox/errproxy";
pub const DEFAULT_TRANSFORMER_TYPE: &str = "ErrorTransformer";

/// Everything one generator run needs, validated before discovery starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// JSON universe description
    pub universe: PathBuf,
    /// Import path or package name holding the root type
    pub input_package: String,
    pub type_name: String,
    /// Further packages whose types are wrapped when reachable from the root
    #[serde(default)]
    pub additional_packages: Vec<String>,
    pub output_dir: PathBuf,
    /// Package clause of the generated files; defaults to the output directory's name.
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default = "default_transformer_package")]
    pub transformer_package: String,
    #[serde(default = "default_transformer_type")]
    pub transformer_type: String,
    #[serde(default)]
    pub dry_run: bool,
}

fn default_transformer_package() -> String {
    DEFAULT_TRANSFORMER_PACKAGE.to_string()
}

fn default_transformer_type() -> String {
    DEFAULT_TRANSFORMER_TYPE.to_string()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

impl GeneratorConfig {
    pub fn new(
        universe: impl Into<PathBuf>,
        input_package: impl Into<String>,
        type_name: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            universe: universe.into(),
            input_package: input_package.into(),
            type_name: type_name.into(),
            additional_packages: Vec::new(),
            output_dir: output_dir.into(),
            package: None,
            transformer_package: default_transformer_package(),
            transformer_type: default_transformer_type(),
            dry_run: false,
        }
    }

    /// Split a comma separated package list, dropping empty items.
    pub fn parse_package_list(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|pkg| !pkg.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ProxyError> {
        if self.input_package.trim().is_empty() {
            return Err(ProxyError::Config("input package is required".to_string()));
        }
        if self.type_name.trim().is_empty() {
            return Err(ProxyError::Config("type name is required".to_string()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ProxyError::Config("output directory is required".to_string()));
        }
        if !is_identifier(&self.transformer_type) {
            return Err(ProxyError::Config(format!(
                "transformer type `{}` is not an identifier",
                self.transformer_type
            )));
        }
        let package = self.package_name()?;
        if !is_identifier(&package) {
            return Err(ProxyError::Config(format!(
                "package name `{package}` is not an identifier; pass one explicitly"
            )));
        }
        Ok(())
    }

    /// Explicit package name, or the last component of the output directory.
    pub fn package_name(&self) -> Result<String, ProxyError> {
        if let Some(package) = self.package.as_deref().filter(|p| !p.is_empty()) {
            return Ok(package.to_string());
        }
        last_component(&self.output_dir).ok_or_else(|| {
            ProxyError::Config(format!(
                "cannot derive a package name from {}",
                self.output_dir.display()
            ))
        })
    }

    pub fn synthesis(&self) -> Result<SynthesisConfig, ProxyError> {
        Ok(SynthesisConfig {
            package: self.package_name()?,
            transformer_path: self.transformer_package.clone(),
            transformer_type: self.transformer_type.clone(),
        })
    }
}

fn last_component(dir: &Path) -> Option<String> {
    let absolute = std::path::absolute(dir).ok()?;
    absolute
        .file_name()
        .and_then(|name| name.to_str())
        .map(String::from)
}
