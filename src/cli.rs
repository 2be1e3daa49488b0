use crate::app::config::{DEFAULT_TRANSFORMER_PACKAGE, DEFAULT_TRANSFORMER_TYPE, GeneratorConfig};
use crate::app::engine::ProxyEngine;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Generate error-transforming proxies for a type and everything reachable from it.
#[derive(Parser, Debug, Clone)]
#[command(name = "errproxy", version, about)]
pub struct Cli {
    /// JSON description of the packages and types to analyze
    #[arg(long)]
    pub universe: PathBuf,

    /// Package (import path or name) to read the root type from
    #[arg(long)]
    pub input: String,

    /// Root type to wrap
    #[arg(long = "type")]
    pub type_name: String,

    /// Comma separated packages whose types are also wrapped when reachable from the root
    #[arg(long = "additional-pkgs", default_value = "")]
    pub additional_pkgs: String,

    /// Directory to write generated files to
    #[arg(long)]
    pub output: PathBuf,

    /// Package name for generated code; defaults to the output directory's name
    #[arg(long)]
    pub pkg: Option<String>,

    /// Import path of the error transformer type
    #[arg(long = "transformer-pkg", default_value = DEFAULT_TRANSFORMER_PACKAGE)]
    pub transformer_pkg: String,

    /// Name of the error transformer type
    #[arg(long = "transformer-type", default_value = DEFAULT_TRANSFORMER_TYPE)]
    pub transformer_type: String,

    /// Analyze and synthesize without touching the output directory
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn to_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            additional_packages: GeneratorConfig::parse_package_list(&self.additional_pkgs),
            package: self.pkg.clone(),
            transformer_package: self.transformer_pkg.clone(),
            transformer_type: self.transformer_type.clone(),
            dry_run: self.dry_run,
            ..GeneratorConfig::new(
                self.universe.clone(),
                self.input.clone(),
                self.type_name.clone(),
                self.output.clone(),
            )
        }
    }
}

pub fn run(cli: &Cli) -> Result<()> {
    let engine = ProxyEngine::new(cli.to_config())?;
    let summary = engine.run()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.render_text());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_flags_into_config() {
        let cli = Cli::try_parse_from([
            "errproxy",
            "--universe",
            "u.json",
            "--input",
            "shop",
            "--type",
            "Repo",
            "--additional-pkgs",
            "billing,,example.com/audit",
            "--output",
            "gen/proxies",
            "--dry-run",
        ])
        .unwrap();
        let config = cli.to_config();
        assert_eq!(config.type_name, "Repo");
        assert_eq!(config.additional_packages, vec!["billing", "example.com/audit"]);
        assert_eq!(config.transformer_package, DEFAULT_TRANSFORMER_PACKAGE);
        assert!(config.dry_run);
        assert_eq!(config.package_name().unwrap(), "proxies");
    }

    #[test]
    fn test_required_flags_are_enforced() {
        assert!(Cli::try_parse_from(["errproxy", "--input", "shop"]).is_err());
    }
}
