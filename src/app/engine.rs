use crate::adapters::fs::writer::GeneratedDirWriter;
use crate::adapters::universe::TypeUniverse;
use crate::app::config::GeneratorConfig;
use crate::app::dto::{RunSummary, UnitSummary};
use crate::domain::analysis::analyze;
use crate::domain::ports::UnitSink;
use crate::domain::synthesizer::{CodeSynthesizer, OutputUnit};
use anyhow::{Context as _, Result};
use tracing::info;

/// Synthesized units plus the summary describing them
#[derive(Debug)]
pub struct Generation {
    pub units: Vec<OutputUnit>,
    pub summary: RunSummary,
}

/// Runs the full pipeline: universe, analysis, synthesis, output.
pub struct ProxyEngine {
    config: GeneratorConfig,
}

impl ProxyEngine {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate().context("Invalid generator configuration")?;
        Ok(Self { config })
    }

    /// Load the configured universe and run every phase, writing units unless this is a dry run.
    pub fn run(&self) -> Result<RunSummary> {
        let universe = TypeUniverse::from_file(&self.config.universe)?;
        info!(
            universe = %self.config.universe.display(),
            packages = universe.package_count(),
            "loaded universe"
        );

        let generation = self.generate(&universe)?;
        if !self.config.dry_run {
            let mut writer = GeneratedDirWriter::new(&self.config.output_dir);
            self.write(&generation.units, &mut writer)?;
        }
        Ok(generation.summary)
    }

    /// Analyze and synthesize against an already loaded universe. Nothing is written.
    pub fn generate(&self, universe: &TypeUniverse) -> Result<Generation> {
        let input = universe
            .resolve_package(&self.config.input_package)
            .context("Failed to resolve input package")?;
        let root = universe
            .lookup_type(&input, &self.config.type_name)
            .context("Failed to locate root type")?;

        let mut packages = vec![input];
        for extra in &self.config.additional_packages {
            let path = universe
                .resolve_package(extra)
                .with_context(|| format!("Failed to resolve additional package `{extra}`"))?;
            if !packages.contains(&path) {
                packages.push(path);
            }
        }

        let analysis = analyze(universe, &root, packages.clone()).context("Type analysis failed")?;

        let synthesis = self.config.synthesis()?;
        let units = CodeSynthesizer::new(&analysis.catalog, universe, &synthesis)
            .synthesize()
            .context("Code synthesis failed")?;

        let mut wrapped_types = 0;
        analysis.catalog.for_each_type_needing_output(|_| {
            wrapped_types += 1;
            Ok(())
        })?;

        let summary = RunSummary {
            root: root.key(),
            packages,
            discovered_types: analysis.catalog.len(),
            dependency_edges: analysis.catalog.edge_count(),
            status_upgrades: analysis.upgrades,
            wrapped_types,
            output_dir: self.config.output_dir.display().to_string(),
            dry_run: self.config.dry_run,
            units: units
                .iter()
                .map(|unit| UnitSummary {
                    file_name: unit.file_name.clone(),
                    proxy: unit.proxy_name.clone(),
                    variants: unit.variants.clone(),
                })
                .collect(),
        };

        info!(units = units.len(), wrapped = wrapped_types, "synthesis complete");
        Ok(Generation { units, summary })
    }

    /// Hand units to `sink`, preparing it first.
    pub fn write(&self, units: &[OutputUnit], sink: &mut dyn UnitSink) -> Result<()> {
        sink.prepare(units).context("Failed to prepare output")?;
        for unit in units {
            sink.write(unit)
                .with_context(|| format!("Failed to write unit {}", unit.file_name))?;
        }
        info!(units = units.len(), dir = %self.config.output_dir.display(), "wrote units");
        Ok(())
    }
}
