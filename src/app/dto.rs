use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSummary {
    pub file_name: String,
    pub proxy: String,
    /// Keys of the wrapped variants the unit carries constructors for
    pub variants: Vec<String>,
}

/// Outcome of one generator run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub root: String,
    pub packages: Vec<String>,
    pub discovered_types: usize,
    pub dependency_edges: usize,
    pub status_upgrades: usize,
    pub wrapped_types: usize,
    pub output_dir: String,
    pub dry_run: bool,
    pub units: Vec<UnitSummary>,
}

impl RunSummary {
    /// Human-readable report, one line per unit.
    pub fn render_text(&self) -> String {
        let mut lines = vec![
            format!("Root type: {}", self.root),
            format!(
                "Discovered {} types ({} dependency edges), {} wrapped",
                self.discovered_types, self.dependency_edges, self.wrapped_types
            ),
        ];
        let verb = if self.dry_run { "Would write" } else { "Wrote" };
        lines.push(format!("{verb} {} units to {}", self.units.len(), self.output_dir));
        for unit in &self.units {
            lines.push(format!(
                "  {} ({}: {})",
                unit.file_name,
                unit.proxy,
                unit.variants.join(", ")
            ));
        }
        lines.join("\n")
    }
}
