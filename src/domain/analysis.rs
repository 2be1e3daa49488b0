use crate::domain::catalog::TypeCatalog;
use crate::domain::error::Result;
use crate::domain::ports::TypeQuery;
use crate::domain::propagation::StatusPropagator;
use crate::domain::types::TypeExpr;
use crate::domain::walker::GraphWalker;
use tracing::info;

/// Resolved catalog plus walk statistics.
#[derive(Debug)]
pub struct Analysis {
    pub catalog: TypeCatalog,
    pub visited: usize,
    pub upgrades: usize,
}

/// Discover, classify and propagate starting from `root`.
///
/// `packages` are the import paths whose named types may be wrapped; the root's own package is
/// always in scope.
pub fn analyze<I, S>(query: &dyn TypeQuery, root: &TypeExpr, packages: I) -> Result<Analysis>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut scope: Vec<String> = packages.into_iter().map(Into::into).collect();
    if let Some(named) = root.root().as_named() {
        if !scope.contains(&named.path) {
            scope.push(named.path.clone());
        }
    }

    let mut catalog = TypeCatalog::new();
    let visited = {
        let mut walker = GraphWalker::new(&mut catalog, query, scope);
        walker.seed(root)?;
        walker.drain()?;
        walker.visited_count()
    };

    let upgrades = StatusPropagator::new().resolve(&mut catalog);
    info!(
        root = %root,
        types = catalog.len(),
        dependencies = catalog.edge_count(),
        upgrades,
        "analysis complete"
    );

    Ok(Analysis {
        catalog,
        visited,
        upgrades,
    })
}
