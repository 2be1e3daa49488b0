use crate::domain::catalog::{kind_and_depth, EntryId, TypeCatalog, TypeKind};
use crate::domain::error::Result;
use crate::domain::ports::TypeQuery;
use crate::domain::types::TypeExpr;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Graph walker - breadth-first discovery over the public method surface.
///
/// Discovery and classification interleave: every dequeued entry is classified before the next
/// one is taken, and classification may queue further types.
pub struct GraphWalker<'a> {
    pub(crate) catalog: &'a mut TypeCatalog,
    pub(crate) query: &'a dyn TypeQuery,
    queue: VecDeque<EntryId>,
    visited: HashSet<String>,
    packages: HashSet<String>,
}

impl<'a> GraphWalker<'a> {
    pub fn new<I, S>(catalog: &'a mut TypeCatalog, query: &'a dyn TypeQuery, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            catalog,
            query,
            queue: VecDeque::new(),
            visited: HashSet::new(),
            packages: packages.into_iter().map(Into::into).collect(),
        }
    }

    /// Seed the walk with the root type. Named non-interface roots are seeded in their
    /// reference form so that both the reference and the value form get discovered.
    pub fn seed(&mut self, root: &TypeExpr) -> Result<()> {
        let seeded = match root {
            TypeExpr::Named(_) => {
                let (kind, depth) = kind_and_depth(root, self.query)?;
                if kind != TypeKind::Interface && depth == 0 {
                    root.clone().pointer_to()
                } else {
                    root.clone()
                }
            }
            _ => root.clone(),
        };
        self.queue_type(&seeded, None)
    }

    /// True when `ty` is, or structurally contains, a named type from an in-scope package.
    pub fn is_in_scope(&self, ty: &TypeExpr) -> bool {
        match ty {
            TypeExpr::Named(named) => self.packages.contains(&named.path),
            other => other.children().into_iter().any(|child| self.is_in_scope(child)),
        }
    }

    pub fn queue_type(&mut self, ty: &TypeExpr, dependent: Option<EntryId>) -> Result<()> {
        if !self.is_in_scope(ty) {
            return Ok(());
        }

        let idx = self.catalog.register(ty, dependent, self.query)?;
        let key = self.catalog.entry(idx).key().to_string();
        if !self.visited.insert(key) {
            return Ok(());
        }

        debug!(ty = %ty, "queued");
        self.queue.push_back(idx);

        // Returning []*T somewhere queues []*T, *T and T.
        for element in self.element_types(ty)? {
            self.queue_type(&element, dependent)?;
        }
        Ok(())
    }

    fn element_types(&self, ty: &TypeExpr) -> Result<Vec<TypeExpr>> {
        match ty {
            TypeExpr::Named(named) => {
                let underlying = self.query.underlying(named)?;
                let (kind, depth) = kind_and_depth(&underlying, self.query)?;
                if kind == TypeKind::Other || depth > 0 {
                    Ok(vec![underlying])
                } else {
                    Ok(Vec::new())
                }
            }
            other => Ok(other.children().into_iter().cloned().collect()),
        }
    }

    /// Pop the queue to exhaustion, classifying each entry once.
    pub fn drain(&mut self) -> Result<()> {
        while let Some(idx) = self.queue.pop_front() {
            self.classify(idx)?;
        }
        Ok(())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
