use crate::domain::catalog::{EntryId, TypeCatalog, TypeKind, WrapStatus};
use tracing::debug;

/// Status Propagator - floods wrap status backward along dependency edges.
///
/// If a `None` type depends on a `Hard` type it becomes `Hard`. The one exception: a
/// non-interface that depends on a `Soft` type becomes `Hard`, since only interfaces can be
/// satisfied by a forwarding implementation of the original contract.
pub struct StatusPropagator;

impl Default for StatusPropagator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusPropagator {
    pub fn new() -> Self {
        Self
    }

    /// Run to fixpoint. Returns the number of upgrades performed.
    pub fn resolve(&self, catalog: &mut TypeCatalog) -> usize {
        let mut upgrades = 0;
        for start in catalog.entry_ids() {
            upgrades += self.walk_dependents(catalog, start);
        }
        debug!(upgrades, "status propagation finished");
        upgrades
    }

    fn walk_dependents(&self, catalog: &mut TypeCatalog, start: EntryId) -> usize {
        let mut upgrades = 0;
        let mut stack = vec![start];

        while let Some(source) = stack.pop() {
            let status = catalog.entry(source).status();
            if status == WrapStatus::None {
                continue;
            }

            let dependents: Vec<EntryId> = catalog.dependents(source).collect();
            for dependent in dependents {
                let entry = catalog.entry_mut(dependent);
                // Already at or above: skip. This is also what stops cycles.
                if entry.status() >= status {
                    continue;
                }

                let target = if status == WrapStatus::Soft
                    && entry.descriptor.kind != TypeKind::Interface
                {
                    WrapStatus::Hard
                } else {
                    status
                };
                entry.raise_status(target);
                upgrades += 1;
                debug!(ty = %entry.key(), status = ?target, "upgraded");
                stack.push(dependent);
            }
        }

        upgrades
    }
}
