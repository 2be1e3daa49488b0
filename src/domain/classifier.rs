use crate::domain::catalog::{EntryId, TypeKind, WrapStatus};
use crate::domain::error::Result;
use crate::domain::walker::GraphWalker;
use tracing::debug;

impl GraphWalker<'_> {
    /// Classify one dequeued entry: claim its exported methods, detect error results and queue
    /// every other result type as a dependency of this entry.
    pub(crate) fn classify(&mut self, idx: EntryId) -> Result<()> {
        let (ty, key, kind, root) = {
            let entry = self.catalog.entry(idx);
            (
                entry.descriptor.ty.clone(),
                entry.key().to_string(),
                entry.descriptor.kind,
                entry.root,
            )
        };

        let method_set = self.query.method_set(&ty)?;

        let mut must_hard_wrap = false;
        let mut claimed = Vec::new();
        for method in method_set {
            if !method.is_exported() {
                // A hidden method means the original interface cannot be satisfied by a shim.
                must_hard_wrap = true;
                continue;
            }

            // ValFunc on T shows up in both T's and *T's method set; only T sees it directly.
            if self
                .catalog
                .root_mut(root)
                .claim(&method.name, &key, method.is_direct())
            {
                claimed.push(method);
            }
        }

        if claimed.is_empty() {
            debug!(ty = %key, "no exported methods claimed");
            return Ok(());
        }

        let error_status = if kind == TypeKind::Interface && !must_hard_wrap {
            WrapStatus::Soft
        } else {
            WrapStatus::Hard
        };

        for method in &claimed {
            for result in &method.signature.results {
                if result.ty.is_error() {
                    if self.catalog.entry_mut(idx).raise_status(error_status) {
                        debug!(ty = %key, method = %method.name, status = ?error_status, "returns error");
                    }
                } else {
                    self.queue_type(&result.ty, Some(idx))?;
                }
            }
        }

        let entry = self.catalog.entry_mut(idx);
        for method in claimed {
            entry.push_method(method);
        }
        Ok(())
    }
}
