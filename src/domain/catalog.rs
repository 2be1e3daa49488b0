//! Type Catalog - discovered types, their root groupings and dependency edges.
//!
//! Entries are graph nodes; an edge `source -> dependent` records that a method signature of
//! `dependent` mentions `source`. Status upgrades flow along those edges.

use crate::domain::error::Result;
use crate::domain::ports::TypeQuery;
use crate::domain::types::{MethodSelection, TypeExpr};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap};

/// Handle to a catalog entry
pub type EntryId = NodeIndex;

/// Index of a root group inside the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootId(usize);

/// Type kind, decided once at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Struct,
    Interface,
    Other,
}

/// Escalating requirement for a generated proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WrapStatus {
    /// Do not wrap this type
    #[default]
    None,
    /// Interface whose contract can be met by a thin forwarding implementation
    Soft,
    /// An entirely new type has to be written
    Hard,
}

/// Identity of a discovered type
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub key: String,
    pub kind: TypeKind,
    /// Number of reference layers over the root type
    pub depth: usize,
    pub ty: TypeExpr,
}

impl TypeDescriptor {
    pub fn describe(ty: &TypeExpr, query: &dyn TypeQuery) -> Result<Self> {
        let (kind, depth) = kind_and_depth(ty, query)?;
        Ok(Self {
            key: ty.key(),
            kind,
            depth,
            ty: ty.clone(),
        })
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TypeDescriptor {}

/// Resolve a type's kind and reference depth, looking through named types.
pub fn kind_and_depth(ty: &TypeExpr, query: &dyn TypeQuery) -> Result<(TypeKind, usize)> {
    match ty {
        TypeExpr::Named(named) => kind_and_depth(&query.underlying(named)?, query),
        TypeExpr::Interface => Ok((TypeKind::Interface, 0)),
        TypeExpr::Struct => Ok((TypeKind::Struct, 0)),
        TypeExpr::Pointer(elem) => {
            let (kind, depth) = kind_and_depth(elem, query)?;
            Ok((kind, depth + 1))
        }
        _ => Ok((TypeKind::Other, 0)),
    }
}

/// Ownership record for a method name within a root group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodClaim {
    pub owner: String,
    pub direct: bool,
}

/// All indirection variants of one root type
#[derive(Debug, Clone)]
pub struct RootGroup {
    pub id: RootId,
    pub descriptor: TypeDescriptor,
    claims: BTreeMap<String, MethodClaim>,
    members: Vec<EntryId>,
}

impl RootGroup {
    /// Try to claim `method` for `owner`.
    ///
    /// Unclaimed methods always go to the caller. A claimed method is only taken over when the
    /// existing claim came from a promoted view and this observation has a direct receiver.
    pub fn claim(&mut self, method: &str, owner: &str, direct: bool) -> bool {
        let take = match self.claims.get(method) {
            None => true,
            Some(existing) => !existing.direct && direct,
        };
        if take {
            self.claims.insert(
                method.to_string(),
                MethodClaim {
                    owner: owner.to_string(),
                    direct,
                },
            );
        }
        take
    }

    pub fn claim_for(&self, method: &str) -> Option<&MethodClaim> {
        self.claims.get(method)
    }

    /// True when `owner` still holds the claim on `method`.
    pub fn can_use_method(&self, owner: &str, method: &str) -> bool {
        self.claim_for(method)
            .is_some_and(|claim| claim.owner == owner)
    }

    pub fn members(&self) -> &[EntryId] {
        &self.members
    }
}

/// A discovered type plus its classification state
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub descriptor: TypeDescriptor,
    pub root: RootId,
    status: WrapStatus,
    methods: Vec<MethodSelection>,
}

impl CatalogEntry {
    pub fn key(&self) -> &str {
        &self.descriptor.key
    }

    pub fn status(&self) -> WrapStatus {
        self.status
    }

    /// Raise the status to `status`; never lowers it. Returns true when it changed.
    pub fn raise_status(&mut self, status: WrapStatus) -> bool {
        if status > self.status {
            self.status = status;
            true
        } else {
            false
        }
    }

    pub fn needs_output(&self) -> bool {
        self.status > WrapStatus::None
    }

    /// Methods claimed for forwarding, in claim order.
    pub fn methods(&self) -> &[MethodSelection] {
        &self.methods
    }

    pub(crate) fn push_method(&mut self, method: MethodSelection) {
        self.methods.push(method);
    }
}

/// Type Catalog - the single registry threaded through every phase
#[derive(Debug, Default)]
pub struct TypeCatalog {
    graph: DiGraph<CatalogEntry, ()>,
    key_to_node: HashMap<String, EntryId>,
    roots: Vec<RootGroup>,
    root_by_key: HashMap<String, RootId>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `ty`, idempotent by key. Records `ty -> dependent` on every call.
    pub fn register(
        &mut self,
        ty: &TypeExpr,
        dependent: Option<EntryId>,
        query: &dyn TypeQuery,
    ) -> Result<EntryId> {
        let key = ty.key();
        let idx = match self.key_to_node.get(&key) {
            Some(&idx) => idx,
            None => {
                let descriptor = TypeDescriptor::describe(ty, query)?;
                let root = self.root_for(ty, query)?;
                let idx = self.graph.add_node(CatalogEntry {
                    descriptor,
                    root,
                    status: WrapStatus::None,
                    methods: Vec::new(),
                });
                self.roots[root.0].members.push(idx);
                self.key_to_node.insert(key, idx);
                idx
            }
        };

        if let Some(dependent) = dependent {
            self.graph.update_edge(idx, dependent, ());
        }

        Ok(idx)
    }

    fn root_for(&mut self, ty: &TypeExpr, query: &dyn TypeQuery) -> Result<RootId> {
        let root_ty = ty.root();
        let root_key = root_ty.key();
        if let Some(&id) = self.root_by_key.get(&root_key) {
            return Ok(id);
        }

        let id = RootId(self.roots.len());
        self.roots.push(RootGroup {
            id,
            descriptor: TypeDescriptor::describe(root_ty, query)?,
            claims: BTreeMap::new(),
            members: Vec::new(),
        });
        self.root_by_key.insert(root_key, id);
        Ok(id)
    }

    pub fn lookup(&self, ty: &TypeExpr) -> Option<&CatalogEntry> {
        self.id_of(&ty.key()).map(|idx| &self.graph[idx])
    }

    pub fn id_of(&self, key: &str) -> Option<EntryId> {
        self.key_to_node.get(key).copied()
    }

    pub fn entry(&self, idx: EntryId) -> &CatalogEntry {
        &self.graph[idx]
    }

    pub fn entry_mut(&mut self, idx: EntryId) -> &mut CatalogEntry {
        &mut self.graph[idx]
    }

    pub fn root(&self, id: RootId) -> &RootGroup {
        &self.roots[id.0]
    }

    pub fn root_mut(&mut self, id: RootId) -> &mut RootGroup {
        &mut self.roots[id.0]
    }

    /// Entries whose signatures mention `source`.
    pub fn dependents(&self, source: EntryId) -> impl Iterator<Item = EntryId> + '_ {
        self.graph.neighbors_directed(source, Direction::Outgoing)
    }

    /// Every entry id, lexical by key.
    pub fn entry_ids(&self) -> Vec<EntryId> {
        let mut ids: Vec<EntryId> = self.graph.node_indices().collect();
        ids.sort_by(|a, b| self.graph[*a].key().cmp(self.graph[*b].key()));
        ids
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Visit each root group with at least one member needing output, once, lexical by root key.
    pub fn for_each_root_needing_output<F>(&self, mut visitor: F) -> Result<()>
    where
        F: FnMut(&RootGroup) -> Result<()>,
    {
        let mut roots: Vec<&RootGroup> = self
            .roots
            .iter()
            .filter(|root| {
                root.members
                    .iter()
                    .any(|&idx| self.graph[idx].needs_output())
            })
            .collect();
        roots.sort_by(|a, b| a.descriptor.key.cmp(&b.descriptor.key));

        for root in roots {
            visitor(root)?;
        }
        Ok(())
    }

    /// Visit every entry needing output, lexical by key.
    pub fn for_each_type_needing_output<F>(&self, mut visitor: F) -> Result<()>
    where
        F: FnMut(&CatalogEntry) -> Result<()>,
    {
        for idx in self.entry_ids() {
            let entry = &self.graph[idx];
            if entry.needs_output() {
                visitor(entry)?;
            }
        }
        Ok(())
    }

    /// Members of `root` needing output, lexical by key.
    pub fn members_needing_output(&self, root: &RootGroup) -> Vec<&CatalogEntry> {
        let mut members: Vec<&CatalogEntry> = root
            .members()
            .iter()
            .map(|&idx| &self.graph[idx])
            .filter(|entry| entry.needs_output())
            .collect();
        members.sort_by(|a, b| a.key().cmp(b.key()));
        members
    }
}
