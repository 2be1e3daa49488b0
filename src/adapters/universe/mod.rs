//! JSON-described type universe answering the analysis' type-system queries.

pub mod method_set;
pub mod model;
pub mod parser;

use crate::adapters::universe::model::{KindSpec, MethodSpec, ParamSpec, UniverseFile};
use crate::adapters::universe::parser::parse_type;
use crate::domain::error::{ProxyError, Result};
use crate::domain::ports::TypeQuery;
use crate::domain::types::{MethodSelection, NamedType, Param, Signature, TypeExpr};
use anyhow::Context;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// A method as declared on its type
#[derive(Debug, Clone)]
pub(crate) struct MethodDecl {
    pub name: String,
    pub pointer_receiver: bool,
    pub receiver_name: Option<String>,
    pub signature: Signature,
}

#[derive(Debug, Clone)]
pub(crate) struct TypeInfo {
    pub kind: KindSpec,
    /// Structural underlying type; may itself be named for `other` kinds.
    pub underlying: TypeExpr,
    pub embeds: Vec<TypeExpr>,
    pub methods: Vec<MethodDecl>,
}

#[derive(Debug, Clone)]
struct PackageInfo {
    name: String,
    types: HashMap<String, TypeInfo>,
}

/// Type universe adapter
#[derive(Debug, Clone, Default)]
pub struct TypeUniverse {
    packages: BTreeMap<String, PackageInfo>,
}

impl TypeUniverse {
    /// Load a universe description from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        use memmap2::Mmap;
        use std::fs::File;

        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open universe file: {}", path.display()))?;
        let mmap = unsafe { Mmap::map(&file).context("Failed to mmap universe file")? };
        let spec: UniverseFile =
            serde_json::from_slice(&mmap[..]).context("Failed to parse universe JSON")?;
        let universe = Self::from_spec(spec)
            .with_context(|| format!("Invalid universe file: {}", path.display()))?;
        Ok(universe)
    }

    /// Build the universe, parsing every type string up front.
    pub fn from_spec(spec: UniverseFile) -> Result<Self> {
        let mut packages = BTreeMap::new();

        for package in spec.packages {
            if packages.contains_key(&package.path) {
                return Err(ProxyError::InvalidUniverse(format!(
                    "package `{}` declared twice",
                    package.path
                )));
            }

            let local = package.path.as_str();
            let mut types = HashMap::new();
            for ty in &package.types {
                let underlying = match ty.kind {
                    KindSpec::Struct => TypeExpr::Struct,
                    KindSpec::Interface => TypeExpr::Interface,
                    KindSpec::Other => {
                        let text = ty.underlying.as_deref().ok_or_else(|| {
                            ProxyError::InvalidUniverse(format!(
                                "type `{local}.{}` of kind other has no underlying type",
                                ty.name
                            ))
                        })?;
                        parse_type(text, Some(local))?
                    }
                };

                let embeds = ty
                    .embeds
                    .iter()
                    .map(|embed| parse_type(embed, Some(local)))
                    .collect::<Result<Vec<_>>>()?;

                let methods = ty
                    .methods
                    .iter()
                    .map(|method| method_decl(method, local, ty.kind))
                    .collect::<Result<Vec<_>>>()?;

                let info = TypeInfo {
                    kind: ty.kind,
                    underlying,
                    embeds,
                    methods,
                };
                if types.insert(ty.name.clone(), info).is_some() {
                    return Err(ProxyError::InvalidUniverse(format!(
                        "type `{local}.{}` declared twice",
                        ty.name
                    )));
                }
            }

            debug!(package = %package.path, types = types.len(), "loaded package");
            packages.insert(
                package.path.clone(),
                PackageInfo {
                    name: package.package_name().to_string(),
                    types,
                },
            );
        }

        Ok(Self { packages })
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Resolve a package given either its import path or its package name.
    pub fn resolve_package(&self, name_or_path: &str) -> Result<String> {
        if self.packages.contains_key(name_or_path) {
            return Ok(name_or_path.to_string());
        }

        let mut candidates: Vec<String> = self
            .packages
            .iter()
            .filter(|(_, package)| package.name == name_or_path)
            .map(|(path, _)| path.clone())
            .collect();

        match candidates.len() {
            0 => Err(ProxyError::UnknownPackage(name_or_path.to_string())),
            1 => Ok(candidates.remove(0)),
            _ => Err(ProxyError::AmbiguousPackage {
                name: name_or_path.to_string(),
                candidates,
            }),
        }
    }

    /// The named type `path.name`, which must be declared.
    pub fn lookup_type(&self, path: &str, name: &str) -> Result<TypeExpr> {
        let named = NamedType::new(path, name);
        self.type_info(&named)?;
        Ok(TypeExpr::Named(named))
    }

    pub(crate) fn type_info(&self, named: &NamedType) -> Result<&TypeInfo> {
        self.find_type(named)?
            .ok_or_else(|| ProxyError::UnknownPackage(named.path.clone()))
    }

    /// `None` when the package is outside the universe; an error when the package is known but
    /// does not declare the type.
    pub(crate) fn find_type(&self, named: &NamedType) -> Result<Option<&TypeInfo>> {
        let Some(package) = self.packages.get(&named.path) else {
            return Ok(None);
        };
        package
            .types
            .get(&named.name)
            .map(Some)
            .ok_or_else(|| ProxyError::UnknownType(named.to_string()))
    }
}

fn method_decl(spec: &MethodSpec, local: &str, kind: KindSpec) -> Result<MethodDecl> {
    let params = spec
        .params
        .iter()
        .map(|param| param_of(param, local))
        .collect::<Result<Vec<_>>>()?;
    let results = spec
        .results
        .iter()
        .map(|result| param_of(result, local))
        .collect::<Result<Vec<_>>>()?;

    if spec.variadic && params.is_empty() {
        return Err(ProxyError::InvalidUniverse(format!(
            "variadic method `{local}.{}` has no parameters",
            spec.name
        )));
    }

    let is_interface = kind == KindSpec::Interface;
    Ok(MethodDecl {
        name: spec.name.clone(),
        pointer_receiver: !is_interface && spec.receiver == model::ReceiverSpec::Pointer,
        receiver_name: if is_interface {
            None
        } else {
            spec.receiver_name.clone()
        },
        signature: Signature {
            params,
            results,
            variadic: spec.variadic,
        },
    })
}

fn param_of(spec: &ParamSpec, local: &str) -> Result<Param> {
    let ty = parse_type(spec.type_str(), Some(local))?;
    Ok(match spec.name() {
        Some(name) => Param::named(name, ty),
        None => Param::unnamed(ty),
    })
}

impl TypeQuery for TypeUniverse {
    fn method_set(&self, ty: &TypeExpr) -> Result<Vec<MethodSelection>> {
        method_set::compute(self, ty)
    }

    fn underlying(&self, named: &NamedType) -> Result<TypeExpr> {
        let mut seen = HashSet::new();
        let mut current = named.clone();
        loop {
            if !seen.insert(current.clone()) {
                return Err(ProxyError::CyclicUnderlying(named.to_string()));
            }
            match &self.type_info(&current)?.underlying {
                TypeExpr::Named(next) => current = next.clone(),
                other => return Ok(other.clone()),
            }
        }
    }

    fn package_name(&self, path: &str) -> Result<String> {
        Ok(match self.packages.get(path) {
            Some(package) => package.name.clone(),
            None => path.rsplit('/').next().unwrap_or(path).to_string(),
        })
    }
}
