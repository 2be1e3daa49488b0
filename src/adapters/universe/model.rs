//! Serialized form of a type universe: the packages, types and method declarations the
//! generator may consult.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniverseFile {
    #[serde(default)]
    pub packages: Vec<PackageSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSpec {
    /// Import path
    pub path: String,
    /// Package clause name; defaults to the last path element.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub types: Vec<TypeSpec>,
}

impl PackageSpec {
    pub fn package_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindSpec {
    Struct,
    Interface,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: String,
    pub kind: KindSpec,
    /// Underlying type string, required for `other`.
    #[serde(default)]
    pub underlying: Option<String>,
    /// Embedded fields (structs) or embedded interfaces, as type strings.
    #[serde(default)]
    pub embeds: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiverSpec {
    #[default]
    Value,
    Pointer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSpec {
    pub name: String,
    /// Ignored for interface methods.
    #[serde(default)]
    pub receiver: ReceiverSpec,
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(default)]
    pub params: Vec<ParamSpec>,
    #[serde(default)]
    pub results: Vec<ParamSpec>,
    /// The last parameter is `...T`; its type is written as `[]T`.
    #[serde(default)]
    pub variadic: bool,
}

/// Parameter or result: either a bare type string or `{ "name", "type" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamSpec {
    Bare(String),
    Full {
        #[serde(default)]
        name: Option<String>,
        #[serde(rename = "type")]
        ty: String,
    },
}

impl ParamSpec {
    pub fn name(&self) -> Option<&str> {
        match self {
            ParamSpec::Bare(_) => None,
            ParamSpec::Full { name, .. } => name.as_deref(),
        }
    }

    pub fn type_str(&self) -> &str {
        match self {
            ParamSpec::Bare(ty) | ParamSpec::Full { ty, .. } => ty,
        }
    }
}
