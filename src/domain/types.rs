//! Host type model - the handles the analysis passes around.
//!
//! A `TypeExpr` is a structural type expression of the host language. Its canonical key is the
//! fully-qualified type string (`*example.com/shop.Cart`, `map[string][]example.com/shop.Item`),
//! which is what the catalog keys identity on.

use serde::Serialize;
use std::fmt;

/// Channel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// A defined (named) type: origin package path plus type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NamedType {
    pub path: String,
    pub name: String,
}

impl NamedType {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.path, self.name)
    }
}

/// Structural type expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TypeExpr {
    /// The distinguished error marker type.
    Error,
    /// Predeclared non-error type (`string`, `int`, `bool`, ...).
    Basic(String),
    Named(NamedType),
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array { len: u64, elem: Box<TypeExpr> },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    /// Struct literal. Members of named structs live on their definition, not here.
    Struct,
    /// Interface literal. Members of named interfaces live on their definition, not here.
    Interface,
}

impl TypeExpr {
    pub fn named(path: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::Named(NamedType::new(path, name))
    }

    pub fn basic(name: impl Into<String>) -> Self {
        TypeExpr::Basic(name.into())
    }

    pub fn pointer_to(self) -> Self {
        TypeExpr::Pointer(Box::new(self))
    }

    pub fn slice_of(self) -> Self {
        TypeExpr::Slice(Box::new(self))
    }

    /// Canonical identity key
    pub fn key(&self) -> String {
        self.to_string()
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TypeExpr::Error)
    }

    pub fn as_named(&self) -> Option<&NamedType> {
        match self {
            TypeExpr::Named(named) => Some(named),
            _ => None,
        }
    }

    /// Root identity: the type with every reference layer stripped.
    pub fn root(&self) -> &TypeExpr {
        match self {
            TypeExpr::Pointer(elem) => elem.root(),
            other => other,
        }
    }

    /// Structurally contained element types, in declaration order.
    ///
    /// Named types have no structural children; their underlying representation has to be
    /// resolved through the type-system query.
    pub fn children(&self) -> Vec<&TypeExpr> {
        match self {
            TypeExpr::Pointer(elem)
            | TypeExpr::Slice(elem)
            | TypeExpr::Array { elem, .. }
            | TypeExpr::Chan { elem, .. } => vec![elem.as_ref()],
            TypeExpr::Map { key, value } => vec![key.as_ref(), value.as_ref()],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Error => f.write_str("error"),
            TypeExpr::Basic(name) => f.write_str(name),
            TypeExpr::Named(named) => write!(f, "{named}"),
            TypeExpr::Pointer(elem) => write!(f, "*{elem}"),
            TypeExpr::Slice(elem) => write!(f, "[]{elem}"),
            TypeExpr::Array { len, elem } => write!(f, "[{len}]{elem}"),
            TypeExpr::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeExpr::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            TypeExpr::Struct => f.write_str("struct{}"),
            TypeExpr::Interface => f.write_str("interface{}"),
        }
    }
}

/// Single parameter or result of a signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: Option<String>,
    pub ty: TypeExpr,
}

impl Param {
    pub fn unnamed(ty: TypeExpr) -> Self {
        Self { name: None, ty }
    }

    pub fn named(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }
}

/// Method signature. When `variadic` is set the last parameter's type is a slice of the
/// element type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub params: Vec<Param>,
    pub results: Vec<Param>,
    pub variadic: bool,
}

/// One entry of a type's method set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSelection {
    pub name: String,
    /// Receiver name as declared; interface methods have none.
    pub receiver_name: Option<String>,
    pub signature: Signature,
    /// True when the method is reached through a reference layer (promoted view) rather than
    /// with a direct receiver.
    pub indirect: bool,
}

impl MethodSelection {
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }

    pub fn is_direct(&self) -> bool {
        !self.indirect
    }
}

/// Host-language export rule: identifiers starting with an upper-case letter are exported.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> TypeExpr {
        TypeExpr::named("example.com/shop", "Item")
    }

    #[test]
    fn test_key_matches_qualified_type_string() {
        let ty = TypeExpr::Map {
            key: Box::new(TypeExpr::basic("string")),
            value: Box::new(item().pointer_to().slice_of()),
        };
        assert_eq!(ty.key(), "map[string][]*example.com/shop.Item");
    }

    #[test]
    fn test_chan_directions_render_distinctly() {
        let send = TypeExpr::Chan {
            dir: ChanDir::Send,
            elem: Box::new(item()),
        };
        let recv = TypeExpr::Chan {
            dir: ChanDir::Recv,
            elem: Box::new(item()),
        };
        assert_eq!(send.key(), "chan<- example.com/shop.Item");
        assert_eq!(recv.key(), "<-chan example.com/shop.Item");
    }

    #[test]
    fn test_root_strips_every_reference_layer() {
        let ty = item().pointer_to().pointer_to();
        assert_eq!(ty.root(), &item());
        let slice = item().slice_of().pointer_to();
        assert_eq!(slice.root(), &item().slice_of());
    }

    #[test]
    fn test_map_children_are_key_then_value() {
        let ty = TypeExpr::Map {
            key: Box::new(TypeExpr::basic("int")),
            value: Box::new(item()),
        };
        assert_eq!(ty.children(), vec![&TypeExpr::basic("int"), &item()]);
        assert!(item().children().is_empty());
    }

    #[test]
    fn test_exported_names_start_upper_case() {
        assert!(is_exported("Get"));
        assert!(!is_exported("get"));
        assert!(!is_exported(""));
    }
}
