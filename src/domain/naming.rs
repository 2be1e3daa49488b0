//! Deterministic names for generated units, proxy types and constructors.

use crate::domain::catalog::{TypeDescriptor, TypeKind};
use crate::domain::error::Result;
use crate::domain::ports::TypeQuery;
use crate::domain::types::{Param, TypeExpr};
use sha2::{Digest, Sha256};

/// Content-derived identifier for roots without a stable name.
pub fn anon_hash(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let hex = format!("{digest:x}");
    hex[..16].to_string()
}

fn title(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Proxy type name for a root: `shop.Cart` -> `ShopCart`.
pub fn proxy_name(root: &TypeExpr, query: &dyn TypeQuery) -> Result<String> {
    match root.root() {
        TypeExpr::Named(named) => {
            let package = query.package_name(&named.path)?;
            Ok(format!("{}{}", title(&package), named.name))
        }
        other => Ok(format!("Anon{}", anon_hash(&other.key()))),
    }
}

/// Output unit name for a root: `shop_cart.go` or `anon<hash>.go`.
pub fn unit_file_name(root: &TypeExpr, query: &dyn TypeQuery) -> Result<String> {
    match root.root() {
        TypeExpr::Named(named) => {
            let package = query.package_name(&named.path)?;
            Ok(format!("{package}_{}.go", named.name).to_lowercase())
        }
        other => Ok(format!("anon{}.go", anon_hash(&other.key()))),
    }
}

/// Constructor name for one variant.
///
/// Non-interfaces: the single-reference form gets the bare name, the value form `Value`, and
/// each further reference layer a `Ptr`. Interfaces: one `Ptr` per reference layer.
pub fn constructor_name(descriptor: &TypeDescriptor, query: &dyn TypeQuery) -> Result<String> {
    let mut name = format!("Wrap{}", proxy_name(&descriptor.ty, query)?);
    match (descriptor.kind, descriptor.depth) {
        (TypeKind::Interface, depth) => name.push_str(&"Ptr".repeat(depth)),
        (_, 0) => name.push_str("Value"),
        (_, depth) => name.push_str(&"Ptr".repeat(depth - 1)),
    }
    Ok(name)
}

/// Parameter name used in generated signatures.
pub fn param_name(param: &Param, index: usize) -> String {
    match param.name.as_deref() {
        None | Some("") | Some("_") => format!("p{index}"),
        Some(name) => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{MethodSelection, NamedType};

    struct ShopQuery;

    impl TypeQuery for ShopQuery {
        fn method_set(&self, _ty: &TypeExpr) -> Result<Vec<MethodSelection>> {
            Ok(Vec::new())
        }

        fn underlying(&self, _named: &NamedType) -> Result<TypeExpr> {
            Ok(TypeExpr::Struct)
        }

        fn package_name(&self, _path: &str) -> Result<String> {
            Ok("shop".to_string())
        }
    }

    fn descriptor(ty: TypeExpr, kind: TypeKind, depth: usize) -> TypeDescriptor {
        TypeDescriptor {
            key: ty.key(),
            kind,
            depth,
            ty,
        }
    }

    #[test]
    fn test_named_roots_use_package_and_type_name() {
        let cart = TypeExpr::named("example.com/shop", "Cart");
        assert_eq!(proxy_name(&cart.clone().pointer_to(), &ShopQuery).unwrap(), "ShopCart");
        assert_eq!(unit_file_name(&cart, &ShopQuery).unwrap(), "shop_cart.go");
    }

    #[test]
    fn test_anonymous_roots_use_content_hash() {
        let ids = TypeExpr::basic("int").slice_of();
        let name = proxy_name(&ids, &ShopQuery).unwrap();
        assert!(name.starts_with("Anon"));
        assert_eq!(name.len(), "Anon".len() + 16);
        assert_eq!(
            unit_file_name(&ids, &ShopQuery).unwrap(),
            format!("anon{}.go", anon_hash("[]int"))
        );
        assert_eq!(anon_hash("[]int"), anon_hash("[]int"));
        assert_ne!(anon_hash("[]int"), anon_hash("[]string"));
    }

    #[test]
    fn test_constructor_suffix_follows_depth_and_kind() {
        let cart = TypeExpr::named("example.com/shop", "Cart");
        let value = descriptor(cart.clone(), TypeKind::Struct, 0);
        let ptr = descriptor(cart.clone().pointer_to(), TypeKind::Struct, 1);
        let ptr_ptr = descriptor(cart.pointer_to().pointer_to(), TypeKind::Struct, 2);
        let iface = descriptor(TypeExpr::named("example.com/shop", "Store"), TypeKind::Interface, 0);

        assert_eq!(constructor_name(&value, &ShopQuery).unwrap(), "WrapShopCartValue");
        assert_eq!(constructor_name(&ptr, &ShopQuery).unwrap(), "WrapShopCart");
        assert_eq!(constructor_name(&ptr_ptr, &ShopQuery).unwrap(), "WrapShopCartPtr");
        assert_eq!(constructor_name(&iface, &ShopQuery).unwrap(), "WrapShopStore");
    }

    #[test]
    fn test_blank_params_get_positional_names() {
        let ty = TypeExpr::basic("int");
        assert_eq!(param_name(&Param::unnamed(ty.clone()), 2), "p2");
        assert_eq!(param_name(&Param::named("_", ty.clone()), 0), "p0");
        assert_eq!(param_name(&Param::named("count", ty), 0), "count");
    }
}
