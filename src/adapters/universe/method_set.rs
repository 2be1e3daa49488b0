use crate::adapters::universe::model::KindSpec;
use crate::adapters::universe::{MethodDecl, TypeUniverse};
use crate::domain::error::Result;
use crate::domain::types::{MethodSelection, NamedType, TypeExpr};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Method set of `ty`, sorted by name.
///
/// Only `T` and `*T` for a declared named `T` have methods. `T` sees value-receiver methods
/// with a direct receiver; `*T` sees every method, each reached through the reference.
/// Embedded fields promote their methods breadth-first: a name found at a shallower embedding
/// depth hides deeper ones, and two candidates at the same depth cancel each other out.
pub fn compute(universe: &TypeUniverse, ty: &TypeExpr) -> Result<Vec<MethodSelection>> {
    let (named, through_ref) = match ty {
        TypeExpr::Named(named) => (named, false),
        TypeExpr::Pointer(elem) => match elem.as_ref() {
            TypeExpr::Named(named) => (named, true),
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    let Some(info) = universe.find_type(named)? else {
        return Ok(Vec::new());
    };

    if info.kind == KindSpec::Interface {
        // A reference to an interface has no methods.
        if through_ref {
            return Ok(Vec::new());
        }
        return interface_methods(universe, named);
    }

    promoted_methods(universe, named, through_ref)
}

fn selection(method: &MethodDecl, indirect: bool) -> MethodSelection {
    MethodSelection {
        name: method.name.clone(),
        receiver_name: method.receiver_name.clone(),
        signature: method.signature.clone(),
        indirect,
    }
}

/// Declared plus embedded interface methods, flattened.
fn interface_methods(universe: &TypeUniverse, root: &NamedType) -> Result<Vec<MethodSelection>> {
    let mut methods = BTreeMap::new();
    let mut seen = HashSet::new();
    let mut pending = vec![root.clone()];

    while let Some(current) = pending.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        let Some(info) = universe.find_type(&current)? else {
            continue;
        };
        for method in &info.methods {
            methods
                .entry(method.name.clone())
                .or_insert_with(|| selection(method, false));
        }
        for embed in &info.embeds {
            if let TypeExpr::Named(next) = embed {
                pending.push(next.clone());
            }
        }
    }

    Ok(methods.into_values().collect())
}

fn promoted_methods(
    universe: &TypeUniverse,
    root: &NamedType,
    through_ref: bool,
) -> Result<Vec<MethodSelection>> {
    let mut found: BTreeMap<String, MethodSelection> = BTreeMap::new();
    let mut decided: HashSet<String> = HashSet::new();
    let mut seen: HashSet<NamedType> = HashSet::new();
    let mut level = vec![(root.clone(), through_ref)];

    while !level.is_empty() {
        let mut candidates: HashMap<String, Vec<MethodSelection>> = HashMap::new();
        let mut next = Vec::new();

        for (current, via_ref) in level {
            if !seen.insert(current.clone()) {
                continue;
            }
            // Embedded types from outside the universe contribute nothing we can forward.
            let Some(info) = universe.find_type(&current)? else {
                continue;
            };

            if info.kind == KindSpec::Interface {
                for method in interface_methods(universe, &current)? {
                    candidates
                        .entry(method.name.clone())
                        .or_default()
                        .push(MethodSelection {
                            indirect: via_ref,
                            ..method
                        });
                }
                continue;
            }

            for method in &info.methods {
                if method.pointer_receiver && !via_ref {
                    continue;
                }
                candidates
                    .entry(method.name.clone())
                    .or_default()
                    .push(selection(method, via_ref));
            }

            for embed in &info.embeds {
                match embed {
                    TypeExpr::Named(named) => next.push((named.clone(), via_ref)),
                    TypeExpr::Pointer(elem) => {
                        if let TypeExpr::Named(named) = elem.as_ref() {
                            next.push((named.clone(), true));
                        }
                    }
                    _ => {}
                }
            }
        }

        for (name, mut at_depth) in candidates {
            if !decided.insert(name.clone()) {
                continue;
            }
            if at_depth.len() == 1 {
                if let Some(method) = at_depth.pop() {
                    found.insert(name, method);
                }
            }
        }

        level = next;
    }

    Ok(found.into_values().collect())
}

#[cfg(test)]
mod tests {
    use crate::adapters::universe::model::UniverseFile;
    use crate::adapters::universe::TypeUniverse;
    use crate::domain::ports::TypeQuery;
    use crate::domain::types::TypeExpr;

    const ZOO: &str = r#"{
        "packages": [ { "path": "example.com/zoo", "name": "zoo", "types": [
            { "name": "Animal", "kind": "struct",
              "methods": [
                { "name": "Name", "receiver": "value", "receiver_name": "a", "results": ["string"] },
                { "name": "Feed", "receiver": "pointer", "receiver_name": "a", "results": ["error"] },
                { "name": "tag", "receiver": "value" } ] },
            { "name": "Keeper", "kind": "struct",
              "methods": [ { "name": "Name", "receiver": "value", "receiver_name": "k", "results": ["string"] } ] },
            { "name": "Dog", "kind": "struct", "embeds": ["Animal", "time.Time"],
              "methods": [ { "name": "Bark", "receiver": "pointer", "receiver_name": "d" } ] },
            { "name": "Cat", "kind": "struct", "embeds": ["*Animal"] },
            { "name": "Pair", "kind": "struct", "embeds": ["Animal", "Keeper"] },
            { "name": "Walker", "kind": "interface", "embeds": ["Sleeper"],
              "methods": [ { "name": "Walk", "results": ["error"] } ] },
            { "name": "Sleeper", "kind": "interface", "embeds": ["Walker"],
              "methods": [ { "name": "Sleep" } ] }
        ] } ]
    }"#;

    fn zoo() -> TypeUniverse {
        let spec: UniverseFile = serde_json::from_str(ZOO).unwrap();
        TypeUniverse::from_spec(spec).unwrap()
    }

    fn named(name: &str) -> TypeExpr {
        TypeExpr::named("example.com/zoo", name)
    }

    fn names_and_indirect(ty: &TypeExpr) -> Vec<(String, bool)> {
        zoo()
            .method_set(ty)
            .unwrap()
            .into_iter()
            .map(|m| (m.name, m.indirect))
            .collect()
    }

    fn owned(pairs: &[(&str, bool)]) -> Vec<(String, bool)> {
        pairs.iter().map(|(n, i)| (n.to_string(), *i)).collect()
    }

    #[test]
    fn test_value_form_sees_value_receivers_directly() {
        assert_eq!(
            names_and_indirect(&named("Animal")),
            owned(&[("Name", false), ("tag", false)])
        );
        assert_eq!(
            names_and_indirect(&named("Animal").pointer_to()),
            owned(&[("Feed", true), ("Name", true), ("tag", true)])
        );
    }

    #[test]
    fn test_embedded_methods_are_promoted() {
        assert_eq!(
            names_and_indirect(&named("Dog")),
            owned(&[("Name", false), ("tag", false)])
        );
        assert_eq!(
            names_and_indirect(&named("Dog").pointer_to()),
            owned(&[("Bark", true), ("Feed", true), ("Name", true), ("tag", true)])
        );
        // Embedding by reference makes every method reachable, through the reference.
        assert_eq!(
            names_and_indirect(&named("Cat")),
            owned(&[("Feed", true), ("Name", true), ("tag", true)])
        );
    }

    #[test]
    fn test_same_depth_collisions_cancel() {
        assert_eq!(names_and_indirect(&named("Pair")), owned(&[("tag", false)]));
    }

    #[test]
    fn test_interfaces_flatten_embedded_methods() {
        assert_eq!(
            names_and_indirect(&named("Walker")),
            owned(&[("Sleep", false), ("Walk", false)])
        );
        assert!(names_and_indirect(&named("Walker").pointer_to()).is_empty());
        assert!(names_and_indirect(&named("Animal").pointer_to().pointer_to()).is_empty());
        assert!(names_and_indirect(&named("Animal").slice_of()).is_empty());
    }

    #[test]
    fn test_receiver_names_carry_over() {
        let methods = zoo().method_set(&named("Dog").pointer_to()).unwrap();
        let receivers: Vec<Option<&str>> =
            methods.iter().map(|m| m.receiver_name.as_deref()).collect();
        assert_eq!(receivers, vec![Some("d"), Some("a"), Some("a"), None]);
    }
}
