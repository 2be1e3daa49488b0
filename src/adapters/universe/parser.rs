use crate::domain::error::{ProxyError, Result};
use crate::domain::types::{ChanDir, TypeExpr};

/// Parse a type string (`*example.com/shop.Cart`, `map[string][]Item`, `<-chan int`).
///
/// Unqualified identifiers starting with an upper-case letter are resolved against `local`,
/// the package the string was written in. Everything else unqualified is a basic type.
pub fn parse_type(input: &str, local: Option<&str>) -> Result<TypeExpr> {
    let mut parser = TypeParser {
        input,
        rest: input.trim(),
        local,
    };
    let ty = parser.parse()?;
    if !parser.rest.trim().is_empty() {
        return Err(parser.error(format!("unexpected trailing `{}`", parser.rest.trim())));
    }
    Ok(ty)
}

struct TypeParser<'a> {
    input: &'a str,
    rest: &'a str,
    local: Option<&'a str>,
}

impl<'a> TypeParser<'a> {
    fn error(&self, reason: impl Into<String>) -> ProxyError {
        ProxyError::InvalidTypeExpr {
            input: self.input.to_string(),
            reason: reason.into(),
        }
    }

    fn eat(&mut self, prefix: &str) -> bool {
        match self.rest.strip_prefix(prefix) {
            Some(rest) => {
                self.rest = rest.trim_start();
                true
            }
            None => false,
        }
    }

    fn parse(&mut self) -> Result<TypeExpr> {
        if self.eat("*") {
            return Ok(self.parse()?.pointer_to());
        }
        if self.eat("[]") {
            return Ok(self.parse()?.slice_of());
        }
        if self.eat("[") {
            let end = self
                .rest
                .find(']')
                .ok_or_else(|| self.error("unterminated array length"))?;
            let len = self.rest[..end]
                .trim()
                .parse::<u64>()
                .map_err(|_| self.error(format!("bad array length `{}`", &self.rest[..end])))?;
            self.rest = self.rest[end + 1..].trim_start();
            return Ok(TypeExpr::Array {
                len,
                elem: Box::new(self.parse()?),
            });
        }
        if self.eat("map[") {
            let key = self.parse()?;
            if !self.eat("]") {
                return Err(self.error("expected `]` after map key"));
            }
            return Ok(TypeExpr::Map {
                key: Box::new(key),
                value: Box::new(self.parse()?),
            });
        }
        if self.eat("<-chan") {
            return Ok(TypeExpr::Chan {
                dir: ChanDir::Recv,
                elem: Box::new(self.parse()?),
            });
        }
        if self.eat("chan<-") {
            return Ok(TypeExpr::Chan {
                dir: ChanDir::Send,
                elem: Box::new(self.parse()?),
            });
        }
        if self.rest.starts_with("chan ") || self.rest.starts_with("chan\t") {
            self.eat("chan");
            return Ok(TypeExpr::Chan {
                dir: ChanDir::Both,
                elem: Box::new(self.parse()?),
            });
        }
        if self.eat("struct{}") {
            return Ok(TypeExpr::Struct);
        }
        if self.eat("interface{}") {
            return Ok(TypeExpr::Interface);
        }
        if self.rest.starts_with("struct") || self.rest.starts_with("interface") {
            return Err(self.error("only empty struct and interface literals are supported"));
        }

        self.identifier()
    }

    fn identifier(&mut self) -> Result<TypeExpr> {
        let rest = self.rest;
        let end = rest
            .find(|c: char| c == ']' || c == ',' || c.is_whitespace())
            .unwrap_or(rest.len());
        let token = &rest[..end];
        if token.is_empty() {
            return Err(self.error("expected a type"));
        }
        self.rest = &rest[end..];

        if let Some((path, name)) = token.rsplit_once('.') {
            if path.is_empty() || name.is_empty() {
                return Err(self.error(format!("bad qualified name `{token}`")));
            }
            return Ok(TypeExpr::named(path, name));
        }

        Ok(match token {
            "error" => TypeExpr::Error,
            "any" => TypeExpr::Interface,
            name if name.starts_with(char::is_uppercase) => match self.local {
                Some(path) => TypeExpr::named(path, name),
                None => return Err(self.error(format!("unqualified type `{name}`"))),
            },
            name => TypeExpr::basic(name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOP: &str = "example.com/shop";

    fn parse(input: &str) -> TypeExpr {
        parse_type(input, Some(SHOP)).unwrap()
    }

    #[test]
    fn test_parses_composites_and_renders_back() {
        for input in [
            "*example.com/shop.Cart",
            "map[string][]*example.com/shop.Item",
            "[4]int",
            "<-chan example.com/shop.Event",
            "chan<- error",
            "chan map[[2]int]struct{}",
            "**interface{}",
        ] {
            assert_eq!(parse(input).key(), input);
        }
    }

    #[test]
    fn test_local_names_resolve_to_enclosing_package() {
        assert_eq!(parse("[]*Item"), TypeExpr::named(SHOP, "Item").pointer_to().slice_of());
        assert_eq!(parse("string"), TypeExpr::basic("string"));
        assert_eq!(parse("any"), TypeExpr::Interface);
        assert!(parse_type("Item", None).is_err());
    }

    #[test]
    fn test_rejects_malformed_input() {
        for input in ["", "[x]int", "map[string", "int int", "struct{ x int }", ".Item"] {
            let err = parse_type(input, Some(SHOP)).unwrap_err();
            assert!(matches!(err, ProxyError::InvalidTypeExpr { .. }), "{input}");
        }
    }
}
