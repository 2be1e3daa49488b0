//! Declaration tree for generated Go source.
//!
//! Types are carried as already-qualified text (`GoType`); everything above the type level is
//! structured so the printer owns layout.

use std::collections::BTreeMap;

/// Rendered, package-qualified type text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoType(pub String);

impl GoType {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Import set: path -> alias. Aliases are unique within a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Imports {
    by_path: BTreeMap<String, String>,
}

impl Imports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` and return the alias to qualify its names with.
    pub fn qualifier(&mut self, path: &str, package_name: &str) -> String {
        if let Some(alias) = self.by_path.get(path) {
            return alias.clone();
        }

        let mut alias = package_name.to_string();
        let mut suffix = 1;
        while self.by_path.values().any(|existing| *existing == alias) {
            alias = format!("{package_name}{suffix}");
            suffix += 1;
        }
        self.by_path.insert(path.to_string(), alias.clone());
        alias
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// (path, alias) pairs sorted by path
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_path
            .iter()
            .map(|(path, alias)| (path.as_str(), alias.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoFile {
    pub package: String,
    pub package_comment: Option<String>,
    pub imports: Imports,
    pub decls: Vec<Decl>,
}

impl GoFile {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            package_comment: None,
            imports: Imports::new(),
            decls: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Struct(StructDecl),
    Func(FuncDecl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: GoType,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: GoType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: GoType,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub receiver: Option<Field>,
    pub name: String,
    pub params: Vec<ParamDecl>,
    pub results: Vec<GoType>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `a, b := value`
    Define { names: Vec<String>, value: Expr },
    /// `target = value`
    Assign { target: Expr, value: Expr },
    /// `if init; cond { then }`
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        then: Vec<Stmt>,
    },
    /// `for key, value := range over { body }`
    Range {
        key: String,
        value: String,
        over: Expr,
        body: Vec<Stmt>,
    },
    Return(Vec<Expr>),
    Expr(Expr),
    /// Empty line
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    Nil,
    Selector(Box<Expr>, String),
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        spread: bool,
    },
    AddrOf(Box<Expr>),
    Deref(Box<Expr>),
    Composite {
        ty: GoType,
        fields: Vec<(String, Expr)>,
    },
    Binary {
        op: &'static str,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Index(Box<Expr>, Box<Expr>),
    TypeAssert(Box<Expr>, GoType),
    /// `make(ty, len)`
    Make { ty: GoType, len: Box<Expr> },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn dot(self, field: impl Into<String>) -> Self {
        Expr::Selector(Box::new(self), field.into())
    }

    pub fn call(self, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: Box::new(self),
            args,
            spread: false,
        }
    }

    pub fn call_spread(self, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: Box::new(self),
            args,
            spread: true,
        }
    }

    pub fn addr(self) -> Self {
        Expr::AddrOf(Box::new(self))
    }

    pub fn deref(self) -> Self {
        Expr::Deref(Box::new(self))
    }

    pub fn index(self, at: Expr) -> Self {
        Expr::Index(Box::new(self), Box::new(at))
    }

    pub fn assert_type(self, ty: GoType) -> Self {
        Expr::TypeAssert(Box::new(self), ty)
    }

    pub fn binary(self, op: &'static str, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    pub fn is_nil(self) -> Self {
        self.binary("==", Expr::Nil)
    }

    pub fn or(self, rhs: Expr) -> Self {
        self.binary("||", rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualifier_reuses_and_disambiguates_aliases() {
        let mut imports = Imports::new();
        assert_eq!(imports.qualifier("example.com/a/model", "model"), "model");
        assert_eq!(imports.qualifier("example.com/b/model", "model"), "model1");
        assert_eq!(imports.qualifier("example.com/a/model", "model"), "model");
        let paths: Vec<&str> = imports.iter().map(|(path, _)| path).collect();
        assert_eq!(paths, vec!["example.com/a/model", "example.com/b/model"]);
    }
}
