use crate::codegen::ast::{
    Decl, Expr, Field, FuncDecl, GoFile, GoType, Imports, ParamDecl, Stmt, StructDecl,
};
use crate::codegen::{printer, GENERATED_COMMENT};
use crate::domain::catalog::{CatalogEntry, RootGroup, TypeCatalog, WrapStatus};
use crate::domain::error::{ProxyError, Result};
use crate::domain::naming;
use crate::domain::ports::TypeQuery;
use crate::domain::types::{ChanDir, MethodSelection, TypeExpr};
use std::collections::HashMap;
use tracing::debug;

/// Settings for the generated package
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// Package clause of every generated unit
    pub package: String,
    /// Import path of the error transformer type; empty when it lives in the output package
    pub transformer_path: String,
    pub transformer_type: String,
}

/// One generated file: the proxy for a root group and all of its wrapped variants.
#[derive(Debug, Clone)]
pub struct OutputUnit {
    pub file_name: String,
    pub root_key: String,
    pub proxy_name: String,
    /// Keys of the variants that received a constructor, lexical
    pub variants: Vec<String>,
    pub file: GoFile,
}

impl OutputUnit {
    pub fn render(&self) -> String {
        printer::render(&self.file)
    }
}

/// Code Synthesizer - turns the resolved catalog into output units
pub struct CodeSynthesizer<'a> {
    catalog: &'a TypeCatalog,
    query: &'a dyn TypeQuery,
    config: &'a SynthesisConfig,
}

impl<'a> CodeSynthesizer<'a> {
    pub fn new(
        catalog: &'a TypeCatalog,
        query: &'a dyn TypeQuery,
        config: &'a SynthesisConfig,
    ) -> Self {
        Self {
            catalog,
            query,
            config,
        }
    }

    /// One unit per root group needing output, ordered by file name.
    pub fn synthesize(&self) -> Result<Vec<OutputUnit>> {
        let mut units = Vec::new();
        self.catalog.for_each_root_needing_output(|root| {
            units.push(self.synthesize_root(root)?);
            Ok(())
        })?;
        units.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        check_unique_names(&units)?;
        Ok(units)
    }

    fn synthesize_root(&self, root: &RootGroup) -> Result<OutputUnit> {
        let root_ty = &root.descriptor.ty;
        let proxy = naming::proxy_name(root_ty, self.query)?;
        let mut file = GoFile::new(&self.config.package);
        file.package_comment = Some(GENERATED_COMMENT.to_string());

        // type [Proxy] struct {
        //   inner            [RootType]
        //   errorTransformer [Transformer]
        // }
        let inner = self.render_type(root_ty, &mut file.imports)?;
        let transformer = self.transformer_type(&mut file.imports);
        file.decls.push(Decl::Struct(StructDecl {
            name: proxy.clone(),
            fields: vec![
                Field::new("inner", inner),
                Field::new("errorTransformer", transformer),
            ],
        }));

        let mut variants = Vec::new();
        for entry in self.catalog.members_needing_output(root) {
            variants.push(entry.key().to_string());
            let constructor = self.constructor(entry, &proxy, &mut file.imports)?;
            file.decls.push(Decl::Func(constructor));

            for method in entry.methods() {
                if !root.can_use_method(entry.key(), &method.name) {
                    continue;
                }
                let forward = self.forwarding_method(entry, &proxy, method, &mut file.imports)?;
                file.decls.push(Decl::Func(forward));
            }
        }

        debug!(root = %root.descriptor.key, variants = variants.len(), "synthesized unit");
        Ok(OutputUnit {
            file_name: naming::unit_file_name(root_ty, self.query)?,
            root_key: root.descriptor.key.clone(),
            proxy_name: proxy,
            variants,
            file,
        })
    }

    fn transformer_type(&self, imports: &mut Imports) -> GoType {
        let path = self.config.transformer_path.as_str();
        if path.is_empty() {
            return GoType::new(&self.config.transformer_type);
        }
        let package = path.rsplit('/').next().unwrap_or(path);
        let alias = imports.qualifier(path, package);
        GoType::new(format!("{alias}.{}", self.config.transformer_type))
    }

    /// func Wrap[Proxy](inner [Variant], errorTransformer [Transformer]) [WrappedVariant]
    fn constructor(
        &self,
        entry: &CatalogEntry,
        proxy: &str,
        imports: &mut Imports,
    ) -> Result<FuncDecl> {
        let descriptor = &entry.descriptor;
        let depth = descriptor.depth;
        let mut body = Vec::new();

        // Reference forms (and interfaces) short-circuit on nil before dereferencing.
        // Interface handles add one more nil-able layer below the references.
        let layers = depth + usize::from(descriptor.is_interface());
        if layers > 0 {
            let mut level = Expr::ident("inner");
            let mut cond = level.clone().is_nil();
            for _ in 1..layers {
                level = level.deref();
                cond = cond.or(level.clone().is_nil());
            }
            body.push(Stmt::If {
                init: None,
                cond,
                then: vec![Stmt::Return(vec![Expr::Nil])],
            });
            body.push(Stmt::Blank);
        }

        let mut stored = Expr::ident("inner");
        for _ in 0..depth {
            stored = stored.deref();
        }
        let literal = Expr::Composite {
            ty: GoType::new(proxy),
            fields: vec![
                ("inner".to_string(), stored),
                ("errorTransformer".to_string(), Expr::ident("errorTransformer")),
            ],
        };

        match layers {
            0 => body.push(Stmt::Return(vec![literal])),
            1 => body.push(Stmt::Return(vec![literal.addr()])),
            _ => {
                body.push(Stmt::Define {
                    names: vec!["proxy".to_string()],
                    value: literal.addr(),
                });
                let mut previous = "proxy".to_string();
                for level in 1..layers - 1 {
                    let name = format!("proxyRef{level}");
                    body.push(Stmt::Define {
                        names: vec![name.clone()],
                        value: Expr::ident(&previous).addr(),
                    });
                    previous = name;
                }
                body.push(Stmt::Return(vec![Expr::ident(previous).addr()]));
            }
        }

        Ok(FuncDecl {
            receiver: None,
            name: naming::constructor_name(descriptor, self.query)?,
            params: vec![
                ParamDecl {
                    name: "inner".to_string(),
                    ty: self.render_type(&descriptor.ty, imports)?,
                    variadic: false,
                },
                ParamDecl {
                    name: "errorTransformer".to_string(),
                    ty: self.transformer_type(imports),
                    variadic: false,
                },
            ],
            results: vec![self.wrapped_type(&descriptor.ty, imports)?],
            body,
        })
    }

    // func (s [Proxy]) [Method]([Params]) ([Results]) {
    //   r0, r1 := s.inner.[Method]([Args])
    //   return Wrap[Result](r0, s.errorTransformer), s.errorTransformer(r1)
    // }
    fn forwarding_method(
        &self,
        entry: &CatalogEntry,
        proxy: &str,
        method: &MethodSelection,
        imports: &mut Imports,
    ) -> Result<FuncDecl> {
        let sig = &method.signature;
        // Interfaces have blank receiver names; pick something that won't collide.
        let receiver_name = method
            .receiver_name
            .clone()
            .filter(|name| !name.is_empty() && name != "_")
            .unwrap_or_else(|| format!("iFace{proxy}"));
        let receiver_ty = if entry.descriptor.depth > 0 {
            format!("*{proxy}")
        } else {
            proxy.to_string()
        };
        let recv = Expr::ident(&receiver_name);

        let mut params = Vec::with_capacity(sig.params.len());
        let mut args = Vec::with_capacity(sig.params.len());
        let mut body = Vec::new();
        let last = sig.params.len().checked_sub(1);

        for (i, param) in sig.params.iter().enumerate() {
            let name = naming::param_name(param, i);
            if sig.variadic && Some(i) == last {
                let TypeExpr::Slice(elem) = &param.ty else {
                    return Err(ProxyError::Undecomposable {
                        owner: entry.key().to_string(),
                        method: method.name.clone(),
                        reason: format!("variadic parameter `{name}` has non-slice type `{}`", param.ty),
                    });
                };
                params.push(ParamDecl {
                    name: name.clone(),
                    ty: self.wrapped_type(elem, imports)?,
                    variadic: true,
                });
                args.push(self.unwrap_variadic(&name, elem, imports, &mut body)?);
            } else {
                params.push(ParamDecl {
                    name: name.clone(),
                    ty: self.wrapped_type(&param.ty, imports)?,
                    variadic: false,
                });
                args.push(self.unwrap_param(&name, &param.ty, &mut body)?);
            }
        }

        let target = recv.clone().dot("inner").dot(&method.name);
        let call = if sig.variadic {
            target.call_spread(args)
        } else {
            target.call(args)
        };

        let results = sig
            .results
            .iter()
            .map(|result| self.wrapped_type(&result.ty, imports))
            .collect::<Result<Vec<_>>>()?;

        if sig.results.is_empty() {
            body.push(Stmt::Expr(call));
        } else {
            let names: Vec<String> = (0..sig.results.len()).map(|i| format!("r{i}")).collect();
            body.push(Stmt::Define {
                names: names.clone(),
                value: call,
            });

            let transformer = recv.clone().dot("errorTransformer");
            let mut values = Vec::with_capacity(names.len());
            for (name, result) in names.iter().zip(&sig.results) {
                let value = Expr::ident(name);
                let value = if result.ty.is_error() {
                    transformer.clone().call(vec![value])
                } else if let Some(wrapped) = self.wrapped_entry(&result.ty, WrapStatus::Soft) {
                    let constructor = naming::constructor_name(&wrapped.descriptor, self.query)?;
                    Expr::ident(constructor).call(vec![value, transformer.clone()])
                } else {
                    value
                };
                values.push(value);
            }
            body.push(Stmt::Return(values));
        }

        Ok(FuncDecl {
            receiver: Some(Field::new(receiver_name, GoType::new(receiver_ty))),
            name: method.name.clone(),
            params,
            results,
            body,
        })
    }

    /// Argument expression for a parameter, extracting the inner value of wrapped types.
    fn unwrap_param(&self, name: &str, ty: &TypeExpr, body: &mut Vec<Stmt>) -> Result<Expr> {
        let value = Expr::ident(name);
        let Some(entry) = self.wrapped_entry(ty, WrapStatus::Soft) else {
            return Ok(value);
        };

        if entry.status() == WrapStatus::Soft {
            // Soft parameters keep the interface type; only our own proxies carry an inner value.
            let holder = format!("{name}Proxy");
            body.push(Stmt::If {
                init: Some(Box::new(Stmt::Define {
                    names: vec![holder.clone(), "ok".to_string()],
                    value: value.clone().assert_type(self.proxy_pointer(entry)?),
                })),
                cond: Expr::ident("ok"),
                then: vec![Stmt::Assign {
                    target: value.clone(),
                    value: Expr::ident(holder).dot("inner"),
                }],
            });
            return Ok(value);
        }

        let inner = value.dot("inner");
        Ok(if entry.descriptor.depth > 0 {
            inner.addr()
        } else {
            inner
        })
    }

    /// Spread argument for a variadic parameter; wrapped elements are unwrapped into a copy.
    fn unwrap_variadic(
        &self,
        name: &str,
        elem: &TypeExpr,
        imports: &mut Imports,
        body: &mut Vec<Stmt>,
    ) -> Result<Expr> {
        let value = Expr::ident(name);
        let Some(entry) = self.wrapped_entry(elem, WrapStatus::Soft) else {
            return Ok(value);
        };

        let unwrapped = format!("{name}Inner");
        let elem_ty = self.render_type(elem, imports)?;
        body.push(Stmt::Define {
            names: vec![unwrapped.clone()],
            value: Expr::Make {
                ty: GoType::new(format!("[]{}", elem_ty.as_str())),
                len: Box::new(Expr::ident("len").call(vec![value.clone()])),
            },
        });

        let item = Expr::ident("elem");
        let slot = Expr::ident(&unwrapped).index(Expr::ident("idx"));
        let loop_body = if entry.status() == WrapStatus::Soft {
            vec![
                Stmt::Assign {
                    target: slot.clone(),
                    value: item.clone(),
                },
                Stmt::If {
                    init: Some(Box::new(Stmt::Define {
                        names: vec!["elemProxy".to_string(), "ok".to_string()],
                        value: item.assert_type(self.proxy_pointer(entry)?),
                    })),
                    cond: Expr::ident("ok"),
                    then: vec![Stmt::Assign {
                        target: slot,
                        value: Expr::ident("elemProxy").dot("inner"),
                    }],
                },
            ]
        } else {
            let inner = item.dot("inner");
            let inner = if entry.descriptor.depth > 0 {
                inner.addr()
            } else {
                inner
            };
            vec![Stmt::Assign {
                target: slot,
                value: inner,
            }]
        };

        body.push(Stmt::Range {
            key: "idx".to_string(),
            value: "elem".to_string(),
            over: value,
            body: loop_body,
        });
        Ok(Expr::ident(unwrapped))
    }

    fn wrapped_entry(&self, ty: &TypeExpr, min: WrapStatus) -> Option<&'a CatalogEntry> {
        self.catalog.lookup(ty).filter(|entry| entry.status() >= min)
    }

    fn proxy_name_of(&self, entry: &CatalogEntry) -> Result<String> {
        naming::proxy_name(&self.catalog.root(entry.root).descriptor.ty, self.query)
    }

    fn proxy_pointer(&self, entry: &CatalogEntry) -> Result<GoType> {
        Ok(GoType::new(format!("*{}", self.proxy_name_of(entry)?)))
    }

    /// Type as it appears in generated signatures: Hard-wrapped types become their proxy.
    fn wrapped_type(&self, ty: &TypeExpr, imports: &mut Imports) -> Result<GoType> {
        match self.wrapped_entry(ty, WrapStatus::Hard) {
            Some(entry) => {
                let descriptor = &entry.descriptor;
                let stars = descriptor.depth + usize::from(descriptor.is_interface());
                Ok(GoType::new(format!(
                    "{}{}",
                    "*".repeat(stars),
                    self.proxy_name_of(entry)?
                )))
            }
            None => self.render_type(ty, imports),
        }
    }

    fn render_type(&self, ty: &TypeExpr, imports: &mut Imports) -> Result<GoType> {
        Ok(GoType::new(self.type_text(ty, imports)?))
    }

    fn type_text(&self, ty: &TypeExpr, imports: &mut Imports) -> Result<String> {
        Ok(match ty {
            TypeExpr::Error => "error".to_string(),
            TypeExpr::Basic(name) => name.clone(),
            TypeExpr::Named(named) => {
                let package = self.query.package_name(&named.path)?;
                let alias = imports.qualifier(&named.path, &package);
                format!("{alias}.{}", named.name)
            }
            TypeExpr::Pointer(elem) => format!("*{}", self.type_text(elem, imports)?),
            TypeExpr::Slice(elem) => format!("[]{}", self.type_text(elem, imports)?),
            TypeExpr::Array { len, elem } => format!("[{len}]{}", self.type_text(elem, imports)?),
            TypeExpr::Map { key, value } => format!(
                "map[{}]{}",
                self.type_text(key, imports)?,
                self.type_text(value, imports)?
            ),
            TypeExpr::Chan { dir, elem } => {
                let elem = self.type_text(elem, imports)?;
                match dir {
                    ChanDir::Both => format!("chan {elem}"),
                    ChanDir::Send => format!("chan<- {elem}"),
                    ChanDir::Recv => format!("<-chan {elem}"),
                }
            }
            TypeExpr::Struct => "struct{}".to_string(),
            TypeExpr::Interface => "interface{}".to_string(),
        })
    }
}

/// Roots whose package and type names coincide would overwrite each other's unit.
fn check_unique_names(units: &[OutputUnit]) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for unit in units {
        for name in [unit.file_name.as_str(), unit.proxy_name.as_str()] {
            if let Some(first) = seen.insert(name, unit.root_key.as_str()) {
                return Err(ProxyError::NameCollision {
                    name: name.to_string(),
                    first: first.to_string(),
                    second: unit.root_key.clone(),
                });
            }
        }
    }
    Ok(())
}
