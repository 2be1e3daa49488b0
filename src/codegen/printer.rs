use crate::codegen::ast::{Decl, Expr, FuncDecl, GoFile, ParamDecl, Stmt, StructDecl};
use std::fmt::Write;

/// gofmt-style printer for a `GoFile`: tab indentation, aligned struct fields and composite
/// literal values.
pub fn render(file: &GoFile) -> String {
    let mut out = String::new();

    if let Some(comment) = &file.package_comment {
        for line in comment.lines() {
            let _ = writeln!(out, "// {line}");
        }
    }
    let _ = writeln!(out, "package {}", file.package);

    if !file.imports.is_empty() {
        out.push('\n');
        let imports: Vec<(&str, &str)> = file.imports.iter().collect();
        if let [(path, alias)] = imports.as_slice() {
            let _ = writeln!(out, "import {}", import_spec(path, alias));
        } else {
            out.push_str("import (\n");
            for (path, alias) in imports {
                let _ = writeln!(out, "\t{}", import_spec(path, alias));
            }
            out.push_str(")\n");
        }
    }

    for decl in &file.decls {
        out.push('\n');
        match decl {
            Decl::Struct(decl) => render_struct(&mut out, decl),
            Decl::Func(decl) => render_func(&mut out, decl),
        }
    }

    out
}

fn import_spec(path: &str, alias: &str) -> String {
    let last = path.rsplit('/').next().unwrap_or(path);
    if last == alias {
        format!("{path:?}")
    } else {
        format!("{alias} {path:?}")
    }
}

fn render_struct(out: &mut String, decl: &StructDecl) {
    let width = decl.fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let _ = writeln!(out, "type {} struct {{", decl.name);
    for field in &decl.fields {
        let _ = writeln!(out, "\t{:<width$} {}", field.name, field.ty.as_str());
    }
    out.push_str("}\n");
}

fn render_func(out: &mut String, decl: &FuncDecl) {
    out.push_str("func ");
    if let Some(receiver) = &decl.receiver {
        let _ = write!(out, "({} {}) ", receiver.name, receiver.ty.as_str());
    }
    let params: Vec<String> = decl.params.iter().map(param_text).collect();
    let _ = write!(out, "{}({})", decl.name, params.join(", "));

    match decl.results.as_slice() {
        [] => {}
        [single] => {
            let _ = write!(out, " {}", single.as_str());
        }
        many => {
            let results: Vec<&str> = many.iter().map(|r| r.as_str()).collect();
            let _ = write!(out, " ({})", results.join(", "));
        }
    }

    out.push_str(" {\n");
    render_block(out, &decl.body, 1);
    out.push_str("}\n");
}

fn param_text(param: &ParamDecl) -> String {
    if param.variadic {
        format!("{} ...{}", param.name, param.ty.as_str())
    } else {
        format!("{} {}", param.name, param.ty.as_str())
    }
}

fn render_block(out: &mut String, stmts: &[Stmt], depth: usize) {
    for stmt in stmts {
        render_stmt(out, stmt, depth);
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn render_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    if matches!(stmt, Stmt::Blank) {
        out.push('\n');
        return;
    }

    indent(out, depth);
    match stmt {
        Stmt::If { init, cond, then } => {
            out.push_str("if ");
            if let Some(init) = init {
                out.push_str(&simple_stmt(init, depth));
                out.push_str("; ");
            }
            let _ = writeln!(out, "{} {{", expr_text(cond, depth));
            render_block(out, then, depth + 1);
            indent(out, depth);
            out.push_str("}\n");
        }
        Stmt::Range {
            key,
            value,
            over,
            body,
        } => {
            let _ = writeln!(
                out,
                "for {key}, {value} := range {} {{",
                expr_text(over, depth)
            );
            render_block(out, body, depth + 1);
            indent(out, depth);
            out.push_str("}\n");
        }
        other => {
            out.push_str(&simple_stmt(other, depth));
            out.push('\n');
        }
    }
}

fn simple_stmt(stmt: &Stmt, depth: usize) -> String {
    match stmt {
        Stmt::Define { names, value } => format!("{} := {}", names.join(", "), expr_text(value, depth)),
        Stmt::Assign { target, value } => {
            format!("{} = {}", expr_text(target, depth), expr_text(value, depth))
        }
        Stmt::Return(values) if values.is_empty() => "return".to_string(),
        Stmt::Return(values) => {
            let values: Vec<String> = values.iter().map(|v| expr_text(v, depth)).collect();
            format!("return {}", values.join(", "))
        }
        Stmt::Expr(expr) => expr_text(expr, depth),
        Stmt::If { .. } | Stmt::Range { .. } | Stmt::Blank => String::new(),
    }
}

/// Render an expression. `depth` is the indentation of the enclosing statement, needed for
/// multi-line composite literals.
fn expr_text(expr: &Expr, depth: usize) -> String {
    match expr {
        Expr::Ident(name) => name.clone(),
        Expr::Nil => "nil".to_string(),
        Expr::Selector(base, field) => format!("{}.{field}", operand_text(base, depth)),
        Expr::Call { func, args, spread } => {
            let args: Vec<String> = args.iter().map(|a| expr_text(a, depth)).collect();
            let spread = if *spread { "..." } else { "" };
            format!("{}({}{spread})", operand_text(func, depth), args.join(", "))
        }
        Expr::AddrOf(inner) => format!("&{}", unary_operand(inner, depth)),
        Expr::Deref(inner) => format!("*{}", unary_operand(inner, depth)),
        Expr::Composite { ty, fields } => {
            if fields.is_empty() {
                return format!("{}{{}}", ty.as_str());
            }
            let width = fields.iter().map(|(name, _)| name.len() + 1).max().unwrap_or(0);
            let mut text = format!("{}{{\n", ty.as_str());
            for (name, value) in fields {
                let key = format!("{name}:");
                text.push_str(&"\t".repeat(depth + 1));
                let _ = writeln!(text, "{key:<width$} {},", expr_text(value, depth + 1));
            }
            text.push_str(&"\t".repeat(depth));
            text.push('}');
            text
        }
        Expr::Binary { op, lhs, rhs } => {
            format!("{} {op} {}", expr_text(lhs, depth), expr_text(rhs, depth))
        }
        Expr::Index(base, at) => format!("{}[{}]", operand_text(base, depth), expr_text(at, depth)),
        Expr::TypeAssert(base, ty) => format!("{}.({})", operand_text(base, depth), ty.as_str()),
        Expr::Make { ty, len } => format!("make({}, {})", ty.as_str(), expr_text(len, depth)),
    }
}

/// Operand position: unary and binary expressions need parentheses before `.`, `(` and `[`.
fn operand_text(expr: &Expr, depth: usize) -> String {
    match expr {
        Expr::Binary { .. } | Expr::Deref(_) | Expr::AddrOf(_) => {
            format!("({})", expr_text(expr, depth))
        }
        _ => expr_text(expr, depth),
    }
}

/// Operand of `*` or `&`: unary operators nest without parentheses.
fn unary_operand(expr: &Expr, depth: usize) -> String {
    match expr {
        Expr::Binary { .. } => format!("({})", expr_text(expr, depth)),
        _ => expr_text(expr, depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::ast::{Field, GoType};

    fn sample() -> GoFile {
        let mut file = GoFile::new("proxy");
        file.package_comment = Some("Generated".to_string());
        let alias = file.imports.qualifier("example.com/shop", "shop");
        file.decls.push(Decl::Struct(StructDecl {
            name: "ShopCart".to_string(),
            fields: vec![
                Field::new("inner", GoType::new(format!("{alias}.Cart"))),
                Field::new("errorTransformer", GoType::new("Transformer")),
            ],
        }));
        file.decls.push(Decl::Func(FuncDecl {
            receiver: None,
            name: "WrapShopCart".to_string(),
            params: vec![ParamDecl {
                name: "inner".to_string(),
                ty: GoType::new("*shop.Cart"),
                variadic: false,
            }],
            results: vec![GoType::new("*ShopCart")],
            body: vec![
                Stmt::If {
                    init: None,
                    cond: Expr::ident("inner").is_nil(),
                    then: vec![Stmt::Return(vec![Expr::Nil])],
                },
                Stmt::Blank,
                Stmt::Return(vec![Expr::Composite {
                    ty: GoType::new("ShopCart"),
                    fields: vec![("inner".to_string(), Expr::ident("inner").deref())],
                }
                .addr()]),
            ],
        }));
        file
    }

    #[test]
    fn test_renders_gofmt_layout() {
        let expected = "\
// Generated
package proxy

import \"example.com/shop\"

type ShopCart struct {
\tinner            shop.Cart
\terrorTransformer Transformer
}

func WrapShopCart(inner *shop.Cart) *ShopCart {
\tif inner == nil {
\t\treturn nil
\t}

\treturn &ShopCart{
\t\tinner: *inner,
\t}
}
";
        assert_eq!(render(&sample()), expected);
    }

    #[test]
    fn test_unary_operands_are_parenthesized() {
        let expr = Expr::ident("p").deref().dot("inner");
        assert_eq!(expr_text(&expr, 0), "(*p).inner");
        let nested = Expr::ident("inner").deref().deref();
        assert_eq!(expr_text(&nested, 0), "**inner");
        let call = Expr::ident("s").dot("inner").dot("Do").call_spread(vec![Expr::ident("xs")]);
        assert_eq!(expr_text(&call, 0), "s.inner.Do(xs...)");
    }

    #[test]
    fn test_type_assertion_in_if_init() {
        let mut out = String::new();
        let stmt = Stmt::If {
            init: Some(Box::new(Stmt::Define {
                names: vec!["p0Proxy".to_string(), "ok".to_string()],
                value: Expr::ident("p0").assert_type(GoType::new("*ShopCart")),
            })),
            cond: Expr::ident("ok"),
            then: vec![Stmt::Assign {
                target: Expr::ident("p0"),
                value: Expr::ident("p0Proxy").dot("inner"),
            }],
        };
        render_stmt(&mut out, &stmt, 1);
        assert_eq!(
            out,
            "\tif p0Proxy, ok := p0.(*ShopCart); ok {\n\t\tp0 = p0Proxy.inner\n\t}\n"
        );
    }
}
