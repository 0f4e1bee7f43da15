//! JavaScript code generation
//!
//! Each module compiles to a CommonJS file: one `require` per import, one
//! curried function per definition, every definition exported. Name
//! resolution order is parameters, then local definitions, then imported
//! exports, then `__prim_` intrinsics; anything else is a compile error.

use crate::ast::{Def, Expr, ModuleAst};
use std::collections::{HashMap, HashSet};
use veld_config::CodegenConfig;
use veld_make::{CompiledArtifact, CompileError, Module, ModuleInterface};

/// Builtin arithmetic the optimizer may fold when both operands are
/// integer literals.
const FOLDABLE: [&str; 3] = ["add", "sub", "mul"];

struct Scope<'a> {
    params: &'a [String],
    locals: &'a HashSet<String>,
    /// Imported export name -> dotted module that provides it
    imports: &'a HashMap<String, String>,
}

impl Scope<'_> {
    fn is_local(&self, name: &str) -> bool {
        self.params.iter().any(|p| p == name) || self.locals.contains(name)
    }
}

pub fn compile(
    module: &Module<ModuleAst>,
    deps: &[ModuleInterface],
    config: &CodegenConfig,
) -> Result<CompiledArtifact, CompileError> {
    let mut import_order: Vec<String> = Vec::new();
    let mut imports: HashMap<String, String> = HashMap::new();
    for import in &module.imports {
        let dotted = import.to_string();
        let interface = deps
            .iter()
            .find(|i| i.module == dotted)
            .ok_or_else(|| CompileError::MissingInterface {
                import: dotted.clone(),
            })?;
        if !import_order.contains(&dotted) {
            import_order.push(dotted.clone());
        }
        // A later import shadows an earlier one providing the same name.
        for export in &interface.exports {
            imports.insert(export.clone(), dotted.clone());
        }
    }

    let locals: HashSet<String> = module.ast.defs.iter().map(|d| d.name.clone()).collect();

    let mut code = String::from("\"use strict\";\n");
    for dotted in &import_order {
        code.push_str(&format!(
            "var {} = require(\"../{}/index.js\");\n",
            alias_of(dotted),
            dotted
        ));
    }

    for def in &module.ast.defs {
        code.push('\n');
        if config.keep_comments {
            for comment in &def.comments {
                code.push_str(&format!("// {}\n", comment));
            }
        }
        let scope = Scope {
            params: &def.params,
            locals: &locals,
            imports: &imports,
        };
        let body = if config.optimize {
            fold(&def.body, &scope)
        } else {
            def.body.clone()
        };
        let body_js = emit_expr(&body, &scope, def, config)?;
        code.push_str(&format!("var {} = {};\n", def.name, curry(&def.params, &body_js)));
        code.push_str(&format!("exports.{} = {};\n", def.name, def.name));
    }

    let interface = ModuleInterface {
        module: module.name.to_string(),
        exports: module.ast.defs.iter().map(|d| d.name.clone()).collect(),
    };
    tracing::trace!(
        target: "veld::make",
        module = %module.name,
        exports = interface.exports.len(),
        "generated code"
    );
    Ok(CompiledArtifact {
        code,
        interface,
    })
}

fn alias_of(dotted: &str) -> String {
    dotted.replace('.', "_")
}

fn curry(params: &[String], body: &str) -> String {
    let mut out = body.to_string();
    for param in params.iter().rev() {
        out = format!("function ({}) {{ return {}; }}", param, out);
    }
    out
}

fn emit_expr(
    expr: &Expr,
    scope: &Scope<'_>,
    def: &Def,
    config: &CodegenConfig,
) -> Result<String, CompileError> {
    match expr {
        Expr::Int(value) => Ok(value.to_string()),
        Expr::Str(s) => Ok(format!("\"{}\"", escape(s))),
        Expr::Var(name) => {
            if scope.is_local(name) {
                Ok(name.clone())
            } else if let Some(module) = scope.imports.get(name) {
                Ok(format!("{}.{}", alias_of(module), name))
            } else if let Some(prim) = name.strip_prefix("__prim_") {
                Ok(format!("$prims.{}", prim))
            } else {
                let context = if config.verbose_errors {
                    format!(" in def '{}' (line {})", def.name, def.line)
                } else {
                    format!(" in def '{}'", def.name)
                };
                Err(CompileError::UnresolvedName {
                    name: name.clone(),
                    context,
                })
            }
        }
        Expr::App(f, arg) => Ok(format!(
            "{}({})",
            emit_expr(f, scope, def, config)?,
            emit_expr(arg, scope, def, config)?
        )),
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Fold integer applications of builtin arithmetic.
///
/// `add 1 2` becomes `3` when `add` resolves to the builtin prelude (or is
/// the intrinsic directly) and both arguments are literals. Overflow leaves
/// the application in place.
fn fold(expr: &Expr, scope: &Scope<'_>) -> Expr {
    match expr {
        Expr::App(f, arg) => {
            let f = fold(f, scope);
            let arg = fold(arg, scope);
            if let (Expr::App(inner, x), Expr::Int(b)) = (&f, &arg) {
                if let (Expr::Var(op), Expr::Int(a)) = (inner.as_ref(), x.as_ref()) {
                    if let Some(folded) = fold_arith(op, *a, *b, scope) {
                        return folded;
                    }
                }
            }
            Expr::app(f, arg)
        }
        other => other.clone(),
    }
}

fn fold_arith(op: &str, a: i64, b: i64, scope: &Scope<'_>) -> Option<Expr> {
    let builtin = match op.strip_prefix("__prim_") {
        Some(prim) => FOLDABLE.contains(&prim).then_some(prim),
        None => (!scope.is_local(op)
            && scope.imports.get(op).map(String::as_str) == Some("Prelude")
            && FOLDABLE.contains(&op))
        .then_some(op),
    }?;
    let value = match builtin {
        "add" => a.checked_add(b),
        "sub" => a.checked_sub(b),
        "mul" => a.checked_mul(b),
        _ => None,
    }?;
    Some(Expr::Int(value))
}
