//! Line-oriented module parser
//!
//! Grammar, one construct per line:
//!
//! ```text
//! module Math.Utils
//!
//! import Prelude
//!
//! -- squares a number
//! def square x = mul x x
//! ```
//!
//! A module declaration must come first, imports must precede definitions,
//! and definition bodies are single-line application expressions.

use crate::ast::{Def, Expr, ModuleAst};
use veld_config::CodegenConfig;
use veld_make::{Module, ModuleId, ParseError, SourceOrigin};

pub fn parse_module(
    origin: &SourceOrigin,
    text: &str,
    config: &CodegenConfig,
) -> Result<Module<ModuleAst>, ParseError> {
    let mut name: Option<ModuleId> = None;
    let mut imports: Vec<ModuleId> = Vec::new();
    let mut defs: Vec<Def> = Vec::new();
    let mut pending_comments: Vec<String> = Vec::new();

    let fail = |line_no: usize, line: &str, message: String| {
        let mut full = format!("line {}: {}", line_no, message);
        if config.verbose_errors {
            full.push_str(&format!(" in '{}'", line));
        }
        ParseError::new(origin.label(), full)
    };

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() {
            pending_comments.clear();
            continue;
        }
        if let Some(comment) = line.strip_prefix("--") {
            pending_comments.push(comment.trim().to_string());
            continue;
        }

        if let Some(rest) = line.strip_prefix("module ") {
            if name.is_some() {
                return Err(fail(line_no, line, "duplicate module declaration".into()));
            }
            if !imports.is_empty() || !defs.is_empty() {
                return Err(fail(
                    line_no,
                    line,
                    "module declaration must come first".into(),
                ));
            }
            let id = ModuleId::parse(rest.trim())
                .map_err(|e| fail(line_no, line, e.to_string()))?;
            name = Some(id);
            pending_comments.clear();
            continue;
        }

        if name.is_none() {
            return Err(fail(line_no, line, "expected module declaration".into()));
        }

        if let Some(rest) = line.strip_prefix("import ") {
            if !defs.is_empty() {
                return Err(fail(
                    line_no,
                    line,
                    "imports must precede definitions".into(),
                ));
            }
            let id = ModuleId::parse(rest.trim())
                .map_err(|e| fail(line_no, line, e.to_string()))?;
            imports.push(id);
            pending_comments.clear();
            continue;
        }

        if let Some(rest) = line.strip_prefix("def ") {
            let (head, body_text) = rest
                .split_once('=')
                .ok_or_else(|| fail(line_no, line, "definition has no '='".into()))?;
            let mut words = head.split_whitespace();
            let def_name = words
                .next()
                .ok_or_else(|| fail(line_no, line, "definition has no name".into()))?;
            if !is_identifier(def_name) {
                return Err(fail(
                    line_no,
                    line,
                    format!("invalid definition name '{}'", def_name),
                ));
            }
            let params: Vec<String> = words.map(|w| w.to_string()).collect();
            if let Some(bad) = params.iter().find(|p| !is_identifier(p)) {
                return Err(fail(line_no, line, format!("invalid parameter '{}'", bad)));
            }
            if defs.iter().any(|d| d.name == def_name) {
                return Err(fail(
                    line_no,
                    line,
                    format!("duplicate definition '{}'", def_name),
                ));
            }
            let body = parse_expr(body_text)
                .map_err(|message| fail(line_no, line, message))?;
            defs.push(Def {
                name: def_name.to_string(),
                params,
                body,
                comments: std::mem::take(&mut pending_comments),
                line: line_no,
            });
            continue;
        }

        return Err(fail(line_no, line, "unexpected line".into()));
    }

    let name = name.ok_or_else(|| {
        ParseError::new(origin.label(), "missing module declaration".to_string())
    })?;

    tracing::trace!(
        target: "veld::parse",
        module = %name,
        defs = defs.len(),
        "parsed module body"
    );
    Ok(Module {
        name,
        imports,
        ast: ModuleAst { defs },
    })
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '\'')
}

#[derive(Debug, PartialEq)]
enum Token {
    Ident(String),
    Int(i64),
    Str(String),
    LParen,
    RParen,
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '(' {
            chars.next();
            tokens.push(Token::LParen);
        } else if c == ')' {
            chars.next();
            tokens.push(Token::RParen);
        } else if c == '"' {
            chars.next();
            let mut s = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some(ch) => s.push(ch),
                    None => return Err("unterminated string literal".into()),
                }
            }
            tokens.push(Token::Str(s));
        } else if c.is_ascii_digit() {
            let mut digits = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() {
                    digits.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            let value = digits
                .parse::<i64>()
                .map_err(|_| format!("integer literal '{}' out of range", digits))?;
            tokens.push(Token::Int(value));
        } else if c.is_alphabetic() || c == '_' {
            let mut ident = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_alphanumeric() || d == '_' || d == '\'' {
                    ident.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Ident(ident));
        } else {
            return Err(format!("unexpected character '{}'", c));
        }
    }
    Ok(tokens)
}

/// Parse a single-line expression: atoms left-associated into application.
fn parse_expr(text: &str) -> Result<Expr, String> {
    let tokens = tokenize(text)?;
    let mut pos = 0;
    let expr = parse_app(&tokens, &mut pos)?;
    if pos != tokens.len() {
        return Err("unexpected ')'".into());
    }
    Ok(expr)
}

fn parse_app(tokens: &[Token], pos: &mut usize) -> Result<Expr, String> {
    let mut expr = parse_atom(tokens, pos)?.ok_or_else(|| String::from("empty expression"))?;
    while let Some(arg) = parse_atom(tokens, pos)? {
        expr = Expr::app(expr, arg);
    }
    Ok(expr)
}

fn parse_atom(tokens: &[Token], pos: &mut usize) -> Result<Option<Expr>, String> {
    match tokens.get(*pos) {
        Some(Token::Ident(name)) => {
            *pos += 1;
            Ok(Some(Expr::Var(name.clone())))
        }
        Some(Token::Int(value)) => {
            *pos += 1;
            Ok(Some(Expr::Int(*value)))
        }
        Some(Token::Str(s)) => {
            *pos += 1;
            Ok(Some(Expr::Str(s.clone())))
        }
        Some(Token::LParen) => {
            *pos += 1;
            let inner = parse_app(tokens, pos)?;
            match tokens.get(*pos) {
                Some(Token::RParen) => {
                    *pos += 1;
                    Ok(Some(inner))
                }
                _ => Err("missing ')'".into()),
            }
        }
        Some(Token::RParen) | None => Ok(None),
    }
}
