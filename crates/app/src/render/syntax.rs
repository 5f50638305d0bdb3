//! Minimal TypeScript syntax tree and its single serializer.
//!
//! Renderers build these values; only the `Display` impls below produce text.

use std::fmt;

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Str(String),
    Bool(bool),
    Int(i64),
    /// A JSON value, written as a literal.
    Json(serde_json::Value),
    This,
    /// `object.property`, or `object['property']` when not an identifier.
    Member(Box<Expr>, String),
    Call(Box<Expr>, Vec<Expr>),
    New(String, Vec<Expr>),
    Array(Vec<Expr>),
    Cast(Box<Expr>, String),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// `Owner.property` for a static member.
    pub fn path(owner: &str, property: impl Into<String>) -> Self {
        Self::Member(Box::new(Self::ident(owner)), property.into())
    }

    #[must_use]
    pub fn member(self, property: impl Into<String>) -> Self {
        Self::Member(Box::new(self), property.into())
    }

    #[must_use]
    pub fn call(self, args: Vec<Expr>) -> Self {
        Self::Call(Box::new(self), args)
    }

    #[must_use]
    pub fn cast(self, ty: impl Into<String>) -> Self {
        Self::Cast(Box::new(self), ty.into())
    }

    pub fn new_of(ty: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::New(ty.into(), args)
    }
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Assign(Expr, Expr),
    Const { name: String, ty: String, value: Expr },
    Super(Vec<Expr>),
    Return(Expr),
    Comment(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// A static class field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub visibility: Visibility,
    pub name: String,
    pub ty: String,
    pub init: Option<Expr>,
}

/// A static getter.
#[derive(Debug, Clone, PartialEq)]
pub struct Getter {
    pub name: String,
    pub ty: String,
    pub body: Expr,
}

/// A static class method.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub visibility: Visibility,
    pub name: String,
    pub params: Vec<(String, String)>,
    pub returns: String,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub extends: Option<String>,
    pub fields: Vec<Field>,
    pub getters: Vec<Getter>,
    pub methods: Vec<Method>,
    pub constructor: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Import {
    /// `import * as Alias from 'module';`
    Namespace { alias: String, module: String },
    /// `import { A, B } from 'module';`
    Named { names: Vec<String>, module: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Class(ClassDecl),
    Stmt(Stmt),
}

/// A whole source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub header: Vec<String>,
    pub imports: Vec<Import>,
    pub items: Vec<Item>,
}

const INDENT: &str = "  ";

impl Module {
    /// Serialize to TypeScript source, ending with a newline.
    #[must_use]
    pub fn to_source(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.header {
            writeln!(f, "// {line}")?;
        }
        // Whether nothing has been written yet, and whether the last line is blank.
        let mut empty = self.header.is_empty();
        let mut at_blank = !empty;
        if at_blank {
            f.write_str("\n")?;
        }
        for import in &self.imports {
            match import {
                Import::Namespace { alias, module } => {
                    writeln!(f, "import * as {alias} from {};", quote(module))?;
                }
                Import::Named { names, module } => {
                    let names = names.join(", ");
                    writeln!(f, "import {{ {names} }} from {};", quote(module))?;
                }
            }
            empty = false;
            at_blank = false;
        }
        let mut previous: Option<&Item> = None;
        for item in &self.items {
            // Consecutive top-level statements stay together.
            let grouped = matches!((previous, item), (Some(Item::Stmt(_)), Item::Stmt(_)));
            if !grouped && !empty && !at_blank {
                f.write_str("\n")?;
            }
            previous = Some(item);
            match item {
                Item::Class(class) => write_class(f, class)?,
                Item::Stmt(stmt) => write_stmt(f, stmt, 0)?,
            }
            empty = false;
            at_blank = false;
        }
        Ok(())
    }
}

fn write_class(f: &mut impl fmt::Write, class: &ClassDecl) -> fmt::Result {
    write!(f, "export class {}", class.name)?;
    if let Some(base) = &class.extends {
        write!(f, " extends {base}")?;
    }
    f.write_str(" {\n")?;

    let mut first = class.fields.is_empty();
    let mut separate = |f: &mut dyn fmt::Write| -> fmt::Result {
        if !first {
            f.write_str("\n")?;
        }
        first = false;
        Ok(())
    };

    for field in &class.fields {
        write!(
            f,
            "{INDENT}{} static {}: {}",
            visibility(field.visibility),
            field.name,
            field.ty
        )?;
        if let Some(init) = &field.init {
            write!(f, " = {init}")?;
        }
        f.write_str(";\n")?;
    }

    for getter in &class.getters {
        separate(f)?;
        writeln!(f, "{INDENT}public static get {}(): {} {{", getter.name, getter.ty)?;
        writeln!(f, "{INDENT}{INDENT}return {};", getter.body)?;
        writeln!(f, "{INDENT}}}")?;
    }

    for method in &class.methods {
        separate(f)?;
        let params = method
            .params
            .iter()
            .map(|(name, ty)| format!("{name}: {ty}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            f,
            "{INDENT}{} static {}({params}): {} {{",
            visibility(method.visibility),
            method.name,
            method.returns
        )?;
        write_block(f, &method.body, 2)?;
        writeln!(f, "{INDENT}}}")?;
    }

    if let Some(body) = &class.constructor {
        separate(f)?;
        writeln!(f, "{INDENT}public constructor() {{")?;
        write_block(f, body, 2)?;
        writeln!(f, "{INDENT}}}")?;
    }

    f.write_str("}\n")
}

fn write_block(f: &mut impl fmt::Write, body: &[Stmt], depth: usize) -> fmt::Result {
    body.iter().try_for_each(|stmt| write_stmt(f, stmt, depth))
}

fn write_stmt(f: &mut impl fmt::Write, stmt: &Stmt, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    match stmt {
        Stmt::Expr(value) => writeln!(f, "{pad}{value};"),
        Stmt::Assign(target, value) => writeln!(f, "{pad}{target} = {value};"),
        Stmt::Const { name, ty, value } => writeln!(f, "{pad}const {name}: {ty} = {value};"),
        Stmt::Super(args) => writeln!(f, "{pad}super({});", List(args)),
        Stmt::Return(value) => writeln!(f, "{pad}return {value};"),
        Stmt::Comment(text) => writeln!(f, "{pad}// {text}"),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => f.write_str(name),
            Self::Str(text) => f.write_str(&quote(text)),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Int(number) => write!(f, "{number}"),
            Self::Json(json) => write!(f, "{json}"),
            Self::This => f.write_str("this"),
            Self::Member(object, property) if is_identifier(property) => {
                write!(f, "{object}.{property}")
            }
            Self::Member(object, property) => write!(f, "{object}[{}]", quote(property)),
            Self::Call(callee, args) => write!(f, "{callee}({})", List(args)),
            Self::New(ty, args) => write!(f, "new {ty}({})", List(args)),
            Self::Array(items) => write!(f, "[{}]", List(items)),
            Self::Cast(inner, ty) => write!(f, "{inner} as {ty}"),
        }
    }
}

/// Comma-separated expressions.
struct List<'a>(&'a [Expr]);

impl fmt::Display for List<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, item) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

fn visibility(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public => "public",
        Visibility::Private => "private",
    }
}

/// Single-quoted string literal.
pub(crate) fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_escape_quotes_and_backslashes() {
        assert_eq!(quote(r"it's a\b"), r"'it\'s a\\b'");
    }

    #[test]
    fn should_use_bracket_access_for_non_identifiers() {
        let value = Expr::ident("settings").member("night-mode");
        assert_eq!(value.to_string(), "settings['night-mode']");
        let value = Expr::ident("settings").member("nightMode");
        assert_eq!(value.to_string(), "settings.nightMode");
    }

    #[test]
    fn should_accept_unicode_identifiers() {
        assert!(is_identifier("Tür_links"));
        assert!(!is_identifier("1_Buero"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn should_render_class_with_members() {
        let module = Module {
            header: vec!["generated".to_string()],
            imports: vec![Import::Named {
                names: vec!["RoomBase".to_string()],
                module: "runtime".to_string(),
            }],
            items: vec![Item::Class(ClassDecl {
                name: "RoomA".to_string(),
                extends: Some("RoomBase".to_string()),
                fields: vec![Field {
                    visibility: Visibility::Public,
                    name: "roomName".to_string(),
                    ty: "string".to_string(),
                    init: Some(Expr::str("A")),
                }],
                getters: Vec::new(),
                methods: vec![Method {
                    visibility: Visibility::Public,
                    name: "initialize".to_string(),
                    params: Vec::new(),
                    returns: "void".to_string(),
                    body: vec![Stmt::Expr(Expr::path("Hooks", "run").call(vec![Expr::Int(1)]))],
                }],
                constructor: None,
            })],
        };
        let expected = "\
// generated

import { RoomBase } from 'runtime';

export class RoomA extends RoomBase {
  public static roomName: string = 'A';

  public static initialize(): void {
    Hooks.run(1);
  }
}
";
        assert_eq!(module.to_source(), expected);
    }

    #[test]
    fn should_render_json_literals() {
        let value = Expr::Json(serde_json::json!({ "b": [1, 2], "a": "x" }));
        assert_eq!(value.to_string(), r#"{"a":"x","b":[1,2]}"#);
    }
}
