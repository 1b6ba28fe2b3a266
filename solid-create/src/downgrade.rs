//! TypeScript to JavaScript downgrading.
//!
//! The source is parsed with the tree-sitter TypeScript grammars and
//! rewritten through a list of byte-range edits: type-only syntax is cut
//! out, the few TypeScript constructs with runtime meaning (enums,
//! constructor parameter properties, `import x = require()`) are lowered,
//! and everything else, JSX markup included, is kept verbatim.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::{Error, Result};

/// Typed-source flavour of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `.ts`
    TypeScript,
    /// `.tsx`, TypeScript with embedded markup
    Tsx,
}

impl Dialect {
    /// Dialect for a typed-source path, `None` for anything else.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "ts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    /// Extension of the downgraded file.
    pub fn plain_extension(self) -> &'static str {
        match self {
            Dialect::TypeScript => "js",
            Dialect::Tsx => "jsx",
        }
    }

    fn language(self) -> Language {
        match self {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Transform kinds applied by [`downgrade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    /// Strip and lower TypeScript syntax.
    TypeScript,
    /// Handle markup according to [`DowngradeOptions::jsx`].
    Jsx,
}

/// How embedded markup is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum JsxMode {
    /// Leave markup syntax intact for the downstream compiler.
    #[default]
    Preserve,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DowngradeOptions {
    pub transforms: Vec<Transform>,
    pub jsx: JsxMode,
}

impl Default for DowngradeOptions {
    fn default() -> Self {
        DowngradeOptions {
            transforms: vec![Transform::TypeScript, Transform::Jsx],
            jsx: JsxMode::Preserve,
        }
    }
}

/// Downgrade one typed source to plain script.
///
/// Markup is preserved as written. Plain-script input comes back unchanged.
///
/// # Errors
///
/// [`Error::Syntax`] if the text does not parse, [`Error::Unsupported`] for
/// non-ambient namespaces, `export =` and enum members that cannot be numbered.
pub fn downgrade(source: &str, dialect: Dialect, options: &DowngradeOptions) -> Result<String> {
    let tree = parse(source, dialect)?;
    check_syntax(&tree, source)?;

    if !options.transforms.contains(&Transform::TypeScript) {
        return Ok(source.to_string());
    }

    let mut stripper = Stripper::new(source);
    stripper.visit(tree.root_node())?;
    stripper.elide_imports();
    Ok(stripper.finish())
}

fn parse(source: &str, dialect: Dialect) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|e| Error::Grammar(e.to_string()))?;
    parser
        .parse(source, None)
        .ok_or_else(|| Error::Grammar("parser produced no tree".into()))
}

fn check_syntax(tree: &Tree, source: &str) -> Result<()> {
    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }

    let Some(bad) = first_error(root) else {
        return Ok(());
    };
    let position = bad.start_position();
    let snippet = if bad.is_missing() {
        format!("missing {}", bad.kind())
    } else {
        source[bad.byte_range()].chars().take(40).collect()
    };
    Err(Error::Syntax {
        path: PathBuf::from("<input>"),
        line: position.row + 1,
        column: position.column + 1,
        snippet,
    })
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    children(node).into_iter().find_map(first_error)
}

fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Anonymous child token of the given kind, e.g. `?` or `abstract`.
fn token<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    children(node)
        .into_iter()
        .find(|c| !c.is_named() && c.kind() == kind)
}

fn has_modifier(param: Node<'_>) -> bool {
    children(param).iter().any(|c| {
        matches!(c.kind(), "accessibility_modifier" | "override_modifier")
            || (!c.is_named() && c.kind() == "readonly")
    })
}

#[derive(Debug)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

struct Stripper<'s, 't> {
    source: &'s str,
    edits: Vec<Edit>,
    referenced: HashSet<&'s str>,
    imports: Vec<Node<'t>>,
}

impl<'s, 't> Stripper<'s, 't> {
    fn new(source: &'s str) -> Self {
        Stripper {
            source,
            edits: Vec::new(),
            referenced: HashSet::new(),
            imports: Vec::new(),
        }
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        &self.source[node.byte_range()]
    }

    fn visit(&mut self, node: Node<'t>) -> Result<()> {
        match node.kind() {
            "interface_declaration" | "type_alias_declaration" | "ambient_declaration"
            | "function_signature" => {
                self.remove_declaration(node);
                return Ok(());
            }
            "method_signature" | "abstract_method_signature" | "index_signature" => {
                self.remove_statement(node);
                return Ok(());
            }
            "type_annotation"
            | "asserts_annotation"
            | "type_predicate_annotation"
            | "type_parameters"
            | "type_arguments" => {
                self.remove(node.start_byte(), node.end_byte());
                return Ok(());
            }
            "implements_clause" => {
                let start = self.skip_space_back(node.start_byte());
                self.remove(start, node.end_byte());
                return Ok(());
            }
            "accessibility_modifier" | "override_modifier" => {
                self.remove_word(node);
                return Ok(());
            }
            "readonly" if !node.is_named() => {
                self.remove_word(node);
                return Ok(());
            }
            "as_expression" | "satisfies_expression" | "non_null_expression" => {
                if let Some(expr) = named_children(node).into_iter().next() {
                    self.remove(expr.end_byte(), node.end_byte());
                    self.visit(expr)?;
                }
                return Ok(());
            }
            "import_statement" => {
                self.imports.push(node);
                return Ok(());
            }
            "export_statement" => {
                if token(node, "=").is_some() {
                    return Err(Error::Unsupported {
                        construct: "export =",
                        line: node.start_position().row + 1,
                    });
                }
                if token(node, "type").is_some() {
                    self.remove_statement(node);
                    return Ok(());
                }
                if let Some(clause) = named_children(node)
                    .into_iter()
                    .find(|c| c.kind() == "export_clause")
                {
                    let specifiers = named_children(clause);
                    let type_only: Vec<_> = specifiers
                        .iter()
                        .copied()
                        .filter(|s| token(*s, "type").is_some())
                        .collect();
                    if !specifiers.is_empty() && type_only.len() == specifiers.len() {
                        self.remove_statement(node);
                        return Ok(());
                    }
                    for specifier in type_only {
                        self.remove_list_item(specifier);
                    }
                }
            }
            "enum_declaration" => return self.lower_enum(node),
            "internal_module" | "module" if node.is_named() => {
                return Err(Error::Unsupported {
                    construct: "namespace",
                    line: node.start_position().row + 1,
                });
            }
            "abstract_class_declaration" => {
                if let Some(keyword) = token(node, "abstract") {
                    self.remove_word(keyword);
                }
            }
            "public_field_definition" => {
                if token(node, "declare").is_some() || token(node, "abstract").is_some() {
                    self.remove_statement(node);
                    return Ok(());
                }
                self.remove_tokens(node, &["?", "!"]);
            }
            "optional_parameter" => self.remove_tokens(node, &["?"]),
            "required_parameter" => {
                let is_this = node
                    .child_by_field_name("pattern")
                    .is_some_and(|p| p.kind() == "this");
                if is_this {
                    self.remove_list_item(node);
                    return Ok(());
                }
            }
            "variable_declarator" => self.remove_tokens(node, &["!"]),
            "method_definition" => {
                self.remove_tokens(node, &["?"]);
                self.parameter_properties(node);
            }
            "identifier" | "shorthand_property_identifier" => {
                let name = self.text(node);
                self.referenced.insert(name);
                return Ok(());
            }
            _ => {}
        }

        for child in children(node) {
            self.visit(child)?;
        }
        Ok(())
    }

    /// Remove a type-only declaration, together with an `export` around it.
    fn remove_declaration(&mut self, node: Node<'t>) {
        match node.parent() {
            Some(parent) if parent.kind() == "export_statement" => self.remove_statement(parent),
            _ => self.remove_statement(node),
        }
    }

    fn remove_tokens(&mut self, node: Node<'t>, kinds: &[&str]) {
        for child in children(node) {
            if !child.is_named() && kinds.contains(&child.kind()) {
                self.remove(child.start_byte(), child.end_byte());
            }
        }
    }

    /// Constructor parameters with modifiers become `this.x = x;`
    /// assignments, after a top-level `super(...)` call when there is one.
    fn parameter_properties(&mut self, method: Node<'t>) {
        let is_constructor = method
            .child_by_field_name("name")
            .is_some_and(|n| self.text(n) == "constructor");
        if !is_constructor {
            return;
        }
        let (Some(params), Some(body)) = (
            method.child_by_field_name("parameters"),
            method.child_by_field_name("body"),
        ) else {
            return;
        };

        let assignments: String = named_children(params)
            .into_iter()
            .filter(|p| has_modifier(*p))
            .filter_map(|p| p.child_by_field_name("pattern"))
            .map(|pattern| {
                let name = self.text(pattern);
                format!(" this.{name} = {name};")
            })
            .collect();
        if assignments.is_empty() {
            return;
        }

        let super_call = named_children(body).into_iter().find(|stmt| {
            stmt.kind() == "expression_statement"
                && named_children(*stmt).first().is_some_and(|call| {
                    call.kind() == "call_expression"
                        && call
                            .child_by_field_name("function")
                            .is_some_and(|f| f.kind() == "super")
                })
        });
        let at = match super_call {
            Some(stmt) => stmt.end_byte(),
            None => body.start_byte() + 1,
        };
        self.insert(at, assignments);
    }

    fn lower_enum(&mut self, node: Node<'t>) -> Result<()> {
        let (Some(name), Some(body)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("body"),
        ) else {
            return Ok(());
        };
        let name = self.text(name);
        let indent = self.indent_of(node.start_byte());
        let mut next = Some(0.0_f64);
        let mut members: HashSet<&'s str> = HashSet::new();
        let mut out = format!("var {name}; (function ({name}) {{\n");

        for member in named_children(body) {
            let (key_node, value) = match member.kind() {
                "enum_assignment" => match member.child_by_field_name("name") {
                    Some(key) => (key, member.child_by_field_name("value")),
                    None => continue,
                },
                "property_identifier" | "string" | "number" => (member, None),
                _ => continue,
            };
            let key = match key_node.kind() {
                "string" => self.text(key_node).to_string(),
                _ => format!("\"{}\"", self.text(key_node)),
            };

            let line = match value {
                None => {
                    let n = next.ok_or(Error::Unsupported {
                        construct: "enum member without initializer",
                        line: member.start_position().row + 1,
                    })?;
                    next = Some(n + 1.0);
                    format!("{name}[{name}[{key}] = {}] = {key};", format_number(n))
                }
                Some(v) if v.kind() == "string" => {
                    next = None;
                    format!("{name}[{key}] = {};", self.text(v))
                }
                Some(v) => {
                    let expr = self.lower_initializer(v, name, &members)?;
                    if v.kind() == "template_string" {
                        next = None;
                        format!("{name}[{key}] = {expr};")
                    } else {
                        next = parse_number(&expr).map(|n| n + 1.0);
                        format!("{name}[{name}[{key}] = {expr}] = {key};")
                    }
                }
            };
            if key_node.kind() == "property_identifier" {
                members.insert(self.text(key_node));
            }
            out.push_str(&indent);
            out.push_str("    ");
            out.push_str(&line);
            out.push('\n');
        }

        out.push_str(&indent);
        out.push_str(&format!("}})({name} || ({name} = {{}}));"));
        self.replace(node.start_byte(), node.end_byte(), out);
        Ok(())
    }

    /// Render an enum initializer with its types stripped. Earlier members
    /// are only in scope as properties of the enum object, so bare
    /// references to them are qualified.
    fn lower_initializer(
        &mut self,
        value: Node<'t>,
        enum_name: &str,
        members: &HashSet<&'s str>,
    ) -> Result<String> {
        let mut inner = Stripper::new(self.source);
        inner.visit(value)?;
        inner.qualify_members(value, enum_name, members);
        self.referenced.extend(
            inner
                .referenced
                .iter()
                .copied()
                .filter(|name| !members.contains(name)),
        );
        Ok(inner.render(value.start_byte(), value.end_byte()))
    }

    fn qualify_members(&mut self, node: Node<'t>, enum_name: &str, members: &HashSet<&'s str>) {
        if node.kind() == "identifier" {
            let name = self.text(node);
            if members.contains(name) {
                self.replace(node.start_byte(), node.end_byte(), format!("{enum_name}.{name}"));
            }
            return;
        }
        for child in children(node) {
            self.qualify_members(child, enum_name, members);
        }
    }

    /// Resolve the deferred imports now that every value reference is known.
    ///
    /// Type-only imports go entirely. Bindings never referenced as values are
    /// dropped; if none remain the statement goes, otherwise the import
    /// clause is rebuilt from what is left.
    fn elide_imports(&mut self) {
        for import in std::mem::take(&mut self.imports) {
            if token(import, "type").is_some() || token(import, "typeof").is_some() {
                self.remove_statement(import);
                continue;
            }
            let parts = children(import);
            if parts.iter().any(|c| c.kind() == "import_require_clause") {
                if let Some(keyword) = parts.iter().find(|c| c.kind() == "import") {
                    self.replace(keyword.start_byte(), keyword.end_byte(), "const".into());
                }
                continue;
            }
            let Some(clause) = parts.iter().find(|c| c.kind() == "import_clause") else {
                continue;
            };

            let mut total = 0;
            let mut kept = Vec::new();
            let mut named = Vec::new();
            for binding in named_children(*clause) {
                match binding.kind() {
                    "identifier" | "namespace_import" => {
                        total += 1;
                        let local = match binding.kind() {
                            "identifier" => Some(binding),
                            _ => named_children(binding).into_iter().next(),
                        };
                        if local.is_some_and(|l| self.referenced.contains(self.text(l))) {
                            kept.push(self.text(binding).to_string());
                        }
                    }
                    "named_imports" => {
                        for specifier in named_children(binding) {
                            if specifier.kind() != "import_specifier" {
                                continue;
                            }
                            total += 1;
                            let local = specifier
                                .child_by_field_name("alias")
                                .or_else(|| specifier.child_by_field_name("name"));
                            let type_only = token(specifier, "type").is_some()
                                || token(specifier, "typeof").is_some();
                            if !type_only
                                && local.is_some_and(|l| self.referenced.contains(self.text(l)))
                            {
                                named.push(self.text(specifier));
                            }
                        }
                    }
                    _ => {}
                }
            }

            if !named.is_empty() {
                kept.push(format!("{{ {} }}", named.join(", ")));
            }
            let kept_count = kept.len() - usize::from(!named.is_empty()) + named.len();
            if kept_count == total {
                continue;
            }
            if kept.is_empty() {
                self.remove_statement(import);
            } else {
                self.replace(clause.start_byte(), clause.end_byte(), kept.join(", "));
            }
        }
    }

    fn remove(&mut self, start: usize, end: usize) {
        self.replace(start, end, String::new());
    }

    fn insert(&mut self, at: usize, text: String) {
        self.replace(at, at, text);
    }

    fn replace(&mut self, start: usize, end: usize, text: String) {
        self.edits.push(Edit { start, end, text });
    }

    /// Remove a node and the blanks after it.
    fn remove_word(&mut self, node: Node<'_>) {
        let end = self.skip_space(node.end_byte());
        self.remove(node.start_byte(), end);
    }

    /// Remove a statement-like node, a trailing `;`, and its whole line when
    /// nothing else shares it.
    fn remove_statement(&mut self, node: Node<'_>) {
        let bytes = self.source.as_bytes();
        let mut start = node.start_byte();
        let mut end = node.end_byte();

        let after = self.skip_space(end);
        if bytes.get(after) == Some(&b';') {
            end = after + 1;
        }

        let line_start = self.source[..start].rfind('\n').map_or(0, |i| i + 1);
        let leading_blank = self.source[line_start..start]
            .bytes()
            .all(|b| b == b' ' || b == b'\t');
        let mut eol = self.skip_space(end);
        if bytes.get(eol) == Some(&b'\r') {
            eol += 1;
        }
        if leading_blank && (eol == bytes.len() || bytes[eol] == b'\n') {
            start = line_start;
            end = (eol + 1).min(bytes.len());
        }
        self.remove(start, end);
    }

    /// Remove an element of a comma-separated list with its separator.
    fn remove_list_item(&mut self, node: Node<'_>) {
        let bytes = self.source.as_bytes();
        let start = node.start_byte();
        let after = self.skip_blank(node.end_byte());
        if bytes.get(after) == Some(&b',') {
            let end = self.skip_blank(after + 1);
            self.remove(start, end);
            return;
        }
        let before = self.skip_blank_back(start);
        if before > 0 && bytes[before - 1] == b',' {
            self.remove(before - 1, node.end_byte());
        } else {
            self.remove(start, node.end_byte());
        }
    }

    fn skip_space(&self, mut at: usize) -> usize {
        let bytes = self.source.as_bytes();
        while at < bytes.len() && matches!(bytes[at], b' ' | b'\t') {
            at += 1;
        }
        at
    }

    fn skip_space_back(&self, mut at: usize) -> usize {
        let bytes = self.source.as_bytes();
        while at > 0 && matches!(bytes[at - 1], b' ' | b'\t') {
            at -= 1;
        }
        at
    }

    fn skip_blank(&self, mut at: usize) -> usize {
        let bytes = self.source.as_bytes();
        while at < bytes.len() && bytes[at].is_ascii_whitespace() {
            at += 1;
        }
        at
    }

    fn skip_blank_back(&self, mut at: usize) -> usize {
        let bytes = self.source.as_bytes();
        while at > 0 && bytes[at - 1].is_ascii_whitespace() {
            at -= 1;
        }
        at
    }

    fn indent_of(&self, at: usize) -> String {
        let line_start = self.source[..at].rfind('\n').map_or(0, |i| i + 1);
        self.source[line_start..at]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect()
    }

    fn finish(self) -> String {
        let end = self.source.len();
        self.render(0, end)
    }

    /// Apply the edits falling inside `start..end` to that slice of the
    /// source. Insertions at a position go before removals starting there;
    /// edits swallowed by an earlier removal are dropped.
    fn render(mut self, start: usize, end: usize) -> String {
        self.edits.retain(|e| e.start >= start && e.end <= end);
        self.edits
            .sort_by_key(|e| (e.start, e.start != e.end, std::cmp::Reverse(e.end)));

        let mut out = String::with_capacity(end - start);
        let mut cursor = start;
        for edit in &self.edits {
            let insertion = edit.start == edit.end;
            if (insertion && edit.start < cursor) || (!insertion && edit.end <= cursor) {
                continue;
            }
            let from = edit.start.max(cursor);
            out.push_str(&self.source[cursor..from]);
            out.push_str(&edit.text);
            cursor = edit.end.max(cursor);
        }
        out.push_str(&self.source[cursor..end]);
        out
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let mut text = text.trim();
    while let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        text = inner.trim();
    }
    let text = text.replace('_', "");
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start().to_string()),
        None => (false, text),
    };
    let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()? as f64
    } else if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2).ok()? as f64
    } else if let Some(oct) = digits.strip_prefix("0o").or_else(|| digits.strip_prefix("0O")) {
        i64::from_str_radix(oct, 8).ok()? as f64
    } else {
        digits.parse::<f64>().ok()?
    };
    Some(if negative { -value } else { value })
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
