//! # Registry Source Transformer
//!
//! The registry source file is a TypeScript module that imports every metadata
//! artifact and indexes it in a single `MetadataFiles` map declaration. It is
//! also edited by humans, so the transformer never regenerates it from
//! scratch: it parses the file into a statement-level document model, applies
//! two typed edits (import insertion, registry-entry insertion), and
//! serializes once. Everything it does not understand is carried through
//! byte-for-byte.
//!
//! Both edits are idempotent, keyed on the generated import identifier derived
//! from the [`MetadataKey`]. Registering an artifact that is already present
//! is a no-op and leaves the file untouched. Generated imports and map entries
//! are both kept in identifier order, so the final file content never depends
//! on the order adapters were processed in.
//!
//! Failure semantics: all edits happen on the in-memory document; the file is
//! overwritten once, atomically, only after every edit succeeded. An
//! unparseable file or an unexpected `MetadataFiles` shape aborts with no
//! mutation on disk.

use crate::chains::Chain;
use crate::errors::MetadataBuildError;
use crate::file_writer::{write_and_format, SourceFormatter};
use crate::key_builder::MetadataKey;
use crate::protocols::Protocol;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// One entry of the `MetadataFiles` map: the four key components plus the
/// import identifier the entry's value refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub protocol_id: Protocol,
    pub product_id: String,
    pub chain_id: Chain,
    pub file_key: String,
    pub identifier: String,
}

impl RegistryEntry {
    fn from_key(key: &MetadataKey) -> Self {
        Self {
            protocol_id: key.protocol_id,
            product_id: key.product_id.clone(),
            chain_id: key.chain_id,
            file_key: key.file_key.clone(),
            identifier: key.identifier(),
        }
    }

    fn render(&self) -> String {
        format!(
            "  [\n    metadataKey({{\n      protocolId: Protocol.{},\n      productId: '{}',\n      chainId: Chain.{},\n      fileKey: '{}',\n    }}),\n    {},\n  ],\n",
            self.protocol_id.key(),
            self.product_id,
            self.chain_id.key(),
            self.file_key,
            self.identifier,
        )
    }
}

/// Deterministic total order over registry entries: byte-wise, case-sensitive
/// comparison of the generated identifier. Re-applied after every insertion so
/// two build runs over different protocol subsets converge to the same file.
pub fn sort_registry_entries(entries: &mut [RegistryEntry]) {
    entries.sort_by(|a, b| a.identifier.cmp(&b.identifier));
}

#[derive(Debug)]
struct ImportStatement {
    /// Default-import binding, if any. Named and namespace imports are kept
    /// verbatim but never match a generated identifier.
    identifier: Option<String>,
    path: Option<String>,
    raw: String,
}

impl ImportStatement {
    fn generated(identifier: &str, path: &str) -> Self {
        Self {
            identifier: Some(identifier.to_string()),
            path: Some(path.to_string()),
            raw: format!("import {identifier} from '{path}'\n"),
        }
    }

    /// Whether this import has the shape the transformer generates: a default
    /// binding pointing at a metadata artifact. Hand-written imports never
    /// match and are never reordered.
    fn is_generated(&self) -> bool {
        self.identifier.is_some()
            && self
                .path
                .as_deref()
                .map_or(false, |p| p.starts_with("./adapters/") && p.ends_with(".json"))
    }
}

#[derive(Debug)]
struct MetadataFilesDecl {
    /// Declaration text up to and including the opening `([`, verbatim.
    prefix: String,
    /// Text from the closing `]` through the end of the statement, verbatim.
    suffix: String,
    entries: Vec<RegistryEntry>,
}

impl MetadataFilesDecl {
    fn render(&self) -> String {
        let mut out = String::with_capacity(self.prefix.len() + self.entries.len() * 200);
        out.push_str(&self.prefix);
        out.push('\n');
        for entry in &self.entries {
            out.push_str(&entry.render());
        }
        out.push_str(&self.suffix);
        out
    }
}

#[derive(Debug)]
enum Statement {
    Import(ImportStatement),
    MetadataFiles(MetadataFilesDecl),
    /// Anything else, carried through byte-for-byte.
    Other(String),
}

#[derive(Debug)]
struct RegistryDocument {
    statements: Vec<Statement>,
}

/// Applies artifact registrations to the registry source file.
pub struct SourceTransformer {
    registry_path: PathBuf,
    formatter: Arc<dyn SourceFormatter>,
}

/// Result of a single registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The import and/or map entry was added and the file was rewritten.
    Registered,
    /// The artifact was already fully registered; the file was not touched.
    AlreadyRegistered,
}

impl SourceTransformer {
    pub fn new(registry_path: impl Into<PathBuf>, formatter: Arc<dyn SourceFormatter>) -> Self {
        Self {
            registry_path: registry_path.into(),
            formatter,
        }
    }

    /// Registers one artifact: inserts the import at the tail of the import
    /// run and the map entry into `MetadataFiles`, re-sorted. Re-reads the
    /// current on-disk state on every call, so earlier registrations in the
    /// same run (or external edits) are always respected.
    pub fn register_artifact(
        &self,
        key: &MetadataKey,
    ) -> Result<RegistrationOutcome, MetadataBuildError> {
        let text = fs::read_to_string(&self.registry_path)?;
        let mut doc = RegistryDocument::parse(&text)?;

        let identifier = key.identifier();
        let import_path = key.import_path();

        let import_present = match doc.find_import(&identifier) {
            Some(existing) => {
                if existing.path.as_deref() != Some(import_path.as_str()) {
                    // Two different keys deriving the same identifier should be
                    // impossible; refuse to silently rebind the import.
                    return Err(MetadataBuildError::StructuralMismatch(format!(
                        "import identifier {identifier} is already bound to {:?}",
                        existing.path
                    )));
                }
                true
            }
            None => false,
        };

        let decl = doc.metadata_files_decl()?;
        let entry_present = decl.entries.iter().any(|e| e.identifier == identifier);

        if import_present && entry_present {
            debug!(%identifier, "artifact already registered, skipping");
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }

        if !import_present {
            doc.insert_import(ImportStatement::generated(&identifier, &import_path));
        }
        if !entry_present {
            let decl = doc.metadata_files_decl_mut()?;
            decl.entries.push(RegistryEntry::from_key(key));
            sort_registry_entries(&mut decl.entries);
        }

        write_and_format(&self.registry_path, &doc.render(), self.formatter.as_ref())?;
        info!(%identifier, path = %self.registry_path.display(), "registered metadata artifact");
        Ok(RegistrationOutcome::Registered)
    }
}

impl RegistryDocument {
    fn parse(text: &str) -> Result<Self, MetadataBuildError> {
        let mut statements = Vec::new();
        let mut other = String::new();
        let mut in_block_comment = false;
        let mut in_template = false;

        let mut pos = 0;
        while pos < text.len() {
            let line_end = text[pos..]
                .find('\n')
                .map(|i| pos + i + 1)
                .unwrap_or(text.len());
            let line = &text[pos..line_end];
            let trimmed = line.trim_start();

            let plain = !in_block_comment && !in_template;
            if plain && is_import_start(trimmed) {
                flush_other(&mut statements, &mut other);
                let (import, next) = parse_import(text, pos)?;
                statements.push(Statement::Import(import));
                pos = next;
                continue;
            }
            if plain && is_metadata_files_start(trimmed) {
                flush_other(&mut statements, &mut other);
                let (decl, next) = parse_metadata_files(text, pos)?;
                statements.push(Statement::MetadataFiles(decl));
                pos = next;
                continue;
            }

            let (block, template) = line_scan_state(line, in_block_comment, in_template);
            in_block_comment = block;
            in_template = template;
            other.push_str(line);
            pos = line_end;
        }
        flush_other(&mut statements, &mut other);

        Ok(Self { statements })
    }

    fn find_import(&self, identifier: &str) -> Option<&ImportStatement> {
        self.statements.iter().find_map(|s| match s {
            Statement::Import(i) if i.identifier.as_deref() == Some(identifier) => Some(i),
            _ => None,
        })
    }

    /// Inserts a generated import into the import run, in identifier-sorted
    /// position among the generated imports. Imports with no generated
    /// successor land after the last existing import, so the run stays
    /// contiguous and hand-written imports keep their place. The same sorting
    /// rule as the map entries, which is what makes the final import block
    /// independent of registration order.
    fn insert_import(&mut self, import: ImportStatement) {
        let identifier = import.identifier.as_deref();
        let insert_at = self
            .statements
            .iter()
            .position(|s| match s {
                Statement::Import(i) if i.is_generated() => i.identifier.as_deref() > identifier,
                _ => false,
            })
            .unwrap_or_else(|| {
                self.statements
                    .iter()
                    .rposition(|s| matches!(s, Statement::Import(_)))
                    .map(|i| i + 1)
                    .unwrap_or(0)
            });
        self.statements.insert(insert_at, Statement::Import(import));
    }

    fn metadata_files_decl(&self) -> Result<&MetadataFilesDecl, MetadataBuildError> {
        let mut found = None;
        for statement in &self.statements {
            if let Statement::MetadataFiles(decl) = statement {
                if found.is_some() {
                    return Err(MetadataBuildError::StructuralMismatch(
                        "multiple MetadataFiles declarations".to_string(),
                    ));
                }
                found = Some(decl);
            }
        }
        found.ok_or_else(|| {
            MetadataBuildError::StructuralMismatch("MetadataFiles declaration not found".to_string())
        })
    }

    fn metadata_files_decl_mut(&mut self) -> Result<&mut MetadataFilesDecl, MetadataBuildError> {
        // Uniqueness was checked by the immutable lookup.
        self.statements
            .iter_mut()
            .find_map(|s| match s {
                Statement::MetadataFiles(decl) => Some(decl),
                _ => None,
            })
            .ok_or_else(|| {
                MetadataBuildError::StructuralMismatch(
                    "MetadataFiles declaration not found".to_string(),
                )
            })
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for statement in &self.statements {
            match statement {
                Statement::Import(i) => out.push_str(&i.raw),
                Statement::MetadataFiles(decl) => out.push_str(&decl.render()),
                Statement::Other(raw) => out.push_str(raw),
            }
        }
        out
    }
}

fn flush_other(statements: &mut Vec<Statement>, other: &mut String) {
    if !other.is_empty() {
        statements.push(Statement::Other(std::mem::take(other)));
    }
}

fn is_import_start(trimmed: &str) -> bool {
    trimmed
        .strip_prefix("import")
        .map(|rest| {
            rest.starts_with(|c: char| c.is_whitespace())
                || rest.starts_with('{')
                || rest.starts_with('\'')
                || rest.starts_with('"')
                || rest.starts_with('*')
        })
        .unwrap_or(false)
}

fn is_metadata_files_start(trimmed: &str) -> bool {
    trimmed.starts_with("export const MetadataFiles") || trimmed.starts_with("const MetadataFiles")
}

/// Parses one import statement starting at `start`. An import ends at the
/// first line that closes its module-path string literal; a trailing line
/// comment does not extend the statement.
fn parse_import(text: &str, start: usize) -> Result<(ImportStatement, usize), MetadataBuildError> {
    let mut pos = start;
    loop {
        let line_end = text[pos..]
            .find('\n')
            .map(|i| pos + i + 1)
            .unwrap_or(text.len());
        let complete = {
            let code = strip_line_comment(&text[pos..line_end]);
            let trimmed = code.trim_end().trim_end_matches(';').trim_end();
            trimmed.ends_with('\'') || trimmed.ends_with('"')
        };
        pos = line_end;
        if complete {
            break;
        }
        if pos >= text.len() {
            return Err(MetadataBuildError::ParseFailure(
                "unterminated import statement".to_string(),
            ));
        }
    }

    let raw = &text[start..pos];
    let code: String = raw
        .lines()
        .map(strip_line_comment)
        .collect::<Vec<_>>()
        .join("\n");
    Ok((
        ImportStatement {
            identifier: default_import_identifier(raw),
            path: last_quoted(&code),
            raw: raw.to_string(),
        },
        pos,
    ))
}

/// Truncates `line` at the first `//` outside a string literal.
fn strip_line_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut chars = line.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '/' if chars.peek().map(|&(_, n)| n) == Some('/') => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Extracts the binding of a default import (`import Name from '...'`).
fn default_import_identifier(raw: &str) -> Option<String> {
    let rest = raw.trim_start().strip_prefix("import")?.trim_start();
    let rest = rest.strip_prefix("type ").map(str::trim_start).unwrap_or(rest);
    let first = rest.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        return None;
    }
    let ident: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect();
    if ident == "from" {
        return None;
    }
    Some(ident)
}

fn last_quoted(raw: &str) -> Option<String> {
    let mut result = None;
    let mut chars = raw.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '\'' || c == '"' {
            let rest = &raw[i + c.len_utf8()..];
            if let Some(end) = rest.find(c) {
                result = Some(rest[..end].to_string());
                // Continue scanning after the closing quote.
                for _ in 0..=end {
                    chars.next();
                }
            }
        }
    }
    result
}

/// Parses the `MetadataFiles` declaration starting at `start`. The initializer
/// must be a `new Map([...])` construction whose array elements are
/// `[metadataKey({...}), identifier]` pairs; anything else is the fatal
/// "Incorrectly typed MetadataFiles" condition.
fn parse_metadata_files(
    text: &str,
    start: usize,
) -> Result<(MetadataFilesDecl, usize), MetadataBuildError> {
    let mismatch = |msg: &str| MetadataBuildError::StructuralMismatch(msg.to_string());

    let eq = text[start..]
        .find('=')
        .map(|i| start + i)
        .ok_or_else(|| mismatch("declaration has no initializer"))?;
    let after_eq = text[eq + 1..].trim_start();
    if !after_eq.starts_with("new Map") {
        return Err(mismatch("initializer is not a new Map(...) construction"));
    }
    let map_start = eq + 1 + (text[eq + 1..].len() - after_eq.len()) + "new Map".len();

    // Skip an optional generic parameter list.
    let mut cursor = map_start;
    let after_map = text[cursor..].trim_start();
    if after_map.starts_with('<') {
        let open = cursor + (text[cursor..].len() - after_map.len());
        cursor = skip_generics(text, open)?;
    }

    let after_generics = text[cursor..].trim_start();
    if !after_generics.starts_with('(') {
        return Err(mismatch("new Map is not called"));
    }
    let paren_open = cursor + (text[cursor..].len() - after_generics.len());
    let paren_close = find_matching(text, paren_open, '(', ')')?;

    let inner = &text[paren_open + 1..paren_close];
    let inner_trimmed = inner.trim_start();
    if !inner_trimmed.starts_with('[') {
        return Err(mismatch("Map constructor argument is not an array of pairs"));
    }
    let bracket_open = paren_open + 1 + (inner.len() - inner_trimmed.len());
    let bracket_close = find_matching(text, bracket_open, '[', ']')?;
    if !text[bracket_close + 1..paren_close].trim().is_empty() {
        return Err(mismatch("unexpected tokens after the entries array"));
    }

    let entries = parse_entries(&text[bracket_open + 1..bracket_close])?;

    // Statement ends after the call's closing paren, an optional semicolon and
    // the rest of that line.
    let mut end = paren_close + 1;
    while text[end..].starts_with(' ') || text[end..].starts_with('\t') {
        end += 1;
    }
    if text[end..].starts_with(';') {
        end += 1;
    }
    end = text[end..].find('\n').map(|i| end + i + 1).unwrap_or(text.len());

    Ok((
        MetadataFilesDecl {
            prefix: text[start..=bracket_open].to_string(),
            suffix: text[bracket_close..end].to_string(),
            entries,
        },
        end,
    ))
}

fn parse_entries(src: &str) -> Result<Vec<RegistryEntry>, MetadataBuildError> {
    let mismatch = |msg: String| MetadataBuildError::StructuralMismatch(msg);

    let mut entries = Vec::new();
    for element in split_top_level(src, ',')? {
        let element = element.trim();
        if element.is_empty() {
            continue;
        }
        let pair = element
            .strip_prefix('[')
            .and_then(|e| e.strip_suffix(']'))
            .ok_or_else(|| mismatch(format!("entry is not a 2-element pair: {element}")))?;

        let parts: Vec<&str> = split_top_level(pair, ',')?
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        let &[key_expr, identifier] = parts.as_slice() else {
            return Err(mismatch(format!("entry is not a 2-element pair: {element}")));
        };

        if !identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        {
            return Err(mismatch(format!("entry value is not an identifier: {identifier}")));
        }

        let (protocol_id, product_id, chain_id, file_key) = parse_key_expression(key_expr)?;
        entries.push(RegistryEntry {
            protocol_id,
            product_id,
            chain_id,
            file_key,
            identifier: identifier.to_string(),
        });
    }
    Ok(entries)
}

/// Parses `metadataKey({ protocolId: Protocol.X, productId: '...', chainId:
/// Chain.Y, fileKey: '...' })`.
fn parse_key_expression(
    expr: &str,
) -> Result<(Protocol, String, Chain, String), MetadataBuildError> {
    let mismatch = |msg: String| MetadataBuildError::StructuralMismatch(msg);

    let call = expr
        .trim()
        .strip_prefix("metadataKey")
        .ok_or_else(|| mismatch(format!("entry key is not a metadataKey(...) call: {expr}")))?
        .trim();
    let object = call
        .strip_prefix('(')
        .and_then(|c| c.strip_suffix(')'))
        .map(str::trim)
        .and_then(|c| c.strip_prefix('{'))
        .and_then(|c| c.strip_suffix('}'))
        .ok_or_else(|| mismatch(format!("metadataKey argument is not an object literal: {expr}")))?;

    let mut protocol_id = None;
    let mut product_id = None;
    let mut chain_id = None;
    let mut file_key = None;

    for field in split_top_level(object, ',')? {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        let (name, value) = field
            .split_once(':')
            .map(|(n, v)| (n.trim(), v.trim()))
            .ok_or_else(|| mismatch(format!("malformed metadataKey field: {field}")))?;
        match name {
            "protocolId" => {
                let key = value
                    .strip_prefix("Protocol.")
                    .ok_or_else(|| mismatch(format!("protocolId is not a Protocol reference: {value}")))?;
                protocol_id = Some(
                    Protocol::from_key(key)
                        .ok_or_else(|| mismatch(format!("unknown protocol key: {key}")))?,
                );
            }
            "chainId" => {
                let key = value
                    .strip_prefix("Chain.")
                    .ok_or_else(|| mismatch(format!("chainId is not a Chain reference: {value}")))?;
                chain_id = Some(
                    Chain::from_key(key)
                        .ok_or_else(|| mismatch(format!("unknown chain key: {key}")))?,
                );
            }
            "productId" => product_id = Some(unquote(value).ok_or_else(|| {
                mismatch(format!("productId is not a string literal: {value}"))
            })?),
            "fileKey" => file_key = Some(unquote(value).ok_or_else(|| {
                mismatch(format!("fileKey is not a string literal: {value}"))
            })?),
            other => return Err(mismatch(format!("unexpected metadataKey field: {other}"))),
        }
    }

    match (protocol_id, product_id, chain_id, file_key) {
        (Some(p), Some(prod), Some(c), Some(f)) => Ok((p, prod, c, f)),
        _ => Err(mismatch("metadataKey is missing required fields".to_string())),
    }
}

fn unquote(value: &str) -> Option<String> {
    let first = value.chars().next()?;
    if first != '\'' && first != '"' {
        return None;
    }
    value
        .strip_prefix(first)
        .and_then(|v| v.strip_suffix(first))
        .map(str::to_string)
}

fn skip_generics(text: &str, open: usize) -> Result<usize, MetadataBuildError> {
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open + i + 1);
                }
            }
            _ => {}
        }
    }
    Err(MetadataBuildError::ParseFailure(
        "unterminated generic parameter list".to_string(),
    ))
}

/// Finds the index of the `close` bracket matching the `open` bracket at
/// `open_idx`, skipping string literals and comments.
fn find_matching(
    text: &str,
    open_idx: usize,
    open: char,
    close: char,
) -> Result<usize, MetadataBuildError> {
    let mut depth = 0i32;
    let mut found = None;
    walk_code(&text[open_idx..], |i, c| {
        if found.is_some() {
            return;
        }
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                found = Some(open_idx + i);
            }
        }
    })?;
    found.ok_or_else(|| {
        MetadataBuildError::ParseFailure(format!("unbalanced {open}{close} in registry source"))
    })
}

/// Splits `text` at top-level occurrences of `sep` (bracket depth zero,
/// outside strings and comments).
fn split_top_level(text: &str, sep: char) -> Result<Vec<&str>, MetadataBuildError> {
    let mut depth = 0i32;
    let mut cuts = Vec::new();
    walk_code(text, |i, c| match c {
        '(' | '[' | '{' => depth += 1,
        ')' | ']' | '}' => depth -= 1,
        c if c == sep && depth == 0 => cuts.push(i),
        _ => {}
    })?;

    let mut parts = Vec::with_capacity(cuts.len() + 1);
    let mut prev = 0;
    for cut in cuts {
        parts.push(&text[prev..cut]);
        prev = cut + sep.len_utf8();
    }
    parts.push(&text[prev..]);
    Ok(parts)
}

/// Calls `visit` with every character of `text` that is code, skipping string
/// literal contents and comments.
fn walk_code(text: &str, mut visit: impl FnMut(usize, char)) -> Result<(), MetadataBuildError> {
    enum Mode {
        Code,
        Str(char),
        LineComment,
        BlockComment,
    }

    let mut mode = Mode::Code;
    let mut escaped = false;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match mode {
            Mode::Code => match c {
                '\'' | '"' | '`' => mode = Mode::Str(c),
                '/' if chars.peek().map(|&(_, n)| n) == Some('/') => mode = Mode::LineComment,
                '/' if chars.peek().map(|&(_, n)| n) == Some('*') => mode = Mode::BlockComment,
                _ => visit(i, c),
            },
            Mode::Str(quote) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == quote {
                    mode = Mode::Code;
                }
            }
            Mode::LineComment => {
                if c == '\n' {
                    mode = Mode::Code;
                }
            }
            Mode::BlockComment => {
                if c == '*' && chars.peek().map(|&(_, n)| n) == Some('/') {
                    chars.next();
                    mode = Mode::Code;
                }
            }
        }
    }

    match mode {
        Mode::Str(_) => Err(MetadataBuildError::ParseFailure(
            "unterminated string literal in registry source".to_string(),
        )),
        Mode::BlockComment => Err(MetadataBuildError::ParseFailure(
            "unterminated block comment in registry source".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Tracks whether a line leaves the scanner inside a block comment or template
/// literal, so statement classification ignores commented-out code.
fn line_scan_state(line: &str, in_block: bool, in_template: bool) -> (bool, bool) {
    let mut in_block = in_block;
    let mut in_template = in_template;
    let mut escaped = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_block {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_block = false;
            }
            continue;
        }
        if in_template {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '`' {
                in_template = false;
            }
            continue;
        }
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '`' => in_template = true,
            '/' if chars.peek() == Some(&'/') => break,
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_block = true;
            }
            _ => {}
        }
    }
    (in_block, in_template)
}
