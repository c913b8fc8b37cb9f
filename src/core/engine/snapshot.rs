//! Snapshot engine: replays a render tree that was laid out ahead of time.
//!
//! The "markup" this engine accepts is a line-oriented dump of a render tree,
//! one node per line in document order:
//!
//! ```text
//! # comments and blank lines are ignored
//! root
//! text 5 5 32 bold "Times New Roman" heading 1
//! text 5 39 16 regular "Times New Roman" paragraph
//! node 7
//! ```
//!
//! `text` takes `x y size weight "family" value…`; the value is the rest of
//! the line.  `node <id>` stands for a node type this client doesn't know.
//! The engine performs no layout of its own, which makes it the back-end used
//! when the native gosub bindings are not linked in.

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

use super::{NodeKind, RenderEngine, RenderNode, RenderTree};

/// Construction failure for snapshot input.
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("line {line}: unknown directive `{directive}`")]
    UnknownDirective { line: usize, directive: String },
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

// ───────────────────────────────────────── nodes ─────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotNode {
    Root,
    Text {
        value: String,
        font_family: String,
        font_size: f64,
        bold: bool,
        x: f64,
        y: f64,
    },
    Other(i32),
}

impl RenderNode for SnapshotNode {
    fn kind(&self) -> NodeKind {
        match self {
            SnapshotNode::Root => NodeKind::Root,
            SnapshotNode::Text { .. } => NodeKind::Text,
            SnapshotNode::Other(id) => NodeKind::Unknown(*id),
        }
    }

    fn text_value(&self) -> String {
        match self {
            SnapshotNode::Text { value, .. } => value.clone(),
            _ => String::new(),
        }
    }

    fn font_family(&self) -> String {
        match self {
            SnapshotNode::Text { font_family, .. } => font_family.clone(),
            _ => String::new(),
        }
    }

    fn font_size(&self) -> f64 {
        match self {
            SnapshotNode::Text { font_size, .. } => *font_size,
            _ => 0.0,
        }
    }

    fn bold(&self) -> bool {
        matches!(self, SnapshotNode::Text { bold: true, .. })
    }

    fn x(&self) -> f64 {
        match self {
            SnapshotNode::Text { x, .. } => *x,
            _ => 0.0,
        }
    }

    fn y(&self) -> f64 {
        match self {
            SnapshotNode::Text { y, .. } => *y,
            _ => 0.0,
        }
    }
}

// ───────────────────────────────────────── tree ──────────────

#[derive(Debug)]
pub struct SnapshotTree {
    nodes: Vec<SnapshotNode>,
    cursor: usize,
    released: bool,
}

impl RenderTree for SnapshotTree {
    type Node<'a> = &'a SnapshotNode;

    fn next_node(&mut self) -> Option<Self::Node<'_>> {
        let node = self.nodes.get(self.cursor)?;
        self.cursor += 1;
        Some(node)
    }
}

// ───────────────────────────────────────── engine ────────────

/// Running totals of trees built and released through one engine (and all
/// of its clones).
#[derive(Debug, Default)]
pub struct SnapshotStats {
    inits: Cell<usize>,
    frees: Cell<usize>,
}

impl SnapshotStats {
    pub fn inits(&self) -> usize {
        self.inits.get()
    }

    pub fn frees(&self) -> usize {
        self.frees.get()
    }

    /// Trees currently alive.
    pub fn live(&self) -> usize {
        self.inits().saturating_sub(self.frees())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotEngine {
    stats: Rc<SnapshotStats>,
}

impl SnapshotEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &SnapshotStats {
        &self.stats
    }
}

impl RenderEngine for SnapshotEngine {
    const NAME: &'static str = "snapshot";

    type Tree = SnapshotTree;
    type Error = SnapshotError;

    fn tree_init(&self, markup: &str) -> Result<SnapshotTree, SnapshotError> {
        let nodes = parse(markup)?;
        self.stats.inits.set(self.stats.inits.get() + 1);
        Ok(SnapshotTree {
            nodes,
            cursor: 0,
            released: false,
        })
    }

    fn tree_free(&self, tree: &mut SnapshotTree) {
        debug_assert!(!tree.released, "snapshot tree released twice");
        tree.released = true;
        tree.nodes.clear();
        self.stats.frees.set(self.stats.frees.get() + 1);
        tracing::trace!(live = self.stats.live(), "snapshot tree released");
    }

    fn blank_page(&self, title: &str) -> String {
        format!("root\ntext 5 5 32 bold \"Times New Roman\" {title}\n")
    }
}

// ───────────────────────────────────────── parsing ───────────

/// Parse a whole snapshot into its node list.
pub fn parse(input: &str) -> Result<Vec<SnapshotNode>, SnapshotError> {
    let mut nodes = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        if let Some(node) = parse_line(raw, line)? {
            nodes.push(node);
        }
    }
    Ok(nodes)
}

fn parse_line(raw: &str, line: usize) -> Result<Option<SnapshotNode>, SnapshotError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let syntax = |message: String| SnapshotError::Syntax { line, message };
    let (directive, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));

    match directive {
        "root" => {
            if !rest.trim().is_empty() {
                return Err(syntax("`root` takes no arguments".into()));
            }
            Ok(Some(SnapshotNode::Root))
        }
        "node" => {
            let id: i32 = rest
                .trim()
                .parse()
                .map_err(|_| syntax(format!("invalid node type `{}`", rest.trim())))?;
            match NodeKind::from_raw(id) {
                NodeKind::Unknown(id) => Ok(Some(SnapshotNode::Other(id))),
                _ => Err(syntax(format!(
                    "node type {id} is reserved, use `root` or `text`"
                ))),
            }
        }
        "text" => parse_text(rest, line).map(Some),
        other => Err(SnapshotError::UnknownDirective {
            line,
            directive: other.to_string(),
        }),
    }
}

fn parse_text(rest: &str, line: usize) -> Result<SnapshotNode, SnapshotError> {
    let syntax = |message: String| SnapshotError::Syntax { line, message };

    let (x, rest) = take_number(rest, "x").map_err(syntax)?;
    let (y, rest) = take_number(rest, "y").map_err(syntax)?;
    let (font_size, rest) = take_number(rest, "font size").map_err(syntax)?;

    let (weight, rest) = take_token(rest);
    let bold = match weight {
        "bold" => true,
        "regular" => false,
        "" => return Err(syntax("missing weight".into())),
        other => return Err(syntax(format!("weight must be bold or regular, got `{other}`"))),
    };

    let rest = rest.trim_start();
    let Some(quoted) = rest.strip_prefix('"') else {
        return Err(syntax("font family must be quoted".into()));
    };
    let Some((font_family, value)) = quoted.split_once('"') else {
        return Err(syntax("unterminated font family".into()));
    };

    Ok(SnapshotNode::Text {
        value: value.trim_start().to_string(),
        font_family: font_family.to_string(),
        font_size,
        bold,
        x,
        y,
    })
}

/// Split off the next whitespace-delimited token.
fn take_token(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    (&input[..end], &input[end..])
}

fn take_number<'a>(input: &'a str, what: &str) -> Result<(f64, &'a str), String> {
    let (token, rest) = take_token(input);
    if token.is_empty() {
        return Err(format!("missing {what}"));
    }
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok((v, rest)),
        _ => Err(format!("invalid {what} `{token}`")),
    }
}
