//! Output buffering for emitted JavaScript.
//!
//! Emission does not happen front to back. A class constructor collects
//! field initializers while members are being lowered, and an expression
//! that needs statements (a `match` in expression position) renders those
//! statements somewhere else first. The writer therefore keeps an arena of
//! buffers:
//!
//! ```text
//! root ──┬─ "let M = (function() {\n"
//!        ├─ child @offset ── "$module.C = class C {\n" ── child @offset ...
//!        └─ "})();\n"
//! ```
//!
//! A child created with [`Writer::nested`] is recorded at its parent's
//! current offset and spliced in there by [`Writer::render`].
//! Writes to the parent after the child was created land after the child's
//! text, no matter in which order parent and child are filled.
//!
//! Indentation is tracked per buffer. Every line start, including those
//! inside multi-line text passed to [`Writer::write`], receives the
//! buffer's current indentation.

use std::fmt;

const INDENT: &str = "  ";

/// Index of a buffer in the writer arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Debug, Default)]
struct Node {
    text: String,
    /// Current indentation level in units of [`INDENT`].
    level: usize,
    at_line_start: bool,
    /// Children in creation order with the byte offset they splice at.
    children: Vec<(usize, NodeId)>,
}

/// Arena of output buffers.
#[derive(Debug)]
pub struct Writer {
    nodes: Vec<Node>,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Writer with a single empty root buffer at level 0.
    pub fn new() -> Self {
        Writer {
            nodes: vec![Node {
                at_line_start: true,
                ..Node::default()
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node);
        id
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Append `text`, indenting every line start.
    pub fn write(&mut self, id: NodeId, text: &str) {
        let node = self.node_mut(id);
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                node.text.push('\n');
                node.at_line_start = true;
            }
            if line.is_empty() {
                continue;
            }
            if node.at_line_start {
                for _ in 0..node.level {
                    node.text.push_str(INDENT);
                }
                node.at_line_start = false;
            }
            node.text.push_str(line);
        }
    }

    /// Append `text` followed by a newline.
    pub fn writeln(&mut self, id: NodeId, text: &str) {
        self.write(id, text);
        self.write(id, "\n");
    }

    /// Child buffer at the parent's current offset, one level deeper.
    pub fn nested(&mut self, parent: NodeId) -> NodeId {
        let (offset, level) = {
            let p = &self.nodes[parent.index()];
            (p.text.len(), p.level + 1)
        };
        let child = self.alloc(Node {
            level,
            at_line_start: true,
            ..Node::default()
        });
        self.node_mut(parent).children.push((offset, child));
        child
    }

    /// `header {` + nested child + `}` + `close`. Returns the child.
    pub fn block(&mut self, parent: NodeId, header: &str, close: &str) -> NodeId {
        if header.is_empty() {
            self.writeln(parent, "{");
        } else {
            self.writeln(parent, &format!("{header} {{"));
        }
        let body = self.nested(parent);
        self.writeln(parent, &format!("}}{close}"));
        body
    }

    /// Free-standing buffer, rendered on its own with [`Writer::render`].
    pub fn detached(&mut self, level: usize) -> NodeId {
        self.alloc(Node {
            level,
            at_line_start: true,
            ..Node::default()
        })
    }

    /// Body buffer of a new expression bridge, one level in.
    ///
    /// Fill it with statements, then turn it into an invocation with
    /// [`Writer::close_bridge`].
    pub fn open_bridge(&mut self) -> NodeId {
        self.detached(1)
    }

    /// `(function (params) { body; return result; })(args)` as one
    /// expression. Without a `result` the body must return on every path.
    pub fn close_bridge(
        &mut self,
        body: NodeId,
        params: &str,
        args: &str,
        result: Option<&str>,
    ) -> String {
        if let Some(result) = result {
            self.writeln(body, &format!("return {result};"));
        }
        format!("(function ({params}) {{\n{}}})({args})", self.render(body))
    }

    /// Text of `id` with all descendants spliced in.
    pub fn render(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.render_into(id, &mut out);
        out
    }

    fn render_into(&self, id: NodeId, out: &mut String) {
        vela_stack::ensure_sufficient_stack(|| {
            let node = &self.nodes[id.index()];
            let mut pos = 0;
            for &(offset, child) in &node.children {
                out.push_str(&node.text[pos..offset]);
                pos = offset;
                self.render_into(child, out);
            }
            out.push_str(&node.text[pos..]);
        });
    }
}
