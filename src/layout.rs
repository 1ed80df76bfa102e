//! Layout tree
//!
//! Plots and containers compose into a tree of divs, figures, rows,
//! columns, grids and tab panels. The tree serializes to JSON and is
//! turned into a document by the HTML writer.

use serde::Serialize;
use serde_json::Value;

/// A node of the document layout
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LayoutNode {
    /// HTML text block
    Div { text: String, visible: bool },
    /// Embedded figure (Vega-Lite spec)
    Figure { id: String, spec: Value },
    /// Children side by side
    Row(Vec<LayoutNode>),
    /// Children stacked vertically
    Column(Vec<LayoutNode>),
    /// Children laid out row-major in `ncols` columns
    Grid { ncols: usize, children: Vec<LayoutNode> },
    /// One panel per tab
    Tabs(Vec<Panel>),
}

/// A titled tab panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub child: Box<LayoutNode>,
}

impl LayoutNode {
    /// Visible text block
    pub fn div(text: impl Into<String>) -> Self {
        LayoutNode::Div {
            text: text.into(),
            visible: true,
        }
    }

    /// Grid with ceil(sqrt(n)) columns
    pub fn grid(children: Vec<LayoutNode>) -> Self {
        LayoutNode::Grid {
            ncols: grid_columns(children.len()),
            children,
        }
    }

    /// Number of embedded figures in this subtree
    pub fn figure_count(&self) -> usize {
        match self {
            LayoutNode::Div { .. } => 0,
            LayoutNode::Figure { .. } => 1,
            LayoutNode::Row(children) | LayoutNode::Column(children) => {
                children.iter().map(LayoutNode::figure_count).sum()
            }
            LayoutNode::Grid { children, .. } => children.iter().map(LayoutNode::figure_count).sum(),
            LayoutNode::Tabs(panels) => panels.iter().map(|p| p.child.figure_count()).sum(),
        }
    }
}

/// Number of grid columns for `n` items
pub fn grid_columns(n: usize) -> usize {
    (n as f64).sqrt().ceil() as usize
}
