//! Standalone HTML document writer
//!
//! Renders a [`LayoutNode`] tree as nested flex containers, CSS grids and
//! tab panels, and embeds every figure with vega-embed.

use crate::layout::{LayoutNode, Panel};
use crate::writer::Writer;
use crate::{PlotskiError, Result};
use serde_json::Value;
use std::fmt::Write as FmtWrite;

const SCRIPTS: &[&str] = &[
    "https://cdn.jsdelivr.net/npm/vega@6",
    "https://cdn.jsdelivr.net/npm/vega-lite@6",
    "https://cdn.jsdelivr.net/npm/vega-embed@6",
];

const STYLE: &str = "\
body{font-family:Arial,Helvetica,sans-serif;margin:16px;color:#222;background:#fff;}
.plotski-row{display:flex;flex-direction:row;gap:8px;align-items:flex-start;}
.plotski-col{display:flex;flex-direction:column;gap:4px;}
.plotski-grid{display:grid;gap:8px;}
.plotski-div{font-size:14px;}
.plotski-hidden{display:none;}
.plotski-tab-bar{display:flex;gap:2px;border-bottom:1px solid #ccc;margin-bottom:8px;}
.plotski-tab-button{border:1px solid #ccc;border-bottom:none;background:#f4f4f4;padding:6px 14px;cursor:pointer;}
.plotski-tab-button.active{background:#fff;font-weight:bold;}
.plotski-tab-panel{display:none;}
.plotski-tab-panel.active{display:block;}";

const TAB_SCRIPT: &str = "\
function plotskiShowTab(group, index) {
  document.querySelectorAll('[data-group=\"' + group + '\"]').forEach(function (el) {
    el.classList.toggle('active', Number(el.dataset.index) === index);
  });
}";

/// Writes a layout tree as a single HTML document
pub struct HtmlWriter {
    title: String,
}

impl HtmlWriter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    fn document(&self, layout: &LayoutNode) -> std::result::Result<String, std::fmt::Error> {
        let mut body = Body::default();
        body.node(layout)?;

        let mut html = String::with_capacity(body.html.len() + 4096);
        writeln!(html, "<!DOCTYPE html>")?;
        writeln!(html, "<html lang=\"en\">")?;
        writeln!(html, "<head>")?;
        writeln!(html, "<meta charset=\"utf-8\"/>")?;
        writeln!(html, "<title>{}</title>", escape(&self.title))?;
        for src in SCRIPTS {
            writeln!(html, "<script src=\"{}\"></script>", src)?;
        }
        writeln!(html, "<style>\n{}\n</style>", STYLE)?;
        writeln!(html, "</head>")?;
        writeln!(html, "<body>")?;
        html.push_str(&body.html);
        writeln!(html, "<script>")?;
        writeln!(html, "{}", TAB_SCRIPT)?;
        for (dom_id, spec) in &body.figures {
            writeln!(
                html,
                "vegaEmbed(\"#{}\", {}, {{\"actions\": false}}).catch(console.error);",
                dom_id,
                script_json(spec)
            )?;
        }
        writeln!(html, "</script>")?;
        writeln!(html, "</body>")?;
        writeln!(html, "</html>")?;
        Ok(html)
    }
}

impl Writer<LayoutNode> for HtmlWriter {
    type Output = String;

    fn write(&self, layout: &LayoutNode) -> Result<String> {
        let html = self
            .document(layout)
            .map_err(|e| PlotskiError::WriterError(format!("Failed to render HTML: {}", e)))?;
        tracing::debug!("Rendered document with {} figures", layout.figure_count());
        Ok(html)
    }
}

/// Document body with the figures to embed
#[derive(Default)]
struct Body {
    html: String,
    /// (element id, Vega-Lite spec)
    figures: Vec<(String, Value)>,
    tab_groups: usize,
}

impl Body {
    fn node(&mut self, node: &LayoutNode) -> std::fmt::Result {
        match node {
            LayoutNode::Div { text, visible } => {
                let class = if *visible {
                    "plotski-div"
                } else {
                    "plotski-div plotski-hidden"
                };
                writeln!(self.html, "<div class=\"{}\">{}</div>", class, text)?;
            }
            LayoutNode::Figure { id, spec } => {
                // the same plot name may appear in several tabs
                let dom_id = format!("{}-{}", id, self.figures.len());
                writeln!(self.html, "<div id=\"{}\"></div>", dom_id)?;
                self.figures.push((dom_id, spec.clone()));
            }
            LayoutNode::Row(children) => self.container("plotski-row", "", children)?,
            LayoutNode::Column(children) => self.container("plotski-col", "", children)?,
            LayoutNode::Grid { ncols, children } => {
                let style = format!(" style=\"grid-template-columns:repeat({}, auto);\"", (*ncols).max(1));
                self.container("plotski-grid", &style, children)?;
            }
            LayoutNode::Tabs(panels) => self.tabs(panels)?,
        }
        Ok(())
    }

    fn container(&mut self, class: &str, style: &str, children: &[LayoutNode]) -> std::fmt::Result {
        writeln!(self.html, "<div class=\"{}\"{}>", class, style)?;
        for child in children {
            self.node(child)?;
        }
        writeln!(self.html, "</div>")
    }

    fn tabs(&mut self, panels: &[Panel]) -> std::fmt::Result {
        let group = format!("tabs-{}", self.tab_groups);
        self.tab_groups += 1;
        let active = |idx: usize| if idx == 0 { " active" } else { "" };

        writeln!(self.html, "<div class=\"plotski-tabs\">")?;
        writeln!(self.html, "<div class=\"plotski-tab-bar\">")?;
        for (idx, panel) in panels.iter().enumerate() {
            writeln!(
                self.html,
                "<button class=\"plotski-tab-button{}\" data-group=\"{}\" data-index=\"{}\" onclick=\"plotskiShowTab('{}', {})\">{}</button>",
                active(idx),
                group,
                idx,
                group,
                idx,
                escape(&panel.title)
            )?;
        }
        writeln!(self.html, "</div>")?;
        for (idx, panel) in panels.iter().enumerate() {
            writeln!(
                self.html,
                "<div class=\"plotski-tab-panel{}\" data-group=\"{}\" data-index=\"{}\">",
                active(idx),
                group,
                idx
            )?;
            self.node(&panel.child)?;
            writeln!(self.html, "</div>")?;
        }
        writeln!(self.html, "</div>")
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// JSON safe to inline in a script element
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn figure(id: &str) -> LayoutNode {
        LayoutNode::Figure {
            id: id.to_string(),
            spec: json!({"mark": "point"}),
        }
    }

    #[test]
    fn test_one_embed_per_figure() {
        let layout = LayoutNode::Column(vec![
            LayoutNode::div("<b>Spectrum</b>"),
            LayoutNode::Row(vec![figure("plot-a"), figure("plot-a")]),
        ]);
        let html = HtmlWriter::new("Store").write(&layout).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Store</title>"));
        assert!(html.contains("https://cdn.jsdelivr.net/npm/vega-lite@6"));
        assert_eq!(html.matches("vegaEmbed(\"#").count(), 2);
        assert!(html.contains("id=\"plot-a-0\""));
        assert!(html.contains("id=\"plot-a-1\""));
        assert!(html.contains("<div class=\"plotski-div\"><b>Spectrum</b></div>"));
    }

    #[test]
    fn test_one_panel_per_tab() {
        let layout = LayoutNode::Tabs(vec![
            Panel {
                title: "Spectra".into(),
                child: Box::new(figure("plot-a")),
            },
            Panel {
                title: "Images".into(),
                child: Box::new(LayoutNode::grid(vec![figure("plot-b"), figure("plot-c")])),
            },
        ]);
        let html = HtmlWriter::new("Store").write(&layout).unwrap();

        assert_eq!(html.matches("<div class=\"plotski-tab-panel").count(), 2);
        assert_eq!(html.matches("<div class=\"plotski-tab-panel active\"").count(), 1);
        assert!(html.contains(">Images</button>"));
        assert!(html.contains("grid-template-columns:repeat(2, auto);"));
    }

    #[test]
    fn test_hidden_div_and_escaping() {
        let layout = LayoutNode::Column(vec![
            LayoutNode::Div {
                text: String::new(),
                visible: false,
            },
            LayoutNode::Figure {
                id: "plot-x".into(),
                spec: json!({"title": "</script>"}),
            },
        ]);
        let html = HtmlWriter::new("a < b").write(&layout).unwrap();

        assert!(html.contains("plotski-div plotski-hidden"));
        assert!(html.contains("<title>a &lt; b</title>"));
        assert!(!html.contains("\"</script>\""));
    }
}
