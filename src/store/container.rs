//! Tabs and the named containers inside them

use crate::layout::LayoutNode;
use crate::Plot;

/// How the plots of a container are composed, taken from the container name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Plots appended one after another
    Item,
    /// Plots side by side
    Row,
    /// Plots stacked vertically
    Col,
    /// Plots in a grid with ceil(sqrt(n)) columns
    Grid,
}

impl ContainerKind {
    /// Kind for a container name; `None` when the prefix is unknown
    pub fn from_name(name: &str) -> Option<Self> {
        [
            ContainerKind::Item,
            ContainerKind::Row,
            ContainerKind::Col,
            ContainerKind::Grid,
        ]
        .into_iter()
        .find(|kind| name.starts_with(kind.base_name()))
    }

    /// Base of generated names, e.g. "row" for "row #0"
    pub fn base_name(self) -> &'static str {
        match self {
            ContainerKind::Item => "item",
            ContainerKind::Row => "row",
            ContainerKind::Col => "col",
            ContainerKind::Grid => "grid",
        }
    }

    /// Append the composed figures to the tab contents
    pub(crate) fn compose(self, figures: Vec<LayoutNode>, contents: &mut Vec<LayoutNode>) {
        match self {
            ContainerKind::Item => contents.extend(figures),
            ContainerKind::Row => contents.push(LayoutNode::Row(figures)),
            ContainerKind::Col => contents.push(LayoutNode::Column(figures)),
            ContainerKind::Grid => contents.push(LayoutNode::grid(figures)),
        }
    }
}

/// Named group of plots
#[derive(Debug, Clone)]
pub struct Container {
    pub name: String,
    pub plots: Vec<Plot>,
}

impl Container {
    pub fn kind(&self) -> Option<ContainerKind> {
        ContainerKind::from_name(&self.name)
    }
}

/// A tab: containers in insertion order
#[derive(Debug, Clone)]
pub struct Tab {
    pub name: String,
    containers: Vec<Container>,
}

impl Tab {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            containers: Vec::new(),
        }
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn container_names(&self) -> Vec<&str> {
        self.containers.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.containers.iter().any(|c| c.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.name == name)
    }

    /// Container `name`, created empty when missing
    pub(crate) fn entry(&mut self, name: &str) -> &mut Container {
        let idx = match self.containers.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.containers.push(Container {
                    name: name.to_string(),
                    plots: Vec::new(),
                });
                self.containers.len() - 1
            }
        };
        &mut self.containers[idx]
    }

    /// Lowest unused `"<base> #<i>"`
    pub fn unique_name(&self, base: &str) -> String {
        (0..)
            .map(|i| format!("{} #{}", base, i))
            .find(|name| !self.contains(name))
            .unwrap_or_else(|| base.to_string())
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Every plot of the tab in composition order
    pub fn plots(&self) -> impl Iterator<Item = &Plot> {
        self.containers.iter().flat_map(|c| c.plots.iter())
    }
}
