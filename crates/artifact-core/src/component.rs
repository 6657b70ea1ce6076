//! ComponentNode - the unit of the visual builder's UI tree

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// CSS property name -> value
pub type StyleMap = BTreeMap<String, String>;

/// Component kinds understood by the builder.
///
/// The first five are the core palette, `Chart`/`Calculator`/`Quiz` are
/// extension widgets. Anything else the model invents is kept verbatim in
/// `Other` so it survives a round-trip through the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    Container,
    Text,
    Button,
    Input,
    Image,
    Chart,
    Calculator,
    Quiz,
    Other(String),
}

impl ComponentType {
    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::Container => "container",
            ComponentType::Text => "text",
            ComponentType::Button => "button",
            ComponentType::Input => "input",
            ComponentType::Image => "image",
            ComponentType::Chart => "chart",
            ComponentType::Calculator => "calculator",
            ComponentType::Quiz => "quiz",
            ComponentType::Other(name) => name.as_str(),
        }
    }

    /// Default canvas size for a freshly created node of this type.
    pub fn default_size(&self) -> Size {
        match self {
            ComponentType::Text => Size::new(200.0, 40.0),
            ComponentType::Button => Size::new(120.0, 50.0),
            ComponentType::Input => Size::new(250.0, 40.0),
            ComponentType::Image => Size::new(200.0, 150.0),
            ComponentType::Container => Size::new(400.0, 300.0),
            _ => Size::new(150.0, 100.0),
        }
    }

    /// Whether `content` from the AI payload becomes the `children` prop.
    pub fn takes_text_content(&self) -> bool {
        matches!(self, ComponentType::Text | ComponentType::Button)
    }
}

impl From<String> for ComponentType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "container" => ComponentType::Container,
            "text" => ComponentType::Text,
            "button" => ComponentType::Button,
            "input" => ComponentType::Input,
            "image" => ComponentType::Image,
            "chart" => ComponentType::Chart,
            "calculator" => ComponentType::Calculator,
            "quiz" => ComponentType::Quiz,
            _ => ComponentType::Other(value),
        }
    }
}

impl From<&str> for ComponentType {
    fn from(value: &str) -> Self {
        ComponentType::from(value.to_string())
    }
}

impl From<ComponentType> for String {
    fn from(value: ComponentType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Responsive width bucket used for per-size style overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Base,
    Sm,
    Md,
    Lg,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 4] = [
        Breakpoint::Base,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Breakpoint::Base => "base",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A node of the builder's component tree.
///
/// Children are owned by their parent; a forest is just `Vec<ComponentNode>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    pub id: String,

    #[serde(rename = "type")]
    pub component_type: ComponentType,

    #[serde(default)]
    pub props: Map<String, Value>,

    #[serde(default)]
    pub styles: StyleMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsive_styles: Option<BTreeMap<Breakpoint, StyleMap>>,

    #[serde(default)]
    pub position: Position,

    #[serde(default)]
    pub size: Size,

    #[serde(default)]
    pub children: Vec<ComponentNode>,
}

impl ComponentNode {
    /// Create a synthetic node (drag-drop, template load) with a fresh id.
    pub fn new(component_type: impl Into<ComponentType>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), component_type)
    }

    pub fn with_id(id: impl Into<String>, component_type: impl Into<ComponentType>) -> Self {
        let component_type = component_type.into();
        let size = component_type.default_size();
        Self {
            id: id.into(),
            component_type,
            props: Map::new(),
            styles: StyleMap::new(),
            responsive_styles: None,
            position: Position::default(),
            size,
            children: Vec::new(),
        }
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    pub fn with_responsive_style(
        mut self,
        breakpoint: Breakpoint,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.responsive_styles
            .get_or_insert_with(BTreeMap::new)
            .entry(breakpoint)
            .or_default()
            .insert(property.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: ComponentNode) -> Self {
        self.children.push(child);
        self
    }

    /// Text body carried in the `children` prop, if any.
    pub fn text_content(&self) -> Option<&str> {
        self.props.get("children").and_then(Value::as_str)
    }

    /// Styles for a breakpoint: base styles with the breakpoint overrides applied.
    pub fn styles_at(&self, breakpoint: Breakpoint) -> StyleMap {
        let mut merged = self.styles.clone();
        if let Some(overrides) = self
            .responsive_styles
            .as_ref()
            .and_then(|responsive| responsive.get(&breakpoint))
        {
            merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn descendant_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ComponentNode::descendant_count)
            .sum::<usize>()
    }

    /// Depth-first search by id.
    pub fn find(&self, id: &str) -> Option<&ComponentNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Ids of this subtree in depth-first order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = vec![self.id.as_str()];
        for child in &self.children {
            ids.extend(child.ids());
        }
        ids
    }
}

/// Total node count over a forest.
pub fn forest_size(nodes: &[ComponentNode]) -> usize {
    nodes.iter().map(ComponentNode::descendant_count).sum()
}
