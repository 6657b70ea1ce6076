//! Framework-neutral markup AST and its pretty-printer.

use std::borrow::Cow;

use artifact_core::{Breakpoint, ComponentNode, ComponentType, StyleMap};
use serde_json::Value;

const INDENT: &str = "  ";

/// Attribute carrying the node id for responsive style selectors.
pub const RESPONSIVE_ID_ATTRIBUTE: &str = "data-artifact-id";

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Plain string, printed as `name="value"`.
    Text(String),
    /// Any other JSON value, printed as a framework expression.
    Expr(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub self_closing: bool,
    pub attributes: Vec<Attribute>,
    pub styles: StyleMap,
    pub children: Vec<MarkupNode>,
}

/// Target element for a component type and whether it is void.
pub fn element_tag(component_type: &ComponentType) -> (&'static str, bool) {
    match component_type {
        ComponentType::Container => ("div", false),
        ComponentType::Text => ("p", false),
        ComponentType::Button => ("button", false),
        ComponentType::Input => ("input", true),
        ComponentType::Image => ("img", true),
        _ => ("div", false),
    }
}

/// Lower a component subtree into markup.
pub fn lower(node: &ComponentNode) -> Element {
    let (tag, self_closing) = element_tag(&node.component_type);

    let mut attributes = Vec::new();
    if has_responsive_styles(node) {
        attributes.push(Attribute {
            name: RESPONSIVE_ID_ATTRIBUTE.to_string(),
            value: AttrValue::Text(node.id.clone()),
        });
    }

    for (name, value) in &node.props {
        if name == "children" {
            continue;
        }
        if !is_attribute_name(name) {
            log::warn!("Skipping prop with invalid attribute name {:?} on '{}'", name, node.id);
            continue;
        }
        let value = match value {
            Value::Null => continue,
            Value::Object(map) if map.is_empty() => continue,
            Value::String(s) => AttrValue::Text(s.clone()),
            other => AttrValue::Expr(other.clone()),
        };
        attributes.push(Attribute {
            name: name.clone(),
            value,
        });
    }

    let mut children = Vec::new();
    if !self_closing {
        match node.props.get("children") {
            Some(Value::String(text)) => children.push(MarkupNode::Text(text.clone())),
            Some(Value::Null) | None => {}
            Some(other) => children.push(MarkupNode::Text(other.to_string())),
        }
        children.extend(node.children.iter().map(|child| MarkupNode::Element(lower(child))));
    } else if !node.children.is_empty() {
        log::warn!(
            "Dropping {} children of void element '{}' ({})",
            node.children.len(),
            node.id,
            tag
        );
    }

    Element {
        tag,
        self_closing,
        attributes,
        styles: node.styles.clone(),
        children,
    }
}

fn has_responsive_styles(node: &ComponentNode) -> bool {
    node.responsive_styles
        .as_ref()
        .is_some_and(|responsive| responsive.values().any(|styles| !styles.is_empty()))
}

fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '@' || first == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.' | '@'))
}

/// Per-framework attribute and style syntax.
pub trait Dialect {
    /// Map a prop name to the framework's attribute name.
    fn attribute_name<'a>(&self, name: &'a str) -> Cow<'a, str>;

    fn format_attribute(&self, name: &str, value: &AttrValue) -> String;

    fn format_styles(&self, styles: &StyleMap) -> String;
}

/// Print `element` at `depth`, one line per element/text node.
pub fn render_element(element: &Element, dialect: &dyn Dialect, depth: usize, out: &mut String) {
    let indent = INDENT.repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(element.tag);

    for attribute in &element.attributes {
        let name = dialect.attribute_name(&attribute.name);
        out.push(' ');
        out.push_str(&dialect.format_attribute(&name, &attribute.value));
    }
    if !element.styles.is_empty() {
        out.push(' ');
        out.push_str(&dialect.format_styles(&element.styles));
    }

    if element.self_closing {
        out.push_str(" />\n");
        return;
    }

    match element.children.as_slice() {
        [] => {
            out.push_str(&format!("></{}>\n", element.tag));
        }
        [MarkupNode::Text(text)] => {
            out.push('>');
            out.push_str(&escape_text(text));
            out.push_str(&format!("</{}>\n", element.tag));
        }
        children => {
            out.push_str(">\n");
            for child in children {
                match child {
                    MarkupNode::Element(child) => render_element(child, dialect, depth + 1, out),
                    MarkupNode::Text(text) => {
                        out.push_str(&INDENT.repeat(depth + 1));
                        out.push_str(&escape_text(text));
                        out.push('\n');
                    }
                }
            }
            out.push_str(&indent);
            out.push_str(&format!("</{}>\n", element.tag));
        }
    }
}

/// Render a whole forest at `depth`.
pub fn render_forest(nodes: &[ComponentNode], dialect: &dyn Dialect, depth: usize) -> String {
    let mut out = String::new();
    for node in nodes {
        render_element(&lower(node), dialect, depth, &mut out);
    }
    out
}

/// Escape text so it is inert in JSX, Vue templates and Svelte markup.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escape a double-quoted attribute value.
pub fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// `backgroundColor` -> `background-color`; custom properties are kept.
pub fn kebab_case(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_string();
    }
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `background-color` -> `backgroundColor`; custom properties are kept.
pub fn camel_case(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_string();
    }
    let mut out = String::with_capacity(property.len());
    let mut upper_next = false;
    for c in property.chars() {
        if c == '-' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Inline CSS declarations: `font-size: 24px; color: red`.
pub fn css_declarations(styles: &StyleMap) -> String {
    styles
        .iter()
        .map(|(property, value)| format!("{}: {}", kebab_case(property), value))
        .collect::<Vec<_>>()
        .join("; ")
}

fn min_width(breakpoint: Breakpoint) -> Option<u32> {
    match breakpoint {
        Breakpoint::Base => None,
        Breakpoint::Sm => Some(640),
        Breakpoint::Md => Some(768),
        Breakpoint::Lg => Some(1024),
    }
}

/// Stylesheet rules for every node with responsive overrides, or `None`.
///
/// Rules target `[data-artifact-id="<id>"]` and are ordered by breakpoint
/// so wider breakpoints win.
pub fn responsive_css(nodes: &[ComponentNode]) -> Option<String> {
    let mut rules: Vec<(Breakpoint, String)> = Vec::new();
    collect_responsive_rules(nodes, &mut rules);
    if rules.is_empty() {
        return None;
    }
    rules.sort_by_key(|(breakpoint, _)| *breakpoint);

    let mut css = String::new();
    for (breakpoint, rule) in rules {
        match min_width(breakpoint) {
            None => {
                css.push_str(&rule);
                css.push('\n');
            }
            Some(width) => {
                css.push_str(&format!("@media (min-width: {width}px) {{\n"));
                css.push_str(INDENT);
                css.push_str(&rule);
                css.push_str("\n}\n");
            }
        }
    }
    Some(css)
}

fn collect_responsive_rules(nodes: &[ComponentNode], rules: &mut Vec<(Breakpoint, String)>) {
    for node in nodes {
        if let Some(responsive) = &node.responsive_styles {
            for (breakpoint, styles) in responsive.iter().filter(|(_, s)| !s.is_empty()) {
                let declarations = styles
                    .iter()
                    .map(|(property, value)| format!("{}: {};", kebab_case(property), value))
                    .collect::<Vec<_>>()
                    .join(" ");
                rules.push((
                    *breakpoint,
                    format!(
                        "[{}=\"{}\"] {{ {} }}",
                        RESPONSIVE_ID_ATTRIBUTE,
                        escape_attribute(&node.id),
                        declarations
                    ),
                ));
            }
        }
        collect_responsive_rules(&node.children, rules);
    }
}

/// Indent every non-empty line of `text` by `depth` levels.
pub(crate) fn indent_lines(text: &str, depth: usize) -> String {
    let indent = INDENT.repeat(depth);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
