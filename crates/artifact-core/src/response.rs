//! Boundary schema for the raw JSON object returned by a model.
//!
//! The model is asked for three top-level keys:
//!
//! ```json
//! {
//!   "components": [{ "type": "container", "id": "root" }],
//!   "layout": { "root": { "styles": {}, "children": ["title"] } },
//!   "componentDetails": {
//!     "root": { "type": "container", "props": {} },
//!     "title": { "type": "text", "content": "Hello World" }
//!   }
//! }
//! ```
//!
//! Parsing is lenient: wrong-shaped entries are dropped with a warning and a
//! missing `layout` / `componentDetails` is kept as `None` so the tree
//! builder can return an empty forest instead of failing.

use serde_json::{Map, Value};

use crate::component::{ComponentType, StyleMap};

pub const COMPONENTS_KEY: &str = "components";
pub const LAYOUT_KEY: &str = "layout";
pub const DETAILS_KEY: &str = "componentDetails";

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRef {
    pub id: String,
    pub component_type: ComponentType,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutEntry {
    pub styles: StyleMap,
    pub children: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDetail {
    pub component_type: ComponentType,
    pub props: Map<String, Value>,
    pub content: Option<Value>,
}

/// Validated view over a model response. Map entries keep source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AiResponse {
    pub components: Vec<ComponentRef>,
    pub layout: Option<Vec<(String, LayoutEntry)>>,
    pub component_details: Option<Vec<(String, ComponentDetail)>>,
}

impl AiResponse {
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            log::warn!("AI response is not a JSON object; treating it as empty");
            return Self::default();
        };

        let components = object
            .get(COMPONENTS_KEY)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(parse_component_ref).collect())
            .unwrap_or_default();

        let layout = object
            .get(LAYOUT_KEY)
            .and_then(Value::as_object)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(id, entry)| (id.clone(), parse_layout_entry(id, entry)))
                    .collect()
            });

        let component_details = object
            .get(DETAILS_KEY)
            .and_then(Value::as_object)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|(id, detail)| {
                        parse_detail(id, detail).map(|detail| (id.clone(), detail))
                    })
                    .collect()
            });

        Self {
            components,
            layout,
            component_details,
        }
    }

    /// True when all three top-level keys are present and non-null.
    pub fn has_required_keys(value: &Value) -> bool {
        [COMPONENTS_KEY, LAYOUT_KEY, DETAILS_KEY]
            .iter()
            .all(|key| value.get(key).is_some_and(|v| !v.is_null()))
    }
}

fn parse_component_ref(value: &Value) -> Option<ComponentRef> {
    let id = value.get("id").and_then(Value::as_str)?;
    let component_type = value.get("type").and_then(Value::as_str)?;
    Some(ComponentRef {
        id: id.to_string(),
        component_type: ComponentType::from(component_type),
    })
}

fn parse_layout_entry(id: &str, value: &Value) -> LayoutEntry {
    if !value.is_object() {
        log::warn!("Layout entry '{}' is not an object; ignoring it", id);
        return LayoutEntry::default();
    }

    let styles = value
        .get("styles")
        .and_then(Value::as_object)
        .map(|styles| {
            styles
                .iter()
                .filter_map(|(property, v)| style_value(v).map(|v| (property.clone(), v)))
                .collect()
        })
        .unwrap_or_default();

    let children = value
        .get("children")
        .and_then(Value::as_array)
        .map(|children| {
            children
                .iter()
                .filter_map(|child| match child.as_str() {
                    Some(child) => Some(child.to_string()),
                    None => {
                        log::warn!("Layout entry '{}' has a non-string child: {}", id, child);
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    LayoutEntry { styles, children }
}

fn style_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_detail(id: &str, value: &Value) -> Option<ComponentDetail> {
    let Some(component_type) = value.get("type").and_then(Value::as_str) else {
        log::warn!("Component detail '{}' has no string 'type'; dropping it", id);
        return None;
    };

    let props = value
        .get("props")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let content = value.get("content").filter(|c| !c.is_null()).cloned();

    Some(ComponentDetail {
        component_type: ComponentType::from(component_type),
        props,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_all_three_sections_in_source_order() {
        let response = AiResponse::from_value(&json!({
            "components": [{"type": "container", "id": "root"}, {"type": "text", "id": "t"}],
            "layout": {
                "root": {"styles": {"padding": "16px", "gap": 4}, "children": ["t"]}
            },
            "componentDetails": {
                "root": {"type": "container"},
                "t": {"type": "text", "content": "Hi", "props": {"className": "lead"}}
            }
        }));

        assert_eq!(response.components.len(), 2);
        let layout = response.layout.as_ref().unwrap();
        let (root_id, root_layout) = &layout[0];
        assert_eq!(root_id, "root");
        assert_eq!(root_layout.children, vec!["t".to_string()]);
        assert_eq!(root_layout.styles.get("gap").map(String::as_str), Some("4"));

        let details = response.component_details.unwrap();
        let ids: Vec<&str> = details.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["root", "t"]);
        assert_eq!(details[1].1.content, Some(json!("Hi")));
        assert_eq!(details[1].1.props["className"], "lead");
    }

    #[test]
    fn missing_sections_stay_none() {
        let response = AiResponse::from_value(&json!({"layout": null, "componentDetails": {}}));
        assert!(response.layout.is_none());
        assert_eq!(response.component_details, Some(vec![]));
    }

    #[test]
    fn details_without_type_are_dropped() {
        let response = AiResponse::from_value(&json!({
            "layout": {},
            "componentDetails": {"a": {"props": {}}, "b": {"type": "button"}}
        }));
        let details = response.component_details.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].0, "b");
    }

    #[test]
    fn non_object_payload_is_empty() {
        let response = AiResponse::from_value(&json!([1, 2, 3]));
        assert_eq!(response, AiResponse::default());
    }

    #[test]
    fn required_keys_check() {
        assert!(AiResponse::has_required_keys(&json!({
            "components": [], "layout": {}, "componentDetails": {}
        })));
        assert!(!AiResponse::has_required_keys(&json!({
            "components": [], "layout": null, "componentDetails": {}
        })));
    }
}
