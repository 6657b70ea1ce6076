//! React function component (TSX) emitter.

use std::borrow::Cow;

use artifact_core::{ComponentNode, Framework, StyleMap};

use crate::emitter::{
    component_name, is_js_identifier, js_literal, js_string, reactive_bindings, setter_name,
    CodeEmitter,
};
use crate::markup::{
    camel_case, escape_attribute, indent_lines, render_forest, responsive_css, AttrValue, Dialect,
};
use crate::options::EmitOptions;

pub struct ReactEmitter;

struct JsxDialect;

impl Dialect for JsxDialect {
    fn attribute_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match name {
            "class" => Cow::Borrowed("className"),
            "for" => Cow::Borrowed("htmlFor"),
            other => Cow::Borrowed(other),
        }
    }

    fn format_attribute(&self, name: &str, value: &AttrValue) -> String {
        match value {
            AttrValue::Text(text) => format!("{name}=\"{}\"", escape_attribute(text)),
            AttrValue::Expr(expr) => format!("{name}={{{}}}", js_literal(expr)),
        }
    }

    fn format_styles(&self, styles: &StyleMap) -> String {
        let entries = styles
            .iter()
            .map(|(property, value)| {
                let key = camel_case(property);
                let key = if is_js_identifier(&key) {
                    key
                } else {
                    js_string(&key)
                };
                format!("{key}: {}", js_string(value))
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("style={{{{ {entries} }}}}")
    }
}

impl CodeEmitter for ReactEmitter {
    fn framework(&self) -> Framework {
        Framework::React
    }

    fn file_extension(&self) -> &'static str {
        "tsx"
    }

    fn emit(&self, nodes: &[ComponentNode], options: &EmitOptions) -> String {
        let name = component_name(options);
        let bindings = reactive_bindings(options, &name);

        let mut hooks = Vec::new();
        if !bindings.is_empty() {
            hooks.push("useState");
        }
        if !bindings.data.is_empty() {
            hooks.push("useEffect");
        }

        let mut out = String::new();
        if hooks.is_empty() {
            out.push_str("import React from 'react';\n\n");
        } else {
            out.push_str(&format!(
                "import React, {{ {} }} from 'react';\n\n",
                hooks.join(", ")
            ));
        }

        out.push_str(&format!("export default function {name}() {{\n"));

        for (var, value) in &bindings.state {
            out.push_str(&format!(
                "  const [{var}, {}] = useState({});\n",
                setter_name(var),
                js_literal(value)
            ));
        }
        for (var, _) in &bindings.data {
            out.push_str(&format!(
                "  const [{var}, {}] = useState<any>(null);\n",
                setter_name(var)
            ));
        }
        for (var, url) in &bindings.data {
            out.push_str(&format!(
                concat!(
                    "\n",
                    "  useEffect(() => {{\n",
                    "    fetch({url})\n",
                    "      .then((response) => response.json())\n",
                    "      .then((data) => {setter}(data))\n",
                    "      .catch((error) => console.error('Failed to load {var}', error));\n",
                    "  }}, []);\n",
                ),
                url = js_string(url),
                setter = setter_name(var),
                var = var,
            ));
        }
        if !bindings.is_empty() {
            out.push('\n');
        }

        out.push_str("  return (\n    <>\n");
        if let Some(css) = responsive_css(nodes) {
            let css = css.replace('`', "\\`").replace("${", "\\${");
            out.push_str("      <style>{`\n");
            out.push_str(&indent_lines(&css, 4));
            out.push_str("\n      `}</style>\n");
        }
        out.push_str(&render_forest(nodes, &JsxDialect, 3));
        out.push_str("    </>\n  );\n}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_core::{Breakpoint, ComponentType};
    use serde_json::json;

    fn sample() -> Vec<ComponentNode> {
        vec![ComponentNode::with_id("root", ComponentType::Container)
            .with_prop("className", "card")
            .with_style("background-color", "white")
            .with_child(
                ComponentNode::with_id("title", ComponentType::Text)
                    .with_prop("children", "Hello World"),
            )
            .with_child(
                ComponentNode::with_id("cta", ComponentType::Button)
                    .with_prop("children", "Click me")
                    .with_prop("disabled", false),
            )]
    }

    #[test]
    fn emits_full_component_without_bindings() {
        let code = ReactEmitter.emit(&sample(), &EmitOptions::default());

        assert_eq!(
            code,
            concat!(
                "import React from 'react';\n",
                "\n",
                "export default function GeneratedComponent() {\n",
                "  return (\n",
                "    <>\n",
                "      <div className=\"card\" style={{ backgroundColor: \"white\" }}>\n",
                "        <p>Hello World</p>\n",
                "        <button disabled={false}>Click me</button>\n",
                "      </div>\n",
                "    </>\n",
                "  );\n",
                "}\n",
            )
        );
    }

    #[test]
    fn emits_state_and_data_bindings_before_render() {
        let options = EmitOptions::new()
            .with_component_name("UserList")
            .with_state("count", 0)
            .with_state("filters", json!({"active": true}))
            .with_data_binding("users", "https://api.example.com/users");

        let code = ReactEmitter.emit(&sample(), &options);

        assert!(code.starts_with("import React, { useState, useEffect } from 'react';"));
        assert!(code.contains("export default function UserList() {"));
        assert!(code.contains("  const [count, setCount] = useState(0);\n"));
        assert!(code.contains("  const [filters, setFilters] = useState({\"active\":true});\n"));
        assert!(code.contains("  const [users, setUsers] = useState<any>(null);\n"));
        assert!(code.contains("    fetch(\"https://api.example.com/users\")\n"));
        assert!(code.contains(".then((data) => setUsers(data))"));
        assert!(code.contains("  }, []);\n"));

        let effect = code.find("useEffect(() =>").unwrap();
        let render = code.find("return (").unwrap();
        assert!(effect < render);
    }

    #[test]
    fn class_prop_is_renamed_and_custom_properties_are_quoted() {
        let node = ComponentNode::with_id("x", ComponentType::Container)
            .with_prop("class", "box")
            .with_style("--accent", "red");
        let code = ReactEmitter.emit(&[node], &EmitOptions::default());
        assert!(code.contains("<div className=\"box\" style={{ \"--accent\": \"red\" }}></div>"));
    }

    #[test]
    fn responsive_styles_are_emitted_as_style_tag() {
        let node = ComponentNode::with_id("hero", ComponentType::Text)
            .with_prop("children", "Hi")
            .with_responsive_style(Breakpoint::Md, "fontSize", "2rem");
        let code = ReactEmitter.emit(&[node], &EmitOptions::default());

        assert!(code.contains("<style>{`"));
        assert!(code.contains("@media (min-width: 768px)"));
        assert!(code.contains("<p data-artifact-id=\"hero\">Hi</p>"));
    }
}
