//! Svelte single-file component emitter.

use std::borrow::Cow;

use artifact_core::{ComponentNode, Framework, StyleMap};

use crate::emitter::{component_name, js_literal, js_string, reactive_bindings, CodeEmitter};
use crate::markup::{
    css_declarations, escape_attribute, indent_lines, render_forest, responsive_css, AttrValue,
    Dialect,
};
use crate::options::EmitOptions;
use crate::vue::html_attribute_name;

pub struct SvelteEmitter;

struct SvelteDialect;

impl Dialect for SvelteDialect {
    fn attribute_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        html_attribute_name(name)
    }

    fn format_attribute(&self, name: &str, value: &AttrValue) -> String {
        match value {
            AttrValue::Text(text) => format!("{name}=\"{}\"", escape_attribute(text)),
            AttrValue::Expr(expr) => format!("{name}={{{}}}", js_literal(expr)),
        }
    }

    fn format_styles(&self, styles: &StyleMap) -> String {
        format!("style=\"{}\"", escape_attribute(&css_declarations(styles)))
    }
}

impl CodeEmitter for SvelteEmitter {
    fn framework(&self) -> Framework {
        Framework::Svelte
    }

    fn file_extension(&self) -> &'static str {
        "svelte"
    }

    fn emit(&self, nodes: &[ComponentNode], options: &EmitOptions) -> String {
        let name = component_name(options);
        let bindings = reactive_bindings(options, &name);

        let mut out = format!("<!-- {name}.svelte -->\n<script>\n");

        if !bindings.data.is_empty() {
            out.push_str("  import { onMount } from 'svelte';\n\n");
        }
        for (var, value) in &bindings.state {
            out.push_str(&format!("  let {var} = {};\n", js_literal(value)));
        }
        for (var, _) in &bindings.data {
            out.push_str(&format!("  let {var} = null;\n"));
        }
        for (var, url) in &bindings.data {
            out.push_str(&format!(
                concat!(
                    "\n",
                    "  onMount(async () => {{\n",
                    "    try {{\n",
                    "      const response = await fetch({url});\n",
                    "      {var} = await response.json();\n",
                    "    }} catch (error) {{\n",
                    "      console.error('Failed to load {var}', error);\n",
                    "    }}\n",
                    "  }});\n",
                ),
                url = js_string(url),
                var = var,
            ));
        }
        out.push_str("</script>\n\n");

        out.push_str(&render_forest(nodes, &SvelteDialect, 0));

        out.push_str("\n<style>\n");
        if let Some(css) = responsive_css(nodes) {
            out.push_str(&indent_lines(&css, 1));
            out.push('\n');
        }
        out.push_str("</style>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_core::ComponentType;

    fn sample() -> Vec<ComponentNode> {
        vec![ComponentNode::with_id("root", ComponentType::Container)
            .with_child(
                ComponentNode::with_id("title", ComponentType::Text)
                    .with_prop("children", "Hello World"),
            )
            .with_child(
                ComponentNode::with_id("cta", ComponentType::Button)
                    .with_prop("children", "Click me")
                    .with_prop("className", "btn"),
            )
            .with_child(
                ComponentNode::with_id("logo", ComponentType::Image)
                    .with_prop("src", "/logo.png")
                    .with_prop("width", 64),
            )]
    }

    #[test]
    fn emits_script_markup_and_style() {
        let code = SvelteEmitter.emit(&sample(), &EmitOptions::default());

        assert_eq!(
            code,
            concat!(
                "<!-- GeneratedComponent.svelte -->\n",
                "<script>\n",
                "</script>\n",
                "\n",
                "<div>\n",
                "  <p>Hello World</p>\n",
                "  <button class=\"btn\">Click me</button>\n",
                "  <img src=\"/logo.png\" width={64} />\n",
                "</div>\n",
                "\n",
                "<style>\n",
                "</style>\n",
            )
        );
    }

    #[test]
    fn emits_lets_and_on_mount() {
        let options = EmitOptions::new()
            .with_state("name", "Ada")
            .with_data_binding("weather", "https://api.example.com/weather?city=x&units=metric");

        let code = SvelteEmitter.emit(&sample(), &options);

        assert!(code.contains("  import { onMount } from 'svelte';\n"));
        assert!(code.contains("  let name = \"Ada\";\n"));
        assert!(code.contains("  let weather = null;\n"));
        assert!(code.contains(
            "      const response = await fetch(\"https://api.example.com/weather?city=x&units=metric\");\n"
        ));
        assert!(code.contains("      weather = await response.json();\n"));
        assert!(code.find("</script>").unwrap() < code.find("<div>").unwrap());
    }

    #[test]
    fn state_without_data_bindings_needs_no_import() {
        let options = EmitOptions::new().with_state("open", false);
        let code = SvelteEmitter.emit(&[], &options);
        assert!(!code.contains("import"));
        assert!(code.contains("  let open = false;\n"));
    }
}
