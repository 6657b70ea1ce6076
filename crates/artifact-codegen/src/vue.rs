//! Vue 3 single-file component emitter (`<script setup>`).

use std::borrow::Cow;

use artifact_core::{ComponentNode, Framework, StyleMap};

use crate::emitter::{component_name, js_literal, js_string, reactive_bindings, CodeEmitter};
use crate::markup::{
    css_declarations, escape_attribute, render_forest, responsive_css, AttrValue, Dialect,
};
use crate::options::EmitOptions;

pub struct VueEmitter;

/// Shared by the Vue and Svelte templates, which use plain HTML attribute names.
pub(crate) fn html_attribute_name(name: &str) -> Cow<'_, str> {
    match name {
        "className" => Cow::Borrowed("class"),
        "htmlFor" => Cow::Borrowed("for"),
        other => Cow::Borrowed(other),
    }
}

struct VueDialect;

impl Dialect for VueDialect {
    fn attribute_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        html_attribute_name(name)
    }

    fn format_attribute(&self, name: &str, value: &AttrValue) -> String {
        match value {
            AttrValue::Text(text) => format!("{name}=\"{}\"", escape_attribute(text)),
            AttrValue::Expr(expr) => {
                format!(":{name}='{}'", js_literal(expr).replace('\'', "&#39;"))
            }
        }
    }

    fn format_styles(&self, styles: &StyleMap) -> String {
        format!("style=\"{}\"", escape_attribute(&css_declarations(styles)))
    }
}

impl CodeEmitter for VueEmitter {
    fn framework(&self) -> Framework {
        Framework::Vue
    }

    fn file_extension(&self) -> &'static str {
        "vue"
    }

    fn emit(&self, nodes: &[ComponentNode], options: &EmitOptions) -> String {
        let name = component_name(options);
        let bindings = reactive_bindings(options, &name);

        let mut out = String::from("<template>\n");
        out.push_str(&render_forest(nodes, &VueDialect, 1));
        out.push_str("</template>\n\n<script setup>\n");

        let mut imports = Vec::new();
        if !bindings.is_empty() {
            imports.push("ref");
        }
        if !bindings.data.is_empty() {
            imports.push("onMounted");
        }
        if !imports.is_empty() {
            out.push_str(&format!("import {{ {} }} from 'vue';\n\n", imports.join(", ")));
        }

        out.push_str(&format!("defineOptions({{ name: '{name}' }});\n"));

        if !bindings.is_empty() {
            out.push('\n');
        }
        for (var, value) in &bindings.state {
            out.push_str(&format!("const {var} = ref({});\n", js_literal(value)));
        }
        for (var, _) in &bindings.data {
            out.push_str(&format!("const {var} = ref(null);\n"));
        }
        for (var, url) in &bindings.data {
            out.push_str(&format!(
                concat!(
                    "\n",
                    "onMounted(async () => {{\n",
                    "  try {{\n",
                    "    const response = await fetch({url});\n",
                    "    {var}.value = await response.json();\n",
                    "  }} catch (error) {{\n",
                    "    console.error('Failed to load {var}', error);\n",
                    "  }}\n",
                    "}});\n",
                ),
                url = js_string(url),
                var = var,
            ));
        }

        out.push_str("</script>\n\n<style scoped>\n");
        if let Some(css) = responsive_css(nodes) {
            out.push_str(&css);
        }
        out.push_str("</style>\n");
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
            .with_style("backgroundColor", "white")
            .with_child(
                ComponentNode::with_id("title", ComponentType::Text)
                    .with_prop("children", "Hello World"),
            )
            .with_child(
                ComponentNode::with_id("cta", ComponentType::Button)
                    .with_prop("children", "Click me"),
            )
            .with_child(
                ComponentNode::with_id("email", ComponentType::Input)
                    .with_prop("placeholder", "Email")
                    .with_prop("required", true),
            )]
    }

    #[test]
    fn emits_sfc_without_bindings() {
        let code = VueEmitter.emit(&sample(), &EmitOptions::default());

        assert_eq!(
            code,
            concat!(
                "<template>\n",
                "  <div class=\"card\" style=\"background-color: white\">\n",
                "    <p>Hello World</p>\n",
                "    <button>Click me</button>\n",
                "    <input placeholder=\"Email\" :required='true' />\n",
                "  </div>\n",
                "</template>\n",
                "\n",
                "<script setup>\n",
                "defineOptions({ name: 'GeneratedComponent' });\n",
                "</script>\n",
                "\n",
                "<style scoped>\n",
                "</style>\n",
            )
        );
    }

    #[test]
    fn emits_refs_and_on_mounted_fetches() {
        let options = EmitOptions::new()
            .with_state("count", 3)
            .with_data_binding("posts", "https://api.example.com/posts");

        let code = VueEmitter.emit(&sample(), &options);

        assert!(code.contains("import { ref, onMounted } from 'vue';"));
        assert!(code.contains("const count = ref(3);\n"));
        assert!(code.contains("const posts = ref(null);\n"));
        assert!(code.contains("    const response = await fetch(\"https://api.example.com/posts\");\n"));
        assert!(code.contains("    posts.value = await response.json();\n"));

        let script = code.find("<script setup>").unwrap();
        let template = code.find("<template>").unwrap();
        let style = code.find("<style scoped>").unwrap();
        assert!(template < script && script < style);
    }

    #[test]
    fn object_props_are_bound_with_single_quotes() {
        let node = ComponentNode::with_id("c", ComponentType::Chart)
            .with_prop("data", json!({"label": "it's"}));
        let code = VueEmitter.emit(&[node], &EmitOptions::default());
        assert!(code.contains("<div :data='{\"label\":\"it&#39;s\"}'></div>"));
    }

    #[test]
    fn responsive_rules_land_in_scoped_style() {
        let node = ComponentNode::with_id("hero", ComponentType::Text)
            .with_responsive_style(Breakpoint::Sm, "padding", "4px");
        let code = VueEmitter.emit(&[node], &EmitOptions::default());
        let style = code.find("<style scoped>").unwrap();
        let media = code.find("@media (min-width: 640px)").unwrap();
        assert!(style < media);
    }
}
