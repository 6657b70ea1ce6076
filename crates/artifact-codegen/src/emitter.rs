use std::collections::HashSet;

use artifact_core::{ComponentNode, Framework};
use serde_json::Value;

use crate::options::{EmitOptions, DEFAULT_COMPONENT_NAME};
use crate::react::ReactEmitter;
use crate::svelte::SvelteEmitter;
use crate::vue::VueEmitter;

/// Renders a component forest into one self-contained source file.
pub trait CodeEmitter: Send + Sync {
    fn framework(&self) -> Framework;

    /// File extension of the emitted source, without the dot.
    fn file_extension(&self) -> &'static str;

    fn emit(&self, nodes: &[ComponentNode], options: &EmitOptions) -> String;
}

pub fn emitter_for(framework: Framework) -> &'static dyn CodeEmitter {
    match framework {
        Framework::React => &ReactEmitter,
        Framework::Vue => &VueEmitter,
        Framework::Svelte => &SvelteEmitter,
    }
}

const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "import", "in", "instanceof", "let", "new", "null", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

pub(crate) fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !RESERVED_WORDS.contains(&name)
}

/// `count` -> `setCount`
pub(crate) fn setter_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => "set".to_string(),
    }
}

/// Exported component identifier, PascalCase, falling back to the default.
pub(crate) fn component_name(options: &EmitOptions) -> String {
    let name = options.component_name.trim();
    if !is_js_identifier(name) {
        log::warn!(
            "Invalid component name {:?}; using {}",
            options.component_name,
            DEFAULT_COMPONENT_NAME
        );
        return DEFAULT_COMPONENT_NAME.to_string();
    }

    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => DEFAULT_COMPONENT_NAME.to_string(),
    }
}

/// State and data bindings that can be emitted as valid code.
pub(crate) struct ReactiveBindings<'a> {
    pub state: Vec<(&'a str, &'a Value)>,
    pub data: Vec<(&'a str, &'a str)>,
}

impl ReactiveBindings<'_> {
    pub fn is_empty(&self) -> bool {
        self.state.is_empty() && self.data.is_empty()
    }
}

/// Names the emitted files declare or import themselves.
const GENERATED_NAMES: &[&str] = &[
    "React", "useState", "useEffect", "ref", "onMounted", "defineOptions", "onMount", "fetch",
    "console", "response", "error", "data",
];

/// Keep only bindings that cannot collide with each other, with React
/// setters, or with the names in [`GENERATED_NAMES`] and `component`.
pub(crate) fn reactive_bindings<'a>(
    options: &'a EmitOptions,
    component: &str,
) -> ReactiveBindings<'a> {
    let mut taken: HashSet<String> = GENERATED_NAMES.iter().map(|n| n.to_string()).collect();
    taken.insert(component.to_string());

    let mut claim = |kind: &str, name: &str| -> bool {
        if !is_js_identifier(name) {
            log::warn!("Skipping {} with invalid name {:?}", kind, name);
            return false;
        }
        let setter = setter_name(name);
        if taken.contains(name) || taken.contains(&setter) {
            log::warn!("Skipping {} {:?}: name is already in use", kind, name);
            return false;
        }
        taken.insert(name.to_string());
        taken.insert(setter);
        true
    };

    let state = options
        .state
        .iter()
        .filter(|(name, _)| claim("state variable", name.as_str()))
        .map(|(name, value)| (name.as_str(), value))
        .collect::<Vec<_>>();

    let data = options
        .data_bindings
        .iter()
        .filter(|(name, _)| {
            if options.state.contains_key(name.as_str()) {
                log::warn!("Data binding {:?} shadows a state variable; skipping", name);
                return false;
            }
            claim("data binding", name.as_str())
        })
        .map(|(name, url)| (name.as_str(), url.as_str()))
        .collect();

    ReactiveBindings { state, data }
}

/// JSON value as a JavaScript literal.
pub(crate) fn js_literal(value: &Value) -> String {
    value.to_string()
}

/// Double-quoted JavaScript string literal.
pub(crate) fn js_string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}
