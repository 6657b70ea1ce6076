use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_COMPONENT_NAME: &str = "GeneratedComponent";

/// Extra inputs for an emitter besides the component forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmitOptions {
    /// Name of the exported top-level component.
    #[serde(default = "default_component_name")]
    pub component_name: String,

    /// State variable name -> initial value.
    #[serde(default)]
    pub state: BTreeMap<String, Value>,

    /// Binding name -> URL fetched once on mount.
    #[serde(default)]
    pub data_bindings: BTreeMap<String, String>,
}

fn default_component_name() -> String {
    DEFAULT_COMPONENT_NAME.to_string()
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            component_name: default_component_name(),
            state: BTreeMap::new(),
            data_bindings: BTreeMap::new(),
        }
    }
}

impl EmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component_name(mut self, name: impl Into<String>) -> Self {
        self.component_name = name.into();
        self
    }

    pub fn with_state(mut self, name: impl Into<String>, initial: impl Into<Value>) -> Self {
        self.state.insert(name.into(), initial.into());
        self
    }

    pub fn with_data_binding(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.data_bindings.insert(name.into(), url.into());
        self
    }
}
