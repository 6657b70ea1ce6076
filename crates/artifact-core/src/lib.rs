//! artifact-core - Core types for the Artifact Studio generation pipeline
//!
//! This crate provides the pieces shared by every other crate in the workspace:
//! - `component` - ComponentNode and its closed set of component types
//! - `request` - AI generation request options and sanitisation
//! - `response` - boundary schema for the raw AI JSON payload
//! - `tree` - rebuilds a ComponentNode forest from the flat AI payload
//! - `config` - file and environment configuration
//! - `storage` - canvas / app state / api data snapshots

pub mod component;
pub mod config;
pub mod paths;
pub mod request;
pub mod response;
pub mod storage;
pub mod tree;

// Re-export commonly used types
pub use component::{forest_size, Breakpoint, ComponentNode, ComponentType, Position, Size, StyleMap};
pub use config::{Config, ProviderSettings, ProvidersConfig};
pub use request::{
    Framework, GenerationRequest, Interactivity, RequestError, Styling, Theme, MAX_PROMPT_CHARS,
};
pub use response::{AiResponse, ComponentDetail, ComponentRef, LayoutEntry};
pub use storage::{SnapshotKey, SnapshotStore, StorageError};
pub use tree::{build_component_tree, build_component_tree_from_value, MAX_TREE_DEPTH};
