//! Framework code emitters.
//!
//! A component forest is lowered once into a small markup AST
//! ([`markup::Element`]) and printed by a per-framework [`Dialect`], then
//! wrapped in the framework's file scaffolding by a [`CodeEmitter`].

pub mod emitter;
pub mod markup;
pub mod options;
pub mod react;
pub mod svelte;
pub mod vue;

use artifact_core::{ComponentNode, Framework};

pub use emitter::{emitter_for, CodeEmitter};
pub use markup::Dialect;
pub use options::{EmitOptions, DEFAULT_COMPONENT_NAME};
pub use react::ReactEmitter;
pub use svelte::SvelteEmitter;
pub use vue::VueEmitter;

/// Render `nodes` as a complete source file for `framework`.
pub fn generate_code(framework: Framework, nodes: &[ComponentNode], options: &EmitOptions) -> String {
    emitter_for(framework).emit(nodes, options)
}

pub fn generate_react_code(nodes: &[ComponentNode], options: &EmitOptions) -> String {
    ReactEmitter.emit(nodes, options)
}

pub fn generate_vue_code(nodes: &[ComponentNode], options: &EmitOptions) -> String {
    VueEmitter.emit(nodes, options)
}

pub fn generate_svelte_code(nodes: &[ComponentNode], options: &EmitOptions) -> String {
    SvelteEmitter.emit(nodes, options)
}
