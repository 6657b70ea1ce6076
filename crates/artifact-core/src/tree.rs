//! Rebuilds an owned ComponentNode forest from the flat AI payload.
//!
//! Parent/child links come from `layout[parent].children`. An edge is kept
//! only if both ends exist in `componentDetails`, the child has no parent
//! yet (first-seen wins), the edge does not close a cycle and the tree
//! stays within `MAX_TREE_DEPTH` levels. Everything
//! that ends up without a parent is a root, so no node is lost or
//! duplicated whatever the layout declares.

use std::collections::HashMap;

use serde_json::Value;

use crate::component::{ComponentNode, Position};
use crate::response::{AiResponse, ComponentDetail, LayoutEntry};

/// Canvas position of the first stacked node.
pub const ORIGIN_X: f64 = 50.0;
pub const ORIGIN_Y: f64 = 50.0;
/// Vertical gap between stacked siblings.
pub const STACK_GAP: f64 = 20.0;
/// Offset of children from their parent's top-left corner.
pub const CHILD_INSET: f64 = 20.0;
/// Maximum number of levels in a built tree, roots included. Edges that
/// would nest deeper are rejected like any other bad edge.
pub const MAX_TREE_DEPTH: usize = 64;

/// Convenience wrapper over [`build_component_tree`] for raw JSON.
pub fn build_component_tree_from_value(value: &Value) -> Vec<ComponentNode> {
    build_component_tree(&AiResponse::from_value(value))
}

/// Build the forest of roots, in `componentDetails` order.
///
/// Returns an empty forest when `layout` or `componentDetails` is missing.
pub fn build_component_tree(response: &AiResponse) -> Vec<ComponentNode> {
    let (Some(layout), Some(details)) = (&response.layout, &response.component_details) else {
        log::warn!("AI response is missing 'layout' or 'componentDetails'; returning no components");
        return Vec::new();
    };

    let layout_by_id: HashMap<&str, &LayoutEntry> = layout
        .iter()
        .map(|(id, entry)| (id.as_str(), entry))
        .collect();
    let index: HashMap<&str, usize> = details
        .iter()
        .enumerate()
        .map(|(idx, (id, _))| (id.as_str(), idx))
        .collect();

    let mut nodes: Vec<Option<ComponentNode>> = Vec::with_capacity(details.len());
    let mut next_y = ORIGIN_Y;
    for (id, detail) in details {
        let mut node = node_from_detail(id, detail, layout_by_id.get(id.as_str()).copied());
        node.position = Position::new(ORIGIN_X, next_y);
        next_y += node.size.height + STACK_GAP;
        nodes.push(Some(node));
    }

    for (id, _) in layout {
        if !index.contains_key(id.as_str()) {
            log::warn!("Layout entry '{}' has no matching component detail", id);
        }
    }

    let mut parent_of: Vec<Option<usize>> = vec![None; details.len()];
    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); details.len()];
    // Levels below each node in its accepted subtree.
    let mut height: Vec<usize> = vec![0; details.len()];

    for (parent_idx, (parent_id, _)) in details.iter().enumerate() {
        let Some(entry) = layout_by_id.get(parent_id.as_str()) else {
            continue;
        };

        for child_id in &entry.children {
            let Some(&child_idx) = index.get(child_id.as_str()) else {
                log::warn!(
                    "Layout of '{}' references unknown component '{}'",
                    parent_id,
                    child_id
                );
                continue;
            };

            if child_idx == parent_idx {
                log::warn!("Component '{}' lists itself as a child; ignoring", parent_id);
                continue;
            }

            if let Some(existing) = parent_of[child_idx] {
                log::warn!(
                    "Component '{}' already belongs to '{}'; ignoring second parent '{}'",
                    child_id,
                    details[existing].0,
                    parent_id
                );
                continue;
            }

            if is_ancestor(&parent_of, child_idx, parent_idx) {
                log::warn!(
                    "Attaching '{}' under '{}' would create a cycle; ignoring",
                    child_id,
                    parent_id
                );
                continue;
            }

            if depth_of(&parent_of, parent_idx) + 1 + height[child_idx] >= MAX_TREE_DEPTH {
                log::warn!(
                    "Attaching '{}' under '{}' would exceed {} levels; ignoring",
                    child_id,
                    parent_id,
                    MAX_TREE_DEPTH
                );
                continue;
            }

            parent_of[child_idx] = Some(parent_idx);
            children_of[parent_idx].push(child_idx);
            let levels = height[child_idx] + 1;
            raise_heights(&parent_of, &mut height, parent_idx, levels);
        }
    }

    let roots: Vec<usize> = (0..details.len())
        .filter(|idx| parent_of[*idx].is_none())
        .collect();

    log::debug!(
        "Built component tree: {} components, {} roots",
        details.len(),
        roots.len()
    );

    roots
        .into_iter()
        .filter_map(|idx| assemble(idx, &mut nodes, &children_of))
        .collect()
}

fn node_from_detail(
    id: &str,
    detail: &ComponentDetail,
    layout: Option<&LayoutEntry>,
) -> ComponentNode {
    let mut node = ComponentNode::with_id(id, detail.component_type.clone());
    node.props = detail.props.clone();

    if detail.component_type.takes_text_content() {
        if let Some(content) = &detail.content {
            node.props.insert("children".to_string(), content.clone());
        }
    }

    if let Some(layout) = layout {
        node.styles = layout.styles.clone();
    }

    node
}

/// Whether `candidate` is `node` or one of its ancestors.
fn is_ancestor(parent_of: &[Option<usize>], candidate: usize, node: usize) -> bool {
    let mut current = Some(node);
    while let Some(idx) = current {
        if idx == candidate {
            return true;
        }
        current = parent_of[idx];
    }
    false
}

/// Number of ancestors of `node`.
fn depth_of(parent_of: &[Option<usize>], node: usize) -> usize {
    let mut depth = 0;
    let mut current = parent_of[node];
    while let Some(idx) = current {
        depth += 1;
        current = parent_of[idx];
    }
    depth
}

/// Propagate a new subtree height of `levels` below `node` up to the root.
fn raise_heights(parent_of: &[Option<usize>], height: &mut [usize], node: usize, mut levels: usize) {
    let mut current = Some(node);
    while let Some(idx) = current {
        if height[idx] >= levels {
            break;
        }
        height[idx] = levels;
        levels += 1;
        current = parent_of[idx];
    }
}

/// Move node `idx` out of `nodes`, lay out and attach its children, and grow
/// its height to fit them.
fn assemble(
    idx: usize,
    nodes: &mut [Option<ComponentNode>],
    children_of: &[Vec<usize>],
) -> Option<ComponentNode> {
    let mut node = nodes[idx].take()?;
    let child_x = node.position.x + CHILD_INSET;
    let mut cursor_y = node.position.y + CHILD_INSET;

    for &child_idx in &children_of[idx] {
        if let Some(child) = nodes[child_idx].as_mut() {
            child.position = Position::new(child_x, cursor_y);
        }
        if let Some(child) = assemble(child_idx, nodes, children_of) {
            cursor_y += child.size.height + STACK_GAP;
            node.children.push(child);
        }
    }

    if !node.children.is_empty() {
        let required = cursor_y - STACK_GAP + CHILD_INSET - node.position.y;
        if required > node.size.height {
            node.size.height = required;
        }
    }

    Some(node)
}
