//! Comment threads attached to a machine.
//!
//! DESIGN
//! ======
//! Comments are stored flat, each with an optional `parent_id`. The nested
//! view is rebuilt from the flat list on every read by `build_tree`; it is
//! never maintained incrementally.
//!
//! A comment whose parent does not resolve never reaches a root and is left
//! out of the tree. The same applies to a parent chain that loops.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::ReviewerRole;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub machine_id: Uuid,
    /// `None` for comments written under the admin override.
    pub author: Option<ReviewerRole>,
    pub body: String,
    /// Milliseconds since Unix epoch.
    pub ts: i64,
    pub parent_id: Option<Uuid>,
}

/// Deepest reply level accepted on a thread; a top-level comment is depth 0.
pub const MAX_REPLY_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    /// Total number of comments in this subtree, including the root.
    #[must_use]
    pub fn subtree_size(&self) -> usize {
        let mut size = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            size += 1;
            stack.extend(node.replies.iter());
        }
        size
    }
}

// Trees built from stored comments may predate the depth cap, so the
// default recursive drop is replaced with an explicit stack.
impl Drop for CommentNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.replies);
        }
    }
}

/// Nest a flat comment list into reply trees sorted by `(ts, id)` at every level.
#[must_use]
pub fn build_tree(comments: &[Comment]) -> Vec<CommentNode> {
    let mut children: HashMap<Option<Uuid>, Vec<&Comment>> = HashMap::new();
    for comment in comments {
        children.entry(comment.parent_id).or_default().push(comment);
    }
    for siblings in children.values_mut() {
        siblings.sort_by_key(|c| (c.ts, c.id));
    }

    // Pre-order walk from the roots. Unreachable comments never enter it.
    let mut order: Vec<&Comment> = Vec::with_capacity(comments.len());
    let mut stack: Vec<&Comment> = children.get(&None).map(|r| r.iter().rev().copied().collect()).unwrap_or_default();
    while let Some(comment) = stack.pop() {
        order.push(comment);
        if let Some(replies) = children.get(&Some(comment.id)) {
            stack.extend(replies.iter().rev().copied());
        }
    }

    // Reverse pre-order finishes every reply before its parent.
    let mut built: HashMap<Uuid, CommentNode> = HashMap::with_capacity(order.len());
    for comment in order.iter().rev() {
        let replies = children
            .get(&Some(comment.id))
            .map(|kids| kids.iter().filter_map(|kid| built.remove(&kid.id)).collect())
            .unwrap_or_default();
        built.insert(comment.id, CommentNode { comment: (*comment).clone(), replies });
    }
    let roots: Vec<CommentNode> = children
        .get(&None)
        .map(|r| r.iter().filter_map(|c| built.remove(&c.id)).collect())
        .unwrap_or_default();

    if order.len() < comments.len() {
        tracing::debug!(dropped = comments.len() - order.len(), "comments with unresolved parents left out of tree");
    }
    roots
}

/// Pre-order flattening of a built tree.
#[must_use]
pub fn flatten(nodes: &[CommentNode]) -> Vec<Comment> {
    let mut out = Vec::new();
    let mut stack: Vec<&CommentNode> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(node.comment.clone());
        stack.extend(node.replies.iter().rev());
    }
    out
}

/// Reply depth of comment `id`: 0 for a top-level comment, one more per
/// ancestor. `None` if `id` is not in `comments`. A looping parent chain
/// reports a depth past `MAX_REPLY_DEPTH`.
#[must_use]
pub fn depth_of(comments: &[Comment], id: Uuid) -> Option<usize> {
    let parents: HashMap<Uuid, Option<Uuid>> = comments.iter().map(|c| (c.id, c.parent_id)).collect();
    let mut current = *parents.get(&id)?;
    let mut depth = 0;
    while let Some(parent) = current {
        depth += 1;
        if depth > comments.len() {
            return Some(MAX_REPLY_DEPTH + 1);
        }
        current = parents.get(&parent).copied().flatten();
    }
    Some(depth)
}

#[cfg(test)]
#[path = "comment_test.rs"]
mod tests;
