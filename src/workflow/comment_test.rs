use super::*;

fn comment(machine_id: Uuid, ts: i64, parent_id: Option<Uuid>) -> Comment {
    Comment {
        id: Uuid::new_v4(),
        machine_id,
        author: Some(ReviewerRole::Leader),
        body: format!("at {ts}"),
        ts,
        parent_id,
    }
}

#[test]
fn empty_input_builds_empty_tree() {
    assert!(build_tree(&[]).is_empty());
}

#[test]
fn roots_and_replies_are_sorted_by_timestamp() {
    let machine = Uuid::new_v4();
    let late_root = comment(machine, 300, None);
    let early_root = comment(machine, 100, None);
    let reply_b = comment(machine, 250, Some(early_root.id));
    let reply_a = comment(machine, 150, Some(early_root.id));

    let tree = build_tree(&[late_root.clone(), reply_b.clone(), early_root.clone(), reply_a.clone()]);

    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].comment.id, early_root.id);
    assert_eq!(tree[1].comment.id, late_root.id);
    let reply_ids: Vec<_> = tree[0].replies.iter().map(|n| n.comment.id).collect();
    assert_eq!(reply_ids, vec![reply_a.id, reply_b.id]);
    assert!(tree[1].replies.is_empty());
}

#[test]
fn nested_replies_are_attached_at_depth() {
    let machine = Uuid::new_v4();
    let root = comment(machine, 1, None);
    let child = comment(machine, 2, Some(root.id));
    let grandchild = comment(machine, 3, Some(child.id));

    let tree = build_tree(&[grandchild.clone(), child, root]);
    assert_eq!(tree[0].replies[0].replies[0].comment.id, grandchild.id);
    assert_eq!(tree[0].subtree_size(), 3);
}

#[test]
fn orphan_comment_is_dropped() {
    let machine = Uuid::new_v4();
    let root = comment(machine, 1, None);
    let orphan = comment(machine, 2, Some(Uuid::new_v4()));

    let tree = build_tree(&[root.clone(), orphan]);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].comment.id, root.id);
    assert!(tree[0].replies.is_empty());
}

#[test]
fn parent_cycle_is_dropped_without_looping() {
    let machine = Uuid::new_v4();
    let mut a = comment(machine, 1, None);
    let b = comment(machine, 2, Some(a.id));
    a.parent_id = Some(b.id);

    assert!(build_tree(&[a, b]).is_empty());
}

#[test]
fn flatten_then_rebuild_reproduces_tree() {
    let machine = Uuid::new_v4();
    let root_a = comment(machine, 10, None);
    let root_b = comment(machine, 20, None);
    let reply = comment(machine, 15, Some(root_a.id));
    let nested = comment(machine, 16, Some(reply.id));

    let tree = build_tree(&[nested, root_b, reply, root_a]);
    let rebuilt = build_tree(&flatten(&tree));
    assert_eq!(rebuilt, tree);
}

#[test]
fn node_serializes_flattened_with_replies() {
    let machine = Uuid::new_v4();
    let root = comment(machine, 1, None);
    let tree = build_tree(&[root.clone()]);
    let json = serde_json::to_value(&tree[0]).unwrap();
    assert_eq!(json["id"], serde_json::json!(root.id));
    assert_eq!(json["author"], "leader");
    assert!(json["replies"].as_array().unwrap().is_empty());
}

#[test]
fn deep_chain_builds_counts_and_flattens() {
    let machine = Uuid::new_v4();
    let mut chain = vec![comment(machine, 0, None)];
    for ts in 1..50_000 {
        let parent = chain[chain.len() - 1].id;
        chain.push(comment(machine, ts, Some(parent)));
    }

    let tree = build_tree(&chain);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].subtree_size(), 50_000);
    let flat = flatten(&tree);
    assert_eq!(flat.len(), 50_000);
    assert_eq!(flat[49_999].id, chain[49_999].id);
}

#[test]
fn depth_counts_ancestors() {
    let machine = Uuid::new_v4();
    let root = comment(machine, 1, None);
    let reply = comment(machine, 2, Some(root.id));
    let nested = comment(machine, 3, Some(reply.id));
    let all = [root.clone(), reply, nested.clone()];

    assert_eq!(depth_of(&all, root.id), Some(0));
    assert_eq!(depth_of(&all, nested.id), Some(2));
    assert_eq!(depth_of(&all, Uuid::new_v4()), None);
}

#[test]
fn depth_of_loop_exceeds_cap() {
    let machine = Uuid::new_v4();
    let mut a = comment(machine, 1, None);
    let b = comment(machine, 2, Some(a.id));
    a.parent_id = Some(b.id);

    assert!(depth_of(&[a.clone(), b], a.id).unwrap() > MAX_REPLY_DEPTH);
}
