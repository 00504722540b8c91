//! Build the stack table by walking parent links from each leaf frame.
//!
//! A Hermes sample names only its leaf frame; the full call stack is the
//! chain of `parent` links up to a root. Each distinct leaf becomes one
//! stack of frame-table indices, leaf first.
//!
//! Example: registry `render -> main -> [root]`, leaf `render`
//! gives `[idx(render), idx(main), idx([root])]`.

use super::frame_table::FrameTable;
use crate::parser::{FrameId, HermesStackFrame, Stack, StackRef};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Stack table plus the leaf id → stack index lookup
#[derive(Debug, Clone, Default)]
pub struct StackTable {
    pub stacks: Vec<Stack>,
    index_by_leaf: HashMap<FrameId, usize>,
}

impl StackTable {
    /// Resolve a sample's leaf frame to its stack
    ///
    /// Leaves that never made it into the table resolve to `Unknown`.
    pub fn resolve(&self, leaf_frame_id: FrameId) -> StackRef {
        self.index_by_leaf
            .get(&leaf_frame_id)
            .copied()
            .map_or(StackRef::Unknown, StackRef::Known)
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    pub fn into_stacks(self) -> Vec<Stack> {
        self.stacks
    }
}

/// Build one stack per distinct leaf frame
///
/// **Public** - third conversion stage
///
/// # Arguments
/// * `leaf_frame_ids` - Distinct leaf ids, in the order stacks should be numbered
/// * `registry` - Raw frame registry
/// * `frame_table` - Frame table built from the same registry
///
/// # Returns
/// Stack table; leaves absent from the registry (detached) get no entry
pub fn build_stack_table(
    leaf_frame_ids: &[FrameId],
    registry: &BTreeMap<FrameId, HermesStackFrame>,
    frame_table: &FrameTable,
) -> StackTable {
    debug!("Building stacks for {} distinct leaf frames", leaf_frame_ids.len());

    let mut table = StackTable::default();

    for &leaf in leaf_frame_ids {
        if table.index_by_leaf.contains_key(&leaf) {
            continue;
        }
        if !registry.contains_key(&leaf) {
            debug!("Leaf frame {} is not in the registry, samples will use the unknown stack", leaf);
            continue;
        }

        table.index_by_leaf.insert(leaf, table.stacks.len());
        table.stacks.push(walk_stack(leaf, registry, frame_table));
    }

    debug!("Built {} stacks", table.stacks.len());

    table
}

/// Follow parent links from `leaf` to a root
///
/// Visits each registry frame at most once, so the walk is bounded by the
/// registry size. A parent cycle truncates the stack where it loops back.
fn walk_stack(
    leaf: FrameId,
    registry: &BTreeMap<FrameId, HermesStackFrame>,
    frame_table: &FrameTable,
) -> Stack {
    let mut stack = Stack::new();
    let mut visited = HashSet::new();
    let mut current = Some(leaf);

    while let Some(frame_id) = current {
        // Detached ancestor: nothing more to follow
        let Some(raw) = registry.get(&frame_id) else {
            break;
        };
        if !visited.insert(frame_id) {
            warn!(
                "Parent cycle at frame {} while walking stack of leaf {}, truncating after {} frames",
                frame_id,
                leaf,
                stack.len()
            );
            break;
        }

        if let Some(index) = frame_table.index_of(frame_id) {
            stack.push(index);
        }
        current = raw.parent_id;
    }

    stack
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::frame_table::build_frame_table;
    use pretty_assertions::assert_eq;

    fn registry(entries: &[(u64, Option<u64>)]) -> BTreeMap<FrameId, HermesStackFrame> {
        entries
            .iter()
            .map(|&(id, parent)| {
                let frame = HermesStackFrame {
                    name: format!("f{}(app.js:{}:1)", id, id),
                    parent_id: parent.map(FrameId),
                    ..HermesStackFrame::default()
                };
                (FrameId(id), frame)
            })
            .collect()
    }

    #[test]
    fn test_stack_is_leaf_first() {
        // 1 is the root, 3 -> 2 -> 1
        let registry = registry(&[(1, None), (2, Some(1)), (3, Some(2))]);
        let frames = build_frame_table(&registry);

        let table = build_stack_table(&[FrameId(3)], &registry, &frames);

        assert_eq!(table.stacks, vec![vec![2, 1, 0]]);
        assert_eq!(table.resolve(FrameId(3)), StackRef::Known(0));
    }

    #[test]
    fn test_shared_ancestors() {
        let registry = registry(&[(1, None), (2, Some(1)), (3, Some(2)), (4, Some(2))]);
        let frames = build_frame_table(&registry);

        let table = build_stack_table(&[FrameId(4), FrameId(3)], &registry, &frames);

        assert_eq!(table.stacks, vec![vec![3, 1, 0], vec![2, 1, 0]]);
        assert_eq!(table.resolve(FrameId(4)), StackRef::Known(0));
        assert_eq!(table.resolve(FrameId(3)), StackRef::Known(1));
    }

    #[test]
    fn test_detached_leaf_has_no_stack() {
        let registry = registry(&[(1, None)]);
        let frames = build_frame_table(&registry);

        let table = build_stack_table(&[FrameId(42), FrameId(1)], &registry, &frames);

        assert_eq!(table.stacks, vec![vec![0]]);
        assert_eq!(table.resolve(FrameId(42)), StackRef::Unknown);
        assert_eq!(table.resolve(FrameId(1)), StackRef::Known(0));
    }

    #[test]
    fn test_detached_ancestor_gives_partial_stack() {
        // 2's parent 7 was never recorded
        let registry = registry(&[(2, Some(7)), (3, Some(2))]);
        let frames = build_frame_table(&registry);

        let table = build_stack_table(&[FrameId(3)], &registry, &frames);

        assert_eq!(table.stacks, vec![vec![1, 0]]);
    }

    #[test]
    fn test_parent_cycle_is_truncated() {
        let registry = registry(&[(1, Some(3)), (2, Some(1)), (3, Some(2))]);
        let frames = build_frame_table(&registry);

        let table = build_stack_table(&[FrameId(3)], &registry, &frames);

        assert_eq!(table.stacks, vec![vec![2, 1, 0]]);
    }

    #[test]
    fn test_self_parent_is_truncated() {
        let registry = registry(&[(5, Some(5))]);
        let frames = build_frame_table(&registry);

        let table = build_stack_table(&[FrameId(5)], &registry, &frames);

        assert_eq!(table.stacks, vec![vec![0]]);
    }

    #[test]
    fn test_duplicate_leaf_ids_share_one_stack() {
        let registry = registry(&[(1, None), (2, Some(1))]);
        let frames = build_frame_table(&registry);

        let table = build_stack_table(&[FrameId(2), FrameId(2)], &registry, &frames);

        assert_eq!(table.len(), 1);
    }
}
