//! Walks the BSP tree to find the brush range belonging to a model.

use log::warn;

use vmfsrc_bsp::data::BspData;

/// Accumulates the minimum and maximum brush index over all leaves reachable
/// from a node.
pub struct TreeLimits<'a> {
    bsp: &'a BspData,
    min_brush_leaf: i32,
    max_brush_leaf: i32,
}

impl<'a> TreeLimits<'a> {
    pub fn new(bsp: &'a BspData) -> Self {
        TreeLimits {
            bsp,
            min_brush_leaf: i32::MAX,
            max_brush_leaf: -1,
        }
    }

    pub fn reset(&mut self) {
        self.min_brush_leaf = i32::MAX;
        self.max_brush_leaf = -1;
    }

    /// Descend from a node index. Negative indices address leaves as
    /// `-(node + 1)`.
    pub fn walk(&mut self, inode: i32) {
        if inode < 0 {
            let ileaf = (-inode - 1) as usize;
            let Some(leaf) = self.bsp.leaves.get(ileaf) else {
                warn!("Invalid leaf index {}", ileaf);
                return;
            };

            for i in 0..leaf.num_leaf_brushes {
                let entry = (leaf.fst_leaf_brush + i) as usize;
                let Some(&ibrush) = self.bsp.leaf_brushes.get(entry) else {
                    warn!("Invalid leaf brush entry {}", entry);
                    continue;
                };

                self.min_brush_leaf = self.min_brush_leaf.min(ibrush);
                self.max_brush_leaf = self.max_brush_leaf.max(ibrush);
            }
        } else {
            let Some(node) = self.bsp.nodes.get(inode as usize) else {
                warn!("Invalid node index {}", inode);
                return;
            };

            self.walk(node.children[0]);
            self.walk(node.children[1]);
        }
    }

    /// Lowest brush index seen, or `i32::MAX` when no leaf had brushes.
    pub fn min_brush_leaf(&self) -> i32 {
        self.min_brush_leaf
    }

    /// Highest brush index seen, or -1 when no leaf had brushes.
    pub fn max_brush_leaf(&self) -> i32 {
        self.max_brush_leaf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmfsrc_bsp::data::{DLeaf, DNode};

    fn leaf(fst: i32, num: i32) -> DLeaf {
        DLeaf {
            contents: 0,
            cluster: 0,
            area_flags: 0,
            fst_leaf_face: 0,
            num_leaf_faces: 0,
            fst_leaf_brush: fst,
            num_leaf_brushes: num,
        }
    }

    #[test]
    fn walk_collects_brush_range() {
        let bsp = BspData {
            nodes: vec![DNode {
                plane_num: 0,
                children: [-1, -2],
                fst_face: 0,
                num_face: 0,
            }]
            .into_boxed_slice(),
            leaves: vec![leaf(0, 2), leaf(2, 1)].into_boxed_slice(),
            leaf_brushes: vec![4, 1, 7].into_boxed_slice(),
            ..Default::default()
        };

        let mut limits = TreeLimits::new(&bsp);
        limits.walk(0);

        assert_eq!(limits.min_brush_leaf(), 1);
        assert_eq!(limits.max_brush_leaf(), 7);

        limits.reset();
        limits.walk(-1);
        assert_eq!(limits.min_brush_leaf(), 1);
        assert_eq!(limits.max_brush_leaf(), 4);
    }

    #[test]
    fn empty_leaves_leave_no_range() {
        let bsp = BspData {
            leaves: vec![leaf(0, 0)].into_boxed_slice(),
            ..Default::default()
        };

        let mut limits = TreeLimits::new(&bsp);
        limits.walk(-1);

        assert_eq!(limits.min_brush_leaf(), i32::MAX);
        assert_eq!(limits.max_brush_leaf(), -1);
    }
}
