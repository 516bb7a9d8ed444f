use crate::ir::Branch;

use super::Side;

/// Number of branches placed on the right: the larger half.
pub fn split_point(branch_count: usize) -> usize {
    branch_count.div_ceil(2)
}

/// Branches of each side in top-to-bottom order.
///
/// Reading the right column downwards and then the left column upwards visits
/// the branches in their original order, which is the clockwise sweep
/// starting at the top right.
#[derive(Debug, Clone)]
pub struct SideAllocation<'a> {
    pub right: Vec<&'a Branch>,
    pub left: Vec<&'a Branch>,
}

impl<'a> SideAllocation<'a> {
    pub fn branches(&self, side: Side) -> &[&'a Branch] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn sides(&self) -> impl Iterator<Item = (Side, &[&'a Branch])> {
        [Side::Right, Side::Left]
            .into_iter()
            .map(|side| (side, self.branches(side)))
    }

    pub fn len(&self) -> usize {
        self.right.len() + self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn allocate_sides(branches: &[Branch]) -> SideAllocation<'_> {
    let mid = split_point(branches.len());
    let right = branches[..mid].iter().collect();
    let left = branches[mid..].iter().rev().collect();
    SideAllocation { right, left }
}
