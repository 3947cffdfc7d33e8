use std::cmp::Ordering;
use std::fmt::{Display, Write};

use crate::balance::{Balance, Side};

/// A subtree: `None` is the empty sentinel every recursion below is total over.
pub(crate) type Link<T> = Option<Box<Node<T>>>;

/// A node of the rank-augmented AVL tree.
///
/// INVARIANTS (between public operations):
/// - `rank` is the number of nodes in the left subtree
/// - `balance` names the taller child, and the heights differ by at most one
#[derive(Debug, Clone)]
pub struct Node<T> {
    symbol: T,
    left: Link<T>,
    right: Link<T>,
    rank: usize,
    balance: Balance,
}

/// What a mutation did to the subtree it ran on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Outcome {
    /// The subtree grew taller (insert) or got shorter (remove).
    pub height_changed: bool,
    /// Primitive rotations performed; a double rotation counts two.
    pub rotations: usize,
}

#[derive(Debug)]
pub(crate) struct Removed<T> {
    pub symbol: T,
    pub outcome: Outcome,
}

impl<T> Node<T> {
    pub(crate) fn leaf(symbol: T) -> Self {
        Self {
            symbol,
            left: None,
            right: None,
            rank: 0,
            balance: Balance::Same,
        }
    }

    pub fn symbol(&self) -> &T {
        &self.symbol
    }

    /// Size of the left subtree; also this node's position within its own subtree.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub fn left(&self) -> Option<&Node<T>> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node<T>> {
        self.right.as_deref()
    }

    /// Number of nodes in this subtree, walking the right spine.
    pub fn len(&self) -> usize {
        let mut node = self;
        let mut len = 0;
        loop {
            len += node.rank + 1;
            match node.right.as_deref() {
                Some(right) => node = right,
                None => return len,
            }
        }
    }

    fn child_mut(&mut self, side: Side) -> &mut Link<T> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

// * p         * c
//  \         / \
//   * c  =>  p  *
//  / \       \
// x   *       x
fn rotate_left<T>(mut parent: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut child) = parent.right.take() else {
        return parent;
    };
    log::trace!("rotate left: pivot rank {}, child rank {}", parent.rank, child.rank);
    parent.right = child.left.take();
    child.rank += parent.rank + 1;
    child.left = Some(parent);
    child
}

fn rotate_right<T>(mut parent: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut child) = parent.left.take() else {
        return parent;
    };
    log::trace!("rotate right: pivot rank {}, child rank {}", parent.rank, child.rank);
    parent.left = child.right.take();
    parent.rank -= child.rank + 1;
    child.right = Some(parent);
    child
}

/// Promotes the child on `heavy`.
fn rotate<T>(node: Box<Node<T>>, heavy: Side) -> Box<Node<T>> {
    match heavy {
        Side::Left => rotate_right(node),
        Side::Right => rotate_left(node),
    }
}

/// Restores a node whose `heavy` side is two levels taller than the other.
///
/// Returns the new subtree root, the rotations performed, and whether the
/// subtree kept the height it had before the imbalance was introduced. The
/// last one is only possible after a removal, when the heavy child is itself
/// balanced.
fn rebalance<T>(mut node: Box<Node<T>>, heavy: Side) -> (Box<Node<T>>, usize, bool) {
    let light = heavy.opposite();
    let Some(mut child) = node.child_mut(heavy).take() else {
        return (node, 0, true);
    };

    if child.balance.leans(light) {
        // double rotation through the grandchild; its lean decides the outcome
        let grandchild = child
            .child_mut(light)
            .as_mut()
            .map(|g| std::mem::take(&mut g.balance))
            .unwrap_or_default();
        (node.balance, child.balance) = if grandchild.leans(heavy) {
            (light.into(), Balance::Same)
        } else if grandchild.leans(light) {
            (Balance::Same, heavy.into())
        } else {
            (Balance::Same, Balance::Same)
        };
        *node.child_mut(heavy) = Some(rotate(child, light));
        return (rotate(node, heavy), 2, false);
    }

    let kept_height = child.balance == Balance::Same;
    if kept_height {
        node.balance = heavy.into();
        child.balance = light.into();
    } else {
        node.balance = Balance::Same;
        child.balance = Balance::Same;
    }
    *node.child_mut(heavy) = Some(child);
    (rotate(node, heavy), 1, kept_height)
}

/// Folds a height increase on `side` into the node at `link`.
fn grow<T>(link: &mut Link<T>, side: Side, rotations: usize) -> Outcome {
    let Some(mut node) = link.take() else {
        return Outcome {
            height_changed: false,
            rotations,
        };
    };
    let balance = node.balance;
    let (root, outcome) = if balance == Balance::Same {
        node.balance = side.into();
        let outcome = Outcome {
            height_changed: true,
            rotations,
        };
        (node, outcome)
    } else if balance.leans(side) {
        let (root, performed, _) = rebalance(node, side);
        let outcome = Outcome {
            height_changed: false,
            rotations: rotations + performed,
        };
        (root, outcome)
    } else {
        node.balance = Balance::Same;
        let outcome = Outcome {
            height_changed: false,
            rotations,
        };
        (node, outcome)
    };
    *link = Some(root);
    outcome
}

/// Folds a height decrease on `side` into the node at `link`.
fn shrink<T>(link: &mut Link<T>, side: Side, rotations: usize) -> Outcome {
    let Some(mut node) = link.take() else {
        return Outcome {
            height_changed: false,
            rotations,
        };
    };
    let balance = node.balance;
    let (root, outcome) = if balance == Balance::Same {
        node.balance = side.opposite().into();
        let outcome = Outcome {
            height_changed: false,
            rotations,
        };
        (node, outcome)
    } else if balance.leans(side) {
        node.balance = Balance::Same;
        let outcome = Outcome {
            height_changed: true,
            rotations,
        };
        (node, outcome)
    } else {
        let (root, performed, kept_height) = rebalance(node, side.opposite());
        let outcome = Outcome {
            height_changed: !kept_height,
            rotations: rotations + performed,
        };
        (root, outcome)
    };
    *link = Some(root);
    outcome
}

fn fresh_leaf<T>(link: &mut Link<T>, symbol: T) -> Outcome {
    *link = Some(Box::new(Node::leaf(symbol)));
    Outcome {
        height_changed: true,
        rotations: 0,
    }
}

/// Inserts `symbol` so that it ends up at `position` within the subtree.
///
/// `position` must be at most the subtree's length.
pub(crate) fn insert<T>(link: &mut Link<T>, position: usize, symbol: T) -> Outcome {
    let Some(node) = link.as_mut() else {
        return fresh_leaf(link, symbol);
    };

    let (side, outcome) = if position <= node.rank {
        node.rank += 1;
        (Side::Left, insert(&mut node.left, position, symbol))
    } else {
        let position = position - node.rank - 1;
        (Side::Right, insert(&mut node.right, position, symbol))
    };

    if !outcome.height_changed {
        return outcome;
    }
    grow(link, side, outcome.rotations)
}

/// Appends `symbol` after the last node of the subtree.
pub(crate) fn push<T>(link: &mut Link<T>, symbol: T) -> Outcome {
    let Some(node) = link.as_mut() else {
        return fresh_leaf(link, symbol);
    };

    let outcome = push(&mut node.right, symbol);
    if !outcome.height_changed {
        return outcome;
    }
    grow(link, Side::Right, outcome.rotations)
}

/// Removes the node at `position` within the subtree, or returns `None` (and
/// leaves the subtree untouched) if there is no such position.
pub(crate) fn remove<T>(link: &mut Link<T>, position: usize) -> Option<Removed<T>> {
    let node = link.as_mut()?;

    let (side, removed) = match position.cmp(&node.rank) {
        Ordering::Less => {
            let removed = remove(&mut node.left, position)?;
            node.rank -= 1;
            (Side::Left, removed)
        }
        Ordering::Greater => {
            let position = position - node.rank - 1;
            (Side::Right, remove(&mut node.right, position)?)
        }
        Ordering::Equal => {
            let (root, removed) = unlink(link.take()?);
            *link = root;
            return Some(removed);
        }
    };

    let Removed { symbol, outcome } = removed;
    let outcome = if outcome.height_changed {
        shrink(link, side, outcome.rotations)
    } else {
        outcome
    };
    Some(Removed { symbol, outcome })
}

/// Detaches `node` from the tree, returning whatever takes its place.
///
/// A node with two children is replaced by a fresh node carrying its in-order
/// successor's symbol, inheriting the old node's children, rank and balance.
fn unlink<T>(mut node: Box<Node<T>>) -> (Link<T>, Removed<T>) {
    let shortened = Outcome {
        height_changed: true,
        rotations: 0,
    };

    match (node.left.take(), node.right.take()) {
        (None, None) => (
            None,
            Removed {
                symbol: node.symbol,
                outcome: shortened,
            },
        ),
        (Some(child), None) | (None, Some(child)) => (
            Some(child),
            Removed {
                symbol: node.symbol,
                outcome: shortened,
            },
        ),
        (Some(left), Some(right)) => {
            let (right, successor, outcome) = pop_first(right);
            let Node {
                symbol,
                rank,
                balance,
                ..
            } = *node;
            let mut link = Some(Box::new(Node {
                symbol: successor,
                left: Some(left),
                right,
                rank,
                balance,
            }));
            let outcome = if outcome.height_changed {
                shrink(&mut link, Side::Right, outcome.rotations)
            } else {
                outcome
            };
            (link, Removed { symbol, outcome })
        }
    }
}

/// Removes the leftmost node of a subtree, rebalancing on the way back up.
fn pop_first<T>(mut node: Box<Node<T>>) -> (Link<T>, T, Outcome) {
    let Some(left) = node.left.take() else {
        let Node { symbol, right, .. } = *node;
        let outcome = Outcome {
            height_changed: true,
            rotations: 0,
        };
        return (right, symbol, outcome);
    };

    let (left, symbol, outcome) = pop_first(left);
    node.left = left;
    node.rank -= 1;

    let mut link = Some(node);
    let outcome = if outcome.height_changed {
        shrink(&mut link, Side::Left, outcome.rotations)
    } else {
        outcome
    };
    (link, symbol, outcome)
}

pub(crate) fn get<T>(mut link: &Link<T>, mut position: usize) -> Option<&T> {
    while let Some(node) = link {
        match position.cmp(&node.rank) {
            Ordering::Less => link = &node.left,
            Ordering::Equal => return Some(&node.symbol),
            Ordering::Greater => {
                position -= node.rank + 1;
                link = &node.right;
            }
        }
    }
    None
}

/// Pushes the symbols at `start..end` of the subtree onto `out`, visiting only
/// the nodes that intersect the range.
pub(crate) fn extend_range<T: Clone>(link: &Link<T>, start: usize, end: usize, out: &mut Vec<T>) {
    let Some(node) = link else {
        return;
    };
    if start >= end {
        return;
    }

    let rank = node.rank;
    if start < rank {
        extend_range(&node.left, start, end.min(rank), out);
    }
    if start <= rank && rank < end {
        out.push(node.symbol.clone());
    }
    if end > rank + 1 {
        extend_range(&node.right, start.saturating_sub(rank + 1), end - rank - 1, out);
    }
}

/// Builds a balanced subtree from the next `len` items by splitting at the
/// midpoint. Returns the subtree and its height in levels (0 when empty).
pub(crate) fn build<T>(items: &mut impl Iterator<Item = T>, len: usize) -> (Link<T>, usize) {
    if len == 0 {
        return (None, 0);
    }

    let left_len = len / 2;
    let (left, left_levels) = build(items, left_len);
    let Some(symbol) = items.next() else {
        return (left, left_levels);
    };
    let (right, right_levels) = build(items, len - left_len - 1);

    let balance = match left_levels.cmp(&right_levels) {
        Ordering::Greater => Balance::Left,
        Ordering::Equal => Balance::Same,
        Ordering::Less => Balance::Right,
    };
    let node = Node {
        symbol,
        left,
        right,
        rank: left_len,
        balance,
    };
    (Some(Box::new(node)), 1 + left_levels.max(right_levels))
}

/// Pre-order dump: `[b1, a0, c0]`, or `[b1=, a0=, c0=]` with balance glyphs.
pub(crate) fn preorder_string<T: Display>(link: &Link<T>, with_balance: bool) -> String {
    fn visit<T: Display>(link: &Link<T>, with_balance: bool, first: &mut bool, out: &mut String) {
        let Some(node) = link else {
            return;
        };
        if !std::mem::take(first) {
            out.push_str(", ");
        }
        let _ = write!(out, "{}{}", node.symbol, node.rank);
        if with_balance {
            out.push(node.balance.glyph());
        }
        visit(&node.left, with_balance, first, out);
        visit(&node.right, with_balance, first, out);
    }

    let mut out = String::from("[");
    visit(link, with_balance, &mut true, &mut out);
    out.push(']');
    out
}

// Diagnostics. These recompute everything by brute force and are never used
// by the operations above.

pub(crate) fn slow_height<T>(link: &Link<T>) -> isize {
    match link {
        None => -1,
        Some(node) => 1 + slow_height(&node.left).max(slow_height(&node.right)),
    }
}

pub(crate) fn slow_size<T>(link: &Link<T>) -> usize {
    match link {
        None => 0,
        Some(node) => 1 + slow_size(&node.left) + slow_size(&node.right),
    }
}

/// Size of the subtree, provided every rank in it matches its left subtree.
pub(crate) fn checked_size<T>(link: &Link<T>) -> Option<usize> {
    let Some(node) = link else {
        return Some(0);
    };
    let left = checked_size(&node.left)?;
    if left != node.rank {
        return None;
    }
    Some(left + 1 + checked_size(&node.right)?)
}

/// Height of the subtree, provided every balance code in it is both accurate
/// and within the AVL bound.
pub(crate) fn checked_height<T>(link: &Link<T>) -> Option<isize> {
    let Some(node) = link else {
        return Some(-1);
    };
    let left = checked_height(&node.left)?;
    let right = checked_height(&node.right)?;
    let actual = match left.cmp(&right) {
        Ordering::Greater => Balance::Left,
        Ordering::Equal => Balance::Same,
        Ordering::Less => Balance::Right,
    };
    if actual != node.balance || (left - right).abs() > 1 {
        return None;
    }
    Some(1 + left.max(right))
}

/// Height found by following the taller child; only correct when every
/// balance code is.
pub(crate) fn fast_height<T>(mut link: &Link<T>) -> isize {
    let mut height = -1;
    while let Some(node) = link {
        height += 1;
        link = match node.balance {
            Balance::Left => &node.left,
            Balance::Same | Balance::Right => &node.right,
        };
    }
    height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_order<T: Clone>(link: &Link<T>) -> Vec<T> {
        let mut out = Vec::new();
        extend_range(link, 0, slow_size(link), &mut out);
        out
    }

    fn from_vec<T>(items: Vec<T>) -> Link<T> {
        let len = items.len();
        build(&mut items.into_iter(), len).0
    }

    /// A Fibonacci tree of the given height: every internal node leans left
    /// and the tree has the fewest nodes an AVL tree of that height can have.
    fn fibonacci(height: isize, next: &mut usize) -> Link<usize> {
        if height < 0 {
            return None;
        }
        let left = fibonacci(height - 1, next);
        let symbol = *next;
        *next += 1;
        let right = fibonacci(height - 2, next);
        let balance = if height == 0 {
            Balance::Same
        } else {
            Balance::Left
        };
        Some(Box::new(Node {
            symbol,
            rank: slow_size(&left),
            left,
            right,
            balance,
        }))
    }

    fn assert_invariants<T>(link: &Link<T>) {
        assert_eq!(checked_size(link), Some(slow_size(link)));
        assert_eq!(checked_height(link), Some(slow_height(link)));
    }

    #[test]
    fn test_empty_sentinel() {
        let link: Link<char> = None;
        assert_eq!(get(&link, 0), None);
        assert_eq!(slow_height(&link), -1);
        assert_eq!(fast_height(&link), -1);
        assert_eq!(slow_size(&link), 0);
        assert_eq!(checked_size(&link), Some(0));
        assert_eq!(checked_height(&link), Some(-1));
        assert_eq!(preorder_string(&link, true), "[]");
    }

    #[test]
    fn test_remove_from_empty_is_none() {
        let mut link: Link<char> = None;
        assert!(remove(&mut link, 0).is_none());
    }

    #[test]
    fn test_remove_past_end_leaves_tree_untouched() {
        let mut link = from_vec("abc".chars().collect());
        assert!(remove(&mut link, 3).is_none());
        assert_eq!(preorder_string(&link, true), "[b1=, a0=, c0=]");
    }

    #[test]
    fn test_rotate_left_ranks() {
        // a(-, b(-, c))
        let mut link = None;
        push(&mut link, 'a');
        push(&mut link, 'b');
        let mut root = link.take().unwrap();
        push(&mut root.right.as_mut().unwrap().right, 'c');

        let root = rotate_left(root);
        assert_eq!(root.symbol, 'b');
        assert_eq!(root.rank, 1);
        assert_eq!(root.left.as_ref().unwrap().rank, 0);
    }

    #[test]
    fn test_rotate_right_ranks() {
        let mut link = from_vec("abcd".chars().collect());
        // c2(b1(a0), d0)
        assert_eq!(preorder_string(&link, false), "[c2, b1, a0, d0]");

        let root = rotate_right(link.take().unwrap());
        assert_eq!(root.symbol, 'b');
        assert_eq!(root.rank, 1);
        let right = root.right.as_ref().unwrap();
        assert_eq!(right.symbol, 'c');
        assert_eq!(right.rank, 0);
    }

    #[test]
    fn test_rotation_of_missing_child_is_identity() {
        let root = Box::new(Node::leaf('a'));
        let root = rotate_left(rotate_right(root));
        assert_eq!(root.symbol, 'a');
        assert_eq!(root.rank, 0);
    }

    #[test]
    fn test_insert_single_left_rotation() {
        let mut link = None;
        let mut rotations = 0;
        for (idx, c) in "abc".chars().enumerate() {
            rotations += insert(&mut link, idx, c).rotations;
        }
        assert_eq!(rotations, 1);
        assert_eq!(preorder_string(&link, true), "[b1=, a0=, c0=]");
    }

    #[test]
    fn test_insert_single_right_rotation() {
        let mut link = None;
        let mut rotations = 0;
        for c in "cba".chars() {
            rotations += insert(&mut link, 0, c).rotations;
        }
        assert_eq!(rotations, 1);
        assert_eq!(preorder_string(&link, true), "[b1=, a0=, c0=]");
    }

    #[test]
    fn test_insert_double_rotation_counts_two() {
        let mut link = None;
        let mut rotations = 0;
        for (idx, c) in [(0, 'a'), (1, 'c'), (1, 'b')] {
            rotations += insert(&mut link, idx, c).rotations;
        }
        assert_eq!(rotations, 2);
        assert_eq!(preorder_string(&link, true), "[b1=, a0=, c0=]");

        let mut link = None;
        let mut rotations = 0;
        for (idx, c) in [(0, 'c'), (0, 'a'), (1, 'b')] {
            rotations += insert(&mut link, idx, c).rotations;
        }
        assert_eq!(rotations, 2);
        assert_eq!(preorder_string(&link, true), "[b1=, a0=, c0=]");
    }

    fn insert_all(inserts: &[(usize, char)]) -> (Link<char>, usize) {
        let mut link = None;
        let mut rotations = 0;
        for &(idx, c) in inserts {
            rotations += insert(&mut link, idx, c).rotations;
        }
        (link, rotations)
    }

    #[test]
    fn test_double_rotation_grandchild_leans_away() {
        let (mut link, rotations) = insert_all(&[(0, 'b'), (0, 'a'), (2, 'e'), (2, 'd'), (4, 'f')]);
        assert_eq!(rotations, 0);
        assert_eq!(preorder_string(&link, true), "[b1\\, a0=, e1=, d0=, f0=]");

        // d gains a left child, so e leans left under a right-heavy b
        let outcome = insert(&mut link, 2, 'c');
        assert_eq!(outcome.rotations, 2);
        assert!(!outcome.height_changed);
        assert_eq!(preorder_string(&link, true), "[d3=, b1=, a0=, c0=, e0\\, f0=]");
        assert_invariants(&link);
    }

    #[test]
    fn test_double_rotation_grandchild_leans_toward() {
        let (mut link, _) = insert_all(&[(0, 'b'), (0, 'a'), (2, 'e'), (2, 'c'), (4, 'f')]);
        assert_eq!(preorder_string(&link, true), "[b1\\, a0=, e1=, c0=, f0=]");

        let outcome = insert(&mut link, 3, 'd');
        assert_eq!(outcome.rotations, 2);
        assert_eq!(preorder_string(&link, true), "[c2=, b1/, a0=, e1=, d0=, f0=]");
        assert_invariants(&link);
    }

    #[test]
    fn test_insert_grows_height_only_once_per_level() {
        let mut link = None;
        assert!(insert(&mut link, 0, 'a').height_changed);
        assert!(insert(&mut link, 1, 'b').height_changed);
        // the rotation absorbs the growth
        assert!(!insert(&mut link, 2, 'c').height_changed);
        // a gains a right child and b starts leaning left
        assert!(insert(&mut link, 1, 'x').height_changed);
        assert!(!insert(&mut link, 0, 'y').height_changed);
    }

    #[test]
    fn test_remove_with_two_children_uses_successor() {
        let mut link = from_vec("editor".chars().collect());
        assert_eq!(preorder_string(&link, true), "[t3=, d1=, e0=, i0=, r1/, o0=]");

        let removed = remove(&mut link, 3).unwrap();
        assert_eq!(removed.symbol, 't');
        assert_eq!(removed.outcome.rotations, 0);
        // the root keeps its height: its left side is now the taller one
        assert!(!removed.outcome.height_changed);
        assert_eq!(preorder_string(&link, true), "[o3/, d1=, e0=, i0=, r0=]");
    }

    #[test]
    fn test_remove_rotates_at_several_levels() {
        let mut next = 0;
        let mut link = fibonacci(4, &mut next);
        assert_eq!(next, 12);
        assert_invariants(&link);

        let removed = remove(&mut link, 11).unwrap();
        assert_eq!(removed.symbol, 11);
        assert_eq!(removed.outcome.rotations, 2);
        assert!(removed.outcome.height_changed);
        assert_invariants(&link);
        assert_eq!(in_order(&link), (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn test_remove_from_fibonacci_trees_everywhere() {
        for height in 0..7 {
            let mut next = 0;
            let tree = fibonacci(height, &mut next);
            for position in 0..next {
                let mut link = tree.clone();
                let removed = remove(&mut link, position).unwrap();
                assert_eq!(removed.symbol, position);
                assert_invariants(&link);

                let mut expected: Vec<usize> = (0..next).collect();
                expected.remove(position);
                assert_eq!(in_order(&link), expected);
            }
        }
    }

    #[test]
    fn test_remove_with_balanced_sibling_keeps_height() {
        let mut link = None;
        for c in "abcde".chars() {
            push(&mut link, c);
        }
        assert_eq!(preorder_string(&link, true), "[b1\\, a0=, d1=, c0=, e0=]");

        let removed = remove(&mut link, 0).unwrap();
        assert_eq!(removed.symbol, 'a');
        assert_eq!(removed.outcome.rotations, 1);
        assert!(!removed.outcome.height_changed);
        assert_eq!(preorder_string(&link, true), "[d2/, b0\\, c0=, e0=]");
    }

    #[test]
    fn test_pop_first() {
        let link = from_vec("abcdefg".chars().collect());
        let (link, first, outcome) = pop_first(link.unwrap());
        assert_eq!(first, 'a');
        assert!(!outcome.height_changed);
        assert_invariants(&link);
        assert_eq!(in_order(&link), "bcdefg".chars().collect::<Vec<_>>());
    }

    #[test]
    fn test_build_shape() {
        for len in 0..100 {
            let link = from_vec((0..len).collect::<Vec<usize>>());
            assert_invariants(&link);
            assert_eq!(in_order(&link), (0..len).collect::<Vec<_>>());
            let expected = if len == 0 { -1 } else { len.ilog2() as isize };
            assert_eq!(slow_height(&link), expected);
            assert_eq!(fast_height(&link), expected);
        }
    }

    #[test]
    fn test_build_two_leans_left() {
        let (link, levels) = build(&mut "ab".chars(), 2);
        assert_eq!(levels, 2);
        assert_eq!(preorder_string(&link, true), "[b1/, a0=]");
    }

    #[test]
    fn test_extend_range_visits_only_the_range() {
        let link = from_vec("abcdefghij".chars().collect());
        for start in 0..=10 {
            for end in start..=10 {
                let mut out = Vec::new();
                extend_range(&link, start, end, &mut out);
                let expected: Vec<char> = "abcdefghij".chars().skip(start).take(end - start).collect();
                assert_eq!(out, expected);
            }
        }
    }

    #[test]
    fn test_node_len_walks_right_spine() {
        let link = from_vec((0..37).collect::<Vec<usize>>());
        let root = link.as_deref().unwrap();
        assert_eq!(root.len(), 37);
        assert_eq!(root.left().unwrap().len(), root.rank());
    }

    #[test]
    fn test_checked_height_catches_bad_balance_code() {
        let mut link = from_vec("abc".chars().collect());
        link.as_mut().unwrap().balance = Balance::Left;
        assert_eq!(checked_height(&link), None);
        assert_eq!(checked_size(&link), Some(3));
    }

    #[test]
    fn test_checked_size_catches_bad_rank() {
        let mut link = from_vec("abc".chars().collect());
        link.as_mut().unwrap().rank = 2;
        assert_eq!(checked_size(&link), None);
    }

    #[test]
    fn test_checked_height_catches_avl_violation() {
        // a(-, b(-, c)) with codes that match the heights but break the bound
        let mut link = None;
        push(&mut link, 'a');
        push(&mut link, 'b');
        let root = link.as_mut().unwrap();
        push(&mut root.right.as_mut().unwrap().right, 'c');
        root.right.as_mut().unwrap().balance = Balance::Right;
        assert_eq!(checked_height(&link), None);
    }
}
