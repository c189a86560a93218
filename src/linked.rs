//! A linked BST. Every element lives in its own boxed `Node` and each `Node` exclusively owns its
//! children. Nothing rebalances on its own; instead the tree can be asked to
//! [`rebalance`][Tree::rebalance] itself whenever it has drifted too far from `O(lg N)` height.
//!
//! Equal items are all kept. An inserted duplicate always descends to the right of its equal,
//! so the in-order traversal keeps every copy. After a [`rebalance`][Tree::rebalance] or the
//! removal of a node with two children, equal items may also sit to the left of one another.
//! The in-order traversal stays sorted either way.
//!
//! # Examples
//!
//! ```
//! use linked_bst::linked::Tree;
//!
//! let mut tree: Tree<i32> = (1..=8).collect();
//!
//! // Ascending inserts make a linked list.
//! assert_eq!(tree.height(), 7);
//! assert!(!tree.is_balanced());
//!
//! tree.rebalance();
//! assert!(tree.height() <= 3);
//! assert!(tree.is_balanced());
//!
//! // Removing hands back the stored item.
//! assert_eq!(tree.remove(&1), Ok(1));
//! assert_eq!(tree.find(&1), None);
//! assert_eq!(tree.len(), 7);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use tracing::{debug, trace};

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::iter::{Inorder, Iter, Levelorder, Postorder, Preorder};
use crate::util::Direction;

/// An owned, possibly empty, subtree.
pub(crate) type Link<T> = Option<Box<Node<T>>>;

/// A Binary Search Tree of items ordered by `T`'s [`Ord`] implementation.
pub struct Tree<T> {
    root: Link<T>,
    /// How many items are stored, counting every duplicate.
    len: usize,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        Node::free(self.root.take());
    }
}

/// The clone holds the same items, re-inserted in [pre-order][Tree::preorder]. For a tree built
/// by inserts alone this reproduces the original shape node for node.
impl<T> Clone for Tree<T>
where
    T: Clone + Ord,
{
    fn clone(&self) -> Self {
        self.preorder().cloned().collect()
    }
}

impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("root", &DebugLink(self.root.as_deref()))
            .finish()
    }
}

/// Draws the tree rotated 90 degrees counter-clockwise: the root is in the first column, the
/// right subtree is above it, and each level of depth adds a `"| "` prefix.
impl<T> fmt::Display for Tree<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Reverse in-order walk: right subtree, node, left subtree.
        let mut prefix = String::new();
        let mut stack = Vec::new();
        let mut current = self.root.as_deref().map(|root| (root, 0));
        loop {
            while let Some((node, level)) = current {
                stack.push((node, level));
                current = node.right.as_deref().map(|right| (right, level + 1));
            }

            let Some((node, level)) = stack.pop() else {
                break;
            };
            while prefix.len() < 2 * level {
                prefix.push_str("| ");
            }
            writeln!(f, "{}{}", &prefix[..2 * level], node.data)?;
            current = node.left.as_deref().map(|left| (left, level + 1));
        }

        Ok(())
    }
}

impl<T> FromIterator<T> for Tree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T> Extend<T> for Tree<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Collection for Tree<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        Tree::clear(self);
    }
}

impl<T> Tree<T> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// How many items are stored, counting duplicates.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        Node::free(self.root.take());
        self.len = 0;
    }

    /// Potentially finds the stored item equal to `item`. If no node holds an equal item, `None`
    /// is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::linked::Tree;
    ///
    /// let tree: Tree<_> = [4, 2, 7].into_iter().collect();
    ///
    /// assert_eq!(tree.find(&2), Some(&2));
    /// assert_eq!(tree.find(&42), None);
    /// ```
    pub fn find(&self, item: &T) -> Option<&T>
    where
        T: Ord,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match Direction::toward(item, &node.data) {
                None => return Some(&node.data),
                Some(direction) => current = node.child(direction),
            }
        }

        None
    }

    /// The same search as [`find`][Tree::find], one call frame per level.
    pub fn find_recursive(&self, item: &T) -> Option<&T>
    where
        T: Ord,
    {
        self.root.as_deref().and_then(|root| root.find(item))
    }

    /// Whether an item equal to `item` is stored.
    pub fn contains(&self, item: &T) -> bool
    where
        T: Ord,
    {
        self.find(item).is_some()
    }

    /// Adds `item` to the tree. Items smaller than a node go to its left, everything else
    /// (equal items included) goes to its right, so inserting a duplicate adds another node.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::linked::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.inorder().collect::<Vec<_>>(), [&1, &1]);
    /// ```
    pub fn insert(&mut self, item: T)
    where
        T: Ord,
    {
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = node.link_mut(Direction::of(&item, &node.data));
        }
        *link = Some(Node::new(item));

        self.len += 1;
        trace!(len = self.len, "inserted item");
    }

    /// The same insert as [`insert`][Tree::insert], one call frame per level. For the same
    /// sequence of items both build identical trees.
    pub fn insert_recursive(&mut self, item: T)
    where
        T: Ord,
    {
        match self.root.as_mut() {
            Some(root) => root.insert(item),
            None => self.root = Some(Node::new(item)),
        }

        self.len += 1;
        trace!(len = self.len, "inserted item");
    }

    /// Removes a node holding an item equal to `item` and returns the stored item. If there is
    /// no such node the tree is left untouched and [`Error::NotFound`] is returned.
    ///
    /// A node with two children keeps its place and takes over the largest item of its left
    /// subtree instead, and that item's node is unlinked.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::{linked::Tree, Error};
    ///
    /// let mut tree: Tree<_> = [2, 1, 3].into_iter().collect();
    ///
    /// assert_eq!(tree.remove(&2), Ok(2));
    /// assert_eq!(tree.remove(&2), Err(Error::NotFound));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn remove(&mut self, item: &T) -> Result<T>
    where
        T: Ord,
    {
        // `link` is the parent's slot for the current node, which is the root slot at the top.
        let mut link = &mut self.root;
        loop {
            let direction = match link.as_deref() {
                None => return Err(Error::NotFound),
                Some(node) => match Direction::toward(item, &node.data) {
                    Some(direction) => direction,
                    None => break,
                },
            };
            link = match link {
                Some(node) => node.link_mut(direction),
                None => return Err(Error::NotFound),
            };
        }

        let removed = Node::unlink(link).ok_or(Error::NotFound)?;
        self.len -= 1;
        trace!(len = self.len, "removed item");

        Ok(removed)
    }

    /// Swaps the stored item equal to `item` for `new_item` and returns the old one, or returns
    /// `None` if nothing equal to `item` is stored.
    ///
    /// The node is not moved. `new_item` must order exactly like `item` against every other
    /// stored item. Otherwise the search order is silently broken and every later operation
    /// gives unspecified results. This is meant for items that carry data outside of their
    /// ordering.
    pub fn replace(&mut self, item: &T, new_item: T) -> Option<T>
    where
        T: Ord,
    {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match Direction::toward(item, &node.data) {
                None => return Some(mem::replace(&mut node.data, new_item)),
                Some(direction) => current = node.link_mut(direction).as_deref_mut(),
            }
        }

        None
    }

    /// The number of edges on the longest path from the root to a leaf. Both an empty tree and a
    /// lone root have height 0.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<_> = self.root.as_deref().map(|root| (root, 0)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            stack.extend(node.left.as_deref().map(|left| (left, depth + 1)));
            stack.extend(node.right.as_deref().map(|right| (right, depth + 1)));
        }

        height
    }

    /// A loose balance check: the height must stay under `2 * lg(len + 1) - 1`. An empty tree
    /// is always balanced.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::linked::Tree;
    ///
    /// let bushy: Tree<_> = [4, 2, 7, 3, 6, 1, 9].into_iter().collect();
    /// let stringy: Tree<_> = (1..=8).collect();
    ///
    /// assert!(bushy.is_balanced());
    /// assert!(!stringy.is_balanced());
    /// ```
    pub fn is_balanced(&self) -> bool {
        if self.is_empty() {
            return true;
        }

        (self.height() as f64) < 2.0 * ((self.len + 1) as f64).log2() - 1.0
    }

    /// Every stored item in `low..=high`, ascending.
    ///
    /// Left subtrees are skipped when `low` can't be in them. Right subtrees are always walked.
    /// A copy of `low` sitting left of an equal item is therefore skipped, which only happens
    /// after a [`rebalance`][Tree::rebalance] or removal has moved duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::linked::Tree;
    ///
    /// let tree: Tree<_> = [4, 2, 7, 3, 6, 1, 9].into_iter().collect();
    ///
    /// assert_eq!(tree.range_find(&3, &7), [&3, &4, &6, &7]);
    /// ```
    pub fn range_find(&self, low: &T, high: &T) -> Vec<&T>
    where
        T: Ord,
    {
        let mut found = Vec::new();
        let mut stack = Vec::new();
        let mut current = self.root.as_deref();
        loop {
            while let Some(node) = current {
                stack.push(node);
                current = if *low < node.data {
                    node.left.as_deref()
                } else {
                    None
                };
            }

            let Some(node) = stack.pop() else {
                break;
            };
            if *low <= node.data && node.data <= *high {
                found.push(&node.data);
            }
            current = node.right.as_deref();
        }

        found
    }

    /// Rebuilds the tree with minimal height and returns it.
    ///
    /// The nodes are detached from one another in ascending order and then relinked by
    /// repeatedly taking the middle of each run as the subtree root. For a run of even length
    /// the later of the two middle items is used. No node is reallocated.
    ///
    /// Runs of equal items are split like any other run, so afterwards a duplicate may sit in
    /// the left subtree of its equal. `find`, `remove` and the in-order traversal are unaffected.
    pub fn rebalance(&mut self) -> &mut Self {
        debug!(len = self.len, height = self.height(), "rebalancing tree");

        let nodes = Node::flatten(self.root.take(), self.len);
        let count = nodes.len();
        self.root = Node::build(count, &mut nodes.into_iter());

        debug!(len = self.len, height = self.height(), "rebalanced tree");
        self
    }

    /// The smallest item stored after `item`, or `None` if there isn't one.
    ///
    /// When `item` itself is stored with a right subtree, the answer is that subtree's smallest
    /// item, which may be a duplicate of `item`.
    pub fn successor(&self, item: &T) -> Option<&T>
    where
        T: Ord,
    {
        let mut candidate = None;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match item.cmp(&node.data) {
                Ordering::Less => {
                    candidate = Some(node);
                    current = node.left.as_deref();
                }
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => {
                    if let Some(right) = node.right.as_deref() {
                        candidate = Some(right.min());
                    }
                    break;
                }
            }
        }

        candidate.map(|node| &node.data)
    }

    /// The largest item stored before `item`, or `None` if there isn't one.
    ///
    /// When `item` itself is stored with a left subtree, the answer is that subtree's largest
    /// item, which may be a duplicate of `item` once duplicates have been moved left.
    pub fn predecessor(&self, item: &T) -> Option<&T>
    where
        T: Ord,
    {
        let mut candidate = None;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match item.cmp(&node.data) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => {
                    candidate = Some(node);
                    current = node.right.as_deref();
                }
                Ordering::Equal => {
                    if let Some(left) = node.left.as_deref() {
                        candidate = Some(left.max());
                    }
                    break;
                }
            }
        }

        candidate.map(|node| &node.data)
    }

    /// The smallest item.
    pub fn min(&self) -> Option<&T> {
        self.root.as_deref().map(|root| &root.min().data)
    }

    /// The largest item.
    pub fn max(&self) -> Option<&T> {
        self.root.as_deref().map(|root| &root.max().data)
    }

    /// Walks the tree from the root, visiting each node's right subtree before its left one.
    /// This is the order `for item in &tree` uses.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.as_deref())
    }

    /// Walks each node before its left and then its right subtree.
    pub fn preorder(&self) -> Preorder<'_, T> {
        Preorder::new(self.root.as_deref())
    }

    /// Walks the items in ascending order.
    pub fn inorder(&self) -> Inorder<'_, T> {
        Inorder::new(self.root.as_deref())
    }

    /// Walks each node after both of its subtrees.
    pub fn postorder(&self) -> Postorder<'_, T> {
        Postorder::new(self.root.as_deref())
    }

    /// Walks the tree one level at a time.
    pub fn levelorder(&self) -> Levelorder<'_, T> {
        Levelorder::new(self.root.as_deref())
    }
}

/// A `Node` holds one item and owns up to two children.
pub(crate) struct Node<T> {
    pub(crate) data: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
}

/// Formats a subtree the way a derived `Debug` on `Option<Box<Node>>` would, one node at a
/// time off an explicit stack.
struct DebugLink<'a, T>(Option<&'a Node<T>>);

enum DebugStep<'a, T> {
    Link(Option<&'a Node<T>>),
    Text(&'static str),
}

impl<T> fmt::Debug for DebugLink<'_, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut steps = vec![DebugStep::Link(self.0)];
        while let Some(step) = steps.pop() {
            match step {
                DebugStep::Text(text) => f.write_str(text)?,
                DebugStep::Link(None) => f.write_str("None")?,
                DebugStep::Link(Some(node)) => {
                    write!(f, "Some(Node {{ data: {:?}, left: ", node.data)?;
                    steps.push(DebugStep::Text(" })"));
                    steps.push(DebugStep::Link(node.right.as_deref()));
                    steps.push(DebugStep::Text(", right: "));
                    steps.push(DebugStep::Link(node.left.as_deref()));
                }
            }
        }

        Ok(())
    }
}

impl<T> Node<T> {
    fn new(data: T) -> Box<Self> {
        Box::new(Self {
            data,
            left: None,
            right: None,
        })
    }

    fn child(&self, direction: Direction) -> Option<&Self> {
        match direction {
            Direction::Left => self.left.as_deref(),
            Direction::Right => self.right.as_deref(),
        }
    }

    fn link_mut(&mut self, direction: Direction) -> &mut Link<T> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    fn min(&self) -> &Self {
        let mut node = self;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        node
    }

    fn max(&self) -> &Self {
        let mut node = self;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        node
    }

    fn find(&self, item: &T) -> Option<&T>
    where
        T: Ord,
    {
        match Direction::toward(item, &self.data) {
            None => Some(&self.data),
            Some(direction) => self.child(direction)?.find(item),
        }
    }

    fn insert(&mut self, item: T)
    where
        T: Ord,
    {
        let direction = Direction::of(&item, &self.data);
        let link = self.link_mut(direction);
        match link {
            Some(child) => child.insert(item),
            None => *link = Some(Node::new(item)),
        }
    }

    /// Takes the item out of the node in `link`, which must be occupied.
    fn unlink(link: &mut Link<T>) -> Option<T> {
        let node = link.as_mut()?;
        if node.left.is_some() && node.right.is_some() {
            let largest = Self::take_max(&mut node.left)?;
            return Some(mem::replace(&mut node.data, largest));
        }

        let Node { data, left, right } = *link.take()?;
        *link = left.or(right);
        Some(data)
    }

    /// Unlinks the rightmost node of the subtree in `link` and returns its item. The rightmost
    /// node has no right child, so its left child takes its slot.
    fn take_max(mut link: &mut Link<T>) -> Option<T> {
        while link.as_ref().is_some_and(|node| node.right.is_some()) {
            link = &mut link.as_mut()?.right;
        }

        let Node { data, left, .. } = *link.take()?;
        *link = left;
        Some(data)
    }

    /// Detaches every node of the subtree, returning them in ascending order with no children.
    fn flatten(root: Link<T>, len: usize) -> Vec<Box<Self>> {
        let mut nodes = Vec::with_capacity(len);
        let mut stack = Vec::new();
        let mut current = root;
        loop {
            while let Some(mut node) = current {
                current = node.left.take();
                stack.push(node);
            }

            let Some(mut node) = stack.pop() else {
                break;
            };
            current = node.right.take();
            nodes.push(node);
        }

        nodes
    }

    /// Links the next `count` detached nodes into a minimal height subtree. The node at index
    /// `count / 2` becomes the root.
    fn build<I>(count: usize, nodes: &mut I) -> Link<T>
    where
        I: Iterator<Item = Box<Self>>,
    {
        if count == 0 {
            return None;
        }

        let middle = count / 2;
        let left = Self::build(middle, nodes);
        let mut node = nodes.next()?;
        node.left = left;
        node.right = Self::build(count - middle - 1, nodes);
        Some(node)
    }

    /// Drops a subtree without recursing once per level.
    fn free(root: Link<T>) {
        let mut stack: Vec<_> = root.into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}
