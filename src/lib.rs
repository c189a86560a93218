//! This crate exposes a linked Binary Search Tree (BST) that can be
//! asked to rebalance itself.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and remove stored items. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores an item
//! and may have up to two child `Node`s. The most important invariants
//! of this BST are:
//!
//! 1. For every `Node`, all the `Node`s in its left subtree hold items
//!    less than its own item.
//! 2. For every `Node`, all the `Node`s in its right subtree hold items
//!    greater than or equal to its own item.
//!
//! Inserting keeps both of these. Rebalancing, and removing a node with two
//! children, can leave an item equal to a `Node`'s own in its left subtree, so
//! for duplicates only the weaker rule holds: the left subtree is never greater
//! and the right subtree is never smaller. Search and sorted iteration only
//! need the weaker rule.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching takes `O(height)` where `height` is the longest path from the
//! root `Node` to a leaf `Node`. Inserting sorted data drives the height
//! towards `N`, so [`Tree::rebalance`][linked::Tree::rebalance] flattens
//! the tree into sorted order and rebuilds it with a height of `lg N`.
//! Visiting the left subtree, then the subtree root, then the right subtree
//! gives the items in sorted order, which is also what range queries and
//! successor/predecessor lookups rely on.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod collection;
mod error;
pub mod iter;
pub mod linked;
mod util;

pub use collection::Collection;
pub use error::{Error, Result};
