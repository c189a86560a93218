//! Borrowing traversals over a [`Tree`][crate::linked::Tree]. All of them keep an explicit
//! stack or queue rather than recursing, so walking a degenerate tree costs heap, not call stack.

use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::vec;

use crate::linked::Node;

/// The default traversal: each node, then its right subtree, then its left subtree.
///
/// Created by [`Tree::iter`][crate::linked::Tree::iter].
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        Self {
            stack: root.into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Left goes on first so the right subtree comes off the stack first.
        self.stack.extend(node.left.as_deref());
        self.stack.extend(node.right.as_deref());
        Some(&node.data)
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

/// Classic pre-order: each node, then its left subtree, then its right subtree.
///
/// Re-inserting these elements into an empty tree rebuilds the same shape.
pub struct Preorder<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Preorder<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        Self {
            stack: root.into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for Preorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right.as_deref());
        self.stack.extend(node.left.as_deref());
        Some(&node.data)
    }
}

impl<T> FusedIterator for Preorder<'_, T> {}

/// Ascending traversal: left subtree, node, right subtree.
pub struct Inorder<'a, T> {
    stack: Vec<&'a Node<T>>,
    current: Option<&'a Node<T>>,
}

impl<'a, T> Inorder<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        Self {
            stack: Vec::new(),
            current: root,
        }
    }
}

impl<'a, T> Iterator for Inorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.current {
            self.stack.push(node);
            self.current = node.left.as_deref();
        }

        let node = self.stack.pop()?;
        self.current = node.right.as_deref();
        Some(&node.data)
    }
}

impl<T> FusedIterator for Inorder<'_, T> {}

/// Post-order: left subtree, right subtree, node.
///
/// This is the default traversal reversed, so it is collected up front.
pub struct Postorder<'a, T> {
    items: std::iter::Rev<vec::IntoIter<&'a T>>,
}

impl<'a, T> Postorder<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        Self {
            items: Iter::new(root).collect::<Vec<_>>().into_iter().rev(),
        }
    }
}

impl<'a, T> Iterator for Postorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<T> FusedIterator for Postorder<'_, T> {}

/// Breadth first, each level left to right.
pub struct Levelorder<'a, T> {
    queue: VecDeque<&'a Node<T>>,
}

impl<'a, T> Levelorder<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        Self {
            queue: root.into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for Levelorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.left.as_deref());
        self.queue.extend(node.right.as_deref());
        Some(&node.data)
    }
}

impl<T> FusedIterator for Levelorder<'_, T> {}
