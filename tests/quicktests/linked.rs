use linked_bst::{linked::Tree, Error};

use std::collections::HashSet;

use crate::{init_test_setup, Op};

/// Applies a set of operations to a tree and a sorted vector.
/// This way we can ensure that after a random smattering of inserts,
/// removes, and rebalances we have the same items in both.
fn do_ops<T>(ops: &[Op<T>], bst: &mut Tree<T>, model: &mut Vec<T>)
where
    T: Ord + Clone + std::fmt::Debug,
{
    for op in ops {
        match op {
            Op::Insert(x) => {
                bst.insert(x.clone());
                let at = model.partition_point(|y| y <= x);
                model.insert(at, x.clone());
            }
            Op::Remove(x) => match model.iter().position(|y| y == x) {
                Some(at) => assert_eq!(bst.remove(x), Ok(model.remove(at))),
                None => assert_eq!(bst.remove(x), Err(Error::NotFound)),
            },
            Op::Rebalance => {
                bst.rebalance();
            }
        }
    }
}

/// The distinct items of `xs`, sorted.
fn unique(xs: &[i8]) -> Vec<i8> {
    let mut xs = xs.to_vec();
    xs.sort_unstable();
    xs.dedup();
    xs
}

quickcheck::quickcheck! {
    fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
        init_test_setup();
        let mut tree = Tree::new();
        let mut model = Vec::new();

        do_ops(&ops, &mut tree, &mut model);
        tree.len() == model.len() && tree.inorder().eq(model.iter())
    }
}

quickcheck::quickcheck! {
    fn inorder_is_sorted_input(xs: Vec<i8>) -> bool {
        let tree: Tree<_> = xs.iter().copied().collect();
        let mut sorted = xs;
        sorted.sort();

        tree.inorder().eq(sorted.iter())
    }
}

quickcheck::quickcheck! {
    fn contains(xs: Vec<i8>) -> bool {
        let tree: Tree<_> = xs.iter().copied().collect();

        xs.iter().all(|x| tree.find(x) == Some(x) && tree.find_recursive(x) == Some(x))
    }
}

quickcheck::quickcheck! {
    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let tree: Tree<_> = xs.iter().copied().collect();
        let added: HashSet<_> = xs.into_iter().collect();
        let nots: HashSet<_> = nots.into_iter().collect();
        let mut nots = nots.difference(&added);

        nots.all(|x| tree.find(x).is_none())
    }
}

quickcheck::quickcheck! {
    fn len_counts_inserts_minus_removes(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
        let mut tree: Tree<_> = xs.iter().copied().collect();
        let removed = deletes.iter().filter(|x| tree.remove(x).is_ok()).count();

        tree.len() == xs.len() - removed
    }
}

quickcheck::quickcheck! {
    fn remove_then_find_misses(xs: Vec<i8>) -> bool {
        let xs = unique(&xs);
        let mut tree: Tree<_> = xs.iter().copied().collect();

        xs.iter().all(|x| tree.remove(x) == Ok(*x) && tree.find(x).is_none())
            && tree.is_empty()
    }
}

quickcheck::quickcheck! {
    fn rebalance_keeps_items(xs: Vec<i8>) -> bool {
        let mut tree: Tree<_> = xs.iter().copied().collect();
        let before: Vec<_> = tree.inorder().copied().collect();
        let len = tree.len();
        tree.rebalance();

        let bound = ((len + 1) as f64).log2().ceil() as usize;
        tree.inorder().copied().eq(before) && tree.len() == len && tree.height() <= bound
    }
}

quickcheck::quickcheck! {
    fn successor_and_predecessor_are_inverses(xs: Vec<i8>) -> bool {
        let xs = unique(&xs);
        let tree: Tree<_> = xs.iter().copied().collect();

        xs.iter().all(|x| match tree.successor(x) {
            Some(next) => tree.predecessor(next) == Some(x),
            None => tree.max() == Some(x),
        })
    }
}

quickcheck::quickcheck! {
    fn successor_is_next_larger(xs: Vec<i8>, probe: i8) -> bool {
        let xs = unique(&xs);
        let tree: Tree<_> = xs.iter().copied().collect();

        tree.successor(&probe) == xs.iter().find(|x| **x > probe)
            && tree.predecessor(&probe) == xs.iter().rev().find(|x| **x < probe)
    }
}

quickcheck::quickcheck! {
    fn range_find_is_filtered_inorder(xs: Vec<i8>, low: i8, high: i8) -> bool {
        let tree: Tree<_> = xs.iter().copied().collect();
        let expected: Vec<_> = tree.inorder().filter(|x| low <= **x && **x <= high).collect();

        tree.range_find(&low, &high) == expected
    }
}

#[test]
fn rebalance_on_sorted_input() {
    init_test_setup();
    let mut tree: Tree<_> = (1..=8).collect();
    assert_eq!(tree.height(), 7);
    assert!(!tree.is_balanced());

    tree.rebalance();
    assert!(tree.height() <= 3);
    assert!(tree.is_balanced());
    assert_eq!(tree.inorder().copied().collect::<Vec<_>>(), (1..=8).collect::<Vec<_>>());
}
