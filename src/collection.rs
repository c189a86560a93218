/// The size bookkeeping every collection in this crate shares.
///
/// Construction from a source sequence is covered by [`FromIterator`] and [`Extend`], which
/// add each element in iteration order.
pub trait Collection {
    /// How many elements are stored, counting duplicates.
    fn len(&self) -> usize;

    /// Whether nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every element.
    fn clear(&mut self);
}
