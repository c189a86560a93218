/// Which child slot a descent continues through.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    /// The item sorts before the node's data.
    Left,
    /// The item sorts at or after the node's data. Duplicates always go this way.
    Right,
}

impl Direction {
    /// The direction an insert of `item` takes when it meets `data`.
    pub(crate) fn of<T: Ord>(item: &T, data: &T) -> Self {
        if item < data {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// Like [`Direction::of`] but `None` when `item` equals `data`, i.e. the search is over.
    pub(crate) fn toward<T: Ord>(item: &T, data: &T) -> Option<Self> {
        if item == data {
            None
        } else {
            Some(Self::of(item, data))
        }
    }
}
