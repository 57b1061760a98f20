/// Decides which of two priorities sits closer to the root.
///
/// `outranks(a, b)` must behave like a strict ordering: it returns `false` when `a` and `b` are
/// equally ranked. Any `Fn(&P, &P) -> bool` closure is a comparator.
pub trait Comparator<P> {
    /// Returns `true` if `lhs` must sit above `rhs`.
    fn outranks(&self, lhs: &P, rhs: &P) -> bool;
}

/// Larger priorities sit closer to the root (a max-heap).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MaxPriority;

/// Smaller priorities sit closer to the root (a min-heap).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MinPriority;

impl<P: PartialOrd> Comparator<P> for MaxPriority {
    fn outranks(&self, lhs: &P, rhs: &P) -> bool {
        lhs > rhs
    }
}

impl<P: PartialOrd> Comparator<P> for MinPriority {
    fn outranks(&self, lhs: &P, rhs: &P) -> bool {
        lhs < rhs
    }
}

impl<P, F> Comparator<P> for F
where
    F: Fn(&P, &P) -> bool,
{
    fn outranks(&self, lhs: &P, rhs: &P) -> bool {
        self(lhs, rhs)
    }
}
