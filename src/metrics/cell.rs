use std::cell::Cell;

/// A metrics-only counter cell.
///
/// Lets `&self` query paths such as `bisect` and `lookup` count calls without
/// requiring `&mut`. The owning history is single-threaded, so the cell is
/// deliberately `!Sync`.
#[repr(transparent)]
#[derive(Debug, Default, Clone)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.add(1);
    }

    #[inline]
    pub fn add(&self, n: u64) {
        self.0.set(self.0.get() + n);
    }

    #[inline]
    pub fn reset(&self) {
        self.0.set(0);
    }
}
