//! Growable, newest-first ring buffer.
//!
//! Stores a window of values in power-of-two backing storage addressed by two
//! offsets. Logical index 0 is always the newest entry; appending moves the
//! origin back by one slot so every existing entry's index increases by one.
//! Used as the per-variable and shared storage of
//! [`MultiSeriesHistory`](crate::history::MultiSeriesHistory).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                    GrowableRingBuffer<T> Layout                             │
//! │                                                                             │
//! │   slots: Box<[T]>  (capacity C, power of two)                               │
//! │   head:  physical slot of logical index 0 (newest)                          │
//! │   tail:  one past the physical slot of the oldest entry                     │
//! │   len  = (tail - head) & (C - 1)                                            │
//! │                                                                             │
//! │   After append_at_head: 10, 20, 30                                          │
//! │                                                                             │
//! │   Physical:  0     1     2     3                                            │
//! │            ┌─────┬─────┬─────┬─────┐                                        │
//! │   slots:   │     │ 30  │ 20  │ 10  │                                        │
//! │            └─────┴─────┴─────┴─────┘                                        │
//! │              ▲     ▲                                                        │
//! │              │     └── head = 1 (logical 0 = 30, 1 = 20, 2 = 10)            │
//! │              └──────── tail = 0 (reserved slot)                             │
//! │                                                                             │
//! │   get(i) = slots[(head + i) & (C - 1)]   if i < len                         │
//! │                                                                             │
//! │   Append Modes                                                              │
//! │   ────────────                                                              │
//! │                                                                             │
//! │   slide():  head -= 1, tail -= 1   len unchanged, oldest dropped            │
//! │   grow():   head -= 1              len + 1, doubles C when len == C - 1     │
//! │                                                                             │
//! │   One slot is always left unused so that head == tail means empty.         │
//! │                                                                             │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation            | Description                               | Complexity   |
//! |----------------------|-------------------------------------------|--------------|
//! | [`get`] / [`get_mut`]| Checked access by logical index           | O(1)         |
//! | [`slide`]            | Shift origin, drop oldest                 | O(1)         |
//! | [`grow`]             | Shift origin, keep oldest                 | O(1) amort.  |
//! | [`append_at_head`]   | `grow` then write index 0                 | O(1) amort.  |
//! | [`slide_in`]         | `slide` then write index 0                | O(1)         |
//! | [`iter`]             | Iterate newest to oldest                  | O(len)       |
//!
//! [`get`]: GrowableRingBuffer::get
//! [`get_mut`]: GrowableRingBuffer::get_mut
//! [`slide`]: GrowableRingBuffer::slide
//! [`grow`]: GrowableRingBuffer::grow
//! [`append_at_head`]: GrowableRingBuffer::append_at_head
//! [`slide_in`]: GrowableRingBuffer::slide_in
//! [`iter`]: GrowableRingBuffer::iter
//!
//! ## Example Usage
//!
//! ```
//! use delaykit::ds::GrowableRingBuffer;
//!
//! let mut ring = GrowableRingBuffer::new();
//! ring.append_at_head(1);
//! ring.append_at_head(2);
//! ring.append_at_head(3);
//! assert_eq!(ring.to_vec_newest_first(), vec![3, 2, 1]);
//!
//! // Slide keeps the length and drops the oldest entry
//! ring.slide_in(4);
//! assert_eq!(ring.to_vec_newest_first(), vec![4, 3, 2]);
//!
//! // Reads past the logical window are reported, not served from stale slots
//! assert_eq!(ring.get(3), None);
//! ```
//!
//! ## Thread Safety
//!
//! `GrowableRingBuffer` is not thread-safe and carries no interior locking.
//!
//! ## Implementation Notes
//!
//! - `slide` and `grow` perform the same origin shift; they differ only in
//!   whether the tail follows. Any two buffers advanced in lockstep therefore
//!   agree on what index `k` means for every `k` below both lengths.
//! - Capacity doubling moves the occupied window to the front of the new
//!   storage in two segments when it wraps.
//! - `debug_validate_invariants()` available in debug/test builds

use std::ops::{Index, IndexMut};

/// Capacity of a buffer created with [`GrowableRingBuffer::new`].
pub const MIN_CAPACITY: usize = 4;

/// Newest-first circular buffer with slide and grow append modes.
///
/// Logical index 0 is the most recent entry. Requires `T: Default` so that
/// backing slots can be allocated before they are written.
///
/// # Example
///
/// ```
/// use delaykit::ds::GrowableRingBuffer;
///
/// let mut ring = GrowableRingBuffer::new();
/// for v in 1..=10 {
///     ring.append_at_head(v);
/// }
///
/// assert_eq!(ring.len(), 10);
/// assert_eq!(ring[0], 10);
/// assert_eq!(ring[9], 1);
/// assert!(ring.capacity() > ring.len());
/// assert!(ring.capacity().is_power_of_two());
/// ```
#[derive(Debug, Clone)]
pub struct GrowableRingBuffer<T> {
    slots: Box<[T]>,
    head: usize,
    tail: usize,
}

impl<T: Default> GrowableRingBuffer<T> {
    /// Creates an empty buffer with [`MIN_CAPACITY`] slots.
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::ds::GrowableRingBuffer;
    ///
    /// let ring: GrowableRingBuffer<f64> = GrowableRingBuffer::new();
    /// assert!(ring.is_empty());
    /// assert_eq!(ring.capacity(), 4);
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty buffer able to hold `len` entries without reallocating.
    ///
    /// The backing capacity is `len + 1` rounded up to a power of two, and at
    /// least [`MIN_CAPACITY`].
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::ds::GrowableRingBuffer;
    ///
    /// let ring: GrowableRingBuffer<u32> = GrowableRingBuffer::with_capacity(8);
    /// assert_eq!(ring.capacity(), 16);
    /// ```
    pub fn with_capacity(len: usize) -> Self {
        let capacity = len
            .saturating_add(1)
            .next_power_of_two()
            .max(MIN_CAPACITY);
        Self {
            slots: default_slots(capacity),
            head: 0,
            tail: 0,
        }
    }

    /// Extends the logical length by one, keeping every existing entry.
    ///
    /// Index 0 moves to a fresh slot whose content is unspecified until the
    /// caller writes it; every previous index `i` becomes `i + 1`. Doubles the
    /// backing storage first when only the reserved slot is free.
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::ds::GrowableRingBuffer;
    ///
    /// let mut ring = GrowableRingBuffer::new();
    /// ring.append_at_head(7);
    /// ring.grow();
    /// ring[0] = 8;
    /// assert_eq!(ring.to_vec_newest_first(), vec![8, 7]);
    /// ```
    pub fn grow(&mut self) {
        if self.len() == self.mask() {
            self.expand();
        }
        self.head = self.wrap(self.head.wrapping_sub(1));
    }

    /// Grows by one and writes `value` at index 0.
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::ds::GrowableRingBuffer;
    ///
    /// let mut ring = GrowableRingBuffer::new();
    /// ring.append_at_head("a");
    /// ring.append_at_head("b");
    /// assert_eq!(ring.front(), Some(&"b"));
    /// assert_eq!(ring.back(), Some(&"a"));
    /// ```
    pub fn append_at_head(&mut self, value: T) {
        self.grow();
        self.slots[self.head] = value;
    }

    fn expand(&mut self) {
        let old_capacity = self.capacity();
        let len = self.len();
        let mut slots = default_slots(old_capacity * 2);
        let mut old = std::mem::take(&mut self.slots).into_vec();

        if self.head <= self.tail {
            for (dst, src) in slots.iter_mut().zip(old[self.head..self.tail].iter_mut()) {
                *dst = std::mem::take(src);
            }
        } else {
            let (wrapped, upper) = old.split_at_mut(self.head);
            let window = upper.iter_mut().chain(wrapped[..self.tail].iter_mut());
            for (dst, src) in slots.iter_mut().zip(window) {
                *dst = std::mem::take(src);
            }
        }

        self.slots = slots;
        self.head = 0;
        self.tail = len;
        tracing::trace!(
            from = old_capacity,
            to = old_capacity * 2,
            len,
            "ring buffer capacity doubled"
        );
    }
}

impl<T> GrowableRingBuffer<T> {
    #[inline]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    #[inline]
    fn wrap(&self, offset: usize) -> usize {
        offset & self.mask()
    }

    #[inline]
    fn physical(&self, index: usize) -> usize {
        self.wrap(self.head.wrapping_add(index))
    }

    /// Returns the number of entries in the logical window.
    #[inline]
    pub fn len(&self) -> usize {
        self.wrap(self.tail.wrapping_sub(self.head))
    }

    /// Returns `true` if the logical window is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Returns the number of backing slots (always a power of two, always
    /// greater than [`len`](Self::len)).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the entry at logical `index`, or `None` when `index` lies
    /// outside the retained window.
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::ds::GrowableRingBuffer;
    ///
    /// let mut ring = GrowableRingBuffer::new();
    /// ring.append_at_head(10);
    /// ring.append_at_head(20);
    ///
    /// assert_eq!(ring.get(0), Some(&20));
    /// assert_eq!(ring.get(1), Some(&10));
    /// assert_eq!(ring.get(2), None);
    /// ```
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len() {
            Some(&self.slots[self.physical(index)])
        } else {
            None
        }
    }

    /// Mutable variant of [`get`](Self::get).
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len() {
            let slot = self.physical(index);
            Some(&mut self.slots[slot])
        } else {
            None
        }
    }

    /// Returns the newest entry.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the oldest retained entry.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|last| self.get(last))
    }

    /// Advances the window by one without growing: the oldest entry is
    /// dropped and index 0 moves to the freed slot.
    ///
    /// The slot at index 0 still holds the dropped value until the caller
    /// overwrites it. On an empty buffer the offsets still move and the
    /// length stays zero.
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::ds::GrowableRingBuffer;
    ///
    /// let mut ring = GrowableRingBuffer::new();
    /// ring.append_at_head(1);
    /// ring.append_at_head(2);
    ///
    /// ring.slide();
    /// ring[0] = 3;
    /// assert_eq!(ring.to_vec_newest_first(), vec![3, 2]);
    /// ```
    pub fn slide(&mut self) {
        self.head = self.wrap(self.head.wrapping_sub(1));
        self.tail = self.wrap(self.tail.wrapping_sub(1));
    }

    /// Slides by one and writes `value` at index 0.
    ///
    /// On an empty buffer the window stays empty and `value` is discarded;
    /// use [`append_at_head`](Self::append_at_head) for the first write.
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::ds::GrowableRingBuffer;
    ///
    /// let mut ring = GrowableRingBuffer::new();
    /// ring.append_at_head(1);
    /// ring.append_at_head(2);
    /// ring.slide_in(3);
    /// ring.slide_in(4);
    /// assert_eq!(ring.to_vec_newest_first(), vec![4, 3]);
    /// ```
    pub fn slide_in(&mut self, value: T) {
        self.slide();
        self.slots[self.head] = value;
    }

    /// Empties the logical window, keeping the backing storage.
    pub fn clear(&mut self) {
        self.tail = self.head;
    }

    /// Returns an iterator from the newest entry to the oldest.
    ///
    /// # Example
    ///
    /// ```
    /// use delaykit::ds::GrowableRingBuffer;
    ///
    /// let mut ring = GrowableRingBuffer::new();
    /// for v in [1, 2, 3] {
    ///     ring.append_at_head(v);
    /// }
    /// let values: Vec<_> = ring.iter().copied().collect();
    /// assert_eq!(values, vec![3, 2, 1]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            ring: self,
            front: 0,
            back: self.len(),
        }
    }

    /// Returns the retained entries from newest to oldest.
    pub fn to_vec_newest_first(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Returns an approximate memory footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.capacity() * std::mem::size_of::<T>()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.capacity().is_power_of_two());
        assert!(self.capacity() >= MIN_CAPACITY);
        assert!(self.head < self.capacity());
        assert!(self.tail < self.capacity());
        assert!(self.len() < self.capacity());
    }
}

impl<T: Default> Default for GrowableRingBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn default_slots<T: Default>(capacity: usize) -> Box<[T]> {
    std::iter::repeat_with(T::default).take(capacity).collect()
}

impl<T> Index<usize> for GrowableRingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        let len = self.len();
        match self.get(index) {
            Some(value) => value,
            None => panic!("ring index out of range: the len is {len} but the index is {index}"),
        }
    }
}

impl<T> IndexMut<usize> for GrowableRingBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("ring index out of range: the len is {len} but the index is {index}"),
        }
    }
}

// ---------------------------------------------------------------------------
// PartialEq, Eq: compare the logical window, not the backing slots
// ---------------------------------------------------------------------------

impl<T: PartialEq> PartialEq for GrowableRingBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for GrowableRingBuffer<T> {}

/// Borrowed iterator over a [`GrowableRingBuffer`], newest entry first.
///
/// Created by [`GrowableRingBuffer::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    ring: &'a GrowableRingBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let ring: &'a GrowableRingBuffer<T> = self.ring;
        let value = &ring.slots[ring.physical(self.front)];
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(&self.ring.slots[self.ring.physical(self.back)])
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a GrowableRingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ring_is_empty() {
        let ring: GrowableRingBuffer<i32> = GrowableRingBuffer::new();
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.capacity(), MIN_CAPACITY);
        assert_eq!(ring.get(0), None);
        assert_eq!(ring.front(), None);
        assert_eq!(ring.back(), None);
    }

    #[test]
    fn with_capacity_reserves_the_spare_slot() {
        let ring: GrowableRingBuffer<i32> = GrowableRingBuffer::with_capacity(3);
        assert_eq!(ring.capacity(), 4);
        let ring: GrowableRingBuffer<i32> = GrowableRingBuffer::with_capacity(4);
        assert_eq!(ring.capacity(), 8);
        let ring: GrowableRingBuffer<i32> = GrowableRingBuffer::with_capacity(0);
        assert_eq!(ring.capacity(), MIN_CAPACITY);
    }

    #[test]
    fn append_at_head_puts_newest_at_index_zero() {
        let mut ring = GrowableRingBuffer::new();
        for v in 1..=3 {
            ring.append_at_head(v);
            assert_eq!(ring[0], v);
        }
        assert_eq!(ring.to_vec_newest_first(), vec![3, 2, 1]);
    }

    #[test]
    fn grow_then_write_sequence_survives_doubling() {
        let mut ring = GrowableRingBuffer::new();
        ring.append_at_head(1);
        let initial_capacity = ring.capacity();
        for k in 2..=17 {
            ring.grow();
            ring[0] = k;
        }
        assert_eq!(ring.len(), 17);
        for i in 0..17 {
            assert_eq!(ring[i], 18 - i as i32);
        }
        assert!(ring.capacity() > initial_capacity);
        ring.debug_validate_invariants();
    }

    #[test]
    fn slide_keeps_length_and_drops_oldest() {
        let mut ring = GrowableRingBuffer::new();
        for v in 1..=5 {
            ring.append_at_head(v);
        }
        for v in 6..=105 {
            ring.slide_in(v);
            assert_eq!(ring.len(), 5);
            for i in 0..5 {
                assert_eq!(ring[i], v - i as i32);
            }
        }
        ring.debug_validate_invariants();
    }

    #[test]
    fn expansion_with_wrapped_window_preserves_order() {
        let mut ring = GrowableRingBuffer::new();
        for v in 1..=3 {
            ring.append_at_head(v);
        }
        // Rotate so the window straddles the end of the backing storage
        for v in 4..=6 {
            ring.slide_in(v);
        }
        assert_eq!(ring.capacity(), 4);
        ring.append_at_head(7);
        assert_eq!(ring.capacity(), 8);
        assert_eq!(ring.to_vec_newest_first(), vec![7, 6, 5, 4]);
        ring.debug_validate_invariants();
    }

    #[test]
    fn get_rejects_indices_beyond_the_window() {
        let mut ring = GrowableRingBuffer::new();
        ring.append_at_head(1);
        ring.append_at_head(2);
        ring.slide_in(3);
        // Slot for the dropped 1 still exists physically but is not readable
        assert_eq!(ring.get(2), None);
        assert_eq!(ring.get_mut(2), None);
        assert_eq!(ring.get(usize::MAX), None);
    }

    #[test]
    #[should_panic(expected = "ring index out of range")]
    fn index_past_len_panics() {
        let mut ring = GrowableRingBuffer::new();
        ring.append_at_head(1);
        let _ = ring[1];
    }

    #[test]
    fn slide_on_empty_keeps_it_empty() {
        let mut ring: GrowableRingBuffer<i32> = GrowableRingBuffer::new();
        ring.slide();
        ring.slide();
        assert!(ring.is_empty());
        ring.debug_validate_invariants();
    }

    #[test]
    fn slide_in_on_empty_discards_value() {
        let mut ring = GrowableRingBuffer::new();
        ring.slide_in(9);
        assert!(ring.is_empty());
        assert_eq!(ring.get(0), None);
        ring.append_at_head(1);
        assert_eq!(ring.to_vec_newest_first(), vec![1]);
        ring.debug_validate_invariants();
    }

    #[test]
    fn grow_after_slides_reuses_a_stale_slot() {
        let mut ring = GrowableRingBuffer::new();
        ring.append_at_head(1);
        ring.append_at_head(2);
        for v in [3, 4, 5] {
            ring.slide_in(v);
        }
        assert_eq!(ring.to_vec_newest_first(), vec![5, 4]);

        // the exposed slot still carries whatever was last stored there
        ring.grow();
        assert_eq!(ring.len(), 3);
        assert_eq!(&ring.to_vec_newest_first()[1..], &[5, 4]);

        ring[0] = 6;
        assert_eq!(ring.to_vec_newest_first(), vec![6, 5, 4]);
        ring.debug_validate_invariants();
    }

    #[test]
    fn length_counts_grows_regardless_of_slides() {
        let mut ring = GrowableRingBuffer::new();
        let ops = [true, false, true, true, false, false, true, false, true];
        let mut grows = 0;
        for (step, &grow) in ops.iter().enumerate() {
            if grow {
                ring.grow();
                grows += 1;
            } else {
                ring.slide();
            }
            if let Some(slot) = ring.get_mut(0) {
                *slot = step;
            }
            assert_eq!(ring.len(), grows);
        }
        assert_eq!(ring[0], ops.len() - 1);
    }

    #[test]
    fn front_and_back() {
        let mut ring = GrowableRingBuffer::new();
        ring.append_at_head('a');
        ring.append_at_head('b');
        ring.append_at_head('c');
        assert_eq!(ring.front(), Some(&'c'));
        assert_eq!(ring.back(), Some(&'a'));
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut ring = GrowableRingBuffer::new();
        for v in 0..10 {
            ring.append_at_head(v);
        }
        let capacity = ring.capacity();
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), capacity);
        ring.append_at_head(42);
        assert_eq!(ring.to_vec_newest_first(), vec![42]);
    }

    #[test]
    fn iter_is_double_ended_and_exact() {
        let mut ring = GrowableRingBuffer::new();
        for v in 1..=6 {
            ring.append_at_head(v);
        }
        let iter = ring.iter();
        assert_eq!(iter.len(), 6);
        let oldest_first: Vec<_> = ring.iter().rev().copied().collect();
        assert_eq!(oldest_first, vec![1, 2, 3, 4, 5, 6]);

        let mut total = 0;
        for v in &ring {
            total += v;
        }
        assert_eq!(total, 21);
    }

    #[test]
    fn eq_compares_logical_content() {
        let mut a = GrowableRingBuffer::new();
        let mut b = GrowableRingBuffer::with_capacity(32);
        for v in [1, 2, 3] {
            a.append_at_head(v);
        }
        b.append_at_head(0);
        for v in [1, 2, 3] {
            b.append_at_head(v);
        }
        assert_ne!(a, b);
    }

    #[test]
    fn eq_ignores_offsets() {
        let mut a = GrowableRingBuffer::new();
        let mut b = GrowableRingBuffer::new();
        for v in [1, 2] {
            a.append_at_head(v);
        }
        b.append_at_head(0);
        b.append_at_head(1);
        b.slide_in(2);
        assert_eq!(b.to_vec_newest_first(), vec![2, 1]);
        assert_eq!(a, b);
    }

    #[test]
    fn approx_bytes_scales_with_capacity() {
        let small: GrowableRingBuffer<u64> = GrowableRingBuffer::new();
        let large: GrowableRingBuffer<u64> = GrowableRingBuffer::with_capacity(100);
        assert!(small.approx_bytes() >= 4 * std::mem::size_of::<u64>());
        assert!(large.approx_bytes() > small.approx_bytes());
    }
}
