pub mod growable_ring;

pub use growable_ring::{GrowableRingBuffer, Iter, MIN_CAPACITY};
