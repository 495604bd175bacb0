#![no_main]

use std::collections::VecDeque;

use delaykit::ds::GrowableRingBuffer;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on GrowableRingBuffer
//
// Mirrors every operation on a VecDeque (front = index 0) and compares
// contents, length and capacity shape after each step.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let reserve = usize::from(data[0] % 64);
    let mut ring = GrowableRingBuffer::with_capacity(reserve);
    let mut model: VecDeque<u8> = VecDeque::new();

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 7;
        let value = data[idx + 1];

        match op {
            0 => {
                // Append at head
                ring.append_at_head(value);
                model.push_front(value);
            }
            1 => {
                // Grow exposes a slot with unspecified content; write it
                ring.grow();
                ring[0] = value;
                model.push_front(value);
            }
            2 => {
                // Slide in (drops oldest when non-empty)
                ring.slide_in(value);
                if !model.is_empty() {
                    model.pop_back();
                    model.push_front(value);
                }
            }
            3 => {
                // Overwrite an existing slot
                if !model.is_empty() {
                    let i = usize::from(value) % model.len();
                    ring[i] = value;
                    model[i] = value;
                }
            }
            4 => {
                // Checked read past the end
                assert_eq!(ring.get(model.len()), None);
                assert_eq!(ring.get(usize::from(value) + model.len()), None);
            }
            5 => {
                // Clear keeps capacity
                let capacity = ring.capacity();
                ring.clear();
                model.clear();
                assert_eq!(ring.capacity(), capacity);
            }
            6 => {
                // Iteration order in both directions
                let forward: Vec<u8> = ring.iter().copied().collect();
                let backward: Vec<u8> = ring.iter().rev().copied().collect();
                assert_eq!(forward, model.iter().copied().collect::<Vec<_>>());
                assert_eq!(backward, model.iter().rev().copied().collect::<Vec<_>>());
            }
            _ => unreachable!(),
        }

        ring.debug_validate_invariants();
        assert_eq!(ring.len(), model.len());
        assert!(ring.capacity().is_power_of_two());
        assert!(ring.len() < ring.capacity());
        assert_eq!(ring.front(), model.front());
        assert_eq!(ring.back(), model.back());
        for (i, expected) in model.iter().enumerate() {
            assert_eq!(ring.get(i), Some(expected));
        }

        idx += 2;
    }
});
