//! DHAT heap profiler for delaykit.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use delaykit::builder::HistoryBuilder;
use delaykit::ds::GrowableRingBuffer;

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (u64::MAX as f64);
        (self.next_u64() as f64) * SCALE
    }
}

fn profile_ring_growth() {
    println!("=== Profiling ring growth ===");
    let mut ring = GrowableRingBuffer::new();
    for i in 0..1_000_000u64 {
        ring.append_at_head(i);
    }
    println!("  Final len: {}, capacity: {}", ring.len(), ring.capacity());
}

/// Adaptive steps: sizes vary between 0.5x and 1.5x of the nominal step.
fn profile_adaptive_history(reserve: usize) {
    println!("=== Profiling adaptive-step history (reserve {reserve}) ===");
    let variables = 16;
    let steps = 200_000;
    let nominal = 0.001;

    let mut history = HistoryBuilder::new(0.0)
        .initial_step(nominal)
        .variables((0..variables).map(|i| (0.05 * (i + 1) as f64, 0.0)))
        .reserve(reserve)
        .build();

    let mut rng = XorShift64::new(42);
    let mut t = 0.0;
    let mut state = vec![0.0; variables];
    for _ in 0..steps {
        let h = nominal * (0.5 + rng.next_f64());
        t += h;
        for (i, y) in state.iter_mut().enumerate() {
            let delayed = history.lookup(i, t - 0.05 * (i + 1) as f64).copied().unwrap_or(0.0);
            *y += h * (1.0 - delayed);
        }
        if let Err(err) = history.update(t, h, &state) {
            eprintln!("  update rejected: {err}");
            return;
        }
    }

    println!("  Final depth: {}", history.depth());
    println!("  Approx bytes: {}", history.approx_bytes());
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("delaykit DHAT Heap Profiling");
    println!("============================\n");

    profile_ring_growth();
    profile_adaptive_history(0);
    profile_adaptive_history(1024);

    println!("\n============================");
    println!("Profiling complete!");
    println!(
        "View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>"
    );
}
