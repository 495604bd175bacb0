#![no_main]

use delaykit::history::MultiSeriesHistory;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary update/read sequences on MultiSeriesHistory
//
// Times advance by arbitrary (possibly zero) integer steps; reads land on
// arbitrary past times. Checks structural invariants after every update
// and that every sample within a variable's horizon stays readable.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let n = usize::from(data[0] % 6) + 1;
    let horizons: Vec<u64> = (0..n).map(|i| u64::from(data[1] % 16) + i as u64 * 3).collect();
    let mut history = MultiSeriesHistory::new(n, 0u64, 1u64, &horizons, &vec![0u64; n]);

    let mut now = 0u64;
    for chunk in data[2..].chunks(2) {
        let op = chunk[0];
        let arg = chunk.get(1).copied().unwrap_or(0);

        if op % 4 == 0 {
            // Arbitrary past read
            let target = now.saturating_sub(u64::from(arg));
            let index = history.bisect(target);
            assert!(index < history.depth());
            let time = history.time_at(index).unwrap_or(0);
            let oldest = history.time_at(history.depth() - 1).unwrap_or(0);
            // past the oldest retained time, bisect clamps to the oldest sample
            assert!(time <= target || time == oldest);
            for variable in 0..n {
                if let Ok(value) = history.lookup(variable, target) {
                    // values record the update time
                    assert_eq!(*value, time);
                }
            }
            continue;
        }

        let step = u64::from(arg % 8);
        now += step;
        let values = vec![now; n];
        history.update(now, step, &values).unwrap();

        assert!(history.check_invariants().is_ok());
        for (variable, &horizon) in horizons.iter().enumerate() {
            let retained = history.retained_depth(variable).unwrap_or(0);
            for k in 0..history.depth() {
                let time = history.time_at(k).unwrap_or(0);
                if time >= now.saturating_sub(horizon) {
                    assert!(k < retained, "variable {variable} lost sample at {time}");
                }
            }
        }
    }
});
