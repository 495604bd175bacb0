#![no_main]

use delaykit::history::MultiSeriesHistory;
use libfuzzer_sys::fuzz_target;

// Fuzz property-based tests for MultiSeriesHistory
//
// Tests specific invariants and properties:
// - bisect agrees with a linear scan
// - rejected updates leave the history unchanged
// - shared depth equals the deepest variable
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let test_type = data[0] % 3;
    match test_type {
        0 => test_bisect_matches_scan(&data[1..]),
        1 => test_rejection_is_atomic(&data[1..]),
        2 => test_shared_depth(&data[1..]),
        _ => unreachable!(),
    }
});

fn build(data: &[u8]) -> MultiSeriesHistory<u32, u32> {
    let horizon = u32::from(data[0] % 32);
    let mut history = MultiSeriesHistory::new(2, 0, 0, &[horizon, horizon / 2], &[0, 0]);
    let mut now = 0u32;
    for &byte in &data[1..] {
        now += u32::from(byte % 4);
        history.update(now, u32::from(byte % 4), &[now, now]).unwrap();
    }
    history
}

// Property: bisect returns the smallest index holding the newest time <= target
fn test_bisect_matches_scan(data: &[u8]) {
    let history = build(data);
    let times: Vec<u32> = history.timestamps().iter().copied().collect();
    let latest = history.latest_time();

    for target in 0..=latest + 1 {
        let expected = match times.iter().position(|&t| t <= target) {
            Some(i) => i,
            None => {
                let deepest = times.len() - 1;
                times.iter().position(|&t| t == times[deepest]).unwrap_or(deepest)
            }
        };
        assert_eq!(history.bisect(target), expected, "target {target}");
    }
}

// Property: a rejected update does not change any buffer
fn test_rejection_is_atomic(data: &[u8]) {
    let mut history = build(data);
    let before = history.clone();

    if history.latest_time() > 0 {
        assert!(history.update(history.latest_time() - 1, 1, &[0, 0]).is_err());
    }
    assert!(history.update(history.latest_time(), 1, &[0]).is_err());

    assert_eq!(history.timestamps(), before.timestamps());
    assert_eq!(history.steps(), before.steps());
    assert_eq!(history[0], before[0]);
    assert_eq!(history[1], before[1]);
}

// Property: shared buffers are exactly as deep as the deepest variable
fn test_shared_depth(data: &[u8]) {
    let history = build(data);
    let deepest = (0..history.num_variables())
        .filter_map(|v| history.retained_depth(v))
        .max()
        .unwrap_or(0);
    assert_eq!(history.depth(), deepest);
    assert_eq!(history.steps().len(), history.depth());
}
