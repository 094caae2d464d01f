//! Property tests for the reset-not-stack debounce timer.
//!
//! For any schedule of arm calls, the number of firings equals the number of
//! gaps between consecutive arms that are at least the quiet period, plus one
//! for the final burst, and every firing lands exactly one quiet period after
//! the last arm of its burst.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use devloop::watch::DebounceTimer;
use proptest::prelude::*;
use tokio::time::{sleep, Instant};

const QUIET_MS: u64 = 100;

/// Run the schedule on a paused runtime and return when each firing
/// happened, in ms since the start.
fn fire_times(gaps_ms: &[u64]) -> Vec<u64> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("build runtime");

    rt.block_on(async {
        let timer = DebounceTimer::new(Duration::from_millis(QUIET_MS));
        let start = Instant::now();
        let fired = Arc::new(Mutex::new(Vec::new()));

        let task = {
            let timer = Arc::clone(&timer);
            let fired = Arc::clone(&fired);
            tokio::spawn(async move {
                loop {
                    timer.settled().await;
                    let at = Instant::now().duration_since(start).as_millis() as u64;
                    fired.lock().unwrap().push(at);
                }
            })
        };

        timer.arm();
        for gap in gaps_ms {
            sleep(Duration::from_millis(*gap)).await;
            timer.arm();
        }
        sleep(Duration::from_millis(QUIET_MS * 3)).await;
        task.abort();

        let fired = fired.lock().unwrap().clone();
        fired
    })
}

/// Expected firing times: after each arm that is followed by a gap of at
/// least the quiet period (or by nothing).
fn expected_fire_times(gaps_ms: &[u64]) -> Vec<u64> {
    let mut expected = Vec::new();
    let mut now = 0;
    for gap in gaps_ms {
        if *gap >= QUIET_MS {
            expected.push(now + QUIET_MS);
        }
        now += gap;
    }
    expected.push(now + QUIET_MS);
    expected
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn firings_follow_last_arm_of_each_burst(
        gaps in prop::collection::vec((1u64..250).prop_filter("gap equal to the quiet period races the deadline", |g| *g != QUIET_MS), 0..20)
    ) {
        let fired = fire_times(&gaps);
        prop_assert_eq!(fired, expected_fire_times(&gaps));
    }
}
