use std::time::{Duration, Instant};

/// How much faster than realtime we expect the external tools to chew
/// through media. Display heuristic only; true decode progress is not
/// observable from the tools.
const EXPECTED_REALTIME_FACTOR: f64 = 0.35;

/// Heuristic per-file progress display.
///
/// Maps elapsed wall-clock time against the probed media duration. Clamped
/// below 100 until `finish()` is called, so the display is monotonic,
/// non-negative, and reaches exactly 100 on completion. Not a
/// correctness-bearing value.
#[derive(Debug)]
pub struct FileProgress {
    started: Instant,
    expected: Option<Duration>,
    finished: bool,
}

impl FileProgress {
    pub fn start(duration_secs: Option<f64>) -> Self {
        let expected = duration_secs
            .filter(|d| *d > 0.0)
            .map(|d| Duration::from_secs_f64(d * EXPECTED_REALTIME_FACTOR));
        Self {
            started: Instant::now(),
            expected,
            finished: false,
        }
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn percent(&self) -> u8 {
        self.percent_at(self.started.elapsed())
    }

    fn percent_at(&self, elapsed: Duration) -> u8 {
        if self.finished {
            return 100;
        }
        match self.expected {
            Some(expected) if !expected.is_zero() => {
                let ratio = elapsed.as_secs_f64() / expected.as_secs_f64();
                (ratio * 100.0).clamp(0.0, 99.0) as u8
            }
            // Unknown duration: nothing sensible to show until completion.
            _ => 0,
        }
    }
}

/// Batch-level remaining-time estimate: plain running average of completed
/// per-file times projected over the files still pending. No smoothing.
#[derive(Debug)]
pub struct BatchEta {
    total: usize,
    completed: usize,
    elapsed: Duration,
}

impl BatchEta {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Record one finished file (terminal state, success or failure).
    pub fn record(&mut self, file_elapsed: Duration) {
        self.completed += 1;
        self.elapsed += file_elapsed;
    }

    /// `None` until at least one file has completed.
    pub fn remaining(&self) -> Option<Duration> {
        if self.completed == 0 {
            return None;
        }
        let remaining_files = self.total.saturating_sub(self.completed) as u32;
        let average = self.elapsed / self.completed as u32;
        Some(average * remaining_files)
    }

    pub fn total_elapsed(&self) -> Duration {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eta_after_first_of_five_files_is_four_times_its_duration() {
        let mut eta = BatchEta::new(5);
        eta.record(Duration::from_secs(7));
        assert_eq!(eta.remaining(), Some(Duration::from_secs(28)));
    }

    #[test]
    fn eta_projection_holds_for_any_batch_size_and_file_time() {
        for n in 2..10usize {
            for t in [1u64, 13, 90] {
                let mut eta = BatchEta::new(n);
                eta.record(Duration::from_secs(t));
                assert_eq!(
                    eta.remaining(),
                    Some(Duration::from_secs(t * (n as u64 - 1))),
                    "n={} t={}",
                    n,
                    t
                );
            }
        }
    }

    #[test]
    fn no_eta_before_the_first_file_completes() {
        assert_eq!(BatchEta::new(3).remaining(), None);
    }

    #[test]
    fn eta_uses_the_running_average() {
        let mut eta = BatchEta::new(4);
        eta.record(Duration::from_secs(10));
        eta.record(Duration::from_secs(20));
        // average 15s, two files left
        assert_eq!(eta.remaining(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn eta_reaches_zero_when_all_files_are_done() {
        let mut eta = BatchEta::new(2);
        eta.record(Duration::from_secs(5));
        eta.record(Duration::from_secs(5));
        assert_eq!(eta.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn percent_is_monotonic_and_bounded_before_completion() {
        let progress = FileProgress::start(Some(100.0));
        let mut last = 0;
        for secs in 0..200 {
            let p = progress.percent_at(Duration::from_secs(secs));
            assert!(p <= 99);
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn percent_reaches_exactly_one_hundred_on_finish() {
        let mut progress = FileProgress::start(Some(10.0));
        progress.finish();
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn unknown_duration_shows_zero_until_finished() {
        let mut progress = FileProgress::start(None);
        assert_eq!(progress.percent_at(Duration::from_secs(60)), 0);
        progress.finish();
        assert_eq!(progress.percent(), 100);
    }
}
