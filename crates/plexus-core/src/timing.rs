//! Opt-in wall-clock timing of pipeline phases.
//!
//! Phases (`read`, `build`, `betweenness`, ...) are wrapped in [`timed`].
//! Nothing is recorded unless collection was switched on with
//! [`set_timing_enabled`]; the CLI does that for `--timing` or
//! `PLEXUS_TIMING=1`.

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde_json::json;

/// Timings for every phase recorded on this thread, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingReport {
    pub phases: Vec<PhaseTiming>,
}

/// Aggregate for one named phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTiming {
    pub name: String,
    pub count: usize,
    pub total: Duration,
    pub max: Duration,
}

thread_local! {
    static SAMPLES: RefCell<Vec<(String, Duration)>> = const { RefCell::new(Vec::new()) };
}

static TIMING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Returns true when `PLEXUS_TIMING` is `1`, `true`, `yes`, or `on`.
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("PLEXUS_TIMING")
        .ok()
        .is_some_and(|value| is_truthy(&value))
}

/// Enable or disable collection. Disabling drops recorded samples.
pub fn set_timing_enabled(enabled: bool) {
    TIMING_ENABLED.store(enabled, Ordering::Relaxed);
    if !enabled {
        clear_timings();
    }
}

#[must_use]
pub fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::Relaxed)
}

/// Drop every sample recorded on the current thread.
pub fn clear_timings() {
    SAMPLES.with(|samples| samples.borrow_mut().clear());
}

/// Run `f`, recording its duration under `name` when collection is on.
pub fn timed<R>(name: &str, f: impl FnOnce() -> R) -> R {
    if !is_timing_enabled() {
        return f();
    }

    let started = Instant::now();
    let result = f();
    let elapsed = started.elapsed();
    SAMPLES.with(|samples| samples.borrow_mut().push((name.to_string(), elapsed)));
    result
}

/// Drain this thread's samples into a report.
#[must_use]
pub fn collect_report() -> TimingReport {
    let samples = SAMPLES.with(|samples| std::mem::take(&mut *samples.borrow_mut()));

    let mut phases: Vec<PhaseTiming> = Vec::new();
    for (name, elapsed) in samples {
        if let Some(phase) = phases.iter_mut().find(|p| p.name == name) {
            phase.count += 1;
            phase.total += elapsed;
            phase.max = phase.max.max(elapsed);
        } else {
            phases.push(PhaseTiming {
                name,
                count: 1,
                total: elapsed,
                max: elapsed,
            });
        }
    }

    TimingReport { phases }
}

impl TimingReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Sum of all phase totals.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.phases.iter().map(|p| p.total).sum()
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let phases = self
            .phases
            .iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "count": p.count,
                    "total_us": p.total.as_micros(),
                    "max_us": p.max.as_micros(),
                })
            })
            .collect::<Vec<_>>();

        json!({ "phases": phases, "total_us": self.total().as_micros() })
    }

    /// Render as a small table for stderr.
    #[must_use]
    pub fn display_table(&self) -> String {
        if self.phases.is_empty() {
            return "No timing samples recorded.".to_string();
        }

        let mut out = String::new();
        out.push_str("phase              count      total        max\n");
        out.push_str("------------------------------------------------\n");
        for p in &self.phases {
            out.push_str(&format!(
                "{:<18} {:>5} {:>10} {:>10}\n",
                p.name,
                p.count,
                format_duration(p.total),
                format_duration(p.max)
            ));
        }
        out.push_str(&format!("{:<18} {:>5} {:>10}\n", "total", "", format_duration(self.total())));
        out
    }
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros >= 1_000_000 {
        format!("{}.{:03}s", micros / 1_000_000, (micros % 1_000_000) / 1_000)
    } else if micros >= 1_000 {
        format!("{}.{:03}ms", micros / 1_000, micros % 1_000)
    } else {
        format!("{micros}us")
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values() {
        for v in ["1", "true", "YES", " on "] {
            assert!(is_truthy(v), "{v}");
        }
        for v in ["0", "false", "", "maybe"] {
            assert!(!is_truthy(v), "{v}");
        }
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(Duration::from_micros(42)), "42us");
        assert_eq!(format_duration(Duration::from_micros(1_250)), "1.250ms");
        assert_eq!(format_duration(Duration::from_millis(2_005)), "2.005s");
    }

    #[test]
    fn timed_groups_by_phase_in_first_seen_order() {
        set_timing_enabled(true);
        clear_timings();

        let value = timed("build", || 7);
        timed("betweenness", || ());
        timed("build", || ());
        assert_eq!(value, 7);

        let report = collect_report();
        let names: Vec<&str> = report.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["build", "betweenness"]);
        assert_eq!(report.phases[0].count, 2);
        assert!(report.phases[0].max <= report.phases[0].total);

        let json = report.to_json();
        assert_eq!(json["phases"].as_array().map(Vec::len), Some(2));
        assert!(report.display_table().contains("betweenness"));

        assert!(collect_report().is_empty(), "collect drains samples");
        set_timing_enabled(false);
    }
}
