//! Wall-clock and resident-memory measurement around a search.

use std::fmt;
use std::time::Instant;

/// Diagnostic numbers for one solved search.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub step_count: usize,
    pub total_push_weight: u64,
    pub nodes_expanded: u64,
    pub elapsed_ms: f64,
    /// Never negative.
    pub memory_delta_mb: f64,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Steps: {}, Weight: {}, Node: {}, Time (ms): {:.2}, Memory (MB): {:.2}",
            self.step_count,
            self.total_push_weight,
            self.nodes_expanded,
            self.elapsed_ms,
            self.memory_delta_mb
        )
    }
}

/// Started before a search, read once it ends.
#[derive(Debug)]
pub struct Stopwatch {
    started: Instant,
    start_rss_mb: f64,
}

impl Stopwatch {
    pub fn start() -> Self {
        Stopwatch {
            start_rss_mb: resident_mb(),
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Growth of the resident set since [`Stopwatch::start`], clamped at zero.
    pub fn memory_delta_mb(&self) -> f64 {
        (resident_mb() - self.start_rss_mb).max(0.0)
    }
}

/// Resident set size of this process in MiB, or 0 where it is unavailable.
#[cfg(target_os = "linux")]
pub fn resident_mb() -> f64 {
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|status| parse_vm_rss_kb(&status))
        .map(|kb| kb as f64 / 1024.0)
        .unwrap_or(0.0)
}

#[cfg(not(target_os = "linux"))]
pub fn resident_mb() -> f64 {
    0.0
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_vm_rss_kb(status: &str) -> Option<u64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmRSS:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vm_rss_line() {
        let status = "Name:\tsolver\nVmPeak:\t  9000 kB\nVmRSS:\t    2048 kB\nThreads:\t1\n";
        assert_eq!(parse_vm_rss_kb(status), Some(2048));
        assert_eq!(parse_vm_rss_kb("Name:\tsolver\n"), None);
    }

    #[test]
    fn stopwatch_never_reports_negative_memory() {
        let watch = Stopwatch::start();
        assert!(watch.memory_delta_mb() >= 0.0);
        assert!(watch.elapsed_ms() >= 0.0);
    }

    #[test]
    fn report_line_format() {
        let report = Report {
            step_count: 2,
            total_push_weight: 10,
            nodes_expanded: 7,
            elapsed_ms: 1.234,
            memory_delta_mb: 0.0,
        };
        assert_eq!(
            report.to_string(),
            "Steps: 2, Weight: 10, Node: 7, Time (ms): 1.23, Memory (MB): 0.00"
        );
    }
}
