//! Signal extractor: drift-category log messages, minus self-emitted ones.

use chrono::{DateTime, Utc};

use crate::model::LogEntry;
use crate::time::parse_ts;

/// Recognized drift-category message prefixes.
pub const DRIFT_PREFIXES: [&str; 7] = [
    "Coredrift:",
    "Speedrift:",
    "Specdrift:",
    "Datadrift:",
    "Depsdrift:",
    "Uxdrift:",
    "Therapydrift:",
];

/// One extracted drift signal.
#[derive(Debug, Clone)]
pub struct DriftSignal {
    pub message: String,
    /// Parsed entry timestamp; `None` when absent or unparseable, in which
    /// case the signal is counted but excluded from freshness comparisons.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Result of scanning one task log.
#[derive(Debug, Clone, Default)]
pub struct SignalScan {
    pub signals: Vec<DriftSignal>,
    /// Messages dropped because they matched an ignore prefix. These are the
    /// lines this system emits itself; excluding them keeps the automation
    /// loop from counting its own output as fresh drift.
    pub ignored_self: usize,
    /// Signals strictly newer than `previous_latest`. When no previous
    /// timestamp exists, every current signal counts as new.
    pub new_count: usize,
    /// Latest parseable signal timestamp observed in this scan.
    pub latest_ts: Option<DateTime<Utc>>,
}

/// Scan a task's event log for drift signals.
pub fn scan_signals(
    log: &[LogEntry],
    ignore_prefixes: &[String],
    previous_latest: Option<DateTime<Utc>>,
) -> SignalScan {
    let mut scan = SignalScan::default();

    for entry in log {
        if !DRIFT_PREFIXES.iter().any(|p| entry.message.starts_with(p)) {
            continue;
        }
        if ignore_prefixes.iter().any(|p| entry.message.starts_with(p)) {
            scan.ignored_self += 1;
            continue;
        }
        let timestamp = entry.timestamp.as_deref().and_then(parse_ts);
        if let Some(ts) = timestamp {
            if scan.latest_ts.map_or(true, |latest| ts > latest) {
                scan.latest_ts = Some(ts);
            }
        }
        match (previous_latest, timestamp) {
            // No baseline: all current signals count as new.
            (None, _) => scan.new_count += 1,
            (Some(prev), Some(ts)) if ts > prev => scan.new_count += 1,
            _ => {}
        }
        scan.signals.push(DriftSignal {
            message: entry.message.clone(),
            timestamp,
        });
    }

    scan
}
