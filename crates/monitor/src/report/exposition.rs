use std::collections::BTreeMap;
use std::fmt::Write;

use crate::aggregator::OperationStats;
use crate::metrics::EngineMetricsSnapshot;

/// Maps an operation name onto the Prometheus metric-name alphabet.
pub fn sanitize_name(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => c,
            _ => '_',
        })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

pub fn render_prometheus(
    stats: &BTreeMap<String, OperationStats>,
    engine: &EngineMetricsSnapshot,
) -> String {
    let mut out = String::with_capacity(256 + stats.len() * 256);

    for (operation, s) in stats {
        let name = sanitize_name(operation);
        let sum_seconds = s.average_duration_ms * s.count as f64 / 1000.0;
        write_summary(&mut out, &format!("{name}_duration_seconds"), sum_seconds, s.count);
        write_gauge(&mut out, &format!("{name}_success_rate"), s.success_rate);
        write_gauge(&mut out, &format!("{name}_throughput"), s.throughput_per_sec);
    }

    write_counter(&mut out, "perfwatch_samples_recorded_total", engine.samples_recorded);
    write_counter(&mut out, "perfwatch_samples_evicted_total", engine.samples_evicted);
    write_counter(&mut out, "perfwatch_alerts_fired_total", engine.alerts_fired);
    write_counter(&mut out, "perfwatch_rules_rejected_total", engine.rules_rejected);
    write_counter(&mut out, "perfwatch_events_dropped_total", engine.events_dropped);
    write_counter(&mut out, "perfwatch_retention_sweeps_total", engine.sweeps);

    out
}

fn write_counter(out: &mut String, name: &str, val: u64) {
    let _ = writeln!(out, "# TYPE {name} counter");
    let _ = writeln!(out, "{name} {val}");
}

fn write_gauge(out: &mut String, name: &str, val: f64) {
    let _ = writeln!(out, "# TYPE {name} gauge");
    let _ = writeln!(out, "{name} {val}");
}

fn write_summary(out: &mut String, name: &str, sum: f64, count: usize) {
    let _ = writeln!(out, "# TYPE {name} summary");
    let _ = writeln!(out, "{name}_sum {sum}");
    let _ = writeln!(out, "{name}_count {count}");
}
