//! Terminal output formatting with colors.

use colored::Colorize;

use crate::results::{Estimate, Results, Summary};

/// Format a nanosecond quantity with an auto-scaled unit.
///
/// Picks the largest unit that keeps the value at or above 1, from
/// nanoseconds up through seconds.
pub fn format_time_ns(ns: f64) -> String {
    if !ns.is_finite() {
        return format!("{} ns", ns);
    }
    let (value, unit) = scale_ns(ns);
    format!("{:.2} {}", value, unit)
}

fn scale_ns(ns: f64) -> (f64, &'static str) {
    let abs = ns.abs();
    if abs >= 1e9 {
        (ns / 1e9, "s")
    } else if abs >= 1e6 {
        (ns / 1e6, "ms")
    } else if abs >= 1e3 {
        (ns / 1e3, "\u{00b5}s")
    } else {
        (ns, "ns")
    }
}

fn format_estimate_ns(estimate: &Estimate) -> String {
    match estimate.bounds {
        Some((lo, hi)) => format!(
            "{}  [{}, {}]",
            format_time_ns(estimate.center).bold(),
            format_time_ns(lo),
            format_time_ns(hi)
        ),
        None => format!("{}", format_time_ns(estimate.center).bold()),
    }
}

fn format_estimate_percent(estimate: &Estimate) -> String {
    match estimate.bounds {
        Some((lo, hi)) => format!("{:.2}%  [{:.2}%, {:.2}%]", estimate.center, lo, hi),
        None => format!("{:.2}%", estimate.center),
    }
}

/// Format a summary for human-readable terminal output.
pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();
    let sep = "\u{2500}".repeat(62);

    out.push_str("tachymeter\n");
    out.push_str(&sep);
    out.push('\n');

    out.push_str(&format!(
        "  Samples:       {} ({} evaluations)\n",
        summary.n, summary.n_evaluations
    ));
    out.push_str(&format!(
        "  Time/eval:     {}\n",
        format_estimate_ns(&summary.elapsed_ns)
    ));
    out.push_str(&format!(
        "  GC time:       {}\n",
        format_estimate_percent(&summary.gc_percent)
    ));
    out.push_str(&format!(
        "  Memory/eval:   {} bytes, {} allocations\n",
        summary.bytes_per_evaluation, summary.allocations_per_evaluation
    ));
    if let Some(r2) = summary.r_squared {
        let shown = format!("{:.4}", r2);
        let colored_r2 = if r2 >= 0.95 {
            shown.green()
        } else {
            shown.yellow()
        };
        out.push_str(&format!("  R\u{00b2}:            {}\n", colored_r2));
    }

    out
}

/// Format a raw result, flags and summary together.
///
/// Falls back to a diagnostic line when the result holds no samples.
pub fn format_results(results: &Results) -> String {
    let summary = match results.summary() {
        Ok(s) => s,
        Err(_) => return format!("tachymeter: no samples retained ({})\n", "empty".red()),
    };

    let mut out = format_summary(&summary);
    out.push_str(&format!(
        "  Strategy:      {}\n",
        if results.search_performed {
            "geometric search (OLS slope)"
        } else if results.multiple_samples {
            "direct sampling"
        } else {
            "single sample"
        }
    ));
    if !results.precompiled {
        out.push_str(&format!(
            "  {}\n",
            "warning: first sample retained; may include one-shot warmup cost".yellow()
        ));
    }
    out.push_str(&format!("  Wall time:     {:.3} s\n", results.time_used));
    out
}
