//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::result::BenchReport;

/// Relative deviation below which a result is shown as stable.
const STABLE_SPREAD: f64 = 0.05;

/// Relative deviation above which a result is shown as noisy.
const NOISY_SPREAD: f64 = 0.20;

/// Format a BenchReport for human-readable terminal output.
pub fn format_result(report: &BenchReport) -> String {
    let result = &report.result;
    let meta = &report.metadata;
    let unit = result.unit.suffix();
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);

    output.push_str("microbench\n");
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    if result.is_empty() {
        output.push_str(&format!(
            "  {}\n\n",
            "\u{26A0} No batches were kept".yellow().bold()
        ));
        output.push_str(&format!(
            "    Rejected batches: {}\n",
            meta.rejected_batches
        ));
        output.push('\n');
        output.push_str(&sep);
        output.push('\n');
        output.push_str("Note: The measured function rejected every batch; no timing is reported.\n");
        return output;
    }

    output.push_str(&format!(
        "  Mean:      {:>12.6} {} \u{00B1} {:.6} {} ({})\n",
        result.mean,
        unit,
        result.deviation,
        unit,
        format_spread(result.deviation, result.mean)
    ));
    output.push_str(&format!("  Min:       {:>12.6} {}\n", result.min, unit));
    output.push_str(&format!("  Max:       {:>12.6} {}\n", result.max, unit));
    output.push('\n');

    output.push_str(&format!("  Batch size: {}\n", result.batch_size));
    output.push_str(&format!(
        "  Iterations: {} in {} batches",
        result.iters, meta.batch_count
    ));
    if meta.rejected_batches > 0 {
        output.push_str(&format!(" ({} rejected)", meta.rejected_batches));
    }
    output.push('\n');
    output.push('\n');

    output.push_str(&format!(
        "  Clock:      {} ns avg read gap (min {} ns, max {} ns)\n",
        meta.clock.average, meta.clock.min, meta.clock.max
    ));
    output.push_str(&format!("  Noise floor: {} ns\n", meta.noise_floor_ns));
    output.push_str(&format!("  Runtime:    {:.3} s\n", meta.runtime_secs));
    output.push('\n');

    output.push_str(&sep);
    output.push('\n');

    output
}

/// Color-coded coefficient of variation.
fn format_spread(deviation: f64, mean: f64) -> String {
    if mean <= 0.0 {
        return "n/a".dimmed().to_string();
    }
    let spread = deviation / mean;
    let label = format!("{:.1}%", spread * 100.0);
    if spread < STABLE_SPREAD {
        label.green().to_string()
    } else if spread < NOISY_SPREAD {
        label.yellow().to_string()
    } else {
        label.red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::ClockStats;
    use crate::result::{BenchResult, Metadata};
    use crate::statistics::TimeUnit;

    fn make_report(iters: u64, rejected: u64) -> BenchReport {
        BenchReport {
            result: BenchResult {
                mean: 1.25,
                deviation: 0.01,
                min: 1.2,
                max: 1.4,
                batch_size: 8,
                iters,
                unit: TimeUnit::Milliseconds,
            },
            metadata: Metadata {
                clock: ClockStats {
                    min: 20,
                    max: 90,
                    average: 25,
                },
                noise_floor_ns: 125,
                batch_count: iters / 8,
                rejected_batches: rejected,
                runtime_secs: 1.05,
            },
        }
    }

    #[test]
    fn test_format_result() {
        colored::control::set_override(false);
        let output = format_result(&make_report(800, 0));
        assert!(output.contains("microbench"));
        assert!(output.contains("1.250000 ms"));
        assert!(output.contains("Batch size: 8"));
        assert!(output.contains("800 in 100 batches"));
        assert!(output.contains("25 ns avg read gap"));
        assert!(!output.contains("rejected"));
    }

    #[test]
    fn test_format_rejections() {
        colored::control::set_override(false);
        let output = format_result(&make_report(800, 3));
        assert!(output.contains("(3 rejected)"));
    }

    #[test]
    fn test_format_empty_result() {
        colored::control::set_override(false);
        let output = format_result(&make_report(0, 12));
        assert!(output.contains("No batches were kept"));
        assert!(output.contains("Rejected batches: 12"));
    }

    #[test]
    fn test_spread_without_mean() {
        colored::control::set_override(false);
        assert_eq!(format_spread(0.0, 0.0), "n/a");
        assert_eq!(format_spread(0.1, 1.0), "10.0%");
    }
}
