//! Console presentation module
//!
//! Banner, styled messages, the input progress bar and the end-of-run summary.

use crate::policy::Rejection;
use crate::processor::FilterRun;
use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
         __                 # Flexible
       _/__\_               # Interactive
       (⌐■_■)  <- fipp      # Password
                            # Processor
"#;

    println!("{}", banner.green());
    println!("{}", "~".repeat(74).bright_black());
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    println!("  {} {}", "•".green(), text);
}

/// Create a bytes-based progress bar; the length is set once the input is open
pub fn create_bytes_progress_bar(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(0);

    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}",
    ) {
        pb.set_style(style.progress_chars("█▓░"));
    }

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Print the result of a run
pub fn print_summary(run: &FilterRun, elapsed: Duration, verbose: bool) {
    println!();
    print_success(&format!(
        "Original file had {} lines (passwords).",
        format_number(run.total_seen)
    ));
    print_success(&format!(
        "Filtered file has {} lines (passwords).",
        format_number(run.total_kept)
    ));

    if verbose {
        print_header("Rejections");
        for reason in Rejection::ALL {
            print_bullet(&format!(
                "{:<18} {}",
                format!("{}:", reason),
                format_number(run.rejected_by(reason))
            ));
        }
        println!();
        print_info(&format!("Data processed: {}", ByteSize(run.bytes_read)));
        print_info(&format!("Duration:       {}", format_duration(elapsed)));
    }

    print_success("Processing completed successfully.");
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30.0s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m");
    }
}
