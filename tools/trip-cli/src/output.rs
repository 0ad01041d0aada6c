//! Output formatting for the CLI.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use trip_cart::{
    BatchOutcome, BatchReport, Navigator, Notification, NotificationLevel, Notifier, Route,
};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print one line per request of a batch.
    pub fn batch(&self, report: &BatchReport) {
        if self.json {
            self.json(&batch_json(report));
            return;
        }
        for entry in report.entries() {
            let badge = match &entry.outcome {
                BatchOutcome::Succeeded => style("ok".to_string()).green(),
                BatchOutcome::Reconciled => style("already gone".to_string()).dim(),
                BatchOutcome::Failed(e) => style(format!("failed: {e}")).red(),
            };
            self.list_item(&format!("{} {}", entry.target, badge));
        }
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

impl Notifier for Output {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => self.success(&notification.message),
            NotificationLevel::Error => self.error(&notification.message),
        }
    }
}

/// A terminal has no views to switch between; show where the UI would go.
impl Navigator for Output {
    fn navigate(&self, route: Route) {
        self.debug(&format!("navigate {}", route.path()));
        if route == Route::Login {
            self.info("Run `trip login` to sign in again");
        }
    }
}

fn batch_json(report: &BatchReport) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = report
        .entries()
        .iter()
        .map(|e| {
            let (status, error) = match &e.outcome {
                BatchOutcome::Succeeded => ("succeeded", None),
                BatchOutcome::Reconciled => ("reconciled", None),
                BatchOutcome::Failed(err) => ("failed", Some(err.to_string())),
            };
            serde_json::json!({ "target": e.target, "status": status, "error": error })
        })
        .collect();
    serde_json::json!({
        "total": report.total(),
        "failed": report.failed(),
        "entries": entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use trip_cart::CartError;

    #[test]
    fn test_batch_json() {
        let mut report = BatchReport::new();
        report.push("li-1", BatchOutcome::Succeeded);
        report.push("li-2", BatchOutcome::Failed(CartError::Server("boom".into())));

        let value = batch_json(&report);
        assert_eq!(value["total"], 2);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["entries"][1]["status"], "failed");
        assert_eq!(value["entries"][1]["error"], "Server error: boom");
    }
}
