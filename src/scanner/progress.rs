//! Progress notifications emitted by the dispatcher

use indicatif::{ProgressBar, ProgressStyle};

/// Receives one notification per processed target
pub trait ScanProgress: Send + Sync {
    fn target_completed(&self, target: &str);
}

impl ScanProgress for ProgressBar {
    fn target_completed(&self, _target: &str) {
        self.inc(1);
    }
}

/// Progress bar styled for target scanning
pub fn target_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}
