// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for section generation
// reference: uses indicatif for progress bars and tracks drafting metrics

use crate::models::GeneratedSection;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub sections_generated: usize,
    pub sections_failed: usize,
    pub total_chars: usize,
    pub duration: Duration,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sections(sections: &[GeneratedSection], duration: Duration) -> Self {
        let failed = sections.iter().filter(|s| s.is_error()).count();

        Self {
            sections_generated: sections.len() - failed,
            sections_failed: failed,
            total_chars: sections
                .iter()
                .filter(|s| !s.is_error())
                .map(|s| s.content.chars().count())
                .sum(),
            duration,
        }
    }

    pub fn sections_per_minute(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        (self.sections_generated + self.sections_failed) as f64 * 60.0 / secs
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.sections_generated + self.sections_failed;
        if total == 0 {
            return 0.0;
        }
        (self.sections_generated as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    sections_generated: AtomicUsize,
    sections_failed: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_sections: usize, colored: bool) -> Self {
        Self::build(MultiProgress::new(), total_sections, colored)
    }

    pub fn hidden(total_sections: usize) -> Self {
        let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        Self::build(multi_progress, total_sections, false)
    }

    fn build(multi_progress: MultiProgress, total_sections: usize, colored: bool) -> Self {
        let main_bar = create_progress_bar(&multi_progress, total_sections as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            sections_generated: AtomicUsize::new(0),
            sections_failed: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record(&self, section: &GeneratedSection) {
        if section.is_error() {
            self.sections_failed.fetch_add(1, Ordering::SeqCst);
        } else {
            self.sections_generated.fetch_add(1, Ordering::SeqCst);
        }
        self.main_bar.inc(1);
        self.main_bar.set_message(format!("Finished: {}", section.title));
        self.update_detail_bar();
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message(format!(
            "Drafting complete in {:.1}s",
            self.start_time.elapsed().as_secs_f64()
        ));
        self.detail_bar.finish_and_clear();
    }

    pub fn completed(&self) -> usize {
        self.sections_generated.load(Ordering::SeqCst) + self.sections_failed.load(Ordering::SeqCst)
    }

    fn update_detail_bar(&self) {
        let generated = self.sections_generated.load(Ordering::SeqCst);
        let failed = self.sections_failed.load(Ordering::SeqCst);

        self.detail_bar
            .set_message(format!("Drafted: {} | Failed: {}", generated, failed));
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    if colored {
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sections {msg}",
                )
                .expect("Failed to create progress bar template")
                .progress_chars("█▓▒░"),
        );
    } else {
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} sections {msg}")
                .expect("Failed to create progress bar template")
                .progress_chars("=>-"),
        );
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .expect("Failed to create detail bar template");
    bar.set_style(style);
    bar
}
