use indicatif::ProgressStyle;
use medlink_core::reconciler::Progress;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"];

/// Progress bar driven by [`Progress`] reports from the apply worker.
pub struct ApplyProgress {
    span: Span,
}

impl ApplyProgress {
    pub fn start(interface: &str) -> Self {
        let span = info_span!("apply", interface, indicatif.pb_show = true);
        let style = ProgressStyle::with_template(
            "{spinner:.blue} [{bar:30.green/bright_black}] {pos:>3}% {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(TICKS)
        .progress_chars("█▓░");

        span.pb_set_style(&style);
        span.pb_set_length(100);
        span.pb_set_message("Checking current configuration...");
        span.pb_start();
        Self { span }
    }

    pub fn update(&self, step: Progress) {
        self.span.pb_set_position(u64::from(step.percent()));
        self.span.pb_set_message(step.message);
    }
}

/// Spinner shown while a read-only probe pass runs.
pub fn spinner(message: &'static str) -> Span {
    let span = info_span!("probe", indicatif.pb_show = true);
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS);

    span.pb_set_style(&style);
    span.pb_set_message(message);
    span.pb_start();
    span
}
