use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use qcbatch::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 100;

/// Draws workflow progress on stderr.
///
/// Each phase or batch gets a fresh indicatif bar that is cleared when it
/// ends, so the command's own summary is the last thing on screen. The
/// `label` names the batch, e.g. `"Submitting"`.
#[derive(Clone)]
pub struct CliProgressHandler {
    label: &'static str,
    current: Arc<Mutex<Option<ProgressBar>>>,
}

impl CliProgressHandler {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            current: Arc::new(Mutex::new(None)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let handler = self.clone();
        Box::new(move |progress: Progress| handler.handle(progress))
    }

    fn handle(&self, progress: Progress) {
        let Ok(mut current) = self.current.lock() else {
            warn!("Progress bar mutex was poisoned. Cannot update progress.");
            return;
        };

        match progress {
            Progress::PhaseStart { name } => {
                let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
                    .with_style(spinner_style())
                    .with_message(name);
                spinner.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                replace(&mut current, Some(spinner));
            }
            Progress::BatchStart { total } => {
                let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr())
                    .with_style(bar_style())
                    .with_prefix(self.label);
                replace(&mut current, Some(bar));
            }
            Progress::ItemDone { name } => {
                if let Some(bar) = current.as_ref() {
                    bar.set_message(name);
                    bar.inc(1);
                }
            }
            Progress::PhaseFinish | Progress::BatchFinish => replace(&mut current, None),
            Progress::Message(msg) => match current.as_ref() {
                Some(bar) => bar.println(format!("  {msg}")),
                None => eprintln!("  {msg}"),
            },
        }
    }

    #[cfg(test)]
    fn current(&self) -> Option<ProgressBar> {
        self.current.lock().unwrap().clone()
    }
}

fn replace(slot: &mut Option<ProgressBar>, next: Option<ProgressBar>) {
    if let Some(old) = slot.take() {
        old.finish_and_clear();
    }
    *slot = next;
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .expect("Failed to create spinner style template")
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:>12.bold} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .expect("Failed to create bar style template")
        .progress_chars("=> ")
}
