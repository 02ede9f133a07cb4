//! Command handlers: bridge parsed CLI args to the core pipeline and output formatting.

pub mod check;
pub mod config_cmd;
pub mod run;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A cancellation token that trips on Ctrl-C. Abort the handle once the
/// run is over so the listener does not outlive it.
pub(crate) fn cancel_on_interrupt() -> (CancellationToken, JoinHandle<()>) {
    let cancel = CancellationToken::new();
    let listener = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted; finishing with the results collected so far");
                cancel.cancel();
            }
        }
    });
    (cancel, listener)
}

/// Spinner on stderr counting finished probes; hidden when not wanted.
pub(crate) fn probe_spinner(visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.cyan} [{elapsed}] {pos} probed {msg}")
    {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));
    spinner
}
