use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::report::ReportSettings;
use crate::workflow::{AnalysisWorkflow, Status};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Active dataset and the two operations on it.
    pub workflow: AnalysisWorkflow,

    /// Message shown in the status label.
    pub status: Status,

    /// Receives the outcome of a report running on a worker thread.
    /// `Some` while a report is in progress; both buttons are disabled then.
    pending_report: Option<Receiver<Status>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ReportSettings::default())
    }
}

impl AppState {
    pub fn new(settings: ReportSettings) -> Self {
        Self {
            workflow: AnalysisWorkflow::new(settings),
            status: Status::Welcome,
            pending_report: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending_report.is_some()
    }

    /// Load a user-selected file.
    pub fn load(&mut self, path: &Path) {
        if self.is_busy() {
            return;
        }
        self.status = self.workflow.load(path);
    }

    /// Start a report on a worker thread.  Precondition failures are shown
    /// right away; `wake` is called once the worker has finished.
    pub fn start_report(&mut self, wake: impl FnOnce() + Send + 'static) {
        if self.is_busy() {
            return;
        }
        let job = match self.workflow.prepare_report() {
            Ok(job) => job,
            Err(status) => {
                self.status = status;
                return;
            }
        };

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            // The receiver only disappears when the app is shutting down.
            let _ = tx.send(job.run());
            wake();
        });
        self.pending_report = Some(rx);
        self.status = Status::Generating;
    }

    /// Pick up a finished report, if any.  Returns true when one arrived.
    pub fn poll_report(&mut self) -> bool {
        let Some(rx) = &self.pending_report else {
            return false;
        };
        match rx.try_recv() {
            Ok(status) => {
                self.status = status;
                self.pending_report = None;
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.status =
                    Status::ReportFailed("el proceso del informe terminó inesperadamente".into());
                self.pending_report = None;
                true
            }
        }
    }
}
