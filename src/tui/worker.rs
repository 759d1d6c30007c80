//! Background worker for the recommendation pipeline.
//!
//! Runs one assessment off the TUI main loop and reports progress over a
//! channel, so the interface stays responsive.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::RecommendationService;
use crate::domain::{PatientProfile, RecommendationReport};

/// Progress updates from the assessment worker.
#[derive(Debug, Clone)]
pub enum AssessmentProgress {
    /// Encoding the profile into feature rows
    Encoding,
    /// Running classifiers and ranking groups
    Classifying,
    /// Predicting pain reduction and weeks to effect
    Estimating,
    /// Pipeline complete
    Complete(RecommendationReport),
    /// Pipeline failed
    Error(String),
}

/// Handle to a running assessment worker.
pub struct AssessmentWorkerHandle {
    progress_rx: Receiver<AssessmentProgress>,
    _handle: JoinHandle<()>,
}

impl AssessmentWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<AssessmentProgress> {
        self.progress_rx.try_recv().ok()
    }
}

/// Worker that runs the recommendation pipeline in the background.
pub struct AssessmentWorker;

impl AssessmentWorker {
    /// Spawn a background assessment.
    pub fn spawn(
        service: Arc<RecommendationService>,
        profile: PatientProfile,
    ) -> AssessmentWorkerHandle {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run(&service, profile, &tx);
        });

        AssessmentWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run(
        service: &RecommendationService,
        profile: PatientProfile,
        tx: &Sender<AssessmentProgress>,
    ) {
        let _ = tx.send(AssessmentProgress::Encoding);
        // Small delay so the progress screen is visible at all.
        thread::sleep(std::time::Duration::from_millis(80));

        let _ = tx.send(AssessmentProgress::Classifying);

        match service.recommend(&profile) {
            Ok(report) => {
                if service.outcome_enabled() {
                    let _ = tx.send(AssessmentProgress::Estimating);
                    thread::sleep(std::time::Duration::from_millis(50));
                }
                let _ = tx.send(AssessmentProgress::Complete(report));
            }
            Err(e) => {
                tracing::error!("Assessment failed: {}", e);
                let _ = tx.send(AssessmentProgress::Error(e.to_string()));
            }
        }
    }
}
