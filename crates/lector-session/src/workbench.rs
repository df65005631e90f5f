//! The workbench: single owner of all session state
//!
//! Backend calls run as spawned tasks. Each task reports its outcome over an
//! unbounded channel, and the owner applies those outcomes one at a time in
//! arrival order through [`Workbench::next_event`] or
//! [`Workbench::apply_ready`]. No task ever touches state directly, so a
//! response that has gone stale can only be dropped, never applied.

use crate::config::SessionConfig;
use crate::controller::{Completion, ExtractionController, ExtractionOutcome};
use crate::error::SessionError;
use crate::export::{prompt_echo, EXPORT_DONE_NOTICE, EXPORT_REJECTED_NOTICE};
use crate::intake::{FileIntake, VALIDATION_NOTICE};
use crate::notify::{Notice, NoticeKind, NotificationQueue};
use crate::reclaim::ReclaimController;
use crate::render::ResultRenderer;
use crate::view::ViewModel;
use lector_domain::{
    Clipboard, DownloadSink, ImageAsset, PresetId, Prompt, RequestSeq, SessionPhase, SessionState,
};
use lector_sdk::{ClearCacheReply, ExtractionBackend, SdkError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Extraction succeeded
pub const EXTRACTED_NOTICE: &str = "Text extracted successfully";

/// Extraction failed for any reason other than accelerator memory
pub const EXTRACT_FAILED_NOTICE: &str = "Failed to extract text";

/// Backend ran out of accelerator memory
pub const OOM_NOTICE: &str =
    "GPU Out of Memory error. Try clicking \"Clear Memory\" button and try again with a smaller image.";

/// Copy succeeded
pub const COPIED_NOTICE: &str = "Copied to clipboard";

/// Clipboard refused the write
pub const COPY_FAILED_NOTICE: &str = "Failed to copy text";

/// Copy requested without a successful result
pub const NOTHING_TO_COPY_NOTICE: &str = "No extracted text to copy";

const OOM_MARKER: &str = "CUDA out of memory";
const OOM_NOTICE_DURATION: Duration = Duration::from_millis(6000);
const PROMPT_ECHO_DURATION: Duration = Duration::from_millis(5000);

/// A backend call that never returned (panicked or was cancelled)
fn task_failure(e: tokio::task::JoinError) -> SdkError {
    SdkError::ConnectionError(format!("Background task failed: {}", e))
}

/// Message from a background task to the owner
#[derive(Debug)]
enum TaskReport {
    Extraction {
        seq: RequestSeq,
        outcome: ExtractionOutcome,
    },
    Reclaim(Result<ClearCacheReply, SdkError>),
}

/// What applying one background report did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbenchEvent {
    /// An extraction response arrived
    Extraction {
        /// Originating request
        seq: RequestSeq,
        /// Whether it was applied or dropped as stale
        completion: Completion,
    },
    /// A reclaim request finished
    CacheCleared {
        /// Notice severity
        kind: NoticeKind,
        /// Notice text
        message: String,
    },
}

/// Owns the image, prompt, session state, reclaim flag and notices
pub struct Workbench<B: ExtractionBackend + 'static> {
    backend: Arc<B>,
    config: SessionConfig,
    intake: FileIntake,
    prompt: Prompt,
    controller: ExtractionController,
    reclaim: ReclaimController,
    notices: NotificationQueue,
    reports_tx: mpsc::UnboundedSender<TaskReport>,
    reports_rx: mpsc::UnboundedReceiver<TaskReport>,
    outstanding: usize,
}

impl<B: ExtractionBackend + 'static> Workbench<B> {
    /// Create a workbench bound to `backend`
    pub fn new(backend: Arc<B>, config: SessionConfig) -> Self {
        let (reports_tx, reports_rx) = mpsc::unbounded_channel();
        let notices = NotificationQueue::new(config.notice_duration());
        Self {
            backend,
            config,
            intake: FileIntake::new(),
            prompt: Prompt::new(),
            controller: ExtractionController::new(),
            reclaim: ReclaimController::new(),
            notices,
            reports_tx,
            reports_rx,
            outstanding: 0,
        }
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Session state
    pub fn state(&self) -> &SessionState {
        self.controller.state()
    }

    /// Session phase
    pub fn phase(&self) -> SessionPhase {
        self.controller.phase()
    }

    /// Prompt composer
    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    /// Current image
    pub fn image(&self) -> Option<&Arc<ImageAsset>> {
        self.intake.current()
    }

    /// Most recently submitted request
    pub fn latest_submitted(&self) -> Option<RequestSeq> {
        self.controller.latest_submitted()
    }

    /// Background tasks whose reports have not been applied yet
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Whether a reclaim request is in flight
    pub fn is_clearing(&self) -> bool {
        self.reclaim.is_clearing()
    }

    /// Load an image from disk and make it current
    ///
    /// On validation failure nothing changes except an error notice.
    pub async fn select_file(&mut self, path: &Path) -> Result<Arc<ImageAsset>, SessionError> {
        match FileIntake::read(path).await {
            Ok(asset) => Ok(self.install(asset)),
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Make an in-memory image current
    pub fn select_bytes(
        &mut self,
        file_name: &str,
        declared_mime: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Arc<ImageAsset>, SessionError> {
        match FileIntake::build(file_name, declared_mime, bytes) {
            Ok(asset) => Ok(self.install(asset)),
            Err(e) => Err(self.reject(e)),
        }
    }

    fn install(&mut self, asset: ImageAsset) -> Arc<ImageAsset> {
        let asset = self.intake.install(asset);
        self.controller.select_image(Arc::clone(&asset));
        info!("Selected {} ({} bytes)", asset.file_name(), asset.len());
        asset
    }

    fn reject(&mut self, error: SessionError) -> SessionError {
        match &error {
            SessionError::Validation(detail) => {
                debug!("Rejected selection: {}", detail);
                self.notices.error(VALIDATION_NOTICE);
            }
            other => {
                warn!("Failed to load image: {}", other);
                self.notices.error(other.to_string());
            }
        }
        error
    }

    /// Drop the image together with any result and error
    pub fn remove_image(&mut self) {
        if let Some(removed) = self.intake.remove() {
            info!("Removed {}", removed.file_name());
        }
        self.controller.remove_image();
    }

    /// Replace the prompt with a preset's canonical text
    pub fn select_preset(&mut self, preset: PresetId) {
        self.prompt.select_preset(preset);
    }

    /// Set free prompt text
    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.prompt.set_text(text);
    }

    /// Submit the current image and prompt
    ///
    /// Returns the new request's sequence number, or `None` when there is no
    /// image or a request is already in flight.
    pub fn submit(&mut self) -> Option<RequestSeq> {
        let request = self.controller.submit(self.prompt.outbound())?;
        let seq = request.seq;

        let backend = Arc::clone(&self.backend);
        let reports = self.reports_tx.clone();
        let limit = self.config.request_timeout();

        let call = tokio::spawn(async move {
            let call = backend.extract(&request);
            match limit {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(result) => ExtractionOutcome::from_call(result),
                    Err(_) => ExtractionOutcome::TimedOut,
                },
                None => ExtractionOutcome::from_call(call.await),
            }
        });

        // Every request reports exactly once, even if the call panics
        tokio::spawn(async move {
            let outcome = call.await.unwrap_or_else(|e| {
                warn!("Extraction task for request {} failed: {}", seq, e);
                ExtractionOutcome::Transport(task_failure(e))
            });
            if reports.send(TaskReport::Extraction { seq, outcome }).is_err() {
                debug!("Workbench gone before request {} finished", seq);
            }
        });

        self.outstanding += 1;
        Some(seq)
    }

    /// Ask the backend to release accelerator memory
    ///
    /// Returns `false` (no request issued) while a previous one is in flight.
    pub fn clear_cache(&mut self) -> bool {
        if !self.reclaim.begin() {
            return false;
        }

        let backend = Arc::clone(&self.backend);
        let reports = self.reports_tx.clone();
        let call = tokio::spawn(async move { backend.clear_cache().await });
        tokio::spawn(async move {
            let result = call.await.unwrap_or_else(|e| {
                warn!("Clear cache task failed: {}", e);
                Err(task_failure(e))
            });
            if reports.send(TaskReport::Reclaim(result)).is_err() {
                debug!("Workbench gone before clear_cache finished");
            }
        });

        self.outstanding += 1;
        true
    }

    /// Wait for the next background report and apply it
    ///
    /// Returns `None` immediately when nothing is outstanding.
    pub async fn next_event(&mut self) -> Option<WorkbenchEvent> {
        if self.outstanding == 0 {
            return None;
        }
        let report = self.reports_rx.recv().await?;
        Some(self.apply(report))
    }

    /// Apply every report that has already arrived, without waiting
    pub fn apply_ready(&mut self) -> Vec<WorkbenchEvent> {
        let mut applied = Vec::new();
        while let Ok(report) = self.reports_rx.try_recv() {
            applied.push(self.apply(report));
        }
        applied
    }

    /// Wait until every outstanding task has reported
    pub async fn settle(&mut self) -> Vec<WorkbenchEvent> {
        let mut applied = Vec::new();
        while let Some(event) = self.next_event().await {
            applied.push(event);
        }
        applied
    }

    fn apply(&mut self, report: TaskReport) -> WorkbenchEvent {
        self.outstanding = self.outstanding.saturating_sub(1);
        match report {
            TaskReport::Extraction { seq, outcome } => {
                let completion = self.controller.complete(seq, outcome);
                match completion {
                    Completion::Applied(SessionPhase::Succeeded) => {
                        self.notices.success(EXTRACTED_NOTICE);
                    }
                    Completion::Applied(SessionPhase::Failed) => {
                        let oom = self
                            .controller
                            .state()
                            .error()
                            .is_some_and(|(message, _)| message.contains(OOM_MARKER));
                        if oom {
                            self.notices.push_for(OOM_NOTICE, NoticeKind::Error, OOM_NOTICE_DURATION);
                        } else {
                            self.notices.error(EXTRACT_FAILED_NOTICE);
                        }
                    }
                    Completion::Applied(_) | Completion::Stale => {}
                }
                WorkbenchEvent::Extraction { seq, completion }
            }
            TaskReport::Reclaim(result) => {
                let (kind, message) = self.reclaim.finish(result);
                self.notices.push(message.clone(), kind);
                WorkbenchEvent::CacheCleared { kind, message }
            }
        }
    }

    /// Copy the current result to `clipboard` as plain text
    ///
    /// Returns whether anything was copied. The outcome is always reported
    /// through a notice.
    pub fn copy_to_clipboard<C: Clipboard>(&mut self, clipboard: &mut C) -> bool {
        let Some(text) = self.controller.state().result_text() else {
            self.notices.info(NOTHING_TO_COPY_NOTICE);
            return false;
        };

        let rendered = ResultRenderer::render(text);
        match clipboard.set_text(rendered.plain_text()) {
            Ok(()) => {
                self.notices.success(COPIED_NOTICE);
                true
            }
            Err(e) => {
                warn!("Clipboard write failed: {}", e);
                self.notices.error(COPY_FAILED_NOTICE);
                false
            }
        }
    }

    /// Fetch the server-held raw result and save it through `sink`
    ///
    /// Never fails: every outcome becomes a notice. Returns where the file
    /// landed on success.
    pub async fn export<S: DownloadSink>(&mut self, sink: &S) -> Option<PathBuf> {
        let document = match self.backend.fetch_export().await {
            Ok(document) => document,
            Err(SdkError::Http { status, message }) => {
                warn!("Export rejected with status {}: {:?}", status, message);
                self.notices.error(EXPORT_REJECTED_NOTICE);
                return None;
            }
            Err(e) => {
                warn!("Export fetch failed: {}", e);
                self.notices.error(format!("Error downloading JSON: {}", e));
                return None;
            }
        };

        if let Some(prompt) = document.prompt_used() {
            self.notices
                .push_for(prompt_echo(prompt), NoticeKind::Info, PROMPT_ECHO_DURATION);
        }

        let contents = match document.to_pretty_json() {
            Ok(contents) => contents,
            Err(e) => {
                self.notices.error(format!("Error downloading JSON: {}", e));
                return None;
            }
        };

        match sink.save(&self.config.export_file_name, &contents) {
            Ok(path) => {
                info!("Exported to {:?}", path);
                self.notices.success(EXPORT_DONE_NOTICE);
                Some(path)
            }
            Err(e) => {
                warn!("Saving export failed: {}", e);
                self.notices.error(format!(
                    "Failed to save {}: {}",
                    self.config.export_file_name, e
                ));
                None
            }
        }
    }

    /// Snapshot for display, with notices live right now
    pub fn view(&self) -> ViewModel {
        let live = self
            .notices
            .active(Instant::now())
            .into_iter()
            .cloned()
            .collect();
        ViewModel::build(self.controller.state(), &self.prompt, self.reclaim.state(), live)
    }

    /// Remove and return all queued notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Notice queue
    pub fn notices(&self) -> &NotificationQueue {
        &self.notices
    }
}

impl<B: ExtractionBackend + 'static> std::fmt::Debug for Workbench<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbench")
            .field("phase", &self.controller.phase())
            .field("prompt", &self.prompt)
            .field("clearing", &self.reclaim.is_clearing())
            .field("outstanding", &self.outstanding)
            .finish()
    }
}
