//! Declarative view model
//!
//! A [`ViewModel`] is a snapshot of everything a front end needs to draw the
//! workbench. It is rebuilt from state on demand and never written back.

use crate::notify::Notice;
use crate::render::{RenderedResult, ResultRenderer};
use lector_domain::{FailureKind, PresetId, Prompt, ReclaimState, SessionPhase, SessionState};
use serde::{Serialize, Serializer};

/// Snapshot of the workbench for display
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    /// Session phase
    #[serde(serialize_with = "serialize_phase")]
    pub phase: SessionPhase,
    /// Current image
    pub image: Option<ImageView>,
    /// Prompt composer
    pub prompt: PromptView,
    /// Whether submit would start a request
    pub can_submit: bool,
    /// Whether a request is in flight
    pub submitting: bool,
    /// Current (or retained) result
    pub result: Option<RenderedResult>,
    /// Current error
    pub error: Option<ErrorView>,
    /// Whether a reclaim request is in flight
    pub clearing_cache: bool,
    /// Live notices
    pub notices: Vec<Notice>,
}

/// The selected image
#[derive(Debug, Clone, Serialize)]
pub struct ImageView {
    /// Original file name
    pub file_name: String,
    /// MIME type
    pub mime_type: &'static str,
    /// Payload size
    pub size_bytes: usize,
    /// `data:` URI preview; omitted from serialized output
    #[serde(skip)]
    pub preview: String,
}

/// Prompt text and preset toggles
#[derive(Debug, Clone, Serialize)]
pub struct PromptView {
    /// Prompt text
    pub text: String,
    /// Active preset id
    pub active_preset: Option<&'static str>,
    /// One entry per preset, in display order
    pub presets: Vec<PresetView>,
}

/// One preset toggle
#[derive(Debug, Clone, Serialize)]
pub struct PresetView {
    /// Identifier
    pub id: &'static str,
    /// Display label
    pub label: &'static str,
    /// Whether this preset is active
    pub active: bool,
}

/// The error pane
#[derive(Debug, Clone, Serialize)]
pub struct ErrorView {
    /// User-facing message
    pub message: String,
    /// Failure category
    #[serde(serialize_with = "serialize_kind")]
    pub kind: FailureKind,
}

impl ViewModel {
    /// Build a snapshot from the owning components
    pub fn build(state: &SessionState, prompt: &Prompt, reclaim: ReclaimState, notices: Vec<Notice>) -> Self {
        let image = state.image().map(|asset| ImageView {
            file_name: asset.file_name().to_string(),
            mime_type: asset.mime_type(),
            size_bytes: asset.len(),
            preview: asset.preview().to_string(),
        });

        let presets = PresetId::ALL
            .iter()
            .map(|preset| PresetView {
                id: preset.as_str(),
                label: preset.label(),
                active: prompt.is_active(*preset),
            })
            .collect();

        Self {
            phase: state.phase(),
            image,
            prompt: PromptView {
                text: prompt.text().to_string(),
                active_preset: prompt.active_preset().map(|p| p.as_str()),
                presets,
            },
            can_submit: state.can_submit(),
            submitting: state.pending().is_some(),
            result: state.result_text().map(ResultRenderer::render),
            error: state.error().map(|(message, kind)| ErrorView {
                message: message.to_string(),
                kind,
            }),
            clearing_cache: reclaim.is_clearing(),
            notices,
        }
    }
}

fn serialize_phase<S: Serializer>(phase: &SessionPhase, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(phase.as_str())
}

fn serialize_kind<S: Serializer>(kind: &FailureKind, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(kind.as_str())
}
