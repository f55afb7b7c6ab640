//! Stashfill core: pure state machine, suggestion reconciler and view-model helpers.
mod duration;
mod effect;
mod form;
mod msg;
mod reconciler;
mod scene;
mod state;
mod update;
mod view_model;

pub use duration::format_duration;
pub use effect::{Effect, FillRequest};
pub use form::{FillResult, FormField, FormHost};
pub use msg::{FrameUpdate, Msg, TorrentAttachment};
pub use reconciler::{
    Decision, ReconcileError, SuggestionEntry, SuggestionReconciler, SuggestionSubmission,
};
pub use scene::{catalog_scene_url, file_label, SceneFile, SceneSummary};
pub use state::{AppState, FillPhase};
pub use update::update;
pub use view_model::{
    AppViewModel, FileOption, Severity, StatusLine, SuggestionRowView, TemplateOption,
};
