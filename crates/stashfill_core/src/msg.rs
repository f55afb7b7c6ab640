use crate::{FillResult, SceneSummary, TemplateOption};

/// Torrent file shipped inline with the terminal frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentAttachment {
    pub name: String,
    pub content: Vec<u8>,
}

/// Content of one `success` frame from the fill stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameUpdate {
    pub message: Option<String>,
    pub fill: Option<FillResult>,
    /// Source tag to suggested tag, in backend order.
    pub suggestions: Vec<(String, String)>,
    pub attachment: Option<TorrentAttachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Host is ready; kicks off the template fetch.
    Started,
    /// Template list arrived (or failed) from the backend.
    TemplatesLoaded(Result<Vec<TemplateOption>, String>),
    /// User edited the scene id input.
    SceneIdChanged(String),
    /// Catalog lookup finished for `scene_id`.
    SceneLoaded {
        scene_id: String,
        result: Result<SceneSummary, String>,
    },
    FileSelected(String),
    TemplateSelected(String),
    ScreensToggled(bool),
    /// User clicked fill; `announce_url` is read from the host page.
    FillClicked { announce_url: String },
    /// A `success` frame was decoded.
    FrameReceived(FrameUpdate),
    /// An `error` frame was decoded; carries the backend message verbatim.
    BackendError(String),
    /// The frame sequence terminated. `Err` carries a failure notice.
    FillEnded(Result<(), String>),
    /// Torrent attachment written; carries the saved path.
    TorrentSaved(Result<String, String>),
    SuggestionEdited { source: String, target: String },
    SuggestionIgnoreToggled { source: String, ignore: bool },
    /// Master toggle: propagate the ignore flag to every pending row.
    IgnoreAllToggled(bool),
    /// Per-row submit. `final_tag` overrides the edited target when present.
    SuggestionDecided {
        source: String,
        ignore: bool,
        final_tag: Option<String>,
    },
    /// Bulk submit of every pending row.
    DecideAllClicked,
    /// Backend acknowledged (or rejected) a suggestion submission.
    SuggestionsSubmitted(Result<Option<String>, String>),
    /// User confirmed the upload; start seeding the torrent.
    StartTorrentClicked,
    TorrentStarted(Result<(), String>),
}
