use crate::{FormField, SuggestionSubmission};

/// Parameters of a fill request, captured when the user triggers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillRequest {
    pub scene_id: String,
    pub file_id: Option<String>,
    pub announce_url: String,
    pub template: Option<String>,
    pub screens: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadTemplates,
    LookupScene { scene_id: String },
    StartFill(FillRequest),
    SetFields(Vec<(FormField, String)>),
    SaveTorrent { name: String, content: Vec<u8> },
    SubmitSuggestions(SuggestionSubmission),
    StartTorrent { torrent_path: String },
}
