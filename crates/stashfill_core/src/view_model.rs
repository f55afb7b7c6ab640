use crate::FillPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Error,
}

/// Single transient status message; each new one replaces the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub severity: Severity,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOption {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRowView {
    pub source: String,
    pub target: String,
    pub ignore: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub scene_id: String,
    pub title_display: String,
    pub files: Vec<FileOption>,
    pub selected_file: Option<String>,
    pub templates: Vec<TemplateOption>,
    pub selected_template: Option<String>,
    pub screens: bool,
    pub phase: FillPhase,
    /// False while a fill stream is outstanding.
    pub fill_enabled: bool,
    pub status: Option<StatusLine>,
    pub instructions: Vec<String>,
    pub suggestions: Vec<SuggestionRowView>,
    pub ignore_all: bool,
    pub suggestion_status: Option<StatusLine>,
    pub can_start_torrent: bool,
    pub dirty: bool,
}
