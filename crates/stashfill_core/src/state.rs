use crate::view_model::AppViewModel;
use crate::{
    file_label, FileOption, FillResult, SceneSummary, StatusLine, SuggestionReconciler,
    TemplateOption,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillPhase {
    #[default]
    Idle,
    /// A fill stream is being consumed.
    Running,
    /// The terminal result has been applied.
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    scene_id: String,
    title_display: String,
    files: Vec<FileOption>,
    selected_file: Option<String>,
    templates: Vec<TemplateOption>,
    selected_template: Option<String>,
    screens: bool,
    phase: FillPhase,
    status: Option<StatusLine>,
    instructions: Vec<String>,
    result: Option<FillResult>,
    suggestions: SuggestionReconciler,
    suggestion_status: Option<StatusLine>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            scene_id: String::new(),
            title_display: String::new(),
            files: Vec::new(),
            selected_file: None,
            templates: Vec::new(),
            selected_template: None,
            screens: true,
            phase: FillPhase::Idle,
            status: None,
            instructions: Vec::new(),
            result: None,
            suggestions: SuggestionReconciler::default(),
            suggestion_status: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            scene_id: self.scene_id.clone(),
            title_display: self.title_display.clone(),
            files: self.files.clone(),
            selected_file: self.selected_file.clone(),
            templates: self.templates.clone(),
            selected_template: self.selected_template.clone(),
            screens: self.screens,
            phase: self.phase,
            fill_enabled: self.phase != FillPhase::Running,
            status: self.status.clone(),
            instructions: self.instructions.clone(),
            suggestions: self.suggestions.rows(),
            ignore_all: self.suggestions.ignore_all(),
            suggestion_status: self.suggestion_status.clone(),
            can_start_torrent: self.result.is_some(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn phase(&self) -> FillPhase {
        self.phase
    }

    pub fn scene_id(&self) -> &str {
        &self.scene_id
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.selected_file.as_deref()
    }

    pub fn selected_template(&self) -> Option<&str> {
        self.selected_template.as_deref()
    }

    pub fn screens(&self) -> bool {
        self.screens
    }

    pub fn result(&self) -> Option<&FillResult> {
        self.result.as_ref()
    }

    pub(crate) fn suggestions_mut(&mut self) -> &mut SuggestionReconciler {
        &mut self.suggestions
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_templates(&mut self, templates: Vec<TemplateOption>) {
        self.selected_template = templates.first().map(|option| option.key.clone());
        self.templates = templates;
        self.mark_dirty();
    }

    pub(crate) fn select_template(&mut self, key: &str) -> bool {
        if !self.templates.iter().any(|option| option.key == key) {
            return false;
        }
        self.selected_template = Some(key.to_string());
        self.mark_dirty();
        true
    }

    pub(crate) fn set_scene_id(&mut self, scene_id: String) {
        self.scene_id = scene_id;
        self.status = None;
        self.instructions.clear();
        self.mark_dirty();
    }

    pub(crate) fn apply_scene(&mut self, scene: &SceneSummary) {
        self.title_display = scene.display_title();
        self.files = scene
            .files
            .iter()
            .map(|file| FileOption {
                id: file.id.clone(),
                label: file_label(file),
            })
            .collect();
        self.selected_file = self.files.first().map(|file| file.id.clone());
        self.mark_dirty();
    }

    pub(crate) fn clear_scene(&mut self) {
        self.title_display.clear();
        self.files.clear();
        self.selected_file = None;
        self.mark_dirty();
    }

    pub(crate) fn select_file(&mut self, file_id: &str) -> bool {
        if !self.files.iter().any(|file| file.id == file_id) {
            return false;
        }
        self.selected_file = Some(file_id.to_string());
        self.mark_dirty();
        true
    }

    pub(crate) fn set_screens(&mut self, screens: bool) {
        self.screens = screens;
        self.mark_dirty();
    }

    /// Clears everything the previous fill produced and enters `Running`.
    pub(crate) fn begin_fill(&mut self) {
        self.phase = FillPhase::Running;
        self.status = None;
        self.instructions.clear();
        self.result = None;
        self.suggestions = SuggestionReconciler::default();
        self.suggestion_status = None;
        self.mark_dirty();
    }

    pub(crate) fn set_status(&mut self, status: StatusLine) {
        self.status = Some(status);
        self.mark_dirty();
    }

    pub(crate) fn complete_fill(&mut self, result: FillResult, suggestions: Vec<(String, String)>) {
        self.phase = FillPhase::Completed;
        self.instructions = result.instructions();
        self.result = Some(result);
        self.suggestions = SuggestionReconciler::new(suggestions);
        self.mark_dirty();
    }

    pub(crate) fn fail_fill(&mut self, status: StatusLine) {
        self.phase = FillPhase::Failed;
        self.set_status(status);
    }

    pub(crate) fn set_suggestion_status(&mut self, status: StatusLine) {
        self.suggestion_status = Some(status);
        self.mark_dirty();
    }
}
