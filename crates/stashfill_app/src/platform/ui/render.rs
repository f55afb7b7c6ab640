use stashfill_core::{AppViewModel, FillPhase, FormField, Severity, StatusLine};

/// Renders the view model and the form contents as terminal lines.
pub fn render<'a>(
    view: &AppViewModel,
    form_fields: impl IntoIterator<Item = (FormField, &'a str)>,
) -> Vec<String> {
    let mut lines = Vec::new();

    let scene = if view.scene_id.trim().is_empty() {
        "-".to_string()
    } else {
        view.scene_id.trim().to_string()
    };
    lines.push(format!(
        "Scene: {} {} [{}]",
        scene,
        view.title_display,
        phase_label(view.phase)
    ));

    for file in &view.files {
        let marker = selection_marker(view.selected_file.as_deref() == Some(file.id.as_str()));
        lines.push(format!("  {marker} file {}: {}", file.id, file.label));
    }

    if !view.templates.is_empty() {
        let templates = view
            .templates
            .iter()
            .map(|template| {
                let selected = view.selected_template.as_deref() == Some(template.key.as_str());
                format!("{}{} ({})", selection_marker(selected), template.key, template.label)
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(format!("Templates: {templates}"));
    }
    lines.push(format!(
        "Screens: {} | Fill: {}",
        if view.screens { "on" } else { "off" },
        if view.fill_enabled { "ready" } else { "busy" }
    ));

    if let Some(status) = &view.status {
        lines.push(format_status("Status", status));
    }

    let fields: Vec<_> = form_fields.into_iter().collect();
    if !fields.is_empty() {
        lines.push("Form:".to_string());
        for (field, value) in fields {
            lines.push(format!("  {field}: {}", first_line(value)));
        }
    }

    for (index, instruction) in view.instructions.iter().enumerate() {
        lines.push(format!("{}. {}", index + 1, instruction));
    }

    if !view.suggestions.is_empty() {
        lines.push(format!(
            "Tag suggestions (ignore all: {}):",
            if view.ignore_all { "on" } else { "off" }
        ));
        for row in &view.suggestions {
            let action = if row.ignore { "ignore" } else { "accept" };
            lines.push(format!("  {} -> {} [{}]", row.source, row.target, action));
        }
    }
    if let Some(status) = &view.suggestion_status {
        lines.push(format_status("Tags", status));
    }
    if view.can_start_torrent {
        lines.push("Type `start` once the upload is done to begin seeding.".to_string());
    }

    lines
}

fn phase_label(phase: FillPhase) -> &'static str {
    match phase {
        FillPhase::Idle => "idle",
        FillPhase::Running => "filling",
        FillPhase::Completed => "filled",
        FillPhase::Failed => "failed",
    }
}

fn selection_marker(selected: bool) -> &'static str {
    if selected {
        "*"
    } else {
        " "
    }
}

fn format_status(label: &str, status: &StatusLine) -> String {
    match status.severity {
        Severity::Info => format!("{label}: {}", status.text),
        Severity::Error => format!("{label}: error: {}", status.text),
    }
}

// Descriptions are long BBCode blocks; only the first line is shown.
fn first_line(value: &str) -> String {
    let mut lines = value.lines();
    let first = lines.next().unwrap_or_default();
    if lines.next().is_some() {
        format!("{first} …")
    } else {
        first.to_string()
    }
}

#[cfg(test)]
mod tests {
    use stashfill_core::{FileOption, SuggestionRowView, TemplateOption};

    use super::*;

    fn view() -> AppViewModel {
        AppViewModel {
            scene_id: "42".into(),
            title_display: "Scene Title".into(),
            files: vec![
                FileOption {
                    id: "1".into(),
                    label: "1920×1080, mp4, h264/aac, 2:05".into(),
                },
                FileOption {
                    id: "2".into(),
                    label: "1280×720, mp4, h264/aac, 2:05".into(),
                },
            ],
            selected_file: Some("2".into()),
            templates: vec![TemplateOption {
                key: "fs".into(),
                label: "Default".into(),
            }],
            selected_template: Some("fs".into()),
            screens: true,
            fill_enabled: true,
            ..AppViewModel::default()
        }
    }

    #[test]
    fn marks_selected_file_and_template() {
        let lines = render(&view(), Vec::<(FormField, &str)>::new());
        assert_eq!(lines[0], "Scene: 42 Scene Title [idle]");
        assert_eq!(lines[1], "    file 1: 1920×1080, mp4, h264/aac, 2:05");
        assert_eq!(lines[2], "  * file 2: 1280×720, mp4, h264/aac, 2:05");
        assert_eq!(lines[3], "Templates: *fs (Default)");
        assert_eq!(lines[4], "Screens: on | Fill: ready");
    }

    #[test]
    fn shows_errors_suggestions_and_form() {
        let mut view = view();
        view.phase = FillPhase::Completed;
        view.status = Some(StatusLine::error("Scene has no files"));
        view.suggestions = vec![SuggestionRowView {
            source: "bj".into(),
            target: "Blowjob".into(),
            ignore: true,
        }];
        view.suggestion_status = Some(StatusLine::info("Tags saved"));
        view.can_start_torrent = true;

        let lines = render(&view, [(FormField::Description, "[b]x[/b]\nmore")]);
        assert!(lines.contains(&"Status: error: Scene has no files".to_string()));
        assert!(lines.contains(&"  description: [b]x[/b] …".to_string()));
        assert!(lines.contains(&"  bj -> Blowjob [ignore]".to_string()));
        assert!(lines.contains(&"Tags: Tags saved".to_string()));
        assert!(lines.last().unwrap().starts_with("Type `start`"));
    }
}
