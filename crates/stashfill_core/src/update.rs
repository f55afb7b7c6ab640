use crate::{
    AppState, Effect, FillPhase, FillRequest, FormField, FrameUpdate, Msg, StatusLine,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => vec![Effect::LoadTemplates],
        Msg::TemplatesLoaded(result) => {
            state.set_templates(result.unwrap_or_default());
            Vec::new()
        }
        Msg::SceneIdChanged(raw) => {
            let scene_id = raw.trim().to_string();
            state.set_scene_id(raw);
            if scene_id.is_empty() {
                state.clear_scene();
                Vec::new()
            } else {
                vec![Effect::LookupScene { scene_id }]
            }
        }
        Msg::SceneLoaded { scene_id, result } => {
            // Replies for an id the user has since edited away from are dropped.
            if scene_id != state.scene_id().trim() {
                return (state, Vec::new());
            }
            match result {
                Ok(scene) if !scene.files.is_empty() => state.apply_scene(&scene),
                Ok(_) | Err(_) => state.clear_scene(),
            }
            Vec::new()
        }
        Msg::FileSelected(file_id) => {
            state.select_file(&file_id);
            Vec::new()
        }
        Msg::TemplateSelected(key) => {
            state.select_template(&key);
            Vec::new()
        }
        Msg::ScreensToggled(screens) => {
            state.set_screens(screens);
            Vec::new()
        }
        Msg::FillClicked { announce_url } => {
            if state.phase() == FillPhase::Running {
                return (state, Vec::new());
            }
            let scene_id = state.scene_id().trim().to_string();
            if scene_id.is_empty() {
                state.set_status(StatusLine::error("Enter a scene ID before filling"));
                return (state, Vec::new());
            }
            let request = FillRequest {
                scene_id,
                file_id: state.selected_file().map(ToOwned::to_owned),
                announce_url,
                template: state.selected_template().map(ToOwned::to_owned),
                screens: state.screens(),
            };
            state.begin_fill();
            vec![Effect::StartFill(request)]
        }
        Msg::FrameReceived(frame) => apply_frame(&mut state, frame),
        Msg::BackendError(message) => {
            if state.phase() == FillPhase::Running {
                state.fail_fill(StatusLine::error(message));
            }
            Vec::new()
        }
        Msg::FillEnded(result) => {
            if state.phase() == FillPhase::Running {
                let notice = match result {
                    Ok(()) => "Fill ended before completion; retry when ready".to_string(),
                    Err(reason) => format!("Fill failed: {reason}; retry when ready"),
                };
                state.fail_fill(StatusLine::error(notice));
            }
            Vec::new()
        }
        Msg::TorrentSaved(Ok(path)) => {
            vec![Effect::SetFields(vec![(FormField::TorrentFile, path)])]
        }
        Msg::TorrentSaved(Err(reason)) => {
            state.set_status(StatusLine::error(format!("Could not save torrent: {reason}")));
            Vec::new()
        }
        Msg::SuggestionEdited { source, target } => {
            if state.suggestions_mut().edit(&source, target) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SuggestionIgnoreToggled { source, ignore } => {
            if state.suggestions_mut().set_ignored(&source, ignore) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::IgnoreAllToggled(ignore) => {
            state.suggestions_mut().set_ignore_all(ignore);
            state.mark_dirty();
            Vec::new()
        }
        Msg::SuggestionDecided {
            source,
            ignore,
            final_tag,
        } => match state
            .suggestions_mut()
            .decide_one(&source, ignore, final_tag.as_deref())
        {
            Ok(submission) => {
                state.mark_dirty();
                vec![Effect::SubmitSuggestions(submission)]
            }
            Err(err) => {
                state.set_suggestion_status(StatusLine::error(err.to_string()));
                Vec::new()
            }
        },
        Msg::DecideAllClicked => match state.suggestions_mut().decide_all() {
            Ok(Some(submission)) => {
                state.mark_dirty();
                vec![Effect::SubmitSuggestions(submission)]
            }
            Ok(None) => Vec::new(),
            Err(err) => {
                state.set_suggestion_status(StatusLine::error(err.to_string()));
                Vec::new()
            }
        },
        Msg::SuggestionsSubmitted(result) => {
            let status = match result {
                Ok(message) => StatusLine::info(message.unwrap_or_else(|| "Tags saved".into())),
                Err(reason) => StatusLine::error(reason),
            };
            state.set_suggestion_status(status);
            Vec::new()
        }
        Msg::StartTorrentClicked => match state.result() {
            Some(result) => vec![Effect::StartTorrent {
                torrent_path: result.torrent_path.clone(),
            }],
            None => Vec::new(),
        },
        Msg::TorrentStarted(result) => {
            let status = match result {
                Ok(()) => StatusLine::info("Torrent started"),
                Err(reason) => StatusLine::error(format!("Could not start torrent: {reason}")),
            };
            state.set_status(status);
            Vec::new()
        }
    };

    (state, effects)
}

fn apply_frame(state: &mut AppState, frame: FrameUpdate) -> Vec<Effect> {
    // Frames after the terminal one (or from a superseded stream) are dropped.
    if state.phase() != FillPhase::Running {
        return Vec::new();
    }
    if let Some(message) = frame.message {
        state.set_status(StatusLine::info(message));
    }
    let Some(fill) = frame.fill else {
        // Suggestions only count when they ride on the terminal result.
        return Vec::new();
    };

    let mut effects = vec![Effect::SetFields(fill.field_updates())];
    if let Some(attachment) = frame.attachment {
        effects.push(Effect::SaveTorrent {
            name: attachment.name,
            content: attachment.content,
        });
    }
    state.complete_fill(fill, frame.suggestions);
    effects
}
