use std::sync::Once;

use pretty_assertions::assert_eq;
use stashfill_core::{
    update, AppState, Effect, FillPhase, FillRequest, FillResult, FormField, FrameUpdate, Msg,
    SceneFile, SceneSummary, Severity, StatusLine, TemplateOption, TorrentAttachment,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(stashfill_logging::initialize_for_tests);
}

fn scene(title: &str) -> SceneSummary {
    SceneSummary {
        id: "42".into(),
        title: Some(title.into()),
        files: vec![
            SceneFile {
                id: "7".into(),
                basename: "clip.mp4".into(),
                format: "mp4".into(),
                width: 1920,
                height: 1080,
                video_codec: "h264".into(),
                audio_codec: "aac".into(),
                duration: 3725.0,
            },
            SceneFile {
                id: "8".into(),
                basename: "clip.mkv".into(),
                format: "mkv".into(),
                width: 1280,
                height: 720,
                video_codec: "hevc".into(),
                audio_codec: "opus".into(),
                duration: 125.0,
            },
        ],
    }
}

fn fill_result() -> FillResult {
    FillResult {
        title: "Scene Title".into(),
        description: "[b]desc[/b]".into(),
        tags: "anal blowjob".into(),
        cover: "https://img.example/cover.jpg".into(),
        torrent_path: "/torrents/clip.torrent".into(),
        file_path: "/media/clip.mp4".into(),
        anon: false,
    }
}

/// Drives the state to `Running` with scene 42 loaded and template `fakestash` selected.
fn running_state() -> AppState {
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::TemplatesLoaded(Ok(vec![TemplateOption {
            key: "fakestash".into(),
            label: "Fake Stash".into(),
        }])),
    );
    let (state, _) = update(state, Msg::SceneIdChanged("42".into()));
    let (state, _) = update(
        state,
        Msg::SceneLoaded {
            scene_id: "42".into(),
            result: Ok(scene("Scene Title")),
        },
    );
    let (state, _) = update(
        state,
        Msg::FillClicked {
            announce_url: "https://tracker.example/announce".into(),
        },
    );
    state
}

#[test]
fn scene_lookup_populates_file_selector() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SceneIdChanged(" 42 ".into()));
    assert_eq!(
        effects,
        vec![Effect::LookupScene {
            scene_id: "42".into()
        }]
    );

    let (state, _) = update(
        state,
        Msg::SceneLoaded {
            scene_id: "42".into(),
            result: Ok(scene("")),
        },
    );
    let view = state.view();
    assert_eq!(view.title_display, "clip.mp4");
    let labels: Vec<_> = view.files.iter().map(|file| file.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "1920×1080, mp4, h264/aac, 1:02:05",
            "1280×720, mkv, hevc/opus, 2:05"
        ]
    );
    assert_eq!(view.selected_file.as_deref(), Some("7"));
}

#[test]
fn lookup_failure_clears_selection() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SceneIdChanged("42".into()));
    let (state, _) = update(
        state,
        Msg::SceneLoaded {
            scene_id: "42".into(),
            result: Ok(scene("Title")),
        },
    );
    let (state, _) = update(
        state,
        Msg::SceneLoaded {
            scene_id: "42".into(),
            result: Err("no scene".into()),
        },
    );
    let view = state.view();
    assert!(view.title_display.is_empty());
    assert!(view.files.is_empty());
    assert_eq!(view.selected_file, None);
}

#[test]
fn stale_lookup_reply_is_ignored() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SceneIdChanged("42".into()));
    let (state, _) = update(state, Msg::SceneIdChanged("43".into()));
    let (state, _) = update(
        state,
        Msg::SceneLoaded {
            scene_id: "42".into(),
            result: Ok(scene("Old")),
        },
    );
    assert!(state.view().files.is_empty());
}

#[test]
fn clearing_scene_id_skips_lookup() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SceneIdChanged("42".into()));
    let (state, effects) = update(state, Msg::SceneIdChanged(String::new()));
    assert!(effects.is_empty());
    assert!(state.view().title_display.is_empty());
}

#[test]
fn fill_click_emits_request_and_disables_trigger() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::TemplatesLoaded(Ok(vec![TemplateOption {
            key: "fakestash".into(),
            label: "Fake Stash".into(),
        }])),
    );
    let (state, _) = update(state, Msg::SceneIdChanged("42".into()));
    let (state, _) = update(
        state,
        Msg::SceneLoaded {
            scene_id: "42".into(),
            result: Ok(scene("Title")),
        },
    );
    let (state, _) = update(state, Msg::FileSelected("8".into()));
    let (state, _) = update(state, Msg::ScreensToggled(false));
    let (state, effects) = update(
        state,
        Msg::FillClicked {
            announce_url: "https://tracker.example/announce".into(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::StartFill(FillRequest {
            scene_id: "42".into(),
            file_id: Some("8".into()),
            announce_url: "https://tracker.example/announce".into(),
            template: Some("fakestash".into()),
            screens: false,
        })]
    );
    assert!(!state.view().fill_enabled);

    let (_state, effects) = update(
        state,
        Msg::FillClicked {
            announce_url: "https://tracker.example/announce".into(),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn fill_without_scene_id_reports_status() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::FillClicked {
            announce_url: String::new(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), FillPhase::Idle);
    assert_eq!(state.view().status.unwrap().severity, Severity::Error);
}

#[test]
fn progress_messages_replace_each_other() {
    init_logging();
    let state = running_state();
    let (state, _) = update(
        state,
        Msg::FrameReceived(FrameUpdate {
            message: Some("Making torrent".into()),
            ..FrameUpdate::default()
        }),
    );
    let (state, effects) = update(
        state,
        Msg::FrameReceived(FrameUpdate {
            message: Some("Uploading images".into()),
            ..FrameUpdate::default()
        }),
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.view().status,
        Some(StatusLine::info("Uploading images"))
    );
    assert_eq!(state.phase(), FillPhase::Running);
}

#[test]
fn terminal_frame_writes_fields_and_builds_suggestions() {
    init_logging();
    let state = running_state();
    let (state, effects) = update(
        state,
        Msg::FrameReceived(FrameUpdate {
            message: Some("Done".into()),
            fill: Some(fill_result()),
            suggestions: vec![
                ("anal".into(), "Anal".into()),
                ("bj".into(), "Blowjob".into()),
            ],
            attachment: Some(TorrentAttachment {
                name: "clip.torrent".into(),
                content: vec![1, 2, 3],
            }),
        }),
    );

    assert_eq!(
        effects,
        vec![
            Effect::SetFields(vec![
                (FormField::Description, "[b]desc[/b]".into()),
                (FormField::Tags, "anal blowjob".into()),
                (FormField::Cover, "https://img.example/cover.jpg".into()),
                (FormField::Title, "Scene Title".into()),
                (FormField::Anonymous, "false".into()),
            ]),
            Effect::SaveTorrent {
                name: "clip.torrent".into(),
                content: vec![1, 2, 3],
            },
        ]
    );

    let view = state.view();
    assert_eq!(view.phase, FillPhase::Completed);
    assert!(view.fill_enabled);
    assert!(view.can_start_torrent);
    assert_eq!(view.instructions.len(), 3);
    assert!(view.instructions[1].contains("/torrents/clip.torrent"));
    let sources: Vec<_> = view.suggestions.iter().map(|row| row.source.as_str()).collect();
    assert_eq!(sources, vec!["anal", "bj"]);
}

#[test]
fn suggestions_on_progress_frames_are_ignored() {
    init_logging();
    let state = running_state();
    let (state, _) = update(
        state,
        Msg::FrameReceived(FrameUpdate {
            message: Some("Rendering template".into()),
            suggestions: vec![("early".into(), "Early".into())],
            ..FrameUpdate::default()
        }),
    );
    assert!(state.view().suggestions.is_empty());
}

#[test]
fn backend_error_fails_fill_verbatim() {
    init_logging();
    let state = running_state();
    let (state, _) = update(state, Msg::BackendError("Failed to generate screens".into()));
    let (state, _) = update(state, Msg::FillEnded(Ok(())));

    let view = state.view();
    assert_eq!(view.phase, FillPhase::Failed);
    assert_eq!(
        view.status,
        Some(StatusLine::error("Failed to generate screens"))
    );
    assert!(view.fill_enabled);
}

#[test]
fn stream_failure_surfaces_notice() {
    init_logging();
    let state = running_state();
    let (state, _) = update(state, Msg::FillEnded(Err("connection closed".into())));
    let view = state.view();
    assert_eq!(view.phase, FillPhase::Failed);
    let status = view.status.unwrap();
    assert_eq!(status.severity, Severity::Error);
    assert!(status.text.contains("connection closed"));
}

#[test]
fn stream_ending_without_result_is_a_failure() {
    init_logging();
    let (state, _) = update(running_state(), Msg::FillEnded(Ok(())));
    assert_eq!(state.phase(), FillPhase::Failed);
}

#[test]
fn frames_after_completion_are_dropped() {
    init_logging();
    let (state, _) = update(
        running_state(),
        Msg::FrameReceived(FrameUpdate {
            fill: Some(fill_result()),
            ..FrameUpdate::default()
        }),
    );
    let (state, effects) = update(
        state,
        Msg::FrameReceived(FrameUpdate {
            message: Some("late".into()),
            fill: Some(FillResult::default()),
            ..FrameUpdate::default()
        }),
    );
    assert!(effects.is_empty());
    assert_eq!(state.result(), Some(&fill_result()));
}

#[test]
fn saved_torrent_path_goes_to_attach_point() {
    init_logging();
    let (_state, effects) = update(
        AppState::new(),
        Msg::TorrentSaved(Ok("/out/clip.torrent".into())),
    );
    assert_eq!(
        effects,
        vec![Effect::SetFields(vec![(
            FormField::TorrentFile,
            "/out/clip.torrent".into()
        )])]
    );
}

#[test]
fn start_torrent_requires_result() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::StartTorrentClicked);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::TorrentStarted(Err("client offline".into())),
    );
    assert_eq!(state.view().status.unwrap().severity, Severity::Error);

    let (state, _) = update(
        running_state(),
        Msg::FrameReceived(FrameUpdate {
            fill: Some(fill_result()),
            ..FrameUpdate::default()
        }),
    );
    let (_state, effects) = update(state, Msg::StartTorrentClicked);
    assert_eq!(
        effects,
        vec![Effect::StartTorrent {
            torrent_path: "/torrents/clip.torrent".into()
        }]
    );
}

#[test]
fn new_fill_clears_previous_suggestions() {
    init_logging();
    let (state, _) = update(
        running_state(),
        Msg::FrameReceived(FrameUpdate {
            fill: Some(fill_result()),
            suggestions: vec![("anal".into(), "Anal".into())],
            ..FrameUpdate::default()
        }),
    );
    assert_eq!(state.view().suggestions.len(), 1);

    let (state, _) = update(
        state,
        Msg::FillClicked {
            announce_url: "https://tracker.example/announce".into(),
        },
    );
    let view = state.view();
    assert!(view.suggestions.is_empty());
    assert!(view.instructions.is_empty());
    assert_eq!(view.status, None);
}
