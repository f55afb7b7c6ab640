use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use stashfill_core::{
    Effect, FillRequest, FillResult, FormHost, FrameUpdate, Msg, SceneFile, SceneSummary,
    SuggestionSubmission, TemplateOption, TorrentAttachment,
};
use stashfill_engine::{
    AcceptedTag, CatalogScene, EngineEvent, EngineHandle, FillPayload, FillRequestBody, Frame,
    GraphqlCatalog, ReqwestBackend, SuggestionsRequest, TorrentWriter,
};
use stashfill_logging::{fill_error, fill_info, fill_warn};

use super::commands::Input;
use super::config::FillConfig;

pub struct EffectRunner {
    engine: EngineHandle,
    writer: TorrentWriter,
    input_tx: mpsc::Sender<Input>,
}

impl EffectRunner {
    pub fn new(config: &FillConfig, input_tx: mpsc::Sender<Input>) -> anyhow::Result<Self> {
        let backend = ReqwestBackend::new(config.backend_settings())?;
        let catalog = GraphqlCatalog::new(config.catalog_settings())?;
        let engine = EngineHandle::new(Arc::new(backend), Arc::new(catalog))?;

        let runner = Self {
            engine,
            writer: TorrentWriter::new(config.output_dir.clone()),
            input_tx,
        };
        fill_info!("Saving torrents under {}", runner.writer.dir().display());
        runner.spawn_event_loop();
        Ok(runner)
    }

    pub fn run(&self, effects: Vec<Effect>, form: &mut dyn FormHost) {
        for effect in effects {
            match effect {
                Effect::LoadTemplates => self.engine.load_templates(),
                Effect::LookupScene { scene_id } => self.engine.lookup_scene(scene_id),
                Effect::StartFill(request) => {
                    fill_info!("StartFill scene_id={}", request.scene_id);
                    self.engine.start_fill(fill_request_body(request));
                }
                Effect::SetFields(updates) => {
                    for (field, value) in updates {
                        form.set_field(field, &value);
                    }
                }
                Effect::SaveTorrent { name, content } => {
                    let result = self
                        .writer
                        .write(&name, &content)
                        .map(|path| path.display().to_string())
                        .map_err(|err| {
                            fill_error!("Failed to save torrent {:?}: {}", name, err);
                            err.to_string()
                        });
                    self.send(Msg::TorrentSaved(result));
                }
                Effect::SubmitSuggestions(submission) => {
                    self.engine
                        .submit_suggestions(suggestions_request(&submission));
                }
                Effect::StartTorrent { torrent_path } => self.engine.start_torrent(torrent_path),
            }
        }
    }

    fn send(&self, msg: Msg) {
        let _ = self.input_tx.send(Input::Msg(msg));
    }

    fn spawn_event_loop(&self) {
        let engine = self.engine.clone();
        let input_tx = self.input_tx.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.recv_timeout(Duration::from_millis(250)) {
                if input_tx.send(Input::Msg(map_event(event))).is_err() {
                    break;
                }
            }
        });
    }
}

fn fill_request_body(request: FillRequest) -> FillRequestBody {
    FillRequestBody {
        scene_id: request.scene_id,
        file_id: request.file_id,
        announce_url: request.announce_url,
        template: request.template,
        screens: request.screens,
    }
}

fn suggestions_request(submission: &SuggestionSubmission) -> SuggestionsRequest {
    SuggestionsRequest {
        accept: submission
            .accepted()
            .into_iter()
            .map(|(name, emp)| AcceptedTag {
                name: name.to_string(),
                emp: emp.to_string(),
            })
            .collect(),
        ignore: submission
            .ignored()
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::TemplatesLoaded(result) => Msg::TemplatesLoaded(
            result
                .map(|templates| {
                    templates
                        .into_iter()
                        .map(|(key, label)| TemplateOption { key, label })
                        .collect()
                })
                .map_err(|err| {
                    fill_warn!("Template list unavailable: {}", err);
                    err.to_string()
                }),
        ),
        EngineEvent::SceneLoaded { scene_id, result } => Msg::SceneLoaded {
            result: result.map(scene_summary).map_err(|err| {
                fill_warn!("Scene lookup for {} failed: {}", scene_id, err);
                err.to_string()
            }),
            scene_id,
        },
        EngineEvent::FillFrame(frame) => map_frame(frame),
        EngineEvent::FillFinished(result) => Msg::FillEnded(result.map_err(|err| err.to_string())),
        EngineEvent::SuggestionsSubmitted(result) => {
            Msg::SuggestionsSubmitted(result.map_err(|err| err.to_string()))
        }
        EngineEvent::TorrentStarted(result) => {
            Msg::TorrentStarted(result.map_err(|err| err.to_string()))
        }
    }
}

fn map_frame(frame: Frame) -> Msg {
    let data = match frame {
        Frame::Error { message } => return Msg::BackendError(message),
        Frame::Success { data } => data.unwrap_or_default(),
    };
    let suggestions = data.suggestion_pairs();
    let attachment = data.file.and_then(|file| match file.decode_content() {
        Ok(content) => Some(TorrentAttachment {
            name: file.name,
            content,
        }),
        Err(err) => {
            fill_warn!("Ignoring undecodable attachment {:?}: {}", file.name, err);
            None
        }
    });
    Msg::FrameReceived(FrameUpdate {
        message: data.message,
        fill: data.fill.map(fill_result),
        suggestions,
        attachment,
    })
}

fn fill_result(payload: FillPayload) -> FillResult {
    FillResult {
        title: payload.title.unwrap_or_default(),
        description: payload.description.unwrap_or_default(),
        tags: payload.tags.unwrap_or_default(),
        cover: payload.cover.unwrap_or_default(),
        torrent_path: payload.torrent_path.unwrap_or_default(),
        file_path: payload.file_path.unwrap_or_default(),
        anon: payload.anon,
    }
}

fn scene_summary(scene: CatalogScene) -> SceneSummary {
    SceneSummary {
        id: scene.id,
        title: scene.title,
        files: scene
            .files
            .into_iter()
            .map(|file| SceneFile {
                id: file.id,
                basename: file.basename,
                format: file.format,
                width: file.width,
                height: file.height,
                video_codec: file.video_codec.unwrap_or_default(),
                audio_codec: file.audio_codec.unwrap_or_default(),
                duration: file.duration,
            })
            .collect(),
    }
}
