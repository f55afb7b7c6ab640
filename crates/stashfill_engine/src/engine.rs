use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use stashfill_logging::{fill_debug, fill_warn};

use crate::{Catalog, EngineEvent, FillRequestBody, JobBackend, SuggestionsRequest};

enum EngineCommand {
    LoadTemplates,
    LookupScene { scene_id: String },
    StartFill(FillRequestBody),
    SubmitSuggestions(SuggestionsRequest),
    StartTorrent { torrent_path: String },
}

/// Runs backend and catalog calls on a background runtime and reports results as events.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(backend: Arc<dyn JobBackend>, catalog: Arc<dyn Catalog>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let catalog = catalog.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(backend.as_ref(), catalog.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn load_templates(&self) {
        self.send(EngineCommand::LoadTemplates);
    }

    pub fn lookup_scene(&self, scene_id: impl Into<String>) {
        self.send(EngineCommand::LookupScene {
            scene_id: scene_id.into(),
        });
    }

    pub fn start_fill(&self, request: FillRequestBody) {
        self.send(EngineCommand::StartFill(request));
    }

    pub fn submit_suggestions(&self, request: SuggestionsRequest) {
        self.send(EngineCommand::SubmitSuggestions(request));
    }

    pub fn start_torrent(&self, torrent_path: impl Into<String>) {
        self.send(EngineCommand::StartTorrent {
            torrent_path: torrent_path.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            fill_warn!("Engine worker is gone; command dropped");
        }
    }
}

async fn handle_command(
    backend: &dyn JobBackend,
    catalog: &dyn Catalog,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::LoadTemplates => EngineEvent::TemplatesLoaded(backend.templates().await),
        EngineCommand::LookupScene { scene_id } => {
            let result = catalog.find_scene(&scene_id).await;
            EngineEvent::SceneLoaded { scene_id, result }
        }
        EngineCommand::StartFill(request) => {
            let result = run_fill(backend, &request, &event_tx).await;
            EngineEvent::FillFinished(result)
        }
        EngineCommand::SubmitSuggestions(request) => {
            EngineEvent::SuggestionsSubmitted(backend.submit_suggestions(&request).await)
        }
        EngineCommand::StartTorrent { torrent_path } => {
            EngineEvent::TorrentStarted(backend.start_torrent(&torrent_path).await)
        }
    };
    let _ = event_tx.send(event);
}

async fn run_fill(
    backend: &dyn JobBackend,
    request: &FillRequestBody,
    event_tx: &mpsc::Sender<EngineEvent>,
) -> Result<(), crate::StreamError> {
    let mut reader = backend.open_fill(request).await?;
    let mut terminal_seen = false;
    while let Some(item) = reader.next_frame().await {
        let frame = item?;
        terminal_seen |= frame.is_terminal();
        if event_tx.send(EngineEvent::FillFrame(frame)).is_err() {
            fill_debug!("Event receiver dropped; abandoning fill stream");
            return Ok(());
        }
    }
    if terminal_seen {
        fill_debug!("Fill stream finished after {} frames", reader.emitted());
    } else {
        fill_warn!(
            "Fill stream closed after {} frames without a result",
            reader.emitted()
        );
    }
    Ok(())
}
