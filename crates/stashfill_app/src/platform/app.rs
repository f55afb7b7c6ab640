use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use clap::Parser;
use stashfill_core::{catalog_scene_url, update, AppState, Effect, FormField, FormHost, Msg};
use stashfill_logging::{fill_debug, fill_info};

use super::cli::Cli;
use super::commands::{parse_line, Input, HELP};
use super::config::FillConfig;
use super::effects::EffectRunner;
use super::form::TerminalForm;
use super::{logging, ui};

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log.into(), cli.verbose);

    let config = Arc::new(FillConfig::from_cli(&cli).context("failed to load configuration")?);
    fill_info!(
        "Starting with backend {} and catalog {}",
        config.backend_url,
        config.catalog_url
    );

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    let runner = EffectRunner::new(&config, input_tx.clone()).context("failed to start engine")?;
    spawn_line_reader(input_tx);

    let mut app = App::new(config, runner, TerminalForm::new(&cli.announce_url));
    println!("{HELP}");
    app.dispatch(Msg::Started);
    app.render();

    while let Ok(input) = input_rx.recv() {
        if !app.handle(input) {
            break;
        }
    }
    fill_info!("Exiting");
    Ok(())
}

struct App {
    config: Arc<FillConfig>,
    state: AppState,
    runner: EffectRunner,
    form: TerminalForm,
}

impl App {
    fn new(config: Arc<FillConfig>, runner: EffectRunner, form: TerminalForm) -> Self {
        Self {
            config,
            state: AppState::new(),
            runner,
            form,
        }
    }

    /// Returns false when the user asked to quit.
    fn handle(&mut self, input: Input) -> bool {
        match input {
            Input::Msg(msg) => self.dispatch(msg),
            Input::Fill => {
                let announce_url = self.form.announce_url();
                self.dispatch(Msg::FillClicked { announce_url });
            }
            Input::Announce(url) => {
                self.form.set_field(FormField::AnnounceUrl, &url);
                self.render();
            }
            Input::Open => {
                let url = catalog_scene_url(&self.config.catalog_url, self.state.scene_id());
                println!("{url}");
            }
            Input::Show => self.render(),
            Input::Help => println!("{HELP}"),
            Input::Quit => return false,
        }
        true
    }

    fn dispatch(&mut self, msg: Msg) {
        fill_debug!("Dispatching {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let form_changed = effects
            .iter()
            .any(|effect| matches!(effect, Effect::SetFields(_)));
        self.runner.run(effects, &mut self.form);

        if self.state.consume_dirty() || form_changed {
            self.render();
        }
    }

    fn render(&self) {
        let view = self.state.view();
        println!();
        for line in ui::render::render(&view, self.form.filled()) {
            println!("{line}");
        }
    }
}

fn spawn_line_reader(input_tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match parse_line(&line) {
                Ok(Some(input)) => {
                    if input_tx.send(input).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(message) => eprintln!("{message}"),
            }
        }
        let _ = input_tx.send(Input::Quit);
    });
}
