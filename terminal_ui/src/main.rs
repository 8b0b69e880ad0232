use std::error::Error;
use std::fs::File;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use log::info;
use smarttask_shared::{FileStorage, Storage, SuggestError, SuggestionClient, TaskStore};
use tokio::sync::mpsc;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use uuid::Uuid;

mod app;
mod config;
mod terminal;
mod ui;

use app::{App, SuggestJob};
use config::Config;
use terminal::TerminalGuard;

type SuggestOutcome = (Uuid, Result<Vec<String>, SuggestError>);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_logging(&config)?;

    let (store, warning) = TaskStore::open(FileStorage::new(&config.data_file))?;
    info!("Using task file {}", config.data_file.display());
    let client = SuggestionClient::new(config.proxy_url.clone())?;
    let mut app = App::new(store, warning);

    let mut guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &client);

    guard.restore()?;
    result?;
    Ok(())
}

fn init_logging(config: &Config) -> io::Result<()> {
    // stderr would draw over the UI, so log only to an explicit file
    if let Some(path) = &config.log_file {
        let file = File::create(path)?;
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
    Ok(())
}

fn run_app<B: Backend, S: Storage>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
    client: &SuggestionClient,
) -> io::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<SuggestOutcome>();

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;

        while let Ok((id, outcome)) = rx.try_recv() {
            app.finish_suggestion(id, outcome);
        }

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(job) = app.handle_key(key) {
                spawn_suggestion(client.clone(), job, tx.clone());
            }
        }
    }
    Ok(())
}

fn spawn_suggestion(
    client: SuggestionClient,
    job: SuggestJob,
    tx: mpsc::UnboundedSender<SuggestOutcome>,
) {
    tokio::spawn(async move {
        let outcome = client.suggest(&job.title).await;
        // the receiver is gone once the app has quit
        let _ = tx.send((job.id, outcome));
    });
}
