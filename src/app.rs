use crate::browser::{MovieBrowser, PageRequest};
use crate::command::{Command, HELP};
use crate::config::Settings;
use crate::debounce::Debouncer;
use crate::models::{DiscoverPage, Genre};
use crate::tmdb::{TmdbApi, TmdbClient};
use crate::view;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

const EOF_GRACE: Duration = Duration::from_millis(200);

/// Everything that can change session state. All of it is applied on the
/// session loop, one event at a time.
#[derive(Debug)]
pub enum Event {
    Command(Command),
    LoadDue,
    GenresLoaded(Result<Vec<Genre>>),
    PageLoaded {
        request: PageRequest,
        result: Result<DiscoverPage>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Render,
    Message(String),
    Nothing,
    Quit,
}

pub struct Session {
    tmdb: Arc<dyn TmdbApi>,
    browser: MovieBrowser,
    debouncer: Debouncer,
    debounce: Duration,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
}

impl Session {
    /// Must be called from within a tokio runtime.
    pub fn new(tmdb: Arc<dyn TmdbApi>, debounce: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::spawn(debounce, events_tx.clone(), || Event::LoadDue);
        Self {
            tmdb,
            browser: MovieBrowser::new(),
            debouncer,
            debounce,
            events_tx,
            events_rx,
        }
    }

    pub fn browser(&self) -> &MovieBrowser {
        &self.browser
    }

    /// Fetches the genre list and treats the (empty) list's sentinel as
    /// visible, which schedules the first page.
    pub fn initialize(&mut self) {
        let tmdb = self.tmdb.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = tmdb.fetch_genres().await;
            let _ = tx.send(Event::GenresLoaded(result));
        });
        self.scroll_trigger();
    }

    pub async fn next_event(&mut self) -> Option<Event> {
        self.events_rx.recv().await
    }

    pub fn handle(&mut self, event: Event) -> Outcome {
        match event {
            Event::Command(cmd) => self.apply_command(cmd),
            Event::LoadDue => {
                if self.start_load() {
                    Outcome::Render
                } else {
                    Outcome::Nothing
                }
            }
            Event::GenresLoaded(Ok(genres)) => {
                info!("Loaded {} genres", genres.len());
                self.browser.set_genres(genres);
                Outcome::Render
            }
            Event::GenresLoaded(Err(e)) => {
                error!("Error fetching genres: {:?}", e);
                Outcome::Nothing
            }
            Event::PageLoaded { request, result } => self.finish_load(request, result),
        }
    }

    pub fn apply_command(&mut self, cmd: Command) -> Outcome {
        match cmd {
            Command::Search(term) => {
                self.browser.set_search_term(term);
                Outcome::Render
            }
            Command::ClearSearch => {
                self.browser.clear_search();
                Outcome::Render
            }
            Command::SelectGenre(genre) => {
                info!(genre = ?genre, "Genre filter changed");
                self.browser.select_genre(genre);
                self.debouncer.trigger();
                Outcome::Render
            }
            Command::ListGenres => Outcome::Message(view::render_genres(&self.browser)),
            Command::SwitchTab(tab) => {
                self.browser.switch_tab(tab);
                Outcome::Render
            }
            Command::AddFavorite(id) => match self.browser.find_movie(id).cloned() {
                Some(movie) => {
                    if !self.browser.add_favorite(movie) {
                        debug!(id, "Movie already in favourites");
                    }
                    Outcome::Render
                }
                None => Outcome::Message(format!("No loaded movie with id {id}\n")),
            },
            Command::RemoveFavorite(id) => {
                if !self.browser.remove_favorite(id) {
                    debug!(id, "Movie was not in favourites");
                }
                Outcome::Render
            }
            Command::More => {
                self.scroll_trigger();
                Outcome::Nothing
            }
            Command::Help => Outcome::Message(format!("{HELP}\n")),
            Command::Quit => Outcome::Quit,
        }
    }

    fn scroll_trigger(&self) {
        if self.browser.accepts_scroll_trigger() {
            self.debouncer.trigger();
        } else {
            debug!(
                loading = self.browser.is_loading(),
                exhausted = self.browser.is_exhausted(),
                "Ignoring scroll trigger"
            );
        }
    }

    fn start_load(&mut self) -> bool {
        let Some(request) = self.browser.begin_load() else {
            debug!("Load already in flight, skipping");
            return false;
        };
        debug!(
            page = request.page,
            genre = ?request.genre,
            generation = request.generation,
            "Requesting discover page"
        );
        let tmdb = self.tmdb.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = tmdb.discover_movies(request.page, request.genre).await;
            let _ = tx.send(Event::PageLoaded { request, result });
        });
        true
    }

    fn finish_load(&mut self, request: PageRequest, result: Result<DiscoverPage>) -> Outcome {
        match result {
            Ok(data) => {
                let count = data.results.len();
                if self.browser.complete_load(request, data) {
                    info!(
                        page = request.page,
                        count,
                        total = self.browser.movies().len(),
                        "Appended movies"
                    );
                    Outcome::Render
                } else {
                    debug!(
                        generation = request.generation,
                        current = self.browser.generation(),
                        "Discarding stale page"
                    );
                    Outcome::Nothing
                }
            }
            Err(e) => {
                if self.browser.fail_load(request) {
                    error!("Error fetching movies: {:?}", e);
                    Outcome::Render
                } else {
                    debug!("Ignoring failure of stale request: {}", e);
                    Outcome::Nothing
                }
            }
        }
    }

    /// Runs the session until `quit` is entered or Ctrl+C. Once the input
    /// ends, pending loads are still applied and the session stops after a
    /// quiet period with nothing in flight.
    pub async fn run<R, W>(mut self, mut input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        let mut input_open = true;
        let idle_after_eof = self.debounce + EOF_GRACE;
        self.initialize();
        write_out(&mut output, &view::render(&self.browser)).await?;

        loop {
            let event = tokio::select! {
                read = input.read_until(b'\n', &mut buf), if input_open => {
                    let n = read.context("reading input failed")?;
                    if n == 0 {
                        debug!("Input closed, draining pending events");
                        input_open = false;
                        continue;
                    }
                    let line = String::from_utf8_lossy(&buf).into_owned();
                    buf.clear();
                    match line.parse::<Command>() {
                        Ok(cmd) => Event::Command(cmd),
                        Err(e) => {
                            write_out(&mut output, &format!("{e}\n")).await?;
                            continue;
                        }
                    }
                }
                Some(event) = self.events_rx.recv() => event,
                _ = tokio::time::sleep(idle_after_eof), if !input_open && !self.browser.is_loading() => break,
                _ = shutdown_signal() => break,
            };

            match self.handle(event) {
                Outcome::Render => write_out(&mut output, &view::render(&self.browser)).await?,
                Outcome::Message(text) => write_out(&mut output, &text).await?,
                Outcome::Nothing => {}
                Outcome::Quit => break,
            }
        }
        info!(
            favourites = self.browser.favorites().len(),
            movies = self.browser.movies().len(),
            "Session ended"
        );
        Ok(())
    }
}

/// Wires the real TMDB client to stdin/stdout.
pub async fn run_interactive(settings: Settings) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&settings)?);
    info!(
        "Using TMDB at {} (debounce {:?})",
        settings.api_base, settings.debounce
    );
    let session = Session::new(tmdb, settings.debounce);
    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output
        .write_all(text.as_bytes())
        .await
        .context("writing output failed")?;
    output.flush().await.context("flushing output failed")?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received (Ctrl+C)"),
        Err(e) => {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
