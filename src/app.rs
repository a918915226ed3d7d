use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::api::SnapsApiClient;
use crate::command::{self, Command};
use crate::config::AppConfig;
use crate::event::{ApiResult, AppEvent, Event, EventHandler};
use crate::filter::{FilterMode, parse_date_bound};
use crate::ui;
use crate::view::{SnapsView, ToggleOutcome};

/// Longest accepted date input (`YYYY-MM-DD`).
const DATE_INPUT_LEN: usize = 10;

// ---------------------------------------------------------------------------
// App mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Command,
    Search,
    StartDate,
    EndDate,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub running: bool,
    pub events: EventHandler,
    pub config: AppConfig,

    pub view: SnapsView,
    pub mode: AppMode,
    pub show_help: bool,

    // Input state
    pub command_input: String,
    pub search_input: String,
    pub start_input: String,
    pub end_input: String,

    // API client (shared with spawned tasks)
    pub api_client: Arc<SnapsApiClient>,

    // Status
    pub status_message: Option<String>,
}

impl App {
    pub fn new(config: AppConfig, api_client: SnapsApiClient) -> Self {
        let events = EventHandler::new(config.tick_rate_fps);
        Self::with_events(config, api_client, events)
    }

    fn with_events(config: AppConfig, api_client: SnapsApiClient, events: EventHandler) -> Self {
        Self {
            running: true,
            events,
            view: SnapsView::new(config.default_filter),
            config,
            mode: AppMode::Normal,
            show_help: false,
            command_input: String::new(),
            search_input: String::new(),
            start_input: String::new(),
            end_input: String::new(),
            api_client: Arc::new(api_client),
            status_message: None,
        }
    }

    // -- Main event loop ----------------------------------------------------

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        // The one and only load.
        self.events.send(AppEvent::FetchSnaps);

        while self.running {
            terminal.draw(|frame| self.draw(frame))?;
            match self.events.next().await? {
                Event::Tick => self.tick(),
                Event::Crossterm(event) => {
                    if let crossterm::event::Event::Key(key) = event
                        && key.kind == crossterm::event::KeyEventKind::Press
                    {
                        self.handle_key_event(key);
                    }
                }
                Event::App(app_event) => self.handle_app_event(*app_event),
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        ui::draw(frame, self);
    }

    fn tick(&self) {}

    // -- Key event routing --------------------------------------------------

    fn handle_key_event(&mut self, key: KeyEvent) {
        // Ctrl-C always quits.
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.events.send(AppEvent::Quit);
            return;
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_key(key),
            AppMode::Command => self.handle_command_key(key),
            AppMode::Search => self.handle_search_key(key),
            AppMode::StartDate | AppMode::EndDate => self.handle_date_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q' | '?')) {
                self.show_help = false;
            }
            return;
        }

        if self.view.detail_open() {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.view.close_detail(),
                KeyCode::Char('b') => {
                    if let Some(id) = self.view.detail_snap().map(|s| s.id.clone()) {
                        self.toggle_block(&id);
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.events.send(AppEvent::Quit);
            }
            KeyCode::Char('j') | KeyCode::Down => self.view.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.view.select_prev(),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('b') => self.toggle_selected(),
            KeyCode::Char('1') => self.set_filter_mode(FilterMode::Message),
            KeyCode::Char('2') => self.set_filter_mode(FilterMode::Username),
            KeyCode::Char('3') => self.set_filter_mode(FilterMode::CreatedAt),
            KeyCode::Char('/') => self.begin_search(),
            KeyCode::Char('f') => self.begin_date_input(AppMode::StartDate),
            KeyCode::Char('t') => self.begin_date_input(AppMode::EndDate),
            KeyCode::Char(':') => {
                self.mode = AppMode::Command;
                self.command_input.clear();
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = AppMode::Normal;
                self.command_input.clear();
            }
            KeyCode::Enter => {
                self.mode = AppMode::Normal;
                self.execute_command();
            }
            KeyCode::Backspace => {
                self.command_input.pop();
            }
            KeyCode::Char(c) => {
                self.command_input.push(c);
            }
            _ => {}
        }
    }

    /// Search input filters live on every keystroke. Esc drops the term.
    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = AppMode::Normal;
                self.search_input.clear();
                self.view.set_term("");
            }
            KeyCode::Enter => {
                self.mode = AppMode::Normal;
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.view.set_term(&self.search_input);
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.view.set_term(&self.search_input);
            }
            _ => {}
        }
    }

    /// Date input accepts `YYYY-MM-DD`; the bound is absent until it parses.
    fn handle_date_key(&mut self, key: KeyEvent) {
        let editing_start = self.mode == AppMode::StartDate;
        let input = if editing_start {
            &mut self.start_input
        } else {
            &mut self.end_input
        };

        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.mode = AppMode::Normal;
                return;
            }
            KeyCode::Tab => {
                self.mode = if editing_start {
                    AppMode::EndDate
                } else {
                    AppMode::StartDate
                };
                return;
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c)
                if (c.is_ascii_digit() || c == '-') && input.len() < DATE_INPUT_LEN =>
            {
                input.push(c);
            }
            _ => return,
        }

        self.view.set_range(
            parse_date_bound(&self.start_input),
            parse_date_bound(&self.end_input),
        );
    }

    // -- Actions ------------------------------------------------------------

    fn set_filter_mode(&mut self, mode: FilterMode) {
        self.view.set_mode(mode);
        // Mirror the inputs the filter just reset.
        if mode != FilterMode::CreatedAt {
            self.search_input.clear();
            self.start_input.clear();
            self.end_input.clear();
        }
    }

    fn begin_search(&mut self) {
        if self.view.filter.mode() == FilterMode::CreatedAt {
            self.status_message =
                Some("Text search is off in date mode (f/t set the range)".into());
            return;
        }
        self.search_input = self.view.filter.term().to_string();
        self.mode = AppMode::Search;
    }

    fn begin_date_input(&mut self, mode: AppMode) {
        if self.view.filter.mode() != FilterMode::CreatedAt {
            self.status_message = Some("Switch to date mode (3) to set a range".into());
            return;
        }
        self.mode = mode;
    }

    fn open_selected(&mut self) {
        if let Some(id) = self.view.selected().map(|s| s.id.clone()) {
            self.view.open_detail(&id);
        }
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.view.selected().map(|s| s.id.clone()) {
            self.toggle_block(&id);
        }
    }

    /// Mark the snap pending right away so a repeated key press cannot start a
    /// second request for the same id.
    fn toggle_block(&mut self, snap_id: &str) {
        match self.view.begin_toggle(snap_id) {
            Some(request) => self.events.send(AppEvent::ToggleBlock(request)),
            None if self.view.is_pending(snap_id) => {
                self.status_message = Some("Still processing the previous action".into());
            }
            None => {}
        }
    }

    // -- Command execution --------------------------------------------------

    fn execute_command(&mut self) {
        let input = std::mem::take(&mut self.command_input);
        match command::parse_command(&input) {
            Some(Command::Filter(mode)) => self.set_filter_mode(mode),
            Some(Command::Search(term)) => {
                if self.view.filter.mode() == FilterMode::CreatedAt {
                    self.set_filter_mode(FilterMode::Message);
                }
                self.view.set_term(&term);
                self.search_input = term;
            }
            Some(Command::Range(start, end)) => {
                self.view.set_mode(FilterMode::CreatedAt);
                self.start_input = start.map(|d| d.to_string()).unwrap_or_default();
                self.end_input = end.map(|d| d.to_string()).unwrap_or_default();
                self.view.set_range(start, end);
            }
            Some(Command::Clear) => {
                self.view.clear_filter();
                self.search_input.clear();
                self.start_input.clear();
                self.end_input.clear();
            }
            Some(Command::Block) => self.toggle_selected(),
            Some(Command::Open) => self.open_selected(),
            Some(Command::Help) => self.show_help = true,
            Some(Command::Quit) => self.events.send(AppEvent::Quit),
            None => {
                self.status_message = Some(format!("Unknown command: {input}"));
            }
        }
    }

    // -- App event handling -------------------------------------------------

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => {
                self.running = false;
            }

            // API request triggers -> dispatch to async tasks.
            ref evt @ (AppEvent::FetchSnaps | AppEvent::ToggleBlock(_)) => {
                self.dispatch_api_request(evt.clone());
            }

            // API response events
            AppEvent::SnapsLoaded(result) => {
                if let Err(ref e) = result {
                    tracing::error!("loading snaps failed: {e}");
                }
                self.view.finish_load(result);
            }
            AppEvent::BlockToggled { snap_id, result } => {
                match self.view.finish_toggle(&snap_id, result) {
                    ToggleOutcome::Applied { blocked } => {
                        let verb = if blocked { "Blocked" } else { "Unblocked" };
                        self.status_message = Some(format!("{verb} snap {snap_id}"));
                    }
                    ToggleOutcome::Failed(e) => {
                        tracing::warn!(%snap_id, "block toggle failed: {e}");
                        self.status_message = Some(format!("Action on snap {snap_id} failed: {e}"));
                    }
                    ToggleOutcome::Unknown => {
                        tracing::debug!(%snap_id, "toggle response for a snap no longer listed");
                    }
                }
            }
        }
    }

    // -- API dispatch -------------------------------------------------------

    fn dispatch_api_request(&self, event: AppEvent) {
        let client = Arc::clone(&self.api_client);
        let sender = self.events.sender();

        tokio::spawn(async move {
            match event {
                AppEvent::FetchSnaps => {
                    let result = client.fetch_all_snaps().await;
                    if let Ok(ref snaps) = result {
                        tracing::info!(count = snaps.len(), "snaps loaded");
                    }
                    let mapped: ApiResult<_> = result.map_err(|e| Arc::new(e.to_string()));
                    let _ = sender.send(Event::App(Box::new(AppEvent::SnapsLoaded(mapped))));
                }
                AppEvent::ToggleBlock(request) => {
                    let result = client
                        .toggle_block(&request.snap_id, &request.email, request.currently_blocked)
                        .await;
                    let mapped: ApiResult<_> = result.map_err(|e| Arc::new(e.to_string()));
                    let _ = sender.send(Event::App(Box::new(AppEvent::BlockToggled {
                        snap_id: request.snap_id,
                        result: mapped,
                    })));
                }
                _ => {
                    // Not an API request event -- ignore.
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Snap, parse_timestamp};
    use crate::credentials::Credentials;

    fn snap(id: &str, message: &str, username: &str, created_at: &str) -> Snap {
        Snap {
            id: id.into(),
            message: message.into(),
            username: username.into(),
            email: format!("{username}@example.com"),
            created_at: parse_timestamp(created_at),
            likes: 0,
            hashtags: Default::default(),
            is_blocked: false,
        }
    }

    fn app() -> App {
        let client = SnapsApiClient::new("http://localhost:3000", Credentials::default()).unwrap();
        let mut app = App::with_events(AppConfig::default(), client, EventHandler::detached());
        app.handle_app_event(AppEvent::SnapsLoaded(Ok(vec![
            snap("1", "hi", "ana", "2024-01-05"),
            snap("2", "bye", "bob", "2024-02-10"),
        ])));
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn ids(app: &App) -> Vec<String> {
        app.view.filtered().iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn search_filters_live() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, AppMode::Search);
        type_str(&mut app, "a");
        assert_eq!(ids(&app), vec!["1"]);
        type_str(&mut app, "n");
        assert_eq!(ids(&app), vec!["1"]);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(ids(&app), vec!["1", "2"]);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn date_inputs_filter_once_both_parse() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('f'));
        type_str(&mut app, "2024-02-01");
        assert_eq!(ids(&app), vec!["1", "2"]);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.mode, AppMode::EndDate);
        type_str(&mut app, "2024-02-28x");
        assert_eq!(app.end_input, "2024-02-28");
        assert_eq!(ids(&app), vec!["2"]);

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('1'));
        assert!(app.start_input.is_empty() && app.end_input.is_empty());
        assert_eq!(ids(&app), vec!["1", "2"]);
    }

    #[test]
    fn search_is_refused_in_date_mode() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn block_key_marks_pending_once() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('b'));
        assert!(app.view.is_pending("2"));
        assert!(matches!(
            app.events.try_next_app(),
            Some(AppEvent::ToggleBlock(ref r)) if r.snap_id == "2" && !r.currently_blocked
        ));

        press(&mut app, KeyCode::Char('b'));
        assert!(app.events.try_next_app().is_none());

        app.handle_app_event(AppEvent::BlockToggled {
            snap_id: "2".into(),
            result: Ok(true),
        });
        assert!(!app.view.is_pending("2"));
        assert!(app.view.find("2").unwrap().is_blocked);
        assert!(!app.view.find("1").unwrap().is_blocked);
        assert_eq!(app.status_message.as_deref(), Some("Blocked snap 2"));
    }

    #[test]
    fn failed_toggle_reports_in_status_bar() {
        let mut app = app();
        press(&mut app, KeyCode::Char('b'));
        app.handle_app_event(AppEvent::BlockToggled {
            snap_id: "1".into(),
            result: Err(Arc::new("API error (status 500): boom".into())),
        });
        assert!(!app.view.find("1").unwrap().is_blocked);
        assert!(!app.view.is_pending("1"));
        assert!(app.status_message.unwrap().contains("boom"));
    }

    #[test]
    fn enter_opens_and_esc_closes_detail() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view.detail_snap().unwrap().id, "1");
        press(&mut app, KeyCode::Esc);
        assert!(!app.view.detail_open());
        assert!(app.running);
    }

    #[test]
    fn commands_drive_the_filter() {
        let mut app = app();
        press(&mut app, KeyCode::Char(':'));
        type_str(&mut app, "range 2024-01-01 2024-01-31");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view.filter.mode(), FilterMode::CreatedAt);
        assert_eq!(ids(&app), vec!["1"]);

        press(&mut app, KeyCode::Char(':'));
        type_str(&mut app, "search BYE");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view.filter.mode(), FilterMode::Message);
        assert_eq!(ids(&app), vec!["2"]);

        press(&mut app, KeyCode::Char(':'));
        type_str(&mut app, "bogus");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status_message.as_deref(), Some("Unknown command: bogus"));
    }

    #[test]
    fn quit_key_sends_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        let evt = app.events.try_next_app().unwrap();
        app.handle_app_event(evt);
        assert!(!app.running);
    }
}
