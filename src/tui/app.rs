use crate::cache::{CachedPage, FetchStatus, QueryKey, SearchCache};
use crate::catalog::{CatalogClient, Movie, SearchPage};
use crate::controller::SearchController;
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Messages from background fetch threads
pub enum BgMessage {
    SearchComplete(QueryKey, crate::Result<SearchPage>),
}

/// Search input state
pub struct SearchInput {
    pub text: String,
    pub cursor_pos: usize,
    pub focused: bool,
}

impl Default for SearchInput {
    fn default() -> Self {
        Self {
            text: String::new(),
            cursor_pos: 0,
            focused: true,
        }
    }
}

/// Cursor and scroll state of the results grid
pub struct GridState {
    pub cursor: Option<usize>,
    pub scroll_offset: usize,
    pub visible_rows: usize,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            cursor: None,
            scroll_offset: 0,
            visible_rows: 20,
        }
    }
}

impl GridState {
    pub fn reset(&mut self) {
        self.cursor = None;
        self.scroll_offset = 0;
    }

    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = match self.cursor {
            Some(i) => (i + 1).min(total - 1),
            None => 0,
        };
        self.cursor = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_prev(&mut self) {
        let i = match self.cursor {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.cursor = Some(i);
        self.ensure_visible(i);
    }

    pub fn page_down(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let jump = self.visible_rows.saturating_sub(1);
        let i = match self.cursor {
            Some(i) => (i + jump).min(total - 1),
            None => jump.min(total - 1),
        };
        self.cursor = Some(i);
        self.ensure_visible(i);
    }

    pub fn page_up(&mut self) {
        let jump = self.visible_rows.saturating_sub(1);
        let i = self.cursor.map(|i| i.saturating_sub(jump)).unwrap_or(0);
        self.cursor = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_first(&mut self) {
        self.cursor = Some(0);
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.cursor = Some(total - 1);
        self.ensure_visible(total - 1);
    }

    fn ensure_visible(&mut self, index: usize) {
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if self.visible_rows > 0 && index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = index - self.visible_rows + 1;
        }
    }
}

/// Transient notification drawn over the UI
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
}

impl Toast {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            expires_at: Instant::now() + Duration::from_millis(2500),
        }
    }
}

pub struct App {
    // State machine and orchestration
    pub controller: SearchController,
    cache: SearchCache,
    client: CatalogClient,

    // Widget state
    pub input: SearchInput,
    pub grid: GridState,

    // Display state, derived from the cache once per tick
    pub shown: Option<CachedPage>,
    pub status: FetchStatus,
    pub last_error: Option<String>,
    pub toast: Option<Toast>,
    notified_generation: Option<u64>,

    // Channel
    bg_sender: Sender<BgMessage>,
    bg_receiver: Receiver<BgMessage>,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    pub fn new(client: CatalogClient) -> Self {
        let (tx, rx) = channel();

        Self {
            controller: SearchController::new(),
            cache: SearchCache::new(),
            client,
            input: SearchInput::default(),
            grid: GridState::default(),
            shown: None,
            status: FetchStatus::Idle,
            last_error: None,
            toast: None,
            notified_generation: None,
            bg_sender: tx,
            bg_receiver: rx,
            should_quit: false,
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();
        self.refresh();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(Event::Key(key)) = event::read() {
                    self.handle_key(key);
                    self.refresh();
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.process_messages();
                self.refresh();
                last_tick = Instant::now();
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Results currently on screen (possibly the previous page while the
    /// next one is in flight)
    pub fn results(&self) -> &[Movie] {
        self.shown
            .as_ref()
            .map(|s| s.page.results.as_slice())
            .unwrap_or(&[])
    }

    /// Page count of the displayed result, 0 while nothing is known
    pub fn total_pages(&self) -> u32 {
        self.shown.as_ref().map(|s| s.page.total_pages).unwrap_or(0)
    }

    pub fn total_results(&self) -> u32 {
        self.shown
            .as_ref()
            .map(|s| s.page.total_results)
            .unwrap_or(0)
    }

    fn process_messages(&mut self) {
        while let Ok(msg) = self.bg_receiver.try_recv() {
            match msg {
                BgMessage::SearchComplete(key, result) => {
                    if let Err(err) = &result {
                        self.last_error = Some(err.to_string());
                    }
                    self.cache.complete(key, result);
                }
            }
        }
    }

    /// Re-derive display state from controller + cache, spawning a fetch
    /// when the cache asks for one.
    fn refresh(&mut self) {
        let key = self.controller.key();
        let obs = self.cache.observe(&key, self.controller.fetch_enabled());

        if obs.needs_fetch {
            self.spawn_fetch(key);
        }

        // One toast per distinct empty response, keyed by generation.
        if obs.status == FetchStatus::Success {
            if let Some(shown) = &obs.data {
                if shown.page.results.is_empty()
                    && self.notified_generation != Some(shown.generation)
                {
                    self.notified_generation = Some(shown.generation);
                    self.toast = Some(Toast::new("No movies found for your request."));
                }
            }
        }

        self.status = obs.status;
        self.shown = obs.data;

        let count = self.results().len();
        if count == 0 {
            self.grid.cursor = None;
        } else {
            let cursor = self.grid.cursor.unwrap_or(0).min(count - 1);
            self.grid.cursor = Some(cursor);
            self.grid.ensure_visible(cursor);
        }

        if let Some(toast) = &self.toast {
            if Instant::now() >= toast.expires_at {
                self.toast = None;
            }
        }
    }

    fn spawn_fetch(&self, key: QueryKey) {
        let client = self.client.clone();
        let tx = self.bg_sender.clone();

        thread::spawn(move || {
            tracing::debug!(query = %key.query, page = key.page, "fetch thread started");
            let result = client.search(&key.query, key.page);
            let _ = tx.send(BgMessage::SearchComplete(key, result));
        });
    }

    fn step_page(&mut self, delta: i64) {
        let total_pages = self.total_pages();
        if total_pages <= 1 {
            return;
        }
        let target = self.controller.page() as i64 + delta;
        if target >= 1 {
            self.controller.change_page(target as u32, total_pages);
        }
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Global keys
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc => {
                if self.controller.selected().is_some() {
                    self.controller.deselect();
                } else if self.input.focused && !self.input.text.is_empty() {
                    self.input.text.clear();
                    self.input.cursor_pos = 0;
                } else if self.input.focused {
                    self.input.focused = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            _ => {}
        }

        if self.controller.selected().is_some() {
            self.handle_overlay_key(key);
        } else if self.input.focused {
            self.handle_search_key(key);
        } else {
            self.handle_grid_key(key);
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('o') => {
                if let Some(movie) = self.controller.selected() {
                    let _ = open::that(movie.catalog_url());
                }
            }
            // Paging stays available under the overlay; it does not close it.
            KeyCode::Left => self.step_page(-1),
            KeyCode::Right => self.step_page(1),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                self.input.text.insert(self.input.cursor_pos, c);
                self.input.cursor_pos += c.len_utf8();
            }
            KeyCode::Backspace => {
                if self.input.cursor_pos > 0 {
                    // Find the previous character boundary
                    let prev = self.input.text[..self.input.cursor_pos]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    self.input.text.remove(prev);
                    self.input.cursor_pos = prev;
                }
            }
            KeyCode::Delete => {
                if self.input.cursor_pos < self.input.text.len() {
                    self.input.text.remove(self.input.cursor_pos);
                }
            }
            KeyCode::Left => {
                if self.input.cursor_pos > 0 {
                    let prev = self.input.text[..self.input.cursor_pos]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    self.input.cursor_pos = prev;
                }
            }
            KeyCode::Right => {
                if self.input.cursor_pos < self.input.text.len() {
                    let next = self.input.text[self.input.cursor_pos..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.input.cursor_pos + i)
                        .unwrap_or(self.input.text.len());
                    self.input.cursor_pos = next;
                }
            }
            KeyCode::Home => {
                self.input.cursor_pos = 0;
            }
            KeyCode::End => {
                self.input.cursor_pos = self.input.text.len();
            }
            KeyCode::Enter => {
                self.controller.submit(&self.input.text);
                self.last_error = None;
                self.grid.reset();
                self.input.focused = false;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.input.focused = false;
            }
            _ => {}
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent) {
        let total = self.results().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.grid.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.grid.select_next(total),
            KeyCode::PageUp => self.grid.page_up(),
            KeyCode::PageDown => self.grid.page_down(total),
            KeyCode::Home => self.grid.select_first(),
            KeyCode::End => self.grid.select_last(total),

            KeyCode::Enter => {
                let movie = self
                    .grid
                    .cursor
                    .and_then(|i| self.results().get(i).cloned());
                if let Some(movie) = movie {
                    self.controller.select(movie);
                }
            }

            KeyCode::Left | KeyCode::Char('p') => self.step_page(-1),
            KeyCode::Right | KeyCode::Char('n') => self.step_page(1),

            KeyCode::Tab | KeyCode::Char('/') => {
                self.input.focused = true;
            }

            // Any other printable char focuses search and types it
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.focused = true;
                self.input.text.push(c);
                self.input.cursor_pos = self.input.text.len();
            }

            _ => {}
        }
    }
}
