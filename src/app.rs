// App state and main event loop.
// Redraws the widget from published state and handles keyboard input.

use std::io;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use tokio::sync::watch;

use crate::render::{ViewModel, WidgetSize};
use crate::state::{SchedulerHandle, WidgetState};
use crate::ui;

/// Main application state.
pub struct App<'a> {
    /// Widget size, which decides the number of slots.
    pub size: WidgetSize,
    pub dark_mode: bool,
    /// Selected row, if any.
    pub selected: Option<usize>,
    /// Latest status line message.
    pub status: Option<String>,
    /// Whether the app should exit.
    pub should_quit: bool,
    state_rx: watch::Receiver<WidgetState>,
    scheduler: &'a SchedulerHandle,
}

impl<'a> App<'a> {
    pub fn new(
        size: WidgetSize,
        dark_mode: bool,
        state_rx: watch::Receiver<WidgetState>,
        scheduler: &'a SchedulerHandle,
    ) -> Self {
        Self {
            size,
            dark_mode,
            selected: None,
            status: None,
            should_quit: false,
            state_rx,
            scheduler,
        }
    }

    /// Current view of the widget.
    pub fn view(&self) -> ViewModel {
        self.state_rx.borrow().view(self.size.slots(), self.dark_mode)
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            self.pick_up_state();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Note a newly published refresh result in the status line.
    fn pick_up_state(&mut self) {
        if !self.state_rx.has_changed().unwrap_or(false) {
            return;
        }
        let state = self.state_rx.borrow_and_update();
        let at = state
            .refreshed_at
            .map(|at| at.with_timezone(&Local).format(" at %H:%M").to_string())
            .unwrap_or_default();
        self.status = Some(match &state.last_error {
            Some(_) => format!("Refresh failed{}", at),
            None => format!("Refreshed{}", at),
        });
        drop(state);
        self.clamp_selection();
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => {
                self.status = Some(if self.scheduler.trigger_now() {
                    "Refreshing...".to_string()
                } else {
                    "Refresh already pending".to_string()
                });
            }
            KeyCode::Char('d') => self.dark_mode = !self.dark_mode,
            KeyCode::Char('s') => {
                self.size = self.size.next();
                self.clamp_selection();
            }
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Enter => self.open_selected(),
            _ => {}
        }
    }

    fn row_count(&self) -> usize {
        self.view().rows().len()
    }

    /// Select next row in list.
    fn select_next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    /// Select previous row in list.
    fn select_prev(&mut self) {
        if self.row_count() == 0 {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }

    /// Keep the selection inside the populated rows.
    fn clamp_selection(&mut self) {
        let len = self.row_count();
        self.selected = match self.selected {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => None,
        };
    }

    /// Show the deep link for the selected keyword.
    fn open_selected(&mut self) {
        let view = self.view();
        if let Some(row) = self.selected.and_then(|i| view.rows().get(i)) {
            tracing::info!(
                event = "widget.keyword_opened",
                keyword_id = row.entry_id,
                "Keyword selected"
            );
            self.status = Some(format!("Open {} ({})", row.deep_link(), row.keyword));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::state::refresh::tests::{ScriptedFetch, entries};
    use crate::state::{Refresher, Trigger, scheduler};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_navigation_and_deep_link() {
        let refresher = Arc::new(Refresher::new(
            ScriptedFetch::new(vec![Ok(entries(5))]),
            MemoryStore::new(),
        ));
        refresher.refresh(Trigger::Manual).await;
        let handle = scheduler::spawn(refresher.clone(), Duration::from_secs(3600), false);

        let mut app = App::new(WidgetSize::Small, false, refresher.subscribe(), &handle);
        assert_eq!(app.view().rows().len(), 3);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.selected, Some(2));

        app.handle_key(KeyCode::Enter);
        assert_eq!(
            app.status.as_deref(),
            Some("Open trendly://keyword/3 (kw3)")
        );

        app.handle_key(KeyCode::Up);
        assert_eq!(app.selected, Some(1));

        app.handle_key(KeyCode::Char('s'));
        assert_eq!(app.size, WidgetSize::Medium);
        assert_eq!(app.view().rows().len(), 5);

        app.handle_key(KeyCode::Char('d'));
        assert!(app.dark_mode);

        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_manual_refresh_key() {
        let refresher = Arc::new(Refresher::new(ScriptedFetch::default(), MemoryStore::new()));
        let mut rx = refresher.subscribe();
        let handle = scheduler::spawn(refresher.clone(), Duration::from_secs(3600), false);

        let mut app = App::new(WidgetSize::Medium, false, refresher.subscribe(), &handle);
        assert!(app.view().is_empty_state());

        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.status.as_deref(), Some("Refreshing..."));

        rx.changed().await.unwrap();
        app.pick_up_state();
        assert!(app.status.as_deref().unwrap().starts_with("Refreshed at "));
        assert_eq!(app.view().rows().len(), 1);

        drop(app);
        handle.shutdown().await;
    }
}
