use std::collections::VecDeque;

use chrono::Local;

use crate::error::BrowseError;
use crate::filter::FilterField;
use crate::navigation::Navigation;
use crate::routes::{Request, Route};
use crate::views::{Page, ViewKind};

const MAX_LOGS: usize = 200;

/// User intents from the terminal browser, before they become requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Show(ViewKind),
    GoTo(ViewKind),
    Reset,
    Detailed,
    Login,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInput {
    pub field: FilterField,
    pub buffer: String,
}

#[derive(Debug)]
pub struct AppState {
    pub view: ViewKind,
    pub page: Option<Page>,
    pub selected: usize,
    pub status: Option<String>,
    pub input: Option<PendingInput>,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view: ViewKind::Players,
            page: None,
            selected: 0,
            status: None,
            input: None,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Request for `action` issued from the current view, if it makes sense here.
    pub fn request_for(&self, action: Action) -> Option<Request> {
        let route = match action {
            Action::Show(view) => Route::Compare(view),
            Action::GoTo(target) => Route::Navigate(Navigation::new(target, self.view)?),
            Action::Reset => Route::Reset(self.view),
            Action::Detailed => Route::Detailed(self.view),
            Action::Login => Route::Login,
        };
        Some(Request::get(route.path()))
    }

    pub fn begin_input(&mut self, field: FilterField) {
        self.input = Some(PendingInput {
            field,
            buffer: String::new(),
        });
    }

    pub fn input_char(&mut self, ch: char) {
        if let Some(input) = self.input.as_mut() {
            input.buffer.push(ch);
        }
    }

    pub fn input_backspace(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.buffer.pop();
        }
    }

    pub fn cancel_input(&mut self) {
        self.input = None;
    }

    /// Closes the prompt and turns it into the filter form post.
    pub fn submit_input(&mut self) -> Option<Request> {
        let input = self.input.take()?;
        let route = Route::AddFilter(input.field);
        Some(Request::post(route.path(), input.buffer))
    }

    pub fn apply_page(&mut self, page: Page) {
        self.view = page.kind();
        self.push_log(format!(
            "[INFO] {}: {} rows via {}{}",
            self.view.label(),
            page.len(),
            page.branch(),
            if page.extended() { " (detailed)" } else { "" }
        ));
        self.selected = self.selected.min(page.len().saturating_sub(1));
        self.status = None;
        self.page = Some(page);
    }

    pub fn apply_error(&mut self, err: &BrowseError) {
        let level = match err {
            BrowseError::Validation { .. } | BrowseError::Unauthorized => "WARN",
            _ => "ERROR",
        };
        self.push_log(format!("[{level}] {} ({})", err, err.status_code()));
        self.status = Some(err.to_string());
    }

    pub fn row_count(&self) -> usize {
        self.page.as_ref().map(Page::len).unwrap_or(0)
    }

    pub fn select_next(&mut self) {
        let total = self.row_count();
        if total > 0 && self.selected + 1 < total {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}
