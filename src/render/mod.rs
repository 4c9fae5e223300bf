// Widget renderer.
// Turns a stored snapshot into a description of what the widget should draw.

pub mod palette;
pub mod text;

use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::feed::{KeywordEntry, WidgetSnapshot};

pub use palette::{RankColor, Rgb, Theme};

/// Most rows a widget can show.
pub const MAX_SLOTS: usize = 10;

pub const TITLE: &str = "Trendly";
pub const LOADING_MESSAGE: &str = "Loading trending keywords...";
const FALLBACK_ERROR_MESSAGE: &str = "Unable to load data";

/// Widget size, which decides how many rows are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl WidgetSize {
    pub fn slots(&self) -> usize {
        match self {
            WidgetSize::Small => 3,
            WidgetSize::Medium => 5,
            WidgetSize::Large => MAX_SLOTS,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WidgetSize::Small => "small",
            WidgetSize::Medium => "medium",
            WidgetSize::Large => "large",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            WidgetSize::Small => WidgetSize::Medium,
            WidgetSize::Medium => WidgetSize::Large,
            WidgetSize::Large => WidgetSize::Small,
        }
    }
}

/// One populated slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub rank_text: String,
    pub keyword: String,
    pub rank_color: RankColor,
    /// Id of the entry, carried for deep links.
    pub entry_id: i64,
}

impl Row {
    fn from_entry(entry: &KeywordEntry) -> Self {
        Self {
            rank_text: entry.rank.to_string(),
            keyword: entry.keyword.clone(),
            rank_color: RankColor::for_rank(entry.rank),
            entry_id: entry.id,
        }
    }

    /// Link that opens this keyword in the app.
    pub fn deep_link(&self) -> String {
        format!("trendly://keyword/{}", self.entry_id)
    }
}

/// Main body of the widget. Exactly one state is shown at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewBody {
    Empty { message: String },
    Error { message: String },
    Rows(Vec<Row>),
}

/// Everything the widget surface needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub title: &'static str,
    pub theme: Theme,
    pub body: ViewBody,
    /// Slots left unpopulated. These are hidden, not drawn blank.
    pub hidden_slots: usize,
    /// "MM/dd HH:mm" in local time, when the snapshot has a timestamp.
    pub updated_label: Option<String>,
}

impl ViewModel {
    pub fn rows(&self) -> &[Row] {
        match &self.body {
            ViewBody::Rows(rows) => rows,
            _ => &[],
        }
    }

    pub fn is_empty_state(&self) -> bool {
        matches!(self.body, ViewBody::Empty { .. })
    }

    pub fn is_error_state(&self) -> bool {
        matches!(self.body, ViewBody::Error { .. })
    }
}

/// Build the view for a snapshot.
///
/// `last_error` is the message of the most recent failed refresh. When present it
/// replaces the row list. `slots` is capped at [`MAX_SLOTS`].
pub fn render(
    snapshot: Option<&WidgetSnapshot>,
    last_error: Option<&str>,
    slots: usize,
    dark_mode: bool,
) -> ViewModel {
    let slots = slots.min(MAX_SLOTS);
    let updated_label = snapshot.and_then(|s| s.last_updated).map(format_updated);

    let body = match (last_error, snapshot) {
        (Some(message), _) => {
            let message = if message.trim().is_empty() {
                FALLBACK_ERROR_MESSAGE.to_string()
            } else {
                message.to_string()
            };
            ViewBody::Error { message }
        }
        (None, Some(snapshot)) if !snapshot.is_empty() => ViewBody::Rows(
            snapshot
                .entries
                .iter()
                .take(slots)
                .map(Row::from_entry)
                .collect(),
        ),
        (None, _) => ViewBody::Empty {
            message: LOADING_MESSAGE.to_string(),
        },
    };

    let populated = match &body {
        ViewBody::Rows(rows) => rows.len(),
        _ => 0,
    };

    ViewModel {
        title: TITLE,
        theme: Theme::for_mode(dark_mode),
        body,
        hidden_slots: slots - populated,
        updated_label,
    }
}

fn format_updated(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%m/%d %H:%M").to_string()
}
