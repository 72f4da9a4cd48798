//! AppEvent - Application Event Enum
//!
//! Everything the sequencer player reports to the rendering side.

use crate::domain::media::MediaRef;
use crate::sequencer::Phase;

/// Sequencer events for player -> renderer communication
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A new item entered `Typing(0)`
    ItemStarted {
        category_index: usize,
        item_index: usize,
        category_id: String,
        item_id: String,
        media: Option<MediaRef>,
    },

    /// One more character of the display text is visible
    TextRevealed { text: String, revealed: usize, total: usize },

    /// Phase changed within the current item
    PhaseChanged { phase: Phase },

    /// Loading finished, the result is on screen
    ResultShown {
        result: String,
        media: Option<MediaRef>,
    },

    /// Every item of a category has been shown
    CategoryCompleted { category_id: String },

    /// Last category finished and playback restarted at the first one
    CatalogWrapped,

    /// Last category finished and playback stopped
    Halted,

    /// Nothing to play
    NoContent { reason: String },
}

impl AppEvent {
    /// Short label for logging
    pub fn label(&self) -> &'static str {
        match self {
            AppEvent::ItemStarted { .. } => "item-started",
            AppEvent::TextRevealed { .. } => "text-revealed",
            AppEvent::PhaseChanged { .. } => "phase-changed",
            AppEvent::ResultShown { .. } => "result-shown",
            AppEvent::CategoryCompleted { .. } => "category-completed",
            AppEvent::CatalogWrapped => "catalog-wrapped",
            AppEvent::Halted => "halted",
            AppEvent::NoContent { .. } => "no-content",
        }
    }

    /// Whether playback will not produce further events on its own
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppEvent::Halted | AppEvent::NoContent { .. })
    }
}
