//! DemoSequencer - Category/Item Demo State Machine
//!
//! Walks a [`DemoCatalog`] item by item:
//!
//! ```text
//! Typing(0) ──tick×N──▶ Loading ──loading_delay──▶ ShowingResult ──hold──▶ advance()
//!     ▲                                                                   │
//!     └──────────────── next item / next category / wrap ─────────────────┘
//! ```
//!
//! The hold is whatever is left of `progress_duration` once typing and
//! loading are done, so an item takes `progress_duration` whenever the text
//! fits. Every item change issues a fresh ticket; callbacks carrying an older
//! ticket are ignored.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::domain::catalog::{DemoCatalog, Item};
use crate::domain::config::InteractiveAnimations;
use crate::error::{Error, Result};
use crate::eventing::AppEvent;
use crate::sequencer::timer::{TicketIssuer, Timeline, TimerRequest, TimerTicket};
use crate::sequencer::timing::{EndOfCatalog, SequencerTiming};

/// Phase within one item's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing { revealed: usize },
    Loading,
    ShowingResult,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Typing { .. } => "typing",
            Phase::Loading => "loading",
            Phase::ShowingResult => "showing-result",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerPosition {
    pub category_index: usize,
    pub item_index: usize,
    pub phase: Phase,
}

impl SequencerPosition {
    fn origin() -> Self {
        Self {
            category_index: 0,
            item_index: 0,
            phase: Phase::Typing { revealed: 0 },
        }
    }
}

/// What the sequencer is playing
#[derive(Debug, Clone)]
enum Content {
    Empty { reason: String },
    Ready(DemoCatalog),
}

/// Timer-driven demo sequencer
#[derive(Debug)]
pub struct DemoSequencer {
    content: Content,
    timing: SequencerTiming,
    position: SequencerPosition,
    completed: HashSet<String>,
    /// Logical time spent on the current item
    item_elapsed: Duration,
    halted: bool,
    timers: TicketIssuer,
    events: Vec<AppEvent>,
}

impl DemoSequencer {
    /// Sequencer over a validated catalog; call [`Timeline::start`] to begin
    pub fn new(catalog: DemoCatalog, timing: SequencerTiming) -> Self {
        Self {
            content: Content::Ready(catalog),
            timing,
            position: SequencerPosition::origin(),
            completed: HashSet::new(),
            item_elapsed: Duration::ZERO,
            halted: false,
            timers: TicketIssuer::default(),
            events: Vec::new(),
        }
    }

    /// Sequencer in the "nothing to show" state
    pub fn without_content(reason: impl Into<String>, timing: SequencerTiming) -> Self {
        let mut sequencer = Self::new_empty(timing);
        sequencer.clear_catalog(reason);
        sequencer
    }

    /// Sequencer from a catalog build result; errors become "no content"
    pub fn from_catalog_result(catalog: Result<DemoCatalog>, timing: SequencerTiming) -> Self {
        match catalog {
            Ok(catalog) => Self::new(catalog, timing),
            Err(e) => Self::without_content(e.to_string(), timing),
        }
    }

    fn new_empty(timing: SequencerTiming) -> Self {
        Self {
            content: Content::Empty {
                reason: String::new(),
            },
            timing,
            position: SequencerPosition::origin(),
            completed: HashSet::new(),
            item_elapsed: Duration::ZERO,
            halted: false,
            timers: TicketIssuer::default(),
            events: Vec::new(),
        }
    }

    // ==================== Getters ====================

    pub fn catalog(&self) -> Option<&DemoCatalog> {
        match &self.content {
            Content::Ready(catalog) => Some(catalog),
            Content::Empty { .. } => None,
        }
    }

    /// Why there is nothing to play, if so
    pub fn no_content_reason(&self) -> Option<&str> {
        match &self.content {
            Content::Empty { reason } => Some(reason),
            Content::Ready(_) => None,
        }
    }

    pub fn timing(&self) -> &SequencerTiming {
        &self.timing
    }

    /// Current position, `None` when there is no content
    pub fn position(&self) -> Option<SequencerPosition> {
        self.catalog().map(|_| self.position)
    }

    pub fn phase(&self) -> Option<Phase> {
        self.position().map(|p| p.phase)
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.catalog()?
            .item(self.position.category_index, self.position.item_index)
    }

    /// Portion of the display text currently visible
    pub fn displayed_text(&self) -> &str {
        let Some(item) = self.current_item() else {
            return "";
        };
        match self.position.phase {
            Phase::Typing { revealed } => item.display_prefix(revealed),
            Phase::Loading | Phase::ShowingResult => &item.display,
        }
    }

    pub fn is_completed(&self, category_id: &str) -> bool {
        self.completed.contains(category_id)
    }

    pub fn completed_categories(&self) -> &HashSet<String> {
        &self.completed
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Logical time since the current item entered `Typing(0)`
    pub fn item_elapsed(&self) -> Duration {
        self.item_elapsed
    }

    /// Fraction of `progress_duration` already spent on this item
    pub fn progress(&self) -> f64 {
        let total = self.timing.progress_duration.as_secs_f64();
        if total <= 0.0 {
            return 1.0;
        }
        (self.item_elapsed.as_secs_f64() / total).min(1.0)
    }

    pub fn has_pending_timer(&self) -> bool {
        self.timers.is_pending()
    }

    /// Drain events produced since the last call
    pub fn take_events(&mut self) -> Vec<AppEvent> {
        std::mem::take(&mut self.events)
    }

    // ==================== Transitions ====================

    /// Replace the catalog, resetting position and completion
    pub fn set_catalog(&mut self, catalog: DemoCatalog) -> Option<TimerRequest> {
        info!(
            categories = catalog.len(),
            items = catalog.item_count(),
            "Sequencer catalog replaced"
        );
        self.content = Content::Ready(catalog);
        self.reset_progress();
        self.start()
    }

    /// Retime from edited animations; the pending timer keeps its delay
    pub fn set_animations(&mut self, animations: &InteractiveAnimations) {
        self.timing = self.timing.with_animations(animations);
        debug!(
            typing_speed_ms = animations.typing_speed,
            progress_duration_ms = animations.progress_duration,
            "Sequencer timing updated"
        );
    }

    /// Drop the catalog and show "no content"
    pub fn clear_catalog(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        info!(reason = %reason, "Sequencer has no content");
        self.content = Content::Empty {
            reason: reason.clone(),
        };
        self.reset_progress();
        self.events.push(AppEvent::NoContent { reason });
    }

    /// Jump to the first item of category `index`
    pub fn select_category(&mut self, index: usize) -> Result<TimerRequest> {
        let len = match &self.content {
            Content::Ready(catalog) => catalog.len(),
            Content::Empty { reason } => {
                return Err(Error::EmptyCatalog {
                    detail: reason.clone(),
                });
            }
        };
        if index >= len {
            return Err(Error::InvalidCategory { index, len });
        }

        debug!(category_index = index, "Category selected");
        self.position.category_index = index;
        self.position.item_index = 0;
        self.halted = false;
        self.enter_item().ok_or_else(|| Error::EmptyCatalog {
            detail: "catalog became empty".to_string(),
        })
    }

    /// Move to the next item, category, or past the end
    pub fn advance(&mut self) -> Option<TimerRequest> {
        let Content::Ready(catalog) = &self.content else {
            return None;
        };

        let SequencerPosition {
            category_index,
            item_index,
            ..
        } = self.position;
        let category = catalog.category(category_index)?;
        let category_len = category.items.len();
        let category_count = catalog.len();

        if item_index + 1 < category_len {
            self.position.item_index += 1;
            return self.enter_item();
        }

        if self.completed.insert(category.id.clone()) {
            info!(category = %category.id, "Category completed");
        }
        self.events.push(AppEvent::CategoryCompleted {
            category_id: category.id.clone(),
        });

        if category_index + 1 < category_count {
            self.position.category_index += 1;
            self.position.item_index = 0;
            return self.enter_item();
        }

        match self.timing.end_of_catalog {
            EndOfCatalog::Loop => {
                debug!("End of catalog, looping");
                self.position.category_index = 0;
                self.position.item_index = 0;
                self.events.push(AppEvent::CatalogWrapped);
                self.enter_item()
            }
            EndOfCatalog::Halt => {
                info!("End of catalog, halting");
                self.halted = true;
                self.timers.cancel();
                self.events.push(AppEvent::Halted);
                None
            }
        }
    }

    fn reset_progress(&mut self) {
        self.position = SequencerPosition::origin();
        self.completed.clear();
        self.item_elapsed = Duration::ZERO;
        self.halted = false;
        self.timers.cancel();
    }

    /// Enter `Typing(0)` on the current position
    fn enter_item(&mut self) -> Option<TimerRequest> {
        let item = self.current_item()?.clone();
        let category_id = self
            .catalog()?
            .category(self.position.category_index)?
            .id
            .clone();

        self.position.phase = Phase::Typing { revealed: 0 };
        self.item_elapsed = Duration::ZERO;

        debug!(
            category = %category_id,
            item = %item.id,
            "Item started"
        );
        self.events.push(AppEvent::ItemStarted {
            category_index: self.position.category_index,
            item_index: self.position.item_index,
            category_id,
            item_id: item.id.clone(),
            media: item.initial_media.clone(),
        });

        Some(self.timers.issue(self.timing.typing_speed))
    }

    fn on_typing_tick(&mut self, revealed: usize) -> Option<TimerRequest> {
        let item = self.current_item()?;
        let total = item.display_len();
        let revealed = (revealed + 1).min(total);
        let text = item.display_prefix(revealed).to_string();

        self.position.phase = Phase::Typing { revealed };
        self.events.push(AppEvent::TextRevealed {
            text,
            revealed,
            total,
        });

        if revealed < total {
            return Some(self.timers.issue(self.timing.typing_speed));
        }

        self.position.phase = Phase::Loading;
        self.events.push(AppEvent::PhaseChanged {
            phase: Phase::Loading,
        });
        Some(self.timers.issue(self.timing.loading_delay))
    }

    fn on_loading_done(&mut self) -> Option<TimerRequest> {
        let item = self.current_item()?;
        let result = item.result.clone();
        let media = item.result_media.clone();

        self.position.phase = Phase::ShowingResult;
        self.events.push(AppEvent::PhaseChanged {
            phase: Phase::ShowingResult,
        });
        self.events.push(AppEvent::ResultShown { result, media });

        let hold = self.timing.result_hold(self.item_elapsed);
        Some(self.timers.issue(hold))
    }
}

impl Timeline for DemoSequencer {
    fn start(&mut self) -> Option<TimerRequest> {
        if self.catalog().is_none() {
            if let Some(reason) = self.no_content_reason() {
                let reason = reason.to_string();
                self.events.push(AppEvent::NoContent { reason });
            }
            return None;
        }
        self.halted = false;
        self.enter_item()
    }

    fn on_timer(&mut self, ticket: TimerTicket) -> Option<TimerRequest> {
        if self.halted {
            return None;
        }
        let Some(delay) = self.timers.redeem(ticket) else {
            trace!(?ticket, "Ignoring stale timer");
            return None;
        };
        self.item_elapsed += delay;

        match self.position.phase {
            Phase::Typing { revealed } => self.on_typing_tick(revealed),
            Phase::Loading => self.on_loading_done(),
            Phase::ShowingResult => self.advance(),
        }
    }
}
