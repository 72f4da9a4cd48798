//! Typewriters for the terminal, menu and interactive widgets
//!
//! [`LoopTypewriter`] types, holds, deletes and moves on forever.
//! [`EnterGatedTypewriter`] types one query of the selected category and
//! waits for Enter before the next one.

use std::time::Duration;

use tracing::debug;

use crate::constants::{ENTER_PRESS_MS, TYPEWRITER_HOLD_MS};
use crate::domain::catalog::DemoCatalog;
use crate::domain::config::{InteractiveAnimations, TerminalConfig, TypewriterMenuConfig};
use crate::error::{Error, Result};
use crate::sequencer::timer::{TicketIssuer, Timeline, TimerRequest, TimerTicket};

fn prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

// ==================== Loop Typewriter ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Typing,
    Holding,
    Deleting,
}

/// Type → hold → delete → next, wrapping
#[derive(Debug)]
pub struct LoopTypewriter {
    items: Vec<String>,
    typing_speed: Duration,
    delete_speed: Duration,
    hold: Duration,
    index: usize,
    revealed: usize,
    phase: LoopPhase,
    timers: TicketIssuer,
}

impl LoopTypewriter {
    pub fn new(items: Vec<String>, typing_speed: Duration, delete_speed: Duration) -> Self {
        Self {
            items,
            typing_speed,
            delete_speed,
            hold: Duration::from_millis(TYPEWRITER_HOLD_MS),
            index: 0,
            revealed: 0,
            phase: LoopPhase::Typing,
            timers: TicketIssuer::default(),
        }
    }

    /// Terminal prompt commands
    pub fn from_terminal(config: &TerminalConfig) -> Self {
        Self::new(
            config.commands.clone(),
            Duration::from_millis(config.typing_speed),
            Duration::from_millis(config.delete_speed),
        )
    }

    /// Typewriter menu entries
    pub fn from_menu(config: &TypewriterMenuConfig) -> Self {
        Self::new(
            config.items.iter().map(|item| item.text.clone()).collect(),
            Duration::from_millis(config.animations.typing_speed),
            Duration::from_millis(config.animations.delete_speed),
        )
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn text(&self) -> &str {
        self.items
            .get(self.index)
            .map_or("", |item| prefix(item, self.revealed))
    }

    fn current_len(&self) -> usize {
        self.items.get(self.index).map_or(0, |item| item.chars().count())
    }

    fn begin_typing(&mut self) -> TimerRequest {
        self.revealed = 0;
        if self.current_len() == 0 {
            self.phase = LoopPhase::Holding;
            return self.timers.issue(self.hold);
        }
        self.phase = LoopPhase::Typing;
        self.timers.issue(self.typing_speed)
    }
}

impl Timeline for LoopTypewriter {
    fn start(&mut self) -> Option<TimerRequest> {
        if self.items.is_empty() {
            return None;
        }
        self.index = 0;
        Some(self.begin_typing())
    }

    fn on_timer(&mut self, ticket: TimerTicket) -> Option<TimerRequest> {
        self.timers.redeem(ticket)?;
        let request = match self.phase {
            LoopPhase::Typing => {
                self.revealed += 1;
                if self.revealed >= self.current_len() {
                    self.phase = LoopPhase::Holding;
                    self.timers.issue(self.hold)
                } else {
                    self.timers.issue(self.typing_speed)
                }
            }
            LoopPhase::Holding => {
                if self.revealed == 0 {
                    self.index = (self.index + 1) % self.items.len();
                    self.begin_typing()
                } else {
                    self.phase = LoopPhase::Deleting;
                    self.timers.issue(self.delete_speed)
                }
            }
            LoopPhase::Deleting => {
                self.revealed = self.revealed.saturating_sub(1);
                if self.revealed == 0 {
                    self.index = (self.index + 1) % self.items.len();
                    self.begin_typing()
                } else {
                    self.timers.issue(self.delete_speed)
                }
            }
        };
        Some(request)
    }
}

// ==================== Enter-Gated Typewriter ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    Typing,
    AwaitingEnter { hint_visible: bool },
    /// Enter key press animation
    Pressing,
}

/// Types one query, then waits for Enter
#[derive(Debug)]
pub struct EnterGatedTypewriter {
    catalog: DemoCatalog,
    typing_speed: Duration,
    hint_delay: Duration,
    category_index: usize,
    item_index: usize,
    revealed: usize,
    phase: GatePhase,
    timers: TicketIssuer,
}

impl EnterGatedTypewriter {
    pub fn new(catalog: DemoCatalog, animations: &InteractiveAnimations) -> Self {
        Self {
            catalog,
            typing_speed: Duration::from_millis(animations.typing_speed),
            hint_delay: Duration::from_millis(animations.enter_hint_delay),
            category_index: 0,
            item_index: 0,
            revealed: 0,
            phase: GatePhase::Typing,
            timers: TicketIssuer::default(),
        }
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    pub fn category_index(&self) -> usize {
        self.category_index
    }

    pub fn item_index(&self) -> usize {
        self.item_index
    }

    pub fn text(&self) -> &str {
        self.catalog
            .item(self.category_index, self.item_index)
            .map_or("", |item| item.display_prefix(self.revealed))
    }

    /// Whether the Enter key is currently accepted
    pub fn accepts_enter(&self) -> bool {
        matches!(self.phase, GatePhase::AwaitingEnter { .. })
    }

    pub fn press_enter(&mut self) -> Option<TimerRequest> {
        if !self.accepts_enter() {
            return None;
        }
        self.phase = GatePhase::Pressing;
        Some(self.timers.issue(Duration::from_millis(ENTER_PRESS_MS)))
    }

    /// Switch category and restart at its first query
    pub fn select_category(&mut self, index: usize) -> Result<TimerRequest> {
        let len = self.catalog.len();
        if index >= len {
            return Err(Error::InvalidCategory { index, len });
        }
        debug!(category_index = index, "Typewriter category selected");
        self.category_index = index;
        self.item_index = 0;
        Ok(self.begin_typing())
    }

    fn begin_typing(&mut self) -> TimerRequest {
        self.revealed = 0;
        self.phase = GatePhase::Typing;
        self.timers.issue(self.typing_speed)
    }

    fn category_len(&self) -> usize {
        self.catalog
            .category(self.category_index)
            .map_or(1, |category| category.items.len())
    }
}

impl Timeline for EnterGatedTypewriter {
    fn start(&mut self) -> Option<TimerRequest> {
        self.category_index = 0;
        self.item_index = 0;
        Some(self.begin_typing())
    }

    fn on_timer(&mut self, ticket: TimerTicket) -> Option<TimerRequest> {
        self.timers.redeem(ticket)?;
        match self.phase {
            GatePhase::Typing => {
                let total = self
                    .catalog
                    .item(self.category_index, self.item_index)
                    .map_or(0, |item| item.display_len());
                self.revealed = (self.revealed + 1).min(total);
                if self.revealed < total {
                    return Some(self.timers.issue(self.typing_speed));
                }
                self.phase = GatePhase::AwaitingEnter {
                    hint_visible: false,
                };
                Some(self.timers.issue(self.hint_delay))
            }
            GatePhase::AwaitingEnter { .. } => {
                self.phase = GatePhase::AwaitingEnter { hint_visible: true };
                None
            }
            GatePhase::Pressing => {
                self.item_index = (self.item_index + 1) % self.category_len();
                Some(self.begin_typing())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::tests::two_category_catalog;

    fn run_until<T: Timeline>(
        machine: &mut T,
        mut request: TimerRequest,
        mut done: impl FnMut(&T) -> bool,
    ) -> Option<TimerRequest> {
        for _ in 0..1000 {
            if done(machine) {
                return Some(request);
            }
            request = machine.on_timer(request.ticket)?;
        }
        None
    }

    #[test]
    fn loop_typewriter_types_holds_deletes_and_wraps() {
        let mut typewriter = LoopTypewriter::new(
            vec!["ab".to_string(), "c".to_string()],
            Duration::from_millis(75),
            Duration::from_millis(50),
        );
        let request = typewriter.start().expect("timer");
        assert_eq!(request.delay, Duration::from_millis(75));

        let request = run_until(&mut typewriter, request, |t| t.phase() == LoopPhase::Holding)
            .expect("holding");
        assert_eq!(typewriter.text(), "ab");
        assert_eq!(request.delay, Duration::from_millis(TYPEWRITER_HOLD_MS));

        let request = typewriter.on_timer(request.ticket).expect("deleting");
        assert_eq!(typewriter.phase(), LoopPhase::Deleting);
        let request = typewriter.on_timer(request.ticket).expect("delete");
        assert_eq!(typewriter.text(), "a");
        typewriter.on_timer(request.ticket).expect("next item");
        assert_eq!(typewriter.index(), 1);
        assert_eq!(typewriter.text(), "");
        assert_eq!(typewriter.phase(), LoopPhase::Typing);
    }

    #[test]
    fn loop_typewriter_wraps_to_first_item() {
        let mut typewriter = LoopTypewriter::from_terminal(&TerminalConfig {
            commands: vec!["x".to_string()],
            ..TerminalConfig::default()
        });
        let request = typewriter.start().expect("timer");
        let request = run_until(&mut typewriter, request, |t| t.phase() == LoopPhase::Deleting)
            .expect("deleting");
        typewriter.on_timer(request.ticket).expect("wrapped");
        assert_eq!(typewriter.index(), 0);
        assert_eq!(typewriter.phase(), LoopPhase::Typing);
    }

    #[test]
    fn loop_typewriter_without_items_is_idle() {
        let mut typewriter = LoopTypewriter::from_menu(&TypewriterMenuConfig {
            items: Vec::new(),
            ..TypewriterMenuConfig::default()
        });
        assert_eq!(typewriter.start(), None);
        assert_eq!(typewriter.text(), "");
    }

    #[test]
    fn enter_gated_waits_for_enter() {
        let mut typewriter =
            EnterGatedTypewriter::new(two_category_catalog(), &InteractiveAnimations::default());
        let request = typewriter.start().expect("timer");
        assert_eq!(typewriter.press_enter(), None);

        let request = run_until(&mut typewriter, request, |t| t.accepts_enter()).expect("typed");
        assert_eq!(typewriter.text(), "ab");
        assert_eq!(request.delay, Duration::from_millis(500));

        assert_eq!(typewriter.on_timer(request.ticket), None);
        assert_eq!(
            typewriter.phase(),
            GatePhase::AwaitingEnter { hint_visible: true }
        );

        let press = typewriter.press_enter().expect("press");
        assert_eq!(press.delay, Duration::from_millis(ENTER_PRESS_MS));
        typewriter.on_timer(press.ticket).expect("next query");
        assert_eq!(typewriter.item_index(), 1);
        assert_eq!(typewriter.text(), "");
    }

    #[test]
    fn enter_before_hint_cancels_hint_timer() {
        let mut typewriter =
            EnterGatedTypewriter::new(two_category_catalog(), &InteractiveAnimations::default());
        let request = typewriter.start().expect("timer");
        let hint = run_until(&mut typewriter, request, |t| t.accepts_enter()).expect("typed");

        let press = typewriter.press_enter().expect("press");
        assert_eq!(typewriter.on_timer(hint.ticket), None);
        assert_eq!(typewriter.phase(), GatePhase::Pressing);
        typewriter.on_timer(press.ticket).expect("next query");
        assert_eq!(typewriter.phase(), GatePhase::Typing);
    }

    #[test]
    fn enter_gated_wraps_within_category() {
        let mut typewriter =
            EnterGatedTypewriter::new(two_category_catalog(), &InteractiveAnimations::default());
        typewriter.start();
        let request = typewriter.select_category(1).expect("valid");
        let request = run_until(&mut typewriter, request, |t| t.accepts_enter()).expect("typed");
        typewriter.on_timer(request.ticket);
        let press = typewriter.press_enter().expect("press");
        typewriter.on_timer(press.ticket).expect("next");
        assert_eq!(typewriter.category_index(), 1);
        assert_eq!(typewriter.item_index(), 0);

        assert!(typewriter.select_category(5).is_err());
    }
}
