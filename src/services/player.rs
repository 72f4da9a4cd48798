//! Sequencer Player
//!
//! Drives a [`DemoSequencer`] with real tokio timers. Commands go in over a
//! tokio channel, [`AppEvent`]s come out over a crossbeam channel for the
//! synchronous renderer.
//!
//! ```text
//! SequencerPlayer ──PlayerCommand──▶ player task ──AppEvent──▶ Receiver
//!                                     │      ▲
//!                                     ▼      │ ticket
//!                                   PhaseTimer (one Sleep)
//! ```

use std::pin::Pin;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Sleep};
use tracing::{debug, info, warn};

use crate::domain::catalog::DemoCatalog;
use crate::domain::config::{ConfigSnapshot, InteractiveAnimations, InteractiveTypewriterConfig};
use crate::error::{Error, Result};
use crate::eventing::AppEvent;
use crate::sequencer::{DemoSequencer, Timeline, TimerRequest, TimerTicket};
use crate::state::config_state::{ConfigStore, SubscriptionId};

// ==================== Phase Timer ====================

/// The single outstanding timer of a running timeline
///
/// Re-arming drops the previous sleep, so at most one callback is ever due.
#[derive(Debug, Default)]
struct PhaseTimer {
    armed: Option<(TimerTicket, Pin<Box<Sleep>>)>,
}

impl PhaseTimer {
    fn arm(&mut self, request: TimerRequest) {
        let sleep = tokio::time::sleep(request.delay);
        self.armed = Some((request.ticket, Box::pin(sleep)));
    }

    fn disarm(&mut self) {
        self.armed = None;
    }

    /// Arm for `request`, or disarm when the timeline went idle
    fn apply(&mut self, request: Option<TimerRequest>) {
        match request {
            Some(request) => self.arm(request),
            None => self.disarm(),
        }
    }

    fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Resolves with the ticket once the sleep elapses; pending forever when
    /// disarmed. Cancel-safe: dropping the future keeps the timer armed.
    async fn fired(&mut self) -> TimerTicket {
        let Some((ticket, sleep)) = self.armed.as_mut() else {
            return std::future::pending().await;
        };
        sleep.as_mut().await;
        let ticket = *ticket;
        self.armed = None;
        ticket
    }
}

// ==================== Commands ====================

/// Message to the player task
#[derive(Debug)]
pub enum PlayerCommand {
    SelectCategory {
        index: usize,
        reply: oneshot::Sender<Result<()>>,
    },
    /// New catalog; an error shows "no content"
    SetCatalog(Result<DemoCatalog>),
    /// New typing speed and progress duration, position kept
    SetAnimations(InteractiveAnimations),
    Shutdown,
}

/// Handle to a running sequencer task
#[derive(Debug)]
pub struct SequencerPlayer {
    commands: mpsc::UnboundedSender<PlayerCommand>,
    events: Receiver<AppEvent>,
    task: JoinHandle<DemoSequencer>,
}

impl SequencerPlayer {
    /// Start `sequencer` on the current tokio runtime
    pub fn spawn(sequencer: DemoSequencer) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let task = tokio::spawn(run(sequencer, command_rx, event_tx));
        Self {
            commands: command_tx,
            events: event_rx,
            task,
        }
    }

    /// Events emitted by the sequencer, in order
    pub fn events(&self) -> &Receiver<AppEvent> {
        &self.events
    }

    /// Sender usable from other threads and subscribers
    pub fn commands(&self) -> mpsc::UnboundedSender<PlayerCommand> {
        self.commands.clone()
    }

    /// Jump to category `index`
    pub async fn select_category(&self, index: usize) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.send(PlayerCommand::SelectCategory { index, reply })?;
        response.await.map_err(|_| Error::ChannelClosed {
            message: "player dropped select reply".to_string(),
        })?
    }

    /// Replace the catalog being played
    pub fn set_catalog(&self, catalog: Result<DemoCatalog>) -> Result<()> {
        self.send(PlayerCommand::SetCatalog(catalog))
    }

    /// Stop the task and hand back the sequencer in its final state
    pub async fn shutdown(self) -> Result<DemoSequencer> {
        // The task may already be gone; the join below reports that.
        let _ = self.commands.send(PlayerCommand::Shutdown);
        self.task.await.map_err(|e| Error::ChannelClosed {
            message: format!("player task failed: {e}"),
        })
    }

    fn send(&self, command: PlayerCommand) -> Result<()> {
        self.commands.send(command).map_err(|_| Error::ChannelClosed {
            message: "player task stopped".to_string(),
        })
    }
}

fn forward(sequencer: &mut DemoSequencer, events: &Sender<AppEvent>) {
    for event in sequencer.take_events() {
        debug!(event = event.label(), "Sequencer event");
        let _ = events.send(event);
    }
}

async fn run(
    mut sequencer: DemoSequencer,
    mut commands: mpsc::UnboundedReceiver<PlayerCommand>,
    events: Sender<AppEvent>,
) -> DemoSequencer {
    let mut timer = PhaseTimer::default();
    info!("Sequencer player started");
    timer.apply(sequencer.start());
    forward(&mut sequencer, &events);

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(PlayerCommand::SelectCategory { index, reply }) => {
                    let outcome = sequencer.select_category(index).map(|request| timer.arm(request));
                    if let Err(e) = &outcome {
                        warn!(error = %e, index, "Category selection rejected");
                    }
                    let _ = reply.send(outcome);
                }
                Some(PlayerCommand::SetCatalog(Ok(catalog))) => {
                    timer.apply(sequencer.set_catalog(catalog));
                }
                Some(PlayerCommand::SetCatalog(Err(e))) => {
                    timer.disarm();
                    sequencer.clear_catalog(e.to_string());
                }
                Some(PlayerCommand::SetAnimations(animations)) => {
                    sequencer.set_animations(&animations);
                }
                Some(PlayerCommand::Shutdown) | None => break,
            },
            ticket = timer.fired() => {
                timer.apply(sequencer.on_timer(ticket));
            }
        }
        forward(&mut sequencer, &events);
    }

    timer.disarm();
    info!("Sequencer player stopped");
    sequencer
}

// ==================== Config Bridge ====================

/// Feed `interactiveTypewriter` changes from `store` to the player
///
/// Animation edits retime the running sequencer in place. Only snapshots
/// whose categories differ from the last ones seen restart it.
pub fn follow_config(store: &mut ConfigStore, player: &SequencerPlayer) -> SubscriptionId {
    let commands = player.commands();
    let current = &store.read().interactive_typewriter;
    let mut last_animations = current.animations.clone();
    let mut last_categories = current.categories.clone();
    store.subscribe(move |snapshot: &ConfigSnapshot| {
        let config: &InteractiveTypewriterConfig = &snapshot.interactive_typewriter;
        if config.animations != last_animations {
            last_animations = config.animations.clone();
            debug!("Animations changed in config");
            if commands
                .send(PlayerCommand::SetAnimations(last_animations.clone()))
                .is_err()
            {
                warn!("Player stopped, animation change dropped");
            }
        }
        if config.categories == last_categories {
            return;
        }
        last_categories = config.categories.clone();
        debug!(categories = last_categories.len(), "Catalog changed in config");
        if commands
            .send(PlayerCommand::SetCatalog(DemoCatalog::from_config(config)))
            .is_err()
        {
            warn!("Player stopped, catalog change dropped");
        }
    })
}

// ==================== Generic Driver ====================

/// Run any timeline with real timers for `duration`, calling `observe`
/// after every transition
pub async fn drive<T, F>(timeline: &mut T, duration: Duration, mut observe: F)
where
    T: Timeline,
    F: FnMut(&T),
{
    let deadline = tokio::time::sleep_until(Instant::now() + duration);
    tokio::pin!(deadline);

    let mut timer = PhaseTimer::default();
    timer.apply(timeline.start());
    observe(timeline);

    while timer.is_armed() {
        tokio::select! {
            _ = &mut deadline => break,
            ticket = timer.fired() => {
                timer.apply(timeline.on_timer(ticket));
                observe(timeline);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::tests::two_category_catalog;
    use crate::domain::config::WidgetKey;
    use crate::sequencer::{LoopTypewriter, Phase, SequencerTiming};
    use crate::utils::storage::MemoryStorage;

    fn drain(player: &SequencerPlayer) -> Vec<AppEvent> {
        player.events().try_iter().collect()
    }

    fn revealed_texts(events: &[AppEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match event {
                AppEvent::TextRevealed { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn auto_advances_after_progress_duration() {
        let sequencer = DemoSequencer::new(two_category_catalog(), SequencerTiming::mobile());
        let player = SequencerPlayer::spawn(sequencer);

        tokio::time::sleep(Duration::from_millis(5_400)).await;
        let events = drain(&player);
        assert!(events.iter().any(|e| matches!(e, AppEvent::ResultShown { .. })));
        assert!(!events.iter().any(|e| matches!(e, AppEvent::ItemStarted { item_index: 1, .. })));

        tokio::time::sleep(Duration::from_millis(200)).await;
        let events = drain(&player);
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::ItemStarted { item_id, .. } if item_id == "y"
        )));

        let sequencer = player.shutdown().await.expect("shutdown");
        assert_eq!(sequencer.position().map(|p| p.item_index), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn selecting_category_discards_old_item_timers() {
        let sequencer = DemoSequencer::new(two_category_catalog(), SequencerTiming::mobile());
        let player = SequencerPlayer::spawn(sequencer);

        tokio::time::sleep(Duration::from_millis(60)).await;
        player.select_category(1).await.expect("valid index");
        drain(&player);

        tokio::time::sleep(Duration::from_millis(500)).await;
        let texts = revealed_texts(&drain(&player));
        assert_eq!(texts, vec!["f".to_string()]);

        let err = player.select_category(9).await.expect_err("out of range");
        assert!(matches!(err, Error::InvalidCategory { index: 9, len: 2 }));

        let sequencer = player.shutdown().await.expect("shutdown");
        assert_eq!(sequencer.position().map(|p| p.category_index), Some(1));
        assert_eq!(sequencer.phase(), Some(Phase::Loading));
    }

    #[tokio::test(start_paused = true)]
    async fn catalog_error_stops_playback() {
        let sequencer = DemoSequencer::new(two_category_catalog(), SequencerTiming::mobile());
        let player = SequencerPlayer::spawn(sequencer);

        player
            .set_catalog(DemoCatalog::new(Vec::new()))
            .expect("running");
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(drain(&player).iter().any(|e| matches!(e, AppEvent::NoContent { .. })));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(drain(&player).is_empty());

        let sequencer = player.shutdown().await.expect("shutdown");
        assert!(!sequencer.has_pending_timer());
        assert_eq!(sequencer.position(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn config_edits_restart_the_sequencer() {
        let mut store = ConfigStore::load(Box::new(MemoryStorage::new()));
        let catalog = DemoCatalog::from_config(&store.read().interactive_typewriter);
        let sequencer = DemoSequencer::from_catalog_result(
            catalog,
            SequencerTiming::from_config(&store.read().interactive_typewriter.animations),
        );
        let player = SequencerPlayer::spawn(sequencer);
        follow_config(&mut store, &player);

        tokio::time::sleep(Duration::from_millis(10)).await;
        drain(&player);

        // unrelated section: no restart
        store
            .edit_field(WidgetKey::Terminal, r#"{"prompt":"$ "}"#)
            .expect("valid");
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(!drain(&player).iter().any(|e| matches!(e, AppEvent::ItemStarted { .. })));

        store
            .edit_field(
                WidgetKey::InteractiveTypewriter,
                r#"{"categories":[{"id":"solo","name":"Solo","items":[{"id":"1","text":"hi","href":"/"}]}]}"#,
            )
            .expect("valid");
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(drain(&player).iter().any(|e| matches!(
            e,
            AppEvent::ItemStarted { category_id, .. } if category_id == "solo"
        )));

        player.shutdown().await.expect("shutdown");
    }

    #[tokio::test(start_paused = true)]
    async fn drive_runs_a_typewriter_until_the_deadline() {
        let mut typewriter = LoopTypewriter::new(
            vec!["ab".to_string()],
            Duration::from_millis(10),
            Duration::from_millis(10),
        );
        let mut seen = Vec::new();

        drive(&mut typewriter, Duration::from_millis(25), |t| {
            seen.push(t.text().to_string());
        })
        .await;

        assert_eq!(seen, vec!["", "a", "ab"]);
    }

    #[tokio::test(start_paused = true)]
    async fn animation_edits_retime_without_restart() {
        let mut store = ConfigStore::load(Box::new(MemoryStorage::new()));
        let config = store.read().interactive_typewriter.clone();
        let sequencer = DemoSequencer::from_catalog_result(
            DemoCatalog::from_config(&config),
            SequencerTiming::from_config(&config.animations),
        );
        let player = SequencerPlayer::spawn(sequencer);
        follow_config(&mut store, &player);

        tokio::time::sleep(Duration::from_millis(10)).await;
        drain(&player);

        let mut section: serde_json::Value = serde_json::from_str(
            &store
                .section_text(WidgetKey::InteractiveTypewriter)
                .expect("section"),
        )
        .expect("json");
        section["animations"]["typingSpeed"] = 20.into();
        store
            .edit_field(WidgetKey::InteractiveTypewriter, &section.to_string())
            .expect("valid");
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(!drain(&player).iter().any(|e| matches!(e, AppEvent::ItemStarted { .. })));

        let sequencer = player.shutdown().await.expect("shutdown");
        assert_eq!(sequencer.timing().typing_speed, Duration::from_millis(20));
        assert_eq!(sequencer.position().map(|p| p.item_index), Some(0));
    }
}
