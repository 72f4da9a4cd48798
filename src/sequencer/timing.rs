//! Sequencer timing parameters

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{LOADING_DELAY_MS, MOBILE_PROGRESS_DURATION_MS, MOBILE_TYPING_SPEED_MS};
use crate::domain::config::InteractiveAnimations;

/// What happens after the last item of the last category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndOfCatalog {
    /// Start over at the first item of the first category
    #[default]
    Loop,
    /// Stay on the last result, no further timers
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerTiming {
    /// Interval between revealed characters
    pub typing_speed: Duration,
    /// Time spent in the loading phase
    pub loading_delay: Duration,
    /// Target time from typing start to auto-advance
    pub progress_duration: Duration,
    pub end_of_catalog: EndOfCatalog,
}

impl SequencerTiming {
    /// Timing of the mobile demo page
    pub fn mobile() -> Self {
        Self {
            typing_speed: Duration::from_millis(MOBILE_TYPING_SPEED_MS),
            loading_delay: Duration::from_millis(LOADING_DELAY_MS),
            progress_duration: Duration::from_millis(MOBILE_PROGRESS_DURATION_MS),
            end_of_catalog: EndOfCatalog::default(),
        }
    }

    /// Timing from the `interactiveTypewriter` animations record
    pub fn from_config(animations: &InteractiveAnimations) -> Self {
        Self {
            typing_speed: Duration::from_millis(animations.typing_speed),
            loading_delay: Duration::from_millis(LOADING_DELAY_MS),
            progress_duration: Duration::from_millis(animations.progress_duration),
            end_of_catalog: EndOfCatalog::default(),
        }
    }

    /// Take typing speed and progress duration from `animations`
    pub fn with_animations(mut self, animations: &InteractiveAnimations) -> Self {
        self.typing_speed = Duration::from_millis(animations.typing_speed);
        self.progress_duration = Duration::from_millis(animations.progress_duration);
        self
    }

    pub fn with_end_of_catalog(mut self, end_of_catalog: EndOfCatalog) -> Self {
        self.end_of_catalog = end_of_catalog;
        self
    }

    pub fn with_loading_delay(mut self, loading_delay: Duration) -> Self {
        self.loading_delay = loading_delay;
        self
    }

    /// How long the result stays up once `elapsed` has passed since typing began
    pub fn result_hold(&self, elapsed: Duration) -> Duration {
        self.progress_duration.saturating_sub(elapsed)
    }
}

impl Default for SequencerTiming {
    fn default() -> Self {
        Self::mobile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_hold_fills_up_to_progress_duration() {
        let timing = SequencerTiming::mobile();
        assert_eq!(
            timing.result_hold(Duration::from_millis(2000)),
            Duration::from_millis(3500)
        );
        assert_eq!(timing.result_hold(Duration::from_millis(9000)), Duration::ZERO);
    }

    #[test]
    fn config_timing_keeps_loading_delay() {
        let timing = SequencerTiming::from_config(&InteractiveAnimations::default());
        assert_eq!(timing.typing_speed, Duration::from_millis(50));
        assert_eq!(timing.loading_delay, Duration::from_millis(1500));
        assert_eq!(timing.progress_duration, Duration::from_millis(5500));
    }

    #[test]
    fn animations_keep_loading_and_end_policy() {
        let animations = InteractiveAnimations {
            typing_speed: 20,
            progress_duration: 3000,
            ..Default::default()
        };
        let timing = SequencerTiming::mobile()
            .with_loading_delay(Duration::from_millis(700))
            .with_end_of_catalog(EndOfCatalog::Halt)
            .with_animations(&animations);

        assert_eq!(timing.typing_speed, Duration::from_millis(20));
        assert_eq!(timing.progress_duration, Duration::from_millis(3000));
        assert_eq!(timing.loading_delay, Duration::from_millis(700));
        assert_eq!(timing.end_of_catalog, EndOfCatalog::Halt);
    }
}
