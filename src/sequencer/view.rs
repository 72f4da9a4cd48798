//! View model derived from sequencer state

use crate::domain::media::MediaRef;
use crate::sequencer::machine::{DemoSequencer, Phase};

/// One category tab
#[derive(Debug, Clone, PartialEq)]
pub struct TabView {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub complete: bool,
    /// Progress ring fill, `(item_index + 1) / items` on the active tab
    pub ring: f64,
}

/// Line under the typed query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultLine {
    /// Still typing, no line shown
    Hidden,
    /// Loading indicator
    Pending,
    Ready(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequencerView {
    pub tabs: Vec<TabView>,
    pub typed_text: String,
    pub caret_visible: bool,
    pub loading: bool,
    pub result: ResultLine,
    pub media: Option<MediaRef>,
    /// Fraction of the auto-advance interval already spent
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    NoContent { reason: String },
    Playing(SequencerView),
}

impl DemoSequencer {
    /// Everything a renderer needs for the current frame
    pub fn view(&self) -> ViewState {
        let (Some(catalog), Some(position), Some(item)) =
            (self.catalog(), self.position(), self.current_item())
        else {
            return ViewState::NoContent {
                reason: self.no_content_reason().unwrap_or_default().to_string(),
            };
        };

        let tabs = catalog
            .categories()
            .iter()
            .enumerate()
            .map(|(index, category)| {
                let active = index == position.category_index;
                let complete = self.is_completed(&category.id);
                let ring = if active && !complete {
                    (position.item_index + 1) as f64 / category.items.len() as f64
                } else {
                    0.0
                };
                TabView {
                    id: category.id.clone(),
                    name: category.name.clone(),
                    active,
                    complete,
                    ring,
                }
            })
            .collect();

        let (caret_visible, loading, result, media) = match position.phase {
            Phase::Typing { .. } => (true, false, ResultLine::Hidden, item.initial_media.clone()),
            Phase::Loading => (false, true, ResultLine::Pending, item.initial_media.clone()),
            Phase::ShowingResult => (
                false,
                false,
                ResultLine::Ready(item.result.clone()),
                item.result_media.clone(),
            ),
        };

        ViewState::Playing(SequencerView {
            tabs,
            typed_text: self.displayed_text().to_string(),
            caret_visible,
            loading,
            result,
            media,
            progress: self.progress(),
        })
    }
}
