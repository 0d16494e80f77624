//! The win-collection state machine.
//!
//! Pure bookkeeping: it decides when a post is finalized and when a win batch
//! closes, and leaves storage and messaging to the coordinator.

use crate::{FragmentCollector, PendingPost};
use signalpost_core::{FileRef, Tag};
use tracing::debug;

/// Where the machine is in the post/win cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum CollectionState {
    /// Waiting for the next post-triggering win image
    #[default]
    #[strum(serialize = "AWAITING_POST")]
    AwaitingPost,
    /// First timer period after a post
    #[strum(serialize = "COLLECTING_WINS_STEP_1")]
    CollectingWinsStep1,
    /// Second timer period after a post
    #[strum(serialize = "COLLECTING_WINS_STEP_2")]
    CollectingWinsStep2,
}

/// What a win image led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WinOutcome {
    /// A post should be finalized; `None` means the fragments were incomplete
    /// and the buffer was cleared.
    Finalize(Option<PendingPost>),
    /// The image joined the pending win batch.
    Buffered,
}

/// Settings the machine reads on each win image.
#[derive(Debug, Clone, Copy)]
pub struct WinContext {
    /// Whether generation is enabled
    pub generation_enabled: bool,
    /// Threshold for the big-win interrupt
    pub big_win_percent: f64,
}

/// State machine plus the fragment buffers it drives.
#[derive(Debug, Default)]
pub struct IngestionMachine {
    state: CollectionState,
    collector: FragmentCollector,
}

impl IngestionMachine {
    /// A machine in `AwaitingPost` with empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> CollectionState {
        self.state
    }

    /// Fragment buffers.
    pub fn collector(&self) -> &FragmentCollector {
        &self.collector
    }

    /// Fragment buffers, for storing non-win fragments.
    pub fn collector_mut(&mut self) -> &mut FragmentCollector {
        &mut self.collector
    }

    /// Handle a win image whose strength sample has been recorded.
    pub fn on_win(&mut self, image: FileRef, percent: f64, ctx: WinContext) -> WinOutcome {
        let outcome = if self.state == CollectionState::AwaitingPost && ctx.generation_enabled {
            self.state = CollectionState::CollectingWinsStep1;
            self.collector.ingest_photo_fragment(Tag::Win, image);
            WinOutcome::Finalize(self.collector.take_post())
        } else if percent >= ctx.big_win_percent && ctx.generation_enabled {
            self.collector.ingest_photo_fragment(Tag::Win, image);
            WinOutcome::Finalize(self.collector.take_post())
        } else {
            // Collecting, or generation is off.
            self.collector.take_win_image(image);
            WinOutcome::Buffered
        };
        debug!(state = %self.state, percent, ?outcome, "Win image handled");
        outcome
    }

    /// Advance on a timer tick; returns the images of a batch that just closed.
    pub fn on_tick(&mut self) -> Option<Vec<FileRef>> {
        let closed = match self.state {
            CollectionState::AwaitingPost => None,
            CollectionState::CollectingWinsStep1 => {
                self.state = CollectionState::CollectingWinsStep2;
                None
            }
            CollectionState::CollectingWinsStep2 => {
                self.state = CollectionState::AwaitingPost;
                let images = self.collector.drain_win_images();
                (!images.is_empty()).then_some(images)
            }
        };
        debug!(state = %self.state, batch = closed.as_ref().map(Vec::len), "Win window tick");
        closed
    }
}
