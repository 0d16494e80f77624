//! In-memory correlation of post fragments and win candidates.

use signalpost_core::{FileRef, Tag};

/// The four fragments a post is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPost {
    /// Raw stats text
    pub stats_text: String,
    /// Chart image
    pub chart: FileRef,
    /// Stats document
    pub stats_file: FileRef,
    /// Win image
    pub win: FileRef,
}

/// Buffers fragments of the one post in flight plus pending win images.
///
/// Later fragments with the same tag overwrite earlier ones. Nothing here is
/// durable.
#[derive(Debug, Default, Clone)]
pub struct FragmentCollector {
    stats_text: Option<String>,
    chart: Option<FileRef>,
    stats_file: Option<FileRef>,
    win: Option<FileRef>,
    win_images: Vec<FileRef>,
}

impl FragmentCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a text fragment. Only `#stat` carries text.
    pub fn ingest_text_fragment(&mut self, tag: Tag, text: impl Into<String>) {
        if tag == Tag::Stat {
            self.stats_text = Some(text.into());
        }
    }

    /// Store an image fragment for `#chart` or `#win`.
    pub fn ingest_photo_fragment(&mut self, tag: Tag, image: FileRef) {
        match tag {
            Tag::Chart => self.chart = Some(image),
            Tag::Win => self.win = Some(image),
            _ => {}
        }
    }

    /// Store a document fragment. Only `#file` carries a document.
    pub fn ingest_document_fragment(&mut self, tag: Tag, file: FileRef) {
        if tag == Tag::File {
            self.stats_file = Some(file);
        }
    }

    /// True iff all four fragments are present.
    pub fn is_post_complete(&self) -> bool {
        self.stats_text.is_some()
            && self.chart.is_some()
            && self.stats_file.is_some()
            && self.win.is_some()
    }

    /// Clear the post buffer, leaving win images alone.
    pub fn reset_post_buffer(&mut self) {
        self.stats_text = None;
        self.chart = None;
        self.stats_file = None;
        self.win = None;
    }

    /// Take the complete post, clearing the post buffer either way.
    pub fn take_post(&mut self) -> Option<PendingPost> {
        let parts = (
            self.stats_text.take(),
            self.chart.take(),
            self.stats_file.take(),
            self.win.take(),
        );
        match parts {
            (Some(stats_text), Some(chart), Some(stats_file), Some(win)) => Some(PendingPost {
                stats_text,
                chart,
                stats_file,
                win,
            }),
            _ => None,
        }
    }

    /// Append a win-batch candidate.
    pub fn take_win_image(&mut self, image: FileRef) {
        self.win_images.push(image);
    }

    /// Number of buffered win images.
    pub fn pending_win_count(&self) -> usize {
        self.win_images.len()
    }

    /// Drain the buffered win images in arrival order.
    pub fn drain_win_images(&mut self) -> Vec<FileRef> {
        std::mem::take(&mut self.win_images)
    }
}
