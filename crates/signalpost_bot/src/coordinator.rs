//! The single owner of mutable bot state.
//!
//! Every inbound update and timer event goes through [`Coordinator::handle`]
//! one at a time, so the collector, the state machine, the pending edit and
//! the settings record are never touched concurrently. Publish passes run as
//! background tasks and only share the pipeline.

use crate::jobs::{rebroadcast_best_win, rotate_links};
use crate::length::choose_length;
use crate::texts::Texts;
use crate::{
    BotConfig, BotEvent, BotMetrics, CollectionState, IngestionMachine, PendingPost,
    Publication, PublicationClaim, PublishPipeline, Services, SettingsStore, WinContext,
    WinOutcome,
};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use signalpost_core::{
    ChannelPost, FileRef, Fragment, InboundEvent, MessageId, NewWinPercent, SendOptions, Tag,
};
use signalpost_error::{ConfigError, InputError, SignalpostResult};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span, instrument, warn};

/// An edit conversation waiting for the operator's next message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEdit {
    /// Post being edited
    pub post_id: i32,
    /// Announcement carrying the post's controls
    pub announcement: MessageId,
    /// Force-reply prompt asking for the new copy
    pub prompt: MessageId,
}

/// Routes events to ingestion, moderation, operator controls and daily jobs.
pub struct Coordinator {
    pub(crate) services: Services,
    pub(crate) config: Arc<BotConfig>,
    pub(crate) pipeline: PublishPipeline,
    pub(crate) settings: SettingsStore,
    pub(crate) pending_edit: Option<PendingEdit>,
    machine: IngestionMachine,
    tasks: JoinSet<()>,
    rng: StdRng,
    metrics: BotMetrics,
}

impl Coordinator {
    /// Creates a coordinator in `AWAITING_POST` with empty buffers.
    pub fn new(
        services: Services,
        config: Arc<BotConfig>,
        settings: SettingsStore,
        metrics: BotMetrics,
    ) -> Self {
        let pipeline = PublishPipeline::new(services.clone(), Arc::clone(&config), metrics.clone());
        Self {
            services,
            config,
            pipeline,
            settings,
            pending_edit: None,
            machine: IngestionMachine::new(),
            tasks: JoinSet::new(),
            rng: StdRng::from_entropy(),
            metrics,
        }
    }

    /// Replace the random source used for length draws.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Current ingestion state.
    pub fn state(&self) -> CollectionState {
        self.machine.state()
    }

    /// Ingestion state machine and its buffers.
    pub fn machine(&self) -> &IngestionMachine {
        &self.machine
    }

    /// Persisted settings.
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// The edit conversation in progress, if any.
    pub fn pending_edit(&self) -> Option<PendingEdit> {
        self.pending_edit
    }

    /// Metrics shared with the API.
    pub fn metrics(&self) -> &BotMetrics {
        &self.metrics
    }

    /// Handle one event to completion, except for publish passes, which are
    /// spawned.
    pub async fn handle(&mut self, event: BotEvent) -> SignalpostResult<()> {
        self.metrics.record_event();
        match event {
            BotEvent::Inbound(InboundEvent::ChannelPost(post)) => self.on_channel_post(post).await,
            BotEvent::Inbound(InboundEvent::Callback(query)) => self.on_callback(query).await,
            BotEvent::Inbound(InboundEvent::OperatorMessage(message)) => {
                self.on_operator_message(message).await
            }
            BotEvent::WinWindowTick => self.on_win_window_tick().await,
            BotEvent::BestWinRebroadcast => {
                let sent = rebroadcast_best_win(&self.services, &self.config, Utc::now()).await?;
                self.metrics.record_rebroadcasts(sent as u64);
                Ok(())
            }
            BotEvent::LinkRotation => {
                let sent = rotate_links(
                    self.services.endpoint.as_ref(),
                    &self.config,
                    &mut self.settings,
                )
                .await?;
                self.metrics.record_link_rotations(sent as u64);
                Ok(())
            }
        }
    }

    /// Process events until the sender side closes, then wait for running
    /// publish passes.
    pub async fn run(mut self, mut rx: mpsc::Receiver<BotEvent>) {
        info!("Coordinator started");
        loop {
            tokio::select! {
                event = rx.recv() => {
                    let Some(event) = event else { break };
                    if let Err(e) = self.handle(event).await {
                        self.metrics.record_event_failure();
                        error!(error = %e, "Event handling failed");
                    }
                }
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Publish task panicked");
                    }
                }
            }
        }
        self.join_publications().await;
        info!("Coordinator stopped");
    }

    /// Wait for every spawned publish pass to finish.
    pub async fn join_publications(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Publish task panicked");
            }
        }
    }

    pub(crate) fn spawn_publication(&mut self, claim: PublicationClaim) {
        let pipeline = self.pipeline.clone();
        let metrics = self.metrics.clone();
        let key = claim.key();
        let span = info_span!("publication", ?key);
        self.tasks.spawn(
            async move {
                let result = match key {
                    Publication::Post(id) => pipeline.publish_post(id, claim).await,
                    Publication::WinBatch(id) => pipeline.publish_win_batch(id, claim).await,
                };
                if let Err(e) = result {
                    metrics.record_publish_failure();
                    error!(error = %e, "Publication failed");
                }
            }
            .instrument(span),
        );
    }

    #[instrument(skip_all, fields(message_id = %post.message_id))]
    async fn on_channel_post(&mut self, post: ChannelPost) -> SignalpostResult<()> {
        if post.chat_id != self.config.watch_channel() {
            debug!(chat_id = %post.chat_id, "Ignoring post outside the watched channel");
            return Ok(());
        }

        let fragment = match Fragment::parse(&post) {
            Ok(Some(fragment)) => fragment,
            Ok(None) => return Ok(()),
            Err(e) => return self.report_input_error(&e).await,
        };

        let collector = self.machine.collector_mut();
        match fragment {
            Fragment::Stats { text } => collector.ingest_text_fragment(Tag::Stat, text),
            Fragment::Chart { image } => collector.ingest_photo_fragment(Tag::Chart, image),
            Fragment::StatsFile { file } => collector.ingest_document_fragment(Tag::File, file),
            Fragment::Promo {
                source,
                text,
                has_media,
            } => {
                return self.pipeline.broadcast_promo(source, &text, has_media).await;
            }
            Fragment::Win { image, percent } => return self.on_win(image, percent).await,
        }
        Ok(())
    }

    async fn report_input_error(&self, e: &InputError) -> SignalpostResult<()> {
        warn!(error = %e, "Dropping malformed fragment");
        let text = Texts::with_error(&self.config.texts.invalid_win_percent, &e.kind.to_string());
        self.services
            .endpoint
            .send_text(self.config.owner_chat(), &text, SendOptions::default())
            .await?;
        Ok(())
    }

    #[instrument(skip(self, image), fields(state = %self.machine.state()))]
    async fn on_win(&mut self, image: FileRef, percent: f64) -> SignalpostResult<()> {
        self.services
            .repository
            .record_win_percent(NewWinPercent {
                win_photo: image.clone(),
                win_percent: percent,
            })
            .await?;

        let ctx = WinContext {
            generation_enabled: self.settings.generation_enabled(),
            big_win_percent: self.config.publishing.big_win_percent,
        };
        match self.machine.on_win(image, percent, ctx) {
            WinOutcome::Buffered => Ok(()),
            WinOutcome::Finalize(None) => {
                info!("Post fragments incomplete, buffer cleared");
                Ok(())
            }
            WinOutcome::Finalize(Some(parts)) => self.finalize_post(parts).await,
        }
    }

    async fn finalize_post(&mut self, parts: PendingPost) -> SignalpostResult<()> {
        let today = Utc::now().date_naive();
        let used_today = self.settings.last_big_bucket_usage() == Some(today);
        let choice = choose_length(&self.config.generation.lengths, used_today, &mut self.rng)
            .ok_or_else(|| ConfigError::new("No usable generation lengths configured"))?;

        let moderation = self.settings.moderation_enabled();
        let post = self
            .pipeline
            .create_post(parts, choice.length, moderation)
            .await?;
        if choice.is_largest {
            self.settings.mark_big_bucket_used(today).await?;
        }

        if moderation {
            self.pipeline.announce_post(&post).await?;
        } else if let Some(claim) = self.pipeline.claim(Publication::Post(post.id)) {
            self.spawn_publication(claim);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(state = %self.machine.state()))]
    async fn on_win_window_tick(&mut self) -> SignalpostResult<()> {
        let Some(images) = self.machine.on_tick() else {
            return Ok(());
        };

        let batch = self.services.repository.create_win_batch(images).await?;
        self.metrics.record_win_batch_created();
        info!(batch_id = batch.id, photos = batch.win_photos.len(), "Win batch created");

        if self.settings.moderation_enabled() {
            self.pipeline.preview_win_batch(&batch).await
        } else {
            if let Some(claim) = self.pipeline.claim(Publication::WinBatch(batch.id)) {
                self.spawn_publication(claim);
            }
            Ok(())
        }
    }
}
