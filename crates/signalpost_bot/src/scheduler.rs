//! Timers that feed the coordinator.

use crate::config::parse_cron;
use crate::{BotEvent, ScheduleConfig};
use chrono::Utc;
use signalpost_error::ConfigError;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at, sleep};
use tracing::{debug, info, warn};

/// Emits the win-window tick and the two daily jobs.
#[derive(Debug, Clone)]
pub struct Scheduler {
    win_window: Duration,
    best_win: cron::Schedule,
    link_rotation: cron::Schedule,
}

impl Scheduler {
    /// Build from configuration, parsing the cron expressions.
    pub fn new(config: &ScheduleConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            win_window: config.win_window(),
            best_win: parse_cron(&config.best_win_cron)?,
            link_rotation: parse_cron(&config.link_rotation_cron)?,
        })
    }

    /// Spawn the timer tasks. Each stops once `tx` is closed.
    pub fn spawn(self, tx: mpsc::Sender<BotEvent>) -> Vec<JoinHandle<()>> {
        info!(
            win_window_secs = self.win_window.as_secs(),
            "Starting scheduler"
        );
        vec![
            Self::spawn_ticker(self.win_window, tx.clone()),
            Self::spawn_cron(self.best_win, BotEvent::BestWinRebroadcast, tx.clone()),
            Self::spawn_cron(self.link_rotation, BotEvent::LinkRotation, tx),
        ]
    }

    fn spawn_ticker(period: Duration, tx: mpsc::Sender<BotEvent>) -> JoinHandle<()> {
        let start = Instant::now() + period;
        tokio::spawn(async move {
            let mut interval = interval_at(start, period);
            loop {
                interval.tick().await;
                if tx.send(BotEvent::WinWindowTick).await.is_err() {
                    debug!("Coordinator channel closed");
                    break;
                }
            }
        })
    }

    fn spawn_cron(
        schedule: cron::Schedule,
        event: BotEvent,
        tx: mpsc::Sender<BotEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let now = Utc::now();
                let Some(next) = schedule.after(&now).next() else {
                    warn!(?event, "Schedule exhausted");
                    break;
                };
                let delay = (next - now).to_std().unwrap_or(Duration::ZERO);
                debug!(?event, %next, "Next job scheduled");

                tokio::select! {
                    _ = sleep(delay) => {}
                    _ = tx.closed() => break,
                }
                if tx.send(event.clone()).await.is_err() {
                    break;
                }
            }
        })
    }
}
