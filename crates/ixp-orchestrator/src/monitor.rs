//! Background lab status polling
//!
//! Polls `running` every interval and, while a lab is up, `devices`. The
//! latest [`LabSnapshot`] is published on a watch channel so readers never
//! wait on the orchestrator.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::OrchestratorClient;
use crate::types::{DeviceStats, LabStatus};

/// Latest view of the lab
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabSnapshot {
    #[serde(flatten)]
    pub status: LabStatus,
    pub devices: Vec<DeviceStats>,
    /// `None` until the first poll completes
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Polling loop configuration
#[derive(Debug, Clone)]
pub struct LabMonitor {
    client: OrchestratorClient,
    interval: Duration,
}

impl LabMonitor {
    #[must_use]
    pub fn new(client: OrchestratorClient, interval: Duration) -> Self {
        Self { client, interval }
    }

    /// One poll: status, then devices while running
    ///
    /// Device fetch failures keep `previous.devices`; a stopped lab has none.
    pub async fn refresh(client: &OrchestratorClient, previous: &LabSnapshot) -> LabSnapshot {
        let status = client.status().await;
        let devices = if status.is_running() {
            match client.devices().await {
                Ok(devices) => devices,
                Err(err) => {
                    tracing::debug!(error = %err, "device poll failed, keeping previous list");
                    previous.devices.clone()
                }
            }
        } else {
            Vec::new()
        };

        if status.is_running() != previous.status.is_running() {
            tracing::info!(running = status.is_running(), hash = ?status.hash(), "lab state changed");
        }

        LabSnapshot {
            status,
            devices,
            refreshed_at: Some(Utc::now()),
        }
    }

    /// Start polling on the current runtime
    #[must_use]
    pub fn spawn(self) -> MonitorHandle {
        let (tx, rx) = watch::channel(LabSnapshot::default());
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(interval_secs = self.interval.as_secs(), base = %self.client.base_url(), "lab monitor started");

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let previous = tx.borrow().clone();
                        let next = Self::refresh(&self.client, &previous).await;
                        if tx.send(next).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::info!("lab monitor stopped");
        });

        MonitorHandle {
            snapshots: rx,
            stop: Some(stop_tx),
            task,
        }
    }
}

/// Running monitor
#[derive(Debug)]
pub struct MonitorHandle {
    snapshots: watch::Receiver<LabSnapshot>,
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Latest published snapshot
    #[must_use]
    pub fn snapshot(&self) -> LabSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every refresh
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LabSnapshot> {
        self.snapshots.clone()
    }

    /// Stop polling and wait for the task to exit
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(err) = (&mut self.task).await {
            tracing::warn!(error = %err, "lab monitor task ended abnormally");
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if self.stop.is_some() {
            self.task.abort();
        }
    }
}
