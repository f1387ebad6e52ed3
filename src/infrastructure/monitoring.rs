//! Monitoring collaborator: a bounded channel in front of a JSON-lines event log.
//!
//! Use cases publish through [`ChannelMonitoringPublisher`], which never waits.
//! [`MonitoringWorker`] drains the channel in the background and appends every
//! event to `<log_dir>/events_<event_id>_<YYYYMMDD>.json`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::{
    fs::{self, OpenOptions},
    io::AsyncWriteExt,
    sync::mpsc::{self, error::TrySendError},
};

use crate::domain::{
    models::monitoring_event::MonitoringEvent,
    services::monitoring_service::MonitoringPublisher,
};

/// Enough room for bursts of registrations while keeping memory bounded.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

pub type MonitoringEventSender = mpsc::Sender<MonitoringEvent>;
pub type MonitoringEventReceiver = mpsc::Receiver<MonitoringEvent>;

pub fn monitoring_channel() -> (MonitoringEventSender, MonitoringEventReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}

#[derive(Clone)]
pub struct ChannelMonitoringPublisher {
    sender: MonitoringEventSender,
}

impl ChannelMonitoringPublisher {
    pub fn new(sender: MonitoringEventSender) -> Self {
        Self { sender }
    }
}

impl MonitoringPublisher for ChannelMonitoringPublisher {
    fn publish(&self, event: MonitoringEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(
                    event_id = event.event_id(),
                    kind = event.kind(),
                    "monitoring channel full, dropping event"
                );
            }
            Err(TrySendError::Closed(event)) => {
                tracing::warn!(
                    event_id = event.event_id(),
                    kind = event.kind(),
                    "monitoring worker stopped, dropping event"
                );
            }
        }
    }
}

pub struct MonitoringWorker {
    receiver: MonitoringEventReceiver,
    log_dir: PathBuf,
}

impl MonitoringWorker {
    pub fn new(receiver: MonitoringEventReceiver, log_dir: impl AsRef<Path>) -> Self {
        Self {
            receiver,
            log_dir: log_dir.as_ref().to_path_buf(),
        }
    }

    /// Run until every sender has been dropped.
    pub async fn run(mut self) {
        if let Err(e) = fs::create_dir_all(&self.log_dir).await {
            tracing::error!(error = %e, dir = %self.log_dir.display(), "failed to create monitoring log directory");
        }

        while let Some(event) = self.receiver.recv().await {
            if let Err(e) = self.append(&event).await {
                tracing::error!(
                    error = %e,
                    event_id = event.event_id(),
                    kind = event.kind(),
                    "failed to write monitoring event"
                );
            }
        }

        tracing::debug!("monitoring worker shutting down");
    }

    async fn append(&self, event: &MonitoringEvent) -> std::io::Result<()> {
        let now = Utc::now();
        let mut entry = serde_json::to_value(event)?;
        if let Some(object) = entry.as_object_mut() {
            object.insert("timestamp".to_string(), serde_json::to_value(now)?);
        }
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        // filed under the day the change happened, not the day it was written
        let path = self.log_dir.join(format!(
            "events_{}_{}.json",
            event.event_id(),
            event.timestamp().format("%Y%m%d")
        ));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::domain::models::registration::RegistrationStatus;

    fn registration_event(event_id: i32) -> MonitoringEvent {
        MonitoringEvent::Registration {
            registration_id: 1,
            event_id,
            participant_id: 2,
            status: RegistrationStatus::Waiting,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_worker_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let (sender, receiver) = monitoring_channel();
        let publisher = ChannelMonitoringPublisher::new(sender);

        publisher.publish(registration_event(5));
        publisher.publish(MonitoringEvent::CheckIn {
            registration_id: 1,
            event_id: 5,
            participant_id: 2,
            participant_name: "Jan Kowalski".to_string(),
            timestamp: Utc::now(),
        });
        drop(publisher);

        MonitoringWorker::new(receiver, dir.path()).run().await;

        let path = dir
            .path()
            .join(format!("events_5_{}.json", Utc::now().format("%Y%m%d")));
        let content = std::fs::read_to_string(path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event_type"], "Registration");
        assert_eq!(lines[0]["data"]["status"], "waiting");
        assert!(lines[0]["timestamp"].is_string());
        assert_eq!(lines[1]["event_type"], "CheckIn");
        assert_eq!(lines[1]["data"]["participant_name"], "Jan Kowalski");
    }

    #[tokio::test]
    async fn test_worker_files_event_under_its_own_day() {
        let dir = tempfile::tempdir().unwrap();
        let (sender, receiver) = monitoring_channel();
        let happened_at = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap();

        ChannelMonitoringPublisher::new(sender).publish(MonitoringEvent::Registration {
            registration_id: 3,
            event_id: 8,
            participant_id: 4,
            status: RegistrationStatus::Registered,
            timestamp: happened_at,
        });
        MonitoringWorker::new(receiver, dir.path()).run().await;

        let content = std::fs::read_to_string(dir.path().join("events_8_20240309.json")).unwrap();
        let line: serde_json::Value = serde_json::from_str(content.trim_end()).unwrap();
        assert_eq!(line["data"]["registration_id"], 3);
    }

    #[test]
    fn test_publish_never_blocks_when_full() {
        let (sender, _receiver) = mpsc::channel(1);
        let publisher = ChannelMonitoringPublisher::new(sender);

        publisher.publish(registration_event(1));
        publisher.publish(registration_event(1));
    }

    #[test]
    fn test_publish_after_worker_stopped() {
        let (sender, receiver) = monitoring_channel();
        drop(receiver);

        ChannelMonitoringPublisher::new(sender).publish(registration_event(1));
    }
}
