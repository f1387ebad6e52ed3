use crate::domain::models::monitoring_event::MonitoringEvent;

/// Port to the monitoring collaborator.
///
/// Publishing must not block the caller and never reports failure back;
/// delivery problems are the publisher's to log.
pub trait MonitoringPublisher: Send + Sync {
    fn publish(&self, event: MonitoringEvent);
}
