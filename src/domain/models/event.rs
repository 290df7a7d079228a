use super::ServiceOutcome;

pub enum Event {
    BackendOutcome(String, ServiceOutcome),
    Notice(String),
}
