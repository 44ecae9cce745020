use kube::runtime::events::{Event, EventType};

pub trait ResourceEvent {
    fn to_event(&self, attribute: Option<String>) -> Event;
}

pub enum StitchEventEnum {
    Installing,
    Ready,
    RouteMissing,
    Failed,
}

impl ResourceEvent for StitchEventEnum {
    fn to_event(&self, attribute: Option<String>) -> Event {
        match self {
            StitchEventEnum::Installing => Event {
                type_: EventType::Normal,
                reason: "Installing".to_string(),
                note: Some("Resolving the installation configuration".to_owned()),
                action: "Starting to resolve the installation configuration".to_string(),
                secondary: None,
            },
            StitchEventEnum::Ready => Event {
                type_: EventType::Normal,
                reason: "Ready".to_string(),
                note: Some("Installation configuration is fully resolved".to_owned()),
                action: "Installation configuration resolved".to_string(),
                secondary: None,
            },
            StitchEventEnum::RouteMissing => Event {
                type_: EventType::Warning,
                reason: "RouteMissing".to_string(),
                note: Some(format!(
                    "Route {} does not exist yet, retrying on a later pass",
                    attribute.as_ref().unwrap_or(&"unknown".to_string())
                )),
                action: "Waiting for the installation route to appear".to_string(),
                secondary: None,
            },
            StitchEventEnum::Failed => Event {
                type_: EventType::Warning,
                reason: "Failed".to_string(),
                note: Some(format!(
                    "Installation configuration could not be decoded: {}",
                    attribute.as_ref().unwrap_or(&"unknown".to_string())
                )),
                action: "Installation configuration is corrupted".to_string(),
                secondary: None,
            },
        }
    }
}
