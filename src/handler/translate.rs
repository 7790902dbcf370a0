//! Turning bus events into backend events.

use crate::backend::{Level, LocationInfo, LoggingEvent, NOT_AVAILABLE};
use crate::event::{render_cause, ActorPath, LogEvent};
use crate::properties::{keys, Properties};

/// Translates `event`, delivered by `sender`, into the backend's event shape.
///
/// The property block starts with the sender's path and the log source name;
/// the event's own properties are laid over them, so a user key with the same
/// name wins. Location fields the event does not carry become
/// [`NOT_AVAILABLE`], except the class, which falls back to the log class.
pub fn create_logging_event(level: Level, event: &LogEvent, sender: &ActorPath) -> LoggingEvent {
    let (message, user_properties) = event.message().parts();
    let empty = Properties::new();
    let user_properties = user_properties.unwrap_or(&empty);
    let log_class = event.log_source().log_class();

    let location = LocationInfo::new(
        user_properties.declaring_type_name().unwrap_or(log_class),
        user_properties.method_name().unwrap_or(NOT_AVAILABLE),
        user_properties.file_name().unwrap_or(NOT_AVAILABLE),
        user_properties
            .line_number()
            .map_or_else(|| NOT_AVAILABLE.to_string(), |line| line.to_string()),
    );

    let mut properties = Properties::new();
    properties.insert(keys::ACTOR_PATH, sender.clone());
    properties.insert(keys::LOG_SOURCE, event.log_source().source());
    properties.overlay(user_properties);

    LoggingEvent {
        level,
        logger_name: log_class.to_string(),
        timestamp: event.timestamp(),
        message: message.to_string(),
        thread_name: event.thread().to_string(),
        exception: event.cause().map(|cause| render_cause(cause.as_ref())),
        location,
        properties,
    }
}
