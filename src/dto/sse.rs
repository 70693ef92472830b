//! SSE event envelope and the payloads fanned out to clients.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{
    common::{CountdownSnapshot, SettingsSnapshot},
    public::CountdownResponse,
};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    /// Optional SSE event name.
    pub event: Option<String>,
    /// Serialized data field.
    pub data: String,
}

impl ServerEvent {
    /// Construct an event from a pre-rendered data string.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Token handed to the single admin SSE subscriber.
pub struct AdminHandshake {
    /// Token expected on subsequent admin requests' SSE coordination.
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Sent once to each new public subscriber with the state at connect
/// time, so clients render immediately instead of waiting for the next
/// tick.
pub struct PublicHandshake {
    /// Countdown projection at connect time.
    #[serde(flatten)]
    pub countdown: CountdownResponse,
    /// Current settings row image.
    pub settings: SettingsSnapshot,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend enters or leaves degraded mode.
pub struct SystemStatus {
    /// Whether the backend currently lacks a storage connection.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
/// Broadcast once per second with the freshly computed countdown state.
pub struct TickEvent(pub CountdownSnapshot);

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
/// Broadcast after every settings update with the post-update row image.
pub struct SettingsChangedEvent(pub SettingsSnapshot);

#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Broadcast when viewers should run a side effect.
pub enum EffectEvent {
    /// Launch a fireworks burst.
    Fireworks,
    /// Play the test sound.
    Sound,
    /// Play the final-countdown tick sound.
    Tick {
        /// Seconds remaining when the sound fires.
        second: u8,
    },
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast with the blended viewer count.
pub struct ViewersEvent {
    /// Displayed "watching now" figure.
    pub watching: u64,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a new wish has been accepted.
pub struct WishCreatedEvent {
    /// Identifier of the new wish.
    pub id: Uuid,
    /// The wish message.
    pub message: String,
    /// Creation instant, RFC 3339.
    pub created_at: String,
}
