use serde::{Deserialize, Serialize};

use crate::telemetry::TelemetrySnapshot;

/// Events pushed over the WebSocket feed. The feed is one-directional:
/// clients receive these and send nothing back (ping/pong aside).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayEvent {
    /// Full snapshot sent once, immediately after a client connects.
    #[serde(rename = "initial-data")]
    InitialData(TelemetrySnapshot),

    /// Full snapshot re-sent to every client after each tick, and after a
    /// server-side alert mutation.
    #[serde(rename = "update-data")]
    UpdateData(TelemetrySnapshot),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_tag_with_wire_names() {
        let initial = GatewayEvent::InitialData(TelemetrySnapshot::baseline());
        let json = serde_json::to_value(&initial).unwrap();
        assert_eq!(json["type"], "initial-data");
        assert_eq!(json["data"]["energy"]["battery"], 84);

        let update = GatewayEvent::UpdateData(TelemetrySnapshot::baseline());
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["type"], "update-data");
    }
}
