use crate::hub::HubEvent;
use crate::position::PositionRecord;
use serde::{Deserialize, Serialize};

/// Client → Server message types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Ask for a fresh full snapshot
    #[serde(rename = "snapshot_request")]
    SnapshotRequest,
    #[serde(rename = "ping")]
    Ping,
}

/// Server → Client message types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Full current position list, sent once on connect and on request
    #[serde(rename = "snapshot")]
    Snapshot { records: Vec<PositionRecord> },

    /// A single accepted position report
    #[serde(rename = "location_update")]
    LocationUpdate { record: PositionRecord },

    /// Entity expired from the store
    #[serde(rename = "location_evicted")]
    LocationEvicted { id: String },

    #[serde(rename = "pong")]
    Pong,

    #[serde(rename = "error")]
    Error { error: String },
}

impl From<HubEvent> for ServerMessage {
    fn from(event: HubEvent) -> Self {
        match event {
            HubEvent::Update(record) => ServerMessage::LocationUpdate { record },
            HubEvent::Evicted { id } => ServerMessage::LocationEvicted { id },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::PositionReport;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_location_update_wire_format() {
        let record = PositionReport::new("d1", -17.8, 31.0).into_record(Utc::now());
        let msg = ServerMessage::from(HubEvent::Update(record));
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["type"], "location_update");
        assert_eq!(value["record"]["id"], "d1");
        assert_eq!(value["record"]["lat"], -17.8);
    }

    #[test]
    fn test_eviction_wire_format() {
        let msg = ServerMessage::from(HubEvent::Evicted { id: "d1".into() });
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "location_evicted", "id": "d1"})
        );
    }

    #[test]
    fn test_client_messages_parse() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"snapshot_request"}"#).unwrap();
        assert_eq!(msg, ClientMessage::SnapshotRequest);

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Ping);

        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"subscribe"}"#).is_err());
    }

    #[test]
    fn test_snapshot_message_parses_back() {
        let text = r#"{"type":"snapshot","records":[
            {"id":"a","lat":1.0,"lng":2.0,"timestamp":"2026-01-01T00:00:00Z"}
        ]}"#;
        match serde_json::from_str::<ServerMessage>(text).unwrap() {
            ServerMessage::Snapshot { records } => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].id, "a");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
