//! Message protocol definitions
//!
//! JSON-based bidirectional message protocol using Serde's tagged enum
//! for type-safe serialization/deserialization. Event names and fields
//! are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Client → Server message
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Enter a room under the given username
    Join { room_id: String, username: String },
    /// Replace the room's document text
    EditorChange { room_id: String, value: String },
    /// Replace the room's selected language
    LanguageChange { room_id: String, language: String },
}

impl ClientMessage {
    /// Decode a text frame
    ///
    /// Unknown event types and missing fields both surface as
    /// `AppError::InvalidPayload`.
    pub fn parse(text: &str) -> Result<Self, AppError> {
        serde_json::from_str(text).map_err(|e| AppError::InvalidPayload(e.to_string()))
    }
}

/// One entry of a room's membership list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub connection_id: String,
    /// Absent while the registry has no name for this connection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Server → Client message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Transport handshake finished, connection ID issued
    Connected { connection_id: String },
    /// Room membership changed
    ///
    /// Exactly one of `joined_user` / `left_user` is set; build it with
    /// [`ServerMessage::member_joined`] or [`ServerMessage::member_left`].
    UpdateMembers {
        clients: Vec<MemberInfo>,
        #[serde(skip_serializing_if = "Option::is_none")]
        joined_user: Option<MemberInfo>,
        #[serde(skip_serializing_if = "Option::is_none")]
        left_user: Option<MemberInfo>,
    },
    /// Document text changed (`language` only on the post-join snapshot)
    EditorUpdate {
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    /// Selected language changed
    LanguageUpdate { language: String },
}

impl ServerMessage {
    pub fn member_joined(clients: Vec<MemberInfo>, user: MemberInfo) -> Self {
        ServerMessage::UpdateMembers {
            clients,
            joined_user: Some(user),
            left_user: None,
        }
    }

    pub fn member_left(clients: Vec<MemberInfo>, user: MemberInfo) -> Self {
        ServerMessage::UpdateMembers {
            clients,
            joined_user: None,
            left_user: Some(user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_client_message_deserialize() {
        let json = r#"{"type": "join", "roomId": "r1", "username": "alice"}"#;
        let msg = ClientMessage::parse(json).unwrap();
        match msg {
            ClientMessage::Join { room_id, username } => {
                assert_eq!(room_id, "r1");
                assert_eq!(username, "alice");
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_language_change_deserialize() {
        let json = r#"{"type": "languageChange", "roomId": "r1", "language": "python"}"#;
        match ClientMessage::parse(json).unwrap() {
            ClientMessage::LanguageChange { room_id, language } => {
                assert_eq!(room_id, "r1");
                assert_eq!(language, "python");
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_missing_field_is_invalid_payload() {
        let json = r#"{"type": "editorChange", "roomId": "r1"}"#;
        assert!(matches!(
            ClientMessage::parse(json),
            Err(AppError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_unknown_event_is_invalid_payload() {
        let json = r#"{"type": "chat", "content": "hi"}"#;
        assert!(matches!(
            ClientMessage::parse(json),
            Err(AppError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_update_members_serialize() {
        let alice = MemberInfo {
            connection_id: "c1".to_string(),
            username: Some("alice".to_string()),
        };
        let msg = ServerMessage::member_joined(vec![alice.clone()], alice);
        let value: Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "updateMembers",
                "clients": [{"connectionId": "c1", "username": "alice"}],
                "joinedUser": {"connectionId": "c1", "username": "alice"}
            })
        );
    }

    #[test]
    fn test_unresolved_username_is_omitted() {
        let member = MemberInfo {
            connection_id: "c1".to_string(),
            username: None,
        };
        let value = serde_json::to_value(&member).unwrap();
        assert_eq!(value, json!({"connectionId": "c1"}));
    }

    #[test]
    fn test_editor_update_language_optional() {
        let plain = ServerMessage::EditorUpdate {
            value: "x".to_string(),
            language: None,
        };
        let json = serde_json::to_string(&plain).unwrap();
        assert!(json.contains("\"type\":\"editorUpdate\""));
        assert!(!json.contains("language"));

        let snapshot = ServerMessage::EditorUpdate {
            value: String::new(),
            language: Some("javascript".to_string()),
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"language\":\"javascript\""));
    }
}
