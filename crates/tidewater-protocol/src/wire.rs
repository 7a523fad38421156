use rmp_serde::{decode, encode};
use thiserror::Error;

use crate::{ClientMessage, GameEvent, ServerMessage};

#[derive(Debug, Error)]
pub enum WireError {
    #[error("encode error: {0}")]
    Encode(#[from] encode::Error),
    #[error("decode error: {0}")]
    Decode(#[from] decode::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn serialize_client_message(msg: &ClientMessage) -> Result<Vec<u8>, WireError> {
    Ok(encode::to_vec(msg)?)
}

pub fn deserialize_client_message(bytes: &[u8]) -> Result<ClientMessage, WireError> {
    Ok(decode::from_slice(bytes)?)
}

pub fn serialize_server_message(msg: &ServerMessage) -> Result<Vec<u8>, WireError> {
    Ok(encode::to_vec(msg)?)
}

pub fn deserialize_server_message(bytes: &[u8]) -> Result<ServerMessage, WireError> {
    Ok(decode::from_slice(bytes)?)
}

pub fn serialize_events(events: &[GameEvent]) -> Result<Vec<u8>, WireError> {
    Ok(encode::to_vec(events)?)
}

pub fn deserialize_events(bytes: &[u8]) -> Result<Vec<GameEvent>, WireError> {
    Ok(decode::from_slice(bytes)?)
}

pub fn serialize_client_message_json(msg: &ClientMessage) -> Result<String, WireError> {
    Ok(serde_json::to_string(msg)?)
}

pub fn deserialize_client_message_json(json: &str) -> Result<ClientMessage, WireError> {
    Ok(serde_json::from_str(json)?)
}

pub fn serialize_server_message_json(msg: &ServerMessage) -> Result<String, WireError> {
    Ok(serde_json::to_string(msg)?)
}

pub fn deserialize_server_message_json(json: &str) -> Result<ServerMessage, WireError> {
    Ok(serde_json::from_str(json)?)
}

pub fn serialize_events_json(events: &[GameEvent]) -> Result<String, WireError> {
    Ok(serde_json::to_string(events)?)
}

pub fn deserialize_events_json(json: &str) -> Result<Vec<GameEvent>, WireError> {
    Ok(serde_json::from_str(json)?)
}
