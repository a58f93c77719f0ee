// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Payload Codecs
//!
//! This module provides the encoding strategy abstraction used by the
//! publisher and subscriber. A codec converts a typed value to and from a
//! byte payload and names the content type it writes, so the two built-in
//! strategies stay interchangeable at every publish/subscribe call site:
//!
//! - `JsonCodec`: structured, self-describing text encoding
//! - `BincodeCodec`: compact binary encoding
//!
//! A publisher and its subscriber must agree on the codec out of band, by
//! queue and routing-key convention; the content-type tag carried on the
//! message is informational only.

use crate::errors::AmqpError;
use serde::{de::DeserializeOwned, Serialize};

/// Content type tag written by [`JsonCodec`].
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Content type tag written by [`BincodeCodec`].
pub const BINCODE_CONTENT_TYPE: &str = "application/bincode";

/// Encoding strategy for a message payload of type `T`.
///
/// Both operations must round-trip: for every value `v`,
/// `decode(encode(v)) == v`.
#[cfg_attr(test, mockall::automock)]
pub trait Codec<T: Send + Sync + 'static>: Send + Sync {
    /// The content-type tag stamped on outgoing messages.
    fn content_type(&self) -> &'static str;

    /// Serializes a value into a byte payload.
    fn encode(&self, value: &T) -> Result<Vec<u8>, AmqpError>;

    /// Deserializes a byte payload back into a value.
    fn decode(&self, payload: &[u8]) -> Result<T, AmqpError>;
}

/// Self-describing JSON encoding backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    fn encode(&self, value: &T) -> Result<Vec<u8>, AmqpError> {
        serde_json::to_vec(value).map_err(|err| AmqpError::EncodeError(err.to_string()))
    }

    fn decode(&self, payload: &[u8]) -> Result<T, AmqpError> {
        serde_json::from_slice(payload).map_err(|err| AmqpError::DecodeError(err.to_string()))
    }
}

/// Compact binary encoding backed by `bincode` with its standard
/// configuration.
#[derive(Clone, Copy, Default)]
pub struct BincodeCodec {
    config: bincode::config::Configuration,
}

impl BincodeCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> Codec<T> for BincodeCodec
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn content_type(&self) -> &'static str {
        BINCODE_CONTENT_TYPE
    }

    fn encode(&self, value: &T) -> Result<Vec<u8>, AmqpError> {
        bincode::serde::encode_to_vec(value, self.config)
            .map_err(|err| AmqpError::EncodeError(err.to_string()))
    }

    fn decode(&self, payload: &[u8]) -> Result<T, AmqpError> {
        bincode::serde::decode_from_slice(payload, self.config)
            .map(|(value, _)| value)
            .map_err(|err| AmqpError::DecodeError(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Move {
        player: String,
        units: Vec<u32>,
        paused: bool,
    }

    fn sample() -> Move {
        Move {
            player: "alice".to_owned(),
            units: vec![3, 14, 159],
            paused: false,
        }
    }

    #[test]
    fn json_round_trip() {
        let codec = JsonCodec;
        let value = sample();

        let payload = codec.encode(&value).unwrap();
        let decoded: Move = codec.decode(&payload).unwrap();

        assert_eq!(decoded, value);
    }

    #[test]
    fn bincode_round_trip() {
        let codec = BincodeCodec::new();
        let value = sample();

        let payload = codec.encode(&value).unwrap();
        let decoded: Move = codec.decode(&payload).unwrap();

        assert_eq!(decoded, value);
    }

    #[test]
    fn content_types_differ() {
        let json: &dyn Codec<Move> = &JsonCodec;
        let bin: &dyn Codec<Move> = &BincodeCodec::new();

        assert_eq!(json.content_type(), JSON_CONTENT_TYPE);
        assert_eq!(bin.content_type(), BINCODE_CONTENT_TYPE);
    }

    #[test]
    fn json_decode_rejects_malformed_payload() {
        let codec = JsonCodec;

        let result: Result<Move, _> = codec.decode(b"{not json");

        assert!(matches!(result, Err(AmqpError::DecodeError(_))));
    }

    #[test]
    fn bincode_decode_rejects_truncated_payload() {
        let codec = BincodeCodec::new();
        let payload = codec.encode(&sample()).unwrap();

        let result: Result<Move, _> = codec.decode(&payload[..payload.len() / 2]);

        assert!(matches!(result, Err(AmqpError::DecodeError(_))));
    }
}
