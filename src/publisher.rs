// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Message Publisher
//!
//! This module publishes typed values to an exchange under a routing key.
//! The value is encoded with the codec chosen at the call site, tagged with
//! the codec's content type and a message id, and handed to the broker for
//! asynchronous delivery. No delivery confirmation is awaited; publishing is
//! fire-and-forget with respect to consumer acknowledgment.

use crate::{codec::Codec, errors::AmqpError, otel::AmqpTracePropagator};
use lapin::{
    options::BasicPublishOptions,
    types::{FieldTable, ShortString},
    BasicProperties, Channel,
};
use opentelemetry::Context;
use std::collections::BTreeMap;
use tracing::{error, warn};
use uuid::Uuid;

/// Encodes a value and publishes it to the exchange under the routing key.
///
/// Fails with an encode error when the value cannot be serialized (the
/// publish attempt is abandoned, never sent partially) and with a publish
/// error when the channel is closed or the broker rejects the message.
pub async fn publish<T, C>(
    ctx: &Context,
    channel: &Channel,
    exchange: &str,
    routing_key: &str,
    value: &T,
    codec: &C,
) -> Result<(), AmqpError>
where
    T: Send + Sync + 'static,
    C: Codec<T>,
{
    if has_wildcard_segment(routing_key) {
        // Wildcards are bind patterns; a topic exchange will not match them
        // against concrete binding keys on publish.
        warn!(
            routing_key = routing_key,
            "publishing with a wildcard routing key, message will likely route nowhere"
        );
    }

    let payload = codec.encode(value)?;

    let mut headers = BTreeMap::<ShortString, lapin::types::AMQPValue>::default();
    opentelemetry::global::get_text_map_propagator(|propagator| {
        propagator.inject_context(ctx, &mut AmqpTracePropagator::new(&mut headers))
    });

    match channel
        .basic_publish(
            exchange,
            routing_key,
            BasicPublishOptions {
                immediate: false,
                mandatory: false,
            },
            &payload,
            BasicProperties::default()
                .with_content_type(ShortString::from(codec.content_type()))
                .with_message_id(ShortString::from(Uuid::new_v4().to_string()))
                .with_headers(FieldTable::from(headers)),
        )
        .await
    {
        Err(err) => {
            error!(error = err.to_string(), "error publishing message");
            Err(AmqpError::PublishError(err.to_string()))
        }
        _ => Ok(()),
    }
}

/// Whether a routing key contains a topic wildcard segment (`*` or `#`).
///
/// Wildcards are only meaningful in binding keys; a publish under one is
/// almost always a call-site bug.
fn has_wildcard_segment(routing_key: &str) -> bool {
    routing_key
        .split('.')
        .any(|segment| segment == "*" || segment == "#")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_segments_are_detected() {
        assert!(has_wildcard_segment("army_moves.*"));
        assert!(has_wildcard_segment("game_logs.#"));
        assert!(has_wildcard_segment("*"));
    }

    #[test]
    fn concrete_keys_are_not_flagged() {
        assert!(!has_wildcard_segment("army_moves.alice"));
        assert!(!has_wildcard_segment("pause"));
        // A wildcard character inside a segment is a literal to the broker.
        assert!(!has_wildcard_segment("army_moves.a*b"));
    }
}
