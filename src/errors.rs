// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Error Types for the Pub/Sub Layer
//!
//! This module provides the error types for AMQP pub/sub operations.
//! The `AmqpError` enum covers connection and channel bootstrap, topology
//! declaration, payload encoding/decoding, publishing, and acknowledgment
//! transport failures.

use thiserror::Error;

/// Represents errors that can occur during AMQP pub/sub operations.
///
/// Declaration and publish errors are returned synchronously to the caller.
/// Decode and acknowledgment errors terminate the subscription loop they
/// occur in; the caller observes termination through the absence of further
/// handler invocations and through logs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AmqpError {
    /// Error establishing a connection to the RabbitMQ server
    #[error("failure to connect")]
    ConnectionError,

    /// Error creating a channel from an established connection
    #[error("failure to create a channel")]
    ChannelError,

    /// Error declaring an exchange with the given name
    #[error("failure to declare an exchange `{0}`")]
    DeclareExchangeError(String),

    /// Error declaring a queue with the given name
    #[error("failure to declare a queue `{0}`")]
    DeclareQueueError(String),

    /// Error binding a queue to an exchange
    #[error("failure to bind queue `{1}` to exchange `{0}`")]
    BindQueueError(String, String),

    /// Error configuring the channel prefetch limit
    #[error("failure to configure qos `{0}`")]
    QosError(String),

    /// Error registering a consumer on a queue
    #[error("failure to create consumer on queue `{0}`: {1}")]
    ConsumerError(String, String),

    /// Error serializing a value into a message payload
    #[error("failure to encode payload: {0}")]
    EncodeError(String),

    /// Error deserializing a message payload into a value
    #[error("failure to decode payload: {0}")]
    DecodeError(String),

    /// Error handing a message to the broker
    #[error("failure to publish: {0}")]
    PublishError(String),

    /// Error acknowledging or rejecting a delivery
    #[error("failure to ack/nack delivery: {0}")]
    AckError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumer_errors_carry_the_broker_reason() {
        let err = AmqpError::ConsumerError("game_logs".to_owned(), "channel closed".to_owned());

        assert_eq!(
            err.to_string(),
            "failure to create consumer on queue `game_logs`: channel closed"
        );
    }
}
