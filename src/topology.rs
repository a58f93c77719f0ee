// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Topology Management
//!
//! This module declares broker-side topology: exchanges, queues, and the
//! bindings between them. Declarations are idempotent for identical
//! arguments; redeclaring a queue with conflicting properties (for example a
//! durable queue as transient) is rejected by the broker and surfaces as a
//! declaration error.

use crate::{
    connection::open_channel,
    errors::AmqpError,
    exchange::ExchangeSpec,
    queue::QueueSpec,
};
use lapin::{
    options::{ExchangeDeclareOptions, QueueBindOptions},
    types::{AMQPValue, FieldTable, LongString, ShortString},
    Channel, Connection, Queue,
};
use std::collections::BTreeMap;
use tracing::{debug, error};

/// Queue argument naming the exchange that receives dead-lettered messages.
pub const AMQP_HEADERS_DEAD_LETTER_EXCHANGE: &str = "x-dead-letter-exchange";

/// Declares an exchange on the given channel.
pub async fn declare_exchange(channel: &Channel, spec: &ExchangeSpec) -> Result<(), AmqpError> {
    debug!("creating exchange: {}", spec.name);

    match channel
        .exchange_declare(
            &spec.name,
            spec.kind.into(),
            ExchangeDeclareOptions {
                passive: false,
                durable: spec.durable,
                auto_delete: false,
                internal: false,
                nowait: false,
            },
            FieldTable::default(),
        )
        .await
    {
        Err(err) => {
            error!(
                error = err.to_string(),
                name = spec.name,
                "error to declare the exchange"
            );
            Err(AmqpError::DeclareExchangeError(spec.name.clone()))
        }
        _ => {
            debug!("exchange: {} was created", spec.name);
            Ok(())
        }
    }
}

/// Declares a queue and binds it to an exchange under a routing key.
///
/// Opens a dedicated channel on the connection, declares the queue with the
/// flags derived from its durability mode plus the dead-letter-exchange
/// argument when configured, and binds it. The returned channel is scoped to
/// this queue and owned by exactly one subscription or publisher.
///
/// The created queue and binding are broker-side state that outlives the
/// call.
pub async fn declare_and_bind(
    conn: &Connection,
    exchange: &str,
    routing_key: &str,
    spec: &QueueSpec,
) -> Result<(Channel, Queue), AmqpError> {
    let channel = open_channel(conn).await?;

    debug!("creating queue: {}", spec.name);

    let mut queue_args = BTreeMap::new();
    if let Some(dlx) = &spec.dead_letter_exchange {
        queue_args.insert(
            ShortString::from(AMQP_HEADERS_DEAD_LETTER_EXCHANGE),
            AMQPValue::LongString(LongString::from(dlx.clone())),
        );
    }

    let queue = match channel
        .queue_declare(
            &spec.name,
            spec.declare_options(),
            FieldTable::from(queue_args),
        )
        .await
    {
        Err(err) => {
            error!(
                error = err.to_string(),
                name = spec.name,
                "error to declare the queue"
            );
            Err(AmqpError::DeclareQueueError(spec.name.clone()))
        }
        Ok(queue) => {
            debug!("queue: {} was created", spec.name);
            Ok(queue)
        }
    }?;

    debug!(
        "binding queue: {} to the exchange: {} with the key: {}",
        spec.name, exchange, routing_key
    );

    match channel
        .queue_bind(
            &spec.name,
            exchange,
            routing_key,
            QueueBindOptions { nowait: false },
            FieldTable::default(),
        )
        .await
    {
        Err(err) => {
            error!(error = err.to_string(), "error to bind queue to exchange");
            Err(AmqpError::BindQueueError(
                exchange.to_owned(),
                spec.name.clone(),
            ))
        }
        _ => Ok(()),
    }?;

    Ok((channel, queue))
}
