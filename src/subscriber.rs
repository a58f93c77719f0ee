// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Subscription and Delivery Processing
//!
//! This module owns the consumption side of the pub/sub layer. A
//! subscription declares and binds its queue, configures the channel
//! prefetch limit, and runs one dedicated task that decodes each delivery,
//! invokes the caller's handler, and issues exactly one acknowledgment per
//! delivery according to the handler's returned [`Disposition`].
//!
//! Each subscription owns its channel; channels are never shared between
//! subscriptions, so a slow handler stalls only its own delivery stream.
//! The prefetch limit is the sole flow-control mechanism: once the window
//! of unacknowledged deliveries fills, the broker pauses delivery to this
//! channel until the handler catches up.
//!
//! The loop terminates on decode failure, on acknowledgment transport
//! failure, or when the broker closes the delivery stream. There is no
//! automatic restart; resubscribing is the caller's responsibility.

use crate::{
    codec::Codec,
    errors::AmqpError,
    otel,
    queue::QueueSpec,
    topology::declare_and_bind,
};
use async_trait::async_trait;
use futures_util::StreamExt;
use lapin::{
    message::Delivery,
    options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicQosOptions},
    types::FieldTable,
    Connection,
};
use opentelemetry::{
    global,
    trace::{Span, Status},
};
use std::borrow::Cow;
use tracing::{debug, error, warn};

/// Terminal outcome a handler chooses for every delivery it processes.
///
/// Exactly one of these is translated into exactly one broker
/// acknowledgment call per delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The delivery was processed; remove it from the queue.
    Ack,
    /// Processing failed but may succeed later; redeliver the message.
    NackRequeue,
    /// Processing failed permanently; drop the message, or route it to the
    /// dead-letter exchange when the queue is configured with one.
    NackDiscard,
}

/// Handler invoked for each decoded delivery of a subscription.
///
/// The handler decides the disposition and performs no acknowledgment
/// itself, which keeps handler logic testable without a broker. Handlers
/// run serialized with respect to their own subscription's delivery stream;
/// concurrent subscriptions run independently.
#[async_trait]
pub trait DeliveryHandler<T>: Send + Sync {
    async fn handle(&self, value: T) -> Disposition;
}

/// Plain functions and closures are handlers.
#[async_trait]
impl<T, F> DeliveryHandler<T> for F
where
    T: Send + Sync + 'static,
    F: Fn(T) -> Disposition + Send + Sync,
{
    async fn handle(&self, value: T) -> Disposition {
        (self)(value)
    }
}

/// The single acknowledgment call a disposition translates into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AckCommand {
    Ack,
    Nack { requeue: bool },
}

fn ack_command(disposition: Disposition) -> AckCommand {
    match disposition {
        Disposition::Ack => AckCommand::Ack,
        Disposition::NackRequeue => AckCommand::Nack { requeue: true },
        Disposition::NackDiscard => AckCommand::Nack { requeue: false },
    }
}

/// Decodes a payload and asks the handler for its disposition.
///
/// A decode failure is fatal to the whole subscription: the byte stream is
/// malformed at the boundary of every subsequent message for this type, so
/// the error propagates and the loop terminates instead of skipping one
/// message.
async fn decide<T, C, H>(codec: &C, handler: &H, payload: &[u8]) -> Result<AckCommand, AmqpError>
where
    T: Send + Sync + 'static,
    C: Codec<T>,
    H: DeliveryHandler<T>,
{
    let value = codec.decode(payload)?;
    Ok(ack_command(handler.handle(value).await))
}

async fn settle(delivery: &Delivery, command: AckCommand) -> Result<(), AmqpError> {
    let result = match command {
        AckCommand::Ack => delivery.ack(BasicAckOptions { multiple: false }).await,
        AckCommand::Nack { requeue } => {
            delivery
                .nack(BasicNackOptions {
                    multiple: false,
                    requeue,
                })
                .await
        }
    };

    result.map_err(|err| AmqpError::AckError(err.to_string()))
}

/// Declares and binds a queue, then starts consuming it on a dedicated task.
///
/// Declaration, prefetch configuration, and consumer registration errors are
/// returned synchronously. Once the task is running, decode and
/// acknowledgment failures terminate it silently apart from logs; the caller
/// observes termination through the absence of further handler invocations.
pub async fn subscribe<T, C, H>(
    conn: &Connection,
    exchange: &str,
    routing_key: &str,
    spec: QueueSpec,
    prefetch: u16,
    codec: C,
    handler: H,
) -> Result<(), AmqpError>
where
    T: Send + Sync + 'static,
    C: Codec<T> + 'static,
    H: DeliveryHandler<T> + 'static,
{
    let (channel, _queue) = declare_and_bind(conn, exchange, routing_key, &spec).await?;

    channel
        .basic_qos(prefetch, BasicQosOptions { global: false })
        .await
        .map_err(|err| AmqpError::QosError(err.to_string()))?;

    let queue_name = spec.name().to_owned();

    let mut consumer = match channel
        .basic_consume(
            &queue_name,
            &format!("{queue_name}-consumer"),
            BasicConsumeOptions {
                no_local: false,
                no_ack: false,
                exclusive: false,
                nowait: false,
            },
            FieldTable::default(),
        )
        .await
    {
        Err(err) => {
            error!(error = err.to_string(), "error to create the consumer");
            Err(AmqpError::ConsumerError(
                queue_name.clone(),
                err.to_string(),
            ))
        }
        Ok(c) => Ok(c),
    }?;

    tokio::spawn(async move {
        // The channel handle lives as long as the loop; the subscription owns it.
        let _channel = channel;
        let tracer = global::tracer("amqp consumer");

        while let Some(result) = consumer.next().await {
            let delivery = match result {
                Ok(delivery) => delivery,
                Err(err) => {
                    error!(
                        error = err.to_string(),
                        queue = queue_name,
                        "delivery stream failed, stopping subscription"
                    );
                    break;
                }
            };

            let (_ctx, mut span) = otel::new_span(&delivery.properties, &tracer, &queue_name);

            let command = match decide(&codec, &handler, &delivery.data).await {
                Ok(command) => command,
                Err(err) => {
                    span.record_error(&err);
                    span.set_status(Status::Error {
                        description: Cow::from("failure to decode delivery"),
                    });
                    error!(
                        error = err.to_string(),
                        queue = queue_name,
                        "decode failed, stopping subscription"
                    );
                    break;
                }
            };

            match settle(&delivery, command).await {
                Ok(()) => {
                    debug!(queue = queue_name, "delivery settled: {:?}", command);
                    span.set_status(Status::Ok);
                }
                Err(err) => {
                    span.record_error(&err);
                    span.set_status(Status::Error {
                        description: Cow::from("failure to settle delivery"),
                    });
                    error!(
                        error = err.to_string(),
                        queue = queue_name,
                        "ack transport failed, stopping subscription"
                    );
                    break;
                }
            }
        }

        warn!(queue = queue_name, "subscription loop terminated");
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::MockCodec;

    #[test]
    fn each_disposition_maps_to_one_ack_call() {
        assert_eq!(ack_command(Disposition::Ack), AckCommand::Ack);
        assert_eq!(
            ack_command(Disposition::NackRequeue),
            AckCommand::Nack { requeue: true }
        );
        assert_eq!(
            ack_command(Disposition::NackDiscard),
            AckCommand::Nack { requeue: false }
        );
    }

    #[tokio::test]
    async fn closures_are_handlers() {
        let handler = |value: u32| {
            if value > 10 {
                Disposition::NackDiscard
            } else {
                Disposition::Ack
            }
        };

        assert_eq!(handler.handle(3).await, Disposition::Ack);
        assert_eq!(handler.handle(30).await, Disposition::NackDiscard);
    }

    #[tokio::test]
    async fn decide_translates_the_handler_disposition() {
        let mut codec = MockCodec::<u32>::new();
        codec.expect_decode().returning(|_| Ok(7));

        let handler = |_: u32| Disposition::NackRequeue;

        let command = decide(&codec, &handler, b"payload").await.unwrap();

        assert_eq!(command, AckCommand::Nack { requeue: true });
    }

    #[tokio::test]
    async fn decode_failure_reaches_no_handler() {
        let mut codec = MockCodec::<u32>::new();
        codec
            .expect_decode()
            .returning(|_| Err(AmqpError::DecodeError("malformed".to_owned())));

        let handler = |_: u32| -> Disposition { panic!("handler must not run on decode failure") };

        let result = decide(&codec, &handler, b"garbage").await;

        assert!(matches!(result, Err(AmqpError::DecodeError(_))));
    }
}
