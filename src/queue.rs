// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Queue Specification
//!
//! This module provides the queue specification used by the topology
//! manager. A queue is either durable or transient; every broker-level flag
//! the declaration needs is derived from that choice, so callers cannot
//! request contradictory combinations.

use lapin::options::QueueDeclareOptions;

/// Lifetime of a declared queue.
///
/// - `Durable`: survives broker restart, shared between connections.
/// - `Transient`: exclusive to the declaring connection and auto-deleted
///   when that connection closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    Durable,
    Transient,
}

/// Specification of a queue to declare and bind.
///
/// Built with the builder methods; the declaration flags are derived from
/// [`Durability`] and never set directly.
#[derive(Debug, Clone)]
pub struct QueueSpec {
    pub(crate) name: String,
    pub(crate) durability: Durability,
    pub(crate) dead_letter_exchange: Option<String>,
}

impl QueueSpec {
    /// Creates a durable queue specification with the given name.
    pub fn durable(name: &str) -> QueueSpec {
        QueueSpec {
            name: name.to_owned(),
            durability: Durability::Durable,
            dead_letter_exchange: None,
        }
    }

    /// Creates a transient queue specification with the given name.
    pub fn transient(name: &str) -> QueueSpec {
        QueueSpec {
            name: name.to_owned(),
            durability: Durability::Transient,
            dead_letter_exchange: None,
        }
    }

    /// Routes discarded and broker-rejected messages to the named exchange
    /// instead of dropping them.
    pub fn with_dead_letter_exchange(mut self, exchange: &str) -> Self {
        self.dead_letter_exchange = Some(exchange.to_owned());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn durability(&self) -> Durability {
        self.durability
    }

    /// Broker declaration flags derived from the durability mode.
    ///
    /// Transient implies `exclusive` and `auto_delete`; durable implies
    /// neither.
    pub(crate) fn declare_options(&self) -> QueueDeclareOptions {
        let transient = self.durability == Durability::Transient;

        QueueDeclareOptions {
            passive: false,
            durable: !transient,
            exclusive: transient,
            auto_delete: transient,
            nowait: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_derives_exclusive_and_auto_delete() {
        let opts = QueueSpec::transient("pause.alice").declare_options();

        assert!(!opts.durable);
        assert!(opts.exclusive);
        assert!(opts.auto_delete);
    }

    #[test]
    fn durable_derives_neither() {
        let opts = QueueSpec::durable("game_logs").declare_options();

        assert!(opts.durable);
        assert!(!opts.exclusive);
        assert!(!opts.auto_delete);
    }

    #[test]
    fn dead_letter_exchange_is_optional() {
        let plain = QueueSpec::durable("game_logs");
        let dead_lettered = QueueSpec::durable("game_logs").with_dead_letter_exchange("peril_dlx");

        assert!(plain.dead_letter_exchange.is_none());
        assert_eq!(
            dead_lettered.dead_letter_exchange.as_deref(),
            Some("peril_dlx")
        );
    }
}
