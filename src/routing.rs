// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Routing Conventions
//!
//! Exchange names, routing-key prefixes, and the wire types shared by the
//! game client and server. Routing keys are dot-separated; a `*` segment in
//! a binding key matches exactly one segment on the topic exchange.
//!
//! Two logical exchanges carry all traffic: a direct exchange for
//! control-plane messages addressed by exact key, and a topic exchange for
//! fan-out by pattern. Discarded messages are dead-lettered to a dedicated
//! exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direct exchange for control-plane messages (exact key match).
pub const EXCHANGE_PERIL_DIRECT: &str = "peril_direct";
/// Topic exchange for fan-out messages (wildcard-capable keys).
pub const EXCHANGE_PERIL_TOPIC: &str = "peril_topic";
/// Dead-letter exchange receiving discarded and rejected messages.
pub const EXCHANGE_PERIL_DLX: &str = "peril_dlx";

/// Routing key for pause/resume control messages.
pub const PAUSE_KEY: &str = "pause";
/// Routing-key prefix for army move broadcasts (`army_moves.<username>`).
pub const ARMY_MOVES_PREFIX: &str = "army_moves";
/// Routing-key prefix for war recognition messages (`war.<username>`).
pub const WAR_RECOGNITIONS_PREFIX: &str = "war";
/// Queue name and routing-key prefix for game log entries.
pub const GAME_LOG_SLUG: &str = "game_logs";

/// Whether the game is currently paused, broadcast on the direct exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayingState {
    pub is_paused: bool,
}

/// One game log entry, published on the topic exchange under
/// `game_logs.<username>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLog {
    pub current_time: DateTime<Utc>,
    pub username: String,
    pub message: String,
}

impl GameLog {
    pub fn new(username: &str, message: &str) -> Self {
        GameLog {
            current_time: Utc::now(),
            username: username.to_owned(),
            message: message.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{BincodeCodec, Codec, JsonCodec};

    #[test]
    fn playing_state_round_trips_through_both_codecs() {
        let state = PlayingState { is_paused: true };

        let json = JsonCodec;
        let payload = json.encode(&state).unwrap();
        assert_eq!(json.decode(&payload), Ok(state));

        let bin = BincodeCodec::new();
        let payload = bin.encode(&state).unwrap();
        assert_eq!(bin.decode(&payload), Ok(state));
    }

    #[test]
    fn game_log_round_trips_through_the_binary_codec() {
        let log = GameLog::new("alice", "won a war against bob");

        let bin = BincodeCodec::new();
        let payload = bin.encode(&log).unwrap();
        let decoded: GameLog = bin.decode(&payload).unwrap();

        assert_eq!(decoded, log);
    }
}
