//! Ordering guard for overlapping instructions.
//!
//! Inference calls finish in whatever order the network decides. A caller
//! that issues several instructions back to back takes a token for each
//! before calling out, and applies a response only while its token is
//! still the newest one. Stale responses are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::applier::{ApplyReport, AvatarCommandApplier};
use super::session::AvatarSession;
use crate::ai::command::AvatarCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SequenceToken(u64);

#[derive(Debug, Default)]
pub struct ApplyGate {
    latest: AtomicU64,
}

impl ApplyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a token for a new instruction. Invalidates all earlier tokens.
    pub fn issue(&self) -> SequenceToken {
        SequenceToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: SequenceToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Apply `command` only if `token` is still the newest.
    pub fn apply_if_current(
        &self,
        token: SequenceToken,
        applier: &AvatarCommandApplier,
        command: &AvatarCommand,
        session: &mut dyn AvatarSession,
    ) -> Option<ApplyReport> {
        if !self.is_current(token) {
            debug!("[Avatar] Dropping stale response #{}", token.0);
            return None;
        }
        Some(applier.apply(command, session))
    }
}
