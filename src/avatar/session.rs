//! Avatar session interface, implemented by whatever owns the loaded rig.
//!
//! The command pipeline never loads or parses model files. A renderer hands
//! it something implementing `AvatarSession`, and the applier only talks to
//! the head target and the expression weights through these traits.

use thiserror::Error;

use super::presets::BlendShapePreset;
use crate::ai::command::Vec3;

// ── Error Types ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("unknown expression: {0}")]
    UnknownExpression(String),
    #[error("failed to load avatar: {0}")]
    Load(String),
}

// ── Expression Keys ────────────────────────────────────

/// How an expression is addressed on the rig.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExpressionKey {
    /// A custom blend-shape group, by exact name.
    Named(String),
    /// One of the standard presets.
    Preset(BlendShapePreset),
}

impl std::fmt::Display for ExpressionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpressionKey::Named(name) => f.write_str(name),
            ExpressionKey::Preset(preset) => write!(f, "preset:{}", preset),
        }
    }
}

// ── Collaborator Traits ────────────────────────────────

/// The bone (usually the head) that can be pointed at a world position.
pub trait HeadTarget {
    fn look_at(&mut self, point: Vec3);
}

/// Batched expression weights. Writes are staged until `commit`.
pub trait ExpressionWeights {
    /// Upper end of the rig's native weight range; [0,1] is scaled onto [0, scale].
    fn weight_scale(&self) -> f32 {
        1.0
    }

    fn set_weight(&mut self, key: &ExpressionKey, weight: f32) -> Result<(), SessionError>;

    fn commit(&mut self);
}

pub trait AvatarSession: Send {
    fn head_orientation_target(&mut self) -> Option<&mut dyn HeadTarget>;

    fn expression_weights(&mut self) -> Option<&mut dyn ExpressionWeights>;
}

/// Builds a session from model bytes. Provided by the rendering side.
pub trait SessionLoader: Send + Sync {
    fn load_session(&self, model_bytes: &[u8]) -> Result<Box<dyn AvatarSession>, SessionError>;
}

impl<F> SessionLoader for F
where
    F: Fn(&[u8]) -> Result<Box<dyn AvatarSession>, SessionError> + Send + Sync,
{
    fn load_session(&self, model_bytes: &[u8]) -> Result<Box<dyn AvatarSession>, SessionError> {
        self(model_bytes)
    }
}
