//! Applies a validated command to an avatar session.
//!
//! Applying never fails. Each field is attempted independently and whatever
//! could not be applied is listed in the returned `ApplyReport`.

use serde::Serialize;
use tracing::debug;

use super::presets::BlendShapePreset;
use super::session::{AvatarSession, ExpressionKey, ExpressionWeights};
use crate::ai::command::AvatarCommand;
use crate::ai::validator::clamp_weight;

/// What actually reached the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplyReport {
    /// Head was pointed at `lookAt`.
    pub look_at: bool,
    /// Blend-shape names that were set.
    pub applied: Vec<String>,
    /// Blend-shape names neither the rig nor the preset table knew.
    pub skipped: Vec<String>,
    /// Mouth preset driven by the viseme label.
    pub viseme: Option<BlendShapePreset>,
    /// Expression batch was committed.
    pub committed: bool,
}

#[derive(Debug, Clone)]
pub struct AvatarCommandApplier {
    /// Weight (in [0, 1]) given to the mouth preset a viseme maps to.
    pub viseme_weight: f32,
}

impl Default for AvatarCommandApplier {
    fn default() -> Self {
        Self { viseme_weight: 1.0 }
    }
}

impl AvatarCommandApplier {
    pub fn new(viseme_weight: f32) -> Self {
        Self {
            viseme_weight: clamp_weight(f64::from(viseme_weight)) as f32,
        }
    }

    pub fn apply(&self, command: &AvatarCommand, session: &mut dyn AvatarSession) -> ApplyReport {
        let mut report = ApplyReport::default();

        if let Some(point) = command.look_at {
            if let Some(head) = session.head_orientation_target() {
                head.look_at(point);
                report.look_at = true;
            } else {
                debug!("[Avatar] No head target, ignoring lookAt");
            }
        }

        let viseme_preset = command
            .viseme
            .as_deref()
            .and_then(BlendShapePreset::for_viseme);
        if command.blendshapes.is_none() && viseme_preset.is_none() {
            return report;
        }

        let Some(rig) = session.expression_weights() else {
            debug!("[Avatar] Session has no expression weights, ignoring expressions");
            if let Some(shapes) = &command.blendshapes {
                report.skipped.extend(shapes.keys().cloned());
            }
            return report;
        };
        let scale = rig.weight_scale();

        if let Some(shapes) = &command.blendshapes {
            for (name, weight) in shapes {
                // Validated weights are already in [0,1]; clamp again so a
                // hand-built command can't push the rig out of range.
                let native = clamp_weight(*weight) as f32 * scale;
                if set_by_name(rig, name, native) {
                    report.applied.push(name.clone());
                } else {
                    debug!("[Avatar] Skipping unknown expression '{}'", name);
                    report.skipped.push(name.clone());
                }
            }
        }

        if let Some(preset) = viseme_preset {
            match rig.set_weight(&ExpressionKey::Preset(preset), self.viseme_weight * scale) {
                Ok(()) => report.viseme = Some(preset),
                Err(e) => debug!("[Avatar] Viseme not applied: {}", e),
            }
        }

        rig.commit();
        report.committed = true;
        report
    }
}

/// Exact name first, then the preset vocabulary.
fn set_by_name(rig: &mut dyn ExpressionWeights, name: &str, weight: f32) -> bool {
    if rig
        .set_weight(&ExpressionKey::Named(name.to_string()), weight)
        .is_ok()
    {
        return true;
    }
    BlendShapePreset::from_name(name)
        .map(|preset| rig.set_weight(&ExpressionKey::Preset(preset), weight).is_ok())
        .unwrap_or(false)
}
