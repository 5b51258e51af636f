//! The avatar command: what the pipeline hands to the applier and returns
//! over HTTP.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Absolute world-space point.
pub type Vec3 = [f64; 3];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarCommand {
    #[serde(rename = "lookAt", default, skip_serializing_if = "Option::is_none")]
    pub look_at: Option<Vec3>,
    /// Expression name → weight in [0, 1] once validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blendshapes: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viseme: Option<String>,
    /// Diagnostic only; set when structured extraction failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl AvatarCommand {
    /// Nothing that would touch the avatar.
    pub fn is_noop(&self) -> bool {
        self.look_at.is_none() && self.blendshapes.is_none() && self.viseme.is_none()
    }
}
