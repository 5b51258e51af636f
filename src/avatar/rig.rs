//! In-memory avatar session.
//!
//! Holds the state a renderer would read each frame: where the head is
//! looking and the committed expression weights. Used when embedding the
//! pipeline without a live renderer, and throughout the tests.

use std::collections::{BTreeMap, BTreeSet};

use super::presets::BlendShapePreset;
use super::session::{AvatarSession, ExpressionKey, ExpressionWeights, HeadTarget, SessionError};
use crate::ai::command::Vec3;

#[derive(Debug, Clone, Default)]
pub struct HeadBone {
    target: Option<Vec3>,
}

impl HeadTarget for HeadBone {
    fn look_at(&mut self, point: Vec3) {
        self.target = Some(point);
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionRig {
    named: BTreeSet<String>,
    presets: BTreeSet<BlendShapePreset>,
    scale: f32,
    pending: BTreeMap<ExpressionKey, f32>,
    committed: BTreeMap<ExpressionKey, f32>,
    commits: usize,
}

impl Default for ExpressionRig {
    fn default() -> Self {
        Self {
            named: BTreeSet::new(),
            presets: BlendShapePreset::ALL.into_iter().collect(),
            scale: 1.0,
            pending: BTreeMap::new(),
            committed: BTreeMap::new(),
            commits: 0,
        }
    }
}

impl ExpressionRig {
    fn knows(&self, key: &ExpressionKey) -> bool {
        match key {
            ExpressionKey::Named(name) => self.named.contains(name),
            ExpressionKey::Preset(preset) => self.presets.contains(preset),
        }
    }
}

impl ExpressionWeights for ExpressionRig {
    fn weight_scale(&self) -> f32 {
        self.scale
    }

    fn set_weight(&mut self, key: &ExpressionKey, weight: f32) -> Result<(), SessionError> {
        if !self.knows(key) {
            return Err(SessionError::UnknownExpression(key.to_string()));
        }
        self.pending.insert(key.clone(), weight);
        Ok(())
    }

    fn commit(&mut self) {
        self.committed.append(&mut self.pending);
        self.commits += 1;
    }
}

/// A rig with an optional head bone and an optional expression proxy.
#[derive(Debug, Clone)]
pub struct RigSession {
    head: Option<HeadBone>,
    expressions: Option<ExpressionRig>,
}

impl Default for RigSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RigSession {
    /// Head bone plus every standard preset, weights in [0, 1].
    pub fn new() -> Self {
        Self {
            head: Some(HeadBone::default()),
            expressions: Some(ExpressionRig::default()),
        }
    }

    pub fn without_head(mut self) -> Self {
        self.head = None;
        self
    }

    pub fn without_expressions(mut self) -> Self {
        self.expressions = None;
        self
    }

    /// Add custom blend-shape groups addressable by exact name.
    pub fn with_named_expressions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(rig) = self.expressions.as_mut() {
            rig.named.extend(names.into_iter().map(Into::into));
        }
        self
    }

    /// Restrict the supported presets (some models only ship a few).
    pub fn with_presets<I>(mut self, presets: I) -> Self
    where
        I: IntoIterator<Item = BlendShapePreset>,
    {
        if let Some(rig) = self.expressions.as_mut() {
            rig.presets = presets.into_iter().collect();
        }
        self
    }

    pub fn with_weight_scale(mut self, scale: f32) -> Self {
        if let Some(rig) = self.expressions.as_mut() {
            rig.scale = scale;
        }
        self
    }

    pub fn look_at_target(&self) -> Option<Vec3> {
        self.head.as_ref().and_then(|h| h.target)
    }

    /// Committed weight, in the rig's native range.
    pub fn weight(&self, key: &ExpressionKey) -> Option<f32> {
        self.expressions
            .as_ref()
            .and_then(|rig| rig.committed.get(key).copied())
    }

    pub fn weights(&self) -> BTreeMap<ExpressionKey, f32> {
        self.expressions
            .as_ref()
            .map(|rig| rig.committed.clone())
            .unwrap_or_default()
    }

    pub fn commit_count(&self) -> usize {
        self.expressions.as_ref().map_or(0, |rig| rig.commits)
    }
}

impl AvatarSession for RigSession {
    fn head_orientation_target(&mut self) -> Option<&mut dyn HeadTarget> {
        self.head.as_mut().map(|h| h as &mut dyn HeadTarget)
    }

    fn expression_weights(&mut self) -> Option<&mut dyn ExpressionWeights> {
        self.expressions
            .as_mut()
            .map(|rig| rig as &mut dyn ExpressionWeights)
    }
}
