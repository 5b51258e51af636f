pub mod applier;
pub mod presets;
pub mod rig;
pub mod sequence;
pub mod session;

pub use applier::{ApplyReport, AvatarCommandApplier};
pub use presets::BlendShapePreset;
pub use rig::RigSession;
pub use sequence::{ApplyGate, SequenceToken};
pub use session::{
    AvatarSession, ExpressionKey, ExpressionWeights, HeadTarget, SessionError, SessionLoader,
};
