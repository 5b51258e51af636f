pub mod command;
pub mod extractor;
pub mod pipeline;
pub mod prompts;
pub mod validator;

pub use command::{AvatarCommand, Vec3};
pub use extractor::{extract, ExtractMode};
pub use pipeline::{CommandPipeline, PipelineError};
pub use prompts::build_command_prompt;
pub use validator::validate;
