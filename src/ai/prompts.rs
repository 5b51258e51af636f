/// Worked example embedded in the prompt.
pub const COMMAND_EXAMPLE: &str =
    r#"{"lookAt":[0.5,1.4,0.8],"blendshapes":{"Joy":0.8},"viseme":"AA"}"#;

const COMMAND_PROMPT_HEAD: &str = r#"You are an assistant that maps a short user instruction to a compact JSON command for a 3D avatar.
Return ONLY valid JSON with keys:
- lookAt: [x,y,z] absolute world coordinates (float) (optional)
- blendshapes: { "<name>": 0.0-1.0 } optional
- viseme: "<label>" optional
Example: "#;

/// Render the command prompt for one instruction.
///
/// The user text is interpolated as-is. It is never escaped or evaluated.
pub fn build_command_prompt(user_text: &str) -> String {
    format!(
        "\n{}{}\nUser instruction: \"{}\"\nBe concise and return strictly JSON.\n",
        COMMAND_PROMPT_HEAD, COMMAND_EXAMPLE, user_text
    )
}
