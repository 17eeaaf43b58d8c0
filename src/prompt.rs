//! System prompt construction.
//!
//! The prompt is deterministic for a given platform: no randomness, no I/O.
//! It embeds the literal JSON schema the model must answer with, so
//! prompt-level regression tests can compare bytes.

use crate::platform::Platform;

/// Build the instruction text sent to the model for `platform`.
pub fn build_prompt(platform: Platform) -> String {
    let (example_command, example_explanation) = match platform {
        Platform::Windows => (
            "dir /a",
            "Lists all files and folders, including hidden ones",
        ),
        Platform::Linux | Platform::MacOs => (
            "ls -la",
            "Lists all files including hidden ones, in long format",
        ),
    };

    format!(
        r#"You are an expert system administrator for the {platform} platform. Your task is to translate the user's request into a single {platform} shell command and answer STRICTLY following the JSON schema below.

Rules:
- Analyze the request with precision and provide the exact command to execute plus a brief, clear explanation of what it does.
- If you do not confidently know a correct command, set "known_command" to false, leave "command" empty, and explain that you do not know it.
- NEVER answer with a command for a different platform family. The "platform" field must always be "{platform}".
- NEVER include anything outside the JSON object. No markdown, no backticks, no preamble.
- NEVER omit the explanation, even for unknown commands.

Your response MUST conform to this schema:
{{
    "command": "the command to execute (string)",
    "explanation": "brief explanation of what the command does (string)",
    "known_command": "whether the command is known and valid (boolean)",
    "platform": "the platform the command is for (string)"
}}

Example response for a known command:
{{
    "command": "{example_command}",
    "explanation": "{example_explanation}",
    "known_command": true,
    "platform": "{platform}"
}}

Example response for an unknown command:
{{
    "command": "",
    "explanation": "I do not know this command",
    "known_command": false,
    "platform": "{platform}"
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_byte_stable() {
        for p in [Platform::Windows, Platform::Linux, Platform::MacOs] {
            assert_eq!(build_prompt(p), build_prompt(p));
        }
    }

    #[test]
    fn test_prompt_names_platform() {
        let prompt = build_prompt(Platform::MacOs);
        assert!(prompt.contains("the macos platform"));
        assert!(prompt.contains(r#""platform": "macos""#));
        assert!(!prompt.contains("windows"));
    }

    #[test]
    fn test_prompt_embeds_schema_fields() {
        let prompt = build_prompt(Platform::Linux);
        for field in ["\"command\"", "\"explanation\"", "\"known_command\"", "\"platform\""] {
            assert!(prompt.contains(field), "missing schema field {field}");
        }
    }

    #[test]
    fn test_prompt_uses_platform_example() {
        assert!(build_prompt(Platform::Windows).contains("dir /a"));
        assert!(build_prompt(Platform::Linux).contains("ls -la"));
    }

    #[test]
    fn test_prompt_instructs_unknown_handling() {
        let prompt = build_prompt(Platform::Linux);
        assert!(prompt.contains(r#"set "known_command" to false"#));
        assert!(prompt.contains(r#"leave "command" empty"#));
    }
}
