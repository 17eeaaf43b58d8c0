//! Interactive confirmation flow.
//!
//! Nothing is ever executed or copied without an explicit "y"; a bare
//! return or any reply outside the offered choice set is treated as "no".
//! Prompts read from a caller-supplied reader so the flow can be driven
//! from tests; the entry point passes stdin.

use crate::executor::ShellStrategy;
use crate::suggestion::CommandSuggestion;
use anyhow::{Context, Result};
use arboard::Clipboard;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Show the suggested command and its explanation.
pub fn display_suggestion(suggestion: &CommandSuggestion) {
    println!();
    println!("Command:     {}", suggestion.command);
    println!("Explanation: {}", suggestion.explanation);
    println!();
}

/// Execute-oriented flow: confirm, optionally edit, then run.
pub async fn confirm_and_run<R>(
    suggestion: &CommandSuggestion,
    strategy: &ShellStrategy,
    input: &mut R,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let reply = ask("Execute the command? [y/n/e]: ", input).await?;
    match normalize_reply(&reply).as_str() {
        "y" => run_and_report(&suggestion.command, strategy).await,
        "e" => {
            let command = edit_command(&suggestion.command, input).await?;
            run_and_report(&command, strategy).await
        }
        _ => {
            eprintln!("Not executing.");
            Ok(())
        }
    }
}

/// Clipboard-oriented flow: confirm, then copy.
pub async fn confirm_and_copy<R>(suggestion: &CommandSuggestion, input: &mut R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let reply = ask("Copy to clipboard? [y/n]: ", input).await?;
    if normalize_reply(&reply) == "y" {
        copy_to_clipboard(&suggestion.command);
    } else {
        eprintln!("Not copying.");
    }
    Ok(())
}

async fn run_and_report(command: &str, strategy: &ShellStrategy) -> Result<()> {
    let result = strategy.run(command).await;

    if !result.stdout.is_empty() {
        println!("{}", result.stdout);
    }
    if !result.stderr.is_empty() {
        eprintln!("{}", result.stderr);
    }
    if result.timed_out {
        eprintln!("Command timed out and was terminated.");
    } else if result.exit_code != 0 {
        eprintln!("Command exited with status {}.", result.exit_code);
    }
    Ok(())
}

/// Show the current command and read a replacement line. A blank reply
/// keeps the original unchanged; it is never a cancel.
async fn edit_command<R>(command: &str, input: &mut R) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    println!("Current command: {command}");
    let reply = ask("> ", input).await?;
    Ok(apply_edit(command, &reply))
}

fn apply_edit(current: &str, reply: &str) -> String {
    let reply = reply.trim();
    if reply.is_empty() {
        current.to_string()
    } else {
        reply.to_string()
    }
}

fn copy_to_clipboard(command: &str) {
    match Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(command) {
                eprintln!("Could not copy to clipboard: {e}");
            } else {
                println!("Copied to clipboard.");
            }
        }
        Err(e) => eprintln!("Could not access clipboard: {e}"),
    }
}

/// Print a prompt and read one line. EOF reads as an empty reply, which
/// every caller treats as the safe default.
async fn ask<R>(prompt: &str, input: &mut R) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    use std::io::Write;
    print!("{prompt}");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .await
        .context("Failed to read reply")?;
    Ok(line)
}

/// The trimmed, lowercased reply, compared whole against the choice set.
/// "yes", "yikes" or any other non-choice reply falls through to "no".
fn normalize_reply(reply: &str) -> String {
    reply.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn suggestion(command: &str) -> CommandSuggestion {
        CommandSuggestion {
            command: command.to_string(),
            explanation: "test command".to_string(),
        }
    }

    fn marker_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tai-interact-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_blank_edit_keeps_original() {
        assert_eq!(apply_edit("dir /a", ""), "dir /a");
        assert_eq!(apply_edit("dir /a", "   \n"), "dir /a");
    }

    #[test]
    fn test_edit_replaces_command() {
        assert_eq!(apply_edit("dir /a", "ls -la"), "ls -la");
        assert_eq!(apply_edit("dir /a", "  ls -la \n"), "ls -la");
    }

    #[test]
    fn test_bare_return_is_no() {
        assert_eq!(normalize_reply(""), "");
        assert_eq!(normalize_reply("\n"), "");
    }

    #[test]
    fn test_replies_are_case_insensitive() {
        assert_eq!(normalize_reply("Y\n"), "y");
        assert_eq!(normalize_reply(" E "), "e");
    }

    #[test]
    fn test_only_exact_choices_match() {
        // Anything outside the choice set reads as "no"
        assert_ne!(normalize_reply("yikes"), "y");
        assert_ne!(normalize_reply("yes"), "y");
        assert_ne!(normalize_reply("edit"), "e");
        assert_ne!(normalize_reply("y e s"), "y");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_confirming_runs_the_command() {
        let path = marker_path("confirm");
        let _ = std::fs::remove_file(&path);
        let s = suggestion(&format!("touch {}", path.display()));
        let strategy = ShellStrategy::Unix { shell: "sh" };

        confirm_and_run(&s, &strategy, &mut &b"y\n"[..]).await.unwrap();

        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_bare_return_does_not_run() {
        let path = marker_path("decline");
        let _ = std::fs::remove_file(&path);
        let s = suggestion(&format!("touch {}", path.display()));
        let strategy = ShellStrategy::Unix { shell: "sh" };

        confirm_and_run(&s, &strategy, &mut &b"\n"[..]).await.unwrap();

        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_prefix_reply_does_not_run() {
        let path = marker_path("prefix");
        let _ = std::fs::remove_file(&path);
        let s = suggestion(&format!("touch {}", path.display()));
        let strategy = ShellStrategy::Unix { shell: "sh" };

        confirm_and_run(&s, &strategy, &mut &b"yikes\n"[..]).await.unwrap();

        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_edit_with_blank_reply_runs_original() {
        let path = marker_path("edit-blank");
        let _ = std::fs::remove_file(&path);
        let s = suggestion(&format!("touch {}", path.display()));
        let strategy = ShellStrategy::Unix { shell: "sh" };

        confirm_and_run(&s, &strategy, &mut &b"e\n\n"[..]).await.unwrap();

        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_edit_with_replacement_runs_new_command() {
        let original = marker_path("edit-orig");
        let replacement = marker_path("edit-repl");
        let _ = std::fs::remove_file(&original);
        let _ = std::fs::remove_file(&replacement);
        let s = suggestion(&format!("touch {}", original.display()));
        let strategy = ShellStrategy::Unix { shell: "sh" };

        let script = format!("e\ntouch {}\n", replacement.display());
        confirm_and_run(&s, &strategy, &mut script.as_bytes())
            .await
            .unwrap();

        assert!(!original.exists());
        assert!(replacement.exists());
        let _ = std::fs::remove_file(&replacement);
    }
}
