//! Article summaries via an external command-line assistant.
//!
//! The prompt goes to the child's stdin and its stdout is the summary. Every
//! failure is folded into an `"Error: ..."` string so a caller can show it
//! inline in place of the summary.

use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::SummarizerConfig;
use crate::storage::Article;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Error: {command} not found. Please ensure {command} is installed.")]
    NotFound { command: String },

    #[error("Error: {command} timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("Error: {command} returned code {code}\n{stderr}")]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Error: {0}")]
    Io(#[from] std::io::Error),
}

/// The instruction sent for `article`.
pub fn build_prompt(article: &Article) -> String {
    format!(
        "Summarize this news article in 3-5 bullet points, focusing on key technical details and impact:\n\
         \n\
         Title: {}\n\
         Source: {}\n\
         URL: {}\n\
         \n\
         Content:\n\
         {}\n\
         \n\
         Provide a concise summary highlighting:\n\
         - Main announcement or development\n\
         - Key technical details\n\
         - Impact on developers/users",
        article.title, article.source, article.url, article.snippet
    )
}

/// Summary text for `article`, or an `"Error: ..."` line. Never fails.
pub async fn summarize(article: &Article, config: &SummarizerConfig) -> String {
    match try_summarize(article, config).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!(url = %article.url, command = %config.command, error = %e, "Summarization failed");
            e.to_string()
        }
    }
}

pub async fn try_summarize(
    article: &Article,
    config: &SummarizerConfig,
) -> Result<String, SummarizeError> {
    let prompt = build_prompt(article);
    run_command(config, &prompt).await
}

async fn run_command(config: &SummarizerConfig, input: &str) -> Result<String, SummarizeError> {
    let mut child = match Command::new(&config.command)
        .args(&config.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SummarizeError::NotFound {
                command: config.command.clone(),
            })
        }
        Err(e) => return Err(SummarizeError::Io(e)),
    };

    let run = async move {
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input.as_bytes()).await {
                Ok(()) => {}
                // The child may exit without reading its input
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(e),
            }
            // Dropping stdin closes the pipe so the child sees EOF
        }
        child.wait_with_output().await
    };

    let output = match tokio::time::timeout(config.timeout(), run).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(SummarizeError::Timeout {
                command: config.command.clone(),
                secs: config.timeout_secs,
            })
        }
    };

    if !output.status.success() {
        return Err(SummarizeError::Failed {
            command: config.command.clone(),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> Article {
        Article::new(
            "Codex goes GA",
            "https://openai.com/codex",
            None,
            "OpenAI",
            "General availability today.",
            "Codex",
        )
    }

    fn config(command: &str, args: &[&str], timeout_secs: u64) -> SummarizerConfig {
        SummarizerConfig {
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            timeout_secs,
        }
    }

    #[test]
    fn test_prompt_contains_article_fields() {
        let prompt = build_prompt(&article());
        assert!(prompt.starts_with("Summarize this news article in 3-5 bullet points"));
        assert!(prompt.contains("Title: Codex goes GA\n"));
        assert!(prompt.contains("Source: OpenAI\n"));
        assert!(prompt.contains("URL: https://openai.com/codex\n"));
        assert!(prompt.contains("Content:\nGeneral availability today.\n"));
        assert!(prompt.ends_with("- Impact on developers/users"));
    }

    #[tokio::test]
    async fn test_missing_command_is_inline_error() {
        let out = summarize(&article(), &config("toadman-no-such-binary", &[], 5)).await;
        assert_eq!(
            out,
            "Error: toadman-no-such-binary not found. Please ensure toadman-no-such-binary is installed."
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_summary() {
        // `cat` echoes the prompt back
        let out = summarize(&article(), &config("cat", &[], 5)).await;
        assert_eq!(out, build_prompt(&article()).trim());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_reports_code_and_stderr() {
        let cfg = config("sh", &["-c", "echo boom >&2; exit 3"], 5);
        let out = summarize(&article(), &cfg).await;
        assert_eq!(out, "Error: sh returned code 3\nboom");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_is_inline_error() {
        let out = summarize(&article(), &config("sleep", &["5"], 1)).await;
        assert_eq!(out, "Error: sleep timed out after 1s");
    }
}
