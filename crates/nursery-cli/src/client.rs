//! Shared context, error mapping and confirmation prompts for the CLI.

use std::fmt::{self, Display, Formatter};
use std::io::{self, BufRead, Write};

use anyhow::anyhow;
use nursery_client::{ApiClient, ApiError};
use nursery_signals::{ConfirmationError, ConfirmationOptions, Signals};

use crate::cli::OutputFormat;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Unauthorized(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
            Self::Unauthorized(_) => 4,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Unauthorized(message) => {
                format!("{message} (run `nursery login` to sign in again)")
            }
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation {
                message,
                field_errors,
                ..
            } => {
                let details = field_errors
                    .iter()
                    .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
                    .collect::<Vec<_>>();
                if details.is_empty() {
                    Self::Validation(message)
                } else {
                    Self::Validation(format!("{message} ({})", details.join("; ")))
                }
            }
            ApiError::InvalidArgument { message } => Self::Validation(message),
            ApiError::Unauthorized { message } => Self::Unauthorized(message),
            other => Self::Failure(anyhow::Error::new(other)),
        }
    }
}

/// Reads one line of input after showing `prompt`.
pub(crate) type AskFn = fn(&str) -> io::Result<String>;

/// Prompt on stderr and read the answer from stdin.
pub(crate) fn ask_stdin(prompt: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{prompt}")?;
    stderr.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer)
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: ApiClient,
    pub(crate) output: OutputFormat,
    pub(crate) assume_yes: bool,
    pub(crate) nursery_id: Option<String>,
    pub(crate) ask: AskFn,
}

impl AppContext {
    pub(crate) fn signals(&self) -> &Signals {
        self.client.signals()
    }

    /// Nursery from `--nursery`, falling back to the signed-in operator's.
    pub(crate) fn nursery_id(&self) -> CliResult<String> {
        self.nursery_id
            .clone()
            .or_else(|| {
                self.client
                    .session()
                    .and_then(|session| session.user.nursery_id)
            })
            .ok_or_else(|| {
                CliError::validation(
                    "nursery id is required (pass --nursery or sign in with an assigned nursery)",
                )
            })
    }

    /// Route a destructive action through the confirmation broker.
    ///
    /// `--yes` accepts without prompting. Otherwise the answer is read with
    /// [`AppContext::ask`]; `y`, `yes` or the confirm label accept.
    pub(crate) async fn confirm(&self, options: ConfirmationOptions) -> CliResult<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        let broker = &self.signals().confirmations;
        let prompt = format!(
            "{}\n{} [{}/{}]: ",
            options.title, options.message, options.confirm_label, options.cancel_label
        );
        let accept_label = options.confirm_label.to_ascii_lowercase();
        let pending = broker.show(options);

        let ask = self.ask;
        let answer = tokio::task::spawn_blocking(move || ask(&prompt))
            .await
            .map_err(|err| CliError::failure(anyhow!("prompt task failed: {err}")))?;
        match answer {
            Ok(answer) => {
                let answer = answer.trim().to_ascii_lowercase();
                if answer == "y" || answer == "yes" || answer == accept_label {
                    broker.confirm();
                } else {
                    broker.cancel();
                }
            }
            Err(err) => {
                broker.close();
                return Err(CliError::failure(anyhow!("failed to read answer: {err}")));
            }
        }

        match pending.await {
            Ok(accepted) => Ok(accepted),
            Err(ConfirmationError::Dismissed | ConfirmationError::Superseded) => Ok(false),
        }
    }
}


#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use httpmock::MockServer;
    use nursery_signals::ConfirmationVariant;

    use super::testing::{answer_no, answer_yes, context_with};
    use super::*;

    #[test]
    fn api_errors_map_to_exit_codes() {
        let mut field_errors = BTreeMap::new();
        field_errors.insert("name".to_string(), vec!["required".to_string()]);
        let validation = CliError::from(ApiError::Validation {
            status: 422,
            message: "Validation failed".to_string(),
            field_errors,
        });
        assert_eq!(validation.exit_code(), 2);
        assert_eq!(
            validation.display_message(),
            "Validation failed (name: required)"
        );

        let unauthorized = CliError::from(ApiError::Unauthorized {
            message: "expired".to_string(),
        });
        assert_eq!(unauthorized.exit_code(), 4);
        assert!(unauthorized.display_message().contains("nursery login"));

        let server = CliError::from(ApiError::Server {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(server.exit_code(), 3);
        assert_eq!(server.display_message(), "boom");
    }

    #[tokio::test]
    async fn confirm_follows_answer_and_yes_flag() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let options = || {
            ConfirmationOptions::new("Delete breed", "This cannot be undone.")
                .confirm_label("Delete")
                .variant(ConfirmationVariant::Danger)
        };

        assert!(
            context_with(&server, false, answer_yes)
                .confirm(options())
                .await
                .map_err(|err| anyhow!(err.display_message()))?
        );
        assert!(
            !context_with(&server, false, answer_no)
                .confirm(options())
                .await
                .map_err(|err| anyhow!(err.display_message()))?
        );
        assert!(
            context_with(&server, true, answer_no)
                .confirm(options())
                .await
                .map_err(|err| anyhow!(err.display_message()))?
        );

        let ctx = context_with(&server, false, |_| Ok("DELETE".to_string()));
        assert!(ctx
            .confirm(options())
            .await
            .map_err(|err| anyhow!(err.display_message()))?);
        assert!(!ctx.signals().confirmations.state().is_open);
        Ok(())
    }

    #[test]
    fn nursery_id_prefers_flag_then_session() {
        let server = MockServer::start();
        let mut ctx = context_with(&server, false, answer_no);
        assert_eq!(ctx.nursery_id().ok(), Some("n1".to_string()));
        ctx.nursery_id = Some("n7".to_string());
        assert_eq!(ctx.nursery_id().ok(), Some("n7".to_string()));
    }
}
