//! Interactive login: phone number, then the code Telegram sends, then the
//! two-factor password when the account has one.

use crate::api::{SignInOutcome, TelegramApi};
use crate::credentials::PhoneNumber;
use async_trait::async_trait;
use feedprobe_core::{Account, TelegramError};
use std::io::{self, Write};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Uninitialized,
    AwaitingPhone,
    AwaitingCode,
    AwaitingPassword,
    Authenticated,
    Disconnected,
}

/// Source of the secrets the user types during login.
#[async_trait]
pub trait LoginPrompt: Send + Sync {
    async fn login_code(&self) -> Result<String, TelegramError>;

    async fn password(&self, hint: Option<&str>) -> Result<String, TelegramError>;
}

/// Reads answers from the terminal on a blocking thread.
///
/// A pending read cannot be interrupted. A runtime dropped while one is
/// outstanding waits for it, so cancellable callers shut down with
/// `Runtime::shutdown_background`.
pub struct StdinPrompt;

impl StdinPrompt {
    async fn ask(question: String) -> Result<String, TelegramError> {
        tokio::task::spawn_blocking(move || -> io::Result<String> {
            print!("{}", question);
            io::stdout().flush()?;
            let mut answer = String::new();
            io::stdin().read_line(&mut answer)?;
            Ok(answer.trim_end_matches(['\r', '\n']).to_string())
        })
        .await
        .map_err(|e| TelegramError::Prompt {
            reason: e.to_string(),
        })?
        .map_err(|e| TelegramError::Prompt {
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl LoginPrompt for StdinPrompt {
    async fn login_code(&self) -> Result<String, TelegramError> {
        Self::ask("Enter the code you received: ".to_string()).await
    }

    async fn password(&self, hint: Option<&str>) -> Result<String, TelegramError> {
        let question = match hint {
            Some(hint) => format!("Enter your two-factor password (hint: {}): ", hint),
            None => "Enter your two-factor password: ".to_string(),
        };
        Self::ask(question).await
    }
}

pub struct Authenticator<'a, A: TelegramApi + ?Sized> {
    api: &'a A,
    state: AuthState,
}

impl<'a, A: TelegramApi + ?Sized> Authenticator<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            state: AuthState::Uninitialized,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Signs in unless the session already is, then persists the session.
    ///
    /// `phone` is only consulted when a fresh login is needed. On failure the
    /// state stays at the step that failed.
    pub async fn ensure_authorized(
        &mut self,
        phone: Option<&PhoneNumber>,
        prompt: &dyn LoginPrompt,
    ) -> Result<Account, TelegramError> {
        if self.api.is_authorized().await? {
            debug!("Session is already authorized");
            let account = self.api.get_me().await?;
            self.state = AuthState::Authenticated;
            return Ok(account);
        }

        self.state = AuthState::AwaitingPhone;
        let phone = phone.ok_or_else(|| TelegramError::MissingCredential {
            field: "phone".to_string(),
        })?;
        self.api.request_login_code(phone).await?;

        self.state = AuthState::AwaitingCode;
        info!("Login code sent to {}", phone);
        let code = prompt.login_code().await?;

        let account = match self.api.sign_in(code.trim()).await? {
            SignInOutcome::SignedIn(account) => account,
            SignInOutcome::PasswordRequired { hint } => {
                self.state = AuthState::AwaitingPassword;
                let password = prompt.password(hint.as_deref()).await?;
                self.api.check_password(&password).await?
            }
        };

        let path = self.api.save_session().await?;
        info!("Signed in, session saved to {}", path.display());
        self.state = AuthState::Authenticated;
        Ok(account)
    }

    pub async fn disconnect(&mut self) {
        self.api.disconnect().await;
        self.state = AuthState::Disconnected;
    }
}
