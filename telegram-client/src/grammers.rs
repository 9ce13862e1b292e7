//! `TelegramApi` backed by the grammers MTProto client.

use crate::api::{FetchedMessage, SignInOutcome, TelegramApi};
use crate::credentials::{ApiCredentials, PhoneNumber};
use async_trait::async_trait;
use feedprobe_core::{Account, EntityKind, ResolvedEntity, TelegramError};
use grammers_client::types::{Chat, LoginToken, PasswordToken, User};
use grammers_client::{Client, Config, InitParams, SignInError};
use grammers_session::{PackedChat, Session};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub struct GrammersApi {
    client: Mutex<Option<Client>>,
    session_path: PathBuf,
    login_token: Mutex<Option<LoginToken>>,
    password_token: Mutex<Option<PasswordToken>>,
    chats: Mutex<HashMap<i64, PackedChat>>,
}

impl GrammersApi {
    /// Opens the session file at `session_path` (creating it if absent) and connects.
    pub async fn connect(
        credentials: &ApiCredentials,
        session_path: impl Into<PathBuf>,
    ) -> Result<Self, TelegramError> {
        let session_path = session_path.into();
        let session = Session::load_file_or_create(&session_path)
            .map_err(|e| session_error(&session_path, e))?;

        info!("Connecting to Telegram (session {})", session_path.display());
        let client = Client::connect(Config {
            session,
            api_id: credentials.api_id,
            api_hash: credentials.api_hash.clone(),
            params: InitParams {
                catch_up: false,
                ..Default::default()
            },
        })
        .await
        .map_err(|e| TelegramError::ConnectionFailed {
            reason: e.to_string(),
        })?;
        debug!("Connected to Telegram");

        Ok(Self {
            client: Mutex::new(Some(client)),
            session_path,
            login_token: Mutex::new(None),
            password_token: Mutex::new(None),
            chats: Mutex::new(HashMap::new()),
        })
    }

    async fn client(&self) -> Result<Client, TelegramError> {
        self.client
            .lock()
            .await
            .as_ref()
            .cloned()
            .ok_or(TelegramError::Disconnected)
    }
}

#[async_trait]
impl TelegramApi for GrammersApi {
    async fn is_authorized(&self) -> Result<bool, TelegramError> {
        self.client()
            .await?
            .is_authorized()
            .await
            .map_err(invocation_error)
    }

    async fn request_login_code(&self, phone: &PhoneNumber) -> Result<(), TelegramError> {
        info!("Requesting login code for {}", phone);
        let token = self
            .client()
            .await?
            .request_login_code(phone.as_str())
            .await
            .map_err(|e| TelegramError::AuthorizationFailed {
                reason: e.to_string(),
            })?;
        *self.login_token.lock().await = Some(token);
        Ok(())
    }

    async fn sign_in(&self, code: &str) -> Result<SignInOutcome, TelegramError> {
        let client = self.client().await?;
        let token = self
            .login_token
            .lock()
            .await
            .take()
            .ok_or_else(|| TelegramError::AuthorizationFailed {
                reason: "no login code was requested".to_string(),
            })?;

        match client.sign_in(&token, code).await {
            Ok(user) => Ok(SignInOutcome::SignedIn(account_from(&user))),
            Err(SignInError::PasswordRequired(password_token)) => {
                let hint = password_token.hint().map(str::to_string);
                *self.password_token.lock().await = Some(password_token);
                Ok(SignInOutcome::PasswordRequired { hint })
            }
            Err(SignInError::InvalidCode) => Err(TelegramError::InvalidCode),
            Err(SignInError::SignUpRequired { .. }) => Err(TelegramError::SignUpRequired),
            Err(e) => Err(TelegramError::AuthorizationFailed {
                reason: e.to_string(),
            }),
        }
    }

    async fn check_password(&self, password: &str) -> Result<Account, TelegramError> {
        let client = self.client().await?;
        let token = self
            .password_token
            .lock()
            .await
            .take()
            .ok_or_else(|| TelegramError::AuthorizationFailed {
                reason: "no password was requested".to_string(),
            })?;

        match client.check_password(token, password).await {
            Ok(user) => Ok(account_from(&user)),
            Err(SignInError::InvalidPassword) => Err(TelegramError::InvalidPassword),
            Err(e) => Err(TelegramError::AuthorizationFailed {
                reason: e.to_string(),
            }),
        }
    }

    async fn get_me(&self) -> Result<Account, TelegramError> {
        let me = self
            .client()
            .await?
            .get_me()
            .await
            .map_err(invocation_error)?;
        Ok(account_from(&me))
    }

    async fn resolve_entity(&self, name: &str) -> Result<Option<ResolvedEntity>, TelegramError> {
        let username = name.trim().trim_start_matches('@');
        debug!("Resolving @{}", username);

        let chat = self
            .client()
            .await?
            .resolve_username(username)
            .await
            .map_err(invocation_error)?;

        let Some(chat) = chat else {
            return Ok(None);
        };

        let kind = match &chat {
            Chat::User(_) => EntityKind::User,
            Chat::Group(_) => EntityKind::Group,
            Chat::Channel(_) => EntityKind::Channel,
        };
        let entity = ResolvedEntity {
            id: chat.id(),
            kind,
            title: chat.name().to_string(),
            username: chat.username().map(str::to_string),
        };
        self.chats.lock().await.insert(entity.id, chat.pack());
        Ok(Some(entity))
    }

    async fn recent_messages(
        &self,
        entity: &ResolvedEntity,
        limit: usize,
    ) -> Result<Vec<FetchedMessage>, TelegramError> {
        let packed = self
            .chats
            .lock()
            .await
            .get(&entity.id)
            .copied()
            .ok_or_else(|| TelegramError::EntityNotFound {
                name: entity.title.clone(),
            })?;

        let client = self.client().await?;
        let mut iter = client.iter_messages(packed).limit(limit);
        let mut messages = Vec::with_capacity(limit.min(100));

        while let Some(message) = iter.next().await.map_err(invocation_error)? {
            let text = message.text();
            messages.push(FetchedMessage {
                id: message.id(),
                date: message.date(),
                text: (!text.is_empty()).then(|| text.to_string()),
                views: message.view_count(),
            });
        }

        debug!("Fetched {} messages from {}", messages.len(), entity.title);
        Ok(messages)
    }

    async fn save_session(&self) -> Result<PathBuf, TelegramError> {
        let client = self.client().await?;
        client
            .session()
            .save_to_file(&self.session_path)
            .map_err(|e| session_error(&self.session_path, e))?;
        debug!("Session saved to {}", self.session_path.display());
        Ok(self.session_path.clone())
    }

    async fn disconnect(&self) {
        let Some(client) = self.client.lock().await.take() else {
            return;
        };
        if let Err(e) = client.session().save_to_file(&self.session_path) {
            warn!(
                "Could not save session to {}: {}",
                self.session_path.display(),
                e
            );
        }
        drop(client);
        info!("Disconnected from Telegram");
    }
}

fn account_from(user: &User) -> Account {
    Account {
        id: user.id(),
        first_name: user.first_name().to_string(),
        last_name: user.last_name().map(str::to_string),
        username: user.username().map(str::to_string),
    }
}

fn invocation_error(e: impl std::fmt::Display) -> TelegramError {
    TelegramError::Invocation {
        reason: e.to_string(),
    }
}

fn session_error(path: &Path, e: std::io::Error) -> TelegramError {
    TelegramError::Session {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
