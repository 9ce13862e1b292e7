//! In-memory `TelegramApi` and `LoginPrompt` for tests.

use crate::api::{FetchedMessage, SignInOutcome, TelegramApi};
use crate::auth::LoginPrompt;
use crate::credentials::PhoneNumber;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use feedprobe_core::{Account, EntityKind, ResolvedEntity, TelegramError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeState {
    authorized: bool,
    login_code: String,
    password: Option<(String, Option<String>)>,
    code_requested: bool,
    entities: HashMap<String, ResolvedEntity>,
    messages: HashMap<i64, Vec<FetchedMessage>>,
    fail_resolve: bool,
    fail_messages: bool,
    session_saved: bool,
    disconnected: bool,
    calls: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeTelegram {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTelegram {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state(self, f: impl FnOnce(&mut FakeState)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn authorized(self) -> Self {
        self.with_state(|s| s.authorized = true)
    }

    pub fn with_login_code(self, code: &str) -> Self {
        self.with_state(|s| s.login_code = code.to_string())
    }

    pub fn with_password(self, password: &str, hint: Option<&str>) -> Self {
        self.with_state(|s| {
            s.password = Some((password.to_string(), hint.map(str::to_string)))
        })
    }

    pub fn with_entity(self, name: &str, id: i64, kind: EntityKind) -> Self {
        self.with_state(|s| {
            s.entities.insert(
                name.to_string(),
                ResolvedEntity {
                    id,
                    kind,
                    title: format!("{} title", name),
                    username: Some(name.to_string()),
                },
            );
        })
    }

    /// `count` messages with ids `count..=1`, newest first.
    pub fn with_messages(self, entity_id: i64, count: i32) -> Self {
        let messages = (1..=count)
            .rev()
            .map(|id| FetchedMessage {
                id,
                date: Utc.timestamp_opt(1_700_000_000 + i64::from(id) * 60, 0).unwrap(),
                text: (id % 3 != 0).then(|| format!("message {}", id)),
                views: (id % 2 == 0).then_some(id * 10),
            })
            .collect();
        self.with_raw_messages(entity_id, messages)
    }

    pub fn with_raw_messages(self, entity_id: i64, messages: Vec<FetchedMessage>) -> Self {
        self.with_state(|s| {
            s.messages.insert(entity_id, messages);
        })
    }

    pub fn failing_resolve(self) -> Self {
        self.with_state(|s| s.fail_resolve = true)
    }

    pub fn failing_messages(self) -> Self {
        self.with_state(|s| s.fail_messages = true)
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn session_saved(&self) -> bool {
        self.state.lock().unwrap().session_saved
    }

    pub fn is_disconnected(&self) -> bool {
        self.state.lock().unwrap().disconnected
    }

    fn record(&self, call: &str) -> Result<std::sync::MutexGuard<'_, FakeState>, TelegramError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.to_string());
        if state.disconnected {
            return Err(TelegramError::Disconnected);
        }
        Ok(state)
    }
}

fn test_account() -> Account {
    Account {
        id: 42,
        first_name: "Test".to_string(),
        last_name: Some("User".to_string()),
        username: Some("tester".to_string()),
    }
}

#[async_trait]
impl TelegramApi for FakeTelegram {
    async fn is_authorized(&self) -> Result<bool, TelegramError> {
        Ok(self.record("is_authorized")?.authorized)
    }

    async fn request_login_code(&self, _phone: &PhoneNumber) -> Result<(), TelegramError> {
        self.record("request_login_code")?.code_requested = true;
        Ok(())
    }

    async fn sign_in(&self, code: &str) -> Result<SignInOutcome, TelegramError> {
        let mut state = self.record("sign_in")?;
        if !state.code_requested || code != state.login_code {
            return Err(TelegramError::InvalidCode);
        }
        if let Some((_, hint)) = &state.password {
            return Ok(SignInOutcome::PasswordRequired { hint: hint.clone() });
        }
        state.authorized = true;
        Ok(SignInOutcome::SignedIn(test_account()))
    }

    async fn check_password(&self, password: &str) -> Result<Account, TelegramError> {
        let mut state = self.record("check_password")?;
        let accepted = state
            .password
            .as_ref()
            .is_some_and(|(expected, _)| expected == password);
        if !accepted {
            return Err(TelegramError::InvalidPassword);
        }
        state.authorized = true;
        Ok(test_account())
    }

    async fn get_me(&self) -> Result<Account, TelegramError> {
        drop(self.record("get_me")?);
        Ok(test_account())
    }

    async fn resolve_entity(&self, name: &str) -> Result<Option<ResolvedEntity>, TelegramError> {
        let state = self.record("resolve_entity")?;
        if state.fail_resolve {
            return Err(TelegramError::Invocation {
                reason: "connection reset".to_string(),
            });
        }
        Ok(state.entities.get(name.trim_start_matches('@')).cloned())
    }

    async fn recent_messages(
        &self,
        entity: &ResolvedEntity,
        limit: usize,
    ) -> Result<Vec<FetchedMessage>, TelegramError> {
        let state = self.record("recent_messages")?;
        if state.fail_messages {
            return Err(TelegramError::Invocation {
                reason: "flood wait".to_string(),
            });
        }
        Ok(state
            .messages
            .get(&entity.id)
            .map(|messages| messages.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn save_session(&self) -> Result<PathBuf, TelegramError> {
        self.record("save_session")?.session_saved = true;
        Ok(PathBuf::from("test.session"))
    }

    async fn disconnect(&self) {
        let mut state = self.state.lock().unwrap();
        state.calls.push("disconnect".to_string());
        state.disconnected = true;
    }
}

pub struct FakePrompt {
    code: String,
    password: Option<String>,
    seen_hint: Mutex<Option<String>>,
}

impl FakePrompt {
    pub fn code(code: &str) -> Self {
        Self {
            code: code.to_string(),
            password: None,
            seen_hint: Mutex::new(None),
        }
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn seen_hint(&self) -> Option<String> {
        self.seen_hint.lock().unwrap().clone()
    }
}

#[async_trait]
impl LoginPrompt for FakePrompt {
    async fn login_code(&self) -> Result<String, TelegramError> {
        Ok(self.code.clone())
    }

    async fn password(&self, hint: Option<&str>) -> Result<String, TelegramError> {
        *self.seen_hint.lock().unwrap() = hint.map(str::to_string);
        self.password.clone().ok_or_else(|| TelegramError::Prompt {
            reason: "no password configured".to_string(),
        })
    }
}
