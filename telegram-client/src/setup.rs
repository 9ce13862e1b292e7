use crate::api::TelegramApi;
use crate::auth::{Authenticator, LoginPrompt};
use crate::credentials::PhoneNumber;
use feedprobe_core::{Account, ResolvedEntity, TelegramError};
use tracing::{info, warn};

#[derive(Debug)]
pub struct SetupReport {
    pub account: Account,
    /// `None` when no probe channel was given.
    pub channel_probe: Option<Result<ResolvedEntity, TelegramError>>,
}

/// Logs in (or confirms an existing session), optionally checks read access to
/// `probe_channel`, then disconnects whatever the outcome.
pub async fn run_auth_setup<A: TelegramApi + ?Sized>(
    api: &A,
    phone: &PhoneNumber,
    probe_channel: Option<&str>,
    prompt: &dyn LoginPrompt,
) -> Result<SetupReport, TelegramError> {
    let mut auth = Authenticator::new(api);

    let result = async {
        let account = auth.ensure_authorized(Some(phone), prompt).await?;
        info!("Logged in as {}", account);

        let channel_probe = match probe_channel {
            Some(channel) => Some(probe_channel_access(api, channel).await),
            None => None,
        };
        Ok::<_, TelegramError>(SetupReport {
            account,
            channel_probe,
        })
    }
    .await;

    auth.disconnect().await;
    result
}

/// Read-only check that `channel` resolves for this account.
pub async fn probe_channel_access<A: TelegramApi + ?Sized>(
    api: &A,
    channel: &str,
) -> Result<ResolvedEntity, TelegramError> {
    let name = channel.trim().trim_start_matches('@');
    match api.resolve_entity(name).await {
        Ok(Some(entity)) => {
            info!("Resolved @{} as a {}", name, entity.kind);
            Ok(entity)
        }
        Ok(None) => {
            warn!("Could not resolve @{}", name);
            Err(TelegramError::EntityNotFound {
                name: name.to_string(),
            })
        }
        Err(e) => {
            warn!("Probe of @{} failed: {}", name, e);
            Err(e)
        }
    }
}
