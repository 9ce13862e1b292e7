use clap::Parser;
use feedprobe_core::{TelegramError, TelegramSettings};
use telegram_client::{ApiCredentials, PhoneNumber};
use tracing::warn;

#[derive(Debug, Parser)]
#[command(
    name = "telegram-auth",
    about = "Telegram Authentication Setup for News-to-Audio",
    override_usage = "telegram-auth [phone_number]\n       \
                      telegram-auth [api_id] [api_hash] [phone_number]",
    after_help = "Examples:\n  \
                  telegram-auth +1234567890\n  \
                  telegram-auth 12345 abcdef123456 +1234567890\n\n\
                  If no arguments provided, default values from config will be used."
)]
pub struct AuthArgs {
    /// `phone_number`, or `api_id api_hash phone_number`
    #[arg(value_name = "ARGS", num_args = 1..=3)]
    pub args: Vec<String>,
}

#[derive(Debug)]
pub struct AuthTarget {
    pub credentials: ApiCredentials,
    pub phone: PhoneNumber,
}

impl AuthArgs {
    /// Fills whatever the command line left out from `settings`. The phone is
    /// checked first so a malformed number is reported even without credentials.
    pub fn resolve(&self, settings: &TelegramSettings) -> Result<AuthTarget, TelegramError> {
        match self.args.as_slice() {
            [api_id, api_hash, phone] => {
                let phone = PhoneNumber::parse(phone)?;
                let credentials = ApiCredentials::parse(api_id, api_hash)?;
                Ok(AuthTarget { credentials, phone })
            }
            [phone, rest @ ..] => {
                if !rest.is_empty() {
                    warn!("Ignoring extra argument(s): {}", rest.join(" "));
                }
                let phone = PhoneNumber::parse(phone)?;
                let credentials = ApiCredentials::from_settings(settings)?;
                Ok(AuthTarget { credentials, phone })
            }
            [] => {
                let phone = PhoneNumber::parse(&settings.phone)?;
                let credentials = ApiCredentials::from_settings(settings)?;
                Ok(AuthTarget { credentials, phone })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn settings() -> TelegramSettings {
        TelegramSettings {
            api_id: 999,
            api_hash: "confighash".to_string(),
            phone: "+441234567890".to_string(),
            ..TelegramSettings::default()
        }
    }

    #[test]
    fn test_help_exits_zero() {
        for flag in ["-h", "--help"] {
            let err = AuthArgs::try_parse_from(["telegram-auth", flag]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
            assert_eq!(err.exit_code(), 0);
            let rendered = err.to_string();
            assert!(rendered.contains("[api_id] [api_hash] [phone_number]"));
            assert!(rendered.contains("telegram-auth +1234567890"));
        }
    }

    #[test]
    fn test_too_many_arguments_rejected() {
        let result = AuthArgs::try_parse_from(["telegram-auth", "1", "2", "3", "4"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_phone_only_uses_config_credentials() {
        let args = AuthArgs::try_parse_from(["telegram-auth", "+1234567890"]).unwrap();
        let target = args.resolve(&settings()).unwrap();
        assert_eq!(target.phone.as_str(), "+1234567890");
        assert_eq!(target.credentials.api_id, 999);
        assert_eq!(target.credentials.api_hash, "confighash");
    }

    #[test]
    fn test_full_arguments_override_config() {
        let args =
            AuthArgs::try_parse_from(["telegram-auth", "12345", "abcdef123456", "+1234567890"])
                .unwrap();
        let target = args.resolve(&settings()).unwrap();
        assert_eq!(target.credentials.api_id, 12345);
        assert_eq!(target.credentials.api_hash, "abcdef123456");
    }

    #[test]
    fn test_no_arguments_fall_back_to_config() {
        let args = AuthArgs::try_parse_from(["telegram-auth"]).unwrap();
        let target = args.resolve(&settings()).unwrap();
        assert_eq!(target.phone.as_str(), "+441234567890");
    }

    #[test]
    fn test_invalid_phone_reported_before_credentials() {
        let args = AuthArgs::try_parse_from(["telegram-auth", "555"]).unwrap();
        let result = args.resolve(&TelegramSettings::default());
        assert!(matches!(result, Err(TelegramError::InvalidPhone { .. })));
    }

    #[test]
    fn test_invalid_api_id_argument() {
        let args =
            AuthArgs::try_parse_from(["telegram-auth", "abc", "hash", "+1234567890"]).unwrap();
        assert!(matches!(
            args.resolve(&settings()),
            Err(TelegramError::InvalidApiId { .. })
        ));
    }
}
