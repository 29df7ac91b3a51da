use std::env::var;

use dotenvy::dotenv;

pub struct Config {
    pub port: u16,
    pub scheme: String,
    pub host: String,
    pub jwt_secret: String,
    pub database_url: Option<String>,
    pub provider: ProviderConfig,
}

/// Delivery provider credentials. Loaded once at startup and immutable for
/// the process lifetime; a missing credential aborts startup rather than
/// failing per call.
#[derive(Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub client_id: String,
    pub secret_key: String,
    pub sms_sender_id: String,
}

impl Config {
    pub fn try_parse() -> Result<Config, &'static str> {
        let _ = dotenv();

        Ok(Config {
            port: var("PORT")
                .map_err(|_| "An error occured while getting PORT env param")?
                .parse::<u16>()
                .map_err(|_| "An error occured while parsing PORT env param")?,
            scheme: var("SCHEME").map_err(|_| "An error occured while getting SCHEME env param")?,
            host: var("HOST").map_err(|_| "An error occured while getting HOST env param")?,
            jwt_secret: var("JWT_SECRET")
                .map_err(|_| "An error occured while getting JWT_SECRET env param")?,
            database_url: var("DATABASE_URL").ok(),
            provider: ProviderConfig {
                base_url: var("MADDYCMS_BASE_URL")
                    .map_err(|_| "An error occured while getting MADDYCMS_BASE_URL env param")?,
                client_id: var("MADDYCMS_CLIENT_ID")
                    .map_err(|_| "An error occured while getting MADDYCMS_CLIENT_ID env param")?,
                secret_key: var("MADDYCMS_SECRET_KEY")
                    .map_err(|_| "An error occured while getting MADDYCMS_SECRET_KEY env param")?,
                sms_sender_id: var("SMS_SENDER_ID").unwrap_or_else(|_| "BulkMsgApp".to_string()),
            },
        })
    }
}
