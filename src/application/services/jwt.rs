use anyhow::Context;
use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

/// Token verification against the secret shared with the external auth
/// service. This service never issues tokens; it only reads the subject of
/// tokens the auth collaborator minted.
#[derive(Clone)]
pub struct JwtServiceConfig {
    pub secret: String,
}

pub struct JwtService {
    decoding: DecodingKey,
    validation: Validation,
}

#[derive(Debug, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

impl JwtService {
    pub fn new(config: JwtServiceConfig) -> Self {
        Self {
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .context("failed to verify JWT")
    }
}
