use crate::config::Config;
use crate::error::AppResult;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: i64,
    #[serde(rename = "type")]
    pub token_type: String,
}

fn algorithm(config: &Config) -> Algorithm {
    config
        .security
        .algorithm
        .parse()
        .unwrap_or(Algorithm::HS256)
}

pub fn create_access_token(user_id: i64, username: &str, config: &Config) -> AppResult<String> {
    let expiration = Utc::now() + Duration::minutes(config.security.access_token_expire_minutes);

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: expiration.timestamp(),
        token_type: "access".to_string(),
    };

    let token = encode(
        &Header::new(algorithm(config)),
        &claims,
        &EncodingKey::from_secret(config.security.secret_key.as_bytes()),
    )?;

    Ok(token)
}

pub fn decode_access_token(token: &str, config: &Config) -> Option<Claims> {
    let validation = Validation::new(algorithm(config));

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.security.secret_key.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims)
    .filter(|claims| claims.token_type == "access")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_decodes_with_same_secret() {
        let config = Config::default();
        let token = create_access_token(42, "alice", &config).expect("Failed to create token");

        let claims = decode_access_token(&token, &config).expect("token rejected");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_token_rejected_with_other_secret() {
        let config = Config::default();
        let token = create_access_token(42, "alice", &config).expect("Failed to create token");

        let mut other = Config::default();
        other.security.secret_key = "another-secret".to_string();
        assert!(decode_access_token(&token, &other).is_none());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = Config::default();
        config.security.access_token_expire_minutes = -10;
        let token = create_access_token(42, "alice", &config).expect("Failed to create token");

        assert!(decode_access_token(&token, &config).is_none());
    }
}
