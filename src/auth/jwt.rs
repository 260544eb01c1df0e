use crate::core::errors::LedgerError;
use crate::core::models::principal::Principal;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// Signs and verifies bearer tokens. Claims are the principal itself, with no expiry.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        JwtService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn generate_token(&self, principal: &Principal) -> Result<String, LedgerError> {
        encode(&Header::default(), principal, &self.encoding_key)
            .map_err(|e| LedgerError::InternalServerError(format!("JWT encoding error: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<Principal, LedgerError> {
        let token_data = decode::<Principal>(token, &self.decoding_key, &self.validation)
            .map_err(|e| LedgerError::Unauthorized(format!("Invalid token: {}", e)))?;
        Ok(token_data.claims)
    }
}
