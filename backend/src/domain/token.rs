//! Authentication token data model.

use std::fmt;

use crate::domain::AccountId;

/// Validation errors returned by [`TokenSecret::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    /// Token string was missing or blank.
    EmptySecret,
}

impl fmt::Display for TokenValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "token secret must not be empty"),
        }
    }
}

impl std::error::Error for TokenValidationError {}

/// Opaque bearer secret issued by the upstream identity service.
///
/// The secret authenticates the account against the upstream, so it never
/// appears in logs or client responses. `Debug` renders a placeholder and
/// the type deliberately has no serde support.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSecret(String);

impl TokenSecret {
    /// Validate and construct a [`TokenSecret`] from raw input.
    pub fn parse(raw: &str) -> Result<Self, TokenValidationError> {
        if raw.trim().is_empty() {
            return Err(TokenValidationError::EmptySecret);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Access the secret for handing to a store or the upstream.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(..)")
    }
}

/// Locally cached authentication token.
///
/// The account row is written before the token row; a token must never
/// reference an account the cache has not seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    /// Key of the account this token belongs to.
    pub account_id: AccountId,
    /// The issued bearer secret.
    pub secret: TokenSecret,
}

impl AuthToken {
    /// Assemble a token record from its parts.
    #[must_use]
    pub const fn new(account_id: AccountId, secret: TokenSecret) -> Self {
        Self { account_id, secret }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank_secrets(#[case] raw: &str) {
        let err = TokenSecret::parse(raw).expect_err("blank secret must fail");
        assert_eq!(err, TokenValidationError::EmptySecret);
    }

    #[test]
    fn preserves_secret_bytes_exactly() {
        let secret = TokenSecret::parse("tok123").expect("valid secret");
        assert_eq!(secret.as_str(), "tok123");
    }

    #[test]
    fn debug_output_never_contains_the_secret() {
        let token = AuthToken::new(
            AccountId::new(1),
            TokenSecret::parse("tok123").expect("valid secret"),
        );
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("tok123"));
        assert!(rendered.contains("TokenSecret(..)"));
    }
}
