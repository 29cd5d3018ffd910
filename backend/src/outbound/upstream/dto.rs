//! DTOs for decoding identity service responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into typed
//! receipts in one pass. The upstream flags refusals with a sentinel
//! `response` value inside an HTTP 200 body; that comparison happens here so
//! nothing past the wire boundary ever sees it.

use serde::Deserialize;

use crate::domain::ports::{LoginReceipt, RegisterReceipt, RegistrationGrant, TokenGrant};
use crate::domain::{AccountId, EmailAddress, TokenSecret, Username};

/// Marker the upstream places in `response` when it refuses a request.
const AUTH_ERROR_SENTINEL: &str = "Error";

#[derive(Debug, Deserialize)]
pub(super) struct LoginResponseDto {
    pub(super) response: Option<String>,
    pub(super) error_message: Option<String>,
    pub(super) pk: Option<i64>,
    pub(super) email: Option<String>,
    pub(super) token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RegisterResponseDto {
    pub(super) response: Option<String>,
    pub(super) error_message: Option<String>,
    pub(super) pk: Option<i64>,
    pub(super) email: Option<String>,
    pub(super) username: Option<String>,
    pub(super) token: Option<String>,
}

impl LoginResponseDto {
    pub(super) fn into_receipt(self) -> Result<LoginReceipt, String> {
        if is_rejection(self.response.as_deref()) {
            return Ok(LoginReceipt::Rejected {
                message: self.error_message,
            });
        }

        Ok(LoginReceipt::Granted(TokenGrant {
            account_id: parse_account_id(self.pk)?,
            email: parse_email(self.email)?,
            token: parse_token(self.token)?,
        }))
    }
}

impl RegisterResponseDto {
    pub(super) fn into_receipt(self) -> Result<RegisterReceipt, String> {
        if is_rejection(self.response.as_deref()) {
            return Ok(RegisterReceipt::Rejected {
                message: self.error_message,
            });
        }

        Ok(RegisterReceipt::Granted(RegistrationGrant {
            account_id: parse_account_id(self.pk)?,
            email: parse_email(self.email)?,
            username: parse_username(self.username)?,
            token: parse_token(self.token)?,
        }))
    }
}

fn is_rejection(response: Option<&str>) -> bool {
    response == Some(AUTH_ERROR_SENTINEL)
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("grant body missing `{field}`"))
}

fn parse_account_id(pk: Option<i64>) -> Result<AccountId, String> {
    require(pk, "pk").map(AccountId::new)
}

fn parse_email(email: Option<String>) -> Result<EmailAddress, String> {
    EmailAddress::parse(&require(email, "email")?)
        .map_err(|error| format!("grant body carries invalid `email`: {error}"))
}

fn parse_username(username: Option<String>) -> Result<Username, String> {
    Username::parse(&require(username, "username")?)
        .map_err(|error| format!("grant body carries invalid `username`: {error}"))
}

fn parse_token(token: Option<String>) -> Result<TokenSecret, String> {
    TokenSecret::parse(&require(token, "token")?)
        .map_err(|error| format!("grant body carries invalid `token`: {error}"))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    fn login_dto(body: &str) -> LoginResponseDto {
        serde_json::from_str(body).expect("valid JSON")
    }

    fn register_dto(body: &str) -> RegisterResponseDto {
        serde_json::from_str(body).expect("valid JSON")
    }

    #[test]
    fn sentinel_bodies_become_rejections() {
        let receipt = login_dto(r#"{"response":"Error","error_message":"wrong password"}"#)
            .into_receipt()
            .expect("rejection decodes");

        assert_eq!(
            receipt,
            LoginReceipt::Rejected {
                message: Some("wrong password".to_owned()),
            }
        );
    }

    #[test]
    fn sentinel_bodies_survive_without_an_explanation() {
        let receipt = register_dto(r#"{"response":"Error"}"#)
            .into_receipt()
            .expect("rejection decodes");

        assert_eq!(receipt, RegisterReceipt::Rejected { message: None });
    }

    #[rstest]
    #[case::success_marker(r#"{"response":"OK","pk":1,"email":"a@b.com","token":"tok123"}"#)]
    #[case::no_marker(r#"{"pk":1,"email":"a@b.com","token":"tok123"}"#)]
    fn grants_decode_into_typed_receipts(#[case] body: &str) {
        let receipt = login_dto(body).into_receipt().expect("grant decodes");

        let LoginReceipt::Granted(grant) = receipt else {
            panic!("expected a grant, got {receipt:?}");
        };
        assert_eq!(grant.account_id, AccountId::new(1));
        assert_eq!(grant.email.as_str(), "a@b.com");
        assert_eq!(grant.token.as_str(), "tok123");
    }

    #[test]
    fn register_grants_carry_the_username() {
        let receipt = register_dto(
            r#"{"pk":2,"email":"a@b.com","username":"mabel","token":"tok123"}"#,
        )
        .into_receipt()
        .expect("grant decodes");

        let RegisterReceipt::Granted(grant) = receipt else {
            panic!("expected a grant, got {receipt:?}");
        };
        assert_eq!(grant.username.as_str(), "mabel");
    }

    #[rstest]
    #[case::missing_pk(r#"{"email":"a@b.com","token":"tok123"}"#, "pk")]
    #[case::missing_email(r#"{"pk":1,"token":"tok123"}"#, "email")]
    #[case::missing_token(r#"{"pk":1,"email":"a@b.com"}"#, "token")]
    #[case::malformed_email(r#"{"pk":1,"email":"not-an-email","token":"tok123"}"#, "email")]
    fn malformed_grants_surface_the_offending_field(#[case] body: &str, #[case] field: &str) {
        let error = login_dto(body)
            .into_receipt()
            .expect_err("malformed grant must fail");
        assert!(
            error.contains(field),
            "error should name `{field}`: {error}"
        );
    }
}
