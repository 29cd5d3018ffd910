//! Account session handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"demo@wicket.dev","password":"password"}
//! POST /api/v1/register {"email":"new@wicket.dev","username":"newcomer","password":"pw","passwordConfirmation":"pw"}
//! GET /api/v1/account
//! POST /api/v1/logout
//! ```
//!
//! Login and register drive the corresponding domain flow to its terminal
//! state, persist the account key in the session cookie, and echo the
//! account identity. The issued token stays inside the gateway; clients only
//! ever hold the session cookie.

use crate::domain::{
    Account, AuthToken, Credentials, CredentialsValidationError, Error, FlowError, Registration,
    RegistrationValidationError,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;
use actix_web::{get, post, web, HttpResponse};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use stateflow::ResultState;

/// Login request body for `POST /api/v1/login`.
///
/// Example JSON:
/// `{"email":"demo@wicket.dev","password":"password"}`
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for Credentials {
    type Error = CredentialsValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Registration request body for `POST /api/v1/register`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = RegistrationValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.email,
            &value.username,
            &value.password,
            &value.password_confirmation,
        )
    }
}

/// Identity echoed after a successful login or registration.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub account_id: i64,
    pub email: String,
}

/// Cached account profile served by `GET /api/v1/account`.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub account_id: i64,
    pub email: String,
    /// Absent while only a login has run; registration records it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        let username = account
            .username
            .is_known()
            .then(|| account.username.as_str().to_owned());
        Self {
            account_id: account.id.value(),
            email: account.email.as_str().to_owned(),
            username,
        }
    }
}

/// Authenticate against the identity service and establish a session.
///
/// Uses the centralised `Error` type so clients get a consistent
/// error schema across all endpoints.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_credentials_validation_error)?;
    let email = credentials.email().clone();
    let states = state.login.execute(credentials).collect::<Vec<_>>().await;
    let token = settle(states)?;
    session.persist_account(token.account_id)?;
    Ok(web::Json(SessionResponse {
        account_id: token.account_id.value(),
        email: email.as_str().to_owned(),
    }))
}

/// Register a new account and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registration success", body = SessionResponse, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Registration refused", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(map_registration_validation_error)?;
    let email = registration.email().clone();
    let states = state.register.execute(registration).collect::<Vec<_>>().await;
    let token = settle(states)?;
    session.persist_account(token.account_id)?;
    Ok(web::Json(SessionResponse {
        account_id: token.account_id.value(),
        email: email.as_str().to_owned(),
    }))
}

/// Serve the cached profile for the session's account.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use wicket_backend::inbound::http::accounts::current_account;
///
/// let app = App::new().service(current_account);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/account",
    responses(
        (status = 200, description = "Cached account", body = AccountResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account not cached", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "currentAccount"
)]
#[get("/account")]
pub async fn current_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AccountResponse>> {
    let account_id = session.require_account_id()?;
    let account = state
        .accounts
        .find_by_id(account_id)
        .await
        .map_err(|err| Error::internal(err.to_string()))?
        .ok_or_else(|| Error::not_found("no cached account for this session"))?;
    Ok(web::Json(AccountResponse::from(account)))
}

/// Drop the cached token and end the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    state
        .tokens
        .delete_by_account_id(account_id)
        .await
        .map_err(|err| Error::internal(err.to_string()))?;
    session.clear();
    Ok(HttpResponse::NoContent().finish())
}

/// Collapse a drained flow sequence into the token or an API error.
fn settle(states: Vec<ResultState<AuthToken, FlowError>>) -> Result<AuthToken, Error> {
    match stateflow::terminal(states) {
        Some(Ok(token)) => Ok(token),
        Some(Err(err)) => Err(map_flow_error(err)),
        None => Err(Error::internal(
            "authentication sequence ended without an outcome",
        )),
    }
}

fn map_flow_error(err: FlowError) -> Error {
    match &err {
        FlowError::InvalidCredentials => Error::unauthorized(err.to_string()),
        FlowError::PasswordMismatch => Error::invalid_request(err.to_string()).with_details(
            json!({ "field": "passwordConfirmation", "code": "password_mismatch" }),
        ),
        FlowError::RegistrationRejected { .. } => Error::conflict(err.to_string()),
        FlowError::TokenPersistenceFailure | FlowError::Unexpected { .. } => {
            Error::internal(err.to_string())
        }
    }
}

fn map_credentials_validation_error(err: CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        CredentialsValidationError::MalformedEmail => {
            Error::invalid_request("email must look like local@domain")
                .with_details(json!({ "field": "email", "code": "malformed_email" }))
        }
        CredentialsValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
    }
}

fn map_registration_validation_error(err: RegistrationValidationError) -> Error {
    match err {
        RegistrationValidationError::EmptyEmail => {
            Error::invalid_request("email must not be empty")
                .with_details(json!({ "field": "email", "code": "empty_email" }))
        }
        RegistrationValidationError::MalformedEmail => {
            Error::invalid_request("email must look like local@domain")
                .with_details(json!({ "field": "email", "code": "malformed_email" }))
        }
        RegistrationValidationError::EmptyUsername => {
            Error::invalid_request("username must not be empty")
                .with_details(json!({ "field": "username", "code": "empty_username" }))
        }
        RegistrationValidationError::UsernameTooLong { max } => {
            Error::invalid_request(format!("username must be at most {max} characters"))
                .with_details(json!({ "field": "username", "code": "username_too_long" }))
        }
        RegistrationValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
    }
}
