//! Regression coverage for the login flow.

use futures_util::{StreamExt, pin_mut};

use super::*;
use crate::domain::ports::{
    AccountStoreError, AuthServiceError, MemoryAccountStore, MemoryTokenStore, MockAccountStore,
    MockAuthService, MockTokenStore, TokenGrant,
};
use crate::domain::{AccountId, EmailAddress, TokenSecret};

fn credentials() -> Credentials {
    Credentials::try_from_parts("a@b.com", "password").expect("valid credentials")
}

fn grant() -> TokenGrant {
    TokenGrant {
        account_id: AccountId::new(1),
        email: EmailAddress::parse("a@b.com").expect("valid email"),
        token: TokenSecret::parse("tok123").expect("valid secret"),
    }
}

fn granting_auth() -> MockAuthService {
    let mut auth = MockAuthService::new();
    auth.expect_login()
        .times(1)
        .return_once(|_| Ok(LoginReceipt::Granted(grant())));
    auth
}

#[tokio::test]
async fn successful_login_yields_loading_then_the_token() {
    let accounts = Arc::new(MemoryAccountStore::new());
    let tokens = Arc::new(MemoryTokenStore::new());
    let login = Login::new(
        Arc::new(granting_auth()),
        accounts.clone(),
        tokens.clone(),
    );

    let states = login.execute(credentials()).collect::<Vec<_>>().await;

    let expected = AuthToken::new(
        AccountId::new(1),
        TokenSecret::parse("tok123").expect("valid secret"),
    );
    assert_eq!(
        states,
        vec![ResultState::loading(), ResultState::data(expected)]
    );

    let cached = accounts
        .find_by_id(AccountId::new(1))
        .await
        .expect("lookup succeeds")
        .expect("account cached");
    assert_eq!(cached.email.as_str(), "a@b.com");
    assert!(!cached.username.is_known());

    let stored = tokens
        .find_by_account_id(AccountId::new(1))
        .await
        .expect("lookup succeeds")
        .expect("token cached");
    assert_eq!(stored.secret.as_str(), "tok123");
}

#[tokio::test]
async fn rejected_login_reports_invalid_credentials_without_writes() {
    let mut auth = MockAuthService::new();
    auth.expect_login().times(1).return_once(|_| {
        Ok(LoginReceipt::Rejected {
            message: Some("wrong password".to_owned()),
        })
    });
    let mut accounts = MockAccountStore::new();
    accounts.expect_insert_or_ignore().times(0);
    let mut tokens = MockTokenStore::new();
    tokens.expect_insert().times(0);

    let login = Login::new(Arc::new(auth), Arc::new(accounts), Arc::new(tokens));
    let states = login.execute(credentials()).collect::<Vec<_>>().await;

    assert_eq!(
        states,
        vec![
            ResultState::loading(),
            ResultState::error(FlowError::InvalidCredentials),
        ]
    );
}

#[tokio::test]
async fn relogin_preserves_the_cached_username() {
    let accounts = Arc::new(MemoryAccountStore::new());
    accounts
        .insert_and_replace(&Account::new(
            AccountId::new(1),
            EmailAddress::parse("a@b.com").expect("valid email"),
            Username::parse("mabel").expect("valid username"),
        ))
        .await
        .expect("seed account");

    let login = Login::new(
        Arc::new(granting_auth()),
        accounts.clone(),
        Arc::new(MemoryTokenStore::new()),
    );
    let states = login.execute(credentials()).collect::<Vec<_>>().await;
    assert!(matches!(states.last(), Some(ResultState::Data { .. })));

    let cached = accounts
        .find_by_id(AccountId::new(1))
        .await
        .expect("lookup succeeds")
        .expect("account cached");
    assert_eq!(cached.username.as_str(), "mabel");
}

#[tokio::test]
async fn negative_store_handle_ends_with_token_persistence_failure() {
    let accounts = Arc::new(MemoryAccountStore::new());
    let login = Login::new(
        Arc::new(granting_auth()),
        accounts.clone(),
        Arc::new(MemoryTokenStore::rejecting()),
    );

    let states = login.execute(credentials()).collect::<Vec<_>>().await;
    assert_eq!(
        states,
        vec![
            ResultState::loading(),
            ResultState::error(FlowError::TokenPersistenceFailure),
        ]
    );

    // The account write lands before the token write and is not rolled back.
    let cached = accounts
        .find_by_id(AccountId::new(1))
        .await
        .expect("lookup succeeds");
    assert!(cached.is_some());
}

#[tokio::test]
async fn transport_failure_surfaces_as_unexpected() {
    let mut auth = MockAuthService::new();
    auth.expect_login()
        .times(1)
        .return_once(|_| Err(AuthServiceError::transport("connection refused")));
    let mut accounts = MockAccountStore::new();
    accounts.expect_insert_or_ignore().times(0);
    let mut tokens = MockTokenStore::new();
    tokens.expect_insert().times(0);

    let login = Login::new(Arc::new(auth), Arc::new(accounts), Arc::new(tokens));
    let states = login.execute(credentials()).collect::<Vec<_>>().await;

    assert_eq!(
        states,
        vec![
            ResultState::loading(),
            ResultState::error(FlowError::Unexpected {
                message: "identity service unreachable: connection refused".to_owned(),
            }),
        ]
    );
}

#[tokio::test]
async fn account_store_failure_surfaces_as_unexpected() {
    let mut accounts = MockAccountStore::new();
    accounts
        .expect_insert_or_ignore()
        .times(1)
        .return_once(|_| Err(AccountStoreError::query("relation missing")));
    let mut tokens = MockTokenStore::new();
    tokens.expect_insert().times(0);

    let login = Login::new(
        Arc::new(granting_auth()),
        Arc::new(accounts),
        Arc::new(tokens),
    );
    let states = login.execute(credentials()).collect::<Vec<_>>().await;

    assert_eq!(
        states,
        vec![
            ResultState::loading(),
            ResultState::error(FlowError::Unexpected {
                message: "account store query failed: relation missing".to_owned(),
            }),
        ]
    );
}

#[tokio::test]
async fn the_sequence_is_cold_until_polled() {
    let mut auth = MockAuthService::new();
    auth.expect_login().times(0);
    let login = Login::new(
        Arc::new(auth),
        Arc::new(MemoryAccountStore::new()),
        Arc::new(MemoryTokenStore::new()),
    );

    let stream = login.execute(credentials());
    drop(stream);
}

#[tokio::test]
async fn the_sequence_ends_after_the_terminal_state() {
    let login = Login::new(
        Arc::new(granting_auth()),
        Arc::new(MemoryAccountStore::new()),
        Arc::new(MemoryTokenStore::new()),
    );
    let stream = login.execute(credentials());
    pin_mut!(stream);

    assert!(matches!(stream.next().await, Some(ResultState::Loading)));
    assert!(matches!(stream.next().await, Some(ResultState::Data { .. })));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn each_call_builds_an_independent_sequence() {
    let mut auth = MockAuthService::new();
    auth.expect_login()
        .times(2)
        .returning(|_| Ok(LoginReceipt::Granted(grant())));
    let login = Login::new(
        Arc::new(auth),
        Arc::new(MemoryAccountStore::new()),
        Arc::new(MemoryTokenStore::new()),
    );

    let first = login.execute(credentials()).collect::<Vec<_>>().await;
    let second = login.execute(credentials()).collect::<Vec<_>>().await;
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}
