//! Account data model.
//!
//! An [`Account`] is the locally cached mirror of an upstream identity. The
//! upstream owns the record; this cache exists so session endpoints can serve
//! profile data without a round trip.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest username the cache accepts, matching the upstream's column width.
pub const USERNAME_MAX: usize = 150;

/// Validation errors returned by [`EmailAddress::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    /// Email was missing or blank once trimmed.
    Empty,
    /// Email does not have the `local@domain` shape.
    Malformed,
}

impl fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "email must not be empty"),
            Self::Malformed => write!(f, "email must look like local@domain"),
        }
    }
}

impl std::error::Error for EmailValidationError {}

/// Validation errors returned by [`Username::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameValidationError {
    /// Username exceeds [`USERNAME_MAX`] characters once trimmed.
    TooLong {
        /// Maximum number of characters permitted.
        max: usize,
    },
}

impl fmt::Display for UsernameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { max } => write!(f, "username must be at most {max} characters"),
        }
    }
}

impl std::error::Error for UsernameValidationError {}

/// Opaque key identifying an account.
///
/// The value is assigned by the upstream identity service; the cache never
/// generates one and attaches no meaning to it beyond identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    /// Wrap an upstream-assigned key.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Access the raw key value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated email address.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace and non-empty.
/// - Shaped `local@domain` with both halves non-empty and no inner
///   whitespace. Full mailbox syntax is the upstream's problem; this type
///   only rejects inputs that cannot possibly be addresses.
///
/// # Examples
/// ```
/// use wicket_backend::domain::EmailAddress;
///
/// let email = EmailAddress::parse(" a@b.com ").unwrap();
/// assert_eq!(email.as_str(), "a@b.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`] from raw input.
    pub fn parse(raw: &str) -> Result<Self, EmailValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(EmailValidationError::Malformed);
        };
        if local.is_empty() || domain.is_empty() || trimmed.contains(char::is_whitespace) {
            return Err(EmailValidationError::Malformed);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Access the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Cached username for an account.
///
/// Login responses do not carry a username, so the cache stores the empty
/// string until a registration (or a later refresh) fills it in. The type
/// therefore allows emptiness; [`Username::is_known`] distinguishes the two
/// states.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace.
/// - At most [`USERNAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`] from raw input.
    pub fn parse(raw: &str) -> Result<Self, UsernameValidationError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UsernameValidationError::TooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The placeholder stored when the upstream has not reported a username.
    #[must_use]
    pub const fn unknown() -> Self {
        Self(String::new())
    }

    /// Whether the upstream has reported a username for this account.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !self.0.is_empty()
    }

    /// Access the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Locally cached account record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Upstream-assigned key.
    pub id: AccountId,
    /// Email the account authenticates with.
    pub email: EmailAddress,
    /// Cached username; empty until the upstream reports one.
    pub username: Username,
}

impl Account {
    /// Assemble an account record from its parts.
    #[must_use]
    pub const fn new(id: AccountId, email: EmailAddress, username: Username) -> Self {
        Self {
            id,
            email,
            username,
        }
    }
}
