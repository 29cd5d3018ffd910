//! Authentication input primitives.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler hands them to a use case.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::account::{
    EmailAddress, EmailValidationError, Username, UsernameValidationError,
};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email does not have the `local@domain` shape.
    MalformedEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::MalformedEmail => write!(f, "email must look like local@domain"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

impl From<EmailValidationError> for CredentialsValidationError {
    fn from(err: EmailValidationError) -> Self {
        match err {
            EmailValidationError::Empty => Self::EmptyEmail,
            EmailValidationError::Malformed => Self::MalformedEmail,
        }
    }
}

/// Validated login credentials handed to the login use case.
///
/// ## Invariants
/// - `email` satisfies [`EmailAddress`] validation.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use wicket_backend::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("a@b.com", "password").unwrap();
/// assert_eq!(creds.email().as_str(), "a@b.com");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::parse(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email the caller wants to authenticate as.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Domain error returned when registration payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email does not have the `local@domain` shape.
    MalformedEmail,
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Username exceeds the permitted length.
    UsernameTooLong {
        /// Maximum number of characters permitted.
        max: usize,
    },
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::MalformedEmail => write!(f, "email must look like local@domain"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<EmailValidationError> for RegistrationValidationError {
    fn from(err: EmailValidationError) -> Self {
        match err {
            EmailValidationError::Empty => Self::EmptyEmail,
            EmailValidationError::Malformed => Self::MalformedEmail,
        }
    }
}

impl From<UsernameValidationError> for RegistrationValidationError {
    fn from(err: UsernameValidationError) -> Self {
        match err {
            UsernameValidationError::TooLong { max } => Self::UsernameTooLong { max },
        }
    }
}

/// Validated registration inputs handed to the register use case.
///
/// Whether the two passwords agree is a workflow decision, not a shape
/// requirement, so construction accepts mismatched passwords and
/// [`Registration::passwords_match`] reports the comparison. The register
/// use case refuses to touch the network until it holds.
///
/// ## Invariants
/// - `email` satisfies [`EmailAddress`] validation.
/// - `username` is non-empty here even though cached rows may be empty; a
///   registration without a username is meaningless.
/// - Both password fields are non-empty and retain caller whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: EmailAddress,
    username: Username,
    password: Zeroizing<String>,
    password_confirmation: Zeroizing<String>,
}

impl Registration {
    /// Construct registration inputs from raw form fields.
    pub fn try_from_parts(
        email: &str,
        username: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let email = EmailAddress::parse(email)?;
        let username = Username::parse(username)?;
        if !username.is_known() {
            return Err(RegistrationValidationError::EmptyUsername);
        }
        if password.is_empty() || password_confirmation.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            username,
            password: Zeroizing::new(password.to_owned()),
            password_confirmation: Zeroizing::new(password_confirmation.to_owned()),
        })
    }

    /// Email the caller wants to register with.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Requested username.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Confirmation string provided by the caller.
    #[must_use]
    pub fn password_confirmation(&self) -> &str {
        self.password_confirmation.as_str()
    }

    /// Whether the password and its confirmation agree.
    #[must_use]
    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirmation
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("   ", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("nope", "pw", CredentialsValidationError::MalformedEmail)]
    #[case("a@b.com", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err =
            Credentials::try_from_parts(email, password).expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  a@b.com  ", "secret")]
    #[case("alice@example.org", "correct horse battery staple")]
    fn valid_credentials_trim_email(#[case] email: &str, #[case] password: &str) {
        let creds =
            Credentials::try_from_parts(email, password).expect("valid inputs should succeed");
        assert_eq!(creds.email().as_str(), email.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    #[case("", "mabel", "pw", "pw", RegistrationValidationError::EmptyEmail)]
    #[case("bad", "mabel", "pw", "pw", RegistrationValidationError::MalformedEmail)]
    #[case("a@b.com", "", "pw", "pw", RegistrationValidationError::EmptyUsername)]
    #[case("a@b.com", "   ", "pw", "pw", RegistrationValidationError::EmptyUsername)]
    #[case("a@b.com", "mabel", "", "pw", RegistrationValidationError::EmptyPassword)]
    #[case("a@b.com", "mabel", "pw", "", RegistrationValidationError::EmptyPassword)]
    fn invalid_registrations(
        #[case] email: &str,
        #[case] username: &str,
        #[case] password: &str,
        #[case] confirmation: &str,
        #[case] expected: RegistrationValidationError,
    ) {
        let err = Registration::try_from_parts(email, username, password, confirmation)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn overlong_username_is_rejected_with_the_limit() {
        let username = "x".repeat(crate::domain::account::USERNAME_MAX + 1);
        let err = Registration::try_from_parts("a@b.com", &username, "pw", "pw")
            .expect_err("overlong username must fail");
        assert_eq!(
            err,
            RegistrationValidationError::UsernameTooLong {
                max: crate::domain::account::USERNAME_MAX
            }
        );
    }

    #[rstest]
    #[case("pw", "pw", true)]
    #[case("p1", "p2", false)]
    #[case("pw", "pw ", false)]
    fn passwords_match_compares_exactly(
        #[case] password: &str,
        #[case] confirmation: &str,
        #[case] expected: bool,
    ) {
        let registration = Registration::try_from_parts("a@b.com", "mabel", password, confirmation)
            .expect("valid inputs");
        assert_eq!(registration.passwords_match(), expected);
    }
}
