//! Environment-driven session cookie settings.
//!
//! Release builds refuse to start unless every session toggle is explicit
//! and valid. Debug builds substitute safe defaults and log each
//! substitution, so local development works without any environment setup.

pub mod fingerprint;

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// How strictly session toggles are validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or malformed toggles fall back to defaults with a warning.
    Debug,
    /// Every toggle must be present and valid.
    Release,
}

impl BuildMode {
    /// The mode matching the compilation profile.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wicket_backend::inbound::http::session_config::BuildMode;
    ///
    /// assert_eq!(
    ///     BuildMode::from_debug_assertions() == BuildMode::Debug,
    ///     cfg!(debug_assertions),
    /// );
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated session settings ready to hand to the server builder.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required environment variable is not set.
    #[error("required environment variable {name} is not set")]
    MissingEnv { name: &'static str },
    /// A variable is set but its value does not parse.
    #[error("unusable value for {name}='{value}' (expected {expected})")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The session key file could not be read.
    #[error("could not read session key file {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file exists but carries too little material for release.
    #[error("session key at {path} is {length} bytes; release builds need at least {min_len}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` cookies only work over secure transport.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Ephemeral session keys are a development convenience only.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Assemble session settings from the environment.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use wicket_backend::inbound::http::session_config::{
///     BuildMode, session_settings_from_env,
/// };
///
/// let mut env = MockEnv::new();
/// // Nothing set: debug mode falls back to a generated key and safe toggles.
/// env.expect_string().returning(|_| None);
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug)
///     .expect("debug defaults always produce settings");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = setting(env, COOKIE_SECURE_ENV, mode, true, BOOL_EXPECTED, parse_bool)?;
    let same_site_default = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let same_site = setting(
        env,
        SAMESITE_ENV,
        mode,
        same_site_default,
        SAMESITE_EXPECTED,
        parse_same_site,
    )?;
    reject_insecure_none(same_site, cookie_secure, mode)?;

    let allow_ephemeral = setting(env, ALLOW_EPHEMERAL_ENV, mode, false, BOOL_EXPECTED, parse_bool)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = load_signing_key(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// Read one toggle. Debug builds swallow missing or malformed values and
/// take `default`; release builds turn both into errors.
fn setting<E: Env, T: Copy + std::fmt::Debug>(
    env: &E,
    name: &'static str,
    mode: BuildMode,
    default: T,
    expected: &'static str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, SessionConfigError> {
    let Some(value) = env.string(name) else {
        if mode.is_debug() {
            warn!(name, ?default, "session setting not set, using default");
            return Ok(default);
        }
        return Err(SessionConfigError::MissingEnv { name });
    };
    if let Some(parsed) = parse(&value) {
        return Ok(parsed);
    }
    if mode.is_debug() {
        warn!(name, value = %value, ?default, "unparseable session setting, using default");
        return Ok(default);
    }
    Err(SessionConfigError::InvalidEnv {
        name,
        value,
        expected,
    })
}

/// `SameSite=None` without `Secure` is rejected in release and tolerated
/// with a warning in debug, where plain-HTTP cookies are expected.
fn reject_insecure_none(
    same_site: SameSite,
    cookie_secure: bool,
    mode: BuildMode,
) -> Result<(), SessionConfigError> {
    if same_site != SameSite::None || cookie_secure {
        return Ok(());
    }
    if mode.is_debug() {
        warn!("SESSION_SAMESITE=None without SESSION_COOKIE_SECURE; browsers may drop the cookie");
        return Ok(());
    }
    Err(SessionConfigError::InsecureSameSiteNone)
}

fn load_signing_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_string()),
    );

    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "generating throwaway session key (dev only)"
            );
            return Ok(Key::generate());
        }
        Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
    };

    let length = bytes.len();
    if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
        bytes.zeroize();
        return Err(SessionConfigError::KeyTooShort {
            path,
            length,
            min_len: SESSION_KEY_MIN_LEN,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}

fn parse_bool(value: &str) -> Option<bool> {
    let lowered = value.to_ascii_lowercase();
    if matches!(lowered.as_str(), "1" | "true" | "yes" | "y") {
        return Some(true);
    }
    matches!(lowered.as_str(), "0" | "false" | "no" | "n").then_some(false)
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        "none" => Some(SameSite::None),
        _ => None,
    }
}
