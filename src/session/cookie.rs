//! Cookie jars for the auth cookie.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth cookie mirrors the stored token so the page server's route guard
//! can see auth state on navigation. Jars drop cookies that are expired by
//! max-age or by `Expires`, which is how `clear` takes effect.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

use super::storage::{StorageError, lock};

pub const AUTH_COOKIE_MAX_AGE_DAYS: i64 = 7;

/// Auth cookie: path `/`, strict same-site, 7-day lifetime.
#[must_use]
pub fn auth_cookie(name: &str, token: &str) -> Cookie<'static> {
    let lifetime = Duration::days(AUTH_COOKIE_MAX_AGE_DAYS);
    Cookie::build((name.to_owned(), token.to_owned()))
        .path("/")
        .same_site(SameSite::Strict)
        .max_age(lifetime)
        .expires(OffsetDateTime::now_utc() + lifetime)
        .build()
}

/// Immediately-expired cookie that evicts `name` from a jar.
#[must_use]
pub fn expired_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_owned(), String::new()))
        .path("/")
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

pub(crate) fn is_expired(cookie: &Cookie<'_>, now: OffsetDateTime) -> bool {
    if cookie.max_age().is_some_and(|age| age <= Duration::ZERO) {
        return true;
    }
    cookie.expires_datetime().is_some_and(|at| at <= now)
}

// =============================================================================
// TRAIT
// =============================================================================

pub trait CookieStore: Send + Sync {
    /// Live cookie named `name`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the jar cannot be read.
    fn get(&self, name: &str) -> Result<Option<Cookie<'static>>, StorageError>;

    /// Store `cookie`, replacing any cookie with the same name. An expired
    /// cookie removes the entry instead.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the jar cannot be written.
    fn set(&self, cookie: Cookie<'static>) -> Result<(), StorageError>;
}

// =============================================================================
// MEMORY
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<BTreeMap<String, Cookie<'static>>>,
}

impl MemoryCookieJar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for MemoryCookieJar {
    fn get(&self, name: &str) -> Result<Option<Cookie<'static>>, StorageError> {
        let now = OffsetDateTime::now_utc();
        Ok(lock(&self.cookies)?
            .get(name)
            .filter(|c| !is_expired(c, now))
            .cloned())
    }

    fn set(&self, cookie: Cookie<'static>) -> Result<(), StorageError> {
        let mut cookies = lock(&self.cookies)?;
        if is_expired(&cookie, OffsetDateTime::now_utc()) {
            cookies.remove(cookie.name());
        } else {
            cookies.insert(cookie.name().to_owned(), cookie);
        }
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// One `Set-Cookie` serialized cookie per line, value percent-encoded.
/// Unparseable lines are skipped.
#[derive(Debug)]
pub struct FileCookieJar {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileCookieJar {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), guard: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, Cookie<'static>>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        let now = OffsetDateTime::now_utc();
        let mut cookies = BTreeMap::new();
        for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match Cookie::parse(line.to_owned()) {
                Ok(mut cookie) if !is_expired(&cookie, now) => {
                    let decoded = urlencoding::decode(cookie.value()).map(|v| v.into_owned());
                    match decoded {
                        Ok(value) => cookie.set_value(value),
                        Err(e) => {
                            tracing::warn!(error = %e, path = %self.path.display(), "skipping undecodable cookie value");
                            continue;
                        }
                    }
                    cookies.insert(cookie.name().to_owned(), cookie);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, path = %self.path.display(), "skipping malformed cookie line"),
            }
        }
        Ok(cookies)
    }

    fn persist(&self, cookies: &BTreeMap<String, Cookie<'static>>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = String::new();
        for cookie in cookies.values() {
            let mut stored = cookie.clone();
            stored.set_value(urlencoding::encode(cookie.value()).into_owned());
            out.push_str(&stored.to_string());
            out.push('\n');
        }
        fs::write(&self.path, out)?;
        Ok(())
    }
}

impl CookieStore for FileCookieJar {
    fn get(&self, name: &str) -> Result<Option<Cookie<'static>>, StorageError> {
        let _guard = lock(&self.guard)?;
        Ok(self.load()?.remove(name))
    }

    fn set(&self, cookie: Cookie<'static>) -> Result<(), StorageError> {
        let _guard = lock(&self.guard)?;
        let mut cookies = self.load()?;
        if is_expired(&cookie, OffsetDateTime::now_utc()) {
            cookies.remove(cookie.name());
        } else {
            cookies.insert(cookie.name().to_owned(), cookie);
        }
        self.persist(&cookies)
    }
}

#[cfg(test)]
#[path = "cookie_test.rs"]
mod tests;
