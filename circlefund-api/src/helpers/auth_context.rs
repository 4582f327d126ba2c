use std::fmt;
use std::time::{Duration, Instant};

pub const EMAIL_HEADER: &str = "X-User-Email";
pub const PASSWORD_HEADER: &str = "X-User-Password";

/// Credentials for upstream calls, passed explicitly into every load
#[derive(Clone)]
pub struct AuthContext {
    email: String,
    password: String,
    established_at: Instant,
}

impl AuthContext {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::established(email, password, Instant::now())
    }

    pub fn established(
        email: impl Into<String>,
        password: impl Into<String>,
        established_at: Instant,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            established_at,
        }
    }

    /// Reads the credential headers; both must be present and non-empty
    pub fn from_header_values(email: Option<&str>, password: Option<&str>) -> Option<Self> {
        let email = email.map(str::trim).filter(|e| !e.is_empty())?;
        let password = password.filter(|p| !p.is_empty())?;
        Some(Self::new(email, password))
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Same email and password, regardless of when each was established
    pub fn same_credentials(&self, other: &AuthContext) -> bool {
        self.email == other.email && self.password == other.password
    }

    /// True while an auth failure may still be the credential propagation race
    pub fn is_fresh(&self, grace: Duration, at: Instant) -> bool {
        at.saturating_duration_since(self.established_at) < grace
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("email", &self.email)
            .field("password", &"********")
            .field("established_at", &self.established_at)
            .finish()
    }
}
