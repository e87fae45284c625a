// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License Version 2.0.

//! User and session identity resolvers.
//!
//! The SDK never touches the storage medium itself. The host application
//! fetches whatever it persists (a cookie, a header, a file) and hands the
//! raw value in; these types parse it into the identity the context seeds.
//! Values are `|`-separated: id, then optional created and last-renewed
//! timestamps.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Cookie name under which hosts conventionally persist the user id.
pub const USER_COOKIE: &str = crate::data::User::ID;

/// Cookie name under which hosts conventionally persist the session state.
pub const SESSION_COOKIE: &str = "ai_session";

/// The stable anonymous id of the current user.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    id: String,
}

impl CurrentUser {
    /// Parses a persisted cookie value, minting a fresh id when there is
    /// none. The caller is responsible for persisting a minted id so the
    /// user stays stable across requests.
    pub fn from_cookie(cookie: Option<&str>) -> Self {
        let id = cookie
            .and_then(|value| value.split('|').next())
            .filter(|part| !part.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Self { id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Default for CurrentUser {
    fn default() -> Self {
        Self::from_cookie(None)
    }
}

/// The current interaction session, if one exists.
#[derive(Clone, Debug, Default)]
pub struct CurrentSession {
    id: Option<String>,
    created: Option<DateTime<Utc>>,
    last_renewed: Option<DateTime<Utc>>,
}

impl CurrentSession {
    /// Parses a persisted cookie value. No value means no session; every
    /// field stays `None`. Timestamps that fail to parse fall back to the
    /// current time rather than discarding the session.
    pub fn from_cookie(cookie: Option<&str>) -> Self {
        let Some(value) = cookie else {
            return Self::default();
        };

        let mut parts = value.split('|');
        let id = parts
            .next()
            .filter(|part| !part.is_empty())
            .map(str::to_owned);
        let created = parts.next().map(parse_timestamp);
        let last_renewed = parts.next().map(parse_timestamp);

        Self {
            id,
            created,
            last_renewed,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    pub fn last_renewed_at(&self) -> Option<DateTime<Utc>> {
        self.last_renewed
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_taken_from_cookie() {
        let user = CurrentUser::from_cookie(Some("my_user_id"));
        assert_eq!(user.id(), "my_user_id");

        let user = CurrentUser::from_cookie(Some("my_user_id|extra|parts"));
        assert_eq!(user.id(), "my_user_id");
    }

    #[test]
    fn missing_user_cookie_mints_an_id() {
        let first = CurrentUser::from_cookie(None);
        let second = CurrentUser::from_cookie(Some(""));

        assert!(!first.id().is_empty());
        assert!(!second.id().is_empty());
        assert_ne!(first.id(), second.id());
        // GUID shape: 36 chars with hyphen separators.
        assert_eq!(first.id().len(), 36);
    }

    #[test]
    fn session_parsed_from_full_cookie() {
        let session = CurrentSession::from_cookie(Some(
            "my_session_id|2020-05-01T10:00:00.000Z|2020-05-01T12:30:00.000Z",
        ));

        assert_eq!(session.id(), Some("my_session_id"));
        let created = session.created_at().unwrap();
        assert_eq!(created.to_rfc3339(), "2020-05-01T10:00:00+00:00");
        let renewed = session.last_renewed_at().unwrap();
        assert_eq!(renewed.to_rfc3339(), "2020-05-01T12:30:00+00:00");
    }

    #[test]
    fn session_with_id_only() {
        let session = CurrentSession::from_cookie(Some("my_session_id"));
        assert_eq!(session.id(), Some("my_session_id"));
        assert!(session.created_at().is_none());
        assert!(session.last_renewed_at().is_none());
    }

    #[test]
    fn missing_session_cookie_means_no_session() {
        let session = CurrentSession::from_cookie(None);
        assert!(session.id().is_none());
        assert!(session.created_at().is_none());
        assert!(session.last_renewed_at().is_none());
    }

    #[test]
    fn unparseable_timestamps_fall_back_to_now() {
        let session = CurrentSession::from_cookie(Some("id|not-a-date"));
        assert_eq!(session.id(), Some("id"));
        let created = session.created_at().unwrap();
        assert!((Utc::now() - created).num_seconds() < 5);
    }
}
