//! Header names understood by the API server.

pub const LOCALE: &str = "LOCALE";
pub const HMAC: &str = "HMAC";
pub const ACCESS_TOKEN: &str = "ACCESS-TOKEN";
/// Device identifier.
pub const UUID: &str = "GAID";
pub const PLATFORM: &str = "PLATFORM";

pub const CONTENT_TYPE: &str = "Content-Type";

/// Headers whose values never appear in logs.
pub(crate) const SENSITIVE: [&str; 3] = [ACCESS_TOKEN, HMAC, "Authorization"];

pub(crate) fn is_sensitive(name: &str) -> bool {
    SENSITIVE.iter().any(|s| s.eq_ignore_ascii_case(name))
}
