use actix_web::cookie::{Cookie, SameSite};
use std::collections::HashMap;
use time::Duration;
use super::store::SESSION_TTL_SECS;

pub const SESSION_COOKIE_NAME: &str = "session_id";
pub const SESSION_MAX_AGE_SECONDS: i64 = SESSION_TTL_SECS;

/// Cookie carrying `session_id`, or the revocation cookie when there is none.
///
/// Max-Age is the full TTL: sessions expire on an absolute deadline and the
/// cookie is only issued at login, so nothing extends it afterwards.
pub fn session_cookie(session_id: Option<&str>) -> Cookie<'static> {
    let (value, max_age) = match session_id {
        Some(id) if !id.is_empty() => (id.to_string(), Duration::seconds(SESSION_MAX_AGE_SECONDS)),
        _ => (String::new(), Duration::ZERO),
    };

    Cookie::build(SESSION_COOKIE_NAME, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .finish()
}

/// `Set-Cookie` header value for [`session_cookie`].
pub fn build_session_cookie(session_id: Option<&str>) -> String {
    session_cookie(session_id).to_string()
}

/// Lenient `Cookie` header parser. Segments without `=` get an empty value,
/// segments without a name are skipped, and a repeated name keeps the last value.
pub fn parse_cookies(header: Option<&str>) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    let Some(header) = header else {
        return cookies;
    };

    for part in header.split(';') {
        let part = part.trim();
        let (name, value) = part.split_once('=').unwrap_or((part, ""));
        if name.is_empty() {
            continue;
        }
        cookies.insert(name.to_string(), value.to_string());
    }

    cookies
}

pub fn session_id_from_header(header: Option<&str>) -> Option<String> {
    parse_cookies(header).remove(SESSION_COOKIE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_pairs() {
        let cookies = parse_cookies(Some("a=1; b=2"));
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies["a"], "1");
        assert_eq!(cookies["b"], "2");
    }

    #[test]
    fn empty_or_missing_header_yields_nothing() {
        assert!(parse_cookies(Some("")).is_empty());
        assert!(parse_cookies(None).is_empty());
        assert!(parse_cookies(Some(" ; ;")).is_empty());
    }

    #[test]
    fn value_keeps_embedded_equals() {
        let cookies = parse_cookies(Some("a=1=2"));
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies["a"], "1=2");
    }

    #[test]
    fn tolerates_malformed_segments() {
        let cookies = parse_cookies(Some("flag; =orphan; a=; b=2"));
        assert_eq!(cookies.get("flag").map(String::as_str), Some(""));
        assert_eq!(cookies.get("a").map(String::as_str), Some(""));
        assert_eq!(cookies.get("b").map(String::as_str), Some("2"));
        assert!(!cookies.contains_key(""));
    }

    #[test]
    fn last_duplicate_wins() {
        let cookies = parse_cookies(Some("session_id=old; session_id=new"));
        assert_eq!(cookies["session_id"], "new");
    }

    #[test]
    fn extracts_session_id_among_other_cookies() {
        let header = Some("theme=dark; session_id=abc-123; lang=zh");
        assert_eq!(session_id_from_header(header).as_deref(), Some("abc-123"));
        assert_eq!(session_id_from_header(Some("theme=dark")), None);
    }

    #[test]
    fn issued_cookie_has_full_ttl_and_flags() {
        let cookie = build_session_cookie(Some("abc"));
        assert!(cookie.starts_with("session_id=abc"));
        assert!(cookie.contains("Max-Age=14400"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
    }

    #[test]
    fn revocation_cookie_is_empty_and_expired() {
        let cookie = build_session_cookie(None);
        assert!(cookie.starts_with("session_id=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Path=/"));

        assert_eq!(build_session_cookie(Some("")), cookie);
    }
}
