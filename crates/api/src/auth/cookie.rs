//! The `session` cookie.
//!
//! The cookie is `HttpOnly` and `SameSite=Lax`; `Secure` is added when
//! `COOKIE_SECURE=true`.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// `Set-Cookie` value that stores `token` for `max_age_secs` seconds.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// Find the value of cookie `name` across all `Cookie` request headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(values: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for v in values {
            map.append(COOKIE, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn reads_cookie_among_others() {
        let map = headers(&["theme=dark; session=abc.def.ghi; lang=en"]);
        assert_eq!(read_cookie(&map, SESSION_COOKIE), Some("abc.def.ghi"));
    }

    #[test]
    fn reads_cookie_from_second_header() {
        let map = headers(&["theme=dark", "session=tok"]);
        assert_eq!(read_cookie(&map, SESSION_COOKIE), Some("tok"));
    }

    #[test]
    fn missing_or_empty_cookie_is_none() {
        assert_eq!(read_cookie(&headers(&["theme=dark"]), SESSION_COOKIE), None);
        assert_eq!(read_cookie(&headers(&["session="]), SESSION_COOKIE), None);
        assert_eq!(read_cookie(&HeaderMap::new(), SESSION_COOKIE), None);
    }

    #[test]
    fn prefix_names_do_not_match() {
        let map = headers(&["session_old=stale"]);
        assert_eq!(read_cookie(&map, SESSION_COOKIE), None);
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("tok", 3600, false);
        assert!(cookie.starts_with("session=tok;"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));

        assert!(session_cookie("tok", 3600, true).ends_with("; Secure"));
    }

    #[test]
    fn clearing_cookie_expires_it() {
        let cookie = clear_session_cookie(false);
        assert!(cookie.starts_with("session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
