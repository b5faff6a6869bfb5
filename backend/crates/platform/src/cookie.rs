//! Cookie Handling Helpers
//!
//! Building and extracting HTTP cookies without pulling in a full
//! cookie-jar dependency.

use http::{HeaderMap, header};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes applied to cookies this application sets
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self {
            secure: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

/// Build a Set-Cookie header value; always HttpOnly
pub fn build_cookie(name: &str, value: &str, policy: &CookiePolicy) -> String {
    let mut cookie = format!("{}={}; HttpOnly", name, value);

    if policy.secure {
        cookie.push_str("; Secure");
    }
    cookie.push_str(&format!("; SameSite={}", policy.same_site.as_str()));
    cookie.push_str(&format!("; Path={}", policy.path));
    if let Some(max_age) = policy.max_age_secs {
        cookie.push_str(&format!("; Max-Age={}", max_age));
    }

    cookie
}

/// Build a Set-Cookie header value that expires the cookie
pub fn expire_cookie(name: &str, policy: &CookiePolicy) -> String {
    format!("{}=; HttpOnly; Path={}; Max-Age=0", name, policy.path)
}

/// Extract a cookie value from request headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_build_cookie() {
        let policy = CookiePolicy {
            secure: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: Some(3600),
        };

        let cookie = build_cookie("sid", "abc123", &policy);
        assert!(cookie.starts_with("sid=abc123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_insecure_cookie_omits_secure() {
        let policy = CookiePolicy {
            secure: false,
            ..CookiePolicy::default()
        };
        let cookie = build_cookie("sid", "abc", &policy);
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_expire_cookie() {
        let cookie = expire_cookie("sid", &CookiePolicy::default());
        assert!(cookie.starts_with("sid=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; sid=abc123; other=xyz"),
        );

        assert_eq!(extract_cookie(&headers, "sid"), Some("abc123".to_string()));
        assert_eq!(extract_cookie(&headers, "foo"), Some("bar".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }
}
