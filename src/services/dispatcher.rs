use std::borrow::Cow;

use crate::storage::LinkRecord;

/// Where a resolved visit is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub location: String,
}

/// Prefixes `https://` unless the URL already starts with `http://` or
/// `https://` (ASCII case-insensitive). Nothing else is rewritten.
pub fn normalize_destination(original_url: &str) -> Cow<'_, str> {
    if has_http_scheme(original_url) {
        Cow::Borrowed(original_url)
    } else {
        Cow::Owned(format!("https://{}", original_url))
    }
}

fn has_http_scheme(url: &str) -> bool {
    let starts_with = |prefix: &str| {
        url.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    starts_with("http://") || starts_with("https://")
}

/// Builds the redirect for a resolved record. Pure; never touches the store.
pub fn build_redirect(record: &LinkRecord) -> RedirectTarget {
    RedirectTarget {
        location: normalize_destination(&record.original_url).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_is_prepended_when_missing() {
        assert_eq!(
            normalize_destination("example.com/page"),
            "https://example.com/page"
        );
        assert_eq!(normalize_destination(""), "https://");
        assert_eq!(
            normalize_destination("ftp://files.example.com"),
            "https://ftp://files.example.com"
        );
    }

    #[test]
    fn test_existing_scheme_is_kept() {
        assert_eq!(normalize_destination("http://a.test"), "http://a.test");
        assert_eq!(normalize_destination("https://a.test/x?y=1"), "https://a.test/x?y=1");
        assert_eq!(normalize_destination("HTTPS://A.test"), "HTTPS://A.test");
        assert!(matches!(
            normalize_destination("https://a.test"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_non_ascii_prefix_does_not_panic() {
        assert_eq!(normalize_destination("日本.jp"), "https://日本.jp");
    }

    #[test]
    fn test_build_redirect() {
        let record = LinkRecord {
            id: "1".to_string(),
            short_code: "abc123".to_string(),
            original_url: "example.com/page".to_string(),
            owner_id: "u1".to_string(),
            clicks: 0,
            created_at: chrono::Utc::now(),
        };
        assert_eq!(
            build_redirect(&record),
            RedirectTarget {
                location: "https://example.com/page".to_string()
            }
        );
    }
}
