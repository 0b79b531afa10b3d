//! URL / query-parameter synchronizer - pure functions, no state
//!
//! The params editor and the URL field are two views of the same data. Every
//! edit to one side is pushed through these functions to resynchronize the
//! other. Disabled params are the one deliberate asymmetry: they stay in the
//! editor list but are dropped from the URL, and they survive manual URL
//! edits that no longer mention their key.

use url::form_urlencoded;

use crate::models::KeyValuePair;

/// Extract the part of a URL before the first `?`.
pub fn base_url(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Parse the query string of a URL into an ordered parameter list.
///
/// Takes everything after the first `?` and decodes it with standard
/// form-urlencoded rules (percent decoding, `+` as space). A pair without
/// `=` yields an empty value. Empty keys are skipped. Never fails: a URL
/// with no `?`, or one whose query decodes to nothing, yields an empty list.
pub fn parse_params(url: &str) -> Vec<KeyValuePair> {
    let Some((_, query)) = url.split_once('?') else {
        return Vec::new();
    };

    form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| KeyValuePair::new(key, value))
        .collect()
}

/// Rebuild a URL from a base (no query string) and a parameter list.
///
/// Only enabled params with a non-empty trimmed key are serialized. An
/// enabled param with an empty value still appears as `key=`. With no
/// eligible params the bare base is returned, without a trailing `?`.
pub fn rebuild_url(base: &str, params: &[KeyValuePair]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;

    for param in params {
        let key = param.key.trim();
        if param.enabled && !key.is_empty() {
            serializer.append_pair(key, &param.value);
            any = true;
        }
    }

    if any {
        format!("{}?{}", base, serializer.finish())
    } else {
        base.to_string()
    }
}

/// Compute the parameter list after a manual edit of the URL string.
///
/// The fresh list is whatever the new URL parses to; previously disabled
/// params whose key does not reappear in the fresh list are carried over at
/// the end. So disabling a param "sticks" even though its key vanished from
/// the URL.
pub fn merge_url_edit(new_url: &str, previous: &[KeyValuePair]) -> Vec<KeyValuePair> {
    let mut params = parse_params(new_url);

    let retained: Vec<KeyValuePair> = previous
        .iter()
        .filter(|prev| !prev.enabled && !params.iter().any(|p| p.key == prev.key))
        .cloned()
        .collect();

    params.extend(retained);
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn disabled(key: &str, value: &str) -> KeyValuePair {
        KeyValuePair {
            enabled: false,
            ..KeyValuePair::new(key, value)
        }
    }

    #[test]
    fn parse_no_query_is_empty() {
        assert_eq!(parse_params("https://x.com/a"), vec![]);
        assert_eq!(parse_params(""), vec![]);
        assert_eq!(parse_params("not a url at all"), vec![]);
    }

    #[test]
    fn parse_keys_and_values() {
        let params = parse_params("https://x.com/a?foo=1&bar=");
        assert_eq!(
            params,
            vec![KeyValuePair::new("foo", "1"), KeyValuePair::new("bar", "")]
        );
        assert!(params.iter().all(|p| p.enabled));
    }

    #[test]
    fn parse_key_without_equals() {
        let params = parse_params("https://x.com/a?flag&k=v");
        assert_eq!(
            params,
            vec![KeyValuePair::new("flag", ""), KeyValuePair::new("k", "v")]
        );
    }

    #[test]
    fn parse_percent_decodes() {
        let params = parse_params("https://x.com/?q=hello%20world&name=a%26b");
        assert_eq!(params[0].value, "hello world");
        assert_eq!(params[1].value, "a&b");
    }

    #[test]
    fn parse_plus_as_space() {
        let params = parse_params("https://x.com/?q=hello+world");
        assert_eq!(params[0].value, "hello world");
    }

    #[test]
    fn parse_skips_empty_keys() {
        let params = parse_params("https://x.com/?=orphan&k=v&&");
        assert_eq!(params, vec![KeyValuePair::new("k", "v")]);
    }

    #[test]
    fn parse_keeps_duplicate_keys_in_order() {
        let params = parse_params("https://x.com/?id=1&id=2");
        assert_eq!(
            params,
            vec![KeyValuePair::new("id", "1"), KeyValuePair::new("id", "2")]
        );
    }

    #[test]
    fn parse_splits_on_first_question_mark() {
        let params = parse_params("https://x.com/?a=1?b=2");
        // Everything after the first `?` is query string.
        assert_eq!(params, vec![KeyValuePair::new("a", "1?b=2")]);
    }

    #[test]
    fn rebuild_empty_list_returns_bare_base() {
        assert_eq!(rebuild_url("https://x.com/a", &[]), "https://x.com/a");
    }

    #[test]
    fn rebuild_skips_disabled_and_keyless() {
        let params = vec![
            KeyValuePair::new("a", "1"),
            disabled("b", "2"),
            KeyValuePair::new("", "ignored"),
            KeyValuePair::new("   ", "ignored"),
        ];
        assert_eq!(rebuild_url("https://x.com", &params), "https://x.com?a=1");
    }

    #[test]
    fn rebuild_serializes_empty_value() {
        let params = vec![KeyValuePair::new("bar", "")];
        assert_eq!(rebuild_url("https://x.com", &params), "https://x.com?bar=");
    }

    #[test]
    fn rebuild_percent_encodes() {
        let params = vec![KeyValuePair::new("q", "a b&c")];
        assert_eq!(
            rebuild_url("https://x.com", &params),
            "https://x.com?q=a+b%26c"
        );
    }

    #[test]
    fn rebuild_trims_keys() {
        let params = vec![KeyValuePair::new(" page ", "2")];
        assert_eq!(rebuild_url("https://x.com", &params), "https://x.com?page=2");
    }

    #[test]
    fn base_url_strips_query() {
        assert_eq!(base_url("https://x.com/a?b=1"), "https://x.com/a");
        assert_eq!(base_url("https://x.com/a"), "https://x.com/a");
    }

    #[test]
    fn round_trip_enabled_params() {
        let params = vec![
            KeyValuePair::new("foo", "1"),
            KeyValuePair::new("q", "two words"),
            KeyValuePair::new("empty", ""),
            disabled("gone", "x"),
        ];
        let url = rebuild_url("https://x.com/a", &params);
        let reparsed = parse_params(&url);

        let expected: Vec<KeyValuePair> = params
            .iter()
            .filter(|p| p.enabled)
            .map(|p| KeyValuePair::new(p.key.clone(), p.value.clone()))
            .collect();
        assert_eq!(reparsed, expected);
    }

    #[test]
    fn merge_keeps_disabled_param_missing_from_url() {
        let previous = vec![KeyValuePair::new("a", "1"), disabled("b", "2")];
        let merged = merge_url_edit("https://x.com/?a=1&c=3", &previous);
        assert_eq!(
            merged,
            vec![
                KeyValuePair::new("a", "1"),
                KeyValuePair::new("c", "3"),
                disabled("b", "2"),
            ]
        );
    }

    #[test]
    fn merge_drops_disabled_param_when_key_reappears() {
        let previous = vec![disabled("b", "old")];
        let merged = merge_url_edit("https://x.com/?b=new", &previous);
        // The freshly typed value wins; the stale disabled row is gone.
        assert_eq!(merged, vec![KeyValuePair::new("b", "new")]);
    }

    #[test]
    fn merge_drops_enabled_params_not_in_url() {
        let previous = vec![KeyValuePair::new("a", "1")];
        let merged = merge_url_edit("https://x.com/", &previous);
        assert_eq!(merged, vec![]);
    }
}
