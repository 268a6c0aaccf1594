use url::form_urlencoded;

use crate::config::Endpoints;

/// Bucket that holds notes on the Simperium api.
pub const BUCKET_NAME: &str = "Note";

/// Build `?k1=v1&k2=v2` from a flat `[k1, v1, k2, v2]` list, or "" when empty.
///
/// Values are form-encoded and kept in the given order. An odd number of
/// arguments is a bug in the caller and aborts.
pub fn query_string(args: &[&str]) -> String {
    assert!(
        args.len() % 2 == 0,
        "number of query arguments must be even, got {}",
        args.len()
    );
    if args.is_empty() {
        return String::new();
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    for pair in args.chunks_exact(2) {
        query.append_pair(pair[0], pair[1]);
    }
    format!("?{}", query.finish())
}

/// Percent-encode a whole string as one form value.
pub fn encode_form_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

impl Endpoints {
    /// `<auth root>/<appId>/authorize/`
    pub fn authorize_url(&self, app_id: &str) -> String {
        format!("{}/{}/authorize/", trim(&self.auth_root), app_id)
    }

    /// `<api root>/<appId>/Note<path>[?params]`
    pub fn bucket_url(&self, app_id: &str, path: &str, args: &[&str]) -> String {
        format!(
            "{}/{}/{}{}{}",
            trim(&self.api_root),
            app_id,
            BUCKET_NAME,
            path,
            query_string(args)
        )
    }

    pub fn legacy_login_url(&self) -> String {
        format!("{}/api/login", trim(&self.legacy_root))
    }

    /// `<legacy root>/api2<path>[?params]`
    pub fn legacy_url(&self, path: &str, args: &[&str]) -> String {
        format!(
            "{}/api2{}{}",
            trim(&self.legacy_root),
            path,
            query_string(args)
        )
    }
}

fn trim(root: &str) -> &str {
    root.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_empty() {
        assert_eq!(query_string(&[]), "");
    }

    #[test]
    fn test_query_string_encodes_values_in_order() {
        let q = query_string(&["limit", "100", "email", "me+you@example.com", "mark", "a b/c"]);
        assert_eq!(q, "?limit=100&email=me%2Byou%40example.com&mark=a+b%2Fc");
    }

    #[test]
    #[should_panic(expected = "must be even")]
    fn test_query_string_rejects_odd_arguments() {
        query_string(&["limit", "100", "mark"]);
    }

    #[test]
    fn test_production_urls() {
        let endpoints = Endpoints::default();

        assert_eq!(
            endpoints.authorize_url("chalk-bump-f49"),
            "https://auth.simperium.com/1/chalk-bump-f49/authorize/"
        );
        assert_eq!(
            endpoints.bucket_url("chalk-bump-f49", "/index", &["limit", "100", "data", "1"]),
            "https://api.simperium.com/1/chalk-bump-f49/Note/index?limit=100&data=1"
        );
        assert_eq!(
            endpoints.bucket_url("chalk-bump-f49", "/i/abc/v/3", &[]),
            "https://api.simperium.com/1/chalk-bump-f49/Note/i/abc/v/3"
        );
        assert_eq!(
            endpoints.legacy_login_url(),
            "https://simple-note.appspot.com/api/login"
        );
        assert_eq!(
            endpoints.legacy_url("/data/abc/2", &["auth", "t", "email", "e"]),
            "https://simple-note.appspot.com/api2/data/abc/2?auth=t&email=e"
        );
    }

    #[test]
    fn test_trailing_slash_on_root_is_ignored() {
        let endpoints = Endpoints::single_host("http://127.0.0.1:9000/");
        assert_eq!(
            endpoints.legacy_url("/index", &[]),
            "http://127.0.0.1:9000/api2/index"
        );
        assert_eq!(
            endpoints.authorize_url("app"),
            "http://127.0.0.1:9000/auth/1/app/authorize/"
        );
    }

    #[test]
    fn test_encode_form_value() {
        assert_eq!(
            encode_form_value(r#"{"key":"a b"}"#),
            "%7B%22key%22%3A%22a+b%22%7D"
        );
    }
}
