#[cfg(test)]
mod test {

    use chrono::{Duration, Utc};

    use crate::authenticators::response::parse_token_response;
    use crate::errors::AuthError;

    #[test]
    fn expires_in_as_number() {
        let token =
            parse_token_response("test", r#"{"access_token":"tok","expires_in":3600}"#).unwrap();
        assert_eq!(token.access_token, "tok");
        let delta = token.expires_on - Utc::now();
        assert!(delta > Duration::seconds(3590) && delta <= Duration::seconds(3600));
    }

    #[test]
    fn expires_in_as_string() {
        // Azure token endpoints report numbers as strings.
        let token =
            parse_token_response("test", r#"{"access_token":"tok","expires_in":"3600"}"#).unwrap();
        let delta = token.expires_on - Utc::now();
        assert!(delta > Duration::seconds(3590) && delta <= Duration::seconds(3600));
    }

    #[test]
    fn expires_on_as_unix_timestamp() {
        let expires_on = (Utc::now() + Duration::seconds(1800)).timestamp();
        let body = format!(
            r#"{{"access_token":"tok","expires_on":{}}}"#,
            expires_on
        );
        let token = parse_token_response("test", &body).unwrap();
        assert_eq!(token.expires_on.timestamp(), expires_on);
    }

    #[test]
    fn absolute_expiry_wins_over_relative() {
        let expires_on = (Utc::now() + Duration::seconds(60)).timestamp();
        let body = format!(
            r#"{{"access_token":"tok","expires_in":"86400","expires_on":"{}"}}"#,
            expires_on
        );
        let token = parse_token_response("test", &body).unwrap();
        assert_eq!(token.expires_on.timestamp(), expires_on);
    }

    #[test]
    fn missing_access_token_is_provider_error() {
        let result = parse_token_response("test", r#"{"expires_in":3600}"#);
        assert!(matches!(result, Err(AuthError::IdentityProvider(_))));
    }

    #[test]
    fn empty_access_token_is_provider_error() {
        let result = parse_token_response("test", r#"{"access_token":"","expires_in":3600}"#);
        assert!(matches!(result, Err(AuthError::IdentityProvider(_))));
    }

    #[test]
    fn missing_expiry_is_provider_error() {
        let result = parse_token_response("test", r#"{"access_token":"tok"}"#);
        assert!(matches!(result, Err(AuthError::IdentityProvider(_))));
    }

    #[test]
    fn non_json_body_is_provider_error() {
        let result = parse_token_response("test", "<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(AuthError::IdentityProvider(_))));
    }

    #[test]
    fn non_numeric_expiry_is_provider_error() {
        let result =
            parse_token_response("test", r#"{"access_token":"tok","expires_in":"soon"}"#);
        assert!(matches!(result, Err(AuthError::IdentityProvider(_))));
    }
}
