#[cfg(test)]
mod test {

    use serde_json::json;

    use crate::cache::caching_authenticator::CachingAuthenticator;
    use crate::tests::common::{managed_identity_backend_for, IMDS_PATH};
    use httpmock::prelude::*;

    // tenant T1 / resource R1 / credential C1: a fresh token, a cache hit
    // 10s later would behave identically, then a forced refresh replaces a
    // still-valid token.
    #[tokio::test]
    async fn forced_refresh_replaces_a_still_valid_token() {
        let server = MockServer::start_async().await;
        let mut first_mock = server
            .mock_async(|when, then| {
                when.method(GET).path(IMDS_PATH);
                then.status(200)
                    .json_body(json!({"access_token": "tok-1", "expires_in": 3600}));
            })
            .await;

        let authenticator = CachingAuthenticator::new(managed_identity_backend_for(
            &server, "T1", "C1", "R1",
        ));

        let initial = authenticator.get_token(false).await.unwrap();
        assert_eq!(initial.access_token, "tok-1");

        let repeated = authenticator.get_token(false).await.unwrap();
        assert_eq!(repeated.access_token, "tok-1");
        assert_eq!(first_mock.hits_async().await, 1);

        // provider now hands out a new token; tok-1 is still far from expiry
        first_mock.delete_async().await;
        let second_mock = server
            .mock_async(|when, then| {
                when.method(GET).path(IMDS_PATH);
                then.status(200)
                    .json_body(json!({"access_token": "tok-2", "expires_in": 3600}));
            })
            .await;

        let forced = authenticator.get_token(true).await.unwrap();
        assert_eq!(forced.access_token, "tok-2");
        assert_eq!(second_mock.hits_async().await, 1);

        // and the forced result is what the cache now serves
        let cached = authenticator.get_token(false).await.unwrap();
        assert_eq!(cached.access_token, "tok-2");
        assert_eq!(second_mock.hits_async().await, 1);
    }
}
