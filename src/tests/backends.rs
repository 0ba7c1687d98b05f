#[cfg(test)]
mod test {

    use std::io::Write;

    use serde_json::json;

    use crate::authenticators::certificate::CertificateAuthenticator;
    use crate::authenticators::client_secret::ClientSecretAuthenticator;
    use crate::authenticators::federated::FederatedCredentialAuthenticator;
    use crate::errors::AuthError;
    use crate::tests::common::{managed_identity_backend, TEST_RSA_PRIVATE_KEY};
    use crate::utils::constants::CLIENT_ASSERTION_TYPE_JWT_BEARER;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn managed_identity_sends_metadata_header_and_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/metadata/identity/oauth2/token")
                    .header("Metadata", "true")
                    .query_param("resource", "R1")
                    .query_param("client_id", "C1");
                then.status(200)
                    .json_body(json!({"access_token": "tok-mi", "expires_in": 3600}));
            })
            .await;

        let backend = managed_identity_backend(&server);
        let token = backend.get_token(false).await.unwrap();

        assert_eq!(token.access_token, "tok-mi");
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn managed_identity_surfaces_provider_rejection() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/metadata/identity/oauth2/token");
                then.status(400).json_body(json!({"error": "invalid_request"}));
            })
            .await;

        let backend = managed_identity_backend(&server);
        let result = backend.get_token(false).await;

        assert!(matches!(result, Err(AuthError::IdentityProvider(_))));
    }

    #[tokio::test]
    async fn client_secret_posts_credentials_form() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/T1/oauth2/v2.0/token")
                    .form_urlencoded_tuple("grant_type", "client_credentials")
                    .form_urlencoded_tuple("client_id", "C1")
                    .form_urlencoded_tuple("client_secret", "s3cret")
                    .form_urlencoded_tuple("scope", "R1/.default");
                then.status(200)
                    .json_body(json!({"access_token": "tok-cs", "expires_in": "3599"}));
            })
            .await;

        let backend = ClientSecretAuthenticator::with_authority(
            "T1",
            "C1",
            "R1",
            "s3cret",
            &server.base_url(),
        )
        .unwrap();
        let token = backend.fetch_token(false).await.unwrap();

        assert_eq!(token.access_token, "tok-cs");
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn certificate_posts_signed_assertion() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/T1/oauth2/v2.0/token")
                    .form_urlencoded_tuple("grant_type", "client_credentials")
                    .form_urlencoded_tuple(
                        "client_assertion_type",
                        CLIENT_ASSERTION_TYPE_JWT_BEARER,
                    )
                    .form_urlencoded_tuple_exists("client_assertion");
                then.status(200)
                    .json_body(json!({"access_token": "tok-cert", "expires_in": 3600}));
            })
            .await;

        let backend = CertificateAuthenticator::with_authority(
            "T1",
            "C1",
            "R1",
            TEST_RSA_PRIVATE_KEY,
            "dGVzdC10aHVtYnByaW50",
            &server.base_url(),
        )
        .unwrap();
        let token = backend.fetch_token(false).await.unwrap();

        assert_eq!(token.access_token, "tok-cert");
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn federated_exchanges_the_projected_assertion() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/T1/oauth2/v2.0/token")
                    .form_urlencoded_tuple("grant_type", "client_credentials")
                    .form_urlencoded_tuple("client_assertion", "projected-assertion-jwt")
                    .form_urlencoded_tuple(
                        "client_assertion_type",
                        CLIENT_ASSERTION_TYPE_JWT_BEARER,
                    );
                then.status(200)
                    .json_body(json!({"access_token": "tok-fed", "expires_in": 3600}));
            })
            .await;

        let mut assertion_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(assertion_file, "projected-assertion-jwt").unwrap();

        let backend = FederatedCredentialAuthenticator::with_authority(
            "T1",
            "C1",
            "R1",
            assertion_file.path().to_str().unwrap(),
            &server.base_url(),
        )
        .unwrap();
        let token = backend.fetch_token(false).await.unwrap();

        assert_eq!(token.access_token, "tok-fed");
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn federated_missing_assertion_file_is_provider_error() {
        let server = MockServer::start_async().await;
        let backend = FederatedCredentialAuthenticator::with_authority(
            "T1",
            "C1",
            "R1",
            "/nonexistent/tokens/app",
            &server.base_url(),
        )
        .unwrap();

        let result = backend.fetch_token(false).await;
        assert!(matches!(result, Err(AuthError::IdentityProvider(_))));
    }
}
