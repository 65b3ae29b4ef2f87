//! CORS integration tests.

#[cfg(test)]
mod tests {
    use crate::{endpoint_url, http_client, upload_body};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_preflight() {
        let client = http_client();
        let resp = client
            .request(
                reqwest::Method::OPTIONS,
                format!("{}/api/presigned-url", endpoint_url()),
            )
            .header("origin", "https://app.example.com")
            .header("access-control-request-method", "POST")
            .send()
            .await
            .expect("preflight request");

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(
            headers["access-control-allow-methods"],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
        assert_eq!(
            headers["access-control-allow-headers"],
            "Content-Type, Authorization"
        );
        assert!(resp.bytes().await.expect("body").is_empty());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_attach_cors_headers_to_api_responses() {
        let client = http_client();
        let resp = client
            .post(format!("{}/api/presigned-url", endpoint_url()))
            .json(&upload_body("other"))
            .send()
            .await
            .expect("presign request");

        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert!(resp.headers().contains_key("x-request-id"));

        let rejected = client
            .post(format!("{}/api/presigned-url", endpoint_url()))
            .json(&serde_json::json!({}))
            .send()
            .await
            .expect("missing fields request");
        assert_eq!(rejected.status(), reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(rejected.headers()["access-control-allow-origin"], "*");
    }
}
