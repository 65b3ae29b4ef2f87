//! Error envelope integration tests.

#[cfg(test)]
mod tests {
    use crate::{endpoint_url, http_client, post_json, upload_body};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_with_path() {
        let client = http_client();
        let resp = client
            .get(format!("{}/does/not/exist", endpoint_url()))
            .send()
            .await
            .expect("request");

        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
        let json: serde_json::Value = resp.json().await.expect("json");
        assert_eq!(
            json,
            serde_json::json!({"error": "Not Found", "path": "/does/not/exist"})
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_missing_required_fields() {
        let client = http_client();
        let (status, json) = post_json(
            &client,
            "/api/presigned-url",
            &serde_json::json!({"fileName": "a.png", "userId": "u1"}),
        )
        .await
        .expect("request");

        assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Missing required fields"})
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_require_company_for_campaign_images() {
        let client = http_client();
        let mut body = upload_body("campaign-images");
        body["companyId"] = serde_json::Value::Null;

        let (status, json) = post_json(&client, "/api/presigned-url", &body)
            .await
            .expect("request");
        assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "companyId is required for campaign-images");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_require_file_path_for_view() {
        let client = http_client();
        let (status, json) =
            post_json(&client, "/api/presigned-url-view", &serde_json::json!({}))
                .await
                .expect("request");
        assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "filePath is required");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_malformed_json() {
        let client = http_client();
        let resp = client
            .post(format!("{}/api/presigned-url-view", endpoint_url()))
            .header("content-type", "application/json")
            .body("{\"filePath\":")
            .send()
            .await
            .expect("request");

        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        let json: serde_json::Value = resp.json().await.expect("json");
        assert_eq!(json["success"], false);
    }
}
