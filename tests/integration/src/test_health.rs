//! Health endpoint integration tests.

#[cfg(test)]
mod tests {
    use crate::{endpoint_url, http_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_healthy() {
        let client = http_client();
        let resp = client
            .get(format!("{}/health", endpoint_url()))
            .send()
            .await
            .expect("health request");

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.expect("health json");
        assert_eq!(json["status"], "ok");
        assert!(json["service"].is_string());

        let timestamp = json["timestamp"].as_str().expect("timestamp");
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }
}
