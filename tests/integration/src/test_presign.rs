//! Presign endpoint integration tests.
//!
//! The server's credentials are not known to the test process, so these tests
//! check the URL shape and the response envelope rather than the signature.

#[cfg(test)]
mod tests {
    use crate::{http_client, post_json, upload_body};

    fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
        let (_, query) = url.split_once('?')?;
        query.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == name).then_some(v)
        })
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_issue_upload_url() {
        let client = http_client();
        let (status, json) = post_json(&client, "/api/presigned-url", &upload_body("campaign-images"))
            .await
            .expect("request");

        assert_eq!(status, reqwest::StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["method"], "PUT");

        let file_path = json["filePath"].as_str().expect("filePath");
        assert!(file_path.starts_with("campaign-images/42/product/"));
        assert!(file_path.ends_with(".png"));
        assert!(json["publicUrl"].as_str().expect("publicUrl").ends_with(file_path));

        let url = json["url"].as_str().expect("url");
        assert!(url.starts_with("https://"));
        assert!(url.contains(&format!("/{file_path}?")));
        assert_eq!(query_param(url, "X-Amz-Algorithm"), Some("AWS4-HMAC-SHA256"));
        assert_eq!(query_param(url, "X-Amz-SignedHeaders"), Some("host"));

        let expires_in = json["expiresIn"].as_u64().expect("expiresIn");
        assert_eq!(
            query_param(url, "X-Amz-Expires"),
            Some(expires_in.to_string().as_str())
        );

        let signature = query_param(url, "X-Amz-Signature").expect("signature");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));

        let now = chrono::Utc::now().timestamp();
        let expires_at = json["expiresAt"].as_i64().expect("expiresAt");
        let skew = expires_at - now - i64::try_from(expires_in).expect("expiresIn fits");
        assert!(skew.abs() <= 5, "expiresAt off by {skew}s");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_issue_distinct_keys_per_request() {
        let client = http_client();
        let body = upload_body("business-registration");
        let (_, first) = post_json(&client, "/api/presigned-url", &body)
            .await
            .expect("first request");
        let (_, second) = post_json(&client, "/api/presigned-url", &body)
            .await
            .expect("second request");

        assert_ne!(first["filePath"], second["filePath"]);
        assert_ne!(first["url"], second["url"]);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_issue_view_url_for_uploaded_key() {
        let client = http_client();
        let (_, upload) = post_json(&client, "/api/presigned-url", &upload_body("other"))
            .await
            .expect("upload request");
        let file_path = upload["filePath"].as_str().expect("filePath");

        let (status, view) = post_json(
            &client,
            "/api/presigned-url-view",
            &serde_json::json!({"filePath": file_path}),
        )
        .await
        .expect("view request");

        assert_eq!(status, reqwest::StatusCode::OK);
        assert_eq!(view["method"], "GET");
        assert_eq!(view["filePath"], file_path);

        let url = view["url"].as_str().expect("url");
        let (base, _) = url.split_once('?').expect("query");
        assert!(base.ends_with(file_path));
        assert_eq!(
            query_param(url, "X-Amz-Expires"),
            Some(view["expiresIn"].as_u64().expect("expiresIn").to_string().as_str())
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_presign_get_through_upload_endpoint() {
        let client = http_client();
        let mut body = upload_body("other");
        body["method"] = serde_json::json!("get");

        let (status, json) = post_json(&client, "/api/presigned-url", &body)
            .await
            .expect("request");
        assert_eq!(status, reqwest::StatusCode::OK);
        assert_eq!(json["method"], "GET");
    }
}
