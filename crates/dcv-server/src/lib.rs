//! HTTP server for the DICOM vault.
//!
//! Exposes upload, attribute lookup and PNG conversion over HTTP with
//! bearer-token authentication. Every handler is a single call into the
//! [`dcv_service`] facade, run on the blocking pool.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use auth::{Action, AuthProvider, Credentials, Identity, Role, StaticTokenAuth};
pub use config::{ServerConfig, TokenConfig};
pub use error::{ServerError, ServerResult};
pub use server::DicomServer;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use dcv_dataset::sample::SampleFile;
    use serde_json::Value;
    use tower::util::ServiceExt;

    const ADMIN: &str = "admin-token";
    const READER: &str = "reader-token";
    const BOUNDARY: &str = "dcv-test-boundary";

    fn app() -> (tempfile::TempDir, Router) {
        app_with_limit(ServerConfig::default().max_upload_bytes)
    }

    fn app_with_limit(max_upload_bytes: usize) -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            max_upload_bytes,
            storage_root: dir.path().join("storage"),
            tokens: vec![
                TokenConfig {
                    token: ADMIN.into(),
                    name: "alice".into(),
                    role: Role::Admin,
                },
                TokenConfig {
                    token: READER.into(),
                    name: "bob".into(),
                    role: Role::Reader,
                },
            ],
            ..Default::default()
        };
        let router = DicomServer::new(config).unwrap().router();
        (dir, router)
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn upload_request(token: &str, field: &str, data: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"image.dcm\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, req).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn upload_sample(app: &Router) -> String {
        let bytes = SampleFile::grayscale(2, 2, vec![0, 255, 128, 64]).encode();
        let (status, json) = send_json(app, upload_request(ADMIN, "file", &bytes)).await;
        assert_eq!(status, StatusCode::OK, "{json}");
        json["file_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_needs_no_token() {
        let (_dir, app) = app();
        let (status, json) = send_json(&app, get("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn upload_attribute_convert() {
        let (_dir, app) = app();
        let id = upload_sample(&app).await;
        assert_eq!(id.len(), 64);

        let (status, json) =
            send_json(&app, get(&format!("/attribute?file_id={id}&tag=0028,0010"), Some(READER))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["attribute"], "2");

        let response = app
            .clone()
            .oneshot(get(&format!("/convert?file_id={id}"), Some(READER)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "image/png");
        let png = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let img = image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(img.as_raw(), &vec![0, 255, 128, 64]);
    }

    #[tokio::test]
    async fn upload_message_and_dedup() {
        let (_dir, app) = app();
        let bytes = SampleFile::grayscale(1, 1, vec![5]).encode();
        let (_, first) = send_json(&app, upload_request(ADMIN, "file", &bytes)).await;
        let (_, second) = send_json(&app, upload_request(ADMIN, "file", &bytes)).await;
        assert_eq!(first["message"], "File uploaded successfully");
        assert_eq!(first["file_id"], second["file_id"]);
    }

    #[tokio::test]
    async fn auth_failures() {
        let (_dir, app) = app();

        let (status, json) = send_json(&app, get("/convert?file_id=x", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "Unauthorized");

        let (status, json) = send_json(&app, get("/convert?file_id=x", Some("valid-token"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "Invalid token");

        let (status, json) = send_json(&app, upload_request(READER, "file", b"data")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "Insufficient permissions");
    }

    #[tokio::test]
    async fn bare_token_is_accepted() {
        let (_dir, app) = app();
        let req = Request::builder()
            .uri("/attribute?file_id=abc&tag=0010,0010")
            .header(AUTHORIZATION, READER)
            .body(Body::empty())
            .unwrap();
        let (status, _) = send_json(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_parameters() {
        let (_dir, app) = app();

        let (status, json) = send_json(&app, get("/attribute?file_id=abc", Some(READER))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Missing file_id or tag");

        let (status, json) = send_json(&app, get("/convert", Some(READER))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Missing file_id");

        let (status, json) = send_json(&app, upload_request(ADMIN, "other", b"data")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No file provided");
    }

    #[tokio::test]
    async fn oversized_upload_is_413() {
        let (_dir, app) = app_with_limit(64);
        let (status, json) = send_json(&app, upload_request(ADMIN, "file", &[0u8; 4096])).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_ne!(json["error"], "No file provided");
    }

    #[tokio::test]
    async fn malformed_multipart_is_400() {
        let (_dir, app) = app();
        // no closing boundary
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"\r\n\r\n\
             truncated"
        );
        let req = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(AUTHORIZATION, format!("Bearer {ADMIN}"))
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap();
        let (status, json) = send_json(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn error_kinds_map_to_statuses() {
        let (_dir, app) = app();
        let id = upload_sample(&app).await;
        let unknown = "0".repeat(64);

        let cases = [
            (format!("/attribute?file_id={unknown}&tag=0010,0010"), StatusCode::NOT_FOUND),
            (format!("/attribute?file_id={id}&tag=zzzz,0000"), StatusCode::BAD_REQUEST),
            (format!("/attribute?file_id={id}&tag=0008,0020"), StatusCode::NOT_FOUND),
            (format!("/convert?file_id={unknown}"), StatusCode::NOT_FOUND),
        ];
        for (uri, expected) in cases {
            let (status, json) = send_json(&app, get(&uri, Some(READER))).await;
            assert_eq!(status, expected, "{uri}");
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn unrenderable_file_is_422() {
        let (_dir, app) = app();
        let bytes = SampleFile::grayscale(2, 2, vec![0; 4]).without_rows().encode();
        let (_, json) = send_json(&app, upload_request(ADMIN, "file", &bytes)).await;
        let id = json["file_id"].as_str().unwrap();

        let (status, _) = send_json(&app, get(&format!("/convert?file_id={id}"), Some(READER))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, json) = send_json(&app, upload_request(ADMIN, "file", b"plain text")).await;
        let id = json["file_id"].as_str().unwrap();
        let (status, _) =
            send_json(&app, get(&format!("/attribute?file_id={id}&tag=0010,0010"), Some(READER))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
