use std::sync::Arc;

use gpctl_utils::GpError;
use gpctl_utils::error::ApiError;
use gpctl_utils::redaction::redact;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::model::{ResourceKind, ResourceSummary, normalize_listing};
use crate::transport::{ApiRequest, ApiResponse, ApiTransport};

const USER_ENDPOINT: &str = "/oauth/api/v1/user";
const WP_CLI_ENDPOINT: &str = "/oauth/api/v1/site/run-wp-cli";

/// Longest response body quoted back in an error
const MAX_ERROR_BODY: usize = 200;

/// Typed GridPane operations over any [`ApiTransport`]
#[derive(Clone)]
pub struct GridPaneClient {
    transport: Arc<dyn ApiTransport>,
}

impl GridPaneClient {
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// `GET /user`; any 2xx means the token works
    pub async fn test_connection(&self) -> Result<(), GpError> {
        let response = self.transport.send(ApiRequest::get(USER_ENDPOINT)).await?;
        map_status(USER_ENDPOINT, response)?;
        info!(endpoint = USER_ENDPOINT, "Connection test succeeded");
        Ok(())
    }

    pub async fn list(&self, kind: ResourceKind) -> Result<Vec<ResourceSummary>, GpError> {
        let endpoint = kind.endpoint();
        let response = self.transport.send(ApiRequest::get(endpoint)).await?;
        let response = map_status(endpoint, response)?;

        let value = parse_json(endpoint, &response.body)?;
        let summaries = normalize_listing(kind, &value).map_err(|reason| ApiError::Decode {
            endpoint: endpoint.to_string(),
            reason,
        })?;
        debug!(endpoint, count = summaries.len(), "Listing decoded");
        Ok(summaries)
    }

    pub async fn list_servers(&self) -> Result<Vec<ResourceSummary>, GpError> {
        self.list(ResourceKind::Servers).await
    }

    pub async fn list_sites(&self) -> Result<Vec<ResourceSummary>, GpError> {
        self.list(ResourceKind::Sites).await
    }

    /// Run `wp <command> <args...>` on a site.
    ///
    /// The site's document root is fixed server-side, so `--path` is refused
    /// before anything is sent or charged. Non-JSON output comes back as a
    /// string value.
    pub async fn run_wp_cli(
        &self,
        site_id: u64,
        command: &str,
        args: &[String],
    ) -> Result<Value, GpError> {
        check_wp_arguments(command, args)?;

        let mut wp = Map::new();
        wp.insert(command.to_string(), json!(args));
        let endpoint = format!("{WP_CLI_ENDPOINT}/{site_id}");
        let response = self
            .transport
            .send(ApiRequest::put(&endpoint, json!({ "wp": wp })))
            .await?;
        let response = map_status(&endpoint, response)?;
        info!(site_id, command, "WP-CLI command accepted");

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&response.body).unwrap_or(Value::String(response.body)))
    }
}

/// Translate a non-2xx status into the matching [`ApiError`]
pub fn map_status(endpoint: &str, response: ApiResponse) -> Result<ApiResponse, ApiError> {
    let endpoint = endpoint.to_string();
    match response.status {
        200..=299 => Ok(response),
        401 => Err(ApiError::Unauthorized { endpoint }),
        404 => Err(ApiError::NotFound { endpoint }),
        429 => Err(ApiError::RemoteRateLimited {
            endpoint,
            retry_after_secs: response.retry_after_secs,
        }),
        status => Err(ApiError::UnexpectedStatus {
            endpoint,
            status,
            body: redact(&truncate(response.body.trim(), MAX_ERROR_BODY)),
        }),
    }
}

/// Refuse WP-CLI input that would override the site's document root
pub fn check_wp_arguments(command: &str, args: &[String]) -> Result<(), ApiError> {
    for arg in std::iter::once(command).chain(args.iter().map(String::as_str)) {
        if arg == "--path" || arg.starts_with("--path=") {
            return Err(ApiError::ForbiddenArgument {
                argument: arg.to_string(),
                reason: "the site path is set by GridPane".to_string(),
            });
        }
    }
    Ok(())
}

fn parse_json(endpoint: &str, body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays canned responses and records every request
    struct CannedTransport {
        responses: Mutex<Vec<ApiResponse>>,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl CannedTransport {
        fn new(responses: Vec<ApiResponse>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<ApiRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApiTransport for CannedTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, GpError> {
            self.seen.lock().unwrap().push(request);
            Ok(self.responses.lock().unwrap().remove(0))
        }
    }

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            status,
            retry_after_secs: None,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_status_mapping() {
        assert!(map_status("/x", response(204, "")).is_ok());
        assert!(matches!(
            map_status("/x", response(401, "")),
            Err(ApiError::Unauthorized { .. })
        ));
        assert!(matches!(
            map_status("/x", response(404, "")),
            Err(ApiError::NotFound { .. })
        ));
        let limited = ApiResponse {
            retry_after_secs: Some(30),
            ..response(429, "")
        };
        assert!(matches!(
            map_status("/x", limited),
            Err(ApiError::RemoteRateLimited {
                retry_after_secs: Some(30),
                ..
            })
        ));
        match map_status("/x", response(500, "boom")) {
            Err(ApiError::UnexpectedStatus { status, body, .. }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[test]
    fn test_error_body_is_truncated() {
        let long = "x".repeat(10) + &" y".repeat(300);
        match map_status("/x", response(502, &long)) {
            Err(ApiError::UnexpectedStatus { body, .. }) => {
                assert!(body.ends_with("..."));
                assert!(body.len() <= MAX_ERROR_BODY + 3);
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_path_argument_rejected_before_sending() {
        let transport = CannedTransport::new(vec![]);
        let client = GridPaneClient::new(transport.clone());

        for args in [
            vec!["list".to_string(), "--path".to_string(), "/tmp".to_string()],
            vec!["--path=/var/www".to_string()],
        ] {
            let err = client.run_wp_cli(7, "plugin", &args).await.unwrap_err();
            assert!(matches!(
                err,
                GpError::Api(ApiError::ForbiddenArgument { .. })
            ));
        }
        assert!(transport.seen().is_empty());
    }

    #[tokio::test]
    async fn test_wp_cli_body_shape() {
        let transport = CannedTransport::new(vec![response(200, r#"{"output":"ok"}"#)]);
        let client = GridPaneClient::new(transport.clone());

        let out = client
            .run_wp_cli(42, "plugin", &["list".to_string(), "--status=active".to_string()])
            .await
            .unwrap();
        assert_eq!(out["output"], "ok");

        let seen = transport.seen();
        assert_eq!(seen[0].path, "/oauth/api/v1/site/run-wp-cli/42");
        assert_eq!(
            seen[0].body,
            Some(json!({"wp": {"plugin": ["list", "--status=active"]}}))
        );
    }

    #[tokio::test]
    async fn test_wp_cli_plain_text_output() {
        let transport = CannedTransport::new(vec![response(200, "Success: done"), response(200, "")]);
        let client = GridPaneClient::new(transport);
        let out = client.run_wp_cli(1, "cache", &["flush".into()]).await.unwrap();
        assert_eq!(out, Value::String("Success: done".into()));
        let out = client.run_wp_cli(1, "cache", &["flush".into()]).await.unwrap();
        assert_eq!(out, Value::Null);
    }

    #[tokio::test]
    async fn test_listing_decode_failure() {
        let transport = CannedTransport::new(vec![response(200, "<html>")]);
        let err = GridPaneClient::new(transport)
            .list_sites()
            .await
            .unwrap_err();
        assert!(matches!(err, GpError::Api(ApiError::Decode { .. })));
    }
}
