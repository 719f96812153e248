use async_trait::async_trait;
use models::{AuthSession, FinancialSnapshot, Profile, ProfileUpdate, User};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ApiError, Result};
use crate::repository::{BudgetRepository, Caller};

const PROFILES: &str = "profiles";
const FINANCIAL_DATA: &str = "financial_data";
const SNAPSHOT_COLUMNS: &str = "monthly_income,mandatory_expenses,optional_expenses,savings_goal";

/// Client for a Supabase project: GoTrue auth plus PostgREST tables
/// `profiles` and `financial_data`.
///
/// Every request carries the project's anon key as `apikey`. Table calls
/// are authorised with the caller's access token so row-level policies
/// apply to that user.
#[derive(Debug, Clone)]
pub struct SupabaseRepository {
    http: Client,
    base_url: Url,
}

#[derive(Debug, Serialize)]
struct SnapshotInsert<'a> {
    user_id: &'a str,
    #[serde(flatten)]
    snapshot: &'a FinancialSnapshot,
}

#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl SupabaseRepository {
    pub fn new(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        // Url::join drops the last path segment unless it ends with '/'
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| anyhow::anyhow!("Invalid Supabase url '{base_url}': {e}"))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("apikey", HeaderValue::from_str(api_key)?);

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Internal(format!("Failed to build URL for {path}: {e}")))
    }

    fn table(&self, name: &str) -> Result<Url> {
        self.endpoint(&format!("rest/v1/{name}"))
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    /// Turns a non-success response into `ApiError::Remote` with the
    /// provider's own message.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, "Hosted store call failed");
        Err(ApiError::Remote(remote_message(status, &body)))
    }
}

/// Picks the human-readable message out of a GoTrue/PostgREST error body.
pub(crate) fn remote_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl BudgetRepository for SupabaseRepository {
    async fn sign_up(&self, email: &str, password: &str, username: &str) -> Result<User> {
        let url = self.endpoint("auth/v1/signup")?;
        let response = self
            .http
            .post(url)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "username": username },
            }))
            .send()
            .await?;
        let parsed: SignUpResponse = Self::check(response).await?.json().await?;

        // With email confirmation on, the user object is returned bare
        match (parsed.user, parsed.id) {
            (Some(user), _) => Ok(user),
            (None, Some(id)) => Ok(User {
                id,
                email: parsed.email.unwrap_or_else(|| email.to_string()),
            }),
            (None, None) => Err(ApiError::Remote("Sign-up returned no user".to_string())),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let response = self
            .http
            .post(url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let url = self.endpoint("auth/v1/logout")?;
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, Self::bearer(access_token))
            .send()
            .await?;
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::debug!("Logout with an expired token, nothing to revoke");
            return Ok(());
        }
        Self::check(response).await?;
        Ok(())
    }

    async fn get_current_user(&self, access_token: &str) -> Result<Option<User>> {
        let url = self.endpoint("auth/v1/user")?;
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, Self::bearer(access_token))
            .send()
            .await?;
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Ok(None);
        }
        Ok(Some(Self::check(response).await?.json().await?))
    }

    async fn get_latest_financial_snapshot(
        &self,
        caller: Caller<'_>,
    ) -> Result<Option<FinancialSnapshot>> {
        let url = self.table(FINANCIAL_DATA)?;
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, Self::bearer(caller.access_token))
            .query(&[
                ("select", SNAPSHOT_COLUMNS.to_string()),
                ("user_id", format!("eq.{}", caller.user_id)),
                ("order", "created_at.desc".to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;
        let rows: Vec<FinancialSnapshot> = Self::check(response).await?.json().await?;
        tracing::debug!(
            user_id = caller.user_id,
            found = !rows.is_empty(),
            "Fetched latest snapshot"
        );
        Ok(rows.into_iter().next())
    }

    async fn get_profile(&self, caller: Caller<'_>) -> Result<Option<Profile>> {
        let url = self.table(PROFILES)?;
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, Self::bearer(caller.access_token))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", caller.user_id))])
            .send()
            .await?;
        let rows: Vec<Profile> = Self::check(response).await?.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn save_snapshot(&self, caller: Caller<'_>, snapshot: &FinancialSnapshot) -> Result<()> {
        let url = self.table(FINANCIAL_DATA)?;
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, Self::bearer(caller.access_token))
            .header("Prefer", "return=minimal")
            .json(&[SnapshotInsert {
                user_id: caller.user_id,
                snapshot,
            }])
            .send()
            .await?;
        Self::check(response).await?;
        tracing::info!(user_id = caller.user_id, "Inserted financial snapshot");
        Ok(())
    }

    async fn update_profile(&self, caller: Caller<'_>, update: &ProfileUpdate) -> Result<()> {
        let url = self.table(PROFILES)?;
        let response = self
            .http
            .patch(url)
            .header(AUTHORIZATION, Self::bearer(caller.access_token))
            .header("Prefer", "return=minimal")
            .query(&[("id", format!("eq.{}", caller.user_id))])
            .json(update)
            .send()
            .await?;
        Self::check(response).await?;
        tracing::info!(user_id = caller.user_id, "Updated profile");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const ANON_KEY: &str = "anon-key";
    const USER_TOKEN: &str = "user-token";

    fn caller() -> Caller<'static> {
        Caller {
            user_id: "user-123",
            access_token: USER_TOKEN,
        }
    }

    /// Answers a single HTTP request with `status` and `body`; the handle
    /// yields the raw request, lowercased.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
                    continue;
                };
                let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + body_len {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).to_lowercase()
        });

        (url, handle)
    }

    #[tokio::test]
    async fn test_snapshot_insert_runs_as_user() {
        let (url, handle) = serve_once("201 Created", "").await;
        let repo = SupabaseRepository::new(&url, ANON_KEY).unwrap();

        repo.save_snapshot(caller(), &FinancialSnapshot::demo())
            .await
            .unwrap();

        let request = handle.await.unwrap();
        assert!(request.starts_with("post /rest/v1/financial_data "));
        assert!(request.contains("authorization: bearer user-token"));
        assert!(!request.contains("bearer anon-key"));
        assert!(request.contains("apikey: anon-key"));
        assert!(request.contains("\"user_id\":\"user-123\""));
    }

    #[tokio::test]
    async fn test_latest_snapshot_query_takes_first_row() {
        let (url, handle) = serve_once(
            "200 OK",
            r#"[{"monthly_income": 4000, "mandatory_expenses": 1000, "optional_expenses": 500, "savings_goal": null},
                {"monthly_income": 1000, "mandatory_expenses": 100, "optional_expenses": 50, "savings_goal": 10}]"#,
        )
        .await;
        let repo = SupabaseRepository::new(&url, ANON_KEY).unwrap();

        let latest = repo
            .get_latest_financial_snapshot(caller())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.monthly_income, 4000.0);
        assert_eq!(latest.savings_goal, 0.0);

        let request = handle.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("get /rest/v1/financial_data?"));
        assert!(request_line.contains("user_id=eq.user-123"));
        assert!(request_line.contains("order=created_at.desc"));
        assert!(request_line.contains("limit=1"));
        assert!(request.contains("authorization: bearer user-token"));
    }

    #[tokio::test]
    async fn test_profile_row_with_null_columns() {
        let (url, handle) = serve_once(
            "200 OK",
            r#"[{"id": "user-123", "username": "Ana", "avatar_emoji": null, "level": null, "xp": null, "total_saved": null}]"#,
        )
        .await;
        let repo = SupabaseRepository::new(&url, ANON_KEY).unwrap();

        let profile = repo.get_profile(caller()).await.unwrap().unwrap();
        assert_eq!(profile.username, "Ana");
        assert_eq!(profile.level, 1);
        assert_eq!(profile.xp, 0);

        let request = handle.await.unwrap();
        assert!(request.contains("id=eq.user-123"));
        assert!(request.contains("authorization: bearer user-token"));
    }

    #[tokio::test]
    async fn test_rejected_token_reads_as_signed_out() {
        for status in ["401 Unauthorized", "403 Forbidden"] {
            let (url, handle) = serve_once(status, r#"{"msg": "invalid JWT"}"#).await;
            let repo = SupabaseRepository::new(&url, ANON_KEY).unwrap();

            assert_eq!(repo.get_current_user("expired").await.unwrap(), None);
            let request = handle.await.unwrap();
            assert!(request.starts_with("get /auth/v1/user "));
            assert!(request.contains("authorization: bearer expired"));
        }

        let (url, _handle) = serve_once("500 Internal Server Error", r#"{"msg": "db down"}"#).await;
        let repo = SupabaseRepository::new(&url, ANON_KEY).unwrap();
        assert!(matches!(
            repo.get_current_user("token").await,
            Err(ApiError::Remote(message)) if message == "db down"
        ));
    }

    #[tokio::test]
    async fn test_logout_with_expired_token_succeeds() {
        let (url, handle) = serve_once("401 Unauthorized", r#"{"msg": "invalid JWT"}"#).await;
        let repo = SupabaseRepository::new(&url, ANON_KEY).unwrap();

        repo.sign_out("expired").await.unwrap();
        assert!(handle.await.unwrap().starts_with("post /auth/v1/logout "));
    }

    #[test]
    fn test_endpoints_keep_project_path() {
        let repo = SupabaseRepository::new("https://demo.supabase.co", "anon").unwrap();
        assert_eq!(
            repo.table(FINANCIAL_DATA).unwrap().as_str(),
            "https://demo.supabase.co/rest/v1/financial_data"
        );

        let repo = SupabaseRepository::new("http://localhost:54321/project/", "anon").unwrap();
        assert_eq!(
            repo.endpoint("auth/v1/user").unwrap().as_str(),
            "http://localhost:54321/project/auth/v1/user"
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(SupabaseRepository::new("not a url", "anon").is_err());
    }

    #[test]
    fn test_remote_message_extraction() {
        assert_eq!(
            remote_message(StatusCode::BAD_REQUEST, r#"{"msg": "User already registered"}"#),
            "User already registered"
        );
        assert_eq!(
            remote_message(
                StatusCode::BAD_REQUEST,
                r#"{"error": "invalid_grant", "error_description": "Invalid login credentials"}"#
            ),
            "Invalid login credentials"
        );
        assert_eq!(
            remote_message(
                StatusCode::CONFLICT,
                r#"{"code": "23505", "message": "duplicate key"}"#
            ),
            "duplicate key"
        );
        assert_eq!(remote_message(StatusCode::BAD_GATEWAY, "upstream down"), "upstream down");
        assert_eq!(
            remote_message(StatusCode::SERVICE_UNAVAILABLE, ""),
            "503 Service Unavailable"
        );
    }

    #[test]
    fn test_snapshot_insert_shape() {
        let snapshot = FinancialSnapshot::demo();
        let body = serde_json::to_value([SnapshotInsert {
            user_id: "u1",
            snapshot: &snapshot,
        }])
        .unwrap();
        assert_eq!(body[0]["user_id"], "u1");
        assert_eq!(body[0]["monthly_income"], 50000.0);
        assert_eq!(body[0]["savings_goal"], 20000.0);
    }
}
