//! Login, credential verification and logout.
//!
//! The backend has returned the login token under several names over time.
//! Only the envelope's `data` member is consulted; `token`, `accessToken` and
//! `jwt` are read as the same field there.

use tracing::info;

use crate::client::{ApiClient, NO_BODY};
use crate::endpoint::Endpoint;
use crate::error::{ApiError, TOKEN_MISSING};
use crate::http::HttpMethod;
use crate::session::Credential;
use crate::transport::Transport;
use crate::types::{AdminUser, LoginData, LoginRequest};

pub const LOGIN: Endpoint = Endpoint::new(HttpMethod::Post, "/auth/login");
pub const ME: Endpoint = Endpoint::new(HttpMethod::Get, "/auth/me");

pub struct Auth<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> Auth<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// Exchange credentials for a bearer token and start a session with it.
    ///
    /// Any previous credential is dropped before the request is sent, so a
    /// failed login always leaves the session logged out.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let session = self.client.session();
        session.clear();

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let data: Option<LoginData> = self.client.call(LOGIN, &[], Some(&request)).await?;

        let token = data
            .and_then(|d| d.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Api {
                status: 200,
                code: Some(TOKEN_MISSING.to_string()),
                message: "login succeeded but no token was returned".to_string(),
            })?;

        info!("logged in");
        session.set(Credential::new(token));
        Ok(())
    }

    /// The admin user the current credential belongs to.
    pub async fn me(&self) -> Result<AdminUser, ApiError> {
        self.client.call(ME, &[], NO_BODY).await
    }

    /// Adopt a previously issued token and check it is still accepted.
    ///
    /// The session is invalidated if verification fails for any reason.
    pub async fn restore(&self, token: &str) -> Result<AdminUser, ApiError> {
        let session = self.client.session();
        session.set(Credential::new(token));
        match self.me().await {
            Ok(user) => Ok(user),
            Err(err) => {
                session.invalidate();
                Err(err)
            }
        }
    }

    /// End the session locally. The backend keeps no logout endpoint.
    pub fn logout(&self) {
        if self.client.session().clear() {
            info!("logged out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::http::AUTHORIZATION;
    use crate::session::{EndReason, Session, SessionEvent};
    use crate::transport::testing::ScriptedTransport;
    use serde_json::json;

    fn client(transport: ScriptedTransport) -> ApiClient<ScriptedTransport> {
        ApiClient::new("http://admin.test/api/admin/v1", Session::new(), transport)
    }

    #[tokio::test]
    async fn login_stores_token_for_later_requests() {
        let c = client(ScriptedTransport::json(
            200,
            json!({"success": true, "data": {"token": "jwt-1"}}),
        ));
        c.auth().login("a@example.com", "pw").await.unwrap();

        assert_eq!(c.session().credential().unwrap().expose(), "jwt-1");
        let sent = c.transport().requests();
        assert!(sent[0].header(AUTHORIZATION).is_none());
        let body: serde_json::Value = serde_json::from_slice(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"email": "a@example.com", "password": "pw"}));
    }

    #[tokio::test]
    async fn login_accepts_access_token_alias() {
        let c = client(ScriptedTransport::json(
            200,
            json!({"success": true, "data": {"accessToken": "jwt-2"}}),
        ));
        c.auth().login("a@example.com", "pw").await.unwrap();
        assert_eq!(c.session().credential().unwrap().expose(), "jwt-2");
    }

    #[tokio::test]
    async fn login_without_token_fails() {
        let c = client(ScriptedTransport::json(200, json!({"success": true, "data": {}})));
        let err = c.auth().login("a@example.com", "pw").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.code(), Some(TOKEN_MISSING));
        assert!(!c.session().is_authenticated());
    }

    #[tokio::test]
    async fn failed_login_leaves_session_logged_out() {
        let c = client(ScriptedTransport::json(
            401,
            json!({"success": false, "error": {"code": "BAD_CREDENTIALS", "message": "Invalid email or password"}}),
        ));
        c.session().set(Credential::new("old"));
        let err = c.auth().login("a@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.code(), Some("BAD_CREDENTIALS"));
        assert!(!c.session().is_authenticated());
    }

    #[tokio::test]
    async fn restore_invalidates_rejected_token() {
        let c = client(ScriptedTransport::json(
            500,
            json!({"success": false, "error": {"code": "INTERNAL", "message": "boom"}}),
        ));
        let mut events = c.session().subscribe();
        assert!(c.auth().restore("stale").await.is_err());
        assert!(!c.session().is_authenticated());
        assert_eq!(events.try_recv().unwrap(), SessionEvent::Started);
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::Ended(EndReason::Invalidated)
        );
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn login_logs_never_carry_the_account() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let c = client(ScriptedTransport::json(
            200,
            json!({"success": true, "data": {"token": "jwt-secret"}}),
        ));
        c.auth().login("asha@example.com", "pw").await.unwrap();

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("logged in"));
        assert!(!output.contains("asha@example.com"));
        assert!(!output.contains("jwt-secret"));
    }

    #[tokio::test]
    async fn logout_drops_credential() {
        let c = client(ScriptedTransport::default());
        c.session().set(Credential::new("tok"));
        c.auth().logout();
        assert!(!c.session().is_authenticated());
    }
}
