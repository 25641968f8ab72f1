use crate::config::ServerConfig;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::SET_COOKIE;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

const AUTH_COOKIE: &str = "auth";

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("server address is not configured")]
    Config,
    #[error("login request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected response from server: {0}")]
    Status(StatusCode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success {
        call_sign: String,
        token: Option<String>,
        redirect: String,
    },
    Incorrect,
    Error(String),
}

/// Submits the login on a worker thread; the UI tick polls the receiver.
pub fn spawn_login(server: ServerConfig, call_sign: String, password: String) -> Receiver<LoginOutcome> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let outcome = match submit_login(&server, &call_sign, &password) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "login submission failed");
                LoginOutcome::Error(err.to_string())
            }
        };
        let _ = sender.send(outcome);
    });
    receiver
}

fn submit_login(server: &ServerConfig, call_sign: &str, password: &str) -> Result<LoginOutcome, LoginError> {
    let call_sign = call_sign.trim();
    if call_sign.is_empty() || password.is_empty() {
        return Ok(LoginOutcome::Incorrect);
    }
    if server.base_url.trim().is_empty() {
        return Err(LoginError::Config);
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(server.timeout_seconds.max(1)))
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    let response = client
        .post(format!("{}/login", server.base_url))
        .form(&[("callsign", call_sign), ("password", password)])
        .send()?;

    let token = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(auth_token);
    classify(response.status(), token, server, call_sign)
}

fn classify(
    status: StatusCode,
    token: Option<String>,
    server: &ServerConfig,
    call_sign: &str,
) -> Result<LoginOutcome, LoginError> {
    if status.is_success() {
        let call_sign = call_sign.to_uppercase();
        info!(call_sign = %call_sign, "logged in");
        return Ok(LoginOutcome::Success {
            call_sign,
            token,
            redirect: format!("{}/calendar", server.base_url),
        });
    }
    if status == StatusCode::UNAUTHORIZED {
        info!(call_sign, "login incorrect");
        return Ok(LoginOutcome::Incorrect);
    }
    Err(LoginError::Status(status))
}

/// Value of the `auth` cookie in a `Set-Cookie` header, if that is the
/// cookie being set.
fn auth_token(header: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    (name.trim() == AUTH_COOKIE && !value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> ServerConfig {
        ServerConfig {
            base_url: "http://localhost:8000".to_string(),
            timeout_seconds: 1,
        }
    }

    #[test]
    fn no_content_is_success_with_redirect() {
        let outcome = classify(
            StatusCode::NO_CONTENT,
            Some("tok".to_string()),
            &server(),
            "kc6rsc",
        )
        .expect("classified");
        assert_eq!(
            outcome,
            LoginOutcome::Success {
                call_sign: "KC6RSC".to_string(),
                token: Some("tok".to_string()),
                redirect: "http://localhost:8000/calendar".to_string(),
            }
        );
    }

    #[test]
    fn unauthorized_is_incorrect() {
        let outcome = classify(StatusCode::UNAUTHORIZED, None, &server(), "x").expect("classified");
        assert_eq!(outcome, LoginOutcome::Incorrect);
    }

    #[test]
    fn other_status_is_error() {
        let err = classify(StatusCode::INTERNAL_SERVER_ERROR, None, &server(), "x")
            .expect_err("server error");
        assert!(matches!(err, LoginError::Status(StatusCode::INTERNAL_SERVER_ERROR)));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn extracts_auth_cookie() {
        assert_eq!(
            auth_token("auth=abc123; Path=/; Secure"),
            Some("abc123".to_string())
        );
        assert_eq!(auth_token("session=zzz; Path=/"), None);
        assert_eq!(auth_token("auth=; Path=/"), None);
    }

    #[test]
    fn blank_credentials_never_reach_the_network() {
        let receiver = spawn_login(server(), "  ".to_string(), "secret".to_string());
        assert_eq!(receiver.recv().expect("outcome"), LoginOutcome::Incorrect);

        let receiver = spawn_login(server(), "KC6RSC".to_string(), String::new());
        assert_eq!(receiver.recv().expect("outcome"), LoginOutcome::Incorrect);
    }

    #[test]
    fn missing_server_is_config_error() {
        let server = ServerConfig {
            base_url: String::new(),
            timeout_seconds: 1,
        };
        let err = submit_login(&server, "KC6RSC", "pw").expect_err("no server");
        assert!(matches!(err, LoginError::Config));
    }
}
