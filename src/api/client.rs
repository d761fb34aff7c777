use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use yansi::Paint;

use crate::error::AdminError;
use crate::models::{ProductPayload, Session};

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        println!("{}", msg);
    }
}

/// Request body variants understood by the product service.
pub enum RequestBody<'a> {
    Empty,
    Json(Value),
    Multipart(&'a ProductPayload),
}

/// Thin HTTP client for the remote product service.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AdminError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("Stockroom/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Core request function: builds the request, attaches the bearer token,
    /// maps non-2xx statuses into [`AdminError`] and decodes the JSON body.
    /// An empty response body decodes to `Value::Null`.
    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        session: Option<&Session>,
        body: RequestBody<'_>,
    ) -> Result<Value, AdminError> {
        let url = format!("{}{}", self.base_url, endpoint);
        log_output(format!("Request:\n{}", curl_line(&method, &url, session, &body)));

        let mut req = self.http.request(method.clone(), &url);
        if let Some(s) = session {
            req = req.header(reqwest::header::AUTHORIZATION, s.bearer());
        }
        req = match body {
            RequestBody::Empty => req,
            RequestBody::Json(v) => req.json(&v),
            RequestBody::Multipart(payload) => req.multipart(multipart_form(payload)?),
        };

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        let response_str = Paint::new(format!("{} {}", status.as_u16(), text)).rgb(100, 100, 100).to_string();
        log_output(format!("Response:\n{}", response_str));

        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(v) => v,
                Err(_) => Value::String(text),
            }
        };

        if status.is_success() {
            Ok(value)
        } else {
            Err(status_error(status, endpoint, &value))
        }
    }
}

/// Maps a non-success status to the error taxonomy.
pub fn status_error(status: StatusCode, endpoint: &str, body: &Value) -> AdminError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AdminError::Unauthorized,
        StatusCode::NOT_FOUND => AdminError::NotFound(endpoint.to_string()),
        _ => AdminError::Server {
            status: status.as_u16(),
            message: error_message(body).unwrap_or_else(|| {
                status.canonical_reason().unwrap_or("request rejected").to_string()
            }),
        },
    }
}

fn error_message(body: &Value) -> Option<String> {
    match body {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(obj) => ["message", "error", "detail"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(|v| v.as_str()))
            .map(|s| s.to_string()),
        _ => None,
    }
}

fn multipart_form(payload: &ProductPayload) -> Result<Form, AdminError> {
    let mut form = Form::new();
    for (key, value) in payload.text_fields() {
        form = form.text(key, value);
    }
    if let Some(image) = &payload.image {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        form = form.part("image", part);
    }
    Ok(form)
}

fn curl_line(method: &Method, url: &str, session: Option<&Session>, body: &RequestBody<'_>) -> String {
    let mut parts = Vec::new();
    parts.push(Paint::new("curl").fg(yansi::Color::Green).bold().to_string());
    parts.push(format!("-X {}", Paint::new(method.as_str()).fg(yansi::Color::Yellow).bold()));
    parts.push(format!("'{}'", Paint::new(url).fg(yansi::Color::Cyan)));

    if session.is_some() {
        // Token is masked; it is a live credential.
        parts.push(format!(
            "{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'Authorization: Bearer ***'").fg(yansi::Color::Magenta)
        ));
    }
    match body {
        RequestBody::Empty => {}
        RequestBody::Json(v) => {
            let mut shown = v.clone();
            if let Some(obj) = shown.as_object_mut() {
                if obj.contains_key("password") {
                    obj.insert("password".into(), Value::String("***".into()));
                }
            }
            let json_str = serde_json::to_string(&shown).unwrap_or_default();
            parts.push(format!(
                "{} {}",
                Paint::new("-H").fg(yansi::Color::Magenta),
                Paint::new("'Content-Type: application/json'").fg(yansi::Color::Magenta)
            ));
            parts.push(format!(
                "{} {}",
                Paint::new("-d").fg(yansi::Color::Blue),
                Paint::new(format!("'{}'", json_str.replace('\'', "'\\''"))).fg(yansi::Color::White)
            ));
        }
        RequestBody::Multipart(payload) => {
            for (key, value) in payload.text_fields() {
                parts.push(format!(
                    "{} {}",
                    Paint::new("-F").fg(yansi::Color::Blue),
                    Paint::new(format!("'{}={}'", key, value.replace('\'', "'\\''"))).fg(yansi::Color::White)
                ));
            }
            if let Some(image) = &payload.image {
                parts.push(format!(
                    "{} {}",
                    Paint::new("-F").fg(yansi::Color::Blue),
                    Paint::new(format!("'image=@{};type={}'", image.file_name, image.content_type)).fg(yansi::Color::White)
                ));
            }
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "/api/products", &Value::Null),
            AdminError::Unauthorized
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "/api/products/9", &Value::Null),
            AdminError::NotFound(ref e) if e == "/api/products/9"
        ));
        match status_error(StatusCode::BAD_REQUEST, "/api/products", &json!({"message": "Name taken"})) {
            AdminError::Server { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Name taken");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn server_error_without_body_uses_reason() {
        match status_error(StatusCode::INTERNAL_SERVER_ERROR, "/x", &Value::Null) {
            AdminError::Server { message, .. } => assert_eq!(message, "Internal Server Error"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn curl_line_masks_credentials() {
        yansi::whenever(yansi::Condition::NEVER);
        let session = Session::new("secret-token", None);
        let line = curl_line(
            &Method::POST,
            "http://localhost:5000/api/auth/admin-login",
            Some(&session),
            &RequestBody::Json(json!({"email": "a@b.c", "password": "hunter2"})),
        );
        assert!(!line.contains("secret-token"));
        assert!(!line.contains("hunter2"));
        assert!(line.contains("a@b.c"));
    }
}
