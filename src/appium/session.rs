// W3C WebDriver session against an Appium server
use super::error::{AppiumError, AppiumResult};
use super::types::{AndroidKey, Capabilities, ElementRef, Locator, UiDriver};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, Method, Url};
use serde_json::{Value, json};
use std::time::Duration;

pub struct AppiumSession {
    client: Client,
    base_url: String,
    session_id: String,
}

impl AppiumSession {
    /// Open a new session on the server at `server_url` (e.g. `http://127.0.0.1:4723/`).
    pub async fn start(
        server_url: &str,
        capabilities: &Capabilities,
        http_timeout: Duration,
    ) -> AppiumResult<Self> {
        Url::parse(server_url).map_err(|_| AppiumError::InvalidServerUrl {
            url: server_url.to_string(),
        })?;
        let base_url = server_url.trim_end_matches('/').to_string();

        let client = Client::builder().timeout(http_timeout).build()?;

        log::info!(
            "Starting session on {} for {}/{} (udid {})",
            base_url,
            capabilities.app_package,
            capabilities.app_activity,
            capabilities.udid
        );
        let response = client
            .post(format!("{base_url}/session"))
            .json(&capabilities.to_new_session_body())
            .send()
            .await?;
        let status = response.status();
        let payload: Value = response.json().await.map_err(|e| AppiumError::InvalidResponse {
            command: "new session".to_string(),
            description: format!("body is not JSON: {e}"),
        })?;

        if let Some((_, message)) = w3c_error(&payload) {
            return Err(AppiumError::SessionNotCreated {
                status: status.as_u16(),
                message,
            });
        }
        let session_id = payload["value"]["sessionId"]
            .as_str()
            .or_else(|| payload["sessionId"].as_str())
            .ok_or_else(|| AppiumError::SessionNotCreated {
                status: status.as_u16(),
                message: "response carried no sessionId".to_string(),
            })?
            .to_string();
        log::info!("Session {} started", session_id);

        Ok(Self {
            client,
            base_url,
            session_id,
        })
    }

    /// Attach to an existing session id without creating a new one.
    pub fn attach(server_url: &str, session_id: &str, http_timeout: Duration) -> AppiumResult<Self> {
        Url::parse(server_url).map_err(|_| AppiumError::InvalidServerUrl {
            url: server_url.to_string(),
        })?;
        Ok(Self {
            client: Client::builder().timeout(http_timeout).build()?,
            base_url: server_url.trim_end_matches('/').to_string(),
            session_id: session_id.to_string(),
        })
    }

    fn session_url(&self, suffix: &str) -> String {
        format!("{}/session/{}{}", self.base_url, self.session_id, suffix)
    }

    async fn command(
        &self,
        method: Method,
        suffix: &str,
        body: Option<Value>,
        command: &str,
        locator: Option<&Locator>,
    ) -> AppiumResult<Value> {
        let url = self.session_url(suffix);
        log::debug!("{} {} ({})", method, url, command);
        let mut request = self.client.request(method.clone(), &url);
        if method == Method::POST {
            // W3C requires a JSON body on every POST, even an empty one
            request = request.json(&body.unwrap_or_else(|| json!({})));
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let payload: Value = if text.trim().is_empty() {
            json!({ "value": null })
        } else {
            serde_json::from_str(&text).map_err(|e| AppiumError::InvalidResponse {
                command: command.to_string(),
                description: format!("body is not JSON ({e}): {text}"),
            })?
        };

        if let Some((error, message)) = w3c_error(&payload) {
            let locator = locator.map(Locator::to_string);
            return Err(AppiumError::from_w3c(command, locator.as_deref(), error, message));
        }
        if !status.is_success() {
            return Err(AppiumError::Command {
                command: command.to_string(),
                error: format!("HTTP {}", status.as_u16()),
                message: text,
            });
        }
        Ok(payload.get("value").cloned().unwrap_or(Value::Null))
    }

    fn element_url(element: &ElementRef, action: &str) -> String {
        format!("/element/{}/{}", element.id(), action)
    }
}

fn w3c_error(payload: &Value) -> Option<(String, String)> {
    let value = payload.get("value")?;
    let error = value.get("error")?.as_str()?.to_string();
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some((error, message))
}

fn expect_bool(command: &str, value: Value) -> AppiumResult<bool> {
    value.as_bool().ok_or_else(|| AppiumError::InvalidResponse {
        command: command.to_string(),
        description: format!("expected a boolean, got {value}"),
    })
}

impl UiDriver for AppiumSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    async fn find_elements(&self, locator: &Locator) -> AppiumResult<Vec<ElementRef>> {
        let value = self
            .command(
                Method::POST,
                "/elements",
                Some(locator.to_request()),
                "find elements",
                Some(locator),
            )
            .await?;
        let items = value.as_array().ok_or_else(|| AppiumError::InvalidResponse {
            command: "find elements".to_string(),
            description: format!("expected an array, got {value}"),
        })?;
        Ok(items.iter().filter_map(ElementRef::from_value).collect())
    }

    async fn find_element(&self, locator: &Locator) -> AppiumResult<ElementRef> {
        let value = self
            .command(
                Method::POST,
                "/element",
                Some(locator.to_request()),
                "find element",
                Some(locator),
            )
            .await?;
        ElementRef::from_value(&value).ok_or_else(|| AppiumError::InvalidResponse {
            command: "find element".to_string(),
            description: format!("no element reference in {value}"),
        })
    }

    async fn click(&self, element: &ElementRef) -> AppiumResult<()> {
        self.command(Method::POST, &Self::element_url(element, "click"), None, "click", None)
            .await
            .map(|_| ())
    }

    async fn clear(&self, element: &ElementRef) -> AppiumResult<()> {
        self.command(Method::POST, &Self::element_url(element, "clear"), None, "clear", None)
            .await
            .map(|_| ())
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> AppiumResult<()> {
        let chars: Vec<String> = text.chars().map(String::from).collect();
        let body = json!({ "text": text, "value": chars });
        self.command(
            Method::POST,
            &Self::element_url(element, "value"),
            Some(body),
            "send keys",
            None,
        )
        .await
        .map(|_| ())
    }

    async fn text(&self, element: &ElementRef) -> AppiumResult<String> {
        let value = self
            .command(Method::GET, &Self::element_url(element, "text"), None, "get text", None)
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn attribute(&self, element: &ElementRef, name: &str) -> AppiumResult<Option<String>> {
        let value = self
            .command(
                Method::GET,
                &Self::element_url(element, &format!("attribute/{name}")),
                None,
                "get attribute",
                None,
            )
            .await?;
        Ok(match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    async fn is_displayed(&self, element: &ElementRef) -> AppiumResult<bool> {
        let value = self
            .command(
                Method::GET,
                &Self::element_url(element, "displayed"),
                None,
                "is displayed",
                None,
            )
            .await?;
        expect_bool("is displayed", value)
    }

    async fn is_enabled(&self, element: &ElementRef) -> AppiumResult<bool> {
        let value = self
            .command(
                Method::GET,
                &Self::element_url(element, "enabled"),
                None,
                "is enabled",
                None,
            )
            .await?;
        expect_bool("is enabled", value)
    }

    async fn press_key(&self, key: AndroidKey) -> AppiumResult<()> {
        self.command(
            Method::POST,
            "/appium/device/press_keycode",
            Some(json!({ "keycode": key.keycode() })),
            "press keycode",
            None,
        )
        .await
        .map(|_| ())
    }

    async fn screenshot_bytes(&self) -> AppiumResult<Vec<u8>> {
        let value = self
            .command(Method::GET, "/screenshot", None, "screenshot", None)
            .await?;
        let encoded: String = value
            .as_str()
            .ok_or_else(|| AppiumError::ScreenshotDecode {
                description: "payload is not a string".to_string(),
            })?
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        STANDARD
            .decode(encoded)
            .map_err(|e| AppiumError::ScreenshotDecode {
                description: e.to_string(),
            })
    }

    async fn quit(&self) -> AppiumResult<()> {
        log::info!("Deleting session {}", self.session_id);
        self.command(Method::DELETE, "", None, "delete session", None)
            .await
            .map(|_| ())
    }
}
