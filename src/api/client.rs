use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::AuthContext;
use crate::error::{ClientError, Result};
use crate::result::{Ack, ApiEnvelope};
use crate::utils::bearer;

/// REST 客户端：存在会话时附带 Bearer 令牌，非 2xx 统一转为错误
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    auth: Arc<AuthContext>,
}

impl ApiClient {
    pub fn new(base_url: &str, auth: Arc<AuthContext>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        match self.auth.access_token() {
            Some(token) => builder.header(reqwest::header::AUTHORIZATION, bearer(&token)),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .send(self.request(Method::GET, path).query(query))
            .await?;
        decode(response).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        decode(response).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .send(self.request(Method::PUT, path).json(body))
            .await?;
        decode(response).await
    }

    /// 只关心成功与否的请求，响应体为空或无法解析时返回默认值
    pub async fn post_ack<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Ack> {
        let response = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        ack(response).await
    }

    pub async fn put_ack<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Ack> {
        let response = self
            .send(self.request(Method::PUT, path).json(body))
            .await?;
        ack(response).await
    }

    /// DELETE 的响应体通常为空或只有提示信息，这里不解析
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// 以原始 JSON 返回响应体，非 JSON 文本包装为字符串值
    pub async fn post_raw<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let response = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        raw_body(response).await
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("Request failed: {}", e);
            ClientError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!("Request returned {}: {}", status, body);
        Err(status_error(status, &body))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    // 204 或空响应体按 null 解析，便于 Option/() 目标类型
    let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
    let envelope: ApiEnvelope<T> = serde_json::from_slice(body)?;
    if envelope.is_failure() {
        return Err(ClientError::Status {
            status: 200,
            message: envelope.message().unwrap_or_default().to_string(),
        });
    }
    Ok(envelope.into_data())
}

async fn ack(response: Response) -> Result<Ack> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes).unwrap_or_default())
}

async fn raw_body(response: Response) -> Result<Value> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

fn status_error(status: StatusCode, body: &str) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::NOT_FOUND => ClientError::NotFound,
        _ => ClientError::Status {
            status: status.as_u16(),
            message: error_message(body),
        },
    }
}

/// 从错误响应体中提取 `message` 或 `error` 字段
fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => ["message", "error", "msg"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string(),
        Ok(Value::String(s)) => s,
        _ => body.trim().chars().take(200).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_url_joining() {
        let auth = Arc::new(AuthContext::new(Arc::new(MemoryStorage::new())));
        let client = ApiClient::new("http://localhost:5000/api/", auth);
        assert_eq!(client.url("/posts"), "http://localhost:5000/api/posts");
        assert_eq!(client.url("posts/1"), "http://localhost:5000/api/posts/1");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"message":"Email taken"}"#), "Email taken");
        assert_eq!(error_message(r#"{"error":"bad input"}"#), "bad input");
        assert_eq!(error_message("Gateway Timeout"), "Gateway Timeout");
        assert_eq!(error_message(r#"{"status":"x"}"#), "");
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, ""),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, ""),
            ClientError::NotFound
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, r#"{"message":"nope"}"#),
            ClientError::Status { status: 400, .. }
        ));
    }
}
