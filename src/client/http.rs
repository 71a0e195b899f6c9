// src/client/http.rs

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_DISPOSITION};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("No se pudo conectar con el servidor: {0}")]
    Network(String),

    #[error("Error HTTP {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("Respuesta inválida del servidor: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Campo `detail` do corpo de erro, quando o backend o enviou como texto.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    fn from_status(status: u16, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string));
        ClientError::Status { status, detail }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

/// Requisição já resolvida, relativa à base `/api/v1`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn json(status: u16, body: &Value) -> Self {
        Self { status, content_disposition: None, body: body.to_string().into_bytes() }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

// Transporte real sobre reqwest
pub struct ReqwestTransport {
    base_url: String,
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into().trim_end_matches('/').to_string(), http: reqwest::Client::new() }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self.http.request(method, url).query(&request.query);
        if let Some(token) = &request.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| ClientError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?
            .to_vec();

        Ok(HttpResponse { status, content_disposition, body })
    }
}

/// Arquivo baixado de `/exportar/...`.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Extrai o nome de `attachment; filename=...` (com ou sem aspas).
pub fn filename_from_disposition(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport, token: None }
    }

    /// Cliente apontando para `{base_url}` (ex.: `http://localhost:8000/api/v1`).
    pub fn connect(base_url: impl Into<String>) -> Self {
        Self::new(Arc::new(ReqwestTransport::new(base_url)))
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<HttpResponse, ClientError> {
        let request = HttpRequest {
            method,
            path: path.to_string(),
            query: query.to_vec(),
            body,
            token: self.token.clone(),
        };
        let response = self.transport.send(request).await?;
        if !(200..300).contains(&response.status) {
            return Err(ClientError::from_status(response.status, &response.body));
        }
        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ClientError> {
        serde_json::from_slice(&response.body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    fn encode<B: Serialize>(body: &B) -> Result<Value, ClientError> {
        serde_json::to_value(body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> Result<T, ClientError> {
        let response = self.send(Method::Get, path, query, None).await?;
        Self::decode(&response)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        let response = self.send(Method::Post, path, &[], Some(Self::encode(body)?)).await?;
        Self::decode(&response)
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        let response = self.send(Method::Patch, path, &[], Some(Self::encode(body)?)).await?;
        Self::decode(&response)
    }

    /// PATCH sem corpo (troca de estado)
    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(Method::Patch, path, &[], None).await?;
        Self::decode(&response)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(Method::Delete, path, &[], None).await?;
        Ok(())
    }

    /// DELETE que devolve o recurso pai atualizado
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(Method::Delete, path, &[], None).await?;
        Self::decode(&response)
    }

    pub async fn download(&self, path: &str) -> Result<Download, ClientError> {
        let response = self.send(Method::Get, path, &[], None).await?;
        let filename = response
            .content_disposition
            .as_deref()
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| "reporte.csv".to_string());
        Ok(Download { filename, bytes: response.body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nome_do_arquivo_com_e_sem_aspas() {
        assert_eq!(
            filename_from_disposition("attachment; filename=Ventas_2025-06-01_09-30-00.csv"),
            Some("Ventas_2025-06-01_09-30-00.csv".to_string())
        );
        assert_eq!(filename_from_disposition("attachment; filename=\"a.csv\""), Some("a.csv".to_string()));
        assert_eq!(filename_from_disposition("inline"), None);
    }

    #[tokio::test]
    async fn anexa_bearer_quando_ha_token() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(200, &json!({"total": 3})));

        let mut client = ApiClient::new(fake.clone());
        client.set_token(Some("abc".to_string()));
        let _: Value = client.get("/productos/total", &[]).await.unwrap();

        let sent = fake.requests();
        assert_eq!(sent[0].token.as_deref(), Some("abc"));
        assert_eq!(sent[0].path, "/productos/total");
    }

    #[tokio::test]
    async fn erro_http_traz_detail() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(400, &json!({"detail": "Stock insuficiente"})));

        let client = ApiClient::new(fake);
        let err = client.post::<_, Value>("/inventarios/movimientos/salida", &json!({})).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.detail(), Some("Stock insuficiente"));
    }

    #[tokio::test]
    async fn detail_de_validacao_nao_e_texto() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(422, &json!({"detail": [{"msg": "x"}]})));

        let client = ApiClient::new(fake);
        let err = client.get::<Value>("/clientes", &[]).await.unwrap_err();
        assert_eq!(err, ClientError::Status { status: 422, detail: None });
    }

    #[tokio::test]
    async fn download_le_content_disposition() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse {
            status: 200,
            content_disposition: Some("attachment; filename=Cliente_2025-06-01_09-30-00.csv".to_string()),
            body: b"ID;Nombre\r\n".to_vec(),
        });

        let client = ApiClient::new(fake);
        let file = client.download("/exportar/clientes").await.unwrap();
        assert_eq!(file.filename, "Cliente_2025-06-01_09-30-00.csv");
        assert_eq!(file.bytes, b"ID;Nombre\r\n".to_vec());
    }
}
