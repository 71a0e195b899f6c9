// src/common/error.rs

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const MSG_RELACIONES_ACTIVAS: &str = "No se puede eliminar, tiene relaciones activas";
pub const MSG_CREDENCIALES: &str = "No se pudo validar las credenciales";
const MSG_INESPERADO: &str = "Ocurrió un error inesperado";

// Erro único da API. As mensagens de domínio viajam dentro das variantes,
// as de infraestrutura são logadas e escondidas do cliente.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Datos inválidos")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("No tienes permisos suficientes")]
    Forbidden,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn relaciones_activas() -> Self {
        Self::BadRequest(MSG_RELACIONES_ACTIVAS.to_string())
    }

    pub fn credenciales() -> Self {
        Self::Unauthorized(MSG_CREDENCIALES.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            // Devolve todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::BTreeMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "detail": "Datos inválidos",
                    "errors": details,
                }));
                (status, body).into_response()
            }
            AppError::Unauthorized(msg) => (
                status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(json!({ "detail": msg })),
            )
                .into_response(),
            AppError::BadRequest(msg) | AppError::NotFound(msg) | AppError::Conflict(msg) => {
                (status, Json(json!({ "detail": msg }))).into_response()
            }
            AppError::Forbidden => {
                (status, Json(json!({ "detail": "No tienes permisos suficientes" }))).into_response()
            }
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (status, Json(json!({ "detail": MSG_INESPERADO }))).into_response()
            }
        }
    }
}

// Traduz violações de unicidade do Postgres para a mensagem de domínio,
// preservando os demais erros do sqlx.
pub fn map_unique(err: sqlx::Error, on_unique: impl FnOnce(Option<&str>) -> AppError) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return on_unique(db_err.constraint());
        }
    }
    AppError::DatabaseError(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn relaciones_activas_vira_400_com_detail() {
        let resp = AppError::relaciones_activas().into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["detail"], MSG_RELACIONES_ACTIVAS);
    }

    #[tokio::test]
    async fn unauthorized_traz_www_authenticate() {
        let resp = AppError::credenciales().into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[tokio::test]
    async fn erro_interno_nao_vaza_detalhes() {
        let resp = AppError::from(anyhow::anyhow!("senha do banco: hunter2")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["detail"], MSG_INESPERADO);
    }

    #[test]
    fn forbidden_mapeia_para_403() {
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
    }
}
