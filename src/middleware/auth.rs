// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};

use crate::{common::error::AppError, config::AppState, models::usuario::Usuario};

// O middleware em si: resolve o portador do token e o guarda na requisição
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Header ausente ou malformado dá o mesmo 401
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| AppError::credenciales())?;

    let usuario = app_state.auth_service.validate_token(bearer.token()).await?;
    request.extensions_mut().insert(usuario);

    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Usuario);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Usuario>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(AppError::credenciales)
    }
}

/// Só administradores (rol 1) passam; os demais recebem 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Usuario);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(usuario) = CurrentUser::from_request_parts(parts, state).await?;
        if !usuario.is_admin() {
            return Err(AppError::Forbidden);
        }
        Ok(AdminUser(usuario))
    }
}
