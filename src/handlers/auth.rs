// src/handlers/auth.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentUser,
    models::{
        auth::{LoginPayload, TokenResponse},
        usuario::{UsuarioCreate, UsuarioRead},
    },
};

// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token de acesso", body = TokenResponse),
        (status = 401, description = "Credenciales incorrectas o usuario inactivo")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state.auth_service.login(&payload.email, &payload.password).await?;
    Ok(Json(token))
}

// POST /api/v1/auth/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = UsuarioCreate,
    responses(
        (status = 201, description = "Usuário registrado", body = UsuarioRead),
        (status = 409, description = "Usuario existente")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<UsuarioCreate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let usuario = app_state.auth_service.register(&payload).await?;
    Ok((StatusCode::CREATED, Json(usuario)))
}

// GET /api/v1/auth/me
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário autenticado", body = UsuarioRead),
        (status = 401, description = "No autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(CurrentUser(usuario): CurrentUser) -> Json<UsuarioRead> {
    Json(usuario.into())
}

// GET /api/v1/auth/{id}
#[utoipa::path(
    get,
    path = "/api/v1/auth/{id}",
    tag = "Auth",
    params(("id" = i32, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Perfil do usuário", body = UsuarioRead),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_perfil(
    State(app_state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let usuario = app_state.usuario_service.get(id).await?;
    Ok(Json(usuario))
}
