// src/handlers/usuario.rs
//
// Todas as rotas exigem administrador (extrator `AdminUser`).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        pagination::{PageParams, Paged},
    },
    config::AppState,
    middleware::auth::AdminUser,
    models::usuario::{UsuarioCreate, UsuarioFiltro, UsuarioRead, UsuarioUpdate},
};

const PAGE_SIZE: i64 = 50;

#[utoipa::path(
    get,
    path = "/api/v1/usuarios",
    tag = "Usuarios",
    params(PageParams, UsuarioFiltro),
    responses(
        (status = 200, description = "Lista paginada de usuários", body = Paged<UsuarioRead>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_usuarios(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Query(page): Query<PageParams>,
    Query(filtro): Query<UsuarioFiltro>,
) -> Result<impl IntoResponse, AppError> {
    let req = page.resolve(PAGE_SIZE)?;
    let result = app_state.usuario_service.list(&filtro, &req).await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/usuarios",
    tag = "Usuarios",
    request_body = UsuarioCreate,
    responses(
        (status = 201, description = "Usuário criado", body = UsuarioRead),
        (status = 400, description = "Email já cadastrado"),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_usuario(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<UsuarioCreate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let usuario = app_state.usuario_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(usuario)))
}

#[utoipa::path(
    get,
    path = "/api/v1/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = i32, Path, description = "ID do usuário")),
    responses(
        (status = 200, body = UsuarioRead),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_usuario(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let usuario = app_state.usuario_service.get(id).await?;
    Ok(Json(usuario))
}

#[utoipa::path(
    patch,
    path = "/api/v1/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = i32, Path, description = "ID do usuário")),
    request_body = UsuarioUpdate,
    responses(
        (status = 200, body = UsuarioRead),
        (status = 400, description = "Email já cadastrado"),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_usuario(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(payload): Json<UsuarioUpdate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let usuario = app_state.usuario_service.update(id, &payload).await?;
    Ok(Json(usuario))
}

#[utoipa::path(
    patch,
    path = "/api/v1/usuarios/{id}/estado",
    tag = "Usuarios",
    params(("id" = i32, Path, description = "ID do usuário")),
    responses((status = 200, body = UsuarioRead)),
    security(("api_jwt" = []))
)]
pub async fn toggle_usuario(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let usuario = app_state.usuario_service.toggle_estado(id).await?;
    Ok(Json(usuario))
}

#[utoipa::path(
    delete,
    path = "/api/v1/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = i32, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário removido"),
        (status = 400, description = "Possui vendas ou movimentações")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_usuario(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.usuario_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
