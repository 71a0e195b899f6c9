// src/handlers/categoria.rs

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
        pagination::{InfiniteParams, PageParams, Paged},
    },
    config::AppState,
    models::{
        categoria::{Categoria, CategoriaCreate, CategoriaFiltro, CategoriaUpdate},
        shared::ItemSimple,
    },
};

const PAGE_SIZE: i64 = 50;

#[utoipa::path(
    get,
    path = "/api/v1/categorias",
    tag = "Categorías",
    params(PageParams, CategoriaFiltro),
    responses(
        (status = 200, description = "Lista paginada de categorias", body = Paged<Categoria>),
        (status = 400, description = "Parâmetros de paginação inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_categorias(
    State(app_state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(filtro): Query<CategoriaFiltro>,
) -> Result<impl IntoResponse, AppError> {
    let req = page.resolve(PAGE_SIZE)?;
    let result = app_state.categoria_service.list(&filtro, &req).await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/categorias",
    tag = "Categorías",
    request_body = CategoriaCreate,
    responses(
        (status = 201, description = "Categoria criada", body = Categoria),
        (status = 400, description = "Nome duplicado ou dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_categoria(
    State(app_state): State<AppState>,
    Json(payload): Json<CategoriaCreate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let categoria = app_state.categoria_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(categoria)))
}

#[utoipa::path(
    get,
    path = "/api/v1/categorias/infinito",
    tag = "Categorías",
    params(InfiniteParams),
    responses((status = 200, description = "Página do seletor", body = Vec<ItemSimple>)),
    security(("api_jwt" = []))
)]
pub async fn infinite_categorias(
    State(app_state): State<AppState>,
    Query(params): Query<InfiniteParams>,
) -> Result<impl IntoResponse, AppError> {
    let (skip, limit) = params.resolve()?;
    let items = app_state
        .categoria_service
        .infinite(params.search.as_deref(), skip, limit)
        .await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/categorias/{id}",
    tag = "Categorías",
    params(("id" = i32, Path, description = "ID da categoria")),
    responses(
        (status = 200, body = Categoria),
        (status = 404, description = "Categoría no encontrada.")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_categoria(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let categoria = app_state.categoria_service.get(id).await?;
    Ok(Json(categoria))
}

#[utoipa::path(
    patch,
    path = "/api/v1/categorias/{id}",
    tag = "Categorías",
    params(("id" = i32, Path, description = "ID da categoria")),
    request_body = CategoriaUpdate,
    responses(
        (status = 200, body = Categoria),
        (status = 400, description = "Nome duplicado"),
        (status = 404, description = "Categoría no encontrada.")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_categoria(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CategoriaUpdate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let categoria = app_state.categoria_service.update(id, &payload).await?;
    Ok(Json(categoria))
}

#[utoipa::path(
    patch,
    path = "/api/v1/categorias/{id}/estado",
    tag = "Categorías",
    params(("id" = i32, Path, description = "ID da categoria")),
    responses((status = 200, description = "Estado invertido", body = Categoria)),
    security(("api_jwt" = []))
)]
pub async fn toggle_categoria(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let categoria = app_state.categoria_service.toggle_estado(id).await?;
    Ok(Json(categoria))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categorias/{id}",
    tag = "Categorías",
    params(("id" = i32, Path, description = "ID da categoria")),
    responses(
        (status = 204, description = "Categoria removida"),
        (status = 400, description = "Possui produtos vinculados")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_categoria(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.categoria_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
