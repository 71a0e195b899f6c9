// src/handlers/producto.rs

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
        producto::{ProductoCreate, ProductoFiltro, ProductoRead, ProductoUpdate},
        shared::{ItemSimple, TotalResponse},
    },
};

const PAGE_SIZE: i64 = 10;

#[utoipa::path(
    get,
    path = "/api/v1/productos",
    tag = "Productos",
    params(PageParams, ProductoFiltro),
    responses((status = 200, description = "Lista paginada de produtos", body = Paged<ProductoRead>)),
    security(("api_jwt" = []))
)]
pub async fn list_productos(
    State(app_state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(filtro): Query<ProductoFiltro>,
) -> Result<impl IntoResponse, AppError> {
    let req = page.resolve(PAGE_SIZE)?;
    let result = app_state.producto_service.list(&filtro, &req).await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/productos",
    tag = "Productos",
    request_body = ProductoCreate,
    responses(
        (status = 201, description = "Produto criado", body = ProductoRead),
        (status = 400, description = "Código duplicado ou dados inválidos"),
        (status = 404, description = "Categoría no encontrada.")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_producto(
    State(app_state): State<AppState>,
    Json(payload): Json<ProductoCreate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let producto = app_state.producto_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(producto)))
}

#[utoipa::path(
    get,
    path = "/api/v1/productos/total",
    tag = "Productos",
    responses((status = 200, description = "Total de produtos cadastrados", body = TotalResponse)),
    security(("api_jwt" = []))
)]
pub async fn total_productos(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let total = app_state.producto_service.total().await?;
    Ok(Json(total))
}

#[utoipa::path(
    get,
    path = "/api/v1/productos/code/{codigo}",
    tag = "Productos",
    params(("codigo" = String, Path, description = "Código do produto")),
    responses(
        (status = 200, body = ProductoRead),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_producto_by_codigo(
    State(app_state): State<AppState>,
    Path(codigo): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let producto = app_state.producto_service.get_by_codigo(&codigo).await?;
    Ok(Json(producto))
}

// Produtos ativos que ainda não estão no inventário (tela de registro)
#[utoipa::path(
    get,
    path = "/api/v1/productos/infinito/inventario",
    tag = "Productos",
    params(InfiniteParams),
    responses((status = 200, body = Vec<ItemSimple>)),
    security(("api_jwt" = []))
)]
pub async fn infinite_sin_inventario(
    State(app_state): State<AppState>,
    Query(params): Query<InfiniteParams>,
) -> Result<impl IntoResponse, AppError> {
    let (skip, limit) = params.resolve()?;
    let items = app_state
        .producto_service
        .infinite_sin_inventario(params.search.as_deref(), skip, limit)
        .await?;
    Ok(Json(items))
}

// Produtos ativos com inventário ativo (movimentações e vendas)
#[utoipa::path(
    get,
    path = "/api/v1/productos/infinito/movimiento",
    tag = "Productos",
    params(InfiniteParams),
    responses((status = 200, body = Vec<ItemSimple>)),
    security(("api_jwt" = []))
)]
pub async fn infinite_con_inventario(
    State(app_state): State<AppState>,
    Query(params): Query<InfiniteParams>,
) -> Result<impl IntoResponse, AppError> {
    let (skip, limit) = params.resolve()?;
    let items = app_state
        .producto_service
        .infinite_con_inventario(params.search.as_deref(), skip, limit)
        .await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/productos/{id}",
    tag = "Productos",
    params(("id" = i32, Path, description = "ID do produto")),
    responses(
        (status = 200, body = ProductoRead),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_producto(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let producto = app_state.producto_service.get(id).await?;
    Ok(Json(producto))
}

#[utoipa::path(
    patch,
    path = "/api/v1/productos/{id}",
    tag = "Productos",
    params(("id" = i32, Path, description = "ID do produto")),
    request_body = ProductoUpdate,
    responses(
        (status = 200, body = ProductoRead),
        (status = 400, description = "Código duplicado"),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_producto(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ProductoUpdate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let producto = app_state.producto_service.update(id, &payload).await?;
    Ok(Json(producto))
}

#[utoipa::path(
    patch,
    path = "/api/v1/productos/{id}/estado",
    tag = "Productos",
    params(("id" = i32, Path, description = "ID do produto")),
    responses((status = 200, description = "Estado invertido junto com o inventário", body = ProductoRead)),
    security(("api_jwt" = []))
)]
pub async fn toggle_producto(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let producto = app_state.producto_service.toggle_estado(id).await?;
    Ok(Json(producto))
}

#[utoipa::path(
    delete,
    path = "/api/v1/productos/{id}",
    tag = "Productos",
    params(("id" = i32, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto removido"),
        (status = 400, description = "Possui inventário, vendas ou movimentações")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_producto(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.producto_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
