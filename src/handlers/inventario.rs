// src/handlers/inventario.rs

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
    db::movimiento_repo::MovimientoScope,
    middleware::auth::CurrentUser,
    models::inventario::{
        InventarioCreate, InventarioFiltro, InventarioRead, InventarioUpdate, MovimientoCreate, MovimientoFiltro,
        MovimientoRead,
    },
};

const PAGE_SIZE: i64 = 10;
const PAGE_SIZE_MOVIMIENTOS: i64 = 50;

// ---
// Inventário
// ---

#[utoipa::path(
    get,
    path = "/api/v1/inventarios",
    tag = "Inventarios",
    params(PageParams, InventarioFiltro),
    responses((status = 200, description = "Lista paginada do inventário", body = Paged<InventarioRead>)),
    security(("api_jwt" = []))
)]
pub async fn list_inventarios(
    State(app_state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(filtro): Query<InventarioFiltro>,
) -> Result<impl IntoResponse, AppError> {
    let req = page.resolve(PAGE_SIZE)?;
    let result = app_state.inventario_service.list(&filtro, &req).await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/inventarios",
    tag = "Inventarios",
    request_body = InventarioCreate,
    responses(
        (status = 201, description = "Produto registrado no inventário", body = InventarioRead),
        (status = 400, description = "Já registrado ou produto inativo"),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_inventario(
    State(app_state): State<AppState>,
    Json(payload): Json<InventarioCreate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let inventario = app_state.inventario_service.register(&payload).await?;
    Ok((StatusCode::CREATED, Json(inventario)))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventarios/stock-bajo",
    tag = "Inventarios",
    params(PageParams, InventarioFiltro),
    responses((status = 200, description = "Itens abaixo da quantidade mínima", body = Paged<InventarioRead>)),
    security(("api_jwt" = []))
)]
pub async fn stock_bajo(
    State(app_state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(filtro): Query<InventarioFiltro>,
) -> Result<impl IntoResponse, AppError> {
    let req = page.resolve(PAGE_SIZE)?;
    let result = app_state
        .inventario_service
        .stock_bajo(filtro.search.as_deref(), &req)
        .await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventarios/producto/{producto_id}",
    tag = "Inventarios",
    params(("producto_id" = i32, Path, description = "ID do produto")),
    responses(
        (status = 200, body = InventarioRead),
        (status = 404, description = "Inventario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_inventario_by_producto(
    State(app_state): State<AppState>,
    Path(producto_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let inventario = app_state.inventario_service.get_by_producto(producto_id).await?;
    Ok(Json(inventario))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventarios/{id}",
    tag = "Inventarios",
    params(("id" = i32, Path, description = "ID do inventário")),
    responses(
        (status = 200, body = InventarioRead),
        (status = 404, description = "Inventario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_inventario(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let inventario = app_state.inventario_service.get(id).await?;
    Ok(Json(inventario))
}

// Ajuste manual; a diferença de quantidade vira ENTRADA_EDICIÓN/SALIDA_EDICIÓN
#[utoipa::path(
    patch,
    path = "/api/v1/inventarios/{id}",
    tag = "Inventarios",
    params(("id" = i32, Path, description = "ID do inventário")),
    request_body = InventarioUpdate,
    responses(
        (status = 200, body = InventarioRead),
        (status = 400, description = "Inventário inativo ou quantidade negativa"),
        (status = 404, description = "Inventario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_inventario(
    State(app_state): State<AppState>,
    CurrentUser(usuario): CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<InventarioUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let inventario = app_state.inventario_service.update(id, &payload, &usuario).await?;
    Ok(Json(inventario))
}

#[utoipa::path(
    patch,
    path = "/api/v1/inventarios/{id}/estado",
    tag = "Inventarios",
    params(("id" = i32, Path, description = "ID do inventário")),
    responses((status = 200, description = "Estado invertido junto com o produto", body = InventarioRead)),
    security(("api_jwt" = []))
)]
pub async fn toggle_inventario(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let inventario = app_state.inventario_service.toggle_estado(id).await?;
    Ok(Json(inventario))
}

// ---
// Movimentações
// ---

#[utoipa::path(
    post,
    path = "/api/v1/inventarios/movimientos/entrada",
    tag = "Inventarios",
    request_body = MovimientoCreate,
    responses(
        (status = 201, description = "Entrada registrada", body = MovimientoRead),
        (status = 400, description = "Produto inativo"),
        (status = 404, description = "Producto no encontrado en inventario")
    ),
    security(("api_jwt" = []))
)]
pub async fn entrada(
    State(app_state): State<AppState>,
    CurrentUser(usuario): CurrentUser,
    Json(payload): Json<MovimientoCreate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let movimiento = app_state.inventario_service.entrada(&payload, &usuario).await?;
    Ok((StatusCode::CREATED, Json(movimiento)))
}

#[utoipa::path(
    post,
    path = "/api/v1/inventarios/movimientos/salida",
    tag = "Inventarios",
    request_body = MovimientoCreate,
    responses(
        (status = 201, description = "Saída registrada", body = MovimientoRead),
        (status = 400, description = "Stock insuficiente ou produto inativo"),
        (status = 404, description = "Producto no encontrado en inventario")
    ),
    security(("api_jwt" = []))
)]
pub async fn salida(
    State(app_state): State<AppState>,
    CurrentUser(usuario): CurrentUser,
    Json(payload): Json<MovimientoCreate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let movimiento = app_state.inventario_service.salida(&payload, &usuario).await?;
    Ok((StatusCode::CREATED, Json(movimiento)))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventarios/movimientos",
    tag = "Inventarios",
    params(PageParams, MovimientoFiltro),
    responses((status = 200, description = "Histórico de movimentações", body = Paged<MovimientoRead>)),
    security(("api_jwt" = []))
)]
pub async fn list_movimientos(
    State(app_state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(filtro): Query<MovimientoFiltro>,
) -> Result<impl IntoResponse, AppError> {
    let req = page.resolve(PAGE_SIZE_MOVIMIENTOS)?;
    let result = app_state
        .inventario_service
        .movimientos(MovimientoScope::Todos, &filtro, &req)
        .await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventarios/movimientos/producto/{producto_id}",
    tag = "Inventarios",
    params(("producto_id" = i32, Path, description = "ID do produto"), PageParams, MovimientoFiltro),
    responses((status = 200, body = Paged<MovimientoRead>)),
    security(("api_jwt" = []))
)]
pub async fn movimientos_por_producto(
    State(app_state): State<AppState>,
    Path(producto_id): Path<i32>,
    Query(page): Query<PageParams>,
    Query(filtro): Query<MovimientoFiltro>,
) -> Result<impl IntoResponse, AppError> {
    let req = page.resolve(PAGE_SIZE_MOVIMIENTOS)?;
    let result = app_state
        .inventario_service
        .movimientos(MovimientoScope::Producto(producto_id), &filtro, &req)
        .await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventarios/movimientos/usuario/{usuario_id}",
    tag = "Inventarios",
    params(("usuario_id" = i32, Path, description = "ID do usuário"), PageParams, MovimientoFiltro),
    responses((status = 200, body = Paged<MovimientoRead>)),
    security(("api_jwt" = []))
)]
pub async fn movimientos_por_usuario(
    State(app_state): State<AppState>,
    Path(usuario_id): Path<i32>,
    Query(page): Query<PageParams>,
    Query(filtro): Query<MovimientoFiltro>,
) -> Result<impl IntoResponse, AppError> {
    let req = page.resolve(PAGE_SIZE_MOVIMIENTOS)?;
    let result = app_state
        .inventario_service
        .movimientos(MovimientoScope::Usuario(usuario_id), &filtro, &req)
        .await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventarios/movimientos/{id}",
    tag = "Inventarios",
    params(("id" = i32, Path, description = "ID da movimentação")),
    responses(
        (status = 200, body = MovimientoRead),
        (status = 404, description = "Movimiento no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_movimiento(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let movimiento = app_state.inventario_service.get_movimiento(id).await?;
    Ok(Json(movimiento))
}
