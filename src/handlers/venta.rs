// src/handlers/venta.rs

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
    middleware::auth::CurrentUser,
    models::{
        shared::TotalResponse,
        venta::{DetalleFiltro, DetalleRead, VentaCreate, VentaDetailRead, VentaFiltro, VentaRead, VentaUpdate},
    },
};

const PAGE_SIZE: i64 = 10;

#[utoipa::path(
    get,
    path = "/api/v1/ventas",
    tag = "Ventas",
    params(PageParams, VentaFiltro),
    responses((status = 200, description = "Lista paginada de vendas", body = Paged<VentaRead>)),
    security(("api_jwt" = []))
)]
pub async fn list_ventas(
    State(app_state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(filtro): Query<VentaFiltro>,
) -> Result<impl IntoResponse, AppError> {
    let req = page.resolve(PAGE_SIZE)?;
    let result = app_state.venta_service.list(&filtro, &req).await?;
    Ok(Json(result))
}

// Abre uma venda vazia (total 0); o vendedor é o usuário autenticado
#[utoipa::path(
    post,
    path = "/api/v1/ventas",
    tag = "Ventas",
    request_body = VentaCreate,
    responses(
        (status = 201, description = "Venda criada", body = VentaDetailRead),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_venta(
    State(app_state): State<AppState>,
    CurrentUser(usuario): CurrentUser,
    Json(payload): Json<VentaCreate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let venta = app_state.venta_service.create(&payload, &usuario).await?;
    Ok((StatusCode::CREATED, Json(venta)))
}

#[utoipa::path(
    get,
    path = "/api/v1/ventas/30dias",
    tag = "Ventas",
    responses((status = 200, description = "Vendas dos últimos 30 dias", body = TotalResponse)),
    security(("api_jwt" = []))
)]
pub async fn ventas_30_dias(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let total = app_state.venta_service.ultimos_30_dias().await?;
    Ok(Json(total))
}

#[utoipa::path(
    get,
    path = "/api/v1/ventas/detalles/{venta_id}",
    tag = "Ventas",
    params(("venta_id" = i32, Path, description = "ID da venda"), PageParams, DetalleFiltro),
    responses(
        (status = 200, body = Paged<DetalleRead>),
        (status = 404, description = "Venta no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_detalles(
    State(app_state): State<AppState>,
    Path(venta_id): Path<i32>,
    Query(page): Query<PageParams>,
    Query(filtro): Query<DetalleFiltro>,
) -> Result<impl IntoResponse, AppError> {
    let req = page.resolve(PAGE_SIZE)?;
    let result = app_state.venta_service.detalles(venta_id, &filtro, &req).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/v1/ventas/cliente/{cliente_id}",
    tag = "Ventas",
    params(("cliente_id" = i32, Path, description = "ID do cliente")),
    responses(
        (status = 200, body = Vec<VentaRead>),
        (status = 404, description = "No se encontraron ventas para este cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn ventas_por_cliente(
    State(app_state): State<AppState>,
    Path(cliente_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let ventas = app_state.venta_service.by_cliente(cliente_id).await?;
    Ok(Json(ventas))
}

#[utoipa::path(
    get,
    path = "/api/v1/ventas/{id}",
    tag = "Ventas",
    params(("id" = i32, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda com seus detalhes", body = VentaDetailRead),
        (status = 404, description = "Venta no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_venta(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let venta = app_state.venta_service.get(id).await?;
    Ok(Json(venta))
}

#[utoipa::path(
    patch,
    path = "/api/v1/ventas/{id}",
    tag = "Ventas",
    params(("id" = i32, Path, description = "ID da venda")),
    request_body = VentaUpdate,
    responses(
        (status = 200, body = VentaRead),
        (status = 404, description = "Venta o cliente no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_venta(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<VentaUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let venta = app_state.venta_service.update(id, &payload).await?;
    Ok(Json(venta))
}

#[utoipa::path(
    patch,
    path = "/api/v1/ventas/{id}/estado",
    tag = "Ventas",
    params(("id" = i32, Path, description = "ID da venda")),
    responses((status = 200, body = VentaRead)),
    security(("api_jwt" = []))
)]
pub async fn toggle_venta(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let venta = app_state.venta_service.toggle_estado(id).await?;
    Ok(Json(venta))
}

#[utoipa::path(
    delete,
    path = "/api/v1/ventas/{id}",
    tag = "Ventas",
    params(("id" = i32, Path, description = "ID da venda")),
    responses(
        (status = 204, description = "Venda removida"),
        (status = 400, description = "Possui detalhes")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_venta(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.venta_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
