// src/handlers/detalle_venta.rs

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
    models::venta::{DetalleCreate, DetalleRead, DetalleUpdate, VentaDetailRead},
};

// Adiciona uma linha à venda, baixa o estoque e recalcula o total
#[utoipa::path(
    post,
    path = "/api/v1/detalle_venta/{venta_id}",
    tag = "Detalle Venta",
    params(("venta_id" = i32, Path, description = "ID da venda")),
    request_body = DetalleCreate,
    responses(
        (status = 201, description = "Venda atualizada", body = VentaDetailRead),
        (status = 400, description = "Venda inativa, produto inativo ou stock insuficiente"),
        (status = 404, description = "Venda ou inventário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_detalle(
    State(app_state): State<AppState>,
    CurrentUser(usuario): CurrentUser,
    Path(venta_id): Path<i32>,
    Json(payload): Json<DetalleCreate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let venta = app_state.venta_service.add_detalle(venta_id, &payload, &usuario).await?;
    Ok((StatusCode::CREATED, Json(venta)))
}

#[utoipa::path(
    get,
    path = "/api/v1/detalle_venta/{id}",
    tag = "Detalle Venta",
    params(("id" = i32, Path, description = "ID do detalhe")),
    responses(
        (status = 200, body = DetalleRead),
        (status = 404, description = "Detalle de venta no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_detalle(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let detalle = app_state.venta_service.get_detalle(id).await?;
    Ok(Json(detalle))
}

#[utoipa::path(
    patch,
    path = "/api/v1/detalle_venta/{id}",
    tag = "Detalle Venta",
    params(("id" = i32, Path, description = "ID do detalhe")),
    request_body = DetalleUpdate,
    responses(
        (status = 200, description = "Venda atualizada", body = VentaDetailRead),
        (status = 400, description = "Stock insuficiente ou produto inativo"),
        (status = 404, description = "Detalle de venta no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_detalle(
    State(app_state): State<AppState>,
    CurrentUser(usuario): CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<DetalleUpdate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let venta = app_state.venta_service.update_detalle(id, &payload, &usuario).await?;
    Ok(Json(venta))
}

// Devolve o estoque (ANULACIÓN_VENTA) e responde com a venda recalculada
#[utoipa::path(
    delete,
    path = "/api/v1/detalle_venta/{id}",
    tag = "Detalle Venta",
    params(("id" = i32, Path, description = "ID do detalhe")),
    responses(
        (status = 200, description = "Venda atualizada", body = VentaDetailRead),
        (status = 404, description = "Detalle de venta no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_detalle(
    State(app_state): State<AppState>,
    CurrentUser(usuario): CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let venta = app_state.venta_service.delete_detalle(id, &usuario).await?;
    Ok(Json(venta))
}
