// src/handlers/exportar.rs
//
// Planilhas CSV para download. O nome do arquivo leva a data de geração.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminUser,
    services::export_service::Planilla,
};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

fn attachment(planilla: Planilla) -> Response {
    let filename = planilla.filename(Utc::now());
    tracing::info!(arquivo = %filename, filas = planilla.filas.len(), "📤 Exportação gerada");

    (
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename={}", filename)),
        ],
        planilla.to_csv(),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/v1/exportar/inventarios",
    tag = "Exportar",
    responses((status = 200, description = "Inventário em CSV", content_type = "text/csv")),
    security(("api_jwt" = []))
)]
pub async fn exportar_inventarios(State(app_state): State<AppState>) -> Result<Response, AppError> {
    Ok(attachment(app_state.export_service.inventarios().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/exportar/ventas",
    tag = "Exportar",
    responses((status = 200, description = "Vendas em CSV", content_type = "text/csv")),
    security(("api_jwt" = []))
)]
pub async fn exportar_ventas(State(app_state): State<AppState>) -> Result<Response, AppError> {
    Ok(attachment(app_state.export_service.ventas().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/exportar/ventas/cliente/{cliente_id}",
    tag = "Exportar",
    params(("cliente_id" = i32, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Vendas do cliente em CSV", content_type = "text/csv"),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn exportar_ventas_cliente(
    State(app_state): State<AppState>,
    Path(cliente_id): Path<i32>,
) -> Result<Response, AppError> {
    Ok(attachment(app_state.export_service.ventas_por_cliente(cliente_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/exportar/clientes",
    tag = "Exportar",
    responses((status = 200, description = "Clientes em CSV", content_type = "text/csv")),
    security(("api_jwt" = []))
)]
pub async fn exportar_clientes(State(app_state): State<AppState>) -> Result<Response, AppError> {
    Ok(attachment(app_state.export_service.clientes().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/exportar/categorias",
    tag = "Exportar",
    responses((status = 200, description = "Categorias em CSV", content_type = "text/csv")),
    security(("api_jwt" = []))
)]
pub async fn exportar_categorias(State(app_state): State<AppState>) -> Result<Response, AppError> {
    Ok(attachment(app_state.export_service.categorias().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/exportar/productos",
    tag = "Exportar",
    responses((status = 200, description = "Produtos em CSV", content_type = "text/csv")),
    security(("api_jwt" = []))
)]
pub async fn exportar_productos(State(app_state): State<AppState>) -> Result<Response, AppError> {
    Ok(attachment(app_state.export_service.productos().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/exportar/usuarios",
    tag = "Exportar",
    responses(
        (status = 200, description = "Usuários em CSV", content_type = "text/csv"),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn exportar_usuarios(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<Response, AppError> {
    Ok(attachment(app_state.export_service.usuarios().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/exportar/movimientos/producto/{producto_id}",
    tag = "Exportar",
    params(("producto_id" = i32, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Movimentações do produto em CSV", content_type = "text/csv"),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn exportar_movimientos_producto(
    State(app_state): State<AppState>,
    Path(producto_id): Path<i32>,
) -> Result<Response, AppError> {
    Ok(attachment(app_state.export_service.movimientos_por_producto(producto_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/exportar/movimientos/usuario/{usuario_id}",
    tag = "Exportar",
    params(("usuario_id" = i32, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Movimentações do usuário em CSV", content_type = "text/csv"),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn exportar_movimientos_usuario(
    State(app_state): State<AppState>,
    Path(usuario_id): Path<i32>,
) -> Result<Response, AppError> {
    Ok(attachment(app_state.export_service.movimientos_por_usuario(usuario_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/exportar/movimiento_inventarios",
    tag = "Exportar",
    responses((status = 200, description = "Todas as movimentações em CSV", content_type = "text/csv")),
    security(("api_jwt" = []))
)]
pub async fn exportar_movimientos(State(app_state): State<AppState>) -> Result<Response, AppError> {
    Ok(attachment(app_state.export_service.movimientos().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/exportar/detalles/{venta_id}",
    tag = "Exportar",
    params(("venta_id" = i32, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Detalhes da venda em CSV", content_type = "text/csv"),
        (status = 404, description = "Venta no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn exportar_detalles_venta(
    State(app_state): State<AppState>,
    Path(venta_id): Path<i32>,
) -> Result<Response, AppError> {
    Ok(attachment(app_state.export_service.detalles_venta(venta_id).await?))
}
