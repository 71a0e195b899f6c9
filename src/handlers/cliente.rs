// src/handlers/cliente.rs

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
        cliente::{Cliente, ClienteCreate, ClienteFiltro, ClienteUpdate},
        shared::{ItemSimple, TotalResponse},
    },
};

const PAGE_SIZE: i64 = 50;

#[utoipa::path(
    get,
    path = "/api/v1/clientes",
    tag = "Clientes",
    params(PageParams, ClienteFiltro),
    responses((status = 200, description = "Lista paginada de clientes", body = Paged<Cliente>)),
    security(("api_jwt" = []))
)]
pub async fn list_clientes(
    State(app_state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(filtro): Query<ClienteFiltro>,
) -> Result<impl IntoResponse, AppError> {
    let req = page.resolve(PAGE_SIZE)?;
    let result = app_state.cliente_service.list(&filtro, &req).await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/clientes",
    tag = "Clientes",
    request_body = ClienteCreate,
    responses(
        (status = 201, description = "Cliente criado", body = Cliente),
        (status = 409, description = "Email ou identificação já cadastrados")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_cliente(
    State(app_state): State<AppState>,
    Json(payload): Json<ClienteCreate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let cliente = app_state.cliente_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(cliente)))
}

#[utoipa::path(
    get,
    path = "/api/v1/clientes/infinito",
    tag = "Clientes",
    params(InfiniteParams),
    responses((status = 200, body = Vec<ItemSimple>)),
    security(("api_jwt" = []))
)]
pub async fn infinite_clientes(
    State(app_state): State<AppState>,
    Query(params): Query<InfiniteParams>,
) -> Result<impl IntoResponse, AppError> {
    let (skip, limit) = params.resolve()?;
    let items = app_state
        .cliente_service
        .infinite(params.search.as_deref(), skip, limit)
        .await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/clientes/con-ventas",
    tag = "Clientes",
    responses((status = 200, description = "Clientes distintos com vendas", body = TotalResponse)),
    security(("api_jwt" = []))
)]
pub async fn clientes_con_ventas(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let total = app_state.cliente_service.con_ventas().await?;
    Ok(Json(total))
}

#[utoipa::path(
    get,
    path = "/api/v1/clientes/{id}",
    tag = "Clientes",
    params(("id" = i32, Path, description = "ID do cliente")),
    responses(
        (status = 200, body = Cliente),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_cliente(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let cliente = app_state.cliente_service.get(id).await?;
    Ok(Json(cliente))
}

#[utoipa::path(
    patch,
    path = "/api/v1/clientes/{id}",
    tag = "Clientes",
    params(("id" = i32, Path, description = "ID do cliente")),
    request_body = ClienteUpdate,
    responses(
        (status = 200, body = Cliente),
        (status = 400, description = "Email ou identificação duplicados"),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_cliente(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ClienteUpdate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let cliente = app_state.cliente_service.update(id, &payload).await?;
    Ok(Json(cliente))
}

#[utoipa::path(
    patch,
    path = "/api/v1/clientes/{id}/estado",
    tag = "Clientes",
    params(("id" = i32, Path, description = "ID do cliente")),
    responses((status = 200, body = Cliente)),
    security(("api_jwt" = []))
)]
pub async fn toggle_cliente(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let cliente = app_state.cliente_service.toggle_estado(id).await?;
    Ok(Json(cliente))
}

#[utoipa::path(
    delete,
    path = "/api/v1/clientes/{id}",
    tag = "Clientes",
    params(("id" = i32, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido"),
        (status = 400, description = "Possui vendas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_cliente(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.cliente_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
