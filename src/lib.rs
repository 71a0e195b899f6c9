// src/lib.rs

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod client;
pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

fn cors(origin: &str) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        // O SPA lê o nome do arquivo exportado deste header
        .expose_headers([header::CONTENT_DISPOSITION]);

    match HeaderValue::from_str(origin) {
        Ok(valor) => base.allow_origin(valor).allow_credentials(true),
        Err(_) => {
            tracing::warn!(origin, "CORS_ORIGIN inválida, liberando qualquer origem");
            base.allow_origin(Any)
        }
    }
}

/// Monta o router completo da API (`/api/v1`) com docs, CORS e trace.
pub fn app(app_state: AppState) -> Router {
    let guard = axum_middleware::from_fn_with_state(app_state.clone(), auth_guard);

    // --- Rotas públicas ---
    let auth_publicas = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/register", post(handlers::auth::register));

    let auth_protegidas = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/{id}", get(handlers::auth::get_perfil))
        .layer(guard.clone());

    // --- Rotas protegidas pelo token ---
    let usuario_routes = Router::new()
        .route("/", get(handlers::usuario::list_usuarios).post(handlers::usuario::create_usuario))
        .route(
            "/{id}",
            get(handlers::usuario::get_usuario)
                .patch(handlers::usuario::update_usuario)
                .delete(handlers::usuario::delete_usuario),
        )
        .route("/{id}/estado", patch(handlers::usuario::toggle_usuario));

    let categoria_routes = Router::new()
        .route("/", get(handlers::categoria::list_categorias).post(handlers::categoria::create_categoria))
        .route("/infinito", get(handlers::categoria::infinite_categorias))
        .route(
            "/{id}",
            get(handlers::categoria::get_categoria)
                .patch(handlers::categoria::update_categoria)
                .delete(handlers::categoria::delete_categoria),
        )
        .route("/{id}/estado", patch(handlers::categoria::toggle_categoria));

    let producto_routes = Router::new()
        .route("/", get(handlers::producto::list_productos).post(handlers::producto::create_producto))
        .route("/total", get(handlers::producto::total_productos))
        .route("/code/{codigo}", get(handlers::producto::get_producto_by_codigo))
        .route("/infinito/inventario", get(handlers::producto::infinite_sin_inventario))
        .route("/infinito/movimiento", get(handlers::producto::infinite_con_inventario))
        .route(
            "/{id}",
            get(handlers::producto::get_producto)
                .patch(handlers::producto::update_producto)
                .delete(handlers::producto::delete_producto),
        )
        .route("/{id}/estado", patch(handlers::producto::toggle_producto));

    let cliente_routes = Router::new()
        .route("/", get(handlers::cliente::list_clientes).post(handlers::cliente::create_cliente))
        .route("/infinito", get(handlers::cliente::infinite_clientes))
        .route("/con-ventas", get(handlers::cliente::clientes_con_ventas))
        .route(
            "/{id}",
            get(handlers::cliente::get_cliente)
                .patch(handlers::cliente::update_cliente)
                .delete(handlers::cliente::delete_cliente),
        )
        .route("/{id}/estado", patch(handlers::cliente::toggle_cliente));

    let inventario_routes = Router::new()
        .route(
            "/",
            get(handlers::inventario::list_inventarios).post(handlers::inventario::register_inventario),
        )
        .route("/stock-bajo", get(handlers::inventario::stock_bajo))
        .route("/producto/{producto_id}", get(handlers::inventario::get_inventario_by_producto))
        .route(
            "/{id}",
            get(handlers::inventario::get_inventario).patch(handlers::inventario::update_inventario),
        )
        .route("/{id}/estado", patch(handlers::inventario::toggle_inventario))
        .route("/movimientos", get(handlers::inventario::list_movimientos))
        .route("/movimientos/entrada", post(handlers::inventario::entrada))
        .route("/movimientos/salida", post(handlers::inventario::salida))
        .route("/movimientos/producto/{producto_id}", get(handlers::inventario::movimientos_por_producto))
        .route("/movimientos/usuario/{usuario_id}", get(handlers::inventario::movimientos_por_usuario))
        .route("/movimientos/{id}", get(handlers::inventario::get_movimiento));

    let venta_routes = Router::new()
        .route("/", get(handlers::venta::list_ventas).post(handlers::venta::create_venta))
        .route("/30dias", get(handlers::venta::ventas_30_dias))
        .route("/detalles/{venta_id}", get(handlers::venta::list_detalles))
        .route("/cliente/{cliente_id}", get(handlers::venta::ventas_por_cliente))
        .route(
            "/{id}",
            get(handlers::venta::get_venta)
                .patch(handlers::venta::update_venta)
                .delete(handlers::venta::delete_venta),
        )
        .route("/{id}/estado", patch(handlers::venta::toggle_venta));

    // POST usa o id da venda; GET/PATCH/DELETE o id do detalhe
    let detalle_routes = Router::new().route(
        "/{id}",
        post(handlers::detalle_venta::add_detalle)
            .get(handlers::detalle_venta::get_detalle)
            .patch(handlers::detalle_venta::update_detalle)
            .delete(handlers::detalle_venta::delete_detalle),
    );

    let exportar_routes = Router::new()
        .route("/inventarios", get(handlers::exportar::exportar_inventarios))
        .route("/ventas", get(handlers::exportar::exportar_ventas))
        .route("/ventas/cliente/{cliente_id}", get(handlers::exportar::exportar_ventas_cliente))
        .route("/clientes", get(handlers::exportar::exportar_clientes))
        .route("/categorias", get(handlers::exportar::exportar_categorias))
        .route("/productos", get(handlers::exportar::exportar_productos))
        .route("/usuarios", get(handlers::exportar::exportar_usuarios))
        .route("/movimientos/producto/{producto_id}", get(handlers::exportar::exportar_movimientos_producto))
        .route("/movimientos/usuario/{usuario_id}", get(handlers::exportar::exportar_movimientos_usuario))
        .route("/movimiento_inventarios", get(handlers::exportar::exportar_movimientos))
        .route("/detalles/{venta_id}", get(handlers::exportar::exportar_detalles_venta));

    let protegidas = Router::new()
        .nest("/usuarios", usuario_routes)
        .nest("/categorias", categoria_routes)
        .nest("/productos", producto_routes)
        .nest("/clientes", cliente_routes)
        .nest("/inventarios", inventario_routes)
        .nest("/ventas", venta_routes)
        .nest("/detalle_venta", detalle_routes)
        .nest("/exportar", exportar_routes)
        .layer(guard);

    let api = Router::new()
        .nest("/auth", auth_publicas.merge(auth_protegidas))
        .merge(protegidas);

    Router::new()
        .route("/api/v1", get(handlers::health::health))
        .route("/api/v1/", get(handlers::health::health))
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors(&app_state.settings.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
