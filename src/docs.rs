// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::common::pagination::SortOrder;

#[derive(OpenApi)]
#[openapi(
    info(title = "SONYCO API", description = "Administração de inventário, clientes e vendas"),
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Auth ---
        handlers::auth::login,
        handlers::auth::register,
        handlers::auth::get_me,
        handlers::auth::get_perfil,

        // --- Usuarios ---
        handlers::usuario::list_usuarios,
        handlers::usuario::create_usuario,
        handlers::usuario::get_usuario,
        handlers::usuario::update_usuario,
        handlers::usuario::toggle_usuario,
        handlers::usuario::delete_usuario,

        // --- Categorias ---
        handlers::categoria::list_categorias,
        handlers::categoria::create_categoria,
        handlers::categoria::infinite_categorias,
        handlers::categoria::get_categoria,
        handlers::categoria::update_categoria,
        handlers::categoria::toggle_categoria,
        handlers::categoria::delete_categoria,

        // --- Productos ---
        handlers::producto::list_productos,
        handlers::producto::create_producto,
        handlers::producto::total_productos,
        handlers::producto::get_producto_by_codigo,
        handlers::producto::infinite_sin_inventario,
        handlers::producto::infinite_con_inventario,
        handlers::producto::get_producto,
        handlers::producto::update_producto,
        handlers::producto::toggle_producto,
        handlers::producto::delete_producto,

        // --- Clientes ---
        handlers::cliente::list_clientes,
        handlers::cliente::create_cliente,
        handlers::cliente::infinite_clientes,
        handlers::cliente::clientes_con_ventas,
        handlers::cliente::get_cliente,
        handlers::cliente::update_cliente,
        handlers::cliente::toggle_cliente,
        handlers::cliente::delete_cliente,

        // --- Inventarios ---
        handlers::inventario::list_inventarios,
        handlers::inventario::register_inventario,
        handlers::inventario::stock_bajo,
        handlers::inventario::get_inventario_by_producto,
        handlers::inventario::get_inventario,
        handlers::inventario::update_inventario,
        handlers::inventario::toggle_inventario,
        handlers::inventario::entrada,
        handlers::inventario::salida,
        handlers::inventario::list_movimientos,
        handlers::inventario::movimientos_por_producto,
        handlers::inventario::movimientos_por_usuario,
        handlers::inventario::get_movimiento,

        // --- Ventas ---
        handlers::venta::list_ventas,
        handlers::venta::create_venta,
        handlers::venta::ventas_30_dias,
        handlers::venta::list_detalles,
        handlers::venta::ventas_por_cliente,
        handlers::venta::get_venta,
        handlers::venta::update_venta,
        handlers::venta::toggle_venta,
        handlers::venta::delete_venta,

        // --- Detalle Venta ---
        handlers::detalle_venta::add_detalle,
        handlers::detalle_venta::get_detalle,
        handlers::detalle_venta::update_detalle,
        handlers::detalle_venta::delete_detalle,

        // --- Exportar ---
        handlers::exportar::exportar_inventarios,
        handlers::exportar::exportar_ventas,
        handlers::exportar::exportar_ventas_cliente,
        handlers::exportar::exportar_clientes,
        handlers::exportar::exportar_categorias,
        handlers::exportar::exportar_productos,
        handlers::exportar::exportar_usuarios,
        handlers::exportar::exportar_movimientos_producto,
        handlers::exportar::exportar_movimientos_usuario,
        handlers::exportar::exportar_movimientos,
        handlers::exportar::exportar_detalles_venta,
    ),
    components(
        schemas(
            SortOrder,

            // --- Shared ---
            models::shared::ItemSimple,
            models::shared::TotalResponse,
            models::shared::HealthResponse,

            // --- Auth ---
            models::auth::LoginPayload,
            models::auth::TokenResponse,

            // --- Usuarios ---
            models::usuario::UsuarioRead,
            models::usuario::UsuarioCreate,
            models::usuario::UsuarioUpdate,

            // --- Categorias ---
            models::categoria::Categoria,
            models::categoria::CategoriaCreate,
            models::categoria::CategoriaUpdate,

            // --- Productos ---
            models::producto::UnidadMedida,
            models::producto::ProductoRead,
            models::producto::ProductoSimple,
            models::producto::ProductoCreate,
            models::producto::ProductoUpdate,

            // --- Clientes ---
            models::cliente::TipoPersona,
            models::cliente::Cliente,
            models::cliente::ClienteCreate,
            models::cliente::ClienteUpdate,

            // --- Inventarios ---
            models::inventario::ProductoResumen,
            models::inventario::InventarioRead,
            models::inventario::InventarioCreate,
            models::inventario::InventarioUpdate,
            models::inventario::TipoMovimiento,
            models::inventario::MovimientoRead,
            models::inventario::MovimientoCreate,

            // --- Ventas ---
            models::venta::VentaRead,
            models::venta::VentaDetailRead,
            models::venta::VentaCreate,
            models::venta::VentaUpdate,
            models::venta::DetalleRead,
            models::venta::DetalleCreate,
            models::venta::DetalleUpdate,
        )
    ),
    tags(
        (name = "Health", description = "Estado da API"),
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Usuarios", description = "Gestão de Usuários (somente administradores)"),
        (name = "Clientes", description = "Cadastro de Clientes"),
        (name = "Productos", description = "Catálogo de Produtos"),
        (name = "Categorías", description = "Categorias de Produtos"),
        (name = "Inventarios", description = "Estoque e Movimentações"),
        (name = "Ventas", description = "Vendas"),
        (name = "Detalle Venta", description = "Linhas de Venda"),
        (name = "Exportar", description = "Relatórios em planilha")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
