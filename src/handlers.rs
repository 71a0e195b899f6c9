pub mod auth;
pub mod categoria;
pub mod cliente;
pub mod detalle_venta;
pub mod exportar;
pub mod health;
pub mod inventario;
pub mod producto;
pub mod usuario;
pub mod venta;
