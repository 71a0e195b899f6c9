pub mod auth;
pub mod categoria;
pub mod cliente;
pub mod inventario;
pub mod producto;
pub mod shared;
pub mod usuario;
pub mod venta;
