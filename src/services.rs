// src/services.rs

pub mod auth;
pub mod categoria_service;
pub mod cliente_service;
pub mod export_service;
pub mod inventario_service;
pub mod producto_service;
pub mod usuario_service;
pub mod venta_service;
