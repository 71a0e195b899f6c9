// src/db.rs

pub mod paging;
pub mod seed;

pub mod usuario_repo;
pub use usuario_repo::UsuarioRepository;
pub mod categoria_repo;
pub use categoria_repo::CategoriaRepository;
pub mod producto_repo;
pub use producto_repo::ProductoRepository;
pub mod cliente_repo;
pub use cliente_repo::ClienteRepository;
pub mod inventario_repo;
pub use inventario_repo::InventarioRepository;
pub mod movimiento_repo;
pub use movimiento_repo::MovimientoRepository;
pub mod venta_repo;
pub use venta_repo::VentaRepository;
