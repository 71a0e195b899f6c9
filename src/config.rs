// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        CategoriaRepository, ClienteRepository, InventarioRepository, MovimientoRepository, ProductoRepository,
        UsuarioRepository, VentaRepository,
    },
    services::{
        auth::AuthService, categoria_service::CategoriaService, cliente_service::ClienteService,
        export_service::ExportService, inventario_service::InventarioService, producto_service::ProductoService,
        usuario_service::UsuarioService, venta_service::VentaService,
    },
};

/// Configuração lida do ambiente (.env)
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub stock_minimo: i32,
    pub bind_addr: String,
    pub cors_origin: String,
    pub db_max_connections: u32,
}

fn opcional<T: std::str::FromStr>(nome: &str, padrao: T) -> anyhow::Result<T> {
    match env::var(nome) {
        Ok(valor) if !valor.trim().is_empty() => valor
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} tem um valor inválido: {}", nome, valor)),
        _ => Ok(padrao),
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            secret_key: env::var("SECRET_KEY").context("SECRET_KEY deve ser definida")?,
            access_token_expire_minutes: opcional("ACCESS_TOKEN_EXPIRE_MINUTES", 60)?,
            stock_minimo: opcional("STOCK_MINIMO", 5)?,
            bind_addr: opcional("BIND_ADDR", "0.0.0.0:8000".to_string())?,
            cors_origin: opcional("CORS_ORIGIN", "http://localhost:5173".to_string())?,
            db_max_connections: opcional("DB_MAX_CONNECTIONS", 5)?,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Settings,
    pub auth_service: AuthService,
    pub usuario_service: UsuarioService,
    pub categoria_service: CategoriaService,
    pub producto_service: ProductoService,
    pub cliente_service: ClienteService,
    pub inventario_service: InventarioService,
    pub venta_service: VentaService,
    pub export_service: ExportService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let settings = Settings::from_env()?;

        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_parts(db_pool, settings))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_parts(db_pool: PgPool, settings: Settings) -> Self {
        let usuario_repo = UsuarioRepository::new(db_pool.clone());
        let categoria_repo = CategoriaRepository::new(db_pool.clone());
        let producto_repo = ProductoRepository::new(db_pool.clone());
        let cliente_repo = ClienteRepository::new(db_pool.clone());
        let inventario_repo = InventarioRepository::new(db_pool.clone());
        let movimiento_repo = MovimientoRepository::new(db_pool.clone());
        let venta_repo = VentaRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            usuario_repo.clone(),
            settings.secret_key.clone(),
            settings.access_token_expire_minutes,
        );
        let usuario_service = UsuarioService::new(usuario_repo.clone());
        let categoria_service = CategoriaService::new(categoria_repo.clone());
        let producto_service = ProductoService::new(
            producto_repo.clone(),
            categoria_repo.clone(),
            inventario_repo.clone(),
            db_pool.clone(),
        );
        let cliente_service = ClienteService::new(cliente_repo.clone());
        let inventario_service = InventarioService::new(
            inventario_repo.clone(),
            movimiento_repo.clone(),
            producto_repo.clone(),
            db_pool.clone(),
            settings.stock_minimo,
        );
        let venta_service = VentaService::new(
            venta_repo.clone(),
            cliente_repo.clone(),
            producto_repo.clone(),
            inventario_repo.clone(),
            movimiento_repo.clone(),
            db_pool.clone(),
        );
        let export_service = ExportService::new(
            inventario_repo,
            venta_repo,
            cliente_repo,
            categoria_repo,
            producto_repo,
            usuario_repo,
            movimiento_repo,
        );

        Self {
            db_pool,
            settings,
            auth_service,
            usuario_service,
            categoria_service,
            producto_service,
            cliente_service,
            inventario_service,
            venta_service,
            export_service,
        }
    }
}
