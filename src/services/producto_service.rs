// src/services/producto_service.rs

use sqlx::PgPool;

use crate::{
    common::{
        error::{map_unique, AppError},
        pagination::{PageRequest, Paged},
    },
    db::{producto_repo::ProductoData, CategoriaRepository, InventarioRepository, ProductoRepository},
    models::{
        producto::{ProductoCreate, ProductoFiltro, ProductoRead, ProductoUpdate},
        shared::{ItemSimple, TotalResponse},
    },
};

const NO_ENCONTRADO: &str = "Producto no encontrado";

fn codigo_duplicado(codigo: &str) -> AppError {
    AppError::bad_request(format!("El producto con código '{}' ya existe.", codigo))
}

#[derive(Clone)]
pub struct ProductoService {
    producto_repo: ProductoRepository,
    categoria_repo: CategoriaRepository,
    inventario_repo: InventarioRepository,
    pool: PgPool,
}

impl ProductoService {
    pub fn new(
        producto_repo: ProductoRepository,
        categoria_repo: CategoriaRepository,
        inventario_repo: InventarioRepository,
        pool: PgPool,
    ) -> Self {
        Self { producto_repo, categoria_repo, inventario_repo, pool }
    }

    pub async fn list(&self, filtro: &ProductoFiltro, req: &PageRequest) -> Result<Paged<ProductoRead>, AppError> {
        let (items, total) = self.producto_repo.list(filtro, req).await?;
        Ok(Paged::new(items, total, req).map(ProductoRead::from))
    }

    pub async fn total(&self) -> Result<TotalResponse, AppError> {
        Ok(TotalResponse { total: self.producto_repo.count().await? })
    }

    pub async fn infinite_sin_inventario(
        &self,
        search: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ItemSimple>, AppError> {
        self.producto_repo.infinite_sin_inventario(search, skip, limit).await
    }

    pub async fn infinite_con_inventario(
        &self,
        search: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ItemSimple>, AppError> {
        self.producto_repo.infinite_con_inventario(search, skip, limit).await
    }

    pub async fn get(&self, id: i32) -> Result<ProductoRead, AppError> {
        self.producto_repo
            .find_by_id(id)
            .await?
            .map(ProductoRead::from)
            .ok_or_else(|| AppError::not_found(NO_ENCONTRADO))
    }

    pub async fn get_by_codigo(&self, codigo: &str) -> Result<ProductoRead, AppError> {
        self.producto_repo
            .find_by_codigo(codigo)
            .await?
            .map(ProductoRead::from)
            .ok_or_else(|| AppError::not_found(NO_ENCONTRADO))
    }

    async fn ensure_categoria(&self, categoria_id: i32) -> Result<(), AppError> {
        match self.categoria_repo.find_by_id(categoria_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("Categoría no encontrada.")),
        }
    }

    pub async fn create(&self, payload: &ProductoCreate) -> Result<ProductoRead, AppError> {
        if self.producto_repo.find_by_codigo(&payload.codigo).await?.is_some() {
            return Err(codigo_duplicado(&payload.codigo));
        }
        self.ensure_categoria(payload.categoria_id).await?;

        let data = ProductoData {
            codigo: &payload.codigo,
            nombre: &payload.nombre,
            descripcion: payload.descripcion.as_deref(),
            precio_unitario: payload.precio_unitario,
            unidad_medida: payload.unidad_medida,
            categoria_id: payload.categoria_id,
            estado: payload.estado.unwrap_or(true),
        };
        let id = self
            .producto_repo
            .create(&data)
            .await
            .map_err(|e| map_unique(e, |_| codigo_duplicado(&payload.codigo)))?;

        self.get(id).await
    }

    pub async fn update(&self, id: i32, patch: &ProductoUpdate) -> Result<ProductoRead, AppError> {
        let actual = self.get(id).await?;

        if let Some(codigo) = &patch.codigo {
            if *codigo != actual.codigo && self.producto_repo.find_by_codigo(codigo).await?.is_some() {
                return Err(codigo_duplicado(codigo));
            }
        }
        if let Some(categoria_id) = patch.categoria_id {
            if categoria_id != actual.categoria_id {
                self.ensure_categoria(categoria_id).await?;
            }
        }

        let codigo = patch.codigo.as_deref().unwrap_or(&actual.codigo);
        let data = ProductoData {
            codigo,
            nombre: patch.nombre.as_deref().unwrap_or(&actual.nombre),
            descripcion: patch.descripcion.as_deref().or(actual.descripcion.as_deref()),
            precio_unitario: patch.precio_unitario.unwrap_or(actual.precio_unitario),
            unidad_medida: patch.unidad_medida.unwrap_or(actual.unidad_medida),
            categoria_id: patch.categoria_id.unwrap_or(actual.categoria_id),
            estado: patch.estado.unwrap_or(actual.estado),
        };

        let mut tx = self.pool.begin().await?;
        self.producto_repo
            .save(&mut *tx, id, &data)
            .await
            .map_err(|e| map_unique(e, |_| codigo_duplicado(codigo)))?;
        // Estado do produto e do seu inventário andam juntos
        if data.estado != actual.estado {
            self.inventario_repo.set_estado_by_producto(&mut *tx, id, data.estado).await?;
        }
        tx.commit().await?;

        self.get(id).await
    }

    pub async fn toggle_estado(&self, id: i32) -> Result<ProductoRead, AppError> {
        let actual = self.get(id).await?;
        let estado = !actual.estado;

        let mut tx = self.pool.begin().await?;
        self.producto_repo.set_estado(&mut *tx, id, estado).await?;
        self.inventario_repo.set_estado_by_producto(&mut *tx, id, estado).await?;
        tx.commit().await?;

        tracing::info!(producto_id = id, estado, "Estado do produto alterado");
        self.get(id).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.get(id).await?;
        if self.producto_repo.has_relations(id).await? {
            return Err(AppError::relaciones_activas());
        }
        self.producto_repo.delete(id).await?;
        Ok(())
    }
}
