// src/db/producto_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{
        error::AppError,
        pagination::{like_term, PageRequest, SortSpec},
    },
    db::paging::{fetch_page, fetch_slice},
    models::{
        producto::{ProductoFiltro, ProductoRow, UnidadMedida},
        shared::ItemSimple,
    },
};

const SELECT: &str = "SELECT p.id, p.codigo, p.nombre, p.descripcion, p.precio_unitario, \
                      p.unidad_medida, p.categoria_id, p.estado, c.nombre AS categoria_nombre";
const FROM: &str = "FROM productos p JOIN categorias c ON c.id = p.categoria_id";

pub const SORT: SortSpec = SortSpec {
    columns: &[
        ("id", "p.id"),
        ("codigo", "p.codigo"),
        ("nombre", "p.nombre"),
        ("precio_unitario", "p.precio_unitario"),
        ("unidad_medida", "p.unidad_medida"),
        ("estado", "p.estado"),
        ("categoria_nombre", "c.nombre"),
    ],
    default: "p.id",
};

// Campos graváveis de um produto (já validados pelo serviço)
#[derive(Debug, Clone)]
pub struct ProductoData<'a> {
    pub codigo: &'a str,
    pub nombre: &'a str,
    pub descripcion: Option<&'a str>,
    pub precio_unitario: Decimal,
    pub unidad_medida: UnidadMedida,
    pub categoria_id: i32,
    pub estado: bool,
}

#[derive(Clone)]
pub struct ProductoRepository {
    pool: PgPool,
}

impl ProductoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<ProductoRow>, AppError> {
        let row = sqlx::query_as::<_, ProductoRow>(&format!("{SELECT} {FROM} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_by_codigo(&self, codigo: &str) -> Result<Option<ProductoRow>, AppError> {
        let row = sqlx::query_as::<_, ProductoRow>(&format!("{SELECT} {FROM} WHERE p.codigo = $1"))
            .bind(codigo)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list(
        &self,
        filtro: &ProductoFiltro,
        req: &PageRequest,
    ) -> Result<(Vec<ProductoRow>, i64), AppError> {
        let like = like_term(filtro.search.as_deref());
        let categoria = like_term(filtro.categoria.as_deref());
        let estado = filtro.estado;

        let page = fetch_page(
            &self.pool,
            SELECT,
            FROM,
            |qb| {
                qb.push(" WHERE 1=1");
                if let Some(like) = &like {
                    qb.push(" AND (p.nombre ILIKE ").push_bind(like.clone());
                    qb.push(" OR p.codigo ILIKE ").push_bind(like.clone()).push(")");
                }
                if let Some(categoria) = &categoria {
                    qb.push(" AND c.nombre ILIKE ").push_bind(categoria.clone());
                }
                if let Some(estado) = estado {
                    qb.push(" AND p.estado = ").push_bind(estado);
                }
            },
            &SORT,
            req,
        )
        .await?;
        Ok(page)
    }

    pub async fn all(&self) -> Result<Vec<ProductoRow>, AppError> {
        let rows = sqlx::query_as::<_, ProductoRow>(&format!("{SELECT} {FROM} ORDER BY p.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM productos")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Produtos ativos que ainda não têm inventário (cadastro de inventário).
    pub async fn infinite_sin_inventario(
        &self,
        search: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ItemSimple>, AppError> {
        self.infinite(search, skip, limit, "NOT EXISTS (SELECT 1 FROM inventarios i WHERE i.producto_id = p.id)")
            .await
    }

    /// Produtos ativos com inventário ativo (entradas e saídas).
    pub async fn infinite_con_inventario(
        &self,
        search: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ItemSimple>, AppError> {
        self.infinite(
            search,
            skip,
            limit,
            "EXISTS (SELECT 1 FROM inventarios i WHERE i.producto_id = p.id AND i.estado = TRUE)",
        )
        .await
    }

    async fn infinite(
        &self,
        search: Option<&str>,
        skip: i64,
        limit: i64,
        condicion: &'static str,
    ) -> Result<Vec<ItemSimple>, AppError> {
        let like = like_term(search);
        let items = fetch_slice(
            &self.pool,
            "SELECT p.id, p.codigo || ': ' || p.nombre AS nombre FROM productos p",
            |qb| {
                qb.push(" WHERE p.estado = TRUE AND ").push(condicion);
                if let Some(like) = &like {
                    qb.push(" AND (p.nombre ILIKE ").push_bind(like.clone());
                    qb.push(" OR p.codigo ILIKE ").push_bind(like.clone()).push(")");
                }
            },
            "p.nombre",
            skip,
            limit,
        )
        .await?;
        Ok(items)
    }

    // Retorna o id; a leitura com a categoria é feita depois.
    pub async fn create(&self, data: &ProductoData<'_>) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO productos (codigo, nombre, descripcion, precio_unitario, unidad_medida, categoria_id, estado) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(data.codigo)
        .bind(data.nombre)
        .bind(data.descripcion)
        .bind(data.precio_unitario)
        .bind(data.unidad_medida)
        .bind(data.categoria_id)
        .bind(data.estado)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn save<'e, E>(&self, executor: E, id: i32, data: &ProductoData<'_>) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE productos SET codigo = $2, nombre = $3, descripcion = $4, precio_unitario = $5, \
             unidad_medida = $6, categoria_id = $7, estado = $8 WHERE id = $1",
        )
        .bind(id)
        .bind(data.codigo)
        .bind(data.nombre)
        .bind(data.descripcion)
        .bind(data.precio_unitario)
        .bind(data.unidad_medida)
        .bind(data.categoria_id)
        .bind(data.estado)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn set_estado<'e, E>(&self, executor: E, id: i32, estado: bool) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE productos SET estado = $2 WHERE id = $1")
            .bind(id)
            .bind(estado)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Inventário, linhas de venda ou movimentações impedem a exclusão.
    pub async fn has_relations(&self, id: i32) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM inventarios WHERE producto_id = $1) \
             OR EXISTS (SELECT 1 FROM detalle_ventas WHERE producto_id = $1) \
             OR EXISTS (SELECT 1 FROM movimientos_inventario WHERE producto_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM productos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
