// src/db/inventario_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{
        error::AppError,
        pagination::{like_term, PageRequest, SortSpec},
    },
    db::paging::fetch_page,
    models::inventario::{Inventario, InventarioFiltro, InventarioRow},
};

const SELECT: &str = "SELECT i.id, i.producto_id, i.cantidad, i.cantidad_minima, i.estado, \
                      p.codigo AS producto_codigo, p.nombre AS producto_nombre, \
                      p.precio_unitario AS producto_precio, p.unidad_medida AS producto_unidad, \
                      p.estado AS producto_estado, c.id AS categoria_id, c.nombre AS categoria_nombre";
const FROM: &str = "FROM inventarios i \
                    JOIN productos p ON p.id = i.producto_id \
                    JOIN categorias c ON c.id = p.categoria_id";

pub const SORT: SortSpec = SortSpec {
    columns: &[
        ("id", "i.id"),
        ("producto_id", "i.producto_id"),
        ("cantidad", "i.cantidad"),
        ("cantidad_minima", "i.cantidad_minima"),
        ("estado", "i.estado"),
        ("codigo", "p.codigo"),
        ("nombre", "p.nombre"),
        ("producto_nombre", "p.nombre"),
        ("precio_unitario", "p.precio_unitario"),
        ("categoria_nombre", "c.nombre"),
    ],
    default: "p.nombre",
};

#[derive(Clone)]
pub struct InventarioRepository {
    pool: PgPool,
}

impl InventarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn find_by_id(&self, id: i32) -> Result<Option<InventarioRow>, AppError> {
        let row = sqlx::query_as::<_, InventarioRow>(&format!("{SELECT} {FROM} WHERE i.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_by_producto(&self, producto_id: i32) -> Result<Option<InventarioRow>, AppError> {
        let row = sqlx::query_as::<_, InventarioRow>(&format!("{SELECT} {FROM} WHERE i.producto_id = $1"))
            .bind(producto_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list(
        &self,
        filtro: &InventarioFiltro,
        req: &PageRequest,
    ) -> Result<(Vec<InventarioRow>, i64), AppError> {
        let like = like_term(filtro.search.as_deref());
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
                if let Some(estado) = estado {
                    qb.push(" AND i.estado = ").push_bind(estado);
                }
            },
            &SORT,
            req,
        )
        .await?;
        Ok(page)
    }

    /// Itens abaixo do mínimo (`stock_minimo` quando o mínimo é nulo).
    pub async fn stock_bajo(
        &self,
        search: Option<&str>,
        stock_minimo: i32,
        req: &PageRequest,
    ) -> Result<(Vec<InventarioRow>, i64), AppError> {
        let like = like_term(search);

        let page = fetch_page(
            &self.pool,
            SELECT,
            FROM,
            |qb| {
                qb.push(" WHERE i.cantidad < COALESCE(i.cantidad_minima, ").push_bind(stock_minimo).push(")");
                if let Some(like) = &like {
                    qb.push(" AND (p.nombre ILIKE ").push_bind(like.clone());
                    qb.push(" OR p.codigo ILIKE ").push_bind(like.clone()).push(")");
                }
            },
            &SORT,
            req,
        )
        .await?;
        Ok(page)
    }

    pub async fn all(&self) -> Result<Vec<InventarioRow>, AppError> {
        let rows = sqlx::query_as::<_, InventarioRow>(&format!("{SELECT} {FROM} ORDER BY i.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // ---
    // Escrita (transacional)
    // ---
    // Os ajustes de saldo bloqueiam a linha com FOR UPDATE dentro da transação
    // do serviço, para que duas vendas simultâneas não leiam o mesmo saldo.

    pub async fn lock_by_producto<'e, E>(&self, executor: E, producto_id: i32) -> Result<Option<Inventario>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inventario = sqlx::query_as::<_, Inventario>(
            "SELECT id, producto_id, cantidad, cantidad_minima, estado \
             FROM inventarios WHERE producto_id = $1 FOR UPDATE",
        )
        .bind(producto_id)
        .fetch_optional(executor)
        .await?;
        Ok(inventario)
    }

    /// Bloqueia vários inventários de uma vez, sempre na ordem de `producto_id`.
    pub async fn lock_by_productos<'e, E>(&self, executor: E, producto_ids: &[i32]) -> Result<Vec<Inventario>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inventarios = sqlx::query_as::<_, Inventario>(
            "SELECT id, producto_id, cantidad, cantidad_minima, estado \
             FROM inventarios WHERE producto_id = ANY($1) ORDER BY producto_id FOR UPDATE",
        )
        .bind(producto_ids)
        .fetch_all(executor)
        .await?;
        Ok(inventarios)
    }

    pub async fn lock_by_id<'e, E>(&self, executor: E, id: i32) -> Result<Option<Inventario>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inventario = sqlx::query_as::<_, Inventario>(
            "SELECT id, producto_id, cantidad, cantidad_minima, estado FROM inventarios WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(inventario)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        producto_id: i32,
        cantidad: i32,
        cantidad_minima: i32,
        estado: bool,
    ) -> Result<i32, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar(
            "INSERT INTO inventarios (producto_id, cantidad, cantidad_minima, estado) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(producto_id)
        .bind(cantidad)
        .bind(cantidad_minima)
        .bind(estado)
        .fetch_one(executor)
        .await
    }

    pub async fn save<'e, E>(&self, executor: E, inventario: &Inventario) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE inventarios SET cantidad = $2, cantidad_minima = $3, estado = $4 WHERE id = $1")
            .bind(inventario.id)
            .bind(inventario.cantidad)
            .bind(inventario.cantidad_minima)
            .bind(inventario.estado)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn set_cantidad<'e, E>(&self, executor: E, id: i32, cantidad: i32) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE inventarios SET cantidad = $2 WHERE id = $1")
            .bind(id)
            .bind(cantidad)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn set_estado_by_producto<'e, E>(&self, executor: E, producto_id: i32, estado: bool) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE inventarios SET estado = $2 WHERE producto_id = $1")
            .bind(producto_id)
            .bind(estado)
            .execute(executor)
            .await?;
        Ok(())
    }
}
