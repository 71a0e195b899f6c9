// src/db/venta_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgConnection, PgPool, Postgres};

use crate::{
    common::{
        error::AppError,
        pagination::{like_term, PageRequest, SortSpec},
    },
    db::paging::fetch_page,
    models::venta::{total_venta, DetalleFiltro, DetalleRow, DetalleVenta, Venta, VentaFiltro, VentaRow},
};

const SELECT: &str = "SELECT v.id, v.cliente_id, v.usuario_id, v.fecha, v.total, v.estado, \
                      cl.nombre AS cliente_nombre, u.nombre AS usuario_nombre";
const FROM: &str = "FROM ventas v \
                    JOIN clientes cl ON cl.id = v.cliente_id \
                    JOIN usuarios u ON u.id = v.usuario_id";

pub const SORT: SortSpec = SortSpec {
    columns: &[
        ("id", "v.id"),
        ("fecha", "v.fecha"),
        ("total", "v.total"),
        ("estado", "v.estado"),
        ("cliente_nombre", "cl.nombre"),
        ("usuario_nombre", "u.nombre"),
    ],
    default: "v.fecha DESC, v.id DESC",
};

const DET_SELECT: &str = "SELECT d.id, d.venta_id, d.producto_id, d.cantidad, d.precio_unitario, \
                          p.codigo AS producto_codigo, p.nombre AS producto_nombre, \
                          p.unidad_medida AS producto_unidad, p.estado AS producto_estado";
const DET_FROM: &str = "FROM detalle_ventas d JOIN productos p ON p.id = d.producto_id";

pub const DET_SORT: SortSpec = SortSpec {
    columns: &[
        ("id", "d.id"),
        ("cantidad", "d.cantidad"),
        ("precio_unitario", "d.precio_unitario"),
        ("producto_nombre", "p.nombre"),
        ("codigo", "p.codigo"),
    ],
    default: "d.id DESC",
};

#[derive(Clone)]
pub struct VentaRepository {
    pool: PgPool,
}

impl VentaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- VENDAS ---

    pub async fn find_by_id(&self, id: i32) -> Result<Option<VentaRow>, AppError> {
        let row = sqlx::query_as::<_, VentaRow>(&format!("{SELECT} {FROM} WHERE v.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list(&self, filtro: &VentaFiltro, req: &PageRequest) -> Result<(Vec<VentaRow>, i64), AppError> {
        let like = like_term(filtro.search.as_deref());
        let estado = filtro.estado;

        let page = fetch_page(
            &self.pool,
            SELECT,
            FROM,
            |qb| {
                qb.push(" WHERE 1=1");
                if let Some(like) = &like {
                    qb.push(" AND (cl.nombre ILIKE ").push_bind(like.clone());
                    qb.push(" OR u.nombre ILIKE ").push_bind(like.clone()).push(")");
                }
                if let Some(estado) = estado {
                    qb.push(" AND v.estado = ").push_bind(estado);
                }
            },
            &SORT,
            req,
        )
        .await?;
        Ok(page)
    }

    pub async fn by_cliente(&self, cliente_id: i32) -> Result<Vec<VentaRow>, AppError> {
        let rows = sqlx::query_as::<_, VentaRow>(&format!(
            "{SELECT} {FROM} WHERE v.cliente_id = $1 ORDER BY v.fecha DESC, v.id DESC"
        ))
        .bind(cliente_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn all(&self) -> Result<Vec<VentaRow>, AppError> {
        let rows = sqlx::query_as::<_, VentaRow>(&format!("{SELECT} {FROM} ORDER BY v.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn count_ultimos_30_dias(&self) -> Result<i64, AppError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM ventas WHERE fecha >= NOW() - INTERVAL '30 days'")
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    pub async fn create(&self, cliente_id: i32, usuario_id: i32) -> Result<i32, AppError> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO ventas (cliente_id, usuario_id, fecha, total, estado) \
             VALUES ($1, $2, NOW(), 0, TRUE) RETURNING id",
        )
        .bind(cliente_id)
        .bind(usuario_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn lock<'e, E>(&self, executor: E, id: i32) -> Result<Option<Venta>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let venta = sqlx::query_as::<_, Venta>(
            "SELECT id, cliente_id, usuario_id, fecha, total, estado FROM ventas WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(venta)
    }

    pub async fn update(&self, id: i32, cliente_id: i32, estado: bool) -> Result<(), AppError> {
        sqlx::query("UPDATE ventas SET cliente_id = $2, estado = $3 WHERE id = $1")
            .bind(id)
            .bind(cliente_id)
            .bind(estado)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn toggle_estado(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE ventas SET estado = NOT estado WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// O total é sempre derivado das linhas.
    /// Soma as linhas da venda e grava o total. Precisa da venda já bloqueada.
    pub async fn recompute_total(&self, conn: &mut PgConnection, venta_id: i32) -> Result<Decimal, AppError> {
        let lineas: Vec<(i32, Decimal)> =
            sqlx::query_as("SELECT cantidad, precio_unitario FROM detalle_ventas WHERE venta_id = $1")
                .bind(venta_id)
                .fetch_all(&mut *conn)
                .await?;
        let total = total_venta(lineas);

        sqlx::query("UPDATE ventas SET total = $2 WHERE id = $1")
            .bind(venta_id)
            .bind(total)
            .execute(&mut *conn)
            .await?;
        Ok(total)
    }

    pub async fn has_detalles(&self, id: i32) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM detalle_ventas WHERE venta_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM ventas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- DETALHES ---

    pub async fn detalles(&self, venta_id: i32) -> Result<Vec<DetalleRow>, AppError> {
        let rows = sqlx::query_as::<_, DetalleRow>(&format!(
            "{DET_SELECT} {DET_FROM} WHERE d.venta_id = $1 ORDER BY d.id"
        ))
        .bind(venta_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_detalles(
        &self,
        venta_id: i32,
        filtro: &DetalleFiltro,
        req: &PageRequest,
    ) -> Result<(Vec<DetalleRow>, i64), AppError> {
        let like = like_term(filtro.search.as_deref());

        let page = fetch_page(
            &self.pool,
            DET_SELECT,
            DET_FROM,
            |qb| {
                qb.push(" WHERE d.venta_id = ").push_bind(venta_id);
                if let Some(like) = &like {
                    qb.push(" AND (p.nombre ILIKE ").push_bind(like.clone());
                    qb.push(" OR p.codigo ILIKE ").push_bind(like.clone()).push(")");
                }
            },
            &DET_SORT,
            req,
        )
        .await?;
        Ok(page)
    }

    pub async fn find_detalle(&self, id: i32) -> Result<Option<DetalleRow>, AppError> {
        let row = sqlx::query_as::<_, DetalleRow>(&format!("{DET_SELECT} {DET_FROM} WHERE d.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn lock_detalle<'e, E>(&self, executor: E, id: i32) -> Result<Option<DetalleVenta>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let detalle = sqlx::query_as::<_, DetalleVenta>(
            "SELECT id, venta_id, producto_id, cantidad, precio_unitario FROM detalle_ventas WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(detalle)
    }

    pub async fn insert_detalle<'e, E>(
        &self,
        executor: E,
        venta_id: i32,
        producto_id: i32,
        cantidad: i32,
        precio_unitario: Decimal,
    ) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO detalle_ventas (venta_id, producto_id, cantidad, precio_unitario) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(venta_id)
        .bind(producto_id)
        .bind(cantidad)
        .bind(precio_unitario)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    pub async fn save_detalle<'e, E>(&self, executor: E, detalle: &DetalleVenta) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE detalle_ventas SET producto_id = $2, cantidad = $3, precio_unitario = $4 WHERE id = $1")
            .bind(detalle.id)
            .bind(detalle.producto_id)
            .bind(detalle.cantidad)
            .bind(detalle.precio_unitario)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_detalle<'e, E>(&self, executor: E, id: i32) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM detalle_ventas WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
