// src/db/movimiento_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{
        error::AppError,
        pagination::{like_term, PageRequest, SortSpec},
    },
    db::paging::fetch_page,
    models::inventario::{MovimientoFiltro, MovimientoRow, NuevoMovimiento},
};

const SELECT: &str = "SELECT m.id, m.tipo, m.producto_id, m.cantidad, m.cantidad_inventario, m.fecha, \
                      m.usuario_id, m.venta_id, p.codigo AS producto_codigo, p.nombre AS producto_nombre, \
                      p.unidad_medida AS producto_unidad, p.estado AS producto_estado, \
                      u.nombre AS usuario_nombre";
const FROM: &str = "FROM movimientos_inventario m \
                    JOIN productos p ON p.id = m.producto_id \
                    JOIN usuarios u ON u.id = m.usuario_id";

pub const SORT: SortSpec = SortSpec {
    columns: &[
        ("id", "m.id"),
        ("tipo", "m.tipo"),
        ("cantidad", "m.cantidad"),
        ("cantidad_inventario", "m.cantidad_inventario"),
        ("fecha", "m.fecha"),
        ("venta_id", "m.venta_id"),
        ("usuario_nombre", "u.nombre"),
        ("producto_nombre", "p.nombre"),
    ],
    default: "m.fecha DESC, m.id DESC",
};

/// Recorte do histórico de movimentações.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovimientoScope {
    Todos,
    Producto(i32),
    Usuario(i32),
}

#[derive(Clone)]
pub struct MovimientoRepository {
    pool: PgPool,
}

impl MovimientoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<MovimientoRow>, AppError> {
        let row = sqlx::query_as::<_, MovimientoRow>(&format!("{SELECT} {FROM} WHERE m.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list(
        &self,
        scope: MovimientoScope,
        filtro: &MovimientoFiltro,
        req: &PageRequest,
    ) -> Result<(Vec<MovimientoRow>, i64), AppError> {
        let like = like_term(filtro.search.as_deref());
        let tipo = filtro.tipo;

        let page = fetch_page(
            &self.pool,
            SELECT,
            FROM,
            |qb| {
                qb.push(" WHERE 1=1");
                match scope {
                    MovimientoScope::Todos => {}
                    MovimientoScope::Producto(id) => {
                        qb.push(" AND m.producto_id = ").push_bind(id);
                    }
                    MovimientoScope::Usuario(id) => {
                        qb.push(" AND m.usuario_id = ").push_bind(id);
                    }
                }
                if let Some(tipo) = tipo {
                    qb.push(" AND m.tipo = ").push_bind(tipo);
                }
                if let Some(like) = &like {
                    qb.push(" AND (u.nombre ILIKE ").push_bind(like.clone());
                    qb.push(" OR p.nombre ILIKE ").push_bind(like.clone());
                    qb.push(" OR p.codigo ILIKE ").push_bind(like.clone()).push(")");
                }
            },
            &SORT,
            req,
        )
        .await?;
        Ok(page)
    }

    /// Histórico completo de um recorte, para os relatórios.
    pub async fn all(&self, scope: MovimientoScope) -> Result<Vec<MovimientoRow>, AppError> {
        let (filtro, id) = match scope {
            MovimientoScope::Todos => ("", None),
            MovimientoScope::Producto(id) => (" WHERE m.producto_id = $1", Some(id)),
            MovimientoScope::Usuario(id) => (" WHERE m.usuario_id = $1", Some(id)),
        };
        let sql = format!("{SELECT} {FROM}{filtro} ORDER BY m.id");
        let mut query = sqlx::query_as::<_, MovimientoRow>(&sql);
        if let Some(id) = id {
            query = query.bind(id);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    // Log imutável: só existe inserção.
    pub async fn insert<'e, E>(&self, executor: E, mov: &NuevoMovimiento) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO movimientos_inventario \
             (tipo, producto_id, cantidad, cantidad_inventario, usuario_id, venta_id, fecha) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW()) RETURNING id",
        )
        .bind(mov.tipo)
        .bind(mov.producto_id)
        .bind(mov.cantidad)
        .bind(mov.cantidad_inventario)
        .bind(mov.usuario_id)
        .bind(mov.venta_id)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }
}
