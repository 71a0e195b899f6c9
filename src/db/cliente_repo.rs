// src/db/cliente_repo.rs

use sqlx::PgPool;

use crate::{
    common::{
        error::AppError,
        pagination::{like_term, PageRequest, SortSpec},
    },
    db::paging::{fetch_page, fetch_slice},
    models::{
        cliente::{Cliente, ClienteFiltro, TipoPersona},
        shared::ItemSimple,
    },
};

const COLUMNS: &str = "id, nombre, email, telefono, direccion, tipo_persona, identificacion, estado";
const SELECT: &str = "SELECT cl.id, cl.nombre, cl.email, cl.telefono, cl.direccion, cl.tipo_persona, \
                      cl.identificacion, cl.estado";
const FROM: &str = "FROM clientes cl";

pub const SORT: SortSpec = SortSpec {
    columns: &[
        ("id", "cl.id"),
        ("nombre", "cl.nombre"),
        ("email", "cl.email"),
        ("telefono", "cl.telefono"),
        ("direccion", "cl.direccion"),
        ("tipo_persona", "cl.tipo_persona"),
        ("identificacion", "cl.identificacion"),
        ("estado", "cl.estado"),
    ],
    default: "cl.id",
};

#[derive(Debug, Clone)]
pub struct ClienteData<'a> {
    pub nombre: &'a str,
    pub email: &'a str,
    pub telefono: Option<&'a str>,
    pub direccion: Option<&'a str>,
    pub tipo_persona: TipoPersona,
    pub identificacion: &'a str,
    pub estado: bool,
}

#[derive(Clone)]
pub struct ClienteRepository {
    pool: PgPool,
}

impl ClienteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Cliente>, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>(&format!("{SELECT} {FROM} WHERE cl.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cliente)
    }

    /// Outro cliente (diferente de `excepto`) já usa este email?
    pub async fn email_en_uso(&self, email: &str, excepto: Option<i32>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM clientes WHERE email = $1 AND ($2::INT IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(excepto)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn identificacion_en_uso(&self, identificacion: &str, excepto: Option<i32>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM clientes WHERE identificacion = $1 AND ($2::INT IS NULL OR id <> $2))",
        )
        .bind(identificacion)
        .bind(excepto)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn list(&self, filtro: &ClienteFiltro, req: &PageRequest) -> Result<(Vec<Cliente>, i64), AppError> {
        let like = like_term(filtro.search.as_deref());
        let tipo = filtro.tipo_persona;
        let estado = filtro.estado;

        let page = fetch_page(
            &self.pool,
            SELECT,
            FROM,
            |qb| {
                qb.push(" WHERE 1=1");
                if let Some(like) = &like {
                    qb.push(" AND (cl.nombre ILIKE ").push_bind(like.clone());
                    qb.push(" OR cl.identificacion ILIKE ").push_bind(like.clone());
                    qb.push(" OR cl.email ILIKE ").push_bind(like.clone()).push(")");
                }
                if let Some(tipo) = tipo {
                    qb.push(" AND cl.tipo_persona = ").push_bind(tipo);
                }
                if let Some(estado) = estado {
                    qb.push(" AND cl.estado = ").push_bind(estado);
                }
            },
            &SORT,
            req,
        )
        .await?;
        Ok(page)
    }

    pub async fn infinite(&self, search: Option<&str>, skip: i64, limit: i64) -> Result<Vec<ItemSimple>, AppError> {
        let like = like_term(search);
        let items = fetch_slice(
            &self.pool,
            "SELECT cl.id, cl.nombre FROM clientes cl",
            |qb| {
                qb.push(" WHERE cl.estado = TRUE");
                if let Some(like) = &like {
                    qb.push(" AND cl.nombre ILIKE ").push_bind(like.clone());
                }
            },
            "cl.nombre",
            skip,
            limit,
        )
        .await?;
        Ok(items)
    }

    pub async fn all(&self) -> Result<Vec<Cliente>, AppError> {
        let clientes = sqlx::query_as::<_, Cliente>(&format!("{SELECT} {FROM} ORDER BY cl.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(clientes)
    }

    /// Clientes distintos com pelo menos uma venda.
    pub async fn count_con_ventas(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT cliente_id) FROM ventas")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn create(&self, data: &ClienteData<'_>) -> Result<Cliente, sqlx::Error> {
        sqlx::query_as::<_, Cliente>(&format!(
            "INSERT INTO clientes (nombre, email, telefono, direccion, tipo_persona, identificacion, estado) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COLUMNS}"
        ))
        .bind(data.nombre)
        .bind(data.email)
        .bind(data.telefono)
        .bind(data.direccion)
        .bind(data.tipo_persona)
        .bind(data.identificacion)
        .bind(data.estado)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn save(&self, id: i32, data: &ClienteData<'_>) -> Result<Cliente, sqlx::Error> {
        sqlx::query_as::<_, Cliente>(&format!(
            "UPDATE clientes SET nombre = $2, email = $3, telefono = $4, direccion = $5, \
             tipo_persona = $6, identificacion = $7, estado = $8 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(data.nombre)
        .bind(data.email)
        .bind(data.telefono)
        .bind(data.direccion)
        .bind(data.tipo_persona)
        .bind(data.identificacion)
        .bind(data.estado)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn toggle_estado(&self, id: i32) -> Result<Option<Cliente>, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>(&format!(
            "UPDATE clientes SET estado = NOT estado WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(cliente)
    }

    pub async fn has_ventas(&self, id: i32) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM ventas WHERE cliente_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clientes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
