// src/db/categoria_repo.rs

use sqlx::PgPool;

use crate::{
    common::{
        error::AppError,
        pagination::{like_term, PageRequest, SortSpec},
    },
    db::paging::{fetch_page, fetch_slice},
    models::{
        categoria::{Categoria, CategoriaFiltro},
        shared::ItemSimple,
    },
};

const SELECT: &str = "SELECT c.id, c.nombre, c.descripcion, c.estado";
const FROM: &str = "FROM categorias c";

pub const SORT: SortSpec = SortSpec {
    columns: &[
        ("id", "c.id"),
        ("nombre", "c.nombre"),
        ("descripcion", "c.descripcion"),
        ("estado", "c.estado"),
    ],
    default: "c.nombre",
};

#[derive(Clone)]
pub struct CategoriaRepository {
    pool: PgPool,
}

impl CategoriaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Categoria>, AppError> {
        let categoria = sqlx::query_as::<_, Categoria>(&format!("{SELECT} {FROM} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(categoria)
    }

    pub async fn find_by_nombre(&self, nombre: &str) -> Result<Option<Categoria>, AppError> {
        let categoria = sqlx::query_as::<_, Categoria>(&format!("{SELECT} {FROM} WHERE c.nombre = $1"))
            .bind(nombre)
            .fetch_optional(&self.pool)
            .await?;
        Ok(categoria)
    }

    pub async fn list(
        &self,
        filtro: &CategoriaFiltro,
        req: &PageRequest,
    ) -> Result<(Vec<Categoria>, i64), AppError> {
        let like = like_term(filtro.search.as_deref());
        let estado = filtro.estado;

        let page = fetch_page(
            &self.pool,
            SELECT,
            FROM,
            |qb| {
                qb.push(" WHERE 1=1");
                if let Some(like) = &like {
                    qb.push(" AND c.nombre ILIKE ").push_bind(like.clone());
                }
                if let Some(estado) = estado {
                    qb.push(" AND c.estado = ").push_bind(estado);
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
            "SELECT c.id, c.nombre FROM categorias c",
            |qb| {
                qb.push(" WHERE c.estado = TRUE");
                if let Some(like) = &like {
                    qb.push(" AND c.nombre ILIKE ").push_bind(like.clone());
                }
            },
            "c.nombre",
            skip,
            limit,
        )
        .await?;
        Ok(items)
    }

    pub async fn all(&self) -> Result<Vec<Categoria>, AppError> {
        let categorias = sqlx::query_as::<_, Categoria>(&format!("{SELECT} {FROM} ORDER BY c.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(categorias)
    }

    pub async fn create(&self, nombre: &str, descripcion: Option<&str>, estado: bool) -> Result<Categoria, sqlx::Error> {
        sqlx::query_as::<_, Categoria>(
            "INSERT INTO categorias (nombre, descripcion, estado) VALUES ($1, $2, $3) \
             RETURNING id, nombre, descripcion, estado",
        )
        .bind(nombre)
        .bind(descripcion)
        .bind(estado)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn save(&self, c: &Categoria) -> Result<Categoria, sqlx::Error> {
        sqlx::query_as::<_, Categoria>(
            "UPDATE categorias SET nombre = $2, descripcion = $3, estado = $4 WHERE id = $1 \
             RETURNING id, nombre, descripcion, estado",
        )
        .bind(c.id)
        .bind(&c.nombre)
        .bind(&c.descripcion)
        .bind(c.estado)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn toggle_estado(&self, id: i32) -> Result<Option<Categoria>, AppError> {
        let categoria = sqlx::query_as::<_, Categoria>(
            "UPDATE categorias SET estado = NOT estado WHERE id = $1 \
             RETURNING id, nombre, descripcion, estado",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(categoria)
    }

    pub async fn has_productos(&self, id: i32) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM productos WHERE categoria_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categorias WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
