// src/db/usuario_repo.rs

use sqlx::PgPool;

use crate::{
    common::{
        error::{map_unique, AppError},
        pagination::{like_term, PageRequest, SortSpec},
    },
    db::paging::fetch_page,
    models::usuario::{Usuario, UsuarioFiltro},
};

const SELECT: &str = "SELECT u.id, u.nombre, u.email, u.contrasena, u.rol_id, u.estado";
const FROM: &str = "FROM usuarios u";

pub const SORT: SortSpec = SortSpec {
    columns: &[
        ("id", "u.id"),
        ("nombre", "u.nombre"),
        ("email", "u.email"),
        ("rol_id", "u.rol_id"),
        ("estado", "u.estado"),
    ],
    default: "u.id",
};

// O repositório de usuários, responsável por todas as interações com a tabela 'usuarios'
#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(&format!("{SELECT} {FROM} WHERE u.email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(&format!("{SELECT} {FROM} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    pub async fn list(
        &self,
        filtro: &UsuarioFiltro,
        req: &PageRequest,
    ) -> Result<(Vec<Usuario>, i64), AppError> {
        let like = like_term(filtro.search.as_deref());
        let estado = filtro.estado;

        let page = fetch_page(
            &self.pool,
            SELECT,
            FROM,
            |qb| {
                qb.push(" WHERE 1=1");
                if let Some(like) = &like {
                    qb.push(" AND (u.nombre ILIKE ").push_bind(like.clone());
                    qb.push(" OR u.email ILIKE ").push_bind(like.clone()).push(")");
                }
                if let Some(estado) = estado {
                    qb.push(" AND u.estado = ").push_bind(estado);
                }
            },
            &SORT,
            req,
        )
        .await?;
        Ok(page)
    }

    pub async fn all(&self) -> Result<Vec<Usuario>, AppError> {
        let usuarios = sqlx::query_as::<_, Usuario>(&format!("{SELECT} {FROM} ORDER BY u.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(usuarios)
    }

    // Cria um novo usuário no banco de dados
    pub async fn create(
        &self,
        nombre: &str,
        email: &str,
        contrasena_hash: &str,
        rol_id: i32,
        estado: bool,
    ) -> Result<Usuario, AppError> {
        sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (nombre, email, contrasena, rol_id, estado)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, nombre, email, contrasena, rol_id, estado
            "#,
        )
        .bind(nombre)
        .bind(email)
        .bind(contrasena_hash)
        .bind(rol_id)
        .bind(estado)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique(e, |_| AppError::bad_request(format!("El usuario con email {} ya existe.", email)))
        })
    }

    // Grava o usuário inteiro; o serviço já aplicou o patch.
    pub async fn save(&self, u: &Usuario) -> Result<Usuario, AppError> {
        sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios
            SET nombre = $2, email = $3, contrasena = $4, rol_id = $5, estado = $6
            WHERE id = $1
            RETURNING id, nombre, email, contrasena, rol_id, estado
            "#,
        )
        .bind(u.id)
        .bind(&u.nombre)
        .bind(&u.email)
        .bind(&u.contrasena)
        .bind(u.rol_id)
        .bind(u.estado)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique(e, |_| AppError::bad_request(format!("El usuario con email {} ya existe.", u.email)))
        })
    }

    pub async fn toggle_estado(&self, id: i32) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            "UPDATE usuarios SET estado = NOT estado WHERE id = $1 \
             RETURNING id, nombre, email, contrasena, rol_id, estado",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(usuario)
    }

    /// Vendas ou movimentações impedem a exclusão.
    pub async fn has_relations(&self, id: i32) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM ventas WHERE usuario_id = $1) \
             OR EXISTS (SELECT 1 FROM movimientos_inventario WHERE usuario_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
