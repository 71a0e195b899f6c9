// src/db/seed.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::usuario::{ROL_ADMIN, ROL_USUARIO},
};

const USUARIOS: [(&str, &str, &str, i32); 2] = [
    ("Admin", "admin@admin.com", "admin", ROL_ADMIN),
    ("Usuario", "user@user.com", "usuario", ROL_USUARIO),
];

const CATEGORIAS: [(&str, &str); 4] = [
    ("Calzado", "Calzado de seguridad y de trabajo"),
    ("Protección", "Elementos de protección personal"),
    ("Ferretería", "Herramientas y artículos de ferretería"),
    ("Ropa", "Ropa de trabajo y dotación"),
];

/// Dados iniciais. Pode rodar a cada boot: nada é sobrescrito.
pub async fn run(pool: &PgPool) -> Result<(), AppError> {
    let mut criados = 0u64;

    for (nombre, email, senha, rol_id) in USUARIOS {
        let existe: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM usuarios WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
        if existe {
            continue;
        }

        let senha = senha.to_owned();
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(senha, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        sqlx::query(
            "INSERT INTO usuarios (nombre, email, contrasena, rol_id, estado) \
             VALUES ($1, $2, $3, $4, TRUE) ON CONFLICT (email) DO NOTHING",
        )
        .bind(nombre)
        .bind(email)
        .bind(hash)
        .bind(rol_id)
        .execute(pool)
        .await?;
        criados += 1;
    }

    for (nombre, descripcion) in CATEGORIAS {
        let result = sqlx::query(
            "INSERT INTO categorias (nombre, descripcion, estado) VALUES ($1, $2, TRUE) \
             ON CONFLICT (nombre) DO NOTHING",
        )
        .bind(nombre)
        .bind(descripcion)
        .execute(pool)
        .await?;
        criados += result.rows_affected();
    }

    tracing::info!(registros = criados, "🌱 Seed concluído");
    Ok(())
}
