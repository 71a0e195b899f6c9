// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UsuarioRepository,
    models::{
        auth::{Claims, TokenResponse},
        usuario::{Usuario, UsuarioCreate, UsuarioRead, ROL_USUARIO},
    },
};

const MSG_CREDENCIALES_INCORRECTAS: &str = "Credenciales incorrectas";
const MSG_USUARIO_INACTIVO: &str = "Usuario inactivo, contacte al administrador";

/// Hash bcrypt fora do runtime assíncrono.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hashed = hashed.to_owned();
    let ok = tokio::task::spawn_blocking(move || verify(&password, &hashed))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(ok)
}

#[derive(Clone)]
pub struct AuthService {
    usuario_repo: UsuarioRepository,
    jwt_secret: String,
    expire_minutes: i64,
}

impl AuthService {
    pub fn new(usuario_repo: UsuarioRepository, jwt_secret: String, expire_minutes: i64) -> Self {
        Self { usuario_repo, jwt_secret, expire_minutes }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AppError> {
        let usuario = self
            .usuario_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(MSG_CREDENCIALES_INCORRECTAS.into()))?;

        // Hash corrompido no banco conta como senha errada
        let valida = verify_password(password, &usuario.contrasena).await.unwrap_or(false);
        if !valida {
            return Err(AppError::Unauthorized(MSG_CREDENCIALES_INCORRECTAS.into()));
        }

        if !usuario.estado {
            return Err(AppError::Unauthorized(MSG_USUARIO_INACTIVO.into()));
        }

        tracing::info!(usuario_id = usuario.id, "🔑 Login efetuado");
        Ok(TokenResponse::bearer(self.create_token(&usuario.email)?))
    }

    pub async fn register(&self, payload: &UsuarioCreate) -> Result<UsuarioRead, AppError> {
        if self.usuario_repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::conflict(format!(
                "El usuario con email {} ya existe.",
                payload.email
            )));
        }

        let hashed = hash_password(&payload.contrasena).await?;
        let usuario = self
            .usuario_repo
            .create(
                &payload.nombre,
                &payload.email,
                &hashed,
                payload.rol_id.unwrap_or(ROL_USUARIO),
                payload.estado.unwrap_or(true),
            )
            .await?;

        Ok(usuario.into())
    }

    /// Resolve o portador do token. Qualquer falha vira 401 genérico.
    pub async fn validate_token(&self, token: &str) -> Result<Usuario, AppError> {
        let claims = self.decode_token(token)?;
        self.usuario_repo
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(AppError::credenciales)
    }

    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &DecodingKey::from_secret(self.jwt_secret.as_ref()), &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::credenciales())
    }

    pub fn create_token(&self, email: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(self.expire_minutes);

        let claims = Claims {
            sub: email.to_string(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service(secret: &str, minutes: i64) -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/sonyco_test")
            .unwrap();
        AuthService::new(UsuarioRepository::new(pool), secret.to_string(), minutes)
    }

    #[tokio::test]
    async fn token_carrega_email_como_subject() {
        let svc = service("segredo", 60);
        let token = svc.create_token("admin@admin.com").unwrap();
        let claims = svc.decode_token(&token).unwrap();
        assert_eq!(claims.sub, "admin@admin.com");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn token_de_outro_segredo_e_rejeitado() {
        let token = service("outro", 60).create_token("admin@admin.com").unwrap();
        let err = service("segredo", 60).decode_token(&token).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_expirado_e_rejeitado() {
        let svc = service("segredo", -10);
        let token = svc.create_token("admin@admin.com").unwrap();
        assert!(svc.decode_token(&token).is_err());
    }

    #[tokio::test]
    async fn hash_confere_com_a_senha() {
        let hashed = hash_password("admin").await.unwrap();
        assert!(verify_password("admin", &hashed).await.unwrap());
        assert!(!verify_password("outra", &hashed).await.unwrap());
    }
}
