// src/services/usuario_service.rs

use crate::{
    common::{
        error::AppError,
        pagination::{PageRequest, Paged},
    },
    db::UsuarioRepository,
    models::usuario::{UsuarioCreate, UsuarioFiltro, UsuarioRead, UsuarioUpdate, ROL_USUARIO},
    services::auth::hash_password,
};

const NO_ENCONTRADO: &str = "Usuario no encontrado";

#[derive(Clone)]
pub struct UsuarioService {
    usuario_repo: UsuarioRepository,
}

impl UsuarioService {
    pub fn new(usuario_repo: UsuarioRepository) -> Self {
        Self { usuario_repo }
    }

    pub async fn list(&self, filtro: &UsuarioFiltro, req: &PageRequest) -> Result<Paged<UsuarioRead>, AppError> {
        let (items, total) = self.usuario_repo.list(filtro, req).await?;
        Ok(Paged::new(items, total, req).map(UsuarioRead::from))
    }

    pub async fn get(&self, id: i32) -> Result<UsuarioRead, AppError> {
        self.usuario_repo
            .find_by_id(id)
            .await?
            .map(UsuarioRead::from)
            .ok_or_else(|| AppError::not_found(NO_ENCONTRADO))
    }

    pub async fn create(&self, payload: &UsuarioCreate) -> Result<UsuarioRead, AppError> {
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

    pub async fn update(&self, id: i32, patch: &UsuarioUpdate) -> Result<UsuarioRead, AppError> {
        let mut usuario = self
            .usuario_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(NO_ENCONTRADO))?;

        if let Some(email) = &patch.email {
            if *email != usuario.email && self.usuario_repo.find_by_email(email).await?.is_some() {
                return Err(AppError::bad_request(format!("El usuario con email {} ya existe.", email)));
            }
            usuario.email = email.clone();
        }
        if let Some(nombre) = &patch.nombre {
            usuario.nombre = nombre.clone();
        }
        // Senha vazia mantém a atual
        if let Some(contrasena) = patch.contrasena.as_deref().filter(|c| !c.is_empty()) {
            usuario.contrasena = hash_password(contrasena).await?;
        }
        if let Some(rol_id) = patch.rol_id {
            usuario.rol_id = rol_id;
        }
        if let Some(estado) = patch.estado {
            usuario.estado = estado;
        }

        Ok(self.usuario_repo.save(&usuario).await?.into())
    }

    pub async fn toggle_estado(&self, id: i32) -> Result<UsuarioRead, AppError> {
        self.usuario_repo
            .toggle_estado(id)
            .await?
            .map(UsuarioRead::from)
            .ok_or_else(|| AppError::not_found(NO_ENCONTRADO))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if self.usuario_repo.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found(NO_ENCONTRADO));
        }
        if self.usuario_repo.has_relations(id).await? {
            return Err(AppError::relaciones_activas());
        }
        self.usuario_repo.delete(id).await?;
        Ok(())
    }
}
