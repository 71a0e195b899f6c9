// src/services/cliente_service.rs

use crate::{
    common::{
        error::{map_unique, AppError},
        pagination::{PageRequest, Paged},
    },
    db::{cliente_repo::ClienteData, ClienteRepository},
    models::{
        cliente::{Cliente, ClienteCreate, ClienteFiltro, ClienteUpdate},
        shared::{ItemSimple, TotalResponse},
    },
};

const NO_ENCONTRADO: &str = "Cliente no encontrado";

#[derive(Clone)]
pub struct ClienteService {
    cliente_repo: ClienteRepository,
}

impl ClienteService {
    pub fn new(cliente_repo: ClienteRepository) -> Self {
        Self { cliente_repo }
    }

    pub async fn list(&self, filtro: &ClienteFiltro, req: &PageRequest) -> Result<Paged<Cliente>, AppError> {
        let (items, total) = self.cliente_repo.list(filtro, req).await?;
        Ok(Paged::new(items, total, req))
    }

    pub async fn infinite(&self, search: Option<&str>, skip: i64, limit: i64) -> Result<Vec<ItemSimple>, AppError> {
        self.cliente_repo.infinite(search, skip, limit).await
    }

    pub async fn con_ventas(&self) -> Result<TotalResponse, AppError> {
        Ok(TotalResponse { total: self.cliente_repo.count_con_ventas().await? })
    }

    pub async fn get(&self, id: i32) -> Result<Cliente, AppError> {
        self.cliente_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(NO_ENCONTRADO))
    }

    pub async fn create(&self, payload: &ClienteCreate) -> Result<Cliente, AppError> {
        if self.cliente_repo.email_en_uso(&payload.email, None).await? {
            return Err(AppError::conflict(format!("El cliente con email '{}' ya existe", payload.email)));
        }
        if self.cliente_repo.identificacion_en_uso(&payload.identificacion, None).await? {
            return Err(AppError::conflict(format!(
                "El cliente con identificación '{}' ya existe",
                payload.identificacion
            )));
        }

        let data = ClienteData {
            nombre: &payload.nombre,
            email: &payload.email,
            telefono: payload.telefono.as_deref(),
            direccion: payload.direccion.as_deref(),
            tipo_persona: payload.tipo_persona,
            identificacion: &payload.identificacion,
            estado: payload.estado.unwrap_or(true),
        };
        self.cliente_repo
            .create(&data)
            .await
            .map_err(|e| map_unique(e, |_| AppError::conflict("Ya existe un registro con estos datos")))
    }

    pub async fn update(&self, id: i32, patch: &ClienteUpdate) -> Result<Cliente, AppError> {
        let actual = self.get(id).await?;

        if let Some(email) = &patch.email {
            if *email != actual.email && self.cliente_repo.email_en_uso(email, Some(id)).await? {
                return Err(AppError::bad_request("Ya existe un cliente con este email."));
            }
        }
        if let Some(identificacion) = &patch.identificacion {
            if *identificacion != actual.identificacion
                && self.cliente_repo.identificacion_en_uso(identificacion, Some(id)).await?
            {
                return Err(AppError::bad_request("Ya existe un cliente con esta identificación."));
            }
        }

        let data = ClienteData {
            nombre: patch.nombre.as_deref().unwrap_or(&actual.nombre),
            email: patch.email.as_deref().unwrap_or(&actual.email),
            telefono: patch.telefono.as_deref().or(actual.telefono.as_deref()),
            direccion: patch.direccion.as_deref().or(actual.direccion.as_deref()),
            tipo_persona: patch.tipo_persona.unwrap_or(actual.tipo_persona),
            identificacion: patch.identificacion.as_deref().unwrap_or(&actual.identificacion),
            estado: patch.estado.unwrap_or(actual.estado),
        };
        self.cliente_repo
            .save(id, &data)
            .await
            .map_err(|e| map_unique(e, |_| AppError::bad_request("Ya existe un registro con estos datos")))
    }

    pub async fn toggle_estado(&self, id: i32) -> Result<Cliente, AppError> {
        self.cliente_repo
            .toggle_estado(id)
            .await?
            .ok_or_else(|| AppError::not_found(NO_ENCONTRADO))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.get(id).await?;
        if self.cliente_repo.has_ventas(id).await? {
            return Err(AppError::relaciones_activas());
        }
        self.cliente_repo.delete(id).await?;
        Ok(())
    }
}
