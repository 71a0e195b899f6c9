// src/services/categoria_service.rs

use crate::{
    common::{
        error::{map_unique, AppError},
        pagination::{PageRequest, Paged},
    },
    db::CategoriaRepository,
    models::{
        categoria::{Categoria, CategoriaCreate, CategoriaFiltro, CategoriaUpdate},
        shared::ItemSimple,
    },
};

const NO_ENCONTRADA: &str = "Categoría no encontrada.";
const NOMBRE_DUPLICADO: &str = "Ya existe una categoría con ese nombre.";

#[derive(Clone)]
pub struct CategoriaService {
    categoria_repo: CategoriaRepository,
}

impl CategoriaService {
    pub fn new(categoria_repo: CategoriaRepository) -> Self {
        Self { categoria_repo }
    }

    pub async fn list(&self, filtro: &CategoriaFiltro, req: &PageRequest) -> Result<Paged<Categoria>, AppError> {
        let (items, total) = self.categoria_repo.list(filtro, req).await?;
        Ok(Paged::new(items, total, req))
    }

    pub async fn infinite(&self, search: Option<&str>, skip: i64, limit: i64) -> Result<Vec<ItemSimple>, AppError> {
        self.categoria_repo.infinite(search, skip, limit).await
    }

    pub async fn get(&self, id: i32) -> Result<Categoria, AppError> {
        self.categoria_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(NO_ENCONTRADA))
    }

    pub async fn create(&self, payload: &CategoriaCreate) -> Result<Categoria, AppError> {
        let duplicada = || AppError::bad_request(format!("Ya existe una categoría con el nombre '{}'.", payload.nombre));

        if self.categoria_repo.find_by_nombre(&payload.nombre).await?.is_some() {
            return Err(duplicada());
        }

        // A constraint UNIQUE cobre a corrida entre a checagem e o insert
        self.categoria_repo
            .create(&payload.nombre, payload.descripcion.as_deref(), payload.estado.unwrap_or(true))
            .await
            .map_err(|e| map_unique(e, |_| duplicada()))
    }

    pub async fn update(&self, id: i32, patch: &CategoriaUpdate) -> Result<Categoria, AppError> {
        let mut categoria = self.get(id).await?;

        if let Some(nombre) = &patch.nombre {
            if *nombre != categoria.nombre && self.categoria_repo.find_by_nombre(nombre).await?.is_some() {
                return Err(AppError::bad_request(NOMBRE_DUPLICADO));
            }
            categoria.nombre = nombre.clone();
        }
        if let Some(descripcion) = &patch.descripcion {
            categoria.descripcion = Some(descripcion.clone());
        }
        if let Some(estado) = patch.estado {
            categoria.estado = estado;
        }

        self.categoria_repo
            .save(&categoria)
            .await
            .map_err(|e| map_unique(e, |_| AppError::bad_request(NOMBRE_DUPLICADO)))
    }

    pub async fn toggle_estado(&self, id: i32) -> Result<Categoria, AppError> {
        self.categoria_repo
            .toggle_estado(id)
            .await?
            .ok_or_else(|| AppError::not_found(NO_ENCONTRADA))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.get(id).await?;
        if self.categoria_repo.has_productos(id).await? {
            return Err(AppError::relaciones_activas());
        }
        self.categoria_repo.delete(id).await?;
        Ok(())
    }
}
