// src/models/usuario.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

pub const ROL_ADMIN: i32 = 1;
pub const ROL_USUARIO: i32 = 2;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, FromRow)]
pub struct Usuario {
    pub id: i32,
    pub nombre: String,
    pub email: String,
    pub contrasena: String,
    pub rol_id: i32,
    pub estado: bool,
}

impl Usuario {
    pub fn is_admin(&self) -> bool {
        self.rol_id == ROL_ADMIN
    }
}

// O que sai pela API (sem o hash da senha)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UsuarioRead {
    pub id: i32,
    pub nombre: String,
    pub email: String,
    pub rol_id: i32,
    pub estado: bool,
}

impl From<Usuario> for UsuarioRead {
    fn from(u: Usuario) -> Self {
        Self { id: u.id, nombre: u.nombre, email: u.email, rol_id: u.rol_id, estado: u.estado }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UsuarioCreate {
    #[validate(length(min = 1, max = 100, message = "El nombre es requerido"))]
    pub nombre: String,
    #[validate(email(message = "El email no es válido"))]
    pub email: String,
    #[validate(length(min = 1, message = "La contraseña es requerida"))]
    pub contrasena: String,
    #[validate(range(min = 1, max = 2, message = "Rol inválido"))]
    pub rol_id: Option<i32>,
    pub estado: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UsuarioUpdate {
    #[validate(length(min = 1, max = 100, message = "El nombre no puede estar vacío"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[validate(email(message = "El email no es válido"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrasena: Option<String>,
    #[validate(range(min = 1, max = 2, message = "Rol inválido"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rol_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<bool>,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsuarioFiltro {
    /// Busca por nome ou email
    pub search: Option<String>,
    pub estado: Option<bool>,
}
