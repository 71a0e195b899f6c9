// src/models/cliente.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_persona", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoPersona {
    Natural,
    Juridica,
}

impl TipoPersona {
    pub fn as_str(self) -> &'static str {
        match self {
            TipoPersona::Natural => "natural",
            TipoPersona::Juridica => "juridica",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cliente {
    pub id: i32,
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub tipo_persona: TipoPersona,
    pub identificacion: String,
    pub estado: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ClienteCreate {
    #[validate(length(min = 1, max = 150, message = "El nombre es requerido"))]
    pub nombre: String,
    #[validate(email(message = "El email no es válido"))]
    pub email: String,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub tipo_persona: TipoPersona,
    #[validate(length(min = 1, max = 30, message = "La identificación es requerida"))]
    pub identificacion: String,
    pub estado: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ClienteUpdate {
    #[validate(length(min = 1, max = 150, message = "El nombre no puede estar vacío"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[validate(email(message = "El email no es válido"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_persona: Option<TipoPersona>,
    #[validate(length(min = 1, max = 30, message = "La identificación no puede estar vacía"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identificacion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<bool>,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClienteFiltro {
    /// Busca por nome, identificação ou email
    pub search: Option<String>,
    pub tipo_persona: Option<TipoPersona>,
    pub estado: Option<bool>,
}
