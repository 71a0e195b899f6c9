// src/models/producto.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::shared::ItemSimple;

// Mapeia o CREATE TYPE unidad_medida do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "unidad_medida")]
pub enum UnidadMedida {
    Unidad,
    Kilogramo,
    Litro,
    Caja,
    Metro,
    Paquete,
    Servicio,
}

impl UnidadMedida {
    pub const TODAS: [UnidadMedida; 7] = [
        UnidadMedida::Unidad,
        UnidadMedida::Kilogramo,
        UnidadMedida::Litro,
        UnidadMedida::Caja,
        UnidadMedida::Metro,
        UnidadMedida::Paquete,
        UnidadMedida::Servicio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UnidadMedida::Unidad => "Unidad",
            UnidadMedida::Kilogramo => "Kilogramo",
            UnidadMedida::Litro => "Litro",
            UnidadMedida::Caja => "Caja",
            UnidadMedida::Metro => "Metro",
            UnidadMedida::Paquete => "Paquete",
            UnidadMedida::Servicio => "Servicio",
        }
    }
}

// Linha plana do banco (produto + nome da categoria via JOIN)
#[derive(Debug, Clone, FromRow)]
pub struct ProductoRow {
    pub id: i32,
    pub codigo: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio_unitario: Decimal,
    pub unidad_medida: UnidadMedida,
    pub categoria_id: i32,
    pub estado: bool,
    pub categoria_nombre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductoRead {
    pub id: i32,
    pub codigo: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio_unitario: Decimal,
    pub unidad_medida: UnidadMedida,
    pub categoria_id: i32,
    pub estado: bool,
    pub categoria: ItemSimple,
}

impl From<ProductoRow> for ProductoRead {
    fn from(r: ProductoRow) -> Self {
        Self {
            id: r.id,
            codigo: r.codigo,
            nombre: r.nombre,
            descripcion: r.descripcion,
            precio_unitario: r.precio_unitario,
            unidad_medida: r.unidad_medida,
            categoria_id: r.categoria_id,
            estado: r.estado,
            categoria: ItemSimple { id: r.categoria_id, nombre: r.categoria_nombre },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProductoSimple {
    pub id: i32,
    pub codigo: String,
    pub nombre: String,
}

fn validate_precio(precio: &Decimal) -> Result<(), ValidationError> {
    if precio.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("El precio no puede ser negativo".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductoCreate {
    #[validate(length(min = 1, max = 50, message = "El código es requerido"))]
    #[schema(example = "BOT-001")]
    pub codigo: String,
    #[validate(length(min = 1, max = 100, message = "El nombre es requerido"))]
    pub nombre: String,
    pub descripcion: Option<String>,
    #[validate(custom(function = "validate_precio"))]
    pub precio_unitario: Decimal,
    pub unidad_medida: UnidadMedida,
    pub categoria_id: i32,
    pub estado: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductoUpdate {
    #[validate(length(min = 1, max = 50, message = "El código no puede estar vacío"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codigo: Option<String>,
    #[validate(length(min = 1, max = 100, message = "El nombre no puede estar vacío"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[validate(custom(function = "validate_precio"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio_unitario: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unidad_medida: Option<UnidadMedida>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<bool>,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductoFiltro {
    /// Busca por nome ou código
    pub search: Option<String>,
    /// Nome (parcial) da categoria
    pub categoria: Option<String>,
    pub estado: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    #[test]
    fn preco_negativo_reprovado() {
        let payload = ProductoCreate {
            codigo: "X-1".into(),
            nombre: "Casco".into(),
            descripcion: None,
            precio_unitario: Decimal::from_f64(-1.5).unwrap(),
            unidad_medida: UnidadMedida::Unidad,
            categoria_id: 1,
            estado: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("precio_unitario"));
    }

    #[test]
    fn unidad_medida_serializa_com_o_nome_do_banco() {
        let json = serde_json::to_string(&UnidadMedida::Kilogramo).unwrap();
        assert_eq!(json, "\"Kilogramo\"");
    }
}
