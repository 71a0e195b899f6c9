// src/models/venta.rs

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::time::to_col,
    models::{producto::{ProductoSimple, UnidadMedida}, shared::ItemSimple},
};

#[derive(Debug, Clone, FromRow)]
pub struct Venta {
    pub id: i32,
    pub cliente_id: i32,
    pub usuario_id: i32,
    pub fecha: DateTime<Utc>,
    pub total: Decimal,
    pub estado: bool,
}

// Linha do JOIN venta + cliente + vendedor
#[derive(Debug, Clone, FromRow)]
pub struct VentaRow {
    pub id: i32,
    pub cliente_id: i32,
    pub usuario_id: i32,
    pub fecha: DateTime<Utc>,
    pub total: Decimal,
    pub estado: bool,
    pub cliente_nombre: String,
    pub usuario_nombre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VentaRead {
    pub id: i32,
    pub cliente: ItemSimple,
    pub usuario: ItemSimple,
    #[schema(value_type = String)]
    pub fecha: DateTime<FixedOffset>,
    pub total: Decimal,
    pub estado: bool,
}

impl From<VentaRow> for VentaRead {
    fn from(r: VentaRow) -> Self {
        Self {
            id: r.id,
            cliente: ItemSimple { id: r.cliente_id, nombre: r.cliente_nombre },
            usuario: ItemSimple { id: r.usuario_id, nombre: r.usuario_nombre },
            fecha: to_col(r.fecha),
            total: r.total,
            estado: r.estado,
        }
    }
}

// Venda com as linhas, retornada pelas operações de detalhe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VentaDetailRead {
    pub id: i32,
    pub cliente: ItemSimple,
    pub usuario: ItemSimple,
    #[schema(value_type = String)]
    pub fecha: DateTime<FixedOffset>,
    pub total: Decimal,
    pub estado: bool,
    pub detalle_ventas: Vec<DetalleRead>,
}

impl VentaDetailRead {
    pub fn new(venta: VentaRead, detalle_ventas: Vec<DetalleRead>) -> Self {
        Self {
            id: venta.id,
            cliente: venta.cliente,
            usuario: venta.usuario,
            fecha: venta.fecha,
            total: venta.total,
            estado: venta.estado,
            detalle_ventas,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VentaCreate {
    pub cliente_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct VentaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<bool>,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VentaFiltro {
    /// Busca por nome do cliente ou do vendedor
    pub search: Option<String>,
    pub estado: Option<bool>,
}

// --- DETALHES ---

#[derive(Debug, Clone, FromRow)]
pub struct DetalleVenta {
    pub id: i32,
    pub venta_id: i32,
    pub producto_id: i32,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
}

#[derive(Debug, Clone, FromRow)]
pub struct DetalleRow {
    pub id: i32,
    pub venta_id: i32,
    pub producto_id: i32,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub producto_codigo: String,
    pub producto_nombre: String,
    pub producto_unidad: UnidadMedida,
    pub producto_estado: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DetalleRead {
    pub id: i32,
    pub venta_id: i32,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub subtotal: Decimal,
    pub producto: ProductoSimple,
}

impl From<DetalleRow> for DetalleRead {
    fn from(r: DetalleRow) -> Self {
        Self {
            id: r.id,
            venta_id: r.venta_id,
            cantidad: r.cantidad,
            precio_unitario: r.precio_unitario,
            subtotal: subtotal(r.cantidad, r.precio_unitario),
            producto: ProductoSimple { id: r.producto_id, codigo: r.producto_codigo, nombre: r.producto_nombre },
        }
    }
}

// Arredonda como o ROUND do Postgres (meio para longe do zero).
pub fn subtotal(cantidad: i32, precio_unitario: Decimal) -> Decimal {
    (Decimal::from(cantidad) * precio_unitario).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Total da venda: soma dos subtotais das linhas `(cantidad, precio_unitario)`.
pub fn total_venta(lineas: impl IntoIterator<Item = (i32, Decimal)>) -> Decimal {
    lineas.into_iter().map(|(cantidad, precio)| subtotal(cantidad, precio)).sum()
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DetalleCreate {
    pub producto_id: i32,
    #[validate(range(min = 1, max = 1_000_000, message = "La cantidad debe estar entre 1 y 1000000"))]
    pub cantidad: i32,
    /// Quando ausente usa o preço do produto
    pub precio_unitario: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct DetalleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producto_id: Option<i32>,
    #[validate(range(min = 1, max = 1_000_000, message = "La cantidad debe estar entre 1 y 1000000"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cantidad: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio_unitario: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DetalleFiltro {
    /// Busca por nome ou código do produto
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn subtotal_com_duas_casas() {
        let precio = Decimal::from_str("12.345").unwrap();
        assert_eq!(subtotal(3, precio), Decimal::from_str("37.04").unwrap());
        let meio = Decimal::from_str("0.125").unwrap();
        assert_eq!(subtotal(1, meio), Decimal::from_str("0.13").unwrap());
    }

    #[test]
    fn total_soma_as_linhas_e_zera_sem_linhas() {
        let lineas = vec![
            (2, Decimal::from_str("10.50").unwrap()),
            (3, Decimal::from_str("12.345").unwrap()),
        ];
        assert_eq!(total_venta(lineas), Decimal::from_str("58.04").unwrap());
        assert_eq!(total_venta(Vec::new()), Decimal::ZERO);
    }
}
