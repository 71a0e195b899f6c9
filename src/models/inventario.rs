// src/models/inventario.rs

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::time::to_col,
    models::{
        producto::{ProductoSimple, UnidadMedida},
        shared::ItemSimple,
    },
};

// --- 1. Saldo de estoque ---

#[derive(Debug, Clone, FromRow)]
pub struct Inventario {
    pub id: i32,
    pub producto_id: i32,
    pub cantidad: i32,
    pub cantidad_minima: Option<i32>,
    pub estado: bool,
}

// Linha do JOIN inventario + produto + categoria
#[derive(Debug, Clone, FromRow)]
pub struct InventarioRow {
    pub id: i32,
    pub producto_id: i32,
    pub cantidad: i32,
    pub cantidad_minima: Option<i32>,
    pub estado: bool,
    pub producto_codigo: String,
    pub producto_nombre: String,
    pub producto_precio: Decimal,
    pub producto_unidad: UnidadMedida,
    pub producto_estado: bool,
    pub categoria_id: i32,
    pub categoria_nombre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductoResumen {
    pub id: i32,
    pub codigo: String,
    pub nombre: String,
    pub precio_unitario: Decimal,
    pub unidad_medida: UnidadMedida,
    pub estado: bool,
    pub categoria: ItemSimple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InventarioRead {
    pub id: i32,
    pub producto_id: i32,
    pub cantidad: i32,
    pub cantidad_minima: Option<i32>,
    pub estado: bool,
    pub producto: ProductoResumen,
}

impl From<InventarioRow> for InventarioRead {
    fn from(r: InventarioRow) -> Self {
        Self {
            id: r.id,
            producto_id: r.producto_id,
            cantidad: r.cantidad,
            cantidad_minima: r.cantidad_minima,
            estado: r.estado,
            producto: ProductoResumen {
                id: r.producto_id,
                codigo: r.producto_codigo,
                nombre: r.producto_nombre,
                precio_unitario: r.producto_precio,
                unidad_medida: r.producto_unidad,
                estado: r.producto_estado,
                categoria: ItemSimple { id: r.categoria_id, nombre: r.categoria_nombre },
            },
        }
    }
}

impl InventarioRead {
    /// Estoque baixo: abaixo do mínimo (5 quando não configurado).
    pub fn stock_bajo(&self, stock_minimo: i32) -> bool {
        self.cantidad < self.cantidad_minima.unwrap_or(stock_minimo)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct InventarioCreate {
    pub producto_id: i32,
    #[validate(range(min = 0, max = 1_000_000, message = "La cantidad debe estar entre 0 y 1000000"))]
    pub cantidad: i32,
    #[validate(range(min = 0, message = "La cantidad mínima no puede ser negativa"))]
    pub cantidad_minima: Option<i32>,
    pub estado: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct InventarioUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cantidad: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cantidad_minima: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<bool>,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InventarioFiltro {
    /// Busca por nome ou código do produto
    pub search: Option<String>,
    pub estado: Option<bool>,
}

// --- 2. Movimentações (log imutável) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_movimiento")]
pub enum TipoMovimiento {
    #[sqlx(rename = "ENTRADA")]
    #[serde(rename = "ENTRADA")]
    Entrada,
    #[sqlx(rename = "SALIDA")]
    #[serde(rename = "SALIDA")]
    Salida,
    #[sqlx(rename = "VENTA")]
    #[serde(rename = "VENTA")]
    Venta,
    #[sqlx(rename = "ANULACIÓN_VENTA")]
    #[serde(rename = "ANULACIÓN_VENTA")]
    AnulacionVenta,
    #[sqlx(rename = "ENTRADA_EDICIÓN")]
    #[serde(rename = "ENTRADA_EDICIÓN")]
    EntradaEdicion,
    #[sqlx(rename = "SALIDA_EDICIÓN")]
    #[serde(rename = "SALIDA_EDICIÓN")]
    SalidaEdicion,
}

impl TipoMovimiento {
    pub fn as_str(self) -> &'static str {
        match self {
            TipoMovimiento::Entrada => "ENTRADA",
            TipoMovimiento::Salida => "SALIDA",
            TipoMovimiento::Venta => "VENTA",
            TipoMovimiento::AnulacionVenta => "ANULACIÓN_VENTA",
            TipoMovimiento::EntradaEdicion => "ENTRADA_EDICIÓN",
            TipoMovimiento::SalidaEdicion => "SALIDA_EDICIÓN",
        }
    }

    /// Movimento de ajuste manual para uma diferença de quantidade.
    pub fn por_edicion(diferencia: i32) -> Option<Self> {
        match diferencia {
            d if d > 0 => Some(TipoMovimiento::EntradaEdicion),
            d if d < 0 => Some(TipoMovimiento::SalidaEdicion),
            _ => None,
        }
    }
}

// Linha do JOIN movimiento + produto + usuário
#[derive(Debug, Clone, FromRow)]
pub struct MovimientoRow {
    pub id: i32,
    pub tipo: TipoMovimiento,
    pub producto_id: i32,
    pub cantidad: i32,
    pub cantidad_inventario: Option<i32>,
    pub fecha: DateTime<Utc>,
    pub usuario_id: i32,
    pub venta_id: Option<i32>,
    pub producto_codigo: String,
    pub producto_nombre: String,
    pub producto_unidad: UnidadMedida,
    pub producto_estado: bool,
    pub usuario_nombre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MovimientoRead {
    pub id: i32,
    pub tipo: TipoMovimiento,
    pub cantidad: i32,
    pub cantidad_inventario: Option<i32>,
    pub venta_id: Option<i32>,
    pub producto_id: i32,
    pub usuario_id: i32,
    /// Data em UTC-5
    #[schema(value_type = String)]
    pub fecha: DateTime<FixedOffset>,
    pub producto: ProductoSimple,
    pub usuario: ItemSimple,
}

impl From<MovimientoRow> for MovimientoRead {
    fn from(r: MovimientoRow) -> Self {
        Self {
            id: r.id,
            tipo: r.tipo,
            cantidad: r.cantidad,
            cantidad_inventario: r.cantidad_inventario,
            venta_id: r.venta_id,
            producto_id: r.producto_id,
            usuario_id: r.usuario_id,
            fecha: to_col(r.fecha),
            producto: ProductoSimple { id: r.producto_id, codigo: r.producto_codigo, nombre: r.producto_nombre },
            usuario: ItemSimple { id: r.usuario_id, nombre: r.usuario_nombre },
        }
    }
}

// Registro a inserir no log
#[derive(Debug, Clone)]
pub struct NuevoMovimiento {
    pub tipo: TipoMovimiento,
    pub producto_id: i32,
    pub cantidad: i32,
    pub cantidad_inventario: i32,
    pub usuario_id: i32,
    pub venta_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct MovimientoCreate {
    pub producto_id: i32,
    #[validate(range(min = 1, max = 1_000_000, message = "La cantidad debe estar entre 1 y 1000000"))]
    pub cantidad: i32,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MovimientoFiltro {
    pub tipo: Option<TipoMovimiento>,
    /// Busca por nome do usuário ou nome/código do produto
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tipo_de_edicao_pela_diferenca() {
        assert_eq!(TipoMovimiento::por_edicion(5), Some(TipoMovimiento::EntradaEdicion));
        assert_eq!(TipoMovimiento::por_edicion(-2), Some(TipoMovimiento::SalidaEdicion));
        assert_eq!(TipoMovimiento::por_edicion(0), None);
    }

    #[test]
    fn movimento_limita_a_quantidade() {
        assert!(MovimientoCreate { producto_id: 1, cantidad: i32::MAX }.validate().is_err());
        assert!(MovimientoCreate { producto_id: 1, cantidad: 0 }.validate().is_err());
        assert!(MovimientoCreate { producto_id: 1, cantidad: 20 }.validate().is_ok());
    }

    #[test]
    fn tipo_serializa_com_acento() {
        let json = serde_json::to_string(&TipoMovimiento::AnulacionVenta).unwrap();
        assert_eq!(json, "\"ANULACIÓN_VENTA\"");
    }
}
