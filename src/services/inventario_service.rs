// src/services/inventario_service.rs

use sqlx::{PgConnection, PgPool};

use crate::{
    common::{
        error::{map_unique, AppError},
        pagination::{PageRequest, Paged},
    },
    db::{movimiento_repo::MovimientoScope, InventarioRepository, MovimientoRepository, ProductoRepository},
    models::{
        inventario::{
            Inventario, InventarioCreate, InventarioFiltro, InventarioRead, InventarioUpdate, MovimientoCreate,
            MovimientoFiltro, MovimientoRead, NuevoMovimiento, TipoMovimiento,
        },
        usuario::Usuario,
    },
};

const NO_ENCONTRADO: &str = "Inventario no encontrado";
const NO_EN_INVENTARIO: &str = "Producto no encontrado en inventario";

/// Saldo depois de aplicar `delta`: nunca negativo, nunca além de `i32`.
pub(crate) fn saldo_tras(cantidad: i32, delta: i32) -> Result<i32, AppError> {
    let nueva = cantidad
        .checked_add(delta)
        .ok_or_else(|| AppError::bad_request("La cantidad excede el máximo permitido"))?;
    if nueva < 0 {
        return Err(AppError::bad_request("Stock insuficiente"));
    }
    Ok(nueva)
}

/// Entrada soma, saída subtrai.
pub(crate) fn delta_manual(tipo: TipoMovimiento, cantidad: i32) -> i32 {
    match tipo {
        TipoMovimiento::Salida => -cantidad,
        _ => cantidad,
    }
}

/// Aplica `delta` ao saldo de um inventário já bloqueado e grava o movimento.
///
/// O chamador é dono da transação; o saldo nunca fica negativo.
pub(crate) async fn mover_stock(
    conn: &mut PgConnection,
    inventario_repo: &InventarioRepository,
    movimiento_repo: &MovimientoRepository,
    inventario: &mut Inventario,
    tipo: TipoMovimiento,
    delta: i32,
    usuario_id: i32,
    venta_id: Option<i32>,
) -> Result<i32, AppError> {
    // Valida antes de qualquer escrita
    let nueva = saldo_tras(inventario.cantidad, delta)?;

    inventario_repo.set_cantidad(&mut *conn, inventario.id, nueva).await?;
    inventario.cantidad = nueva;

    let movimiento = NuevoMovimiento {
        tipo,
        producto_id: inventario.producto_id,
        cantidad: delta.abs(),
        cantidad_inventario: nueva,
        usuario_id,
        venta_id,
    };
    let id = movimiento_repo.insert(&mut *conn, &movimiento).await?;

    tracing::info!(
        producto_id = inventario.producto_id,
        tipo = tipo.as_str(),
        cantidad = delta.abs(),
        saldo = nueva,
        usuario_id,
        "📦 Movimento de inventário"
    );
    Ok(id)
}

#[derive(Clone)]
pub struct InventarioService {
    inventario_repo: InventarioRepository,
    movimiento_repo: MovimientoRepository,
    producto_repo: ProductoRepository,
    pool: PgPool,
    stock_minimo: i32,
}

impl InventarioService {
    pub fn new(
        inventario_repo: InventarioRepository,
        movimiento_repo: MovimientoRepository,
        producto_repo: ProductoRepository,
        pool: PgPool,
        stock_minimo: i32,
    ) -> Self {
        Self { inventario_repo, movimiento_repo, producto_repo, pool, stock_minimo }
    }

    pub async fn list(&self, filtro: &InventarioFiltro, req: &PageRequest) -> Result<Paged<InventarioRead>, AppError> {
        let (items, total) = self.inventario_repo.list(filtro, req).await?;
        Ok(Paged::new(items, total, req).map(InventarioRead::from))
    }

    pub async fn stock_bajo(&self, search: Option<&str>, req: &PageRequest) -> Result<Paged<InventarioRead>, AppError> {
        let (items, total) = self.inventario_repo.stock_bajo(search, self.stock_minimo, req).await?;
        Ok(Paged::new(items, total, req).map(InventarioRead::from))
    }

    pub async fn get(&self, id: i32) -> Result<InventarioRead, AppError> {
        self.inventario_repo
            .find_by_id(id)
            .await?
            .map(InventarioRead::from)
            .ok_or_else(|| AppError::not_found(NO_ENCONTRADO))
    }

    pub async fn get_by_producto(&self, producto_id: i32) -> Result<InventarioRead, AppError> {
        self.inventario_repo
            .find_by_producto(producto_id)
            .await?
            .map(InventarioRead::from)
            .ok_or_else(|| AppError::not_found(NO_ENCONTRADO))
    }

    pub async fn register(&self, payload: &InventarioCreate) -> Result<InventarioRead, AppError> {
        let duplicado = || AppError::bad_request("El producto ya se encuentra en el inventario.");

        if self.inventario_repo.find_by_producto(payload.producto_id).await?.is_some() {
            return Err(duplicado());
        }
        let producto = self
            .producto_repo
            .find_by_id(payload.producto_id)
            .await?
            .ok_or_else(|| AppError::not_found("Producto no encontrado"))?;
        if !producto.estado {
            return Err(AppError::bad_request("El producto se encuentra inactivo"));
        }

        let id = self
            .inventario_repo
            .create(
                &self.pool,
                payload.producto_id,
                payload.cantidad,
                payload.cantidad_minima.unwrap_or(self.stock_minimo),
                payload.estado.unwrap_or(true),
            )
            .await
            .map_err(|e| map_unique(e, |_| duplicado()))?;

        tracing::info!(inventario_id = id, producto_id = payload.producto_id, "Inventário registrado");
        self.get(id).await
    }

    pub async fn entrada(&self, payload: &MovimientoCreate, usuario: &Usuario) -> Result<MovimientoRead, AppError> {
        self.movimiento_manual(payload, usuario, TipoMovimiento::Entrada).await
    }

    pub async fn salida(&self, payload: &MovimientoCreate, usuario: &Usuario) -> Result<MovimientoRead, AppError> {
        self.movimiento_manual(payload, usuario, TipoMovimiento::Salida).await
    }

    async fn movimiento_manual(
        &self,
        payload: &MovimientoCreate,
        usuario: &Usuario,
        tipo: TipoMovimiento,
    ) -> Result<MovimientoRead, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut inventario = self
            .inventario_repo
            .lock_by_producto(&mut *tx, payload.producto_id)
            .await?
            .ok_or_else(|| AppError::not_found(NO_EN_INVENTARIO))?;
        if !inventario.estado {
            return Err(AppError::bad_request("El producto está inactivo"));
        }

        let delta = delta_manual(tipo, payload.cantidad);
        let id = mover_stock(
            &mut *tx,
            &self.inventario_repo,
            &self.movimiento_repo,
            &mut inventario,
            tipo,
            delta,
            usuario.id,
            None,
        )
        .await?;
        tx.commit().await?;

        self.get_movimiento(id).await
    }

    pub async fn update(&self, id: i32, patch: &InventarioUpdate, usuario: &Usuario) -> Result<InventarioRead, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut inventario = self
            .inventario_repo
            .lock_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(NO_ENCONTRADO))?;

        if !inventario.estado && patch.estado == Some(false) {
            return Err(AppError::bad_request("El inventario del producto está inactivo"));
        }
        if let Some(estado) = patch.estado {
            inventario.estado = estado;
        }
        if let Some(minima) = patch.cantidad_minima {
            if minima < 0 {
                return Err(AppError::bad_request("La cantidad mínima no puede ser negativa"));
            }
            inventario.cantidad_minima = Some(minima);
        }
        self.inventario_repo.save(&mut *tx, &inventario).await?;

        if let Some(cantidad) = patch.cantidad {
            if cantidad < 0 {
                return Err(AppError::bad_request("La cantidad no puede ser negativa"));
            }
            let diferencia = cantidad - inventario.cantidad;
            if let Some(tipo) = TipoMovimiento::por_edicion(diferencia) {
                mover_stock(
                    &mut *tx,
                    &self.inventario_repo,
                    &self.movimiento_repo,
                    &mut inventario,
                    tipo,
                    diferencia,
                    usuario.id,
                    None,
                )
                .await?;
            }
        }
        tx.commit().await?;

        self.get(id).await
    }

    pub async fn toggle_estado(&self, id: i32) -> Result<InventarioRead, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut inventario = self
            .inventario_repo
            .lock_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(NO_ENCONTRADO))?;
        inventario.estado = !inventario.estado;

        self.inventario_repo.save(&mut *tx, &inventario).await?;
        self.producto_repo
            .set_estado(&mut *tx, inventario.producto_id, inventario.estado)
            .await?;
        tx.commit().await?;

        tracing::info!(inventario_id = id, estado = inventario.estado, "Estado do inventário alterado");
        self.get(id).await
    }

    // --- MOVIMENTAÇÕES ---

    pub async fn movimientos(
        &self,
        scope: MovimientoScope,
        filtro: &MovimientoFiltro,
        req: &PageRequest,
    ) -> Result<Paged<MovimientoRead>, AppError> {
        let (items, total) = self.movimiento_repo.list(scope, filtro, req).await?;
        Ok(Paged::new(items, total, req).map(MovimientoRead::from))
    }

    pub async fn get_movimiento(&self, id: i32) -> Result<MovimientoRead, AppError> {
        self.movimiento_repo
            .find_by_id(id)
            .await?
            .map(MovimientoRead::from)
            .ok_or_else(|| AppError::not_found("Movimiento no encontrado"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;

    fn movimento(tipo: TipoMovimiento, saldo: i32, cantidad: i32) -> Result<i32, AppError> {
        saldo_tras(saldo, delta_manual(tipo, cantidad))
    }

    #[test]
    fn entrada_soma_e_saida_subtrai() {
        assert_eq!(movimento(TipoMovimiento::Entrada, 100, 20).unwrap(), 120);
        assert_eq!(movimento(TipoMovimiento::Salida, 100, 20).unwrap(), 80);
        assert_eq!(movimento(TipoMovimiento::Salida, 100, 100).unwrap(), 0);
    }

    #[test]
    fn saida_alem_do_estoque_e_recusada() {
        let err = movimento(TipoMovimiento::Salida, 100, 101).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Stock insuficiente");
    }

    #[test]
    fn entrada_que_estoura_i32_da_400() {
        let err = movimento(TipoMovimiento::Entrada, 100, i32::MAX).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn ajuste_de_edicao_pelo_saldo_novo() {
        let diferencia = 70 - 100;
        assert_eq!(TipoMovimiento::por_edicion(diferencia), Some(TipoMovimiento::SalidaEdicion));
        assert_eq!(saldo_tras(100, diferencia).unwrap(), 70);
    }
}
