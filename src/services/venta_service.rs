// src/services/venta_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{
        error::AppError,
        pagination::{PageRequest, Paged},
    },
    db::{ClienteRepository, InventarioRepository, MovimientoRepository, ProductoRepository, VentaRepository},
    models::{
        inventario::TipoMovimiento,
        shared::TotalResponse,
        usuario::Usuario,
        venta::{
            DetalleCreate, DetalleFiltro, DetalleRead, DetalleUpdate, VentaCreate, VentaDetailRead, VentaFiltro,
            VentaRead, VentaUpdate,
        },
    },
    services::inventario_service::mover_stock,
};

const VENTA_NO_ENCONTRADA: &str = "Venta no encontrada";
const SIN_INVENTARIO_ACTUAL: &str = "Inventario no encontrado para producto actual";
const DETALLE_NO_ENCONTRADO: &str = "Detalle de venta no encontrado";
const VENTA_INACTIVA: &str = "Venta inactiva";

/// Efeito de uma linha de venda sobre o estoque de um produto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ajuste {
    pub producto_id: i32,
    pub tipo: TipoMovimiento,
    pub delta: i32,
}

/// Movimentos que levam uma linha de `antes` para `depois`, ambos
/// `(producto_id, cantidad)`. Linha nova parte de cantidad 0 e linha
/// excluída termina em 0.
pub(crate) fn ajustes_detalle(antes: (i32, i32), depois: (i32, i32)) -> Vec<Ajuste> {
    let (producto_antes, cantidad_antes) = antes;
    let (producto_depois, cantidad_depois) = depois;

    if producto_antes != producto_depois {
        let mut ajustes = Vec::with_capacity(2);
        if cantidad_antes > 0 {
            ajustes.push(Ajuste {
                producto_id: producto_antes,
                tipo: TipoMovimiento::AnulacionVenta,
                delta: cantidad_antes,
            });
        }
        if cantidad_depois > 0 {
            ajustes.push(Ajuste { producto_id: producto_depois, tipo: TipoMovimiento::Venta, delta: -cantidad_depois });
        }
        return ajustes;
    }

    let diferencia = cantidad_depois - cantidad_antes;
    let tipo = match diferencia {
        0 => return Vec::new(),
        d if d > 0 => TipoMovimiento::Venta,
        _ => TipoMovimiento::AnulacionVenta,
    };
    vec![Ajuste { producto_id: producto_antes, tipo, delta: -diferencia }]
}

#[derive(Clone)]
pub struct VentaService {
    venta_repo: VentaRepository,
    cliente_repo: ClienteRepository,
    producto_repo: ProductoRepository,
    inventario_repo: InventarioRepository,
    movimiento_repo: MovimientoRepository,
    pool: PgPool,
}

impl VentaService {
    pub fn new(
        venta_repo: VentaRepository,
        cliente_repo: ClienteRepository,
        producto_repo: ProductoRepository,
        inventario_repo: InventarioRepository,
        movimiento_repo: MovimientoRepository,
        pool: PgPool,
    ) -> Self {
        Self { venta_repo, cliente_repo, producto_repo, inventario_repo, movimiento_repo, pool }
    }

    // ---
    // Vendas
    // ---

    pub async fn list(&self, filtro: &VentaFiltro, req: &PageRequest) -> Result<Paged<VentaRead>, AppError> {
        let (items, total) = self.venta_repo.list(filtro, req).await?;
        Ok(Paged::new(items, total, req).map(VentaRead::from))
    }

    pub async fn get(&self, id: i32) -> Result<VentaDetailRead, AppError> {
        let venta = self
            .venta_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(VENTA_NO_ENCONTRADA))?;
        let detalles = self.venta_repo.detalles(id).await?;
        Ok(VentaDetailRead::new(
            venta.into(),
            detalles.into_iter().map(DetalleRead::from).collect(),
        ))
    }

    async fn get_read(&self, id: i32, msg: &str) -> Result<VentaRead, AppError> {
        self.venta_repo
            .find_by_id(id)
            .await?
            .map(VentaRead::from)
            .ok_or_else(|| AppError::not_found(msg))
    }

    pub async fn by_cliente(&self, cliente_id: i32) -> Result<Vec<VentaRead>, AppError> {
        let ventas = self.venta_repo.by_cliente(cliente_id).await?;
        if ventas.is_empty() {
            return Err(AppError::not_found("No se encontraron ventas para este cliente"));
        }
        Ok(ventas.into_iter().map(VentaRead::from).collect())
    }

    pub async fn ultimos_30_dias(&self) -> Result<TotalResponse, AppError> {
        Ok(TotalResponse { total: self.venta_repo.count_ultimos_30_dias().await? })
    }

    /// Venda vazia (total 0); o vendedor é o usuário autenticado.
    pub async fn create(&self, payload: &VentaCreate, vendedor: &Usuario) -> Result<VentaDetailRead, AppError> {
        if self.cliente_repo.find_by_id(payload.cliente_id).await?.is_none() {
            return Err(AppError::not_found("Cliente no encontrado"));
        }
        let id = self.venta_repo.create(payload.cliente_id, vendedor.id).await?;
        tracing::info!(venta_id = id, cliente_id = payload.cliente_id, usuario_id = vendedor.id, "🧾 Venda criada");
        self.get(id).await
    }

    pub async fn update(&self, id: i32, patch: &VentaUpdate) -> Result<VentaRead, AppError> {
        let actual = self.get_read(id, VENTA_NO_ENCONTRADA).await?;

        let cliente_id = match patch.cliente_id {
            Some(cliente_id) => {
                if self.cliente_repo.find_by_id(cliente_id).await?.is_none() {
                    return Err(AppError::not_found("Cliente no encontrado"));
                }
                cliente_id
            }
            None => actual.cliente.id,
        };
        let estado = patch.estado.unwrap_or(actual.estado);

        self.venta_repo.update(id, cliente_id, estado).await?;
        self.get_read(id, VENTA_NO_ENCONTRADA).await
    }

    pub async fn toggle_estado(&self, id: i32) -> Result<VentaRead, AppError> {
        if !self.venta_repo.toggle_estado(id).await? {
            return Err(AppError::not_found(VENTA_NO_ENCONTRADA));
        }
        self.get_read(id, VENTA_NO_ENCONTRADA).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.get_read(id, VENTA_NO_ENCONTRADA).await?;
        if self.venta_repo.has_detalles(id).await? {
            return Err(AppError::relaciones_activas());
        }
        self.venta_repo.delete(id).await?;
        Ok(())
    }

    // ---
    // Linhas da venda
    // ---
    // Toda alteração de linha mexe no estoque, grava o movimento e recalcula o
    // total na mesma transação. Ordem dos bloqueios: linha, venda e por fim os
    // inventários em ordem de producto_id.

    pub async fn detalles(
        &self,
        venta_id: i32,
        filtro: &DetalleFiltro,
        req: &PageRequest,
    ) -> Result<Paged<DetalleRead>, AppError> {
        let (items, total) = self.venta_repo.list_detalles(venta_id, filtro, req).await?;
        Ok(Paged::new(items, total, req).map(DetalleRead::from))
    }

    pub async fn get_detalle(&self, id: i32) -> Result<DetalleRead, AppError> {
        self.venta_repo
            .find_detalle(id)
            .await?
            .map(DetalleRead::from)
            .ok_or_else(|| AppError::not_found(DETALLE_NO_ENCONTRADO))
    }

    pub async fn add_detalle(
        &self,
        venta_id: i32,
        payload: &DetalleCreate,
        usuario: &Usuario,
    ) -> Result<VentaDetailRead, AppError> {
        if payload.precio_unitario.is_some_and(|p| p < Decimal::ZERO) {
            return Err(AppError::bad_request("El precio unitario no puede ser negativo"));
        }

        let mut tx = self.pool.begin().await?;

        let venta = self
            .venta_repo
            .lock(&mut *tx, venta_id)
            .await?
            .ok_or_else(|| AppError::not_found(VENTA_NO_ENCONTRADA))?;
        if !venta.estado {
            return Err(AppError::bad_request(VENTA_INACTIVA));
        }

        let producto = self.producto_repo.find_by_id(payload.producto_id).await?;
        let nombre = producto
            .as_ref()
            .map(|p| p.nombre.clone())
            .unwrap_or_else(|| format!("ID {}", payload.producto_id));

        let mut inventario = self
            .inventario_repo
            .lock_by_producto(&mut *tx, payload.producto_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Inventario no encontrado para producto={}", nombre)))?;
        let producto = match producto {
            Some(p) if p.estado && inventario.estado => p,
            _ => return Err(AppError::bad_request(format!("Producto: {} inactivo", nombre))),
        };

        if inventario.cantidad < payload.cantidad {
            return Err(AppError::bad_request(format!(
                "Stock insuficiente para producto={}. Disponible: {}, requerido: {}",
                nombre, inventario.cantidad, payload.cantidad
            )));
        }

        let precio = payload.precio_unitario.unwrap_or(producto.precio_unitario);
        self.venta_repo
            .insert_detalle(&mut *tx, venta_id, payload.producto_id, payload.cantidad, precio)
            .await?;
        for ajuste in ajustes_detalle((payload.producto_id, 0), (payload.producto_id, payload.cantidad)) {
            mover_stock(
                &mut *tx,
                &self.inventario_repo,
                &self.movimiento_repo,
                &mut inventario,
                ajuste.tipo,
                ajuste.delta,
                usuario.id,
                Some(venta_id),
            )
            .await?;
        }
        self.venta_repo.recompute_total(&mut *tx, venta_id).await?;

        tx.commit().await?;
        self.get(venta_id).await
    }

    pub async fn update_detalle(
        &self,
        id: i32,
        patch: &DetalleUpdate,
        usuario: &Usuario,
    ) -> Result<VentaDetailRead, AppError> {
        if patch.precio_unitario.is_some_and(|p| p < Decimal::ZERO) {
            return Err(AppError::bad_request("El precio unitario no puede ser negativo"));
        }

        let mut tx = self.pool.begin().await?;

        let mut detalle = self
            .venta_repo
            .lock_detalle(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(DETALLE_NO_ENCONTRADO))?;
        let venta = self
            .venta_repo
            .lock(&mut *tx, detalle.venta_id)
            .await?
            .ok_or_else(|| AppError::not_found("Venta asociada no encontrada"))?;
        if !venta.estado {
            return Err(AppError::bad_request(VENTA_INACTIVA));
        }

        let producto = self
            .producto_repo
            .find_by_id(detalle.producto_id)
            .await?
            .ok_or_else(|| AppError::not_found("Producto no encontrado"))?;
        if !producto.estado {
            return Err(AppError::bad_request(format!("Producto: {} inactivo", producto.nombre)));
        }

        let antes = (detalle.producto_id, detalle.cantidad);
        let depois = (
            patch.producto_id.unwrap_or(detalle.producto_id),
            patch.cantidad.unwrap_or(detalle.cantidad),
        );

        // Um só SELECT ordenado: trocas cruzadas (A→B e B→A) não se travam
        let mut ids = vec![antes.0, depois.0];
        ids.sort_unstable();
        ids.dedup();
        let mut inventarios = self.inventario_repo.lock_by_productos(&mut *tx, &ids).await?;

        let actual = inventarios
            .iter()
            .find(|i| i.producto_id == antes.0)
            .ok_or_else(|| AppError::not_found(SIN_INVENTARIO_ACTUAL))?;
        if antes.0 != depois.0 {
            let nuevo = inventarios
                .iter()
                .find(|i| i.producto_id == depois.0)
                .ok_or_else(|| AppError::not_found("Inventario no encontrado para nuevo producto"))?;
            if !nuevo.estado {
                return Err(AppError::bad_request("El nuevo producto está inactivo"));
            }
            if nuevo.cantidad < depois.1 {
                return Err(AppError::bad_request("Stock insuficiente para el nuevo producto"));
            }
        } else {
            let diferencia = depois.1 - antes.1;
            if diferencia > 0 && actual.cantidad < diferencia {
                return Err(AppError::bad_request("Stock insuficiente para incrementar cantidad"));
            }
        }

        for ajuste in ajustes_detalle(antes, depois) {
            let inventario = inventarios
                .iter_mut()
                .find(|i| i.producto_id == ajuste.producto_id)
                .ok_or_else(|| AppError::not_found(SIN_INVENTARIO_ACTUAL))?;
            mover_stock(
                &mut *tx,
                &self.inventario_repo,
                &self.movimiento_repo,
                inventario,
                ajuste.tipo,
                ajuste.delta,
                usuario.id,
                Some(venta.id),
            )
            .await?;
        }

        (detalle.producto_id, detalle.cantidad) = depois;
        if let Some(precio) = patch.precio_unitario {
            detalle.precio_unitario = precio;
        }
        self.venta_repo.save_detalle(&mut *tx, &detalle).await?;
        self.venta_repo.recompute_total(&mut *tx, venta.id).await?;

        tx.commit().await?;
        self.get(venta.id).await
    }

    /// Remove a linha devolvendo o estoque; retorna a venda atualizada.
    pub async fn delete_detalle(&self, id: i32, usuario: &Usuario) -> Result<VentaDetailRead, AppError> {
        let mut tx = self.pool.begin().await?;

        let detalle = self
            .venta_repo
            .lock_detalle(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(DETALLE_NO_ENCONTRADO))?;
        let venta = self
            .venta_repo
            .lock(&mut *tx, detalle.venta_id)
            .await?
            .ok_or_else(|| AppError::not_found("Venta asociada no encontrada"))?;
        if !venta.estado {
            return Err(AppError::bad_request(VENTA_INACTIVA));
        }

        if let Some(mut inventario) = self.inventario_repo.lock_by_producto(&mut *tx, detalle.producto_id).await? {
            for ajuste in ajustes_detalle((detalle.producto_id, detalle.cantidad), (detalle.producto_id, 0)) {
                mover_stock(
                    &mut *tx,
                    &self.inventario_repo,
                    &self.movimiento_repo,
                    &mut inventario,
                    ajuste.tipo,
                    ajuste.delta,
                    usuario.id,
                    Some(venta.id),
                )
                .await?;
            }
        }

        self.venta_repo.delete_detalle(&mut *tx, id).await?;
        self.venta_repo.recompute_total(&mut *tx, venta.id).await?;

        tx.commit().await?;
        self.get(venta.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::inventario_service::saldo_tras;
    use pretty_assertions::assert_eq;
    use std::{collections::BTreeMap, str::FromStr};

    // Aplica os ajustes num estoque em memória como o serviço faz no banco.
    fn aplicar(estoque: &mut BTreeMap<i32, i32>, ajustes: &[Ajuste]) -> Result<(), AppError> {
        for a in ajustes {
            let saldo = estoque.get_mut(&a.producto_id).expect("produto no estoque");
            *saldo = saldo_tras(*saldo, a.delta)?;
        }
        Ok(())
    }

    #[test]
    fn linha_nova_desconta_o_estoque() {
        let ajustes = ajustes_detalle((1, 0), (1, 5));
        assert_eq!(ajustes, vec![Ajuste { producto_id: 1, tipo: TipoMovimiento::Venta, delta: -5 }]);

        let mut estoque = BTreeMap::from([(1, 100)]);
        aplicar(&mut estoque, &ajustes).unwrap();
        assert_eq!(estoque[&1], 95);
    }

    #[test]
    fn excluir_linha_devolve_com_anulacao() {
        let ajustes = ajustes_detalle((1, 5), (1, 0));
        assert_eq!(ajustes, vec![Ajuste { producto_id: 1, tipo: TipoMovimiento::AnulacionVenta, delta: 5 }]);

        let mut estoque = BTreeMap::from([(1, 95)]);
        aplicar(&mut estoque, &ajustes).unwrap();
        assert_eq!(estoque[&1], 100);
    }

    #[test]
    fn mudar_quantidade_move_so_a_diferenca() {
        assert_eq!(
            ajustes_detalle((1, 5), (1, 8)),
            vec![Ajuste { producto_id: 1, tipo: TipoMovimiento::Venta, delta: -3 }]
        );
        assert_eq!(
            ajustes_detalle((1, 5), (1, 2)),
            vec![Ajuste { producto_id: 1, tipo: TipoMovimiento::AnulacionVenta, delta: 3 }]
        );
        assert!(ajustes_detalle((1, 5), (1, 5)).is_empty());
    }

    #[test]
    fn trocar_produto_devolve_um_e_tira_do_outro() {
        let ajustes = ajustes_detalle((1, 4), (2, 6));
        assert_eq!(
            ajustes,
            vec![
                Ajuste { producto_id: 1, tipo: TipoMovimiento::AnulacionVenta, delta: 4 },
                Ajuste { producto_id: 2, tipo: TipoMovimiento::Venta, delta: -6 },
            ]
        );

        let mut estoque = BTreeMap::from([(1, 10), (2, 6)]);
        aplicar(&mut estoque, &ajustes).unwrap();
        assert_eq!(estoque, BTreeMap::from([(1, 14), (2, 0)]));
    }

    #[test]
    fn venda_maior_que_o_estoque_falha() {
        let mut estoque = BTreeMap::from([(1, 3)]);
        let err = aplicar(&mut estoque, &ajustes_detalle((1, 0), (1, 4))).unwrap_err();
        assert_eq!(err.to_string(), "Stock insuficiente");
        assert_eq!(estoque[&1], 3);
    }

    #[test]
    fn total_acompanha_as_linhas() {
        let precio = Decimal::from_str("2.50").unwrap();
        let mut lineas = vec![(4, precio), (1, Decimal::from_str("10.00").unwrap())];
        assert_eq!(crate::models::venta::total_venta(lineas.clone()), Decimal::from_str("20.00").unwrap());

        lineas.remove(1);
        assert_eq!(crate::models::venta::total_venta(lineas), Decimal::from_str("10.00").unwrap());
    }
}
