// src/services/export_service.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    common::{
        error::AppError,
        time::{fecha_reporte, sello_archivo},
    },
    db::{
        movimiento_repo::MovimientoScope, CategoriaRepository, ClienteRepository, InventarioRepository,
        MovimientoRepository, ProductoRepository, UsuarioRepository, VentaRepository,
    },
    models::{inventario::MovimientoRow, usuario::ROL_ADMIN, venta::subtotal},
};

/// BOM UTF-8 para o Excel abrir os acentos corretamente
const BOM: &[u8] = b"\xEF\xBB\xBF";
/// Separador de colunas (ponto e vírgula, padrão do Excel em espanhol)
const SEP: &str = ";";

const CABECERA_MOVIMIENTOS: [&str; 11] = [
    "ID",
    "Código_producto",
    "Producto",
    "Unidad_medida",
    "Estado_producto",
    "Tipo Movimiento",
    "Cantidad",
    "Inventario_resultante",
    "Empleado",
    "Venta_id",
    "Fecha",
];

fn escapar_csv(valor: &str) -> String {
    if valor.contains(';') || valor.contains('"') || valor.contains('\n') || valor.contains('\r') {
        format!("\"{}\"", valor.replace('"', "\"\""))
    } else {
        valor.to_string()
    }
}

fn estado(activo: bool) -> String {
    if activo { "Activo" } else { "Inactivo" }.to_string()
}

fn dinero(valor: Decimal) -> String {
    format!("{:.2}", valor.round_dp(2))
}

fn opcional<T: ToString>(valor: Option<T>) -> String {
    valor.map(|v| v.to_string()).unwrap_or_default()
}

/// Relatório pronto para download.
#[derive(Debug, Clone, PartialEq)]
pub struct Planilla {
    pub nombre: String,
    pub cabecera: Vec<&'static str>,
    pub filas: Vec<Vec<String>>,
}

impl Planilla {
    fn new(nombre: impl Into<String>, cabecera: &[&'static str]) -> Self {
        Self { nombre: nombre.into(), cabecera: cabecera.to_vec(), filas: Vec::new() }
    }

    fn fila(&mut self, valores: Vec<String>) {
        self.filas.push(valores);
    }

    pub fn to_csv(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BOM.len() + 64 * (self.filas.len() + 1));
        out.extend_from_slice(BOM);

        let cabecera: Vec<String> = self.cabecera.iter().map(|h| escapar_csv(h)).collect();
        out.extend_from_slice(cabecera.join(SEP).as_bytes());
        out.extend_from_slice(b"\r\n");

        for fila in &self.filas {
            let linea: Vec<String> = fila.iter().map(|v| escapar_csv(v)).collect();
            out.extend_from_slice(linea.join(SEP).as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        out
    }

    /// `<Nome>_<YYYY-MM-DD_HH-MM-SS>.csv`, só com caracteres seguros para o header.
    pub fn filename(&self, ahora: DateTime<Utc>) -> String {
        let base: String = self
            .nombre
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{}_{}.csv", base, sello_archivo(ahora))
    }
}

fn filas_movimientos(planilla: &mut Planilla, movimientos: Vec<MovimientoRow>) {
    for m in movimientos {
        planilla.fila(vec![
            m.id.to_string(),
            m.producto_codigo,
            m.producto_nombre,
            m.producto_unidad.as_str().to_string(),
            estado(m.producto_estado),
            m.tipo.as_str().to_string(),
            m.cantidad.to_string(),
            opcional(m.cantidad_inventario),
            m.usuario_nombre,
            m.venta_id.map(|id| id.to_string()).unwrap_or_else(|| "N/A".to_string()),
            fecha_reporte(m.fecha),
        ]);
    }
}

#[derive(Clone)]
pub struct ExportService {
    inventario_repo: InventarioRepository,
    venta_repo: VentaRepository,
    cliente_repo: ClienteRepository,
    categoria_repo: CategoriaRepository,
    producto_repo: ProductoRepository,
    usuario_repo: UsuarioRepository,
    movimiento_repo: MovimientoRepository,
}

impl ExportService {
    pub fn new(
        inventario_repo: InventarioRepository,
        venta_repo: VentaRepository,
        cliente_repo: ClienteRepository,
        categoria_repo: CategoriaRepository,
        producto_repo: ProductoRepository,
        usuario_repo: UsuarioRepository,
        movimiento_repo: MovimientoRepository,
    ) -> Self {
        Self { inventario_repo, venta_repo, cliente_repo, categoria_repo, producto_repo, usuario_repo, movimiento_repo }
    }

    pub async fn inventarios(&self) -> Result<Planilla, AppError> {
        let mut p = Planilla::new(
            "Inventario",
            &[
                "ID",
                "Código_producto",
                "Producto",
                "Unidad_medida",
                "Cantidad",
                "Cantidad_minima",
                "Precio",
                "Categoria",
                "Estado",
            ],
        );
        for i in self.inventario_repo.all().await? {
            p.fila(vec![
                i.id.to_string(),
                i.producto_codigo,
                i.producto_nombre,
                i.producto_unidad.as_str().to_string(),
                i.cantidad.to_string(),
                opcional(i.cantidad_minima),
                dinero(i.producto_precio),
                i.categoria_nombre,
                estado(i.estado),
            ]);
        }
        Ok(p)
    }

    pub async fn ventas(&self) -> Result<Planilla, AppError> {
        let identificaciones: HashMap<i32, String> = self
            .cliente_repo
            .all()
            .await?
            .into_iter()
            .map(|c| (c.id, c.identificacion))
            .collect();

        let mut p = Planilla::new(
            "Ventas",
            &["ID", "Identificación_cliente", "Cliente", "Vendedor", "Fecha", "Total", "Estado"],
        );
        for v in self.venta_repo.all().await? {
            p.fila(vec![
                v.id.to_string(),
                identificaciones.get(&v.cliente_id).cloned().unwrap_or_default(),
                v.cliente_nombre,
                v.usuario_nombre,
                fecha_reporte(v.fecha),
                dinero(v.total),
                estado(v.estado),
            ]);
        }
        Ok(p)
    }

    pub async fn ventas_por_cliente(&self, cliente_id: i32) -> Result<Planilla, AppError> {
        let cliente = self
            .cliente_repo
            .find_by_id(cliente_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cliente no encontrado"))?;

        let mut p = Planilla::new(
            format!("Ventas_Cliente_ID_{}", cliente.identificacion),
            &[
                "ID",
                "Identificación_cliente",
                "Cliente",
                "Estado_cliente",
                "Vendedor",
                "Fecha",
                "Total",
                "Estado_venta",
            ],
        );
        for v in self.venta_repo.by_cliente(cliente_id).await? {
            p.fila(vec![
                v.id.to_string(),
                cliente.identificacion.clone(),
                v.cliente_nombre,
                estado(cliente.estado),
                v.usuario_nombre,
                fecha_reporte(v.fecha),
                dinero(v.total),
                estado(v.estado),
            ]);
        }
        Ok(p)
    }

    pub async fn clientes(&self) -> Result<Planilla, AppError> {
        let mut p = Planilla::new(
            "Cliente",
            &["ID", "Identificación", "Nombre", "Tipo", "Email", "Teléfono", "Estado"],
        );
        for c in self.cliente_repo.all().await? {
            p.fila(vec![
                c.id.to_string(),
                c.identificacion,
                c.nombre,
                c.tipo_persona.as_str().to_string(),
                c.email,
                c.telefono.unwrap_or_default(),
                estado(c.estado),
            ]);
        }
        Ok(p)
    }

    pub async fn categorias(&self) -> Result<Planilla, AppError> {
        let mut p = Planilla::new("Categorias", &["ID", "Nombre", "Descripción", "Estado"]);
        for c in self.categoria_repo.all().await? {
            p.fila(vec![c.id.to_string(), c.nombre, c.descripcion.unwrap_or_default(), estado(c.estado)]);
        }
        Ok(p)
    }

    pub async fn productos(&self) -> Result<Planilla, AppError> {
        let mut p = Planilla::new(
            "Productos",
            &[
                "ID",
                "Código",
                "Nombre",
                "Unidad_medida",
                "Descripción",
                "Precio Unitario",
                "Categoria",
                "Estado",
            ],
        );
        for r in self.producto_repo.all().await? {
            p.fila(vec![
                r.id.to_string(),
                r.codigo,
                r.nombre,
                r.unidad_medida.as_str().to_string(),
                r.descripcion.unwrap_or_default(),
                dinero(r.precio_unitario),
                r.categoria_nombre,
                estado(r.estado),
            ]);
        }
        Ok(p)
    }

    pub async fn usuarios(&self) -> Result<Planilla, AppError> {
        let mut p = Planilla::new("Usuarios", &["ID", "Nombre", "Email", "Rol", "Estado"]);
        for u in self.usuario_repo.all().await? {
            let rol = if u.rol_id == ROL_ADMIN { "Admin" } else { "No-admin" };
            p.fila(vec![u.id.to_string(), u.nombre, u.email, rol.to_string(), estado(u.estado)]);
        }
        Ok(p)
    }

    pub async fn movimientos_por_producto(&self, producto_id: i32) -> Result<Planilla, AppError> {
        let producto = self
            .producto_repo
            .find_by_id(producto_id)
            .await?
            .ok_or_else(|| AppError::not_found("Producto no encontrado"))?;

        let mut p = Planilla::new(format!("Movimientos_Producto_COD_{}", producto.codigo), &CABECERA_MOVIMIENTOS);
        let movimientos = self.movimiento_repo.all(MovimientoScope::Producto(producto_id)).await?;
        filas_movimientos(&mut p, movimientos);
        Ok(p)
    }

    pub async fn movimientos_por_usuario(&self, usuario_id: i32) -> Result<Planilla, AppError> {
        let usuario = self
            .usuario_repo
            .find_by_id(usuario_id)
            .await?
            .ok_or_else(|| AppError::not_found("Usuario no encontrado"))?;

        let mut p = Planilla::new(format!("Movimientos_Usuario_{}", usuario.nombre), &CABECERA_MOVIMIENTOS);
        let movimientos = self.movimiento_repo.all(MovimientoScope::Usuario(usuario_id)).await?;
        filas_movimientos(&mut p, movimientos);
        Ok(p)
    }

    pub async fn movimientos(&self) -> Result<Planilla, AppError> {
        let mut p = Planilla::new(
            "Movimientos_Inventarios",
            &[
                "ID",
                "Código_producto",
                "Producto",
                "Unidad_medida",
                "Estado_producto",
                "Tipo Movimiento",
                "Vendedor",
                "Venta_id",
                "Cantidad",
                "Inventario_resultante",
                "Fecha",
            ],
        );
        for m in self.movimiento_repo.all(MovimientoScope::Todos).await? {
            p.fila(vec![
                m.id.to_string(),
                m.producto_codigo,
                m.producto_nombre,
                m.producto_unidad.as_str().to_string(),
                estado(m.producto_estado),
                m.tipo.as_str().to_string(),
                m.usuario_nombre,
                m.venta_id.map(|id| id.to_string()).unwrap_or_else(|| "N/A".to_string()),
                m.cantidad.to_string(),
                opcional(m.cantidad_inventario),
                fecha_reporte(m.fecha),
            ]);
        }
        Ok(p)
    }

    pub async fn detalles_venta(&self, venta_id: i32) -> Result<Planilla, AppError> {
        let mut p = Planilla::new(
            format!("Venta_{}_Detalles", venta_id),
            &[
                "ID",
                "Código_producto",
                "Producto",
                "Unidad_medida",
                "Estado_producto",
                "Cantidad",
                "Precio Unitario",
                "Subtotal",
            ],
        );
        for d in self.venta_repo.detalles(venta_id).await? {
            p.fila(vec![
                d.id.to_string(),
                d.producto_codigo,
                d.producto_nombre,
                d.producto_unidad.as_str().to_string(),
                estado(d.producto_estado),
                d.cantidad.to_string(),
                dinero(d.precio_unitario),
                dinero(subtotal(d.cantidad, d.precio_unitario)),
            ]);
        }
        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn escapa_separador_e_aspas() {
        assert_eq!(escapar_csv("Botas; talla 40"), "\"Botas; talla 40\"");
        assert_eq!(escapar_csv("Casco \"pro\""), "\"Casco \"\"pro\"\"\"");
        assert_eq!(escapar_csv("Guantes"), "Guantes");
    }

    #[test]
    fn csv_comeca_com_bom_e_usa_ponto_e_virgula() {
        let mut p = Planilla::new("Categorias", &["ID", "Nombre", "Descripción", "Estado"]);
        p.fila(vec!["1".into(), "Calzado".into(), "Botas; zapatos".into(), estado(true)]);

        let csv = p.to_csv();
        assert!(csv.starts_with(BOM));
        let texto = String::from_utf8(csv[BOM.len()..].to_vec()).unwrap();
        assert_eq!(
            texto,
            "ID;Nombre;Descripción;Estado\r\n1;Calzado;\"Botas; zapatos\";Activo\r\n"
        );
    }

    #[test]
    fn nome_do_arquivo_usa_horario_da_colombia() {
        let p = Planilla::new("Movimientos_Usuario_José Pérez", &["ID"]);
        let ahora = Utc.with_ymd_and_hms(2025, 6, 1, 3, 15, 0).unwrap();
        assert_eq!(p.filename(ahora), "Movimientos_Usuario_Jos__P_rez_2025-05-31_22-15-00.csv");
    }

    #[test]
    fn dinheiro_sempre_com_duas_casas() {
        assert_eq!(dinero(Decimal::from(10)), "10.00");
        assert_eq!(dinero(Decimal::from_str("3.456").unwrap()), "3.46");
    }
}
