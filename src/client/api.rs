// src/client/api.rs

use serde::{de::DeserializeOwned, Serialize};

use super::http::{ApiClient, ClientError, Download};
use crate::{
    common::pagination::Paged,
    models::{
        auth::{LoginPayload, TokenResponse},
        inventario::{InventarioRead, MovimientoCreate, MovimientoRead},
        shared::ItemSimple,
        usuario::{UsuarioCreate, UsuarioRead},
        venta::{DetalleCreate, DetalleRead, DetalleUpdate, VentaDetailRead},
    },
};

pub type QueryParams = Vec<(String, String)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Categorias,
    Productos,
    Inventarios,
    Clientes,
    Usuarios,
    Ventas,
    Movimientos,
    DetallesVenta,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::Categorias => "/categorias",
            Resource::Productos => "/productos",
            Resource::Inventarios => "/inventarios",
            Resource::Clientes => "/clientes",
            Resource::Usuarios => "/usuarios",
            Resource::Ventas => "/ventas",
            Resource::Movimientos => "/inventarios/movimientos",
            Resource::DetallesVenta => "/detalle_venta",
        }
    }

    /// Nome no singular usado nas mensagens ("categoria", "producto"...).
    pub fn singular(self) -> &'static str {
        match self {
            Resource::Categorias => "categoria",
            Resource::Productos => "producto",
            Resource::Inventarios => "inventario",
            Resource::Clientes => "cliente",
            Resource::Usuarios => "usuario",
            Resource::Ventas => "venta",
            Resource::Movimientos => "movimiento",
            Resource::DetallesVenta => "detalle de venta",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Resource::Movimientos => "movimientos",
            Resource::DetallesVenta => "detalles de venta",
            other => &other.path()[1..],
        }
    }

    fn item(self, id: i32) -> String {
        format!("{}/{}", self.path(), id)
    }
}

impl ApiClient {
    // --- CRUD genérico ---

    pub async fn list<T: DeserializeOwned>(&self, resource: Resource, query: &[(String, String)]) -> Result<Paged<T>, ClientError> {
        self.get(resource.path(), query).await
    }

    pub async fn get_one<T: DeserializeOwned>(&self, resource: Resource, id: i32) -> Result<T, ClientError> {
        self.get(&resource.item(id), &[]).await
    }

    pub async fn create<B: Serialize, T: DeserializeOwned>(&self, resource: Resource, body: &B) -> Result<T, ClientError> {
        self.post(resource.path(), body).await
    }

    pub async fn update<B: Serialize, T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: i32,
        body: &B,
    ) -> Result<T, ClientError> {
        self.patch(&resource.item(id), body).await
    }

    pub async fn toggle_estado<T: DeserializeOwned>(&self, resource: Resource, id: i32) -> Result<T, ClientError> {
        self.patch_empty(&format!("{}/estado", resource.item(id))).await
    }

    pub async fn remove(&self, resource: Resource, id: i32) -> Result<(), ClientError> {
        self.delete(&resource.item(id)).await
    }

    /// Página de um seletor com rolagem infinita, ex.: `clientes/infinito`.
    pub async fn infinite(
        &self,
        endpoint: &str,
        skip: usize,
        limit: usize,
        search: Option<&str>,
    ) -> Result<Vec<ItemSimple>, ClientError> {
        let mut query = vec![("skip".to_string(), skip.to_string()), ("limit".to_string(), limit.to_string())];
        if let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("search".to_string(), term.to_string()));
        }
        self.get(&format!("/{}", endpoint.trim_start_matches('/')), &query).await
    }

    // --- Inventário ---

    pub async fn entrada(&self, body: &MovimientoCreate) -> Result<MovimientoRead, ClientError> {
        self.post("/inventarios/movimientos/entrada", body).await
    }

    pub async fn salida(&self, body: &MovimientoCreate) -> Result<MovimientoRead, ClientError> {
        self.post("/inventarios/movimientos/salida", body).await
    }

    pub async fn stock_bajo(&self, query: &[(String, String)]) -> Result<Paged<InventarioRead>, ClientError> {
        self.get("/inventarios/stock-bajo", query).await
    }

    // --- Detalhes de venda ---

    pub async fn detalles_venta(&self, venta_id: i32, query: &[(String, String)]) -> Result<Paged<DetalleRead>, ClientError> {
        self.get(&format!("/ventas/detalles/{}", venta_id), query).await
    }

    pub async fn add_detalle(&self, venta_id: i32, body: &DetalleCreate) -> Result<VentaDetailRead, ClientError> {
        self.post(&Resource::DetallesVenta.item(venta_id), body).await
    }

    pub async fn update_detalle(&self, id: i32, body: &DetalleUpdate) -> Result<VentaDetailRead, ClientError> {
        self.patch(&Resource::DetallesVenta.item(id), body).await
    }

    pub async fn delete_detalle(&self, id: i32) -> Result<VentaDetailRead, ClientError> {
        self.delete_json(&Resource::DetallesVenta.item(id)).await
    }

    // --- Exportações ---

    /// `path` relativo a `/exportar`, ex.: `ventas/cliente/3`.
    pub async fn export(&self, path: &str) -> Result<Download, ClientError> {
        self.download(&format!("/exportar/{}", path.trim_start_matches('/'))).await
    }

    // --- Auth ---

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ClientError> {
        let body = LoginPayload { email: email.to_string(), password: password.to_string() };
        self.post("/auth/login", &body).await
    }

    pub async fn me(&self) -> Result<UsuarioRead, ClientError> {
        self.get("/auth/me", &[]).await
    }

    pub async fn register(&self, body: &UsuarioCreate) -> Result<UsuarioRead, ClientError> {
        self.post("/auth/register", body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{http::HttpResponse, testing::FakeTransport};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn caminhos_dos_recursos() {
        assert_eq!(Resource::Movimientos.path(), "/inventarios/movimientos");
        assert_eq!(Resource::Categorias.plural(), "categorias");
        assert_eq!(Resource::DetallesVenta.singular(), "detalle de venta");
    }

    #[tokio::test]
    async fn toggle_usa_patch_em_estado() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(200, &json!({"id": 4, "nombre": "Ropa", "descripcion": null, "estado": false})));

        let client = ApiClient::new(fake.clone());
        let _: serde_json::Value = client.toggle_estado(Resource::Categorias, 4).await.unwrap();

        let sent = fake.requests();
        assert_eq!(sent[0].method, crate::client::http::Method::Patch);
        assert_eq!(sent[0].path, "/categorias/4/estado");
        assert_eq!(sent[0].body, None);
    }

    #[tokio::test]
    async fn infinite_omite_busca_vazia() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(200, &json!([{"id": 1, "nombre": "P-1: Bota"}])));

        let client = ApiClient::new(fake.clone());
        let items = client.infinite("productos/infinito/movimiento", 0, 50, Some("  ")).await.unwrap();

        assert_eq!(items.len(), 1);
        let sent = fake.requests();
        assert_eq!(sent[0].path, "/productos/infinito/movimiento");
        assert_eq!(
            sent[0].query,
            vec![("skip".to_string(), "0".to_string()), ("limit".to_string(), "50".to_string())]
        );
    }
}
