// src/client/entity.rs

use serde::de::DeserializeOwned;

use super::{
    api::Resource,
    http::{ApiClient, ClientError},
};
use crate::common::pagination::Paged;

pub const MSG_RELACIONES: &str = "No se puede eliminar: tiene relaciones activas.\n Se recomienda desactivar el ítem.";
pub const MSG_DATOS_INVALIDOS: &str = "Datos inválidos";
pub const MSG_DUPLICADO: &str = "Ya existe un registro con estos datos";
pub const MSG_CONEXION: &str = "No se pudo conectar con el servidor";

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn no_encontrado(resource: Resource) -> String {
    format!("{} no encontrado", capitalize(resource.singular()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
}

/// Mensagem para o usuário a partir do erro de um create/update.
pub fn mutation_error(resource: Resource, mutation: Mutation, err: &ClientError) -> String {
    if err.is_network() {
        return MSG_CONEXION.to_string();
    }
    match err.status() {
        Some(400) => err.detail().unwrap_or(MSG_DATOS_INVALIDOS).to_string(),
        Some(409) => MSG_DUPLICADO.to_string(),
        Some(404) => no_encontrado(resource),
        _ => match mutation {
            Mutation::Create => format!("Error creando {}", resource.singular()),
            Mutation::Update => format!("Error actualizando {}", resource.singular()),
        },
    }
}

/// Bloqueia envios duplicados de uma mesma mutação.
#[derive(Debug, Default)]
pub struct InFlight(bool);

impl InFlight {
    pub fn try_begin(&mut self) -> bool {
        if self.0 {
            return false;
        }
        self.0 = true;
        true
    }

    pub fn finish(&mut self) {
        self.0 = false;
    }

    pub fn is_active(&self) -> bool {
        self.0
    }
}

/// Estado de uma tela de listagem.
///
/// Cada busca recebe uma geração crescente; só a resposta da última
/// geração emitida é aplicada, as atrasadas são descartadas.
#[derive(Debug)]
pub struct EntityController<T> {
    resource: Resource,
    list_path: String,
    pub items: Vec<T>,
    pub total_items: i64,
    pub total_pages: i64,
    pub is_loading: bool,
    pub error: Option<String>,
    generation: u64,
    mutation: InFlight,
}

impl<T: DeserializeOwned> EntityController<T> {
    pub fn new(resource: Resource) -> Self {
        Self::scoped(resource, resource.path())
    }

    /// Listagem que vem de outra rota que não a do recurso; as mutações
    /// continuam em `resource`. Ex.: linhas de uma venda.
    pub fn scoped(resource: Resource, list_path: impl Into<String>) -> Self {
        Self {
            resource,
            list_path: list_path.into(),
            items: Vec::new(),
            total_items: 0,
            total_pages: 1,
            is_loading: false,
            error: None,
            generation: 0,
            mutation: InFlight::default(),
        }
    }

    /// Linhas da venda: lista em `/ventas/detalles/{id}`, altera em `/detalle_venta/{id}`.
    pub fn detalles_venta(venta_id: i32) -> Self {
        Self::scoped(Resource::DetallesVenta, format!("/ventas/detalles/{}", venta_id))
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn list_path(&self) -> &str {
        &self.list_path
    }

    /// Marca uma nova busca e devolve a geração dela.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.is_loading = true;
        self.error = None;
        self.generation
    }

    /// Aplica a resposta se ela ainda for a mais recente. Devolve se aplicou.
    pub fn apply(&mut self, generation: u64, result: Result<Paged<T>, ClientError>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(page) => {
                self.items = page.items;
                self.total_items = page.total;
                self.total_pages = page.total_pages;
            }
            Err(err) => {
                tracing::warn!(recurso = self.resource.plural(), erro = %err, "falha ao carregar listagem");
                self.error = Some(format!("Error cargando {}", self.resource.plural()));
                self.items.clear();
                self.total_items = 0;
                self.total_pages = 1;
            }
        }
        true
    }

    pub async fn fetch(&mut self, api: &ApiClient, query: &[(String, String)]) {
        let generation = self.begin_fetch();
        let result = api.get::<Paged<T>>(&self.list_path, query).await;
        self.apply(generation, result);
    }

    pub async fn toggle_item_status(
        &mut self,
        api: &ApiClient,
        id: i32,
        query: &[(String, String)],
    ) -> Result<(), String> {
        if !self.mutation.try_begin() {
            return Ok(());
        }
        let result = api.toggle_estado::<serde_json::Value>(self.resource, id).await;
        self.mutation.finish();
        self.fetch(api, query).await;

        result
            .map(|_| ())
            .map_err(|_| format!("Error al cambiar estado del {}", self.resource.singular()))
    }

    pub async fn delete_item(&mut self, api: &ApiClient, id: i32, query: &[(String, String)]) -> Result<(), String> {
        if !self.mutation.try_begin() {
            return Ok(());
        }
        let result = api.remove(self.resource, id).await;
        self.mutation.finish();
        self.fetch(api, query).await;

        result.map_err(|err| match err.status() {
            Some(400) => MSG_RELACIONES.to_string(),
            _ => format!("Error al eliminar {}", self.resource.singular()),
        })
    }
}

/// Carrega o registro de uma tela de detalhe.
pub async fn load_detail<T: DeserializeOwned>(api: &ApiClient, resource: Resource, id: i32) -> Result<T, String> {
    api.get_one(resource, id).await.map_err(|err| match err.status() {
        Some(404) => no_encontrado(resource),
        _ => format!("Error cargando detalles del {}", resource.singular()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{
        http::{HttpResponse, Method},
        testing::FakeTransport,
    };
    use crate::models::categoria::Categoria;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pagina(ids: &[i32]) -> HttpResponse {
        let items: Vec<_> = ids
            .iter()
            .map(|id| json!({"id": id, "nombre": format!("Cat {}", id), "descripcion": null, "estado": true}))
            .collect();
        HttpResponse::json(
            200,
            &json!({"items": items, "total": ids.len(), "total_pages": 1, "current_page": 1, "page_size": 10}),
        )
    }

    fn page_of(ids: &[i32]) -> Paged<Categoria> {
        let items = ids
            .iter()
            .map(|id| Categoria { id: *id, nombre: format!("Cat {}", id), descripcion: None, estado: true })
            .collect();
        Paged { items, total: ids.len() as i64, total_pages: 1, current_page: 1, page_size: 10 }
    }

    #[test]
    fn resposta_atrasada_e_descartada() {
        let mut ctl = EntityController::<Categoria>::new(Resource::Categorias);
        let antiga = ctl.begin_fetch();
        let nova = ctl.begin_fetch();

        assert!(ctl.apply(nova, Ok(page_of(&[2]))));
        assert!(!ctl.apply(antiga, Ok(page_of(&[1]))));
        assert_eq!(ctl.items[0].id, 2);
        assert!(!ctl.is_loading);
    }

    #[test]
    fn falha_limpa_a_lista() {
        let mut ctl = EntityController::<Categoria>::new(Resource::Categorias);
        let g = ctl.begin_fetch();
        ctl.apply(g, Ok(page_of(&[1, 2])));

        let g = ctl.begin_fetch();
        ctl.apply(g, Err(ClientError::Network("down".into())));
        assert_eq!(ctl.error.as_deref(), Some("Error cargando categorias"));
        assert!(ctl.items.is_empty());
        assert_eq!((ctl.total_items, ctl.total_pages), (0, 1));
    }

    #[tokio::test]
    async fn delete_com_relacoes_recarrega_e_avisa() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(400, &json!({"detail": "No se puede eliminar, tiene relaciones activas"})));
        fake.respond(pagina(&[7]));

        let api = ApiClient::new(fake.clone());
        let mut ctl = EntityController::<Categoria>::new(Resource::Categorias);
        let err = ctl.delete_item(&api, 7, &[]).await.unwrap_err();

        assert_eq!(err, MSG_RELACIONES);
        assert_eq!(ctl.items.len(), 1);
        let sent = fake.requests();
        assert_eq!(sent[0].method, Method::Delete);
        assert_eq!(sent[1].method, Method::Get);
    }

    #[tokio::test]
    async fn linhas_da_venda_listam_pela_venda_e_excluem_pelo_item() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(200, &json!({"id": 5, "total": 0.0})));
        fake.respond(HttpResponse::json(
            200,
            &json!({"items": [], "total": 0, "total_pages": 1, "current_page": 1, "page_size": 10}),
        ));

        let api = ApiClient::new(fake.clone());
        let mut ctl = EntityController::<serde_json::Value>::detalles_venta(5);
        ctl.delete_item(&api, 31, &[]).await.unwrap();

        let sent = fake.requests();
        assert_eq!((sent[0].method, sent[0].path.as_str()), (Method::Delete, "/detalle_venta/31"));
        assert_eq!((sent[1].method, sent[1].path.as_str()), (Method::Get, "/ventas/detalles/5"));
        assert_eq!(ctl.error, None);
    }

    #[tokio::test]
    async fn toggle_com_falha() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(500, &json!({"detail": "Ocurrió un error inesperado"})));
        fake.respond(pagina(&[]));

        let api = ApiClient::new(fake);
        let mut ctl = EntityController::<Categoria>::new(Resource::Productos);
        let err = ctl.toggle_item_status(&api, 1, &[]).await.unwrap_err();
        assert_eq!(err, "Error al cambiar estado del producto");
    }

    #[tokio::test]
    async fn detalhe_inexistente() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(404, &json!({"detail": "Cliente no encontrado"})));

        let api = ApiClient::new(fake);
        let err = load_detail::<serde_json::Value>(&api, Resource::Clientes, 99).await.unwrap_err();
        assert_eq!(err, "Cliente no encontrado");
    }

    #[test]
    fn traducao_de_erros_de_mutacao() {
        let dup = ClientError::Status { status: 409, detail: None };
        assert_eq!(mutation_error(Resource::Clientes, Mutation::Create, &dup), MSG_DUPLICADO);

        let bad = ClientError::Status { status: 400, detail: Some("Ya existe una categoría con ese nombre.".into()) };
        assert_eq!(
            mutation_error(Resource::Categorias, Mutation::Update, &bad),
            "Ya existe una categoría con ese nombre."
        );

        let bad_sem_detalhe = ClientError::Status { status: 400, detail: None };
        assert_eq!(mutation_error(Resource::Categorias, Mutation::Update, &bad_sem_detalhe), MSG_DATOS_INVALIDOS);

        let outro = ClientError::Status { status: 500, detail: None };
        assert_eq!(mutation_error(Resource::Ventas, Mutation::Update, &outro), "Error actualizando venta");
        assert_eq!(mutation_error(Resource::Ventas, Mutation::Create, &ClientError::Network("x".into())), MSG_CONEXION);
    }

    #[test]
    fn in_flight_bloqueia_duplicado() {
        let mut f = InFlight::default();
        assert!(f.try_begin());
        assert!(!f.try_begin());
        f.finish();
        assert!(f.try_begin());
    }
}
