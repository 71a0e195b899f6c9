// tests/client_flow.rs
//
// Fluxo de uma tela de listagem do painel: filtros → paginação → API → controller.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use sonyco::{
    client::{
        entity::{EntityController, MSG_RELACIONES},
        filters::FilterState,
        http::{HttpRequest, HttpResponse, Method},
        pagination::{FilterMap, FilterValue, Pagination},
        ApiClient, ClientError, Resource, Transport,
    },
    models::categoria::Categoria,
};

#[derive(Default)]
struct Roteiro {
    respostas: Mutex<VecDeque<HttpResponse>>,
    recebidas: Mutex<Vec<HttpRequest>>,
}

impl Roteiro {
    fn responde(&self, status: u16, body: Value) {
        self.respostas.lock().unwrap().push_back(HttpResponse::json(status, &body));
    }

    fn recebidas(&self) -> Vec<HttpRequest> {
        self.recebidas.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for Roteiro {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        self.recebidas.lock().unwrap().push(request);
        self.respostas
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ClientError::Network("roteiro vazio".to_string()))
    }
}

fn pagina(nomes: &[(i32, &str)], total: i64, page: i64) -> Value {
    let items: Vec<Value> = nomes
        .iter()
        .map(|(id, nombre)| json!({"id": id, "nombre": nombre, "descripcion": null, "estado": true}))
        .collect();
    json!({"items": items, "total": total, "total_pages": (total + 49) / 50, "current_page": page, "page_size": 50})
}

fn query(req: &HttpRequest, key: &str) -> Option<String> {
    req.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

#[tokio::test]
async fn filtra_ordena_e_exclui_categoria() {
    let roteiro = Arc::new(Roteiro::default());
    let mut api = ApiClient::new(roteiro.clone());
    api.set_token(Some("tok".to_string()));

    let mut pagination = Pagination::with_page_size(50);
    let mut controller: EntityController<Categoria> = EntityController::new(Resource::Categorias);

    // Filtro aplicado volta para a página 1
    let mut filtros = FilterState::new(FilterMap::new());
    filtros.update_filter("nombre", Some(FilterValue::from("cal")));
    filtros.update_filter("estado", Some(FilterValue::from(true)));
    assert!(filtros.has_unapplied_changes());
    filtros.apply_filters();
    pagination.go_to_page(3);
    pagination.update_filters(filtros.applied_filters().clone());
    pagination.change_sort("nombre");

    roteiro.responde(200, pagina(&[(1, "Calzado"), (2, "Calcetines")], 2, 1));
    controller.fetch(&api, &pagination.query_params()).await;

    assert_eq!(controller.items.len(), 2);
    assert_eq!(controller.total_items, 2);
    let primeira = &roteiro.recebidas()[0];
    assert_eq!(primeira.path, "/categorias");
    assert_eq!(primeira.token.as_deref(), Some("tok"));
    assert_eq!(query(primeira, "page").as_deref(), Some("1"));
    assert_eq!(query(primeira, "page_size").as_deref(), Some("50"));
    assert_eq!(query(primeira, "sort_by").as_deref(), Some("nombre"));
    assert_eq!(query(primeira, "sort_order").as_deref(), Some("asc"));
    assert_eq!(query(primeira, "nombre").as_deref(), Some("cal"));
    assert_eq!(query(primeira, "estado").as_deref(), Some("true"));

    // Exclusão bloqueada por produtos: mensagem de relações e recarga da lista
    roteiro.responde(400, json!({"detail": "No se puede eliminar, tiene relaciones activas"}));
    roteiro.responde(200, pagina(&[(1, "Calzado"), (2, "Calcetines")], 2, 1));
    let err = controller.delete_item(&api, 1, &pagination.query_params()).await.unwrap_err();
    assert_eq!(err, MSG_RELACIONES);

    let recebidas = roteiro.recebidas();
    assert_eq!(recebidas[1].method, Method::Delete);
    assert_eq!(recebidas[1].path, "/categorias/1");
    assert_eq!(recebidas[2].method, Method::Get);
    assert_eq!(controller.items.len(), 2);
}

#[tokio::test]
async fn queda_de_rede_vira_erro_de_listagem() {
    let roteiro = Arc::new(Roteiro::default());
    let api = ApiClient::new(roteiro);
    let mut controller: EntityController<Categoria> = EntityController::new(Resource::Categorias);

    controller.fetch(&api, &Pagination::default().query_params()).await;

    assert!(!controller.is_loading);
    assert!(controller.items.is_empty());
    assert_eq!(controller.error.as_deref(), Some("Error cargando categorias"));
}
