// src/client/infinite.rs
//
// Seletor com rolagem infinita sobre os endpoints `*/infinito` da API.

use std::time::{Duration, Instant};

use super::http::{ApiClient, ClientError};
use crate::models::shared::ItemSimple;

pub const LIMIT: usize = 50;
pub const DEBOUNCE: Duration = Duration::from_millis(500);
pub const MSG_ERROR: &str = "Error cargando datos";

/// Carrega mais quando falta até 1,5 altura visível para o fim da lista.
pub fn should_load_more(scroll_height: f64, scroll_top: f64, client_height: f64) -> bool {
    scroll_height - scroll_top <= client_height * 1.5
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub generation: u64,
    pub skip: usize,
    pub search: String,
}

#[derive(Debug)]
pub struct InfiniteScroll {
    endpoint: &'static str,
    pub items: Vec<ItemSimple>,
    pub has_more: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub selected: Option<ItemSimple>,
    skip: usize,
    search: String,
    pending: Option<Instant>,
    generation: u64,
    loaded_once: bool,
}

impl InfiniteScroll {
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            items: Vec::new(),
            has_more: true,
            is_loading: false,
            error: None,
            selected: None,
            skip: 0,
            search: String::new(),
            pending: None,
            generation: 0,
            loaded_once: false,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    // Reinicia a lista para o termo atual; respostas anteriores ficam velhas.
    fn restart(&mut self) -> LoadRequest {
        self.pending = None;
        self.skip = 0;
        self.has_more = true;
        self.begin()
    }

    fn begin(&mut self) -> LoadRequest {
        self.generation += 1;
        self.is_loading = true;
        self.error = None;
        LoadRequest { generation: self.generation, skip: self.skip, search: self.search.clone() }
    }

    /// Abertura do seletor. Só a primeira vez dispara a carga.
    pub fn open(&mut self) -> Option<LoadRequest> {
        if self.loaded_once {
            return None;
        }
        self.loaded_once = true;
        Some(self.restart())
    }

    /// Digitação na busca. Termo vazio recarrega na hora, o resto espera o debounce.
    pub fn set_search(&mut self, term: &str, now: Instant) -> Option<LoadRequest> {
        self.search = term.trim().to_string();
        if self.search.is_empty() {
            return Some(self.restart());
        }
        self.pending = Some(now + DEBOUNCE);
        None
    }

    pub fn poll_debounce(&mut self, now: Instant) -> Option<LoadRequest> {
        match self.pending {
            Some(deadline) if now >= deadline => Some(self.restart()),
            _ => None,
        }
    }

    pub fn on_scroll(&mut self, scroll_height: f64, scroll_top: f64, client_height: f64) -> Option<LoadRequest> {
        if !should_load_more(scroll_height, scroll_top, client_height) || !self.has_more || self.is_loading {
            return None;
        }
        Some(self.begin())
    }

    /// Aplica o resultado se for da geração atual. Devolve se aplicou.
    pub fn apply(&mut self, request: &LoadRequest, result: Result<Vec<ItemSimple>, ClientError>) -> bool {
        if request.generation != self.generation {
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(page) => {
                // Múltiplo exato do limite gera mais uma chamada vazia no fim.
                self.has_more = page.len() == LIMIT;
                self.skip = request.skip + page.len();
                if request.skip == 0 {
                    self.items = page;
                } else {
                    self.items.extend(page);
                }
            }
            Err(err) => {
                tracing::warn!(endpoint = self.endpoint, erro = %err, "falha no seletor");
                self.error = Some(MSG_ERROR.to_string());
                if request.skip == 0 {
                    self.items.clear();
                }
            }
        }
        true
    }

    pub async fn load(&mut self, api: &ApiClient, request: LoadRequest) -> bool {
        let search = Some(request.search.as_str()).filter(|s| !s.is_empty());
        let result = api.infinite(self.endpoint, request.skip, LIMIT, search).await;
        self.apply(&request, result)
    }

    pub fn select(&mut self, id: i32) -> Option<&ItemSimple> {
        self.selected = self.items.iter().find(|i| i.id == id).cloned();
        self.selected.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{http::HttpResponse, testing::FakeTransport};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn itens(from: i32, n: i32) -> Vec<ItemSimple> {
        (from..from + n).map(|id| ItemSimple { id, nombre: format!("Item {}", id) }).collect()
    }

    #[test]
    fn limiar_de_rolagem() {
        assert!(should_load_more(1000.0, 700.0, 200.0));
        assert!(!should_load_more(1000.0, 600.0, 200.0));
    }

    #[test]
    fn paginas_cheias_acumulam_e_pagina_curta_encerra() {
        let mut s = InfiniteScroll::new("clientes/infinito");
        let first = s.open().unwrap();
        assert!(s.open().is_none());
        assert!(s.apply(&first, Ok(itens(1, 50))));
        assert!(s.has_more);

        let more = s.on_scroll(1000.0, 800.0, 200.0).unwrap();
        assert_eq!(more.skip, 50);
        s.apply(&more, Ok(itens(51, 10)));
        assert_eq!(s.items.len(), 60);
        assert!(!s.has_more);
        assert!(s.on_scroll(1000.0, 800.0, 200.0).is_none());
    }

    #[test]
    fn busca_espera_debounce() {
        let t0 = Instant::now();
        let mut s = InfiniteScroll::new("productos/infinito");
        assert!(s.set_search("bota", t0).is_none());
        assert!(s.poll_debounce(t0 + Duration::from_millis(300)).is_none());
        let req = s.poll_debounce(t0 + DEBOUNCE).unwrap();
        assert_eq!(req.skip, 0);
        assert_eq!(req.search, "bota");
        assert!(s.poll_debounce(t0 + Duration::from_secs(2)).is_none());
    }

    #[test]
    fn busca_vazia_e_imediata_e_descarta_resposta_velha() {
        let t0 = Instant::now();
        let mut s = InfiniteScroll::new("clientes/infinito");
        s.set_search("ana", t0);
        let velha = s.poll_debounce(t0 + DEBOUNCE).unwrap();
        let nova = s.set_search("", t0 + DEBOUNCE).unwrap();

        assert!(!s.apply(&velha, Ok(itens(1, 3))));
        assert!(s.apply(&nova, Ok(itens(10, 2))));
        assert_eq!(s.items, itens(10, 2));
    }

    #[test]
    fn erro_na_primeira_pagina_limpa_a_lista() {
        let t0 = Instant::now();
        let mut s = InfiniteScroll::new("clientes/infinito");
        let first = s.open().unwrap();
        s.apply(&first, Ok(itens(1, 5)));

        let nova = s.set_search("", t0).unwrap();
        s.apply(&nova, Err(ClientError::Network("offline".to_string())));
        assert!(s.items.is_empty());
        assert_eq!(s.error.as_deref(), Some(MSG_ERROR));
    }

    #[test]
    fn erro_ao_rolar_mantem_o_que_ja_veio() {
        let mut s = InfiniteScroll::new("clientes/infinito");
        let first = s.open().unwrap();
        s.apply(&first, Ok(itens(1, 50)));

        let more = s.on_scroll(1000.0, 900.0, 200.0).unwrap();
        s.apply(&more, Err(ClientError::Network("offline".to_string())));
        assert_eq!(s.items.len(), 50);
    }

    #[tokio::test]
    async fn erro_mostra_mensagem() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(500, &json!({"detail": "Ocurrió un error inesperado"})));
        let api = ApiClient::new(fake.clone());

        let mut s = InfiniteScroll::new("categorias/infinito");
        let req = s.open().unwrap();
        s.load(&api, req).await;

        assert_eq!(s.error.as_deref(), Some(MSG_ERROR));
        assert!(!s.is_loading);
        let sent = &fake.requests()[0];
        assert_eq!(sent.path, "/categorias/infinito");
        assert_eq!(sent.query, vec![("skip".to_string(), "0".to_string()), ("limit".to_string(), "50".to_string())]);
    }
}
