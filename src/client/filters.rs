// src/client/filters.rs

use super::pagination::{FilterMap, FilterValue};

/// Chip de filtro aplicado, pronto para exibir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    pub key: String,
    pub value: FilterValue,
    pub label: String,
    pub display_value: String,
}

type OnChange = Box<dyn FnMut(&FilterMap) + Send>;

/// Rascunho (`filters`) e filtros aplicados (`applied_filters`).
///
/// Editar só mexe no rascunho; limpar mexe nos dois e notifica na hora.
pub struct FilterState {
    filters: FilterMap,
    applied_filters: FilterMap,
    on_change: Option<OnChange>,
}

impl FilterState {
    pub fn new(initial: FilterMap) -> Self {
        Self { filters: initial.clone(), applied_filters: initial, on_change: None }
    }

    pub fn on_change(mut self, callback: impl FnMut(&FilterMap) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn filters(&self) -> &FilterMap {
        &self.filters
    }

    pub fn applied_filters(&self) -> &FilterMap {
        &self.applied_filters
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.applied_filters);
        }
    }

    pub fn update_filter(&mut self, key: &str, value: Option<FilterValue>) {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => {
                self.filters.insert(key.to_string(), v);
            }
            None => {
                self.filters.remove(key);
            }
        }
    }

    pub fn apply_filters(&mut self) {
        self.applied_filters = self.filters.clone();
        self.notify();
    }

    pub fn clear_filter(&mut self, key: &str) {
        self.filters.remove(key);
        self.applied_filters.remove(key);
        self.notify();
    }

    pub fn clear_all_filters(&mut self) {
        self.filters.clear();
        self.applied_filters.clear();
        self.notify();
    }

    pub fn has_unapplied_changes(&self) -> bool {
        self.filters != self.applied_filters
    }

    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        self.applied_filters
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(key, value)| {
                let (label, display_value) = match (key.as_str(), value) {
                    ("search", v) => ("Búsqueda".to_string(), v.as_query()),
                    ("estado", FilterValue::Bool(b)) => {
                        ("Estado".to_string(), if *b { "Activo" } else { "Inactivo" }.to_string())
                    }
                    ("estado", v) => ("Estado".to_string(), v.as_query()),
                    ("categoria", v) => ("Categoría".to_string(), v.as_query()),
                    (other, v) => (capitalize(other), v.as_query()),
                };
                ActiveFilter { key: key.clone(), value: value.clone(), label, display_value }
            })
            .collect()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn com_registro() -> (FilterState, Arc<Mutex<Vec<FilterMap>>>) {
        let eventos = Arc::new(Mutex::new(Vec::new()));
        let destino = eventos.clone();
        let state = FilterState::new(FilterMap::new()).on_change(move |f| destino.lock().unwrap().push(f.clone()));
        (state, eventos)
    }

    #[test]
    fn editar_so_altera_rascunho() {
        let (mut state, eventos) = com_registro();
        state.update_filter("search", Some("bota".into()));

        assert!(state.has_unapplied_changes());
        assert!(state.applied_filters().is_empty());
        assert!(eventos.lock().unwrap().is_empty());

        state.apply_filters();
        assert!(!state.has_unapplied_changes());
        assert_eq!(eventos.lock().unwrap().len(), 1);
    }

    #[test]
    fn valor_vazio_remove_a_chave() {
        let (mut state, _) = com_registro();
        state.update_filter("search", Some("x".into()));
        state.update_filter("search", Some("".into()));
        assert!(state.filters().is_empty());
    }

    #[test]
    fn limpar_notifica_imediatamente() {
        let (mut state, eventos) = com_registro();
        state.update_filter("search", Some("casco".into()));
        state.update_filter("estado", Some(true.into()));
        state.apply_filters();

        state.clear_filter("search");
        assert_eq!(state.filters().len(), 1);
        assert_eq!(state.applied_filters().len(), 1);

        state.clear_all_filters();
        let eventos = eventos.lock().unwrap();
        assert_eq!(eventos.len(), 3);
        assert!(eventos[2].is_empty());
    }

    #[test]
    fn chips_com_rotulos() {
        let (mut state, _) = com_registro();
        state.update_filter("search", Some("bota".into()));
        state.update_filter("estado", Some(false.into()));
        state.update_filter("categoria", Some("Calzado".into()));
        state.update_filter("tipo_persona", Some("juridica".into()));
        state.apply_filters();

        let chips: Vec<(String, String)> =
            state.active_filters().into_iter().map(|f| (f.label, f.display_value)).collect();
        assert_eq!(
            chips,
            vec![
                ("Categoría".to_string(), "Calzado".to_string()),
                ("Estado".to_string(), "Inactivo".to_string()),
                ("Búsqueda".to_string(), "bota".to_string()),
                ("Tipo_persona".to_string(), "juridica".to_string()),
            ]
        );
    }
}
