// src/client/pagination.rs

use std::collections::BTreeMap;

use crate::common::pagination::SortOrder;

/// Valor de um filtro de listagem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Bool(bool),
}

impl FilterValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, FilterValue::Text(s) if s.is_empty())
    }

    pub fn as_query(&self) -> String {
        match self {
            FilterValue::Text(s) => s.clone(),
            FilterValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

pub type FilterMap = BTreeMap<String, FilterValue>;

pub const PAGE_SIZE_OPTIONS: [u32; 4] = [5, 10, 20, 50];

#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub sort_by: String,
    pub sort_order: SortOrder,
    pub filters: FilterMap,
    initial: Box<PaginationInit>,
}

#[derive(Debug, Clone, PartialEq)]
struct PaginationInit {
    page: u32,
    page_size: u32,
    sort_by: String,
    sort_order: SortOrder,
    filters: FilterMap,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::with_page_size(10)
    }
}

impl Pagination {
    pub fn with_page_size(page_size: u32) -> Self {
        let init = PaginationInit {
            page: 1,
            page_size,
            sort_by: String::new(),
            sort_order: SortOrder::Asc,
            filters: FilterMap::new(),
        };
        Self {
            page: init.page,
            page_size: init.page_size,
            sort_by: init.sort_by.clone(),
            sort_order: init.sort_order,
            filters: init.filters.clone(),
            initial: Box::new(init),
        }
    }

    pub fn page_size_options(&self) -> &'static [u32] {
        &PAGE_SIZE_OPTIONS
    }

    pub fn go_to_page(&mut self, page: u32) {
        self.page = page;
    }

    pub fn change_page_size(&mut self, size: u32) {
        self.page_size = size;
        self.page = 1;
    }

    /// Mesma coluna alterna asc/desc; outra coluna começa em asc.
    pub fn change_sort(&mut self, key: &str) {
        if self.sort_by == key {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_by = key.to_string();
            self.sort_order = SortOrder::Asc;
        }
        self.page = 1;
    }

    pub fn update_filters(&mut self, filters: FilterMap) {
        self.filters = filters;
        self.page = 1;
    }

    pub fn reset(&mut self) {
        self.page = self.initial.page;
        self.page_size = self.initial.page_size;
        self.sort_by = self.initial.sort_by.clone();
        self.sort_order = self.initial.sort_order;
        self.filters = self.initial.filters.clone();
    }

    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        if !self.sort_by.is_empty() {
            params.push(("sort_by".to_string(), self.sort_by.clone()));
            params.push(("sort_order".to_string(), self.sort_order.as_str().to_string()));
        }
        for (key, value) in &self.filters {
            if !value.is_empty() {
                params.push((key.clone(), value.as_query()));
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pares(params: &[(String, String)]) -> Vec<(&str, &str)> {
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn mesma_coluna_alterna_ordem() {
        let mut p = Pagination::default();
        p.go_to_page(4);
        p.change_sort("nombre");
        assert_eq!((p.sort_by.as_str(), p.sort_order, p.page), ("nombre", SortOrder::Asc, 1));

        p.change_sort("nombre");
        assert_eq!(p.sort_order, SortOrder::Desc);

        p.change_sort("codigo");
        assert_eq!((p.sort_by.as_str(), p.sort_order), ("codigo", SortOrder::Asc));
    }

    #[test]
    fn query_sem_ordenacao_nem_filtros_vazios() {
        let mut p = Pagination::default();
        let mut filtros = FilterMap::new();
        filtros.insert("search".to_string(), FilterValue::from(""));
        filtros.insert("estado".to_string(), FilterValue::from(false));
        p.update_filters(filtros);

        assert_eq!(
            pares(&p.query_params()),
            vec![("page", "1"), ("page_size", "10"), ("estado", "false")]
        );
    }

    #[test]
    fn query_com_ordenacao() {
        let mut p = Pagination::with_page_size(50);
        p.change_sort("fecha");
        p.change_sort("fecha");
        assert_eq!(
            pares(&p.query_params()),
            vec![("page", "1"), ("page_size", "50"), ("sort_by", "fecha"), ("sort_order", "desc")]
        );
    }

    #[test]
    fn tamanho_da_pagina_volta_para_um_e_reset_restaura() {
        let mut p = Pagination::default();
        p.go_to_page(3);
        p.change_page_size(20);
        assert_eq!((p.page, p.page_size), (1, 20));

        p.change_sort("total");
        p.reset();
        assert_eq!(p, Pagination::default());
    }
}
