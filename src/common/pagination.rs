// src/common/pagination.rs

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use utoipa::{IntoParams, ToSchema};

use crate::common::error::AppError;

pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

// Envelope paginado. O formato é contrato com o SPA, não mudar os nomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub page_size: i64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, total: i64, req: &PageRequest) -> Self {
        Self {
            items,
            total,
            total_pages: total_pages(total, req.page_size),
            current_page: req.page,
            page_size: req.page_size,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            total_pages: self.total_pages,
            current_page: self.current_page,
            page_size: self.page_size,
        }
    }
}

/// Número de páginas; uma lista vazia ainda tem uma página.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 1;
    }
    (total + page_size - 1) / page_size
}

/// Parâmetros de paginação/ordenação vindos da query string.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Número da página (começa em 1)
    pub page: Option<i64>,
    /// Itens por página (1..=100)
    pub page_size: Option<i64>,
    /// Coluna para ordenar
    pub sort_by: Option<String>,
    /// asc | desc
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

impl PageParams {
    pub fn resolve(&self, default_page_size: i64) -> Result<PageRequest, AppError> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::bad_request("El número de página debe ser mayor o igual a 1"));
        }

        let page_size = self.page_size.unwrap_or(default_page_size);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::bad_request(format!(
                "page_size debe estar entre 1 y {}",
                MAX_PAGE_SIZE
            )));
        }

        // OFFSET precisa caber em i64
        if (page - 1).checked_mul(page_size).is_none() {
            return Err(AppError::bad_request("El número de página es demasiado grande"));
        }

        let sort_order = match self.sort_order.as_deref() {
            None | Some("") => SortOrder::Asc,
            Some(raw) => SortOrder::parse(raw)
                .ok_or_else(|| AppError::bad_request("sort_order debe ser 'asc' o 'desc'"))?,
        };

        let sort_by = self
            .sort_by
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(PageRequest { page, page_size, sort_by, sort_order })
    }
}

// --- ORDENAÇÃO ---

// Lista branca de colunas ordenáveis: (chave pública, expressão SQL).
// Chaves desconhecidas caem na ordenação padrão da listagem.
pub struct SortSpec {
    pub columns: &'static [(&'static str, &'static str)],
    pub default: &'static str,
}

impl SortSpec {
    pub fn order_clause(&self, req: &PageRequest) -> String {
        let chosen = req.sort_by.as_deref().and_then(|key| {
            self.columns
                .iter()
                .find(|(public, _)| *public == key)
                .map(|(_, column)| *column)
        });

        match chosen {
            // Desempate estável pelo texto do default evita páginas com itens repetidos.
            Some(column) => format!(" ORDER BY {} {}, {}", column, req.sort_order.sql(), self.default),
            None => format!(" ORDER BY {}", self.default),
        }
    }

    pub fn push_order_and_page(&self, qb: &mut QueryBuilder<'_, Postgres>, req: &PageRequest) {
        qb.push(self.order_clause(req));
        qb.push(" LIMIT ").push_bind(req.page_size);
        qb.push(" OFFSET ").push_bind(req.offset());
    }
}

/// Termo de busca `%x%` para ILIKE, ignorando strings vazias.
pub fn like_term(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s))
}

// --- SCROLL INFINITO ---

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InfiniteParams {
    /// Registro a partir do qual começar
    pub skip: Option<i64>,
    /// Máximo de registros (até 100)
    pub limit: Option<i64>,
    /// Busca por nome
    pub search: Option<String>,
}

impl InfiniteParams {
    pub const DEFAULT_LIMIT: i64 = 50;

    pub fn resolve(&self) -> Result<(i64, i64), AppError> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(Self::DEFAULT_LIMIT);
        if skip < 0 {
            return Err(AppError::bad_request("skip debe ser mayor o igual a 0"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(AppError::bad_request(format!("limit debe estar entre 1 y {}", MAX_PAGE_SIZE)));
        }
        Ok((skip, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ORDEM: SortSpec = SortSpec {
        columns: &[("nombre", "p.nombre"), ("categoria_nombre", "c.nombre")],
        default: "p.id",
    };

    fn params(page: i64, size: i64, sort_by: Option<&str>, order: Option<&str>) -> PageParams {
        PageParams {
            page: Some(page),
            page_size: Some(size),
            sort_by: sort_by.map(String::from),
            sort_order: order.map(String::from),
        }
    }

    #[test]
    fn total_pages_arredonda_para_cima_e_nunca_zero() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(101, 50), 3);
    }

    #[test]
    fn offset_parte_da_pagina_um() {
        let req = params(3, 20, None, None).resolve(10).unwrap();
        assert_eq!(req.offset(), 40);
    }

    #[test]
    fn page_size_padrao_por_listagem() {
        let req = PageParams::default().resolve(50).unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 50);
        assert_eq!(req.sort_order, SortOrder::Asc);
    }

    #[test]
    fn rejeita_page_size_fora_do_limite() {
        assert!(params(1, 0, None, None).resolve(10).is_err());
        assert!(params(1, 101, None, None).resolve(10).is_err());
        assert!(params(0, 10, None, None).resolve(10).is_err());
    }

    #[test]
    fn rejeita_pagina_cujo_offset_estoura() {
        let err = params(i64::MAX, 100, None, None).resolve(10).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

        let ultima = i64::MAX / 100;
        let req = params(ultima, 100, None, None).resolve(10).unwrap();
        assert_eq!(req.offset(), (ultima - 1) * 100);
    }

    #[test]
    fn rejeita_sort_order_invalido() {
        let err = params(1, 10, Some("nombre"), Some("up")).resolve(10).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn ordena_por_coluna_da_lista_branca() {
        let req = params(1, 10, Some("categoria_nombre"), Some("desc")).resolve(10).unwrap();
        assert_eq!(ORDEM.order_clause(&req), " ORDER BY c.nombre DESC, p.id");
    }

    #[test]
    fn chave_desconhecida_usa_ordem_padrao() {
        let req = params(1, 10, Some("1; DROP TABLE productos"), None).resolve(10).unwrap();
        assert_eq!(ORDEM.order_clause(&req), " ORDER BY p.id");
    }

    #[test]
    fn like_term_ignora_busca_vazia() {
        assert_eq!(like_term(Some("  ")), None);
        assert_eq!(like_term(Some(" bota ")), Some("%bota%".to_string()));
    }

    #[test]
    fn infinite_usa_limite_padrao() {
        let p = InfiniteParams { skip: None, limit: None, search: None };
        assert_eq!(p.resolve().unwrap(), (0, 50));
        let p = InfiniteParams { skip: Some(-1), limit: None, search: None };
        assert!(p.resolve().is_err());
    }
}
