// src/client/table.rs

use crate::common::pagination::SortOrder;

pub struct Column<T> {
    pub header: &'static str,
    pub render: fn(&T) -> String,
    pub sort_key: Option<&'static str>,
}

impl<T> Column<T> {
    pub fn new(header: &'static str, render: fn(&T) -> String) -> Self {
        Self { header, render, sort_key: None }
    }

    pub fn sortable(mut self, key: &'static str) -> Self {
        self.sort_key = Some(key);
        self
    }
}

/// Quais botões aparecem em cada linha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowActions {
    pub detail: bool,
    pub edit: bool,
    pub toggle: bool,
    pub delete: bool,
}

impl RowActions {
    pub fn all() -> Self {
        Self { detail: true, edit: true, toggle: true, delete: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    SortChange(String),
    PageChange(u32),
}

/// Cabeçalho com a seta da coluna ordenada.
pub fn header_label<T>(col: &Column<T>, sort_by: &str, order: SortOrder) -> String {
    match col.sort_key {
        Some(key) if !sort_by.is_empty() && key == sort_by => {
            let arrow = match order {
                SortOrder::Asc => " ▲",
                SortOrder::Desc => " ▼",
            };
            format!("{}{}", col.header, arrow)
        }
        _ => col.header.to_string(),
    }
}

/// Clique no cabeçalho; colunas sem chave não emitem nada.
pub fn click_header<T>(col: &Column<T>) -> Option<TableEvent> {
    col.sort_key.map(|key| TableEvent::SortChange(key.to_string()))
}

pub fn render_row<T>(columns: &[Column<T>], item: &T) -> Vec<String> {
    columns.iter().map(|c| (c.render)(item)).collect()
}

pub fn range_label(page: u32, page_size: u32, total: i64) -> String {
    if total <= 0 {
        return "Mostrando 0-0 de 0".to_string();
    }
    let start = i64::from(page.saturating_sub(1)) * i64::from(page_size) + 1;
    let end = (i64::from(page) * i64::from(page_size)).min(total);
    format!("Mostrando {}-{} de {}", start, end, total)
}

/// Caixa de texto "ir para página".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInput {
    pub text: String,
    current: u32,
    total_pages: u32,
}

impl PageInput {
    pub fn new(current: u32, total_pages: u32) -> Self {
        Self { text: current.to_string(), current, total_pages: total_pages.max(1) }
    }

    /// Sincroniza com a página atual depois de uma busca.
    pub fn sync(&mut self, current: u32, total_pages: u32) {
        *self = Self::new(current, total_pages);
    }

    pub fn type_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn enter(&mut self) -> Option<TableEvent> {
        match self.text.trim().parse::<u32>() {
            Ok(p) if (1..=self.total_pages).contains(&p) => {
                self.current = p;
                self.text = p.to_string();
                Some(TableEvent::PageChange(p))
            }
            _ => {
                self.text = self.current.to_string();
                None
            }
        }
    }

    pub fn blur(&mut self) {
        self.text = self.current.to_string();
    }

    pub fn prev(&mut self) -> Option<TableEvent> {
        (self.current > 1).then(|| {
            self.current -= 1;
            self.text = self.current.to_string();
            TableEvent::PageChange(self.current)
        })
    }

    pub fn next(&mut self) -> Option<TableEvent> {
        (self.current < self.total_pages).then(|| {
            self.current += 1;
            self.text = self.current.to_string();
            TableEvent::PageChange(self.current)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::categoria::Categoria;
    use pretty_assertions::assert_eq;

    fn colunas() -> Vec<Column<Categoria>> {
        vec![
            Column::new("Nombre", |c: &Categoria| c.nombre.clone()).sortable("nombre"),
            Column::new("Estado", |c: &Categoria| if c.estado { "Activo" } else { "Inactivo" }.to_string()),
        ]
    }

    #[test]
    fn seta_so_na_coluna_ativa() {
        let cols = colunas();
        assert_eq!(header_label(&cols[0], "nombre", SortOrder::Asc), "Nombre ▲");
        assert_eq!(header_label(&cols[0], "nombre", SortOrder::Desc), "Nombre ▼");
        assert_eq!(header_label(&cols[0], "", SortOrder::Asc), "Nombre");
        assert_eq!(header_label(&cols[1], "nombre", SortOrder::Asc), "Estado");
        assert_eq!(click_header(&cols[1]), None);
        assert_eq!(click_header(&cols[0]), Some(TableEvent::SortChange("nombre".into())));
    }

    #[test]
    fn linha_renderizada() {
        let c = Categoria { id: 1, nombre: "Ropa".into(), descripcion: None, estado: false };
        assert_eq!(render_row(&colunas(), &c), vec!["Ropa".to_string(), "Inactivo".to_string()]);
    }

    #[test]
    fn faixa_exibida() {
        assert_eq!(range_label(1, 10, 0), "Mostrando 0-0 de 0");
        assert_eq!(range_label(1, 10, 25), "Mostrando 1-10 de 25");
        assert_eq!(range_label(3, 10, 25), "Mostrando 21-25 de 25");
    }

    #[test]
    fn entrada_de_pagina() {
        let mut input = PageInput::new(2, 5);
        input.type_text("4");
        assert_eq!(input.enter(), Some(TableEvent::PageChange(4)));

        input.type_text("9");
        assert_eq!(input.enter(), None);
        assert_eq!(input.text, "4");

        input.type_text("abc");
        input.blur();
        assert_eq!(input.text, "4");
    }

    #[test]
    fn anterior_e_proxima_limitadas() {
        let mut input = PageInput::new(1, 2);
        assert_eq!(input.prev(), None);
        assert_eq!(input.next(), Some(TableEvent::PageChange(2)));
        assert_eq!(input.next(), None);
    }
}
