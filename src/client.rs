// src/client.rs
//
// Núcleo do painel administrativo: chamadas à API e as máquinas de estado
// por trás das telas (listas, filtros, formulários, seletores, sessão).
// Nada aqui desenha; a camada de UI só dirige estes tipos.

pub mod api;
pub mod entity;
pub mod fecha;
pub mod filters;
pub mod form;
pub mod http;
pub mod infinite;
pub mod notify;
pub mod pagination;
pub mod session;
pub mod table;

pub use api::Resource;
pub use http::{ApiClient, ClientError, Transport};

#[cfg(test)]
pub(crate) mod testing;
