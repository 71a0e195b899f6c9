// src/client/notify.rs

use std::time::{Duration, Instant};

use uuid::Uuid;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);
const MSG_INESPERADO: &str = "Ocurrió un error inesperado";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// O que se quer avisar, antes de entrar na fila.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NotificationKind,
    pub title: String,
    pub message: Option<String>,
}

impl Notice {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: Option<String>) -> Self {
        Self { kind, title: title.into(), message }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: Option<String>,
    pub duration: Duration,
    created_at: Instant,
}

#[derive(Debug, Default)]
pub struct NotificationQueue {
    items: Vec<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice, now: Instant) -> Uuid {
        self.push_with_duration(notice, DEFAULT_DURATION, now)
    }

    pub fn push_with_duration(&mut self, notice: Notice, duration: Duration, now: Instant) -> Uuid {
        let id = Uuid::new_v4();
        self.items.push(Notification {
            id,
            kind: notice.kind,
            title: notice.title,
            message: notice.message,
            duration,
            created_at: now,
        });
        id
    }

    pub fn dismiss(&mut self, id: Uuid) {
        self.items.retain(|n| n.id != id);
    }

    /// Remove as vencidas e devolve quantas saíram.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        self.items
            .retain(|n| now.saturating_duration_since(n.created_at) < n.duration);
        before - self.items.len()
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }
}

// --- Mensagens padrão das telas ---

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// (artigo, nome de exibição)
fn display(entity: &str) -> (&'static str, String) {
    match entity.to_lowercase().as_str() {
        "venta" => ("La", "Venta".to_string()),
        "categoria" => ("La", "Categoría".to_string()),
        other => ("El", capitalize(other)),
    }
}

fn entity_success(entity: &str, participio: &str) -> Notice {
    let (article, name) = display(entity);
    Notice::new(
        NotificationKind::Success,
        format!("{} {}", name, participio),
        Some(format!("{} {} se ha {} exitosamente", article, name.to_lowercase(), participio)),
    )
}

pub fn entity_created(entity: &str) -> Notice {
    entity_success(entity, "creado")
}

pub fn entity_updated(entity: &str) -> Notice {
    entity_success(entity, "actualizado")
}

pub fn entity_deleted(entity: &str) -> Notice {
    entity_success(entity, "eliminado")
}

pub fn entity_error(action: &str, entity: &str, error: Option<&str>) -> Notice {
    Notice::new(
        NotificationKind::Error,
        format!("Error al {} {}", action, entity.to_lowercase()),
        Some(error.unwrap_or(MSG_INESPERADO).to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn artigo_feminino_para_venda_e_categoria() {
        let n = entity_created("categoria");
        assert_eq!(n.title, "Categoría creado");
        assert_eq!(n.message.as_deref(), Some("La categoría se ha creado exitosamente"));

        let n = entity_deleted("cliente");
        assert_eq!(n.title, "Cliente eliminado");
        assert_eq!(n.message.as_deref(), Some("El cliente se ha eliminado exitosamente"));
    }

    #[test]
    fn erro_sem_mensagem_usa_padrao() {
        let n = entity_error("actualizar", "Producto", None);
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.title, "Error al actualizar producto");
        assert_eq!(n.message.as_deref(), Some(MSG_INESPERADO));
    }

    #[test]
    fn fila_expira_e_dispensa() {
        let t0 = Instant::now();
        let mut q = NotificationQueue::new();
        let a = q.push(entity_updated("venta"), t0);
        q.push_with_duration(entity_created("producto"), Duration::from_secs(10), t0);
        assert_eq!(q.items().len(), 2);

        assert_eq!(q.expire(t0 + Duration::from_millis(4999)), 0);
        assert_eq!(q.expire(t0 + Duration::from_millis(5000)), 1);
        assert!(q.items().iter().all(|n| n.id != a));

        let b = q.items()[0].id;
        q.dismiss(b);
        assert!(q.items().is_empty());
    }
}
