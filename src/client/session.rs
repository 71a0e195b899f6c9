// src/client/session.rs

use std::sync::Mutex;

use async_trait::async_trait;

use super::http::{ApiClient, ClientError};
use crate::models::usuario::UsuarioRead;

pub const ROL_ADMIN: i32 = 1;

/// Onde o token sobrevive entre execuções (localStorage no navegador).
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self) -> Option<String>;
    async fn set(&self, token: &str);
    async fn clear(&self);
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore(Mutex<Option<String>>);

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self(Mutex::new(Some(token.to_string())))
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Option<String> {
        self.0.lock().ok().and_then(|t| t.clone())
    }

    async fn set(&self, token: &str) {
        if let Ok(mut t) = self.0.lock() {
            *t = Some(token.to_string());
        }
    }

    async fn clear(&self) {
        if let Ok(mut t) = self.0.lock() {
            *t = None;
        }
    }
}

/// Sessão do usuário logado. Dona do `ApiClient`, que carrega o token.
pub struct Session<S: TokenStore> {
    api: ApiClient,
    store: S,
    user: Option<UsuarioRead>,
    pub is_loading: bool,
}

impl<S: TokenStore> Session<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self { api, store, user: None, is_loading: true }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn user(&self) -> Option<&UsuarioRead> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.rol_id == ROL_ADMIN)
    }

    /// Restaura a sessão a partir do token guardado; token rejeitado é descartado.
    pub async fn init(&mut self) {
        self.is_loading = true;
        if let Some(token) = self.store.get().await {
            self.api.set_token(Some(token));
            match self.api.me().await {
                Ok(user) => self.user = Some(user),
                Err(err) => {
                    tracing::info!(erro = %err, "token salvo rejeitado");
                    self.reset().await;
                }
            }
        }
        self.is_loading = false;
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&UsuarioRead, ClientError> {
        let token = self.api.login(email, password).await?;
        self.store.set(&token.access_token).await;
        self.api.set_token(Some(token.access_token));

        match self.api.me().await {
            Ok(user) => Ok(&*self.user.insert(user)),
            Err(err) => {
                self.reset().await;
                Err(err)
            }
        }
    }

    pub async fn logout(&mut self) {
        self.reset().await;
    }

    async fn reset(&mut self) {
        self.store.clear().await;
        self.api.set_token(None);
        self.user = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Protected,
    AdminOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectLogin,
    Forbidden,
    /// Sessão ainda sendo restaurada
    Wait,
}

pub struct RouteGuard;

impl RouteGuard {
    pub fn access_for(path: &str) -> RouteAccess {
        let first = path.trim_start_matches('/').split('/').next().unwrap_or("");
        match first {
            "login" | "register" => RouteAccess::Public,
            "usuarios" => RouteAccess::AdminOnly,
            _ => RouteAccess::Protected,
        }
    }

    pub fn decide<S: TokenStore>(session: &Session<S>, access: RouteAccess) -> Decision {
        if access == RouteAccess::Public {
            return Decision::Allow;
        }
        if session.is_loading {
            return Decision::Wait;
        }
        if !session.is_authenticated() {
            return Decision::RedirectLogin;
        }
        if access == RouteAccess::AdminOnly && !session.is_admin() {
            return Decision::Forbidden;
        }
        Decision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{http::HttpResponse, testing::FakeTransport};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn usuario(rol_id: i32) -> serde_json::Value {
        json!({"id": 1, "nombre": "Admin", "email": "admin@sonyco.co", "rol_id": rol_id, "estado": true})
    }

    #[tokio::test]
    async fn init_descarta_token_invalido() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(401, &json!({"detail": "No se pudo validar las credenciales"})));

        let mut session = Session::new(ApiClient::new(fake.clone()), MemoryTokenStore::with_token("velho"));
        session.init().await;

        assert!(!session.is_authenticated());
        assert!(!session.is_loading);
        assert_eq!(session.store.get().await, None);
        assert_eq!(session.api().token(), None);
        assert_eq!(fake.requests()[0].token.as_deref(), Some("velho"));
    }

    #[tokio::test]
    async fn init_sem_token_nao_chama_api() {
        let fake = FakeTransport::new();
        let mut session = Session::new(ApiClient::new(fake.clone()), MemoryTokenStore::default());
        session.init().await;
        assert!(fake.requests().is_empty());
        assert_eq!(RouteGuard::decide(&session, RouteAccess::Protected), Decision::RedirectLogin);
    }

    #[tokio::test]
    async fn login_guarda_token_e_carrega_usuario() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(200, &json!({"access_token": "abc", "token_type": "bearer"})));
        fake.respond(HttpResponse::json(200, &usuario(2)));

        let mut session = Session::new(ApiClient::new(fake.clone()), MemoryTokenStore::default());
        session.is_loading = false;
        let user = session.login("vendedor@sonyco.co", "segredo").await.unwrap();
        assert_eq!(user.rol_id, 2);

        assert_eq!(session.store.get().await.as_deref(), Some("abc"));
        assert_eq!(fake.requests()[1].token.as_deref(), Some("abc"));
        assert!(!session.is_admin());
        assert_eq!(RouteGuard::decide(&session, RouteAccess::AdminOnly), Decision::Forbidden);
        assert_eq!(RouteGuard::decide(&session, RouteAccess::Protected), Decision::Allow);

        session.logout().await;
        assert_eq!(session.store.get().await, None);
        assert_eq!(RouteGuard::decide(&session, RouteAccess::Protected), Decision::RedirectLogin);
    }

    #[tokio::test]
    async fn login_falho_propaga_erro() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(401, &json!({"detail": "Email o contraseña incorrectos"})));

        let mut session = Session::new(ApiClient::new(fake), MemoryTokenStore::default());
        let err = session.login("x@y.co", "errada").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn rotas_de_usuarios_sao_so_admin() {
        assert_eq!(RouteGuard::access_for("/usuarios/3/editar"), RouteAccess::AdminOnly);
        assert_eq!(RouteGuard::access_for("/login"), RouteAccess::Public);
        assert_eq!(RouteGuard::access_for("/ventas"), RouteAccess::Protected);
    }
}
