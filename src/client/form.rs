// src/client/form.rs
//
// Formulários declarativos de criação e edição. O esquema é uma lista de
// `Field`; os valores vivem como texto e só viram JSON no envio.

use std::{collections::BTreeMap, time::Duration};

use serde_json::{Map, Number, Value};

use super::{
    api::Resource,
    entity::{mutation_error, InFlight, Mutation},
    http::ApiClient,
    notify::{self, Notice},
};

pub const MSG_PASSWORDS: &str = "Las contraseñas no coinciden";
pub const NOTIFY_DELAY: Duration = Duration::from_millis(100);

pub type Validator = fn(&str) -> Option<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Number,
    TextArea,
    Select(Vec<SelectOption>),
    Boolean,
    /// `confirm` aponta para o campo que precisa repetir a senha.
    Password { confirm: Option<&'static str> },
    InfiniteSelect { endpoint: &'static str },
    /// Só leitura; nunca é enviado.
    Display,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: Option<&'static str>,
    pub validation: Option<Validator>,
}

impl Field {
    pub fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { key, label, kind, required: false, placeholder: None, validation: None }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, text: &'static str) -> Self {
        self.placeholder = Some(text);
        self
    }

    pub fn validate_with(mut self, f: Validator) -> Self {
        self.validation = Some(f);
        self
    }
}

pub type Values = BTreeMap<String, String>;
pub type Errors = BTreeMap<String, String>;

fn value<'a>(values: &'a Values, key: &str) -> &'a str {
    values.get(key).map(|v| v.trim()).unwrap_or("")
}

fn confirm_keys(schema: &[Field]) -> Vec<&'static str> {
    schema
        .iter()
        .filter_map(|f| match f.kind {
            FieldKind::Password { confirm } => confirm,
            _ => None,
        })
        .collect()
}

/// Valida todos os campos na ordem do esquema, juntando os erros.
pub fn validate(schema: &[Field], values: &Values) -> Errors {
    let mut errors = Errors::new();

    for field in schema.iter().filter(|f| f.kind != FieldKind::Display) {
        let v = value(values, field.key);

        if v.is_empty() {
            if field.required {
                errors.insert(field.key.to_string(), format!("{} es requerido", field.label));
            }
            continue;
        }

        if field.kind == FieldKind::Number && v.parse::<f64>().is_err() {
            errors.insert(field.key.to_string(), format!("{} debe ser un número", field.label));
            continue;
        }

        if let Some(msg) = field.validation.and_then(|f| f(v)) {
            errors.insert(field.key.to_string(), msg);
        }
    }

    for field in schema {
        if let FieldKind::Password { confirm: Some(confirm) } = field.kind {
            let senha = value(values, field.key);
            if !senha.is_empty() && senha != value(values, confirm) && !errors.contains_key(confirm) {
                errors.insert(confirm.to_string(), MSG_PASSWORDS.to_string());
            }
        }
    }

    errors
}

fn to_json(kind: &FieldKind, raw: &str) -> Value {
    match kind {
        FieldKind::Boolean => Value::Bool(raw == "true"),
        FieldKind::Number | FieldKind::InfiniteSelect { .. } | FieldKind::Select(_) => raw
            .parse::<i64>()
            .map(Value::from)
            .ok()
            .or_else(|| raw.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number))
            .unwrap_or_else(|| Value::String(raw.to_string())),
        _ => Value::String(raw.to_string()),
    }
}

/// Corpo do envio: sem campos vazios, sem confirmação e sem campos de exibição.
pub fn payload(schema: &[Field], values: &Values) -> Value {
    let confirms = confirm_keys(schema);
    let mut body = Map::new();
    for field in schema {
        if field.kind == FieldKind::Display || confirms.contains(&field.key) {
            continue;
        }
        let v = value(values, field.key);
        if v.is_empty() {
            continue;
        }
        body.insert(field.key.to_string(), to_json(&field.kind, v));
    }
    Value::Object(body)
}

/// Corpo do PATCH: todos os campos vão, inclusive os apagados. Só a senha
/// vazia e a confirmação ficam de fora.
pub fn edit_payload(schema: &[Field], values: &Values) -> Value {
    let confirms = confirm_keys(schema);
    let mut body = Map::new();
    for field in schema {
        if field.kind == FieldKind::Display || confirms.contains(&field.key) {
            continue;
        }
        let v = value(values, field.key);
        let json = match &field.kind {
            FieldKind::Password { .. } if v.is_empty() => continue,
            FieldKind::Number | FieldKind::Select(_) | FieldKind::InfiniteSelect { .. } if v.is_empty() => Value::Null,
            kind => to_json(kind, v),
        };
        body.insert(field.key.to_string(), json);
    }
    Value::Object(body)
}

fn from_json(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigate(pub String);

/// Aviso a exibir depois de `delay` (a tela já navegou).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled {
    pub delay: Duration,
    pub notice: Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Saved { navigate: Navigate, notification: Scheduled },
    Invalid,
    Failed { banner: String, notification: Notice },
    /// Envio em andamento ou nada mudou
    Ignored,
}

fn saved(back_path: &str, id: &Value, notice: Notice) -> FormOutcome {
    FormOutcome::Saved {
        navigate: Navigate(format!("/{}/{}", back_path.trim_matches('/'), from_json(id))),
        notification: Scheduled { delay: NOTIFY_DELAY, notice },
    }
}

pub struct CreateForm {
    resource: Resource,
    schema: Vec<Field>,
    back_path: String,
    pub values: Values,
    pub errors: Errors,
    pub banner: Option<String>,
    in_flight: InFlight,
}

impl CreateForm {
    pub fn new(resource: Resource, schema: Vec<Field>, back_path: &str) -> Self {
        let values = schema
            .iter()
            .filter(|f| f.kind == FieldKind::Boolean)
            .map(|f| (f.key.to_string(), "true".to_string()))
            .collect();
        Self {
            resource,
            schema,
            back_path: back_path.to_string(),
            values,
            errors: Errors::new(),
            banner: None,
            in_flight: InFlight::default(),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
        self.errors.remove(key);
    }

    pub fn payload(&self) -> Value {
        payload(&self.schema, &self.values)
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_active()
    }

    pub async fn submit(&mut self, api: &ApiClient) -> FormOutcome {
        self.errors = validate(&self.schema, &self.values);
        if !self.errors.is_empty() {
            return FormOutcome::Invalid;
        }
        if !self.in_flight.try_begin() {
            return FormOutcome::Ignored;
        }

        let result = api.create::<_, Value>(self.resource, &self.payload()).await;
        self.in_flight.finish();

        match result {
            Ok(created) => {
                self.banner = None;
                saved(&self.back_path, &created["id"], notify::entity_created(self.resource.singular()))
            }
            Err(err) => {
                let msg = mutation_error(self.resource, Mutation::Create, &err);
                self.banner = Some(msg.clone());
                FormOutcome::Failed {
                    notification: notify::entity_error("crear", self.resource.singular(), Some(&msg)),
                    banner: msg,
                }
            }
        }
    }
}

pub struct EditForm {
    resource: Resource,
    schema: Vec<Field>,
    back_path: String,
    id: i32,
    original: Values,
    pub values: Values,
    pub errors: Errors,
    pub banner: Option<String>,
    in_flight: InFlight,
}

impl EditForm {
    /// Semeia os valores a partir do registro carregado; senhas começam vazias.
    pub fn new(resource: Resource, schema: Vec<Field>, id: i32, record: &Value, back_path: &str) -> Self {
        let values: Values = schema
            .iter()
            .map(|f| {
                let v = match f.kind {
                    FieldKind::Password { .. } => String::new(),
                    _ => record.get(f.key).map(from_json).unwrap_or_default(),
                };
                (f.key.to_string(), v)
            })
            .collect();
        Self {
            resource,
            schema,
            back_path: back_path.to_string(),
            id,
            original: values.clone(),
            values,
            errors: Errors::new(),
            banner: None,
            in_flight: InFlight::default(),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
        self.errors.remove(key);
    }

    pub fn has_changes(&self) -> bool {
        self.schema
            .iter()
            .filter(|f| f.kind != FieldKind::Display)
            .any(|f| value(&self.values, f.key) != value(&self.original, f.key))
    }

    pub fn payload(&self) -> Value {
        edit_payload(&self.schema, &self.values)
    }

    pub async fn submit(&mut self, api: &ApiClient) -> FormOutcome {
        if !self.has_changes() {
            return FormOutcome::Ignored;
        }
        self.errors = validate(&self.schema, &self.values);
        if !self.errors.is_empty() {
            return FormOutcome::Invalid;
        }
        if !self.in_flight.try_begin() {
            return FormOutcome::Ignored;
        }

        let result = api.update::<_, Value>(self.resource, self.id, &self.payload()).await;
        self.in_flight.finish();

        match result {
            Ok(_) => {
                self.banner = None;
                self.original = self.values.clone();
                saved(&self.back_path, &Value::from(self.id), notify::entity_updated(self.resource.singular()))
            }
            Err(err) => {
                let msg = mutation_error(self.resource, Mutation::Update, &err);
                self.banner = Some(msg.clone());
                FormOutcome::Failed {
                    notification: notify::entity_error("actualizar", self.resource.singular(), Some(&msg)),
                    banner: msg,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{http::HttpResponse, testing::FakeTransport};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn email_valido(v: &str) -> Option<String> {
        (!v.contains('@')).then(|| "Email inválido".to_string())
    }

    fn esquema_usuario() -> Vec<Field> {
        vec![
            Field::new("id", "ID", FieldKind::Display),
            Field::new("nombre", "Nombre", FieldKind::Text).required(),
            Field::new("email", "Email", FieldKind::Email).required().validate_with(email_valido),
            Field::new("contrasena", "Contraseña", FieldKind::Password { confirm: Some("confirmar") }),
            Field::new("confirmar", "Confirmar contraseña", FieldKind::Password { confirm: None }),
            Field::new(
                "rol_id",
                "Rol",
                FieldKind::Select(vec![SelectOption::new("1", "Admin"), SelectOption::new("2", "Usuario")]),
            ),
            Field::new("estado", "Estado", FieldKind::Boolean),
        ]
    }

    #[test]
    fn coleta_todos_os_erros() {
        let mut values = Values::new();
        values.insert("email".into(), "sem-arroba".into());
        values.insert("contrasena".into(), "abc".into());
        values.insert("confirmar".into(), "abd".into());

        let errors = validate(&esquema_usuario(), &values);
        assert_eq!(errors.get("nombre").map(String::as_str), Some("Nombre es requerido"));
        assert_eq!(errors.get("email").map(String::as_str), Some("Email inválido"));
        assert_eq!(errors.get("confirmar").map(String::as_str), Some(MSG_PASSWORDS));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn create_semeia_booleanos_e_limpa_payload() {
        let mut form = CreateForm::new(Resource::Usuarios, esquema_usuario(), "usuarios");
        form.set("nombre", "Ana");
        form.set("email", "ana@sonyco.co");
        form.set("contrasena", "x1");
        form.set("confirmar", "x1");
        form.set("rol_id", "");

        assert_eq!(
            form.payload(),
            json!({"nombre": "Ana", "email": "ana@sonyco.co", "contrasena": "x1", "estado": true})
        );
    }

    #[tokio::test]
    async fn create_ok_navega_e_agenda_aviso() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(201, &json!({"id": 12, "nombre": "Calzado"})));

        let api = ApiClient::new(fake.clone());
        let schema = vec![Field::new("nombre", "Nombre", FieldKind::Text).required()];
        let mut form = CreateForm::new(Resource::Categorias, schema, "categorias");
        form.set("nombre", "Calzado");

        match form.submit(&api).await {
            FormOutcome::Saved { navigate, notification } => {
                assert_eq!(navigate, Navigate("/categorias/12".into()));
                assert_eq!(notification.delay, Duration::from_millis(100));
                assert_eq!(notification.notice.title, "Categoría creado");
            }
            other => panic!("esperava Saved, veio {:?}", other),
        }
        assert_eq!(fake.requests()[0].path, "/categorias");
    }

    #[tokio::test]
    async fn create_falho_mantem_valores() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(409, &json!({"detail": "El cliente con email 'a@b.co' ya existe"})));

        let api = ApiClient::new(fake);
        let schema = vec![Field::new("email", "Email", FieldKind::Email).required()];
        let mut form = CreateForm::new(Resource::Clientes, schema, "clientes");
        form.set("email", "a@b.co");

        let outcome = form.submit(&api).await;
        assert!(matches!(outcome, FormOutcome::Failed { ref banner, .. } if banner == "Ya existe un registro con estos datos"));
        assert_eq!(form.values.get("email").map(String::as_str), Some("a@b.co"));
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn edit_sem_mudancas_nao_envia() {
        let fake = FakeTransport::new();
        let api = ApiClient::new(fake.clone());
        let record = json!({"id": 3, "nombre": "Ana", "email": "ana@sonyco.co", "rol_id": 2, "estado": true});

        let mut form = EditForm::new(Resource::Usuarios, esquema_usuario(), 3, &record, "usuarios");
        assert!(!form.has_changes());
        assert_eq!(form.submit(&api).await, FormOutcome::Ignored);
        assert!(fake.requests().is_empty());
    }

    #[tokio::test]
    async fn edit_omite_senha_vazia() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(200, &json!({"id": 3})));
        let api = ApiClient::new(fake.clone());
        let record = json!({"id": 3, "nombre": "Ana", "email": "ana@sonyco.co", "rol_id": 2, "estado": true});

        let mut form = EditForm::new(Resource::Usuarios, esquema_usuario(), 3, &record, "usuarios");
        form.set("nombre", "Ana María");
        let outcome = form.submit(&api).await;

        assert!(matches!(outcome, FormOutcome::Saved { ref navigate, .. } if navigate.0 == "/usuarios/3"));
        let body = fake.requests()[0].body.clone().unwrap();
        assert_eq!(body, json!({"nombre": "Ana María", "email": "ana@sonyco.co", "rol_id": 2, "estado": true}));
    }

    #[tokio::test]
    async fn edit_envia_campo_opcional_apagado() {
        let fake = FakeTransport::new();
        fake.respond(HttpResponse::json(200, &json!({"id": 4})));
        let api = ApiClient::new(fake.clone());
        let schema = vec![
            Field::new("nombre", "Nombre", FieldKind::Text).required(),
            Field::new("descripcion", "Descripción", FieldKind::TextArea),
        ];
        let record = json!({"id": 4, "nombre": "Ropa", "descripcion": "vieja"});

        let mut form = EditForm::new(Resource::Categorias, schema, 4, &record, "categorias");
        form.set("descripcion", "");
        assert!(form.has_changes());
        let outcome = form.submit(&api).await;

        assert!(matches!(outcome, FormOutcome::Saved { .. }));
        let body = fake.requests()[0].body.clone().unwrap();
        assert_eq!(body, json!({"nombre": "Ropa", "descripcion": ""}));
    }

    #[test]
    fn confirmacao_sem_senha_nao_acusa_divergencia() {
        let mut values = Values::new();
        values.insert("nombre".into(), "Ana".into());
        values.insert("email".into(), "ana@sonyco.co".into());
        values.insert("confirmar".into(), "abc".into());

        let errors = validate(&esquema_usuario(), &values);
        assert!(errors.is_empty(), "{:?}", errors);
    }
}
