//! In-memory stand-in for the step-ca endpoints the provider consumes
//!
//! Signing always returns the same certificate (serial `1`), which is also
//! what `/certificates/1` and `/root` serve. Provisioners, admins and
//! templates live in memory and answer 404 when absent, like the real CA.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{Admin, Provisioner, SignRequest, SignResponse, Template};

/// Version string reported by `/version`
pub const DUMMY_VERSION: &str = "1.2.3";

/// Serial of [`DUMMY_CERTIFICATE_PEM`]
pub const DUMMY_CERTIFICATE_SERIAL: &str = "1";

/// Self-signed certificate for `dummy.local` with serial 1
pub const DUMMY_CERTIFICATE_PEM: &str = "-----BEGIN CERTIFICATE-----
MIIC3DCCAcSgAwIBAgIBATANBgkqhkiG9w0BAQsFADAWMRQwEgYDVQQDEwtkdW1t
eS5sb2NhbDAeFw0yNTExMTYyMDQ0MjJaFw0yNjExMTYyMTQ0MjJaMBYxFDASBgNV
BAMTC2R1bW15LmxvY2FsMIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEA
3AQdtoqg/gsuz1SC7Q4Ej435Ru8jGz6VbtLbQBUzVQ8N+UxYX3OhYhpFgID4XGKw
8Lcq1ZnsgMGW1lTD+V1icwiUxpPQGTHXyj4Y0j8ZNbD581Nl5cdU+1idljk0bXaG
Uv2PJ7IgI70inUXRfIC3iaTODUI9deInCp/OJbxLaUD2xYoc4cTEEcNnhZ6VDICA
X2hT5nfEVSoE1iupQjwHhDEAWJ+1nr6KAmYHUn5imrJOJtS+wOl+qjUD2ytcPCjU
9zKDl6QuftfiQaV7nv9HJQGfN6gypnErk/aZ1FfuJEoxllmjH5yyGEcRAXUBN7pb
o8QmjNhCBy3Y6CxCA3BDYwIDAQABozUwMzAOBgNVHQ8BAf8EBAMCB4AwEwYDVR0l
BAwwCgYIKwYBBQUHAwIwDAYDVR0TAQH/BAIwADANBgkqhkiG9w0BAQsFAAOCAQEA
CgGD5HyPork/2Tlol5jw63fUqFQmT70pDTwk9CFYjcNFloKimCGKI/ZwSl9hwmai
h1MLzJ+XxzMQS9WYAVddZNQ8Odz0URv4RccnyMWdonF/bqC4Roo6Yg1/2kXBX/Ab
Bu0HvVxEl2A3R3hPxxlCHk5E2etUX7ypASSpJdC7suKYfnVrLpBGJvYTAlynjDUV
7GC6lyggtK9eLYrFNGGzIJorlcldgzEMjokE8+lxG44CKxzribD4X+dMO010OizK
D4PQdtDGBYKwgZfRNwbffscpgVL8jIYJYP/TZ35gwYKjRmOWozTAXzT679GtOuGf
VaUbNVhtYshJXaMN0aTS/w==
-----END CERTIFICATE-----
";

#[derive(Debug, Default)]
struct Store {
    provisioners: BTreeMap<String, Provisioner>,
    admins: BTreeMap<(String, String), Admin>,
    templates: BTreeMap<String, Template>,
}

/// Shared handle to the in-memory store
#[derive(Clone, Default)]
pub struct DummyCaState {
    store: Arc<RwLock<Store>>,
}

/// Dummy CA errors
#[derive(Debug, Error)]
pub enum DummyCaError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    status: u16,
    message: String,
}

impl IntoResponse for DummyCaError {
    fn into_response(self) -> Response {
        let status = match &self {
            DummyCaError::NotFound(_) => StatusCode::NOT_FOUND,
            DummyCaError::Conflict(_) => StatusCode::CONFLICT,
            DummyCaError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        let body = ErrorBody {
            status: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type DummyResult<T> = Result<T, DummyCaError>;

#[derive(Debug, Deserialize)]
struct AdminQuery {
    provisioner: String,
}

/// Build the dummy CA router
pub fn router() -> Router {
    Router::new()
        .route("/version", get(version))
        .route("/root", get(root))
        .route("/sign", post(sign))
        .route("/certificates/{serial}", get(certificate))
        .route(
            "/admin/provisioners",
            get(list_provisioners).post(create_provisioner),
        )
        .route(
            "/admin/provisioners/{name}",
            get(get_provisioner)
                .put(replace_provisioner)
                .delete(delete_provisioner),
        )
        .route("/admin/admins", post(create_admin))
        .route(
            "/admin/admins/{name}",
            get(get_admin).put(replace_admin).delete(delete_admin),
        )
        .route("/admin/templates", post(create_template))
        .route(
            "/admin/templates/{name}",
            get(get_template).put(update_template).delete(delete_template),
        )
        .with_state(DummyCaState::default())
}

async fn version() -> &'static str {
    DUMMY_VERSION
}

async fn root() -> &'static str {
    DUMMY_CERTIFICATE_PEM
}

async fn sign(Json(req): Json<SignRequest>) -> DummyResult<Json<SignResponse>> {
    if req.csr.is_empty() {
        return Err(DummyCaError::BadRequest("csr is required".to_string()));
    }
    debug!(ott_present = !req.ott.is_empty(), "signing request");
    Ok(Json(SignResponse {
        crt: DUMMY_CERTIFICATE_PEM.to_string(),
    }))
}

async fn certificate(Path(serial): Path<String>) -> DummyResult<&'static str> {
    if serial == DUMMY_CERTIFICATE_SERIAL {
        Ok(DUMMY_CERTIFICATE_PEM)
    } else {
        Err(DummyCaError::NotFound(format!("certificate {}", serial)))
    }
}

async fn list_provisioners(State(state): State<DummyCaState>) -> Json<Vec<Provisioner>> {
    let store = state.store.read().await;
    Json(store.provisioners.values().cloned().collect())
}

async fn create_provisioner(
    State(state): State<DummyCaState>,
    Json(provisioner): Json<Provisioner>,
) -> DummyResult<impl IntoResponse> {
    let mut store = state.store.write().await;
    if store.provisioners.contains_key(&provisioner.name) {
        return Err(DummyCaError::Conflict(format!(
            "provisioner {} already exists",
            provisioner.name
        )));
    }
    info!(name = %provisioner.name, "provisioner created");
    store
        .provisioners
        .insert(provisioner.name.clone(), provisioner.clone());
    Ok((StatusCode::CREATED, Json(provisioner)))
}

async fn get_provisioner(
    State(state): State<DummyCaState>,
    Path(name): Path<String>,
) -> DummyResult<Json<Provisioner>> {
    let store = state.store.read().await;
    store
        .provisioners
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| DummyCaError::NotFound(format!("provisioner {}", name)))
}

async fn replace_provisioner(
    State(state): State<DummyCaState>,
    Path(name): Path<String>,
    Json(provisioner): Json<Provisioner>,
) -> DummyResult<Json<Provisioner>> {
    let mut store = state.store.write().await;
    if store.provisioners.remove(&name).is_none() {
        return Err(DummyCaError::NotFound(format!("provisioner {}", name)));
    }
    store
        .provisioners
        .insert(provisioner.name.clone(), provisioner.clone());
    Ok(Json(provisioner))
}

async fn delete_provisioner(
    State(state): State<DummyCaState>,
    Path(name): Path<String>,
) -> DummyResult<StatusCode> {
    let mut store = state.store.write().await;
    store
        .provisioners
        .remove(&name)
        .map(|_| StatusCode::OK)
        .ok_or_else(|| DummyCaError::NotFound(format!("provisioner {}", name)))
}

async fn create_admin(
    State(state): State<DummyCaState>,
    Json(admin): Json<Admin>,
) -> DummyResult<impl IntoResponse> {
    let mut store = state.store.write().await;
    let key = (admin.name.clone(), admin.provisioner.clone());
    if store.admins.contains_key(&key) {
        return Err(DummyCaError::Conflict(format!(
            "admin {} already exists in {}",
            admin.name, admin.provisioner
        )));
    }
    store.admins.insert(key, admin.clone());
    Ok((StatusCode::CREATED, Json(admin)))
}

async fn get_admin(
    State(state): State<DummyCaState>,
    Path(name): Path<String>,
    Query(query): Query<AdminQuery>,
) -> DummyResult<Json<Admin>> {
    let store = state.store.read().await;
    store
        .admins
        .get(&(name.clone(), query.provisioner))
        .cloned()
        .map(Json)
        .ok_or_else(|| DummyCaError::NotFound(format!("admin {}", name)))
}

async fn replace_admin(
    State(state): State<DummyCaState>,
    Path(name): Path<String>,
    Query(query): Query<AdminQuery>,
    Json(admin): Json<Admin>,
) -> DummyResult<Json<Admin>> {
    let mut store = state.store.write().await;
    if store
        .admins
        .remove(&(name.clone(), query.provisioner))
        .is_none()
    {
        return Err(DummyCaError::NotFound(format!("admin {}", name)));
    }
    store
        .admins
        .insert((admin.name.clone(), admin.provisioner.clone()), admin.clone());
    Ok(Json(admin))
}

async fn delete_admin(
    State(state): State<DummyCaState>,
    Path(name): Path<String>,
    Query(query): Query<AdminQuery>,
) -> DummyResult<StatusCode> {
    let mut store = state.store.write().await;
    store
        .admins
        .remove(&(name.clone(), query.provisioner))
        .map(|_| StatusCode::OK)
        .ok_or_else(|| DummyCaError::NotFound(format!("admin {}", name)))
}

async fn create_template(
    State(state): State<DummyCaState>,
    Json(template): Json<Template>,
) -> DummyResult<impl IntoResponse> {
    let mut store = state.store.write().await;
    if store.templates.contains_key(&template.name) {
        return Err(DummyCaError::Conflict(format!(
            "template {} already exists",
            template.name
        )));
    }
    store
        .templates
        .insert(template.name.clone(), template.clone());
    Ok((StatusCode::CREATED, Json(template)))
}

async fn get_template(
    State(state): State<DummyCaState>,
    Path(name): Path<String>,
) -> DummyResult<Json<Template>> {
    let store = state.store.read().await;
    store
        .templates
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| DummyCaError::NotFound(format!("template {}", name)))
}

async fn update_template(
    State(state): State<DummyCaState>,
    Path(name): Path<String>,
    Json(template): Json<Template>,
) -> DummyResult<Json<Template>> {
    let mut store = state.store.write().await;
    if !store.templates.contains_key(&name) {
        return Err(DummyCaError::NotFound(format!("template {}", name)));
    }
    store.templates.insert(name, template.clone());
    Ok(Json(template))
}

async fn delete_template(
    State(state): State<DummyCaState>,
    Path(name): Path<String>,
) -> DummyResult<StatusCode> {
    let mut store = state.store.write().await;
    store
        .templates
        .remove(&name)
        .map(|_| StatusCode::OK)
        .ok_or_else(|| DummyCaError::NotFound(format!("template {}", name)))
}
