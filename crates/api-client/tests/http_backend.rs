//! Drives the real HTTP client against an in-process axum backend.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use clinic_api_client::HttpClinicBackend;
use clinic_core::{
    ClinicBackend, ClinicError, ClinicForm, ClinicQuery, DirectoryConfig, DirectoryStore,
    LookupField, SearchQuery, ServiceDraft, ServiceEntry,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct FakeServer {
    clinics: Arc<Mutex<Vec<Value>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeServer {
    fn seeded() -> Self {
        let server = FakeServer::default();
        server.clinics.lock().unwrap().extend([
            json!({
                "clinic_code": "C1",
                "name": "A",
                "doctor_name": "Dr Osei",
                "address": "1 Quay St",
                "services": [{"name": "Dental", "phone": "5551230000"}]
            }),
            json!({
                "clinicId": 7,
                "name": "Northside",
                "doctorName": "Dr Ng",
                "address": "2 Hill Rd",
                "phone": "5550001111",
                "services": ["X-Ray"]
            }),
        ]);
        server
    }

    fn log(&self, entry: String) {
        self.requests.lock().unwrap().push(entry);
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn render_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

async fn list(
    State(server): State<FakeServer>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<Value>> {
    server.log(format!("GET /api/clinics?{}", render_query(&pairs)));
    Json(server.clinics.lock().unwrap().clone())
}

async fn create(
    State(server): State<FakeServer>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, String)> {
    server.log(format!("POST /api/clinics {body}"));
    let code = body["clinic_code"].clone();
    let mut clinics = server.clinics.lock().unwrap();
    if clinics.iter().any(|c| c["clinic_code"] == code) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Clinic with this code already exists".into(),
        ));
    }
    clinics.push(body.clone());
    Ok((StatusCode::CREATED, Json(body)))
}

async fn search(
    State(server): State<FakeServer>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<Value>> {
    server.log(format!("GET /api/clinics/search?{}", render_query(&pairs)));
    Json(Vec::new())
}

async fn by_doctor(
    State(server): State<FakeServer>,
    Path(name): Path<String>,
) -> Json<Vec<Value>> {
    server.log(format!("GET /api/clinics/by-doctor-name/{name}"));
    let clinics = server.clinics.lock().unwrap();
    Json(
        clinics
            .iter()
            .filter(|c| c["doctor_name"] == name.as_str() || c["doctorName"] == name.as_str())
            .cloned()
            .collect(),
    )
}

async fn by_address(
    State(server): State<FakeServer>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<Value>> {
    server.log(format!("GET /api/clinics/by-address?{}", render_query(&pairs)));
    Json(Vec::new())
}

async fn by_services(
    State(server): State<FakeServer>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<Value>> {
    server.log(format!("GET /api/clinics/by-services?{}", render_query(&pairs)));
    Json(Vec::new())
}

async fn broken() -> impl IntoResponse {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn garbled() -> impl IntoResponse {
    (StatusCode::OK, "not json")
}

async fn start(server: FakeServer) -> String {
    let app = Router::new()
        .route("/api/clinics", get(list).post(create))
        .route("/api/clinics/search", get(search))
        .route("/api/clinics/by-doctor-name/:name", get(by_doctor))
        .route("/api/clinics/by-address", get(by_address))
        .route("/api/clinics/by-services", get(by_services))
        .with_state(server);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

async fn start_with(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

fn client(base: &str) -> HttpClinicBackend {
    HttpClinicBackend::new(&DirectoryConfig::new(base).expect("config")).expect("client")
}

#[tokio::test]
async fn fetch_normalises_both_naming_conventions() {
    let server = FakeServer::seeded();
    let base = start(server.clone()).await;

    let clinics = client(&base)
        .fetch_clinics(&ClinicQuery::default())
        .await
        .expect("fetch");

    assert_eq!(clinics.len(), 2);
    assert_eq!(clinics[0].code, "C1");
    assert_eq!(clinics[1].code, "7");
    assert_eq!(clinics[1].doctor_name, "Dr Ng");
    assert_eq!(clinics[1].services, vec![ServiceEntry::new("X-Ray", None)]);
    assert_eq!(server.requests(), vec!["GET /api/clinics?".to_string()]);
}

#[tokio::test]
async fn fetch_sends_filters_with_repeated_services() {
    let server = FakeServer::seeded();
    let base = start(server.clone()).await;

    let query = ClinicQuery {
        name: Some("north side".into()),
        phone: None,
        services: vec!["Dental".into(), "X-Ray".into()],
    };
    client(&base).fetch_clinics(&query).await.expect("fetch");

    assert_eq!(
        server.requests(),
        vec!["GET /api/clinics?name=north side&services=Dental&services=X-Ray".to_string()]
    );
}

#[tokio::test]
async fn lookups_hit_their_endpoints() {
    let server = FakeServer::seeded();
    let base = start(server.clone()).await;
    let api = client(&base);

    let found = api
        .lookup(LookupField::DoctorName, "Dr Ng")
        .await
        .expect("lookup");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Northside");

    api.lookup(LookupField::Address, "2 Hill Rd")
        .await
        .expect("lookup");
    api.search_clinics("dental & more").await.expect("search");
    api.search_by_services(&["Dental".into(), "Lab".into()])
        .await
        .expect("services");

    assert_eq!(
        server.requests(),
        vec![
            "GET /api/clinics/by-doctor-name/Dr Ng".to_string(),
            "GET /api/clinics/by-address?address=2 Hill Rd".to_string(),
            "GET /api/clinics/search?q=dental & more".to_string(),
            "GET /api/clinics/by-services?services=Dental&services=Lab".to_string(),
        ]
    );
}

#[tokio::test]
async fn create_posts_payload_and_store_reloads() {
    let server = FakeServer::seeded();
    let base = start(server.clone()).await;
    let mut store = DirectoryStore::new(client(&base));

    let form = ClinicForm {
        clinic_id: "C3".into(),
        name: "Westfield".into(),
        doctor_name: "Dr Ade".into(),
        address: "9 Elm Row".into(),
        services: vec![ServiceDraft::new("Triage", "+1 555-123-4567")],
    };
    let payload = form.validate().expect("valid");
    let created = store.create(&payload).await.expect("created");

    assert_eq!(created.code, "C3");
    assert_eq!(store.clinics().len(), 3);

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    let posted: Value = serde_json::from_str(
        requests[0]
            .strip_prefix("POST /api/clinics ")
            .expect("post logged"),
    )
    .expect("json body");
    assert_eq!(
        posted,
        json!({
            "name": "Westfield",
            "clinic_code": "C3",
            "doctor_name": "Dr Ade",
            "address": "9 Elm Row",
            "services": [{"name": "Triage", "phone": "+1 555-123-4567"}]
        })
    );
    assert_eq!(requests[1], "GET /api/clinics?");
}

#[tokio::test]
async fn create_surfaces_backend_message() {
    let server = FakeServer::seeded();
    let base = start(server.clone()).await;
    let mut store = DirectoryStore::new(client(&base));
    store.load().await.expect("load");

    let form = ClinicForm {
        clinic_id: "C1".into(),
        name: "Duplicate".into(),
        doctor_name: "Dr X".into(),
        address: "0 Nowhere".into(),
        services: vec![ServiceDraft::new("Dental", "5551230000")],
    };
    let err = store
        .create(&form.validate().expect("valid"))
        .await
        .expect_err("duplicate");

    assert!(matches!(
        &err,
        ClinicError::Server { status: 400, message } if message == "Clinic with this code already exists"
    ));
    assert_eq!(store.clinics().len(), 2);
}

#[tokio::test]
async fn empty_error_body_falls_back_to_status_text() {
    let base = start_with(Router::new().route("/api/clinics", get(broken))).await;

    let err = client(&base)
        .fetch_clinics(&ClinicQuery::default())
        .await
        .expect_err("500");
    assert_eq!(err.to_string(), "API Error: Internal Server Error");
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let base = start_with(Router::new().route("/api/clinics/search", get(garbled))).await;

    let err = client(&base)
        .search_clinics("x")
        .await
        .expect_err("bad json");
    assert!(matches!(err, ClinicError::Decode(_)));
}

#[tokio::test]
async fn unreachable_backend_keeps_store_and_sets_banner() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let mut store = DirectoryStore::new(client(&format!("http://{addr}")));
    store.replace(vec![clinic_core::ClinicRecord {
        code: "OLD".into(),
        ..Default::default()
    }]);

    let err = store.load().await.expect_err("refused");
    assert!(matches!(err, ClinicError::Transport(_)));
    assert_eq!(store.clinics()[0].code, "OLD");
    assert_eq!(
        store.error(),
        Some(clinic_core::constants::LOAD_ERROR_MESSAGE)
    );
}

#[tokio::test]
async fn search_query_replaces_store_contents() {
    let server = FakeServer::seeded();
    let base = start(server.clone()).await;
    let mut store = DirectoryStore::new(client(&base));
    store.load().await.expect("load");

    let found = store
        .search(&SearchQuery::General("zzz".into()))
        .await
        .expect("search");
    assert_eq!(found, 0);
    assert!(store.clinics().is_empty());
}
