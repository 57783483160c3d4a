use std::net::SocketAddr;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use ponto_inteligente::config::Config;
use ponto_inteligente::state::{AppState, SharedState};

pub const CNPJ: &str = "11222333000181";
pub const CPF_MARIA: &str = "52998224725";
pub const CPF_JOAO: &str = "11144477735";

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: SharedState,
    /// Set when the app runs against a dedicated Postgres database.
    pub db: Option<(PgPool, String)>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Register the default empresa, return its envelope payload.
    pub async fn create_empresa(&self) -> Value {
        let (body, status) = self
            .post(
                "/api/empresas",
                &json!({ "razaoSocial": "Kazale IT Ltda", "cnpj": CNPJ }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create empresa failed: {body}");
        body["data"].clone()
    }

    /// Register a funcionario under the default empresa, return its payload.
    pub async fn create_funcionario(&self, nome: &str, email: &str, cpf: &str) -> Value {
        let (body, status) = self
            .post(
                "/api/funcionarios",
                &json!({
                    "nome": nome,
                    "email": email,
                    "cpf": cpf,
                    "senha": "segredo123",
                    "cnpj": CNPJ,
                    "qtdHorasAlmoco": "1",
                    "valorHora": "45.90"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create funcionario failed: {body}");
        body["data"].clone()
    }
}

fn test_config() -> Config {
    Config {
        log_level: "warn".to_string(),
        ..Config::default()
    }
}

async fn serve(state: SharedState, db: Option<(PgPool, String)>) -> TestApp {
    let app = ponto_inteligente::build_app(state.clone());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        state,
        db,
    }
}

/// Spawn a test app backed by the in-memory store.
pub async fn spawn_app() -> TestApp {
    serve(AppState::in_memory(test_config()), None).await
}

/// Spawn a test app with a fresh temporary Postgres database.
#[allow(dead_code)]
pub async fn spawn_postgres_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let db_name = format!("ponto_test_{}", Uuid::now_v7().to_string().replace('-', ""));

    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = Config {
        database_url: Some(test_url),
        ..test_config()
    };

    serve(
        AppState::postgres(pool.clone(), config),
        Some((pool, db_name)),
    )
    .await
}

/// Drop the test database, if any.
pub async fn cleanup(app: TestApp) {
    let Some((pool, db_name)) = app.db else {
        return;
    };
    pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
