pub mod empresas;
pub mod funcionarios;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Funcionarios
        .route("/api/funcionarios", post(funcionarios::register))
        .route("/api/funcionarios/{id}", put(funcionarios::update))
        .route("/api/funcionarios/id/{id}", get(funcionarios::find_by_id))
        .route("/api/funcionarios/cpf/{cpf}", get(funcionarios::find_by_cpf))
        .route("/api/funcionarios/email/{email}", get(funcionarios::find_by_email))
        .route("/api/funcionarios/todos", get(funcionarios::list))
        // Empresas
        .route("/api/empresas", post(empresas::register))
        .route("/api/empresas/cnpj/{cnpj}", get(empresas::find_by_cnpj))
}
