//! Persistence for funcionarios and empresas.
//!
//! Services depend on the repository traits only; `main` decides whether the
//! Postgres or the in-memory implementation backs them.

pub mod empresas;
pub mod funcionarios;
pub mod memory;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Empresa, Funcionario};

pub use empresas::PgEmpresaRepository;
pub use funcionarios::PgFuncionarioRepository;
pub use memory::{MemoryEmpresaRepository, MemoryFuncionarioRepository};

pub const EMAIL_EXISTENTE: &str = "Email já existente.";
pub const CPF_EXISTENTE: &str = "CPF já existente.";
pub const CNPJ_EXISTENTE: &str = "CNPJ já existente.";

#[async_trait]
pub trait FuncionarioRepository: Send + Sync {
    /// Insert when `id` is `None`, otherwise overwrite the stored row.
    ///
    /// Email and CPF are unique; a clash is reported as a validation error.
    async fn save(&self, funcionario: &Funcionario) -> Result<Funcionario, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Funcionario>, AppError>;
    async fn find_by_cpf(&self, cpf: &str) -> Result<Option<Funcionario>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Funcionario>, AppError>;
    /// Ordered by id.
    async fn find_all(&self) -> Result<Vec<Funcionario>, AppError>;
}

#[async_trait]
pub trait EmpresaRepository: Send + Sync {
    async fn save(&self, empresa: &Empresa) -> Result<Empresa, AppError>;
    async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Empresa>, AppError>;
}

/// Turn a unique-constraint violation into the message clients see for it.
fn unique_violation(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            let message = match db_err.constraint() {
                Some("funcionarios_email_key") => EMAIL_EXISTENTE,
                Some("funcionarios_cpf_key") => CPF_EXISTENTE,
                Some("empresas_cnpj_key") => CNPJ_EXISTENTE,
                _ => "Registro já existente.",
            };
            AppError::validation(message)
        }
        _ => AppError::Database(err),
    }
}
