use async_trait::async_trait;
use sqlx::PgPool;

use super::{unique_violation, EmpresaRepository};
use crate::error::AppError;
use crate::models::Empresa;

pub struct PgEmpresaRepository {
    pool: PgPool,
}

impl PgEmpresaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmpresaRepository for PgEmpresaRepository {
    async fn save(&self, empresa: &Empresa) -> Result<Empresa, AppError> {
        let saved = match empresa.id {
            None => {
                sqlx::query_as::<_, Empresa>(
                    "INSERT INTO empresas (razao_social, cnpj) VALUES ($1, $2) RETURNING *",
                )
                .bind(&empresa.razao_social)
                .bind(&empresa.cnpj)
                .fetch_one(&self.pool)
                .await
            }
            Some(id) => {
                sqlx::query_as::<_, Empresa>(
                    "UPDATE empresas SET razao_social = $2, cnpj = $3, updated_at = now()
                     WHERE id = $1 RETURNING *",
                )
                .bind(id)
                .bind(&empresa.razao_social)
                .bind(&empresa.cnpj)
                .fetch_one(&self.pool)
                .await
            }
        };

        saved.map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Empresa não encontrada.".to_string()),
            _ => unique_violation(e),
        })
    }

    async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Empresa>, AppError> {
        let empresa = sqlx::query_as::<_, Empresa>("SELECT * FROM empresas WHERE cnpj = $1")
            .bind(cnpj)
            .fetch_optional(&self.pool)
            .await?;
        Ok(empresa)
    }
}
