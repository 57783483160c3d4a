use std::sync::Arc;

use crate::db::EmpresaRepository;
use crate::error::AppError;
use crate::models::{Empresa, EmpresaDto};

#[derive(Clone)]
pub struct EmpresaService {
    repo: Arc<dyn EmpresaRepository>,
}

impl EmpresaService {
    pub fn new(repo: Arc<dyn EmpresaRepository>) -> Self {
        Self { repo }
    }

    pub async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Empresa>, AppError> {
        tracing::info!(cnpj, "Looking up empresa by cnpj");
        self.repo.find_by_cnpj(cnpj).await
    }

    pub async fn persist(&self, empresa: &Empresa) -> Result<Empresa, AppError> {
        tracing::info!(id = ?empresa.id, cnpj = %empresa.cnpj, "Persisting empresa");
        self.repo.save(empresa).await
    }

    pub async fn register(&self, dto: &EmpresaDto) -> Result<EmpresaDto, AppError> {
        let empresa = dto.validate().map_err(AppError::Validation)?;
        let saved = self.persist(&empresa).await?;
        Ok(EmpresaDto::from(&saved))
    }
}
