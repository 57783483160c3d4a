//! Process-local stores used when no database is configured, and by tests.
//!
//! They enforce the same uniqueness rules as the Postgres schema so callers
//! observe identical behaviour.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{EmpresaRepository, FuncionarioRepository, CNPJ_EXISTENTE, CPF_EXISTENTE, EMAIL_EXISTENTE};
use crate::error::AppError;
use crate::models::{Empresa, Funcionario};

struct Table<T> {
    last_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    /// Id for `current`, allocating a fresh one for unsaved rows.
    fn resolve_id(&mut self, current: Option<i64>, not_found: &str) -> Result<i64, AppError> {
        match current {
            Some(id) if self.rows.contains_key(&id) => Ok(id),
            Some(_) => Err(AppError::NotFound(not_found.to_string())),
            None => {
                self.last_id += 1;
                Ok(self.last_id)
            }
        }
    }
}

#[derive(Default)]
pub struct MemoryFuncionarioRepository {
    table: RwLock<Table<Funcionario>>,
}

impl MemoryFuncionarioRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FuncionarioRepository for MemoryFuncionarioRepository {
    async fn save(&self, funcionario: &Funcionario) -> Result<Funcionario, AppError> {
        let mut table = self.table.write().await;

        // Stored rows always have an id, so an unsaved record clashes with all of them.
        let clashes = |same: fn(&Funcionario, &Funcionario) -> bool| {
            table
                .rows
                .values()
                .any(|other| other.id != funcionario.id && same(other, funcionario))
        };
        if clashes(|a, b| a.email == b.email) {
            return Err(AppError::validation(EMAIL_EXISTENTE));
        }
        if clashes(|a, b| a.cpf == b.cpf) {
            return Err(AppError::validation(CPF_EXISTENTE));
        }

        let id = table.resolve_id(funcionario.id, "Funcionário não encontrado.")?;
        let mut saved = funcionario.clone();
        saved.id = Some(id);
        saved.updated_at = Utc::now();
        table.rows.insert(id, saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Funcionario>, AppError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_cpf(&self, cpf: &str) -> Result<Option<Funcionario>, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|f| f.cpf == cpf).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Funcionario>, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|f| f.email == email).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Funcionario>, AppError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }
}

#[derive(Default)]
pub struct MemoryEmpresaRepository {
    table: RwLock<Table<Empresa>>,
}

impl MemoryEmpresaRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmpresaRepository for MemoryEmpresaRepository {
    async fn save(&self, empresa: &Empresa) -> Result<Empresa, AppError> {
        let mut table = self.table.write().await;

        if table
            .rows
            .values()
            .any(|other| other.id != empresa.id && other.cnpj == empresa.cnpj)
        {
            return Err(AppError::validation(CNPJ_EXISTENTE));
        }

        let id = table.resolve_id(empresa.id, "Empresa não encontrada.")?;
        let mut saved = empresa.clone();
        saved.id = Some(id);
        saved.updated_at = Utc::now();
        table.rows.insert(id, saved.clone());
        Ok(saved)
    }

    async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Empresa>, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|e| e.cnpj == cnpj).cloned())
    }
}
