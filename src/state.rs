use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::db::{
    EmpresaRepository, FuncionarioRepository, MemoryEmpresaRepository, MemoryFuncionarioRepository,
    PgEmpresaRepository, PgFuncionarioRepository,
};
use crate::services::{EmpresaService, FuncionarioService};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub funcionarios: FuncionarioService,
    pub empresas: EmpresaService,
}

impl AppState {
    pub fn new(
        config: Config,
        funcionario_repo: Arc<dyn FuncionarioRepository>,
        empresa_repo: Arc<dyn EmpresaRepository>,
    ) -> SharedState {
        let empresas = EmpresaService::new(empresa_repo);
        let funcionarios = FuncionarioService::new(funcionario_repo, empresas.clone());
        Arc::new(AppState {
            config,
            funcionarios,
            empresas,
        })
    }

    pub fn postgres(pool: PgPool, config: Config) -> SharedState {
        Self::new(
            config,
            Arc::new(PgFuncionarioRepository::new(pool.clone())),
            Arc::new(PgEmpresaRepository::new(pool)),
        )
    }

    pub fn in_memory(config: Config) -> SharedState {
        Self::new(
            config,
            Arc::new(MemoryFuncionarioRepository::new()),
            Arc::new(MemoryEmpresaRepository::new()),
        )
    }
}
