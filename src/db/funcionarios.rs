use async_trait::async_trait;
use sqlx::PgPool;

use super::{unique_violation, FuncionarioRepository};
use crate::error::AppError;
use crate::models::Funcionario;

pub struct PgFuncionarioRepository {
    pool: PgPool,
}

impl PgFuncionarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, funcionario: &Funcionario) -> Result<Funcionario, sqlx::Error> {
        sqlx::query_as::<_, Funcionario>(
            "INSERT INTO funcionarios
                (nome, email, cpf, senha, qtd_horas_almoco, qtd_horas_trabalho_dia, valor_hora, empresa_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&funcionario.nome)
        .bind(&funcionario.email)
        .bind(&funcionario.cpf)
        .bind(&funcionario.senha)
        .bind(funcionario.qtd_horas_almoco)
        .bind(funcionario.qtd_horas_trabalho_dia)
        .bind(funcionario.valor_hora)
        .bind(funcionario.empresa_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update(&self, id: i64, funcionario: &Funcionario) -> Result<Funcionario, sqlx::Error> {
        sqlx::query_as::<_, Funcionario>(
            "UPDATE funcionarios SET nome = $2, email = $3, cpf = $4, senha = $5,
                qtd_horas_almoco = $6, qtd_horas_trabalho_dia = $7, valor_hora = $8,
                empresa_id = $9, updated_at = now()
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&funcionario.nome)
        .bind(&funcionario.email)
        .bind(&funcionario.cpf)
        .bind(&funcionario.senha)
        .bind(funcionario.qtd_horas_almoco)
        .bind(funcionario.qtd_horas_trabalho_dia)
        .bind(funcionario.valor_hora)
        .bind(funcionario.empresa_id)
        .fetch_one(&self.pool)
        .await
    }
}

#[async_trait]
impl FuncionarioRepository for PgFuncionarioRepository {
    async fn save(&self, funcionario: &Funcionario) -> Result<Funcionario, AppError> {
        let saved = match funcionario.id {
            None => self.insert(funcionario).await,
            Some(id) => self.update(id, funcionario).await,
        };

        saved.map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Funcionário não encontrado.".to_string()),
            _ => unique_violation(e),
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Funcionario>, AppError> {
        let funcionario = sqlx::query_as::<_, Funcionario>("SELECT * FROM funcionarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(funcionario)
    }

    async fn find_by_cpf(&self, cpf: &str) -> Result<Option<Funcionario>, AppError> {
        let funcionario =
            sqlx::query_as::<_, Funcionario>("SELECT * FROM funcionarios WHERE cpf = $1")
                .bind(cpf)
                .fetch_optional(&self.pool)
                .await?;
        Ok(funcionario)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Funcionario>, AppError> {
        let funcionario =
            sqlx::query_as::<_, Funcionario>("SELECT * FROM funcionarios WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(funcionario)
    }

    async fn find_all(&self) -> Result<Vec<Funcionario>, AppError> {
        let funcionarios =
            sqlx::query_as::<_, Funcionario>("SELECT * FROM funcionarios ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(funcionarios)
    }
}
