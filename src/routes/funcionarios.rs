use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;

use crate::documents;
use crate::error::AppError;
use crate::models::funcionario::to_dtos;
use crate::models::{CadastroFuncionarioDto, FuncionarioDto};
use crate::response::ApiResponse;
use crate::state::SharedState;

pub async fn update(
    State(state): State<SharedState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<FuncionarioDto>, JsonRejection>,
) -> Result<ApiResponse<FuncionarioDto>, AppError> {
    let Path(id) = path?;
    let Json(dto) = body?;

    let funcionario = state.funcionarios.update(id, &dto).await?;
    Ok(ApiResponse::ok(funcionario))
}

pub async fn register(
    State(state): State<SharedState>,
    body: Result<Json<CadastroFuncionarioDto>, JsonRejection>,
) -> Result<ApiResponse<FuncionarioDto>, AppError> {
    let Json(dto) = body?;

    let funcionario = state.funcionarios.register(&dto).await?;
    Ok(ApiResponse::ok(funcionario))
}

pub async fn find_by_cpf(
    State(state): State<SharedState>,
    Path(cpf): Path<String>,
) -> Result<ApiResponse<FuncionarioDto>, AppError> {
    let funcionario = state
        .funcionarios
        .find_by_cpf(&documents::normalize(&cpf))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Funcionário não encontrado para o CPF {cpf}")))?;
    Ok(ApiResponse::ok(FuncionarioDto::from(&funcionario)))
}

pub async fn find_by_id(
    State(state): State<SharedState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<FuncionarioDto>, AppError> {
    let Path(id) = path?;

    let funcionario = state
        .funcionarios
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Funcionário não encontrado para o ID {id}")))?;
    Ok(ApiResponse::ok(FuncionarioDto::from(&funcionario)))
}

pub async fn find_by_email(
    State(state): State<SharedState>,
    Path(email): Path<String>,
) -> Result<ApiResponse<FuncionarioDto>, AppError> {
    let funcionario = state
        .funcionarios
        .find_by_email(email.trim())
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Funcionário não encontrado para o email {email}"))
        })?;
    Ok(ApiResponse::ok(FuncionarioDto::from(&funcionario)))
}

/// An empty store is a normal answer: 200 with an empty list.
pub async fn list(
    State(state): State<SharedState>,
) -> Result<ApiResponse<Vec<FuncionarioDto>>, AppError> {
    let funcionarios = state.funcionarios.find_all().await?;
    Ok(ApiResponse::ok(to_dtos(&funcionarios)))
}
