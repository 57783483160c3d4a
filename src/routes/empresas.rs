use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use crate::documents;
use crate::error::AppError;
use crate::models::EmpresaDto;
use crate::response::ApiResponse;
use crate::state::SharedState;

pub async fn register(
    State(state): State<SharedState>,
    body: Result<Json<EmpresaDto>, JsonRejection>,
) -> Result<ApiResponse<EmpresaDto>, AppError> {
    let Json(dto) = body?;

    let empresa = state.empresas.register(&dto).await?;
    Ok(ApiResponse::ok(empresa))
}

pub async fn find_by_cnpj(
    State(state): State<SharedState>,
    Path(cnpj): Path<String>,
) -> Result<ApiResponse<EmpresaDto>, AppError> {
    let empresa = state
        .empresas
        .find_by_cnpj(&documents::normalize(&cnpj))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Empresa não encontrada para o CNPJ {cnpj}")))?;
    Ok(ApiResponse::ok(EmpresaDto::from(&empresa)))
}
