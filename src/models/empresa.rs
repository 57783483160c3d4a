use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::documents;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Empresa {
    pub id: Option<i64>,
    pub razao_social: String,
    /// Digits only.
    pub cnpj: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Empresa {
    pub fn new(razao_social: String, cnpj: String) -> Self {
        let now = Utc::now();
        Empresa {
            id: None,
            razao_social,
            cnpj,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmpresaDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub razao_social: String,
    #[serde(default)]
    pub cnpj: String,
}

impl From<&Empresa> for EmpresaDto {
    fn from(empresa: &Empresa) -> Self {
        EmpresaDto {
            id: empresa.id,
            razao_social: empresa.razao_social.clone(),
            cnpj: empresa.cnpj.clone(),
        }
    }
}

impl EmpresaDto {
    /// Validate a registration body into an unsaved [`Empresa`].
    pub fn validate(&self) -> Result<Empresa, Vec<String>> {
        let mut errors = Vec::new();

        let razao_social = self.razao_social.trim();
        if razao_social.is_empty() {
            errors.push("Razão social não pode ser vazia.".to_string());
        } else if !(5..=200).contains(&razao_social.chars().count()) {
            errors.push("Razão social deve conter entre 5 e 200 caracteres.".to_string());
        }

        if !documents::is_valid_cnpj(&self.cnpj) {
            errors.push("CNPJ inválido.".to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Empresa::new(
            razao_social.to_string(),
            documents::normalize(&self.cnpj),
        ))
    }
}
