use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::documents;

const REDACTED: &str = "<redacted>";

#[derive(Clone, sqlx::FromRow)]
pub struct Funcionario {
    /// `None` until the store assigns one.
    pub id: Option<i64>,
    pub nome: String,
    pub email: String,
    pub cpf: String,
    /// Argon2id PHC string, never the plaintext.
    pub senha: String,
    pub qtd_horas_almoco: Option<f32>,
    pub qtd_horas_trabalho_dia: Option<f32>,
    pub valor_hora: Option<Decimal>,
    pub empresa_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Funcionario {
    pub fn new(nome: String, email: String, cpf: String, senha_hash: String) -> Self {
        let now = Utc::now();
        Funcionario {
            id: None,
            nome,
            email,
            cpf,
            senha: senha_hash,
            qtd_horas_almoco: None,
            qtd_horas_trabalho_dia: None,
            valor_hora: None,
            empresa_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl std::fmt::Debug for Funcionario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Funcionario")
            .field("id", &self.id)
            .field("nome", &self.nome)
            .field("email", &self.email)
            .field("cpf", &self.cpf)
            .field("senha", &REDACTED)
            .field("qtd_horas_almoco", &self.qtd_horas_almoco)
            .field("qtd_horas_trabalho_dia", &self.qtd_horas_trabalho_dia)
            .field("valor_hora", &self.valor_hora)
            .field("empresa_id", &self.empresa_id)
            .finish()
    }
}

/// Wire representation of a [`Funcionario`].
///
/// The numeric attributes travel as optional strings so an absent value is
/// distinguishable from zero. `senha` is accepted on input and never written
/// back out.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuncionarioDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub senha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qtd_horas_almoco: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qtd_horas_trabalho_dia: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_hora: Option<String>,
}

impl std::fmt::Debug for FuncionarioDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuncionarioDto")
            .field("id", &self.id)
            .field("nome", &self.nome)
            .field("email", &self.email)
            .field("senha", &self.senha.as_ref().map(|_| REDACTED))
            .field("qtd_horas_almoco", &self.qtd_horas_almoco)
            .field("qtd_horas_trabalho_dia", &self.qtd_horas_trabalho_dia)
            .field("valor_hora", &self.valor_hora)
            .finish()
    }
}

impl From<&Funcionario> for FuncionarioDto {
    fn from(funcionario: &Funcionario) -> Self {
        FuncionarioDto {
            id: funcionario.id,
            nome: funcionario.nome.clone(),
            email: funcionario.email.clone(),
            senha: None,
            qtd_horas_almoco: funcionario.qtd_horas_almoco.map(|v| v.to_string()),
            qtd_horas_trabalho_dia: funcionario.qtd_horas_trabalho_dia.map(|v| v.to_string()),
            valor_hora: funcionario.valor_hora.map(|v| v.to_string()),
        }
    }
}

pub fn to_dtos(funcionarios: &[Funcionario]) -> Vec<FuncionarioDto> {
    funcionarios.iter().map(FuncionarioDto::from).collect()
}

/// A [`FuncionarioDto`] that passed validation, with its numbers parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncionarioUpdate {
    pub nome: String,
    pub email: String,
    pub horas: Horas,
    pub senha: Option<String>,
}

/// The optional workload attributes, parsed and range-checked.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Horas {
    pub qtd_horas_almoco: Option<f32>,
    pub qtd_horas_trabalho_dia: Option<f32>,
    pub valor_hora: Option<Decimal>,
}

impl Horas {
    fn parse(
        qtd_horas_almoco: Option<&str>,
        qtd_horas_trabalho_dia: Option<&str>,
        valor_hora: Option<&str>,
        errors: &mut Vec<String>,
    ) -> Self {
        Horas {
            qtd_horas_almoco: qtd_horas_almoco.and_then(|v| {
                parse_horas(v).or_else(|| {
                    errors.push(format!("Quantidade de horas de almoço inválida: {v}"));
                    None
                })
            }),
            qtd_horas_trabalho_dia: qtd_horas_trabalho_dia.and_then(|v| {
                parse_horas(v).or_else(|| {
                    errors.push(format!("Quantidade de horas de trabalho por dia inválida: {v}"));
                    None
                })
            }),
            valor_hora: valor_hora.and_then(|v| {
                parse_valor(v).or_else(|| {
                    errors.push(format!("Valor da hora inválido: {v}"));
                    None
                })
            }),
        }
    }

    /// Replace all three attributes; any not supplied become absent.
    pub fn apply_to(&self, funcionario: &mut Funcionario) {
        funcionario.qtd_horas_almoco = self.qtd_horas_almoco;
        funcionario.qtd_horas_trabalho_dia = self.qtd_horas_trabalho_dia;
        funcionario.valor_hora = self.valor_hora;
    }
}

impl FuncionarioDto {
    /// Check every field and parse the numeric ones.
    ///
    /// All violations are collected, not just the first. Whether the email is
    /// already taken is a store concern and is not checked here.
    pub fn validate(&self) -> Result<FuncionarioUpdate, Vec<String>> {
        let mut errors = Vec::new();

        let nome = validate_nome(&self.nome, &mut errors);
        let email = validate_email(&self.email, &mut errors);
        let horas = Horas::parse(
            self.qtd_horas_almoco.as_deref(),
            self.qtd_horas_trabalho_dia.as_deref(),
            self.valor_hora.as_deref(),
            &mut errors,
        );
        if let Some(senha) = &self.senha {
            validate_senha(senha, &mut errors);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(FuncionarioUpdate {
            nome,
            email,
            horas,
            senha: self.senha.clone(),
        })
    }
}

/// Body of a new employee registration.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CadastroFuncionarioDto {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub senha: String,
    /// CNPJ of the company the employee belongs to.
    #[serde(default)]
    pub cnpj: String,
    #[serde(default)]
    pub qtd_horas_almoco: Option<String>,
    #[serde(default)]
    pub qtd_horas_trabalho_dia: Option<String>,
    #[serde(default)]
    pub valor_hora: Option<String>,
}

impl std::fmt::Debug for CadastroFuncionarioDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CadastroFuncionarioDto")
            .field("nome", &self.nome)
            .field("email", &self.email)
            .field("cpf", &self.cpf)
            .field("senha", &REDACTED)
            .field("cnpj", &self.cnpj)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NovoFuncionario {
    pub nome: String,
    pub email: String,
    pub cpf: String,
    pub senha: String,
    pub cnpj: String,
    pub horas: Horas,
}

impl CadastroFuncionarioDto {
    pub fn validate(&self) -> Result<NovoFuncionario, Vec<String>> {
        let mut errors = Vec::new();

        let nome = validate_nome(&self.nome, &mut errors);
        let email = validate_email(&self.email, &mut errors);
        if !documents::is_valid_cpf(&self.cpf) {
            errors.push("CPF inválido.".to_string());
        }
        validate_senha(&self.senha, &mut errors);
        if !documents::is_valid_cnpj(&self.cnpj) {
            errors.push("CNPJ inválido.".to_string());
        }
        let horas = Horas::parse(
            self.qtd_horas_almoco.as_deref(),
            self.qtd_horas_trabalho_dia.as_deref(),
            self.valor_hora.as_deref(),
            &mut errors,
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NovoFuncionario {
            nome,
            email,
            cpf: documents::normalize(&self.cpf),
            senha: self.senha.clone(),
            cnpj: documents::normalize(&self.cnpj),
            horas,
        })
    }
}

fn validate_nome(nome: &str, errors: &mut Vec<String>) -> String {
    let nome = nome.trim();
    if nome.is_empty() {
        errors.push("Nome não pode ser vazio.".to_string());
    } else if !(3..=200).contains(&nome.chars().count()) {
        errors.push("Nome deve conter entre 3 e 200 caracteres.".to_string());
    }
    nome.to_string()
}

fn validate_email(email: &str, errors: &mut Vec<String>) -> String {
    let email = email.trim();
    if email.is_empty() {
        errors.push("Email não pode ser vazio.".to_string());
    } else if !(5..=200).contains(&email.chars().count()) {
        errors.push("Email deve conter entre 5 e 200 caracteres.".to_string());
    } else if !documents::is_valid_email(email) {
        errors.push("Email inválido.".to_string());
    }
    email.to_string()
}

fn validate_senha(senha: &str, errors: &mut Vec<String>) {
    if senha.chars().count() < 6 {
        errors.push("Senha deve conter no mínimo 6 caracteres.".to_string());
    }
}

fn parse_horas(value: &str) -> Option<f32> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|h| h.is_finite() && (0.0..=24.0).contains(h))
}

/// `valor_hora` is stored as `NUMERIC(19, 2)`: at most two decimal places
/// and seventeen integer digits. Accepted values are rescaled to two places
/// so every store renders them the same way.
fn parse_valor(value: &str) -> Option<Decimal> {
    let limite = Decimal::from(10_i64.pow(17));
    let mut valor = Decimal::from_str(value.trim())
        .ok()
        .filter(|v| !v.is_sign_negative() && v.normalize().scale() <= 2 && *v < limite)?;
    valor.rescale(2);
    Some(valor)
}
