use std::sync::Arc;

use crate::db::{FuncionarioRepository, CPF_EXISTENTE, EMAIL_EXISTENTE};
use crate::documents;
use crate::error::AppError;
use crate::models::{CadastroFuncionarioDto, Funcionario, FuncionarioDto};
use crate::password;
use crate::services::EmpresaService;

#[derive(Clone)]
pub struct FuncionarioService {
    repo: Arc<dyn FuncionarioRepository>,
    empresas: EmpresaService,
}

impl FuncionarioService {
    pub fn new(repo: Arc<dyn FuncionarioRepository>, empresas: EmpresaService) -> Self {
        Self { repo, empresas }
    }

    pub async fn persist(&self, funcionario: &Funcionario) -> Result<Funcionario, AppError> {
        tracing::info!(id = ?funcionario.id, "Persisting funcionario");
        self.repo.save(funcionario).await
    }

    pub async fn find_by_cpf(&self, cpf: &str) -> Result<Option<Funcionario>, AppError> {
        tracing::info!(cpf, "Looking up funcionario by cpf");
        self.repo.find_by_cpf(cpf).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Funcionario>, AppError> {
        tracing::info!(email, "Looking up funcionario by email");
        self.repo.find_by_email(email).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Funcionario>, AppError> {
        tracing::info!(id, "Looking up funcionario by id");
        self.repo.find_by_id(id).await
    }

    pub async fn find_all(&self) -> Result<Vec<Funcionario>, AppError> {
        tracing::info!("Listing all funcionarios");
        self.repo.find_all().await
    }

    /// Merge `dto` into the stored funcionario `id` and save it.
    ///
    /// Every violation is reported together and nothing is written unless all
    /// checks pass. A supplied `senha` is stored hashed.
    pub async fn update(&self, id: i64, dto: &FuncionarioDto) -> Result<FuncionarioDto, AppError> {
        tracing::info!(id, funcionario = ?dto, "Updating funcionario");

        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Funcionário não encontrado.".to_string()))?;

        let validated = dto.validate();
        let mut errors = validated.as_ref().err().cloned().unwrap_or_default();

        let email = dto.email.trim();
        if email != current.email && documents::is_valid_email(email) {
            if let Some(other) = self.find_by_email(email).await? {
                if other.id != current.id {
                    errors.push(EMAIL_EXISTENTE.to_string());
                }
            }
        }

        let update = match validated {
            Ok(update) if errors.is_empty() => update,
            _ => return Err(AppError::Validation(errors)),
        };

        let mut merged = current;
        merged.nome = update.nome;
        merged.email = update.email;
        update.horas.apply_to(&mut merged);
        if let Some(senha) = &update.senha {
            merged.senha = password::hash(senha).map_err(AppError::Internal)?;
        }

        let saved = self.persist(&merged).await?;
        Ok(FuncionarioDto::from(&saved))
    }

    /// Create a funcionario attached to an existing empresa.
    pub async fn register(&self, dto: &CadastroFuncionarioDto) -> Result<FuncionarioDto, AppError> {
        tracing::info!(cadastro = ?dto, "Registering funcionario");

        let novo = dto.validate().map_err(AppError::Validation)?;

        let mut errors = Vec::new();
        let empresa = self.empresas.find_by_cnpj(&novo.cnpj).await?;
        if empresa.is_none() {
            errors.push("Empresa não cadastrada.".to_string());
        }
        if self.find_by_email(&novo.email).await?.is_some() {
            errors.push(EMAIL_EXISTENTE.to_string());
        }
        if self.find_by_cpf(&novo.cpf).await?.is_some() {
            errors.push(CPF_EXISTENTE.to_string());
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let senha = password::hash(&novo.senha).map_err(AppError::Internal)?;
        let mut funcionario = Funcionario::new(novo.nome, novo.email, novo.cpf, senha);
        funcionario.empresa_id = empresa.and_then(|e| e.id);
        novo.horas.apply_to(&mut funcionario);

        let saved = self.persist(&funcionario).await?;
        Ok(FuncionarioDto::from(&saved))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::{MemoryEmpresaRepository, MemoryFuncionarioRepository};
    use crate::models::funcionario::to_dtos;
    use crate::models::Empresa;

    /// Counts the calls the update flow is expected to avoid.
    #[derive(Default)]
    struct Recording {
        inner: MemoryFuncionarioRepository,
        saves: AtomicUsize,
        email_lookups: AtomicUsize,
    }

    #[async_trait]
    impl FuncionarioRepository for Recording {
        async fn save(&self, funcionario: &Funcionario) -> Result<Funcionario, AppError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(funcionario).await
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Funcionario>, AppError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_cpf(&self, cpf: &str) -> Result<Option<Funcionario>, AppError> {
            self.inner.find_by_cpf(cpf).await
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Funcionario>, AppError> {
            self.email_lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_email(email).await
        }

        async fn find_all(&self) -> Result<Vec<Funcionario>, AppError> {
            self.inner.find_all().await
        }
    }

    struct Fixture {
        repo: Arc<Recording>,
        service: FuncionarioService,
    }

    impl Fixture {
        fn new() -> Self {
            let repo = Arc::new(Recording::default());
            let empresas = EmpresaService::new(Arc::new(MemoryEmpresaRepository::new()));
            let service = FuncionarioService::new(repo.clone(), empresas);
            Fixture { repo, service }
        }

        async fn seed(&self, nome: &str, email: &str, cpf: &str) -> Funcionario {
            let mut funcionario = Funcionario::new(
                nome.to_string(),
                email.to_string(),
                cpf.to_string(),
                password::hash("senha-antiga").unwrap(),
            );
            funcionario.qtd_horas_almoco = Some(1.0);
            funcionario.valor_hora = Some(Decimal::new(2000, 2));
            self.repo.inner.save(&funcionario).await.unwrap()
        }

        fn saves(&self) -> usize {
            self.repo.saves.load(Ordering::SeqCst)
        }

        fn email_lookups(&self) -> usize {
            self.repo.email_lookups.load(Ordering::SeqCst)
        }
    }

    fn dto(nome: &str, email: &str) -> FuncionarioDto {
        FuncionarioDto {
            nome: nome.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn update_unknown_id_fails_fast() {
        let fx = Fixture::new();

        let err = fx.service.update(42, &dto("Maria Silva", "maria@x.com")).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(fx.saves(), 0);
        assert_eq!(fx.email_lookups(), 0);
    }

    #[tokio::test]
    async fn update_merges_fields_and_resets_numerics() {
        let fx = Fixture::new();
        let seeded = fx.seed("Maria Silva", "maria@x.com", "52998224725").await;

        let mut body = dto("Maria Souza", "maria.souza@x.com");
        body.qtd_horas_trabalho_dia = Some("8".to_string());

        let updated = fx.service.update(seeded.id.unwrap(), &body).await.unwrap();

        assert_eq!(updated.nome, "Maria Souza");
        assert_eq!(updated.email, "maria.souza@x.com");
        assert_eq!(updated.qtd_horas_trabalho_dia.as_deref(), Some("8"));
        assert_eq!(updated.qtd_horas_almoco, None);
        assert_eq!(updated.valor_hora, None);
        assert_eq!(fx.saves(), 1);

        let stored = fx.repo.inner.find_by_id(seeded.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.cpf, "52998224725");
        assert_eq!(stored.senha, seeded.senha);
    }

    #[tokio::test]
    async fn update_to_taken_email_persists_nothing() {
        let fx = Fixture::new();
        let maria = fx.seed("Maria Silva", "maria@x.com", "52998224725").await;
        fx.seed("João Lima", "joao@x.com", "11144477735").await;

        let err = fx
            .service
            .update(maria.id.unwrap(), &dto("Maria Alterada", "joao@x.com"))
            .await
            .unwrap_err();

        match err {
            AppError::Validation(errors) => assert_eq!(errors, vec![EMAIL_EXISTENTE]),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(fx.saves(), 0);

        let stored = fx.repo.inner.find_by_id(maria.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.nome, "Maria Silva");
        assert_eq!(stored.email, "maria@x.com");
        assert_eq!(stored.qtd_horas_almoco, Some(1.0));
    }

    #[tokio::test]
    async fn unchanged_email_skips_uniqueness_lookup() {
        let fx = Fixture::new();
        let maria = fx.seed("Maria Silva", "maria@x.com", "52998224725").await;

        fx.service
            .update(maria.id.unwrap(), &dto("Maria Souza", "maria@x.com"))
            .await
            .unwrap();

        assert_eq!(fx.email_lookups(), 0);
        assert_eq!(fx.saves(), 1);
    }

    #[tokio::test]
    async fn new_senha_is_stored_hashed() {
        let fx = Fixture::new();
        let maria = fx.seed("Maria Silva", "maria@x.com", "52998224725").await;

        let mut body = dto("Maria Silva", "maria@x.com");
        body.senha = Some("nova-senha-123".to_string());
        fx.service.update(maria.id.unwrap(), &body).await.unwrap();

        let stored = fx.repo.inner.find_by_id(maria.id.unwrap()).await.unwrap().unwrap();
        assert_ne!(stored.senha, "nova-senha-123");
        assert_ne!(stored.senha, maria.senha);
        assert!(password::verify("nova-senha-123", &stored.senha).unwrap());
    }

    #[tokio::test]
    async fn malformed_numbers_and_taken_email_are_reported_together() {
        let fx = Fixture::new();
        let maria = fx.seed("Maria Silva", "maria@x.com", "52998224725").await;
        fx.seed("João Lima", "joao@x.com", "11144477735").await;

        let mut body = dto("Maria Silva", "joao@x.com");
        body.valor_hora = Some("vinte".to_string());

        match fx.service.update(maria.id.unwrap(), &body).await {
            Err(AppError::Validation(errors)) => assert_eq!(
                errors,
                vec!["Valor da hora inválido: vinte".to_string(), EMAIL_EXISTENTE.to_string()]
            ),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(fx.saves(), 0);
    }

    #[tokio::test]
    async fn find_all_on_empty_store_is_empty() {
        let fx = Fixture::new();
        assert!(fx.service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookups_for_missing_keys_are_none() {
        let fx = Fixture::new();
        assert!(fx.service.find_by_id(1).await.unwrap().is_none());
        assert!(fx.service.find_by_cpf("52998224725").await.unwrap().is_none());
        assert!(fx.service.find_by_email("maria@x.com").await.unwrap().is_none());
    }

    async fn fixture_with_empresa() -> Fixture {
        let fx = Fixture::new();
        fx.service
            .empresas
            .persist(&Empresa::new("Kazale IT Ltda".to_string(), "11222333000181".to_string()))
            .await
            .unwrap();
        fx
    }

    fn cadastro(email: &str, cpf: &str) -> CadastroFuncionarioDto {
        CadastroFuncionarioDto {
            nome: "Maria Silva".to_string(),
            email: email.to_string(),
            cpf: cpf.to_string(),
            senha: "segredo123".to_string(),
            cnpj: "11.222.333/0001-81".to_string(),
            valor_hora: Some("30.00".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn register_links_empresa_and_hashes_senha() {
        let fx = fixture_with_empresa().await;

        let created = fx
            .service
            .register(&cadastro("maria@x.com", "529.982.247-25"))
            .await
            .unwrap();
        assert_eq!(created.valor_hora.as_deref(), Some("30.00"));

        let stored = fx.service.find_by_cpf("52998224725").await.unwrap().unwrap();
        assert_eq!(stored.empresa_id, Some(1));
        assert!(password::verify("segredo123", &stored.senha).unwrap());
    }

    #[tokio::test]
    async fn register_rejects_unknown_empresa() {
        let fx = Fixture::new();
        let err = fx
            .service
            .register(&cadastro("maria@x.com", "52998224725"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e == &["Empresa não cadastrada."]));
        assert_eq!(fx.saves(), 0);
    }

    #[tokio::test]
    async fn register_rejects_duplicates() {
        let fx = fixture_with_empresa().await;
        fx.service
            .register(&cadastro("maria@x.com", "52998224725"))
            .await
            .unwrap();

        let err = fx
            .service
            .register(&cadastro("maria@x.com", "52998224725"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::Validation(ref e) if e == &[EMAIL_EXISTENTE, CPF_EXISTENTE])
        );

        // the registered record still projects without credentials
        let all = fx.service.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        let body = serde_json::to_string(&to_dtos(&all)).unwrap();
        assert!(!body.contains("senha"));
    }
}
