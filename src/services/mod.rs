pub mod empresas;
pub mod funcionarios;

pub use empresas::EmpresaService;
pub use funcionarios::FuncionarioService;
