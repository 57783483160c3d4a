pub mod empresa;
pub mod funcionario;

pub use empresa::{Empresa, EmpresaDto};
pub use funcionario::{CadastroFuncionarioDto, Funcionario, FuncionarioDto};
