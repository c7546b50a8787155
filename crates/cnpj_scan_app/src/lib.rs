//! cnpj-scan terminal front end.
pub mod cli;
pub mod platform;

pub use platform::run;
