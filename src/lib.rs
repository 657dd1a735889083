// Biblioteca das ferramentas RTM
// Expõe módulos para uso em testes e no binário `rtm`

pub mod config;
pub mod models;
pub mod services;
pub mod utils;
