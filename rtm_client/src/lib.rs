//! # Remember The Milk Rust Crate
//!
//! Cliente para a API REST do Remember The Milk.
//!
//! ## Features
//!
//! - Requisições assinadas (`api_sig`)
//! - Autenticação por frob com confirmação no navegador
//! - Cliente HTTP assíncrono
//! - Configuração via `.env` / variáveis de ambiente
//!
//! ## Exemplo
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use rtm_client::{AuthFlow, EnvManager, RemoteMethod, RtmClient, RtmResult};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = RtmClient::new(EnvManager::load()?)?;
//!
//!     let prompt = Arc::new(|| -> RtmResult<String> {
//!         let mut frob = String::new();
//!         std::io::stdin().read_line(&mut frob).map_err(|e| rtm_client::RtmError::prompt_error(e.to_string()))?;
//!         Ok(frob)
//!     });
//!     AuthFlow::new(prompt).authenticate(&mut client).await?;
//!
//!     let tasks = client.get(RemoteMethod::TasksGetList, &HashMap::new()).await?;
//!     println!("{}", tasks);
//!     Ok(())
//! }
//! ```

/// Módulo de autenticação (assinatura e handshake frob → token)
pub mod auth;

/// Módulo de cliente API
pub mod client;

/// Módulo de configuração
pub mod config;

/// Módulo de tratamento de erros
pub mod error;

// Re-exportações para conveniência
pub use auth::{AuthFlow, AuthState, BrowserOpener, FrobPrompt, SystemBrowser};
pub use client::{Permission, RemoteMethod, RtmClient};
pub use config::EnvManager;
pub use error::{RtmError, RtmResult};
