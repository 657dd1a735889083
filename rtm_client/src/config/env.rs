use dotenv::dotenv;
use std::env;
use std::path::Path;
use std::time::Duration;
use crate::error::{RtmError, RtmResult};

pub const DEFAULT_AUTH_URL: &str = "https://api.rememberthemilk.com/services/auth/";
pub const DEFAULT_REST_URL: &str = "https://api.rememberthemilk.com/services/rest/";

/// Credenciais e endpoints do Remember The Milk lidos do ambiente
#[derive(Debug, Clone)]
pub struct EnvManager {
    pub api_key: String,
    pub shared_secret: String,
    /// Token já emitido anteriormente (opcional, pula o fluxo no navegador)
    pub auth_token: Option<String>,
    pub auth_url: String,
    pub rest_url: String,
    /// Sem valor o prompt do frob espera indefinidamente
    pub prompt_timeout: Option<Duration>,
}

impl EnvManager {
    /// Carrega as configurações de `.env` (se existir) e das variáveis de ambiente
    pub fn load() -> RtmResult<Self> {
        // Durante testes, os testes devem configurar as variáveis diretamente
        if cfg!(not(test)) && Path::new(".env").exists() {
            dotenv().map_err(|e| RtmError::config_error(format!("Erro ao carregar .env: {}", e)))?;
        }

        let api_key = Self::get_env_var("RTM_API_KEY")?;
        let shared_secret = Self::get_env_var("RTM_SHARED_SECRET")?;

        let auth_token = env::var("RTM_AUTH_TOKEN").ok().filter(|t| !t.is_empty());

        let auth_url = env::var("RTM_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string());
        let rest_url = env::var("RTM_REST_URL").unwrap_or_else(|_| DEFAULT_REST_URL.to_string());

        let prompt_timeout = match env::var("RTM_PROMPT_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    RtmError::config_error(format!("RTM_PROMPT_TIMEOUT_SECS inválido: {}", raw))
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self {
            api_key,
            shared_secret,
            auth_token,
            auth_url,
            rest_url,
            prompt_timeout,
        })
    }

    /// Cria a configuração diretamente, com os endpoints padrão
    pub fn new(api_key: impl Into<String>, shared_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            shared_secret: shared_secret.into(),
            auth_token: None,
            auth_url: DEFAULT_AUTH_URL.to_string(),
            rest_url: DEFAULT_REST_URL.to_string(),
            prompt_timeout: None,
        }
    }

    /// Aponta os dois endpoints para outro host (útil para testes)
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.auth_url = format!("{}/services/auth/", base);
        self.rest_url = format!("{}/services/rest/", base);
        self
    }

    /// Obtém variável de ambiente obrigatória
    fn get_env_var(key: &str) -> RtmResult<String> {
        env::var(key).map_err(|_| RtmError::env_error(format!("{} não encontrado", key)))
    }

    /// Valida se todas as configurações obrigatórias estão presentes
    pub fn validate(&self) -> RtmResult<()> {
        if self.api_key.is_empty() {
            return Err(RtmError::config_error("RTM_API_KEY é obrigatório"));
        }

        if self.shared_secret.is_empty() {
            return Err(RtmError::config_error("RTM_SHARED_SECRET é obrigatório"));
        }

        for (name, url) in [("RTM_AUTH_URL", &self.auth_url), ("RTM_REST_URL", &self.rest_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(RtmError::config_error(format!("{} deve ser uma URL válida", name)));
            }
        }

        Ok(())
    }

    /// Retorna informações resumidas da configuração (sem segredos)
    pub fn environment_info(&self) -> String {
        format!(
            "REST: {} | auth: {} | token prévio: {}",
            self.rest_url,
            self.auth_url,
            if self.auth_token.is_some() { "sim" } else { "não" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_env;

    #[test]
    fn test_load_from_env() {
        temp_env::with_vars(
            vec![
                ("RTM_API_KEY", Some("key123")),
                ("RTM_SHARED_SECRET", Some("secret456")),
                ("RTM_AUTH_TOKEN", None),
                ("RTM_AUTH_URL", None),
                ("RTM_REST_URL", None),
                ("RTM_PROMPT_TIMEOUT_SECS", None),
            ],
            || {
                let env_manager = EnvManager::load().unwrap();
                assert_eq!(env_manager.api_key, "key123");
                assert_eq!(env_manager.shared_secret, "secret456");
                assert_eq!(env_manager.auth_token, None);
                assert_eq!(env_manager.rest_url, DEFAULT_REST_URL);
                assert_eq!(env_manager.auth_url, DEFAULT_AUTH_URL);
                assert_eq!(env_manager.prompt_timeout, None);
            },
        );
    }

    #[test]
    fn test_load_missing_env() {
        temp_env::with_vars_unset(vec!["RTM_API_KEY", "RTM_SHARED_SECRET"], || {
            let result = EnvManager::load();
            assert!(matches!(result, Err(RtmError::Env(_))));
        });
    }

    #[test]
    fn test_load_optional_values() {
        temp_env::with_vars(
            vec![
                ("RTM_API_KEY", Some("key123")),
                ("RTM_SHARED_SECRET", Some("secret456")),
                ("RTM_AUTH_TOKEN", Some("tok789")),
                ("RTM_PROMPT_TIMEOUT_SECS", Some("120")),
            ],
            || {
                let env_manager = EnvManager::load().unwrap();
                assert_eq!(env_manager.auth_token.as_deref(), Some("tok789"));
                assert_eq!(env_manager.prompt_timeout, Some(Duration::from_secs(120)));
            },
        );
    }

    #[test]
    fn test_empty_token_is_ignored() {
        temp_env::with_vars(
            vec![
                ("RTM_API_KEY", Some("key123")),
                ("RTM_SHARED_SECRET", Some("secret456")),
                ("RTM_AUTH_TOKEN", Some("")),
            ],
            || {
                let env_manager = EnvManager::load().unwrap();
                assert!(env_manager.auth_token.is_none());
            },
        );
    }

    #[test]
    fn test_invalid_timeout() {
        temp_env::with_vars(
            vec![
                ("RTM_API_KEY", Some("key123")),
                ("RTM_SHARED_SECRET", Some("secret456")),
                ("RTM_PROMPT_TIMEOUT_SECS", Some("cinco")),
            ],
            || {
                let result = EnvManager::load();
                assert!(matches!(result, Err(RtmError::Config(_))));
            },
        );
    }

    #[test]
    fn test_with_base_url() {
        let env_manager = EnvManager::new("k", "s").with_base_url("http://127.0.0.1:9999/");
        assert_eq!(env_manager.auth_url, "http://127.0.0.1:9999/services/auth/");
        assert_eq!(env_manager.rest_url, "http://127.0.0.1:9999/services/rest/");
    }

    #[test]
    fn test_validate_configuration() {
        assert!(EnvManager::new("key", "secret").validate().is_ok());
        assert!(EnvManager::new("", "secret").validate().is_err());
        assert!(EnvManager::new("key", "").validate().is_err());

        let mut bad_url = EnvManager::new("key", "secret");
        bad_url.rest_url = "api.rememberthemilk.com/services/rest/".to_string();
        assert!(bad_url.validate().is_err());
    }

    #[test]
    fn test_environment_info_hides_secret() {
        let env_manager = EnvManager::new("key", "supersecret");
        let info = env_manager.environment_info();
        assert!(info.contains(DEFAULT_REST_URL));
        assert!(!info.contains("supersecret"));
    }
}
