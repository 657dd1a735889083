use thiserror::Error;

/// Tipos de erro do cliente Remember The Milk
#[derive(Error, Debug)]
pub enum RtmError {
    #[error("Erro de rede: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Erro da API RTM (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Autenticação incompleta: {0}")]
    AuthenticationIncomplete(String),

    #[error("Cliente não autenticado: chame authenticate() antes deste método")]
    NotAuthenticated,

    #[error("Timeout aguardando o frob do usuário")]
    Timeout,

    #[error("Erro no prompt: {0}")]
    Prompt(String),

    #[error("Erro do navegador: {0}")]
    Browser(String),

    #[error("Erro de variável de ambiente: {0}")]
    Env(String),

    #[error("Configuração inválida: {0}")]
    Config(String),

    #[error("Erro de serialização: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Erro de parsing de URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl RtmError {
    pub fn env_error(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn browser_error(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    pub fn prompt_error(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }

    pub fn incomplete(msg: impl Into<String>) -> Self {
        Self::AuthenticationIncomplete(msg.into())
    }
}

/// Tipo de resultado padrão do crate
pub type RtmResult<T> = Result<T, RtmError>;
