use reqwest::{Client, Response};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;
use url::Url;
use crate::auth::signer::{self, SIGNATURE_PARAM};
use crate::config::EnvManager;
use crate::error::{RtmError, RtmResult};

/// Formato de resposta pedido à API REST
pub const RESPONSE_FORMAT: &str = "json";

/// Versão da API REST do RTM
pub const API_VERSION: &str = "2";

/// Parâmetros que o cliente preenche sozinho; argumentos do chamador não podem usá-los
const RESERVED_PARAMS: [&str; 6] = ["method", "api_key", "format", "v", "auth_token", SIGNATURE_PARAM];

/// Nível de permissão pedido na autorização
///
/// - `Read`: ler tarefas, contatos, grupos e listas
/// - `Write`: adicionar e modificar (inclui leitura)
/// - `Delete`: apagar (inclui leitura e escrita)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Delete,
}

impl Permission {
    /// Valor enviado no parâmetro `perms`
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Delete => "delete",
        }
    }

    /// Cada nível é um superconjunto estrito do anterior
    pub fn includes(&self, other: Permission) -> bool {
        *self >= other
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read" => Ok(Permission::Read),
            "write" => Ok(Permission::Write),
            "delete" => Ok(Permission::Delete),
            _ => Err(format!("Permissão desconhecida: {}", s)),
        }
    }
}

/// Métodos remotos suportados
/// <https://www.rememberthemilk.com/services/api/methods.rtm>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteMethod {
    AuthGetToken,
    AuthCheckToken,
    TasksGetList,
    ListsGetList,
    TestEcho,
}

impl RemoteMethod {
    /// Nome do método na API
    pub fn name(&self) -> &'static str {
        match self {
            RemoteMethod::AuthGetToken => "rtm.auth.getToken",
            RemoteMethod::AuthCheckToken => "rtm.auth.checkToken",
            RemoteMethod::TasksGetList => "rtm.tasks.getList",
            RemoteMethod::ListsGetList => "rtm.lists.getList",
            RemoteMethod::TestEcho => "rtm.test.echo",
        }
    }

    /// Se o método exige `auth_token` quando chamado via [`RtmClient::get`]
    pub fn requires_token(&self) -> bool {
        match self {
            RemoteMethod::AuthGetToken | RemoteMethod::TestEcho => false,
            // checkToken recebe o token a verificar como auth_token
            RemoteMethod::AuthCheckToken => true,
            RemoteMethod::TasksGetList | RemoteMethod::ListsGetList => true,
        }
    }
}

impl fmt::Display for RemoteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cliente HTTP para a API REST do Remember The Milk
#[derive(Debug, Clone)]
pub struct RtmClient {
    client: Client,
    env: EnvManager,
    token: String,
}

impl RtmClient {
    /// Cria um novo cliente, ainda sem token
    ///
    /// # Timeouts
    ///
    /// - Total: 30s
    /// - Connect: 5s
    pub fn new(env: EnvManager) -> RtmResult<Self> {
        env.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| RtmError::config_error(format!("Falha ao criar cliente HTTP: {}", e)))?;

        Ok(Self {
            client,
            env,
            token: String::new(),
        })
    }

    /// Configuração em uso
    pub fn env(&self) -> &EnvManager {
        &self.env
    }

    /// Token atual, se o cliente já estiver autenticado
    pub fn token(&self) -> Option<&str> {
        if self.token.is_empty() {
            None
        } else {
            Some(&self.token)
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    pub(crate) fn set_token(&mut self, token: String) {
        self.token = token;
    }

    /// Monta o conjunto de parâmetros assinado de uma chamada REST
    ///
    /// A ordem devolvida é a ordem da query string: parâmetros ordenados pela
    /// chave e `api_sig` sempre por último.
    pub fn signed_params(
        &self,
        method: RemoteMethod,
        arguments: &HashMap<String, String>,
        requires_token: bool,
    ) -> RtmResult<Vec<(String, String)>> {
        let mut params = BTreeMap::new();

        for (key, value) in arguments {
            if RESERVED_PARAMS.contains(&key.as_str()) {
                return Err(RtmError::config_error(format!(
                    "Argumento reservado não pode ser sobrescrito: {}",
                    key
                )));
            }
            params.insert(key.clone(), value.clone());
        }

        params.insert("method".to_string(), method.name().to_string());
        params.insert("api_key".to_string(), self.env.api_key.clone());
        params.insert("format".to_string(), RESPONSE_FORMAT.to_string());
        params.insert("v".to_string(), API_VERSION.to_string());

        if requires_token {
            if self.token.is_empty() {
                return Err(RtmError::NotAuthenticated);
            }
            params.insert("auth_token".to_string(), self.token.clone());
        }

        Ok(Self::append_signature(&self.env.shared_secret, params))
    }

    /// URL da página de autorização para a permissão pedida
    pub fn auth_url(&self, permission: Permission) -> RtmResult<Url> {
        let mut params = BTreeMap::new();
        params.insert("api_key".to_string(), self.env.api_key.clone());
        params.insert("perms".to_string(), permission.as_str().to_string());

        let signed = Self::append_signature(&self.env.shared_secret, params);
        Ok(Url::parse_with_params(&self.env.auth_url, &signed)?)
    }

    fn append_signature(secret: &str, params: BTreeMap<String, String>) -> Vec<(String, String)> {
        let signature = signer::sign(secret, &params);
        let mut ordered: Vec<(String, String)> = params.into_iter().collect();
        ordered.push((SIGNATURE_PARAM.to_string(), signature));
        ordered
    }

    /// Chama um método remoto e devolve o JSON da resposta sem validação
    pub async fn call(
        &self,
        method: RemoteMethod,
        arguments: &HashMap<String, String>,
        requires_token: bool,
    ) -> RtmResult<Value> {
        let params = self.signed_params(method, arguments, requires_token)?;

        log::debug!("GET {} método {}", self.env.rest_url, method);

        let response = self
            .client
            .get(&self.env.rest_url)
            .query(&params)
            .send()
            .await?;

        let response = self.handle_response(method, response).await?;
        let body = response.text().await?;

        log::debug!("Método {} respondeu:\n{}", method, body);

        Ok(serde_json::from_str(&body)?)
    }

    /// Chama um método usando a exigência de token padrão dele
    pub async fn get(&self, method: RemoteMethod, arguments: &HashMap<String, String>) -> RtmResult<Value> {
        self.call(method, arguments, method.requires_token()).await
    }

    /// Troca um frob confirmado pelo usuário por um token permanente
    pub async fn exchange_frob(&self, frob: &str) -> RtmResult<String> {
        let mut arguments = HashMap::new();
        arguments.insert("frob".to_string(), frob.to_string());

        let body = self.call(RemoteMethod::AuthGetToken, &arguments, false).await?;
        Self::extract_token(&body)
    }

    /// Lê `rsp.auth.token`; sem token, devolve a mensagem de erro do RTM
    pub fn extract_token(body: &Value) -> RtmResult<String> {
        if let Some(token) = body.pointer("/rsp/auth/token").and_then(Value::as_str) {
            return Ok(token.to_string());
        }

        let message = body
            .pointer("/rsp/err/msg")
            .and_then(Value::as_str)
            .unwrap_or("resposta sem token");

        Err(RtmError::incomplete(message))
    }

    async fn handle_response(&self, method: RemoteMethod, response: Response) -> RtmResult<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        log::error!("❌ RTM {} falhou ({}): {}", method, status_code, message);

        Err(RtmError::Api {
            status: status_code,
            message,
        })
    }
}
