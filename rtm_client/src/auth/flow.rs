use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use crate::client::api::{Permission, RemoteMethod, RtmClient};
use crate::error::{RtmError, RtmResult};

/// Estado do cliente no handshake (sem refresh: `Authenticated` é terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

impl AuthState {
    pub fn of(client: &RtmClient) -> Self {
        if client.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }
}

/// Fonte do frob confirmado pelo usuário depois da autorização no navegador
///
/// É o único ponto de bloqueio do sistema; roda fora do runtime assíncrono.
pub trait FrobPrompt: Send + Sync {
    fn prompt_frob(&self) -> RtmResult<String>;
}

impl<F> FrobPrompt for F
where
    F: Fn() -> RtmResult<String> + Send + Sync,
{
    fn prompt_frob(&self) -> RtmResult<String> {
        self()
    }
}

/// Abre a URL de autorização para o usuário
pub trait BrowserOpener: Send + Sync {
    fn open(&self, url: &str) -> RtmResult<()>;
}

/// Navegador padrão do sistema
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> RtmResult<()> {
        webbrowser::open(url).map_err(|e| RtmError::browser_error(e.to_string()))
    }
}

/// Handshake frob → token do Remember The Milk
pub struct AuthFlow {
    prompt: Arc<dyn FrobPrompt>,
    browser: Box<dyn BrowserOpener>,
    permission: Permission,
    prompt_timeout: Option<Duration>,
}

impl AuthFlow {
    /// Cria o fluxo pedindo permissão `delete`, com o navegador do sistema
    pub fn new(prompt: Arc<dyn FrobPrompt>) -> Self {
        Self {
            prompt,
            browser: Box::new(SystemBrowser),
            permission: Permission::Delete,
            prompt_timeout: None,
        }
    }

    pub fn with_browser(mut self, browser: impl BrowserOpener + 'static) -> Self {
        self.browser = Box::new(browser);
        self
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }

    pub fn with_prompt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.prompt_timeout = timeout;
        self
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Executa o fluxo completo e guarda o token no cliente
    ///
    /// Sem retry: qualquer falha de rede ou da API encerra o fluxo.
    pub async fn authenticate(&self, client: &mut RtmClient) -> RtmResult<()> {
        if AuthState::of(client) == AuthState::Authenticated {
            log::debug!("Cliente já autenticado, nada a fazer");
            return Ok(());
        }

        log::info!("🔑 Iniciando autenticação no Remember The Milk...");
        log::info!("📍 {}", client.env().environment_info());

        // 1. Abre a página de autorização
        self.open_authorization_page(client)?;

        // 2. Aguarda o frob confirmado pelo usuário
        log::info!("⏳ Aguardando autorização do usuário...");
        let frob = self.await_frob().await?;

        // 3. Troca o frob por um token permanente
        log::info!("🔄 Trocando frob por token...");
        let token = client.exchange_frob(&frob).await?;
        client.set_token(token);

        log::info!("✅ Autenticação concluída com sucesso!");
        Ok(())
    }

    /// Retoma uma sessão a partir de um token já emitido, verificando-o antes
    pub async fn resume(&self, client: &mut RtmClient, token: &str) -> RtmResult<()> {
        if AuthState::of(client) == AuthState::Authenticated {
            return Ok(());
        }

        log::info!("🔍 Token encontrado, validando...");

        let mut candidate = client.clone();
        candidate.set_token(token.to_string());

        let body = candidate
            .call(RemoteMethod::AuthCheckToken, &HashMap::new(), true)
            .await?;
        let checked = RtmClient::extract_token(&body)?;

        client.set_token(checked);
        log::info!("✅ Token válido! Autenticação concluída.");
        Ok(())
    }

    fn open_authorization_page(&self, client: &RtmClient) -> RtmResult<()> {
        let url = client.auth_url(self.permission)?;
        log::debug!("URL de autorização:\n{}", url);

        if let Err(e) = self.browser.open(url.as_str()) {
            log::warn!("⚠️ Não foi possível abrir o navegador automaticamente: {}", e);
            log::info!("🔗 Abra manualmente o link: {}", url);
        } else {
            log::info!("🌐 Navegador aberto automaticamente");
        }

        Ok(())
    }

    async fn await_frob(&self) -> RtmResult<String> {
        let prompt = Arc::clone(&self.prompt);
        let handle = tokio::task::spawn_blocking(move || prompt.prompt_frob());

        let joined = match self.prompt_timeout {
            Some(limit) => tokio::time::timeout(limit, handle)
                .await
                .map_err(|_| RtmError::Timeout)?,
            None => handle.await,
        };

        let frob = joined
            .map_err(|e| RtmError::prompt_error(format!("Erro na thread do prompt: {}", e)))??;

        let frob = frob.trim().to_string();
        if frob.is_empty() {
            return Err(RtmError::incomplete("nenhum frob informado"));
        }

        Ok(frob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvManager;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;
    use wiremock::matchers::{method as http_method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Navegador falso que só registra as URLs abertas
    #[derive(Clone, Default)]
    struct RecordingBrowser {
        opened: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl BrowserOpener for RecordingBrowser {
        fn open(&self, url: &str) -> RtmResult<()> {
            self.opened.lock().unwrap().push(url.to_string());
            if self.fail {
                Err(RtmError::browser_error("sem display"))
            } else {
                Ok(())
            }
        }
    }

    fn fixed_prompt(frob: &'static str) -> Arc<dyn FrobPrompt> {
        Arc::new(move || -> RtmResult<String> { Ok(frob.to_string()) })
    }

    fn test_client(server: &MockServer) -> RtmClient {
        RtmClient::new(EnvManager::new("key", "secret").with_base_url(&server.uri())).unwrap()
    }

    async fn mount_get_token(server: &MockServer, body: serde_json::Value, expected: u64) {
        Mock::given(http_method("GET"))
            .and(path("/services/rest/"))
            .and(query_param("method", "rtm.auth.getToken"))
            .and(query_param("frob", "F1"))
            // md5("secretapi_keykeyformatjsonfrobF1methodrtm.auth.getTokenv2")
            .and(query_param("api_sig", "6b9de532e94655eead11e64ca44eed9c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(expected)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_authenticate_stores_token() {
        let server = MockServer::start().await;
        mount_get_token(
            &server,
            json!({"rsp": {"stat": "ok", "auth": {"token": "T1", "perms": "delete"}}}),
            1,
        )
        .await;

        let browser = RecordingBrowser::default();
        let flow = AuthFlow::new(fixed_prompt("F1")).with_browser(browser.clone());
        let mut client = test_client(&server);

        assert_eq!(AuthState::of(&client), AuthState::Unauthenticated);
        flow.authenticate(&mut client).await.unwrap();

        assert_eq!(AuthState::of(&client), AuthState::Authenticated);
        assert_eq!(client.token(), Some("T1"));

        let opened = browser.opened.lock().unwrap();
        assert_eq!(opened.len(), 1);
        assert!(opened[0].starts_with(&format!("{}/services/auth/?", server.uri())));
        // md5("secretapi_keykeypermsdelete")
        assert!(opened[0].ends_with("api_key=key&perms=delete&api_sig=6b9b4dd10bf9800193acc2f62362e03a"));
    }

    #[tokio::test]
    async fn test_authenticate_trims_frob() {
        let server = MockServer::start().await;
        mount_get_token(&server, json!({"rsp": {"stat": "ok", "auth": {"token": "T1"}}}), 1).await;

        let flow = AuthFlow::new(fixed_prompt("  F1\n")).with_browser(RecordingBrowser::default());
        let mut client = test_client(&server);

        flow.authenticate(&mut client).await.unwrap();
        assert_eq!(client.token(), Some("T1"));
    }

    #[tokio::test]
    async fn test_browser_failure_is_not_fatal() {
        let server = MockServer::start().await;
        mount_get_token(&server, json!({"rsp": {"stat": "ok", "auth": {"token": "T1"}}}), 1).await;

        let browser = RecordingBrowser {
            fail: true,
            ..Default::default()
        };
        let flow = AuthFlow::new(fixed_prompt("F1")).with_browser(browser);
        let mut client = test_client(&server);

        flow.authenticate(&mut client).await.unwrap();
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn test_empty_frob_is_incomplete() {
        let server = MockServer::start().await;
        mount_get_token(&server, json!({}), 0).await;

        let flow = AuthFlow::new(fixed_prompt("   ")).with_browser(RecordingBrowser::default());
        let mut client = test_client(&server);

        let result = flow.authenticate(&mut client).await;
        assert!(matches!(result, Err(RtmError::AuthenticationIncomplete(_))));
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_rejected_frob_is_incomplete() {
        let server = MockServer::start().await;
        mount_get_token(
            &server,
            json!({"rsp": {"stat": "fail", "err": {"code": "101", "msg": "Invalid frob - did you authenticate?"}}}),
            1,
        )
        .await;

        let flow = AuthFlow::new(fixed_prompt("F1")).with_browser(RecordingBrowser::default());
        let mut client = test_client(&server);

        let result = flow.authenticate(&mut client).await;
        assert!(matches!(result, Err(RtmError::AuthenticationIncomplete(_))));
        assert_eq!(client.token(), None);
    }

    #[tokio::test]
    async fn test_transport_error_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(http_method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&server)
            .await;

        let flow = AuthFlow::new(fixed_prompt("F1")).with_browser(RecordingBrowser::default());
        let mut client = test_client(&server);

        let result = flow.authenticate(&mut client).await;
        assert!(matches!(result, Err(RtmError::Api { status: 502, .. })));
    }

    #[tokio::test]
    async fn test_prompt_error_propagates() {
        let server = MockServer::start().await;
        mount_get_token(&server, json!({}), 0).await;

        let prompt: Arc<dyn FrobPrompt> =
            Arc::new(|| -> RtmResult<String> { Err(RtmError::prompt_error("stdin fechado")) });
        let flow = AuthFlow::new(prompt).with_browser(RecordingBrowser::default());
        let mut client = test_client(&server);

        let result = flow.authenticate(&mut client).await;
        assert!(matches!(result, Err(RtmError::Prompt(_))));
    }

    #[tokio::test]
    async fn test_prompt_timeout() {
        let server = MockServer::start().await;
        mount_get_token(&server, json!({}), 0).await;

        let prompt: Arc<dyn FrobPrompt> = Arc::new(|| -> RtmResult<String> {
            std::thread::sleep(Duration::from_millis(500));
            Ok("F1".to_string())
        });
        let flow = AuthFlow::new(prompt)
            .with_browser(RecordingBrowser::default())
            .with_prompt_timeout(Some(Duration::from_millis(20)));
        let mut client = test_client(&server);

        let result = flow.authenticate(&mut client).await;
        assert!(matches!(result, Err(RtmError::Timeout)));
    }

    #[tokio::test]
    async fn test_authenticated_is_terminal() {
        let server = MockServer::start().await;
        mount_get_token(&server, json!({}), 0).await;

        let browser = RecordingBrowser::default();
        let flow = AuthFlow::new(fixed_prompt("F1")).with_browser(browser.clone());
        let mut client = test_client(&server);
        client.set_token("existing".to_string());

        flow.authenticate(&mut client).await.unwrap();

        assert_eq!(client.token(), Some("existing"));
        assert!(browser.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resume_with_valid_token() {
        let server = MockServer::start().await;

        Mock::given(http_method("GET"))
            .and(path("/services/rest/"))
            .and(query_param("method", "rtm.auth.checkToken"))
            .and(query_param("auth_token", "saved"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rsp": {"stat": "ok", "auth": {"token": "saved", "perms": "delete"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let browser = RecordingBrowser::default();
        let flow = AuthFlow::new(fixed_prompt("unused")).with_browser(browser.clone());
        let mut client = test_client(&server);

        flow.resume(&mut client, "saved").await.unwrap();

        assert_eq!(client.token(), Some("saved"));
        assert!(browser.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resume_with_invalid_token() {
        let server = MockServer::start().await;

        Mock::given(http_method("GET"))
            .and(query_param("method", "rtm.auth.checkToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rsp": {"stat": "fail", "err": {"code": "98", "msg": "Login failed / Invalid auth token"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let flow = AuthFlow::new(fixed_prompt("unused")).with_browser(RecordingBrowser::default());
        let mut client = test_client(&server);

        let result = flow.resume(&mut client, "stale").await;

        assert!(matches!(result, Err(RtmError::AuthenticationIncomplete(_))));
        assert!(!client.is_authenticated());
    }
}
