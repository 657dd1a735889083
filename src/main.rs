/// CLI `rtm`
///
/// - `tasks` / `lists`: autentica no Remember The Milk e imprime a resposta da API
/// - `exports`: mostra os arquivos exportados disponíveis
/// - `convert <EXPORT>`: transforma listas em tags e grava um arquivo de importação

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use rtm_client::{AuthFlow, EnvManager, FrobPrompt, RemoteMethod, RtmClient, RtmError, RtmResult};
use rtm_tools::config::Settings;
use rtm_tools::services::{list_tag_converter, ExportStore};
use rtm_tools::utils::logging::*;
use rtm_tools::utils::AppResult;

/// Ferramentas de linha de comando para o Remember The Milk
#[derive(Parser)]
#[command(name = "rtm")]
#[command(version)]
#[command(about = "Autenticação, consulta e conversão de exports do Remember The Milk", long_about = None)]
struct Cli {
    /// Modo verbose para debug
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Comando a executar
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Autentica e lista as tarefas (rtm.tasks.getList)
    Tasks,

    /// Autentica e lista as listas (rtm.lists.getList)
    Lists,

    /// Mostra os arquivos candidatos no diretório de exports
    Exports,

    /// Converte listas em tags e grava o resultado no diretório de imports
    Convert {
        /// Arquivo JSON exportado do RTM
        export: PathBuf,
    },
}

/// Prompt no terminal para o frob confirmado no navegador
struct TerminalPrompt;

impl FrobPrompt for TerminalPrompt {
    fn prompt_frob(&self) -> RtmResult<String> {
        dialoguer::Input::<String>::new()
            .with_prompt("Please enter the frob")
            .interact_text()
            .map_err(|e| RtmError::prompt_error(e.to_string()))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // .env antes do tracing para que RUST_LOG definido lá valha
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    init_tracing(cli.verbose);

    if dotenv_loaded {
        tracing::debug!("Arquivo .env carregado");
    }

    if let Err(e) = execute_command(&cli).await {
        log_error(&format!("❌ {}", e));
        eprintln!("❌ Erro: {}", e);
        std::process::exit(1);
    }
}

async fn execute_command(cli: &Cli) -> AppResult<()> {
    match &cli.command {
        Commands::Tasks => fetch(RemoteMethod::TasksGetList).await,

        Commands::Lists => fetch(RemoteMethod::ListsGetList).await,

        Commands::Exports => {
            let store = ExportStore::new(&load_settings()?.paths);
            let candidates = store.candidate_exports()?;

            if candidates.is_empty() {
                log_info("Nenhum arquivo de exportação encontrado");
            }
            for path in candidates {
                println!("{}", path.display());
            }
            Ok(())
        }

        Commands::Convert { export } => {
            let store = ExportStore::new(&load_settings()?.paths);

            let exported = store.read_export(export)?;
            let imported = list_tag_converter::convert(&exported)?;
            let path = store.write_import(&imported)?;

            println!("{}", path.display());
            Ok(())
        }
    }
}

fn load_settings() -> AppResult<Settings> {
    let settings = Settings::new()?;
    log_config_loaded(&Settings::run_mode());
    Ok(settings)
}

async fn fetch(method: RemoteMethod) -> AppResult<()> {
    let client = authenticated_client().await?;

    log_rtm_call(method.name());
    let body = client.get(method, &HashMap::new()).await?;

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// Usa RTM_AUTH_TOKEN quando presente; senão executa o fluxo no navegador
async fn authenticated_client() -> AppResult<RtmClient> {
    let env = EnvManager::load()?;
    let saved_token = env.auth_token.clone();
    let flow = AuthFlow::new(Arc::new(TerminalPrompt)).with_prompt_timeout(env.prompt_timeout);

    let mut client = RtmClient::new(env)?;

    match saved_token {
        Some(token) => flow.resume(&mut client, &token).await?,
        None => flow.authenticate(&mut client).await?,
    }

    Ok(client)
}
