use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub paths: PathSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PathSettings {
    /// Diretório com os arquivos exportados do RTM
    pub exports_dir: String,
    /// Diretório onde os arquivos de importação são gravados
    pub imports_dir: String,
    /// Padrão glob dos candidatos a exportação, relativo a `exports_dir`
    pub export_glob: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            exports_dir: "exports".to_string(),
            imports_dir: "imports".to_string(),
            export_glob: "*.json".to_string(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = Self::run_mode();
        let defaults = PathSettings::default();

        let s = Config::builder()
            .set_default("paths.exports_dir", defaults.exports_dir)?
            .set_default("paths.imports_dir", defaults.imports_dir)?
            .set_default("paths.export_glob", defaults.export_glob)?
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // RTM_TOOLS__PATHS__EXPORTS_DIR, RTM_TOOLS__PATHS__IMPORTS_DIR, ...
            .add_source(Environment::with_prefix("RTM_TOOLS").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn run_mode() -> String {
        std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into())
    }
}
