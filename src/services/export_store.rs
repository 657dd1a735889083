use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PathSettings;
use crate::models::{ExportedDocument, ImportedDocument};
use crate::utils::logging::{log_export_loaded, log_import_written};
use crate::utils::AppResult;

/// Leitura de exports e gravação de imports no sistema de arquivos
#[derive(Debug, Clone)]
pub struct ExportStore {
    exports_dir: PathBuf,
    imports_dir: PathBuf,
    export_glob: String,
}

impl ExportStore {
    pub fn new(paths: &PathSettings) -> Self {
        Self {
            exports_dir: PathBuf::from(&paths.exports_dir),
            imports_dir: PathBuf::from(&paths.imports_dir),
            export_glob: paths.export_glob.clone(),
        }
    }

    pub fn imports_dir(&self) -> &Path {
        &self.imports_dir
    }

    /// Arquivos em `exports_dir` que casam com o padrão configurado, ordenados
    pub fn candidate_exports(&self) -> AppResult<Vec<PathBuf>> {
        let pattern = self.exports_dir.join(&self.export_glob);

        let mut paths = glob::glob(&pattern.to_string_lossy())?
            .collect::<Result<Vec<_>, _>>()?;
        paths.sort();

        Ok(paths)
    }

    pub fn read_export(&self, path: &Path) -> AppResult<ExportedDocument> {
        let raw = fs::read_to_string(path)?;
        let document: ExportedDocument = serde_json::from_str(&raw)?;

        log_export_loaded(path, document.lists.len(), document.tasks.len());
        Ok(document)
    }

    /// Grava o documento em `<imports_dir>/<timestamp ISO-8601 local>.json`
    pub fn write_import(&self, document: &ImportedDocument) -> AppResult<PathBuf> {
        self.write_import_at(document, Local::now().naive_local())
    }

    pub fn write_import_at(&self, document: &ImportedDocument, at: NaiveDateTime) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.imports_dir)?;

        let path = self.imports_dir.join(Self::import_file_name(at));
        // to_string_pretty indenta com 2 espaços
        fs::write(&path, serde_json::to_string_pretty(document)?)?;

        log_import_written(&path);
        Ok(path)
    }

    pub fn import_file_name(at: NaiveDateTime) -> String {
        format!("{}.json", at.format("%Y-%m-%dT%H:%M:%S%.6f"))
    }
}
