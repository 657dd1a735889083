use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lista do RTM; campos desconhecidos ficam em `extra` e são preservados
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TaskList {
    pub id: Value,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tarefa do RTM
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    pub id: Value,
    pub list_id: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Concluída = campo `date_completed` presente, qualquer que seja o valor
    pub fn is_completed(&self) -> bool {
        self.extra.contains_key("date_completed")
    }

    pub fn tags(&self) -> Option<&Value> {
        self.extra.get("tags")
    }
}

/// Tag criada a partir do nome de uma lista
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub date_created: i64,
    pub date_modified: i64,
}

/// Documento exportado pelo RTM
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportedDocument {
    pub lists: Vec<TaskList>,
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Documento pronto para importação: listas viram tags
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImportedDocument {
    pub lists: Vec<TaskList>,
    pub tasks: Vec<Task>,
    pub tags: Vec<Tag>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
