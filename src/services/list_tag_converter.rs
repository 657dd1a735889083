//! Conversão de listas em tags
//!
//! Todas as tarefas abertas vão para a Inbox e ganham uma tag com o nome da
//! lista de origem. Tarefas concluídas são descartadas, não migradas.

use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::models::{ExportedDocument, ImportedDocument, Tag, Task, TaskList};
use crate::utils::logging::{log_conversion_summary, log_duplicate_inbox};
use crate::utils::{AppError, AppResult};

pub const INBOX_LIST_NAME: &str = "Inbox";

/// Slug de um nome de lista: minúsculas e espaços trocados por hífen.
/// Pontuação e Unicode passam sem alteração.
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Ids são comparados pela representação JSON (`1` e `"1"` são diferentes)
fn id_key(id: &Value) -> String {
    id.to_string()
}

/// Índice das listas de um export, com a Inbox já localizada
#[derive(Debug)]
pub struct Lists<'a> {
    lists: &'a [TaskList],
    by_id: HashMap<String, &'a TaskList>,
    inbox: &'a TaskList,
}

impl<'a> Lists<'a> {
    pub fn new(lists: &'a [TaskList]) -> AppResult<Self> {
        let by_id = lists.iter().map(|list| (id_key(&list.id), list)).collect();

        let inboxes: Vec<&TaskList> = lists.iter().filter(|l| l.name == INBOX_LIST_NAME).collect();
        if inboxes.len() > 1 {
            log_duplicate_inbox(inboxes.len());
        }
        let inbox = inboxes.last().copied().ok_or(AppError::MissingInbox)?;

        Ok(Self { lists, by_id, inbox })
    }

    pub fn get_by_id(&self, id: &Value) -> Option<&'a TaskList> {
        self.by_id.get(&id_key(id)).copied()
    }

    pub fn inbox(&self) -> &'a TaskList {
        self.inbox
    }

    pub fn inbox_id(&self) -> &'a Value {
        &self.inbox.id
    }

    pub fn names(&self) -> impl Iterator<Item = &'a str> {
        self.lists.iter().map(|l| l.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

/// Uma tag por lista (Inbox incluída), todas com o mesmo instante
pub fn build_tags(lists: &Lists<'_>) -> Vec<Tag> {
    build_tags_at(lists, Utc::now().timestamp_millis())
}

pub fn build_tags_at(lists: &Lists<'_>, now_millis: i64) -> Vec<Tag> {
    lists
        .names()
        .map(|name| Tag {
            id: slugify(name),
            date_created: now_millis,
            date_modified: now_millis,
        })
        .collect()
}

/// Move as tarefas abertas para a Inbox, marcando a lista de origem como tag
pub fn retag_tasks(tasks: &[Task], lists: &Lists<'_>) -> AppResult<Vec<Task>> {
    let mut tagged_tasks = Vec::with_capacity(tasks.len());

    for task in tasks {
        if task.is_completed() {
            continue;
        }

        let source = lists
            .get_by_id(&task.list_id)
            .ok_or_else(|| AppError::UnknownList {
                task_id: id_key(&task.id),
                list_id: id_key(&task.list_id),
            })?;

        let mut tagged = task.clone();
        tagged.extra.insert("tags".to_string(), json!([slugify(&source.name)]));
        tagged.list_id = lists.inbox_id().clone();

        tagged_tasks.push(tagged);
    }

    Ok(tagged_tasks)
}

/// Converte um export completo; demais campos de topo passam intactos
pub fn convert(exported: &ExportedDocument) -> AppResult<ImportedDocument> {
    convert_at(exported, Utc::now().timestamp_millis())
}

pub fn convert_at(exported: &ExportedDocument, now_millis: i64) -> AppResult<ImportedDocument> {
    let lists = Lists::new(&exported.lists)?;

    let tags = build_tags_at(&lists, now_millis);
    let tasks = retag_tasks(&exported.tasks, &lists)?;

    log_conversion_summary(tags.len(), tasks.len(), exported.tasks.len() - tasks.len());

    let mut extra = exported.extra.clone();
    extra.remove("tags");

    Ok(ImportedDocument {
        lists: exported.lists.clone(),
        tasks,
        tags,
        extra,
    })
}
