use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::filter::ViewFilter;
use crate::item::TodoItem;

const TODO_FILE: &str = "todos.json";

#[derive(Debug)]
pub struct TodoStore {
    path: PathBuf,
    items: Vec<TodoItem>,
    filter: ViewFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Modified(usize),
    Deleted(usize),
}

impl TodoStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let path = data_dir.join(TODO_FILE);
        let items = load_items(&path);

        info!(
            path = %path.display(),
            count = items.len(),
            "opened todo store"
        );

        Ok(Self {
            path,
            items,
            filter: ViewFilter::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn filter(&self) -> ViewFilter {
        self.filter
    }

    #[tracing::instrument(skip(self, text))]
    pub fn add(&mut self, text: &str, now: DateTime<Utc>) -> anyhow::Result<Option<i64>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("ignoring empty todo text");
            return Ok(None);
        }

        let item = TodoItem::new(trimmed.to_string(), now);
        let id = item.id;
        self.items.insert(0, item);
        self.save()?;

        debug!(id, count = self.items.len(), "added todo");
        Ok(Some(id))
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: i64) -> anyhow::Result<usize> {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = before - self.items.len();
        self.save()?;

        debug!(id, removed, "deleted todo");
        Ok(removed)
    }

    #[tracing::instrument(skip(self))]
    pub fn toggle(&mut self, id: i64) -> anyhow::Result<usize> {
        let mut flipped = 0;
        for item in &mut self.items {
            if item.id == id {
                item.completed = !item.completed;
                flipped += 1;
            }
        }
        self.save()?;

        debug!(id, flipped, "toggled todo");
        Ok(flipped)
    }

    #[tracing::instrument(skip(self, new_text))]
    pub fn edit(&mut self, id: i64, new_text: &str) -> anyhow::Result<EditOutcome> {
        let trimmed = new_text.trim();
        if trimmed.is_empty() {
            let removed = self.delete(id)?;
            return Ok(EditOutcome::Deleted(removed));
        }

        let mut changed = 0;
        for item in &mut self.items {
            if item.id == id {
                item.text = trimmed.to_string();
                changed += 1;
            }
        }
        self.save()?;

        debug!(id, changed, "edited todo");
        Ok(EditOutcome::Modified(changed))
    }

    #[tracing::instrument(skip(self))]
    pub fn clear_completed(&mut self) -> anyhow::Result<usize> {
        let before = self.items.len();
        self.items.retain(|item| !item.completed);
        let removed = before - self.items.len();
        self.save()?;

        info!(removed, "cleared completed todos");
        Ok(removed)
    }

    pub fn set_filter(&mut self, filter: ViewFilter) {
        debug!(filter = filter.as_str(), "switched view filter");
        self.filter = filter;
    }

    pub fn filtered_view(&self) -> Vec<&TodoItem> {
        self.items
            .iter()
            .filter(|item| self.filter.matches(item))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|item| !item.completed).count()
    }

    #[tracing::instrument(skip(self))]
    fn save(&self) -> anyhow::Result<()> {
        debug!(
            path = %self.path.display(),
            count = self.items.len(),
            "saving todos"
        );

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
        serde_json::to_writer(&mut temp, &self.items).context("failed to serialize todos")?;
        temp.flush()?;

        temp.persist(&self.path)
            .map_err(|err| anyhow!("failed to persist {}: {}", self.path.display(), err))?;

        Ok(())
    }
}

fn load_items(path: &Path) -> Vec<TodoItem> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no saved todos");
            return Vec::new();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed reading saved todos; starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "discarding unparsable todo data");
            Vec::new()
        }
    }
}
