use crate::error::{Result, TodoError};
use crate::models::{Document, Item, List, ListRecord, NewItem};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

/// Answers yes/no questions before destructive operations
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

/// Input for `add_item`
#[derive(Debug, Clone, Default)]
pub struct AddItem {
    pub list: String,
    pub item: NewItem,
}

/// Input for `delete_item`, `update_item` and `tick_item`
#[derive(Debug, Clone, Default)]
pub struct ItemRef {
    pub list: String,
    pub name: String,
}

/// Input for `manage_list`
#[derive(Debug, Clone, Default)]
pub struct ManageList {
    pub name: String,
    pub delete: bool,
}

/// What `delete_item` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Removed,
    Declined,
}

/// What `manage_list` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Created,
    Deleted,
    Declined,
    Unchanged,
}

/// All lists, keyed by name in insertion order, plus the dirty flag that
/// decides whether the store is written back.
#[derive(Debug, Default)]
pub struct Collection {
    lists: IndexMap<String, List>,
    dirty: bool,
}

impl Collection {
    pub fn load_from_document(doc: Document) -> Result<Self> {
        let mut lists = IndexMap::with_capacity(doc.len());
        for (name, record) in doc {
            let mut list = List::new();
            list.load(record.items)?;
            debug!(list = %name, items = list.len(), "loaded list");
            lists.insert(name, list);
        }
        Ok(Collection { lists, dirty: false })
    }

    pub fn save_to_document(&self) -> Document {
        self.lists
            .iter()
            .map(|(name, list)| (name.clone(), ListRecord { items: list.save() }))
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn list(&self, name: &str) -> Option<&List> {
        self.lists.get(name)
    }

    pub fn list_names(&self) -> Vec<String> {
        self.lists.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    // ==================== Read Operations ====================

    /// Render every list with its items numbered from 1
    pub fn show(&self, verbose: bool) -> String {
        let mut out = String::new();
        for (name, list) in &self.lists {
            out.push_str(name);
            out.push('\n');
            if list.is_empty() {
                out.push_str("  (empty)\n");
            }
            for (index, item) in list.iter().enumerate() {
                let mark = if item.completed { "✓" } else { "○" };
                let label = if verbose {
                    item.detail_label()
                } else {
                    item.brief_label()
                };
                let label = label.trim_end().replace('\n', "\n       ");
                out.push_str(&format!("  {:>2}. {mark} {label}\n", index + 1));
            }
        }
        out
    }

    // ==================== Item Operations ====================

    pub fn add_item(&mut self, add: AddItem) -> Result<&Item> {
        if self.list_mut(&add.list)?.contains_name(&add.item.name) {
            warn!(
                list = %add.list,
                item = %add.item.name,
                "list already has an item with this name"
            );
        }

        self.dirty = true;
        info!(list = %add.list, item = %add.item.name, "added item");
        let list = self.list_mut(&add.list)?;
        Ok(list.insert(Item::create(add.item)))
    }

    pub fn delete_item(
        &mut self,
        target: &ItemRef,
        confirm: &mut dyn Confirm,
    ) -> Result<Deletion> {
        let list = self.list_mut(&target.list)?;

        let index = list
            .position(&target.name)
            .ok_or_else(|| TodoError::ItemNotFound {
                list: target.list.clone(),
                name: target.name.clone(),
            })?;

        let question = format!("Delete '{}' from '{}'?", target.name, target.list);
        if !confirm.confirm(&question) {
            debug!(list = %target.list, item = %target.name, "delete declined");
            return Ok(Deletion::Declined);
        }

        list.remove_at(index);
        self.dirty = true;
        info!(list = %target.list, item = %target.name, "deleted item");
        Ok(Deletion::Removed)
    }

    pub fn update_item(&mut self, _target: &ItemRef) -> Result<()> {
        Err(TodoError::NotSupported("update"))
    }

    pub fn tick_item(&mut self, _target: &ItemRef) -> Result<()> {
        Err(TodoError::NotSupported("tick"))
    }

    // ==================== List Operations ====================

    pub fn manage_list(
        &mut self,
        request: &ManageList,
        confirm: &mut dyn Confirm,
    ) -> Result<ListChange> {
        let exists = self.lists.contains_key(&request.name);

        match (exists, request.delete) {
            (true, true) => {
                let question = format!("Delete list '{}' and all its items?", request.name);
                if !confirm.confirm(&question) {
                    debug!(list = %request.name, "list delete declined");
                    return Ok(ListChange::Declined);
                }
                self.lists.shift_remove(&request.name);
                self.dirty = true;
                info!(list = %request.name, "deleted list");
                Ok(ListChange::Deleted)
            }
            (false, false) => {
                self.lists.insert(request.name.clone(), List::new());
                self.dirty = true;
                info!(list = %request.name, "created list");
                Ok(ListChange::Created)
            }
            (false, true) => Err(self.list_not_found(&request.name)),
            (true, false) => Ok(ListChange::Unchanged),
        }
    }

    // Helper functions

    fn list_mut(&mut self, name: &str) -> Result<&mut List> {
        let index = self
            .lists
            .get_index_of(name)
            .ok_or_else(|| self.list_not_found(name))?;
        Ok(&mut self.lists[index])
    }

    fn list_not_found(&self, name: &str) -> TodoError {
        TodoError::ListNotFound {
            name: name.to_string(),
            available: self.list_names(),
        }
    }
}
