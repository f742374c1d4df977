use crate::config::Config;
use crate::core::{AddItem, Collection, Deletion, ItemRef, ListChange, ManageList};
use crate::error::TodoError;
use crate::models::{Level, NewItem};
use crate::prompt::Prompt;
use crate::store::Store;
use chrono::{DateTime, Utc};

/// Arguments of the add command
#[derive(Debug, Clone, Default)]
pub struct AddArgs {
    pub list: String,
    pub name: String,
    pub tags: Vec<String>,
    pub priority: u8,
    pub urgency: u8,
    pub deadline: Option<DateTime<Utc>>,
    pub description: Vec<String>,
}

/// Handle the show command
pub fn handle_show(config: &Config, all: bool) -> Result<(), TodoError> {
    let (_store, collection) = open(config)?;

    if collection.is_empty() {
        println!("No lists yet. Create one with `td list <name>`.");
        return Ok(());
    }

    print!("{}", collection.show(all || config.verbose));
    Ok(())
}

/// Handle the add command
pub fn handle_add(config: &Config, args: AddArgs) -> Result<(), TodoError> {
    let (store, mut collection) = open(config)?;

    let request = AddItem {
        list: args.list,
        item: NewItem {
            name: args.name,
            description: args.description.join(" "),
            tags: args.tags,
            priority: Level::new(args.priority)?,
            urgency: Level::new(args.urgency)?,
            deadline: args.deadline,
        },
    };
    let list = request.list.clone();

    let item = collection.add_item(request)?;
    println!("Added '{}' to '{list}'", item.brief_label());

    store.save_if_dirty(&collection)?;
    Ok(())
}

/// Handle the delete command
pub fn handle_delete(config: &Config, list: String, name: String) -> Result<(), TodoError> {
    let (store, mut collection) = open(config)?;
    let target = ItemRef { list, name };

    match collection.delete_item(&target, &mut Prompt::stdio())? {
        Deletion::Removed => println!("Deleted '{}' from '{}'", target.name, target.list),
        Deletion::Declined => println!("Kept '{}'", target.name),
    }

    store.save_if_dirty(&collection)?;
    Ok(())
}

/// Handle the update command
pub fn handle_update(config: &Config, list: String, name: String) -> Result<(), TodoError> {
    let (_store, mut collection) = open(config)?;
    collection.update_item(&ItemRef { list, name })
}

/// Handle the tick command
pub fn handle_tick(config: &Config, list: String, name: String) -> Result<(), TodoError> {
    let (_store, mut collection) = open(config)?;
    collection.tick_item(&ItemRef { list, name })
}

/// Handle the list command
pub fn handle_list(config: &Config, name: Option<String>, delete: bool) -> Result<(), TodoError> {
    let (store, mut collection) = open(config)?;

    let Some(name) = name else {
        if collection.is_empty() {
            println!("No lists yet.");
        }
        for list_name in collection.list_names() {
            let count = collection.list(&list_name).map_or(0, |l| l.len());
            println!("{list_name} ({count})");
        }
        return Ok(());
    };

    let request = ManageList { name, delete };
    match collection.manage_list(&request, &mut Prompt::stdio())? {
        ListChange::Created => println!("Created list '{}'", request.name),
        ListChange::Deleted => println!("Deleted list '{}'", request.name),
        ListChange::Declined => println!("Kept list '{}'", request.name),
        ListChange::Unchanged => {}
    }

    store.save_if_dirty(&collection)?;
    Ok(())
}

// Helper function
fn open(config: &Config) -> Result<(Store, Collection), TodoError> {
    let store = Store::new(&config.file);
    let collection = store.open()?;
    Ok((store, collection))
}
