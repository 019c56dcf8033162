use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use cw_core::World;

/// Which part of the content to list.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Scenes,
    Items,
    Characters,
}

impl Section {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().trim_end_matches('s') {
            "scene" => Some(Section::Scenes),
            "item" => Some(Section::Items),
            "character" => Some(Section::Characters),
            _ => None,
        }
    }
}

pub fn run(path: &Path, kind: Option<&str>) -> Result<(), String> {
    let sections = match kind {
        None => vec![Section::Scenes, Section::Items, Section::Characters],
        Some(k) => vec![Section::parse(k).ok_or_else(|| {
            format!("unknown kind '{k}' (expected scenes, items, or characters)")
        })?],
    };
    let world = super::load_world(path)?;

    for section in sections {
        let (title, table, count) = match section {
            Section::Scenes => ("Scenes", scene_table(&world), world.scenes().count()),
            Section::Items => ("Items", item_table(&world), world.items.len()),
            Section::Characters => (
                "Characters",
                character_table(&world),
                world.characters().count(),
            ),
        };
        println!("  {title} ({count})");
        println!("{table}");
        println!();
    }

    Ok(())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn truncate(text: &str) -> String {
    if text.is_empty() {
        "-".to_string()
    } else if text.chars().count() > 50 {
        let head: String = text.chars().take(47).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn scene_table(world: &World) -> Table {
    let mut table = new_table(vec!["Id", "Name", "Items", "Exits"]);
    for scene in world.scenes() {
        let exits: Vec<String> = scene
            .exits
            .iter()
            .map(|e| format!("{} -> {}", e.door_name, e.scene_id))
            .collect();
        table.add_row(vec![
            scene.id.to_string(),
            scene.title().to_string(),
            scene.items.len().to_string(),
            exits.join(", "),
        ]);
    }
    table
}

fn item_table(world: &World) -> Table {
    let mut table = new_table(vec!["Id", "Name", "Flags", "Description"]);
    for item in world.items.iter() {
        let flags: Vec<&str> = [
            (item.usable, "usable"),
            (item.consumable, "consumable"),
            (item.equippable, "equippable"),
            (item.interactive, "interactive"),
            (item.repairable, "repairable"),
            (item.locked, "locked"),
            (!item.components.is_empty(), "craftable"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();
        table.add_row(vec![
            item.id.to_string(),
            item.name.clone(),
            flags.join(", "),
            truncate(&item.description),
        ]);
    }
    table
}

fn character_table(world: &World) -> Table {
    let mut table = new_table(vec!["Id", "Name", "Type", "Health", "Attack"]);
    for character in world.characters() {
        table.add_row(vec![
            character.id.to_string(),
            character.name.clone(),
            character.kind.to_string(),
            character.stats.health.to_string(),
            character.stats.attack.to_string(),
        ]);
    }
    table
}
