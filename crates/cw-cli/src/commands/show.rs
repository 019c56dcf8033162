use std::path::Path;

use colored::Colorize;
use cw_core::{Character, Item, Scene, World};

pub fn run(path: &Path, name: &str) -> Result<(), String> {
    let world = super::load_world(path)?;
    let needle = name.trim().to_lowercase();
    let matches = |id: &str, display: &str| {
        id.to_lowercase() == needle || display.to_lowercase() == needle
    };

    if let Some(scene) = world.scenes().find(|s| matches(s.id.as_str(), s.title())) {
        show_scene(&world, scene);
    } else if let Some(item) = world.items.iter().find(|i| matches(i.id.as_str(), &i.name)) {
        show_item(&world, item);
    } else if let Some(character) = world.characters().find(|c| matches(c.id.as_str(), &c.name)) {
        show_character(&world, character);
    } else {
        return Err(format!("nothing named \"{name}\""));
    }
    Ok(())
}

fn header(title: &str, kind: &str) {
    println!("  {} [{}]", title.bold(), kind.dimmed());
    println!();
}

fn paragraph(text: &str) {
    if text.is_empty() {
        return;
    }
    for line in text.lines() {
        println!("  {}", line.trim());
    }
    println!();
}

fn names(world: &World, ids: &[cw_core::ItemId]) -> String {
    ids.iter()
        .map(|id| world.items.name_of(id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn show_scene(world: &World, scene: &Scene) {
    header(scene.title(), "scene");
    paragraph(&scene.description);
    if !scene.items.is_empty() {
        println!("  items:      {}", names(world, &scene.items));
    }
    if !scene.passive_items.is_empty() {
        println!("  fixtures:   {}", names(world, &scene.passive_items));
    }
    if !scene.characters.is_empty() {
        let people: Vec<String> = scene
            .characters
            .iter()
            .map(|id| {
                world
                    .character(id)
                    .map_or_else(|_| id.to_string(), |c| c.name.clone())
            })
            .collect();
        println!("  characters: {}", people.join(", "));
    }
    if let Some(music) = &scene.music {
        println!("  music:      {music}");
    }
    if let Some(hint) = &scene.hint {
        println!("  hint:       {hint}");
    }
    if !scene.exits.is_empty() {
        println!();
        println!("  {}", "Exits:".bold());
        for exit in &scene.exits {
            let mut line = format!("{} -> {}", exit.door_name, exit.scene_id);
            if exit.blocked {
                line.push_str(" (blocked)");
            }
            if let Some(key) = exit.required_item.as_ref().filter(|_| exit.locked) {
                line.push_str(&format!(" (locked, needs {})", world.items.name_of(key)));
            }
            println!("    {line}");
        }
    }
}

fn show_item(world: &World, item: &Item) {
    header(&item.name, "item");
    paragraph(&item.description);
    if !item.effect.is_empty() {
        let effect: Vec<String> = item.effect.iter().map(|(s, v)| format!("{s} {v:+}")).collect();
        println!("  effect:     {}", effect.join(", "));
    }
    if !item.components.is_empty() {
        println!("  made from:  {}", names(world, &item.components));
    }
    if let Some(tool) = &item.repair_item {
        println!("  repair:     {}", world.items.name_of(tool));
    }
    if !item.contents.is_empty() {
        println!("  contents:   {}", names(world, &item.contents));
    }
    if !item.states.is_empty() {
        println!();
        println!("  {}", "States:".bold());
        for (name, state) in &item.states {
            let marker = if *name == item.current_state { "*" } else { " " };
            let action = match (&state.action, &state.next_state) {
                (Some(action), Some(next)) => format!(" [{action:?} -> {next}]"),
                _ => String::new(),
            };
            println!("   {marker} {name}{action}: {}", state.description.dimmed());
        }
    }
}

fn show_character(world: &World, character: &Character) {
    header(&character.name, &character.kind.to_string());
    paragraph(&character.description);
    let s = character.stats;
    println!(
        "  stats:      health {}, attack {}, defense {}",
        s.health, s.attack, s.defense
    );
    if !character.greeting.is_empty() {
        println!("  greeting:   \"{}\"", character.greeting);
    }
    if !character.inventory.is_empty() {
        println!("  loot:       {}", names(world, &character.inventory));
    }
    if !character.dialogue.is_empty() {
        println!();
        println!("  {}", "Dialogue:".bold());
        for option in &character.dialogue {
            println!("    - {}", option.menu_text());
        }
    }
}
