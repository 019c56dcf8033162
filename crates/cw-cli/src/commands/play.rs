use std::path::Path;

use cw_fiction::{Category, EngineConfig, GameSession, InputSource, Presenter, Snapshot};
use tracing::info;

use crate::terminal::{StdinInput, TerminalPresenter};

type Session = GameSession<TerminalPresenter, StdinInput>;

const DEFAULT_SAVE: &str = "castaway-save.json";

/// Run an interactive game on stdin/stdout.
pub fn run(content: &Path, config: EngineConfig, load: Option<&Path>) -> Result<(), String> {
    let world = super::load_world(content)?;
    if !world.title.is_empty() {
        println!("  {}", world.title);
        println!();
    }
    let mut session = GameSession::new(world, config, TerminalPresenter, StdinInput);

    match load {
        Some(path) => {
            let loaded = load_game(&mut session, path)?;
            session.presenter_mut().report(&loaded, Category::System);
            session.execute(cw_fiction::Intent::Explore).map_err(|e| e.to_string())?;
        }
        None => session.start().map_err(|e| e.to_string())?,
    }

    while !session.is_over() {
        let Some(line) = session.input_mut().request_input(">") else {
            break;
        };
        let mut words = line.split_whitespace();
        match words.next().map(str::to_lowercase).as_deref() {
            Some("save") => {
                let path = words.next().unwrap_or(DEFAULT_SAVE);
                let result = save_game(&session, Path::new(path));
                report(&mut session, result);
            }
            Some("load") => {
                let path = words.next().unwrap_or(DEFAULT_SAVE);
                let result = load_game(&mut session, Path::new(path));
                report(&mut session, result);
            }
            _ => {
                session.process(&line);
            }
        }
    }
    info!(status = ?session.status(), "game ended");
    Ok(())
}

fn save_game(session: &Session, path: &Path) -> Result<String, String> {
    let json = session.snapshot().to_json().map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    Ok(format!("Game saved to {}.", path.display()))
}

fn load_game(session: &mut Session, path: &Path) -> Result<String, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let snapshot = Snapshot::from_json(&json).map_err(|e| e.to_string())?;
    session.restore(snapshot).map_err(|e| e.to_string())?;
    Ok(format!("Game loaded from {}.", path.display()))
}

fn report(session: &mut Session, result: Result<String, String>) {
    let text = result.unwrap_or_else(|e| format!("error: {e}"));
    session.presenter_mut().report(&text, Category::System);
}
