use anyhow::{Context, Result};
use apogee_config::Config;
use apogee_editor_engine::{Direction, GapSelection};
use apogee_editor_model::{Node, apogee_schema};
use apogee_references::{DisplayCatalog, ReferenceView, StaticReferenceManager, TreeState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, process};

fn print_usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("  {program} gaps <document.json>");
    eprintln!("  {program} references [config.toml]");
}

/// Lists every root-level gap position and where the gap search goes from it
fn print_gaps(doc_path: &Path) -> Result<()> {
    let json = std::fs::read_to_string(doc_path)
        .with_context(|| format!("Failed to read document {}", doc_path.display()))?;
    let doc = Node::from_json_str(&apogee_schema(), &json)
        .with_context(|| format!("Failed to parse document {}", doc_path.display()))?;

    println!("{doc}");
    let mut found = 0;
    for pos in 0..=doc.content_size() {
        let rp = doc.resolve(pos)?;
        if rp.depth() != 0 || !GapSelection::is_gap_location(&rp) {
            continue;
        }
        found += 1;
        let search = |dir| {
            GapSelection::find_from(&rp, dir, true).map_or_else(|| "-".to_string(), |gap| gap.pos().to_string())
        };
        println!(
            "gap {pos}: forward {}, backward {}",
            search(Direction::Forward),
            search(Direction::Backward)
        );
    }
    log::info!("{found} gap locations in {}", doc_path.display());
    Ok(())
}

fn print_references(config_path: Option<PathBuf>) -> Result<()> {
    let config = match &config_path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    if config.is_none() {
        log::info!("No config file found, using built-in reference types");
    }

    let catalog = config
        .as_ref()
        .map_or_else(DisplayCatalog::builtin, Config::display_catalog);
    let manager = StaticReferenceManager::new(catalog.reference_types());
    let mut view = ReferenceView::new(Arc::new(manager), &catalog);
    view.set_tree_state(TreeState::Expanded);
    for list in view.lists_mut() {
        list.tree_entry_mut().set_state(TreeState::Expanded);
    }

    println!("{}", view.tree_entry().outline());
    if let Some(config) = &config {
        println!();
        for list in view.lists() {
            println!(
                "{}: {}",
                list.reference_type(),
                list.tree_entry().icon_path(&config.resource_root).display()
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("gaps") if args.len() == 3 => print_gaps(Path::new(&args[2])),
        Some("references") if args.len() <= 3 => print_references(args.get(2).map(PathBuf::from)),
        _ => {
            print_usage(&args[0]);
            process::exit(1);
        }
    }
}
