//! Collage CLI - edit photo collage grids from the command line.

#![allow(
    clippy::needless_pass_by_value,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::too_many_lines,
    clippy::doc_markdown
)]

mod render;
mod session;

use clap::{Parser, Subcommand};
use collage_layout::{CellDelta, GridDims, ImagePool, ImageRef, ItemId, LayoutError, ResizeHandle};
use collage_yaml::{CollageConfig, TemplateCatalog};
use session::{Session, SessionError};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "collage")]
#[command(about = "Grid layout editor for photo collages")]
#[command(version)]
struct Cli {
    /// Session file holding the grid, tray and history
    #[arg(short, long, global = true, default_value = "collage.json")]
    session: PathBuf,

    /// Configuration file (grid size, history depth, templates)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new session with an empty grid
    New {
        /// Grid rows (default from config)
        #[arg(long)]
        rows: Option<usize>,

        /// Grid columns (default from config)
        #[arg(long)]
        columns: Option<usize>,

        /// Replace an existing session file
        #[arg(long)]
        force: bool,
    },

    /// Print the occupancy map, items and tray
    Show,

    /// Place an image; without --at it fills the next open slot
    Add {
        /// Image reference
        image: String,

        /// Top-left cell
        #[arg(long)]
        at: Option<usize>,

        /// Rows to span
        #[arg(long, default_value = "1")]
        rows: usize,

        /// Columns to span
        #[arg(long, default_value = "1")]
        cols: usize,
    },

    /// Move an item so its top-left cell lands on a position
    Move {
        /// Target cell
        to: usize,

        /// Item id (default: selection)
        #[arg(long)]
        id: Option<u64>,
    },

    /// Drag one of an item's resize handles
    Resize {
        /// Handle: n, s, e, w, ne, nw, se, sw
        handle: ResizeHandle,

        /// Row delta
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        rows: isize,

        /// Column delta
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        cols: isize,

        /// Item id (default: selection)
        #[arg(long)]
        id: Option<u64>,
    },

    /// Exchange the positions of two items
    Swap {
        /// Other item id
        other: u64,

        /// Item id (default: selection)
        #[arg(long)]
        id: Option<u64>,
    },

    /// Remove an item and return its image to the tray
    Delete {
        /// Item id (default: selection)
        #[arg(long)]
        id: Option<u64>,
    },

    /// Select an item, or clear the selection
    Select {
        /// Item id
        id: Option<u64>,
    },

    /// Insert an empty row before an index
    InsertRow { index: usize },

    /// Insert an empty column before an index
    InsertColumn { index: usize },

    /// Remove an empty row
    RemoveRow { index: usize },

    /// Remove an empty column
    RemoveColumn { index: usize },

    /// Apply a layout template (default: best fit for the item count)
    Template {
        /// Template name
        #[arg(long)]
        name: Option<String>,
    },

    /// Add images to the tray
    Tray {
        /// Image references
        #[arg(required = true)]
        images: Vec<String>,
    },

    /// Fill placeholders and empty cells from the tray
    PlaceAll,

    /// Remove every unfilled placeholder
    ClearPlaceholders,

    /// Revert the last change
    Undo,

    /// Re-apply the last undone change
    Redo,

    /// List available templates
    Templates,

    /// Validate a configuration file
    Check {
        /// Path to collage.yaml
        #[arg(default_value = "collage.yaml")]
        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        match e {
            SessionError::Layout(e) => eprintln!("Rejected: {e}"),
            e => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<CollageConfig, SessionError> {
    match path {
        Some(path) => Ok(CollageConfig::load(path)?),
        None => Ok(CollageConfig::default()),
    }
}

fn run(cli: Cli) -> Result<(), SessionError> {
    let config = load_config(cli.config.as_deref())?;
    let path = cli.session.as_path();

    match cli.command {
        Commands::New {
            rows,
            columns,
            force,
        } => new_session(path, &config, rows, columns, force),
        Commands::Show => show(&Session::load(path)?),
        Commands::Check { config } => check_config(&config),
        Commands::Templates => list_templates(&config),
        command => {
            let mut session = Session::load(path)?;
            apply(&mut session, &config, command)?;
            session.save(path)
        }
    }
}

fn new_session(
    path: &Path,
    config: &CollageConfig,
    rows: Option<usize>,
    columns: Option<usize>,
    force: bool,
) -> Result<(), SessionError> {
    if path.exists() && !force {
        return Err(SessionError::Exists(path.to_path_buf()));
    }
    let requested = GridDims {
        rows: rows.unwrap_or(config.grid.rows),
        columns: columns.unwrap_or(config.grid.columns),
    };
    if !requested.is_valid() {
        return Err(SessionError::GridSize(requested));
    }
    let dims = requested;
    let session = Session::new(dims, config.history.max_depth);
    session.save(path)?;
    println!("Created {dims} grid in {}", path.display());
    Ok(())
}

/// Run one editing command against a loaded session.
fn apply(session: &mut Session, config: &CollageConfig, command: Commands) -> Result<(), SessionError> {
    match command {
        Commands::Add {
            image,
            at,
            rows,
            cols,
        } => {
            let image = ImageRef::new(image);
            let placed = session.edit("add", |g, tray| match at {
                Some(position) => g.add_item_spanning(position, image, rows, cols).map(Some),
                None => match g.place_next(image) {
                    Ok(id) => Ok(Some(id)),
                    Err(image) => {
                        tray.release(image);
                        Ok(None)
                    }
                },
            })?;
            match placed {
                Some(id) => println!("Added item {id}"),
                None => println!("No open cell; image added to the tray"),
            }
        }
        Commands::Move { to, id } => {
            let id = session.target(id)?;
            session.edit("move", |g, _| g.move_item(id, to))?;
            println!("Moved item {id} to {to}");
        }
        Commands::Resize {
            handle,
            rows,
            cols,
            id,
        } => {
            let id = session.target(id)?;
            let area = session.edit("resize", |g, _| {
                g.resize_item(id, handle, CellDelta::new(rows, cols))
            })?;
            println!("Item {id} now covers {area}");
        }
        Commands::Swap { other, id } => {
            let id = session.target(id)?;
            let other = ItemId::new(other);
            session.edit("swap", |g, _| g.swap_items(id, other))?;
            println!("Swapped items {id} and {other}");
        }
        Commands::Delete { id } => {
            let id = session.target(id)?;
            session.edit("delete", |g, tray| {
                let item = g.delete_item(id)?;
                tray.release(item.image);
                Ok(())
            })?;
            println!("Deleted item {id}; image returned to the tray");
        }
        Commands::Select { id: Some(id) } => {
            let id = ItemId::new(id);
            session.select(id)?;
            println!("Selected item {id}");
        }
        Commands::Select { id: None } => {
            session.selection = None;
            println!("Selection cleared");
        }
        Commands::InsertRow { index } => {
            session.edit("insert row", |g, _| g.insert_row(index))?;
            println!("Inserted row; grid is now {}", session.grid.dims);
        }
        Commands::InsertColumn { index } => {
            session.edit("insert column", |g, _| g.insert_column(index))?;
            println!("Inserted column; grid is now {}", session.grid.dims);
        }
        Commands::RemoveRow { index } => {
            session.edit("remove row", |g, _| g.remove_row(index))?;
            println!("Removed row {index}; grid is now {}", session.grid.dims);
        }
        Commands::RemoveColumn { index } => {
            session.edit("remove column", |g, _| g.remove_column(index))?;
            println!("Removed column {index}; grid is now {}", session.grid.dims);
        }
        Commands::Template { name } => {
            let catalog = TemplateCatalog::from_config(config)?;
            let template = match name {
                Some(name) => catalog
                    .find(&name)
                    .ok_or_else(|| SessionError::UnknownTemplate(name.clone()))?,
                None => {
                    let count = session.grid.items.len();
                    catalog.best_fit(count).ok_or(SessionError::NoTemplate(count))?
                }
            };
            debug!(template = %template.name, "Applying template");
            let outcome = session.edit("template", |g, tray| g.apply_template_with_pool(template, tray))?;
            println!(
                "Applied '{}': {} items mapped, {} placeholders, {} returned to the tray",
                template.name,
                outcome.mapped,
                outcome.placeholders,
                outcome.surplus.len()
            );
        }
        Commands::Tray { images } => {
            let count = images.len();
            session.edit("tray", |_, tray| {
                for image in images {
                    tray.push(image);
                }
                Ok::<_, LayoutError>(())
            })?;
            println!("Tray holds {} images ({count} added)", session.tray.len());
        }
        Commands::PlaceAll => {
            let outcome = session.edit("place all", |g, tray| Ok(g.place_all(tray)))?;
            println!("placed={} remaining={}", outcome.placed, outcome.remaining);
        }
        Commands::ClearPlaceholders => {
            let removed = session.edit("clear placeholders", |g, _| Ok(g.clear_placeholders()))?;
            println!("Removed {removed} placeholders");
        }
        Commands::Undo => match session.undo()? {
            Some(label) => println!("Undid {label}"),
            None => println!("Nothing to undo"),
        },
        Commands::Redo => match session.redo()? {
            Some(label) => println!("Redid {label}"),
            None => println!("Nothing to redo"),
        },
        Commands::New { .. }
        | Commands::Show
        | Commands::Templates
        | Commands::Check { .. } => {}
    }
    Ok(())
}

fn show(session: &Session) -> Result<(), SessionError> {
    let grid = session.grid()?;
    println!("Grid {}", grid.dims());
    print!("{}", render::occupancy_map(&grid, session.selection));
    print!("{}", render::entity_list(&grid));
    if let Some(id) = session.selection {
        println!("Selected: item {id}");
    }
    let tray: Vec<_> = session.tray.iter().map(ImageRef::as_str).collect();
    println!("Tray ({}): {}", tray.len(), tray.join(", "));
    Ok(())
}

fn list_templates(config: &CollageConfig) -> Result<(), SessionError> {
    let catalog = TemplateCatalog::from_config(config)?;
    for template in catalog.iter() {
        println!(
            "{:<14} {} slots  {}x{}",
            template.name,
            template.slot_count(),
            template.rows,
            template.columns
        );
    }
    Ok(())
}

fn check_config(path: &Path) -> Result<(), SessionError> {
    println!("Checking config: {}", path.display());
    let config = CollageConfig::load(path)?;
    let catalog = TemplateCatalog::from_config(&config)?;
    println!("Config valid!");
    println!("  Grid: {}", config.grid_dims());
    println!("  History depth: {}", config.history.max_depth);
    println!("  Templates: {}", catalog.len());
    Ok(())
}
