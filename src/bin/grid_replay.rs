//! Replay a scripted input session against a grid and print its final state.
//!
//! Usage:
//!   grid_replay <script.json>   # Read the script from a file
//!   grid_replay -               # Read the script from stdin
//!
//! A script looks like:
//!
//! ```json
//! {
//!   "settings": { "freeze": [1, 0] },
//!   "events": [
//!     { "type": "down", "x": 120, "y": 40 },
//!     { "type": "move", "x": 260, "y": 90 },
//!     { "type": "up" },
//!     { "type": "key", "key": "ArrowDown", "shift": true }
//!   ]
//! }
//! ```
//!
//! Set `RUST_LOG=gridview=debug` to trace gestures as they replay.

#![allow(clippy::exit)]

use std::fs;
use std::io::{self, Read};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use gridview::layout::Axis;
use gridview::viewer::{GestureToken, Key, Modifiers, PointerButton};
use gridview::{GridObserver, GridSettings, GridView, MemoryCellStore, ObjectSpec};

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    settings: GridSettings,
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum Event {
    Down {
        x: f32,
        y: f32,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        button: i16,
        #[serde(default = "one")]
        clicks: u32,
    },
    Move {
        x: f32,
        y: f32,
    },
    Up {
        #[serde(default)]
        x: Option<f32>,
        #[serde(default)]
        y: Option<f32>,
    },
    Cancel,
    Wheel {
        #[serde(default)]
        dx: f32,
        #[serde(default)]
        dy: f32,
    },
    Key {
        key: String,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        ctrl: bool,
    },
    Type {
        text: String,
    },
    Select {
        row: u32,
        col: u32,
    },
    Freeze {
        rows: u32,
        cols: u32,
    },
    Resize {
        axis: Axis,
        index: u32,
        size: f32,
    },
    Insert {
        object: ObjectSpec,
    },
    Drop {
        x: f32,
        y: f32,
        payload: String,
    },
}

fn one() -> u32 {
    1
}

/// Counts what the grid asked the host to do.
#[derive(Debug, Default, Serialize)]
struct Tally {
    renders: u32,
    notifications: u32,
}

impl GridObserver for Tally {
    fn render(&mut self) {
        self.renders += 1;
    }

    fn cell_selected(&mut self, _row: u32, _col: u32) {
        self.notifications += 1;
    }

    fn range_selected(&mut self, _range: &gridview::CellRange) {
        self.notifications += 1;
    }
}

fn read_script(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

fn replay(grid: &mut GridView<MemoryCellStore, Tally>, events: Vec<Event>) {
    let mut token: Option<GestureToken> = None;
    for (step, event) in events.into_iter().enumerate() {
        tracing::debug!(step, ?event, "replay");
        match event {
            Event::Down {
                x,
                y,
                shift,
                button,
                clicks,
            } => {
                let mods = Modifiers {
                    shift,
                    ..Modifiers::NONE
                };
                match grid.on_pointer_down(x, y, PointerButton::from_dom(button), mods, clicks) {
                    Ok(t) => token = t,
                    Err(err) => tracing::warn!(step, %err, "pointer down rejected"),
                }
            }
            Event::Move { x, y } => {
                if let Some(t) = token {
                    if let Err(err) = grid.on_pointer_move(t, x, y) {
                        tracing::warn!(step, %err, "pointer move rejected");
                    }
                }
            }
            Event::Up { x, y } => {
                if let Some(t) = token.take() {
                    let at = x.zip(y);
                    if let Err(err) = grid.on_pointer_up(t, at) {
                        tracing::warn!(step, %err, "pointer up rejected");
                    }
                }
            }
            Event::Cancel => {
                token = None;
                grid.cancel_gesture();
            }
            Event::Wheel { dx, dy } => {
                grid.on_wheel(dx, dy);
            }
            Event::Key { key, shift, ctrl } => match Key::from_dom(&key) {
                Some(key) => {
                    let mods = Modifiers {
                        shift,
                        ctrl,
                        alt: false,
                    };
                    grid.on_key_down(key, mods);
                }
                None => tracing::warn!(step, key, "unknown key"),
            },
            Event::Type { text } => grid.edit_input(&text),
            Event::Select { row, col } => grid.select(row, col),
            Event::Freeze { rows, cols } => grid.freeze(rows, cols),
            Event::Resize { axis, index, size } => {
                grid.set_track_size(axis, index, size);
            }
            Event::Insert { object } => {
                grid.insert_floating_object(object);
            }
            Event::Drop { x, y, payload } => {
                grid.on_drop(x, y, &payload);
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: grid_replay <script.json | ->");
        std::process::exit(1);
    };

    let text = match read_script(&path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    };

    let script: Script = match serde_json::from_str(&text) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error parsing script: {e}");
            std::process::exit(1);
        }
    };

    let mut grid = GridView::new(script.settings, MemoryCellStore::new(), Tally::default());
    replay(&mut grid, script.events);

    let output = serde_json::json!({
        "state": grid.snapshot(),
        "observer": grid.observer(),
    });
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing JSON: {e}");
            std::process::exit(1);
        }
    }
}
