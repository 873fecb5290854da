//! CLI tool for sheetview - applies a patch batch and dumps one frame as JSON
//!
//! Usage:
//!   sheetview_cli <patches.json>                       # Frame JSON to stdout
//!   sheetview_cli <patches.json> -w 800 -h 600         # Canvas size in CSS px
//!   sheetview_cli <patches.json> -x 0 -y 400           # Scroll offset
//!   sheetview_cli <patches.json> -s settings.json      # Viewer settings
//!   sheetview_cli <patches.json> -o frame.json         # Write to file

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use serde::Serialize;
use sheetview::layout::ViewRange;
use sheetview::render::DrawOp;
use sheetview::types::CellRange;
use sheetview::{Settings, SheetView};

const USAGE: &str = "Usage: sheetview_cli <patches.json> [-w W] [-h H] [-x X] [-y Y] [-s settings.json] [-o output.json]";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Frame<'a> {
    width: f64,
    height: f64,
    scroll_x: f64,
    scroll_y: f64,
    visible_cells: Vec<CellRange>,
    view_range: &'a ViewRange,
    ops: &'a [DrawOp],
}

fn fail(msg: &str) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

fn number(flag: &str, value: Option<&String>) -> f64 {
    match value.map(|v| v.parse::<f64>()) {
        Some(Ok(n)) if n.is_finite() => n,
        _ => fail(&format!("{flag} expects a number\n{USAGE}")),
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        fail(USAGE);
    }

    let input_path = &args[1];
    let (mut width, mut height) = (800.0, 600.0);
    let (mut scroll_x, mut scroll_y) = (0.0, 0.0);
    let mut settings_path = None;
    let mut output_path = None;

    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        match flag.as_str() {
            "-w" => width = number(flag, rest.next()),
            "-h" => height = number(flag, rest.next()),
            "-x" => scroll_x = number(flag, rest.next()),
            "-y" => scroll_y = number(flag, rest.next()),
            "-s" => settings_path = rest.next(),
            "-o" => output_path = rest.next(),
            other => fail(&format!("Unknown option {other}\n{USAGE}")),
        }
    }

    let settings = match settings_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .unwrap_or_else(|e| fail(&format!("Error reading {path}: {e}")));
            Settings::from_json(&text).unwrap_or_else(|e| fail(&format!("Bad settings: {e}")))
        }
        None => Settings::default(),
    };

    // Read and apply patches
    let patches = fs::read_to_string(input_path)
        .unwrap_or_else(|e| fail(&format!("Error reading {input_path}: {e}")));
    let mut view = SheetView::new_test(width, height, settings);
    if let Err(e) = view.apply_patches_json(&patches) {
        fail(&format!("Error applying patches: {e}"));
    }
    view.session_mut().scroll_to(scroll_x, scroll_y);

    // Paint one frame
    let range = view
        .render()
        .unwrap_or_else(|e| fail(&format!("Error rendering: {e}")));
    let scroll = view.session().scroll_pos();
    let frame = Frame {
        width,
        height,
        scroll_x: scroll.x,
        scroll_y: scroll.y,
        visible_cells: range.cells.iter().map(|c| c.coordinate).collect(),
        view_range: &range,
        ops: view.canvas().ops(),
    };

    let json = match serde_json::to_string_pretty(&frame) {
        Ok(j) => j,
        Err(e) => fail(&format!("Error serializing JSON: {e}")),
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                fail(&format!("Error writing {path}: {e}"));
            }
            eprintln!("Written: {path}");
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
