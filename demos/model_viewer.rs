//! Opens a model in the viewer window.
//!
//! Usage: `cargo run --example model_viewer -- [model-file] [options.json]`
//!
//! Without arguments, `models/final1.glb` is shown with default options.

use std::path::Path;

use orbitview::{show, Result, ViewerOptions};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let model = args.next();
    let config = args.next();

    let mut options = match config {
        Some(path) => ViewerOptions::from_json_file(path)?,
        None => ViewerOptions::default(),
    };

    if let Some(model) = model {
        let path = Path::new(&model);
        options.model.directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        options.model.file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| model.clone());
    }

    show(options)
}
