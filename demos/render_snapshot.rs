//! Renders a model to an image without opening a window.
//!
//! Usage: `cargo run --example render_snapshot -- <model-file> <output.png> [width] [height]`

use orbitview::{load_model, render_to_file, OrbitviewError, Result, ViewerOptions};

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (Some(input), Some(output)) = (args.first(), args.get(1)) else {
        eprintln!("usage: render_snapshot <model-file> <output.png> [width] [height]");
        std::process::exit(2);
    };
    let width = args.get(2).and_then(|w| w.parse().ok()).unwrap_or(1024);
    let height = args.get(3).and_then(|h| h.parse().ok()).unwrap_or(768);

    let mut options = ViewerOptions::default();
    // Snapshots get an opaque background so JPEG output looks right.
    options.renderer.transparent_background = output.ends_with(".png");

    let model = load_model(input).map_err(|e| OrbitviewError::LoadError(e.to_string()))?;
    render_to_file(&options, model, output, width, height)?;
    println!("wrote {output} ({width}x{height})");
    Ok(())
}
