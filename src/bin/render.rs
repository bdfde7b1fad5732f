// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! The `render` binary evaluates a serialized [Project] headlessly and
//! writes one JSON line per frame: everything a renderer (or a test harness)
//! needs, without a window or a transport.

use clap::Parser;
use luminare::prelude::*;
use std::io::BufReader;

#[derive(Parser, Debug)]
#[clap(author, about, long_about = None)]
struct Args {
    /// JSON-format project file to render.
    input: String,

    /// Number of frames to emit.
    #[clap(short, long, default_value_t = 240)]
    frames: usize,

    /// Frames per second of the simulated transport.
    #[clap(long, default_value_t = 60.0)]
    fps: f64,

    /// Print version and exit.
    #[clap(short = 'v', long)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.version {
        println!("luminare-render {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if args.fps <= 0.0 {
        anyhow::bail!("--fps must be positive");
    }

    let file = std::fs::File::open(&args.input)?;
    let project: Project = serde_json::from_reader(BufReader::new(file))?;
    eprintln!(
        "Read \"{}\" ({} tracks) from {}",
        project.title,
        project.tracks.len(),
        args.input
    );

    let factory = register_builtin_entities(EntityFactory::default());
    let mut tracks = project.instantiate(&factory)?;

    for frame in 0..args.frames {
        let time = Seconds(frame as f64 / args.fps).to_beats(project.tempo);
        let mut rendered = Vec::with_capacity(tracks.len());
        for realized in &mut tracks {
            let name = realized.track.name().to_string();
            match realized.track.render(time, &realized.blocks, project.tempo) {
                Ok(objects) => rendered.push(serde_json::json!({
                    "track": name,
                    "objects": objects,
                })),
                // A failing track shouldn't kill the export; report and
                // keep rendering its siblings.
                Err(e) => rendered.push(serde_json::json!({
                    "track": name,
                    "error": e.to_string(),
                })),
            }
        }
        let line = serde_json::to_string(&serde_json::json!({
            "frame": frame,
            "time": time.0,
            "tracks": rendered,
        }))?;
        println!("{line}");
    }
    Ok(())
}
