use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::info;
use refract::{Emitter, Trace};
use refract_json::{serde_json, JsonDes, JsonSer, Scene};

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;

/// Runs `frames` passes over `scene`, turning every seed by `rotate` angle
/// steps between two passes, and returns the last pass' trace.
fn run_frames(scene: &mut Scene, frames: usize, rotate: i32) -> Trace {
    let mut emitters: Vec<_> = scene
        .seeds
        .iter()
        .map(|seed| (Emitter::aimed_like(seed), seed.energy))
        .collect();

    let mut trace = Trace::default();

    for frame in 0..frames {
        if frame > 0 {
            emitters.iter_mut().for_each(|(e, _)| e.rotate(rotate));
            scene.seeds = emitters
                .iter()
                .map(|(e, energy)| e.seed().with_energy(*energy))
                .collect();
        }

        trace = scene.propagate();

        info!(
            "frame {frame}: {} ray(s), {} hit(s), {:.4} energy escaped",
            trace.rays.len(),
            trace.stats.hits,
            trace.escaped_energy(),
        );
    }

    trace
}

/// The line list of `trace` and of `scene`'s surfaces.
fn segments_json(scene: &Scene, trace: &Trace) -> serde_json::Value {
    serde_json::json!({
        "rays": Vec::from_iter(trace.segments(&scene.config).map(|s| s.to_json())),
        "surfaces": Vec::from_iter(scene.surfaces.segments().map(|s| s.to_json())),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    ensure!(args.frames > 0, "at least one frame must be run");

    let json: serde_json::Value = serde_json::from_reader(BufReader::new(
        File::open(&args.path).with_context(|| format!("failed to open {}", args.path))?,
    ))?;

    let mut scene = Scene::from_json(&json).with_context(|| format!("invalid scene in {}", args.path))?;
    args.apply(&mut scene.config);

    let trace = run_frames(&mut scene, args.frames, args.rotate);

    let output = if args.segments {
        segments_json(&scene, &trace)
    } else {
        trace.to_json()
    };

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    serde_json::to_writer_pretty(&mut writer, &output)?;
    writeln!(writer)?;

    Ok(())
}
