use std::{fs::File, io::BufWriter};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use refract::{EngineConfig, Surfaces};
use refract_json::{serde_json, JsonSer, Scene};
use refract_random::{
    gen_random,
    rand::{self, rngs::StdRng, SeedableRng},
    random_seeds, Random,
};

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;

/// Only the parts of the scene `args` leaves open draw from `rng`.
fn generate_random_scene(args: &Args, rng: &mut (impl rand::Rng + ?Sized)) -> Scene {
    let surfaces = match args.surfaces {
        Some(n) => gen_random(n, rng).into(),
        None => Surfaces::random(rng),
    };

    let seeds = match args.rays {
        Some(n) => gen_random(n, rng),
        None => random_seeds(rng),
    };

    Scene {
        config: EngineConfig::default().with_activation_cap(args.activation_cap),
        surfaces,
        seeds,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let scene = generate_random_scene(&args, &mut rng);

    info!(
        "writing {} surface(s) and {} ray(s) to {}",
        scene.surfaces.len(),
        scene.seeds.len(),
        args.path
    );

    let file = File::create(&args.path).with_context(|| format!("failed to create {}", args.path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &scene.to_json())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use refract::Ray;
    use refract_random::random_simulation;

    #[test]
    fn test_counts_override_random_ones() {
        let args = Args::parse_from(["gen_rand_sim", "out.json", "--surfaces", "5", "--rays", "2"]);
        let scene = generate_random_scene(&args, &mut StdRng::seed_from_u64(1));

        assert_eq!(scene.surfaces.len(), 5);
        assert_eq!(scene.seeds.len(), 2);
        assert_eq!(scene.config.activation_cap, EngineConfig::DEFAULT_ACTIVATION_CAP);

        // nothing is drawn for a scene that's thrown away
        let mut rng = StdRng::seed_from_u64(1);
        let surfaces: Surfaces = gen_random(5, &mut rng).into();
        let seeds: Vec<Ray> = gen_random(2, &mut rng);

        assert_eq!(scene.surfaces, surfaces);
        assert_eq!(scene.seeds, seeds);
    }

    #[test]
    fn test_unconstrained_scene_is_a_random_simulation() {
        let args = Args::parse_from(["gen_rand_sim", "out.json", "--debug-level", "warn"]);
        let scene = generate_random_scene(&args, &mut StdRng::seed_from_u64(9));

        let (surfaces, seeds) = random_simulation(&mut StdRng::seed_from_u64(9));

        assert_eq!(scene.surfaces, surfaces);
        assert_eq!(scene.seeds, seeds);
        assert!(matches!(args.debug_level, cli::LogLevel::Warn));
    }
}
