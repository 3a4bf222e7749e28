use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64;

use jobshop_lib::io::{json, problem, size_category};
use jobshop_lib::random_generators::jobshop::UniformJobShop;
use jobshop_lib::random_generators::numbers::{Rng, TaillardLCG};

#[derive(Parser, Debug)]
#[command(about = "Generate random job-shop problem files.")]
struct Args {
    /// Number of jobs per instance.
    jobs: u32,

    /// Number of machines (and operations per job) per instance.
    machines: u32,

    /// How many instances to generate.
    #[arg(default_value_t = 1)]
    count: u32,

    /// Seed for the batch; individual instance seeds are derived from it.
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Also cache each generated instance as JSON and reuse an existing
    /// cache file instead of regenerating.
    #[arg(short, long, default_value_t = false)]
    cache: bool,
}

fn main() {
    simple_logger::init_with_level(log::Level::Info).unwrap();

    let args = Args::parse();
    if let Err(why) = run(args) {
        log::error!("{why}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let category = size_category(args.jobs, args.machines);
    let directory = PathBuf::from(UniformJobShop::path()).join(category);

    let mut seeds = Pcg64::seed_from_u64(args.seed);
    for _ in 0..args.count {
        // the Taillard generator wants a positive 31-bit seed
        let seed = (seeds.next_u64() % (i32::MAX as u64 - 1) + 1) as usize;
        let mut rng = TaillardLCG::from_seed(seed);
        let mut generator = UniformJobShop {
            rng: &mut rng,
            jobs: args.jobs,
            machines: args.machines,
        };

        let stem = generator.file_name();
        let instance = if args.cache {
            let cache_path = directory.join(format!("{stem}.json"));
            match json::read_json_from_file(&cache_path) {
                Ok(instance) => {
                    log::info!("Reusing cached instance {}", cache_path.display());
                    instance
                }
                Err(why) => {
                    log::info!("No usable cache ({why}), generating");
                    let instance = generator.generate();
                    json::write_json_to_file(&cache_path, &instance)?;
                    instance
                }
            }
        } else {
            generator.generate()
        };

        let file_path = directory.join(format!("{stem}.jss"));
        problem::write_problem(&file_path, &instance)?;
        log::info!("Wrote {}", file_path.display());
    }

    Ok(())
}
