use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use BreakoutRooms::algorithms::{RoomSearch, SearchOutcome};
use BreakoutRooms::gen_instance::{gen_random_instance, InstanceParams};
use BreakoutRooms::io::{read_input_file, write_input_file, write_output_file};
use BreakoutRooms::Partition;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assign students to breakout rooms
    Solve {
        /// Path of an .in file, or of a directory of .in files
        input: PathBuf,

        /// Path of the .out file, or of the output directory when solving a directory
        output: PathBuf,

        /// Smallest target room count to try
        #[arg(long, default_value_t = 1)]
        min_rooms: usize,

        /// Largest target room count to try (defaults to the number of students)
        #[arg(long)]
        max_rooms: Option<usize>,
    },

    /// Write a random complete-graph instance
    Generate {
        /// Number of students
        num_of_vertices: usize,

        /// Filename where the instance should be stored
        output: PathBuf,

        /// Seed for the random generator
        #[arg(short, long)]
        seed: Option<u64>,

        /// Upper bound (exclusive) for happiness, stress and the stress budget
        #[arg(short, long, default_value_t = 100.0)]
        max_weight: f64,
    },
}

fn solve_file(input: &Path, output: &Path, mut search: RoomSearch) -> Result<SearchOutcome, Box<dyn std::error::Error>> {
    let (graph, stress_budget) = read_input_file(input)?;
    let mut rooms = vec![None; graph.len()];
    let start = Instant::now();
    let outcome = search.partition(&mut rooms, (&graph, stress_budget))?;
    let elapsed_time = start.elapsed();

    let rooms: Vec<usize> = rooms.into_iter().flatten().collect();
    write_output_file(&rooms, output)?;
    info!(input = %input.display(), ?outcome, ?elapsed_time, "solved");
    Ok(outcome)
}

fn solve_directory(input_dir: &Path, output_dir: &Path, search: RoomSearch) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;

    let mut inputs = Vec::new();
    for entry in WalkDir::new(input_dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "in") {
            inputs.push(entry.into_path());
        }
    }

    let mut solved = 0;
    let mut defaulted = 0;
    for input in &inputs {
        let Some(stem) = input.file_stem() else { continue };
        let output = output_dir.join(stem).with_extension("out");
        let outcome = solve_file(input, &output, search)?;
        if outcome.is_fallback() {
            defaulted += 1;
            println!("Was not able to solve {}", input.display());
        } else {
            solved += 1;
            println!("Successfully solved {}", input.display());
        }
    }

    println!("TOTAL: SOLVED {}/{} OF THE INPUTS", solved, inputs.len());
    println!("TOTAL: DEFAULTED {}/{} OF THE INPUTS", defaulted, inputs.len());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match args.command {
        Command::Solve { input, output, min_rooms, max_rooms } => {
            let search = RoomSearch { min_rooms, max_rooms };
            if input.is_dir() {
                solve_directory(&input, &output, search)?;
            } else {
                let outcome = solve_file(&input, &output, search)?;
                println!("Total happiness {:?}", outcome.happiness);
                println!("Number of rooms {:?}", outcome.room_count);
            }
        }
        Command::Generate { num_of_vertices, output, seed, max_weight } => {
            let (graph, stress_budget) = gen_random_instance(num_of_vertices, &InstanceParams { seed, max_weight })?;
            write_input_file(&graph, stress_budget, &output)?;
            println!("Wrote {} students to {}", graph.len(), output.display());
        }
    }
    Ok(())
}
