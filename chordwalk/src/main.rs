// Chordwalk — CLI entry point.
//
// Trains a Markov transition graph on the given MIDI files (or seeds it with
// synthetic random material when none are given), walks the graph from a
// starting state, and writes the generated sequence to a MIDI file.
//
// Usage:
//   chordwalk [INPUT.mid ...] --start "C4 E4 G4" [--count N] [--output PATH]
//     [--seed N]
//
// The starting state is a space-separated list of note names and must be a
// known vertex of the trained graph. Any failure — unreadable input, unknown
// starting state, or a dead-end mid-walk — aborts the run; there is no
// partial output.

use chordwalk::error::Result;
use chordwalk::graph::{State, TransitionGraph};
use chordwalk::midi::{read_midi_file, write_midi_file};
use chordwalk::note::NoteCodec;
use chordwalk::sequence::sequence;
use chordwalk_prng::WalkRng;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Flags that consume the following argument as their value.
const VALUED_FLAGS: &[&str] = &["--start", "--count", "--output", "--seed"];

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let start: Option<String> = parse_flag(&args, "--start");
    let count: usize = parse_flag(&args, "--count").unwrap_or(32);
    let output: String = parse_flag(&args, "--output").unwrap_or_else(|| "output.mid".to_string());
    let seed: Option<u64> = parse_flag(&args, "--seed");
    let inputs = positional_args(&args);

    let Some(start) = start else {
        eprintln!(
            "Usage: chordwalk [INPUT.mid ...] --start \"C4 E4 G4\" [--count N] \
             [--output PATH] [--seed N]"
        );
        std::process::exit(2);
    };
    let start_state = State::new(start.split_whitespace().map(str::to_owned).collect());

    if let Err(e) = run(&inputs, &start_state, count, &output, seed) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(
    inputs: &[String],
    start: &State,
    count: usize,
    output: &str,
    seed: Option<u64>,
) -> Result<()> {
    let codec = NoteCodec::new();
    let mut graph = TransitionGraph::new();

    // Synthetic seeding needs a non-zero seed; derive one in [1, 500) from
    // the clock when none was given (--seed 0 counts as unset).
    let seed = match seed {
        Some(s) if s != 0 => s,
        _ => clock_seed() % 499 + 1,
    };
    let mut rng = WalkRng::new(seed);

    if inputs.is_empty() {
        println!("[1/4] No input files; seeding synthetic graph (seed {seed})...");
        graph.seed_random(&codec, &mut rng)?;
    } else {
        println!("[1/4] Training on {} file(s)...", inputs.len());
        for input in inputs {
            let states = read_midi_file(Path::new(input), &codec)?;
            println!("  {}: {} states.", input, states.len());
            graph.train(&states);
        }
    }
    println!(
        "  Graph: {} states, {} transitions.",
        graph.vertex_count(),
        graph.edge_count()
    );

    println!("[2/4] Generating {count} states from \"{start}\"...");
    let generated = graph.walk(start, count, &mut rng)?;

    println!("[3/4] Sequencing...");
    let events = sequence(&generated, &codec, &mut rng)?;
    println!("  {} events.", events.len());

    println!("[4/4] Writing {output}...");
    write_midi_file(Path::new(output), &events)?;
    println!("Done.");

    Ok(())
}

/// A throwaway seed from the wall clock, for runs without --seed.
fn clock_seed() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_nanos() as u64,
        Err(_) => 0x5eed,
    }
}

fn positional_args(args: &[String]) -> Vec<String> {
    let mut positional = Vec::new();
    let mut i = 1;
    while i < args.len() {
        if VALUED_FLAGS.contains(&args[i].as_str()) {
            i += 2;
        } else {
            positional.push(args[i].clone());
            i += 1;
        }
    }
    positional
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
