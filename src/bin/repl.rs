use dice_notation::{RollContext, Roller};
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use std::io::{self, BufRead, Write};

const USAGE: &str = "usage: repl [--seed <u64>] [--max-rolls <n>]";

struct Options {
    seed: Option<u64>,
    max_rolls: Option<usize>,
}

impl Options {
    fn from_args() -> Result<Self, String> {
        let mut options = Self {
            seed: None,
            max_rolls: Some(1000),
        };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            let value = args.next().ok_or_else(|| format!("missing value for {}", arg))?;
            match arg.as_str() {
                "--seed" => {
                    options.seed = Some(value.parse().map_err(|e| format!("bad seed: {}", e))?)
                }
                "--max-rolls" => {
                    let max: usize = value.parse().map_err(|e| format!("bad limit: {}", e))?;
                    options.max_rolls = (max > 0).then(|| max);
                }
                _ => return Err(format!("unknown argument {}", arg)),
            }
        }
        Ok(options)
    }
}

fn run<R: Roller>(ctx: &mut RollContext<R>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print!("> ");
    io::stdout().flush()?;
    while let Some(line) = lines.next().transpose()? {
        let notation = line.trim();
        if !notation.is_empty() {
            ctx.reset();
            match dice_notation::roll_in(notation, ctx) {
                Ok(r) => println!("{}", r),
                Err(why) => eprintln!("Error: {}", why),
            }
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let options = Options::from_args().map_err(|why| format!("{}\n{}", why, USAGE))?;
    info!(
        "starting repl (seed: {:?}, max rolls: {:?})",
        options.seed, options.max_rolls
    );
    match options.seed {
        Some(seed) => run(&mut RollContext::new(
            options.max_rolls,
            StdRng::seed_from_u64(seed),
        ))?,
        None => run(&mut RollContext::new(options.max_rolls, rand::thread_rng()))?,
    }
    Ok(())
}
