use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use tracing_subscriber::EnvFilter;

use percolation::{arange, Parameters, Percolation, PercolationError, PercolationResults};

const PARAMETERS: [&'static str; 6] = [
    "side_lengths",
    "p_start",
    "p_stop",
    "p_step",
    "n_step",
    "outputfile",
];

#[derive(Parser, Debug)]
#[command(about = "Sweep the largest-cluster fraction of square-lattice percolation over p")]
struct Args
{
    /// Parameter file with `name: value` lines
    parameters: PathBuf,
    /// Base seed; makes the whole sweep reproducible
    #[arg(long)]
    seed: Option<u64>,
    /// Write logs to this file instead of stderr
    #[arg(short, long)]
    log: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
}

fn install_tracing(args: &Args) -> std::io::Result<()>
{
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter        = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match &args.log
    {
        Some(log) =>
        {
            let log_file = File::create(log)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(log_file)
                .init();
        }
        None =>
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn point_seed(seed: u64, side: usize, point: usize) -> u64
{
    seed ^ ((side as u64) << 32) ^ (point as u64)
}

fn perform_percolation_monte_carlo(side: usize, probabilities: &[f64], n_step: usize, seed: Option<u64>) -> Result<Vec<PercolationResults<f64>>, PercolationError>
{
    probabilities
        .par_iter()
        .enumerate()
        .map(|(point, &p)|
        {
            let mut model = match seed
            {
                Some(seed) => Percolation::with_seed(side, p, point_seed(seed, side, point))?,
                None       => Percolation::new(side, p)?,
            };
            let samples = model.monte_carlo(n_step);
            PercolationResults::from_samples(&samples)
        })
        .collect()
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>>
{
    let params = Parameters::read(&args.parameters, &PARAMETERS)?;

    let side_lengths: Vec<usize> = params.get_list("side_lengths")?;
    let p_start: f64             = params.get("p_start")?;
    let p_stop: f64              = params.get("p_stop")?;
    let p_step: f64              = params.get("p_step")?;
    let n_step: usize            = params.get("n_step")?;
    let outputfile: String       = params.get("outputfile")?;

    if n_step == 0
    {
        return Err(PercolationError::InvalidArgument(String::from("n_step must be positive")).into());
    }
    if side_lengths.is_empty()
    {
        return Err(PercolationError::InvalidArgument(String::from("side_lengths must not be empty")).into());
    }
    let probabilities = arange(p_start, p_stop, p_step)?;
    if let Some(p) = probabilities.iter().find(|p| !(0.0..=1.0).contains(*p))
    {
        return Err(PercolationError::InvalidArgument(format!("p must be in [0, 1], got {p}")).into());
    }

    tracing::info!(
        sides = ?side_lengths,
        n_points = probabilities.len(),
        p_start,
        p_stop,
        n_step,
        seed = ?args.seed,
        "launching percolation sweep"
    );

    let time = std::time::Instant::now();
    let mut sweeps = Vec::with_capacity(side_lengths.len());
    for &side in &side_lengths
    {
        let side_time = std::time::Instant::now();
        let results   = perform_percolation_monte_carlo(side, &probabilities, n_step, args.seed)?;
        tracing::info!(side, elapsed_ms = side_time.elapsed().as_millis() as u64, "lattice size done");
        sweeps.push((side, results));
    }
    let elapsed_time = time.elapsed();
    tracing::info!(elapsed_s = elapsed_time.as_secs_f64(), "sweep finished");

    for (count, (side, results)) in sweeps.iter().enumerate()
    {
        if count == 0
        {
            PercolationResults::write_to_file(&outputfile, *side, &probabilities, results, elapsed_time)?;
        }
        else
        {
            PercolationResults::append_to_file(&outputfile, *side, &probabilities, results)?;
        }
    }
    tracing::info!(outputfile = %outputfile, "results saved");
    Ok(())
}

fn main()
{
    let args = Args::parse();
    if let Err(err) = install_tracing(&args)
    {
        eprintln!("Could not open log file: {err}");
        std::process::exit(1);
    }

    if let Err(err) = run(&args)
    {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}
