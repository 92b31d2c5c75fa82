use anyhow::Result;
use clap::Parser;
use costpick::{MAXMEM_DEFAULT, MAXMEMFRAC_DEFAULT, ParamRequest, Picker};

#[derive(Debug, Parser)]
#[command(name = "costpick")]
#[command(
    version,
    about = "Picks scrypt cost parameters (N, r, p) under memory and time budgets."
)]
struct Cli {
    /// Maximum time in seconds a scrypt call at the picked parameters may take
    #[arg(long, value_name = "SECONDS", env = "COSTPICK_MAXTIME")]
    maxtime: f64,

    /// Maximum fraction of system memory to plan around (default: 0.5)
    #[arg(long, value_name = "FRACTION")]
    maxmemfrac: Option<f64>,

    /// Maximum memory in bytes, 0 means no explicit cap (default: 0)
    #[arg(long, value_name = "BYTES")]
    maxmem: Option<u64>,

    /// Print the result as a JSON object
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let req = ParamRequest::new(
        cli.maxtime,
        cli.maxmemfrac.unwrap_or(MAXMEMFRAC_DEFAULT),
        cli.maxmem.unwrap_or(MAXMEM_DEFAULT),
    )?;

    let picker = Picker::new();
    let params = picker.params_sync(&req)?;

    if cli.json {
        println!("{}", serde_json::to_string(&params)?);
    } else {
        println!("N = {}", params.n());
        println!("r = {}", params.r());
        println!("p = {}", params.p());
    }

    Ok(())
}
