#![allow(unexpected_cfgs)]
#![cfg(not(tarpaulin_include))]
use argh::FromArgs;
use std::error::Error;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod util;

#[derive(FromArgs, Debug)]
/// Query GPU surface layouts and addresses
struct TopLevel {
    /// number of pipes of the chip (default: 16)
    #[argh(option, default = "16")]
    pipes: u32,

    /// pipe interleave in bytes (default: 256)
    #[argh(option, default = "256")]
    pipe_interleave: u32,

    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Info(commands::info::InfoCmd),
    Addr(commands::addr::AddrCmd),
    Coord(commands::coord::CoordCmd),
    Modes(commands::modes::ModesCmd),
    Equation(commands::equation::EquationCmd),
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli: TopLevel = argh::from_env();
    let lib = util::create_lib(cli.pipes, cli.pipe_interleave)?;

    match cli.command {
        Commands::Info(cmd) => commands::info::handle_info_command(&lib, cmd)?,
        Commands::Addr(cmd) => commands::addr::handle_addr_command(&lib, cmd)?,
        Commands::Coord(cmd) => commands::coord::handle_coord_command(&lib, cmd)?,
        Commands::Modes(cmd) => commands::modes::handle_modes_command(&lib, cmd)?,
        Commands::Equation(cmd) => commands::equation::handle_equation_command(&lib, cmd)?,
    }

    Ok(())
}
