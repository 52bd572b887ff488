use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};
use mazegen::{
    app::{App, Canvas},
    generators::Generator,
    logging,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    DepthFirst,
    Prims,
    BinaryTree,
    HuntAndKill,
    Sidewinder,
    Ellers,
}

impl From<Algorithm> for Generator {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::DepthFirst => Generator::DepthFirst,
            Algorithm::Prims => Generator::Prims,
            Algorithm::BinaryTree => Generator::BinaryTree,
            Algorithm::HuntAndKill => Generator::HuntAndKill,
            Algorithm::Sidewinder => Generator::Sidewinder,
            Algorithm::Ellers => Generator::Ellers,
        }
    }
}

/// Generate a perfect maze in the terminal and trace its solution path.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Number of cell rows
    #[arg(
        short,
        long,
        default_value_t = 20,
        value_parser = clap::value_parser!(u16).range(1..=Canvas::MAX_DIMENSION as i64)
    )]
    rows: u16,

    /// Number of cell columns
    #[arg(
        short,
        long,
        default_value_t = 20,
        value_parser = clap::value_parser!(u16).range(1..=Canvas::MAX_DIMENSION as i64)
    )]
    cols: u16,

    /// Generation algorithm
    #[arg(short, long, value_enum, default_value_t = Algorithm::DepthFirst)]
    algorithm: Algorithm,

    /// Seed for a reproducible maze; random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pause after each drawn event, in milliseconds
    #[arg(long, default_value_t = 10)]
    delay_ms: u64,

    /// Print the finished maze instead of animating it
    #[arg(long)]
    no_animate: bool,

    /// Where to write the debug log
    #[arg(long, default_value = "mazegen.log")]
    log_file: PathBuf,
}

fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init_file_logging(&cli.log_file);
    tracing::info!("[main] starting with {:?}", cli);

    let app = App::new(Duration::from_millis(cli.delay_ms));
    let generator = Generator::from(cli.algorithm);

    if cli.no_animate {
        return app.print_static(
            &mut std::io::stdout(),
            cli.rows,
            cli.cols,
            generator,
            cli.seed,
        );
    }

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = app.run(&mut stdout, cli.rows, cli.cols, generator, cli.seed);
    App::restore_terminal(&mut stdout)?;
    result
}
