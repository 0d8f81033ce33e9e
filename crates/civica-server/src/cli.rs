use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "civica-server", about = "Civic-transparency poll platform API")]
pub struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "civica.toml")]
    pub config: String,
}
