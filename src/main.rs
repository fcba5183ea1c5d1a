use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    cli::Cli::parse().run()
}
