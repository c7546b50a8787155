use clap::Parser;
use cnpj_scan_app::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cnpj_scan_app::run(cli)
}
