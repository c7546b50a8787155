pub mod app;
pub mod config;
pub mod effects;
pub mod logging;
pub mod persistence;
pub mod picker;
pub mod ui;

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use cnpj_scan_core::cnpj::{strip_formatting, validate_form, Cnpj, CnpjRegistry};
use cnpj_scan_engine::{estimate_directory, SqliteRegistry};
use scan_logging::scan_info;

use crate::cli::{Cli, Commands};
use app::WizardOptions;
use ui::render::format_with_commas;

pub fn run(cli: Cli) -> Result<()> {
    logging::initialize(cli.log);

    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let config = config::load(&cwd, cli.server)?;
    scan_info!("Using analysis server {}", config.client.base_url);

    match cli.command {
        Commands::Analyze { dir, download } => {
            let directory = choose_directory(dir, &cwd)?;
            app::run_wizard(
                &config,
                WizardOptions {
                    directory,
                    download_dir: download,
                    state_dir: cwd,
                },
            )
        }
        Commands::PreAnalyze { dir } => {
            let directory = choose_directory(dir, &cwd)?;
            app::run_pre_analysis(&config, &directory)
        }
        Commands::Estimate { dir } => {
            let estimate = estimate_directory(&dir)?;
            println!("Files:          {}", format_with_commas(estimate.files));
            println!("Lines of code:  {}", format_with_commas(estimate.lines));
            println!("Methods:        {}", format_with_commas(estimate.methods));
            Ok(())
        }
        Commands::Validate { cnpj, matriz } => {
            let cnpj = strip_formatting(&cnpj);
            let matriz = matriz.map(|m| strip_formatting(&m));
            let checked = validate_form(&cnpj, matriz.as_deref())?;
            println!("CNPJ:                {}", checked.cnpj.formatted());
            println!("Form check digits:   {}", verdict(checked.placeholder_ok));
            println!("Mod-11 check digits: {}", verdict(checked.mod11_ok));
            Ok(())
        }
        Commands::Lookup { db, cnpj } => lookup(&db, &cnpj),
    }
}

fn choose_directory(dir: Option<String>, state_dir: &Path) -> Result<String> {
    if let Some(dir) = dir {
        return Ok(dir);
    }
    let default = persistence::load_last_directory(state_dir);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let answer = picker::prompt_directory(&mut stdin.lock(), &mut stdout, default.as_deref())?;
    stdout.flush()?;
    Ok(answer)
}

fn lookup(db: &Path, raw: &str) -> Result<()> {
    let registry = SqliteRegistry::open(db)?;
    let cnpj = Cnpj::parse(&strip_formatting(raw))?;

    if !registry.exists(cnpj)? {
        println!("{} is not registered", cnpj.formatted());
        return Ok(());
    }
    println!("{} is registered", cnpj.formatted());
    for branch in registry.branches(cnpj)? {
        let marker = if branch == cnpj { "*" } else { " " };
        println!(" {marker} {}", branch.formatted());
    }
    Ok(())
}

fn verdict(ok: bool) -> &'static str {
    if ok {
        "valid"
    } else {
        "invalid"
    }
}
