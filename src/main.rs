//! certgen – publication certificate generator.
//!
//! Usage:
//!   certgen --title "Article" --author "Jane Doe" [--received ..] [--published ..] [--doi ..]
//!   certgen --csv data.csv
//!
//! Certificates are written to `output/certificate-<author-slug>.pdf`.

use std::{env, io, process};

use certgen::cli::{parse_args, usage, Cli, Mode};
use certgen::config::GeneratorConfig;
use certgen::error::CertError;
use certgen::pipeline::Generator;
use certgen::render::{CommandRenderer, NoopRenderer, PdfRenderer};

fn main() {
    env_logger::init();

    let mut args = env::args();
    let prog = args.next().unwrap_or_else(|| "certgen".to_string());

    let cli = match parse_args(args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            eprintln!();
            eprintln!("{}", usage(&prog));
            process::exit(1);
        }
    };

    if cli.help || cli.mode == Mode::Usage {
        println!("{}", usage(&prog));
        process::exit(0);
    }

    if let Err(e) = run(cli) {
        match &e {
            CertError::RendererInvocation { stderr, .. } => {
                eprintln!("Renderer error: {}", stderr.trim_end());
            }
            other => eprintln!("Error: {other}"),
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CertError> {
    let config = build_config(&cli)?;
    log::debug!("configuration: {config:?}");

    let renderer: Box<dyn PdfRenderer> = if cli.dry_run {
        Box::new(NoopRenderer)
    } else {
        Box::new(CommandRenderer::from_config(&config.renderer))
    };
    let generator = Generator::new(config, renderer)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.mode {
        Mode::Batch(csv_path) => {
            generator.generate_from_csv(&csv_path, &mut out)?;
        }
        Mode::Single(record) => {
            generator.generate_one(&record, &mut out)?;
        }
        Mode::Usage => {}
    }
    Ok(())
}

/// Config file, then assets directory, then explicit output directory.
fn build_config(cli: &Cli) -> Result<GeneratorConfig, CertError> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_json_file(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(dir) = &cli.assets_dir {
        config = config.with_base_dir(dir);
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}
