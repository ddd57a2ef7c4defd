//! jreport – command-line joint license-plate detection report renderer.
//!
//! Usage:
//!   jreport --params p.json --data d.json --ranking r.json [-o out.pdf]
//!           [--options opts.json] [--boilerplate] [--layout-json layout.json]
//!   jreport --demo [-o out.pdf]
//!
//! If `-o` is omitted the PDF is written to `report_<reportId>.pdf` in the
//! current directory.

use std::{env, fs, path::PathBuf, process};

use joint_report::assets::ReportAssets;
use joint_report::error::ReportError;
use joint_report::model::Report;
use joint_report::pipeline::{generate_report, ReportOptions};
use joint_report::templates;

#[derive(Default)]
struct Args {
    params: Option<PathBuf>,
    data: Option<PathBuf>,
    ranking: Option<PathBuf>,
    output: Option<PathBuf>,
    options: Option<PathBuf>,
    layout_json: Option<PathBuf>,
    boilerplate: bool,
    demo: bool,
}

fn main() {
    env_logger::init();

    let argv: Vec<String> = env::args().collect();
    let prog = argv.first().map(String::as_str).unwrap_or("jreport");
    let args = parse_args(prog, &argv);

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(match e {
            ReportError::Validation(_) => 2,
            _ => 1,
        });
    }
}

fn parse_args(prog: &str, argv: &[String]) -> Args {
    let mut args = Args::default();
    let mut iter = argv.iter().skip(1);

    while let Some(arg) = iter.next() {
        let flag = arg.as_str();
        let mut path_value = |flag: &str| match iter.next() {
            Some(v) => PathBuf::from(v),
            None => {
                eprintln!("Missing value for {flag}");
                print_usage(prog);
                process::exit(1);
            }
        };
        match flag {
            "--params" | "-p" => args.params = Some(path_value(flag)),
            "--data" | "-d" => args.data = Some(path_value(flag)),
            "--ranking" | "-r" => args.ranking = Some(path_value(flag)),
            "--output" | "-o" => args.output = Some(path_value(flag)),
            "--options" => args.options = Some(path_value(flag)),
            "--layout-json" => args.layout_json = Some(path_value(flag)),
            "--boilerplate" | "-b" => args.boilerplate = true,
            "--demo" => args.demo = true,
            "--help" | "-h" => {
                print_usage(prog);
                process::exit(0);
            }
            other => {
                eprintln!("Unexpected argument: {other}");
                print_usage(prog);
                process::exit(1);
            }
        }
    }

    if !args.demo && (args.params.is_none() || args.data.is_none() || args.ranking.is_none()) {
        eprintln!("Error: --params, --data and --ranking are required (or use --demo).");
        print_usage(prog);
        process::exit(1);
    }
    args
}

fn read(path: &PathBuf) -> Result<String, ReportError> {
    fs::read_to_string(path).map_err(|e| {
        ReportError::Io(std::io::Error::new(
            e.kind(),
            format!("reading '{}': {e}", path.display()),
        ))
    })
}

fn run(args: &Args) -> Result<(), ReportError> {
    let mut options = match &args.options {
        Some(path) => ReportOptions::from_json_file(path)?,
        None => ReportOptions::default(),
    };
    if args.boilerplate {
        options.include_boilerplate = true;
    }

    // Logos are a startup requirement: fail before touching the inputs.
    // Paths in an options file are relative to that file.
    let assets = match args.options.as_deref().and_then(|p| p.parent()) {
        Some(dir) => ReportAssets::load_relative_to(dir, &options.logos)?,
        None => ReportAssets::load(&options.logos)?,
    };

    let report = match (&args.params, &args.data, &args.ranking) {
        (Some(p), Some(d), Some(r)) => Report::from_json_strs(&read(p)?, &read(d)?, &read(r)?)?,
        _ => Report::from_json_strs(
            templates::params_json(),
            templates::multi_group_json(),
            templates::ranking_json(),
        )?,
    };

    let generated = generate_report(&report, &options, &assets)?;

    if let Some(path) = &args.layout_json {
        fs::write(path, generated.layout.to_json())?;
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(generated.file_name()));
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&output, &generated.pdf)?;

    let pages = generated.page_count();
    log::info!(
        "Wrote '{}' ({} bytes, {} page{})",
        output.display(),
        generated.pdf.len(),
        pages,
        if pages == 1 { "" } else { "s" }
    );
    eprintln!("Report {} written to '{}'", generated.report_id, output.display());
    Ok(())
}

fn print_usage(prog: &str) {
    eprintln!("jreport – joint license-plate detection report (PDF)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} --params <p.json> --data <d.json> --ranking <r.json> [flags]");
    eprintln!("  {prog} --demo [flags]");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --output, -o     Output path (default: report_<reportId>.pdf)");
    eprintln!("  --options        JSON options file (boilerplate, highlight_color, margins, language, logos)");
    eprintln!("  --boilerplate    Include the explanatory sections");
    eprintln!("  --layout-json    Also write the computed page layout as JSON");
    eprintln!("  --demo           Render the built-in sample inputs");
    eprintln!("  --help           Print this message");
    eprintln!();
    eprintln!("Set RUST_LOG=debug to trace page breaks.");
}
