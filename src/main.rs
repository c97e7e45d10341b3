use clap::{crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches, Command};
use std::path::Path;
use treeforge::{materialize::OnExisting, parser::ParseMode, GenerateOptions};

// The CLI layer should only parse inputs and forward them to library code.
fn main() {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .arg(
            Arg::new("structure")
                .help("path to the structure file describing the tree")
                .required(true),
        )
        .arg(Arg::new("output").help("output base directory (defaults to the current directory)"))
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Fail on lines that are not valid tree entries")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("preserve")
                .long("preserve")
                .help("Keep pre-existing files instead of truncating them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Report what would be created without writing anything")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    let structure_file = matches
        .get_one::<String>("structure")
        .expect("structure file required");
    let output_base = matches
        .get_one::<String>("output")
        .map(String::as_str)
        .unwrap_or(".");

    let options = GenerateOptions {
        mode: if matches.get_flag("strict") {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        },
        on_existing: if matches.get_flag("preserve") {
            OnExisting::Preserve
        } else {
            OnExisting::Overwrite
        },
        dry_run: matches.get_flag("dry-run"),
    };

    handle_generate(&matches, structure_file, output_base, options);
}

fn handle_generate(
    matches: &ArgMatches,
    structure_file: &str,
    output_base: &str,
    options: GenerateOptions,
) {
    match treeforge::generate(Path::new(structure_file), Path::new(output_base), &options) {
        Ok(root) => {
            if matches.get_flag("dry-run") {
                println!("Dry run complete, nothing was written: {}", root.display());
            } else {
                println!(
                    "Successfully generated directory structure at: {}",
                    root.display()
                );
            }
        }
        Err(error) => {
            eprintln!("{:?}", miette::Report::new(error));
            std::process::exit(1);
        }
    }
}

fn init_logging(is_verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();

    if is_verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }

    builder.init();
}
