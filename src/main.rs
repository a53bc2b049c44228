use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use gradewise::grading::normalize::parse_number;
use gradewise::grading::{required_scores, ScoreScale};
use gradewise::record::{
    apply_edit, solve_phase, Component, Program, Semester, Subject, SubjectEdit, WeightSet,
};

const EXIT_SUCCESS: i32 = 0;
const EXIT_RECORD: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_LOOKUP: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show every semester with subject scores and averages (default if no subcommand)
    Summary {
        /// Print tab-separated values instead of a table
        #[arg(long)]
        tsv: bool,
    },
    /// Show the score still needed on each missing component of a subject
    Solve {
        /// Course code of the subject
        #[arg(short, long)]
        subject: String,
        /// Desired overall score
        #[arg(short, long, allow_negative_numbers = true, value_parser = parse_target)]
        target: f64,
    },
    /// Try out edits on a subject without touching the record
    WhatIf {
        /// Course code of the subject
        #[arg(short, long)]
        subject: String,
        /// Component score to set, e.g. final=8.5 (repeatable)
        #[arg(long = "set", value_parser = parse_assignment)]
        sets: Vec<(Component, String)>,
        /// Desired overall score
        #[arg(short, long)]
        target: Option<String>,
    },
    /// Search the course catalog by code or name
    Search {
        /// Text to look for (lists everything if omitted)
        term: Option<String>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "gradewise")]
#[command(about = "Grade tracking and target score CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/gradewise/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the record file (overrides the config)
    #[arg(short, long, global = true)]
    record: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn parse_assignment(s: &str) -> Result<(Component, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected component=value, got '{}'", s))?;
    let component = name.parse::<Component>().map_err(|e| e.to_string())?;
    Ok((component, value.to_string()))
}

fn parse_target(s: &str) -> Result<f64, String> {
    parse_number(s).ok_or_else(|| format!("expected a finite number, got '{}'", s))
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Summary { tsv: false });

    gradewise::logging::init_cli_logger(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match gradewise::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = gradewise::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let scale = config.scale;
    let use_colors = gradewise::output::should_use_colors();
    let record_path = gradewise::config::record_path(cli.record.map(PathBuf::from), &config);

    match command {
        Commands::Summary { tsv } => {
            let program = load_record(&record_path, &config.default_weights);
            if tsv {
                println!("{}", gradewise::output::format_tsv(&program));
            } else {
                println!(
                    "{}",
                    gradewise::output::format_program(&program, &scale, use_colors)
                );
            }
        }
        Commands::Solve { subject, target } => {
            check_target(&scale, target);
            let program = load_record(&record_path, &config.default_weights);
            let found = lookup(&program, &subject);
            let required = required_scores(found, target);
            println!(
                "{}",
                gradewise::output::format_required(found, target, &required, &scale, use_colors)
            );
        }
        Commands::WhatIf {
            subject,
            sets,
            target,
        } => {
            if let Some(value) = target.as_deref().and_then(parse_number) {
                check_target(&scale, value);
            }
            let program = load_record(&record_path, &config.default_weights);
            run_what_if(&program, &subject, sets, target, &scale, use_colors);
        }
        Commands::Search { term } => {
            if config.catalog.is_empty() {
                eprintln!("No catalog configured. Add courses under 'catalog:' in the config file.");
                std::process::exit(EXIT_CONFIG);
            }
            let results = config.catalog.search(term.as_deref().unwrap_or(""));
            println!(
                "{}",
                gradewise::output::format_search_results(&results, use_colors)
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

fn load_record(path: &Path, default_weights: &WeightSet) -> Program {
    match gradewise::record::load_program(path, default_weights) {
        Ok(program) => {
            tracing::debug!(
                path = %path.display(),
                semesters = program.semesters.len(),
                "Record ready"
            );
            program
        }
        Err(e) => {
            eprintln!("Record error: {:#}", e);
            std::process::exit(EXIT_RECORD);
        }
    }
}

fn check_target(scale: &ScoreScale, target: f64) {
    if let Err(e) = scale.check_target(target) {
        eprintln!("{}", e);
        std::process::exit(EXIT_INPUT);
    }
}

fn lookup<'a>(program: &'a Program, code: &str) -> &'a Subject {
    match program.find_by_code(code) {
        Some(subject) => subject,
        None => {
            eprintln!("{}", gradewise::GradeError::SubjectNotFound(code.to_string()));
            std::process::exit(EXIT_LOOKUP);
        }
    }
}

fn run_what_if(
    program: &Program,
    code: &str,
    sets: Vec<(Component, String)>,
    target: Option<String>,
    scale: &ScoreScale,
    use_colors: bool,
) {
    let mut subject = lookup(program, code).clone();

    // Target first so every following score edit re-solves against it
    let edits = target
        .map(SubjectEdit::Target)
        .into_iter()
        .chain(sets.into_iter().map(|(c, v)| SubjectEdit::Score(c, v)));

    for edit in edits {
        if let Err(e) = apply_edit(&mut subject, edit, scale) {
            eprintln!("Edit rejected: {}", e);
            std::process::exit(EXIT_LOOKUP);
        }
    }

    let phase = solve_phase(&subject);
    let mut preview = Semester::new("What if");
    preview.add_subject(subject);
    println!(
        "{}",
        gradewise::output::format_semester_table(&preview, scale, use_colors)
    );
    println!("  Phase: {:?}", phase);
}
