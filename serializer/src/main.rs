//! Course Serializer CLI - Convert course step tables to `course.json`
//!
//! # Main Command
//!
//! ```bash
//! course-serializer                          # in/ -> out/course.json
//! course-serializer build --input-dir data   # same, with options
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! course-serializer sections in/sectionsInfo.csv     # Parse section metadata
//! course-serializer steps in/intro-courseSteps.csv   # Parse one step table
//! course-serializer validate out/course.json         # Check against the schema
//! course-serializer settings                         # Show effective course header
//! ```

use clap::{Args, Parser, Subcommand};
use course_serializer::logs::{log_error, log_info, log_success, Verbosity, LOGGER};
use course_serializer::{
    load_sections, load_steps, read_course, run, validate_course_json, ConvertOptions,
    CourseSettings, IdSequence, SettingsOverrides,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "course-serializer")]
#[command(about = "Convert course step tables to a course.json document", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    build: BuildArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the input directory into course.json (default)
    Build(BuildArgs),

    /// Parse a section metadata table and print it as JSON
    Sections {
        /// Metadata file (sectionsInfo.csv)
        input: PathBuf,

        /// Input encoding (auto-detect if not specified)
        #[arg(long)]
        encoding: Option<String>,
    },

    /// Parse a single step table and print its steps as JSON
    Steps {
        /// Step table ({folder}-courseSteps.csv)
        input: PathBuf,

        /// Id given to the first step
        #[arg(long, default_value = "1")]
        first_id: u32,

        /// Input encoding (auto-detect if not specified)
        #[arg(long)]
        encoding: Option<String>,
    },

    /// Validate a course.json file against the course schema
    Validate {
        /// Course JSON file
        input: PathBuf,
    },

    /// Print the effective course settings
    Settings {
        #[command(flatten)]
        course: CourseArgs,
    },
}

#[derive(Args, Clone)]
struct BuildArgs {
    /// Directory holding sectionsInfo.csv and the step tables
    #[arg(long, env = "COURSE_INPUT_DIR", default_value = "in")]
    input_dir: PathBuf,

    /// Output file
    #[arg(short, long, env = "COURSE_OUTPUT", default_value = "out/course.json")]
    output: PathBuf,

    #[command(flatten)]
    course: CourseArgs,

    /// Input encoding (auto-detect if not specified)
    #[arg(long)]
    encoding: Option<String>,

    /// Parse and validate without writing the output
    #[arg(long)]
    dry_run: bool,

    /// Skip schema validation
    #[arg(long)]
    no_validate: bool,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print every parsed step
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args, Clone)]
struct CourseArgs {
    /// JSON file with course settings
    #[arg(long, env = "COURSE_SETTINGS")]
    settings: Option<PathBuf>,

    /// Course slug
    #[arg(long, env = "COURSE_SLUG")]
    slug: Option<String>,

    /// Course title
    #[arg(long, env = "COURSE_TITLE")]
    title: Option<String>,

    /// Course description
    #[arg(long, env = "COURSE_DESCRIPTION")]
    description: Option<String>,

    /// Target school grade
    #[arg(long, env = "COURSE_GRADE")]
    grade: Option<i32>,

    /// Course language code
    #[arg(long, env = "COURSE_LANGUAGE")]
    language: Option<String>,
}

impl CourseArgs {
    fn resolve(self) -> Result<CourseSettings, Box<dyn std::error::Error>> {
        let base = match &self.settings {
            Some(path) => CourseSettings::load(path)?,
            None => CourseSettings::default(),
        };

        Ok(base.with_overrides(SettingsOverrides {
            slug: self.slug,
            title: self.title,
            description: self.description,
            grade: self.grade,
            language: self.language,
        }))
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        None => cmd_build(cli.build),

        Some(Commands::Build(args)) => cmd_build(args),

        Some(Commands::Sections { input, encoding }) => {
            cmd_sections(&input, encoding.as_deref())
        }

        Some(Commands::Steps {
            input,
            first_id,
            encoding,
        }) => cmd_steps(&input, first_id, encoding.as_deref()),

        Some(Commands::Validate { input }) => cmd_validate(&input),

        Some(Commands::Settings { course }) => cmd_settings(course),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_build(args: BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    let verbosity = if args.quiet {
        Verbosity::Quiet
    } else if args.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };
    LOGGER.set_verbosity(verbosity);

    let options = ConvertOptions {
        input_dir: args.input_dir,
        output_path: args.output,
        settings: args.course.resolve()?,
        encoding: args.encoding,
        dry_run: args.dry_run,
        skip_validation: args.no_validate,
    };

    let result = run(&options)?;

    if result.output_path.is_none() {
        print!("{}", result.json);
    }

    log_success("✨ Done!");
    Ok(())
}

fn cmd_sections(input: &Path, encoding: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("📄 Parsing sections: {}", input.display()));

    let sections = load_sections(input, encoding)?;
    log_success(format!("Parsed {} section(s)", sections.len()));

    println!("{}", serde_json::to_string_pretty(&sections)?);
    Ok(())
}

fn cmd_steps(
    input: &Path,
    first_id: u32,
    encoding: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("📄 Parsing steps: {}", input.display()));

    let mut ids = IdSequence::starting_at(first_id);
    let steps = load_steps(input, &mut ids, encoding)?;
    log_success(format!(
        "Parsed {} step(s), next id {}",
        steps.len(),
        ids.current()
    ));

    println!("{}", serde_json::to_string_pretty(&steps)?);
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("✔️  Validating: {}", input.display()));

    let content = fs::read_to_string(input)?;
    let value: Value = serde_json::from_str(&content)?;

    if let Err(err) = validate_course_json(&value) {
        for message in err.errors.iter().take(10) {
            log_error(format!("   - {}", message));
        }
        return Err(err.into());
    }

    let course = read_course(input)?;
    let stats = course.stats();
    log_success(format!(
        "Valid course: {} section(s), {} step(s)",
        stats.sections, stats.steps
    ));
    Ok(())
}

fn cmd_settings(course: CourseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = course.resolve()?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
