use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use style_build::compiler::GrassCompiler;
use style_build::config::{self, StylesConfig};
use style_build::expand::GlobExpander;
use style_build::fs::NativeFs;
use style_build::output::{self, ConsoleReporter};
use style_build::pipeline::{self, Collaborators};
use style_build::{plan, report};

#[derive(Parser)]
#[command(name = "style-build")]
#[command(about = "Compile configured sets of stylesheets into CSS")]
#[command(long_about = "\
Compile configured sets of stylesheets into CSS

Each [[files]] entry in styles.toml maps source patterns to a destination.
The destination's shape picks the output layout:

  dest = \"public/css/\"      one .css file per source, directory structure
                            kept below the sources' common base path
  dest = \"public/site.css\"  every source compiled, joined in order

File sets are compiled in the order they appear. The first error stops the
whole build.

Run 'style-build gen-config' to generate a documented styles.toml.")]
#[command(version)]
struct Cli {
    /// Task configuration file. Paths inside it are relative to its directory.
    #[arg(long, default_value = "styles.toml", global = true)]
    config: PathBuf,

    /// Show each file set's effective options and every compile
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Compile every file set (the default)
    Build,
    /// Show the outputs a build would produce, without compiling
    Plan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock styles.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let (root, styles) = load(&cli.config)?;
            let expander = GlobExpander::new(&root);
            let fs = NativeFs::new(&root);
            let compiler = GrassCompiler::new(&root);
            let reporter = ConsoleReporter::new(cli.verbose);

            let result = pipeline::run_task(
                &styles.files,
                &styles.options,
                Collaborators {
                    expander: &expander,
                    fs: &fs,
                    compiler: &compiler,
                    reporter: &reporter,
                },
            );
            if !result.succeeded() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Plan { json } => {
            let (root, styles) = load(&cli.config)?;
            let expander = GlobExpander::new(&root);
            match plan::plan(&styles.files, &styles.options, &expander) {
                Ok(resolved) if json => println!("{}", serde_json::to_string_pretty(&resolved)?),
                Ok(resolved) => {
                    for line in output::format_plan(&resolved) {
                        println!("{}", line);
                    }
                }
                Err(err) => {
                    eprintln!("{}", report::format_task_error(&GrassCompiler::default(), &err));
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load the config and return it with the directory its paths are relative to.
fn load(path: &Path) -> Result<(PathBuf, StylesConfig), config::ConfigError> {
    let styles = config::load_config(path)?;
    let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok((root, styles))
}
