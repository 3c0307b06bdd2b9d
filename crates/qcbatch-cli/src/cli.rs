use clap::{Args, Parser, Subcommand, ValueEnum};
use qcbatch::engine::config::Cluster;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "qcbatch - prepare, submit and collect Q-Chem geometry optimizations on Slurm clusters.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project directory holding `init_mols/` and `outputs/`
    #[arg(long, global = true, value_name = "PATH", default_value = ".")]
    pub root: PathBuf,

    /// Path to a configuration file in TOML format
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a Q-Chem input and a submit script for every geometry in init_mols/.
    Prepare(PrepareArgs),
    /// Submit every prepared job to the batch scheduler.
    Submit(SubmitArgs),
    /// Parse Q-Chem outputs into JSON records.
    Collect(CollectArgs),
    /// Print the molecule names found in init_mols/.
    List,
}

/// Clusters with a built-in submit-script profile.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterArg {
    Lrc,
    Swift,
}

impl From<ClusterArg> for Cluster {
    fn from(arg: ClusterArg) -> Self {
        match arg {
            ClusterArg::Lrc => Cluster::Lrc,
            ClusterArg::Swift => Cluster::Swift,
        }
    }
}

/// Arguments for the `prepare` subcommand.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Target cluster for the submit scripts [default: swift]
    #[arg(value_enum)]
    pub cluster: Option<ClusterArg>,

    /// Set a Q-Chem keyword, overriding the config file.
    /// Can be used multiple times. Example: -S rem.basis=def2-tzvpd
    #[arg(short = 'S', long = "set", value_name = "SECTION.KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `submit` subcommand.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// List the jobs that would be submitted without calling the scheduler
    #[arg(long)]
    pub dry_run: bool,

    /// Pause between submissions, in milliseconds [default: 500]
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Scheduler command used to submit scripts [default: sbatch]
    #[arg(long, value_name = "CMD")]
    pub scheduler: Option<String>,
}

/// Arguments for the `collect` subcommand.
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Output files hold more than one job
    #[arg(short, long, alias = "multi_job")]
    pub multi_job: bool,

    /// Names for the jobs in each file, comma-separated (e.g. 'geom, freq, sp')
    #[arg(
        short = 'n',
        long,
        alias = "job_names",
        value_name = "LIST",
        requires = "multi_job"
    )]
    pub job_names: Option<String>,
}
