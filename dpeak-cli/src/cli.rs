//! Command-line interface orchestration for dpeak.
//!
//! The CLI offers a single `run` command that loads a whitespace-delimited
//! shape file, executes the density-peak clustering pipeline, and renders the
//! labelling together with the decision-graph columns. When the file carries
//! ground-truth labels the summary also reports ARI/NMI agreement scores.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use dpeak_core::{DataSource, DpcBuilder, DpcError, DpcResult, TieBreak};
use dpeak_providers_shapes::{ShapeDataset, ShapeDatasetError};
use thiserror::Error;

use crate::quality::{AgreementError, AgreementScore, agreement_score};

const DEFAULT_CUTOFF_QUANTILE: f64 = 0.02;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "dpeak", about = "Execute the density-peak clustering pipeline.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster a shape file and print the labelling.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to a whitespace-delimited shape file (`x y` or `x y label` rows).
    pub path: PathBuf,

    /// Number of clusters to extract.
    #[arg(long = "clusters", short = 'k')]
    pub clusters: usize,

    /// Quantile of the pairwise distances used as the density cutoff radius.
    #[arg(long = "cutoff-quantile", default_value_t = DEFAULT_CUTOFF_QUANTILE)]
    pub cutoff_quantile: f64,

    /// Policy for resolving equal gamma scores during centre selection.
    #[arg(long = "tie-break", value_enum, default_value_t = TieBreakArg::LowerIndex)]
    pub tie_break: TieBreakArg,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Gamma tie-break policies exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TieBreakArg {
    /// On equal gamma, the lower original index wins.
    LowerIndex,
    /// On equal gamma, the higher density wins, then the lower index.
    HigherDensity,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::LowerIndex => Self::LowerIndex,
            TieBreakArg::HigherDensity => Self::HigherDensity,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while loading an input source.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Shape-file ingestion failed.
    #[error(transparent)]
    Shapes(#[from] ShapeDatasetError),
    /// Core pipeline execution failed.
    #[error(transparent)]
    Core(#[from] DpcError),
    /// Agreement scoring against ground truth failed.
    #[error(transparent)]
    Agreement(#[from] AgreementError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name reported by the data source implementation.
    pub data_source: String,
    /// Full clustering result, including decision-graph diagnostics.
    pub result: DpcResult,
    /// Agreement against ground truth, when the input carried labels.
    pub agreement: Option<AgreementScore>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading, clustering, or scoring fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use dpeak_cli::cli::{Cli, Command, RunCommand, TieBreakArg, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0 0\n0 1\n10 0\n10 1\n")?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         path: file.path().to_path_buf(),
///         clusters: 2,
///         cutoff_quantile: 0.5,
///         tie_break: TieBreakArg::LowerIndex,
///         name: None,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.result.labels().len(), 4);
/// assert_eq!(summary.result.cluster_count(), 2);
/// # Ok(())
/// # }
/// ```
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => run_command(run),
    }
}

fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let dpc = DpcBuilder::new()
        .with_cluster_count(command.clusters)
        .with_cutoff_quantile(command.cutoff_quantile)
        .with_tie_break(command.tie_break.into())
        .build()?;

    let chosen_name = derive_data_source_name(&command.path, command.name.as_deref());
    let reader = open_shape_reader(&command.path)?;
    let dataset = ShapeDataset::try_from_reader(chosen_name, reader)?;
    let (points, ground_truth) = dataset.into_parts();

    let result = dpc.run(&points)?;
    let agreement = score_against_ground_truth(&result, ground_truth.as_deref())?;

    Ok(ExecutionSummary {
        data_source: points.name().to_owned(),
        result,
        agreement,
    })
}

fn score_against_ground_truth(
    result: &DpcResult,
    ground_truth: Option<&[usize]>,
) -> Result<Option<AgreementScore>, CliError> {
    let Some(truth) = ground_truth else {
        return Ok(None);
    };
    let predicted: Vec<usize> = result.labels().iter().map(|id| id.get()).collect();
    Ok(Some(agreement_score(truth, &predicted)?))
}

fn open_shape_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "data_source".to_owned())
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// The per-point block doubles as decision-graph data: each line carries the
/// point index, its cluster label, density, and delta.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "clusters: {}", summary.result.cluster_count())?;
    writeln!(writer, "cutoff radius: {}", summary.result.cutoff_radius())?;
    let centers: Vec<String> = summary
        .result
        .centers()
        .iter()
        .map(ToString::to_string)
        .collect();
    writeln!(writer, "centers: {}", centers.join(" "))?;
    if summary.result.is_degenerate() {
        writeln!(writer, "warning: density degenerated to all zeros")?;
    }
    if let Some(agreement) = summary.agreement {
        writeln!(writer, "ari: {:.6}", agreement.ari)?;
        writeln!(writer, "nmi: {:.6}", agreement.nmi)?;
    }
    writeln!(writer, "point\tlabel\tdensity\tdelta")?;
    for (index, label) in summary.result.labels().iter().enumerate() {
        writeln!(
            writer,
            "{index}\t{}\t{}\t{}",
            label.get(),
            summary.result.density()[index],
            summary.result.delta()[index],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use rstest::rstest;
    use tempfile::TempDir;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn temp_dir() -> TempDir {
        match TempDir::new() {
            Ok(dir) => dir,
            Err(err) => panic!("failed to create temp dir: {err}"),
        }
    }

    fn create_shape_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
        let path = dir.path().join(name);
        let mut file = File::create(&path)?;
        file.write_all(contents.as_bytes())?;
        Ok(path)
    }

    fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
        match run_cli(cli) {
            Ok(_) => panic!("{}", panic_msg),
            Err(err) => err,
        }
    }

    fn run_command_for(path: PathBuf, clusters: usize, quantile: f64) -> RunCommand {
        RunCommand {
            path,
            clusters,
            cutoff_quantile: quantile,
            tie_break: TieBreakArg::LowerIndex,
            name: None,
        }
    }

    const TWO_BLOBS: &str = "0 0\n0 1\n10 0\n10 1\n";
    const TWO_BLOBS_LABELLED: &str = "0 0 1\n0 1 1\n10 0 2\n10 1 2\n";

    #[rstest]
    fn run_labels_two_blobs() -> TestResult {
        let dir = temp_dir();
        let path = create_shape_file(&dir, "blobs.txt", TWO_BLOBS)?;
        let cli = Cli {
            command: Command::Run(run_command_for(path, 2, 0.5)),
        };
        let summary = run_cli(cli)?;
        let labels: Vec<usize> = summary.result.labels().iter().map(|id| id.get()).collect();
        assert_eq!(labels, vec![1, 1, 2, 2]);
        assert_eq!(summary.data_source, "blobs");
        assert!(summary.agreement.is_none());
        Ok(())
    }

    #[rstest]
    fn run_scores_against_ground_truth() -> TestResult {
        let dir = temp_dir();
        let path = create_shape_file(&dir, "labelled.txt", TWO_BLOBS_LABELLED)?;
        let cli = Cli {
            command: Command::Run(run_command_for(path, 2, 0.5)),
        };
        let summary = run_cli(cli)?;
        let agreement = summary.agreement.ok_or("agreement must be present")?;
        assert!((agreement.ari - 1.0).abs() < 1e-12);
        assert!((agreement.nmi - 1.0).abs() < 1e-12);
        Ok(())
    }

    #[rstest]
    fn run_respects_name_override() -> TestResult {
        let dir = temp_dir();
        let path = create_shape_file(&dir, "blobs.txt", TWO_BLOBS)?;
        let cli = Cli {
            command: Command::Run(RunCommand {
                name: Some("override".into()),
                ..run_command_for(path, 2, 0.5)
            }),
        };
        let summary = run_cli(cli)?;
        assert_eq!(summary.data_source, "override");
        Ok(())
    }

    #[rstest]
    fn run_rejects_zero_clusters() -> TestResult {
        let dir = temp_dir();
        let path = create_shape_file(&dir, "blobs.txt", TWO_BLOBS)?;
        let cli = Cli {
            command: Command::Run(run_command_for(path, 0, 0.5)),
        };
        let err = run_cli_expecting_error(cli, "zero clusters must fail");
        assert!(matches!(
            err,
            CliError::Core(DpcError::InvalidClusterCount { got: 0 })
        ));
        Ok(())
    }

    #[rstest]
    fn run_rejects_more_clusters_than_points() -> TestResult {
        let dir = temp_dir();
        let path = create_shape_file(&dir, "blobs.txt", TWO_BLOBS)?;
        let cli = Cli {
            command: Command::Run(run_command_for(path, 9, 0.5)),
        };
        let err = run_cli_expecting_error(cli, "k > N must fail");
        assert!(matches!(
            err,
            CliError::Core(DpcError::ClusterCountExceedsItems { .. })
        ));
        Ok(())
    }

    #[rstest]
    fn run_rejects_empty_files() -> TestResult {
        let dir = temp_dir();
        let path = create_shape_file(&dir, "empty.txt", "")?;
        let cli = Cli {
            command: Command::Run(run_command_for(path, 1, 0.5)),
        };
        let err = run_cli_expecting_error(cli, "empty input must fail");
        assert!(matches!(
            err,
            CliError::Shapes(ShapeDatasetError::EmptyInput)
        ));
        Ok(())
    }

    #[rstest]
    fn run_reports_missing_files_as_io_errors() {
        let cli = Cli {
            command: Command::Run(run_command_for(PathBuf::from("/nonexistent/file.txt"), 1, 0.5)),
        };
        let err = run_cli_expecting_error(cli, "missing file must fail");
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[rstest]
    #[case::override_name("/tmp/source.txt", Some("override"), "override")]
    #[case::stem_with_extension("/tmp/source.txt", None, "source")]
    #[case::stem_without_extension("/tmp/source", None, "source")]
    #[case::missing_stem("", None, "data_source")]
    fn derive_data_source_name_selects_expected_name(
        #[case] raw_path: &str,
        #[case] override_name: Option<&'static str>,
        #[case] expected: &str,
    ) {
        let path = Path::new(raw_path);
        let name = derive_data_source_name(path, override_name);
        assert_eq!(name, expected);
    }

    #[rstest]
    fn render_summary_reports_labels_and_diagnostics() -> TestResult {
        let dir = temp_dir();
        let path = create_shape_file(&dir, "labelled.txt", TWO_BLOBS_LABELLED)?;
        let cli = Cli {
            command: Command::Run(run_command_for(path, 2, 0.5)),
        };
        let summary = run_cli(cli)?;

        let mut buffer = Vec::new();
        render_summary(&summary, &mut buffer)?;
        let text = String::from_utf8(buffer)?;
        assert!(text.contains("data source: labelled"));
        assert!(text.contains("clusters: 2"));
        assert!(text.contains("centers: 0 2"));
        assert!(text.contains("ari: 1.000000"));
        assert!(text.contains("nmi: 1.000000"));
        assert!(text.contains("point\tlabel\tdensity\tdelta"));
        assert!(text.contains("0\t1\t1\t10"));
        Ok(())
    }

    #[rstest]
    fn clap_rejects_unknown_tie_break() {
        let args = [
            "dpeak",
            "run",
            "data.txt",
            "--clusters",
            "2",
            "--tie-break",
            "unsupported",
        ];
        let result = Cli::try_parse_from(args);
        assert!(result.is_err());
    }

    #[rstest]
    fn clap_parses_a_full_run_invocation() {
        let args = [
            "dpeak",
            "run",
            "data.txt",
            "-k",
            "4",
            "--cutoff-quantile",
            "0.1",
            "--tie-break",
            "higher-density",
        ];
        let cli = Cli::try_parse_from(args).expect("arguments must parse");
        let Command::Run(run) = cli.command;
        assert_eq!(run.clusters, 4);
        assert_eq!(run.cutoff_quantile, 0.1);
        assert_eq!(run.tie_break, TieBreakArg::HigherDensity);
    }

    #[rstest]
    fn cli_error_preserves_core_error_codes() {
        let err = CliError::Core(DpcError::EmptySource {
            data_source: Arc::from("demo"),
        });
        let CliError::Core(core) = err else {
            panic!("constructed variant must match");
        };
        assert_eq!(core.code().as_str(), "DPC_EMPTY_SOURCE");
    }
}
