use std::fmt;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use dwarfdecl_core::dwarf::DebugInfo;
use dwarfdecl_core::render::RenderOptions;
use dwarfdecl_core::walk::TypeFilter;
use dwarfdecl_core::{render_debug_info, DeclError, RunSummary};
use dwarfdecl_utils::{debug, init_logging_with, LogFormat, LogLevel};

/// Print the struct, class, union and namespace declarations recorded in a
/// binary's DWARF debug info.
#[derive(Parser, Debug)]
#[command(name = "dwarfdecl")]
#[command(version)]
#[command(about = "Print the declarations recorded in a binary's DWARF debug info", long_about = None)]
struct Cli
{
    /// Path to the binary or object file to read
    binary: PathBuf,

    /// Only keep entries whose DW_AT_type is named exactly this; entries
    /// without a DW_AT_type (structs, namespaces) are always kept
    type_filter: Option<String>,

    /// Indent with this many spaces instead of a tab
    #[arg(long, value_name = "N")]
    indent: Option<usize>,

    /// Log level (error, warn, info, debug, trace); overrides RUST_LOG
    #[arg(long, value_name = "LEVEL", value_parser = parse_level)]
    log_level: Option<LogLevel>,

    /// Log format (pretty, json); overrides DWARFDECL_LOG_FORMAT
    #[arg(long, value_name = "FORMAT", value_parser = parse_format)]
    log_format: Option<LogFormat>,
}

fn parse_level(s: &str) -> Result<LogLevel, String>
{
    s.parse().map_err(|e: dwarfdecl_utils::LoggingError| e.to_string())
}

fn parse_format(s: &str) -> Result<LogFormat, String>
{
    s.parse().map_err(|e: dwarfdecl_utils::LoggingError| e.to_string())
}

impl Cli
{
    fn render_options(&self) -> RenderOptions
    {
        self.indent.map_or_else(RenderOptions::default, RenderOptions::spaces)
    }
}

/// Why a run stopped early.
#[derive(Debug)]
enum RunError
{
    /// The input binary could not be read or parsed
    Open
    {
        path: PathBuf,
        source: DeclError,
    },
    /// Declarations could not be written to the output
    Write(DeclError),
}

impl fmt::Display for RunError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            RunError::Open { path, source } => write!(f, "Error opening DWARF file {}: {}", path.display(), source),
            RunError::Write(e) => write!(f, "Error writing declarations: {}", e),
        }
    }
}

fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<RunSummary, RunError>
{
    let info = DebugInfo::open(&cli.binary).map_err(|source| RunError::Open {
        path: cli.binary.clone(),
        source,
    })?;

    let filter = cli.type_filter.clone().map(TypeFilter::new);
    let summary = render_debug_info(&info, filter.as_ref(), &cli.render_options(), out).map_err(RunError::Write)?;
    out.flush().map_err(|e| RunError::Write(e.into()))?;
    Ok(summary)
}

fn main()
{
    let cli = Cli::parse();

    if let Err(e) = init_logging_with(cli.log_level, cli.log_format) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match run(&cli, &mut out) {
        Ok(summary) => debug!(?summary, "done"),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_binary_only()
    {
        let cli = Cli::try_parse_from(["dwarfdecl", "a.out"]).unwrap();
        assert_eq!(cli.binary, PathBuf::from("a.out"));
        assert!(cli.type_filter.is_none());
        assert_eq!(cli.render_options(), RenderOptions::default());
    }

    #[test]
    fn test_filter_and_indent()
    {
        let cli = Cli::try_parse_from(["dwarfdecl", "--indent", "4", "a.out", "Point"]).unwrap();
        assert_eq!(cli.type_filter.as_deref(), Some("Point"));
        assert_eq!(cli.render_options(), RenderOptions::spaces(4));
    }

    #[test]
    fn test_logging_overrides()
    {
        let cli = Cli::try_parse_from(["dwarfdecl", "--log-level", "trace", "--log-format", "json", "a.out"]).unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Trace));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn test_rejects_bad_values()
    {
        assert!(Cli::try_parse_from(["dwarfdecl", "--log-level", "loud", "a.out"]).is_err());
        assert!(Cli::try_parse_from(["dwarfdecl", "--indent", "-1", "a.out"]).is_err());
        assert!(Cli::try_parse_from(["dwarfdecl"]).is_err());
    }

    #[test]
    fn test_filter_help_describes_type_matching()
    {
        use clap::CommandFactory;

        let command = Cli::command();
        let help = command
            .get_arguments()
            .find(|arg| arg.get_id() == "type_filter")
            .and_then(|arg| arg.get_help())
            .unwrap()
            .to_string();
        assert!(help.contains("DW_AT_type"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe
    {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize>
        {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()>
        {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_missing_binary_reports_open_error()
    {
        let cli = Cli::try_parse_from(["dwarfdecl", "/nonexistent/dwarfdecl/a.out"]).unwrap();
        let err = run(&cli, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, RunError::Open { .. }));
        assert!(err
            .to_string()
            .starts_with("Error opening DWARF file /nonexistent/dwarfdecl/a.out: "));
    }

    #[test]
    fn test_output_failure_is_not_an_open_error()
    {
        // The test binary opens fine; every write and flush of the output fails.
        let exe = std::env::current_exe().unwrap();
        let cli = Cli::try_parse_from([PathBuf::from("dwarfdecl"), exe]).unwrap();
        let err = run(&cli, &mut BrokenPipe).unwrap_err();
        assert!(matches!(err, RunError::Write(_)));
        assert!(err.to_string().starts_with("Error writing declarations: "));
    }
}
