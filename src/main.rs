use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linspector::{
    init_logger, AnalysisConfig, Analyzer, DbcDatabase, GatewayMap, LdfDescription, TraceReader,
};
use linspector::logging::{log_error, log_info};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "linspector")]
#[command(about = "Validate captured LIN/CAN traces against LDF and DBC descriptions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analyzer over a trace file and emit the JSON report.
    Analyze {
        /// Trace log file.
        #[arg(long)]
        trace: PathBuf,
        /// LIN description as JSON.
        #[arg(long)]
        ldf: PathBuf,
        /// CAN database as JSON.
        #[arg(long)]
        dbc: Option<PathBuf>,
        /// Gateway mapping as JSON.
        #[arg(long)]
        gateway: Option<PathBuf>,
        /// Analysis configuration as JSON; defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the report here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    init_logger();
    let cli = Cli::parse();
    match execute(cli) {
        Ok(finding_count) => {
            if finding_count == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(err) => {
            log_error(&format!("{err:#}"));
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &PathBuf, what: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read {what} {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("cannot parse {what} {}", path.display()))
}

fn execute(cli: Cli) -> Result<u64> {
    match cli.command {
        Commands::Analyze {
            trace,
            ldf,
            dbc,
            gateway,
            config,
            output,
        } => {
            let ldf: LdfDescription = load_json(&ldf, "LDF description")?;
            let dbc: DbcDatabase = match &dbc {
                Some(path) => load_json(path, "DBC database")?,
                None => DbcDatabase::default(),
            };
            let gateway: GatewayMap = match &gateway {
                Some(path) => load_json(path, "gateway map")?,
                None => GatewayMap::default(),
            };
            let config: AnalysisConfig = match &config {
                Some(path) => load_json(path, "configuration")?,
                None => AnalysisConfig::default(),
            };

            let mut analyzer = Analyzer::new(config, ldf, dbc, gateway)?;
            for entry in TraceReader::open(&trace)? {
                analyzer.observe(entry?);
            }
            let report = analyzer.finalize();
            let finding_count = report.summary.finding_count;

            let rendered = report.to_json_pretty()?;
            match output {
                Some(path) => fs::write(&path, rendered)
                    .with_context(|| format!("cannot write report {}", path.display()))?,
                None => println!("{rendered}"),
            }
            log_info(&format!("report produced with {finding_count} findings"));
            Ok(finding_count)
        }
    }
}
