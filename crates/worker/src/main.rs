use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use powergrid_core::domain::forecast::ForecastResponse;
use powergrid_core::ingest::UploadedFile;
use powergrid_core::predict::{DeltaSource, SeededDelta, ThreadRngDelta};

#[derive(Debug, Parser)]
#[command(name = "powergrid_worker")]
struct Args {
    /// Demand CSV to forecast. Must end in `.csv`.
    #[arg(long)]
    input: PathBuf,

    /// Where to write the JSON envelope. Defaults to stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Seed for reproducible predictions.
    #[arg(long)]
    seed: Option<u64>,

    /// Run the full pipeline but write nothing.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = powergrid_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let result = run(&args);
    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(input = %args.input.display(), error = %err, "forecast run failed");
    }
    result
}

fn run(args: &Args) -> anyhow::Result<()> {
    let upload = read_upload(&args.input)?;

    let deltas: Box<dyn DeltaSource> = match args.seed {
        Some(seed) => Box::new(SeededDelta::new(seed)),
        None => Box::new(ThreadRngDelta),
    };

    let response = forecast(&upload, deltas.as_ref())?;

    if args.dry_run {
        tracing::info!(
            input = %args.input.display(),
            dry_run = true,
            count = response.count,
            "forecast computed (dry-run)"
        );
        return Ok(());
    }

    let json = serde_json::to_string_pretty(&response).context("serialize forecast failed")?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("write {} failed", path.display()))?;
            tracing::info!(output = %path.display(), count = response.count, "forecast written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn read_upload(path: &Path) -> anyhow::Result<UploadedFile> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let bytes = std::fs::read(path).with_context(|| format!("read {} failed", path.display()))?;
    Ok(UploadedFile::new(filename, bytes))
}

fn forecast(upload: &UploadedFile, deltas: &dyn DeltaSource) -> anyhow::Result<ForecastResponse> {
    powergrid_core::service::predict_demand(upload, deltas)
        .map_err(|e| anyhow::anyhow!(e.detail()))
}

fn init_sentry(settings: &powergrid_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Month,Project_ID,Material_Type,DemandQuantity\n\
                          2024-01,P1,Cable,100\n\
                          2024-02,P2,Pipe,3\n";

    #[test]
    fn seeded_runs_are_reproducible() {
        let upload = UploadedFile::new("demand.csv", SAMPLE);
        let a = forecast(&upload, &SeededDelta::new(7)).unwrap();
        let b = forecast(&upload, &SeededDelta::new(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.count, 2);
        assert!(a.forecasts.iter().all(|r| r.predicted().unwrap() >= 0));
    }

    #[test]
    fn errors_carry_client_detail() {
        let upload = UploadedFile::new("demand.txt", SAMPLE);
        let err = forecast(&upload, &ThreadRngDelta).unwrap_err();
        assert_eq!(err.to_string(), "Invalid file type.");

        let upload = UploadedFile::new("demand.csv", "Month\n2024-01\n");
        let err = forecast(&upload, &ThreadRngDelta).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: Input data must contain a 'DemandQuantity' column."
        );
    }

    #[test]
    fn filename_comes_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("march.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let upload = read_upload(&path).unwrap();
        assert_eq!(upload.filename, "march.csv");
        assert_eq!(upload.bytes, SAMPLE.as_bytes());
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_upload(&dir.path().join("absent.csv")).unwrap_err();
        assert!(err.to_string().starts_with("read "), "{err}");
    }

    #[test]
    fn args_parse_flags() {
        let args = Args::try_parse_from([
            "powergrid_worker",
            "--input",
            "demand.csv",
            "--seed",
            "3",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.input, PathBuf::from("demand.csv"));
        assert_eq!(args.seed, Some(3));
        assert!(args.dry_run);
        assert!(args.output.is_none());
    }
}
