//! Generate a multi-slot holder and write it as STEP and STL.
//!
//! Usage: holder [PARAMS.json] [--out DIR] [--ascii] [--dump-params]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use holder_export::{ExportError, LoadError};
use holder_kernel::{Kernel, KernelError, KernelSolidHandle, TruckKernel};
use holder_model::{compose, DimensionSummary, InputParameters, ModelError};
use tracing::{error, info};

/// Chordal tolerance for the STL mesh, in millimetres.
const STL_TOLERANCE: f64 = 0.05;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("tessellation failed: {0}")]
    Tessellate(#[from] KernelError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Default)]
struct Args {
    params: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    ascii: bool,
    dump_params: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, CliError> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => {
                let dir = args
                    .next()
                    .ok_or_else(|| CliError::Usage("--out needs a directory".to_string()))?;
                parsed.out_dir = Some(PathBuf::from(dir));
            }
            "--ascii" => parsed.ascii = true,
            "--dump-params" => parsed.dump_params = true,
            flag if flag.starts_with("--") => {
                return Err(CliError::Usage(format!("unknown option {}", flag)));
            }
            path if parsed.params.is_none() => parsed.params = Some(PathBuf::from(path)),
            extra => {
                return Err(CliError::Usage(format!("unexpected argument {}", extra)));
            }
        }
    }
    Ok(parsed)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), bytes = contents.len(), "written");
    Ok(())
}

/// Write `model.step` and `model.stl` for `solid` into `out_dir`.
fn export_solid(
    kernel: &mut TruckKernel,
    solid: &KernelSolidHandle,
    out_dir: &Path,
    ascii: bool,
) -> Result<(), CliError> {
    let step = holder_export::export_step(kernel, solid, "model.step")?;
    write_file(&out_dir.join("model.step"), step.as_bytes())?;

    let mesh = kernel.tessellate(solid, STL_TOLERANCE)?;
    let stl = if ascii {
        holder_export::export_ascii_stl(&mesh, "holder")?.into_bytes()
    } else {
        holder_export::export_binary_stl(&mesh, "holder")?
    };
    write_file(&out_dir.join("model.stl"), &stl)
}

fn run(args: Args) -> Result<(), CliError> {
    let params = match &args.params {
        Some(path) => holder_export::load_params_file(path)?,
        None => InputParameters::default(),
    };
    if args.dump_params {
        println!("{}", holder_export::save_params(&params));
        return Ok(());
    }

    let mut kernel = TruckKernel::new();
    let composition = compose(&mut kernel, &params)?;
    for warning in &composition.diagnostics.warnings {
        eprintln!("warning: {}", warning);
    }

    let out_dir = args.out_dir.unwrap_or_else(|| PathBuf::from("."));
    let exported = export_solid(&mut kernel, &composition.solid, &out_dir, args.ascii);
    kernel.release(composition.solid);
    exported?;

    println!("{}", DimensionSummary::new(&params, &composition.dims));
    println!("Exported:  model.step, model.stl");
    Ok(())
}

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "holder=info,holder_model=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = parse_args(std::env::args().skip(1)).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, CliError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments_uses_defaults() {
        let parsed = args(&[]).unwrap();
        assert!(parsed.params.is_none());
        assert!(!parsed.ascii);
    }

    #[test]
    fn flags_and_path() {
        let parsed = args(&["p.json", "--out", "build", "--ascii"]).unwrap();
        assert_eq!(parsed.params, Some(PathBuf::from("p.json")));
        assert_eq!(parsed.out_dir, Some(PathBuf::from("build")));
        assert!(parsed.ascii);
    }

    #[test]
    fn out_without_directory_is_usage_error() {
        assert!(matches!(args(&["--out"]), Err(CliError::Usage(_))));
    }

    fn single_slot_params(dir: &Path) -> PathBuf {
        let params = InputParameters {
            slot_count: 1,
            ..Default::default()
        };
        let path = dir.join("params.json");
        std::fs::write(&path, holder_export::save_params(&params)).unwrap();
        path
    }

    #[test]
    fn run_writes_step_and_stl() {
        let temp = tempfile::tempdir().unwrap();
        let params = single_slot_params(temp.path());
        run(Args {
            params: Some(params),
            out_dir: Some(temp.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap();

        let step = std::fs::read_to_string(temp.path().join("model.step")).unwrap();
        assert!(step.contains("ISO-10303-21"));
        let stl = std::fs::read(temp.path().join("model.stl")).unwrap();
        // 80-byte header, triangle count, 50 bytes per triangle
        let triangles = u32::from_le_bytes([stl[80], stl[81], stl[82], stl[83]]) as usize;
        assert!(triangles > 0);
        assert_eq!(stl.len(), 84 + 50 * triangles);
    }

    #[test]
    fn run_reports_unwritable_output() {
        let temp = tempfile::tempdir().unwrap();
        let params = single_slot_params(temp.path());
        let err = run(Args {
            params: Some(params),
            out_dir: Some(temp.path().join("missing")),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Write { .. }), "{}", err);
    }

    #[test]
    fn run_rejects_invalid_params_before_modelling() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("params.json");
        std::fs::write(&path, r#"{ "slot_count": 0 }"#).unwrap();
        let err = run(Args {
            params: Some(path),
            out_dir: Some(temp.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Model(ModelError::Config(_))));
        assert!(!temp.path().join("model.step").exists());
    }

    #[test]
    fn unknown_flag_rejected() {
        assert!(matches!(args(&["--fast"]), Err(CliError::Usage(_))));
        assert!(matches!(args(&["a.json", "b.json"]), Err(CliError::Usage(_))));
    }
}
