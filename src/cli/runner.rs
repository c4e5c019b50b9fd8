use tracing::info;
use tracing_subscriber::EnvFilter;

use burnmap::{AcquisitionPaths, BurnParams, OutputConfig, run_to_directory};

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Preset (or defaults) with explicit flags applied on top.
fn resolve_params(args: &CliArgs) -> Result<BurnParams, AppError> {
    let mut params = match &args.params {
        Some(path) => BurnParams::from_json_file(path)?,
        None => BurnParams::default(),
    };
    if let Some(v) = args.visual {
        params.visual = v;
    }
    if let Some(f) = args.image_format {
        params.image_format = f;
    }
    if let Some(t) = args.change_threshold {
        params.change_threshold = t;
    }
    if let Some(t) = args.burn_threshold {
        params.burn_threshold = t;
    }
    if args.prj {
        params.write_prj = true;
    }
    Ok(params)
}

/// UTC timestamp plus process id, so concurrent runs sharing an output
/// directory do not pick the same artifact names.
fn default_tag() -> String {
    format!(
        "{}_{}",
        chrono::Utc::now().format("%Y%m%dT%H%M%S%3fZ"),
        std::process::id()
    )
}

pub fn run(args: CliArgs) -> Result<(), AppError> {
    if args.log {
        init_logging();
    }

    let params = resolve_params(&args)?;
    let tag = args.tag.clone().unwrap_or_else(default_tag);

    let pre = AcquisitionPaths {
        nir: args.pre_nir,
        swir: args.pre_swir,
        qa: args.pre_qa,
    };
    let post = AcquisitionPaths {
        nir: args.post_nir,
        swir: args.post_swir,
        qa: args.post_qa,
    };
    let output = OutputConfig::new(args.output_dir);

    info!("Starting run '{}' into {:?}", tag, output.output_dir);
    let report = run_to_directory(&pre, &post, &params, &output, &tag)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use burnmap::VisualKind;
    use clap::Parser;

    fn base() -> Vec<&'static str> {
        vec![
            "burnmap",
            "--pre-nir", "a_B5.TIF",
            "--pre-swir", "a_B7.TIF",
            "--pre-qa", "a_QA.TIF",
            "--post-nir", "b_B5.TIF",
            "--post-swir", "b_B7.TIF",
            "--post-qa", "b_QA.TIF",
            "--output-dir", "out",
        ]
    }

    #[test]
    fn flags_override_defaults() {
        let mut argv = base();
        argv.extend(["--visual", "burn-only", "--burn-threshold", "0.15", "--prj"]);
        let args = CliArgs::try_parse_from(argv).unwrap();
        let params = resolve_params(&args).unwrap();
        assert_eq!(params.visual, VisualKind::BurnOnly);
        assert_eq!(params.burn_threshold, 0.15);
        assert_eq!(params.change_threshold, 0.27);
        assert!(params.write_prj);
    }

    #[test]
    fn default_tag_is_valid_and_per_process() {
        let tag = default_tag();
        assert!(burnmap::validate_tag(&tag).is_ok(), "{tag}");
        assert!(tag.ends_with(&format!("_{}", std::process::id())));
    }

    #[test]
    fn band_paths_are_required() {
        assert!(CliArgs::try_parse_from(["burnmap", "--output-dir", "out"]).is_err());
    }
}
