mod app;
mod platform;

use std::path::PathBuf;
use std::process::ExitCode;

use blogfilter_core::{MatchPolicy, RenderMode};

use crate::app::AppOptions;
use crate::platform::logging::{self, LogDestination};

const USAGE: &str = "usage: blogfilter_app <base-url> [--state-dir DIR] [--page-url URL] \
     [--render-mode toggle|paginated] [--ignore-case] [--output FILE]";

fn main() -> ExitCode {
    let (base_url, options) = match parse_args(std::env::args().skip(1)) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    logging::initialize(LogDestination::Both);
    app::run(base_url, options)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(String, AppOptions), String> {
    let mut base_url = None;
    let mut options = AppOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--state-dir" => {
                options.state_dir = PathBuf::from(flag_value(&mut args, "--state-dir")?);
            }
            "--page-url" => options.page_url = Some(flag_value(&mut args, "--page-url")?),
            "--output" => options.output_filename = flag_value(&mut args, "--output")?,
            "--render-mode" => match flag_value(&mut args, "--render-mode")?.as_str() {
                "toggle" => options.render_mode = RenderMode::ToggleVisibility,
                "paginated" => options.render_mode = RenderMode::PaginatedRerender,
                other => {
                    return Err(format!(
                        "unknown render mode {other} (expected toggle|paginated)"
                    ));
                }
            },
            "--ignore-case" => options.match_policy = MatchPolicy::CaseInsensitive,
            other if base_url.is_none() && !other.starts_with("--") => {
                base_url = Some(other.to_string());
            }
            other => return Err(format!("unknown argument {other}")),
        }
    }

    match base_url {
        Some(base_url) => Ok((base_url, options)),
        None => Err("missing <base-url>".to_string()),
    }
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("missing value for {flag}"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use blogfilter_core::{MatchPolicy, RenderMode};

    use crate::app::AppOptions;

    fn parse(args: &[&str]) -> Result<(String, AppOptions), String> {
        super::parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_base_url_and_flags() {
        let (base_url, options) = parse(&[
            "https://shop.example",
            "--state-dir",
            "/tmp/bf",
            "--render-mode",
            "toggle",
            "--ignore-case",
        ])
        .expect("valid args");

        assert_eq!(base_url, "https://shop.example");
        assert_eq!(options.state_dir, PathBuf::from("/tmp/bf"));
        assert_eq!(options.render_mode, RenderMode::ToggleVisibility);
        assert_eq!(options.match_policy, MatchPolicy::CaseInsensitive);
    }

    #[test]
    fn trailing_flag_without_a_value_is_an_error() {
        let err = parse(&["https://shop.example", "--state-dir"]).unwrap_err();
        assert!(err.contains("--state-dir"));

        let err = parse(&["https://shop.example", "--render-mode"]).unwrap_err();
        assert!(err.contains("--render-mode"));
    }

    #[test]
    fn missing_base_url_is_an_error() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--ignore-case"]).is_err());
    }

    #[test]
    fn unknown_arguments_are_rejected() {
        assert!(parse(&["https://shop.example", "--bogus"]).is_err());
        assert!(parse(&["https://shop.example", "--render-mode", "both"]).is_err());
    }
}
