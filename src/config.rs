//! CLI arguments and application configuration.
//!
//! Both are resolved once at startup and passed down by value; no stage
//! reads process-wide state afterwards.

use llm_gateway::GatewayConfig;
use std::path::PathBuf;

/// Parsed command line.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Repository to analyze.
    pub repo_path: PathBuf,
    /// Re-run summarization even when the artifact already exists.
    pub force_reanalyze: bool,
    /// Re-run the section pass even when the artifact already exists.
    pub force_recomment: bool,
}

impl CliArgs {
    /// Parse `--repo-path <path> [--force-reanalyze] [--force-recomment]`.
    pub fn parse<I: Iterator<Item = String>>(mut args: I) -> Result<Self, String> {
        let _binary = args.next();
        let mut repo_path: Option<PathBuf> = None;
        let mut force_reanalyze = false;
        let mut force_recomment = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--repo-path" => {
                    repo_path = Some(PathBuf::from(
                        args.next().ok_or("--repo-path requires a value")?,
                    ));
                }
                "--force-reanalyze" => force_reanalyze = true,
                "--force-recomment" => force_recomment = true,
                other => return Err(format!("unknown argument: {other}")),
            }
        }

        let repo_path = repo_path.ok_or("missing required --repo-path <path>")?;
        Ok(Self { repo_path, force_reanalyze, force_recomment })
    }
}

/// Application-level configuration from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root directory for mirrored output trees. `WORKSPACE_DIR`, default
    /// `workspaces`.
    pub workspace_dir: PathBuf,
    /// Generation-backend configuration.
    pub gateway: GatewayConfig,
}

impl AppConfig {
    pub fn from_env() -> llm_gateway::Result<Self> {
        let workspace_dir = std::env::var("WORKSPACE_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("workspaces"));
        Ok(Self { workspace_dir, gateway: GatewayConfig::from_env()? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, String> {
        CliArgs::parse(
            std::iter::once("repo-scribe".to_string())
                .chain(args.iter().map(|s| s.to_string())),
        )
    }

    #[test]
    fn full_argument_set() {
        let args =
            parse(&["--repo-path", "/tmp/repo", "--force-reanalyze", "--force-recomment"])
                .expect("valid args");
        assert_eq!(args.repo_path, PathBuf::from("/tmp/repo"));
        assert!(args.force_reanalyze);
        assert!(args.force_recomment);
    }

    #[test]
    fn repo_path_is_required() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--force-reanalyze"]).is_err());
        assert!(parse(&["--repo-path"]).is_err());
    }

    #[test]
    fn unknown_arguments_are_rejected() {
        assert!(parse(&["--repo-path", "x", "--verbose"]).is_err());
    }
}
