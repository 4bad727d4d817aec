mod runtime;

use anyhow::Context as _;
use clap::Parser;
use colored::Colorize;
use fabricflow_auth::{AuthError, resolve_credential};
use fabricflow_core::{DeployError, DeploymentSummary, Environment, ErrorKind};
use fabricflow_deploy::{
    FabricCicd, RESULTS_FILENAME, configure_backend, print_header, print_summary,
    run_deployment_pipeline, write_report,
};
use runtime::RuntimeConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "fabric-deploy")]
#[command(version)]
#[command(about = "Microsoft Fabric の全ワークスペースを一括デプロイ", long_about = None)]
struct Cli {
    /// ワークスペースフォルダを含むルートディレクトリ
    #[arg(
        long = "workspaces_directory",
        visible_alias = "workspaces-directory",
        env = "FABRIC_WORKSPACES_DIR"
    )]
    workspaces_directory: PathBuf,

    /// デプロイ先の環境
    #[arg(long, env = "FABRIC_ENVIRONMENT", value_parser = ["dev", "test", "prod"])]
    environment: String,

    /// デプロイ結果(JSON)の出力先
    #[arg(long, default_value = RESULTS_FILENAME)]
    results_file: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help / --version は成功扱い、引数エラーは他の失敗と同じ終了コード
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // ログはstderrへ（RUST_LOG 未設定時は出力しない）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let runtime = RuntimeConfig::from_env();
    tracing::debug!(?runtime, "Runtime configuration");

    print_header(&cli.environment, &cli.workspaces_directory);

    match run(&cli, &runtime).await {
        Ok(summary) if summary.all_succeeded() => {
            println!();
            println!(
                "{}",
                format!(
                    "All {} workspace(s) deployed successfully!",
                    summary.successful_count()
                )
                .green()
                .bold()
            );
            println!();
            ExitCode::SUCCESS
        }
        Ok(summary) => {
            println!();
            println!(
                "{}",
                format!(
                    "Deployment completed with {} failure(s)",
                    summary.failed_count()
                )
                .yellow()
                .bold()
            );
            println!();
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!();
            eprintln!("{} {}: {}", "[FAIL]".red().bold(), error_label(&e), e);
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

/// 環境検証 → 認証 → デプロイ → 結果出力
async fn run(cli: &Cli, runtime: &RuntimeConfig) -> anyhow::Result<DeploymentSummary> {
    // clap の選択肢に加えて、ここでも検証する
    let environment = Environment::from_str(&cli.environment)?;

    let credential = resolve_credential()?;
    println!(
        "-> Using {} for authentication",
        credential.kind().to_string().cyan()
    );
    if runtime.ci {
        tracing::info!("Running in GitHub Actions");
    }

    let mut backend = FabricCicd::new(runtime.python.as_str());
    configure_backend(&mut backend, runtime.sdk_debug);

    let summary =
        run_deployment_pipeline(&backend, &cli.workspaces_directory, environment, &credential)
            .await?;

    write_report(&summary, &cli.results_file).with_context(|| {
        format!(
            "Failed to write deployment results to {}",
            cli.results_file.display()
        )
    })?;
    println!();
    println!(
        "-> Deployment results written to {}",
        cli.results_file.display()
    );

    print_summary(&summary);
    Ok(summary)
}

/// バッチ開始前の入力・設定エラーか、それ以外の想定外エラーか
fn error_label(error: &anyhow::Error) -> &'static str {
    if let Some(e) = error.downcast_ref::<DeployError>() {
        if e.kind() != ErrorKind::Io {
            return "VALIDATION ERROR";
        }
    }
    if let Some(e) = error.downcast_ref::<AuthError>() {
        if e.is_configuration() {
            return "VALIDATION ERROR";
        }
    }
    "CRITICAL ERROR"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_cli_parses_underscore_flag() {
        let cli = Cli::try_parse_from([
            "fabric-deploy",
            "--workspaces_directory",
            "workspaces",
            "--environment",
            "dev",
        ])
        .unwrap();
        assert_eq!(cli.workspaces_directory, Path::new("workspaces"));
        assert_eq!(cli.environment, "dev");
        assert_eq!(cli.results_file, Path::new("deployment-results.json"));
    }

    #[test]
    fn test_cli_accepts_kebab_alias() {
        let cli = Cli::try_parse_from([
            "fabric-deploy",
            "--workspaces-directory",
            "ws",
            "--environment",
            "prod",
            "--results-file",
            "out.json",
        ])
        .unwrap();
        assert_eq!(cli.workspaces_directory, Path::new("ws"));
        assert_eq!(cli.results_file, Path::new("out.json"));
    }

    #[test]
    fn test_cli_rejects_unknown_environment() {
        let result = Cli::try_parse_from([
            "fabric-deploy",
            "--workspaces_directory",
            "ws",
            "--environment",
            "staging",
        ]);
        assert!(result.is_err());

        // 選択肢は大文字小文字を区別する
        let result = Cli::try_parse_from([
            "fabric-deploy",
            "--workspaces_directory",
            "ws",
            "--environment",
            "DEV",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_error_label() {
        let err = anyhow::Error::from(DeployError::WorkspacesDirNotFound(PathBuf::from("x")));
        assert_eq!(error_label(&err), "VALIDATION ERROR");

        let err = anyhow::Error::from(AuthError::MissingCredentials {
            hint: "missing".into(),
            missing: vec!["AZURE_CLIENT_ID"],
        });
        assert_eq!(error_label(&err), "VALIDATION ERROR");

        let err = anyhow::Error::from(AuthError::AzureCliNotFound);
        assert_eq!(error_label(&err), "CRITICAL ERROR");

        let err = anyhow::Error::from(std::io::Error::other("disk full"))
            .context("Failed to write deployment results");
        assert_eq!(error_label(&err), "CRITICAL ERROR");
    }
}
