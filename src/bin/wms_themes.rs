use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use clap::error::ErrorKind;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use wms_theme_merger::app::App;
use wms_theme_merger::capabilities::WmsHttpClient;
use wms_theme_merger::config::{RunConfig, public_url_from_env};

#[derive(Parser)]
#[command(name = "wms-themes")]
#[command(about = "Merge WMS GetCapabilities layers into themes.json and themesConfig.json")]
#[command(version, author)]
struct Cli {
    /// WMS GetCapabilities URL
    capabilities_url: String,

    /// Theme key used as id, name and title of the merged entry
    theme_key: String,

    /// themes.json template, seeds the store when no output exists yet
    themes_template: String,

    /// themesConfig.json template, seeds the store when no output exists yet
    config_template: String,

    /// themes.json output path
    themes_output: String,

    /// themesConfig.json output path
    config_output: String,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    if let Err(report) = run(cli) {
        eprintln!("error: {report}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = RunConfig {
        capabilities_url: cli.capabilities_url,
        theme_key: cli.theme_key,
        themes_template: Utf8PathBuf::from(cli.themes_template),
        config_template: Utf8PathBuf::from(cli.config_template),
        themes_output: Utf8PathBuf::from(cli.themes_output),
        config_output: Utf8PathBuf::from(cli.config_output),
        public_url: public_url_from_env(),
    };

    let client = WmsHttpClient::new().into_diagnostic()?;
    let app = App::new(client);
    let result = app.run(&config).into_diagnostic()?;
    tracing::info!(
        theme = %result.theme,
        layers = result.layers,
        replaced = result.replaced,
        "theme merged"
    );
    Ok(())
}
