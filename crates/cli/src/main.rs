mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use songconv_core::{
    load_config_or_default, read_header, validate_config, AdpcmEncoder, ConversionPipeline,
    ConversionRequest, Encoder,
};

use cli::{exit_code, Cli, UsageError, EXIT_OK, EXIT_USAGE};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::from(EXIT_OK)
            };
        }
    };

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config =
        load_config_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Configuration: {:?}", config);

    if !cli.input.is_file() {
        return Err(UsageError::InputMissing(cli.input.clone()).into());
    }

    if cli.print_headers {
        let header = read_header(&cli.input)
            .await
            .with_context(|| format!("Failed to parse {:?}", cli.input))?;
        println!("{}", header.report(&cli.input));
        config.pipeline.log_headers = true;
    }

    let encoder = AdpcmEncoder::new(config.encoder.clone());
    encoder
        .validate()
        .await
        .context("Encoder is not available")?;
    info!("Using encoder {:?}", config.encoder.path);

    let (loop_start, loop_end) = cli.loop_request();
    let request = ConversionRequest::new(cli.input, cli.output).with_loop(loop_start, loop_end);

    let pipeline = ConversionPipeline::new(config.pipeline, config.cache, encoder);
    let outcome = pipeline
        .run(&request)
        .await
        .with_context(|| format!("Failed to convert {:?}", request.input_path))?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?
        );
    } else {
        println!("{}", outcome);
    }

    Ok(())
}
