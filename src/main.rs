use std::io::{self, Write};
use std::process;

use clap::Parser;
use jsonapi_view::{
    application::{encoder::DocumentEncoder, error::AppError},
    config::{self, CliArgs, Command},
    infra::{error::InfraError, fixtures::Fixture, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let messages = error.messages();
    if dispatcher::has_been_set() {
        error!(source = error.source_label(), causes = ?messages, "render failed");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(source = error.source_label(), causes = ?messages, "render failed");
    });
}

fn run() -> Result<(), AppError> {
    let cli_args = CliArgs::parse();
    let settings = config::load(&cli_args)?;

    telemetry::init(&settings.logging)?;

    let Command::Render(args) = &cli_args.command;
    let fixture = Fixture::load(&args.fixture)?;
    let registry = fixture.registry();
    let vars = fixture.view_vars();

    let encoder = DocumentEncoder::new(&registry, settings.render.clone());
    let body = encoder.render_with_query_log(&fixture.directives, &vars, &fixture.query_log)?;
    info!(
        fixture = %args.fixture.display(),
        bytes = body.len(),
        "rendered fixture"
    );

    if body.is_empty() {
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{body}")
        .and_then(|()| stdout.flush())
        .map_err(InfraError::from)?;
    Ok(())
}
