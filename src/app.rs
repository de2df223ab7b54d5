//! Main application orchestration and execution

use crate::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config, validation::ValidationLevel},
    emitter::{create_sink, DataPoint, MetricSink},
    error::{AppError, Result},
    executor::{run_probe_sequence, SequenceConfig},
    logging::{Logger, LoggerFactory},
    models::{AggregateOutcome, Config},
    output::OutputCoordinator,
    probe::{IcmpProber, ProbeSettings, Prober},
};

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::config)?;
        Ok(Self { cli })
    }

    /// Run one connectivity check
    pub async fn run(self) -> Result<AggregateOutcome> {
        let config = load_config(self.cli.clone())?;
        let warnings = validate_config(&config)?;

        let factory = LoggerFactory::new(config.clone());
        let logger = factory.create_logger("conncheck");
        logger.add_context_field("app", &config.app_name).await;

        if config.debug {
            println!("{}", crate::version_line());
            println!("\nConfiguration Summary:");
            println!("{}\n", display_config_summary(&config));
        }

        for warning in &warnings {
            let builder = match warning.level {
                ValidationLevel::Warning => logger.warn(&warning.message),
                ValidationLevel::Info => logger.info(&warning.message),
            };
            builder.field("source", "config").log().await;
        }

        let prober = IcmpProber::new(ProbeSettings::from(&config));
        let sink = create_sink(&config)?;
        let output = OutputCoordinator::from_config(&config);

        run_check(&config, &prober, sink.as_ref(), &output, &logger).await
    }
}

/// Probe, summarise and submit. Emission failures are logged and do not fail
/// the run; only an unusable configuration does.
pub async fn run_check(
    config: &Config,
    prober: &dyn Prober,
    sink: &dyn MetricSink,
    output: &OutputCoordinator,
    logger: &Logger,
) -> Result<AggregateOutcome> {
    let destinations = config.destinations()?;
    println!("{}", output.display_start(&config.app_name, destinations.as_slice())?);

    logger
        .info("Starting probe sequence")
        .field("probe_count", config.ping_count)
        .field("delay_seconds", config.delay_seconds)
        .field("destinations", destinations.len())
        .log()
        .await;

    let outcome = run_probe_sequence(
        prober,
        destinations.as_slice(),
        SequenceConfig::from(config),
        logger,
    )
    .await?;

    println!("\n{}", output.display_outcome(&outcome)?);

    let point = DataPoint::from_outcome(&outcome, config);
    println!("{}", output.display_datapoint(&point, sink.name())?);

    let emitted = sink.emit(std::slice::from_ref(&point)).await;
    let status = output.display_emission(sink.name(), &emitted)?;
    match emitted {
        Ok(()) => {
            println!("{}", status);
            logger
                .info("Datapoint submitted")
                .field("sink", sink.name())
                .field("value", point.value)
                .field("failed", outcome.failure_count)
                .log()
                .await;
        }
        Err(e) => {
            eprintln!("{}", status);
            let context = format!("Failed to submit datapoint to {}", sink.name());
            logger.log_error(&e, Some(context.as_str())).await;
        }
    }

    Ok(outcome)
}
