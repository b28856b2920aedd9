//! Render command - runs a single activation against a configured experiment

use std::sync::Arc;

use anyhow::anyhow;
use clap::Args;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::domain::{AsyncActivation, EnrollmentConfig, ExperimentContext};
use crate::infrastructure::experiment::{InMemoryExposureLedger, StaticExperiment};

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Configured experiment to enroll in
    #[arg(long)]
    pub experiment: Option<String>,

    /// Experiment name passed to the parameter lookup
    #[arg(long)]
    pub name: Option<String>,

    /// Parameter to select from the resolved set
    #[arg(long)]
    pub param: Option<String>,

    /// Visitor unit (random when omitted)
    #[arg(long)]
    pub unit: Option<String>,

    /// Skip enrollment entirely
    #[arg(long)]
    pub no_enroll: bool,
}

/// Run the activation and print the rendered view as JSON
pub async fn run(config: &AppConfig, args: RenderArgs) -> anyhow::Result<()> {
    let ledger = Arc::new(InMemoryExposureLedger::new());
    let unit = args.unit.clone().unwrap_or_else(|| Uuid::new_v4().to_string());

    let enrollment = build_enrollment(config, &args, &unit, ledger.clone())?;
    let mut activation = AsyncActivation::new(enrollment);

    match activation.render(&[view]).await {
        Some(rendered) => {
            for value in rendered {
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            activation.gate().mark_rendered();
        }
        None => info!(unit = %unit, "Nothing rendered"),
    }

    info!(unit = %unit, exposures = ledger.len(), "Activation finished");
    Ok(())
}

fn build_enrollment(
    config: &AppConfig,
    args: &RenderArgs,
    unit: &str,
    ledger: Arc<InMemoryExposureLedger>,
) -> anyhow::Result<EnrollmentConfig<StaticExperiment>> {
    let mut enrollment = EnrollmentConfig::new().with_should_enroll(!args.no_enroll);

    // A missing --experiment is left to the gate, which reports it
    if let Some(name) = &args.experiment {
        let definition = config
            .experiment(name)
            .ok_or_else(|| anyhow!("Experiment '{}' is not configured", name))?;
        enrollment = enrollment.with_experiment(Arc::new(StaticExperiment::new(
            definition.clone(),
            unit,
            ledger,
        )));
    }

    if let Some(name) = &args.name {
        enrollment = enrollment.with_experiment_name(name.clone());
    }

    if let Some(param) = &args.param {
        enrollment = enrollment.with_param_name(param.clone());
    }

    Ok(enrollment)
}

fn view(ctx: &ExperimentContext) -> Value {
    json!({
        "collaborator": ctx.props().collaborator,
        "experiment_name": ctx.props().experiment_name,
        "param": ctx.props().param_name,
        "selected": ctx.selected_param(),
        "parameters": ctx.parameters(),
    })
}
