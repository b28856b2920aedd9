//! Parameter resolution against an asynchronous collaborator
//!
//! The Resolved transition waits for `get_params` to finish; until then
//! nothing renders. Concurrent and repeated `resolve` calls share a single
//! fetch, so the exposure is still logged at most once per activation.

use std::fmt;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::activation::Mounted;
use super::config::{ActivationRequest, EnrollmentConfig};
use super::context::{render_children, ActivationProps, Content, ExperimentContext};
use super::error::EnrollmentError;
use super::gate::{EnrollmentGate, RenderDecision, SkipReason};
use super::resolver::ResolutionState;
use crate::domain::experiment::{AsyncExperimentCollaborator, ExposureEvent, ParameterSet};

enum Outcome {
    Resolved {
        params: Arc<ParameterSet>,
        context: ExperimentContext,
    },
    Failed(EnrollmentError),
}

/// Resolver backed by an asynchronous collaborator
pub struct AsyncParameterResolver<E: ?Sized> {
    request: ActivationRequest<E>,
    outcome: OnceCell<Outcome>,
}

impl<E: ?Sized> AsyncParameterResolver<E> {
    pub fn new(request: ActivationRequest<E>) -> Self {
        Self {
            request,
            outcome: OnceCell::new(),
        }
    }

    /// Current state; `Unresolved` while a fetch is still in flight
    pub fn state(&self) -> ResolutionState {
        match self.outcome.get() {
            Some(Outcome::Resolved { params, .. }) => ResolutionState::Resolved(params.clone()),
            _ => ResolutionState::Unresolved,
        }
    }

    pub fn context(&self) -> Option<&ExperimentContext> {
        match self.outcome.get() {
            Some(Outcome::Resolved { context, .. }) => Some(context),
            _ => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&EnrollmentError> {
        match self.outcome.get() {
            Some(Outcome::Failed(error)) => Some(error),
            _ => None,
        }
    }

    /// Render content if resolution already completed
    pub fn render<T, C>(&self, children: &[C]) -> Option<Vec<T>>
    where
        C: Content<T>,
    {
        let ctx = self.context()?;
        Some(render_children(children, ctx))
    }

    fn fail(&self, error: EnrollmentError) -> Outcome {
        error.report(
            self.request.experiment_name.as_deref(),
            self.request.param_name.as_deref(),
        );
        Outcome::Failed(error)
    }
}

impl<E: AsyncExperimentCollaborator + ?Sized> AsyncParameterResolver<E> {
    /// Resolve parameters, waiting for an in-flight fetch if there is one
    pub async fn resolve(&self) -> Option<&ParameterSet> {
        match self.outcome.get_or_init(|| self.fetch()).await {
            Outcome::Resolved { params, .. } => Some(params),
            Outcome::Failed(_) => None,
        }
    }

    /// Resolve, then render
    pub async fn activate<T, C>(&self, children: &[C]) -> Option<Vec<T>>
    where
        C: Content<T>,
    {
        self.resolve().await?;
        self.render(children)
    }

    async fn fetch(&self) -> Outcome {
        let Some(experiment) = self.request.experiment.clone() else {
            return self.fail(EnrollmentError::MissingExperiment);
        };

        let experiment_name = self.request.experiment_name.as_deref();
        let params = match experiment.get_params(experiment_name).await {
            Ok(params) => Arc::new(params.unwrap_or_default()),
            Err(source) => return self.fail(source.into()),
        };

        debug!(
            experiment = experiment_name,
            param = self.request.param_name.as_deref(),
            keys = params.len(),
            "Resolved experiment parameters"
        );

        let name = experiment.name();
        let context = ExperimentContext::new(
            params.clone(),
            Arc::new(ActivationProps {
                experiment_name: self.request.experiment_name.clone(),
                param_name: self.request.param_name.clone(),
                collaborator: name.clone(),
            }),
            self.request.enrollment.clone(),
        );

        if experiment.previously_logged().await == Some(false) {
            info!(experiment = %name, "Logging exposure");
            experiment
                .log_exposure(ExposureEvent::new((*params).clone(), name))
                .await;
        }

        Outcome::Resolved { params, context }
    }
}

impl<E: ?Sized> fmt::Debug for AsyncParameterResolver<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncParameterResolver")
            .field("request", &self.request)
            .field("state", &self.state())
            .field("diagnostic", &self.diagnostic())
            .finish()
    }
}

/// Asynchronous counterpart of [`Activation`](super::Activation)
pub struct AsyncActivation<E: ?Sized> {
    gate: EnrollmentGate<E>,
    mounted: Mounted<AsyncParameterResolver<E>>,
}

impl<E: ?Sized> AsyncActivation<E> {
    pub fn new(config: EnrollmentConfig<E>) -> Self {
        Self {
            gate: EnrollmentGate::new(config),
            mounted: Mounted::Pending,
        }
    }

    pub fn gate(&self) -> &EnrollmentGate<E> {
        &self.gate
    }

    pub fn resolver(&self) -> Option<&AsyncParameterResolver<E>> {
        self.mounted.resolver()
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        self.mounted.skip_reason()
    }

    pub fn diagnostic(&self) -> Option<&EnrollmentError> {
        match &self.mounted {
            Mounted::Skipped(SkipReason::Misconfigured(error)) => Some(error),
            Mounted::Delegated(resolver) => resolver.diagnostic(),
            _ => None,
        }
    }

    pub fn state(&self) -> ResolutionState {
        self.resolver()
            .map(AsyncParameterResolver::state)
            .unwrap_or(ResolutionState::Unresolved)
    }
}

impl<E: AsyncExperimentCollaborator + ?Sized> AsyncActivation<E> {
    /// Render children; `None` means render nothing
    pub async fn render<T, C>(&mut self, children: &[C]) -> Option<Vec<T>>
    where
        C: Content<T>,
    {
        if let Mounted::Pending = self.mounted {
            self.mounted = match self.gate.evaluate() {
                RenderDecision::Skip(reason) => Mounted::Skipped(reason),
                RenderDecision::Delegate(request) => {
                    Mounted::Delegated(AsyncParameterResolver::new(request))
                }
            };
        }

        self.mounted.resolver()?.activate(children).await
    }
}

impl<E: ?Sized> fmt::Debug for AsyncActivation<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncActivation")
            .field("gate", &self.gate)
            .field("skip_reason", &self.skip_reason())
            .field("resolver", &self.resolver())
            .finish()
    }
}
