//! Parameter resolution for one activation
//!
//! A resolver starts `Unresolved`, resolves once against the collaborator and
//! then stays `Resolved`. Content is only rendered once parameters exist. The
//! exposure is logged at most once, and only when the collaborator says it
//! has definitely not been logged before.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use super::config::ActivationRequest;
use super::context::{render_children, ActivationProps, Content, ExperimentContext};
use super::error::EnrollmentError;
use crate::domain::experiment::{ExperimentCollaborator, ExposureEvent, ParameterSet};

/// Where a resolver is in its lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionState {
    Unresolved,
    Resolved(Arc<ParameterSet>),
}

impl ResolutionState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn parameters(&self) -> Option<&ParameterSet> {
        match self {
            Self::Resolved(params) => Some(params),
            Self::Unresolved => None,
        }
    }
}

/// Resolver backed by a synchronous collaborator
pub struct ParameterResolver<E: ?Sized> {
    request: ActivationRequest<E>,
    state: ResolutionState,
    context: Option<ExperimentContext>,
    attempted: bool,
    diagnostic: Option<EnrollmentError>,
}

impl<E: ?Sized> ParameterResolver<E> {
    pub fn new(request: ActivationRequest<E>) -> Self {
        Self {
            request,
            state: ResolutionState::Unresolved,
            context: None,
            attempted: false,
            diagnostic: None,
        }
    }

    pub fn state(&self) -> &ResolutionState {
        &self.state
    }

    pub fn parameters(&self) -> Option<&ParameterSet> {
        self.state.parameters()
    }

    /// The context handed to content, once resolved
    pub fn context(&self) -> Option<&ExperimentContext> {
        self.context.as_ref()
    }

    /// The diagnostic emitted when resolution could not start
    pub fn diagnostic(&self) -> Option<&EnrollmentError> {
        self.diagnostic.as_ref()
    }

    pub fn request(&self) -> &ActivationRequest<E> {
        &self.request
    }

    /// Render content against the resolved parameters
    ///
    /// Returns `None` while unresolved. Children keep their order and all see
    /// the same context.
    pub fn render<T, C>(&self, children: &[C]) -> Option<Vec<T>>
    where
        C: Content<T>,
    {
        let ctx = self.context.as_ref()?;
        Some(render_children(children, ctx))
    }

    fn fail(&mut self, error: EnrollmentError) {
        error.report(
            self.request.experiment_name.as_deref(),
            self.request.param_name.as_deref(),
        );
        self.diagnostic = Some(error);
    }

    fn settle(&mut self, params: ParameterSet, collaborator: String) -> Arc<ParameterSet> {
        let params = Arc::new(params);
        let props = ActivationProps {
            experiment_name: self.request.experiment_name.clone(),
            param_name: self.request.param_name.clone(),
            collaborator,
        };

        self.context = Some(ExperimentContext::new(
            params.clone(),
            Arc::new(props),
            self.request.enrollment.clone(),
        ));
        self.state = ResolutionState::Resolved(params.clone());
        params
    }
}

impl<E: ExperimentCollaborator + ?Sized> ParameterResolver<E> {
    /// Resolve parameters; only the first call does any work
    pub fn resolve(&mut self) -> Option<&ParameterSet> {
        if self.attempted {
            return self.state.parameters();
        }
        self.attempted = true;

        let Some(experiment) = self.request.experiment.clone() else {
            self.fail(EnrollmentError::MissingExperiment);
            return None;
        };

        let experiment_name = self.request.experiment_name.clone();
        let params = match experiment.get_params(experiment_name.as_deref()) {
            Ok(params) => params.unwrap_or_default(),
            Err(source) => {
                self.fail(source.into());
                return None;
            }
        };

        debug!(
            experiment = experiment_name.as_deref(),
            param = self.request.param_name.as_deref(),
            keys = params.len(),
            "Resolved experiment parameters"
        );

        let name = experiment.name();
        let params = self.settle(params, name.clone());

        if experiment.previously_logged() == Some(false) {
            info!(experiment = %name, "Logging exposure");
            experiment.log_exposure(ExposureEvent::new((*params).clone(), name));
        }

        self.state.parameters()
    }

    /// Resolve if needed, then render
    pub fn activate<T, C>(&mut self, children: &[C]) -> Option<Vec<T>>
    where
        C: Content<T>,
    {
        self.resolve();
        self.render(children)
    }
}

impl<E: ?Sized> fmt::Debug for ParameterResolver<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterResolver")
            .field("request", &self.request)
            .field("state", &self.state)
            .field("attempted", &self.attempted)
            .field("diagnostic", &self.diagnostic)
            .finish()
    }
}
