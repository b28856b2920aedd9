//! Enrollment configuration

use std::fmt;
use std::sync::Arc;

use super::error::EnrollmentError;
use super::flag::EnrollmentHandle;

/// Static configuration for one activation
///
/// `E` is the collaborator type; it may be a trait object. Empty identifier
/// strings are treated as absent.
pub struct EnrollmentConfig<E: ?Sized> {
    /// Whether to enroll the visitor at all
    pub should_enroll: bool,
    pub param_name: Option<String>,
    pub experiment_name: Option<String>,
    pub experiment: Option<Arc<E>>,
}

impl<E: ?Sized> EnrollmentConfig<E> {
    /// Create a config that enrolls, with no experiment or identifiers
    pub fn new() -> Self {
        Self {
            should_enroll: true,
            param_name: None,
            experiment_name: None,
            experiment: None,
        }
    }

    pub fn with_experiment(mut self, experiment: Arc<E>) -> Self {
        self.experiment = Some(experiment);
        self
    }

    pub fn with_param_name(mut self, param_name: impl Into<String>) -> Self {
        self.param_name = Some(param_name.into());
        self
    }

    pub fn with_experiment_name(mut self, experiment_name: impl Into<String>) -> Self {
        self.experiment_name = Some(experiment_name.into());
        self
    }

    pub fn with_should_enroll(mut self, should_enroll: bool) -> Self {
        self.should_enroll = should_enroll;
        self
    }

    pub fn param_name(&self) -> Option<&str> {
        non_empty(self.param_name.as_deref())
    }

    pub fn experiment_name(&self) -> Option<&str> {
        non_empty(self.experiment_name.as_deref())
    }

    /// Check the config, producing the resolver's input
    ///
    /// Does not look at `should_enroll`; skipping enrollment is not an error.
    pub fn validate(
        &self,
        enrollment: EnrollmentHandle,
    ) -> Result<ActivationRequest<E>, EnrollmentError> {
        let experiment = self
            .experiment
            .clone()
            .ok_or(EnrollmentError::MissingExperiment)?;

        if self.param_name().is_none() && self.experiment_name().is_none() {
            return Err(EnrollmentError::MissingIdentifier);
        }

        Ok(ActivationRequest {
            experiment: Some(experiment),
            experiment_name: self.experiment_name().map(str::to_string),
            param_name: self.param_name().map(str::to_string),
            enrollment,
        })
    }
}

impl<E: ?Sized> Default for EnrollmentConfig<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> Clone for EnrollmentConfig<E> {
    fn clone(&self) -> Self {
        Self {
            should_enroll: self.should_enroll,
            param_name: self.param_name.clone(),
            experiment_name: self.experiment_name.clone(),
            experiment: self.experiment.clone(),
        }
    }
}

impl<E: ?Sized> fmt::Debug for EnrollmentConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrollmentConfig")
            .field("should_enroll", &self.should_enroll)
            .field("param_name", &self.param_name)
            .field("experiment_name", &self.experiment_name)
            .field("has_experiment", &self.experiment.is_some())
            .finish()
    }
}

/// Input handed from a gate to a parameter resolver
pub struct ActivationRequest<E: ?Sized> {
    pub experiment: Option<Arc<E>>,
    pub experiment_name: Option<String>,
    pub param_name: Option<String>,
    /// The gate's exposure flag
    pub enrollment: EnrollmentHandle,
}

impl<E: ?Sized> ActivationRequest<E> {
    /// Build a request directly, without going through a gate
    pub fn new(experiment: Option<Arc<E>>) -> Self {
        Self {
            experiment,
            experiment_name: None,
            param_name: None,
            enrollment: EnrollmentHandle::new(),
        }
    }

    pub fn with_experiment_name(mut self, experiment_name: impl Into<String>) -> Self {
        self.experiment_name = Some(experiment_name.into());
        self
    }

    pub fn with_param_name(mut self, param_name: impl Into<String>) -> Self {
        self.param_name = Some(param_name.into());
        self
    }
}

impl<E: ?Sized> fmt::Debug for ActivationRequest<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationRequest")
            .field("experiment_name", &self.experiment_name)
            .field("param_name", &self.param_name)
            .field("has_experiment", &self.experiment.is_some())
            .field("has_rendered", &self.enrollment.has_rendered())
            .finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
