//! Enrollment gate
//!
//! Decides from static configuration whether an experiment is shown at all.
//! A valid configuration is turned into an [`ActivationRequest`] for a
//! parameter resolver; anything else renders nothing. Misconfiguration is
//! reported on the diagnostic channel and returned as data, never raised.

use std::fmt;

use tokio::sync::watch;
use tracing::debug;

use super::config::{ActivationRequest, EnrollmentConfig};
use super::error::EnrollmentError;
use super::flag::EnrollmentHandle;

/// Why a gate rendered nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `should_enroll` was false
    NotEnrolled,
    Misconfigured(EnrollmentError),
}

/// Outcome of evaluating a gate
pub enum RenderDecision<E: ?Sized> {
    /// Render nothing
    Skip(SkipReason),
    /// Hand the activation to a parameter resolver
    Delegate(ActivationRequest<E>),
}

impl<E: ?Sized> RenderDecision<E> {
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip(_))
    }

    pub fn diagnostic(&self) -> Option<&EnrollmentError> {
        match self {
            Self::Skip(SkipReason::Misconfigured(error)) => Some(error),
            _ => None,
        }
    }

    pub fn into_request(self) -> Option<ActivationRequest<E>> {
        match self {
            Self::Delegate(request) => Some(request),
            Self::Skip(_) => None,
        }
    }
}

impl<E: ?Sized> fmt::Debug for RenderDecision<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip(reason) => f.debug_tuple("Skip").field(reason).finish(),
            Self::Delegate(request) => f.debug_tuple("Delegate").field(request).finish(),
        }
    }
}

/// Gate for one activation
pub struct EnrollmentGate<E: ?Sized> {
    config: EnrollmentConfig<E>,
    enrollment: EnrollmentHandle,
}

impl<E: ?Sized> EnrollmentGate<E> {
    pub fn new(config: EnrollmentConfig<E>) -> Self {
        Self {
            config,
            enrollment: EnrollmentHandle::new(),
        }
    }

    pub fn config(&self) -> &EnrollmentConfig<E> {
        &self.config
    }

    /// Decide whether to render the experiment
    ///
    /// Never contacts the collaborator. Each misconfigured evaluation emits
    /// one diagnostic.
    pub fn evaluate(&self) -> RenderDecision<E> {
        if !self.config.should_enroll {
            debug!(
                experiment = self.config.experiment_name(),
                param = self.config.param_name(),
                "Enrollment disabled, rendering nothing"
            );
            return RenderDecision::Skip(SkipReason::NotEnrolled);
        }

        match self.config.validate(self.enrollment.clone()) {
            Ok(request) => RenderDecision::Delegate(request),
            Err(error) => {
                error.report(self.config.experiment_name(), self.config.param_name());
                RenderDecision::Skip(SkipReason::Misconfigured(error))
            }
        }
    }

    /// Record that the variation was rendered; later calls are no-ops
    pub fn mark_rendered(&self) -> bool {
        self.enrollment.mark_rendered()
    }

    pub fn has_rendered(&self) -> bool {
        self.enrollment.has_rendered()
    }

    /// Watch for the rendered transition, to schedule a host re-render
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.enrollment.subscribe()
    }

    pub fn handle(&self) -> EnrollmentHandle {
        self.enrollment.clone()
    }
}

impl<E: ?Sized> fmt::Debug for EnrollmentGate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrollmentGate")
            .field("config", &self.config)
            .field("has_rendered", &self.has_rendered())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::experiment::{MockExperiment, ParameterSet};
    use std::sync::Arc;

    fn mock() -> Arc<MockExperiment> {
        Arc::new(
            MockExperiment::new("checkout")
                .with_params(ParameterSet::new().with("color", "blue")),
        )
    }

    mod evaluate_tests {
        use super::*;

        #[test]
        fn test_not_enrolled_skips_without_contact() {
            let experiment = mock();
            let gate = EnrollmentGate::new(
                EnrollmentConfig::new()
                    .with_experiment(experiment.clone())
                    .with_param_name("color")
                    .with_should_enroll(false),
            );

            let decision = gate.evaluate();

            assert!(matches!(decision, RenderDecision::Skip(SkipReason::NotEnrolled)));
            assert!(decision.diagnostic().is_none());
            assert!(!experiment.contacted());
        }

        #[test]
        fn test_not_enrolled_wins_over_misconfiguration() {
            let gate = EnrollmentGate::<MockExperiment>::new(
                EnrollmentConfig::new().with_should_enroll(false),
            );

            assert!(matches!(
                gate.evaluate(),
                RenderDecision::Skip(SkipReason::NotEnrolled)
            ));
        }

        #[test]
        fn test_missing_experiment() {
            let gate =
                EnrollmentGate::<MockExperiment>::new(EnrollmentConfig::new().with_param_name("x"));

            let decision = gate.evaluate();

            assert_eq!(decision.diagnostic(), Some(&EnrollmentError::MissingExperiment));
        }

        #[test]
        fn test_missing_identifiers() {
            let experiment = mock();
            let gate =
                EnrollmentGate::new(EnrollmentConfig::new().with_experiment(experiment.clone()));

            let decision = gate.evaluate();

            assert_eq!(decision.diagnostic(), Some(&EnrollmentError::MissingIdentifier));
            assert!(!experiment.contacted());
        }

        #[test]
        fn test_valid_config_delegates() {
            let experiment = mock();
            let gate = EnrollmentGate::new(
                EnrollmentConfig::new()
                    .with_experiment(experiment.clone())
                    .with_experiment_name("checkout_button"),
            );

            let request = gate.evaluate().into_request().unwrap();

            assert_eq!(request.experiment_name.as_deref(), Some("checkout_button"));
            assert!(request.param_name.is_none());
            assert!(!request.enrollment.has_rendered());
            assert!(!experiment.contacted());
        }

        #[test]
        fn test_delegated_request_shares_exposure_flag() {
            let gate = EnrollmentGate::new(
                EnrollmentConfig::new()
                    .with_experiment(mock())
                    .with_param_name("color"),
            );

            let request = gate.evaluate().into_request().unwrap();
            request.enrollment.mark_rendered();

            assert!(gate.has_rendered());
        }
    }

    mod mark_rendered_tests {
        use super::*;

        #[test]
        fn test_mark_rendered_once() {
            let gate = EnrollmentGate::<MockExperiment>::new(EnrollmentConfig::new());
            let mut rx = gate.subscribe();

            assert!(!gate.has_rendered());
            assert!(gate.mark_rendered());
            assert!(!gate.mark_rendered());
            assert!(gate.has_rendered());

            assert!(rx.has_changed().unwrap());
            rx.borrow_and_update();
            assert!(!rx.has_changed().unwrap());
        }
    }

    mod diagnostic_tests {
        use super::*;
        use crate::domain::enrollment::error::capture::DiagnosticCapture;
        use tracing_subscriber::layer::SubscriberExt;

        #[test]
        fn test_each_evaluation_reports_once() {
            let capture = DiagnosticCapture::default();
            let subscriber = tracing_subscriber::registry().with(capture.clone());
            let gate =
                EnrollmentGate::<MockExperiment>::new(EnrollmentConfig::new().with_param_name("x"));

            tracing::subscriber::with_default(subscriber, || {
                gate.evaluate();
                gate.evaluate();
            });

            assert_eq!(
                capture.messages(),
                vec!["You must pass in an experiment instance as a prop".to_string(); 2]
            );
        }
    }
}
