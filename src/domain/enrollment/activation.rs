//! A gate and its resolver, driven by repeated host renders

use std::fmt;

use super::config::EnrollmentConfig;
use super::context::Content;
use super::error::EnrollmentError;
use super::flag::EnrollmentHandle;
use super::gate::{EnrollmentGate, RenderDecision, SkipReason};
use super::resolver::{ParameterResolver, ResolutionState};
use crate::domain::experiment::ExperimentCollaborator;

/// What the first render decided
pub(crate) enum Mounted<R> {
    Pending,
    Skipped(SkipReason),
    Delegated(R),
}

impl<R> Mounted<R> {
    pub(crate) fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Skipped(reason) => Some(reason),
            _ => None,
        }
    }

    pub(crate) fn resolver(&self) -> Option<&R> {
        match self {
            Self::Delegated(resolver) => Some(resolver),
            _ => None,
        }
    }
}

/// One enrollment lifecycle
///
/// The first `render` evaluates the gate and, when allowed, resolves
/// parameters. Later renders reuse that outcome, so the collaborator is asked
/// for parameters once however often the host re-renders.
pub struct Activation<E: ?Sized> {
    gate: EnrollmentGate<E>,
    mounted: Mounted<ParameterResolver<E>>,
}

impl<E: ?Sized> Activation<E> {
    pub fn new(config: EnrollmentConfig<E>) -> Self {
        Self {
            gate: EnrollmentGate::new(config),
            mounted: Mounted::Pending,
        }
    }

    pub fn gate(&self) -> &EnrollmentGate<E> {
        &self.gate
    }

    pub fn handle(&self) -> EnrollmentHandle {
        self.gate.handle()
    }

    pub fn resolver(&self) -> Option<&ParameterResolver<E>> {
        self.mounted.resolver()
    }

    /// Why nothing renders, if the gate refused
    pub fn skip_reason(&self) -> Option<&SkipReason> {
        self.mounted.skip_reason()
    }

    /// The diagnostic from the gate or the resolver, if any
    pub fn diagnostic(&self) -> Option<&EnrollmentError> {
        match &self.mounted {
            Mounted::Skipped(SkipReason::Misconfigured(error)) => Some(error),
            Mounted::Delegated(resolver) => resolver.diagnostic(),
            _ => None,
        }
    }

    pub fn state(&self) -> ResolutionState {
        self.resolver()
            .map(|resolver| resolver.state().clone())
            .unwrap_or(ResolutionState::Unresolved)
    }
}

impl<E: ExperimentCollaborator + ?Sized> Activation<E> {
    /// Render children; `None` means render nothing
    pub fn render<T, C>(&mut self, children: &[C]) -> Option<Vec<T>>
    where
        C: Content<T>,
    {
        if let Mounted::Pending = self.mounted {
            self.mounted = match self.gate.evaluate() {
                RenderDecision::Skip(reason) => Mounted::Skipped(reason),
                RenderDecision::Delegate(request) => {
                    let mut resolver = ParameterResolver::new(request);
                    resolver.resolve();
                    Mounted::Delegated(resolver)
                }
            };
        }

        self.mounted.resolver()?.render(children)
    }
}

impl<E: ?Sized> fmt::Debug for Activation<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activation")
            .field("gate", &self.gate)
            .field("skip_reason", &self.skip_reason())
            .field("resolver", &self.resolver())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrollment::ExperimentContext;
    use crate::domain::experiment::{ExposureEvent, MockExperiment, ParameterSet};
    use std::sync::Arc;

    fn button(ctx: &ExperimentContext) -> String {
        format!(
            "button:{}",
            ctx.parameters().get_str("color").unwrap_or("default")
        )
    }

    fn checkout() -> Arc<MockExperiment> {
        Arc::new(
            MockExperiment::new("checkout")
                .with_params(ParameterSet::new().with("color", "blue")),
        )
    }

    #[test]
    fn test_checkout_button_scenario() {
        let experiment = checkout();
        let mut activation = Activation::new(
            EnrollmentConfig::new()
                .with_experiment(experiment.clone())
                .with_experiment_name("checkout_button"),
        );

        let rendered = activation.render(&[button]);

        assert_eq!(rendered, Some(vec!["button:blue".to_string()]));
        assert!(activation.state().is_resolved());
        assert_eq!(
            experiment.exposures(),
            vec![ExposureEvent::new(
                ParameterSet::new().with("color", "blue"),
                "checkout"
            )]
        );
    }

    #[test]
    fn test_host_rerenders_resolve_once() {
        let experiment = checkout();
        let mut activation = Activation::new(
            EnrollmentConfig::new()
                .with_experiment(experiment.clone())
                .with_param_name("color"),
        );

        for _ in 0..10 {
            assert!(activation.render(&[button]).is_some());
        }

        assert_eq!(experiment.get_params_calls(), 1);
        assert_eq!(experiment.exposures().len(), 1);
    }

    #[test]
    fn test_not_enrolled_never_contacts_collaborator() {
        let experiment = checkout();
        let mut activation = Activation::new(
            EnrollmentConfig::new()
                .with_experiment(experiment.clone())
                .with_param_name("color")
                .with_should_enroll(false),
        );

        assert_eq!(activation.render(&[button]), None);
        assert_eq!(activation.skip_reason(), Some(&SkipReason::NotEnrolled));
        assert!(activation.diagnostic().is_none());
        assert!(!experiment.contacted());
    }

    #[test]
    fn test_missing_experiment_scenario() {
        let mut activation =
            Activation::<MockExperiment>::new(EnrollmentConfig::new().with_param_name("x"));

        assert_eq!(activation.render(&[button]), None);
        assert_eq!(activation.render(&[button]), None);
        assert_eq!(activation.diagnostic(), Some(&EnrollmentError::MissingExperiment));
        assert_eq!(activation.state(), ResolutionState::Unresolved);
    }

    #[test]
    fn test_missing_identifiers_renders_nothing() {
        let experiment = checkout();
        let mut activation =
            Activation::new(EnrollmentConfig::new().with_experiment(experiment.clone()));

        assert_eq!(activation.render(&[button]), None);
        assert_eq!(activation.diagnostic(), Some(&EnrollmentError::MissingIdentifier));
        assert!(!experiment.contacted());
    }

    #[test]
    fn test_content_marks_gate_rendered() {
        let mut activation = Activation::new(
            EnrollmentConfig::new()
                .with_experiment(checkout())
                .with_param_name("color"),
        );
        let mut rx = activation.gate().subscribe();
        let shown = |ctx: &ExperimentContext| ctx.mark_rendered();

        assert_eq!(activation.render(&[shown]), Some(vec![true]));
        assert_eq!(activation.render(&[shown]), Some(vec![false]));
        assert!(activation.gate().has_rendered());
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());
    }

    mod diagnostic_tests {
        use super::*;
        use crate::domain::enrollment::error::capture::DiagnosticCapture;
        use crate::domain::experiment::ParamlessExperiment;
        use tracing_subscriber::layer::SubscriberExt;

        const MISSING_EXPERIMENT: &str = "You must pass in an experiment instance as a prop";

        fn errors_after_renders<E: ExperimentCollaborator + ?Sized>(
            config: EnrollmentConfig<E>,
            renders: usize,
        ) -> Vec<String> {
            let capture = DiagnosticCapture::default();
            let subscriber = tracing_subscriber::registry().with(capture.clone());

            tracing::subscriber::with_default(subscriber, || {
                let mut activation = Activation::new(config);
                for _ in 0..renders {
                    assert_eq!(activation.render(&[button]), None);
                }
            });

            capture.messages()
        }

        #[test]
        fn test_missing_experiment_reported_once() {
            let errors = errors_after_renders(
                EnrollmentConfig::<MockExperiment>::new().with_param_name("color"),
                5,
            );

            assert_eq!(errors, vec![MISSING_EXPERIMENT.to_string()]);
        }

        #[test]
        fn test_missing_identifier_reported_once() {
            let errors = errors_after_renders(EnrollmentConfig::new().with_experiment(checkout()), 5);

            assert_eq!(
                errors,
                vec!["You must pass in either a param name or experiment name as a prop".to_string()]
            );
        }

        #[test]
        fn test_collaborator_without_params_reported_once() {
            let errors = errors_after_renders(
                EnrollmentConfig::new()
                    .with_experiment(Arc::new(ParamlessExperiment))
                    .with_param_name("color"),
                5,
            );

            assert_eq!(errors, vec![MISSING_EXPERIMENT.to_string()]);
        }

        #[test]
        fn test_outage_reported_once() {
            let experiment = Arc::new(MockExperiment::new("checkout").with_outage("timeout"));
            let errors = errors_after_renders(
                EnrollmentConfig::new()
                    .with_experiment(experiment.clone())
                    .with_param_name("color"),
                5,
            );

            assert_eq!(
                errors,
                vec![
                    "Could not resolve experiment parameters: Collaborator unavailable: timeout"
                        .to_string()
                ]
            );
            assert_eq!(experiment.get_params_calls(), 1);
        }

        #[test]
        fn test_valid_and_disabled_activations_report_nothing() {
            let capture = DiagnosticCapture::default();
            let subscriber = tracing_subscriber::registry().with(capture.clone());

            tracing::subscriber::with_default(subscriber, || {
                let mut shown = Activation::new(
                    EnrollmentConfig::new()
                        .with_experiment(checkout())
                        .with_param_name("color"),
                );
                let mut disabled = Activation::<MockExperiment>::new(
                    EnrollmentConfig::new().with_should_enroll(false),
                );

                for _ in 0..3 {
                    assert!(shown.render(&[button]).is_some());
                    assert_eq!(disabled.render(&[button]), None);
                }
            });

            assert!(capture.messages().is_empty());
        }
    }
}
