//! Read-only context threaded into parametrized content

use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::flag::EnrollmentHandle;
use crate::domain::experiment::{ParamValue, ParameterSet};
use crate::domain::DomainError;

/// Activation settings visible to content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationProps {
    pub experiment_name: Option<String>,
    pub param_name: Option<String>,
    /// Name reported by the collaborator
    ///
    /// Read once per successful resolution, alongside the exposure check,
    /// whether or not an exposure ends up being logged.
    pub collaborator: String,
}

/// Everything a descendant may read about its activation
///
/// Cloning is cheap. Content that renders its own children passes the same
/// context down, so every level of nesting sees identical parameters.
#[derive(Debug, Clone)]
pub struct ExperimentContext {
    parameters: Arc<ParameterSet>,
    props: Arc<ActivationProps>,
    enrollment: EnrollmentHandle,
}

impl ExperimentContext {
    pub(crate) fn new(
        parameters: Arc<ParameterSet>,
        props: Arc<ActivationProps>,
        enrollment: EnrollmentHandle,
    ) -> Self {
        Self {
            parameters,
            props,
            enrollment,
        }
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn props(&self) -> &ActivationProps {
        &self.props
    }

    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }

    pub fn param_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DomainError> {
        self.parameters.get_as(key)
    }

    /// The value of the activation's own param, when one was requested
    pub fn selected_param(&self) -> Option<&ParamValue> {
        self.props
            .param_name
            .as_deref()
            .and_then(|name| self.parameters.get(name))
    }

    pub fn has_rendered(&self) -> bool {
        self.enrollment.has_rendered()
    }

    /// Tell the owning gate that the variation was shown
    pub fn mark_rendered(&self) -> bool {
        self.enrollment.mark_rendered()
    }
}

/// Content rendered under an experiment
pub trait Content<T> {
    fn render(&self, ctx: &ExperimentContext) -> T;
}

impl<T, F> Content<T> for F
where
    F: Fn(&ExperimentContext) -> T,
{
    fn render(&self, ctx: &ExperimentContext) -> T {
        self(ctx)
    }
}

/// Render children in order, each against the same context
pub(crate) fn render_children<T, C>(children: &[C], ctx: &ExperimentContext) -> Vec<T>
where
    C: Content<T>,
{
    children.iter().map(|child| child.render(ctx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(params: ParameterSet, param_name: Option<&str>) -> ExperimentContext {
        ExperimentContext::new(
            Arc::new(params),
            Arc::new(ActivationProps {
                experiment_name: Some("checkout".to_string()),
                param_name: param_name.map(str::to_string),
                collaborator: "checkout-namespace".to_string(),
            }),
            EnrollmentHandle::new(),
        )
    }

    type Child = Box<dyn Fn(&ExperimentContext) -> String>;

    struct Section {
        children: Vec<Child>,
    }

    impl Content<String> for Section {
        fn render(&self, ctx: &ExperimentContext) -> String {
            render_children(&self.children, ctx).join("|")
        }
    }

    #[test]
    fn test_selected_param() {
        let ctx = context(ParameterSet::new().with("color", "blue"), Some("color"));
        assert_eq!(ctx.selected_param().and_then(|v| v.as_str()), Some("blue"));

        let ctx = context(ParameterSet::new().with("color", "blue"), None);
        assert!(ctx.selected_param().is_none());
    }

    #[test]
    fn test_children_render_in_order() {
        let ctx = context(ParameterSet::new().with("color", "blue"), None);
        let children: Vec<Child> = vec![
            Box::new(|_: &ExperimentContext| "first".to_string()),
            Box::new(|ctx: &ExperimentContext| {
                ctx.parameters().get_str("color").unwrap_or_default().to_string()
            }),
            Box::new(|_: &ExperimentContext| "last".to_string()),
        ];

        let rendered = render_children(&children, &ctx);
        assert_eq!(rendered, vec!["first", "blue", "last"]);
    }

    #[test]
    fn test_nested_content_sees_parameters() {
        let ctx = context(ParameterSet::new().with("label", "Buy now"), None);

        let inner = Section {
            children: vec![Box::new(|ctx: &ExperimentContext| {
                ctx.parameters().get_str("label").unwrap_or_default().to_string()
            })],
        };
        let outer = Section {
            children: vec![
                Box::new(|_: &ExperimentContext| "header".to_string()),
                Box::new(move |ctx: &ExperimentContext| inner.render(ctx)),
            ],
        };

        assert_eq!(outer.render(&ctx), "header|Buy now");
    }

    #[test]
    fn test_content_can_mark_rendered() {
        let ctx = context(ParameterSet::new(), None);
        let child = |ctx: &ExperimentContext| ctx.mark_rendered();

        assert!(child.render(&ctx));
        assert!(!child.render(&ctx));
        assert!(ctx.has_rendered());
    }
}
