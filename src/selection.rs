//! Active step set derived from the positional arguments.
use crate::steps;

/// Which steps an invocation asked for.
///
/// An empty positional list means every step. Named tokens are kept as given:
/// no dedup and no validation, membership is plain containment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    RunAll,
    RunSpecific(Vec<String>),
}

impl Selection {
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        if tokens.is_empty() {
            Selection::RunAll
        } else {
            Selection::RunSpecific(tokens)
        }
    }

    pub fn includes(&self, name: &str) -> bool {
        match self {
            Selection::RunAll => true,
            Selection::RunSpecific(tokens) => tokens.iter().any(|token| token == name),
        }
    }

    /// Tokens that match no step. They are accepted and simply never run.
    pub fn unrecognized(&self) -> Vec<&str> {
        match self {
            Selection::RunAll => Vec::new(),
            Selection::RunSpecific(tokens) => tokens
                .iter()
                .map(String::as_str)
                .filter(|token| !steps::is_known_step(token))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn empty_tokens_select_everything() {
        let selection = Selection::from_tokens(Vec::new());
        assert_eq!(selection, Selection::RunAll);
        for step in steps::STEPS {
            assert!(selection.includes(step.name));
        }
    }

    #[test]
    fn named_tokens_select_by_containment() {
        let selection = Selection::from_tokens(tokens(&["test", "build", "test"]));
        assert!(selection.includes("build"));
        assert!(selection.includes("test"));
        assert!(!selection.includes("report-dir"));
        assert!(!selection.includes("containers:up"));
    }

    #[test]
    fn membership_is_exact_not_substring() {
        let selection = Selection::from_tokens(tokens(&["containers"]));
        assert!(!selection.includes("containers:up"));
        assert!(!selection.includes("containers:down"));
    }

    #[test]
    fn unrecognized_tokens_are_reported_in_order() {
        let selection = Selection::from_tokens(tokens(&["frobnicate", "build", "TEST"]));
        assert_eq!(selection.unrecognized(), vec!["frobnicate", "TEST"]);
        assert!(Selection::RunAll.unrecognized().is_empty());
    }
}
