//! Data-driven scenario tables
//!
//! A [`ScenarioTable`] runs one scenario body over an explicit list of
//! `(input, expected)` cases. Every case is run and reported on its own: an
//! error or a panic in one case is recorded and the remaining cases still run.
//!
//! ```rust,no_run
//! use petstore_contract::assertions::{JsonShape, expect};
//! use petstore_contract::runner::ScenarioTable;
//! use petstore_contract::ApiClient;
//!
//! # async fn example(client: ApiClient) {
//! let table = ScenarioTable::new("find pets by status")
//!     .case("available", "available", (200, JsonShape::Array))
//!     .case("dash", "-", (400, JsonShape::Object));
//!
//! let report = table
//!     .run(|case| {
//!         let client = client.clone();
//!         let status = case.input;
//!         let (code, shape) = case.expected;
//!         async move {
//!             let response = client.pets().find_by_status(status).await?;
//!             expect(&response).status(code)?.shape(shape)?;
//!             Ok(())
//!         }
//!     })
//!     .await;
//!
//! report.assert_all_passed();
//! # }
//! ```

use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{Instrument, info, info_span, warn};

use crate::error::{FailureKind, Result};

/// One row of a scenario table.
#[derive(Debug, Clone)]
pub struct Case<I, E> {
    /// Sub-test name, unique within the table
    pub label: String,
    /// Input fed to the scenario body
    pub input: I,
    /// Expected outcome
    pub expected: E,
}

/// A scenario body run over many `(input, expected)` cases.
#[derive(Debug, Clone)]
pub struct ScenarioTable<I, E> {
    name: String,
    cases: Vec<Case<I, E>>,
}

impl<I, E> ScenarioTable<I, E> {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// Append a case.
    pub fn case(mut self, label: impl Into<String>, input: I, expected: E) -> Self {
        self.cases.push(Case {
            label: label.into(),
            input,
            expected,
        });
        self
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cases, in run order.
    pub fn cases(&self) -> &[Case<I, E>] {
        &self.cases
    }

    /// Run `body` once per case, sequentially, and collect every outcome.
    pub async fn run<F, Fut>(&self, mut body: F) -> TableReport
    where
        F: FnMut(&Case<I, E>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut outcomes = Vec::with_capacity(self.cases.len());

        for case in &self.cases {
            let span = info_span!("case", table = %self.name, case = %case.label);
            let outcome = async {
                let outcome = match AssertUnwindSafe(body(case)).catch_unwind().await {
                    Ok(Ok(())) => Outcome::Passed,
                    Ok(Err(e)) => Outcome::Failed {
                        kind: e.kind(),
                        message: e.to_string(),
                    },
                    // A panic says nothing about the service.
                    Err(panic) => Outcome::Failed {
                        kind: FailureKind::ExecutionError,
                        message: panic_message(panic.as_ref()),
                    },
                };
                match &outcome {
                    Outcome::Passed => info!("case passed"),
                    Outcome::Failed { kind, message } => {
                        warn!(%kind, %message, "case failed")
                    }
                }
                outcome
            }
            .instrument(span)
            .await;

            outcomes.push(CaseOutcome {
                label: case.label.clone(),
                outcome,
            });
        }

        TableReport {
            name: self.name.clone(),
            outcomes,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

/// Result of one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every check held.
    Passed,
    /// The case failed.
    Failed {
        /// Failure class
        kind: FailureKind,
        /// Human-readable failure
        message: String,
    },
}

/// Outcome of one labelled case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    /// Case label
    pub label: String,
    /// What happened
    pub outcome: Outcome,
}

/// Outcomes of a whole table run.
#[derive(Debug, Clone)]
pub struct TableReport {
    name: String,
    outcomes: Vec<CaseOutcome>,
}

impl TableReport {
    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every outcome, in run order.
    pub fn outcomes(&self) -> &[CaseOutcome] {
        &self.outcomes
    }

    /// Number of passing cases.
    pub fn passed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|c| c.outcome == Outcome::Passed)
            .count()
    }

    /// The failing cases.
    pub fn failures(&self) -> Vec<&CaseOutcome> {
        self.outcomes
            .iter()
            .filter(|c| c.outcome != Outcome::Passed)
            .collect()
    }

    /// Whether every case passed.
    pub fn all_passed(&self) -> bool {
        self.failures().is_empty()
    }

    /// Panic with the full report unless every case passed.
    pub fn assert_all_passed(&self) {
        assert!(self.all_passed(), "{self}");
    }
}

impl fmt::Display for TableReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {}/{} cases passed",
            self.name,
            self.passed(),
            self.outcomes.len()
        )?;
        for case in &self.outcomes {
            match &case.outcome {
                Outcome::Passed => writeln!(f, "  [pass] {}", case.label)?,
                Outcome::Failed { kind, message } => {
                    writeln!(f, "  [fail] {} ({kind}): {message}", case.label)?
                }
            }
        }
        Ok(())
    }
}
