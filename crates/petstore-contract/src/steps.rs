//! Step narration for reporting
//!
//! A [`Scenario`] groups the logical steps of one test case under a feature
//! name. Every step is wrapped in a `step` tracing span and bracketed by
//! "begin step" / "end step" events, which is all a reporting collaborator
//! needs to rebuild the feature → scenario → step tree. The same narration is
//! also kept in memory and can be read back with [`Scenario::narration`].

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::{Instrument, info, info_span, warn};

use crate::error::{FailureKind, Result};

/// One narration marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    /// A step started.
    Begin {
        /// Step name
        name: String,
    },
    /// A step finished.
    End {
        /// Step name
        name: String,
        /// `None` if the step succeeded, otherwise how it failed
        failure: Option<FailureKind>,
        /// Wall-clock duration
        elapsed: Duration,
    },
}

/// A named test case made of steps.
#[derive(Debug)]
pub struct Scenario {
    feature: String,
    title: String,
    events: Mutex<Vec<StepEvent>>,
}

impl Scenario {
    /// Start narrating `title` under `feature`.
    pub fn new(feature: impl Into<String>, title: impl Into<String>) -> Self {
        let scenario = Self {
            feature: feature.into(),
            title: title.into(),
            events: Mutex::new(Vec::new()),
        };
        info!(feature = %scenario.feature, scenario = %scenario.title, "Scenario started");
        scenario
    }

    /// Feature name.
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Scenario title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Run `work` as a named step.
    ///
    /// The step's result is passed through untouched.
    pub async fn step<T, F>(&self, name: impl Into<String>, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let name = name.into();
        let span = info_span!(
            "step",
            feature = %self.feature,
            scenario = %self.title,
            step = %name
        );

        self.record(StepEvent::Begin { name: name.clone() });
        let started = Instant::now();

        let result = async {
            info!("begin step");
            let result = work.await;
            match &result {
                Ok(_) => info!(elapsed_ms = started.elapsed().as_millis(), "end step"),
                Err(e) => warn!(
                    elapsed_ms = started.elapsed().as_millis(),
                    kind = %e.kind(),
                    error = %e,
                    "end step"
                ),
            }
            result
        }
        .instrument(span)
        .await;

        self.record(StepEvent::End {
            name,
            failure: result.as_ref().err().map(|e| e.kind()),
            elapsed: started.elapsed(),
        });
        result
    }

    /// Events recorded so far, in order.
    pub fn narration(&self) -> Vec<StepEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Names of the steps that have started, in order.
    pub fn step_names(&self) -> Vec<String> {
        self.narration()
            .into_iter()
            .filter_map(|event| match event {
                StepEvent::Begin { name } => Some(name),
                StepEvent::End { .. } => None,
            })
            .collect()
    }

    fn record(&self, event: StepEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
