//! Runs request documents and flows by name.

use futures_util::future::{try_join_all, BoxFuture};
use serde_json::Value;

use super::error::RunError;
use super::expr::Scope;
use super::script::{FlowScript, InvokeStep, ParallelStep, Step};
use crate::executor::Transport;
use crate::models::{RequestDocument, StepResult};
use crate::parser::parse_document;
use crate::variables::{merge_layers, resolve_document, Notice, VariableLayer};
use crate::workspace::{Catalog, Target};

/// How many flows may be nested inside the top-level one.
pub const MAX_NESTING_DEPTH: usize = 16;

/// A request that was resolved and sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    /// The document as it went on the wire.
    pub request: RequestDocument,
    pub notices: Vec<Notice>,
    pub result: StepResult,
}

/// What running a top-level target produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Response(Exchange),
    Completed { flow: String, value: Value },
}

/// Looks targets up in a [`Catalog`] and sends requests over a
/// [`Transport`], resolving variables with precedence
/// config < invocation < flow overlay.
pub struct Orchestrator<'a> {
    catalog: &'a dyn Catalog,
    transport: &'a dyn Transport,
    config: VariableLayer,
    invocation: VariableLayer,
}

impl<'a> Orchestrator<'a> {
    pub fn new(catalog: &'a dyn Catalog, transport: &'a dyn Transport) -> Self {
        Self {
            catalog,
            transport,
            config: VariableLayer::new(),
            invocation: VariableLayer::new(),
        }
    }

    /// Sets the lowest-precedence layer, usually `.reqrc` `[variables]`.
    pub fn with_config(mut self, config: VariableLayer) -> Self {
        self.config = config;
        self
    }

    /// Sets the layer given on the command line.
    pub fn with_invocation(mut self, invocation: VariableLayer) -> Self {
        self.invocation = invocation;
        self
    }

    /// Runs a target by name with no overlay.
    pub async fn run(&self, name: &str) -> Result<Outcome, RunError> {
        let overlay = VariableLayer::new();
        match self.catalog.lookup(name)? {
            Target::Request { name, source } => self
                .send_request(&name, &source, &overlay)
                .await
                .map(Outcome::Response),
            Target::Flow { name, source } => {
                let value = self.run_flow(&name, &source, overlay, 0).await?;
                Ok(Outcome::Completed { flow: name, value })
            }
        }
    }

    /// Runs a target on behalf of a flow and returns its value: a request's
    /// [`StepResult`] as JSON, or a nested flow's `complete` value.
    pub fn invoke<'s>(
        &'s self,
        target: &'s str,
        overlay: VariableLayer,
        depth: usize,
    ) -> BoxFuture<'s, Result<Value, RunError>> {
        Box::pin(async move {
            match self.catalog.lookup(target)? {
                Target::Request { name, source } => {
                    let exchange = self.send_request(&name, &source, &overlay).await?;
                    for notice in &exchange.notices {
                        log::warn!("{}: {}", name, notice);
                    }
                    Ok(exchange.result.to_value())
                }
                Target::Flow { name, source } => {
                    self.run_flow(&name, &source, overlay, depth).await
                }
            }
        })
    }

    async fn send_request(
        &self,
        name: &str,
        source: &str,
        overlay: &VariableLayer,
    ) -> Result<Exchange, RunError> {
        let document = parse_document(source).map_err(|source| RunError::Parse {
            target: name.to_string(),
            source,
        })?;

        let resolution = resolve_document(&document, &[&self.config, &self.invocation, overlay]);

        let result = self
            .transport
            .send(&resolution.document)
            .await
            .map_err(|source| RunError::Transport {
                target: name.to_string(),
                source,
            })?;

        log::info!(
            "{} {} {} -> {}",
            name,
            resolution.document.method,
            resolution.document.url,
            result.status
        );

        Ok(Exchange {
            request: resolution.document,
            notices: resolution.notices,
            result,
        })
    }

    fn run_flow<'s>(
        &'s self,
        name: &'s str,
        source: &'s str,
        overlay: VariableLayer,
        depth: usize,
    ) -> BoxFuture<'s, Result<Value, RunError>> {
        Box::pin(async move {
            if depth > MAX_NESTING_DEPTH {
                return Err(RunError::NestingTooDeep {
                    flow: name.to_string(),
                    limit: MAX_NESTING_DEPTH,
                });
            }

            log::info!("Starting flow {} (depth {})", name, depth);

            match self.execute_flow(name, source, &overlay, depth).await {
                Ok(value) => {
                    log::info!("Flow {} completed", name);
                    Ok(value)
                }
                Err(e) => {
                    log::error!("Flow {} aborted: {}", name, e);
                    Err(RunError::FlowAborted {
                        flow: name.to_string(),
                        source: Box::new(e),
                    })
                }
            }
        })
    }

    async fn execute_flow(
        &self,
        flow: &str,
        source: &str,
        overlay: &VariableLayer,
        depth: usize,
    ) -> Result<Value, RunError> {
        let script = FlowScript::parse(source).map_err(|source| RunError::Script {
            flow: flow.to_string(),
            source,
        })?;

        let mut scope = Scope::new(&merge_layers(&[&self.config, &self.invocation, overlay]));

        for (index, step) in script.steps.iter().enumerate() {
            match step {
                Step::Invoke(invoke) => {
                    log::debug!("Flow {} step {}: {}", flow, index, invoke.invoke);
                    let value = self.run_step(flow, invoke, &scope, overlay, depth).await?;
                    if let Some(name) = &invoke.bind_result_as {
                        scope.bind(name.clone(), value);
                    }
                }
                Step::Parallel(ParallelStep { parallel }) => {
                    log::debug!(
                        "Flow {} step {}: {} branches in parallel",
                        flow,
                        index,
                        parallel.len()
                    );
                    // First failure wins; the remaining branches are dropped
                    let values = try_join_all(
                        parallel
                            .iter()
                            .map(|invoke| self.run_step(flow, invoke, &scope, overlay, depth)),
                    )
                    .await?;

                    for (invoke, value) in parallel.iter().zip(values) {
                        if let Some(name) = &invoke.bind_result_as {
                            scope.bind(name.clone(), value);
                        }
                    }
                }
            }
        }

        match &script.complete {
            Some(template) => scope.render(template).map_err(|source| RunError::Reference {
                flow: flow.to_string(),
                source,
            }),
            None => Ok(Value::Null),
        }
    }

    async fn run_step(
        &self,
        flow: &str,
        step: &InvokeStep,
        scope: &Scope,
        overlay: &VariableLayer,
        depth: usize,
    ) -> Result<Value, RunError> {
        let mut call_site = VariableLayer::new();
        for (name, template) in &step.overlay {
            let value = scope
                .render_text(template)
                .map_err(|source| RunError::Reference {
                    flow: flow.to_string(),
                    source,
                })?;
            call_site.set(name.clone(), value);
        }

        // A nested flow sees its parent's overlay with the call site on top
        self.invoke(&step.invoke, overlay.merged_with(&call_site), depth + 1)
            .await
    }
}
