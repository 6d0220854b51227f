//! The dispatch pipeline.
//!
//! method override → rewrite → parse → resolve → store `@route` → execute.
//! One shot, no retries. [`Dispatcher::handle`] is the only place errors are
//! turned into replies.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::config::DispatcherConfig;
use crate::dispatch::context::{AppContext, RequestContext, ROUTE_PARAM};
use crate::dispatch::handler::Reply;
use crate::dispatch::registry::HandlerRegistry;
use crate::dispatch::resolver::ControllerResolver;
use crate::dispatch::verb::{RestVerb, METHOD_FIELD, METHOD_OVERRIDE_HEADER};
use crate::error::{DispatchResult, ErrorKind, ErrorPayload};
use crate::observability::metrics;
use crate::routing::{ParsedRoute, RouteParser, RouteRewriter};

/// Request parameter that turns error statuses into 200.
pub const SUPPRESS_RESPONSE_CODES: &str = "suppress_response_codes";

/// Transport-neutral view of an incoming request.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    pub method: String,
    pub path: String,
    pub params: HashMap<String, String>,
    pub headers: Vec<(String, String)>,
    /// Problems found before dispatch (e.g. an undecodable body).
    pub errors: Vec<ErrorPayload>,
}

impl InboundRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn suppress_response_codes(&self) -> bool {
        matches!(
            self.params.get(SUPPRESS_RESPONSE_CODES).map(String::as_str),
            Some("true" | "1")
        )
    }
}

/// What the pipeline decided for a request, before anything is executed.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub verb: RestVerb,
    pub route: ParsedRoute,
    /// Side parameters lifted out of the path.
    pub params: BTreeMap<String, String>,
    pub handler_id: String,
}

/// Orchestrates rewriter, parser and resolver for each request.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    rewriter: RouteRewriter,
    parser: RouteParser,
    resolver: ControllerResolver,
    app: Arc<AppContext>,
    method_in_post_request: bool,
}

impl Dispatcher {
    pub fn new(
        rewriter: RouteRewriter,
        parser: RouteParser,
        resolver: ControllerResolver,
        app: Arc<AppContext>,
    ) -> Self {
        Self {
            rewriter,
            parser,
            resolver,
            app,
            method_in_post_request: true,
        }
    }

    pub fn with_method_override(mut self, enabled: bool) -> Self {
        self.method_in_post_request = enabled;
        self
    }

    /// Build from validated configuration.
    pub fn from_config(
        config: &DispatcherConfig,
        registry: HandlerRegistry,
        app: Arc<AppContext>,
    ) -> Result<Self, regex::Error> {
        let rewriter = RouteRewriter::from_config(&config.route_rules(), &config.dispatch)?;
        let parser = RouteParser::new()
            .with_aliases(config.resources.aliases.clone())
            .with_default_resource(config.dispatch.default_resource.clone());
        let resolver = ControllerResolver::new(
            config.dispatch.controller_prefix.clone(),
            Arc::new(registry),
        );
        Ok(Self::new(rewriter, parser, resolver, app)
            .with_method_override(config.dispatch.method_in_post_request))
    }

    pub fn resolver(&self) -> &ControllerResolver {
        &self.resolver
    }

    /// Run every stage up to (not including) handler lookup.
    pub fn plan(&self, request: &InboundRequest) -> DispatchResult<Plan> {
        let verb = RestVerb::effective(
            &request.method,
            request.params.get(METHOD_FIELD).map(String::as_str),
            request.header_value(METHOD_OVERRIDE_HEADER),
            self.method_in_post_request,
        )?;

        let rewritten = self.rewriter.rewrite(&request.path);
        let (resource_name, remaining_path) = self.parser.parse(&rewritten.canonical)?;

        let handler_id = self.resolver.handler_id(
            &resource_name,
            &rewritten.api_version,
            rewritten.api_format,
            verb,
        );

        tracing::debug!(
            path = %request.path,
            canonical = %rewritten.canonical,
            resource = %resource_name,
            handler_id = %handler_id,
            "Route planned"
        );

        Ok(Plan {
            verb,
            route: ParsedRoute {
                api_version: rewritten.api_version,
                api_format: rewritten.api_format,
                resource_name,
                action: rewritten.action,
                remaining_path,
            },
            params: rewritten.params,
            handler_id,
        })
    }

    /// Run the pipeline and the handler. Errors are returned, not rendered.
    pub fn dispatch(&self, request: InboundRequest) -> DispatchResult<Reply> {
        let mut resource = None;
        self.run(request, &mut resource)
    }

    /// Recovery boundary: always produces a reply.
    pub fn handle(&self, request: InboundRequest) -> Reply {
        let start = Instant::now();
        let suppress = request.suppress_response_codes();
        let method = request.method.clone();
        let path = request.path.clone();

        let mut resource = None;
        let mut reply = match self.run(request, &mut resource) {
            Ok(reply) => reply,
            Err(err) => {
                match err.kind() {
                    ErrorKind::Internal => {
                        tracing::error!(%method, %path, error = %err, "Dispatch failed")
                    }
                    _ => tracing::warn!(%method, %path, error = %err, "Dispatch rejected"),
                }
                Reply::from_error(&err)
            }
        };

        if let Some(kind) = reply.error_kind {
            metrics::record_error(kind);
        }

        let resource = resource.as_deref().unwrap_or("none");
        metrics::record_dispatch(resource, reply.status, start);

        if suppress && reply.is_error() {
            reply.status = 200;
        }
        reply
    }

    fn run(&self, request: InboundRequest, resource: &mut Option<String>) -> DispatchResult<Reply> {
        let plan = self.plan(&request)?;
        *resource = Some(plan.route.resource_name.clone());

        let mut params = request.params;
        params.extend(plan.params);

        let mut context = RequestContext::new(plan.verb, request.path)
            .with_original_method(request.method)
            .with_params(params)
            .with_errors(request.errors);
        context.set(ROUTE_PARAM, plan.route.remaining_path.clone());

        let handler = self.resolver.resolve(
            &plan.handler_id,
            &plan.route.resource_name,
            context,
            Arc::clone(&self.app),
        )?;

        let reply = handler.execute()?;
        if reply.is_error() {
            return Ok(reply);
        }
        Ok(reply.with_format(plan.route.api_format))
    }
}
