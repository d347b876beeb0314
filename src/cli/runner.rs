//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::loader::{load_service, ServiceDefinition};
use crate::operation::JsonListOperation;
use crate::pagination::{Cursor, ListRequest};
use crate::services;
use futures::TryStreamExt;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Mutex;
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
    out: Mutex<Box<dyn Write + Send>>,
}

impl Runner {
    /// Create a new runner writing to stdout
    pub fn new(cli: Cli) -> Self {
        Self::with_writer(cli, std::io::stdout())
    }

    /// Create a runner writing messages to `out`
    pub fn with_writer(cli: Cli, out: impl Write + Send + 'static) -> Self {
        Self {
            cli,
            out: Mutex::new(Box::new(out)),
        }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List {
                operation,
                filters,
                limit,
                next_token,
                skip,
                no_auto_iteration,
            } => {
                self.list(
                    operation,
                    filters,
                    *limit,
                    next_token.as_deref(),
                    *skip,
                    *no_auto_iteration,
                )
                .await
            }
            Commands::Operations => self.operations(),
            Commands::Validate => self.validate(),
            Commands::Services => self.services(),
        }
    }

    /// Load service definition
    fn load_service(&self) -> Result<ServiceDefinition> {
        let path = self
            .cli
            .service
            .as_ref()
            .ok_or_else(|| Error::config("Service not specified (use -s flag)"))?;
        load_service(path)
    }

    /// Load client configuration
    ///
    /// Inline JSON takes precedence over a file; flags override both.
    fn load_config(&self) -> Result<ClientConfig> {
        let config = if let Some(json_str) = &self.cli.config_json {
            ClientConfig::from_json_str(json_str)?
        } else if let Some(path) = &self.cli.config {
            ClientConfig::from_file(path)?
        } else {
            ClientConfig::default()
        };

        Ok(config
            .with_endpoint(self.cli.endpoint.clone())
            .with_region(self.cli.region.clone()))
    }

    /// Run a list operation and stream its items
    async fn list(
        &self,
        operation: &str,
        filters: &[String],
        limit: Option<usize>,
        next_token: Option<&str>,
        skip: usize,
        no_auto_iteration: bool,
    ) -> Result<()> {
        let start_cursor = match next_token {
            Some(token) if token.trim().is_empty() => {
                return Err(Error::invalid_value(
                    "next_token",
                    "must not be empty; omit the flag to start from the first page",
                ));
            }
            token => token.and_then(Cursor::new),
        };

        let service = self.load_service()?;
        let config = self.load_config()?;
        let op = JsonListOperation::new(&service, operation, &config)?;
        let operation_name = op.definition().name.clone();

        let (request, controls) = ListRequest::builder()
            .fields(parse_filters(filters)?)
            .starting_cursor(start_cursor)
            .skip_items(skip)
            .emit_limit(limit)
            .no_auto_iteration(no_auto_iteration)
            .build()?;

        if self.cli.verbose {
            info!(
                service = %service.name,
                operation = %operation_name,
                ?limit,
                manual = controls.user_controls_paging(),
                "Starting list"
            );
        }

        let started = Instant::now();
        let paginator = op.into_paginator();
        let mut pages = Box::pin(paginator.pages(request, controls.clone()));

        let mut emitted = 0usize;
        let mut page_count = 0usize;
        let mut resume_cursor = controls.start_cursor.clone();
        let mut resume_skip = controls.skip;
        while let Some(page) = pages.try_next().await? {
            page_count += 1;
            resume_cursor = page.resume_cursor().cloned();
            resume_skip = page.resume_skip();
            let emitted_at = chrono::Utc::now().timestamp_millis();
            for item in page.items {
                emitted += 1;
                self.output_message(&json!({
                    "type": "RECORD",
                    "record": {
                        "operation": operation_name,
                        "data": item,
                        "emitted_at": emitted_at
                    }
                }))?;
            }
        }

        // a null token with a skip restarts the listing from its first page
        if resume_cursor.is_some() || resume_skip > 0 {
            let mut cursor = json!({
                "operation": operation_name,
                "next_token": resume_cursor
            });
            if resume_skip > 0 {
                cursor["skip"] = json!(resume_skip);
            }
            self.output_message(&json!({
                "type": "CURSOR",
                "cursor": cursor
            }))?;
        }

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "{operation_name}: {emitted} records from {page_count} page(s) in {}ms",
                    started.elapsed().as_millis()
                )
            }
        }))?;

        Ok(())
    }

    /// List operations of the service
    fn operations(&self) -> Result<()> {
        let service = self.load_service()?;

        let operations: Vec<Value> = service
            .operations
            .iter()
            .map(|op| {
                json!({
                    "name": op.name,
                    "description": op.description,
                    "method": op.method,
                    "cursor_field": op.cursor_field,
                    "limit_field": op.limit_field,
                    "page_cap": op.page_cap
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "OPERATIONS",
            "service": service.name,
            "operations": operations
        }))?;

        Ok(())
    }

    /// Validate service definition
    fn validate(&self) -> Result<()> {
        let service = self.load_service()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Service '{}' is valid with {} operations",
                    service.name,
                    service.operations.len()
                )
            }
        }))?;

        Ok(())
    }

    /// List built-in services
    fn services(&self) -> Result<()> {
        let services: Vec<Value> = services::list_builtin()
            .into_iter()
            .map(|name| -> Result<Value> {
                let def = load_service(name)?;
                Ok(json!({
                    "name": def.name,
                    "title": def.title,
                    "operations": def.operation_names()
                }))
            })
            .collect::<Result<_>>()?;

        self.output_message(&json!({
            "type": "SERVICES",
            "services": services
        }))?;

        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
        };
        let mut out = self
            .out
            .lock()
            .map_err(|_| Error::Other("output writer poisoned".to_string()))?;
        writeln!(out, "{line}")?;
        Ok(())
    }
}

/// Parse `KEY=VALUE` filters
///
/// Values that parse as JSON keep their type; anything else is a string.
fn parse_filters(filters: &[String]) -> Result<Vec<(String, Value)>> {
    filters
        .iter()
        .map(|filter| {
            let (key, value) = filter.split_once('=').ok_or_else(|| {
                Error::invalid_value("filter", format!("expected KEY=VALUE, got '{filter}'"))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::invalid_value(
                    "filter",
                    format!("empty key in '{filter}'"),
                ));
            }
            let value = serde_json::from_str(value)
                .unwrap_or_else(|_| Value::String(value.to_string()));
            Ok((key.to_string(), value))
        })
        .collect()
}
