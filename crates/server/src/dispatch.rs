//! Typed operation dispatch.
//!
//! The dispatcher is the single conversion point from internal failures to
//! the wire envelope: every invocation resolves to `ok:true` or `ok:false`,
//! never an unhandled fault. Validation runs before any handler does, in a
//! fixed order: operation name, required parameters, parameter shapes.

use geupsik_protocol::{OperationRequest, OperationResult, OperationSchema};
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type HandlerFuture = Pin<Box<dyn Future<Output = anyhow::Result<Value>> + Send>>;

/// One registered operation body. Receives the already-validated parameter
/// map; an `Err` becomes `ok:false` with the error's display text.
pub type Handler = Arc<dyn Fn(Map<String, Value>) -> HandlerFuture + Send + Sync>;

const UNKNOWN_OPERATION: &str = "알 수 없는 도구입니다.";

/// Operation registry: populated once at startup, read-only afterwards.
#[derive(Default)]
pub struct Dispatcher {
    entries: Vec<(OperationSchema, Handler)>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema: OperationSchema, handler: Handler) {
        self.entries.push((schema, handler));
    }

    /// Advertised catalog, in registration order.
    #[must_use]
    pub fn catalog(&self) -> Vec<&OperationSchema> {
        self.entries.iter().map(|(schema, _)| schema).collect()
    }

    pub async fn invoke(&self, request: &OperationRequest) -> OperationResult {
        let Some((schema, handler)) = self
            .entries
            .iter()
            .find(|(schema, _)| schema.name == request.tool)
        else {
            return OperationResult::failure(UNKNOWN_OPERATION);
        };

        for required in &schema.required {
            if !request.parameters.contains_key(required) {
                return OperationResult::failure(format!(
                    "필수 파라미터가 없습니다: {required}"
                ));
            }
        }

        for (name, value) in &request.parameters {
            if let Some(shape) = schema.shape_of(name) {
                if !shape.matches(value) {
                    return OperationResult::failure(format!(
                        "파라미터 형식이 올바르지 않습니다: {name} ({} 필요)",
                        shape.describe()
                    ));
                }
            }
        }

        match handler(request.parameters.clone()).await {
            Ok(payload) => OperationResult::success(payload),
            Err(err) => {
                log::debug!("{} failed: {err:#}", request.tool);
                OperationResult::failure(err.to_string())
            }
        }
    }
}
