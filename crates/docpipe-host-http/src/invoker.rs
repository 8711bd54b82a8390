use std::sync::Arc;

use async_trait::async_trait;

use crate::error::InvokeError;

/// A request body: the POST arguments of one remote call.
pub type Request = serde_json::Map<String, serde_json::Value>;

/// Invokes a named remote service.
///
/// The service name is an opaque identifier and both bodies are opaque JSON.
/// Timeouts and retries, if any, belong to the implementation.
#[async_trait]
pub trait Invoker: Send + Sync {
  async fn invoke(&self, service: &str, request: Request) -> Result<serde_json::Value, InvokeError>;
}

#[async_trait]
impl<T: Invoker + ?Sized> Invoker for Arc<T> {
  async fn invoke(
    &self,
    service: &str,
    request: Request,
  ) -> Result<serde_json::Value, InvokeError> {
    (**self).invoke(service, request).await
  }
}
