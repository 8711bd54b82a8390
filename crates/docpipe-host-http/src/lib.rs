//! Docpipe Host HTTP
//!
//! The [`Invoker`] trait is the only thing the rest of docpipe knows about
//! the remote API: a service name and an opaque JSON body go in, an opaque
//! JSON response comes out. [`HttpTransport`] implements it over HTTPS POST.

mod error;
mod invoker;
mod transport;

pub use error::InvokeError;
pub use invoker::{Invoker, Request};
pub use transport::HttpTransport;
