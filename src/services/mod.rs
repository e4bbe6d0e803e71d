//! Service layer for business logic
//!
//! The resolution path (resolver, recorder, dispatcher) is independent of
//! HTTP; [`RedirectFlow`] composes it for the redirect endpoint. Link
//! management lives in [`LinkService`].

mod dispatcher;
mod link_service;
mod recorder;
mod redirect;
mod resolver;

pub use dispatcher::*;
pub use link_service::*;
pub use recorder::*;
pub use redirect::*;
pub use resolver::*;
