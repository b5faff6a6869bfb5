//! Presentation Layer
//!
//! HTTP handlers, DTOs, outcome routing, session transport, middleware.

pub mod dto;
pub mod handlers;
pub mod messages;
pub mod middleware;
pub mod navigation;
pub mod router;
pub mod routes;
pub mod session;

pub use handlers::AccountsAppState;
pub use middleware::{LoginGuardState, require_login};
pub use navigation::{Navigation, route_outcome};
pub use router::{accounts_router, accounts_router_generic};
