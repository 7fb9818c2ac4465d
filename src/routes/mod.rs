/// Router Module Index
///
/// Routing is split by access level so that the authentication layer is applied to a whole
/// module at once rather than remembered per route.

/// Routes accessible to anonymous clients. Read-only post access plus the login exchange.
pub mod public;

/// Routes behind the bearer-token layer. Every post mutation and upload lives here.
pub mod admin;
