//! 权限解析
//!
//! Turns "who is calling" into "what may they do". Resolution runs once per
//! request in the auth middleware; nothing is cached between requests, so a
//! role change is visible on the caller's next request.

pub mod resolver;

pub use resolver::{PermissionResolver, ResolvedPermissions, primary_role};
