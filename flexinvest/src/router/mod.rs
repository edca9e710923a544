//! Path routing and the two authentication guards.
//!
//! - `/dashboard/*` needs the user session, otherwise `/login`
//! - `/admin/*` (except `/admin/login`) needs the admin session, otherwise `/admin/login`
//! - while startup token checks run, guarded routes resolve to [`Guard::Loading`]

pub mod guards;
pub mod routes;

pub use guards::{Guard, navigate, resolve};
pub use routes::{Access, Route};
