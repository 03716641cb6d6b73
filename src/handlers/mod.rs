// Public (no auth) → Protected (JWT auth, then role gate per route)
pub mod protected;
pub mod public;
