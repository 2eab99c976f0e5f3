// Two security tiers, mirrored in the router:
// Public (no auth) → Protected (auth gate, plus an admin layer where noted)
pub mod protected;
pub mod public;
