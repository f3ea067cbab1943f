// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT bearer auth, see middleware::auth)
pub mod public;    // /, /health, /api/auth/{signup,login,google,github}
pub mod protected; // /api/posts, /api/projects, /api/teams, /api/opportunities, /api/auth/profile
pub mod utils;     // Extractors and path parsing shared by both tiers
