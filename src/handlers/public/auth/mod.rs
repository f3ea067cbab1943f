// handlers/public/auth/mod.rs - Credential-issuing endpoints

pub mod login;  // POST /api/auth/login
pub mod oauth;  // GET /api/auth/{google,github}[/callback]
pub mod signup; // POST /api/auth/signup
