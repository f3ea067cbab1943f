// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Route Prefix: /, /health, /api/auth/*
// Everything here either issues credentials or reports service status.

pub mod auth;   // Signup, login and OAuth redirects
pub mod health; // Service banner and store health
