// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route Prefix: /api/posts, /api/projects, /api/teams, /api/opportunities, /api/auth/profile
// Middleware: jwt_auth_middleware injects the acting AuthUser into request extensions.
//
// Owner checks live in the services, not here: handlers only parse the request
// and shape the response.

pub mod members;       // POST/DELETE /:id/members for projects and teams
pub mod opportunities; // GET /api/opportunities
pub mod posts;         // Feed, likes and comments
pub mod profile;       // GET/PUT /api/auth/profile
pub mod projects;      // GET /api/projects
pub mod resource;      // Create/update/delete shared by every owned entity
pub mod teams;         // GET /api/teams
