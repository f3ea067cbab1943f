use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::SecurityConfig;
use crate::database::models::{Opportunity, Post, Project, Team};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// The whole HTTP surface, ready to serve
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(public::health::root))
        .route("/health", get(public::health::health))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth::{login, oauth, signup};

    Router::new()
        .route("/api/auth/signup", post(signup::signup_post))
        .route("/api/auth/login", post(login::login_post))
        .route("/api/auth/google", get(oauth::google_start))
        .route("/api/auth/google/callback", get(oauth::google_callback))
        .route("/api/auth/github", get(oauth::github_start))
        .route("/api/auth/github/callback", get(oauth::github_callback))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/auth/profile",
            get(protected::profile::profile_get).put(protected::profile::profile_put),
        )
        .merge(post_routes())
        .merge(project_routes())
        .merge(team_routes())
        .merge(opportunity_routes())
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn post_routes() -> Router<AppState> {
    use protected::{posts, resource};

    Router::new()
        .route("/api/posts", get(posts::list).post(resource::create::<Post>))
        .route(
            "/api/posts/:id",
            put(resource::update::<Post>).delete(resource::delete::<Post>),
        )
        .route("/api/posts/:id/like", put(posts::like))
        .route("/api/posts/:id/comments", post(posts::comment_post))
        .route(
            "/api/posts/:id/comments/:comment_id",
            put(posts::comment_put).delete(posts::comment_delete),
        )
}

fn project_routes() -> Router<AppState> {
    use protected::{members, projects, resource};

    Router::new()
        .route("/api/projects", get(projects::list).post(resource::create::<Project>))
        .route(
            "/api/projects/:id",
            put(resource::update::<Project>).delete(resource::delete::<Project>),
        )
        .route("/api/projects/:id/members", post(members::add::<Project>))
        .route("/api/projects/:id/members/:user_id", delete(members::remove::<Project>))
}

fn team_routes() -> Router<AppState> {
    use protected::{members, resource, teams};

    Router::new()
        .route("/api/teams", get(teams::list).post(resource::create::<Team>))
        .route(
            "/api/teams/:id",
            put(resource::update::<Team>).delete(resource::delete::<Team>),
        )
        .route("/api/teams/:id/members", post(members::add::<Team>))
        .route("/api/teams/:id/members/:user_id", delete(members::remove::<Team>))
}

fn opportunity_routes() -> Router<AppState> {
    use protected::{opportunities, resource};

    Router::new()
        .route(
            "/api/opportunities",
            get(opportunities::list).post(resource::create::<Opportunity>),
        )
        .route(
            "/api/opportunities/:id",
            put(resource::update::<Opportunity>).delete(resource::delete::<Opportunity>),
        )
}

/// `*` (or no origins at all) allows any origin; otherwise only the listed ones
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
