use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, patch, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::{Database, DatabaseError};
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, require_roles, RoleGate};
use crate::services::{LogMailer, Mailer};

/// Shared, explicitly constructed dependencies handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub tokens: TokenService,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, db: Database, mailer: Arc<dyn Mailer>) -> Self {
        let tokens = TokenService::from_config(&config.security);
        Self { db, config, tokens, mailer }
    }

    /// Lazily connected pool and the logging mailer
    pub fn from_config(config: AppConfig) -> Result<Self, DatabaseError> {
        let db = Database::connect_lazy(&config.database, config.filter.debug_logging)?;
        Ok(Self::new(Arc::new(config), db, Arc::new(LogMailer)))
    }
}

/// Roles allowed to read, create, and update or delete a resource
struct Policy {
    read: RoleGate,
    create: RoleGate,
    write: RoleGate,
}

const USERS: Policy = Policy { read: RoleGate::ADMIN, create: RoleGate::ADMIN, write: RoleGate::ADMIN };
const CUSTOMERS: Policy = Policy { read: RoleGate::STAFF, create: RoleGate::ADMIN, write: RoleGate::ADMIN };
const CATEGORIES: Policy = Policy { read: RoleGate::ANY_ROLE, create: RoleGate::ADMIN, write: RoleGate::STAFF };
const PRODUCTS: Policy = Policy { read: RoleGate::ANY_ROLE, create: RoleGate::STAFF, write: RoleGate::STAFF };
const ORDERS: Policy = Policy { read: RoleGate::ANY_ROLE, create: RoleGate::ANY_ROLE, write: RoleGate::STAFF };
const ORDER_LINES: Policy = Policy { read: RoleGate::ANY_ROLE, create: RoleGate::ANY_ROLE, write: RoleGate::STAFF };

/// Attach a role check to a method route
fn gated(route: MethodRouter<AppState>, gate: RoleGate) -> MethodRouter<AppState> {
    route.layer(middleware::from_fn_with_state(gate, require_roles))
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);

    Router::new()
        // Public
        .route("/", get(public::index))
        .route("/health", get(public::health))
        .merge(auth_routes())
        // Protected
        .nest("/api/v1", api_routes(state.clone()))
        .fallback(|| async { ApiError::not_found("Route not found") })
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(public::login))
        .route("/auth/register", post(public::register))
        .route("/auth/forgot-password", post(public::forgot_password))
        .route("/auth/reset-password", post(public::reset_password))
        .route("/auth/refresh-token", post(public::refresh_token))
        .route("/auth/logout", post(public::logout))
}

fn api_routes(state: AppState) -> Router<AppState> {
    use protected::{categories, customers, order_lines, orders, products, profile, users};

    Router::new()
        .route(
            "/users",
            gated(get(users::list), USERS.read).merge(gated(post(users::create), USERS.create)),
        )
        .route(
            "/users/:id",
            gated(get(users::get), USERS.read).merge(gated(patch(users::update).delete(users::delete), USERS.write)),
        )
        .route(
            "/customers",
            gated(get(customers::list), CUSTOMERS.read).merge(gated(post(customers::create), CUSTOMERS.create)),
        )
        .route(
            "/customers/:id",
            gated(get(customers::get), CUSTOMERS.read)
                .merge(gated(patch(customers::update).delete(customers::delete), CUSTOMERS.write)),
        )
        .route(
            "/categories",
            gated(get(categories::list), CATEGORIES.read).merge(gated(post(categories::create), CATEGORIES.create)),
        )
        .route(
            "/categories/:id",
            gated(get(categories::get), CATEGORIES.read)
                .merge(gated(patch(categories::update).delete(categories::delete), CATEGORIES.write)),
        )
        .route(
            "/products",
            gated(get(products::list), PRODUCTS.read).merge(gated(post(products::create), PRODUCTS.create)),
        )
        .route(
            "/products/:id",
            gated(get(products::get), PRODUCTS.read)
                .merge(gated(patch(products::update).delete(products::delete), PRODUCTS.write)),
        )
        .route(
            "/orders",
            gated(get(orders::list), ORDERS.read).merge(gated(post(orders::create), ORDERS.create)),
        )
        .route(
            "/orders/:id",
            gated(get(orders::get), ORDERS.read).merge(gated(patch(orders::update).delete(orders::delete), ORDERS.write)),
        )
        .route("/orders/:id/orderlines", gated(post(orders::add_line), ORDERS.create))
        .route(
            "/orderlines",
            gated(get(order_lines::list), ORDER_LINES.read).merge(gated(post(order_lines::create), ORDER_LINES.create)),
        )
        .route(
            "/orderlines/:id",
            gated(get(order_lines::get), ORDER_LINES.read)
                .merge(gated(patch(order_lines::update).delete(order_lines::delete), ORDER_LINES.write)),
        )
        .route("/profile/my-orders", gated(get(profile::my_orders), RoleGate::ANY_ROLE))
        // Runs before every role gate above
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
