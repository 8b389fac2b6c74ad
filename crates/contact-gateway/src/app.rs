use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use contact_core::ContactRepository;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    delete_all_contacts_handler, delete_contact_handler, get_contact_handler, health_handler,
    list_contacts_handler, save_contact_handler, update_contact_handler,
};
use crate::middleware::{cors_layer, expose_error_detail, real_ip};

pub struct App {}

impl App {
    /// Builds the API over `repository`. With `debug_errors` set, error
    /// bodies include the underlying error text.
    pub fn router<R: ContactRepository>(repository: Arc<R>, debug_errors: bool) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route(
                "/v1/contact",
                get(list_contacts_handler::<R>)
                    .post(save_contact_handler::<R>)
                    .delete(delete_all_contacts_handler::<R>),
            )
            .route(
                "/v1/contact/{id}",
                get(get_contact_handler::<R>)
                    .put(update_contact_handler::<R>)
                    .delete(delete_contact_handler::<R>),
            )
            .with_state(repository)
            .layer(axum::middleware::map_response_with_state(
                debug_errors,
                expose_error_detail,
            ))
            .layer(
                ServiceBuilder::new()
                    .layer(CatchPanicLayer::new())
                    .layer(cors_layer())
                    .layer(axum::middleware::from_fn(real_ip))
                    .layer(TraceLayer::new_for_http()),
            )
    }
}
