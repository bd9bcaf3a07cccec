use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::health::health))
        .merge(auth_routes())
        .merge(quote_routes())
        .merge(vote_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
}

fn quote_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::quote::list_quotes,
            handlers::quote::create_quote
        ))
        .routes(routes!(
            handlers::quote::get_quote,
            handlers::quote::update_quote,
            handlers::quote::delete_quote
        ))
}

fn vote_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::vote::cast_vote,
            handlers::vote::revoke_vote
        ))
        .routes(routes!(handlers::vote::vote_count))
        .routes(routes!(handlers::vote::check_vote))
}
