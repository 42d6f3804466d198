use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .merge(prompt_routes())
        .nest("/admin/prompts", admin_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::slack_authorize_url))
        .routes(routes!(handlers::auth::slack_callback))
        .routes(routes!(handlers::auth::me))
}

fn prompt_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::prompt::list_categories))
        .routes(routes!(
            handlers::prompt::list_prompts,
            handlers::prompt::submit_prompt
        ))
        .routes(routes!(handlers::prompt::list_tags))
        .routes(routes!(handlers::vote::get_rating))
        .routes(routes!(handlers::vote::get_my_vote, handlers::vote::cast_vote))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::admin::list_pending))
        .routes(routes!(handlers::admin::approve))
        .routes(routes!(handlers::admin::reject))
}
