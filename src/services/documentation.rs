use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Midnight Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::sse::admin_stream,
        crate::routes::public::countdown,
        crate::routes::public::viewers,
        crate::routes::public::list_wishes,
        crate::routes::public::create_wish,
        crate::routes::admin::get_settings,
        crate::routes::admin::set_force,
        crate::routes::admin::simulate,
        crate::routes::admin::trigger_fireworks,
        crate::routes::admin::test_sound,
        crate::routes::admin::set_viewer_boost,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::sse::AdminHandshake,
            crate::dto::sse::PublicHandshake,
            crate::dto::sse::SystemStatus,
            crate::dto::common::SettingsSnapshot,
            crate::dto::common::CountdownSnapshot,
            crate::dto::public::CountdownResponse,
            crate::dto::public::ViewersResponse,
            crate::dto::public::WishRequest,
            crate::dto::public::WishSummary,
            crate::dto::public::WishListResponse,
            crate::dto::admin::ForceRequest,
            crate::dto::admin::SimulateRequest,
            crate::dto::admin::ViewerBoostRequest,
            crate::dto::admin::ActionResponse,
            crate::state::countdown::TimeRemaining,
            crate::state::countdown::CountdownPhase,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "public", description = "Viewer-facing countdown, viewers, and wishes"),
        (name = "admin", description = "Show control operations"),
    )
)]
pub struct ApiDoc;
