// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, explanation, questions, quiz, results, subjects},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, subjects, user, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store, config, tutor).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let subject_routes = Router::new()
        .route("/", get(subjects::list_subjects))
        .route("/{subject_id}", get(subjects::get_subject))
        // Question content requires a signed-in user
        .merge(
            Router::new()
                .route("/{subject_id}/questions", get(questions::list_questions))
                .route(
                    "/{subject_id}/sections/{section_code}/questions/{question_id}",
                    get(questions::get_question),
                )
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    let user_routes = Router::new()
        .route("/subjects/{subject_id}/start-test", post(quiz::start_test))
        .route(
            "/subjects/{subject_id}/save-quiz-progress",
            post(quiz::save_quiz_progress),
        )
        .route(
            "/subjects/{subject_id}/quiz-progress",
            get(quiz::get_quiz_progress).delete(quiz::delete_quiz_progress),
        )
        .route("/subjects/{subject_id}/submit-test", post(quiz::submit_test))
        .route(
            "/subjects/{subject_id}/test-results",
            get(results::list_test_results),
        )
        .route(
            "/subjects/{subject_id}/test-results/{test_id}",
            get(results::get_test_result),
        )
        .route(
            "/subjects/{subject_id}/test-results/{test_id}/section/{section_code}",
            get(results::get_section_review),
        )
        .route(
            "/subjects/{subject_id}/tests/{test_id}",
            delete(results::delete_test),
        )
        .route("/explanations/chat", post(explanation::chat))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/questions", post(admin::create_question))
        .route(
            "/questions/{id}",
            put(admin::update_question).delete(admin::delete_question),
        )
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/subjects", subject_routes)
        .nest("/api/user", user_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
