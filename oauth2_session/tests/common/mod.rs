
pub use axum_mock_server::MockProvider;
