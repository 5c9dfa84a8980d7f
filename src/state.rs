use crate::store::PostStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub posts: PostStore,
}
