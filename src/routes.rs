// Route path constants - single source of truth for all API paths

pub const HEALTHCHECK: &str = "/healthcheck";
pub const HEALTH: &str = "/health";
pub const POSTS: &str = "/post-api/v1/posts";
pub const POST_ITEM: &str = "/post-api/v1/posts/{id}";
