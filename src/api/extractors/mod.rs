mod json_body;
mod list_query;
mod post_id;

pub use json_body::JsonBody;
pub use post_id::PostId;
