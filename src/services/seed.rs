/*
 * Responsibility
 * - 起動時に table が空なら welcome post を 1 件入れる
 * - soft delete 済みの行があれば「空ではない」扱い
 */
use crate::repos::{NewPost, PostStore, RepoResult};

const WELCOME_TITLE: &str = "Welcome, What is your favorite coffee?";
const WELCOME_CONTENT: &str = "Coffee plays an important role in helping people cope with life's challenges. Share your story: How has coffee helped you cope during tough times?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted,
    Skipped,
}

pub async fn run_seed(store: &dyn PostStore) -> RepoResult<SeedOutcome> {
    if store.has_any().await? {
        tracing::info!("seed skipped: posts already exist");
        return Ok(SeedOutcome::Skipped);
    }

    let row = store
        .create(NewPost {
            title: WELCOME_TITLE.to_string(),
            content: WELCOME_CONTENT.to_string(),
        })
        .await?;
    tracing::info!(post_id = %row.id, "seed post inserted");

    Ok(SeedOutcome::Inserted)
}
