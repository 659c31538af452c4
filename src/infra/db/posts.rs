use async_trait::async_trait;
use sqlx::query_as;

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::PostWithAuthor;

use super::SqliteRepositories;
use super::types::PostWithAuthorRow;
use super::util::map_sqlx_error;

const POST_WITH_AUTHOR_SELECT: &str = "SELECT p.id, p.title, p.excerpt, p.content, p.author_id, \
     p.published_date, p.read_time, p.tags, p.created_at, p.updated_at, \
     u.name AS author_name, u.avatar AS author_avatar \
     FROM posts p INNER JOIN users u ON u.id = p.author_id";

#[async_trait]
impl PostsRepo for SqliteRepositories {
    async fn find_post_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError> {
        let sql = format!("{POST_WITH_AUTHOR_SELECT} WHERE p.id = ?");
        let row = query_as::<_, PostWithAuthorRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(PostWithAuthor::try_from).transpose()
    }

    async fn list_posts_with_author(&self) -> Result<Vec<PostWithAuthor>, RepoError> {
        let sql = format!("{POST_WITH_AUTHOR_SELECT} ORDER BY p.published_date DESC, p.id DESC");
        let rows = query_as::<_, PostWithAuthorRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(PostWithAuthor::try_from).collect()
    }
}
