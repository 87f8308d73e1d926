use foodable::application::Foodable;
use foodable::util::date::{format_distance, format_smart_date};
use foodable_api_types::{Comment, NewComment, NewPost, Post, PostDetail};
use serde::Serialize;
use serde_json::json;
use time::OffsetDateTime;

use crate::args::PostsCmd;
use crate::client::CliError;
use crate::print::print_json;

pub async fn handle(app: &Foodable, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List => {
            let posts = app.posts().await.into_result()?;
            let now = OffsetDateTime::now_utc();
            let views: Vec<_> = posts.iter().map(|post| PostView::new(post, now)).collect();
            print_json(&views)
        }
        PostsCmd::Get { id } => {
            let detail = app.post(id).await.into_result()?;
            print_json(&PostDetailView::new(&detail, OffsetDateTime::now_utc()))
        }
        PostsCmd::Create { content, kind } => {
            let post = NewPost {
                content,
                kind: kind.map(Into::into),
            };
            print_json(&app.create_post(&post).await?)
        }
        PostsCmd::Delete { id } => {
            app.delete_post(id).await?;
            print_json(&json!({ "deleted": id }))
        }
        PostsCmd::Like { id } => print_json(&app.toggle_like(id).await?),
        PostsCmd::Comment { id, content } => {
            let comment = app.add_comment(id, &NewComment { content }).await?;
            print_json(&comment)
        }
    }
}

/// Feed post with a readable `posted` label next to the raw timestamp.
#[derive(Debug, Serialize)]
pub(crate) struct PostView<'a> {
    #[serde(flatten)]
    post: &'a Post,
    posted: String,
}

impl<'a> PostView<'a> {
    pub(crate) fn new(post: &'a Post, now: OffsetDateTime) -> Self {
        Self {
            post,
            posted: format_smart_date(post.created_at, now),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentView<'a> {
    #[serde(flatten)]
    comment: &'a Comment,
    posted: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostDetailView<'a> {
    #[serde(flatten)]
    post: PostView<'a>,
    comments: Vec<CommentView<'a>>,
}

impl<'a> PostDetailView<'a> {
    pub(crate) fn new(detail: &'a PostDetail, now: OffsetDateTime) -> Self {
        Self {
            post: PostView::new(&detail.post, now),
            comments: detail
                .comments
                .iter()
                .map(|comment| CommentView {
                    comment,
                    posted: format_distance(comment.created_at, now),
                })
                .collect(),
        }
    }
}
