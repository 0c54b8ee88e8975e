use parking_lot::RwLock;

use crate::domain::FeedPost;

#[derive(Default)]
pub struct FeedRepository {
    posts: RwLock<Vec<FeedPost>>,
}

impl FeedRepository {
    pub fn insert(&self, post: FeedPost) {
        self.posts.write().push(post);
    }

    /// Visible posts, newest first
    pub fn visible(&self, limit: usize, offset: usize) -> (Vec<FeedPost>, usize) {
        let posts = self.posts.read();
        let visible: Vec<&FeedPost> = posts.iter().rev().filter(|p| !p.hidden).collect();
        let total = visible.len();
        let page = visible.into_iter().skip(offset).take(limit).cloned().collect();
        (page, total)
    }

    pub fn all(&self) -> Vec<FeedPost> {
        self.posts.read().clone()
    }
}
