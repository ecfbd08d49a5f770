//! What each page shows for the current cache contents.

use crate::cache::{QueryCache, QueryData, QueryKey, QueryStatus};
use crate::models::{Post, PostsPage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState<'a, T> {
    Loading,
    Error { message: String, description: String },
    /// List page only: the request succeeded with zero posts.
    Empty,
    Ready(&'a T),
}

pub fn list_state<'a>(cache: &'a QueryCache<QueryData>, key: &QueryKey) -> PageState<'a, PostsPage> {
    match read(cache, key, "Failed to load posts") {
        Read::Loading => PageState::Loading,
        Read::Error(message, description) => PageState::Error {
            message,
            description,
        },
        Read::Ready(data) => match data.as_page() {
            Some(page) if page.posts.is_empty() => PageState::Empty,
            Some(page) => PageState::Ready(page),
            None => PageState::Loading,
        },
    }
}

pub fn post_state(cache: &QueryCache<QueryData>, id: u64) -> PageState<'_, Post> {
    match read(cache, &QueryKey::Post { id }, "Failed to load post") {
        Read::Loading => PageState::Loading,
        Read::Error(message, description) => PageState::Error {
            message,
            description,
        },
        Read::Ready(data) => data
            .as_post()
            .map(PageState::Ready)
            .unwrap_or(PageState::Loading),
    }
}

enum Read<'a> {
    Loading,
    Error(String, String),
    Ready(&'a QueryData),
}

fn read<'a>(cache: &'a QueryCache<QueryData>, key: &QueryKey, fallback: &str) -> Read<'a> {
    let Some(entry) = cache.entry(key) else {
        return Read::Loading;
    };
    match entry.status {
        QueryStatus::Pending => Read::Loading,
        QueryStatus::Error => {
            let description = entry
                .error
                .as_ref()
                .map(|err| err.to_string())
                .unwrap_or_else(|| fallback.to_string());
            Read::Error("Error".to_string(), description)
        }
        QueryStatus::Success => match entry.value.as_ref() {
            Some(data) => Read::Ready(data),
            None => Read::Loading,
        },
    }
}

/// Number of pages needed for `total` posts; never less than one.
pub fn page_count(total: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    let pages = total.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const KEY: QueryKey = QueryKey::Posts { page: 1, limit: 20 };

    fn post(id: u64) -> Post {
        Post {
            id,
            user_id: 1,
            title: format!("title {id}"),
            body: "body".into(),
        }
    }

    fn cache() -> QueryCache<QueryData> {
        QueryCache::new(Duration::from_secs(300))
    }

    #[test]
    fn unknown_and_pending_keys_are_loading() {
        let mut cache = cache();
        assert_eq!(list_state(&cache, &KEY), PageState::Loading);
        cache.begin_fetch(KEY, Utc::now());
        assert_eq!(list_state(&cache, &KEY), PageState::Loading);
    }

    #[test]
    fn empty_list_is_its_own_state() {
        let mut cache = cache();
        let generation = cache.begin_fetch(KEY, Utc::now()).unwrap();
        cache.complete(
            KEY,
            generation,
            Ok(QueryData::Page(PostsPage::default())),
            Utc::now(),
        );
        assert_eq!(list_state(&cache, &KEY), PageState::Empty);
    }

    #[test]
    fn ready_list_exposes_page() {
        let mut cache = cache();
        let page = PostsPage {
            posts: vec![post(2), post(1)],
            total: 2,
        };
        let generation = cache.begin_fetch(KEY, Utc::now()).unwrap();
        cache.complete(KEY, generation, Ok(QueryData::Page(page.clone())), Utc::now());
        assert_eq!(list_state(&cache, &KEY), PageState::Ready(&page));
    }

    #[test]
    fn failures_carry_the_error_description() {
        let mut cache = cache();
        let key = QueryKey::Post { id: 5 };
        let generation = cache.begin_fetch(key, Utc::now()).unwrap();
        cache.complete(
            key,
            generation,
            Err(ApiError::NotFound {
                resource: "post",
                id: 5,
            }),
            Utc::now(),
        );
        assert_eq!(
            post_state(&cache, 5),
            PageState::Error {
                message: "Error".into(),
                description: "post 5 not found".into(),
            }
        );
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 20), 1);
        assert_eq!(page_count(20, 20), 1);
        assert_eq!(page_count(21, 20), 2);
        assert_eq!(page_count(100, 20), 5);
    }
}
