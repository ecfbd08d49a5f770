use serde::{Deserialize, Serialize};

/// Every post created by this client is attributed to the same user.
pub const DEFAULT_USER_ID: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

/// One page of the collection plus the collection size reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostsPage {
    pub posts: Vec<Post>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostFormData {
    pub title: String,
    pub body: String,
}

impl From<&Post> for PostFormData {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            body: post.body.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

impl CreatePostInput {
    pub fn from_form(data: PostFormData) -> Self {
        Self {
            user_id: DEFAULT_USER_ID,
            title: data.title,
            body: data.body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

impl UpdatePostInput {
    /// Keeps identity and ownership of the loaded post, replaces the content.
    pub fn from_form(post: &Post, data: PostFormData) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            title: data.title,
            body: data.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn post_uses_camel_case_user_id() {
        let post: Post =
            serde_json::from_str(r#"{"id":7,"userId":3,"title":"t","body":"b"}"#).unwrap();
        assert_eq!(post.user_id, 3);

        let json = serde_json::to_value(CreatePostInput::from_form(PostFormData {
            title: "T".into(),
            body: "0123456789".into(),
        }))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"userId": 1, "title": "T", "body": "0123456789"})
        );
    }

    #[test]
    fn update_input_keeps_owner_of_loaded_post() {
        let post = Post {
            id: 9,
            user_id: 4,
            title: "old".into(),
            body: "old body".into(),
        };
        let input = UpdatePostInput::from_form(
            &post,
            PostFormData {
                title: "new".into(),
                body: "new body".into(),
            },
        );
        assert_eq!(input.id, 9);
        assert_eq!(input.user_id, 4);
        assert_eq!(input.title, "new");
    }
}
