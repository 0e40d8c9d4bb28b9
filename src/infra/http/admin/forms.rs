use serde::Deserialize;

use crate::application::admin::parse_tag_list;

pub(super) const TITLE_MISSING: &str = "You must specify a blog post title";
pub(super) const CONTENTS_MISSING: &str = "You must have some content in your blog post";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct PostForm {
    pub(super) title: String,
    pub(super) contents: String,
    pub(super) tags: String,
    pub(super) publish: Option<String>,
}

impl PostForm {
    /// Unchecked boxes are absent from the submitted form.
    pub(super) fn published(&self) -> bool {
        self.publish
            .as_deref()
            .is_some_and(|value| matches!(value, "true" | "on" | "1"))
    }

    pub(super) fn tag_names(&self) -> Vec<String> {
        parse_tag_list(&self.tags)
    }

    pub(super) fn errors(&self) -> Option<Vec<String>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(TITLE_MISSING.to_string());
        }
        if self.contents.trim().is_empty() {
            errors.push(CONTENTS_MISSING.to_string());
        }
        (!errors.is_empty()).then_some(errors)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct LoginQuery {
    #[serde(rename = "loginRequired")]
    pub(super) login_required: Option<String>,
}
