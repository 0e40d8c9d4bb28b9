//! Rendering seam between assembled pages and the template engine.

use axum::response::Html;

use super::views::{
    AdminIndexTemplate, AllAuthorsTemplate, AllTagsTemplate, BlogIndexTemplate, BlogPostTemplate,
    LoginTemplate, PageView, PostEditorTemplate, ProfileTemplate, ResetPasswordTemplate,
    TagTemplate, TemplateRenderError, UserEditorTemplate, render_template,
};

pub trait ViewRenderer: Send + Sync {
    fn render(&self, page: PageView) -> Result<Html<String>, TemplateRenderError>;
}

/// Renders pages with the compiled askama templates under `templates/blog`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AskamaViewRenderer;

impl ViewRenderer for AskamaViewRenderer {
    fn render(&self, page: PageView) -> Result<Html<String>, TemplateRenderError> {
        match page {
            PageView::BlogIndex(view) => render_template(BlogIndexTemplate { view }),
            PageView::BlogPost(view) => render_template(BlogPostTemplate { view }),
            PageView::Tag(view) => render_template(TagTemplate { view }),
            PageView::AllTags(view) => render_template(AllTagsTemplate { view }),
            PageView::AllAuthors(view) => render_template(AllAuthorsTemplate { view }),
            PageView::Profile(view) => render_template(ProfileTemplate { view }),
            PageView::PostEditor(view) => render_template(PostEditorTemplate { view }),
            PageView::UserEditor(view) => render_template(UserEditorTemplate { view }),
            PageView::Login(view) => render_template(LoginTemplate { view }),
            PageView::AdminIndex(view) => render_template(AdminIndexTemplate { view }),
            PageView::ResetPassword(view) => render_template(ResetPasswordTemplate { view }),
        }
    }
}
