//! Markup for every block the compiler emits.
//!
//! Block-level elements carry matching `name` and `id` attributes; the
//! editor uses both.

use crate::ids::BlockId;
use crate::images::ResolvedImage;

use super::kinds::ListKind;

pub const FENCE_CLOSE: &str = "</code></pre>";
pub const LIST_ITEM_CLOSE: &str = "</li>";

pub fn element(tag: &str, id: &BlockId, inner: &str) -> String {
    format!(r#"<{tag} name="{id}" id="{id}">{inner}</{tag}>"#)
}

pub fn rule(id: &BlockId) -> String {
    format!(r#"<hr name="{id}" id="{id}">"#)
}

pub fn fence_open(id: &BlockId, language: &str) -> String {
    format!(r#"<pre name="{id}" id="{id}" data-lang="{language}"><code>"#)
}

pub fn table_of_contents(id: &BlockId) -> String {
    format!(r#"<table-of-contents name="{id}" id="{id}"><br></table-of-contents>"#)
}

/// Zero-width marker opening the pay stream.
pub fn pay_anchor(id: &BlockId) -> String {
    element("span", id, "")
}

pub fn figure(id: &BlockId, image: &ResolvedImage, caption: &str) -> String {
    let url = &image.url;
    let key = &image.storage_key;
    format!(
        concat!(
            r#"<figure name="{id}" id="{id}" class="note-image" data-image-key="{key}">"#,
            r#"<a href="{url}" rel="noopener noreferrer" target="_blank">"#,
            r#"<img src="{url}" alt="画像" data-src="{url}"></a>"#,
            r#"<figcaption>{caption}</figcaption></figure>"#,
        ),
        id = id,
        key = key,
        url = url,
        caption = caption,
    )
}

pub fn list_open(kind: ListKind, id: &BlockId) -> String {
    match kind {
        ListKind::Ordered => format!(r#"<ol data-start="1" name="{id}" id="{id}">"#),
        ListKind::Unordered => format!(r#"<ul name="{id}" id="{id}">"#),
    }
}

pub fn list_close(kind: ListKind) -> String {
    format!("</{}>", kind.tag())
}

/// Opens a list item whose paragraph is already complete; the `<li>` itself
/// stays open so deeper items can nest inside it.
pub fn list_item_open(paragraph_id: &BlockId, inner: &str) -> String {
    format!("<li>{}", element("p", paragraph_id, inner))
}
