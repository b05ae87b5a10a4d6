// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::{CONTAINER_CLASS, IMAGES_CLASS, PLACEHOLDER_CLASS, SMALL_CLASS};
use crate::registry::{ImageBlock, Placeholder};

/// The inner markup of one block's figure: the image, wrapped in its link
/// if it has one. This is also what a drag carries.
pub(crate) fn render_block(block: &ImageBlock) -> String {
    let img = format!(
        r#"<img src="{}" draggable="true" alt="">"#,
        encode_double_quoted_attribute(block.source())
    );
    match block.link() {
        Some(href) => format!(
            r#"<a href="{}" target="_blank">{img}</a>"#,
            encode_double_quoted_attribute(href)
        ),
        None => img,
    }
}

pub(crate) fn render_placeholders<'a>(
    placeholders: impl IntoIterator<Item = &'a Placeholder>,
) -> String {
    let mut html = String::new();
    for placeholder in placeholders {
        render_placeholder(placeholder, &mut html);
    }
    html
}

fn render_placeholder(placeholder: &Placeholder, html: &mut String) {
    let mut classes = vec![CONTAINER_CLASS];
    if placeholder.is_small() {
        classes.push(SMALL_CLASS);
    }
    if placeholder.is_drop_hover() {
        classes.push("hover");
    }
    html.push_str(&format!(
        r#"<div class="{}" id="{}">"#,
        classes.join(" "),
        encode_double_quoted_attribute(&placeholder.dom_id())
    ));
    html.push_str(&format!(
        r#"<div class="{PLACEHOLDER_CLASS}" draggable="true">"#
    ));
    for block in placeholder.blocks() {
        html.push_str(&format!(
            r#"<figure class="{IMAGES_CLASS}">{}</figure>"#,
            render_block(block)
        ));
    }
    for progress in placeholder.progress() {
        html.push_str(&format!(
            r#"<progress class="progress" min="0" max="100" value="{0}">{0}</progress>"#,
            progress.percent
        ));
    }
    for notice in placeholder.notices() {
        html.push_str(&format!(
            r#"<div class="mediumInsert-error">{}</div>"#,
            encode_text(&notice.message)
        ));
    }
    html.push_str("</div></div>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{find_placeholders, FoundImage};
    use crate::registry::Registry;

    #[test]
    fn block_markup_escapes_attributes() {
        let mut registry = Registry::new();
        let block =
            registry.new_block(r#"a"b.png"#, Some("https://x?a=1&b=2".into()));
        assert_eq!(
            render_block(&block),
            r#"<a href="https://x?a=1&amp;b=2" target="_blank"><img src="a&quot;b.png" draggable="true" alt=""></a>"#
        );
    }

    #[test]
    fn empty_placeholder_renders_both_containers() {
        let mut registry = Registry::new();
        registry.create_placeholder();
        assert_eq!(
            render_placeholders(registry.placeholders()),
            r#"<div class="mediumInsert" id="mediumInsert-0"><div class="mediumInsert-placeholder" draggable="true"></div></div>"#
        );
    }

    #[test]
    fn rendered_markup_can_be_adopted_again() {
        let mut registry = Registry::new();
        let p = registry.create_placeholder();
        let a = registry.new_block("a.png", None);
        let b = registry.new_block("b.png", Some("https://x".into()));
        registry.append_block(p, a);
        registry.append_block(p, b);
        registry.set_small(p, true);

        let found = find_placeholders(&render_placeholders(
            registry.placeholders(),
        ));
        assert_eq!(found.len(), 1);
        assert!(found[0].small);
        assert_eq!(found[0].dom_id.as_deref(), Some("mediumInsert-0"));
        assert_eq!(
            found[0].images,
            vec![
                FoundImage {
                    source: "a.png".into(),
                    link: None
                },
                FoundImage {
                    source: "b.png".into(),
                    link: Some("https://x".into())
                },
            ]
        );
    }
}
