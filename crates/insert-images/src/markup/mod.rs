// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Reading and writing the addon's markup.
//!
//! The class vocabulary is shared with existing content, so previously
//! saved documents can be adopted:
//!
//! ```text
//! div.mediumInsert[#id][.small]
//! └ div.mediumInsert-placeholder
//!   ├ figure.mediumInsert-images
//!   │ └ [a[href]] img[src]
//!   ├ progress.progress
//!   └ div.mediumInsert-error
//! ```

mod padom;
mod padom_creator;
mod render;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use padom::{PaDom, PaDomHandle};
use padom_creator::PaDomCreator;
pub(crate) use render::{render_block, render_placeholders};

pub(crate) const CONTAINER_CLASS: &str = "mediumInsert";
pub(crate) const PLACEHOLDER_CLASS: &str = "mediumInsert-placeholder";
pub(crate) const IMAGES_CLASS: &str = "mediumInsert-images";
pub(crate) const SMALL_CLASS: &str = "small";

static META_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<meta[^>]*>").expect("meta tag pattern is valid")
});

/// An image found in markup, before it becomes a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FoundImage {
    pub(crate) source: String,
    pub(crate) link: Option<String>,
}

/// A group of image figures sharing one container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FoundPlaceholder {
    pub(crate) dom_id: Option<String>,
    pub(crate) small: bool,
    pub(crate) images: Vec<FoundImage>,
}

fn parse(html: &str) -> PaDom {
    PaDomCreator::parse(html).unwrap_or_else(|e| {
        debug!(errors = ?e.parse_errors, "recovered from malformed markup");
        e.dom
    })
}

/// Group every `figure.mediumInsert-images` by the element holding it.
/// Figures directly under a `.mediumInsert-placeholder` take their id and
/// size from the placeholder's own container, the way the addon renders
/// them; bare figures take them from their direct parent.
pub(crate) fn find_placeholders(html: &str) -> Vec<FoundPlaceholder> {
    let dom = parse(html);
    let mut groups: Vec<(PaDomHandle, FoundPlaceholder)> = Vec::new();

    for figure in dom.walk() {
        let is_figure = dom
            .container(&figure)
            .is_some_and(|c| c.has_class(IMAGES_CLASS));
        if !is_figure {
            continue;
        }
        let Some(image) = image_in(&dom, &figure) else {
            continue;
        };
        let Some(parent) = dom.parent_of(&figure) else {
            continue;
        };

        if let Some((_, group)) = groups.iter_mut().find(|(h, _)| *h == parent)
        {
            group.images.push(image);
            continue;
        }

        let holder = match dom.container(&parent) {
            Some(c) if c.has_class(PLACEHOLDER_CLASS) => {
                dom.parent_of(&parent).unwrap_or(parent.clone())
            }
            _ => parent.clone(),
        };
        let holder = dom.container(&holder);
        groups.push((
            parent,
            FoundPlaceholder {
                dom_id: holder
                    .and_then(|c| c.get_attr("id"))
                    .filter(|id| !id.is_empty())
                    .map(str::to_owned),
                small: holder.is_some_and(|c| c.has_class(SMALL_CLASS)),
                images: vec![image],
            },
        ));
    }

    groups.into_iter().map(|(_, group)| group).collect()
}

/// The image carried by a dragged figure's markup. `<meta>` tags some
/// browsers prepend to drag data are stripped first.
pub(crate) fn find_dropped_image(html: &str) -> Option<FoundImage> {
    let cleaned = META_TAG.replace_all(html, "");
    let dom = parse(&cleaned);
    image_in(&dom, dom.document_handle())
}

fn image_in(dom: &PaDom, root: &PaDomHandle) -> Option<FoundImage> {
    let link = dom.find_descendant(root, "a").filter(|a| {
        dom.find_descendant(a, "img").is_some()
    });
    let img = match &link {
        Some(a) => dom.find_descendant(a, "img"),
        None => dom.find_descendant(root, "img"),
    }?;
    let source = dom.container(&img)?.get_attr("src")?;
    if source.is_empty() {
        return None;
    }
    Some(FoundImage {
        source: source.to_owned(),
        link: link
            .and_then(|a| dom.container(&a)?.get_attr("href"))
            .map(str::to_owned),
    })
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn image(source: &str, link: Option<&str>) -> FoundImage {
        FoundImage {
            source: source.into(),
            link: link.map(Into::into),
        }
    }

    #[test]
    fn finds_managed_placeholders_with_id_and_size() {
        let html = indoc! {r#"
            <p>intro</p>
            <div class="mediumInsert small" id="mediumInsert-4">
              <div class="mediumInsert-placeholder" draggable="true">
                <figure class="mediumInsert-images"><img src="a.png"></figure>
                <figure class="mediumInsert-images">
                  <a href="https://x" target="_blank"><img src="b.png"></a>
                </figure>
              </div>
            </div>
        "#};
        assert_eq!(
            find_placeholders(html),
            vec![FoundPlaceholder {
                dom_id: Some("mediumInsert-4".into()),
                small: true,
                images: vec![
                    image("a.png", None),
                    image("b.png", Some("https://x")),
                ],
            }]
        );
    }

    #[test]
    fn bare_figures_are_grouped_by_their_parent() {
        let html = indoc! {r#"
            <div class="mediumInsert" id="one">
              <figure class="mediumInsert-images"><img src="a.png"></figure>
            </div>
            <div class="mediumInsert" id="two">
              <figure class="mediumInsert-images"><img src="b.png"></figure>
              <figure class="mediumInsert-images"><img src="c.png"></figure>
            </div>
        "#};
        let found = find_placeholders(html);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].dom_id.as_deref(), Some("one"));
        assert_eq!(found[0].images, vec![image("a.png", None)]);
        assert_eq!(found[1].dom_id.as_deref(), Some("two"));
        assert!(!found[1].small);
        assert_eq!(
            found[1].images,
            vec![image("b.png", None), image("c.png", None)]
        );
    }

    #[test]
    fn figures_without_images_are_skipped() {
        let html = r#"<div><figure class="mediumInsert-images"></figure><figure class="other"><img src="x"></figure></div>"#;
        assert!(find_placeholders(html).is_empty());
    }

    #[test]
    fn dropped_markup_ignores_meta_and_keeps_link() {
        let html = r#"<meta charset="utf-8"><a href="https://x" target="_blank"><img src="cat.png" draggable="true" alt=""></a>"#;
        assert_eq!(
            find_dropped_image(html),
            Some(image("cat.png", Some("https://x")))
        );
    }

    #[test]
    fn dropped_markup_without_image_is_nothing() {
        assert_eq!(find_dropped_image("<p>just text</p>"), None);
        assert_eq!(find_dropped_image(""), None);
        assert_eq!(find_dropped_image(r#"<img src="">"#), None);
    }
}
