//! Markup rendering of swap targets.
//!
//! Turns the post-pass state of each target back into an `<img>` element, so
//! the result of a pass can be inspected or dropped into a static page:
//!
//! ```html
//! <img data-target="hero" class="swap-img 768" src="hero_768.jpg"
//!      srcset="hero_480.jpg 480w, hero_768.jpg 768w">
//! <img data-target="promo" class="swap-img" hidden
//!      src="data:image/gif;base64,R0lGOD...">
//! ```
//!
//! Uses [maud](https://maud.lambda.xyz/), so every attribute value is escaped.

use crate::target::SwapTarget;
use maud::{DOCTYPE, Markup, html};

/// Class attribute: the element's own classes plus the breakpoint tag.
fn class_list(target: &SwapTarget) -> String {
    let mut classes = target.classes.clone();
    if let Some(tag) = target.breakpoint_class() {
        if !classes.contains(&tag) {
            classes.push(tag);
        }
    }
    classes.join(" ")
}

pub fn render_target(target: &SwapTarget) -> Markup {
    html! {
        img data-target=(target.id)
            class=(class_list(target))
            src=(target.src)
            srcset=[target.srcset.as_deref()]
            hidden[target.hidden];
    }
}

/// One `<img>` per target, in registration order.
pub fn render_targets(targets: &[SwapTarget]) -> Markup {
    html! {
        @for target in targets {
            (render_target(target))
            "\n"
        }
    }
}

/// A minimal standalone page wrapping [`render_targets`].
pub fn render_document(title: &str, targets: &[SwapTarget]) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (title) }
            }
            body {
                (render_targets(targets))
            }
        }
    }
}
