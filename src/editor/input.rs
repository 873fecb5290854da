//! DOM `<input>` laid over the cell being edited.
//!
//! The element is created lazily inside the canvas's positioned parent and
//! reused for every edit. Key handling (Enter/Escape/Tab) belongs to the
//! host page.

use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Document, HtmlElement, HtmlInputElement};

use crate::types::PixelRange;

/// Fixed look of the edit box; the border color comes from settings.
const BASE_CSS: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("z-index", "1000"),
    ("box-sizing", "border-box"),
    ("outline", "none"),
    ("padding", "0 4px"),
    ("margin", "0"),
    ("background", "#fff"),
    ("display", "none"),
];

fn apply_css(style: &CssStyleDeclaration, props: &[(&str, &str)]) {
    for (name, value) in props {
        if style.set_property(name, value).is_err() {
            log::debug!("edit input rejected css {name}: {value}");
        }
    }
}

pub struct InputOverlay {
    element: Option<HtmlInputElement>,
    border: String,
}

impl InputOverlay {
    /// `accent` is the CSS color of the input's border.
    pub fn new(accent: &str) -> Self {
        Self {
            element: None,
            border: format!("2px solid {accent}"),
        }
    }

    /// Place the input over `rect`, given in the container's CSS pixels,
    /// and focus it with `value` selected.
    ///
    /// Without a `container` the input goes into `<body>`.
    pub fn show(&mut self, rect: PixelRange, value: &str, font: &str, container: Option<&HtmlElement>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(input) = self.element_in(&document, container) else {
            log::warn!("could not create edit input");
            return;
        };
        let (left, top) = (format!("{}px", rect.x()), format!("{}px", rect.y()));
        let (width, height) = (format!("{}px", rect.width()), format!("{}px", rect.height()));
        apply_css(
            &input.style(),
            &[
                ("left", left.as_str()),
                ("top", top.as_str()),
                ("width", width.as_str()),
                ("height", height.as_str()),
                ("font", font),
                ("display", "block"),
            ],
        );
        input.set_value(value);
        if input.focus().is_err() {
            log::debug!("edit input could not take focus");
        }
        input.select();
    }

    pub fn hide(&mut self) {
        if let Some(input) = &self.element {
            apply_css(&input.style(), &[("display", "none")]);
            // Blur failures leave focus where it was; nothing to undo.
            input.blur().ok();
        }
    }

    /// Current text of the input, if it was ever shown.
    pub fn value(&self) -> Option<String> {
        self.element.as_ref().map(HtmlInputElement::value)
    }

    fn element_in(&mut self, document: &Document, container: Option<&HtmlElement>) -> Option<&HtmlInputElement> {
        if self.element.is_none() {
            let input: HtmlInputElement = document.create_element("input").ok()?.dyn_into().ok()?;
            input.set_type("text");
            let style = input.style();
            apply_css(&style, BASE_CSS);
            apply_css(&style, &[("border", self.border.as_str())]);

            let parent: Option<HtmlElement> = match container {
                Some(c) => Some(c.clone()),
                None => document.body(),
            };
            parent?.append_child(&input).ok()?;
            self.element = Some(input);
        }
        self.element.as_ref()
    }
}

impl Drop for InputOverlay {
    fn drop(&mut self) {
        let Some(input) = self.element.take() else {
            return;
        };
        if let Some(parent) = input.parent_node() {
            parent.remove_child(&input).ok();
        }
    }
}
