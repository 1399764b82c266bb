use alloc::string::String;
use alloc::vec::Vec;

use lazymedia::LoadStatus;

/// A rendered element kind the generic controller is parameterized over.
///
/// The two stock kinds are [`Image`] and [`Video`]; the controller logic is
/// identical for both, only the tag and the default subtype differ.
pub trait ElementKind {
    /// Markup tag of the rendered element.
    const TAG: &'static str;

    /// Default resource subtype when the caller supplies none.
    fn default_subtype() -> Option<&'static str> {
        None
    }
}

/// Still-image elements (`img`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Image;

impl ElementKind for Image {
    const TAG: &'static str = "img";
}

/// Video elements (`video`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Video;

impl ElementKind for Video {
    const TAG: &'static str = "video";

    fn default_subtype() -> Option<&'static str> {
        Some("video/mov")
    }
}

/// Maps a load outcome to its presentational classification.
///
/// The two non-empty classes are mutually exclusive; styling keyed off
/// `"has-error"` shows the placeholder fallback regardless of anything else.
pub fn status_class(status: LoadStatus) -> &'static str {
    match status {
        LoadStatus::Pending => "",
        LoadStatus::Loaded => "loaded",
        LoadStatus::Errored => "has-error",
    }
}

/// Caller-supplied presentational configuration for one media slot.
///
/// Everything defaults to empty; `subtype` falls back to the element kind's
/// default (`"video/mov"` for [`Video`], none for [`Image`]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaProps {
    /// The real resource URL.
    pub source: String,
    /// Alternate text for the rendered element.
    pub alternate_text: String,
    /// Styling hook, prepended to the status classification.
    pub class_name: String,
    /// Resource subtype; `None` uses the kind's default.
    pub subtype: Option<String>,
    /// Arbitrary attributes passed through to the rendered element, in
    /// insertion order.
    pub extra: Vec<(String, String)>,
}

impl MediaProps {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn with_alternate_text(mut self, alternate_text: impl Into<String>) -> Self {
        self.alternate_text = alternate_text.into();
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }
}

/// A renderable description of one media element.
///
/// This is the full rendered-output contract: what to show (`source`), how it
/// is classified (`class` carries `"loaded"`/`"has-error"`), and the
/// pass-through presentation attributes. It holds no behavior; the embedding
/// layer turns it into a real platform element and wires that element's
/// load/error events back into the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MediaElement {
    pub tag: &'static str,
    pub source: String,
    pub alternate_text: String,
    /// Caller class plus the status classification, space-separated.
    pub class: String,
    pub subtype: Option<String>,
    pub attributes: Vec<(String, String)>,
}

impl MediaElement {
    /// Whether the error classification is present. The fallback visual
    /// applies whenever it is, independent of `loaded`.
    pub fn has_error(&self) -> bool {
        self.class.split_whitespace().any(|c| c == "has-error")
    }

    pub fn is_loaded(&self) -> bool {
        self.class.split_whitespace().any(|c| c == "loaded")
    }
}
