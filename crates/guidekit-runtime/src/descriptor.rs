#![forbid(unsafe_code)]

//! Step descriptors: the visual contract for one tour step.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use guidekit_core::geometry::Rect;

/// A host callback. Shared so the store can hand out a copy and invoke it
/// without holding its own borrow.
pub type Callback = Rc<dyn Fn()>;

/// Where a tooltip (or its arrow) sits relative to the highlighted rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Placement {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Horizontal alignment component of a [`Placement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

impl Placement {
    pub const ALL: [Placement; 6] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Above the target.
    pub const fn is_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopCenter | Self::TopRight)
    }

    pub const fn align(self) -> HorizontalAlign {
        match self {
            Self::TopLeft | Self::BottomLeft => HorizontalAlign::Left,
            Self::TopCenter | Self::BottomCenter => HorizontalAlign::Center,
            Self::TopRight | Self::BottomRight => HorizontalAlign::Right,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "topLeft",
            Self::TopCenter => "topCenter",
            Self::TopRight => "topRight",
            Self::BottomLeft => "bottomLeft",
            Self::BottomCenter => "bottomCenter",
            Self::BottomRight => "bottomRight",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placement {
    type Err = String;

    /// Accepts the camelCase names (`topLeft`) and snake_case (`top_left`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().to_lowercase() == normalized)
            .ok_or_else(|| format!("unknown placement: {s}"))
    }
}

/// Tooltip content attached to a step.
#[derive(Clone)]
pub struct TooltipSpec {
    pub title: Option<String>,
    pub body: Option<String>,
    /// Label of the "next" button. Hosts usually localise this.
    pub button_label: Option<String>,
    /// Where the bubble sits. `None` pins it to the rectangle's origin.
    pub placement: Option<Placement>,
    /// Where the arrow sits on the bubble.
    pub arrow: Placement,
    /// Runs before the tour advances when the button is pressed.
    pub on_press_button: Option<Callback>,
}

impl TooltipSpec {
    /// A tooltip with no content, placed and pointing by `placement`.
    pub fn new(placement: Placement) -> Self {
        Self {
            title: None,
            body: None,
            button_label: None,
            placement: Some(placement),
            arrow: placement,
            on_press_button: None,
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn button_label(mut self, label: impl Into<String>) -> Self {
        self.button_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn placement(mut self, placement: Option<Placement>) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn arrow(mut self, arrow: Placement) -> Self {
        self.arrow = arrow;
        self
    }

    #[must_use]
    pub fn on_press_button(mut self, f: impl Fn() + 'static) -> Self {
        self.on_press_button = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for TooltipSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TooltipSpec")
            .field("title", &self.title)
            .field("body", &self.body)
            .field("button_label", &self.button_label)
            .field("placement", &self.placement)
            .field("arrow", &self.arrow)
            .field("on_press_button", &self.on_press_button.is_some())
            .finish()
    }
}

/// Payload of the mask-highlight variant.
#[derive(Clone, Default)]
pub struct MaskStep {
    /// Absolute rectangle of the highlighted region, padding included.
    pub rect: Option<Rect>,
    /// Runs when the highlighted region is touched, before advancing.
    pub on_press: Option<Callback>,
    pub tooltip: Option<TooltipSpec>,
}

impl MaskStep {
    #[must_use]
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: TooltipSpec) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    #[must_use]
    pub fn on_press(mut self, f: impl Fn() + 'static) -> Self {
        self.on_press = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for MaskStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskStep")
            .field("rect", &self.rect)
            .field("on_press", &self.on_press.is_some())
            .field("tooltip", &self.tooltip)
            .finish()
    }
}

/// Discriminant of [`StepDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Mask,
}

/// The visual contract for one step.
#[derive(Debug, Clone)]
pub enum StepDescriptor {
    /// Dim everything except a rounded cut-out, with an optional tooltip.
    Mask(MaskStep),
}

impl StepDescriptor {
    pub fn kind(&self) -> StepKind {
        match self {
            Self::Mask(_) => StepKind::Mask,
        }
    }

    pub fn rect(&self) -> Option<Rect> {
        match self {
            Self::Mask(step) => step.rect,
        }
    }

    pub fn as_mask(&self) -> Option<&MaskStep> {
        match self {
            Self::Mask(step) => Some(step),
        }
    }

    /// A copy of this descriptor with only the rectangle replaced.
    #[must_use]
    pub fn with_rect(&self, rect: Option<Rect>) -> Self {
        match self {
            Self::Mask(step) => Self::Mask(MaskStep {
                rect,
                ..step.clone()
            }),
        }
    }
}

impl From<MaskStep> for StepDescriptor {
    fn from(step: MaskStep) -> Self {
        Self::Mask(step)
    }
}

/// What a descriptor write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorUpdate {
    /// No entry existed; the proposed descriptor was stored as is.
    Inserted,
    /// The rectangle of the existing entry was replaced.
    Replaced,
    /// Same rectangle as stored; nothing changed.
    Unchanged,
    /// Existing entry is a different variant; nothing changed.
    KindMismatch,
}

impl DescriptorUpdate {
    /// Whether the store was modified.
    pub const fn is_change(self) -> bool {
        matches!(self, Self::Inserted | Self::Replaced)
    }
}
