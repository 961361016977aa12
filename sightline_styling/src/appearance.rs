// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual style descriptors applied to sets of tree indices.

use serde::{Deserialize, Serialize};

/// An 8-bit sRGB color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Outline palette understood by the renderer.
///
/// The discriminants are the values written into the per-node style texture.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeOutlineColor {
    /// No outline is drawn.
    #[default]
    NoOutline = 0,
    /// White outline.
    White = 1,
    /// Black outline.
    Black = 2,
    /// Cyan outline.
    Cyan = 3,
    /// Blue outline.
    Blue = 4,
    /// Green outline.
    Green = 5,
    /// Red outline.
    Red = 6,
    /// Orange outline.
    Orange = 7,
}

/// How a set of nodes should be drawn.
///
/// Every field is optional: `None` leaves whatever a lower-priority style (or
/// the model default) specified. Use [`merge`](Self::merge) to layer styles.
///
/// ```rust
/// use sightline_styling::{NodeAppearance, NodeOutlineColor};
///
/// let style = NodeAppearance::GHOSTED.merge(&NodeAppearance::OUTLINED);
/// assert_eq!(style.render_ghosted, Some(true));
/// assert_eq!(style.outline_color, Some(NodeOutlineColor::White));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAppearance {
    /// Whether the nodes are drawn at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Color override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    /// Outline drawn around the nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_color: Option<NodeOutlineColor>,
    /// Draw on top of other geometry, ignoring depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_in_front: Option<bool>,
    /// Draw as semi-transparent ghost geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_ghosted: Option<bool>,
}

impl NodeAppearance {
    /// Plain visible rendering with no overrides.
    pub const DEFAULT: Self = Self {
        visible: Some(true),
        color: None,
        outline_color: Some(NodeOutlineColor::NoOutline),
        render_in_front: Some(false),
        render_ghosted: Some(false),
    };

    /// White outline.
    pub const OUTLINED: Self = Self {
        visible: Some(true),
        color: None,
        outline_color: Some(NodeOutlineColor::White),
        render_in_front: None,
        render_ghosted: None,
    };

    /// Not drawn.
    pub const HIDDEN: Self = Self {
        visible: Some(false),
        color: None,
        outline_color: None,
        render_in_front: None,
        render_ghosted: None,
    };

    /// Drawn on top of everything else.
    pub const IN_FRONT: Self = Self {
        visible: Some(true),
        color: None,
        outline_color: None,
        render_in_front: Some(true),
        render_ghosted: None,
    };

    /// Drawn as ghost geometry.
    pub const GHOSTED: Self = Self {
        visible: Some(true),
        color: None,
        outline_color: None,
        render_in_front: None,
        render_ghosted: Some(true),
    };

    /// Tinted, outlined and drawn in front.
    pub const HIGHLIGHTED: Self = Self {
        visible: Some(true),
        color: Some(Rgb::new(100, 100, 255)),
        outline_color: Some(NodeOutlineColor::White),
        render_in_front: Some(true),
        render_ghosted: None,
    };

    /// Returns `self` with every field that `overlay` sets replaced by the overlay's value.
    #[must_use]
    pub fn merge(&self, overlay: &Self) -> Self {
        Self {
            visible: overlay.visible.or(self.visible),
            color: overlay.color.or(self.color),
            outline_color: overlay.outline_color.or(self.outline_color),
            render_in_front: overlay.render_in_front.or(self.render_in_front),
            render_ghosted: overlay.render_ghosted.or(self.render_ghosted),
        }
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
