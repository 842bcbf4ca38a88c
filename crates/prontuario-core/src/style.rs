//! # Color Tag Styles
//!
//! Maps each [`ColorTag`] to the utility class strings the catalog front
//! end renders for category badges and menu entries. The table covers all
//! twelve tags; [`Style::NEUTRAL`] is the gray fallback used for the
//! "all categories" option.

use serde::Serialize;

use crate::category::ColorTag;

/// Presentation classes for one color tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Style {
    /// Badge classes: background, text and border.
    pub badge: &'static str,
    /// Text-only class for menu entries.
    pub text: &'static str,
}

impl Style {
    /// Gray style for entries that carry no category.
    pub const NEUTRAL: Style = Style {
        badge: "bg-gray-100 text-gray-700 border-gray-300",
        text: "text-gray-700",
    };
}

impl ColorTag {
    /// Style classes for this tag.
    pub const fn style(&self) -> Style {
        match self {
            Self::Red => Style {
                badge: "bg-red-100 text-red-700 border-red-300",
                text: "text-red-700",
            },
            Self::Emerald => Style {
                badge: "bg-emerald-100 text-emerald-700 border-emerald-300",
                text: "text-emerald-700",
            },
            Self::Blue => Style {
                badge: "bg-blue-100 text-blue-700 border-blue-300",
                text: "text-blue-700",
            },
            Self::Teal => Style {
                badge: "bg-teal-100 text-teal-700 border-teal-300",
                text: "text-teal-700",
            },
            Self::Purple => Style {
                badge: "bg-purple-100 text-purple-700 border-purple-300",
                text: "text-purple-700",
            },
            Self::Orange => Style {
                badge: "bg-orange-100 text-orange-700 border-orange-300",
                text: "text-orange-700",
            },
            Self::Amber => Style {
                badge: "bg-amber-100 text-amber-700 border-amber-300",
                text: "text-amber-700",
            },
            Self::Lime => Style {
                badge: "bg-lime-100 text-lime-700 border-lime-300",
                text: "text-lime-700",
            },
            Self::Cyan => Style {
                badge: "bg-cyan-100 text-cyan-700 border-cyan-300",
                text: "text-cyan-700",
            },
            Self::Green => Style {
                badge: "bg-green-100 text-green-700 border-green-300",
                text: "text-green-700",
            },
            Self::Indigo => Style {
                badge: "bg-indigo-100 text-indigo-700 border-indigo-300",
                text: "text-indigo-700",
            },
            Self::Slate => Style {
                badge: "bg-slate-100 text-slate-700 border-slate-300",
                text: "text-slate-700",
            },
        }
    }
}
