//! ---
//! acts_section: "05-style-tables"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Color, alignment, font, curve, gesture, gradient and hover tables."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---

style_table! {
    /// Named colors as 0xAARRGGBB.
    Color: Number {
        White = 0xFFFF_FFFF,
        Black = 0xFF00_0000,
        Blue = 0xFF00_00FF,
        Brown = 0xFFA5_2A2A,
        Gray = 0xFF80_8080,
        Green = 0xFF00_8000,
        Orange = 0xFFFF_A500,
        Pink = 0xFFFF_C0CB,
        Red = 0xFFFF_0000,
        Yellow = 0xFFFF_FF00,
        Transparent = 0x0000_0000,
    }
}

style_table! {
    TextAlign: Number {
        Center = 0,
        Start = 1,
        End = 2,
    }
}

style_table! {
    FontWeight: Number {
        Lighter = 0,
        Normal = 1,
        Regular = 2,
        Medium = 3,
        Bold = 4,
        Bolder = 5,
    }
}

style_table! {
    /// Animation curves, passed to the renderer by name.
    Curve: Str {
        Linear = "linear",
        Ease = "ease",
        EaseIn = "ease-in",
        EaseOut = "ease-out",
        EaseInOut = "ease-in-out",
        FastOutSlowIn = "fast-out-slow-in",
        LinearOutSlowIn = "linear-out-slow-in",
        FastOutLinearIn = "fast-out-linear-in",
        ExtremeDeceleration = "extreme-deceleration",
        Sharp = "sharp",
        Rhythm = "rhythm",
        Smooth = "smooth",
        Friction = "friction",
    }
}

style_table! {
    /// How grouped gestures compete for input.
    GestureMode: Number {
        Sequence = 0,
        Parallel = 1,
        Exclusive = 2,
    }
}

style_table! {
    /// Direction of a linear gradient.
    GradientDirection: Number {
        Left = 0,
        Top = 1,
        Right = 2,
        Bottom = 3,
        LeftTop = 4,
        LeftBottom = 5,
        RightTop = 6,
        RightBottom = 7,
        None = 8,
    }
}

impl GradientDirection {
    /// Horizontal component: `Left`, `Right` or `None`.
    pub fn linear_x(self) -> GradientDirection {
        match self {
            Self::Left | Self::LeftTop | Self::LeftBottom => Self::Left,
            Self::Right | Self::RightTop | Self::RightBottom => Self::Right,
            Self::Top | Self::Bottom | Self::None => Self::None,
        }
    }

    /// Vertical component: `Top`, `Bottom` or `None`.
    pub fn linear_y(self) -> GradientDirection {
        match self {
            Self::Top | Self::LeftTop | Self::RightTop => Self::Top,
            Self::Bottom | Self::LeftBottom | Self::RightBottom => Self::Bottom,
            Self::Left | Self::Right | Self::None => Self::None,
        }
    }

    /// Recombine axis components. Components on the wrong axis count as `None`.
    pub fn from_axes(x: GradientDirection, y: GradientDirection) -> GradientDirection {
        match (x.linear_x(), y.linear_y()) {
            (Self::Left, Self::Top) => Self::LeftTop,
            (Self::Left, Self::Bottom) => Self::LeftBottom,
            (Self::Left, _) => Self::Left,
            (Self::Right, Self::Top) => Self::RightTop,
            (Self::Right, Self::Bottom) => Self::RightBottom,
            (Self::Right, _) => Self::Right,
            (_, Self::Top) => Self::Top,
            (_, Self::Bottom) => Self::Bottom,
            _ => Self::None,
        }
    }

    /// Label reported by the component inspector, e.g. `GradientDirection.LeftTop`.
    pub fn inspector_label(self) -> String {
        format!("GradientDirection.{self}")
    }
}

style_table! {
    /// Pointer hover animation.
    HoverEffect: Number {
        None = 0,
        Opacity = 1,
        Scale = 2,
        Highlight = 3,
        Auto = 4,
    }
}
