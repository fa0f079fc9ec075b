//! Line and marker styling, including matplotlib format strings (`"b."`,
//! `"r-"`, `"k--"`).

use serde::{Deserialize, Serialize};

use crate::color::{Color, CYCLE};
use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    DashDot,
    /// Markers only.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    None,
    Point,
    Circle,
    Square,
    Triangle,
    Cross,
    Plus,
    Star,
}

/// Visual style of a line/marker series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub color: Color,
    pub line: LineStyle,
    pub marker: Marker,
    pub line_width: f64,
    pub marker_size: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self::line(CYCLE[0])
    }
}

impl Style {
    /// Solid line, no markers.
    pub fn line(color: Color) -> Self {
        Self {
            color,
            line: LineStyle::Solid,
            marker: Marker::None,
            line_width: 1.5,
            marker_size: 6.0,
        }
    }

    /// Small point markers, no connecting line.
    pub fn points(color: Color) -> Self {
        Self::markers(color, Marker::Point)
    }

    pub fn markers(color: Color, marker: Marker) -> Self {
        Self {
            color,
            line: LineStyle::None,
            marker,
            line_width: 1.5,
            marker_size: 6.0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = line;
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_marker_size(mut self, size: f64) -> Self {
        self.marker_size = size;
        self
    }

    pub fn draws_line(&self) -> bool {
        self.line != LineStyle::None
    }

    pub fn draws_markers(&self) -> bool {
        self.marker != Marker::None
    }

    /// Parse a matplotlib format string: any combination of one color
    /// letter, one marker and one line style.
    ///
    /// A marker without a line style yields markers only; an empty string
    /// yields a solid line in the first cycle color.
    pub fn from_fmt(fmt: &str) -> Result<Self, ModelError> {
        let invalid = || ModelError::InvalidFormat(fmt.to_string());
        let mut color = None;
        let mut marker = None;
        let mut line = None;

        let chars: Vec<char> = fmt.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();
            let (parsed_line, consumed) = match (c, next) {
                ('-', Some('-')) => (Some(LineStyle::Dashed), 2),
                ('-', Some('.')) => (Some(LineStyle::DashDot), 2),
                ('-', _) => (Some(LineStyle::Solid), 1),
                (':', _) => (Some(LineStyle::Dotted), 1),
                _ => (None, 1),
            };
            if let Some(l) = parsed_line {
                if line.replace(l).is_some() {
                    return Err(invalid());
                }
                i += consumed;
                continue;
            }

            let parsed_marker = match c {
                '.' => Some(Marker::Point),
                'o' => Some(Marker::Circle),
                's' => Some(Marker::Square),
                '^' => Some(Marker::Triangle),
                'x' => Some(Marker::Cross),
                '+' => Some(Marker::Plus),
                '*' => Some(Marker::Star),
                _ => None,
            };
            if let Some(m) = parsed_marker {
                if marker.replace(m).is_some() {
                    return Err(invalid());
                }
            } else if "bgrcmykw".contains(c) {
                let parsed = Color::from_name(&c.to_string()).ok_or_else(invalid)?;
                if color.replace(parsed).is_some() {
                    return Err(invalid());
                }
            } else {
                return Err(invalid());
            }
            i += 1;
        }

        let line = match (line, marker) {
            (Some(l), _) => l,
            (None, Some(_)) => LineStyle::None,
            (None, None) => LineStyle::Solid,
        };
        Ok(Self {
            color: color.unwrap_or(CYCLE[0]),
            line,
            marker: marker.unwrap_or(Marker::None),
            line_width: 1.5,
            marker_size: 6.0,
        })
    }
}
