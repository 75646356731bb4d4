use serde::{Deserialize, Serialize};

/// Declared value type of an axis field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisType {
    Number,
    Time,
    /// Categorical axis rendered as bands.
    String,
    /// Categorical axis rendered as discrete points.
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Top,
    Bottom,
    Left,
    Right,
}

impl Placement {
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Declarative axis description consumed by the scale builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDecl {
    pub field: String,
    #[serde(rename = "type")]
    pub axis_type: AxisType,
    pub placement: Placement,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub domain: Option<Vec<String>>,
    #[serde(default)]
    pub padding: Option<f64>,
    #[serde(default)]
    pub is_grid_line: bool,
    #[serde(default)]
    pub is_round: bool,
    #[serde(default)]
    pub tick_format: Option<String>,
}

impl AxisDecl {
    #[must_use]
    pub fn new(field: impl Into<String>, axis_type: AxisType, placement: Placement) -> Self {
        Self {
            field: field.into(),
            axis_type,
            placement,
            min: None,
            max: None,
            domain: None,
            padding: None,
            is_grid_line: false,
            is_round: false,
            tick_format: None,
        }
    }

    #[must_use]
    pub fn number(field: impl Into<String>, placement: Placement) -> Self {
        Self::new(field, AxisType::Number, placement)
    }

    #[must_use]
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: Vec<String>) -> Self {
        self.domain = Some(domain);
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    #[must_use]
    pub fn with_round(mut self, is_round: bool) -> Self {
        self.is_round = is_round;
        self
    }

    #[must_use]
    pub fn with_grid_line(mut self, is_grid_line: bool) -> Self {
        self.is_grid_line = is_grid_line;
        self
    }

    #[must_use]
    pub fn with_tick_format(mut self, format: impl Into<String>) -> Self {
        self.tick_format = Some(format.into());
        self
    }
}
