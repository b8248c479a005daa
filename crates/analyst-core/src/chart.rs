//! Chart specification building.
//!
//! [`ChartSpecBuilder`] maps a (chart type, column selection) request to a
//! declarative [`ChartSpec`] for an external rendering engine to consume.
//! It validates the request against the table, derives any computed columns
//! (the waterfall running sum), and never renders anything itself.
//!
//! Bar and Column are intentionally identical (same mark): the UI catalog
//! offers both names for the same chart, and the equivalence is preserved
//! here rather than inventing a distinction.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{AnalystError, Result};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The fixed catalog of chart types offered by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartType {
    Bar,
    Column,
    Line,
    Scatter,
    Histogram,
    Pie,
    Waterfall,
}

impl ChartType {
    /// All chart types, in UI catalog order.
    pub const ALL: [ChartType; 7] = [
        ChartType::Bar,
        ChartType::Column,
        ChartType::Line,
        ChartType::Scatter,
        ChartType::Histogram,
        ChartType::Pie,
        ChartType::Waterfall,
    ];

    /// Whether this chart type requires a y column selection.
    ///
    /// Histogram aggregates row counts and Pie uses x alone (y, when given,
    /// only feeds the color channel), so neither requires y.
    pub fn requires_y(&self) -> bool {
        !matches!(self, ChartType::Histogram | ChartType::Pie)
    }

    /// The label shown in the UI chart-type selector.
    pub fn label(&self) -> &'static str {
        match self {
            ChartType::Bar => "Bar Chart",
            ChartType::Column => "Column Chart",
            ChartType::Line => "Line Chart",
            ChartType::Scatter => "Scatter Plot",
            ChartType::Histogram => "Histogram",
            ChartType::Pie => "Pie Chart",
            ChartType::Waterfall => "Waterfall Chart",
        }
    }
}

impl FromStr for ChartType {
    type Err = AnalystError;

    /// Parse a UI label ("Bar Chart") or bare name ("bar"), case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        for chart_type in ChartType::ALL {
            if normalized == chart_type.label().to_ascii_lowercase()
                || normalized == format!("{:?}", chart_type).to_ascii_lowercase()
            {
                return Ok(chart_type);
            }
        }
        Err(AnalystError::InvalidChartRequest(format!(
            "unrecognized chart type '{}'",
            s
        )))
    }
}

/// A user's visualization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartRequest {
    pub chart_type: ChartType,
    pub x_column: String,
    /// Required for every type except Histogram and Pie.
    pub y_column: Option<String>,
}

impl ChartRequest {
    /// Request with an x column only (Histogram, Pie).
    pub fn new(chart_type: ChartType, x_column: impl Into<String>) -> Self {
        Self {
            chart_type,
            x_column: x_column.into(),
            y_column: None,
        }
    }

    /// Request with both axis columns.
    pub fn with_y(
        chart_type: ChartType,
        x_column: impl Into<String>,
        y_column: impl Into<String>,
    ) -> Self {
        Self {
            chart_type,
            x_column: x_column.into(),
            y_column: Some(y_column.into()),
        }
    }
}

/// Visual mark drawn by the rendering engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    Bar,
    Line,
    Point,
    Arc,
}

/// Encoding channel of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    X,
    Y,
    Theta,
    Color,
}

/// What a channel is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    /// A column of the table, used as-is.
    Field(String),
    /// A column binned into an engine-chosen bin scheme.
    Binned(String),
    /// Row-count aggregate.
    Count,
    /// A computed column carried in [`ChartSpec::derived_columns`].
    Derived(String),
}

/// Declarative, engine-agnostic description of a chart.
///
/// The only artifact the builder produces; rendering (and rendering
/// failures, e.g. an unsupported axis data type) belong to the external
/// engine that consumes this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub mark: Mark,
    pub encodings: BTreeMap<Channel, Encoding>,
    /// Computed value sequences referenced by [`Encoding::Derived`].
    pub derived_columns: BTreeMap<String, Vec<f64>>,
}

impl ChartSpec {
    fn new(mark: Mark) -> Self {
        Self {
            mark,
            encodings: BTreeMap::new(),
            derived_columns: BTreeMap::new(),
        }
    }

    fn encode(mut self, channel: Channel, encoding: Encoding) -> Self {
        self.encodings.insert(channel, encoding);
        self
    }
}

/// Builder that validates a [`ChartRequest`] against a table and produces
/// the corresponding [`ChartSpec`].
pub struct ChartSpecBuilder;

impl ChartSpecBuilder {
    /// Build the chart specification for `request` over `df`.
    ///
    /// # Errors
    ///
    /// [`AnalystError::InvalidChartRequest`] when the table is empty, a
    /// referenced column is absent, or the y column is missing for a chart
    /// type that requires one.
    pub fn build(&self, df: &DataFrame, request: &ChartRequest) -> Result<ChartSpec> {
        if df.height() == 0 {
            return Err(AnalystError::InvalidChartRequest(
                "no data available for visualization".to_string(),
            ));
        }

        ensure_column(df, &request.x_column)?;

        let y_column = match &request.y_column {
            Some(y) => {
                ensure_column(df, y)?;
                Some(y.as_str())
            }
            None => None,
        };

        let x = request.x_column.as_str();
        let spec = match request.chart_type {
            // Bar and Column are the same chart under two UI names
            ChartType::Bar | ChartType::Column => {
                let y = require_y(y_column, request.chart_type)?;
                ChartSpec::new(Mark::Bar)
                    .encode(Channel::X, Encoding::Field(x.to_string()))
                    .encode(Channel::Y, Encoding::Field(y.to_string()))
            }
            ChartType::Line => {
                let y = require_y(y_column, request.chart_type)?;
                ChartSpec::new(Mark::Line)
                    .encode(Channel::X, Encoding::Field(x.to_string()))
                    .encode(Channel::Y, Encoding::Field(y.to_string()))
            }
            ChartType::Scatter => {
                let y = require_y(y_column, request.chart_type)?;
                ChartSpec::new(Mark::Point)
                    .encode(Channel::X, Encoding::Field(x.to_string()))
                    .encode(Channel::Y, Encoding::Field(y.to_string()))
            }
            ChartType::Histogram => ChartSpec::new(Mark::Bar)
                .encode(Channel::X, Encoding::Binned(x.to_string()))
                .encode(Channel::Y, Encoding::Count),
            ChartType::Pie => {
                let mut spec = ChartSpec::new(Mark::Arc)
                    .encode(Channel::Theta, Encoding::Field(x.to_string()));
                if let Some(y) = y_column {
                    spec = spec.encode(Channel::Color, Encoding::Field(y.to_string()));
                }
                spec
            }
            ChartType::Waterfall => {
                let y = require_y(y_column, request.chart_type)?;
                let cumulative = running_sum(df, y)?;
                let mut spec = ChartSpec::new(Mark::Bar)
                    .encode(Channel::X, Encoding::Field(x.to_string()))
                    .encode(Channel::Y, Encoding::Derived("cumulative".to_string()));
                spec.derived_columns
                    .insert("cumulative".to_string(), cumulative);
                spec
            }
        };

        debug!(
            "Built {:?} spec over x='{}' y={:?}",
            request.chart_type, request.x_column, request.y_column
        );

        Ok(spec)
    }
}

fn ensure_column(df: &DataFrame, name: &str) -> Result<()> {
    if df.column(name).is_err() {
        return Err(AnalystError::InvalidChartRequest(format!(
            "column '{}' not found in dataset",
            name
        )));
    }
    Ok(())
}

fn require_y(y_column: Option<&str>, chart_type: ChartType) -> Result<&str> {
    y_column.ok_or_else(|| {
        AnalystError::InvalidChartRequest(format!("{} requires a y column", chart_type.label()))
    })
}

/// Running sum of a numeric column over the table's current row order.
///
/// No sort is implied: a sorted waterfall needs a pre-sorted table. Null
/// cells contribute nothing and carry the prior total forward.
fn running_sum(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    let series = df
        .column(column)
        .map_err(|_| AnalystError::UnknownColumn(column.to_string()))?
        .as_materialized_series()
        .clone();

    if !is_numeric_dtype(series.dtype()) {
        return Err(AnalystError::InvalidChartRequest(format!(
            "column '{}' must be numeric for a waterfall chart",
            column
        )));
    }

    let cast = series.cast(&DataType::Float64)?;
    let ca = cast.f64()?;

    let mut total = 0.0;
    let mut out = Vec::with_capacity(ca.len());
    for opt in ca.into_iter() {
        if let Some(v) = opt {
            total += v;
        }
        out.push(total);
    }
    Ok(out)
}

// ============================================================================
// Tests
// ============================================================================
