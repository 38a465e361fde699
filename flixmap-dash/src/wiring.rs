//! Reactive wiring between the dashboard controls and its outputs
//!
//! The page holds the control state and sends it with every event. Each rule
//! subscribes an output to a set of named inputs; dispatching an event
//! updates the state, fires every rule subscribed to a changed input, and
//! returns the recomputed outputs. Nothing is stored server-side.
//!
//! The slider rule feeds back into the `year` input, so it is listed before
//! the rules that read `year`. A single ordered pass over [`RULES`] is then
//! enough to settle every cascade, and each output is computed at most once
//! per dispatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use flixmap_common::{Error, Result};

use crate::catalog::{ContentFilter, ScaleMode, YearRange};
use crate::dashboard::Dashboard;
use crate::figures::{BarFigure, MapFigure};
use crate::table::TableRows;

/// Named control values the rules subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    Content,
    Year,
    Scale,
    MapClick,
    TimelineClick,
}

impl Input {
    pub const ALL: [Input; 5] = [
        Self::Content,
        Self::Year,
        Self::Scale,
        Self::MapClick,
        Self::TimelineClick,
    ];
}

/// Named page regions the rules recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Output {
    Slider,
    Map,
    Timeline,
    Table,
    ClickData,
}

/// Subscription of one output to its inputs
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub output: Output,
    pub inputs: &'static [Input],
}

impl Rule {
    fn is_triggered_by(&self, changed: &BTreeSet<Input>) -> bool {
        self.inputs.iter().any(|input| changed.contains(input))
    }
}

/// Rules in evaluation order; feedback rules first
pub const RULES: [Rule; 5] = [
    Rule {
        output: Output::Slider,
        inputs: &[Input::TimelineClick],
    },
    Rule {
        output: Output::Map,
        inputs: &[Input::Content, Input::Year, Input::Scale],
    },
    Rule {
        output: Output::Timeline,
        inputs: &[Input::MapClick],
    },
    Rule {
        output: Output::Table,
        inputs: &[Input::Content, Input::Year, Input::MapClick],
    },
    Rule {
        output: Output::ClickData,
        inputs: &[Input::MapClick],
    },
];

/// One clicked point, in Plotly's click-data shape
///
/// Only `location` (map) and `x` (timeline) are interpreted; every other
/// field is kept so the debug panel can show the full payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickData {
    pub points: Vec<ClickPoint>,
}

impl ClickData {
    fn first_point(&self) -> Result<&ClickPoint> {
        self.points
            .first()
            .ok_or_else(|| Error::InvalidInput("Click data has no points".to_string()))
    }

    /// Country of the clicked map feature
    pub fn location(&self) -> Result<&str> {
        self.first_point()?
            .location
            .as_deref()
            .ok_or_else(|| Error::InvalidInput("Clicked point has no location".to_string()))
    }

    /// Year of the clicked timeline bar
    pub fn year(&self) -> Result<i32> {
        let x = self
            .first_point()?
            .x
            .as_ref()
            .ok_or_else(|| Error::InvalidInput("Clicked point has no x value".to_string()))?;

        let year = match x {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        year.and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| Error::InvalidInput(format!("Clicked x value is not a year: {}", x)))
    }
}

/// Control state as held by the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub content: ContentFilter,
    pub year: i32,
    pub scale: ScaleMode,
    #[serde(default)]
    pub map_click: Option<ClickData>,
    #[serde(default)]
    pub timeline_click: Option<ClickData>,
}

impl DashboardState {
    /// All content, last year, auto scale, nothing clicked
    pub fn initial(years: YearRange) -> Self {
        Self {
            content: ContentFilter::All,
            year: years.max,
            scale: ScaleMode::Auto,
            map_click: None,
            timeline_click: None,
        }
    }

    /// Country selected by the last map click
    pub fn selected_country(&self) -> Result<Option<&str>> {
        self.map_click.as_ref().map(ClickData::location).transpose()
    }
}

/// A change coming from the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// Page load; fires every rule
    Init,
    Content { value: ContentFilter },
    Year { value: i32 },
    Scale { value: ScaleMode },
    MapClick { click: ClickData },
    TimelineClick { click: ClickData },
}

/// A recomputed output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "output", content = "value", rename_all = "snake_case")]
pub enum Update {
    Slider(i32),
    /// `None` when the grid has no rows for the year
    Map(Option<MapFigure>),
    Timeline(BarFigure),
    /// `None` until a country is selected
    Table(Option<TableRows>),
    /// Pretty-printed map click payload, `None` until a click
    ClickData(Option<String>),
}

impl Update {
    pub fn output(&self) -> Output {
        match self {
            Self::Slider(_) => Output::Slider,
            Self::Map(_) => Output::Map,
            Self::Timeline(_) => Output::Timeline,
            Self::Table(_) => Output::Table,
            Self::ClickData(_) => Output::ClickData,
        }
    }
}

/// Result of one dispatch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dispatched {
    pub state: DashboardState,
    pub updates: Vec<Update>,
}

/// Apply `event` to `state` and recompute every affected output
pub fn dispatch(dashboard: &Dashboard, mut state: DashboardState, event: UiEvent) -> Result<Dispatched> {
    let mut changed: BTreeSet<Input> = match event {
        UiEvent::Init => Input::ALL.into_iter().collect(),
        UiEvent::Content { value } => {
            state.content = value;
            BTreeSet::from([Input::Content])
        }
        UiEvent::Year { value } => {
            state.year = value;
            BTreeSet::from([Input::Year])
        }
        UiEvent::Scale { value } => {
            state.scale = value;
            BTreeSet::from([Input::Scale])
        }
        UiEvent::MapClick { click } => {
            click.location()?;
            state.map_click = Some(click);
            BTreeSet::from([Input::MapClick])
        }
        UiEvent::TimelineClick { click } => {
            click.year()?;
            state.timeline_click = Some(click);
            BTreeSet::from([Input::TimelineClick])
        }
    };

    let years = dashboard.year_range();
    let mut updates = Vec::new();

    for rule in RULES.iter() {
        if !rule.is_triggered_by(&changed) {
            continue;
        }

        let update = evaluate(dashboard, &state, rule.output)?;

        if let Update::Slider(year) = update {
            if !years.contains(year) {
                return Err(Error::InvalidInput(format!(
                    "Year {} is outside {}..={}",
                    year, years.min, years.max
                )));
            }
            if year != state.year {
                state.year = year;
                changed.insert(Input::Year);
            }
        }

        updates.push(update);
    }

    if !years.contains(state.year) {
        return Err(Error::InvalidInput(format!(
            "Year {} is outside {}..={}",
            state.year, years.min, years.max
        )));
    }

    Ok(Dispatched { state, updates })
}

/// Compute one output from the current state
pub fn evaluate(dashboard: &Dashboard, state: &DashboardState, output: Output) -> Result<Update> {
    let update = match output {
        Output::Slider => match &state.timeline_click {
            Some(click) => Update::Slider(click.year()?),
            None => Update::Slider(dashboard.year_range().max),
        },
        Output::Map => Update::Map(dashboard.map(state.content, state.year, state.scale)),
        Output::Timeline => Update::Timeline(dashboard.timeline(state.selected_country()?)),
        Output::Table => Update::Table(
            state
                .selected_country()?
                .map(|country| dashboard.table(country, state.year, state.content)),
        ),
        Output::ClickData => Update::ClickData(
            state
                .map_click
                .as_ref()
                .map(serde_json::to_string_pretty)
                .transpose()
                .map_err(|e| Error::Internal(format!("Encode click data: {}", e)))?,
        ),
    };
    Ok(update)
}
