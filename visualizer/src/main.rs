use growthcore::records::GrowthCoordinate;
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke, Text},
        column, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BRIDGE_URL: &str = "http://127.0.0.1:9000";
const MARGIN: f32 = 48.0;

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Covid Growth Visualizer".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(1)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    query: String,
    payload: Option<GrowthPayload>,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PayloadFetched(Result<GrowthPayload, String>),
    QueryChanged(String),
    SubmitQuery,
    QueryAnswered(Result<QueryResponse, String>),
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                query: "us plot".into(),
                payload: None,
                status: "Waiting for the bridge...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_payload(), Message::PayloadFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_payload(), Message::PayloadFetched),
            Message::PayloadFetched(Ok(payload)) => {
                state.status = if payload.location.is_empty() {
                    "Bridge up, no chart yet".into()
                } else {
                    format!(
                        "{}: {} positive, {} points",
                        payload.location,
                        payload.current_positive,
                        payload.coordinates.len()
                    )
                };
                state.payload = Some(payload);
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::QueryChanged(value) => {
                state.query = value;
                Task::none()
            }
            Message::SubmitQuery => {
                let tokens = state
                    .query
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>();
                Task::perform(post_query(tokens), Message::QueryAnswered)
            }
            Message::QueryAnswered(Ok(response)) => {
                state.push_history(format!("{} ({} points)", response.reply, response.points));
                Task::perform(fetch_payload(), Message::PayloadFetched)
            }
            Message::QueryAnswered(Err(err)) => {
                state.status = format!("Query error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let coordinates = state
            .payload
            .as_ref()
            .map(|payload| payload.coordinates.clone())
            .unwrap_or_default();
        let notes = state
            .payload
            .as_ref()
            .map(|payload| payload.notes.clone())
            .unwrap_or_default();

        let query_column = column![
            text("Query").size(26),
            text_input("e.g. ca plot", &state.query)
                .on_input(Message::QueryChanged)
                .on_submit(Message::SubmitQuery)
                .padding(6),
            button("Ask").on_press(Message::SubmitQuery).padding(10),
            text(&state.status).size(14),
            column![
                text("Usage").size(16),
                text("A state code or name, or nothing for the whole country.").size(12),
                text("Add `plot` or `graph` to refresh the chart.").size(12),
            ]
            .spacing(4)
            .padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(320.0));

        let title = match &state.payload {
            Some(payload) if !payload.location.is_empty() => {
                format!("Logarithmic Covid Growth Rate: {}", payload.location)
            }
            _ => "Logarithmic Covid Growth Rate".to_string(),
        };

        let chart = Canvas::new(GrowthChart::new(&coordinates))
            .width(Length::Fill)
            .height(Length::Fixed(420.0));

        let notes_list = if notes.is_empty() {
            Column::new().push(text("No notes yet").size(14))
        } else {
            notes
                .iter()
                .fold(Column::new().spacing(4), |col, note| {
                    col.push(text(note.clone()).size(14))
                })
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No replies yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let chart_column = column![
            text(title).size(24),
            chart,
            text("Notes").size(16),
            Container::new(notes_list).padding(6),
            text("Replies").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(120.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![query_column, chart_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn fetch_payload() -> Result<GrowthPayload, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/growth"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<GrowthPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_query(tokens: Vec<String>) -> Result<QueryResponse, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{BRIDGE_URL}/query"))
        .json(&QueryRequest { tokens })
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        response
            .json::<QueryResponse>()
            .await
            .map_err(|e| e.to_string())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Err(format!("{}: {}", status, text))
    }
}

#[derive(Debug, Serialize)]
struct QueryRequest {
    tokens: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct QueryResponse {
    reply: String,
    points: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct GrowthPayload {
    #[serde(default)]
    location: String,
    #[serde(default)]
    current_positive: u64,
    #[serde(default)]
    coordinates: Vec<GrowthCoordinate>,
    #[serde(default)]
    notes: Vec<String>,
}

/// Log-log scatter of cumulative totals against new cases, joined in order.
#[derive(Clone)]
struct GrowthChart {
    points: Vec<(f32, f32)>,
}

impl GrowthChart {
    fn new(coordinates: &[GrowthCoordinate]) -> Self {
        let points = coordinates
            .iter()
            .filter(|point| point.is_log_plottable())
            .map(|point| (point.x.log10() as f32, point.y.log10() as f32))
            .collect();
        Self { points }
    }

    fn decade_bounds(values: impl Iterator<Item = f32>) -> (f32, f32) {
        let (min, max) = values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let low = min.floor();
        let high = max.ceil().max(low + 1.0);
        (low, high)
    }
}

impl canvas::Program<Message> for GrowthChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );

        let label_color = Color::from_rgb(0.7, 0.7, 0.75);
        if self.points.is_empty() {
            frame.fill_text(Text {
                content: "Nothing to plot".into(),
                position: Point::new(MARGIN, bounds.height / 2.0),
                color: label_color,
                ..Text::default()
            });
            return vec![frame.into_geometry()];
        }

        let (x_low, x_high) = Self::decade_bounds(self.points.iter().map(|p| p.0));
        let (y_low, y_high) = Self::decade_bounds(self.points.iter().map(|p| p.1));
        let plot_width = (bounds.width - 2.0 * MARGIN).max(1.0);
        let plot_height = (bounds.height - 2.0 * MARGIN).max(1.0);
        let to_screen = |(x, y): (f32, f32)| {
            Point::new(
                MARGIN + (x - x_low) / (x_high - x_low) * plot_width,
                bounds.height - MARGIN - (y - y_low) / (y_high - y_low) * plot_height,
            )
        };

        let grid = Path::new(|builder| {
            for decade in x_low as i32..=x_high as i32 {
                let top = to_screen((decade as f32, y_high));
                let bottom = to_screen((decade as f32, y_low));
                builder.move_to(top);
                builder.line_to(bottom);
            }
            for decade in y_low as i32..=y_high as i32 {
                builder.move_to(to_screen((x_low, decade as f32)));
                builder.line_to(to_screen((x_high, decade as f32)));
            }
        });
        frame.stroke(
            &grid,
            Stroke::default()
                .with_color(Color::from_rgb(0.25, 0.25, 0.3))
                .with_width(1.0),
        );

        for decade in x_low as i32..=x_high as i32 {
            let anchor = to_screen((decade as f32, y_low));
            frame.fill_text(Text {
                content: format!("1e{decade}"),
                position: Point::new(anchor.x - 10.0, anchor.y + 8.0),
                color: label_color,
                ..Text::default()
            });
        }
        for decade in y_low as i32..=y_high as i32 {
            let anchor = to_screen((x_low, decade as f32));
            frame.fill_text(Text {
                content: format!("1e{decade}"),
                position: Point::new(anchor.x - 40.0, anchor.y - 6.0),
                color: label_color,
                ..Text::default()
            });
        }
        frame.fill_text(Text {
            content: "Total Positive".into(),
            position: Point::new(bounds.width / 2.0 - 40.0, bounds.height - 20.0),
            color: label_color,
            ..Text::default()
        });
        frame.fill_text(Text {
            content: "Positive Increase".into(),
            position: Point::new(4.0, 8.0),
            color: label_color,
            ..Text::default()
        });

        let trail = Path::new(|builder| {
            for (i, point) in self.points.iter().enumerate() {
                if i == 0 {
                    builder.move_to(to_screen(*point));
                } else {
                    builder.line_to(to_screen(*point));
                }
            }
        });
        frame.stroke(
            &trail,
            Stroke::default()
                .with_width(1.5)
                .with_color(Color::from_rgb(0.18, 0.45, 0.89)),
        );

        for point in &self.points {
            let marker = Path::new(|builder| builder.circle(to_screen(*point), 4.0));
            frame.fill(&marker, Color::from_rgb(0.25, 0.55, 0.95));
        }

        vec![frame.into_geometry()]
    }
}
