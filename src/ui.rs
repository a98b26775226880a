//! User interface rendering functions for all application screens.

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    game::{Engine, SessionState},
    types::{Prompt, Screen},
    App,
};

/// Lines of the in-game controls legend.
const CONTROLS: [&str; 5] = [
    "Escape - back to main menu",
    "W/Up - move up",
    "S/Down - move down",
    "A/Left - move left",
    "D/Right - move right",
];

/// Banner shown while the player stands on a finish cell.
const FINISH_BANNER: &str = "You have reached the finish!";

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
pub(crate) fn draw(app: &mut App, frame: &mut Frame) {
    clear(frame);

    match &mut app.screen {
        Screen::MainMenu => main_menu(frame),
        Screen::PathPrompt(prompt) => path_prompt(frame, prompt),
        Screen::LoadFailed(message) => load_failed(frame, message),
        Screen::InGame(engine) => in_game(frame, engine),
    }
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
pub(crate) fn clear(frame: &mut Frame) {
    frame.render_widget(Clear, frame.area());
}

/// Returns a `width` by `height` area centered in `area`, clamped to its size.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);

    area
}

/// Converts a length to terminal cells, saturating at the largest drawable size.
fn cells(len: usize) -> u16 {
    u16::try_from(len).unwrap_or(u16::MAX)
}

/// Builds the rounded, green block every screen is framed with.
fn framed<'title>(title: &'title str, hint: &'title str) -> Block<'title> {
    Block::bordered()
        .title(title)
        .title_bottom(hint)
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded)
}

/// Renders the main menu.
///
/// The menu shows the game version and repository along with the two available actions.
pub(crate) fn main_menu(frame: &mut Frame) {
    let title = format!("PWSandbox.Tui v{}", env!("CARGO_PKG_VERSION"));
    let lines = vec![
        Line::raw(env!("CARGO_PKG_REPOSITORY")).centered(),
        Line::raw(""),
        Line::raw("(m) Load map from file").centered(),
        Line::raw("(q) Quit").centered(),
    ];

    let width = cells(env!("CARGO_PKG_REPOSITORY").len()).saturating_add(4);
    let height = cells(lines.len()).saturating_add(2);
    let area = centered(frame.area(), width, height);

    let menu = Paragraph::new(lines).block(framed(&title, "(m) load / (q) quit"));
    frame.render_widget(menu, area);
}

/// Renders the map path prompt with the map files found in the working directory.
pub(crate) fn path_prompt(frame: &mut Frame, prompt: &Prompt) {
    let content_style = Style::default().fg(Color::Green);
    let active_content_style = Style::default().fg(Color::White).bg(Color::Green);

    let mut lines = vec![
        Line::raw("Enter map file (*.pws_map) location:"),
        Line::raw(format!("> {}_", prompt.input)),
        Line::raw(""),
    ];
    if prompt.suggestions.is_empty() {
        lines.push(Line::raw("No map files in this directory."));
    } else {
        lines.push(Line::raw("Map files in this directory:"));
        for (idx, path) in prompt.suggestions.iter().enumerate() {
            let style = if prompt.selected == Some(idx) {
                active_content_style
            } else {
                content_style
            };
            lines.push(Line::styled(format!("  {}", path.display()), style));
        }
    }

    let area = centered(
        frame.area(),
        frame.area().width.saturating_mul(3) / 5,
        cells(lines.len()).saturating_add(2),
    );

    let prompt = Paragraph::new(lines).block(framed(
        "Load map",
        "(enter) load / (tab) complete / (esc) back",
    ));
    frame.render_widget(prompt, area);
}

/// Renders the reason a map could not be loaded.
pub(crate) fn load_failed(frame: &mut Frame, message: &str) {
    let width = frame.area().width.saturating_mul(3) / 4;
    let height = cells(message.lines().count()).saturating_add(6);
    let area = centered(frame.area(), width, height);

    let error = Paragraph::new(message)
        .wrap(Wrap { trim: false })
        .block(framed("Map not loaded", "(any key) back to main menu"));
    frame.render_widget(error, area);
}

/// Renders the in-game screen.
///
/// The map is drawn centered inside a border, with the finish banner below it while the player
/// stands on a finish cell and the controls legend at the bottom.
pub(crate) fn in_game(frame: &mut Frame, engine: &mut Engine) {
    let rows: Vec<Line> = engine.render_rows().map(Line::raw).collect();
    let finished = engine.state() == SessionState::Finished;

    let map_width = cells(engine.grid().width()).saturating_add(2);
    let map_height = cells(rows.len()).saturating_add(2);
    let legend_width = cells(CONTROLS.iter().map(|line| line.len()).max().unwrap_or_default())
        .saturating_add(2);
    let legend_height = cells(CONTROLS.len()).saturating_add(1);

    let width = map_width
        .max(legend_width)
        .max(cells(FINISH_BANNER.len()));
    let height = map_height
        .saturating_add(1)
        .saturating_add(legend_height);
    let area = centered(frame.area(), width, height);

    let [map_area, banner_area, legend_area] = Layout::vertical([
        Constraint::Length(map_height),
        Constraint::Length(1),
        Constraint::Length(legend_height),
    ])
    .areas(area);

    let map = Paragraph::new(rows).block(
        Block::bordered()
            .title("PWSandbox.Tui [Play]")
            .title_alignment(Alignment::Center)
            .border_type(BorderType::Rounded),
    );
    frame.render_widget(map, centered(map_area, map_width, map_height));

    if finished {
        let banner = Line::styled(FINISH_BANNER, Style::default().fg(Color::Yellow)).centered();
        frame.render_widget(banner, banner_area);
    }

    let legend = Paragraph::new(CONTROLS.map(Line::raw).to_vec()).block(
        Block::default()
            .title("Controls")
            .title_alignment(Alignment::Center)
            .style(Style::default().fg(Color::Green))
            .borders(Borders::TOP),
    );
    frame.render_widget(legend, legend_area);
}
