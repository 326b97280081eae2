//! Terminal front-end
//!
//! Mounts a field in a full-screen view and wires key presses to sound cues,
//! the way page controls wire pointer events to them:
//! - `c` / `h` / `n`: click, hover and notification cues
//! - `m`: unmount or remount the field
//! - `q` / Esc: quit

mod stage_view;

pub use stage_view::StageView;

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::engine::{AudioHost, PlayOutcome, ToneSynthesizer};
use crate::fx::{Emitter, Field, FieldStats};
use crate::synth::Cue;

/// What the status bar shows
pub struct VizState<E: Emitter> {
    pub title: String,
    pub field: Option<Field<E>>,
    /// Stats of the last unmounted field
    pub last_stats: Option<FieldStats>,
    pub last_cue: Option<(Cue, PlayOutcome)>,
}

impl<E: Emitter> VizState<E> {
    pub fn new(title: impl Into<String>, field: Field<E>) -> Self {
        Self {
            title: title.into(),
            field: Some(field),
            last_stats: None,
            last_cue: None,
        }
    }

    /// Unmount the current field, or mount a fresh one via `mount`
    pub fn toggle<F: FnMut(Duration) -> Field<E>>(&mut self, now: Duration, mount: &mut F) {
        match self.field.take() {
            Some(mut field) => {
                field.unmount();
                self.last_stats = Some(field.stats());
            }
            None => self.field = Some(mount(now)),
        }
    }

    pub fn stats(&self) -> Option<FieldStats> {
        self.field.as_ref().map(|f| f.stats()).or(self.last_stats)
    }
}

/// Run the terminal view until the user quits
pub fn run_viz<E, F, H>(
    title: &str,
    mut mount: F,
    synth: &mut ToneSynthesizer<H>,
) -> Result<()>
where
    E: Emitter,
    F: FnMut(Duration) -> Field<E>,
    H: AudioHost,
{
    let started = Instant::now();
    let mut state = VizState::new(title, mount(Duration::ZERO));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = (|| -> Result<()> {
        loop {
            let now = started.elapsed();
            if let Some(field) = state.field.as_mut() {
                field.update(now);
            }

            terminal.draw(|f| draw_ui(f, &state))?;

            if !event::poll(Duration::from_millis(33))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match (key.code, key.modifiers) {
                (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => break,
                (KeyCode::Char('c'), KeyModifiers::CONTROL) => break,
                (KeyCode::Char('c'), _) => state.last_cue = Some((Cue::Click, synth.play_click())),
                (KeyCode::Char('h'), _) => state.last_cue = Some((Cue::Hover, synth.play_hover())),
                (KeyCode::Char('n'), _) => {
                    state.last_cue = Some((Cue::Notification, synth.play_notification()))
                }
                (KeyCode::Char('m'), _) => state.toggle(started.elapsed(), &mut mount),
                _ => {}
            }
        }
        Ok(())
    })();

    // Cleanup
    if let Some(mut field) = state.field.take() {
        field.unmount();
    }
    synth.destroy();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn draw_ui<E: Emitter>(f: &mut Frame, state: &VizState<E>) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Stage
            Constraint::Length(3), // Status
        ])
        .split(area);

    draw_stage(f, chunks[0], state);
    draw_status(f, chunks[1], state);
}

fn draw_stage<E: Emitter>(f: &mut Frame, area: Rect, state: &VizState<E>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", state.title));

    match &state.field {
        Some(field) => {
            let (r, g, b) = tint_for(field.emitter().name());
            f.render_widget(StageView::new(field.stage()).tint(r, g, b).block(block), area)
        }
        None => f.render_widget(
            Paragraph::new("  (unmounted, press m to mount)").block(block),
            area,
        ),
    }
}

/// Green for glyph rain, pale blue for everything else
fn tint_for(name: &str) -> (u8, u8, u8) {
    match name {
        "glyph" => (0, 255, 65),
        _ => (170, 200, 255),
    }
}

fn draw_status<E: Emitter>(f: &mut Frame, area: Rect, state: &VizState<E>) {
    let mut spans = Vec::new();

    let (label, color) = if state.field.is_some() {
        ("MOUNTED", Color::Green)
    } else {
        ("UNMOUNTED", Color::Yellow)
    };
    spans.push(Span::raw("  "));
    spans.push(Span::styled(label, Style::default().fg(color)));

    if let Some(stats) = state.stats() {
        spans.push(Span::raw(format!(
            "  {:?}  live {}  spawned {}  done {}  reclaimed {}",
            stats.device_class, stats.live, stats.spawned, stats.completed, stats.reclaimed
        )));
    }

    if let Some((cue, outcome)) = &state.last_cue {
        let text = match outcome {
            PlayOutcome::Scheduled { .. } => format!("  |  {}", cue),
            PlayOutcome::Degraded(_) => format!("  |  {} (muted)", cue),
        };
        spans.push(Span::raw(text));
    }

    spans.push(Span::raw("  |  c/h/n: cues  m: mount  q: quit"));

    let paragraph = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShimmerConfig;
    use crate::fx::{mount_particles, ParticleEmitter, Viewport};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mounter(config: ShimmerConfig) -> impl FnMut(Duration) -> Field<ParticleEmitter> {
        move |now| mount_particles(&config, &Viewport::new(1280, 720), StdRng::seed_from_u64(4), now)
    }

    #[test]
    fn test_effects_get_distinct_tints() {
        assert_eq!(tint_for("glyph"), (0, 255, 65));
        assert_ne!(tint_for("particle"), tint_for("glyph"));
    }

    #[test]
    fn test_toggle_unmounts_and_remounts() {
        let mut mount = mounter(ShimmerConfig::default());
        let mut state = VizState::new("particles", mount(Duration::ZERO));

        if let Some(field) = state.field.as_mut() {
            field.update(Duration::from_secs(3));
        }
        let live = state.stats().unwrap().live;
        assert!(live > 0);

        state.toggle(Duration::from_secs(3), &mut mount);
        assert!(state.field.is_none());
        let last = state.last_stats.unwrap();
        assert_eq!(last.live, 0);
        assert_eq!(last.reclaimed as usize, live);

        state.toggle(Duration::from_secs(4), &mut mount);
        assert!(state.field.is_some());
        assert_eq!(state.stats().unwrap().spawned, 0);
    }
}
