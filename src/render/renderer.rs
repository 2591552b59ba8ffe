use anyhow::{Context, Result};
use std::io::Write;

use super::{GameView, Renderer};
use crate::game::{EpisodeStatus, Position};

/// Plain-text renderer that draws the board as a character grid
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Draw the board into a string, one line per row
    pub fn draw_frame(view: &GameView<'_>) -> String {
        let mut frame = String::new();
        frame.push_str(&Self::draw_stats(view));
        frame.push('\n');

        let border = format!("+{}+\n", "-".repeat(view.columns() as usize * 2));
        frame.push_str(&border);

        let head = view.head();
        for row in 0..view.rows() {
            frame.push('|');
            for col in 0..view.columns() {
                let pos = Position::new(col * view.block_size, row * view.block_size);
                let cell = if Some(pos) == head {
                    "■ "
                } else if view.body.contains(&pos) {
                    "□ "
                } else if pos == view.food {
                    "O "
                } else {
                    ". "
                };
                frame.push_str(cell);
            }
            frame.push_str("|\n");
        }
        frame.push_str(&border);

        match view.status {
            EpisodeStatus::Running => {}
            EpisodeStatus::Terminated(reason) => {
                frame.push_str(&format!("GAME OVER ({reason:?}) final score {}\n", view.score));
            }
            EpisodeStatus::Aborted => frame.push_str("ABORTED\n"),
        }

        frame
    }

    fn draw_stats(view: &GameView<'_>) -> String {
        format!(
            "Score: {}    Steps: {}    Heading: {:?}",
            view.score, view.frame_iteration, view.direction
        )
    }
}

impl<W: Write + Send> Renderer for TextRenderer<W> {
    fn render(&mut self, view: &GameView<'_>) -> Result<()> {
        let frame = Self::draw_frame(view);
        self.out
            .write_all(frame.as_bytes())
            .context("Failed to draw frame")?;
        self.out.flush().context("Failed to flush frame")?;
        Ok(())
    }
}
