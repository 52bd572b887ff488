use std::{
    io::{Stdout, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::Receiver,
    },
    time::Duration,
};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    app::canvas::{Canvas, Tile},
    error::MazeError,
    maze::MazeEvent,
    solution::PathStep,
};

/// What the compute thread hands to the renderer.
#[derive(Debug)]
pub enum RenderMessage {
    Event(MazeEvent),
    Path(Vec<PathStep>),
    Status(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum RendererStatus {
    Completed,
    Cancelled,
}

pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    canvas: Canvas,
    /// Pause after each drawn event, the only place animation is paced
    frame_delay: Duration,
}

impl Renderer {
    pub fn new(rows: u16, cols: u16, frame_delay: Duration) -> Result<Self, MazeError> {
        Ok(Self {
            stdout: std::io::stdout(),
            canvas: Canvas::new(rows, cols)?,
            frame_delay,
        })
    }

    /// Row just below the canvas, where the status line goes.
    pub fn status_row(&self) -> u16 {
        self.canvas.height()
    }

    /// Whether the terminal is large enough to show the whole canvas plus a status line.
    pub fn fits_terminal(&self) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        Ok(term_width >= self.canvas.width() * Tile::WIDTH
            && term_height > self.canvas.height())
    }

    fn draw_full(&mut self) -> std::io::Result<()> {
        queue!(
            self.stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        for (y, line) in self.canvas.lines().enumerate() {
            queue!(
                self.stdout,
                cursor::MoveTo(0, y as u16),
                style::Print(line)
            )?;
        }
        self.stdout.flush()
    }

    fn draw_tiles(&mut self, positions: &[(u16, u16)]) -> std::io::Result<()> {
        for &(x, y) in positions {
            queue!(
                self.stdout,
                cursor::MoveTo(x * Tile::WIDTH, y),
                style::Print(self.canvas.get((x, y)))
            )?;
        }
        self.stdout.flush()
    }

    fn draw_status(&mut self, text: &str) -> std::io::Result<()> {
        let (term_width, _) = terminal::size()?;
        let (line, _) = text.unicode_truncate(term_width as usize);
        self.stdout
            .queue(cursor::MoveTo(0, self.status_row()))?
            .queue(terminal::Clear(ClearType::CurrentLine))?
            .queue(style::PrintStyledContent(
                line.with(Color::Green).attribute(Attribute::Bold),
            ))?;
        self.stdout.flush()
    }

    /// Draws messages until the sender hangs up or `cancel` is raised.
    pub fn render(
        &mut self,
        messages: Receiver<RenderMessage>,
        cancel: &AtomicBool,
    ) -> std::io::Result<RendererStatus> {
        self.draw_full()?;
        for message in messages {
            if cancel.load(Ordering::Relaxed) {
                tracing::debug!("[render] cancel flag raised, stopping");
                return Ok(RendererStatus::Cancelled);
            }
            match message {
                RenderMessage::Event(event) => {
                    let changed = self.canvas.apply(&event);
                    self.draw_tiles(&changed)?;
                    std::thread::sleep(self.frame_delay);
                }
                RenderMessage::Path(steps) => {
                    for step in &steps {
                        if cancel.load(Ordering::Relaxed) {
                            return Ok(RendererStatus::Cancelled);
                        }
                        let changed = self.canvas.apply_path_step(step);
                        self.draw_tiles(&changed)?;
                        std::thread::sleep(self.frame_delay);
                    }
                }
                RenderMessage::Status(text) => self.draw_status(&text)?,
            }
        }
        tracing::debug!("[render] message channel closed, rendering completed");
        Ok(RendererStatus::Completed)
    }
}
