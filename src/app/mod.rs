mod canvas;
mod renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::SyncSender,
    },
    time::{Duration, Instant},
};

use crossterm::{
    ExecutableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

pub use canvas::{Canvas, Tile};
use renderer::{RenderMessage, Renderer, RendererStatus};

use crate::{engine::Engine, error::MazeError, generators::Generator};

fn to_io(error: MazeError) -> std::io::Error {
    std::io::Error::other(error)
}

/// Terminal front-end: runs the engine on a compute thread and animates its events.
pub struct App {
    /// Pause after each drawn event
    frame_delay: Duration,
    /// How often the input thread checks whether rendering is done
    user_input_event_poll_timeout: Duration,
}

impl Default for App {
    fn default() -> Self {
        Self {
            frame_delay: Duration::from_millis(10),
            user_input_event_poll_timeout: Duration::from_millis(100),
        }
    }
}

impl App {
    /// Maximum number of messages to buffer in the channel between compute and render threads
    const MAX_MESSAGES_IN_CHANNEL_BUFFER: usize = 1000;

    pub fn new(frame_delay: Duration) -> Self {
        Self {
            frame_delay,
            ..Self::default()
        }
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    /// even if the panic occurs in a different thread
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Animates one generation run and its solution path. Esc cancels at any point.
    pub fn run(
        &self,
        stdout: &mut Stdout,
        rows: u16,
        cols: u16,
        generator: Generator,
        seed: Option<u64>,
    ) -> std::io::Result<()> {
        let mut renderer = Renderer::new(rows, cols, self.frame_delay).map_err(to_io)?;
        let prompt_row = renderer.status_row() + 1;
        if !renderer.fits_terminal()? {
            stdout.execute(style::PrintStyledContent(
                format!(
                    "Terminal size is too small for a {}x{} maze. Please resize the terminal.\r\n",
                    rows, cols
                )
                .with(Color::Yellow)
                .attribute(Attribute::Bold),
            ))?;
            stdout.execute(style::PrintStyledContent(
                "Press Esc to exit...\r\n"
                    .with(Color::Blue)
                    .attribute(Attribute::Bold),
            ))?;
            App::wait_for_esc()?;
            return Ok(());
        }

        // Set by the render thread when it finishes
        let render_done = Arc::new(AtomicBool::new(false));
        // Set by the input thread on Esc
        let cancel = Arc::new(AtomicBool::new(false));

        let poll_timeout = self.user_input_event_poll_timeout;
        let done_for_input = render_done.clone();
        let cancel_for_input = cancel.clone();
        let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
            App::listen_to_user_input(poll_timeout, &done_for_input, &cancel_for_input)
        });

        let (message_tx, message_rx) =
            std::sync::mpsc::sync_channel::<RenderMessage>(App::MAX_MESSAGES_IN_CHANNEL_BUFFER);

        let cancel_for_render = cancel.clone();
        let done_for_render = render_done.clone();
        let render_thread_handle = std::thread::spawn(move || {
            let status = renderer.render(message_rx, &cancel_for_render);
            done_for_render.store(true, Ordering::Relaxed);
            status
        });

        let cancel_for_compute = cancel.clone();
        let compute_thread_handle = std::thread::spawn(move || {
            App::compute(rows, cols, generator, seed, message_tx, &cancel_for_compute)
        });

        let computed = compute_thread_handle
            .join()
            .map_err(|_| std::io::Error::other("compute thread panicked"))?;
        let status = render_thread_handle
            .join()
            .map_err(|_| std::io::Error::other("render thread panicked"))??;
        let _ = input_thread_handle.join();
        computed.map_err(to_io)?;

        if status == RendererStatus::Cancelled || cancel.load(Ordering::Relaxed) {
            tracing::info!("[app] rendering was cancelled by user");
            return Ok(());
        }

        queue!(
            stdout,
            cursor::MoveTo(0, prompt_row),
            style::PrintStyledContent(
                "Press Esc to exit..."
                    .with(Color::Blue)
                    .attribute(Attribute::Bold)
            )
        )?;
        stdout.flush()?;
        App::wait_for_esc()?;
        Ok(())
    }

    /// Generates without animation and prints the finished maze and route to `out`.
    pub fn print_static(
        &self,
        out: &mut impl Write,
        rows: u16,
        cols: u16,
        generator: Generator,
        seed: Option<u64>,
    ) -> std::io::Result<()> {
        let mut canvas = Canvas::new(rows, cols).map_err(to_io)?;
        let mut engine = Engine::seeded(rows, cols, generator, seed).map_err(to_io)?;
        while let Some(event) = engine.step().map_err(to_io)? {
            canvas.apply(&event);
        }
        let path = engine.reconstruct_path().map_err(to_io)?;
        path.iter().for_each(|step| {
            canvas.apply_path_step(step);
        });

        for line in canvas.lines() {
            writeln!(out, "{}", line)?;
        }
        writeln!(
            out,
            "{}: {}x{} maze, solution path of {} steps",
            generator,
            rows,
            cols,
            path.len()
        )?;
        Ok(())
    }

    /// Profiling mode: run generation in the background without rendering to terminal
    pub fn profile(
        &self,
        rows: u16,
        cols: u16,
        generator: Generator,
        num_iterations: Option<usize>,
    ) -> std::io::Result<()> {
        let (message_tx, message_rx) =
            std::sync::mpsc::sync_channel::<RenderMessage>(App::MAX_MESSAGES_IN_CHANNEL_BUFFER);

        let drain_thread_handle = std::thread::spawn(move || message_rx.iter().count());

        let iterations = num_iterations.unwrap_or(1);
        let compute_thread_handle = std::thread::spawn(move || -> Result<Duration, MazeError> {
            let never_cancel = AtomicBool::new(false);
            let start = Instant::now();
            for _ in 0..iterations {
                App::compute(rows, cols, generator, None, message_tx.clone(), &never_cancel)?;
            }
            Ok(start.elapsed())
        });

        let elapsed = compute_thread_handle
            .join()
            .map_err(|_| std::io::Error::other("compute thread panicked"))?
            .map_err(to_io)?;
        let messages = drain_thread_handle
            .join()
            .map_err(|_| std::io::Error::other("drain thread panicked"))?;

        tracing::info!(
            "[profile] {} x{} on {}x{}: {} messages in {:?}",
            generator,
            iterations,
            rows,
            cols,
            messages,
            elapsed
        );
        println!(
            "{}: {} run(s) on {}x{}, {} messages, {:?} total",
            generator, iterations, rows, cols, messages, elapsed
        );
        Ok(())
    }

    /// Runs the engine to the end, forwarding every event and then the solution path.
    /// Returns the path length, or `None` if the run was cancelled or nobody is listening.
    fn compute(
        rows: u16,
        cols: u16,
        generator: Generator,
        seed: Option<u64>,
        message_tx: SyncSender<RenderMessage>,
        cancel: &AtomicBool,
    ) -> Result<Option<usize>, MazeError> {
        let mut engine = Engine::seeded(rows, cols, generator, seed)?;
        while let Some(event) = engine.step()? {
            if cancel.load(Ordering::Relaxed) {
                tracing::info!("[compute] cancel flag raised, abandoning run");
                return Ok(None);
            }
            if message_tx.send(RenderMessage::Event(event)).is_err() {
                tracing::debug!("[compute] renderer hung up");
                return Ok(None);
            }
        }

        let path = engine.reconstruct_path()?;
        let length = path.len();
        let status = format!(
            "{}: {} edges carved, solution path of {} steps",
            generator,
            engine.solution().len(),
            length
        );
        tracing::info!("[compute] {}", status);
        // Errors only mean the renderer is already gone
        let _ = message_tx.send(RenderMessage::Path(path));
        let _ = message_tx.send(RenderMessage::Status(status));
        Ok(Some(length))
    }

    /// Polls the keyboard until rendering is done; Esc raises the cancel flag.
    fn listen_to_user_input(
        poll_timeout: Duration,
        render_done: &AtomicBool,
        cancel: &AtomicBool,
    ) -> std::io::Result<()> {
        loop {
            if render_done.load(Ordering::Relaxed) {
                return Ok(());
            }
            if !event::poll(poll_timeout)? {
                continue;
            }
            match event::read()? {
                event::Event::Key(key_event) if key_event.code == KeyCode::Esc => {
                    tracing::debug!("[input loop] Esc key pressed, exiting");
                    cancel.store(true, Ordering::Relaxed);
                    return Ok(());
                }
                _ => {}
            }
        }
    }

    fn wait_for_esc() -> std::io::Result<()> {
        loop {
            match event::read()? {
                event::Event::Key(key_event) if key_event.code == KeyCode::Esc => return Ok(()),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_static_draws_whole_maze() {
        let mut out = Vec::new();
        App::default()
            .print_static(&mut out, 3, 4, Generator::HuntAndKill, Some(8))
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3 * 2 + 1 + 1);
        assert!(lines[7].starts_with("Hunt and Kill: 3x4 maze"));
    }

    #[test]
    fn test_print_static_rejects_oversized_maze() {
        let mut out = Vec::new();
        let error = App::default()
            .print_static(
                &mut out,
                3,
                Canvas::MAX_DIMENSION + 1,
                Generator::Sidewinder,
                Some(1),
            )
            .unwrap_err();
        assert_eq!(error.kind(), std::io::ErrorKind::Other);
        assert!(error.to_string().contains("too large to draw"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_compute_forwards_events_then_path() {
        let (tx, rx) = std::sync::mpsc::sync_channel(10_000);
        let cancel = AtomicBool::new(false);
        let length = App::compute(4, 4, Generator::BinaryTree, Some(1), tx, &cancel).unwrap();
        let messages = rx.iter().collect::<Vec<_>>();
        assert!(matches!(messages[0], RenderMessage::Event(_)));
        assert!(matches!(
            messages[messages.len() - 2],
            RenderMessage::Path(ref steps) if Some(steps.len()) == length
        ));
        assert!(matches!(messages.last(), Some(RenderMessage::Status(_))));
    }

    #[test]
    fn test_compute_stops_on_cancel() {
        let (tx, rx) = std::sync::mpsc::sync_channel(10_000);
        let cancel = AtomicBool::new(true);
        let length = App::compute(4, 4, Generator::Prims, Some(1), tx, &cancel).unwrap();
        assert_eq!(length, None);
        assert!(rx.iter().next().is_none());
    }
}
