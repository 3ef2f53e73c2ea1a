use std::collections::BTreeSet;
use std::io::stdout;
use std::path::PathBuf;
use std::{env, fs, process};

use anyhow::{Context, Result, bail};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use livemark_config::Config;
use livemark_engine::{
    DecorationKind, DecorationSet, EditorMode, EngineEffect, LiveEngine, MarkSpec, Selection,
    Span as ESpan, WidgetSpec,
    markup::preview_text,
    rope::{lines::line_span_at, slice_to_string},
    styles,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use xi_rope::Rope;
use xi_rope::delta::Builder;

struct App {
    path: PathBuf,
    buffer: Rope,
    cursor: usize,
    version: u64,
    engine: LiveEngine,
    dirty: bool,
    clipboard: Option<String>,
    status: String,
}

impl App {
    fn new(path: PathBuf) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Config::load()?.unwrap_or_default();
        let engine = LiveEngine::new(config.engine_options());

        Ok(Self {
            path,
            buffer: Rope::from(content.as_str()),
            cursor: 0,
            version: 0,
            engine,
            dirty: false,
            clipboard: None,
            status: String::from("ctrl-e mode · ctrl-s save · ctrl-y copy block · ctrl-q quit"),
        })
    }

    fn text(&self) -> String {
        slice_to_string(&self.buffer, ESpan::new(0, self.buffer.len()))
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn splice(&mut self, start: usize, end: usize, s: &str) {
        let mut builder = Builder::new(self.buffer.len());
        builder.replace(start..end, Rope::from(s));
        self.buffer = builder.build().apply(&self.buffer);
        self.version += 1;
        self.dirty = true;
    }

    fn insert(&mut self, s: &str) {
        self.splice(self.cursor, self.cursor, s);
        self.cursor += s.len();
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_char_boundary(&self.text(), self.cursor);
        self.splice(prev, self.cursor, "");
        self.cursor = prev;
    }

    fn move_left(&mut self) {
        self.cursor = prev_char_boundary(&self.text(), self.cursor);
    }

    fn move_right(&mut self) {
        self.cursor = next_char_boundary(&self.text(), self.cursor);
    }

    fn move_up(&mut self) {
        let line = line_span_at(&self.buffer, self.cursor);
        if line.start == 0 {
            return;
        }
        let col = self.cursor - line.start;
        let prev = line_span_at(&self.buffer, line.start - 1);
        self.cursor = prev.start + col.min(prev.len());
    }

    fn move_down(&mut self) {
        let line = line_span_at(&self.buffer, self.cursor);
        if line.end >= self.len() {
            return;
        }
        let col = self.cursor - line.start;
        let next = line_span_at(&self.buffer, line.end + 1);
        self.cursor = next.start + col.min(next.len());
    }

    fn line_home(&mut self) {
        self.cursor = line_span_at(&self.buffer, self.cursor).start;
    }

    fn line_end(&mut self) {
        self.cursor = line_span_at(&self.buffer, self.cursor).end;
    }

    fn toggle_mode(&mut self) {
        let next = match self.engine.mode() {
            EditorMode::Edit => EditorMode::Render,
            EditorMode::Render => EditorMode::Edit,
        };
        self.engine.apply_effect(EngineEffect::SetMode(next));
        self.status = match next {
            EditorMode::Edit => String::from("source mode"),
            EditorMode::Render => String::from("live mode"),
        };
    }

    fn save(&mut self) {
        match fs::write(&self.path, self.text()) {
            Ok(()) => {
                self.dirty = false;
                self.status = format!("saved {}", self.path.display());
            }
            Err(err) => self.status = format!("save failed: {err}"),
        }
    }

    /// Copies the verbatim source of the code block under the cursor.
    fn copy_code_block(&mut self) {
        let raw = self.engine.decorations().iter().find_map(|d| match &d.kind {
            DecorationKind::Replace(WidgetSpec::CodeBlock { raw, .. })
                if d.span.touches(self.cursor) =>
            {
                Some(raw.clone())
            }
            _ => None,
        });
        match raw {
            Some(raw) => {
                self.status = format!("copied {} bytes", raw.len());
                self.clipboard = Some(raw);
            }
            None => self.status = String::from("no code block under cursor"),
        }
    }

    fn paste(&mut self) {
        if let Some(raw) = self.clipboard.clone() {
            self.insert(&raw);
        }
    }

    fn refresh_decorations(&mut self) {
        let selection = Selection::caret(self.cursor);
        self.engine.refresh(self.version, &self.buffer, &selection);
    }
}

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <markdown-file>", args[0]);
        process::exit(1);
    }

    let mut app = App::new(PathBuf::from(&args[1]))?;
    tracing::info!(path = %app.path.display(), "opening document");

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    result
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    if env::var_os("RUST_LOG").is_some() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.refresh_decorations();
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match (key.code, ctrl) {
                (KeyCode::Char('q'), true) | (KeyCode::Esc, false) => break,
                (KeyCode::Char('s'), true) => app.save(),
                (KeyCode::Char('e'), true) => app.toggle_mode(),
                (KeyCode::Char('y'), true) => app.copy_code_block(),
                (KeyCode::Char('p'), true) => app.paste(),
                (KeyCode::Left, _) => app.move_left(),
                (KeyCode::Right, _) => app.move_right(),
                (KeyCode::Up, _) => app.move_up(),
                (KeyCode::Down, _) => app.move_down(),
                (KeyCode::Home, _) => app.line_home(),
                (KeyCode::End, _) => app.line_end(),
                (KeyCode::Backspace, _) => app.backspace(),
                (KeyCode::Enter, _) => app.insert("\n"),
                (KeyCode::Tab, _) => app.insert("    "),
                (KeyCode::Char(c), false) => app.insert(&c.to_string()),
                _ => {}
            }
        }
    }
    Ok(())
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    let text = app.text();
    let lines = build_lines(&text, app.engine.decorations(), app.cursor);

    let cursor_line = text[..app.cursor].matches('\n').count() as u16;
    let height = chunks[0].height;
    let scroll = cursor_line.saturating_sub(height / 2);

    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), chunks[0]);

    let mode = match app.engine.mode() {
        EditorMode::Edit => "SOURCE",
        EditorMode::Render => "LIVE",
    };
    let dirty = if app.dirty { " [+]" } else { "" };
    let status = Line::from(vec![
        Span::styled(
            format!(" {mode} "),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(format!(" {}{dirty} — {}", app.path.display(), app.status)),
    ]);
    f.render_widget(Paragraph::new(status), chunks[1]);
}

/// Paints the document with its decoration set as terminal lines.
///
/// Walks the text in document order: replaced spans render through the
/// widget switch, everything else renders as styled text segments.
fn build_lines(text: &str, set: &DecorationSet, cursor: usize) -> Vec<Line<'static>> {
    let mut marks: Vec<(ESpan, MarkSpec)> = Vec::new();
    let mut replaces: Vec<(ESpan, WidgetSpec)> = Vec::new();
    for d in set.iter() {
        match &d.kind {
            DecorationKind::Mark(m) => marks.push((d.span, *m)),
            DecorationKind::Replace(w) => {
                // overlapping replaces: first (position-ordered) wins
                if replaces.last().is_none_or(|(sp, _)| d.span.start >= sp.end) {
                    replaces.push((d.span, w.clone()));
                }
            }
        }
    }

    let mut painter = Painter {
        text,
        marks,
        cursor,
        lines: Vec::new(),
        current: Vec::new(),
    };

    let mut pos = 0usize;
    for (span, widget) in &replaces {
        painter.paint_text(pos, span.start);
        painter.paint_widget(*span, widget);
        pos = span.end;
    }
    painter.paint_text(pos, text.len());
    painter.finish()
}

struct Painter<'a> {
    text: &'a str,
    marks: Vec<(ESpan, MarkSpec)>,
    cursor: usize,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
}

impl Painter<'_> {
    fn paint_text(&mut self, from: usize, to: usize) {
        if from >= to {
            if self.cursor == self.text.len() && to == self.text.len() && from == to {
                self.current
                    .push(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
            }
            return;
        }

        let mut cuts: BTreeSet<usize> = BTreeSet::new();
        cuts.insert(from);
        cuts.insert(to);
        for (sp, _) in &self.marks {
            if sp.start > from && sp.start < to {
                cuts.insert(sp.start);
            }
            if sp.end > from && sp.end < to {
                cuts.insert(sp.end);
            }
        }
        if self.cursor >= from && self.cursor < to {
            cuts.insert(self.cursor);
            let next = next_char_boundary(self.text, self.cursor);
            if next < to {
                cuts.insert(next);
            }
        }

        let cuts: Vec<usize> = cuts.into_iter().collect();
        for win in cuts.windows(2) {
            self.push_segment(win[0], win[1]);
        }

        if self.cursor == to && to == self.text.len() {
            self.current
                .push(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
        }
    }

    fn push_segment(&mut self, from: usize, to: usize) {
        let style = self.style_at(from);
        let mut off = from;
        for part in self.text[from..to].split_inclusive('\n') {
            let content = part.trim_end_matches(['\r', '\n']);
            if !content.is_empty() {
                let mut st = style;
                if off == self.cursor {
                    st = st.add_modifier(Modifier::REVERSED);
                }
                self.current.push(Span::styled(content.to_string(), st));
            }
            if part.ends_with('\n') {
                if self.cursor == off + content.len() {
                    // caret sitting on the line break
                    self.current
                        .push(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
                }
                self.flush_line();
            }
            off += part.len();
        }
    }

    fn paint_widget(&mut self, span: ESpan, widget: &WidgetSpec) {
        let focused = self.cursor >= span.start && self.cursor < span.end;
        match render_widget(widget) {
            Ok(WidgetRender::Inline(spans)) => {
                for mut s in spans {
                    if focused {
                        s.style = s.style.add_modifier(Modifier::REVERSED);
                    }
                    self.current.push(s);
                }
            }
            Ok(WidgetRender::Block(block_lines)) => {
                self.flush_line_if_open();
                for mut line in block_lines {
                    if focused {
                        line.style = line.style.add_modifier(Modifier::REVERSED);
                    }
                    self.lines.push(line);
                }
            }
            Err(err) => {
                // degraded but visible, never a crash
                self.current.push(Span::styled(
                    format!("⟨widget error: {err}⟩"),
                    Style::default().fg(Color::Red),
                ));
            }
        }
    }

    fn style_at(&self, pos: usize) -> Style {
        let mut style = Style::default();
        for (sp, mark) in &self.marks {
            if pos >= sp.start && pos < sp.end {
                style = style.patch(class_style(mark.class));
            }
        }
        style
    }

    fn flush_line(&mut self) {
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn flush_line_if_open(&mut self) {
        if !self.current.is_empty() {
            self.flush_line();
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if !self.current.is_empty() {
            self.flush_line();
        }
        self.lines
    }
}

enum WidgetRender {
    Inline(Vec<Span<'static>>),
    Block(Vec<Line<'static>>),
}

/// The renderer switch for widget specs.
fn render_widget(widget: &WidgetSpec) -> Result<WidgetRender> {
    match widget {
        WidgetSpec::ListBullet => Ok(WidgetRender::Inline(vec![Span::styled(
            "•",
            Style::default().fg(Color::Yellow),
        )])),
        WidgetSpec::BlockquoteBar { level } => {
            if *level == 0 {
                bail!("blockquote bar with zero segments");
            }
            Ok(WidgetRender::Inline(vec![Span::styled(
                "┃ ".repeat(*level as usize),
                Style::default().fg(Color::Green),
            )]))
        }
        WidgetSpec::HorizontalRule => Ok(WidgetRender::Inline(vec![Span::styled(
            "─".repeat(38),
            Style::default().fg(Color::DarkGray),
        )])),
        WidgetSpec::CodeBlock { lines, language, .. } => {
            let lang = language.as_deref().unwrap_or("code");
            let frame = Style::default().fg(Color::DarkGray);
            let code = Style::default().fg(Color::Green);
            let mut out = vec![Line::from(Span::styled(format!("┌─ {lang}"), frame))];
            for l in lines {
                out.push(Line::from(vec![
                    Span::styled("│ ".to_string(), frame),
                    Span::styled(l.clone(), code),
                ]));
            }
            out.push(Line::from(Span::styled("└─".to_string(), frame)));
            Ok(WidgetRender::Block(out))
        }
        WidgetSpec::RawMarkupPreview { html, block } => {
            let label = preview_text(html);
            let label = if label.is_empty() {
                String::from("⧉ markup")
            } else {
                format!("⧉ {label}")
            };
            let span = Span::styled(label, Style::default().fg(Color::Magenta));
            if *block {
                Ok(WidgetRender::Block(vec![Line::from(span)]))
            } else {
                Ok(WidgetRender::Inline(vec![span]))
            }
        }
    }
}

/// Maps engine style classes onto terminal styles.
fn class_style(class: &str) -> Style {
    match class {
        c if c == styles::STRONG => Style::default().add_modifier(Modifier::BOLD),
        c if c == styles::EMPHASIS => Style::default().add_modifier(Modifier::ITALIC),
        c if c == styles::STRIKE => Style::default().add_modifier(Modifier::CROSSED_OUT),
        c if c == styles::HIGHLIGHT => Style::default().fg(Color::Black).bg(Color::Yellow),
        c if c == styles::INLINE_CODE => Style::default().fg(Color::Cyan),
        c if c == styles::MARKER_ACTIVE => Style::default().fg(Color::Yellow),
        c if c == styles::MARKER_DIM => Style::default().fg(Color::DarkGray),
        c if c == styles::FENCE_LINE => Style::default().fg(Color::DarkGray),
        c if c == styles::FENCE_LANG => Style::default().fg(Color::Blue),
        c if c == styles::CODE_LINE => Style::default().fg(Color::Green),
        c if c == styles::HTML_RAW => Style::default().fg(Color::Gray),
        c if c == styles::HTML_TAG => Style::default().fg(Color::Magenta),
        c if c == styles::HTML_ATTR => Style::default().fg(Color::Blue),
        c if c == styles::HTML_VALUE => Style::default().fg(Color::Green),
        c if styles::HEADING.contains(&c) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        c if styles::HTML_BRACKET.contains(&c) => Style::default().fg(Color::Magenta),
        _ => Style::default(),
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    let mut p = pos.min(text.len());
    while p > 0 {
        p -= 1;
        if text.is_char_boundary(p) {
            break;
        }
    }
    p
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    let mut p = pos.saturating_add(1).min(text.len());
    while p < text.len() && !text.is_char_boundary(p) {
        p += 1;
    }
    p
}
