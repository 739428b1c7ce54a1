//! Terminal rendering of generated articles
//!
//! Generated articles usually come back as Markdown. This renders them with
//! colors and simple layout for a terminal.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::Result;

/// Render markdown to stdout, with colors when the terminal supports them
pub fn format_markdown(markdown: &str) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    render_markdown(&mut stdout, markdown)
}

/// Render markdown to any color-capable writer
pub fn render_markdown<W: WriteColor>(out: &mut W, markdown: &str) -> Result<()> {
    let parser = Parser::new_ext(markdown, Options::all());
    let mut state = RenderState::default();

    for event in parser {
        state.handle_event(out, event)?;
    }
    out.reset()?;
    out.flush()?;

    Ok(())
}

/// Tracks nested styles and list depth
#[derive(Default)]
struct RenderState {
    list_level: usize,
    ordered_items: Vec<Option<u64>>,
    format_stack: Vec<ColorSpec>,
}

impl RenderState {
    fn handle_event<W: WriteColor>(&mut self, out: &mut W, event: Event) -> Result<()> {
        match event {
            Event::Start(tag) => self.handle_start(out, tag)?,
            Event::End(tag_end) => self.handle_end(out, tag_end)?,
            Event::Text(text) => write!(out, "{}", text)?,
            Event::Code(code) => self.write_inline_code(out, &code)?,
            Event::SoftBreak => write!(out, " ")?,
            Event::HardBreak => writeln!(out)?,
            Event::Rule => writeln!(out, "\n{}", "─".repeat(40))?,
            _ => {}
        }
        Ok(())
    }

    fn handle_start<W: WriteColor>(&mut self, out: &mut W, tag: Tag) -> Result<()> {
        match tag {
            Tag::Heading { level, .. } => {
                let color = match level {
                    HeadingLevel::H1 => Color::Rgb(255, 99, 71),
                    HeadingLevel::H2 => Color::Rgb(70, 130, 180),
                    _ => Color::Cyan,
                };
                let mut spec = ColorSpec::new();
                spec.set_fg(Some(color)).set_bold(true);
                self.push_style(out, spec)?;
                writeln!(out)?;
            }
            Tag::Paragraph => {
                if self.list_level == 0 {
                    writeln!(out)?;
                }
            }
            Tag::Strong => {
                let mut spec = ColorSpec::new();
                spec.set_bold(true);
                self.push_style(out, spec)?;
            }
            Tag::Emphasis => {
                let mut spec = ColorSpec::new();
                spec.set_italic(true);
                self.push_style(out, spec)?;
            }
            Tag::BlockQuote(_) => {
                let mut spec = ColorSpec::new();
                spec.set_fg(Some(Color::Yellow));
                self.push_style(out, spec)?;
                write!(out, "  │ ")?;
            }
            Tag::List(start) => {
                self.list_level += 1;
                self.ordered_items.push(start);
            }
            Tag::Item => {
                let indent = "  ".repeat(self.list_level.saturating_sub(1));
                match self.ordered_items.last_mut() {
                    Some(Some(number)) => {
                        write!(out, "{}{}. ", indent, number)?;
                        *number += 1;
                    }
                    _ => write!(out, "{}• ", indent)?,
                }
            }
            Tag::Link { .. } => {
                let mut spec = ColorSpec::new();
                spec.set_fg(Some(Color::Blue)).set_underline(true);
                self.push_style(out, spec)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_end<W: WriteColor>(&mut self, out: &mut W, tag_end: TagEnd) -> Result<()> {
        match tag_end {
            TagEnd::Heading(_) => {
                self.pop_style(out)?;
                writeln!(out)?;
            }
            TagEnd::Paragraph => {
                if self.list_level == 0 {
                    writeln!(out)?;
                }
            }
            TagEnd::Strong | TagEnd::Emphasis => self.pop_style(out)?,
            TagEnd::Link => {
                self.pop_style(out)?;
            }
            TagEnd::BlockQuote(_) => {
                self.pop_style(out)?;
                writeln!(out)?;
            }
            TagEnd::List(_) => {
                self.list_level = self.list_level.saturating_sub(1);
                self.ordered_items.pop();
                if self.list_level == 0 {
                    writeln!(out)?;
                }
            }
            TagEnd::Item => writeln!(out)?,
            _ => {}
        }
        Ok(())
    }

    fn push_style<W: WriteColor>(&mut self, out: &mut W, spec: ColorSpec) -> Result<()> {
        out.set_color(&spec)?;
        self.format_stack.push(spec);
        Ok(())
    }

    fn pop_style<W: WriteColor>(&mut self, out: &mut W) -> Result<()> {
        self.format_stack.pop();
        match self.format_stack.last() {
            Some(spec) => out.set_color(spec)?,
            None => out.reset()?,
        }
        Ok(())
    }

    fn write_inline_code<W: WriteColor>(&self, out: &mut W, code: &str) -> Result<()> {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "`{}`", code)?;
        match self.format_stack.last() {
            Some(spec) => out.set_color(spec)?,
            None => out.reset()?,
        }
        Ok(())
    }
}
