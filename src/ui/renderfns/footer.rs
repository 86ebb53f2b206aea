use crate::notify::{Notice, NoticeKind};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer bar with view breadcrumb and the current toast
pub fn draw_footer(frame: &mut Frame, area: Rect, breadcrumb: &[String], toast: Option<&Notice>) {
  let mut spans = Vec::new();

  spans.push(Span::raw(" "));

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }

    let style = if i == breadcrumb.len() - 1 {
      // Current view - highlighted
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };

    spans.push(Span::styled(part.clone(), style));
  }

  if let Some(notice) = toast {
    let style = match notice.kind {
      NoticeKind::Success => Style::default().fg(Color::Green),
      NoticeKind::Error => Style::default().fg(Color::Red).bold(),
    };
    spans.push(Span::raw("   "));
    spans.push(Span::styled(notice.message.clone(), style));
  }

  let line = Line::from(spans);
  let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}
