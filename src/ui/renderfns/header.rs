use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with logo, title, session identity and shortcuts
pub fn draw_header(frame: &mut Frame, area: Rect, title: &str, who: &str) {
  let header = Line::from(vec![
    Span::styled(" folio ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", who), Style::default().fg(Color::Yellow).bold()),
    Span::raw("  "),
    // Shortcuts - keys and brackets highlighted, descriptions dimmed
    Span::styled("<:>", Style::default().fg(Color::Cyan)),
    Span::styled(" command", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("</>", Style::default().fg(Color::Cyan)),
    Span::styled(" search", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<a>", Style::default().fg(Color::Cyan)),
    Span::styled(" add", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<q>", Style::default().fg(Color::Cyan)),
    Span::styled(" quit", Style::default().fg(Color::DarkGray)),
  ]);

  let paragraph = Paragraph::new(header).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}
