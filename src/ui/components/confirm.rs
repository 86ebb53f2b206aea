use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Draw the delete confirmation overlay
pub fn draw_confirm(frame: &mut Frame, area: Rect, subject: &str) {
  let width = (area.width * 50 / 100).clamp(30, 64);
  let height = 4;

  let x = area.x + (area.width.saturating_sub(width)) / 2;
  let y = area.y + (area.height.saturating_sub(height)) / 2;
  let overlay_area = Rect::new(x, y, width, height);

  frame.render_widget(Clear, overlay_area);

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red))
    .title(" Confirm delete ");

  let inner = block.inner(overlay_area);
  frame.render_widget(block, overlay_area);

  let lines = vec![
    Line::from(vec![
      Span::raw(" Delete "),
      Span::styled(subject.to_string(), Style::default().fg(Color::Yellow).bold()),
      Span::raw("?"),
    ]),
    Line::from(Span::styled(
      " y:delete  n/Esc:cancel",
      Style::default().fg(Color::DarkGray),
    )),
  ];

  frame.render_widget(Paragraph::new(lines), inner);
}
