use crate::listing::Draft;
use crate::resources::FieldKind;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Draw the create/edit modal form over the list.
///
/// One line per field: marker, label, value, then any validation message for
/// that field in red. The footer swaps to a saving indicator while the
/// submit is in flight.
pub fn draw_form_modal(frame: &mut Frame, area: Rect, title: &str, draft: &Draft, busy: bool) {
  let width = (area.width * 70 / 100).clamp(40, 90);
  let height = (draft.len() as u16 + 4).min(area.height);

  let x = area.x + (area.width.saturating_sub(width)) / 2;
  let y = area.y + (area.height.saturating_sub(height)) / 2;
  let overlay_area = Rect::new(x, y, width, height);

  frame.render_widget(Clear, overlay_area);

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan))
    .title(format!(" {} ", title));

  let inner = block.inner(overlay_area);
  frame.render_widget(block, overlay_area);

  if inner.height == 0 {
    return;
  }

  let mut lines = Vec::new();
  for idx in 0..draft.len() {
    let Some((spec, value)) = draft.field(idx) else {
      continue;
    };
    let focused = idx == draft.focused() && !busy;

    let marker = if focused { "> " } else { "  " };
    let label = if spec.required {
      format!("{}*", spec.label)
    } else {
      spec.label.to_string()
    };

    let mut spans = vec![
      Span::styled(marker, Style::default().fg(Color::Yellow)),
      Span::styled(format!("{:<14}", label), Style::default().fg(Color::White)),
    ];

    let value_style = if focused {
      Style::default().fg(Color::Yellow)
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::styled(value.to_string(), value_style));
    if focused {
      spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }

    if let FieldKind::Select(_) = spec.kind {
      spans.push(Span::styled(
        "  (Space cycles)",
        Style::default().fg(Color::DarkGray),
      ));
    }

    if let Some(error) = draft.error_for(spec.name) {
      spans.push(Span::styled(
        format!("  {}", error.message),
        Style::default().fg(Color::Red),
      ));
    }

    lines.push(Line::from(spans));
  }

  lines.push(Line::raw(""));
  let footer = if busy {
    Line::from(Span::styled(
      " saving...",
      Style::default().fg(Color::Yellow),
    ))
  } else {
    Line::from(Span::styled(
      " Tab:next  Enter:save  Esc:cancel",
      Style::default().fg(Color::DarkGray),
    ))
  };
  lines.push(footer);

  frame.render_widget(Paragraph::new(lines), inner);
}
