use crate::api::ApiClient;
use crate::cache::{ListParams, QueryCache, QueryKey, Snapshot};
use crate::listing::{ClientOps, ListController, Modal, ModalMode};
use crate::notify::Notifier;
use crate::resources::CvResource;
use crate::ui::components::{
  draw_confirm, draw_form_modal, FilterBarEvent, FilterBar, KeyResult, SearchEvent, SearchInput,
  TextInput,
};
use crate::ui::renderfns::{level_color, truncate};
use crate::ui::view::{View, ViewAction};
use crate::ui::ensure_valid_selection;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use std::time::Duration;

/// Generic list view for one resource family.
///
/// All behavior comes from the [`ListController`] and the family's
/// [`CvResource`] schema; this type only maps keys and draws. Every family
/// gets search, category tabs, create/edit modal and delete for free.
pub struct ResourceListView<R: CvResource> {
  controller: ListController<R, ClientOps>,
  client: ApiClient,
  cache: QueryCache,
  list_state: ListState,
  search: SearchInput,
  filter: FilterBar,
  /// Pending delete confirmation (entry id), for families that ask first.
  confirm: Option<String>,
  /// Edit buffer for the focused modal field.
  field_input: TextInput,
}

impl<R: CvResource> ResourceListView<R> {
  pub fn new(
    client: ApiClient,
    cache: QueryCache,
    notifier: Notifier,
    debounce: Duration,
    page_size: Option<u32>,
  ) -> Self {
    let ops = ClientOps::new(client.clone(), R::FAMILY);
    let controller = ListController::new(ops, cache.clone(), notifier, debounce)
      .with_page_size(page_size);

    Self {
      controller,
      client,
      cache,
      list_state: ListState::default(),
      search: SearchInput::new(),
      filter: FilterBar::new(),
      confirm: None,
      field_input: TextInput::new(),
    }
  }

  fn selected_id(&self) -> Option<String> {
    let idx = self.list_state.selected()?;
    self.controller.rows().get(idx).map(|r| r.id().to_string())
  }

  /// Load the focused draft value into the field editor
  fn sync_field_input(&mut self) {
    if let Some(draft) = self.controller.draft_mut() {
      let focused = draft.focused();
      let value = draft
        .field(focused)
        .map(|(_, value)| value.to_string())
        .unwrap_or_default();
      self.field_input.set_value(value);
    }
  }

  fn handle_modal_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.controller.cancel_modal();
        return;
      }
      KeyCode::Enter => {
        self.controller.submit();
        return;
      }
      KeyCode::Tab | KeyCode::Down => {
        if let Some(draft) = self.controller.draft_mut() {
          draft.focus_next();
        }
        self.sync_field_input();
        return;
      }
      KeyCode::BackTab | KeyCode::Up => {
        if let Some(draft) = self.controller.draft_mut() {
          draft.focus_prev();
        }
        self.sync_field_input();
        return;
      }
      KeyCode::Char(' ') => {
        // Space cycles Select fields; for text fields it's just a character
        let mut cycled = false;
        if let Some(draft) = self.controller.draft_mut() {
          let focused = draft.focused();
          let is_select = draft
            .field(focused)
            .is_some_and(|(spec, _)| matches!(spec.kind, crate::resources::FieldKind::Select(_)));
          if is_select {
            draft.cycle_select(focused);
            cycled = true;
          }
        }
        if cycled {
          self.sync_field_input();
          return;
        }
      }
      _ => {}
    }

    // Everything else edits the focused field
    self.field_input.handle_key(key);
    let value = self.field_input.value().to_string();
    if let Some(draft) = self.controller.draft_mut() {
      let focused = draft.focused();
      draft.set_value(focused, value);
    }
  }

  fn handle_confirm_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') => {
        if let Some(id) = self.confirm.take() {
          self.controller.delete(&id);
        }
      }
      KeyCode::Char('n') | KeyCode::Esc => {
        self.confirm = None;
      }
      _ => {}
    }
  }

  fn request_delete(&mut self) {
    let Some(id) = self.selected_id() else {
      return;
    };
    if self.controller.is_busy(&id) {
      return;
    }
    if R::CONFIRM_DELETE {
      self.confirm = Some(id);
    } else {
      self.controller.delete(&id);
    }
  }

  /// Aggregate line data (e.g. technologies referenced by projects)
  fn aggregate(&self) -> Option<Snapshot<Vec<String>>> {
    let family = R::AGGREGATE?;
    Some(self.cache.snapshot(&QueryKey::unfiltered(family)))
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.controller.rows().len();
    ensure_valid_selection(&mut self.list_state, len);

    let mut title = format!(" {} ", R::FAMILY.label());
    if !self.controller.search_live().is_empty() {
      title.push_str(&format!("/{} ", self.controller.search_live()));
    }
    if self.controller.is_loading() {
      title.push_str("(loading...) ");
    } else if self.controller.search_pending() {
      title.push_str(&format!("({}, searching...) ", len));
    } else if self.controller.is_refetching() {
      title.push_str(&format!("({}, refreshing...) ", len));
    } else if let Some(error) = self.controller.error() {
      title.push_str(&format!("(error: {}) ", truncate(error, 40)));
    } else {
      title.push_str(&format!("({}) ", len));
    }

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if self.controller.is_loading() {
      // Skeleton rows while nothing is cached yet
      let skeleton: Vec<ListItem> = (0..5)
        .map(|_| {
          ListItem::new(Line::from(Span::styled(
            "░░░░░░░░░░░░░░░░░░░░░░░░",
            Style::default().fg(Color::DarkGray),
          )))
        })
        .collect();
      frame.render_widget(List::new(skeleton).block(block), area);
      return;
    }

    if len == 0 {
      let content = if self.controller.is_empty_result() {
        if self.controller.search_live().is_empty() {
          format!(
            "No {} yet. Press 'a' to add one.",
            R::FAMILY.label().to_lowercase()
          )
        } else {
          format!("No matches for \"{}\".", self.controller.search_live())
        }
      } else {
        "Failed to load. Press 'r' to retry.".to_string()
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = self
      .controller
      .rows()
      .iter()
      .map(|row| {
        let busy = self.controller.is_busy(row.id());
        let title_style = if busy {
          Style::default().fg(Color::DarkGray)
        } else {
          Style::default().fg(Color::Cyan)
        };

        let mut spans = vec![
          Span::styled(format!("{:<28}", truncate(row.title(), 28)), title_style),
          Span::raw(" "),
          Span::styled(
            truncate(&row.subtitle(), 60),
            Style::default().fg(Color::Gray),
          ),
        ];
        if let Some(level) = row.level() {
          spans.push(Span::styled(
            format!(" {:>3}%", level),
            Style::default().fg(level_color(level)),
          ));
        }
        if busy {
          spans.push(Span::styled(" ...", Style::default().fg(Color::DarkGray)));
        }
        ListItem::new(Line::from(spans))
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn render_aggregate(&self, frame: &mut Frame, area: Rect) {
    let Some(snapshot) = self.aggregate() else {
      return;
    };

    let text = match (&snapshot.data, &snapshot.error) {
      (Some(values), _) if values.is_empty() => "none".to_string(),
      (Some(values), _) => values.join(", "),
      (None, Some(_)) => "unavailable".to_string(),
      (None, None) => "loading...".to_string(),
    };

    let line = Line::from(vec![
      Span::styled(" Used by projects: ", Style::default().fg(Color::DarkGray)),
      Span::styled(truncate(&text, area.width as usize), Style::default().fg(Color::White)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
  }
}

impl<R: CvResource> View for ResourceListView<R> {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.controller.modal().is_open() {
      self.handle_modal_key(key);
      return ViewAction::None;
    }

    if self.confirm.is_some() {
      self.handle_confirm_key(key);
      return ViewAction::None;
    }

    // Let search component try to handle first
    match self.search.handle_key(key) {
      KeyResult::Handled => return ViewAction::None,
      KeyResult::Event(SearchEvent::Changed(query)) => {
        self.controller.set_search(query);
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Submitted) => {
        self.controller.flush_search();
        return ViewAction::None;
      }
      KeyResult::NotHandled => {}
    }

    // Category tabs
    if let KeyResult::Event(FilterBarEvent::SelectionChanged) = self.filter.handle_key(key) {
      self
        .controller
        .set_category(self.filter.selected_value().map(String::from));
      return ViewAction::None;
    }

    // Normal mode key handling
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
      }
      KeyCode::Char('a') => {
        self.controller.open_create();
        self.sync_field_input();
      }
      KeyCode::Char('e') | KeyCode::Enter => {
        if let Some(id) = self.selected_id() {
          self.controller.open_edit(&id);
          self.sync_field_input();
        }
      }
      KeyCode::Char('d') => {
        self.request_delete();
      }
      KeyCode::Char('r') => {
        self.controller.refresh();
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let has_filter = self.filter.is_active();
    let has_aggregate = R::AGGREGATE.is_some();

    let mut constraints = Vec::new();
    if has_filter {
      constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(1));
    if has_aggregate {
      constraints.push(Constraint::Length(1));
    }

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints(constraints)
      .split(area);

    let mut idx = 0;
    if has_filter {
      self.filter.render(frame, chunks[idx]);
      idx += 1;
    }
    let list_area = chunks[idx];
    self.render_list(frame, list_area);
    if has_aggregate {
      self.render_aggregate(frame, chunks[idx + 1]);
    }

    self.search.render_overlay(frame, area);

    if let Modal::Open { mode, draft, busy } = self.controller.modal() {
      let title = match mode {
        ModalMode::Create => format!("New {}", R::FAMILY.singular()),
        ModalMode::Edit(_) => format!("Edit {}", R::FAMILY.singular()),
      };
      draw_form_modal(frame, area, &title, draft, *busy);
    }

    if let Some(id) = &self.confirm {
      let subject = self
        .controller
        .rows()
        .iter()
        .find(|r| r.id() == *id)
        .map(|r| r.title().to_string())
        .unwrap_or_else(|| id.clone());
      draw_confirm(frame, area, &subject);
    }
  }

  fn breadcrumb_label(&self) -> String {
    R::FAMILY.label().to_string()
  }

  fn wants_input(&self) -> bool {
    self.controller.modal().is_open() || self.search.is_active() || self.confirm.is_some()
  }

  fn tick(&mut self) {
    if self.controller.tick() {
      self.filter.update_values(self.controller.categories());
    }

    if let Some(family) = R::AGGREGATE {
      let client = self.client.clone();
      self.cache.ensure(&QueryKey::unfiltered(family), move || async move {
        client
          .list::<String>(family, &ListParams::default())
          .await
          .map_err(|e| e.to_string())
      });
    }
  }
}
