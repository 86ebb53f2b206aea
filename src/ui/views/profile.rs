use crate::api::{ApiClient, Mutated};
use crate::cache::{Family, QueryCache, QueryKey, Snapshot};
use crate::listing::Draft;
use crate::notify::Notifier;
use crate::resources::PersonalInfo;
use crate::ui::components::{draw_form_modal, TextInput};
use crate::ui::view::{View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use tokio::sync::mpsc;
use tracing::warn;

/// Singleton personal-info view: one record, no list, PUT to replace.
pub struct ProfileView {
  client: ApiClient,
  cache: QueryCache,
  notifier: Notifier,
  state: Snapshot<PersonalInfo>,
  seen_version: Option<u64>,
  draft: Option<Draft>,
  busy: bool,
  field_input: TextInput,
  tx: mpsc::UnboundedSender<Result<Mutated, String>>,
  rx: mpsc::UnboundedReceiver<Result<Mutated, String>>,
}

impl ProfileView {
  pub fn new(client: ApiClient, cache: QueryCache, notifier: Notifier) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      client,
      cache,
      notifier,
      state: Snapshot {
        data: None,
        error: None,
        is_loading: true,
        is_refetching: false,
      },
      seen_version: None,
      draft: None,
      busy: false,
      field_input: TextInput::new(),
      tx,
      rx,
    }
  }

  fn key(&self) -> QueryKey {
    QueryKey::unfiltered(Family::Profile)
  }

  fn open_edit(&mut self) {
    if self.draft.is_some() {
      return;
    }
    self.draft = Some(Draft::new(PersonalInfo::form(self.state.data.as_ref())));
    self.sync_field_input();
  }

  fn sync_field_input(&mut self) {
    if let Some(draft) = &self.draft {
      let value = draft
        .field(draft.focused())
        .map(|(_, value)| value.to_string())
        .unwrap_or_default();
      self.field_input.set_value(value);
    }
  }

  fn submit(&mut self) {
    if self.busy {
      return;
    }
    let Some(draft) = &mut self.draft else {
      return;
    };
    let Some(values) = draft.validate() else {
      return;
    };
    let body = match PersonalInfo::payload(&values) {
      Ok(body) => body,
      Err(errors) => {
        draft.set_errors(errors);
        return;
      }
    };

    self.busy = true;
    let client = self.client.clone();
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = client
        .update(Family::Profile, None, &body)
        .await
        .map_err(|e| e.to_string());
      let _ = tx.send(result);
    });
  }

  fn handle_modal_key(&mut self, key: KeyEvent) {
    if self.busy {
      return;
    }
    match key.code {
      KeyCode::Esc => {
        self.draft = None;
      }
      KeyCode::Enter => {
        self.submit();
      }
      KeyCode::Tab | KeyCode::Down => {
        if let Some(draft) = &mut self.draft {
          draft.focus_next();
        }
        self.sync_field_input();
      }
      KeyCode::BackTab | KeyCode::Up => {
        if let Some(draft) = &mut self.draft {
          draft.focus_prev();
        }
        self.sync_field_input();
      }
      _ => {
        self.field_input.handle_key(key);
        let value = self.field_input.value().to_string();
        if let Some(draft) = &mut self.draft {
          let focused = draft.focused();
          draft.set_value(focused, value);
        }
      }
    }
  }
}

impl View for ProfileView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.draft.is_some() {
      self.handle_modal_key(key);
      return ViewAction::None;
    }

    match key.code {
      KeyCode::Char('e') | KeyCode::Enter => self.open_edit(),
      KeyCode::Char('r') => self.cache.refetch(&self.key()),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let title = if self.state.is_loading {
      " Profile (loading...) ".to_string()
    } else if let Some(error) = &self.state.error {
      format!(" Profile (error: {}) ", error)
    } else {
      " Profile ".to_string()
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let lines: Vec<Line> = match &self.state.data {
      None => vec![Line::from(Span::styled(
        "No profile yet. Press 'e' to create one.",
        Style::default().fg(Color::DarkGray),
      ))],
      Some(info) => {
        let row = |label: &'static str, value: String| {
          Line::from(vec![
            Span::styled(format!(" {:<12}", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(Color::White)),
          ])
        };
        vec![
          row("Name", info.full_name.clone()),
          row("Headline", info.headline.clone().unwrap_or_default()),
          row("Email", info.email.clone()),
          row("Phone", info.phone.clone().unwrap_or_default()),
          row("Location", info.location.clone().unwrap_or_default()),
          Line::raw(""),
          row("Summary", info.summary.clone().unwrap_or_default()),
          Line::raw(""),
          Line::from(Span::styled(
            " e:edit  r:refresh  q:back",
            Style::default().fg(Color::DarkGray),
          )),
        ]
      }
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);

    if let Some(draft) = &self.draft {
      draw_form_modal(frame, area, "Edit Profile", draft, self.busy);
    }
  }

  fn breadcrumb_label(&self) -> String {
    "Profile".to_string()
  }

  fn wants_input(&self) -> bool {
    self.draft.is_some()
  }

  fn tick(&mut self) {
    let mut dirty = false;

    while let Ok(result) = self.rx.try_recv() {
      self.busy = false;
      match result {
        Ok(mutated) => {
          self
            .notifier
            .success(mutated.message.unwrap_or_else(|| "Profile updated".to_string()));
          self.cache.invalidate(&Family::Profile.invalidation_set());
          self.draft = None;
          dirty = true;
        }
        Err(message) => {
          warn!(error = %message, "profile update failed");
          self.notifier.error(message);
        }
      }
    }

    let key = self.key();
    let client = self.client.clone();
    self.cache.ensure(&key, move || async move {
      client
        .get_one::<PersonalInfo>(Family::Profile)
        .await
        .map_err(|e| e.to_string())
    });

    let version = self.cache.version();
    if dirty || self.seen_version != Some(version) {
      self.state = self.cache.snapshot(&key);
      self.seen_version = Some(version);
    }
  }
}
