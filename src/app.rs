use crate::api::ApiClient;
use crate::cache::{Family, QueryCache};
use crate::commands;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::notify::{Notifier, Toasts};
use crate::resources::{
  Award, Certification, Education, Experience, Interest, Reference, Skill, Technology,
};
use crate::session::Session;
use crate::ui;
use crate::ui::view::{View, ViewAction};
use crate::ui::views::{ProfileView, ResourceListView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::info;

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
}

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// Current input mode
  mode: Mode,

  /// Command input buffer (after pressing :)
  command_input: String,

  /// Selected autocomplete suggestion index
  selected_suggestion: usize,

  /// Application configuration
  config: Config,

  /// Portfolio API client
  client: ApiClient,

  /// Shared query cache
  cache: QueryCache,

  /// Notification sender handed to controllers
  notifier: Notifier,

  /// Footer toast queue
  toasts: Toasts,

  /// Authenticated session (token + display name), if any
  session: Session,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, session: Session) -> Result<Self> {
    let client = ApiClient::new(&config, session.token.clone())?;
    let cache = QueryCache::new();
    let (notifier, toasts) = Toasts::new(Duration::from_secs(4));

    let mut app = Self {
      view_stack: Vec::new(),
      mode: Mode::Normal,
      command_input: String::new(),
      selected_suggestion: 0,
      config,
      client,
      cache,
      notifier,
      toasts,
      session,
      should_quit: false,
    };
    let root = app
      .view_for(Family::Skills)
      .unwrap_or_else(|| Box::new(ProfileView::new(
        app.client.clone(),
        app.cache.clone(),
        app.notifier.clone(),
      )));
    app.view_stack.push(root);
    Ok(app)
  }

  /// Build the view for a resource family.
  fn view_for(&self, family: Family) -> Option<Box<dyn View>> {
    let debounce = Duration::from_millis(self.config.ui.search_debounce_ms);
    let page_size = self.config.ui.page_size;

    macro_rules! list_view {
      ($row:ty) => {
        Box::new(ResourceListView::<$row>::new(
          self.client.clone(),
          self.cache.clone(),
          self.notifier.clone(),
          debounce,
          page_size,
        )) as Box<dyn View>
      };
    }

    Some(match family {
      Family::Skills => list_view!(Skill),
      Family::Experience => list_view!(Experience),
      Family::Education => list_view!(Education),
      Family::Certifications => list_view!(Certification),
      Family::Awards => list_view!(Award),
      Family::Interests => list_view!(Interest),
      Family::References => list_view!(Reference),
      Family::Technologies => list_view!(Technology),
      Family::Profile => Box::new(ProfileView::new(
        self.client.clone(),
        self.cache.clone(),
        self.notifier.clone(),
      )),
      // Read-only aggregate, shown inside the technologies view
      Family::ProjectTechnologies => return None,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(250));
    info!("starting event loop");

    // Main loop
    while !self.should_quit {
      terminal.draw(|frame| self.draw(frame))?;

      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn draw(&mut self, frame: &mut Frame) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Header
        Constraint::Min(1),    // Main content
        Constraint::Length(1), // Footer
      ])
      .split(frame.area());

    let who = self
      .session
      .display_name
      .clone()
      .unwrap_or_else(|| {
        if self.session.is_authenticated() {
          "authenticated".to_string()
        } else {
          "guest".to_string()
        }
      });
    ui::renderfns::draw_header(frame, chunks[0], &self.config.header_title(), &who);

    if let Some(view) = self.view_stack.last_mut() {
      view.render(frame, chunks[1]);
    }

    if self.mode == Mode::Command {
      let suggestions = commands::get_suggestions(&self.command_input);
      ui::components::draw_command_overlay(
        frame,
        chunks[1],
        &self.command_input,
        &suggestions,
        self.selected_suggestion,
      );
    }

    let breadcrumb: Vec<String> = self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect();
    ui::renderfns::draw_footer(frame, chunks[2], &breadcrumb, self.toasts.current());
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {
        self.toasts.tick();
        if let Some(view) = self.view_stack.last_mut() {
          view.tick();
        }
      }
    }
  }

  fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
    // Ctrl-C always quits, regardless of mode or overlays
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Command => self.handle_command_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    let captured = self
      .view_stack
      .last()
      .map(|v| v.wants_input())
      .unwrap_or(false);

    // Global shortcuts only when no overlay is capturing input
    if !captured && key.code == KeyCode::Char(':') {
      self.mode = Mode::Command;
      self.command_input.clear();
      self.selected_suggestion = 0;
      return;
    }

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key),
      None => ViewAction::Pop,
    };

    match action {
      ViewAction::None => {}
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  fn handle_command_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      KeyCode::Enter => {
        self.execute_command();
        self.mode = Mode::Normal;
        self.selected_suggestion = 0;
      }
      KeyCode::Tab | KeyCode::Down => {
        // Navigate autocomplete suggestions
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = (self.selected_suggestion + 1) % suggestions.len();
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        // Navigate autocomplete suggestions backwards
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = if self.selected_suggestion == 0 {
            suggestions.len() - 1
          } else {
            self.selected_suggestion - 1
          };
        }
      }
      KeyCode::Backspace => {
        self.command_input.pop();
        self.selected_suggestion = 0; // Reset selection on input change
      }
      KeyCode::Char(c) => {
        self.command_input.push(c);
        self.selected_suggestion = 0; // Reset selection on input change
      }
      _ => {}
    }
  }

  fn execute_command(&mut self) {
    // Get the command to execute - either from selected suggestion or direct input
    let suggestions = commands::get_suggestions(&self.command_input);
    let cmd = if !suggestions.is_empty() && self.selected_suggestion < suggestions.len() {
      suggestions[self.selected_suggestion]
    } else {
      self.command_input.clear();
      return;
    };

    match cmd.family {
      Some(family) => {
        if let Some(view) = self.view_for(family) {
          info!(command = cmd.name, "switching view");
          self.view_stack = vec![view];
        }
      }
      None => {
        // Only "quit" has no family
        self.should_quit = true;
      }
    }
    self.command_input.clear();
  }
}
