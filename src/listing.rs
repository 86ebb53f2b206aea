//! List-resource controller: the workflow every resource family shares.
//!
//! One controller binds together, for a single family: the debounced search
//! text, the immediate category filter, the cached list query, a delete
//! action, and the create/edit modal. Mutations report back as explicit
//! result values over a channel and are processed before any modal-close or
//! draft-reset side effect. The controller is headless; views render its
//! state and forward input.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{ApiClient, Mutated};
use crate::cache::{Family, ListParams, QueryCache, QueryKey, Snapshot};
use crate::debounce::Debounced;
use crate::notify::Notifier;
use crate::resources::{CvResource, FieldError, FieldKind, FieldSpec, FormSpec, FormValues};

/// A boxed future for one remote operation.
pub type OpFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;

/// The collection verbs a family binds to the engine.
///
/// Implemented by [`ClientOps`] over the real API client and by stubs in
/// tests, so the whole workflow is exercisable without a network.
pub trait ResourceOps<R>: Send + Sync + 'static {
  fn list(&self, params: ListParams) -> OpFuture<Vec<R>>;
  fn create(&self, body: Value) -> OpFuture<Mutated>;
  fn update(&self, id: String, body: Value) -> OpFuture<Mutated>;
  fn delete(&self, id: String) -> OpFuture<Mutated>;
}

/// [`ResourceOps`] over the HTTP client for one family.
pub struct ClientOps {
  client: ApiClient,
  family: Family,
}

impl ClientOps {
  pub fn new(client: ApiClient, family: Family) -> Self {
    Self { client, family }
  }
}

impl<R: CvResource> ResourceOps<R> for ClientOps {
  fn list(&self, params: ListParams) -> OpFuture<Vec<R>> {
    let client = self.client.clone();
    let family = self.family;
    Box::pin(async move {
      client
        .list::<R>(family, &params)
        .await
        .map_err(|e| e.to_string())
    })
  }

  fn create(&self, body: Value) -> OpFuture<Mutated> {
    let client = self.client.clone();
    let family = self.family;
    Box::pin(async move { client.create(family, &body).await.map_err(|e| e.to_string()) })
  }

  fn update(&self, id: String, body: Value) -> OpFuture<Mutated> {
    let client = self.client.clone();
    let family = self.family;
    Box::pin(async move {
      client
        .update(family, Some(&id), &body)
        .await
        .map_err(|e| e.to_string())
    })
  }

  fn delete(&self, id: String) -> OpFuture<Mutated> {
    let client = self.client.clone();
    let family = self.family;
    Box::pin(async move { client.delete(family, &id).await.map_err(|e| e.to_string()) })
  }
}

/// Edit buffer behind the modal form.
///
/// Values are copied strings; the draft never aliases a cached row, so
/// cancelling leaves the list's copy untouched.
#[derive(Debug, Clone)]
pub struct Draft {
  spec: FormSpec,
  values: Vec<String>,
  focused: usize,
  errors: Vec<FieldError>,
}

impl Draft {
  pub(crate) fn new(spec: FormSpec) -> Self {
    let values = spec.fields.iter().map(|f| f.initial.clone()).collect();
    Self {
      spec,
      values,
      focused: 0,
      errors: Vec::new(),
    }
  }

  pub fn len(&self) -> usize {
    self.spec.fields.len()
  }

  pub fn is_empty(&self) -> bool {
    self.spec.fields.is_empty()
  }

  pub fn field(&self, idx: usize) -> Option<(&FieldSpec, &str)> {
    let spec = &self.spec.fields.get(idx)?.spec;
    let value = self.values.get(idx)?;
    Some((spec, value.as_str()))
  }

  pub fn focused(&self) -> usize {
    self.focused
  }

  pub fn focus_next(&mut self) {
    if !self.values.is_empty() {
      self.focused = (self.focused + 1) % self.values.len();
    }
  }

  pub fn focus_prev(&mut self) {
    if !self.values.is_empty() {
      self.focused = (self.focused + self.values.len() - 1) % self.values.len();
    }
  }

  pub fn set_value(&mut self, idx: usize, value: impl Into<String>) {
    if let Some(slot) = self.values.get_mut(idx) {
      *slot = value.into();
    }
  }

  /// Cycle a Select field to its next option.
  pub fn cycle_select(&mut self, idx: usize) {
    let Some(field) = self.spec.fields.get(idx) else {
      return;
    };
    let FieldKind::Select(options) = field.spec.kind else {
      return;
    };
    if options.is_empty() {
      return;
    }
    let current = self.values.get(idx).map(String::as_str).unwrap_or("");
    let position = options.iter().position(|o| *o == current);
    let next = match position {
      Some(i) => options[(i + 1) % options.len()],
      None => options[0],
    };
    self.set_value(idx, next);
  }

  pub fn errors(&self) -> &[FieldError] {
    &self.errors
  }

  pub fn error_for(&self, name: &str) -> Option<&FieldError> {
    self.errors.iter().find(|e| e.field == name)
  }

  /// Run per-field validation, recording errors inline.
  ///
  /// Returns the collected values when every field passes, for cross-field
  /// validation and payload construction.
  pub(crate) fn validate(&mut self) -> Option<FormValues> {
    let errors: Vec<FieldError> = self
      .spec
      .fields
      .iter()
      .zip(&self.values)
      .filter_map(|(field, value)| field.spec.validate(value))
      .collect();
    if errors.is_empty() {
      self.errors.clear();
      Some(self.form_values())
    } else {
      self.errors = errors;
      None
    }
  }

  pub(crate) fn set_errors(&mut self, errors: Vec<FieldError>) {
    self.errors = errors;
  }

  fn form_values(&self) -> FormValues {
    let mut values = FormValues::new();
    for (field, value) in self.spec.fields.iter().zip(&self.values) {
      values.insert(field.spec.name, value.clone());
    }
    values
  }
}

/// Which entry the open modal is writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalMode {
  Create,
  Edit(String),
}

/// Explicit modal state; opening is rejected while another modal is open.
#[derive(Debug, Clone)]
pub enum Modal {
  Closed,
  Open {
    mode: ModalMode,
    draft: Draft,
    /// Submit in flight; editing and resubmission are disabled.
    busy: bool,
  },
}

impl Modal {
  pub fn is_open(&self) -> bool {
    matches!(self, Modal::Open { .. })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MutationKind {
  Create,
  Update,
  Delete,
}

struct MutationDone {
  kind: MutationKind,
  id: Option<String>,
  result: Result<Mutated, String>,
}

/// The controller itself, generic over the row type and its ops binding.
pub struct ListController<R: CvResource, O: ResourceOps<R>> {
  ops: Arc<O>,
  cache: QueryCache,
  notifier: Notifier,
  search: Debounced,
  search_live: String,
  category: Option<String>,
  page_size: Option<u32>,
  modal: Modal,
  /// Entries with a delete/update in flight; their action controls are
  /// disabled while unrelated entries stay interactive.
  busy: HashSet<String>,
  tx: mpsc::UnboundedSender<MutationDone>,
  rx: mpsc::UnboundedReceiver<MutationDone>,
  state: Snapshot<Vec<R>>,
  seen_version: Option<u64>,
  dirty: bool,
}

impl<R: CvResource, O: ResourceOps<R>> ListController<R, O> {
  pub fn new(ops: O, cache: QueryCache, notifier: Notifier, debounce: Duration) -> Self {
    Self::new_shared(Arc::new(ops), cache, notifier, debounce)
  }

  /// Like [`ListController::new`], but sharing an already-wrapped ops handle.
  pub fn new_shared(
    ops: Arc<O>,
    cache: QueryCache,
    notifier: Notifier,
    debounce: Duration,
  ) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      ops,
      cache,
      notifier,
      search: Debounced::new("", debounce),
      search_live: String::new(),
      category: None,
      page_size: None,
      modal: Modal::Closed,
      busy: HashSet::new(),
      tx,
      rx,
      state: Snapshot {
        data: None,
        error: None,
        is_loading: true,
        is_refetching: false,
      },
      seen_version: None,
      dirty: true,
    }
  }

  pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
    self.page_size = page_size;
    self
  }

  /// The active query key: family + debounced search + immediate filters.
  pub fn key(&self) -> QueryKey {
    QueryKey::new(
      R::FAMILY,
      ListParams {
        q: Some(self.search.value().to_string()),
        category: self.category.clone(),
        technology: None,
        page: None,
        limit: self.page_size,
      },
    )
  }

  /// Update the live search text; the query re-keys after the debounce.
  pub fn set_search(&mut self, text: impl Into<String>) {
    let text = text.into();
    self.search_live = text.clone();
    self.search.set(text);
  }

  pub fn search_live(&self) -> &str {
    &self.search_live
  }

  /// Apply any pending search text immediately (Enter in the search box).
  pub fn flush_search(&mut self) {
    self.search.flush();
    self.dirty = true;
  }

  /// Category filter changes take effect immediately (not debounced).
  pub fn set_category(&mut self, category: Option<String>) {
    self.category = category;
    self.dirty = true;
  }

  /// Whether typed search text is still waiting out its debounce window.
  pub fn search_pending(&self) -> bool {
    self.search.is_settling()
  }

  /// Drive the controller: debounce, mutation completions, query refresh.
  /// Returns true when visible state changed.
  pub fn tick(&mut self) -> bool {
    let mut changed = false;

    if self.search.tick() {
      self.dirty = true;
      changed = true;
    }

    // Mutation results first, so their invalidation triggers this tick's
    // refetch rather than the next one's
    while let Ok(done) = self.rx.try_recv() {
      self.handle_done(done);
      changed = true;
    }

    let key = self.key();
    let ops = Arc::clone(&self.ops);
    let params = key.params.clone();
    self
      .cache
      .ensure(&key, move || ops.list(params));

    let version = self.cache.version();
    if self.dirty || self.seen_version != Some(version) {
      self.state = self.cache.snapshot(&key);
      self.seen_version = Some(version);
      self.dirty = false;
      changed = true;
    }

    changed
  }

  // Query state ------------------------------------------------------------

  pub fn rows(&self) -> &[R] {
    self.state.data.as_deref().unwrap_or(&[])
  }

  /// Initial fetch with nothing cached yet: render skeletons.
  pub fn is_loading(&self) -> bool {
    self.state.is_loading
  }

  /// Background revalidation with previous results still on screen.
  pub fn is_refetching(&self) -> bool {
    self.state.is_refetching
  }

  /// Query succeeded with zero items (distinct from loading and error).
  pub fn is_empty_result(&self) -> bool {
    self.state.data.as_ref().is_some_and(|rows| rows.is_empty())
  }

  pub fn error(&self) -> Option<&str> {
    self.state.error.as_deref()
  }

  /// Distinct category values of the loaded rows, for the filter bar.
  pub fn categories(&self) -> Vec<String> {
    let mut values: Vec<String> = self
      .rows()
      .iter()
      .filter_map(|r| r.category().map(String::from))
      .collect();
    values.sort();
    values.dedup();
    values
  }

  /// Force a refetch of the current key (manual refresh).
  pub fn refresh(&mut self) {
    self.cache.refetch(&self.key());
    self.dirty = true;
  }

  // Modal ------------------------------------------------------------------

  pub fn modal(&self) -> &Modal {
    &self.modal
  }

  /// Mutable draft access for the form, disabled while a submit is in
  /// flight.
  pub fn draft_mut(&mut self) -> Option<&mut Draft> {
    match &mut self.modal {
      Modal::Open { draft, busy: false, .. } => Some(draft),
      _ => None,
    }
  }

  /// Open the modal in create mode. Rejected while any modal is open.
  pub fn open_create(&mut self) {
    if self.modal.is_open() {
      return;
    }
    self.modal = Modal::Open {
      mode: ModalMode::Create,
      draft: Draft::new(R::form(None)),
      busy: false,
    };
  }

  /// Open the modal pre-populated from the row with `id`.
  ///
  /// Rejected while a modal is open or a mutation for that entry is in
  /// flight. The draft is built from copies of the row's values.
  pub fn open_edit(&mut self, id: &str) {
    if self.modal.is_open() || self.busy.contains(id) {
      return;
    }
    let Some(row) = self.rows().iter().find(|r| r.id() == id) else {
      return;
    };
    let draft = Draft::new(R::form(Some(row)));
    self.modal = Modal::Open {
      mode: ModalMode::Edit(id.to_string()),
      draft,
      busy: false,
    };
  }

  /// Close the modal, discarding the draft. No-op while submitting.
  pub fn cancel_modal(&mut self) {
    if let Modal::Open { busy: false, .. } = &self.modal {
      self.modal = Modal::Closed;
    }
  }

  /// Validate the draft and, if clean, send the create/update.
  ///
  /// Validation failures stay inline in the modal and never reach the
  /// network.
  pub fn submit(&mut self) {
    let Modal::Open { mode, draft, busy } = &mut self.modal else {
      return;
    };
    if *busy {
      return;
    }

    let Some(values) = draft.validate() else {
      return;
    };
    let body = match R::payload(&values) {
      Ok(body) => body,
      Err(cross_field) => {
        draft.set_errors(cross_field);
        return;
      }
    };

    *busy = true;

    let ops = Arc::clone(&self.ops);
    let tx = self.tx.clone();
    match mode.clone() {
      ModalMode::Create => {
        debug!(family = R::FAMILY.path(), "create");
        tokio::spawn(async move {
          let result = ops.create(body).await;
          let _ = tx.send(MutationDone {
            kind: MutationKind::Create,
            id: None,
            result,
          });
        });
      }
      ModalMode::Edit(id) => {
        debug!(family = R::FAMILY.path(), id = %id, "update");
        self.busy.insert(id.clone());
        tokio::spawn(async move {
          let result = ops.update(id.clone(), body).await;
          let _ = tx.send(MutationDone {
            kind: MutationKind::Update,
            id: Some(id),
            result,
          });
        });
      }
    }
  }

  // Delete -----------------------------------------------------------------

  /// Whether a mutation for this entry is in flight.
  pub fn is_busy(&self, id: &str) -> bool {
    self.busy.contains(id)
  }

  /// Delete the entry immediately. A second call for the same entry while
  /// the first is in flight is ignored.
  pub fn delete(&mut self, id: &str) {
    if self.busy.contains(id) {
      return;
    }
    self.busy.insert(id.to_string());

    let ops = Arc::clone(&self.ops);
    let tx = self.tx.clone();
    let id = id.to_string();
    debug!(family = R::FAMILY.path(), id = %id, "delete");
    tokio::spawn(async move {
      let result = ops.delete(id.clone()).await;
      let _ = tx.send(MutationDone {
        kind: MutationKind::Delete,
        id: Some(id),
        result,
      });
    });
  }

  // Completion -------------------------------------------------------------

  fn handle_done(&mut self, done: MutationDone) {
    if let Some(id) = &done.id {
      self.busy.remove(id);
    }

    match done.result {
      Ok(mutated) => {
        let fallback = match done.kind {
          MutationKind::Create => format!("{} created", R::FAMILY.singular()),
          MutationKind::Update => format!("{} updated", R::FAMILY.singular()),
          MutationKind::Delete => format!("{} deleted", R::FAMILY.singular()),
        };
        self.notifier.success(mutated.message.unwrap_or(fallback));

        // Every cached key of this family (and declared dependents) is now
        // stale; the list refetches instead of being patched optimistically
        self.cache.invalidate(&R::FAMILY.invalidation_set());

        if matches!(done.kind, MutationKind::Create | MutationKind::Update) {
          self.modal = Modal::Closed;
        }
        self.dirty = true;
      }
      Err(message) => {
        warn!(family = R::FAMILY.path(), error = %message, "mutation failed");
        self.notifier.error(message);

        // Modal stays open with the unsaved values so the user can retry
        if matches!(done.kind, MutationKind::Create | MutationKind::Update) {
          if let Modal::Open { busy, .. } = &mut self.modal {
            *busy = false;
          }
        }
        // Failed deletes leave the list untouched: no invalidation
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::notify::Toasts;
  use crate::resources::Skill;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::sync::Mutex;

  /// In-memory server: list narrows by `q` against skill names, mutations
  /// edit the row set unless configured to fail.
  #[derive(Default)]
  struct StubOps {
    rows: Mutex<Vec<Skill>>,
    list_calls: AtomicU32,
    create_calls: AtomicU32,
    delete_calls: AtomicU32,
    last_params: Mutex<Option<ListParams>>,
    fail_mutations: bool,
    message: Option<&'static str>,
  }

  impl StubOps {
    fn with_rows(rows: Vec<Skill>) -> Self {
      Self {
        rows: Mutex::new(rows),
        ..Self::default()
      }
    }

    fn snapshot_rows(&self) -> Vec<Skill> {
      self.rows.lock().unwrap().clone()
    }
  }

  impl ResourceOps<Skill> for StubOps {
    fn list(&self, params: ListParams) -> OpFuture<Vec<Skill>> {
      self.list_calls.fetch_add(1, Ordering::SeqCst);
      *self.last_params.lock().unwrap() = Some(params.clone());

      let q = params
        .query_pairs()
        .into_iter()
        .find(|(name, _)| *name == "q")
        .map(|(_, value)| value.to_lowercase());
      let rows: Vec<Skill> = self
        .rows
        .lock()
        .unwrap()
        .iter()
        .filter(|s| match &q {
          Some(q) => s.name.to_lowercase().contains(q),
          None => true,
        })
        .cloned()
        .collect();
      Box::pin(async move { Ok(rows) })
    }

    fn create(&self, body: Value) -> OpFuture<Mutated> {
      self.create_calls.fetch_add(1, Ordering::SeqCst);
      if self.fail_mutations {
        return Box::pin(async { Err("Skill creation failed".to_string()) });
      }
      let mut rows = self.rows.lock().unwrap();
      let id = format!("sk-{}", rows.len() + 1);
      rows.push(Skill {
        id,
        name: body["name"].as_str().unwrap_or_default().to_string(),
        category: body["category"].as_str().unwrap_or_default().to_string(),
        level: body["level"].as_u64().unwrap_or(0) as u8,
        description: None,
        created_at: None,
        updated_at: None,
      });
      let message = self.message.map(String::from);
      Box::pin(async move { Ok(Mutated { message }) })
    }

    fn update(&self, id: String, body: Value) -> OpFuture<Mutated> {
      if self.fail_mutations {
        return Box::pin(async { Err("Skill update failed".to_string()) });
      }
      let mut rows = self.rows.lock().unwrap();
      if let Some(row) = rows.iter_mut().find(|s| s.id == id) {
        row.name = body["name"].as_str().unwrap_or_default().to_string();
      }
      Box::pin(async { Ok(Mutated { message: None }) })
    }

    fn delete(&self, id: String) -> OpFuture<Mutated> {
      self.delete_calls.fetch_add(1, Ordering::SeqCst);
      if self.fail_mutations {
        return Box::pin(async { Err("Skill deletion failed".to_string()) });
      }
      self.rows.lock().unwrap().retain(|s| s.id != id);
      Box::pin(async { Ok(Mutated { message: None }) })
    }
  }

  fn skill(id: &str, name: &str) -> Skill {
    Skill {
      id: id.to_string(),
      name: name.to_string(),
      category: "general".to_string(),
      level: 50,
      description: None,
      created_at: None,
      updated_at: None,
    }
  }

  fn twelve_skills() -> Vec<Skill> {
    let names = [
      "React", "React Native", "Rust", "Go", "Python", "Postgres", "Redis", "Docker", "Kubernetes",
      "GraphQL", "Terraform", "Nix",
    ];
    names
      .iter()
      .enumerate()
      .map(|(i, name)| skill(&format!("sk-{}", i + 1), name))
      .collect()
  }

  const DEBOUNCE: Duration = Duration::from_millis(40);

  fn controller(
    ops: StubOps,
  ) -> (ListController<Skill, StubOps>, Arc<StubOps>, Toasts) {
    // Keep a second handle to the stub for assertions
    let ops = Arc::new(ops);
    let (notifier, toasts) = Toasts::new(Duration::from_secs(5));
    let mut controller =
      ListController::new_shared(Arc::clone(&ops), QueryCache::new(), notifier, DEBOUNCE);
    controller.tick();
    (controller, ops, toasts)
  }

  async fn settle<O: ResourceOps<Skill>>(c: &mut ListController<Skill, O>) {
    // Let spawned fetches and mutations land, then fold them in
    for _ in 0..4 {
      tokio::time::sleep(Duration::from_millis(20)).await;
      c.tick();
    }
  }

  async fn wait_debounce<O: ResourceOps<Skill>>(c: &mut ListController<Skill, O>) {
    tokio::time::sleep(DEBOUNCE + Duration::from_millis(10)).await;
    settle(c).await;
  }

  #[tokio::test]
  async fn test_search_narrows_then_restores() {
    let (mut c, ops, _toasts) = controller(StubOps::with_rows(twelve_skills()));
    settle(&mut c).await;
    assert_eq!(c.rows().len(), 12);
    assert_eq!(ops.list_calls.load(Ordering::SeqCst), 1);

    // Typing re-keys only after the debounce window
    c.set_search("react");
    c.tick();
    assert_eq!(c.rows().len(), 12);
    wait_debounce(&mut c).await;

    let params = ops.last_params.lock().unwrap().clone().unwrap();
    assert!(params
      .query_pairs()
      .contains(&("q", "react".to_string())));
    assert_eq!(c.rows().len(), 2);

    // Clearing sends no q parameter at all and restores the full list
    c.set_search("");
    wait_debounce(&mut c).await;
    let params = ops.last_params.lock().unwrap().clone().unwrap();
    assert!(params.query_pairs().iter().all(|(name, _)| *name != "q"));
    assert_eq!(c.rows().len(), 12);
  }

  #[tokio::test]
  async fn test_cleared_search_hits_cache_again() {
    let (mut c, ops, _toasts) = controller(StubOps::with_rows(twelve_skills()));
    settle(&mut c).await;

    c.set_search("rust");
    wait_debounce(&mut c).await;
    assert_eq!(ops.list_calls.load(Ordering::SeqCst), 2);

    // The unfiltered key is still cached; no third call
    c.set_search("");
    wait_debounce(&mut c).await;
    assert_eq!(ops.list_calls.load(Ordering::SeqCst), 2);
    assert_eq!(c.rows().len(), 12);
  }

  #[tokio::test]
  async fn test_cancelled_edit_leaves_list_unchanged() {
    let (mut c, _ops, _toasts) = controller(StubOps::with_rows(vec![skill("sk-1", "Rust")]));
    settle(&mut c).await;
    let before = c.rows().to_vec();

    c.open_edit("sk-1");
    let draft = c.draft_mut().expect("draft open");
    draft.set_value(0, "Changed name");
    c.cancel_modal();
    settle(&mut c).await;

    assert_eq!(c.rows()[0].name, before[0].name);
    assert!(!c.modal().is_open());
  }

  #[tokio::test]
  async fn test_create_closes_modal_and_refetches() {
    let (mut c, ops, mut toasts) = controller(StubOps::with_rows(vec![skill("sk-1", "Rust")]));
    settle(&mut c).await;

    c.open_create();
    {
      let draft = c.draft_mut().unwrap();
      draft.set_value(0, "Go");
      draft.set_value(1, "backend");
      draft.set_value(2, "60");
    }
    c.submit();
    settle(&mut c).await;

    assert!(!c.modal().is_open());
    assert_eq!(ops.create_calls.load(Ordering::SeqCst), 1);
    // Invalidation forced a refetch that now includes the new row
    assert_eq!(c.rows().len(), 2);

    toasts.tick();
    assert_eq!(
      toasts.current().map(|n| n.message.as_str()),
      Some("Skill created")
    );
  }

  #[tokio::test]
  async fn test_server_message_preferred_in_notification() {
    let stub = StubOps {
      message: Some("Saved to your portfolio"),
      ..StubOps::with_rows(Vec::new())
    };
    let (mut c, _ops, mut toasts) = controller(stub);
    settle(&mut c).await;

    c.open_create();
    {
      let draft = c.draft_mut().unwrap();
      draft.set_value(0, "Go");
      draft.set_value(1, "backend");
      draft.set_value(2, "60");
    }
    c.submit();
    settle(&mut c).await;

    toasts.tick();
    assert_eq!(
      toasts.current().map(|n| n.message.as_str()),
      Some("Saved to your portfolio")
    );
  }

  #[tokio::test]
  async fn test_failed_create_keeps_modal_and_values() {
    let stub = StubOps {
      fail_mutations: true,
      ..StubOps::with_rows(Vec::new())
    };
    let (mut c, _ops, mut toasts) = controller(stub);
    settle(&mut c).await;

    c.open_create();
    {
      let draft = c.draft_mut().unwrap();
      draft.set_value(0, "Go");
      draft.set_value(1, "backend");
      draft.set_value(2, "60");
    }
    c.submit();
    settle(&mut c).await;

    // Modal still open, unsaved values intact, submit re-enabled for retry
    assert!(c.modal().is_open());
    let draft = c.draft_mut().expect("editable after failure");
    assert_eq!(draft.field(0).unwrap().1, "Go");

    toasts.tick();
    assert_eq!(toasts.current().map(|n| n.kind), Some(crate::notify::NoticeKind::Error));
  }

  #[tokio::test]
  async fn test_validation_errors_block_network() {
    let (mut c, ops, _toasts) = controller(StubOps::with_rows(Vec::new()));
    settle(&mut c).await;

    c.open_create();
    c.submit(); // all required fields empty
    settle(&mut c).await;

    assert!(c.modal().is_open());
    assert_eq!(ops.create_calls.load(Ordering::SeqCst), 0);
    let draft = c.draft_mut().unwrap();
    assert!(draft.error_for("name").is_some());
    assert!(draft.error_for("level").is_some());
  }

  #[tokio::test]
  async fn test_failed_delete_leaves_list_unchanged() {
    let stub = StubOps {
      fail_mutations: true,
      ..StubOps::with_rows(vec![skill("sk-1", "Rust")])
    };
    let (mut c, ops, _toasts) = controller(stub);
    settle(&mut c).await;
    let calls_before = ops.list_calls.load(Ordering::SeqCst);

    c.delete("sk-1");
    settle(&mut c).await;

    assert_eq!(c.rows().len(), 1);
    // No invalidation on failure: no refetch happened
    assert_eq!(ops.list_calls.load(Ordering::SeqCst), calls_before);
  }

  #[tokio::test]
  async fn test_delete_success_refetches_confirmed_state() {
    let (mut c, ops, _toasts) = controller(StubOps::with_rows(vec![
      skill("sk-1", "Rust"),
      skill("sk-2", "Go"),
    ]));
    settle(&mut c).await;
    assert_eq!(c.rows().len(), 2);

    c.delete("sk-1");
    // Not removed optimistically
    assert_eq!(c.rows().len(), 2);
    settle(&mut c).await;

    assert_eq!(c.rows().len(), 1);
    assert_eq!(c.rows()[0].id, "sk-2");
    assert_eq!(ops.delete_calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_duplicate_delete_is_ignored_while_in_flight() {
    let (mut c, ops, _toasts) = controller(StubOps::with_rows(vec![skill("sk-1", "Rust")]));
    settle(&mut c).await;

    c.delete("sk-1");
    assert!(c.is_busy("sk-1"));
    c.delete("sk-1");
    settle(&mut c).await;

    assert_eq!(ops.delete_calls.load(Ordering::SeqCst), 1);
    assert!(!c.is_busy("sk-1"));
  }

  #[tokio::test]
  async fn test_second_modal_rejected_while_open() {
    let (mut c, _ops, _toasts) = controller(StubOps::with_rows(vec![skill("sk-1", "Rust")]));
    settle(&mut c).await;

    c.open_create();
    c.open_edit("sk-1");

    match c.modal() {
      Modal::Open { mode, .. } => assert_eq!(*mode, ModalMode::Create),
      Modal::Closed => panic!("modal should be open"),
    }
  }
}
