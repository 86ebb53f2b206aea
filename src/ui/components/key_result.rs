/// Outcome of offering a key event to an embedded component.
///
/// Overlay components (search, filter tabs) get first refusal on every key;
/// `Event` carries anything the owning view must then act on itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// The component consumed the key with nothing for the view to do.
  Handled,
  /// The component consumed the key and produced `T` for the view.
  Event(T),
  /// The component ignored the key; the view handles it normally.
  NotHandled,
}
