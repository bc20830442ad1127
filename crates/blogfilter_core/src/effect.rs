/// Outward synchronization requested by a filter transition.
///
/// `Some(tag)` sets the value; `None` removes the parameter or key, which is
/// how the All state is represented externally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Mirror the active tag into the page's `tag` query parameter without
    /// navigating.
    SetQueryTag(Option<String>),
    /// Persist the active tag under the filter storage key.
    StoreTag(Option<String>),
}
