use crate::validation::validate_tags;

/// What a mapping write does to the stored tag list.
///
/// On the wire an omitted `tags` keeps the current list, a non-empty array
/// replaces it, and an empty array removes the field entirely. `clear_tags`
/// requests the removal explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagUpdate {
    Keep,
    Set(Vec<String>),
    Clear,
}

impl TagUpdate {
    pub fn from_request(tags: Option<Vec<String>>, clear_tags: bool) -> Self {
        if clear_tags {
            return TagUpdate::Clear;
        }
        match tags.map(validate_tags) {
            None => TagUpdate::Keep,
            Some(tags) if tags.is_empty() => TagUpdate::Clear,
            Some(tags) => TagUpdate::Set(tags),
        }
    }

    pub fn keeps_existing(&self) -> bool {
        matches!(self, TagUpdate::Keep)
    }

    /// Value written to the tags column; `None` leaves the field absent.
    pub fn stored_tags(&self) -> Option<&[String]> {
        match self {
            TagUpdate::Set(tags) => Some(tags),
            TagUpdate::Keep | TagUpdate::Clear => None,
        }
    }
}
