use crate::domains::mobile::MobileId;

/// The one mobile the operator is looking at. Selecting the selected id again
/// deselects it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<MobileId>,
}

impl Selection {
    pub fn toggle(&mut self, id: MobileId) -> Option<MobileId> {
        self.selected = if self.selected == Some(id) { None } else { Some(id) };
        self.selected
    }

    pub fn selected(&self) -> Option<MobileId> {
        self.selected
    }

    pub fn is_selected(&self, id: MobileId) -> bool {
        self.selected == Some(id)
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}
