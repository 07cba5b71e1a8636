/// A create form. It stays open across submissions; only a successful
/// submit clears the fields.
#[derive(Debug, Clone, Default)]
pub struct CreateDialog<F> {
    open: bool,
    pub form: F,
}

impl<F: Default> CreateDialog<F> {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn clear(&mut self) {
        self.form = F::default();
    }
}

/// An edit dialog holding a working copy of the entity.
#[derive(Debug, Clone)]
pub struct EditDialog<T> {
    draft: Option<T>,
}

impl<T> Default for EditDialog<T> {
    fn default() -> Self {
        Self { draft: None }
    }
}

impl<T> EditDialog<T> {
    pub fn open(&mut self, entity: T) {
        self.draft = Some(entity);
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&T> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut T> {
        self.draft.as_mut()
    }

    pub fn close(&mut self) {
        self.draft = None;
    }

    /// Close the dialog and take its working copy.
    pub fn take(&mut self) -> Option<T> {
        self.draft.take()
    }
}

/// Two-step delete: a trigger records the target, a separate confirmation
/// performs it.
#[derive(Debug, Clone)]
pub struct DeleteConfirmation<Id> {
    target: Option<Id>,
}

impl<Id> Default for DeleteConfirmation<Id> {
    fn default() -> Self {
        Self { target: None }
    }
}

impl<Id> DeleteConfirmation<Id> {
    pub fn request(&mut self, id: Id) {
        self.target = Some(id);
    }

    pub fn pending(&self) -> Option<&Id> {
        self.target.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn cancel(&mut self) {
        self.target = None;
    }

    pub fn take(&mut self) -> Option<Id> {
        self.target.take()
    }
}
